//! Reversible `(name, description)` encoding for the embedding store.
//!
//! The store embeds a single string per document. Repeating the name in front
//! of the description weights the embedding toward the name:
//!
//! ```text
//! encode("Fan curve", "Tune the GPU fan")  =>  "Fan curve. Fan curve: Tune the GPU fan"
//! ```
//!
//! Decoding strips the first occurrence of the `"{name}. {name}:"` prefix and
//! the single space `encode` put after it. A description that itself contains
//! the prefix keeps its own copy; only the inserted one is removed.

/// The prefix pattern written in front of every description.
pub fn prefix(name: &str) -> String {
    format!("{name}. {name}:")
}

/// Encode a document name and description into the stored text.
pub fn encode(name: &str, description: &str) -> String {
    format!("{} {description}", prefix(name))
}

/// Recover the description from text produced by [`encode`].
///
/// Text that does not contain the prefix is returned unchanged.
pub fn decode(name: &str, encoded: &str) -> String {
    let pattern = prefix(name);
    match encoded.find(&pattern) {
        Some(start) => {
            let head = &encoded[..start];
            let mut tail = &encoded[start + pattern.len()..];
            if let Some(rest) = tail.strip_prefix(' ') {
                tail = rest;
            }
            format!("{head}{tail}")
        }
        None => encoded.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_repeats_the_name() {
        assert_eq!(
            encode("Fan curve", "Tune the GPU fan"),
            "Fan curve. Fan curve: Tune the GPU fan"
        );
    }

    #[test]
    fn decode_strips_the_prefix() {
        let stored = encode("Idea", "Some text");
        assert_eq!(decode("Idea", &stored), "Some text");
    }

    #[test]
    fn empty_description_round_trips() {
        assert_eq!(decode("n", &encode("n", "")), "");
    }

    #[test]
    fn decode_without_prefix_is_identity() {
        assert_eq!(decode("Other", "plain text"), "plain text");
    }

    #[test]
    fn embedded_prefix_only_first_occurrence_removed() {
        let description = "see Idea. Idea: earlier note";
        let stored = encode("Idea", description);
        // The copy inside the description survives.
        assert_eq!(decode("Idea", &stored), description);
    }

    proptest! {
        #[test]
        fn round_trip_without_collision(
            name in "[A-Za-z0-9 ]{1,20}",
            description in ".{0,120}",
        ) {
            prop_assume!(!description.contains(&prefix(&name)));
            prop_assert_eq!(decode(&name, &encode(&name, &description)), description);
        }
    }
}
