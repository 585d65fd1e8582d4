//! Markdown rendering of an outline.
//!
//! ```text
//! ## Contents
//!
//! - [Fan & Noise](#chap-0)
//!   - [Gpus](#sec-0-1)
//!
//! ---
//!
//! <a id="chap-0"></a>
//! ## Fan & Noise
//!
//! - gpu-fans : Tune the GPU fan curve
//! ```
//!
//! Leaves show `name : description`, with the description decoded from the
//! stored text.

use std::fmt::Write;

use super::node::TreeNode;
use crate::codec;

/// Deepest heading level listed in the table of contents.
const TOC_LEVELS: usize = 2;

/// Render a node sequence as a Markdown document.
pub fn render_markdown(nodes: &[TreeNode]) -> String {
    let mut out = String::new();

    let mut toc = String::new();
    for (i, node) in nodes.iter().enumerate() {
        toc_entry(&mut toc, node, &i.to_string());
    }
    if !toc.is_empty() {
        out.push_str("## Contents\n\n");
        out.push_str(&toc);
        out.push_str("\n---\n\n");
    }

    let mut pending_leaves = false;
    for (i, node) in nodes.iter().enumerate() {
        body(&mut out, node, &i.to_string(), &mut pending_leaves);
    }
    out
}

fn anchor(level: usize, path: &str) -> String {
    if level == 1 {
        format!("chap-{path}")
    } else {
        format!("sec-{path}")
    }
}

fn toc_entry(out: &mut String, node: &TreeNode, path: &str) {
    if let TreeNode::Heading {
        title,
        level,
        children,
        ..
    } = node
    {
        if *level > TOC_LEVELS {
            return;
        }
        let indent = "  ".repeat(level.saturating_sub(1));
        let _ = writeln!(out, "{indent}- [{title}](#{})", anchor(*level, path));
        for (i, child) in children.iter().enumerate() {
            toc_entry(out, child, &format!("{path}-{i}"));
        }
    }
}

fn body(out: &mut String, node: &TreeNode, path: &str, pending_leaves: &mut bool) {
    match node {
        TreeNode::Heading {
            title,
            level,
            children,
            ..
        } => {
            if *pending_leaves {
                out.push('\n');
                *pending_leaves = false;
            }
            let hashes = "#".repeat((level + 1).min(6));
            let _ = writeln!(out, "<a id=\"{}\"></a>", anchor(*level, path));
            let _ = writeln!(out, "{hashes} {title}\n");
            for (i, child) in children.iter().enumerate() {
                body(out, child, &format!("{path}-{i}"), pending_leaves);
            }
        }
        TreeNode::Leaf { id, title, text, .. } => {
            let _ = writeln!(out, "- {title} : {}", codec::decode(id, text));
            *pending_leaves = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;

    #[test]
    fn test_render_toc_and_body() {
        let nodes = vec![TreeNode::heading(
            "Fan & Noise",
            1,
            vec![
                TreeNode::leaf("gpu-fans", encode("gpu-fans", "Tune the GPU fan curve"), 0.3),
                TreeNode::heading(
                    "Gpus",
                    2,
                    vec![TreeNode::leaf("quiet", encode("quiet", "Quieter coolers"), 0.2)],
                    0.4,
                ),
            ],
            0.5,
        )];
        let md = render_markdown(&nodes);
        let expected = "\
## Contents

- [Fan & Noise](#chap-0)
  - [Gpus](#sec-0-1)

---

<a id=\"chap-0\"></a>
## Fan & Noise

- gpu-fans : Tune the GPU fan curve

<a id=\"sec-0-1\"></a>
### Gpus

- quiet : Quieter coolers
";
        assert_eq!(md, expected);
    }

    #[test]
    fn test_flat_outline_has_no_contents() {
        let nodes = vec![TreeNode::leaf("a", "plain text", 1.0)];
        assert_eq!(render_markdown(&nodes), "- a : plain text\n");
        assert_eq!(render_markdown(&[]), "");
    }

    #[test]
    fn test_toc_stops_at_level_two() {
        let deep = TreeNode::heading(
            "L1",
            1,
            vec![TreeNode::heading(
                "L2",
                2,
                vec![TreeNode::heading("L3", 3, vec![TreeNode::leaf("x", "t", 0.1)], 0.1)],
                0.1,
            )],
            0.1,
        );
        let md = render_markdown(&[deep]);
        let contents = md.split("---").next().unwrap_or_default();
        assert!(contents.contains("[L2]"));
        assert!(!contents.contains("[L3]"));
        assert!(md.contains("#### L3"));
    }
}
