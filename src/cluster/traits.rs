//! Clustering traits.

use crate::error::Result;

/// Hard clustering over embedding vectors.
pub trait Clustering {
    /// One label per input vector, numbered from 0.
    fn fit_predict(&self, data: &[&[f32]]) -> Result<Vec<usize>>;

    /// Requested number of groups.
    fn n_clusters(&self) -> usize;

    /// Split `members` into groups, in ascending label order.
    ///
    /// `data[j]` is the vector of `members[j]`. Empty groups are dropped,
    /// so the result can hold fewer than [`Self::n_clusters`] groups.
    fn partition(&self, members: &[usize], data: &[&[f32]]) -> Result<Vec<Vec<usize>>> {
        let labels = self.fit_predict(data)?;
        let n_groups = labels.iter().copied().max().map_or(0, |m| m + 1);
        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); n_groups];
        for (&member, &label) in members.iter().zip(labels.iter()) {
            groups[label].push(member);
        }
        groups.retain(|g| !g.is_empty());
        Ok(groups)
    }
}
