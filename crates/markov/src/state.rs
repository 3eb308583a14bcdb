//! Ordered state spaces.

use std::fmt;

use crate::error::MarkovError;

/// An ordered sequence of distinct state labels.
///
/// Insertion order fixes the row/column index of every state in the
/// transition matrix built over this space.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpace<S> {
    labels: Vec<S>,
}

impl<S: PartialEq + fmt::Debug> StateSpace<S> {
    /// Creates a state space from labels in index order.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::EmptyStateSpace`] if `labels` is empty and
    /// [`MarkovError::DuplicateState`] if any label repeats.
    pub fn new(labels: Vec<S>) -> Result<Self, MarkovError> {
        if labels.is_empty() {
            return Err(MarkovError::EmptyStateSpace);
        }
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(MarkovError::DuplicateState {
                    label: format!("{label:?}"),
                    index: i,
                });
            }
        }
        Ok(Self { labels })
    }

    /// Returns the index of `label`, if present.
    pub fn index_of(&self, label: &S) -> Option<usize> {
        self.labels.iter().position(|s| s == label)
    }

    /// Returns `true` if `label` belongs to this space.
    pub fn contains(&self, label: &S) -> bool {
        self.labels.contains(label)
    }
}

impl<S> StateSpace<S> {
    /// Number of states.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always `false`: construction rejects empty spaces.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the label at `index`.
    pub fn label(&self, index: usize) -> Option<&S> {
        self.labels.get(index)
    }

    /// Returns all labels in index order.
    pub fn labels(&self) -> &[S] {
        &self.labels
    }

    /// Iterates over labels in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.labels.iter()
    }
}

impl<'a, S> IntoIterator for &'a StateSpace<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}
