use crate::storage::StorageError;
use thiserror::Error;

pub type TodoResult<T> = Result<T, TodoError>;

#[derive(Debug, Error)]
pub enum TodoError {
    /// Item text was empty.
    #[error("item text must not be empty")]
    EmptyText,

    #[error("category name must not be empty")]
    EmptyCategory,

    /// The addressed item no longer exists (category pruned or position out of range).
    #[error("no item at position {position} in category `{category}`")]
    StaleReference { category: String, position: usize },

    /// The write-through failed; nothing was committed.
    #[error("failed to persist change: {0}")]
    Storage(#[from] StorageError),
}

impl TodoError {
    pub fn stale(category: &str, position: usize) -> Self {
        Self::StaleReference {
            category: category.to_string(),
            position,
        }
    }

    /// Validation failures are user mistakes, not faults.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyText | Self::EmptyCategory)
    }
}
