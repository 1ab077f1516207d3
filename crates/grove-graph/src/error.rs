use grove_core::ValidationError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

/// Recoverable failures reported by store operations.
///
/// A failed operation never leaves a partial write behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Owner type not found: {owner} (namespace: {namespace:?})")]
    MissingOwner { owner: String, namespace: String },

    #[error("Relationship endpoint not found: {}", .missing.join(", "))]
    MissingEndpoint { missing: Vec<String> },
}
