//! Error kinds reported by `OrderedSet` operations.

use thiserror::Error;

/// Returned by a [`KeyHasher`](crate::KeyHasher) that cannot hash a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unhashable key")]
pub struct Unhashable;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
    /// The hashing policy rejected the key.
    #[error("unhashable key")]
    UnhashableKey,
    /// Strict removal or `index_of` on a key that is not present.
    #[error("key is not a member of the set")]
    NotAMember,
    /// Positional access outside `[-len, len)`, including pop on an empty set.
    #[error("index {index} out of range for set of length {len}")]
    IndexOutOfRange { index: isize, len: usize },
    /// A cursor observed a size change between advances.
    #[error("set changed size during iteration")]
    ConcurrentModification,
    /// Soft failure: the right-hand operand cannot take part in set algebra.
    /// Callers may retry with a reflected operation.
    #[error("operation not supported for operand type `{0}`")]
    UnsupportedOperand(&'static str),
    /// `replace` would make two positions hold equal keys.
    #[error("key is already a member at another position")]
    DuplicateKey,
}

impl From<Unhashable> for SetError {
    fn from(_: Unhashable) -> Self {
        SetError::UnhashableKey
    }
}

impl SetError {
    /// True for the soft "not implemented for this pair" outcome.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, SetError::UnsupportedOperand(_))
    }
}
