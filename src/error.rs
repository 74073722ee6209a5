//! Fault taxonomy for the container.
//!
//! Every fault is deterministic and raised before any mutation takes place,
//! so a failed call leaves the container exactly as it was.

/// Error returned by container and cursor operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The operation needs at least one element and the container has none.
    ContainerIsEmpty,
    /// An index was at or past the length, or a cursor walk left the
    /// valid range. Landing exactly on the end position is not an error.
    OutOfBounds,
    /// The cursor belongs to a different container, was invalidated by a
    /// structural edit, or denotes the end position where an element is
    /// required.
    InvalidPosition,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ContainerIsEmpty => write!(f, "container is empty"),
            Error::OutOfBounds => write!(f, "index out of bounds"),
            Error::InvalidPosition => write!(f, "invalid position"),
        }
    }
}

impl std::error::Error for Error {}

/// Shorthand for results carrying a container fault.
pub type Result<T> = std::result::Result<T, Error>;
