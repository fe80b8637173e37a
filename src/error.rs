use thiserror::Error;

use super::{Format, FormatError};

/// Everything that can go wrong in this crate.
///
/// Every error is reported to the caller of the operation that caused it.
/// Nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// A length disagrees with the shape it is supposed to match.
    #[error("size mismatch in {what}: expected {expected}, got {actual}")]
    SizeMismatch { what: &'static str, expected: usize, actual: usize },

    /// A position format was used where it has no meaning, or was not
    /// recognised.
    #[error("invalid position format: {0}")]
    InvalidFormat(#[from] FormatError),

    /// An interpolation or extrapolation policy name that is not recognised.
    #[error("unknown {kind} policy {name:?}")]
    InvalidPolicy { kind: &'static str, name: String },

    /// The bounds of an axis cannot describe a regular grid.
    #[error("invalid range on axis {axis}: min {min}, max {max}, size {size}")]
    InvalidRange { axis: usize, min: f64, max: f64, size: usize },

    /// A position lies outside the array.
    #[error("position out of range: {0}")]
    OutOfRange(String),

    /// A buffer could not be allocated, e.g. for a table whose header
    /// describes more samples than fit in memory.
    #[error("allocation failed: {0}")]
    Alloc(#[from] std::collections::TryReserveError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid grid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Shorthand for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The `InvalidFormat` error for a conversion from `from` to `to`.
pub(crate) fn bad_pair(from: Format, to: Format) -> Error {
    Error::InvalidFormat(FormatError::Pair {from, to})
}

/// Returns `Err(SizeMismatch)` unless `actual == expected`.
pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if actual == expected { Ok(()) } else { Err(Error::SizeMismatch {what, expected, actual}) }
}
