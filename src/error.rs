//! Errors reported by the checked operations of [`SyncArray`](crate::SyncArray).
use thiserror::Error;

/// A position outside of the range an operation accepts.
///
/// `insert` and `update` accept any position in `[0, len]`, where `len` is the
/// length of the array when the operation ran. The panicking variants of these
/// operations use this error's message as their panic message.
///
/// # Examples
///
/// ```
/// use cowsync::{IndexOutOfRange, SyncArray};
///
/// let array = SyncArray::from_vec(vec![1, 2, 3]);
/// let error = array.try_insert(9, 4).unwrap_err();
/// assert_eq!(error, IndexOutOfRange { operation: "SyncArray::insert", index: 9, len: 3 });
/// assert_eq!(error.to_string(), "SyncArray::insert position [9] over index range [0:3]");
/// ```
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("{operation} position [{index}] over index range [0:{len}]")]
pub struct IndexOutOfRange {
    /// The operation that rejected the position.
    pub operation: &'static str,
    /// The rejected position.
    pub index: usize,
    /// The length of the array at the time of the operation.
    pub len: usize,
}
