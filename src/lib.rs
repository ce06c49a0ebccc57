//! Copy-on-write snapshot cells and lock-guarded vectors for concurrent programs.
//!
//! This crate provides two independent primitives:
//!
//! * [`SnapshotLock`], a holder of a single value whose readers never block.
//!   Writers copy the current value, change the copy and publish it with a
//!   single atomic swap, so readers see either the old value or the new one
//!   and never anything in between.
//! * [`SyncArray`], an ordered, growable sequence guarded by a reader/writer
//!   lock, with a handful of `unsafe` zero-copy views for callers that can
//!   guarantee the absence of concurrent mutation themselves.
pub mod error;
pub mod snapshot;
pub(crate) mod sync;
pub mod vector;

pub use error::IndexOutOfRange;
pub use snapshot::{ReclaimConfig, ReclaimPolicy, SnapshotLock, DEFAULT_GRACE_PERIOD};
pub use vector::SyncArray;
