//! A copy-on-write snapshot cell.
//!
//! See [`SnapshotLock`].
use std::fmt;
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use arc_swap::ArcSwap;
use log::debug;

use crate::sync::{Mutex, MutexGuard};

mod reclaim;
use self::reclaim::Reclaimer;

/// How long a superseded snapshot is kept alive once deferred reclamation
/// is enabled, unless configured otherwise.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(3 * 60);

/// What happens to a snapshot once a newer one has been published.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReclaimPolicy {
    /// The snapshot is released as soon as no reader holds it anymore.
    Immediate,
    /// The snapshot is kept alive for the given grace period after it was
    /// superseded, even if no reader holds it.
    Deferred(Duration),
}

/// Configuration of the reclamation behavior of a [`SnapshotLock`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cowsync::{ReclaimConfig, ReclaimPolicy, SnapshotLock};
///
/// let config = ReclaimConfig::new()
///     .grace_period(Duration::from_secs(10))
///     .deferred(true);
/// let lock = SnapshotLock::with_config(0u32, config);
/// assert_eq!(lock.reclaim_policy(), ReclaimPolicy::Deferred(Duration::from_secs(10)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReclaimConfig {
    grace_period: Duration,
    deferred: bool,
}

impl ReclaimConfig {
    /// Creates a configuration with immediate reclamation and a grace period
    /// of [`DEFAULT_GRACE_PERIOD`].
    pub fn new() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
            deferred: false,
        }
    }

    /// Sets the grace period used once deferred reclamation is enabled.
    pub fn grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Sets whether deferred reclamation is enabled from the start.
    pub fn deferred(mut self, deferred: bool) -> Self {
        self.deferred = deferred;
        self
    }

    /// Returns the policy this configuration describes.
    pub fn policy(&self) -> ReclaimPolicy {
        if self.deferred {
            ReclaimPolicy::Deferred(self.grace_period)
        } else {
            ReclaimPolicy::Immediate
        }
    }
}

impl Default for ReclaimConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A copy-on-write holder of a single value.
///
/// Readers obtain the current snapshot with a single atomic load and never
/// wait for writers. Writers are serialized by an internal mutex: each write
/// clones the current snapshot, lets the caller change the clone, and then
/// publishes the result with a single atomic swap. Because a candidate value
/// is fully built before it is published, a reader observes either the
/// snapshot before a write or the one after it, and never a partially
/// updated value.
///
/// Snapshots are handed out as [`Arc`]s, so a reader may keep using a
/// snapshot for as long as it likes; a superseded snapshot is released once
/// its last reader drops it. With [`SnapshotLock::force_delay_destruction`]
/// superseded snapshots are additionally kept alive for a grace period.
///
/// # Examples
///
/// A counter shared by several threads.
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use cowsync::SnapshotLock;
///
/// #[derive(Clone, Default)]
/// struct Config {
///     name: String,
///     count: u64,
/// }
///
/// let lock = Arc::new(SnapshotLock::new(Config::default()));
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let lock = lock.clone();
///         thread::spawn(move || {
///             for _ in 0..100 {
///                 lock.write(|mut config| {
///                     config.count += 1;
///                     Some(config)
///                 });
///             }
///         })
///     })
///     .collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(lock.read().count, 400);
/// ```
pub struct SnapshotLock<T> {
    current: ArcSwap<T>,
    writer: Mutex<Reclaimer<T>>,
}

impl<T> SnapshotLock<T> {
    /// Creates a lock holding `initial`, releasing superseded snapshots
    /// immediately.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowsync::{ReclaimPolicy, SnapshotLock};
    ///
    /// let lock = SnapshotLock::new(String::from("hello"));
    /// assert_eq!(*lock.read(), "hello");
    /// assert_eq!(lock.reclaim_policy(), ReclaimPolicy::Immediate);
    /// ```
    pub fn new(initial: T) -> Self {
        Self::with_config(initial, ReclaimConfig::default())
    }

    /// Creates a lock holding `initial`, with the given reclamation behavior.
    pub fn with_config(initial: T, config: ReclaimConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
            writer: Mutex::new(Reclaimer::new(config)),
        }
    }

    /// Returns the current snapshot.
    ///
    /// This performs one atomic load and never blocks on a concurrent
    /// [`write`](SnapshotLock::write) or [`set`](SnapshotLock::set). The
    /// returned snapshot is unaffected by later writes.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowsync::SnapshotLock;
    ///
    /// let lock = SnapshotLock::new(1);
    /// let before = lock.read();
    /// lock.set(2);
    /// assert_eq!(*before, 1);
    /// assert_eq!(*lock.read(), 2);
    /// ```
    pub fn read(&self) -> Arc<T> {
        self.current.load_full()
    }

    /// Calls `f` with a reference to the current snapshot.
    ///
    /// This avoids cloning the snapshot's [`Arc`], which makes it the cheaper
    /// choice for short inspections. The snapshot stays alive until `f`
    /// returns.
    ///
    /// ```
    /// use cowsync::SnapshotLock;
    ///
    /// let lock = SnapshotLock::new(vec![1, 2, 3]);
    /// assert_eq!(lock.read_with(|v| v.len()), 3);
    /// ```
    pub fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let snapshot = self.current.load();
        f(&**snapshot)
    }

    /// Switches to deferred reclamation: from now on, every superseded
    /// snapshot is kept alive for the configured grace period.
    ///
    /// This cannot be undone. Calling it again has no further effect.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowsync::{ReclaimPolicy, SnapshotLock, DEFAULT_GRACE_PERIOD};
    ///
    /// let lock = SnapshotLock::new(0);
    /// lock.force_delay_destruction();
    /// assert_eq!(lock.reclaim_policy(), ReclaimPolicy::Deferred(DEFAULT_GRACE_PERIOD));
    /// ```
    pub fn force_delay_destruction(&self) {
        let mut reclaimer = self.writer();
        if !reclaimer.is_deferred() {
            debug!(
                "deferring reclamation of superseded snapshots by {:?}",
                reclaimer.grace_period()
            );
            reclaimer.defer();
        }
    }

    /// Returns what happens to snapshots once they are superseded.
    pub fn reclaim_policy(&self) -> ReclaimPolicy {
        self.writer().policy()
    }

    /// Consumes the lock, returning the current snapshot.
    pub fn into_inner(self) -> Arc<T> {
        self.current.into_inner()
    }

    fn writer(&self) -> MutexGuard<'_, Reclaimer<T>> {
        // Mutators never see the reclaimer, so it is intact after a panic.
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Send + Sync + 'static> SnapshotLock<T> {
    /// Replaces the current snapshot with `value`.
    ///
    /// Passing `None` leaves the current snapshot in place.
    ///
    /// When `T` is itself an `Option`, a bare `None` does not say which
    /// layer it belongs to and fails to infer; use
    /// [`set_value`](SnapshotLock::set_value) to publish such values.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowsync::SnapshotLock;
    ///
    /// let lock = SnapshotLock::new(1);
    /// lock.set(2);
    /// assert_eq!(*lock.read(), 2);
    ///
    /// lock.set(None);
    /// assert_eq!(*lock.read(), 2);
    /// ```
    pub fn set<V: Into<Option<T>>>(&self, value: V) {
        if let Some(value) = value.into() {
            self.set_value(value);
        }
    }

    /// Replaces the current snapshot with `value` unconditionally.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowsync::SnapshotLock;
    ///
    /// let lock: SnapshotLock<Option<u32>> = SnapshotLock::new(Some(1));
    /// lock.set_value(None);
    /// assert_eq!(*lock.read(), None);
    /// ```
    pub fn set_value(&self, value: T) {
        let mut reclaimer = self.writer();
        let superseded = self.current.swap(Arc::new(value));
        reclaimer.retire(superseded);
    }

    /// Replaces the current snapshot with a changed copy of itself.
    ///
    /// While holding the writer guard, this clones the current snapshot and
    /// passes the clone to `mutate`. If `mutate` returns `Some`, the returned
    /// value is published as the new snapshot and `true` is returned. If it
    /// returns `None`, the write is abandoned, the current snapshot is left
    /// untouched and `false` is returned.
    ///
    /// Readers running concurrently with `mutate` keep seeing the previous
    /// snapshot. Writes are serialized, so concurrent read-modify-write
    /// cycles never lose an update.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowsync::SnapshotLock;
    ///
    /// let lock = SnapshotLock::new(vec![1, 2]);
    ///
    /// assert!(lock.write(|mut v| {
    ///     v.push(3);
    ///     Some(v)
    /// }));
    /// assert_eq!(*lock.read(), vec![1, 2, 3]);
    ///
    /// assert!(!lock.write(|mut v| {
    ///     v.clear();
    ///     None
    /// }));
    /// assert_eq!(*lock.read(), vec![1, 2, 3]);
    /// ```
    pub fn write<F>(&self, mutate: F) -> bool
    where
        T: Clone,
        F: FnOnce(T) -> Option<T>,
    {
        let mut reclaimer = self.writer();
        let copy = T::clone(&self.current.load());
        match mutate(copy) {
            Some(value) => {
                let superseded = self.current.swap(Arc::new(value));
                reclaimer.retire(superseded);
                true
            }
            None => false,
        }
    }
}

impl<T: Default> Default for SnapshotLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for SnapshotLock<T> {
    fn from(initial: T) -> Self {
        Self::new(initial)
    }
}

impl<T: fmt::Debug> fmt::Debug for SnapshotLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotLock")
            .field("current", &self.read())
            .finish()
    }
}
