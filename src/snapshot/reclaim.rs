//! Deferred release of superseded snapshots.
use std::io;
use std::sync::mpsc::{self, Receiver, SendError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};

use super::{ReclaimConfig, ReclaimPolicy};

/// A snapshot waiting for its grace period to run out.
struct Retired<T> {
    snapshot: Arc<T>,
    deadline: Instant,
}

/// Decides when superseded snapshots are released.
///
/// In deferred mode, retired snapshots are handed to a background thread
/// that holds each of them until its deadline. The thread is spawned on the
/// first retirement and exits once the owning lock has been dropped and every
/// retired snapshot has been released. Every snapshot is retired with the
/// same grace period, so deadlines arrive in order and the thread only ever
/// waits for the oldest one.
pub(crate) struct Reclaimer<T> {
    config: ReclaimConfig,
    queue: Option<Sender<Retired<T>>>,
}

impl<T> Reclaimer<T> {
    pub(crate) fn new(config: ReclaimConfig) -> Self {
        Self {
            config,
            queue: None,
        }
    }

    pub(crate) fn is_deferred(&self) -> bool {
        self.config.deferred
    }

    pub(crate) fn grace_period(&self) -> Duration {
        self.config.grace_period
    }

    pub(crate) fn defer(&mut self) {
        self.config.deferred = true;
    }

    pub(crate) fn policy(&self) -> ReclaimPolicy {
        self.config.policy()
    }
}

impl<T: Send + Sync + 'static> Reclaimer<T> {
    /// Takes ownership of a snapshot that has just been superseded.
    pub(crate) fn retire(&mut self, snapshot: Arc<T>) {
        if !self.config.deferred {
            trace!("releasing superseded snapshot");
            return;
        }
        let retired = Retired {
            snapshot,
            deadline: Instant::now() + self.config.grace_period,
        };
        let retired = match &self.queue {
            Some(queue) => match queue.send(retired) {
                Ok(()) => return,
                // The reclaimer thread is gone, start a new one.
                Err(SendError(retired)) => retired,
            },
            None => retired,
        };
        match spawn_reclaimer() {
            Ok(queue) => {
                if let Err(SendError(retired)) = queue.send(retired) {
                    warn!("snapshot reclaimer exited early, releasing snapshot immediately");
                    drop(retired.snapshot);
                }
                self.queue = Some(queue);
            }
            Err(err) => {
                warn!("failed to spawn snapshot reclaimer, releasing snapshot immediately: {err}");
                self.queue = None;
            }
        }
    }
}

fn spawn_reclaimer<T: Send + Sync + 'static>() -> io::Result<Sender<Retired<T>>> {
    let (sender, receiver) = mpsc::channel();
    thread::Builder::new()
        .name("snapshot-reclaimer".into())
        .spawn(move || hold_until_deadline(receiver))?;
    Ok(sender)
}

fn hold_until_deadline<T>(receiver: Receiver<Retired<T>>) {
    debug!("snapshot reclaimer started");
    for retired in receiver {
        thread::sleep(retired.deadline.saturating_duration_since(Instant::now()));
        trace!("grace period elapsed, releasing retired snapshot");
        drop(retired.snapshot);
    }
    debug!("snapshot reclaimer exiting");
}
