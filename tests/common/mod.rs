#![allow(dead_code)]

pub const NUM_ITERATIONS: usize = 250;
pub const NUM_OPERATIONS: usize = 20;
pub const NUM_PREEMPTIONS: usize = 3;
pub const NUM_THREADS: usize = 3;

/// A value made of several fields that must always agree with each other.
///
/// A reader that observes a `Counter` whose fields disagree has seen a
/// partially updated value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Counter {
    pub count: u64,
    pub doubled: u64,
    pub label: String,
}

impl Counter {
    pub fn new(count: u64) -> Self {
        Self {
            count,
            doubled: count * 2,
            label: count.to_string(),
        }
    }

    /// Increments every field, one at a time.
    pub fn increment(mut self) -> Self {
        self.count += 1;
        self.doubled += 2;
        self.label = self.count.to_string();
        self
    }

    pub fn is_consistent(&self) -> bool {
        self.doubled == self.count * 2 && self.label == self.count.to_string()
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new(0)
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
