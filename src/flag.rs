//! One-way initialization flag shared by every test method of a class.

use std::sync::atomic::{AtomicBool, Ordering};

/// A boolean that starts `false` and can only ever become `true`.
#[derive(Debug, Default)]
pub struct InitializationFlag {
    set: AtomicBool,
}

impl InitializationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of the flag.
    pub fn is_set(&self) -> bool {
        self.set.load(Ordering::Acquire)
    }

    /// Sets the flag. Returns `true` only for the call that performed the
    /// `false -> true` transition.
    pub fn mark(&self) -> bool {
        !self.set.swap(true, Ordering::AcqRel)
    }
}
