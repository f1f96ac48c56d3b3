//! Per-test-class context handed to every fixture hook.
//!
//! A [`ClassContext`] is created once per test class run and owns that
//! class's [`InitializationFlag`]. Contexts are independent: nothing is kept
//! in statics, so unrelated classes (or repeated runs of the same class)
//! never observe each other's state.

use crate::flag::InitializationFlag;

#[derive(Debug)]
pub struct ClassContext {
    name: String,
    flag: InitializationFlag,
}

impl ClassContext {
    /// Creates a context with the flag unset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flag: InitializationFlag::new(),
        }
    }

    /// Name of the test class this context belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` once any test method of this class has completed
    /// `before_each`.
    ///
    /// Despite the name this answers "has this class already been
    /// initialized", not "is this the first setup": it is `false` while the
    /// very first `on_setup` hook runs and `true` for every later one.
    /// [`ClassContext::already_initialized`] is the same query under an
    /// accurate name.
    pub fn is_initial_setup(&self) -> bool {
        self.flag.is_set()
    }

    pub fn already_initialized(&self) -> bool {
        self.flag.is_set()
    }

    /// Records a completed setup. Returns `true` for the transition call.
    pub(crate) fn mark_initialized(&self) -> bool {
        self.flag.mark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_context_is_not_initialized() {
        let ctx = ClassContext::new("Accounts");
        assert_eq!(ctx.name(), "Accounts");
        assert!(!ctx.is_initial_setup());
        assert!(!ctx.already_initialized());
    }

    #[test]
    fn test_contexts_do_not_share_state() {
        let first = ClassContext::new("Accounts");
        let second = ClassContext::new("Accounts");
        assert!(first.mark_initialized());
        assert!(first.is_initial_setup());
        assert!(!second.is_initial_setup());
    }
}
