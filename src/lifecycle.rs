//! Fixed setup/teardown sequencing around a fixture's hooks.
//!
//! [`Lifecycle::before_each`] and [`Lifecycle::after_each`] are the only way
//! the hooks of a [`Fixture`] are driven. Their order is owned here:
//!
//! - `before_each`: `on_setup`, then (only if the hook returned `Ok`) mark
//!   the class context as initialized.
//! - `after_each`: `on_teardown`. The initialization flag is never touched.
//!
//! Hook errors are returned exactly as the hook produced them.

use std::sync::Arc;

use log::debug;

use crate::context::ClassContext;
use crate::diagnostics::HookResult;
use crate::fixture::Fixture;
use crate::trace::{LifecycleEvent, Trace};

pub struct Lifecycle<F> {
    context: Arc<ClassContext>,
    fixture: F,
    trace: Option<Trace>,
}

impl<F: Fixture> Lifecycle<F> {
    /// Drives `fixture` against an existing class context.
    pub fn new(context: Arc<ClassContext>, fixture: F) -> Self {
        Self {
            context,
            fixture,
            trace: None,
        }
    }

    /// Drives `fixture` against a fresh context named `class`.
    pub fn for_class(class: impl Into<String>, fixture: F) -> Self {
        Self::new(Arc::new(ClassContext::new(class)), fixture)
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn before_each(&mut self) -> HookResult {
        self.record(LifecycleEvent::BeforeEach);
        self.record(LifecycleEvent::Setup);
        self.fixture.on_setup(&self.context)?;
        if self.context.mark_initialized() {
            debug!("class {} initialized", self.context.name());
            self.record(LifecycleEvent::FlagSet);
        } else {
            self.record(LifecycleEvent::FlagUnchanged);
        }
        Ok(())
    }

    pub fn after_each(&mut self) -> HookResult {
        self.record(LifecycleEvent::AfterEach);
        self.record(LifecycleEvent::Teardown);
        self.fixture.on_teardown(&self.context)
    }

    /// See [`ClassContext::is_initial_setup`] for the naming caveat.
    pub fn is_initial_setup(&self) -> bool {
        self.context.is_initial_setup()
    }

    pub fn already_initialized(&self) -> bool {
        self.context.already_initialized()
    }

    pub fn context(&self) -> &Arc<ClassContext> {
        &self.context
    }

    pub fn fixture(&self) -> &F {
        &self.fixture
    }

    pub fn fixture_mut(&mut self) -> &mut F {
        &mut self.fixture
    }

    /// Gives the test body access to the fixture and the class context.
    pub fn split_mut(&mut self) -> (&mut F, &ClassContext) {
        (&mut self.fixture, &self.context)
    }

    pub fn into_fixture(self) -> F {
        self.fixture
    }

    fn record(&self, event: LifecycleEvent) {
        if let Some(trace) = &self.trace {
            trace.record(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook_err;

    /// Records what each hook saw, and optionally fails.
    #[derive(Default)]
    struct Probe {
        seen_flags: Vec<bool>,
        teardowns: usize,
        fail_setup: bool,
        fail_teardown: bool,
    }

    impl Fixture for Probe {
        fn on_setup(&mut self, ctx: &ClassContext) -> HookResult {
            self.seen_flags.push(ctx.is_initial_setup());
            if self.fail_setup {
                return Err(hook_err!("setup exploded"));
            }
            Ok(())
        }

        fn on_teardown(&mut self, _ctx: &ClassContext) -> HookResult {
            self.teardowns += 1;
            if self.fail_teardown {
                return Err(hook_err!("teardown exploded"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_flag_false_before_any_setup() {
        let lifecycle = Lifecycle::for_class("C", ());
        assert!(!lifecycle.is_initial_setup());
    }

    #[test]
    fn test_flag_set_after_first_before_each() {
        let mut lifecycle = Lifecycle::for_class("C", Probe::default());
        lifecycle.before_each().unwrap();
        assert!(lifecycle.is_initial_setup());
        lifecycle.after_each().unwrap();
        lifecycle.before_each().unwrap();
        assert!(lifecycle.already_initialized());
        // The hook sees the value before this call's update.
        assert_eq!(lifecycle.fixture().seen_flags, vec![false, true]);
    }

    #[test]
    fn test_after_each_never_sets_flag() {
        let mut lifecycle = Lifecycle::for_class("C", Probe::default());
        lifecycle.after_each().unwrap();
        lifecycle.after_each().unwrap();
        assert!(!lifecycle.is_initial_setup());
        assert_eq!(lifecycle.fixture().teardowns, 2);
    }

    #[test]
    fn test_setup_error_propagates_and_leaves_flag() {
        let probe = Probe {
            fail_setup: true,
            ..Probe::default()
        };
        let mut lifecycle = Lifecycle::for_class("C", probe);
        let err = lifecycle.before_each().unwrap_err();
        assert_eq!(err.to_string(), "setup exploded");
        assert!(!lifecycle.is_initial_setup());
    }

    #[test]
    fn test_teardown_error_propagates() {
        let probe = Probe {
            fail_teardown: true,
            ..Probe::default()
        };
        let mut lifecycle = Lifecycle::for_class("C", probe);
        lifecycle.before_each().unwrap();
        let err = lifecycle.after_each().unwrap_err();
        assert_eq!(err.to_string(), "teardown exploded");
        assert!(lifecycle.is_initial_setup());
    }

    #[test]
    fn test_shared_context_across_lifecycles() {
        let context = Arc::new(ClassContext::new("Shared"));
        let mut first = Lifecycle::new(Arc::clone(&context), Probe::default());
        first.before_each().unwrap();
        let mut second = Lifecycle::new(Arc::clone(&context), Probe::default());
        second.before_each().unwrap();
        assert_eq!(second.fixture().seen_flags, vec![true]);
    }

    #[test]
    fn test_trace_records_sequence() {
        let trace = Trace::new();
        let mut lifecycle = Lifecycle::for_class("C", ()).with_trace(trace.clone());
        lifecycle.before_each().unwrap();
        lifecycle.after_each().unwrap();
        lifecycle.before_each().unwrap();
        assert_eq!(
            trace.events(),
            vec![
                LifecycleEvent::BeforeEach,
                LifecycleEvent::Setup,
                LifecycleEvent::FlagSet,
                LifecycleEvent::AfterEach,
                LifecycleEvent::Teardown,
                LifecycleEvent::BeforeEach,
                LifecycleEvent::Setup,
                LifecycleEvent::FlagUnchanged,
            ]
        );
    }
}
