//! The fixture hook trait.
//!
//! A fixture supplies the customizable steps of the lifecycle; the fixed
//! sequencing around them lives in [`crate::lifecycle::Lifecycle`] and
//! cannot be altered by implementors.

use crate::context::ClassContext;
use crate::diagnostics::HookResult;

/// Setup and teardown hooks for a test class.
///
/// Both hooks default to doing nothing. Errors returned from a hook reach the
/// caller of `before_each` / `after_each` unchanged.
///
/// ```rust
/// use hookline::{ClassContext, Fixture, HookResult};
///
/// #[derive(Default)]
/// struct Ledger {
///     seeded: bool,
/// }
///
/// impl Fixture for Ledger {
///     fn on_setup(&mut self, ctx: &ClassContext) -> HookResult {
///         // Expensive seeding only on the first test of the class.
///         self.seeded = !ctx.already_initialized();
///         Ok(())
///     }
/// }
/// ```
pub trait Fixture {
    fn on_setup(&mut self, _ctx: &ClassContext) -> HookResult {
        Ok(())
    }

    fn on_teardown(&mut self, _ctx: &ClassContext) -> HookResult {
        Ok(())
    }
}

/// The empty fixture: both hooks are no-ops.
impl Fixture for () {}

impl<F: Fixture + ?Sized> Fixture for Box<F> {
    fn on_setup(&mut self, ctx: &ClassContext) -> HookResult {
        (**self).on_setup(ctx)
    }

    fn on_teardown(&mut self, ctx: &ClassContext) -> HookResult {
        (**self).on_teardown(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counting {
        setups: usize,
    }

    impl Fixture for Counting {
        fn on_setup(&mut self, _ctx: &ClassContext) -> HookResult {
            self.setups += 1;
            Ok(())
        }
    }

    #[test]
    fn test_default_hooks_are_noops() {
        let ctx = ClassContext::new("Empty");
        let mut fixture = ();
        assert!(fixture.on_setup(&ctx).is_ok());
        assert!(fixture.on_teardown(&ctx).is_ok());
        assert!(!ctx.is_initial_setup());
    }

    #[test]
    fn test_boxed_fixture_forwards() {
        let ctx = ClassContext::new("Boxed");
        let mut fixture: Box<Counting> = Box::new(Counting { setups: 0 });
        fixture.on_setup(&ctx).unwrap();
        fixture.on_teardown(&ctx).unwrap();
        assert_eq!(fixture.setups, 1);
    }
}
