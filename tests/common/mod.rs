//! Shared fixtures for hookline integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use hookline::{hook_err, ClassContext, Fixture, HookResult};

static INIT: Once = Once::new();

/// Initializes `env_logger` once per test binary. Set `RUST_LOG=debug` to
/// see lifecycle transitions.
pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder()
            .is_test(true)
            .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
            .try_init();
    });
}

/// Which hooks of a [`Scripted`] fixture should fail, and how.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Failure {
    #[default]
    None,
    Error,
    Panic,
}

/// Hook call counters shared between the fixtures a factory produces.
#[derive(Debug, Clone, Default)]
pub struct Counters {
    pub setups: Arc<AtomicUsize>,
    pub teardowns: Arc<AtomicUsize>,
    /// Number of setups that saw the class as already initialized.
    pub warm_setups: Arc<AtomicUsize>,
}

impl Counters {
    pub fn setups(&self) -> usize {
        self.setups.load(Ordering::SeqCst)
    }

    pub fn teardowns(&self) -> usize {
        self.teardowns.load(Ordering::SeqCst)
    }

    pub fn warm_setups(&self) -> usize {
        self.warm_setups.load(Ordering::SeqCst)
    }
}

/// Fixture whose hooks count their calls and fail on request.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    pub counters: Counters,
    pub setup: Failure,
    pub teardown: Failure,
}

impl Scripted {
    pub fn new(counters: &Counters) -> Self {
        Self {
            counters: counters.clone(),
            ..Self::default()
        }
    }

    pub fn failing_setup(mut self, failure: Failure) -> Self {
        self.setup = failure;
        self
    }

    pub fn failing_teardown(mut self, failure: Failure) -> Self {
        self.teardown = failure;
        self
    }
}

impl Fixture for Scripted {
    fn on_setup(&mut self, ctx: &ClassContext) -> HookResult {
        self.counters.setups.fetch_add(1, Ordering::SeqCst);
        if ctx.already_initialized() {
            self.counters.warm_setups.fetch_add(1, Ordering::SeqCst);
        }
        match self.setup {
            Failure::None => Ok(()),
            Failure::Error => Err(hook_err!("setup failed on purpose")),
            Failure::Panic => panic!("setup panicked on purpose"),
        }
    }

    fn on_teardown(&mut self, _ctx: &ClassContext) -> HookResult {
        self.counters.teardowns.fetch_add(1, Ordering::SeqCst);
        match self.teardown {
            Failure::None => Ok(()),
            Failure::Error => Err(hook_err!("teardown failed on purpose")),
            Failure::Panic => panic!("teardown panicked on purpose"),
        }
    }
}
