//! Hookline: fixed setup/teardown sequencing for groups of tests.
//!
//! A [`Fixture`] supplies `on_setup` / `on_teardown` hooks. A [`Lifecycle`]
//! drives them through the fixed entry points `before_each` and
//! `after_each`, and records in the per-class [`ClassContext`] whether the
//! class has been initialized before. [`ClassRunner`] runs a [`TestClass`]
//! method by method around that lifecycle and produces a [`ClassReport`].

pub use crate::config::RunConfig;
pub use crate::context::ClassContext;
pub use crate::diagnostics::{HookError, HookResult, HooklineError, LifecyclePhase};
pub use crate::fixture::Fixture;
pub use crate::flag::InitializationFlag;
pub use crate::lifecycle::Lifecycle;
pub use crate::report::{write_report, ClassReport, TestResult, TestSummary};
pub use crate::runner::{ClassRunner, RunClass, TestClass};
pub use crate::trace::{LifecycleEvent, Trace};

pub mod config;
pub mod context;
pub mod diagnostics;
pub mod fixture;
pub mod flag;
pub mod lifecycle;
pub mod report;
pub mod runner;
pub mod trace;
