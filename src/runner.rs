//! Sequential driver for test classes.
//!
//! The runner plays the part of the external test runner: for every test
//! method of a [`TestClass`] it builds a fresh fixture, calls
//! `before_each`, runs the method, and always calls `after_each`, whatever
//! happened before. All methods of one class share a single
//! [`ClassContext`], created when the class run starts.
//!
//! ```rust
//! use hookline::{ClassRunner, RunConfig, TestClass};
//!
//! let class = TestClass::<()>::with_default("Arithmetic")
//!     .test("adds", |_, _| {
//!         assert_eq!(2 + 2, 4);
//!         Ok(())
//!     })
//!     .test("knows_it_ran_before", |_, ctx| {
//!         assert!(ctx.already_initialized());
//!         Ok(())
//!     });
//!
//! let report = ClassRunner::new(RunConfig::default()).run(&class);
//! assert!(!report.summary().has_failures());
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::RunConfig;
use crate::context::ClassContext;
use crate::diagnostics::{HookResult, HooklineError, LifecyclePhase};
use crate::fixture::Fixture;
use crate::lifecycle::Lifecycle;
use crate::report::{ClassReport, TestResult};
use crate::trace::{LifecycleEvent, Trace};

type TestBody<F> = Box<dyn Fn(&mut F, &ClassContext) -> HookResult>;
type FixtureFactory<F> = Box<dyn Fn() -> F>;

pub struct TestMethod<F> {
    name: String,
    body: TestBody<F>,
    skip: bool,
    only: bool,
}

impl<F> TestMethod<F> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A named group of test methods sharing one fixture type.
pub struct TestClass<F> {
    name: String,
    factory: FixtureFactory<F>,
    methods: Vec<TestMethod<F>>,
}

impl<F: Fixture> TestClass<F> {
    /// `factory` builds a fresh fixture for every test method.
    pub fn new(name: impl Into<String>, factory: impl Fn() -> F + 'static) -> Self {
        Self {
            name: name.into(),
            factory: Box::new(factory),
            methods: Vec::new(),
        }
    }

    pub fn with_default(name: impl Into<String>) -> Self
    where
        F: Default + 'static,
    {
        Self::new(name, F::default)
    }

    pub fn test(
        self,
        name: impl Into<String>,
        body: impl Fn(&mut F, &ClassContext) -> HookResult + 'static,
    ) -> Self {
        self.push(name, body, false, false)
    }

    /// Declares a method that is reported as skipped without running hooks.
    pub fn skip(
        self,
        name: impl Into<String>,
        body: impl Fn(&mut F, &ClassContext) -> HookResult + 'static,
    ) -> Self {
        self.push(name, body, true, false)
    }

    /// Declares a focused method: when any method of the class is focused,
    /// only focused methods run.
    pub fn only(
        self,
        name: impl Into<String>,
        body: impl Fn(&mut F, &ClassContext) -> HookResult + 'static,
    ) -> Self {
        self.push(name, body, false, true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[TestMethod<F>] {
        &self.methods
    }

    fn push(
        mut self,
        name: impl Into<String>,
        body: impl Fn(&mut F, &ClassContext) -> HookResult + 'static,
        skip: bool,
        only: bool,
    ) -> Self {
        self.methods.push(TestMethod {
            name: name.into(),
            body: Box::new(body),
            skip,
            only,
        });
        self
    }
}

/// Object-safe view of a [`TestClass`], so classes with different fixture
/// types can be run together.
pub trait RunClass {
    fn run_with(&self, runner: &ClassRunner) -> ClassReport;
}

impl<F: Fixture> RunClass for TestClass<F> {
    fn run_with(&self, runner: &ClassRunner) -> ClassReport {
        runner.run(self)
    }
}

#[derive(Debug, Default)]
pub struct ClassRunner {
    config: RunConfig,
    trace: Option<Trace>,
}

impl ClassRunner {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            trace: None,
        }
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs every method of `class` in declaration order.
    pub fn run<F: Fixture>(&self, class: &TestClass<F>) -> ClassReport {
        info!("running class {} ({} tests)", class.name, class.methods.len());
        let context = Arc::new(ClassContext::new(class.name.as_str()));
        let has_only = class.methods.iter().any(|m| m.only);
        let filter = self.config.normalized_filter();

        let mut results = Vec::with_capacity(class.methods.len());
        let mut halted = false;
        for method in &class.methods {
            let reason = if halted {
                Some("Not run after an earlier failure (fail_fast)".to_string())
            } else {
                skip_reason(method, has_only, filter.as_deref())
            };
            if let Some(reason) = reason {
                debug!("skipping {}::{}: {}", class.name, method.name, reason);
                results.push(TestResult::Skipped {
                    class: class.name.clone(),
                    name: method.name.clone(),
                    reason,
                });
                continue;
            }

            let result = self.run_method(class, method, &context);
            if result.is_failure() && self.config.fail_fast {
                halted = true;
            }
            results.push(result);
        }

        ClassReport {
            class: class.name.clone(),
            results,
            initialized: context.already_initialized(),
        }
    }

    /// Runs several classes, each against its own context.
    pub fn run_all(&self, classes: &[&dyn RunClass]) -> Vec<ClassReport> {
        classes.iter().map(|class| class.run_with(self)).collect()
    }

    fn run_method<F: Fixture>(
        &self,
        class: &TestClass<F>,
        method: &TestMethod<F>,
        context: &Arc<ClassContext>,
    ) -> TestResult {
        debug!("running {}::{}", class.name, method.name);
        let failure = |phase: LifecyclePhase, outcome: Result<HookResult, String>| match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(HooklineError::from_hook(phase, &class.name, &method.name, e)),
            Err(message) => Some(HooklineError::Panic {
                class: class.name.clone(),
                test: method.name.clone(),
                phase,
                message,
            }),
        };

        let fixture = match catch(|| (class.factory)()) {
            Ok(fixture) => fixture,
            Err(message) => {
                let error = HooklineError::Panic {
                    class: class.name.clone(),
                    test: method.name.clone(),
                    phase: LifecyclePhase::Setup,
                    message,
                };
                return self.failed(class, method, error, None);
            }
        };

        let mut lifecycle = Lifecycle::new(Arc::clone(context), fixture);
        if let Some(trace) = &self.trace {
            lifecycle = lifecycle.with_trace(trace.clone());
        }

        let mut first_failure = failure(LifecyclePhase::Setup, catch(|| lifecycle.before_each()));
        if first_failure.is_none() {
            self.record(LifecycleEvent::TestBody {
                name: method.name.clone(),
            });
            let outcome = catch(|| {
                let (fixture, ctx) = lifecycle.split_mut();
                (method.body)(fixture, ctx)
            });
            first_failure = failure(LifecyclePhase::Body, outcome);
        }
        let teardown_failure = failure(LifecyclePhase::Teardown, catch(|| lifecycle.after_each()));

        match (first_failure, teardown_failure) {
            (None, None) => TestResult::Pass {
                class: class.name.clone(),
                name: method.name.clone(),
            },
            (None, Some(teardown)) => self.failed(class, method, teardown, None),
            (Some(error), teardown) => self.failed(class, method, error, teardown),
        }
    }

    fn failed<F>(
        &self,
        class: &TestClass<F>,
        method: &TestMethod<F>,
        error: HooklineError,
        suppressed: Option<HooklineError>,
    ) -> TestResult {
        warn!("{}", error);
        if let Some(suppressed) = &suppressed {
            warn!("suppressed: {}", suppressed);
        }
        TestResult::Fail {
            class: class.name.clone(),
            name: method.name.clone(),
            phase: error.phase().unwrap_or(LifecyclePhase::Body),
            error: error.to_string(),
            suppressed: suppressed.map(|e| e.to_string()),
        }
    }

    fn record(&self, event: LifecycleEvent) {
        if let Some(trace) = &self.trace {
            trace.record(event);
        }
    }
}

/// Why a method should not run, if it should not.
fn skip_reason<F>(method: &TestMethod<F>, has_only: bool, filter: Option<&str>) -> Option<String> {
    if has_only && !method.only {
        return Some("Not marked 'only' in 'only' mode".to_string());
    }
    if method.skip {
        return Some("Marked 'skip'".to_string());
    }
    if let Some(f) = filter {
        if !method.name.to_lowercase().contains(f) {
            return Some(format!("Filtered out by substring: {}", f));
        }
    }
    None
}

fn catch<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "(non-string panic)".to_string()
    }
}
