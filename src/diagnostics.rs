//! Error types for the hookline lifecycle harness.
//!
//! Hook and test-body failures travel as [`HookError`] and are never wrapped
//! by the lifecycle itself. The runner converts them into [`HooklineError`]
//! only when it records a result, keeping the original error as the source.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type produced by fixture hooks and test bodies.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of a hook or test body.
pub type HookResult = Result<(), HookError>;

/// Type-safe classification of where in the lifecycle a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    /// `before_each` and the fixture's `on_setup` hook
    Setup,
    /// The test method itself
    Body,
    /// `after_each` and the fixture's `on_teardown` hook
    Teardown,
}

impl LifecyclePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecyclePhase::Setup => "setup",
            LifecyclePhase::Body => "body",
            LifecyclePhase::Teardown => "teardown",
        }
    }
}

impl std::fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unified error type for the harness.
#[derive(Debug, Error, Diagnostic)]
pub enum HooklineError {
    #[error("setup failed for {class}::{test}: {message}")]
    #[diagnostic(
        code(hookline::setup),
        help("the flag was left untouched; fix `on_setup` and rerun")
    )]
    Setup {
        class: String,
        test: String,
        message: String,
        #[source]
        source: Option<HookError>,
    },
    #[error("{class}::{test} failed: {message}")]
    #[diagnostic(code(hookline::body))]
    Body {
        class: String,
        test: String,
        message: String,
        #[source]
        source: Option<HookError>,
    },
    #[error("teardown failed for {class}::{test}: {message}")]
    #[diagnostic(code(hookline::teardown))]
    Teardown {
        class: String,
        test: String,
        message: String,
        #[source]
        source: Option<HookError>,
    },
    #[error("{class}::{test} panicked during {phase}: {message}")]
    #[diagnostic(code(hookline::panic))]
    Panic {
        class: String,
        test: String,
        phase: LifecyclePhase,
        message: String,
    },
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(hookline::config))]
    Config {
        message: String,
        #[source]
        source: Option<serde_yaml::Error>,
    },
    #[error("failed to read {path}")]
    #[diagnostic(code(hookline::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl HooklineError {
    /// Wraps a hook error raised in `phase`, keeping it as the source.
    pub fn from_hook(phase: LifecyclePhase, class: &str, test: &str, error: HookError) -> Self {
        let message = error.to_string();
        let class = class.to_string();
        let test = test.to_string();
        let source = Some(error);
        match phase {
            LifecyclePhase::Setup => HooklineError::Setup {
                class,
                test,
                message,
                source,
            },
            LifecyclePhase::Body => HooklineError::Body {
                class,
                test,
                message,
                source,
            },
            LifecyclePhase::Teardown => HooklineError::Teardown {
                class,
                test,
                message,
                source,
            },
        }
    }

    /// Returns the lifecycle phase a failure belongs to, if any.
    pub fn phase(&self) -> Option<LifecyclePhase> {
        match self {
            HooklineError::Setup { .. } => Some(LifecyclePhase::Setup),
            HooklineError::Body { .. } => Some(LifecyclePhase::Body),
            HooklineError::Teardown { .. } => Some(LifecyclePhase::Teardown),
            HooklineError::Panic { phase, .. } => Some(*phase),
            HooklineError::Config { .. } | HooklineError::Io { .. } => None,
        }
    }
}

/// Builds a [`HookError`] from a format string.
///
/// ```rust
/// use hookline::hook_err;
/// let err = hook_err!("connection refused on port {}", 5432);
/// assert_eq!(err.to_string(), "connection refused on port 5432");
/// ```
#[macro_export]
macro_rules! hook_err {
    ($($arg:tt)*) => {
        <$crate::HookError as ::std::convert::From<String>>::from(format!($($arg)*))
    };
}
