//! Run configuration for [`crate::runner::ClassRunner`].
//!
//! ```yaml
//! filter: "account"   # optional, case-insensitive substring of test names
//! fail_fast: false    # optional, stop a class after its first failure
//! use_colors: true    # optional, defaults to "stderr is a terminal"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::diagnostics::HooklineError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub filter: Option<String>,
    pub fail_fast: bool,
    pub use_colors: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            filter: None,
            fail_fast: false,
            use_colors: atty::is(atty::Stream::Stderr),
        }
    }
}

impl RunConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, HooklineError> {
        serde_yaml::from_str(content).map_err(|e| HooklineError::Config {
            message: e.to_string(),
            source: Some(e),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, HooklineError> {
        let content = fs::read_to_string(path).map_err(|source| HooklineError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Lowercased filter, if one is set and not blank.
    pub(crate) fn normalized_filter(&self) -> Option<String> {
        self.filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase)
    }
}
