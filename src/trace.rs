//! Recording of lifecycle events.
//!
//! A [`Trace`] is a cheap, cloneable handle onto a shared event log. Attach
//! one to a [`crate::lifecycle::Lifecycle`] or [`crate::runner::ClassRunner`]
//! to observe the exact order in which the harness drives hooks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    BeforeEach,
    Setup,
    /// The flag went from `false` to `true`.
    FlagSet,
    /// The flag was already `true`.
    FlagUnchanged,
    TestBody { name: String },
    AfterEach,
    Teardown,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::BeforeEach => write!(f, "before_each"),
            LifecycleEvent::Setup => write!(f, "on_setup"),
            LifecycleEvent::FlagSet => write!(f, "flag:false->true"),
            LifecycleEvent::FlagUnchanged => write!(f, "flag stays true"),
            LifecycleEvent::TestBody { name } => write!(f, "{}", name),
            LifecycleEvent::AfterEach => write!(f, "after_each"),
            LifecycleEvent::Teardown => write!(f, "on_teardown"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Trace {
    events: Arc<Mutex<Vec<LifecycleEvent>>>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: LifecycleEvent) {
        log::trace!("lifecycle event: {}", event);
        self.lock().push(event);
    }

    /// Copy of every event recorded so far.
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Renders the log as `before_each -> on_setup -> flag:false->true -> ...`.
    pub fn render(&self) -> String {
        self.lock()
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    // A panicking hook may poison the lock; the event list stays valid.
    fn lock(&self) -> MutexGuard<'_, Vec<LifecycleEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_events() {
        let trace = Trace::new();
        let other = trace.clone();
        other.record(LifecycleEvent::BeforeEach);
        other.record(LifecycleEvent::Setup);
        assert_eq!(trace.len(), 2);
        assert_eq!(
            trace.events(),
            vec![LifecycleEvent::BeforeEach, LifecycleEvent::Setup]
        );
    }

    #[test]
    fn test_render_joins_with_arrows() {
        let trace = Trace::new();
        trace.record(LifecycleEvent::BeforeEach);
        trace.record(LifecycleEvent::Setup);
        trace.record(LifecycleEvent::FlagSet);
        trace.record(LifecycleEvent::TestBody {
            name: "t1".to_string(),
        });
        assert_eq!(
            trace.render(),
            "before_each -> on_setup -> flag:false->true -> t1"
        );
        trace.clear();
        assert!(trace.is_empty());
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let json = serde_json::to_string(&LifecycleEvent::TestBody {
            name: "t2".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"event":"test_body","name":"t2"}"#);
    }
}
