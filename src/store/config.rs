use crate::channel::ListenerPanicPolicy;

/// Store behaviour knobs.
///
/// ```
/// use stowage::{ListenerPanicPolicy, StoreConfig};
///
/// let config = StoreConfig::default()
///     .with_label("profile")
///     .emit_unknown_actions(false)
///     .listener_panics(ListenerPanicPolicy::Log);
///
/// assert_eq!(config.label.as_deref(), Some("profile"));
/// assert!(!config.emit_unknown_actions);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Recorded on every dispatch span, to tell stores apart in logs.
    pub label: Option<String>,
    /// Publish a transition event for dispatches of unregistered actions.
    pub emit_unknown_actions: bool,
    pub listener_panics: ListenerPanicPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            label: None,
            emit_unknown_actions: true,
            listener_panics: ListenerPanicPolicy::Resume,
        }
    }
}

impl StoreConfig {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn emit_unknown_actions(mut self, emit: bool) -> Self {
        self.emit_unknown_actions = emit;
        self
    }

    pub fn listener_panics(mut self, policy: ListenerPanicPolicy) -> Self {
        self.listener_panics = policy;
        self
    }
}
