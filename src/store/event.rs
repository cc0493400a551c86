use std::fmt;
use std::rc::Rc;

use super::actions::ActionName;

/// Published on a store's channel once per dispatch.
pub struct TransitionEvent<S> {
    /// The dispatched action, registered or not.
    pub action_name: ActionName,
    /// The snapshot the dispatch committed.
    pub new_state: Rc<S>,
    /// [`Store::revision`](super::Store::revision) right after the commit.
    /// A nested dispatch from inside a listener carries a higher revision
    /// than the event being delivered around it.
    pub revision: u64,
}

impl<S> TransitionEvent<S> {
    /// Whether this transition was caused by `action`.
    pub fn is(&self, action: &str) -> bool {
        &*self.action_name == action
    }
}

impl<S> Clone for TransitionEvent<S> {
    fn clone(&self) -> Self {
        Self {
            action_name: Rc::clone(&self.action_name),
            new_state: Rc::clone(&self.new_state),
            revision: self.revision,
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for TransitionEvent<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionEvent")
            .field("action_name", &self.action_name)
            .field("new_state", &self.new_state)
            .field("revision", &self.revision)
            .finish()
    }
}
