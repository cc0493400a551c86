use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::channel::{Channel, Subscription};
use crate::error::{Result, StoreError};

use super::actions::{ActionMap, ActionName};
use super::config::StoreConfig;
use super::event::TransitionEvent;

const UNLABELED: &str = "store";

struct StoreInner<S, P> {
    state: RefCell<Rc<S>>,
    revision: Cell<u64>,
    actions: ActionMap<S, P>,
    transitions: Channel<TransitionEvent<S>>,
    config: StoreConfig,
}

/// A single-threaded store holding an immutable snapshot of application
/// state.
///
/// The snapshot only changes through [`dispatch`](Store::dispatch), which
/// runs a named handler from the store's [`ActionMap`] and then tells every
/// subscriber about the transition.
///
/// Cloning a `Store` creates a new handle to the **same** state.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use stowage::{ActionMap, Store};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Profile {
///     name: String,
///     age: u32,
/// }
///
/// let store = Store::new(
///     Profile { name: "Jane Doe".into(), age: 32 },
///     ActionMap::<Profile, String>::new().draft("changeName", |draft, name| draft.name = name),
/// );
///
/// store.dispatch("changeName", "Susan".to_string()).unwrap();
/// assert_eq!(store.current_state().name, "Susan");
/// assert_eq!(store.current_state().age, 32);
/// ```
pub struct Store<S, P = ()> {
    inner: Rc<StoreInner<S, P>>,
}

impl<S: 'static, P: 'static> Store<S, P> {
    /// Create a new store with the given initial state and actions.
    pub fn new(initial: S, actions: ActionMap<S, P>) -> Self {
        Self::with_config(initial, actions, StoreConfig::default())
    }

    /// Create a new store with explicit configuration.
    pub fn with_config(initial: S, actions: ActionMap<S, P>, config: StoreConfig) -> Self {
        tracing::debug!(
            store = config.label.as_deref().unwrap_or(UNLABELED),
            actions = actions.len(),
            "store created"
        );
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(Rc::new(initial)),
                revision: Cell::new(0),
                actions,
                transitions: Channel::with_panic_policy(config.listener_panics),
                config,
            }),
        }
    }

    /// Get a handle to the current snapshot.
    pub fn current_state(&self) -> Rc<S> {
        Rc::clone(&self.inner.state.borrow())
    }

    /// Number of handled dispatches committed so far.
    ///
    /// Unknown actions leave it unchanged.
    pub fn revision(&self) -> u64 {
        self.inner.revision.get()
    }

    /// Read the current snapshot without keeping a handle to it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let state = self.current_state();
        f(&state)
    }

    /// Apply the action registered as `action` and notify subscribers.
    ///
    /// Returns the snapshot this dispatch committed. An unregistered action
    /// commits the current snapshot unchanged and, unless
    /// [`StoreConfig::emit_unknown_actions`] is off, still notifies.
    ///
    /// If the handler fails, nothing is committed and nobody is notified.
    ///
    /// Listeners may dispatch again on the same store; the nested dispatch
    /// completes (and notifies) before the outer one continues delivering
    /// its own event. Listeners after the re-entrant one therefore see the
    /// newer event first; compare [`TransitionEvent::revision`] to tell.
    pub fn dispatch(&self, action: &str, payload: P) -> Result<Rc<S>> {
        let inner = &*self.inner;
        let span = tracing::debug_span!(
            "dispatch",
            store = inner.config.label.as_deref().unwrap_or(UNLABELED),
            action
        );
        let _enter = span.enter();

        let previous = self.current_state();
        let (action_name, next, revision) = match inner.actions.get(action) {
            Some((name, handler)) => {
                let next = handler(&previous, payload).map_err(|source| {
                    tracing::warn!(error = %source, "action handler failed");
                    StoreError::Handler {
                        action: action.to_owned(),
                        source,
                    }
                })?;
                (Rc::clone(name), next, inner.revision.get() + 1)
            }
            None => {
                tracing::debug!("unknown action, state unchanged");
                if !inner.config.emit_unknown_actions {
                    return Ok(previous);
                }
                (Rc::from(action), Rc::clone(&previous), inner.revision.get())
            }
        };

        *inner.state.borrow_mut() = Rc::clone(&next);
        inner.revision.set(revision);
        tracing::debug!(
            changed = !Rc::ptr_eq(&previous, &next),
            revision,
            "state committed"
        );

        inner.transitions.emit(&TransitionEvent {
            action_name,
            new_state: Rc::clone(&next),
            revision,
        });
        Ok(next)
    }

    /// Subscribe to every transition.
    ///
    /// The listener is called after each dispatch, with the action name and
    /// the committed snapshot.
    #[must_use = "dropping the subscription unsubscribes the listener"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&TransitionEvent<S>) + 'static,
    {
        self.inner.transitions.subscribe(listener)
    }

    /// A reusable dispatcher for one action.
    pub fn bind(&self, action: &str) -> BoundAction<S, P> {
        BoundAction {
            store: self.clone(),
            action: Rc::from(action),
        }
    }

    /// Whether `action` has a registered handler.
    pub fn has_action(&self, action: &str) -> bool {
        self.inner.actions.contains(action)
    }

    /// Number of listeners currently subscribed to this store.
    pub fn listener_count(&self) -> usize {
        self.inner.transitions.listener_count()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }
}

impl<S, P> Clone for Store<S, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: fmt::Debug, P> fmt::Debug for Store<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("label", &self.inner.config.label)
            .field("state", &self.inner.state.borrow())
            .field("actions", &self.inner.actions)
            .finish()
    }
}

/// A store handle bound to a single action name.
///
/// Hand these out to code that should be able to trigger one transition and
/// nothing else.
pub struct BoundAction<S, P = ()> {
    store: Store<S, P>,
    action: ActionName,
}

impl<S: 'static, P: 'static> BoundAction<S, P> {
    /// Dispatch the bound action with `payload`.
    pub fn dispatch(&self, payload: P) -> Result<Rc<S>> {
        self.store.dispatch(&self.action, payload)
    }

    pub fn name(&self) -> &str {
        &self.action
    }
}

impl<S, P> Clone for BoundAction<S, P> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            action: Rc::clone(&self.action),
        }
    }
}

impl<S, P> fmt::Debug for BoundAction<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundAction")
            .field("action", &self.action)
            .finish()
    }
}
