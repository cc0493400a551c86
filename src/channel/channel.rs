use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

type Listener<E> = Rc<dyn Fn(&E)>;

/// What a channel does once an emit has finished and one of its listeners
/// panicked along the way.
///
/// Every listener is always called, whatever the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListenerPanicPolicy {
    /// Re-raise the first captured panic after delivery completes.
    #[default]
    Resume,
    /// Log the panic and keep going.
    Log,
}

struct ChannelInner<E> {
    next_id: Cell<usize>,
    listeners: RefCell<Vec<(usize, Listener<E>)>>,
    panic_policy: ListenerPanicPolicy,
}

/// Type-erased view of a channel's listener table, so that [`Subscription`]
/// doesn't need to carry the event type.
trait ListenerRegistry {
    fn remove(&self, id: usize);
    fn contains(&self, id: usize) -> bool;
}

impl<E> ListenerRegistry for ChannelInner<E> {
    fn remove(&self, id: usize) {
        let mut listeners = self.listeners.borrow_mut();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        tracing::trace!(listener = id, remaining = listeners.len(), "listener removed");
    }

    fn contains(&self, id: usize) -> bool {
        self.listeners
            .borrow()
            .iter()
            .any(|(listener_id, _)| *listener_id == id)
    }
}

/// A single-threaded, synchronous event channel.
///
/// Cloning a `Channel` creates a new handle to the **same** listener set.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use stowage::channel::Channel;
///
/// let channel = Channel::new();
/// let total = Rc::new(Cell::new(0));
///
/// let sub = channel.subscribe({
///     let total = total.clone();
///     move |n: &i32| total.set(total.get() + n)
/// });
///
/// channel.emit(&2);
/// channel.emit(&3);
/// assert_eq!(total.get(), 5);
///
/// sub.unsubscribe();
/// channel.emit(&10);
/// assert_eq!(total.get(), 5);
/// ```
pub struct Channel<E> {
    inner: Rc<ChannelInner<E>>,
}

impl<E: 'static> Channel<E> {
    /// Create a channel that resumes listener panics after delivery.
    pub fn new() -> Self {
        Self::with_panic_policy(ListenerPanicPolicy::default())
    }

    /// Create a channel with an explicit listener panic policy.
    pub fn with_panic_policy(panic_policy: ListenerPanicPolicy) -> Self {
        Self {
            inner: Rc::new(ChannelInner {
                next_id: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
                panic_policy,
            }),
        }
    }

    /// Register a listener.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// dropped or unsubscribed.
    #[must_use = "dropping the subscription unsubscribes the listener"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&E) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        let count = {
            let mut listeners = self.inner.listeners.borrow_mut();
            listeners.push((id, Rc::new(listener)));
            listeners.len()
        };
        tracing::trace!(listener = id, count, "listener added");

        let registry: Rc<dyn ListenerRegistry> = self.inner.clone();
        Subscription {
            id,
            registry: Rc::downgrade(&registry),
        }
    }

    /// Deliver `event` to every listener registered when this call begins.
    ///
    /// Listeners added or removed while the emit is running (by a listener,
    /// or by a nested emit) don't change who receives this event. Each
    /// listener runs isolated: a panic in one doesn't stop the rest.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        let mut first_panic = None;
        for listener in snapshot {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| listener(event))) {
                tracing::error!(panic = panic_message(&*payload), "listener panicked");
                first_panic.get_or_insert(payload);
            }
        }

        if let Some(payload) = first_panic {
            if self.inner.panic_policy == ListenerPanicPolicy::Resume {
                panic::resume_unwind(payload);
            }
        }
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl<E: 'static> Default for Channel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Channel<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> fmt::Debug for Channel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("listeners", &self.inner.listeners.borrow().len())
            .field("panic_policy", &self.inner.panic_policy)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<non-string panic payload>"
    }
}

/// RAII guard for a channel listener.
///
/// Dropping the guard removes the listener. Removing a listener the channel
/// no longer has, or whose channel is gone, does nothing.
pub struct Subscription {
    id: usize,
    registry: Weak<dyn ListenerRegistry>,
}

impl Subscription {
    /// Remove the listener now.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Whether the listener is still registered with a live channel.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.contains(self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
