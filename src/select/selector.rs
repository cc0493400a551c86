use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::channel::Subscription;
use crate::store::{Store, TransitionEvent};

/// A live subscription to a value derived from a store's state.
///
/// Holds the value most recently handed to the change callback; dropping
/// the selection unsubscribes it.
pub struct Selection<T> {
    last: Rc<RefCell<T>>,
    subscription: Subscription,
}

impl<T: Clone> Selection<T> {
    /// The last delivered value, or the initial read if nothing changed yet.
    pub fn current(&self) -> T {
        self.last.borrow().clone()
    }
}

impl<T> Selection<T> {
    pub fn is_active(&self) -> bool {
        self.subscription.is_active()
    }

    /// Stop tracking the store.
    pub fn unsubscribe(self) {
        self.subscription.unsubscribe();
    }
}

impl<T: fmt::Debug> fmt::Debug for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("last", &self.last.borrow())
            .field("subscription", &self.subscription)
            .finish()
    }
}

/// Track `selector(state)` and get told when it changes.
///
/// The selector runs once right away; that value is available from
/// [`Selection::current`] and does not go through `on_change`. After each
/// dispatch the selector runs again against the committed snapshot, and
/// `on_change` is called with the new value only if it differs (by
/// `PartialEq`) from the last one delivered to this subscription.
///
/// Events older than one already seen are skipped. That happens when a
/// listener ahead of this one dispatches again: the nested, newer event
/// arrives first, and the outer one would otherwise roll the selection back.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use stowage::{subscribe_selector, ActionMap, Store};
///
/// #[derive(Clone)]
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
/// let age_changes = Rc::new(Cell::new(0));
/// let age = subscribe_selector(&store, |s: &Profile| s.age, {
///     let age_changes = age_changes.clone();
///     move |_| age_changes.set(age_changes.get() + 1)
/// });
///
/// store.dispatch("changeName", "Susan".into()).unwrap();
///
/// assert_eq!(age.current(), 32);
/// assert_eq!(age_changes.get(), 0);
/// ```
#[must_use = "dropping the selection unsubscribes it"]
pub fn subscribe_selector<S, P, T, Sel, F>(
    store: &Store<S, P>,
    selector: Sel,
    on_change: F,
) -> Selection<T>
where
    S: 'static,
    P: 'static,
    T: Clone + PartialEq + 'static,
    Sel: Fn(&S) -> T + 'static,
    F: Fn(T) + 'static,
{
    subscribe_selector_with(store, selector, T::eq, on_change)
}

/// [`subscribe_selector`] with a custom sameness check.
///
/// Useful when the selected value is a shared subtree and identity is the
/// cheaper test, e.g. `Rc::ptr_eq`.
#[must_use = "dropping the selection unsubscribes it"]
pub fn subscribe_selector_with<S, P, T, Sel, Same, F>(
    store: &Store<S, P>,
    selector: Sel,
    is_same: Same,
    on_change: F,
) -> Selection<T>
where
    S: 'static,
    P: 'static,
    T: Clone + 'static,
    Sel: Fn(&S) -> T + 'static,
    Same: Fn(&T, &T) -> bool + 'static,
    F: Fn(T) + 'static,
{
    let last = Rc::new(RefCell::new(store.read(&selector)));
    let seen = Cell::new(store.revision());

    let subscription = store.subscribe({
        let last = Rc::clone(&last);
        move |event: &TransitionEvent<S>| {
            // Already superseded by a nested dispatch delivered earlier.
            if event.revision < seen.get() {
                return;
            }
            seen.set(event.revision);
            let next = selector(&event.new_state);
            if is_same(&*last.borrow(), &next) {
                return;
            }
            *last.borrow_mut() = next.clone();
            on_change(next);
        }
    });

    Selection { last, subscription }
}

impl<S: 'static, P: 'static> Store<S, P> {
    /// Method form of [`subscribe_selector`].
    #[must_use = "dropping the selection unsubscribes it"]
    pub fn select<T, Sel, F>(&self, selector: Sel, on_change: F) -> Selection<T>
    where
        T: Clone + PartialEq + 'static,
        Sel: Fn(&S) -> T + 'static,
        F: Fn(T) + 'static,
    {
        subscribe_selector(self, selector, on_change)
    }
}
