use std::collections::HashSet;
use std::rc::Rc;

use crate::channel::Subscription;
use crate::store::{Store, TransitionEvent};

/// Which actions an effect subscription reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionFilter {
    /// Exactly this action.
    One(String),
    /// Any action in the set.
    AnyOf(HashSet<String>),
}

impl ActionFilter {
    pub fn matches(&self, action: &str) -> bool {
        match self {
            ActionFilter::One(name) => name == action,
            ActionFilter::AnyOf(names) => names.contains(action),
        }
    }
}

impl From<&str> for ActionFilter {
    fn from(name: &str) -> Self {
        ActionFilter::One(name.to_string())
    }
}

impl From<String> for ActionFilter {
    fn from(name: String) -> Self {
        ActionFilter::One(name)
    }
}

impl From<HashSet<String>> for ActionFilter {
    fn from(names: HashSet<String>) -> Self {
        ActionFilter::AnyOf(names)
    }
}

impl<const N: usize> From<[&str; N]> for ActionFilter {
    fn from(names: [&str; N]) -> Self {
        names.into_iter().collect()
    }
}

impl From<&[&str]> for ActionFilter {
    fn from(names: &[&str]) -> Self {
        names.iter().copied().collect()
    }
}

impl From<Vec<&str>> for ActionFilter {
    fn from(names: Vec<&str>) -> Self {
        names.into_iter().collect()
    }
}

impl From<Vec<String>> for ActionFilter {
    fn from(names: Vec<String>) -> Self {
        ActionFilter::AnyOf(names.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for ActionFilter {
    fn from_iter<I: IntoIterator<Item = &'a str>>(names: I) -> Self {
        ActionFilter::AnyOf(names.into_iter().map(str::to_string).collect())
    }
}

/// Run `effect` after every dispatch of an action matching `filter`.
///
/// The effect receives the snapshot the matching dispatch committed. Nothing
/// runs at registration time.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use stowage::{subscribe_to_actions, ActionMap, Store};
///
/// let store: Store<i32> = Store::new(
///     0,
///     ActionMap::<i32>::new()
///         .reducer("increment", |s, ()| Rc::new(**s + 1))
///         .reducer("decrement", |s, ()| Rc::new(**s - 1)),
/// );
///
/// let increments = Rc::new(Cell::new(0));
/// let _effect = subscribe_to_actions(&store, "increment", {
///     let increments = increments.clone();
///     move |_| increments.set(increments.get() + 1)
/// });
///
/// store.dispatch("increment", ()).unwrap();
/// store.dispatch("decrement", ()).unwrap();
/// assert_eq!(increments.get(), 1);
/// ```
#[must_use = "dropping the subscription unsubscribes the effect"]
pub fn subscribe_to_actions<S, P, F>(
    store: &Store<S, P>,
    filter: impl Into<ActionFilter>,
    effect: F,
) -> Subscription
where
    S: 'static,
    P: 'static,
    F: Fn(&Rc<S>) + 'static,
{
    let filter = filter.into();
    store.subscribe(move |event: &TransitionEvent<S>| {
        if filter.matches(&event.action_name) {
            effect(&event.new_state);
        }
    })
}

impl<S: 'static, P: 'static> Store<S, P> {
    /// Method form of [`subscribe_to_actions`].
    #[must_use = "dropping the subscription unsubscribes the effect"]
    pub fn on_actions<F>(&self, filter: impl Into<ActionFilter>, effect: F) -> Subscription
    where
        F: Fn(&Rc<S>) + 'static,
    {
        subscribe_to_actions(self, filter, effect)
    }
}
