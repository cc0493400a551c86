use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use crate::error::BoxError;

/// Name under which an action handler is registered.
pub type ActionName = Rc<str>;

pub(crate) type Handler<S, P> = Box<dyn Fn(&Rc<S>, P) -> Result<Rc<S>, BoxError>>;

/// The fixed set of named transitions a store accepts.
///
/// Every handler is a reducer: it receives the current snapshot and the
/// dispatch payload and returns the next snapshot. Returning the snapshot it
/// was given (`Rc::clone(state)`) means "nothing changed" and keeps the
/// store's snapshot identity.
///
/// Registering a name twice keeps the last handler.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use stowage::ActionMap;
///
/// let actions = ActionMap::<i64, i64>::new()
///     .reducer("add", |state: &Rc<i64>, n| Rc::new(**state + n))
///     .draft("double", |draft, _| **draft *= 2);
///
/// assert!(actions.contains("add"));
/// assert_eq!(actions.len(), 2);
/// ```
pub struct ActionMap<S, P = ()> {
    handlers: HashMap<ActionName, Handler<S, P>>,
}

impl<S: 'static, P: 'static> ActionMap<S, P> {
    /// An empty map.
    ///
    /// Handler closures are type-checked as they are registered, so name
    /// the state type up front (`ActionMap::<State, Payload>::new()`) when
    /// a handler reaches into its fields.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register an infallible reducer.
    pub fn reducer<F>(self, name: &str, reducer: F) -> Self
    where
        F: Fn(&Rc<S>, P) -> Rc<S> + 'static,
    {
        self.insert(name, Box::new(move |state: &Rc<S>, payload: P| Ok(reducer(state, payload))))
    }

    /// Register a reducer that may reject the transition.
    ///
    /// An `Err` aborts the dispatch before anything is committed.
    pub fn try_reducer<F, E>(self, name: &str, reducer: F) -> Self
    where
        F: Fn(&Rc<S>, P) -> Result<Rc<S>, E> + 'static,
        E: Into<BoxError>,
    {
        self.insert(
            name,
            Box::new(move |state: &Rc<S>, payload: P| reducer(state, payload).map_err(Into::into)),
        )
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Whether a handler is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered action names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(|name| &**name)
    }

    pub(crate) fn get(&self, name: &str) -> Option<(&ActionName, &Handler<S, P>)> {
        self.handlers.get_key_value(name)
    }

    fn insert(mut self, name: &str, handler: Handler<S, P>) -> Self {
        self.handlers.insert(Rc::from(name), handler);
        self
    }
}

impl<S: Clone + 'static, P: 'static> ActionMap<S, P> {
    /// Register a handler that edits a [`Draft`] of the current snapshot.
    ///
    /// The draft copies the top level of the state on its first mutable
    /// access. A handler that only reads hands back the original snapshot.
    pub fn draft<F>(self, name: &str, handler: F) -> Self
    where
        F: Fn(&mut Draft<S>, P) + 'static,
    {
        self.insert(
            name,
            Box::new(move |state: &Rc<S>, payload: P| {
                let mut draft = Draft::new(state);
                handler(&mut draft, payload);
                Ok(draft.finish())
            }),
        )
    }

    /// Like [`draft`](Self::draft), but the handler may reject the
    /// transition. A rejected draft is discarded.
    pub fn try_draft<F, E>(self, name: &str, handler: F) -> Self
    where
        F: Fn(&mut Draft<S>, P) -> Result<(), E> + 'static,
        E: Into<BoxError>,
    {
        self.insert(
            name,
            Box::new(move |state: &Rc<S>, payload: P| {
                let mut draft = Draft::new(state);
                handler(&mut draft, payload).map_err(Into::into)?;
                Ok(draft.finish())
            }),
        )
    }
}

impl<S: 'static, P: 'static> Default for ActionMap<S, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, P> fmt::Debug for ActionMap<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

/// A disposable, copy-on-write view of a snapshot.
///
/// Reads go straight to the shared snapshot. The first mutable access
/// (`DerefMut` or [`get_mut`](Draft::get_mut)) clones the top level of the
/// state via [`Rc::make_mut`]; fields that are themselves `Rc`s are shared
/// with the previous snapshot until they're made mutable too.
///
/// ```
/// use std::rc::Rc;
/// use stowage::Draft;
///
/// #[derive(Clone)]
/// struct Profile {
///     name: String,
///     tags: Rc<Vec<String>>,
/// }
///
/// let before = Rc::new(Profile { name: "Jane".into(), tags: Rc::new(vec![]) });
///
/// let untouched = Draft::new(&before).finish();
/// assert!(Rc::ptr_eq(&before, &untouched));
///
/// let mut draft = Draft::new(&before);
/// draft.name = "Susan".into();
/// let after = draft.finish();
///
/// assert_eq!(before.name, "Jane");
/// assert_eq!(after.name, "Susan");
/// assert!(Rc::ptr_eq(&before.tags, &after.tags));
/// ```
pub struct Draft<S> {
    state: Rc<S>,
}

impl<S> Draft<S> {
    /// Start a draft over `base`. Nothing is copied yet.
    pub fn new(base: &Rc<S>) -> Self {
        Self {
            state: Rc::clone(base),
        }
    }

    /// Turn the draft into a snapshot.
    pub fn finish(self) -> Rc<S> {
        self.state
    }
}

impl<S: Clone> Draft<S> {
    /// Mutable access to the draft, copying the base snapshot if this is
    /// the first write.
    pub fn get_mut(&mut self) -> &mut S {
        Rc::make_mut(&mut self.state)
    }
}

impl<S> Deref for Draft<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.state
    }
}

impl<S: Clone> DerefMut for Draft<S> {
    fn deref_mut(&mut self) -> &mut S {
        self.get_mut()
    }
}

impl<S: fmt::Debug> fmt::Debug for Draft<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Draft").field(&self.state).finish()
    }
}
