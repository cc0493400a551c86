//! # Stowage
//!
//! A small, typed, unidirectional state store for Rust.
//!
//! State lives in a [`Store`] as an immutable snapshot behind an `Rc`. The
//! only way to change it is to dispatch one of the store's named actions,
//! which produces the next snapshot by copy-on-write and tells every
//! subscriber about the transition.
//!
//! ## Building blocks
//!
//! - [`channel::Channel`] - synchronous publish/subscribe with RAII
//!   [`Subscription`]s
//! - [`Store`] - the state container and its [`dispatch`](Store::dispatch)
//! - [`ActionMap`] / [`Draft`] - named reducers, written either as pure
//!   functions or against a copy-on-write draft
//! - [`subscribe_selector`] - follow a derived value, notified only when it
//!   changes
//! - [`subscribe_to_actions`] - run effects when particular actions fire
//!
//! Everything is single-threaded: stores are `!Send` and all notification
//! happens synchronously inside `dispatch`. Logging goes through `tracing`.
//!
//! ```
//! use std::rc::Rc;
//! use stowage::{ActionMap, Store};
//!
//! let store: Store<i32> = Store::new(
//!     0,
//!     ActionMap::<i32>::new().reducer("increment", |s, ()| Rc::new(**s + 1)),
//! );
//!
//! let doubled = store.select(|n: &i32| n * 2, |_| {});
//! store.dispatch("increment", ()).unwrap();
//!
//! assert_eq!(doubled.current(), 2);
//! ```

pub mod channel;
mod error;
pub mod select;
pub mod store;

// Re-export main types for convenience
pub use channel::{ListenerPanicPolicy, Subscription};
pub use error::{BoxError, Result, StoreError};
pub use select::{
    subscribe_selector, subscribe_selector_with, subscribe_to_actions, ActionFilter, Selection,
};
pub use store::{ActionMap, ActionName, BoundAction, Draft, Store, StoreConfig, TransitionEvent};
