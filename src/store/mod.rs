//! The state container.
//!
//! A [`Store`] owns one immutable snapshot and the [`ActionMap`] of named
//! transitions allowed on it. Dispatching an action produces the next
//! snapshot by copy-on-write and publishes a [`TransitionEvent`] to every
//! subscriber.

mod actions;
mod config;
mod event;
mod store;

pub use actions::{ActionMap, ActionName, Draft};
pub use config::StoreConfig;
pub use event::TransitionEvent;
pub use store::{BoundAction, Store};
