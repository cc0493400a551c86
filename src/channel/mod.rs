//! Synchronous publish/subscribe.
//!
//! A [`Channel`] delivers each emitted value to its listeners in registration
//! order. Registration hands back a [`Subscription`] that removes the
//! listener when it is dropped or explicitly unsubscribed.

mod channel;

pub use channel::{Channel, ListenerPanicPolicy, Subscription};
