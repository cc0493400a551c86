//! Read-side subscriptions built on a store's transition channel.
//!
//! - [`subscribe_selector`]: follow a value derived from state, notified
//!   only when it changes.
//! - [`subscribe_to_actions`]: run a side effect when particular actions
//!   fire.

mod action_effect;
mod selector;

pub use action_effect::{subscribe_to_actions, ActionFilter};
pub use selector::{subscribe_selector, subscribe_selector_with, Selection};
