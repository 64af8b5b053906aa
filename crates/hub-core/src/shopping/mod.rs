//! Shared shopping list: data model, durable record, and the serialized
//! mutation API used by both the HTTP surface and the bot loop.

pub mod service;
pub mod store;
pub mod types;

pub use service::{Mutation, MutationOutcome, ShoppingService};
pub use store::ListStore;
pub use types::{Item, ShoppingList};
