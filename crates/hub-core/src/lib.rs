//! Core domain + application logic for the SmartHub shopping list.
//!
//! This crate is framework-agnostic. The bot transport (Telegram) and the HTTP
//! surface live in adapter crates; both drive the same `ShoppingService`.

pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod ingest;
pub mod logging;
pub mod messaging;
pub mod security;
pub mod shopping;

pub use errors::{Error, Result};
