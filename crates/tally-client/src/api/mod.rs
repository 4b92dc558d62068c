//! Typed endpoint bindings for the backend REST contract.
//!
//! Each module covers one endpoint family and exposes plain async
//! functions over an [`ApiClient`](crate::ApiClient). The backend owns
//! these paths; nothing here invents semantics beyond the wire shapes.

pub mod accounts;
pub mod auth;
pub mod budgets;
pub mod categories;
pub mod reminders;
pub mod statistics;
pub mod transactions;
