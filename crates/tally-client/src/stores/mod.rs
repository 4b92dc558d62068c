//! Cached domain stores.
//!
//! Thin CRUD caches over the API modules: `fetch_*` replaces the cache,
//! mutations update it once the backend confirms. Last write wins; there
//! is no conflict detection and no eviction. Errors propagate after the
//! request pipeline has already surfaced them, so callers can roll back
//! local state without double-reporting.

mod accounts;
mod budgets;
mod statistics;
mod transactions;

pub use accounts::AccountStore;
pub use budgets::BudgetStore;
pub use statistics::StatisticsStore;
pub use transactions::TransactionStore;
