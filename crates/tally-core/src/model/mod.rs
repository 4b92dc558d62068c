//! Wire-level domain model.
//!
//! Field names and casing match the backend schemas. Where the original
//! client carried two competing model variants, the later one is canonical
//! (`Account.is_enabled`, `Transaction.remark`, `User.is_active`).

mod account;
mod budget;
mod category;
mod reminder;
mod statistics;
mod transaction;
mod user;

pub use account::{Account, AccountCreate, AccountType, AccountUpdate, TransferRequest};
pub use budget::{Budget, BudgetCreate, BudgetUpdate, BudgetUsage, PeriodType};
pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use reminder::{Reminder, ReminderCreate, ReminderType, ReminderUpdate};
pub use statistics::{
    CategoryShare, CategoryStatistics, CategorySummary, MonthlySummary, Overview, TrendPoint,
};
pub use transaction::{
    Transaction, TransactionCreate, TransactionFilter, TransactionSummary, TransactionType,
    TransactionUpdate,
};
pub use user::User;
