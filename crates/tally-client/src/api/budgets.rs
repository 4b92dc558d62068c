//! `/budgets*` endpoints.

use tally_core::Result;
use tally_core::model::{Budget, BudgetCreate, BudgetUpdate, BudgetUsage};

use crate::client::ApiClient;
use crate::options::RequestOptions;

pub const BUDGETS: &str = "/budgets";
pub const USAGE: &str = "/budgets/usage";

pub async fn list(client: &ApiClient) -> Result<Vec<Budget>> {
    client
        .get(BUDGETS, RequestOptions::default())
        .await?
        .data()
}

pub async fn create(client: &ApiClient, request: &BudgetCreate) -> Result<Budget> {
    client
        .post(BUDGETS, request, RequestOptions::default())
        .await?
        .data()
}

pub async fn update(client: &ApiClient, budget_id: i64, request: &BudgetUpdate) -> Result<Budget> {
    client
        .put(
            &format!("{BUDGETS}/{budget_id}"),
            request,
            RequestOptions::default(),
        )
        .await?
        .data()
}

pub async fn delete(client: &ApiClient, budget_id: i64) -> Result<()> {
    client
        .delete(&format!("{BUDGETS}/{budget_id}"), RequestOptions::default())
        .await
        .map(|_| ())
}

/// Current-period consumption for every enabled budget.
pub async fn usage(client: &ApiClient) -> Result<Vec<BudgetUsage>> {
    client.get(USAGE, RequestOptions::default()).await?.data()
}
