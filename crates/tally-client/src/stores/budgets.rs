//! Cached budget list and usage figures.

use std::sync::{Arc, RwLock};

use tally_core::Result;
use tally_core::model::{Budget, BudgetCreate, BudgetUpdate, BudgetUsage};

use crate::api::budgets;
use crate::client::ApiClient;

#[derive(Clone)]
pub struct BudgetStore {
    inner: Arc<Inner>,
}

struct Inner {
    client: ApiClient,
    budgets: RwLock<Vec<Budget>>,
    usage: RwLock<Vec<BudgetUsage>>,
}

impl BudgetStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                budgets: RwLock::new(Vec::new()),
                usage: RwLock::new(Vec::new()),
            }),
        }
    }

    pub async fn fetch_budgets(&self) -> Result<Vec<Budget>> {
        let budgets = budgets::list(&self.inner.client).await?;
        *self.inner.budgets.write().unwrap() = budgets.clone();
        Ok(budgets)
    }

    /// Refresh the current-period consumption figures.
    pub async fn fetch_usage(&self) -> Result<Vec<BudgetUsage>> {
        let usage = budgets::usage(&self.inner.client).await?;
        *self.inner.usage.write().unwrap() = usage.clone();
        Ok(usage)
    }

    pub async fn create_budget(&self, request: &BudgetCreate) -> Result<Budget> {
        let budget = budgets::create(&self.inner.client, request).await?;
        self.inner.budgets.write().unwrap().push(budget.clone());
        Ok(budget)
    }

    pub async fn update_budget(&self, budget_id: i64, request: &BudgetUpdate) -> Result<Budget> {
        let budget = budgets::update(&self.inner.client, budget_id, request).await?;
        let mut cached = self.inner.budgets.write().unwrap();
        if let Some(slot) = cached.iter_mut().find(|b| b.id == budget_id) {
            *slot = budget.clone();
        }
        Ok(budget)
    }

    pub async fn delete_budget(&self, budget_id: i64) -> Result<()> {
        budgets::delete(&self.inner.client, budget_id).await?;
        self.inner
            .budgets
            .write()
            .unwrap()
            .retain(|b| b.id != budget_id);
        Ok(())
    }

    pub fn budgets(&self) -> Vec<Budget> {
        self.inner.budgets.read().unwrap().clone()
    }

    pub fn usage(&self) -> Vec<BudgetUsage> {
        self.inner.usage.read().unwrap().clone()
    }

    /// Usage entries at or over their alert threshold.
    pub fn over_threshold(&self) -> Vec<BudgetUsage> {
        let budgets = self.inner.budgets.read().unwrap();
        self.inner
            .usage
            .read()
            .unwrap()
            .iter()
            .filter(|u| {
                let threshold = budgets
                    .iter()
                    .find(|b| b.id == u.budget_id)
                    .map_or(1.0, |b| b.alert_threshold);
                u.usage_percentage >= threshold * 100.0
            })
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.inner.budgets.write().unwrap().clear();
        self.inner.usage.write().unwrap().clear();
    }
}
