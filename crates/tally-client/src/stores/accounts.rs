//! Cached account list.

use std::sync::{Arc, RwLock};

use tally_core::Result;
use tally_core::model::{Account, AccountCreate, AccountUpdate, TransferRequest};

use crate::api::accounts;
use crate::client::ApiClient;

/// Account cache plus the derived figures the dashboard needs.
#[derive(Clone)]
pub struct AccountStore {
    inner: Arc<Inner>,
}

struct Inner {
    client: ApiClient,
    accounts: RwLock<Vec<Account>>,
}

impl AccountStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                accounts: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Replace the cache with the backend's account list.
    pub async fn fetch_accounts(&self) -> Result<Vec<Account>> {
        let accounts = accounts::list(&self.inner.client).await?;
        *self.inner.accounts.write().unwrap() = accounts.clone();
        Ok(accounts)
    }

    pub async fn create_account(&self, request: &AccountCreate) -> Result<Account> {
        let account = accounts::create(&self.inner.client, request).await?;
        self.inner.accounts.write().unwrap().push(account.clone());
        Ok(account)
    }

    pub async fn update_account(&self, account_id: i64, request: &AccountUpdate) -> Result<Account> {
        let account = accounts::update(&self.inner.client, account_id, request).await?;
        let mut cached = self.inner.accounts.write().unwrap();
        if let Some(slot) = cached.iter_mut().find(|a| a.id == account_id) {
            *slot = account.clone();
        }
        Ok(account)
    }

    pub async fn delete_account(&self, account_id: i64) -> Result<()> {
        accounts::delete(&self.inner.client, account_id).await?;
        self.inner
            .accounts
            .write()
            .unwrap()
            .retain(|a| a.id != account_id);
        Ok(())
    }

    /// Move money between accounts, then refetch so both balances are
    /// current.
    pub async fn transfer(&self, request: &TransferRequest) -> Result<()> {
        accounts::transfer(&self.inner.client, request).await?;
        self.fetch_accounts().await?;
        Ok(())
    }

    /// Snapshot of the cached list.
    pub fn accounts(&self) -> Vec<Account> {
        self.inner.accounts.read().unwrap().clone()
    }

    pub fn account_by_id(&self, account_id: i64) -> Option<Account> {
        self.inner
            .accounts
            .read()
            .unwrap()
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
    }

    /// Sum of all cached balances.
    pub fn total_balance(&self) -> f64 {
        self.inner
            .accounts
            .read()
            .unwrap()
            .iter()
            .map(|a| a.balance)
            .sum()
    }

    /// Only the accounts still enabled for new transactions.
    pub fn enabled_accounts(&self) -> Vec<Account> {
        self.inner
            .accounts
            .read()
            .unwrap()
            .iter()
            .filter(|a| a.is_enabled)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.inner.accounts.write().unwrap().clear();
    }
}
