//! Cached transaction page.

use std::sync::{Arc, RwLock};

use tally_core::Result;
use tally_core::envelope::Pagination;
use tally_core::model::{Transaction, TransactionCreate, TransactionFilter, TransactionUpdate};

use crate::api::transactions;
use crate::client::ApiClient;

/// Holds the most recently fetched page and its pagination block.
///
/// Two concurrent mutations of the same entry race; the last response to
/// land wins in the cache.
#[derive(Clone)]
pub struct TransactionStore {
    inner: Arc<Inner>,
}

struct Inner {
    client: ApiClient,
    transactions: RwLock<Vec<Transaction>>,
    pagination: RwLock<Option<Pagination>>,
}

impl TransactionStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                transactions: RwLock::new(Vec::new()),
                pagination: RwLock::new(None),
            }),
        }
    }

    /// Fetch one page and replace the cache with it.
    pub async fn fetch_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let page = transactions::list(&self.inner.client, filter).await?;
        *self.inner.transactions.write().unwrap() = page.items.clone();
        *self.inner.pagination.write().unwrap() = page.pagination;
        Ok(page.items)
    }

    /// Create an entry; it is prepended as the most recent one.
    pub async fn create_transaction(&self, request: &TransactionCreate) -> Result<Transaction> {
        let transaction = transactions::create(&self.inner.client, request).await?;
        self.inner
            .transactions
            .write()
            .unwrap()
            .insert(0, transaction.clone());
        Ok(transaction)
    }

    pub async fn update_transaction(
        &self,
        transaction_id: i64,
        request: &TransactionUpdate,
    ) -> Result<Transaction> {
        let transaction = transactions::update(&self.inner.client, transaction_id, request).await?;
        let mut cached = self.inner.transactions.write().unwrap();
        if let Some(slot) = cached.iter_mut().find(|t| t.id == transaction_id) {
            *slot = transaction.clone();
        }
        Ok(transaction)
    }

    pub async fn delete_transaction(&self, transaction_id: i64) -> Result<()> {
        transactions::delete(&self.inner.client, transaction_id).await?;
        self.inner
            .transactions
            .write()
            .unwrap()
            .retain(|t| t.id != transaction_id);
        Ok(())
    }

    /// Snapshot of the cached page.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.inner.transactions.read().unwrap().clone()
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.inner.pagination.read().unwrap().clone()
    }

    pub fn clear(&self) {
        self.inner.transactions.write().unwrap().clear();
        *self.inner.pagination.write().unwrap() = None;
    }
}
