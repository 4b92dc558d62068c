//! `/transactions*` endpoints.

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use tally_core::Result;
use tally_core::envelope::Pagination;
use tally_core::model::{
    Transaction, TransactionCreate, TransactionFilter, TransactionSummary, TransactionUpdate,
};

use crate::client::ApiClient;
use crate::options::RequestOptions;

pub const TRANSACTIONS: &str = "/transactions";
pub const IMPORT: &str = "/transactions/import";
pub const EXPORT: &str = "/transactions/export";
pub const SUMMARY: &str = "/transactions/statistics";

/// One page of the transaction list.
#[derive(Debug, Clone)]
pub struct TransactionPage {
    pub items: Vec<Transaction>,
    pub pagination: Option<Pagination>,
}

/// Batch import payload.
#[derive(Debug, Clone, Serialize)]
pub struct ImportRequest {
    pub transactions: Vec<TransactionCreate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Date-range query for the summary endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<tally_core::model::TransactionType>,
}

pub async fn list(client: &ApiClient, filter: &TransactionFilter) -> Result<TransactionPage> {
    let envelope = client
        .get_query(TRANSACTIONS, filter, RequestOptions::default())
        .await?;
    let pagination = envelope.pagination.clone();
    let items = envelope.data()?;
    Ok(TransactionPage { items, pagination })
}

pub async fn get(client: &ApiClient, transaction_id: i64) -> Result<Transaction> {
    client
        .get(
            &format!("{TRANSACTIONS}/{transaction_id}"),
            RequestOptions::default(),
        )
        .await?
        .data()
}

pub async fn create(client: &ApiClient, request: &TransactionCreate) -> Result<Transaction> {
    client
        .post(TRANSACTIONS, request, RequestOptions::default())
        .await?
        .data()
}

pub async fn update(
    client: &ApiClient,
    transaction_id: i64,
    request: &TransactionUpdate,
) -> Result<Transaction> {
    client
        .put(
            &format!("{TRANSACTIONS}/{transaction_id}"),
            request,
            RequestOptions::default(),
        )
        .await?
        .data()
}

pub async fn delete(client: &ApiClient, transaction_id: i64) -> Result<()> {
    client
        .delete(
            &format!("{TRANSACTIONS}/{transaction_id}"),
            RequestOptions::default(),
        )
        .await
        .map(|_| ())
}

/// Batch-import transactions from an external source.
pub async fn import(client: &ApiClient, request: &ImportRequest) -> Result<()> {
    client
        .post(IMPORT, request, RequestOptions::default())
        .await
        .map(|_| ())
}

/// Upload a spreadsheet for batch import.
pub async fn import_file(client: &ApiClient, file_name: &str, bytes: Vec<u8>) -> Result<()> {
    let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
    let form = reqwest::multipart::Form::new().part("file", part);
    client
        .upload(IMPORT, form, RequestOptions::default())
        .await
        .map(|_| ())
}

/// Download the transaction list as a spreadsheet at `dest`.
pub async fn export(client: &ApiClient, dest: &Path) -> Result<()> {
    client.download(EXPORT, dest, RequestOptions::default()).await
}

/// Aggregate income/expense figures over a date range.
pub async fn summary(client: &ApiClient, query: &SummaryQuery) -> Result<TransactionSummary> {
    client
        .get_query(SUMMARY, query, RequestOptions::default())
        .await?
        .data()
}
