//! `/categories*` endpoints.

use serde::Serialize;

use tally_core::Result;
use tally_core::model::{Category, CategoryCreate, CategoryUpdate, TransactionType};

use crate::client::ApiClient;
use crate::options::RequestOptions;

pub const CATEGORIES: &str = "/categories";

#[derive(Debug, Clone, Default, Serialize)]
struct ListQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<TransactionType>,
}

/// List categories, optionally filtered to one transaction type.
pub async fn list(client: &ApiClient, kind: Option<TransactionType>) -> Result<Vec<Category>> {
    client
        .get_query(CATEGORIES, &ListQuery { kind }, RequestOptions::default())
        .await?
        .data()
}

pub async fn create(client: &ApiClient, request: &CategoryCreate) -> Result<Category> {
    client
        .post(CATEGORIES, request, RequestOptions::default())
        .await?
        .data()
}

pub async fn update(
    client: &ApiClient,
    category_id: i64,
    request: &CategoryUpdate,
) -> Result<Category> {
    client
        .put(
            &format!("{CATEGORIES}/{category_id}"),
            request,
            RequestOptions::default(),
        )
        .await?
        .data()
}

pub async fn delete(client: &ApiClient, category_id: i64) -> Result<()> {
    client
        .delete(
            &format!("{CATEGORIES}/{category_id}"),
            RequestOptions::default(),
        )
        .await
        .map(|_| ())
}
