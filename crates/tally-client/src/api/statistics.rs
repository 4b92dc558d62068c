//! `/statistics/*` endpoints.

use serde::Serialize;

use tally_core::Result;
use tally_core::model::{CategoryStatistics, Overview, TransactionType, TrendPoint};

use crate::client::ApiClient;
use crate::options::RequestOptions;

pub const OVERVIEW: &str = "/statistics/overview";
pub const BY_CATEGORY: &str = "/statistics/category";
pub const TREND: &str = "/statistics/trend";

#[derive(Debug, Clone, Default, Serialize)]
struct OverviewQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    period: Option<&'a str>,
}

/// Query for the category breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryQuery {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
}

/// Query for the trend line.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrendQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months: Option<u32>,
}

/// Dashboard overview: monthly summary, balances, distribution, trend.
pub async fn overview(client: &ApiClient, period: Option<&str>) -> Result<Overview> {
    client
        .get_query(OVERVIEW, &OverviewQuery { period }, RequestOptions::default())
        .await?
        .data()
}

pub async fn by_category(client: &ApiClient, query: &CategoryQuery) -> Result<CategoryStatistics> {
    client
        .get_query(BY_CATEGORY, query, RequestOptions::default())
        .await?
        .data()
}

pub async fn trend(client: &ApiClient, query: &TrendQuery) -> Result<Vec<TrendPoint>> {
    client
        .get_query(TREND, query, RequestOptions::default())
        .await?
        .data()
}
