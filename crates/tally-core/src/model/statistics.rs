//! Statistics dashboard types.

use serde::{Deserialize, Serialize};

/// Income/expense roll-up for the current month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
    #[serde(default)]
    pub income_growth: f64,
    #[serde(default)]
    pub expense_growth: f64,
}

/// One slice of the category distribution chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryShare {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub amount: f64,
    pub percentage: f64,
}

/// One point on the spend/income trend line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub amount: f64,
}

/// The dashboard overview payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overview {
    pub monthly_summary: MonthlySummary,
    pub total_balance: f64,
    #[serde(default)]
    pub category_distribution: Vec<CategoryShare>,
    #[serde(default)]
    pub trend_data: Vec<TrendPoint>,
    pub period: String,
}

/// Per-category aggregate over a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category_id: i64,
    pub category_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub total_amount: f64,
    pub count: u64,
    pub percentage: f64,
}

/// Category breakdown for one transaction type and period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStatistics {
    pub transaction_type: String,
    pub period: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    pub total_amount: f64,
    #[serde(default)]
    pub categories: Vec<CategorySummary>,
}
