//! Cached dashboard statistics.

use std::sync::{Arc, RwLock};

use tally_core::Result;
use tally_core::model::{CategoryStatistics, Overview, TrendPoint};

use crate::api::statistics::{self, CategoryQuery, TrendQuery};
use crate::client::ApiClient;

#[derive(Clone)]
pub struct StatisticsStore {
    inner: Arc<Inner>,
}

struct Inner {
    client: ApiClient,
    overview: RwLock<Option<Overview>>,
    by_category: RwLock<Option<CategoryStatistics>>,
    trend: RwLock<Vec<TrendPoint>>,
}

impl StatisticsStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                overview: RwLock::new(None),
                by_category: RwLock::new(None),
                trend: RwLock::new(Vec::new()),
            }),
        }
    }

    pub async fn fetch_overview(&self, period: Option<&str>) -> Result<Overview> {
        let overview = statistics::overview(&self.inner.client, period).await?;
        *self.inner.overview.write().unwrap() = Some(overview.clone());
        Ok(overview)
    }

    pub async fn fetch_by_category(&self, query: &CategoryQuery) -> Result<CategoryStatistics> {
        let stats = statistics::by_category(&self.inner.client, query).await?;
        *self.inner.by_category.write().unwrap() = Some(stats.clone());
        Ok(stats)
    }

    pub async fn fetch_trend(&self, query: &TrendQuery) -> Result<Vec<TrendPoint>> {
        let trend = statistics::trend(&self.inner.client, query).await?;
        *self.inner.trend.write().unwrap() = trend.clone();
        Ok(trend)
    }

    pub fn overview(&self) -> Option<Overview> {
        self.inner.overview.read().unwrap().clone()
    }

    pub fn by_category(&self) -> Option<CategoryStatistics> {
        self.inner.by_category.read().unwrap().clone()
    }

    pub fn trend(&self) -> Vec<TrendPoint> {
        self.inner.trend.read().unwrap().clone()
    }

    pub fn clear(&self) {
        *self.inner.overview.write().unwrap() = None;
        *self.inner.by_category.write().unwrap() = None;
        self.inner.trend.write().unwrap().clear();
    }
}
