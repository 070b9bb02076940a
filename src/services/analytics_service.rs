use std::sync::Arc;

use crate::error::Result;
use crate::models::analytics::{Analytics, Period, StatusCounts};
use crate::services::gateway::RemoteGateway;

/// What the analytics view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsReport {
    pub period: Period,
    pub cards: Vec<(&'static str, u64)>,
    pub series: Vec<(String, StatusCounts)>,
}

impl AnalyticsReport {
    pub fn new(analytics: &Analytics, period: Period) -> Self {
        Self {
            period,
            cards: analytics.summary_cards(),
            series: analytics.series(period),
        }
    }
}

#[derive(Clone)]
pub struct AnalyticsService {
    gateway: Arc<dyn RemoteGateway>,
}

impl AnalyticsService {
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        Self { gateway }
    }

    /// Server-side aggregate.
    pub async fn fetch(&self) -> Result<Analytics> {
        let analytics = self.gateway.fetch_analytics().await?;
        tracing::debug!(total = analytics.total, "Analytics loaded");
        Ok(analytics)
    }

    /// Same aggregate computed from the record list.
    pub async fn derive_local(&self) -> Result<Analytics> {
        let applications = self.gateway.list_applications().await?;
        Ok(Analytics::from_applications(&applications))
    }

    pub async fn report(&self, period: Period, local: bool) -> Result<AnalyticsReport> {
        let analytics = if local {
            self.derive_local().await?
        } else {
            self.fetch().await?
        };
        Ok(AnalyticsReport::new(&analytics, period))
    }
}
