//! Dashboard module - platform summary and member overview.

mod dashboard_model;

use async_trait::async_trait;

use crate::errors::Result;
use crate::session::AccessToken;

pub use dashboard_model::{
    export_overview_csv, filter_overview, DashboardSummary, OverviewFilter, UserOverview,
};

/// Trait for the remote admin dashboard endpoints.
#[async_trait]
pub trait DashboardGatewayTrait: Send + Sync {
    async fn summary(&self, token: &AccessToken) -> Result<DashboardSummary>;

    async fn users(&self, token: &AccessToken) -> Result<Vec<UserOverview>>;
}
