//! Admin dashboard endpoints.

use async_trait::async_trait;
use neomarket_core::dashboard::{DashboardGatewayTrait, DashboardSummary, UserOverview};
use neomarket_core::errors::Result;
use neomarket_core::session::AccessToken;
use reqwest::Method;

use crate::client::{require, ApiClient};

#[async_trait]
impl DashboardGatewayTrait for ApiClient {
    async fn summary(&self, token: &AccessToken) -> Result<DashboardSummary> {
        let data = self
            .call(Method::GET, "/admin/dashboard/summary", token)
            .await?;
        require(data, "dashboard summary")
    }

    async fn users(&self, token: &AccessToken) -> Result<Vec<UserOverview>> {
        let users: Option<Vec<UserOverview>> = self
            .call(Method::GET, "/admin/dashboard/users", token)
            .await?;
        Ok(users.unwrap_or_default())
    }
}
