//! User profile endpoints.

use async_trait::async_trait;
use neomarket_core::errors::Result;
use neomarket_core::session::AccessToken;
use neomarket_core::users::{User, UserGatewayTrait};
use reqwest::Method;

use crate::client::{require, ApiClient};

#[async_trait]
impl UserGatewayTrait for ApiClient {
    async fn me(&self, token: &AccessToken) -> Result<User> {
        let data = self.call(Method::GET, "/users/me", token).await?;
        require(data, "current user")
    }

    async fn list(&self, token: &AccessToken) -> Result<Vec<User>> {
        let users: Option<Vec<User>> = self.call(Method::GET, "/users", token).await?;
        Ok(users.unwrap_or_default())
    }
}
