use async_trait::async_trait;

use crate::errors::Result;
use crate::session::AccessToken;
use crate::users::users_model::User;

/// Trait for the remote user endpoints.
#[async_trait]
pub trait UserGatewayTrait: Send + Sync {
    /// Profile of the signed-in user.
    async fn me(&self, token: &AccessToken) -> Result<User>;

    async fn list(&self, token: &AccessToken) -> Result<Vec<User>>;
}
