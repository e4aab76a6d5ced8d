//! Payment endpoints.

use async_trait::async_trait;
use log::info;
use neomarket_core::errors::Result;
use neomarket_core::payments::{NewPayment, Payment, PaymentGatewayTrait};
use neomarket_core::session::AccessToken;
use reqwest::Method;

use crate::client::{require, ApiClient};

#[async_trait]
impl PaymentGatewayTrait for ApiClient {
    async fn record(&self, token: &AccessToken, payment: &NewPayment) -> Result<Payment> {
        let data = self
            .call_with_body(Method::POST, "/payments", token, payment)
            .await?;
        let recorded: Payment = require(data, "record payment")?;
        info!(
            "[NeoMarketApi] Recorded payment {} of {} for user {}",
            recorded.id, payment.amount, payment.user_id
        );
        Ok(recorded)
    }
}
