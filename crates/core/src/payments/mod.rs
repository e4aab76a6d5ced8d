//! Payments module - recording member payments.

mod payments_model;

use async_trait::async_trait;

use crate::errors::Result;
use crate::session::AccessToken;

pub use payments_model::{NewPayment, Payment, RecordPaymentForm};

/// Trait for the remote payment endpoint.
#[async_trait]
pub trait PaymentGatewayTrait: Send + Sync {
    async fn record(&self, token: &AccessToken, payment: &NewPayment) -> Result<Payment>;
}
