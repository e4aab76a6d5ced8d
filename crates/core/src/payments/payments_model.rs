//! Member payment models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, FormErrors, Result, ValidationError};
use crate::investments::parse_amount;

/// A payment recorded for a member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub fine: Decimal,
    #[serde(default)]
    pub payment_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_paid: bool,
}

/// Body of the record-payment call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub user_id: String,
    pub amount: Decimal,
}

impl NewPayment {
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "userId".to_string(),
            )));
        }
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::NonPositiveAmount {
                field: "amount".to_string(),
            }));
        }
        Ok(())
    }
}

/// Input of the "Record Payment" dialog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentForm {
    pub user_id: String,
    pub amount: String,
}

impl RecordPaymentForm {
    pub fn into_payload(self) -> Result<NewPayment> {
        let mut errors = FormErrors::new();

        let user_id = self.user_id.trim().to_string();
        if user_id.is_empty() {
            errors.push(ValidationError::MissingField("userId".to_string()));
        }

        let raw = self.amount.trim();
        let amount = if raw.is_empty() {
            errors.push(ValidationError::MissingField("amount".to_string()));
            None
        } else {
            match parse_amount("amount", raw) {
                Ok(a) if a > Decimal::ZERO => Some(a),
                Ok(_) => {
                    errors.push(ValidationError::NonPositiveAmount {
                        field: "amount".to_string(),
                    });
                    None
                }
                Err(e) => {
                    errors.push(e);
                    None
                }
            }
        };

        errors.into_result()?;
        let payload = NewPayment {
            user_id,
            amount: amount.unwrap_or_default(),
        };
        payload.validate()?;
        Ok(payload)
    }
}
