//! Raw form input for the cycle dialogs and its conversion into payloads.
//!
//! Forms carry strings as typed by the user. Converting a form validates
//! every field and reports all problems at once through `FormErrors`.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::investments_model::{
    DistributeProfit, InvestmentCycle, InvestmentCycleUpdate, NewInvestmentCycle,
};
use crate::constants::FORM_DATE_FORMAT;
use crate::errors::{Error, FormErrors, Result, ValidationError};

/// Parses a form date: either `YYYY-MM-DD` (UTC midnight) or RFC 3339.
pub fn parse_form_date(field: &str, raw: &str) -> std::result::Result<DateTime<Utc>, ValidationError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, FORM_DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::default()).and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ValidationError::invalid_date(field, e))
}

/// Parses a monetary input.
pub fn parse_amount(field: &str, raw: &str) -> std::result::Result<Decimal, ValidationError> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| ValidationError::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Input of the "Create Investment Cycle" dialog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateCycleForm {
    pub name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_invested: bool,
}

impl CreateCycleForm {
    /// Builds the create payload. The start date stays `None` when omitted so
    /// the controller stamps it at dispatch time.
    pub fn into_payload(self) -> Result<NewInvestmentCycle> {
        let mut errors = FormErrors::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.push(ValidationError::MissingField("name".to_string()));
        }

        let start_date = non_blank(&self.start_date)
            .map(|raw| parse_form_date("startDate", raw))
            .transpose()
            .unwrap_or_else(|e| {
                errors.push(e);
                None
            });
        let end_date = non_blank(&self.end_date)
            .map(|raw| parse_form_date("endDate", raw))
            .transpose()
            .unwrap_or_else(|e| {
                errors.push(e);
                None
            });

        errors.into_result()?;

        let payload = NewInvestmentCycle {
            name,
            start_date,
            end_date,
            is_invested: self.is_invested,
        };
        payload.validate()?;
        Ok(payload)
    }
}

/// Input of the "Update Cycle" dialog.
///
/// Every field is optional; only the ones that are filled in are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCycleForm {
    pub name: Option<String>,
    pub total_deposit: Option<String>,
    pub total_profit: Option<String>,
    pub is_invested: Option<bool>,
    pub distributed: Option<bool>,
    pub end_date: Option<String>,
}

impl UpdateCycleForm {
    /// Prefills the dialog with the cycle's current values.
    pub fn from_cycle(cycle: &InvestmentCycle) -> Self {
        Self {
            name: cycle.name.clone(),
            total_deposit: Some(cycle.total_deposit.normalize().to_string()),
            total_profit: Some(cycle.total_profit.normalize().to_string()),
            is_invested: Some(cycle.is_invested),
            distributed: Some(cycle.distributed),
            end_date: cycle
                .end_date
                .map(|d| d.format(FORM_DATE_FORMAT).to_string()),
        }
    }

    pub fn into_payload(self) -> Result<InvestmentCycleUpdate> {
        let mut errors = FormErrors::new();

        let mut amount = |field: &str, raw: &Option<String>| -> Option<Decimal> {
            let raw = non_blank(raw)?;
            match parse_amount(field, raw) {
                Ok(value) if value < Decimal::ZERO => {
                    errors.push(ValidationError::NegativeAmount {
                        field: field.to_string(),
                    });
                    None
                }
                Ok(value) => Some(value),
                Err(e) => {
                    errors.push(e);
                    None
                }
            }
        };
        let total_deposit = amount("totalDeposit", &self.total_deposit);
        let total_profit = amount("totalProfit", &self.total_profit);

        let end_date = match non_blank(&self.end_date).map(|raw| parse_form_date("endDate", raw)) {
            Some(Ok(date)) => Some(date),
            Some(Err(e)) => {
                errors.push(e);
                None
            }
            None => None,
        };

        errors.into_result()?;

        let payload = InvestmentCycleUpdate {
            name: non_blank(&self.name).map(str::to_string),
            total_deposit,
            total_profit,
            is_invested: self.is_invested,
            distributed: self.distributed,
            end_date,
        };
        payload.validate()?;
        Ok(payload)
    }
}

/// Input of the "Distribute Profit" dialog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DistributeProfitForm {
    pub total_profit: String,
}

impl DistributeProfitForm {
    pub fn into_payload(self) -> Result<DistributeProfit> {
        let raw = self.total_profit.trim();
        let parsed = if raw.is_empty() {
            Err(ValidationError::MissingField("totalProfit".to_string()))
        } else {
            parse_amount("totalProfit", raw).and_then(|amount| {
                if amount > Decimal::ZERO {
                    Ok(amount)
                } else {
                    Err(ValidationError::NonPositiveAmount {
                        field: "totalProfit".to_string(),
                    })
                }
            })
        };

        match parsed {
            Ok(total_profit) => Ok(DistributeProfit { total_profit }),
            Err(e) => {
                let mut errors = FormErrors::new();
                errors.push(e);
                Err(Error::Form(errors))
            }
        }
    }
}
