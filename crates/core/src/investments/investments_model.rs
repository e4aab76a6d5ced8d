//! Investment cycle domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Lifecycle phase of a cycle, derived from the server's two flags.
///
/// `Pending -> Invested -> Distributed`. The server owns the transitions;
/// the client only reads the phase to decide what to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleStatus {
    Pending,
    Invested,
    Distributed,
}

impl CycleStatus {
    /// Maps the `isInvested` / `distributed` flags to a single phase.
    ///
    /// A distributed cycle that is not flagged invested violates the server
    /// invariant; it is still reported as `Distributed` so no forward action
    /// is offered for it.
    pub fn from_flags(is_invested: bool, distributed: bool) -> Self {
        match (is_invested, distributed) {
            (_, true) => CycleStatus::Distributed,
            (true, false) => CycleStatus::Invested,
            (false, false) => CycleStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CycleStatus::Pending => "Pending",
            CycleStatus::Invested => "Invested",
            CycleStatus::Distributed => "Distributed",
        }
    }

    /// True once no further forward transition exists.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CycleStatus::Distributed)
    }

    pub fn can_mark_invested(&self) -> bool {
        matches!(self, CycleStatus::Pending)
    }

    pub fn can_distribute(&self) -> bool {
        matches!(self, CycleStatus::Invested)
    }
}

/// Investment cycle as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentCycle {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub total_deposit: Decimal,
    #[serde(default)]
    pub total_profit: Decimal,
    #[serde(default)]
    pub is_invested: bool,
    #[serde(default)]
    pub distributed: bool,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InvestmentCycle {
    pub fn status(&self) -> CycleStatus {
        CycleStatus::from_flags(self.is_invested, self.distributed)
    }

    /// Name to show in tables and dialogs.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(crate::constants::UNNAMED_CYCLE_LABEL)
    }
}

/// Payload for creating a cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestmentCycle {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub is_invested: bool,
}

impl NewInvestmentCycle {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        Ok(())
    }

    /// Fills an omitted start date with `now`.
    pub fn with_default_start(mut self, now: DateTime<Utc>) -> Self {
        if self.start_date.is_none() {
            self.start_date = Some(now);
        }
        self
    }
}

/// Partial update of a cycle. Only the fields that are `Some` are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentCycleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_deposit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_profit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_invested: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distributed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl InvestmentCycleUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Nothing to update".to_string(),
            )));
        }
        for (field, amount) in [
            ("totalDeposit", self.total_deposit),
            ("totalProfit", self.total_profit),
        ] {
            if amount.is_some_and(|a| a < Decimal::ZERO) {
                return Err(Error::Validation(ValidationError::NegativeAmount {
                    field: field.to_string(),
                }));
            }
        }
        Ok(())
    }
}

/// Body of the distribute-profit call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DistributeProfit {
    pub total_profit: Decimal,
}

impl DistributeProfit {
    pub fn validate(&self) -> Result<()> {
        if self.total_profit <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::NonPositiveAmount {
                field: "totalProfit".to_string(),
            }));
        }
        Ok(())
    }
}

/// Result of bulk-assigning paid payments to a cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssignPaidSummary {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub count: u64,
}

impl AssignPaidSummary {
    /// One-line outcome shown after assigning paid payments.
    pub fn describe(&self) -> String {
        if self.message.is_empty() {
            format!("Assigned {} paid payments", self.count)
        } else {
            format!("{} ({} payments)", self.message, self.count)
        }
    }
}
