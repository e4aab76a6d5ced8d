//! Display view-models for the cycle table and stat cards.
//!
//! Nothing here computes business values; amounts come straight from the
//! server and are only formatted.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::investments_model::{CycleStatus, InvestmentCycle};
use crate::constants::{CURRENCY_SYMBOL, DISPLAY_DATE_FORMAT, DISPLAY_DECIMAL_PRECISION};

/// Formats an amount as shown in the cycle table, e.g. `৳5000`.
pub fn format_taka(amount: Decimal) -> String {
    format!("{}{}", CURRENCY_SYMBOL, amount.normalize())
}

/// Formats an amount with two decimals, e.g. `৳1250.00`.
pub fn format_taka_fixed(amount: Decimal) -> String {
    format!(
        "{}{:.*}",
        CURRENCY_SYMBOL,
        DISPLAY_DECIMAL_PRECISION,
        amount.round_dp_with_strategy(
            DISPLAY_DECIMAL_PRECISION as u32,
            RoundingStrategy::MidpointAwayFromZero,
        )
    )
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// `01 Oct 2025` or `01 Oct 2025 to 31 Dec 2025`.
pub fn format_date_range(start: &DateTime<Utc>, end: Option<&DateTime<Utc>>) -> String {
    match end {
        Some(end) => format!("{} to {}", format_date(start), format_date(end)),
        None => format_date(start),
    }
}

/// Row-level controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    Edit,
    Delete,
    MarkInvested,
    Distribute,
    AssignPaid,
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            RowAction::Edit => "Edit",
            RowAction::Delete => "Delete",
            RowAction::MarkInvested => "Mark Invested",
            RowAction::Distribute => "Distribute",
            RowAction::AssignPaid => "Assign Paid",
        }
    }
}

/// Controls offered for a cycle in the given phase.
///
/// Edit, delete and assign-paid are always offered. Mark-invested only while
/// pending, distribute only while invested and not yet distributed.
pub fn available_actions(status: CycleStatus) -> Vec<RowAction> {
    let mut actions = vec![RowAction::Edit, RowAction::Delete];
    match status {
        CycleStatus::Pending => actions.push(RowAction::MarkInvested),
        CycleStatus::Invested => actions.push(RowAction::Distribute),
        CycleStatus::Distributed => {}
    }
    actions.push(RowAction::AssignPaid);
    actions
}

/// Status badges: `Pending`, `Invested`, or `Invested` + `Distributed`.
pub fn status_badges(status: CycleStatus) -> Vec<&'static str> {
    match status {
        CycleStatus::Pending => vec!["Pending"],
        CycleStatus::Invested => vec!["Invested"],
        CycleStatus::Distributed => vec!["Invested", "Distributed"],
    }
}

/// One rendered line of the cycle table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleRow {
    pub id: String,
    pub name: String,
    pub deposit: String,
    pub profit: String,
    pub status: CycleStatus,
    pub badges: Vec<&'static str>,
    pub dates: String,
    pub actions: Vec<RowAction>,
}

impl From<&InvestmentCycle> for CycleRow {
    fn from(cycle: &InvestmentCycle) -> Self {
        let status = cycle.status();
        Self {
            id: cycle.id.clone(),
            name: cycle.display_name().to_string(),
            deposit: format_taka(cycle.total_deposit),
            profit: format_taka(cycle.total_profit),
            status,
            badges: status_badges(status),
            dates: format_date_range(&cycle.start_date, cycle.end_date.as_ref()),
            actions: available_actions(status),
        }
    }
}

impl CycleRow {
    pub fn offers(&self, action: RowAction) -> bool {
        self.actions.contains(&action)
    }
}

/// Aggregates shown above the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleStats {
    pub total_cycles: usize,
    pub invested: usize,
    pub distributed: usize,
    pub total_deposit: Decimal,
}

impl CycleStats {
    pub fn from_cycles(cycles: &[InvestmentCycle]) -> Self {
        Self {
            total_cycles: cycles.len(),
            invested: cycles.iter().filter(|c| c.is_invested).count(),
            distributed: cycles.iter().filter(|c| c.distributed).count(),
            total_deposit: cycles.iter().map(|c| c.total_deposit).sum(),
        }
    }
}
