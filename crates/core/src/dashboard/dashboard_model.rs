//! Admin dashboard models, overview filtering and CSV export.

use std::io::Write;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// Platform-wide totals shown on the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_paid_amount: Decimal,
    #[serde(default)]
    pub total_unassigned_paid: Decimal,
    #[serde(default)]
    pub total_in_cycles: Decimal,
    #[serde(default)]
    pub open_cycles: u64,
    #[serde(default)]
    pub system_balance: Decimal,
}

/// One member's payment standing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserOverview {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub father_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub total_paid: Decimal,
    #[serde(default)]
    pub pending_count: u32,
    #[serde(default)]
    pub unassigned_paid: Decimal,
    #[serde(default)]
    pub last_payment_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_fine: Decimal,
}

/// Quick filter of the overview table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverviewFilter {
    #[default]
    All,
    Paid,
    Pending,
    Fine,
}

impl OverviewFilter {
    pub fn matches(&self, user: &UserOverview) -> bool {
        match self {
            OverviewFilter::All => true,
            OverviewFilter::Paid => user.total_paid > Decimal::ZERO,
            OverviewFilter::Pending => user.pending_count > 0,
            OverviewFilter::Fine => user.total_fine > Decimal::ZERO,
        }
    }
}

impl FromStr for OverviewFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(OverviewFilter::All),
            "paid" => Ok(OverviewFilter::Paid),
            "pending" => Ok(OverviewFilter::Pending),
            "fine" => Ok(OverviewFilter::Fine),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown filter '{}', expected all, paid, pending or fine",
                other
            )))),
        }
    }
}

/// Applies the search box and quick filter, newest members first.
///
/// The search is case-insensitive on name and father's name and a plain
/// substring match on phone.
pub fn filter_overview(
    users: &[UserOverview],
    search: &str,
    filter: OverviewFilter,
) -> Vec<UserOverview> {
    let needle = search.trim().to_lowercase();
    let mut rows: Vec<UserOverview> = users
        .iter()
        .filter(|u| {
            needle.is_empty()
                || u.name.to_lowercase().contains(&needle)
                || u.father_name.to_lowercase().contains(&needle)
                || u.phone.contains(search.trim())
        })
        .filter(|u| filter.matches(u))
        .cloned()
        .collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rows
}

const CSV_HEADERS: [&str; 9] = [
    "#",
    "Name",
    "Father",
    "Phone",
    "Paid",
    "Pending",
    "Fine",
    "Last Payment",
    "Joined",
];

/// Writes the overview rows as CSV. Returns the number of data rows written.
pub fn export_overview_csv<W: Write>(users: &[UserOverview], writer: W) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADERS)?;

    for (idx, user) in users.iter().enumerate() {
        let last_payment = user
            .last_payment_date
            .map(|d| d.format("%b %d").to_string())
            .unwrap_or_else(|| "—".to_string());
        csv.write_record([
            (idx + 1).to_string(),
            user.name.clone(),
            user.father_name.clone(),
            user.phone.clone(),
            user.total_paid.normalize().to_string(),
            user.pending_count.to_string(),
            user.total_fine.normalize().to_string(),
            last_payment,
            user.created_at.format("%b %d, %Y").to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(users.len())
}
