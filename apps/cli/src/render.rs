//! Plain-text rendering of the console screens.
//!
//! Each function returns the text instead of printing it so commands can
//! decide where it goes.

use neomarket_core::constants::CURRENCY_SYMBOL;
use neomarket_core::dashboard::{DashboardSummary, UserOverview};
use neomarket_core::investments::{
    format_date, format_taka, format_taka_fixed, CycleRow, CycleStats, InvestmentCycle,
};
use neomarket_core::payments::Payment;
use neomarket_core::users::User;

const NO_CYCLES: &str = "No cycles found";
const NO_USERS: &str = "No users found";
const NOT_REFRESHED: &str = "Cycle list not refreshed, run `neomarket cycles list` to reload";
const MISSING: &str = "—";

/// Left-aligned text table. Widths count chars so `৳` stays aligned.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(headers.to_vec()));
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}

pub fn header(user: Option<&User>) -> String {
    match user {
        Some(user) => format!(
            "Investment Cycles (signed in as {})",
            user.display_name()
        ),
        None => "Investment Cycles".to_string(),
    }
}

pub fn stat_cards(stats: &CycleStats) -> String {
    format!(
        "Total cycles: {}  |  Invested: {}  |  Distributed: {}  |  Total deposit: {}",
        stats.total_cycles,
        stats.invested,
        stats.distributed,
        format_taka(stats.total_deposit)
    )
}

pub fn cycle_table(rows: &[CycleRow]) -> String {
    if rows.is_empty() {
        return NO_CYCLES.to_string();
    }
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.id.clone(),
                row.name.clone(),
                row.deposit.clone(),
                row.profit.clone(),
                row.badges.join(", "),
                row.dates.clone(),
                row.actions
                    .iter()
                    .map(|a| a.label())
                    .collect::<Vec<_>>()
                    .join(" | "),
            ]
        })
        .collect();
    table(
        &["ID", "Name", "Deposit", "Profit", "Status", "Dates", "Actions"],
        &body,
    )
}

/// The cycle screen. `refreshed` is false when no listing has arrived yet,
/// in which case the empty cache says nothing about the server.
pub fn cycle_screen(user: Option<&User>, cycles: &[InvestmentCycle], refreshed: bool) -> String {
    if !refreshed {
        return format!("{}\n\n{}", header(user), NOT_REFRESHED);
    }
    let rows: Vec<CycleRow> = cycles.iter().map(CycleRow::from).collect();
    format!(
        "{}\n\n{}\n\n{}",
        header(user),
        stat_cards(&CycleStats::from_cycles(cycles)),
        cycle_table(&rows)
    )
}

pub fn cycle_detail(cycle: &InvestmentCycle) -> String {
    let row = CycleRow::from(cycle);
    let end = cycle
        .end_date
        .as_ref()
        .map(format_date)
        .unwrap_or_else(|| MISSING.to_string());
    let lines = [
        format!("ID:          {}", row.id),
        format!("Name:        {}", row.name),
        format!("Deposit:     {}", row.deposit),
        format!("Profit:      {}", row.profit),
        format!("Status:      {}", row.badges.join(", ")),
        format!("Start date:  {}", format_date(&cycle.start_date)),
        format!("End date:    {}", end),
        format!("Created:     {}", format_date(&cycle.created_at)),
        format!("Updated:     {}", format_date(&cycle.updated_at)),
    ];
    lines.join("\n")
}

pub fn dashboard_summary(summary: &DashboardSummary) -> String {
    let lines = [
        format!("Total users:          {}", summary.total_users),
        format!(
            "Total paid:           {}",
            format_taka_fixed(summary.total_paid_amount)
        ),
        format!(
            "Unassigned paid:      {}",
            format_taka_fixed(summary.total_unassigned_paid)
        ),
        format!(
            "In cycles:            {}",
            format_taka_fixed(summary.total_in_cycles)
        ),
        format!("Open cycles:          {}", summary.open_cycles),
        format!(
            "System balance:       {}",
            format_taka_fixed(summary.system_balance)
        ),
    ];
    lines.join("\n")
}

pub fn user_overview(users: &[UserOverview]) -> String {
    if users.is_empty() {
        return NO_USERS.to_string();
    }
    let body: Vec<Vec<String>> = users
        .iter()
        .enumerate()
        .map(|(idx, user)| {
            vec![
                (idx + 1).to_string(),
                user.name.clone(),
                user.father_name.clone(),
                user.phone.clone(),
                format_taka_fixed(user.total_paid),
                user.pending_count.to_string(),
                format_taka_fixed(user.total_fine),
                user.last_payment_date
                    .map(|d| d.format("%b %d").to_string())
                    .unwrap_or_else(|| MISSING.to_string()),
                user.created_at.format("%b %d, %Y").to_string(),
            ]
        })
        .collect();
    table(
        &[
            "#",
            "Name",
            "Father",
            "Phone",
            "Paid",
            "Pending",
            "Fine",
            "Last Payment",
            "Joined",
        ],
        &body,
    )
}

pub fn profile(user: &User) -> String {
    let field = |v: Option<&String>| v.cloned().unwrap_or_else(|| MISSING.to_string());
    let lines = [
        format!("ID:      {}", user.id),
        format!("Name:    {}", field(user.name.as_ref())),
        format!("Email:   {}", field(user.email.as_ref())),
        format!("Phone:   {}", field(user.phone.as_ref())),
        format!("Role:    {}", field(user.role.as_ref())),
    ];
    lines.join("\n")
}

pub fn user_list(users: &[User]) -> String {
    if users.is_empty() {
        return NO_USERS.to_string();
    }
    let body: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.id.clone(),
                u.display_name().to_string(),
                u.phone.clone().unwrap_or_else(|| MISSING.to_string()),
                u.role.clone().unwrap_or_else(|| MISSING.to_string()),
            ]
        })
        .collect();
    table(&["ID", "Name", "Phone", "Role"], &body)
}

pub fn payment(payment: &Payment) -> String {
    let mut line = format!(
        "Recorded payment {} of {}{}",
        payment.id,
        CURRENCY_SYMBOL,
        payment.amount.normalize()
    );
    if let Some(user_id) = &payment.user_id {
        line.push_str(&format!(" for {}", user_id));
    }
    line
}
