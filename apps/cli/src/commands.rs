use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use neomarket_core::dashboard::{
    export_overview_csv, filter_overview, OverviewFilter, UserOverview,
};
use neomarket_core::investments::{CreateCycleForm, DistributeProfitForm, UpdateCycleForm};
use neomarket_core::payments::RecordPaymentForm;

use crate::main_lib::AppState;
use crate::render;

#[derive(Parser, Debug)]
#[command(name = "neomarket", author, version, about = "NeoMarket admin console")]
pub struct Cli {
    /// Backend base URL, overrides NM_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token, overrides NM_ACCESS_TOKEN
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage investment cycles
    #[command(subcommand)]
    Cycles(CyclesCommand),
    /// Inspect members
    #[command(subcommand)]
    Users(UsersCommand),
    /// Admin dashboard
    #[command(subcommand)]
    Dashboard(DashboardCommand),
    /// Record member payments
    #[command(subcommand)]
    Payments(PaymentsCommand),
}

#[derive(Subcommand, Debug)]
pub enum CyclesCommand {
    /// Show the stat cards and the cycle table
    List,
    /// Show a single cycle
    Show { id: String },
    /// Create a cycle
    Create {
        #[arg(long)]
        name: String,
        /// YYYY-MM-DD or RFC 3339, defaults to now
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
        /// Create the cycle already invested
        #[arg(long)]
        invested: bool,
    },
    /// Edit a cycle; only the given fields are sent
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        total_deposit: Option<String>,
        #[arg(long)]
        total_profit: Option<String>,
        #[arg(long)]
        invested: Option<bool>,
        #[arg(long)]
        distributed: Option<bool>,
        #[arg(long)]
        end_date: Option<String>,
    },
    /// Delete a cycle
    Delete { id: String },
    /// Move a pending cycle to invested
    MarkInvested { id: String },
    /// Distribute the realized profit of an invested cycle
    Distribute {
        id: String,
        #[arg(long)]
        total_profit: String,
    },
    /// Attach unassigned paid payments to a cycle
    AssignPaid { id: String },
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// Show the signed-in profile
    Me,
    /// List all users
    List,
}

#[derive(Subcommand, Debug)]
pub enum DashboardCommand {
    /// Platform totals
    Summary,
    /// Member overview table
    Users {
        /// Matches name, father's name or phone
        #[arg(long, default_value = "")]
        search: String,
        /// all, paid, pending or fine
        #[arg(long, default_value = "all")]
        filter: OverviewFilter,
        /// Write the filtered rows to a CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PaymentsCommand {
    /// Record a payment for a member
    Record {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        amount: String,
    },
}

pub async fn run(command: Command, state: &AppState) -> anyhow::Result<()> {
    match command {
        Command::Cycles(cmd) => run_cycles(cmd, state).await,
        Command::Users(cmd) => run_users(cmd, state).await,
        Command::Dashboard(cmd) => run_dashboard(cmd, state).await,
        Command::Payments(cmd) => run_payments(cmd, state).await,
    }
}

/// Prints the cached table, or a notice when no listing has arrived yet.
fn print_cycles(state: &AppState) {
    let cycles = state.cycle_service.cycles();
    let refreshed = state.session.cycles().refresh_count() > 0;
    println!(
        "{}",
        render::cycle_screen(state.session.user().as_ref(), &cycles, refreshed)
    );
}

async fn run_cycles(cmd: CyclesCommand, state: &AppState) -> anyhow::Result<()> {
    let service = &state.cycle_service;
    match cmd {
        CyclesCommand::List => {
            service.load_cycles().await?;
            print_cycles(state);
        }
        CyclesCommand::Show { id } => {
            let cycle = service.get_cycle(&id).await?;
            println!("{}", render::cycle_detail(&cycle));
        }
        CyclesCommand::Create {
            name,
            start_date,
            end_date,
            invested,
        } => {
            let payload = CreateCycleForm {
                name,
                start_date,
                end_date,
                is_invested: invested,
            }
            .into_payload()?;
            service.create_cycle(payload).await?;
            print_cycles(state);
        }
        CyclesCommand::Update {
            id,
            name,
            total_deposit,
            total_profit,
            invested,
            distributed,
            end_date,
        } => {
            let changes = UpdateCycleForm {
                name,
                total_deposit,
                total_profit,
                is_invested: invested,
                distributed,
                end_date,
            }
            .into_payload()?;
            service.update_cycle(&id, changes).await?;
            print_cycles(state);
        }
        CyclesCommand::Delete { id } => {
            service.delete_cycle(&id).await?;
            print_cycles(state);
        }
        CyclesCommand::MarkInvested { id } => {
            service.mark_invested(&id).await?;
            print_cycles(state);
        }
        CyclesCommand::Distribute { id, total_profit } => {
            let payload = DistributeProfitForm { total_profit }.into_payload()?;
            service.distribute_profit(&id, payload).await?;
            print_cycles(state);
        }
        CyclesCommand::AssignPaid { id } => {
            let summary = service.assign_paid_payments(&id).await?;
            println!("{}\n", summary.describe());
            print_cycles(state);
        }
    }
    Ok(())
}

async fn run_users(cmd: UsersCommand, state: &AppState) -> anyhow::Result<()> {
    let token = state.token()?;
    match cmd {
        UsersCommand::Me => {
            let user = state.user_gateway.me(&token).await?;
            state.session.set_user(user.clone());
            println!("{}", render::profile(&user));
        }
        UsersCommand::List => {
            let users = state.user_gateway.list(&token).await?;
            println!("{}", render::user_list(&users));
        }
    }
    Ok(())
}

async fn run_dashboard(cmd: DashboardCommand, state: &AppState) -> anyhow::Result<()> {
    let token = state.token()?;
    match cmd {
        DashboardCommand::Summary => {
            let summary = state.dashboard_gateway.summary(&token).await?;
            println!("{}", render::dashboard_summary(&summary));
        }
        DashboardCommand::Users {
            search,
            filter,
            export,
        } => {
            let users = state.dashboard_gateway.users(&token).await?;
            let rows = filter_overview(&users, &search, filter);
            println!("{}", render::user_overview(&rows));
            if let Some(path) = export {
                let written = export_users(&rows, &path)?;
                tracing::info!("Exported {} rows to {}", written, path.display());
                eprintln!("Exported {} rows to {}", written, path.display());
            }
        }
    }
    Ok(())
}

async fn run_payments(cmd: PaymentsCommand, state: &AppState) -> anyhow::Result<()> {
    let token = state.token()?;
    match cmd {
        PaymentsCommand::Record { user_id, amount } => {
            let payload = RecordPaymentForm { user_id, amount }.into_payload()?;
            let payment = state.payment_gateway.record(&token, &payload).await?;
            println!("{}", render::payment(&payment));
        }
    }
    Ok(())
}

fn export_users(rows: &[UserOverview], path: &Path) -> anyhow::Result<usize> {
    let file = File::create(path)?;
    Ok(export_overview_csv(rows, BufWriter::new(file))?)
}
