//! Investments module - cycle models, store, lifecycle controller, forms and views.

mod investments_forms;
mod investments_model;
mod investments_service;
mod investments_store;
mod investments_traits;
mod investments_view;


#[cfg(test)]
mod investments_service_tests;

pub use investments_forms::{
    parse_amount, parse_form_date, CreateCycleForm, DistributeProfitForm, UpdateCycleForm,
};
pub use investments_model::{
    AssignPaidSummary, CycleStatus, DistributeProfit, InvestmentCycle, InvestmentCycleUpdate,
    NewInvestmentCycle,
};
pub use investments_service::CycleLifecycleService;
pub use investments_store::CycleStore;
pub use investments_traits::{CycleLifecycleServiceTrait, InvestmentCycleGatewayTrait};
pub use investments_view::{
    available_actions, format_date, format_date_range, format_taka, format_taka_fixed,
    status_badges, CycleRow, CycleStats, RowAction,
};
