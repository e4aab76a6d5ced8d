use async_trait::async_trait;

use crate::errors::Result;
use crate::investments::investments_model::{
    AssignPaidSummary, DistributeProfit, InvestmentCycle, InvestmentCycleUpdate,
    NewInvestmentCycle,
};
use crate::session::AccessToken;

/// Trait for the remote investment-cycle endpoints.
///
/// One method per server capability. Implementations attach the bearer token
/// to each request and unwrap the response envelope; they never touch local
/// state.
#[async_trait]
pub trait InvestmentCycleGatewayTrait: Send + Sync {
    async fn create(
        &self,
        token: &AccessToken,
        new_cycle: &NewInvestmentCycle,
    ) -> Result<InvestmentCycle>;

    /// Lists cycles in server order. A missing payload is an empty list.
    async fn list(&self, token: &AccessToken) -> Result<Vec<InvestmentCycle>>;

    async fn get(&self, token: &AccessToken, cycle_id: &str) -> Result<InvestmentCycle>;

    async fn update(
        &self,
        token: &AccessToken,
        cycle_id: &str,
        changes: &InvestmentCycleUpdate,
    ) -> Result<InvestmentCycle>;

    async fn delete(&self, token: &AccessToken, cycle_id: &str) -> Result<bool>;

    async fn mark_invested(&self, token: &AccessToken, cycle_id: &str)
        -> Result<InvestmentCycle>;

    async fn distribute_profit(
        &self,
        token: &AccessToken,
        cycle_id: &str,
        payload: &DistributeProfit,
    ) -> Result<InvestmentCycle>;

    async fn assign_paid_payments(
        &self,
        token: &AccessToken,
        cycle_id: &str,
    ) -> Result<AssignPaidSummary>;
}

/// Trait for the user-facing cycle workflow.
///
/// Every mutating call refreshes the cycle store from the server once it
/// succeeds, and leaves the store untouched when it fails.
#[async_trait]
pub trait CycleLifecycleServiceTrait: Send + Sync {
    /// Current contents of the cycle store.
    fn cycles(&self) -> Vec<InvestmentCycle>;

    /// Replaces the store with a fresh server listing.
    async fn load_cycles(&self) -> Result<Vec<InvestmentCycle>>;

    /// Fetches a single cycle without touching the store.
    async fn get_cycle(&self, cycle_id: &str) -> Result<InvestmentCycle>;

    async fn create_cycle(&self, new_cycle: NewInvestmentCycle) -> Result<InvestmentCycle>;

    async fn update_cycle(
        &self,
        cycle_id: &str,
        changes: InvestmentCycleUpdate,
    ) -> Result<InvestmentCycle>;

    async fn delete_cycle(&self, cycle_id: &str) -> Result<bool>;

    async fn mark_invested(&self, cycle_id: &str) -> Result<InvestmentCycle>;

    async fn distribute_profit(
        &self,
        cycle_id: &str,
        payload: DistributeProfit,
    ) -> Result<InvestmentCycle>;

    async fn assign_paid_payments(&self, cycle_id: &str) -> Result<AssignPaidSummary>;
}
