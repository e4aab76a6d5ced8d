//! Investment-cycle endpoints.

use async_trait::async_trait;
use log::info;
use neomarket_core::errors::Result;
use neomarket_core::investments::{
    AssignPaidSummary, DistributeProfit, InvestmentCycle, InvestmentCycleGatewayTrait,
    InvestmentCycleUpdate, NewInvestmentCycle,
};
use neomarket_core::session::AccessToken;
use reqwest::Method;

use crate::client::{require, segment, ApiClient};

const CYCLES_PATH: &str = "/investment-cycle";

fn cycle_path(action: Option<&str>, cycle_id: &str) -> String {
    match action {
        Some(action) => format!("{}/{}/{}", CYCLES_PATH, action, segment(cycle_id)),
        None => format!("{}/{}", CYCLES_PATH, segment(cycle_id)),
    }
}

#[async_trait]
impl InvestmentCycleGatewayTrait for ApiClient {
    async fn create(
        &self,
        token: &AccessToken,
        new_cycle: &NewInvestmentCycle,
    ) -> Result<InvestmentCycle> {
        let data = self
            .call_with_body(Method::POST, CYCLES_PATH, token, new_cycle)
            .await?;
        let cycle: InvestmentCycle = require(data, "create investment cycle")?;
        info!("[NeoMarketApi] Created investment cycle {}", cycle.id);
        Ok(cycle)
    }

    async fn list(&self, token: &AccessToken) -> Result<Vec<InvestmentCycle>> {
        let cycles: Vec<InvestmentCycle> = self
            .call(Method::GET, CYCLES_PATH, token)
            .await?
            .unwrap_or_default();
        info!("[NeoMarketApi] Fetched {} investment cycles", cycles.len());
        Ok(cycles)
    }

    async fn get(&self, token: &AccessToken, cycle_id: &str) -> Result<InvestmentCycle> {
        let data = self
            .call(Method::GET, &cycle_path(None, cycle_id), token)
            .await?;
        require(data, "get investment cycle")
    }

    async fn update(
        &self,
        token: &AccessToken,
        cycle_id: &str,
        changes: &InvestmentCycleUpdate,
    ) -> Result<InvestmentCycle> {
        let data = self
            .call_with_body(
                Method::PATCH,
                &cycle_path(Some("update"), cycle_id),
                token,
                changes,
            )
            .await?;
        require(data, "update investment cycle")
    }

    async fn delete(&self, token: &AccessToken, cycle_id: &str) -> Result<bool> {
        self.call_discarding_body(Method::DELETE, &cycle_path(None, cycle_id), token)
            .await?;
        info!("[NeoMarketApi] Deleted investment cycle {}", cycle_id);
        Ok(true)
    }

    async fn mark_invested(
        &self,
        token: &AccessToken,
        cycle_id: &str,
    ) -> Result<InvestmentCycle> {
        let data = self
            .call(
                Method::PATCH,
                &cycle_path(Some("mark-invested"), cycle_id),
                token,
            )
            .await?;
        require(data, "mark investment cycle invested")
    }

    async fn distribute_profit(
        &self,
        token: &AccessToken,
        cycle_id: &str,
        payload: &DistributeProfit,
    ) -> Result<InvestmentCycle> {
        let data = self
            .call_with_body(
                Method::POST,
                &cycle_path(Some("distribute"), cycle_id),
                token,
                payload,
            )
            .await?;
        require(data, "distribute profit")
    }

    async fn assign_paid_payments(
        &self,
        token: &AccessToken,
        cycle_id: &str,
    ) -> Result<AssignPaidSummary> {
        let summary: Option<AssignPaidSummary> = self
            .call(
                Method::POST,
                &cycle_path(Some("assign-paid"), cycle_id),
                token,
            )
            .await?;
        // Nothing to assign comes back as an empty envelope.
        Ok(summary.unwrap_or(AssignPaidSummary {
            message: String::new(),
            count: 0,
        }))
    }
}
