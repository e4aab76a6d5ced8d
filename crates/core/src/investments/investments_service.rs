use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info};

use super::investments_model::{
    AssignPaidSummary, DistributeProfit, InvestmentCycle, InvestmentCycleUpdate,
    NewInvestmentCycle,
};
use super::investments_traits::{CycleLifecycleServiceTrait, InvestmentCycleGatewayTrait};
use crate::errors::Result;
use crate::notifications::{CycleAction, Notification, NotificationSink};
use crate::session::{AccessToken, Session};

/// Orchestrates cycle actions: call the gateway, then reload the whole list.
///
/// The store is only ever written by a successful listing fetched within
/// the current session. Failed actions leave it as it was and are reported
/// through the notification sink. Overlapping actions are all dispatched;
/// the server decides which ones are still valid.
pub struct CycleLifecycleService {
    gateway: Arc<dyn InvestmentCycleGatewayTrait>,
    session: Arc<Session>,
    notifier: Arc<dyn NotificationSink>,
}

impl CycleLifecycleService {
    pub fn new(
        gateway: Arc<dyn InvestmentCycleGatewayTrait>,
        session: Arc<Session>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            gateway,
            session,
            notifier,
        }
    }

    async fn refresh(
        &self,
        token: &AccessToken,
        generation: u64,
    ) -> Result<Vec<InvestmentCycle>> {
        let cycles = self.gateway.list(token).await?;
        if self.session.store_cycles(generation, cycles.clone()) {
            debug!("Loaded {} investment cycles", cycles.len());
        } else {
            debug!("Session changed while loading cycles, listing discarded");
        }
        Ok(cycles)
    }

    /// Reports the outcome of a mutation and reloads the store after a success.
    async fn settle<T, F>(
        &self,
        token: &AccessToken,
        generation: u64,
        action: CycleAction,
        cycle_id: Option<&str>,
        result: Result<T>,
        describe: F,
    ) -> Result<T>
    where
        T: Send,
        F: FnOnce(&T) -> String + Send,
    {
        match result {
            Ok(value) => {
                let message = describe(&value);
                info!("{}", message);
                self.notifier
                    .notify(Notification::success(action, cycle_id, message));

                if let Err(e) = self.refresh(token, generation).await {
                    error!("Reloading cycles after {:?} failed: {}", action, e);
                    self.notifier.notify(Notification::error(
                        CycleAction::Load,
                        None,
                        e.to_string(),
                    ));
                }
                Ok(value)
            }
            Err(e) => {
                error!("{} failed: {}", action.label(), e);
                self.notifier
                    .notify(Notification::error(action, cycle_id, e.to_string()));
                Err(e)
            }
        }
    }
}

#[async_trait]
impl CycleLifecycleServiceTrait for CycleLifecycleService {
    fn cycles(&self) -> Vec<InvestmentCycle> {
        self.session.cycles().snapshot()
    }

    async fn load_cycles(&self) -> Result<Vec<InvestmentCycle>> {
        let (token, generation) = self.session.credentials()?;
        self.refresh(&token, generation).await.inspect_err(|e| {
            error!("Loading cycles failed: {}", e);
            self.notifier
                .notify(Notification::error(CycleAction::Load, None, e.to_string()));
        })
    }

    async fn get_cycle(&self, cycle_id: &str) -> Result<InvestmentCycle> {
        let token = self.session.access_token()?;
        self.gateway.get(&token, cycle_id).await
    }

    async fn create_cycle(&self, new_cycle: NewInvestmentCycle) -> Result<InvestmentCycle> {
        new_cycle.validate()?;
        let (token, generation) = self.session.credentials()?;
        let new_cycle = new_cycle.with_default_start(Utc::now());

        let result = self.gateway.create(&token, &new_cycle).await;
        self.settle(&token, generation, CycleAction::Create, None, result, |c| {
            format!("Cycle '{}' created", c.display_name())
        })
        .await
    }

    async fn update_cycle(
        &self,
        cycle_id: &str,
        changes: InvestmentCycleUpdate,
    ) -> Result<InvestmentCycle> {
        changes.validate()?;
        let (token, generation) = self.session.credentials()?;

        let result = self.gateway.update(&token, cycle_id, &changes).await;
        self.settle(&token, generation, CycleAction::Update, Some(cycle_id), result, |c| {
            format!("Cycle '{}' updated", c.display_name())
        })
        .await
    }

    async fn delete_cycle(&self, cycle_id: &str) -> Result<bool> {
        let (token, generation) = self.session.credentials()?;

        let result = self.gateway.delete(&token, cycle_id).await;
        self.settle(&token, generation, CycleAction::Delete, Some(cycle_id), result, |_| {
            format!("Cycle {} deleted", cycle_id)
        })
        .await
    }

    async fn mark_invested(&self, cycle_id: &str) -> Result<InvestmentCycle> {
        let (token, generation) = self.session.credentials()?;

        let result = self.gateway.mark_invested(&token, cycle_id).await;
        self.settle(&token, generation, CycleAction::MarkInvested, Some(cycle_id), result, |c| {
            format!("Cycle '{}' marked as invested", c.display_name())
        })
        .await
    }

    async fn distribute_profit(
        &self,
        cycle_id: &str,
        payload: DistributeProfit,
    ) -> Result<InvestmentCycle> {
        payload.validate()?;
        let (token, generation) = self.session.credentials()?;

        let result = self
            .gateway
            .distribute_profit(&token, cycle_id, &payload)
            .await;
        self.settle(
            &token,
            generation,
            CycleAction::DistributeProfit,
            Some(cycle_id),
            result,
            |c| {
                format!(
                    "Distributed {} profit for cycle '{}'",
                    payload.total_profit,
                    c.display_name()
                )
            },
        )
        .await
    }

    async fn assign_paid_payments(&self, cycle_id: &str) -> Result<AssignPaidSummary> {
        let (token, generation) = self.session.credentials()?;

        let result = self.gateway.assign_paid_payments(&token, cycle_id).await;
        self.settle(
            &token,
            generation,
            CycleAction::AssignPaidPayments,
            Some(cycle_id),
            result,
            AssignPaidSummary::describe,
        )
        .await
    }
}
