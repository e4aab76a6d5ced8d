//! Tests for the cycle lifecycle controller.
//!
//! The mock gateway keeps an in-memory "server" that enforces the same
//! transition rules as the backend, and counts every call so the
//! refetch-after-write behaviour can be checked exactly.

#[cfg(test)]
mod tests {
    use crate::errors::{Error, Result};
    use crate::investments::{
        AssignPaidSummary, CycleLifecycleService, CycleLifecycleServiceTrait, CycleStatus,
        CycleRow, DistributeProfit, InvestmentCycle, InvestmentCycleGatewayTrait,
        InvestmentCycleUpdate, NewInvestmentCycle, RowAction,
    };
    use crate::notifications::{CycleAction, MemoryNotificationSink};
    use crate::session::{AccessToken, Session};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    // =========================================================================
    // Mock gateway
    // =========================================================================

    #[derive(Default)]
    struct MockCycleGateway {
        cycles: Mutex<Vec<InvestmentCycle>>,
        calls: Mutex<Vec<String>>,
        seen_tokens: Mutex<Vec<String>>,
        next_id: Mutex<u32>,
        fail_list: Mutex<bool>,
        /// When set, `mark_invested` waits for this before answering.
        hold_mark_invested: Mutex<Option<Arc<Notify>>>,
    }

    impl MockCycleGateway {
        fn new() -> Self {
            Self::default()
        }

        fn with_cycles(cycles: Vec<InvestmentCycle>) -> Self {
            let gateway = Self::new();
            *gateway.cycles.lock().unwrap() = cycles;
            gateway
        }

        fn record(&self, token: &AccessToken, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
            self.seen_tokens
                .lock()
                .unwrap()
                .push(token.expose().to_string());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn count(&self, call: &str) -> usize {
            self.calls().iter().filter(|c| c.as_str() == call).count()
        }

        fn set_fail_list(&self, fail: bool) {
            *self.fail_list.lock().unwrap() = fail;
        }

        fn not_found(cycle_id: &str) -> Error {
            Error::Api {
                status: 404,
                message: format!("Investment cycle {} not found", cycle_id),
            }
        }

        fn with_cycle<T>(
            &self,
            cycle_id: &str,
            f: impl FnOnce(&mut InvestmentCycle) -> Result<T>,
        ) -> Result<T> {
            let mut cycles = self.cycles.lock().unwrap();
            let cycle = cycles
                .iter_mut()
                .find(|c| c.id == cycle_id)
                .ok_or_else(|| Self::not_found(cycle_id))?;
            f(cycle)
        }
    }

    #[async_trait]
    impl InvestmentCycleGatewayTrait for MockCycleGateway {
        async fn create(
            &self,
            token: &AccessToken,
            new_cycle: &NewInvestmentCycle,
        ) -> Result<InvestmentCycle> {
            self.record(token, "create");
            let id = {
                let mut next = self.next_id.lock().unwrap();
                *next += 1;
                format!("cycle-{}", *next)
            };
            let now = Utc::now();
            let cycle = InvestmentCycle {
                id,
                name: Some(new_cycle.name.clone()),
                total_deposit: Decimal::ZERO,
                total_profit: Decimal::ZERO,
                is_invested: new_cycle.is_invested,
                distributed: false,
                start_date: new_cycle.start_date.unwrap_or(now),
                end_date: new_cycle.end_date,
                created_at: now,
                updated_at: now,
            };
            self.cycles.lock().unwrap().push(cycle.clone());
            Ok(cycle)
        }

        async fn list(&self, token: &AccessToken) -> Result<Vec<InvestmentCycle>> {
            self.record(token, "list");
            if *self.fail_list.lock().unwrap() {
                return Err(Error::Transport("connection reset".to_string()));
            }
            Ok(self.cycles.lock().unwrap().clone())
        }

        async fn get(&self, token: &AccessToken, cycle_id: &str) -> Result<InvestmentCycle> {
            self.record(token, "get");
            self.with_cycle(cycle_id, |c| Ok(c.clone()))
        }

        async fn update(
            &self,
            token: &AccessToken,
            cycle_id: &str,
            changes: &InvestmentCycleUpdate,
        ) -> Result<InvestmentCycle> {
            self.record(token, "update");
            self.with_cycle(cycle_id, |c| {
                if let Some(name) = &changes.name {
                    c.name = Some(name.clone());
                }
                if let Some(deposit) = changes.total_deposit {
                    c.total_deposit = deposit;
                }
                if let Some(end) = changes.end_date {
                    c.end_date = Some(end);
                }
                Ok(c.clone())
            })
        }

        async fn delete(&self, token: &AccessToken, cycle_id: &str) -> Result<bool> {
            self.record(token, "delete");
            let mut cycles = self.cycles.lock().unwrap();
            let before = cycles.len();
            cycles.retain(|c| c.id != cycle_id);
            if cycles.len() == before {
                return Err(Self::not_found(cycle_id));
            }
            Ok(true)
        }

        async fn mark_invested(
            &self,
            token: &AccessToken,
            cycle_id: &str,
        ) -> Result<InvestmentCycle> {
            self.record(token, "mark_invested");
            let hold = self.hold_mark_invested.lock().unwrap().clone();
            if let Some(notify) = hold {
                notify.notified().await;
            }
            self.with_cycle(cycle_id, |c| {
                if c.is_invested {
                    return Err(Error::Api {
                        status: 400,
                        message: "Cycle is already invested".to_string(),
                    });
                }
                c.is_invested = true;
                Ok(c.clone())
            })
        }

        async fn distribute_profit(
            &self,
            token: &AccessToken,
            cycle_id: &str,
            payload: &DistributeProfit,
        ) -> Result<InvestmentCycle> {
            self.record(token, "distribute_profit");
            self.with_cycle(cycle_id, |c| {
                if !c.is_invested || c.distributed {
                    return Err(Error::Api {
                        status: 400,
                        message: "Cycle is not ready for distribution".to_string(),
                    });
                }
                c.total_profit = payload.total_profit;
                c.distributed = true;
                Ok(c.clone())
            })
        }

        async fn assign_paid_payments(
            &self,
            token: &AccessToken,
            cycle_id: &str,
        ) -> Result<AssignPaidSummary> {
            self.record(token, "assign_paid_payments");
            self.with_cycle(cycle_id, |c| {
                c.total_deposit += dec!(2500);
                Ok(AssignPaidSummary {
                    message: "Paid payments assigned".to_string(),
                    count: 5,
                })
            })
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn cycle(id: &str, is_invested: bool, distributed: bool) -> InvestmentCycle {
        let ts = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
        InvestmentCycle {
            id: id.to_string(),
            name: Some(format!("Cycle {}", id)),
            total_deposit: dec!(10000),
            total_profit: Decimal::ZERO,
            is_invested,
            distributed,
            start_date: ts,
            end_date: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn new_cycle(name: &str, is_invested: bool) -> NewInvestmentCycle {
        NewInvestmentCycle {
            name: name.to_string(),
            start_date: None,
            end_date: None,
            is_invested,
        }
    }

    struct Fixture {
        gateway: Arc<MockCycleGateway>,
        session: Arc<Session>,
        sink: MemoryNotificationSink,
        service: Arc<CycleLifecycleService>,
    }

    fn fixture(gateway: MockCycleGateway) -> Fixture {
        let gateway = Arc::new(gateway);
        let session = Arc::new(Session::new());
        session.sign_in(AccessToken::new("admin-token").unwrap(), None);
        let sink = MemoryNotificationSink::new();
        let service = Arc::new(CycleLifecycleService::new(
            gateway.clone(),
            session.clone(),
            Arc::new(sink.clone()),
        ));
        Fixture {
            gateway,
            session,
            sink,
            service,
        }
    }

    // =========================================================================
    // Refetch-after-write
    // =========================================================================

    #[tokio::test]
    async fn test_create_appears_exactly_once_in_next_listing() {
        let f = fixture(MockCycleGateway::with_cycles(vec![cycle("existing", false, false)]));

        let created = f
            .service
            .create_cycle(new_cycle("Q4 2025", false))
            .await
            .unwrap();

        let cycles = f.service.cycles();
        assert_eq!(cycles.len(), 2);
        assert_eq!(cycles.iter().filter(|c| c.id == created.id).count(), 1);
        assert_eq!(f.gateway.calls(), vec!["create", "list"]);
    }

    #[tokio::test]
    async fn test_every_successful_mutation_triggers_exactly_one_refresh() {
        let f = fixture(MockCycleGateway::with_cycles(vec![
            cycle("a", false, false),
            cycle("b", false, false),
        ]));

        f.service.mark_invested("a").await.unwrap();
        f.service
            .distribute_profit(
                "a",
                DistributeProfit {
                    total_profit: dec!(100),
                },
            )
            .await
            .unwrap();
        f.service.assign_paid_payments("a").await.unwrap();
        f.service
            .update_cycle(
                "a",
                InvestmentCycleUpdate {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        f.service.delete_cycle("b").await.unwrap();

        assert_eq!(
            f.gateway.calls(),
            vec![
                "mark_invested",
                "list",
                "distribute_profit",
                "list",
                "assign_paid_payments",
                "list",
                "update",
                "list",
                "delete",
                "list",
            ]
        );
        assert_eq!(f.session.cycles().refresh_count(), 5);
        assert!(f.sink.errors().is_empty());
        assert_eq!(f.sink.len(), 5);
    }

    #[tokio::test]
    async fn test_bearer_token_attached_to_every_call() {
        let f = fixture(MockCycleGateway::with_cycles(vec![cycle("a", false, false)]));
        f.service.load_cycles().await.unwrap();
        f.service.mark_invested("a").await.unwrap();

        let tokens = f.gateway.seen_tokens.lock().unwrap().clone();
        assert_eq!(tokens.len(), 3);
        assert!(tokens.iter().all(|t| t == "admin-token"));
    }

    // =========================================================================
    // Failures leave the cache alone
    // =========================================================================

    #[tokio::test]
    async fn test_stale_mark_invested_does_not_corrupt_cache() {
        let f = fixture(MockCycleGateway::with_cycles(vec![cycle("a", false, false)]));
        f.service.load_cycles().await.unwrap();
        let before = f.service.cycles();

        // Another admin marks it invested behind our back.
        f.gateway.cycles.lock().unwrap()[0].is_invested = true;

        let err = f.service.mark_invested("a").await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 400, .. }));

        assert_eq!(f.service.cycles(), before);
        assert_eq!(f.gateway.count("list"), 1);

        let errors = f.sink.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].action(), CycleAction::MarkInvested);
    }

    #[tokio::test]
    async fn test_delete_unknown_cycle_reports_error_and_keeps_list() {
        let f = fixture(MockCycleGateway::with_cycles(vec![cycle("a", false, false)]));
        f.service.load_cycles().await.unwrap();

        let err = f.service.delete_cycle("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(f.service.cycles().len(), 1);
        assert_eq!(f.gateway.count("list"), 1);
        assert_eq!(f.sink.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_cycle_from_next_listing() {
        let f = fixture(MockCycleGateway::with_cycles(vec![
            cycle("a", false, false),
            cycle("b", true, false),
        ]));
        f.service.load_cycles().await.unwrap();

        assert!(f.service.delete_cycle("a").await.unwrap());
        let ids: Vec<String> = f.service.cycles().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn test_distribute_before_invested_rejected_by_server() {
        let f = fixture(MockCycleGateway::with_cycles(vec![cycle("a", false, false)]));
        f.service.load_cycles().await.unwrap();

        let result = f
            .service
            .distribute_profit(
                "a",
                DistributeProfit {
                    total_profit: dec!(100),
                },
            )
            .await;
        assert!(result.is_err());
        assert_eq!(f.service.cycles()[0].status(), CycleStatus::Pending);
        assert_eq!(f.gateway.count("list"), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_after_mutation_keeps_result_and_cache() {
        let f = fixture(MockCycleGateway::with_cycles(vec![cycle("a", false, false)]));
        f.service.load_cycles().await.unwrap();
        let before = f.service.cycles();

        f.gateway.set_fail_list(true);
        let updated = f.service.mark_invested("a").await.unwrap();
        assert!(updated.is_invested);

        assert_eq!(f.service.cycles(), before);
        let errors = f.sink.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].action(), CycleAction::Load);
    }

    #[tokio::test]
    async fn test_load_failure_notifies() {
        let f = fixture(MockCycleGateway::new());
        f.gateway.set_fail_list(true);

        let err = f.service.load_cycles().await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(f.sink.errors().len(), 1);
        assert_eq!(f.session.cycles().refresh_count(), 0);
    }

    // =========================================================================
    // Client-side guards
    // =========================================================================

    #[tokio::test]
    async fn test_validation_failure_never_reaches_gateway() {
        let f = fixture(MockCycleGateway::new());

        let err = f.service.create_cycle(new_cycle("  ", false)).await.unwrap_err();
        assert!(err.is_client_side());

        let err = f
            .service
            .distribute_profit(
                "a",
                DistributeProfit {
                    total_profit: dec!(-5),
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_client_side());

        let err = f
            .service
            .update_cycle("a", InvestmentCycleUpdate::default())
            .await
            .unwrap_err();
        assert!(err.is_client_side());

        assert!(f.gateway.calls().is_empty());
        assert!(f.sink.is_empty());
    }

    #[tokio::test]
    async fn test_signed_out_session_is_rejected() {
        let f = fixture(MockCycleGateway::with_cycles(vec![cycle("a", false, false)]));
        f.service.load_cycles().await.unwrap();
        f.session.sign_out();

        assert!(f.service.cycles().is_empty());
        let err = f.service.mark_invested("a").await.unwrap_err();
        assert!(matches!(err, Error::Unauthenticated));
        assert_eq!(f.gateway.count("mark_invested"), 0);
    }

    #[tokio::test]
    async fn test_overlapping_mark_invested_both_reach_server() {
        let gateway = MockCycleGateway::with_cycles(vec![cycle("a", false, false)]);
        let release = Arc::new(Notify::new());
        *gateway.hold_mark_invested.lock().unwrap() = Some(release.clone());
        let f = fixture(gateway);
        f.service.load_cycles().await.unwrap();

        let service = f.service.clone();
        let first = tokio::spawn(async move { service.mark_invested("a").await });
        let service = f.service.clone();
        let second = tokio::spawn(async move { service.mark_invested("a").await });

        // Both clicks are dispatched before either answer arrives.
        while f.gateway.count("mark_invested") < 2 {
            tokio::task::yield_now().await;
        }
        release.notify_waiters();

        let results = [first.await.unwrap(), second.await.unwrap()];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(Error::Api { status: 400, .. }))));

        // Only the accepted request refreshes; the rejected one leaves the cache alone.
        assert_eq!(f.gateway.count("list"), 2);
        let cached = f.service.cycles();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].status(), CycleStatus::Invested);

        let errors = f.sink.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].action(), CycleAction::MarkInvested);
    }

    #[tokio::test]
    async fn test_sign_out_during_action_keeps_cache_empty() {
        let gateway = MockCycleGateway::with_cycles(vec![cycle("a", false, false)]);
        let release = Arc::new(Notify::new());
        *gateway.hold_mark_invested.lock().unwrap() = Some(release.clone());
        let f = fixture(gateway);
        f.service.load_cycles().await.unwrap();
        assert_eq!(f.service.cycles().len(), 1);

        let service = f.service.clone();
        let pending = tokio::spawn(async move { service.mark_invested("a").await });
        while f.gateway.count("mark_invested") == 0 {
            tokio::task::yield_now().await;
        }

        f.session.sign_out();
        release.notify_one();

        // The server accepted the change and the follow-up listing ran.
        let updated = pending.await.unwrap().unwrap();
        assert!(updated.is_invested);
        assert_eq!(f.gateway.count("list"), 2);

        assert!(!f.session.is_signed_in());
        assert!(f.service.cycles().is_empty());
        assert_eq!(f.session.cycles().refresh_count(), 0);
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    #[tokio::test]
    async fn test_create_invested_then_distribute_profit() {
        let f = fixture(MockCycleGateway::new());

        let created = f
            .service
            .create_cycle(new_cycle("Q4 2025", true))
            .await
            .unwrap();
        let row = CycleRow::from(&f.service.cycles()[0]);
        assert!(row.offers(RowAction::Distribute));

        let distributed = f
            .service
            .distribute_profit(
                &created.id,
                DistributeProfit {
                    total_profit: dec!(5000),
                },
            )
            .await
            .unwrap();
        assert!(distributed.distributed);

        let row = CycleRow::from(&f.service.cycles()[0]);
        assert_eq!(row.profit, "৳5000");
        assert_eq!(row.status, CycleStatus::Distributed);
        assert!(!row.offers(RowAction::Distribute));
    }

    #[tokio::test]
    async fn test_create_without_start_date_sends_current_time() {
        let f = fixture(MockCycleGateway::new());

        let before = Utc::now();
        let created = f
            .service
            .create_cycle(new_cycle("No dates", false))
            .await
            .unwrap();
        let after = Utc::now();

        assert!(created.start_date >= before && created.start_date <= after);
    }

    #[tokio::test]
    async fn test_get_cycle_does_not_touch_store() {
        let f = fixture(MockCycleGateway::with_cycles(vec![cycle("a", true, false)]));

        let fetched = f.service.get_cycle("a").await.unwrap();
        assert_eq!(fetched.status(), CycleStatus::Invested);
        assert!(f.service.cycles().is_empty());
        assert!(f.sink.is_empty());
    }
}
