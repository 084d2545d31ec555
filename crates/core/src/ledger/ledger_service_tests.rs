#[cfg(test)]
mod tests {
    use crate::config::LedgerConfig;
    use crate::constants::BALANCE_ID;
    use crate::errors::{DatabaseError, Error, LedgerError, Result};
    use crate::ledger::{
        compute_trade_deltas, Balance, LedgerRepositoryTrait, LedgerService, NewTrade, Trade,
        TradeSide,
    };
    use crate::market_data::{PricePoint, PriceRepositoryTrait, PriceResolver, PriceSourceTrait};
    use crate::performance::PerformanceService;
    use crate::snapshot::{NewSnapshot, Snapshot, SnapshotRepositoryTrait, SnapshotService};
    use async_trait::async_trait;
    use chrono::Utc;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    // --- Mock LedgerRepository ---

    #[derive(Default)]
    struct MockLedgerState {
        balance: Option<Balance>,
        trades: Vec<Trade>,
        next_id: i64,
    }

    #[derive(Default)]
    struct MockLedgerRepository {
        state: Mutex<MockLedgerState>,
    }

    #[async_trait]
    impl LedgerRepositoryTrait for MockLedgerRepository {
        async fn ensure_initialized(&self, initial_cash: Decimal) -> Result<Balance> {
            let mut state = self.state.lock().unwrap();
            if state.balance.is_none() {
                state.balance = Some(Balance {
                    id: BALANCE_ID.to_string(),
                    asset_quantity: Decimal::ZERO,
                    cash_quantity: initial_cash,
                    last_updated: Utc::now(),
                });
                state.next_id = 1;
            }
            Ok(state.balance.clone().unwrap())
        }

        fn get_balance(&self) -> Result<Balance> {
            self.state
                .lock()
                .unwrap()
                .balance
                .clone()
                .ok_or_else(|| Error::Database(DatabaseError::NotFound("balance".to_string())))
        }

        async fn apply_trade(&self, new_trade: NewTrade) -> Result<Trade> {
            let mut state = self.state.lock().unwrap();
            let balance = state
                .balance
                .clone()
                .ok_or_else(|| Error::Database(DatabaseError::NotFound("balance".to_string())))?;
            let deltas = compute_trade_deltas(&balance, &new_trade)?;

            let now = Utc::now();
            let trade = Trade {
                id: state.next_id,
                timestamp: now,
                side: new_trade.side,
                asset_quantity: new_trade.asset_quantity,
                unit_price: new_trade.unit_price,
                fee: new_trade.fee,
                gross_amount: deltas.gross_amount,
                rationale: new_trade.rationale,
                market_context: new_trade.market_context,
            };
            state.next_id += 1;
            state.balance = Some(Balance {
                asset_quantity: balance.asset_quantity + deltas.asset_delta,
                cash_quantity: balance.cash_quantity + deltas.cash_delta,
                last_updated: now,
                ..balance
            });
            state.trades.push(trade.clone());
            Ok(trade)
        }

        fn get_trades(&self, limit: Option<i64>) -> Result<Vec<Trade>> {
            let state = self.state.lock().unwrap();
            let mut trades: Vec<Trade> = state.trades.iter().rev().cloned().collect();
            if let Some(limit) = limit {
                trades.truncate(limit as usize);
            }
            Ok(trades)
        }

        fn get_trades_chronological(&self) -> Result<Vec<Trade>> {
            Ok(self.state.lock().unwrap().trades.clone())
        }
    }

    // --- Mock SnapshotRepository ---

    #[derive(Default)]
    struct MockSnapshotRepository {
        snapshots: Mutex<Vec<Snapshot>>,
    }

    #[async_trait]
    impl SnapshotRepositoryTrait for MockSnapshotRepository {
        async fn insert_snapshot(&self, new_snapshot: NewSnapshot) -> Result<Snapshot> {
            let mut snapshots = self.snapshots.lock().unwrap();
            let snapshot = Snapshot {
                id: snapshots.len() as i64 + 1,
                timestamp: Utc::now(),
                asset_quantity: new_snapshot.asset_quantity,
                cash_quantity: new_snapshot.cash_quantity,
                unit_price: new_snapshot.unit_price,
                total_value: new_snapshot.total_value,
            };
            snapshots.push(snapshot.clone());
            Ok(snapshot)
        }

        fn get_snapshots(&self, limit: Option<i64>) -> Result<Vec<Snapshot>> {
            let mut snapshots: Vec<Snapshot> =
                self.snapshots.lock().unwrap().iter().rev().cloned().collect();
            if let Some(limit) = limit {
                snapshots.truncate(limit as usize);
            }
            Ok(snapshots)
        }

        fn get_snapshots_chronological(&self) -> Result<Vec<Snapshot>> {
            Ok(self.snapshots.lock().unwrap().clone())
        }
    }

    // --- Mock price repository/source ---

    struct MockPriceRepository {
        price: Decimal,
    }

    #[async_trait]
    impl PriceRepositoryTrait for MockPriceRepository {
        fn get_latest_price_point(&self) -> Result<Option<PricePoint>> {
            Ok(Some(PricePoint {
                id: 1,
                timestamp: Utc::now(),
                unit_price: self.price,
            }))
        }

        fn get_price_points(&self, _limit: Option<i64>) -> Result<Vec<PricePoint>> {
            unimplemented!("Not needed for tests")
        }

        async fn insert_price_point(&self, _unit_price: Decimal) -> Result<PricePoint> {
            unimplemented!("Not needed for tests")
        }
    }

    struct UnreachablePriceSource;

    #[async_trait]
    impl PriceSourceTrait for UnreachablePriceSource {
        async fn fetch_current_price(&self, _asset: &str) -> Result<Decimal> {
            unimplemented!("Resolver should prefer the stored price point")
        }
    }

    fn build_service(initial_cash: Decimal, price: Decimal) -> (Arc<MockLedgerRepository>, LedgerService) {
        let ledger_repository = Arc::new(MockLedgerRepository::default());
        let snapshot_repository = Arc::new(MockSnapshotRepository::default());
        let price_resolver = Arc::new(PriceResolver::new(
            Arc::new(MockPriceRepository { price }),
            Arc::new(UnreachablePriceSource),
            "BTC",
        ));
        let config = LedgerConfig {
            initial_cash,
            ..LedgerConfig::default()
        };

        let snapshot_service = SnapshotService::new(
            ledger_repository.clone(),
            snapshot_repository.clone(),
            price_resolver.clone(),
        );
        let performance_service = PerformanceService::new(
            ledger_repository.clone(),
            snapshot_repository,
            price_resolver,
            config.clone(),
        );
        let service = LedgerService::new(
            ledger_repository.clone(),
            snapshot_service,
            performance_service,
            config,
        );
        (ledger_repository, service)
    }

    fn buy(quantity: Decimal, price: Decimal, fee: Decimal) -> NewTrade {
        NewTrade {
            side: TradeSide::Buy,
            asset_quantity: quantity,
            unit_price: price,
            fee,
            rationale: "momentum entry".to_string(),
            market_context: "test".to_string(),
        }
    }

    fn sell(quantity: Decimal, price: Decimal, fee: Decimal) -> NewTrade {
        NewTrade {
            side: TradeSide::Sell,
            ..buy(quantity, price, fee)
        }
    }

    #[tokio::test]
    async fn buy_then_sell_updates_balance() {
        let (_, service) = build_service(dec!(10000), dec!(45000));
        service.init().await.unwrap();

        let trade = service
            .submit_trade(buy(dec!(0.1), dec!(40000), dec!(5)))
            .await
            .unwrap();
        assert_eq!(trade.gross_amount, dec!(4000));
        assert_eq!(trade.id, 1);

        let balance = service.get_balance().unwrap();
        assert_eq!(balance.cash_quantity, dec!(5995));
        assert_eq!(balance.asset_quantity, dec!(0.1));

        let trade = service
            .submit_trade(sell(dec!(0.1), dec!(45000), dec!(5)))
            .await
            .unwrap();
        assert_eq!(trade.gross_amount, dec!(4500));
        assert_eq!(trade.id, 2);

        let balance = service.get_balance().unwrap();
        assert_eq!(balance.cash_quantity, dec!(10490));
        assert_eq!(balance.asset_quantity, dec!(0));
    }

    #[tokio::test]
    async fn insufficient_funds_leaves_state_unchanged() {
        let (repository, service) = build_service(dec!(100), dec!(45000));
        service.init().await.unwrap();

        let err = service
            .submit_trade(buy(dec!(1), dec!(40000), dec!(0)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InsufficientFunds { .. })
        ));

        let balance = service.get_balance().unwrap();
        assert_eq!(balance.cash_quantity, dec!(100));
        assert_eq!(balance.asset_quantity, dec!(0));
        assert!(repository.get_trades_chronological().unwrap().is_empty());
    }

    #[tokio::test]
    async fn insufficient_holdings_rejected() {
        let (_, service) = build_service(dec!(10000), dec!(45000));
        service.init().await.unwrap();

        let err = service
            .submit_trade(sell(dec!(0.5), dec!(40000), dec!(0)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InsufficientHoldings { .. })
        ));
    }

    #[tokio::test]
    async fn fee_counts_against_available_cash() {
        let (_, service) = build_service(dec!(4000), dec!(45000));
        service.init().await.unwrap();

        // Gross alone fits, gross + fee does not.
        let err = service
            .submit_trade(buy(dec!(0.1), dec!(40000), dec!(5)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InsufficientFunds { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_submissions_rejected() {
        let (_, service) = build_service(dec!(10000), dec!(45000));
        service.init().await.unwrap();

        for new_trade in [
            buy(dec!(0), dec!(40000), dec!(0)),
            buy(dec!(-1), dec!(40000), dec!(0)),
            buy(dec!(0.1), dec!(0), dec!(0)),
            buy(dec!(0.1), dec!(40000), dec!(-1)),
        ] {
            let err = service.submit_trade(new_trade).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert!(service.get_trade_history(None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn trade_history_is_most_recent_first() {
        let (_, service) = build_service(dec!(10000), dec!(45000));
        service.init().await.unwrap();

        service
            .submit_trade(buy(dec!(0.01), dec!(40000), dec!(1)))
            .await
            .unwrap();
        service
            .submit_trade(buy(dec!(0.02), dec!(41000), dec!(1)))
            .await
            .unwrap();
        service
            .submit_trade(sell(dec!(0.01), dec!(42000), dec!(1)))
            .await
            .unwrap();

        let history = service.get_trade_history(None).unwrap();
        let ids: Vec<i64> = history.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let limited = service.get_trade_history(Some(2)).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, 3);
    }

    #[tokio::test]
    async fn init_is_idempotent() {
        let (_, service) = build_service(dec!(10000), dec!(45000));
        service.init().await.unwrap();
        service
            .submit_trade(buy(dec!(0.1), dec!(40000), dec!(5)))
            .await
            .unwrap();

        // A second init must not reset the balance.
        let balance = service.init().await.unwrap();
        assert_eq!(balance.cash_quantity, dec!(5995));
    }

    // Replaying the trade log from the initial endowment must reproduce the
    // live balance exactly, whatever mix of accepted and rejected trades
    // got us there.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]
        #[test]
        fn balance_fold_reproduces_live_balance(
            ops in proptest::collection::vec(
                (any::<bool>(), 1u32..500, 1u32..1000, 0u32..5),
                1..30,
            )
        ) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            let initial_cash = dec!(1000000);

            let (folded, live) = rt.block_on(async {
                let (repository, service) = build_service(initial_cash, dec!(45000));
                service.init().await.unwrap();

                for (is_buy, quantity_cents, price, fee) in ops {
                    let quantity = Decimal::from(quantity_cents) / dec!(100);
                    let price = Decimal::from(price);
                    let fee = Decimal::from(fee);
                    let new_trade = if is_buy {
                        buy(quantity, price, fee)
                    } else {
                        sell(quantity, price, fee)
                    };
                    // Rejections are fine; only accepted trades enter the log.
                    let _ = service.submit_trade(new_trade).await;
                }

                let mut cash = initial_cash;
                let mut asset = Decimal::ZERO;
                for trade in repository.get_trades_chronological().unwrap() {
                    match trade.side {
                        TradeSide::Buy => {
                            cash -= trade.gross_amount + trade.fee;
                            asset += trade.asset_quantity;
                        }
                        TradeSide::Sell => {
                            cash += trade.gross_amount - trade.fee;
                            asset -= trade.asset_quantity;
                        }
                    }
                }
                ((cash, asset), service.get_balance().unwrap())
            });

            prop_assert_eq!(folded.0, live.cash_quantity);
            prop_assert_eq!(folded.1, live.asset_quantity);
            prop_assert!(live.cash_quantity >= Decimal::ZERO);
            prop_assert!(live.asset_quantity >= Decimal::ZERO);
        }
    }
}
