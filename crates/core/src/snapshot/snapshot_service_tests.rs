#[cfg(test)]
mod tests {
    use crate::constants::BALANCE_ID;
    use crate::errors::Result;
    use crate::ledger::{Balance, LedgerRepositoryTrait, NewTrade, Trade};
    use crate::market_data::{PricePoint, PriceRepositoryTrait, PriceResolver, PriceSourceTrait};
    use crate::snapshot::{NewSnapshot, Snapshot, SnapshotRepositoryTrait, SnapshotService};
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    struct MockLedgerRepository {
        balance: Balance,
    }

    #[async_trait]
    impl LedgerRepositoryTrait for MockLedgerRepository {
        async fn ensure_initialized(&self, _initial_cash: Decimal) -> Result<Balance> {
            unimplemented!("Not needed for tests")
        }

        fn get_balance(&self) -> Result<Balance> {
            Ok(self.balance.clone())
        }

        async fn apply_trade(&self, _new_trade: NewTrade) -> Result<Trade> {
            unimplemented!("Not needed for tests")
        }

        fn get_trades(&self, _limit: Option<i64>) -> Result<Vec<Trade>> {
            unimplemented!("Not needed for tests")
        }

        fn get_trades_chronological(&self) -> Result<Vec<Trade>> {
            unimplemented!("Not needed for tests")
        }
    }

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

    fn build_service(cash: Decimal, asset: Decimal, price: Decimal) -> SnapshotService {
        let balance = Balance {
            id: BALANCE_ID.to_string(),
            asset_quantity: asset,
            cash_quantity: cash,
            last_updated: Utc::now(),
        };
        let price_resolver = Arc::new(PriceResolver::new(
            Arc::new(MockPriceRepository { price }),
            Arc::new(UnreachablePriceSource),
            "BTC",
        ));
        SnapshotService::new(
            Arc::new(MockLedgerRepository { balance }),
            Arc::new(MockSnapshotRepository::default()),
            price_resolver,
        )
    }

    #[tokio::test]
    async fn snapshot_materializes_current_valuation() {
        let service = build_service(dec!(5995), dec!(0.1), dec!(45000));

        let snapshot = service.record_snapshot().await.unwrap();
        assert_eq!(snapshot.cash_quantity, dec!(5995));
        assert_eq!(snapshot.asset_quantity, dec!(0.1));
        assert_eq!(snapshot.unit_price, dec!(45000));
        // 5995 + 0.1 * 45000
        assert_eq!(snapshot.total_value, dec!(10495));
    }

    #[tokio::test]
    async fn repeated_snapshots_append() {
        let service = build_service(dec!(10000), dec!(0), dec!(40000));

        let first = service.record_snapshot().await.unwrap();
        let second = service.record_snapshot().await.unwrap();
        assert_ne!(first.id, second.id);

        let history = service.get_snapshot_history(None).unwrap();
        assert_eq!(history.len(), 2);
        // Most recent first.
        assert_eq!(history[0].id, second.id);

        let limited = service.get_snapshot_history(Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
    }
}
