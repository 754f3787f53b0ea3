//! Property-based tests for the allocation store.
//!
//! These validate the ledger invariants over randomized operation
//! sequences: committed funds never go negative, spend is monotonic,
//! and settle is exactly release-plus-spend.

use proptest::prelude::*;
use procura_shared::types::AreaId;
use rust_decimal::Decimal;

use super::store::AllocationStore;

/// One randomized ledger mutation.
#[derive(Debug, Clone)]
enum LedgerOp {
    Commit(u32),
    Release(u32),
    Settle(u32),
}

fn arb_op() -> impl Strategy<Value = LedgerOp> {
    prop_oneof![
        (0u32..1_000_000).prop_map(LedgerOp::Commit),
        (0u32..1_000_000).prop_map(LedgerOp::Release),
        (0u32..1_000_000).prop_map(LedgerOp::Settle),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// After any sequence of commits/releases/settlements, committed
    /// stays >= 0 and spent only ever grows.
    #[test]
    fn prop_committed_floored_and_spent_monotonic(
        annual in 0u32..10_000_000,
        ops in prop::collection::vec(arb_op(), 0..40),
    ) {
        let area = AreaId::new();
        let store = AllocationStore::new();
        store.ensure(area, 2025, Decimal::from(annual)).unwrap();

        let mut last_spent = Decimal::ZERO;
        for op in ops {
            match op {
                LedgerOp::Commit(n) => { store.commit(area, 2025, Decimal::from(n)).unwrap(); }
                LedgerOp::Release(n) => { store.release(area, 2025, Decimal::from(n)).unwrap(); }
                LedgerOp::Settle(n) => { store.settle(area, 2025, Decimal::from(n)).unwrap(); }
            }

            let snap = store.snapshot(area, 2025).unwrap();
            prop_assert!(snap.committed_amount >= Decimal::ZERO);
            prop_assert!(snap.spent_amount >= last_spent);
            last_spent = snap.spent_amount;
        }
    }

    /// Settle on one store equals release-then-spend observed as a unit
    /// on a shadow model.
    #[test]
    fn prop_settle_equals_release_plus_spend(
        annual in 0u32..10_000_000,
        committed in 0u32..1_000_000,
        settled in 0u32..1_000_000,
    ) {
        let area = AreaId::new();
        let store = AllocationStore::new();
        store.ensure(area, 2025, Decimal::from(annual)).unwrap();
        store.commit(area, 2025, Decimal::from(committed)).unwrap();
        store.settle(area, 2025, Decimal::from(settled)).unwrap();

        let snap = store.snapshot(area, 2025).unwrap();
        let expected_committed =
            (Decimal::from(committed) - Decimal::from(settled)).max(Decimal::ZERO);
        prop_assert_eq!(snap.committed_amount, expected_committed);
        prop_assert_eq!(snap.spent_amount, Decimal::from(settled));
        prop_assert_eq!(
            snap.available,
            Decimal::from(annual) - snap.spent_amount - snap.committed_amount
        );
    }

    /// Re-ensuring with a different annual amount touches nothing but
    /// the annual ceiling.
    #[test]
    fn prop_ensure_idempotence(
        first in 0u32..10_000_000,
        second in 0u32..10_000_000,
        committed in 0u32..1_000_000,
    ) {
        let area = AreaId::new();
        let store = AllocationStore::new();
        store.ensure(area, 2025, Decimal::from(first)).unwrap();
        store.commit(area, 2025, Decimal::from(committed)).unwrap();

        store.ensure(area, 2025, Decimal::from(second)).unwrap();

        let snap = store.snapshot(area, 2025).unwrap();
        prop_assert_eq!(snap.annual_amount, Decimal::from(second));
        prop_assert_eq!(snap.committed_amount, Decimal::from(committed));
        prop_assert_eq!(snap.spent_amount, Decimal::ZERO);
    }
}
