//! Property-based tests for proportional budget approval.

use proptest::prelude::*;
use procura_shared::types::{AccountId, AreaId, ConceptId, UserId};
use rust_decimal::Decimal;

use super::engine::BudgetRequestEngine;
use super::types::{CreateBudgetRequestInput, LineItemInput};

fn make_request(
    engine: &BudgetRequestEngine,
    requested: u64,
    lines: &[u64],
) -> crate::budget_request::BudgetRequest {
    engine
        .create(CreateBudgetRequestInput {
            area_id: AreaId::new(),
            year: 2025,
            requested_amount: Decimal::from(requested),
            justification: "randomized approval property".to_string(),
            line_items: lines
                .iter()
                .map(|v| LineItemInput {
                    account_id: AccountId::new(),
                    concept_id: ConceptId::new(),
                    estimated_value: Decimal::from(*v),
                })
                .collect(),
        })
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Full approval reproduces the requested amount and every line
    /// estimate exactly.
    #[test]
    fn prop_full_approval_is_exact(
        requested in 0u64..1_000_000_000,
        lines in prop::collection::vec(0u64..100_000_000, 0..8),
    ) {
        let engine = BudgetRequestEngine::new();
        let request = make_request(&engine, requested, &lines);
        let approved = engine.approve(request.id, UserId::new(), 100).unwrap();

        prop_assert_eq!(approved.approved_amount, Some(Decimal::from(requested)));
        for (line, original) in approved.line_items.iter().zip(&lines) {
            prop_assert_eq!(line.approved_value, Some(Decimal::from(*original)));
        }
    }

    /// Partial approval: the line sum stays within one currency unit per
    /// line of the rounded aggregate when lines sum to the requested
    /// amount. The drift is accepted, never "fixed".
    #[test]
    fn prop_partial_approval_drift_bounded(
        pct in 0u8..100,
        lines in prop::collection::vec(0u64..100_000_000, 1..8),
    ) {
        let requested: u64 = lines.iter().sum();
        let engine = BudgetRequestEngine::new();
        let request = make_request(&engine, requested, &lines);
        let approved = engine.approve(request.id, UserId::new(), pct).unwrap();

        let aggregate = approved.approved_amount.unwrap();
        let line_sum: Decimal = approved
            .line_items
            .iter()
            .map(|line| line.approved_value.unwrap())
            .sum();

        let bound = Decimal::from(lines.len());
        prop_assert!((line_sum - aggregate).abs() <= bound,
            "line sum {} drifted more than {} from aggregate {}",
            line_sum, bound, aggregate);
    }

    /// The approved aggregate never exceeds the requested amount.
    #[test]
    fn prop_approved_amount_bounded_by_requested(
        pct in 0u8..=100,
        requested in 0u64..1_000_000_000,
    ) {
        let engine = BudgetRequestEngine::new();
        let request = make_request(&engine, requested, &[]);
        let approved = engine.approve(request.id, UserId::new(), pct).unwrap();

        // Half-up rounding can add at most half a unit.
        let ceiling = Decimal::from(requested) + Decimal::ONE;
        prop_assert!(approved.approved_amount.unwrap() <= ceiling);
    }
}
