//! Property-based tests for the requisition lifecycle.
//!
//! The properties here are ledger conservation laws: whatever pricing a
//! requisition carries and whichever payment path it takes, the ledger
//! ends with exactly one commitment and exactly one settlement for the
//! same figure, and the identity
//! `annual - spent - committed == available` holds at every step.

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;

use procura_shared::types::{AccountId, AreaId, ConceptId, ProductId, UserId};

use crate::allocation::AllocationStore;

use super::engine::RequisitionEngine;
use super::types::{
    ApprovalDecision, Authorizer, CreateRequisitionInput, PaymentKind, RequisitionStatus,
};

fn arb_money() -> impl Strategy<Value = Decimal> {
    // Whole-peso figures up to one million per unit.
    (0u64..=1_000_000).prop_map(Decimal::from)
}

fn arb_payment_kind() -> impl Strategy<Value = PaymentKind> {
    prop_oneof![Just(PaymentKind::Direct), Just(PaymentKind::PettyCash)]
}

fn create_input(area_id: AreaId, unit_price: Decimal, unit_tax: Decimal, quantity: u32) -> CreateRequisitionInput {
    CreateRequisitionInput {
        area_id,
        year: 2025,
        account_id: AccountId::new(),
        concept_id: ConceptId::new(),
        product_id: ProductId::new(),
        provider_id: None,
        quantity,
        unit_price,
        unit_tax,
        justification: "Property-generated purchase request".to_string(),
    }
}

fn approval() -> ApprovalDecision {
    ApprovalDecision {
        authorizers: BTreeSet::from([Authorizer::Rector]),
        ..ApprovalDecision::default()
    }
}

proptest! {
    /// A full lifecycle commits once and settles once for the budgeted
    /// amount, regardless of payment path.
    #[test]
    fn prop_lifecycle_settles_exactly_once(
        unit_price in arb_money(),
        unit_tax in arb_money(),
        quantity in 1u32..=500,
        annual in arb_money(),
        kind in arb_payment_kind(),
    ) {
        let ledger = Arc::new(AllocationStore::new());
        let area = AreaId::new();
        ledger.ensure(area, 2025, annual).unwrap();
        let engine = RequisitionEngine::new(Arc::clone(&ledger));

        let req = engine
            .create(create_input(area, unit_price, unit_tax, quantity))
            .unwrap();
        let expected = (unit_price + unit_tax) * Decimal::from(quantity);
        prop_assert_eq!(req.budgeted_amount, expected);

        engine.approve(req.id, UserId::new(), approval()).unwrap();
        let snap = ledger.snapshot(area, 2025).unwrap();
        prop_assert_eq!(snap.committed_amount, expected);
        prop_assert_eq!(snap.available, annual - expected);

        engine.process_payment(req.id, UserId::new(), kind).unwrap();
        let delivered = match kind {
            PaymentKind::Direct => engine.confirm_delivery(req.id).unwrap(),
            PaymentKind::PettyCash => engine
                .confirm_petty_cash(req.id, UserId::new(), |_, _| {})
                .unwrap(),
        };
        prop_assert_eq!(delivered.status, RequisitionStatus::Delivered);

        let snap = ledger.snapshot(area, 2025).unwrap();
        prop_assert_eq!(snap.spent_amount, expected);
        prop_assert_eq!(snap.committed_amount, Decimal::ZERO);
        prop_assert_eq!(snap.available, annual - expected);
        prop_assert_eq!(ledger.stats().commits, 1);
        prop_assert_eq!(ledger.stats().settlements, 1);
    }

    /// The conservation identity holds after every lifecycle step.
    #[test]
    fn prop_available_is_always_derived(
        unit_price in arb_money(),
        unit_tax in arb_money(),
        quantity in 1u32..=500,
        annual in arb_money(),
    ) {
        let ledger = Arc::new(AllocationStore::new());
        let area = AreaId::new();
        ledger.ensure(area, 2025, annual).unwrap();
        let engine = RequisitionEngine::new(Arc::clone(&ledger));

        let req = engine
            .create(create_input(area, unit_price, unit_tax, quantity))
            .unwrap();
        engine.approve(req.id, UserId::new(), approval()).unwrap();
        engine
            .process_payment(req.id, UserId::new(), PaymentKind::Direct)
            .unwrap();

        let snap = ledger.snapshot(area, 2025).unwrap();
        prop_assert_eq!(
            snap.available,
            snap.annual_amount - snap.spent_amount - snap.committed_amount
        );
    }

    /// Rejection never moves the ledger, whatever the figures were.
    #[test]
    fn prop_rejection_has_no_ledger_effect(
        unit_price in arb_money(),
        unit_tax in arb_money(),
        quantity in 1u32..=500,
        annual in arb_money(),
    ) {
        let ledger = Arc::new(AllocationStore::new());
        let area = AreaId::new();
        ledger.ensure(area, 2025, annual).unwrap();
        let engine = RequisitionEngine::new(Arc::clone(&ledger));

        let req = engine
            .create(create_input(area, unit_price, unit_tax, quantity))
            .unwrap();
        engine
            .reject(
                req.id,
                UserId::new(),
                super::types::RejectionDecision {
                    committee_id: None,
                    authorizers: BTreeSet::from([Authorizer::Trustee]),
                    reason: "Not in this year's plan".to_string(),
                },
            )
            .unwrap();

        let snap = ledger.snapshot(area, 2025).unwrap();
        prop_assert_eq!(snap.available, annual);
        prop_assert_eq!(ledger.stats().commits, 0);
        prop_assert_eq!(ledger.stats().settlements, 0);
    }
}
