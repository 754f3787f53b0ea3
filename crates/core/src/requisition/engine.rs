//! Requisition engine: the lifecycle state machine and its ledger calls.
//!
//! All transitions are check-then-act under the store's per-entry
//! exclusive guard, which gives compare-and-swap semantics on `status`:
//! of two concurrent `approve` calls on the same requisition, exactly one
//! succeeds and the other observes `InvalidTransition`. A failed
//! transition performs no mutation.
//!
//! Ledger ordering: this engine is the sole caller of allocation
//! mutations for requisitions, and each ledger movement is tied to
//! exactly one transition edge, so a requisition's lifetime holds at
//! most one commit (Pending→Approved) and at most one settlement
//! (direct payment or petty-cash confirmation).

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use procura_shared::config::RequisitionConfig;
use procura_shared::types::{AreaId, RequisitionId, UserId};
use rust_decimal::Decimal;
use tracing::info;

use crate::allocation::AllocationStore;

use super::committee;
use super::error::RequisitionError;
use super::types::{
    ApprovalDecision, Comment, CreateRequisitionInput, PaymentKind, QuotationSupport,
    RejectionDecision, Requisition, RequisitionStatus, budgeted_amount, tax_amount,
};

/// In-memory engine owning requisitions and driving their lifecycle.
#[derive(Debug)]
pub struct RequisitionEngine {
    requisitions: DashMap<RequisitionId, Requisition>,
    ledger: Arc<AllocationStore>,
    config: RequisitionConfig,
}

impl RequisitionEngine {
    /// Creates an engine over the given allocation ledger with default policy.
    #[must_use]
    pub fn new(ledger: Arc<AllocationStore>) -> Self {
        Self::with_config(ledger, RequisitionConfig::default())
    }

    /// Creates an engine with explicit policy configuration.
    #[must_use]
    pub fn with_config(ledger: Arc<AllocationStore>, config: RequisitionConfig) -> Self {
        Self {
            requisitions: DashMap::new(),
            ledger,
            config,
        }
    }

    /// Creates a requisition in `Pending`.
    ///
    /// A pending requisition does not reserve funds; commitment happens
    /// at approval.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive quantity, negative
    /// price or tax, or a justification shorter than the configured
    /// minimum.
    pub fn create(&self, input: CreateRequisitionInput) -> Result<Requisition, RequisitionError> {
        Self::validate_pricing(input.unit_price, input.unit_tax, input.quantity)?;
        if input.justification.trim().chars().count() < self.config.min_justification_chars {
            return Err(RequisitionError::JustificationTooShort {
                minimum: self.config.min_justification_chars,
            });
        }

        let id = RequisitionId::new();
        let requisition = Requisition {
            id,
            area_id: input.area_id,
            year: input.year,
            account_id: input.account_id,
            concept_id: input.concept_id,
            product_id: input.product_id,
            provider_id: input.provider_id,
            quantity: input.quantity,
            unit_price: input.unit_price,
            unit_tax: input.unit_tax,
            budgeted_amount: budgeted_amount(input.unit_price, input.unit_tax, input.quantity),
            tax_amount: tax_amount(input.unit_tax, input.quantity),
            justification: input.justification,
            status: RequisitionStatus::Pending,
            committee_id: None,
            authorizers: std::collections::BTreeSet::new(),
            warranty: None,
            approver_id: None,
            approved_at: None,
            rejection_reason: None,
            payment_kind: None,
            paid_by: None,
            paid_at: None,
            comments: Vec::new(),
            quotation_supports: Vec::new(),
            created_at: Utc::now(),
        };

        info!(requisition_id = %id, area_id = %requisition.area_id, year = requisition.year,
            budgeted = %requisition.budgeted_amount, "requisition created");
        self.requisitions.insert(id, requisition.clone());
        Ok(requisition)
    }

    /// Approves a pending requisition and commits its budgeted amount.
    ///
    /// Price, tax, and quantity overrides from the decision are applied
    /// before the amounts are recomputed. The committee id is generated
    /// deterministically from today's date when not supplied.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the requisition is pending,
    /// `AuthorizersRequired` for an empty authorizer set, and allocation
    /// `NotFound` if the area/year has no ledger record. All checks run
    /// before any mutation.
    pub fn approve(
        &self,
        id: RequisitionId,
        approver_id: UserId,
        decision: ApprovalDecision,
    ) -> Result<Requisition, RequisitionError> {
        if decision.authorizers.is_empty() {
            return Err(RequisitionError::AuthorizersRequired);
        }

        let mut requisition = self
            .requisitions
            .get_mut(&id)
            .ok_or(RequisitionError::NotFound(id))?;
        Self::check_transition(requisition.status, RequisitionStatus::Approved)?;

        let unit_price = decision.final_unit_price.unwrap_or(requisition.unit_price);
        let unit_tax = decision.final_unit_tax.unwrap_or(requisition.unit_tax);
        let quantity = decision.final_quantity.unwrap_or(requisition.quantity);
        Self::validate_pricing(unit_price, unit_tax, quantity)?;

        // The allocation must exist before the status flips, so a missing
        // ledger record can never strand an approved requisition without
        // a commitment.
        if !self.ledger.exists(requisition.area_id, requisition.year) {
            return Err(crate::allocation::AllocationError::NotFound {
                area_id: requisition.area_id,
                year: requisition.year,
            }
            .into());
        }

        let now = Utc::now();
        requisition.unit_price = unit_price;
        requisition.unit_tax = unit_tax;
        requisition.quantity = quantity;
        requisition.budgeted_amount = budgeted_amount(unit_price, unit_tax, quantity);
        requisition.tax_amount = tax_amount(unit_tax, quantity);
        if decision.provider_id.is_some() {
            requisition.provider_id = decision.provider_id;
        }
        requisition.committee_id = Some(
            decision
                .committee_id
                .unwrap_or_else(|| committee::committee_id(id, now)),
        );
        requisition.authorizers = decision.authorizers;
        requisition.warranty = decision.warranty;
        requisition.approver_id = Some(approver_id);
        requisition.approved_at = Some(now);
        requisition.status = RequisitionStatus::Approved;

        let available = self.ledger.commit(
            requisition.area_id,
            requisition.year,
            requisition.budgeted_amount,
        )?;
        info!(requisition_id = %id, %approver_id, budgeted = %requisition.budgeted_amount,
            %available, "requisition approved, funds committed");
        Ok(requisition.clone())
    }

    /// Rejects a pending requisition. Terminal; no ledger effect, since
    /// nothing was committed while pending.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the requisition is pending,
    /// `RejectionReasonRequired` for an empty reason, and
    /// `AuthorizersRequired` for an empty authorizer set.
    pub fn reject(
        &self,
        id: RequisitionId,
        approver_id: UserId,
        decision: RejectionDecision,
    ) -> Result<Requisition, RequisitionError> {
        if decision.reason.trim().is_empty() {
            return Err(RequisitionError::RejectionReasonRequired);
        }
        if decision.authorizers.is_empty() {
            return Err(RequisitionError::AuthorizersRequired);
        }

        let mut requisition = self
            .requisitions
            .get_mut(&id)
            .ok_or(RequisitionError::NotFound(id))?;
        Self::check_transition(requisition.status, RequisitionStatus::Rejected)?;

        requisition.committee_id = Some(
            decision
                .committee_id
                .unwrap_or_else(|| committee::committee_id(id, Utc::now())),
        );
        requisition.authorizers = decision.authorizers;
        requisition.approver_id = Some(approver_id);
        requisition.rejection_reason = Some(decision.reason);
        requisition.status = RequisitionStatus::Rejected;

        info!(requisition_id = %id, %approver_id, "requisition rejected");
        Ok(requisition.clone())
    }

    /// Processes payment for an approved requisition.
    ///
    /// Direct payments settle the commitment immediately and hand the
    /// requisition to inventory. Petty-cash payments keep the commitment
    /// open until the petty-cash office confirms.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the requisition is approved.
    pub fn process_payment(
        &self,
        id: RequisitionId,
        processor_id: UserId,
        kind: PaymentKind,
    ) -> Result<Requisition, RequisitionError> {
        let mut requisition = self
            .requisitions
            .get_mut(&id)
            .ok_or(RequisitionError::NotFound(id))?;
        let target = match kind {
            PaymentKind::Direct => RequisitionStatus::PendingInventory,
            PaymentKind::PettyCash => RequisitionStatus::PettyCashPending,
        };
        Self::check_transition(requisition.status, target)?;

        requisition.payment_kind = Some(kind);
        requisition.paid_by = Some(processor_id);
        requisition.paid_at = Some(Utc::now());
        requisition.status = target;

        if kind == PaymentKind::Direct {
            self.ledger.settle(
                requisition.area_id,
                requisition.year,
                requisition.budgeted_amount,
            )?;
        }

        info!(requisition_id = %id, %processor_id, kind = ?kind, "payment processed");
        Ok(requisition.clone())
    }

    /// Confirms a petty-cash payment: the office settles the commitment
    /// and records the expense against its fund.
    ///
    /// Valid only from `PettyCashPending`; a directly paid requisition
    /// was settled at payment time and must never settle again.
    ///
    /// The fund is an external collaborator; `record_expense` receives
    /// the requisition id and the settled amount, and runs after the
    /// requisition's entry guard is dropped, so it may read back from
    /// this engine.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the requisition is awaiting
    /// petty-cash confirmation.
    pub fn confirm_petty_cash<F>(
        &self,
        id: RequisitionId,
        officer_id: UserId,
        record_expense: F,
    ) -> Result<Requisition, RequisitionError>
    where
        F: FnOnce(RequisitionId, Decimal),
    {
        let updated = {
            let mut requisition = self
                .requisitions
                .get_mut(&id)
                .ok_or(RequisitionError::NotFound(id))?;
            Self::require_status(
                requisition.status,
                RequisitionStatus::PettyCashPending,
                RequisitionStatus::Delivered,
            )?;

            requisition.status = RequisitionStatus::Delivered;
            requisition.clone()
        };

        self.ledger
            .settle(updated.area_id, updated.year, updated.budgeted_amount)?;
        record_expense(id, updated.budgeted_amount);

        info!(requisition_id = %id, %officer_id, amount = %updated.budgeted_amount,
            "petty cash confirmed, commitment settled");
        Ok(updated)
    }

    /// Confirms inventory receipt of a directly paid requisition.
    ///
    /// Valid only from `PendingInventory`; a petty-cash requisition
    /// leaves the lifecycle through [`Self::confirm_petty_cash`], which
    /// settles its still-open commitment.
    ///
    /// No ledger effect: the amount was settled at payment processing.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the requisition is awaiting
    /// inventory.
    pub fn confirm_delivery(&self, id: RequisitionId) -> Result<Requisition, RequisitionError> {
        let mut requisition = self
            .requisitions
            .get_mut(&id)
            .ok_or(RequisitionError::NotFound(id))?;
        Self::require_status(
            requisition.status,
            RequisitionStatus::PendingInventory,
            RequisitionStatus::Delivered,
        )?;

        requisition.status = RequisitionStatus::Delivered;
        info!(requisition_id = %id, "delivery confirmed");
        Ok(requisition.clone())
    }

    /// Adds a comment. Permitted only while pending.
    pub fn add_comment(
        &self,
        id: RequisitionId,
        author_id: UserId,
        body: String,
    ) -> Result<Requisition, RequisitionError> {
        if body.trim().is_empty() {
            return Err(RequisitionError::CommentRequired);
        }

        let mut requisition = self.pending_side_data(id)?;
        requisition.comments.push(Comment {
            author_id,
            body,
            created_at: Utc::now(),
        });
        Ok(requisition.clone())
    }

    /// Attaches quotation support files (1 to the configured maximum).
    /// Permitted only while pending, and only once; use
    /// [`Self::update_quotation_support`] to replace an existing set.
    pub fn attach_quotation_support(
        &self,
        id: RequisitionId,
        supports: Vec<QuotationSupport>,
    ) -> Result<Requisition, RequisitionError> {
        self.validate_support_count(&supports)?;

        let mut requisition = self.pending_side_data(id)?;
        if !requisition.quotation_supports.is_empty() {
            return Err(RequisitionError::QuotationSupportsAlreadyAttached);
        }
        requisition.quotation_supports = supports;
        Ok(requisition.clone())
    }

    /// Replaces the attached quotation support files. Permitted only
    /// while pending.
    pub fn update_quotation_support(
        &self,
        id: RequisitionId,
        supports: Vec<QuotationSupport>,
    ) -> Result<Requisition, RequisitionError> {
        self.validate_support_count(&supports)?;

        let mut requisition = self.pending_side_data(id)?;
        if requisition.quotation_supports.is_empty() {
            return Err(RequisitionError::NoQuotationSupports);
        }
        requisition.quotation_supports = supports;
        Ok(requisition.clone())
    }

    /// Returns a requisition by id.
    pub fn get(&self, id: RequisitionId) -> Result<Requisition, RequisitionError> {
        self.requisitions
            .get(&id)
            .map(|requisition| requisition.value().clone())
            .ok_or(RequisitionError::NotFound(id))
    }

    /// Lists requisitions in the given status.
    #[must_use]
    pub fn list_by_status(&self, status: RequisitionStatus) -> Vec<Requisition> {
        let mut matches: Vec<Requisition> = self
            .requisitions
            .iter()
            .filter(|entry| entry.status == status)
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by_key(|requisition| requisition.created_at);
        matches
    }

    /// Lists an area's requisitions across all statuses.
    #[must_use]
    pub fn list_by_area(&self, area_id: AreaId) -> Vec<Requisition> {
        let mut matches: Vec<Requisition> = self
            .requisitions
            .iter()
            .filter(|entry| entry.area_id == area_id)
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by_key(|requisition| requisition.created_at);
        matches
    }

    fn check_transition(
        from: RequisitionStatus,
        to: RequisitionStatus,
    ) -> Result<(), RequisitionError> {
        if RequisitionStatus::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(RequisitionError::InvalidTransition { from, to })
        }
    }

    /// For targets reachable from more than one state: the operation's
    /// exact source state, not just edge validity.
    fn require_status(
        from: RequisitionStatus,
        expected: RequisitionStatus,
        to: RequisitionStatus,
    ) -> Result<(), RequisitionError> {
        if from == expected {
            Ok(())
        } else {
            Err(RequisitionError::InvalidTransition { from, to })
        }
    }

    fn validate_pricing(
        unit_price: Decimal,
        unit_tax: Decimal,
        quantity: u32,
    ) -> Result<(), RequisitionError> {
        if quantity == 0 {
            return Err(RequisitionError::ZeroQuantity);
        }
        if unit_price.is_sign_negative() {
            return Err(RequisitionError::NegativeUnitPrice);
        }
        if unit_tax.is_sign_negative() {
            return Err(RequisitionError::NegativeUnitTax);
        }
        Ok(())
    }

    fn validate_support_count(
        &self,
        supports: &[QuotationSupport],
    ) -> Result<(), RequisitionError> {
        if supports.is_empty() || supports.len() > self.config.max_quotation_supports {
            return Err(RequisitionError::QuotationSupportCount {
                maximum: self.config.max_quotation_supports,
            });
        }
        Ok(())
    }

    fn pending_side_data(
        &self,
        id: RequisitionId,
    ) -> Result<dashmap::mapref::one::RefMut<'_, RequisitionId, Requisition>, RequisitionError>
    {
        let requisition = self
            .requisitions
            .get_mut(&id)
            .ok_or(RequisitionError::NotFound(id))?;
        if requisition.status != RequisitionStatus::Pending {
            return Err(RequisitionError::SideDataLocked {
                status: requisition.status,
            });
        }
        Ok(requisition)
    }
}
