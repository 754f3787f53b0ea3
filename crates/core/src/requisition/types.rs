//! Requisition domain types for the purchase lifecycle.
//!
//! This module defines the requisition record, its closed status enum,
//! and the decision inputs captured at approval and rejection time.

use chrono::{DateTime, Utc};
use procura_shared::types::{
    AccountId, AreaId, ConceptId, ProductId, ProviderId, RequisitionId, UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Requisition status in the purchase lifecycle.
///
/// Requisitions progress through these states from creation to delivery.
/// The valid transitions are:
/// - Pending → Approved (approve; funds committed)
/// - Pending → Rejected (reject; terminal)
/// - Approved → PendingInventory (direct payment; funds settled)
/// - Approved → PettyCashPending (petty cash routing; commitment stays open)
/// - PettyCashPending → Delivered (petty-cash office confirms; funds settled)
/// - PendingInventory → Delivered (inventory confirms receipt)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequisitionStatus {
    /// Created, awaiting a decision. No funds reserved.
    Pending,
    /// Approved, awaiting payment processing. Funds committed.
    Approved,
    /// Rejected (terminal). No ledger effect.
    Rejected,
    /// Paid directly, awaiting inventory receipt. Funds settled.
    PendingInventory,
    /// Routed to petty cash, awaiting office confirmation. Funds still committed.
    PettyCashPending,
    /// Delivered (terminal).
    Delivered,
}

impl RequisitionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::PendingInventory => "pending_inventory",
            Self::PettyCashPending => "petty_cash_pending",
            Self::Delivered => "delivered",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "pending_inventory" => Some(Self::PendingInventory),
            "petty_cash_pending" => Some(Self::PettyCashPending),
            "delivered" => Some(Self::Delivered),
            _ => None,
        }
    }

    /// Returns true if the status admits no further transition.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Delivered)
    }

    /// Checks whether a status transition is part of the lifecycle.
    ///
    /// The transition table is enforced here, centrally, never at call
    /// sites comparing status strings.
    #[must_use]
    pub fn is_valid_transition(from: Self, to: Self) -> bool {
        matches!(
            (from, to),
            (Self::Pending, Self::Approved | Self::Rejected)
                | (Self::Approved, Self::PendingInventory | Self::PettyCashPending)
                | (Self::PettyCashPending | Self::PendingInventory, Self::Delivered)
        )
    }
}

impl fmt::Display for RequisitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A signing authority that can back an approval or rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authorizer {
    /// The rector.
    Rector,
    /// The vice-rector.
    ViceRector,
    /// The trustee.
    Trustee,
}

impl Authorizer {
    /// Returns the string representation of the authorizer.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rector => "rector",
            Self::ViceRector => "vice_rector",
            Self::Trustee => "trustee",
        }
    }
}

/// How an approved requisition is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// Direct treasury payment; settled immediately.
    Direct,
    /// Routed to the petty-cash office; settled on its confirmation.
    PettyCash,
}

/// Unit for a warranty duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarrantyUnit {
    /// Days.
    Days,
    /// Months.
    Months,
    /// Years.
    Years,
}

/// Warranty terms captured at approval time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warranty {
    /// Whether a warranty was granted.
    pub granted: bool,
    /// Warranty duration, in `unit`s.
    pub duration: u32,
    /// Unit of the duration.
    pub unit: WarrantyUnit,
}

/// A free-form comment on a pending requisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Who wrote the comment.
    pub author_id: UserId,
    /// The comment text.
    pub body: String,
    /// When the comment was added.
    pub created_at: DateTime<Utc>,
}

/// Metadata for one quotation support file.
///
/// File contents live in external storage; the core only tracks the
/// name and an opaque storage reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationSupport {
    /// Original file name.
    pub file_name: String,
    /// Opaque reference into the storage collaborator.
    pub reference: String,
}

/// A purchase requisition.
///
/// Requisitions are never deleted; terminal records remain as the audit
/// trail of the area's spending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requisition {
    /// Requisition ID.
    pub id: RequisitionId,
    /// The requesting area.
    pub area_id: AreaId,
    /// The fiscal year the purchase draws against.
    pub year: i32,
    /// The budget account charged.
    pub account_id: AccountId,
    /// The expense concept.
    pub concept_id: ConceptId,
    /// The catalog product requested.
    pub product_id: ProductId,
    /// The chosen provider, if known.
    pub provider_id: Option<ProviderId>,
    /// Number of units. Always positive.
    pub quantity: u32,
    /// Price per unit, before tax.
    pub unit_price: Decimal,
    /// Tax per unit.
    pub unit_tax: Decimal,
    /// Derived: (unit_price + unit_tax) × quantity.
    pub budgeted_amount: Decimal,
    /// Derived: unit_tax × quantity.
    pub tax_amount: Decimal,
    /// Why the purchase is needed.
    pub justification: String,
    /// Current lifecycle status.
    pub status: RequisitionStatus,
    /// Committee identifier binding the decision to an authorization event.
    pub committee_id: Option<String>,
    /// Signing authorities backing the decision.
    pub authorizers: BTreeSet<Authorizer>,
    /// Warranty terms, if granted.
    pub warranty: Option<Warranty>,
    /// Who approved or rejected the requisition.
    pub approver_id: Option<UserId>,
    /// When the requisition was approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// Why the requisition was rejected.
    pub rejection_reason: Option<String>,
    /// How the requisition was paid.
    pub payment_kind: Option<PaymentKind>,
    /// Who processed the payment.
    pub paid_by: Option<UserId>,
    /// When the payment was processed.
    pub paid_at: Option<DateTime<Utc>>,
    /// Comments added while pending.
    pub comments: Vec<Comment>,
    /// Quotation support files attached while pending.
    pub quotation_supports: Vec<QuotationSupport>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Computes the budgeted amount: (unit price + unit tax) × quantity.
#[must_use]
pub fn budgeted_amount(unit_price: Decimal, unit_tax: Decimal, quantity: u32) -> Decimal {
    (unit_price + unit_tax) * Decimal::from(quantity)
}

/// Computes the tax amount: unit tax × quantity.
#[must_use]
pub fn tax_amount(unit_tax: Decimal, quantity: u32) -> Decimal {
    unit_tax * Decimal::from(quantity)
}

/// Input for creating a requisition.
#[derive(Debug, Clone)]
pub struct CreateRequisitionInput {
    /// The requesting area.
    pub area_id: AreaId,
    /// The fiscal year.
    pub year: i32,
    /// The budget account charged.
    pub account_id: AccountId,
    /// The expense concept.
    pub concept_id: ConceptId,
    /// The catalog product requested.
    pub product_id: ProductId,
    /// The chosen provider, if known.
    pub provider_id: Option<ProviderId>,
    /// Number of units.
    pub quantity: u32,
    /// Price per unit, before tax.
    pub unit_price: Decimal,
    /// Tax per unit.
    pub unit_tax: Decimal,
    /// Why the purchase is needed.
    pub justification: String,
}

/// The approver's decision data for an approval.
#[derive(Debug, Clone, Default)]
pub struct ApprovalDecision {
    /// Negotiated unit price override, if any.
    pub final_unit_price: Option<Decimal>,
    /// Negotiated unit tax override, if any.
    pub final_unit_tax: Option<Decimal>,
    /// Quantity override, if any.
    pub final_quantity: Option<u32>,
    /// Provider chosen during approval, if any.
    pub provider_id: Option<ProviderId>,
    /// Externally supplied committee id. Generated when absent.
    pub committee_id: Option<String>,
    /// Signing authorities backing the approval. At least one required.
    pub authorizers: BTreeSet<Authorizer>,
    /// Warranty terms, if granted.
    pub warranty: Option<Warranty>,
}

/// The approver's decision data for a rejection.
#[derive(Debug, Clone)]
pub struct RejectionDecision {
    /// Externally supplied committee id. Generated when absent.
    pub committee_id: Option<String>,
    /// Signing authorities backing the rejection. At least one required.
    pub authorizers: BTreeSet<Authorizer>,
    /// Why the requisition is rejected. Required, non-empty.
    pub reason: String,
}
