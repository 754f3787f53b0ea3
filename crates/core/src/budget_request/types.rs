//! Budget request data types.

use chrono::{DateTime, Utc};
use procura_shared::types::{AccountId, AreaId, BudgetRequestId, ConceptId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Budget request status.
///
/// A request is decided exactly once: Pending → Approved or
/// Pending → Rejected, with no re-opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetRequestStatus {
    /// Awaiting an approval decision.
    Pending,
    /// Approved at some percentage (terminal).
    Approved,
    /// Rejected (terminal).
    Rejected,
}

impl BudgetRequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if the status admits no further transition.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for BudgetRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A line item inside a budget request.
///
/// Duplicates on (account, concept) are allowed; they are summed when
/// approved budget lines are derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// The budget account charged.
    pub account_id: AccountId,
    /// The expense concept.
    pub concept_id: ConceptId,
    /// The area's estimate for this line.
    pub estimated_value: Decimal,
    /// The granted value, set on approval.
    pub approved_value: Option<Decimal>,
}

/// A budget request for one area and year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetRequest {
    /// Request ID.
    pub id: BudgetRequestId,
    /// The requesting area.
    pub area_id: AreaId,
    /// The fiscal year.
    pub year: i32,
    /// The total amount requested.
    pub requested_amount: Decimal,
    /// Why the budget is needed.
    pub justification: String,
    /// Current status.
    pub status: BudgetRequestStatus,
    /// Percentage granted, set on approval.
    pub approval_percentage: Option<u8>,
    /// Amount granted, set on approval.
    pub approved_amount: Option<Decimal>,
    /// Who decided the request.
    pub approver_id: Option<UserId>,
    /// When the request was decided.
    pub decided_at: Option<DateTime<Utc>>,
    /// Why the request was rejected.
    pub rejection_reason: Option<String>,
    /// Itemized estimates.
    pub line_items: Vec<LineItem>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for one line item when creating a request.
#[derive(Debug, Clone)]
pub struct LineItemInput {
    /// The budget account charged.
    pub account_id: AccountId,
    /// The expense concept.
    pub concept_id: ConceptId,
    /// The area's estimate for this line.
    pub estimated_value: Decimal,
}

/// Input for creating a budget request.
#[derive(Debug, Clone)]
pub struct CreateBudgetRequestInput {
    /// The requesting area.
    pub area_id: AreaId,
    /// The fiscal year.
    pub year: i32,
    /// The total amount requested.
    pub requested_amount: Decimal,
    /// Why the budget is needed.
    pub justification: String,
    /// Itemized estimates.
    pub line_items: Vec<LineItemInput>,
}

/// An approved budget line available to requisitions.
///
/// Derived from an approved request's line items with duplicates on
/// (account, concept) summed; not a stored entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovedBudgetLine {
    /// The budget account.
    pub account_id: AccountId,
    /// The expense concept.
    pub concept_id: ConceptId,
    /// The granted value for this (account, concept) pair.
    pub approved_value: Decimal,
}
