//! Requisition error types.

use procura_shared::AppError;
use procura_shared::types::RequisitionId;
use thiserror::Error;

use crate::allocation::AllocationError;

use super::types::RequisitionStatus;

/// Errors that can occur during requisition operations.
///
/// A failed transition performs no mutation: the state machine is
/// check-then-act, never compensating.
#[derive(Debug, Error)]
pub enum RequisitionError {
    /// Requisition not found.
    #[error("Requisition {0} not found")]
    NotFound(RequisitionId),

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: RequisitionStatus,
        /// The attempted target status.
        to: RequisitionStatus,
    },

    /// Quantity must be positive.
    #[error("Quantity must be greater than zero")]
    ZeroQuantity,

    /// Unit price cannot be negative.
    #[error("Unit price cannot be negative")]
    NegativeUnitPrice,

    /// Unit tax cannot be negative.
    #[error("Unit tax cannot be negative")]
    NegativeUnitTax,

    /// Justification is too short.
    #[error("Justification must be at least {minimum} characters")]
    JustificationTooShort {
        /// The configured minimum length.
        minimum: usize,
    },

    /// A decision requires at least one signing authority.
    #[error("At least one authorizer is required")]
    AuthorizersRequired,

    /// Rejection reason is required but not provided.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,

    /// Comment body is required but not provided.
    #[error("Comment body is required")]
    CommentRequired,

    /// Wrong number of quotation support files.
    #[error("Quotation supports must be between 1 and {maximum} files")]
    QuotationSupportCount {
        /// The configured maximum number of files.
        maximum: usize,
    },

    /// Quotation supports were already attached; use update instead.
    #[error("Quotation supports already attached")]
    QuotationSupportsAlreadyAttached,

    /// No quotation supports to update; attach first.
    #[error("No quotation supports attached")]
    NoQuotationSupports,

    /// Side data can only be modified while the requisition is pending.
    #[error("Side data is locked in status {status}")]
    SideDataLocked {
        /// The current status of the requisition.
        status: RequisitionStatus,
    },

    /// An allocation ledger error.
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

impl From<RequisitionError> for AppError {
    fn from(err: RequisitionError) -> Self {
        match err {
            RequisitionError::NotFound(_) => Self::NotFound(err.to_string()),
            RequisitionError::InvalidTransition { .. }
            | RequisitionError::SideDataLocked { .. } => Self::InvalidState(err.to_string()),
            RequisitionError::Allocation(inner) => inner.into(),
            RequisitionError::ZeroQuantity
            | RequisitionError::NegativeUnitPrice
            | RequisitionError::NegativeUnitTax
            | RequisitionError::JustificationTooShort { .. }
            | RequisitionError::AuthorizersRequired
            | RequisitionError::RejectionReasonRequired
            | RequisitionError::CommentRequired
            | RequisitionError::QuotationSupportCount { .. }
            | RequisitionError::QuotationSupportsAlreadyAttached
            | RequisitionError::NoQuotationSupports => Self::Validation(err.to_string()),
        }
    }
}
