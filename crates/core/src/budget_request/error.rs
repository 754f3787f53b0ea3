//! Budget request error types.

use procura_shared::AppError;
use procura_shared::types::{AreaId, BudgetRequestId};
use thiserror::Error;

use super::types::BudgetRequestStatus;

/// Budget-request-related errors.
#[derive(Debug, Error)]
pub enum BudgetRequestError {
    /// Budget request not found.
    #[error("Budget request {0} not found")]
    NotFound(BudgetRequestId),

    /// Requested amount cannot be negative.
    #[error("Requested amount cannot be negative")]
    NegativeRequestedAmount,

    /// Line item estimated value cannot be negative.
    #[error("Line item estimated value cannot be negative")]
    NegativeLineItemValue,

    /// An area already has an active (non-rejected) request for the year.
    #[error("Area {area_id} already has an active budget request for {year}")]
    ActiveRequestExists {
        /// The requesting area.
        area_id: AreaId,
        /// The fiscal year.
        year: i32,
    },

    /// Approval percentage must be between 0 and 100.
    #[error("Approval percentage must be between 0 and 100, got {0}")]
    InvalidPercentage(u8),

    /// The request has already been decided.
    #[error("Cannot decide budget request in status {status}: decision is terminal")]
    AlreadyDecided {
        /// The current status of the request.
        status: BudgetRequestStatus,
    },

    /// Rejection reason is required but not provided.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,
}

impl From<BudgetRequestError> for AppError {
    fn from(err: BudgetRequestError) -> Self {
        match err {
            BudgetRequestError::NotFound(_) => Self::NotFound(err.to_string()),
            BudgetRequestError::ActiveRequestExists { .. } => Self::Conflict(err.to_string()),
            BudgetRequestError::AlreadyDecided { .. } => Self::InvalidState(err.to_string()),
            BudgetRequestError::NegativeRequestedAmount
            | BudgetRequestError::NegativeLineItemValue
            | BudgetRequestError::InvalidPercentage(_)
            | BudgetRequestError::RejectionReasonRequired => Self::Validation(err.to_string()),
        }
    }
}
