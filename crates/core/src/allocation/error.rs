//! Allocation error types.

use procura_shared::AppError;
use procura_shared::types::AreaId;
use thiserror::Error;

/// Allocation-related errors.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// No allocation record exists for the given area and year.
    #[error("No budget allocation for area {area_id} in {year}")]
    NotFound {
        /// The area that was looked up.
        area_id: AreaId,
        /// The fiscal year that was looked up.
        year: i32,
    },

    /// Annual amount cannot be negative.
    #[error("Annual amount cannot be negative")]
    NegativeAnnualAmount,

    /// Ledger movement amount cannot be negative.
    #[error("Ledger movement amount cannot be negative")]
    NegativeAmount,
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::NotFound { .. } => Self::NotFound(err.to_string()),
            AllocationError::NegativeAnnualAmount | AllocationError::NegativeAmount => {
                Self::Validation(err.to_string())
            }
        }
    }
}
