//! Budget requests with proportional approval.
//!
//! An area asks for its annual budget with itemized line estimates; the
//! approver grants a percentage of it. Approved line items become the
//! budget lines requisitions draw against for that area and year.
//!
//! # Modules
//!
//! - `types` - Request, line items, approval inputs
//! - `error` - Budget-request-specific error types
//! - `engine` - Create/approve/reject and the approved-lines query

pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::BudgetRequestEngine;
pub use error::BudgetRequestError;
pub use types::{
    ApprovedBudgetLine, BudgetRequest, BudgetRequestStatus, CreateBudgetRequestInput, LineItem,
    LineItemInput,
};
