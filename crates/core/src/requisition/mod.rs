//! Purchase requisition lifecycle management.
//!
//! This module implements the requisition state machine, the committee
//! identifier resolver, and payment routing. It is the only mutator of
//! the allocation ledger: funds are committed at approval and settled at
//! direct payment or petty-cash confirmation.
//!
//! # Modules
//!
//! - `types` - Requisition domain types (status, decisions, side data)
//! - `error` - Requisition-specific error types
//! - `engine` - State transition logic and ledger calls
//! - `committee` - Deterministic committee identifier resolution
//! - `payment` - Payment routing policy

pub mod committee;
pub mod engine;
pub mod error;
pub mod payment;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::RequisitionEngine;
pub use error::RequisitionError;
pub use payment::{PaymentRouter, RoutingPolicy};
pub use types::{
    ApprovalDecision, Authorizer, Comment, CreateRequisitionInput, PaymentKind, QuotationSupport,
    RejectionDecision, Requisition, RequisitionStatus, Warranty, WarrantyUnit,
};
