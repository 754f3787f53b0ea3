//! Payment routing for approved requisitions.
//!
//! The router is deliberately thin: it owns the decision of *how* an
//! approved requisition gets settled (direct treasury payment vs petty
//! cash), while the state machine owns *what* that decision does. Any
//! future routing policy (e.g. amount-threshold auto-routing to petty
//! cash) lands here without touching the engine.

use std::sync::Arc;

use procura_shared::types::{RequisitionId, UserId};
use tracing::debug;

use super::engine::RequisitionEngine;
use super::error::RequisitionError;
use super::types::{PaymentKind, Requisition};

/// How the router picks a payment path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingPolicy {
    /// The treasury operator chooses the kind explicitly.
    Explicit,
}

/// Dispatches payment processing for approved requisitions.
#[derive(Debug)]
pub struct PaymentRouter {
    engine: Arc<RequisitionEngine>,
    policy: RoutingPolicy,
}

impl PaymentRouter {
    /// Creates a router with the explicit-choice policy.
    #[must_use]
    pub fn new(engine: Arc<RequisitionEngine>) -> Self {
        Self {
            engine,
            policy: RoutingPolicy::Explicit,
        }
    }

    /// The active routing policy.
    #[must_use]
    pub const fn policy(&self) -> RoutingPolicy {
        self.policy
    }

    /// Routes an approved requisition down the requested payment path.
    ///
    /// # Errors
    ///
    /// Propagates the engine's errors; in particular `InvalidTransition`
    /// when the requisition is not in `Approved`.
    pub fn route(
        &self,
        id: RequisitionId,
        processor_id: UserId,
        kind: PaymentKind,
    ) -> Result<Requisition, RequisitionError> {
        let chosen = match self.policy {
            RoutingPolicy::Explicit => kind,
        };
        debug!(requisition_id = %id, kind = ?chosen, "routing payment");
        self.engine.process_payment(id, processor_id, chosen)
    }
}
