//! Allocation data types.

use procura_shared::types::AreaId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Key identifying one allocation record: one area in one fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AreaYear {
    /// The institutional area.
    pub area_id: AreaId,
    /// The fiscal year.
    pub year: i32,
}

impl AreaYear {
    /// Creates a new key.
    #[must_use]
    pub const fn new(area_id: AreaId, year: i32) -> Self {
        Self { area_id, year }
    }
}

/// The annual budget record for one area in one year.
///
/// `spent_amount` and `committed_amount` are running totals mutated only
/// through [`super::AllocationStore`]; the record is never deleted, only
/// superseded by a new year's record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetAllocation {
    /// The institutional area.
    pub area_id: AreaId,
    /// The fiscal year.
    pub year: i32,
    /// The annual ceiling.
    pub annual_amount: Decimal,
    /// Funds already settled against this allocation.
    pub spent_amount: Decimal,
    /// Funds reserved for approved-but-unsettled requisitions.
    pub committed_amount: Decimal,
}

impl BudgetAllocation {
    /// Funds neither spent nor committed. May be negative: the ledger
    /// tolerates overcommitment rather than blocking approvals.
    #[must_use]
    pub fn available(&self) -> Decimal {
        self.annual_amount - self.spent_amount - self.committed_amount
    }
}

/// Read-only view of an allocation with the derived available figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationSnapshot {
    /// The institutional area.
    pub area_id: AreaId,
    /// The fiscal year.
    pub year: i32,
    /// The annual ceiling.
    pub annual_amount: Decimal,
    /// Funds already settled.
    pub spent_amount: Decimal,
    /// Funds reserved for approved requisitions.
    pub committed_amount: Decimal,
    /// Derived: annual - spent - committed. May be negative.
    pub available: Decimal,
}

impl AllocationSnapshot {
    /// Whether the allocation is overcommitted (available below zero).
    ///
    /// Overcommitment is advisory, surfaced to reporting roles as a
    /// warning rather than blocking the approval workflow.
    #[must_use]
    pub fn is_overcommitted(&self) -> bool {
        self.available.is_sign_negative() && !self.available.is_zero()
    }
}

impl From<&BudgetAllocation> for AllocationSnapshot {
    fn from(alloc: &BudgetAllocation) -> Self {
        Self {
            area_id: alloc.area_id,
            year: alloc.year,
            annual_amount: alloc.annual_amount,
            spent_amount: alloc.spent_amount,
            committed_amount: alloc.committed_amount,
            available: alloc.available(),
        }
    }
}

/// Running counters of ledger mutations, across all keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    /// Number of commit operations performed.
    pub commits: u64,
    /// Number of release operations performed.
    pub releases: u64,
    /// Number of settle operations performed.
    pub settlements: u64,
}
