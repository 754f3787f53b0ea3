//! The allocation store: serialized read-modify-write per (area, year).
//!
//! `commit`, `release`, and `settle` are read-modify-writes on shared
//! counters. Each runs under the map's per-entry exclusive guard, so all
//! mutations for one (area, year) key are serialized without any
//! process-wide lock. `settle` performs its release-then-spend as a single
//! step under one guard: there is no observable state where the amount is
//! in neither bucket.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use procura_shared::types::AreaId;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::error::AllocationError;
use super::types::{AllocationSnapshot, AreaYear, BudgetAllocation, LedgerStats};

/// In-memory per-(area, year) budget ledger.
#[derive(Debug, Default)]
pub struct AllocationStore {
    allocations: DashMap<AreaYear, BudgetAllocation>,
    commits: AtomicU64,
    releases: AtomicU64,
    settlements: AtomicU64,
}

impl AllocationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the allocation record if absent; updates only
    /// `annual_amount` if present. Idempotent: existing spent/committed
    /// totals are never touched.
    pub fn ensure(
        &self,
        area_id: AreaId,
        year: i32,
        annual_amount: Decimal,
    ) -> Result<AllocationSnapshot, AllocationError> {
        if annual_amount.is_sign_negative() {
            return Err(AllocationError::NegativeAnnualAmount);
        }

        let key = AreaYear::new(area_id, year);
        let mut entry = self.allocations.entry(key).or_insert_with(|| {
            info!(%area_id, year, %annual_amount, "creating budget allocation");
            BudgetAllocation {
                area_id,
                year,
                annual_amount,
                spent_amount: Decimal::ZERO,
                committed_amount: Decimal::ZERO,
            }
        });
        entry.annual_amount = annual_amount;
        Ok(AllocationSnapshot::from(&*entry))
    }

    /// Reserves funds against the allocation: `committed += amount`.
    ///
    /// Never fails on insufficient funds. Returns the resulting available
    /// figure, which may be negative; overcommitment is surfaced as a
    /// warning to reporting roles, not a hard rejection.
    pub fn commit(
        &self,
        area_id: AreaId,
        year: i32,
        amount: Decimal,
    ) -> Result<Decimal, AllocationError> {
        self.mutate(area_id, year, amount, |alloc| {
            alloc.committed_amount += amount;
            let available = alloc.available();
            if available.is_sign_negative() {
                warn!(%area_id, year, %amount, %available, "allocation overcommitted");
            } else {
                debug!(%area_id, year, %amount, %available, "funds committed");
            }
            self.commits.fetch_add(1, Ordering::Relaxed);
            available
        })
    }

    /// Releases a commitment: `committed -= amount`, floored at zero.
    ///
    /// The floor defends against double-release; committed funds can
    /// never go negative.
    pub fn release(
        &self,
        area_id: AreaId,
        year: i32,
        amount: Decimal,
    ) -> Result<Decimal, AllocationError> {
        self.mutate(area_id, year, amount, |alloc| {
            alloc.committed_amount = (alloc.committed_amount - amount).max(Decimal::ZERO);
            debug!(%area_id, year, %amount, "commitment released");
            self.releases.fetch_add(1, Ordering::Relaxed);
            alloc.available()
        })
    }

    /// Converts a commitment into actual spend: release followed by
    /// `spent += amount`, atomically under one entry guard.
    pub fn settle(
        &self,
        area_id: AreaId,
        year: i32,
        amount: Decimal,
    ) -> Result<Decimal, AllocationError> {
        self.mutate(area_id, year, amount, |alloc| {
            alloc.committed_amount = (alloc.committed_amount - amount).max(Decimal::ZERO);
            alloc.spent_amount += amount;
            info!(%area_id, year, %amount, spent = %alloc.spent_amount, "commitment settled");
            self.settlements.fetch_add(1, Ordering::Relaxed);
            alloc.available()
        })
    }

    /// Read-only view of an allocation with the derived available figure.
    pub fn snapshot(&self, area_id: AreaId, year: i32) -> Result<AllocationSnapshot, AllocationError> {
        self.allocations
            .get(&AreaYear::new(area_id, year))
            .map(|alloc| AllocationSnapshot::from(&*alloc))
            .ok_or(AllocationError::NotFound { area_id, year })
    }

    /// Whether an allocation record exists for the key.
    #[must_use]
    pub fn exists(&self, area_id: AreaId, year: i32) -> bool {
        self.allocations.contains_key(&AreaYear::new(area_id, year))
    }

    /// Running counters of ledger mutations.
    #[must_use]
    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            commits: self.commits.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
            settlements: self.settlements.load(Ordering::Relaxed),
        }
    }

    /// Runs a mutation under the entry's exclusive guard.
    fn mutate<F>(
        &self,
        area_id: AreaId,
        year: i32,
        amount: Decimal,
        f: F,
    ) -> Result<Decimal, AllocationError>
    where
        F: FnOnce(&mut BudgetAllocation) -> Decimal,
    {
        if amount.is_sign_negative() {
            return Err(AllocationError::NegativeAmount);
        }

        let mut alloc = self
            .allocations
            .get_mut(&AreaYear::new(area_id, year))
            .ok_or(AllocationError::NotFound { area_id, year })?;
        Ok(f(&mut alloc))
    }
}
