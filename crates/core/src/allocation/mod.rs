//! Per-area annual budget ledger.
//!
//! Every monetary movement in the system reconciles against one
//! `BudgetAllocation` record per (area, year): an annual ceiling split
//! across three mutually exclusive buckets (spent, committed, available).
//!
//! # Modules
//!
//! - `types` - Allocation record, snapshot view, ledger counters
//! - `error` - Allocation-specific error types
//! - `store` - The serialized-per-key allocation store

pub mod error;
pub mod store;
pub mod types;

#[cfg(test)]
mod store_props;

pub use error::AllocationError;
pub use store::AllocationStore;
pub use types::{AllocationSnapshot, AreaYear, BudgetAllocation, LedgerStats};
