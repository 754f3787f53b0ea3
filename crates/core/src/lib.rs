//! Core business logic for Procura.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and the requisition lifecycle live here.
//!
//! # Modules
//!
//! - `allocation` - Per-area annual budget ledger (spent/committed/available)
//! - `budget_request` - Budget requests with proportional approval
//! - `requisition` - Purchase requisition lifecycle state machine

pub mod allocation;
pub mod budget_request;
pub mod requisition;
