//! Core business logic - framework-agnostic aggregation and write operations.
//!
//! Everything here is callable from any surface (HTTP handlers, jobs, tests):
//! functions take a `DatabaseConnection` plus plain values and return
//! structured data, never rendered output.

/// Totals, monthly series, and per-project breakdowns over a period
pub mod aggregate;
/// Cached annual snapshots, carry-forward balances, year-over-year change
pub mod annual;
/// Academic-year and semester date math (pure, clock-injected)
pub mod period;
/// Project write operations and detail/listing reads
pub mod project;
