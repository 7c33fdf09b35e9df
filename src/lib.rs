//! Keiba - Stake allocation and settlement for race betting portfolios
//!
//! This library provides:
//! - Budget-driven candidate pool selection with backfill
//! - Proportional stake allocation in 100 yen units
//! - Settlement against a finished race's payout ledger (hit, return, ROI)
//! - Loading of published race documents and payout strings
//!
//! # Example
//!
//! ```
//! use keiba::{AllocationService, BetCandidate, BetKind, PayoutEntry, PayoutLedger, PayoutRecord};
//!
//! let service = AllocationService::with_defaults();
//! let strategy = vec![BetCandidate::new(BetKind::Win, vec![4], 2.5, 1.1)];
//!
//! let ledger: PayoutLedger =
//!     std::iter::once(PayoutRecord::new(BetKind::Win, vec![PayoutEntry::new("4", 250)])).collect();
//!
//! let rec = service.recommend(1000, &strategy, &[], Some(&ledger)).unwrap();
//! assert_eq!(rec.allocations[0].amount, 1000);
//! assert_eq!(rec.settlement.unwrap().actual_return, 2500);
//! ```

pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use config::{load_config, AllocatorConfig};
pub use crate::core::{AllocationSummary, SettledAllocation, SettlementOutcome, StakeAllocator};
pub use error::AllocationError;
pub use models::{
    Allocation, BetCandidate, BetKind, PayoutEntry, PayoutLedger, PayoutRecord,
};
pub use service::{AllocationService, Recommendation};
