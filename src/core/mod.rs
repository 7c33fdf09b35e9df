//! Core allocation and settlement logic

pub mod allocator;
pub mod pool;
pub mod settlement;
pub mod summary;

// Re-export commonly used types
pub use allocator::{calculate_weight, total_staked, StakeAllocator};
pub use pool::select_pool;
pub use settlement::{settle, SettledAllocation, SettlementOutcome};
pub use summary::AllocationSummary;
