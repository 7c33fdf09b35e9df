//! Potential return range of an allocation set

use serde::{Deserialize, Serialize};

use crate::core::allocator::total_staked;
use crate::models::Allocation;

/// Best and worst case over which single allocation hits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub total_staked: i64,
    pub min_return: i64,
    pub max_return: i64,
    /// Every hit returns at least the total stake (no torigami)
    pub stake_covered: bool,
}

impl AllocationSummary {
    /// Summarise allocations; `None` when there is nothing to summarise
    pub fn from_allocations(allocations: &[Allocation]) -> Option<Self> {
        let min_return = allocations.iter().map(|a| a.potential_return).min()?;
        let max_return = allocations.iter().map(|a| a.potential_return).max()?;
        let total_staked = total_staked(allocations);

        Some(Self {
            total_staked,
            min_return,
            max_return,
            stake_covered: min_return >= total_staked,
        })
    }

    pub fn min_net_profit(&self) -> i64 {
        self.min_return - self.total_staked
    }

    pub fn max_net_profit(&self) -> i64 {
        self.max_return - self.total_staked
    }
}
