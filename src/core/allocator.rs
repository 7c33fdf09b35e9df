//! Stake Allocation
//!
//! Splits a budget across a candidate pool in proportion to a damped edge
//! weight:
//!     w = max(expected_return, edge_floor) / sqrt(odds)
//!
//! Where:
//!     expected_return = odds × estimated hit probability (supplied upstream)
//!     edge_floor = minimum edge so weak candidates still get a stake
//!     sqrt(odds) = damping so long shots neither dominate nor vanish
//!
//! Every stake is a multiple of the minimum unit. The last candidate absorbs
//! the rounding remainder, so less than one unit of the budget is left over.
//! This is a heuristic split, not a Kelly-optimal one.

use tracing::debug;

use crate::config::AllocatorConfig;
use crate::error::AllocationError;
use crate::models::{Allocation, BetCandidate};

/// Calculate the allocation weight of a single candidate
///
/// # Arguments
/// * `expected_return` - Edge estimate (odds × probability)
/// * `odds` - Decimal odds, must be positive
/// * `edge_floor` - Lower bound applied to the edge
///
/// # Examples
/// ```
/// use keiba::core::allocator::calculate_weight;
/// let weight = calculate_weight(1.2, 4.0, 0.5); // 1.2 / 2
/// assert!((weight - 0.6).abs() < 1e-12);
/// ```
pub fn calculate_weight(expected_return: f64, odds: f64, edge_floor: f64) -> f64 {
    expected_return.max(edge_floor) / odds.sqrt()
}

/// Round a yen amount down to a multiple of `unit`
pub fn round_down_to_unit(amount: f64, unit: i64) -> i64 {
    (amount / unit as f64).floor() as i64 * unit
}

/// Proportional stake allocator
///
/// Holds only validated, immutable configuration; `allocate` is a pure
/// function of its arguments and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct StakeAllocator {
    config: AllocatorConfig,
}

impl StakeAllocator {
    pub fn new(config: AllocatorConfig) -> Result<Self, AllocationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Weights of every candidate, in pool order
    pub fn weights(&self, pool: &[BetCandidate]) -> Vec<f64> {
        pool.iter()
            .map(|c| calculate_weight(c.expected_return, c.odds, self.config.edge_floor))
            .collect()
    }

    /// Allocate `budget` across `pool`
    ///
    /// # Arguments
    /// * `budget` - Total budget in yen (validated by the caller)
    /// * `pool` - Candidates in priority order
    ///
    /// # Returns
    /// Allocations in pool order. Candidates left with a zero stake are
    /// omitted, and an empty pool yields an empty list.
    pub fn allocate(&self, budget: i64, pool: &[BetCandidate]) -> Vec<Allocation> {
        if pool.is_empty() {
            return Vec::new();
        }

        let unit = self.config.min_unit;
        let weights = self.weights(pool);
        let total_weight: f64 = weights.iter().sum();
        debug_assert!(total_weight > 0.0, "total weight must be positive");

        let last_index = pool.len() - 1;
        let mut remaining = budget;
        let mut allocations = Vec::with_capacity(pool.len());

        for (index, (candidate, weight)) in pool.iter().zip(&weights).enumerate() {
            let amount = if index == last_index {
                // Absorb the rounding remainder; under one unit means nothing
                if remaining >= unit {
                    (remaining / unit) * unit
                } else {
                    0
                }
            } else {
                let share = budget as f64 * (weight / total_weight);
                round_down_to_unit(share, unit).max(unit)
            };

            if amount > 0 && amount <= remaining {
                remaining -= amount;
                debug_assert!(remaining >= 0, "remaining budget went negative");

                debug!(
                    kind = %candidate.kind,
                    numbers = %candidate.numbers_label(),
                    weight,
                    amount,
                    remaining,
                    "Allocated stake"
                );
                allocations.push(Allocation::new(candidate.clone(), amount));
            } else {
                debug!(
                    kind = %candidate.kind,
                    numbers = %candidate.numbers_label(),
                    amount,
                    remaining,
                    "Skipped candidate"
                );
            }
        }

        allocations
    }
}

/// Total stake of an allocation set
pub fn total_staked(allocations: &[Allocation]) -> i64 {
    allocations.iter().map(|a| a.amount).sum()
}
