//! Allocation service
//!
//! Single entry point for callers: pick a pool for the budget, split the
//! budget across it, and settle the result once the race is finished. All
//! selection state (race, strategy, budget) is passed in per call.
//!
//! # Example
//!
//! ```
//! use keiba::{AllocationService, BetCandidate, BetKind};
//!
//! let service = AllocationService::with_defaults();
//! let strategy = vec![
//!     BetCandidate::new(BetKind::Win, vec![4], 2.0, 1.2),
//!     BetCandidate::new(BetKind::Quinella, vec![4, 9], 5.0, 0.9),
//!     BetCandidate::new(BetKind::Trio, vec![2, 4, 9], 10.0, 0.6),
//! ];
//!
//! let pool = service.select_pool(6000, &strategy, &[]);
//! let allocations = service.allocate(6000, &pool).unwrap();
//! assert_eq!(allocations.iter().map(|a| a.amount).sum::<i64>(), 6000);
//! ```

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AllocatorConfig;
use crate::core::{select_pool, settle, AllocationSummary, SettlementOutcome, StakeAllocator};
use crate::error::{validate_budget, validate_pool, AllocationError};
use crate::models::{Allocation, BetCandidate, PayoutLedger};

/// Full recommendation for one race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub budget: i64,
    pub allocations: Vec<Allocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<AllocationSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement: Option<SettlementOutcome>,
}

impl Recommendation {
    /// No candidate received a stake
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }
}

/// Orchestrates pool selection, allocation and settlement
#[derive(Debug, Clone, Default)]
pub struct AllocationService {
    allocator: StakeAllocator,
}

impl AllocationService {
    pub fn new(config: AllocatorConfig) -> Result<Self, AllocationError> {
        Ok(Self {
            allocator: StakeAllocator::new(config)?,
        })
    }

    /// Create with the default tuning constants
    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &AllocatorConfig {
        self.allocator.config()
    }

    /// Candidates to allocate for `budget`
    pub fn select_pool(
        &self,
        budget: i64,
        strategy_pool: &[BetCandidate],
        backfill_pool: &[BetCandidate],
    ) -> Vec<BetCandidate> {
        select_pool(budget, strategy_pool, backfill_pool, self.config())
    }

    /// Split `budget` across `pool`
    ///
    /// Fails with `InvalidBudget` below the minimum unit and with
    /// `InvalidCandidate` for malformed candidates. An empty pool is not an
    /// error and yields no allocations.
    pub fn allocate(
        &self,
        budget: i64,
        pool: &[BetCandidate],
    ) -> Result<Vec<Allocation>, AllocationError> {
        validate_budget(budget, self.config().min_unit)?;
        validate_pool(pool)?;
        Ok(self.allocator.allocate(budget, pool))
    }

    /// Settle allocations against a finished race's ledger
    pub fn settle(&self, allocations: &[Allocation], ledger: &PayoutLedger) -> SettlementOutcome {
        settle(allocations, ledger)
    }

    /// Select, allocate, summarise and (with a ledger) settle in one call
    pub fn recommend(
        &self,
        budget: i64,
        strategy_pool: &[BetCandidate],
        backfill_pool: &[BetCandidate],
        ledger: Option<&PayoutLedger>,
    ) -> Result<Recommendation, AllocationError> {
        validate_budget(budget, self.config().min_unit)?;

        let pool = self.select_pool(budget, strategy_pool, backfill_pool);
        let allocations = self.allocate(budget, &pool)?;
        let summary = AllocationSummary::from_allocations(&allocations);
        let settlement = ledger.map(|l| self.settle(&allocations, l));

        info!(
            budget,
            pool = pool.len(),
            allocations = allocations.len(),
            settled = settlement.is_some(),
            "Recommendation computed"
        );

        Ok(Recommendation {
            budget,
            allocations,
            summary,
            settlement,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BetKind, PayoutEntry, PayoutRecord};

    fn strategy() -> Vec<BetCandidate> {
        vec![
            BetCandidate::new(BetKind::Win, vec![4], 2.0, 1.2),
            BetCandidate::new(BetKind::Quinella, vec![3, 7], 5.0, 0.9),
            BetCandidate::new(BetKind::Trio, vec![3, 4, 7], 10.0, 0.6),
        ]
    }

    #[test]
    fn test_allocate_rejects_small_budget() {
        let service = AllocationService::with_defaults();
        let err = service.allocate(99, &strategy()).unwrap_err();
        assert_eq!(err, AllocationError::InvalidBudget { budget: 99, min: 100 });
    }

    #[test]
    fn test_allocate_rejects_invalid_candidate() {
        let service = AllocationService::with_defaults();
        let pool = vec![BetCandidate::new(BetKind::Win, vec![4], 0.0, 1.2)];
        assert!(matches!(
            service.allocate(1000, &pool),
            Err(AllocationError::InvalidCandidate(_))
        ));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = AllocatorConfig {
            min_unit: 0,
            ..Default::default()
        };
        assert!(AllocationService::new(config).is_err());
    }

    #[test]
    fn test_recommend_without_ledger() {
        let service = AllocationService::with_defaults();
        let rec = service.recommend(6000, &strategy(), &[], None).unwrap();

        let amounts: Vec<i64> = rec.allocations.iter().map(|a| a.amount).collect();
        assert_eq!(amounts, vec![3500, 1600, 900]);
        assert!(rec.summary.is_some());
        assert!(rec.settlement.is_none());
    }

    #[test]
    fn test_recommend_with_ledger() {
        let service = AllocationService::with_defaults();
        let ledger: PayoutLedger = vec![
            PayoutRecord::new(BetKind::Win, vec![PayoutEntry::new("4", 250)]),
            PayoutRecord::new(BetKind::Quinella, vec![PayoutEntry::new("7-3", 1840)]),
        ]
        .into_iter()
        .collect();

        let rec = service.recommend(6000, &strategy(), &[], Some(&ledger)).unwrap();
        let settlement = rec.settlement.unwrap();

        // 3500 × 2.5 + 1600 × 18.4
        assert_eq!(settlement.actual_return, 8750 + 29_440);
        assert_eq!(settlement.hit_count(), 2);
        assert_eq!(settlement.total_staked, 6000);
    }

    #[test]
    fn test_recommend_empty_pools() {
        let service = AllocationService::with_defaults();
        let rec = service
            .recommend(10_000, &[], &[], Some(&PayoutLedger::new()))
            .unwrap();

        assert!(rec.is_empty());
        assert!(rec.summary.is_none());
        assert!(rec.settlement.unwrap().roi.is_none());
    }
}
