//! Settlement against a race's payout ledger
//!
//! A selection hits when it equals a published winning combination of its
//! bet kind. Ordered kinds compare the sequence as-is, unordered kinds
//! compare both sides sorted ascending.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::allocator::total_staked;
use crate::models::{Allocation, BetKind, PayoutEntry, PayoutLedger, PayoutRecord};

/// Settlement of a single allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettledAllocation {
    pub allocation: Allocation,
    pub hit: bool,
    pub actual_payout: i64,
}

impl SettledAllocation {
    pub fn profit(&self) -> i64 {
        self.actual_payout - self.allocation.amount
    }
}

/// Settlement of a whole allocation set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementOutcome {
    pub settled: Vec<SettledAllocation>,
    pub actual_return: i64,
    pub total_staked: i64,
    /// `actual_return / total_staked`, absent when nothing was staked
    pub roi: Option<f64>,
}

impl SettlementOutcome {
    pub fn hits(&self) -> impl Iterator<Item = &SettledAllocation> {
        self.settled.iter().filter(|s| s.hit)
    }

    pub fn hit_count(&self) -> usize {
        self.hits().count()
    }

    pub fn net_profit(&self) -> i64 {
        self.actual_return - self.total_staked
    }

    /// Return covers the stake
    pub fn is_profitable(&self) -> bool {
        self.total_staked > 0 && self.actual_return >= self.total_staked
    }

    pub fn roi_percent(&self) -> Option<f64> {
        self.roi.map(|r| r * 100.0)
    }
}

/// Normalise a published combination such as "7-3" for comparison
///
/// Returns `None` when any part is not a number.
pub fn published_key(kind: BetKind, published: &str) -> Option<String> {
    let numbers = published
        .split('-')
        .map(|part| part.trim().parse::<u32>().ok())
        .collect::<Option<Vec<u32>>>()?;
    Some(kind.selection_key(&numbers))
}

/// First entry of `record` matching the selection under the kind's ordering rule
///
/// Later duplicates of the same combination are ignored.
pub fn find_matching_entry<'a>(
    kind: BetKind,
    numbers: &[u32],
    record: &'a PayoutRecord,
) -> Option<&'a PayoutEntry> {
    let key = kind.selection_key(numbers);
    record
        .entries
        .iter()
        .find(|entry| published_key(kind, &entry.numbers).as_deref() == Some(key.as_str()))
}

/// Payout for a stake: `floor(amount × payout_per_100 / 100)`
pub fn calculate_payout(amount: i64, payout_per_100: i64) -> i64 {
    amount * payout_per_100 / 100
}

/// Settle one allocation; kinds missing from the ledger are misses
pub fn settle_allocation(allocation: &Allocation, ledger: &PayoutLedger) -> SettledAllocation {
    let candidate = &allocation.candidate;
    let entry = ledger
        .get(candidate.kind)
        .and_then(|record| find_matching_entry(candidate.kind, &candidate.numbers, record));

    let (hit, actual_payout) = match entry {
        Some(entry) => (true, calculate_payout(allocation.amount, entry.payout_per_100)),
        None => (false, 0),
    };

    if hit {
        debug!(
            kind = %candidate.kind,
            numbers = %candidate.numbers_label(),
            amount = allocation.amount,
            actual_payout,
            "Allocation hit"
        );
    }

    SettledAllocation {
        allocation: allocation.clone(),
        hit,
        actual_payout,
    }
}

/// Settle an allocation set against a payout ledger
pub fn settle(allocations: &[Allocation], ledger: &PayoutLedger) -> SettlementOutcome {
    let settled: Vec<SettledAllocation> = allocations
        .iter()
        .map(|a| settle_allocation(a, ledger))
        .collect();

    let actual_return: i64 = settled.iter().map(|s| s.actual_payout).sum();
    let total_staked = total_staked(allocations);
    let roi = if total_staked > 0 {
        Some(actual_return as f64 / total_staked as f64)
    } else {
        None
    };

    SettlementOutcome {
        settled,
        actual_return,
        total_staked,
        roi,
    }
}
