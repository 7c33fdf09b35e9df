//! Candidate pool selection
//!
//! Larger budgets unlock more candidates. The strategy pool keeps its
//! upstream ranking; when it is too short, the remaining slots are filled
//! from the backfill pool in descending expected-return order.

use tracing::debug;

use crate::config::AllocatorConfig;
use crate::models::BetCandidate;

/// Select the candidates to allocate for a budget
///
/// # Arguments
/// * `budget` - Total budget in yen
/// * `strategy_pool` - Strategy-ranked candidates, used first and in order
/// * `backfill_pool` - Extra candidates used when the strategy pool is short
/// * `config` - Pool sizing and backfill threshold
///
/// # Returns
/// At most `config.target_pool_size(budget)` candidates
pub fn select_pool(
    budget: i64,
    strategy_pool: &[BetCandidate],
    backfill_pool: &[BetCandidate],
    config: &AllocatorConfig,
) -> Vec<BetCandidate> {
    let target = config.target_pool_size(budget);

    if strategy_pool.len() >= target {
        debug!(target, available = strategy_pool.len(), "Truncating strategy pool");
        return strategy_pool[..target].to_vec();
    }

    let mut pool: Vec<BetCandidate> = strategy_pool.to_vec();

    let mut backfill: Vec<&BetCandidate> = backfill_pool
        .iter()
        .filter(|c| c.expected_return >= config.backfill_min_expected_return)
        .collect();
    // sort_by is stable, so ties keep their input order
    backfill.sort_by(|a, b| b.expected_return.total_cmp(&a.expected_return));

    for candidate in backfill {
        if pool.len() >= target {
            break;
        }
        if pool.iter().any(|c| c.same_selection(candidate)) {
            continue;
        }
        pool.push(candidate.clone());
    }

    debug!(
        target,
        strategy = strategy_pool.len(),
        backfilled = pool.len() - strategy_pool.len(),
        "Extended strategy pool from backfill"
    );

    pool.truncate(target);
    pool
}
