//! Property-Based Tests - Allocation and Settlement Invariants
//!
//! Uses `proptest` to check that stake allocation and settlement hold their
//! invariants across random budgets and candidate pools.

use proptest::prelude::*;

use keiba::core::settlement::calculate_payout;
use keiba::{
    AllocationService, AllocatorConfig, BetCandidate, BetKind, PayoutEntry, PayoutLedger,
    PayoutRecord, StakeAllocator,
};

fn arb_kind() -> impl Strategy<Value = BetKind> {
    prop::sample::select(BetKind::ALL.to_vec())
}

fn arb_candidate() -> impl Strategy<Value = BetCandidate> {
    (
        arb_kind(),
        prop::collection::vec(1u32..=18, 1..=3),
        1.1f64..500.0,
        0.0f64..3.0,
    )
        .prop_map(|(kind, numbers, odds, ev)| BetCandidate::new(kind, numbers, odds, ev))
}

fn arb_pool() -> impl Strategy<Value = Vec<BetCandidate>> {
    prop::collection::vec(arb_candidate(), 1..=20)
}

// ── Allocation Properties ───────────────────────────────────

proptest! {
    /// Stakes never exceed the budget and leave less than one unit unused.
    #[test]
    fn allocation_conserves_budget(budget in 100i64..200_000, pool in arb_pool()) {
        let allocator = StakeAllocator::default();
        let allocations = allocator.allocate(budget, &pool);
        let total: i64 = allocations.iter().map(|a| a.amount).sum();

        prop_assert!(total <= budget, "staked {total} of {budget}");
        prop_assert!(budget - total < 100, "left {} unstaked", budget - total);
    }

    /// Every stake is a positive multiple of the minimum unit.
    #[test]
    fn allocation_uses_whole_units(budget in 100i64..200_000, pool in arb_pool()) {
        let allocations = StakeAllocator::default().allocate(budget, &pool);

        for alloc in &allocations {
            prop_assert!(alloc.amount >= 100, "stake {} below minimum", alloc.amount);
            prop_assert_eq!(alloc.amount % 100, 0);
        }
    }

    /// Allocations follow pool order and never outnumber the pool.
    #[test]
    fn allocation_preserves_pool_order(budget in 100i64..200_000, pool in arb_pool()) {
        let allocations = StakeAllocator::default().allocate(budget, &pool);
        prop_assert!(allocations.len() <= pool.len());

        let mut cursor = 0;
        for alloc in &allocations {
            let position = pool[cursor..]
                .iter()
                .position(|c| *c == alloc.candidate)
                .map(|p| p + cursor);
            prop_assert!(position.is_some(), "allocation out of pool order");
            cursor = position.unwrap_or(cursor) + 1;
        }
    }

    /// Potential return is the stake times the odds, rounded down.
    #[test]
    fn potential_return_is_floored(budget in 100i64..100_000, pool in arb_pool()) {
        for alloc in StakeAllocator::default().allocate(budget, &pool) {
            let exact = alloc.amount as f64 * alloc.candidate.odds;
            prop_assert_eq!(alloc.potential_return, exact.floor() as i64);
        }
    }

    /// The same inputs always yield the same allocations.
    #[test]
    fn allocation_is_deterministic(budget in 100i64..100_000, pool in arb_pool()) {
        let allocator = StakeAllocator::default();
        prop_assert_eq!(allocator.allocate(budget, &pool), allocator.allocate(budget, &pool));
    }
}

// ── Pool Selection Properties ───────────────────────────────

proptest! {
    /// Pool size stays within the configured bounds.
    #[test]
    fn pool_size_bounded(
        budget in 100i64..500_000,
        strategy in prop::collection::vec(arb_candidate(), 0..30),
        backfill in prop::collection::vec(arb_candidate(), 0..30),
    ) {
        let config = AllocatorConfig::default();
        let service = AllocationService::with_defaults();
        let pool = service.select_pool(budget, &strategy, &backfill);

        prop_assert!(pool.len() <= config.target_pool_size(budget));
        prop_assert!(pool.len() <= config.max_pool_size);
    }

    /// A larger budget never unlocks fewer slots.
    #[test]
    fn pool_size_monotonic(low in 0i64..200_000, extra in 0i64..200_000) {
        let config = AllocatorConfig::default();
        let small = config.target_pool_size(low);
        let large = config.target_pool_size(low + extra);

        prop_assert!(large >= small, "size({}) = {large} < size({low}) = {small}", low + extra);
        prop_assert!((3..=20).contains(&small));
    }

    /// The strategy pool always leads the selected pool, in order.
    #[test]
    fn strategy_pool_leads(
        budget in 100i64..100_000,
        strategy in prop::collection::vec(arb_candidate(), 0..10),
        backfill in prop::collection::vec(arb_candidate(), 0..10),
    ) {
        let service = AllocationService::with_defaults();
        let pool = service.select_pool(budget, &strategy, &backfill);
        let kept = strategy.len().min(pool.len());

        prop_assert_eq!(&pool[..kept], &strategy[..kept]);
    }
}

// ── Settlement Properties ───────────────────────────────────

proptest! {
    /// Payouts scale the stake by the published amount per 100 yen.
    #[test]
    fn payout_matches_unit_price(units in 1i64..1000, payout_per_100 in 100i64..1_000_000) {
        prop_assert_eq!(calculate_payout(units * 100, payout_per_100), units * payout_per_100);
    }

    /// Unordered kinds hit regardless of the published order.
    #[test]
    fn unordered_kinds_ignore_order(a in 1u32..=18, b in 1u32..=18, c in 1u32..=18) {
        let published = format!("{}-{}-{}", c, a, b);
        let ledger: PayoutLedger = std::iter::once(PayoutRecord::new(
            BetKind::Trio,
            vec![PayoutEntry::new(published, 5000)],
        ))
        .collect();

        let service = AllocationService::with_defaults();
        let candidate = BetCandidate::new(BetKind::Trio, vec![a, b, c], 50.0, 1.0);
        let allocations = service.allocate(1000, &[candidate]).unwrap();
        let outcome = service.settle(&allocations, &ledger);

        prop_assert_eq!(outcome.hit_count(), 1);
        prop_assert_eq!(outcome.actual_return, 50_000);
    }
}

// ── Worked Examples ─────────────────────────────────────────

fn ledger() -> PayoutLedger {
    vec![
        PayoutRecord::new(BetKind::Win, vec![PayoutEntry::new("4", 250)]),
        PayoutRecord::new(BetKind::Quinella, vec![PayoutEntry::new("7-3", 1840)]),
        PayoutRecord::new(BetKind::Exacta, vec![PayoutEntry::new("3-7", 3120)]),
    ]
    .into_iter()
    .collect()
}

#[test]
fn end_to_end_recommendation() {
    let service = AllocationService::with_defaults();
    let strategy = vec![
        BetCandidate::new(BetKind::Win, vec![4], 2.0, 1.2),
        BetCandidate::new(BetKind::Quinella, vec![3, 7], 5.0, 0.9),
        BetCandidate::new(BetKind::Trio, vec![3, 4, 7], 10.0, 0.6),
    ];

    let rec = service.recommend(6000, &strategy, &[], Some(&ledger())).unwrap();
    let amounts: Vec<i64> = rec.allocations.iter().map(|a| a.amount).collect();
    assert_eq!(amounts, vec![3500, 1600, 900]);

    let summary = rec.summary.unwrap();
    assert_eq!(summary.total_staked, 6000);
    assert_eq!(summary.min_return, 7000);
    assert_eq!(summary.max_return, 9000);

    let settlement = rec.settlement.unwrap();
    assert_eq!(settlement.actual_return, 8750 + 29_440);
    assert_eq!(settlement.hit_count(), 2);
    assert!(settlement.is_profitable());
}

#[test]
fn exacta_requires_published_order() {
    let service = AllocationService::with_defaults();
    let reversed = BetCandidate::new(BetKind::Exacta, vec![7, 3], 30.0, 1.0);
    let straight = BetCandidate::new(BetKind::Exacta, vec![3, 7], 30.0, 1.0);

    let miss = service.allocate(500, &[reversed]).unwrap();
    let hit = service.allocate(500, &[straight]).unwrap();

    assert_eq!(service.settle(&miss, &ledger()).actual_return, 0);
    assert_eq!(service.settle(&hit, &ledger()).actual_return, 15_600);
}

#[test]
fn nothing_staked_has_no_roi() {
    let service = AllocationService::with_defaults();
    let outcome = service.settle(&[], &ledger());

    assert_eq!(outcome.total_staked, 0);
    assert!(outcome.roi.is_none());
}
