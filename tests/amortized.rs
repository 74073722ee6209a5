//! Amortized-cost check via the rebalancing counters.
//!
//! The counters in `blockdeque::profiling` are process-global atomics, so
//! this test runs alone in its own binary. Do not add further `#[test]`
//! functions here.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use blockdeque::profiling;
use blockdeque::BlockDeque;

/// Relink work over a whole workload must stay within a constant factor
/// of ops * sqrt(max_len), even though individual operations can trigger
/// an O(n) reconstruction.
#[test]
fn relink_work_is_amortized_sqrt() {
    let mut rng = StdRng::seed_from_u64(0x0b10c);
    let mut deque = BlockDeque::new();
    let mut ops: u64 = 0;

    profiling::reset();

    // Growth: end pushes only.
    for i in 0..10_000u32 {
        deque.push_back(i);
        ops += 1;
    }

    // Churn: random interior inserts and erasures at a steady size.
    for i in 0..10_000u32 {
        if i % 2 == 0 {
            let pos = rng.gen_range(0..=deque.len());
            let cursor = deque.cursor_at(pos).unwrap();
            deque.insert_at(cursor, i).unwrap();
        } else {
            let pos = rng.gen_range(0..deque.len());
            let cursor = deque.cursor_at(pos).unwrap();
            deque.erase_at(cursor).unwrap();
        }
        ops += 1;
    }
    let max_len = deque.len() as u64 + 1;

    // Shrink: drain from both ends, crossing the reconstruction
    // threshold many times on the way down.
    while !deque.is_empty() {
        if deque.len() % 2 == 0 {
            deque.pop_front().unwrap();
        } else {
            deque.pop_back().unwrap();
        }
        ops += 1;
    }

    let relinks = profiling::RELINK_COUNT.load(std::sync::atomic::Ordering::Relaxed);
    let bound = 8 * ops * max_len.isqrt();
    assert!(
        relinks <= bound,
        "relink work {} exceeds amortized bound {} ({})",
        relinks,
        bound,
        profiling::report(),
    );

    // Reconstruction fires rarely: a handful of times per size doubling
    // or halving, not per operation.
    let reconstructs =
        profiling::RECONSTRUCT_COUNT.load(std::sync::atomic::Ordering::Relaxed);
    assert!(
        reconstructs < 200,
        "reconstructed {} times over {} ops",
        reconstructs,
        ops,
    );
}
