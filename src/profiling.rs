//! Counters for rebalancing work.
//!
//! The amortized O(sqrt n) bound is checked by counting relink work rather
//! than timing it: every node or chunk relink performed by a split, merge,
//! or reconstruction bumps `RELINK_COUNT`. Counters are global, so tests
//! that assert on them must run alone in their own test binary.

use std::sync::atomic::{AtomicU64, Ordering};

pub static SPLIT_COUNT: AtomicU64 = AtomicU64::new(0);
pub static MERGE_COUNT: AtomicU64 = AtomicU64::new(0);
pub static RECONSTRUCT_COUNT: AtomicU64 = AtomicU64::new(0);
pub static RELINK_COUNT: AtomicU64 = AtomicU64::new(0);

#[inline]
pub fn split() {
    SPLIT_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn merge() {
    MERGE_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn reconstruct() {
    RECONSTRUCT_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn relink(count: u64) {
    RELINK_COUNT.fetch_add(count, Ordering::Relaxed);
}

pub fn reset() {
    SPLIT_COUNT.store(0, Ordering::Relaxed);
    MERGE_COUNT.store(0, Ordering::Relaxed);
    RECONSTRUCT_COUNT.store(0, Ordering::Relaxed);
    RELINK_COUNT.store(0, Ordering::Relaxed);
}

pub fn report() -> String {
    let splits = SPLIT_COUNT.load(Ordering::Relaxed);
    let merges = MERGE_COUNT.load(Ordering::Relaxed);
    let reconstructs = RECONSTRUCT_COUNT.load(Ordering::Relaxed);
    let relinks = RELINK_COUNT.load(Ordering::Relaxed);
    return format!(
        "Splits: {}, Merges: {}, Reconstructs: {}, Relink work: {}",
        splits, merges, reconstructs, relinks
    );
}
