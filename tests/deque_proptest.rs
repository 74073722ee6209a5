//! Property-based tests driving the container against a flat reference model.

use std::collections::VecDeque;

use proptest::prelude::*;

use blockdeque::{BlockDeque, Error};

// =============================================================================
// Test helpers
// =============================================================================

/// Generate a random editing operation
#[derive(Clone, Debug)]
enum EditOp {
    PushBack(u16),
    PushFront(u16),
    PopBack,
    PopFront,
    Insert { pos_pct: f64, value: u16 },
    Erase { pos_pct: f64 },
}

fn arbitrary_edit_op() -> impl Strategy<Value = EditOp> {
    prop_oneof![
        any::<u16>().prop_map(EditOp::PushBack),
        any::<u16>().prop_map(EditOp::PushFront),
        Just(EditOp::PopBack),
        Just(EditOp::PopFront),
        (0.0..=1.0f64, any::<u16>())
            .prop_map(|(pos_pct, value)| EditOp::Insert { pos_pct, value }),
        (0.0..=1.0f64).prop_map(|pos_pct| EditOp::Erase { pos_pct }),
    ]
}

/// Apply one operation to both the container and the reference model,
/// checking that the two agree on success and failure.
fn apply_edit(deque: &mut BlockDeque<u16>, model: &mut VecDeque<u16>, op: &EditOp) {
    let len = model.len();
    match op {
        EditOp::PushBack(value) => {
            deque.push_back(*value);
            model.push_back(*value);
        }
        EditOp::PushFront(value) => {
            deque.push_front(*value);
            model.push_front(*value);
        }
        EditOp::PopBack => {
            assert_eq!(deque.pop_back().ok(), model.pop_back());
        }
        EditOp::PopFront => {
            assert_eq!(deque.pop_front().ok(), model.pop_front());
        }
        EditOp::Insert { pos_pct, value } => {
            let pos = ((pos_pct * len as f64) as usize).min(len);
            let cursor = deque.cursor_at(pos).unwrap();
            deque.insert_at(cursor, *value).unwrap();
            model.insert(pos, *value);
        }
        EditOp::Erase { pos_pct } => {
            if len == 0 {
                return;
            }
            let pos = ((pos_pct * len as f64) as usize).min(len - 1);
            let cursor = deque.cursor_at(pos).unwrap();
            deque.erase_at(cursor).unwrap();
            model.remove(pos);
        }
    }
}

// =============================================================================
// Model equivalence
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// After any sequence of edits the container holds exactly the same
    /// values, in the same order, as the reference model.
    #[test]
    fn matches_reference_model(
        ops in prop::collection::vec(arbitrary_edit_op(), 1..200),
    ) {
        let mut deque = BlockDeque::new();
        let mut model = VecDeque::new();

        for op in &ops {
            apply_edit(&mut deque, &mut model, op);
            prop_assert_eq!(deque.len(), model.len());
        }

        let values: Vec<u16> = deque.iter().copied().collect();
        let expected: Vec<u16> = model.iter().copied().collect();
        prop_assert_eq!(values, expected);
    }

    /// Indexed reads agree with the model at every position.
    #[test]
    fn indexed_reads_match_model(
        ops in prop::collection::vec(arbitrary_edit_op(), 1..100),
    ) {
        let mut deque = BlockDeque::new();
        let mut model = VecDeque::new();

        for op in &ops {
            apply_edit(&mut deque, &mut model, op);
        }

        for (i, expected) in model.iter().enumerate() {
            prop_assert_eq!(deque.at(i), Ok(expected));
        }
        prop_assert_eq!(deque.at(model.len()), Err(Error::OutOfBounds));
    }

    /// Reverse iteration is the mirror of forward iteration.
    #[test]
    fn reverse_iteration_mirrors_forward(
        ops in prop::collection::vec(arbitrary_edit_op(), 1..100),
    ) {
        let mut deque = BlockDeque::new();
        let mut model = VecDeque::new();

        for op in &ops {
            apply_edit(&mut deque, &mut model, op);
        }

        let mut forward: Vec<u16> = deque.iter().copied().collect();
        let backward: Vec<u16> = deque.iter().rev().copied().collect();
        forward.reverse();
        prop_assert_eq!(forward, backward);
    }
}

// =============================================================================
// Cursor properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// advance(begin, i) lands on the element the model holds at i, and
    /// distance recovers the offset walked.
    #[test]
    fn advance_and_distance_agree(
        ops in prop::collection::vec(arbitrary_edit_op(), 1..80),
        pos_pct in 0.0..=1.0f64,
    ) {
        let mut deque = BlockDeque::new();
        let mut model = VecDeque::new();

        for op in &ops {
            apply_edit(&mut deque, &mut model, op);
        }

        let len = model.len();
        let pos = ((pos_pct * len as f64) as usize).min(len);

        let cursor = deque.advance(deque.begin(), pos as isize).unwrap();
        prop_assert_eq!(deque.distance(deque.begin(), cursor), Ok(pos as isize));
        prop_assert_eq!(deque.distance(cursor, deque.begin()), Ok(-(pos as isize)));

        match model.get(pos) {
            Some(expected) => prop_assert_eq!(deque.get(cursor), Ok(expected)),
            None => prop_assert_eq!(deque.get(cursor), Err(Error::InvalidPosition)),
        }

        // Walking back from the end reaches the same element.
        let back = (len - pos) as isize;
        let from_end = deque.advance(deque.end(), -back).unwrap();
        prop_assert_eq!(from_end, cursor);
    }

    /// Inserting then erasing at the returned cursor restores the sequence.
    #[test]
    fn insert_erase_round_trip(
        ops in prop::collection::vec(arbitrary_edit_op(), 1..80),
        pos_pct in 0.0..=1.0f64,
        value in any::<u16>(),
    ) {
        let mut deque = BlockDeque::new();
        let mut model = VecDeque::new();

        for op in &ops {
            apply_edit(&mut deque, &mut model, op);
        }

        let before: Vec<u16> = deque.iter().copied().collect();
        let len = deque.len();
        let pos = ((pos_pct * len as f64) as usize).min(len);

        let cursor = deque.cursor_at(pos).unwrap();
        let inserted = deque.insert_at(cursor, value).unwrap();
        prop_assert_eq!(deque.get(inserted), Ok(&value));

        deque.erase_at(inserted).unwrap();
        let after: Vec<u16> = deque.iter().copied().collect();
        prop_assert_eq!(before, after);
    }
}

// =============================================================================
// Structural properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// The chunk count stays within a constant factor of sqrt(len).
    #[test]
    fn chunk_count_tracks_sqrt_len(
        ops in prop::collection::vec(arbitrary_edit_op(), 50..300),
    ) {
        let mut deque = BlockDeque::new();
        let mut model = VecDeque::new();

        for op in &ops {
            apply_edit(&mut deque, &mut model, op);
        }

        let len = deque.len();
        if len > 16 {
            let target = len.isqrt() + 1;
            // Interior chunks hold at least half a target each; the two end
            // chunks may be arbitrarily small.
            let ceiling = (2 * len) / target + 3;
            prop_assert!(deque.chunk_count() <= ceiling);
        }
    }

    /// Cloning under churn preserves contents and leaves the source usable.
    #[test]
    fn clone_preserves_contents(
        ops in prop::collection::vec(arbitrary_edit_op(), 1..100),
    ) {
        let mut deque = BlockDeque::new();
        let mut model = VecDeque::new();

        for op in &ops {
            apply_edit(&mut deque, &mut model, op);
        }

        let copy = deque.clone();
        prop_assert_eq!(&copy, &deque);

        deque.push_back(u16::MAX);
        prop_assert_eq!(copy.len() + 1, deque.len());
    }
}
