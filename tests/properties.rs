use std::collections::HashSet;

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use sevenseg::{solve, DecodeError, Segment, SegmentSet, Solution, DIGITS};

fn scramble(wires: &[Segment], shape: SegmentSet) -> SegmentSet {
    shape.iter().map(|seg| wires[seg.index()]).collect()
}

/// The scrambled segment for each real segment.
fn wires() -> impl Strategy<Value = Vec<Segment>> {
    Just(Segment::ALL.to_vec()).prop_shuffle()
}

/// The order in which the digits' patterns are listed.
fn digit_order() -> impl Strategy<Value = Vec<usize>> {
    Just((0..10).collect::<Vec<usize>>()).prop_shuffle()
}

fn observe(wires: &[Segment], order: &[usize]) -> Vec<SegmentSet> {
    order.iter().map(|d| scramble(wires, DIGITS[*d])).collect()
}

fn solved(observed: &[SegmentSet]) -> Result<Solution, TestCaseError> {
    solve(observed).map_err(|e| TestCaseError::fail(e.to_string()))
}

proptest! {
    #[test]
    fn every_wiring_is_recovered(wires in wires(), order in digit_order()) {
        let solution = solved(&observe(&wires, &order))?;
        let mut seen: HashSet<u8> = HashSet::new();
        for (digit, shape) in DIGITS.iter().enumerate() {
            let found = solution.digit(scramble(&wires, *shape));
            prop_assert_eq!(found, Some(digit as u8));
            seen.insert(digit as u8);
        }
        prop_assert_eq!(seen.len(), 10);
        for seg in Segment::ALL {
            prop_assert_eq!(solution.wiring().scrambled(seg), wires[seg.index()]);
        }
    }

    #[test]
    fn order_does_not_matter(
        wires in wires(),
        first in digit_order(),
        second in digit_order(),
    ) {
        let a = solved(&observe(&wires, &first))?;
        let b = solved(&observe(&wires, &second))?;
        prop_assert_eq!(&a, &b);
        // And solving again changes nothing.
        prop_assert_eq!(solved(&observe(&wires, &first))?, a);
    }

    #[test]
    fn wiring_reproduces_observed_patterns(wires in wires(), order in digit_order()) {
        let observed = observe(&wires, &order);
        let solution = solved(&observed)?;
        let rebuilt: HashSet<SegmentSet> = DIGITS
            .iter()
            .map(|shape| solution.wiring().scramble(*shape))
            .collect();
        let expected: HashSet<SegmentSet> = observed.iter().copied().collect();
        prop_assert_eq!(rebuilt, expected);
    }

    #[test]
    fn readout_is_decoded_in_order(
        wires in wires(),
        order in digit_order(),
        readout in prop::collection::vec(0usize..10, 1..8),
    ) {
        let solution = solved(&observe(&wires, &order))?;
        let scrambled: Vec<SegmentSet> = readout
            .iter()
            .map(|d| scramble(&wires, DIGITS[*d]))
            .collect();
        let expected = readout.iter().fold(0u64, |n, d| n * 10 + *d as u64);
        prop_assert_eq!(solution.decode(&scrambled), Ok(expected));
    }

    #[test]
    fn missing_patterns_are_unsolvable(
        wires in wires(),
        order in digit_order(),
        keep in 0usize..10,
    ) {
        let observed = observe(&wires, &order[..keep]);
        prop_assert!(matches!(solve(&observed), Err(DecodeError::UnsolvablePuzzle(_))));
    }

    #[test]
    fn repeated_patterns_are_unsolvable(
        wires in wires(),
        order in digit_order(),
        from in 0usize..10,
        to in 0usize..10,
    ) {
        prop_assume!(from != to);
        let mut observed = observe(&wires, &order);
        observed[to] = observed[from];
        prop_assert!(matches!(solve(&observed), Err(DecodeError::UnsolvablePuzzle(_))));
        // An eleventh pattern, even a repeat, is no better.
        let mut observed = observe(&wires, &order);
        observed.push(observed[from]);
        prop_assert!(matches!(solve(&observed), Err(DecodeError::UnsolvablePuzzle(_))));
    }
}
