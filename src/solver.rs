use std::collections::HashSet;

use tracing::{event, span, Level};

use crate::error::DecodeError;
use crate::segments::{Segment, SegmentSet, DIGITS};

/// The scrambled segment wired to each of the real segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wiring {
    /// Mapping from true segment to scrambled segment.
    scrambled: [Segment; 7],
    /// Mapping from scrambled segment to true segment.
    real: [Segment; 7],
}

impl Wiring {
    /// The scrambled segment which lights real segment `seg`.
    pub fn scrambled(&self, seg: Segment) -> Segment {
        self.scrambled[seg.index()]
    }

    /// The real segment lit by scrambled segment `seg`.
    pub fn unscrambled(&self, seg: Segment) -> Segment {
        self.real[seg.index()]
    }

    pub fn scramble(&self, segments: SegmentSet) -> SegmentSet {
        segments.iter().map(|seg| self.scrambled(seg)).collect()
    }

    pub fn unscramble(&self, segments: SegmentSet) -> SegmentSet {
        segments.iter().map(|seg| self.unscrambled(seg)).collect()
    }
}

/// The decoded form of one puzzle's ten observed patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    // The observed shape of each digit, indexed by digit value.
    shapes: [SegmentSet; 10],
    wiring: Wiring,
}

impl Solution {
    /// The digit shown by an observed pattern.
    pub fn digit(&self, observed: SegmentSet) -> Option<u8> {
        self.iter()
            .find(|(shape, _)| *shape == observed)
            .map(|(_, digit)| digit)
    }

    /// The observed pattern for `digit`.
    pub fn shape(&self, digit: u8) -> Option<SegmentSet> {
        self.shapes.get(digit as usize).copied()
    }

    pub fn wiring(&self) -> &Wiring {
        &self.wiring
    }

    /// Observed pattern and digit pairs, in digit order.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentSet, u8)> + '_ {
        self.shapes
            .iter()
            .enumerate()
            .map(|(digit, shape)| (*shape, digit as u8))
    }

    pub fn decode_digits(&self, readout: &[SegmentSet]) -> Result<Vec<u8>, DecodeError> {
        readout
            .iter()
            .map(|pattern| {
                self.digit(*pattern)
                    .ok_or(DecodeError::UnknownPattern(*pattern))
            })
            .collect()
    }

    /// Decodes the readout as a number, most significant digit first.
    pub fn decode(&self, readout: &[SegmentSet]) -> Result<u64, DecodeError> {
        readout_value(&self.decode_digits(readout)?)
    }
}

/// Scratch state of a single solve.
struct Deduction {
    matched_digits: [Option<SegmentSet>; 10],
    matched_segments: [Option<Segment>; 7],
    /// Observed patterns not yet matched to a digit.
    pool: Vec<SegmentSet>,
}

impl Deduction {
    fn new() -> Deduction {
        Deduction {
            matched_digits: [None; 10],
            matched_segments: [None; 7],
            pool: Vec::with_capacity(6),
        }
    }

    fn digit(&self, digit: u8) -> Result<SegmentSet, DecodeError> {
        self.matched_digits[digit as usize].ok_or_else(|| {
            DecodeError::UnsolvablePuzzle(format!("digit {} has not been identified", digit))
        })
    }

    fn segment(&self, seg: Segment) -> Result<SegmentSet, DecodeError> {
        self.matched_segments[seg.index()]
            .map(SegmentSet::from)
            .ok_or_else(|| {
                DecodeError::UnsolvablePuzzle(format!(
                    "segment {} has not been identified",
                    seg
                ))
            })
    }

    fn identify_digit(&mut self, digit: u8, shape: SegmentSet) -> Result<(), DecodeError> {
        if let Some(existing) = self.matched_digits[digit as usize] {
            return Err(DecodeError::UnsolvablePuzzle(format!(
                "digit {} matches both {} and {}",
                digit, existing, shape
            )));
        }
        event!(Level::DEBUG, "digit {} is shown as {}", digit, shape);
        self.matched_digits[digit as usize] = Some(shape);
        Ok(())
    }

    fn identify_segment(&mut self, real: Segment, scrambled: Segment) -> Result<(), DecodeError> {
        if let Some(existing) = self.matched_segments[real.index()] {
            return Err(DecodeError::UnsolvablePuzzle(format!(
                "segment {} is wired to both {} and {}",
                real, existing, scrambled
            )));
        }
        event!(
            Level::DEBUG,
            "segment {} is wired to scrambled segment {}",
            real.letter().to_ascii_uppercase(),
            scrambled,
        );
        self.matched_segments[real.index()] = Some(scrambled);
        Ok(())
    }

    /// Removes the first pool member for which `test` yields something
    /// and returns it together with what `test` yielded.
    fn take_from_pool<T, F>(
        &mut self,
        what: &str,
        test: F,
    ) -> Result<(SegmentSet, T), DecodeError>
    where
        F: Fn(SegmentSet) -> Option<T>,
    {
        let found = self
            .pool
            .iter()
            .enumerate()
            .find_map(|(pos, candidate)| test(*candidate).map(|t| (pos, *candidate, t)));
        match found {
            Some((pos, candidate, t)) => {
                self.pool = self
                    .pool
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != pos)
                    .map(|(_, p)| *p)
                    .collect();
                Ok((candidate, t))
            }
            None => Err(DecodeError::UnsolvablePuzzle(format!(
                "no unmatched pattern qualifies as {} (unmatched: {})",
                what,
                describe(&self.pool),
            ))),
        }
    }

    /// Match the digits whose segment count is unique: 1, 4, 7 and 8.
    fn find_easy_digits(&mut self, observed: &[SegmentSet]) -> Result<(), DecodeError> {
        for pattern in observed {
            match easy_digit(*pattern) {
                Some(digit) => self.identify_digit(digit, *pattern)?,
                None => self.pool.push(*pattern),
            }
        }
        if self.pool.len() != 6 {
            return Err(DecodeError::UnsolvablePuzzle(format!(
                "expected 4 patterns identifiable by length alone, got {}",
                observed.len() - self.pool.len()
            )));
        }
        Ok(())
    }

    fn deduce_other_digits(&mut self) -> Result<(), DecodeError> {
        // {A} = [7] - [1]
        let a = self.digit(7)?.difference([self.digit(1)?]).must_one("A")?;
        self.identify_segment(Segment::A, a)?;

        // [3] - [7] = {D, G}.  No other 5 or 6 segment digit has
        // exactly two segments outside 7.  3 also lights all of 7.
        let seven = self.digit(7)?;
        let (three, ()) = self.take_from_pool("3", |p| {
            (p.difference([seven]).len() == 2 && p.overlap(seven) == seven.len()).then_some(())
        })?;
        self.identify_digit(3, three)?;

        // [9] - [3] = {B}
        let (nine, b) = self.take_from_pool("9", |p| only_segment(p.difference([three])))?;
        self.identify_digit(9, nine)?;
        self.identify_segment(Segment::B, b)?;

        // {E} = [8] - [9]
        let e = self.digit(8)?.difference([nine]).must_one("E")?;
        self.identify_segment(Segment::E, e)?;

        // {D} = [4] - [1] - {B}
        let d = self
            .digit(4)?
            .difference([self.digit(1)?, self.segment(Segment::B)?])
            .must_one("D")?;
        self.identify_segment(Segment::D, d)?;

        // {G} = [8] - [1] - {A} - {B} - {D} - {E}
        let g = self
            .digit(8)?
            .difference([
                self.digit(1)?,
                self.segment(Segment::A)?,
                self.segment(Segment::B)?,
                self.segment(Segment::D)?,
                self.segment(Segment::E)?,
            ])
            .must_one("G")?;
        self.identify_segment(Segment::G, g)?;

        // {F} = [6] - {A} - {B} - {D} - {E} - {G}
        let abdeg: Vec<SegmentSet> = [Segment::A, Segment::B, Segment::D, Segment::E, Segment::G]
            .into_iter()
            .map(|seg| self.segment(seg))
            .collect::<Result<_, _>>()?;
        let (six, f) =
            self.take_from_pool("6", |p| only_segment(p.difference(abdeg.iter().copied())))?;
        self.identify_digit(6, six)?;
        self.identify_segment(Segment::F, f)?;

        // {C} = [1] - {F}
        let c = self
            .digit(1)?
            .difference([self.segment(Segment::F)?])
            .must_one("C")?;
        self.identify_segment(Segment::C, c)?;

        // [5] = [6] - {E}
        let e_set = self.segment(Segment::E)?;
        let (five, ()) =
            self.take_from_pool("5", |p| (p.difference([e_set]) == six).then_some(()))?;
        self.identify_digit(5, five)?;

        // [0] = [8] - {D}
        let zero_shape = self.digit(8)?.difference([self.segment(Segment::D)?]);
        let (zero, ()) = self.take_from_pool("0", |p| (p == zero_shape).then_some(()))?;
        self.identify_digit(0, zero)?;

        // [2] is all that is left.
        let (two, ()) = self.take_from_pool("2", |_| Some(()))?;
        self.identify_digit(2, two)?;

        if !self.pool.is_empty() {
            return Err(DecodeError::UnsolvablePuzzle(format!(
                "left with unmatched patterns: {}",
                describe(&self.pool)
            )));
        }
        Ok(())
    }

    fn finish(self) -> Result<Solution, DecodeError> {
        let mut shapes = [SegmentSet::EMPTY; 10];
        for (digit, matched) in self.matched_digits.iter().enumerate() {
            match matched {
                Some(shape) => shapes[digit] = *shape,
                None => {
                    return Err(DecodeError::UnsolvablePuzzle(format!(
                        "digit {} was never identified",
                        digit
                    )));
                }
            }
        }
        let mut scrambled = [Segment::A; 7];
        for (real, matched) in Segment::ALL.iter().zip(self.matched_segments.iter()) {
            match matched {
                Some(seg) => scrambled[real.index()] = *seg,
                None => {
                    return Err(DecodeError::UnsolvablePuzzle(format!(
                        "segment {} was never identified",
                        real
                    )));
                }
            }
        }
        if scrambled.iter().copied().collect::<SegmentSet>() != SegmentSet::ALL {
            return Err(DecodeError::UnsolvablePuzzle(format!(
                "two segments share a wire: {:?}",
                scrambled
            )));
        }
        let mut real = [Segment::A; 7];
        for seg in Segment::ALL {
            real[scrambled[seg.index()].index()] = seg;
        }
        let wiring = Wiring { scrambled, real };

        // The deductions only look at some of the segments of each
        // digit, so check that the wiring really does explain every
        // pattern.
        for (digit, shape) in shapes.iter().enumerate() {
            if wiring.scramble(DIGITS[digit]) != *shape {
                return Err(DecodeError::UnsolvablePuzzle(format!(
                    "pattern {} was deduced to be {}, but wiring gives {}",
                    shape,
                    digit,
                    wiring.scramble(DIGITS[digit]),
                )));
            }
        }
        Ok(Solution { shapes, wiring })
    }
}

/// The number shown by decoded readout digits, most significant first.
pub fn readout_value(digits: &[u8]) -> Result<u64, DecodeError> {
    digits.iter().try_fold(0_u64, |number, digit| {
        number
            .checked_mul(10)
            .and_then(|n| n.checked_add(u64::from(*digit)))
            .ok_or(DecodeError::ReadoutTooLong(digits.len()))
    })
}

fn only_segment(set: SegmentSet) -> Option<Segment> {
    match set.count_segments() {
        (Some(seg), 1) => Some(seg),
        _ => None,
    }
}

fn describe(patterns: &[SegmentSet]) -> String {
    patterns
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The digit shown by a pattern, if its segment count alone tells us.
///
/// | Segment count | Digit |
/// | ------------- | ----- |
/// | 2             | 1     |
/// | 3             | 7     |
/// | 4             | 4     |
/// | 7             | 8     |
pub fn easy_digit(pattern: SegmentSet) -> Option<u8> {
    match pattern.len() {
        2 => Some(1),
        3 => Some(7),
        4 => Some(4),
        7 => Some(8),
        _ => None,
    }
}

/// Work out which digit each of ten scrambled patterns shows.
///
/// The digits 1, 4, 7 and 8 are identified by their segment counts.
/// The others (0, 2, 3, 5, 6, 9 all have 5 or 6 segments) are found
/// by a fixed chain of set differences, each of which relies on
/// digits or segments found by earlier ones:
///
/// | Finds  | From                          |
/// | ------ | ----------------------------- |
/// | A      | `[7] - [1]`                   |
/// | 3      | `[3] - [7]` has 2 segments    |
/// | 9, B   | `[9] - [3]` has 1 segment     |
/// | E      | `[8] - [9]`                   |
/// | D      | `[4] - [1] - B`               |
/// | G      | `[8] - [1] - A - B - D - E`   |
/// | 6, F   | `[6] - A - B - D - E - G`     |
/// | C      | `[1] - F`                     |
/// | 5      | `[5] - E` is `[6]`            |
/// | 0      | `[8] - D`                     |
/// | 2      | whatever is left              |
///
/// The order of these steps matters.
pub fn solve(observed: &[SegmentSet]) -> Result<Solution, DecodeError> {
    let span = span!(Level::TRACE, "solve", patterns = %describe(observed));
    let _enter = span.enter();

    let distinct: HashSet<SegmentSet> = observed.iter().copied().collect();
    if observed.len() != 10 || distinct.len() != 10 {
        return Err(DecodeError::UnsolvablePuzzle(format!(
            "expected 10 distinct patterns, got {} ({} distinct)",
            observed.len(),
            distinct.len(),
        )));
    }

    let mut deduction = Deduction::new();
    deduction.find_easy_digits(observed)?;
    deduction.deduce_other_digits()?;
    let solution = deduction.finish()?;
    event!(Level::TRACE, "solved: {:?}", solution);
    Ok(solution)
}

#[cfg(test)]
fn patterns(s: &str) -> Vec<SegmentSet> {
    s.split_whitespace()
        .map(|token| token.parse().expect("valid test pattern"))
        .collect()
}

#[cfg(test)]
const EXAMPLE: &str = "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab";

#[test]
fn test_easy_digit() {
    let lengths: Vec<Option<u8>> = DIGITS.iter().map(|shape| easy_digit(*shape)).collect();
    assert_eq!(
        lengths,
        vec![None, Some(1), None, None, Some(4), None, None, Some(7), Some(8), None]
    );
}

#[test]
fn test_solve_example() {
    let solution = solve(&patterns(EXAMPLE)).expect("example should be solvable");
    let expected: Vec<(&str, u8)> = vec![
        ("acedgfb", 8),
        ("cdfbe", 5),
        ("gcdfa", 2),
        ("fbcad", 3),
        ("dab", 7),
        ("cefabd", 9),
        ("cdfgeb", 6),
        ("eafb", 4),
        ("cagedb", 0),
        ("ab", 1),
    ];
    for (pattern, digit) in expected {
        let shape: SegmentSet = pattern.parse().expect("valid test pattern");
        assert_eq!(solution.digit(shape), Some(digit), "pattern {}", pattern);
        assert_eq!(solution.shape(digit), Some(shape));
    }
    assert_eq!(solution.iter().count(), 10);
}

#[test]
fn test_solve_example_wiring() {
    let solution = solve(&patterns(EXAMPLE)).expect("example should be solvable");
    let wiring = solution.wiring();
    let wires: String = Segment::ALL
        .iter()
        .map(|seg| wiring.scrambled(*seg).letter())
        .collect();
    assert_eq!(wires, "deafgbc");
    for seg in Segment::ALL {
        assert_eq!(wiring.unscrambled(wiring.scrambled(seg)), seg);
    }
    for (digit, shape) in DIGITS.iter().enumerate() {
        let scrambled = wiring.scramble(*shape);
        assert_eq!(solution.digit(scrambled), Some(digit as u8));
        assert_eq!(wiring.unscramble(scrambled), *shape);
    }
}

#[test]
fn test_decode_readout() {
    let solution = solve(&patterns(EXAMPLE)).expect("example should be solvable");
    let readout = patterns("cdfeb fcadb cdfeb cdbaf");
    assert_eq!(solution.decode_digits(&readout), Ok(vec![5, 3, 5, 3]));
    assert_eq!(solution.decode(&readout), Ok(5353));
    assert_eq!(solution.decode(&[]), Ok(0));
    // Leading zeroes just vanish.
    assert_eq!(solution.decode(&patterns("cagedb ab")), Ok(1));
}

#[test]
fn test_readout_value() {
    assert_eq!(readout_value(&[8, 3, 9, 4]), Ok(8394));
    assert_eq!(readout_value(&[0, 0, 7]), Ok(7));
    assert_eq!(readout_value(&[]), Ok(0));
    assert_eq!(readout_value(&[9; 20]), Err(DecodeError::ReadoutTooLong(20)));
}

#[test]
fn test_decode_unknown_pattern() {
    let solution = solve(&patterns(EXAMPLE)).expect("example should be solvable");
    let bogus: SegmentSet = "abc".parse().expect("valid test pattern");
    assert_eq!(
        solution.decode(&patterns("cdfeb abc")),
        Err(DecodeError::UnknownPattern(bogus))
    );
}

#[test]
fn test_decode_too_long() {
    let solution = solve(&patterns(EXAMPLE)).expect("example should be solvable");
    let readout = vec![SegmentSet::ALL; 20];
    assert_eq!(solution.decode(&readout), Err(DecodeError::ReadoutTooLong(20)));
    let readout = vec![SegmentSet::ALL; 19];
    assert_eq!(solution.decode(&readout), Ok(8_888_888_888_888_888_888));
}

#[test]
fn test_solve_is_repeatable() {
    let observed = patterns(EXAMPLE);
    assert_eq!(solve(&observed), solve(&observed));
    let mut reversed = observed.clone();
    reversed.reverse();
    assert_eq!(solve(&observed), solve(&reversed));
}

#[test]
fn test_solve_wrong_count() {
    let mut observed = patterns(EXAMPLE);
    observed.pop();
    assert!(matches!(
        solve(&observed),
        Err(DecodeError::UnsolvablePuzzle(_))
    ));
    observed.push("ab".parse().expect("valid test pattern"));
    observed.push("dab".parse().expect("valid test pattern"));
    assert!(matches!(
        solve(&observed),
        Err(DecodeError::UnsolvablePuzzle(_))
    ));
    assert!(matches!(solve(&[]), Err(DecodeError::UnsolvablePuzzle(_))));
}

#[test]
fn test_solve_duplicate_pattern() {
    // Ten patterns, but "ab" appears twice and "cagedb" not at all.
    let observed = patterns("acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb ab ab");
    assert!(matches!(
        solve(&observed),
        Err(DecodeError::UnsolvablePuzzle(_))
    ));
}

#[test]
fn test_solve_two_ones() {
    // Two distinct 2-segment patterns, so only one can be the 1.
    let observed = patterns("acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb ac ab");
    assert!(matches!(
        solve(&observed),
        Err(DecodeError::UnsolvablePuzzle(_))
    ));
}

#[test]
fn test_solve_contract_violation() {
    // The 7 does not contain the 1, so [7] - [1] has three segments.
    let observed = patterns("acedgfb cdfbe gcdfa fbcad dag cefabd cdfgeb eafb cagedb ab");
    assert_eq!(
        solve(&observed),
        Err(DecodeError::ContractViolation {
            step: "A",
            set: "bdg".parse().expect("valid test pattern"),
        })
    );
}

#[test]
fn test_solve_rejects_inconsistent_patterns() {
    // Replace the 2 ("gcdfa") with another 5-segment pattern which
    // no wiring can produce alongside the others.
    let observed = patterns("acedgfb cdfbe bcdeg fbcad dab cefabd cdfgeb eafb cagedb ab");
    assert!(matches!(
        solve(&observed),
        Err(DecodeError::UnsolvablePuzzle(_))
    ));
}
