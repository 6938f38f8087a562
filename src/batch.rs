use rayon::prelude::*;
use tracing::{event, Level};

use crate::error::DecodeError;
use crate::puzzle::Puzzle;
use crate::segments::DIGITS;
use crate::solver::{easy_digit, readout_value, solve};

/// The decoded readout of one puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub digits: Vec<u8>,
    pub value: u64,
}

impl Decoded {
    /// How many readout digits can be recognised by segment count
    /// alone (1, 4, 7 and 8).
    pub fn easy_digits(&self) -> usize {
        self.digits
            .iter()
            .filter(|d| easy_digit(DIGITS[**d as usize]).is_some())
            .count()
    }
}

pub fn decode_puzzle(puzzle: &Puzzle) -> Result<Decoded, DecodeError> {
    let solution = solve(&puzzle.patterns)?;
    let digits = solution.decode_digits(&puzzle.readout)?;
    let value = readout_value(&digits)?;
    Ok(Decoded { digits, value })
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Readout digits which are 1, 4, 7 or 8, over all puzzles.
    pub easy_digits: usize,
    /// Sum of the readout values of all puzzles.
    pub sum: u64,
    /// Readout value of each puzzle, in input order; `None` for
    /// puzzles which could not be decoded.
    pub values: Vec<Option<u64>>,
    /// Index (in input order) and cause of each puzzle which could not
    /// be decoded.
    pub failures: Vec<(usize, DecodeError)>,
}

/// Decodes every puzzle.  A puzzle which can't be decoded is recorded
/// in the report and does not stop the others.
pub fn decode_batch(puzzles: &[Puzzle]) -> BatchReport {
    let results: Vec<Result<Decoded, DecodeError>> =
        puzzles.par_iter().map(decode_puzzle).collect();

    let mut report = BatchReport::default();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(decoded) => {
                event!(
                    Level::DEBUG,
                    "puzzle {}: readout {:?} is {}",
                    index,
                    decoded.digits,
                    decoded.value,
                );
                report.easy_digits += decoded.easy_digits();
                report.sum += decoded.value;
                report.values.push(Some(decoded.value));
            }
            Err(e) => {
                event!(Level::DEBUG, "puzzle {}: {}", index, e);
                report.values.push(None);
                report.failures.push((index, e));
            }
        }
    }
    report
}

#[cfg(test)]
use crate::puzzle::parse_input;

#[cfg(test)]
fn puzzle(line: &str) -> Puzzle {
    Puzzle::try_from(line).expect("valid test puzzle")
}

#[cfg(test)]
const FIRST: &str =
    "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab | cdfeb fcadb cdfeb cdbaf";

#[cfg(test)]
const SECOND: &str =
    "be cfbegad cbdgef fgaecd cgeb fdcge agebfd fecdb fabcd edb | fdgacbe cefdb cefbgd gcbe";

#[cfg(test)]
const THIRD: &str =
    "fgaebd cg bdaec gdafb agbcfd gdcbef bgcad gfac gcb cdgabef | cg cg fdcagb cbg";

#[test]
fn test_decode_puzzle() {
    let decoded = decode_puzzle(&puzzle(FIRST)).expect("example should decode");
    assert_eq!(decoded.digits, vec![5, 3, 5, 3]);
    assert_eq!(decoded.value, 5353);
    assert_eq!(decoded.easy_digits(), 0);

    let decoded = decode_puzzle(&puzzle(SECOND)).expect("example should decode");
    assert_eq!(decoded.digits, vec![8, 3, 9, 4]);
    assert_eq!(decoded.easy_digits(), 2);
}

#[test]
fn test_batch_sum() {
    let report = decode_batch(&[puzzle(FIRST), puzzle(SECOND)]);
    assert!(report.failures.is_empty());
    assert_eq!(report.sum, 13747);
    assert_eq!(report.values, vec![Some(5353), Some(8394)]);
}

#[test]
fn test_batch_easy_digits() {
    let report = decode_batch(&[puzzle(FIRST), puzzle(THIRD)]);
    assert_eq!(report.easy_digits, 3);
    assert_eq!(report.sum, 5353 + 1197);
}

#[test]
fn test_batch_continues_after_failure() {
    // The readout uses a pattern which is not among the ten.
    let unknown =
        "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab | cdfeb abc cdfeb cdbaf";
    // Two patterns for the digit 1.
    let unsolvable =
        "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb ac ab | cdfeb fcadb cdfeb cdbaf";
    let report = decode_batch(&[
        puzzle(unknown),
        puzzle(FIRST),
        puzzle(unsolvable),
        puzzle(SECOND),
    ]);
    assert_eq!(report.values, vec![None, Some(5353), None, Some(8394)]);
    assert_eq!(report.sum, 13747);
    assert_eq!(report.easy_digits, 2);
    assert_eq!(report.failures.len(), 2);
    assert!(matches!(
        report.failures[0],
        (0, DecodeError::UnknownPattern(_))
    ));
    assert!(matches!(
        report.failures[1],
        (2, DecodeError::UnsolvablePuzzle(_))
    ));
}

#[test]
fn test_batch_wrong_pattern_count() {
    let eleven =
        "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab abc | cdfeb fcadb cdfeb cdbaf";
    let text = format!("{}\n{}\n{}\n", FIRST, eleven, SECOND);
    let puzzles = parse_input(&text).expect("every line should parse");
    assert_eq!(puzzles.len(), 3);
    let report = decode_batch(&puzzles);
    assert_eq!(report.values, vec![Some(5353), None, Some(8394)]);
    assert_eq!(report.sum, 13747);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0],
        (1, DecodeError::UnsolvablePuzzle(_))
    ));
}

#[test]
fn test_empty_batch() {
    assert_eq!(decode_batch(&[]), BatchReport::default());
}
