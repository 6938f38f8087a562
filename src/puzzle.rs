use std::fmt::{self, Display, Formatter};

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, space0, space1},
    multi::separated_list1,
    sequence::{delimited, separated_pair, tuple},
    IResult,
};

use crate::error::BadInput;
use crate::segments::SegmentSet;

/// One line of puzzle input: the ten observed patterns, and the
/// readout to decode with them.
///
/// Parsing does not count the patterns; a line with the wrong number
/// of them parses, and fails later when it is solved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub patterns: Vec<SegmentSet>,
    pub readout: Vec<SegmentSet>,
}

fn token(input: &str) -> IResult<&str, &str> {
    take_while1(|ch: char| ch.is_ascii_alphanumeric())(input)
}

fn token_list(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(space1, token)(input)
}

fn parse_line(input: &str) -> IResult<&str, (Vec<&str>, Vec<&str>)> {
    delimited(
        space0,
        separated_pair(token_list, tuple((space1, char('|'), space1)), token_list),
        space0,
    )(input)
}

fn to_segment_sets(tokens: &[&str]) -> Result<Vec<SegmentSet>, BadInput> {
    tokens.iter().map(|t| t.parse()).collect()
}

impl TryFrom<&str> for Puzzle {
    type Error = BadInput;
    fn try_from(s: &str) -> Result<Puzzle, BadInput> {
        match parse_line(s) {
            Ok((unparsed, (patterns, readout))) => {
                if !unparsed.is_empty() {
                    return Err(BadInput(format!(
                        "unexpected trailing junk: '{}'",
                        unparsed
                    )));
                }
                Ok(Puzzle {
                    patterns: to_segment_sets(&patterns)?,
                    readout: to_segment_sets(&readout)?,
                })
            }
            Err(e) => Err(BadInput(format!("failed to parse '{}': {}", s, e))),
        }
    }
}

impl Display for Puzzle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let join = |sets: &[SegmentSet]| -> String {
            sets.iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        write!(f, "{} | {}", join(&self.patterns), join(&self.readout))
    }
}

/// Parses one puzzle per non-blank line.
pub fn parse_input(text: &str) -> Result<Vec<Puzzle>, BadInput> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            Puzzle::try_from(line).map_err(|e| BadInput(format!("line {}: {}", i + 1, e)))
        })
        .collect()
}

#[cfg(test)]
const EXAMPLE: &str =
    "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab | cdfeb fcadb cdfeb cdbaf";

#[test]
fn test_parse_puzzle() {
    let puzzle = Puzzle::try_from(EXAMPLE).expect("example should parse");
    assert_eq!(puzzle.patterns.len(), 10);
    assert_eq!(puzzle.readout.len(), 4);
    assert_eq!(puzzle.patterns[9], "ab".parse().expect("valid pattern"));
    // Readout tokens are sets, so "cdfeb" and "fcadb" parse the same
    // way regardless of letter order.
    assert_eq!(puzzle.readout[0], puzzle.readout[2]);
    assert_eq!(puzzle.readout[1], puzzle.readout[3]);
    assert_eq!(puzzle.readout[0], "bcdef".parse().expect("valid pattern"));
}

#[test]
fn test_display_puzzle() {
    let puzzle = Puzzle::try_from(EXAMPLE).expect("example should parse");
    assert_eq!(
        puzzle.to_string(),
        "abcdefg bcdef acdfg abcdf abd abcdef bcdefg abef abcdeg ab | bcdef abcdf bcdef abcdf"
    );
    assert_eq!(Puzzle::try_from(puzzle.to_string().as_str()), Ok(puzzle));
}

#[test]
fn test_parse_tolerates_spacing() {
    let spaced = "  acedgfb cdfbe  gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab |  cdfeb fcadb \t";
    let puzzle = Puzzle::try_from(spaced).expect("extra spacing should be accepted");
    assert_eq!(puzzle.readout.len(), 2);
}

#[test]
fn test_parse_rejects_bad_lines() {
    // No readout.
    let observed = "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab";
    assert!(Puzzle::try_from(format!("{} |", observed).as_str()).is_err());
    assert!(Puzzle::try_from(observed).is_err());
    // Two separators.
    assert!(Puzzle::try_from(
        "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab | ab | ab"
    )
    .is_err());
    // Not a segment.
    assert!(Puzzle::try_from(
        "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ah | ab"
    )
    .is_err());
    // Repeated segment.
    assert!(Puzzle::try_from(
        "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb aab | ab"
    )
    .is_err());
    assert!(Puzzle::try_from("").is_err());
}

#[test]
fn test_parse_keeps_wrong_pattern_count() {
    let nine = Puzzle::try_from("cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab | ab")
        .expect("nine patterns should parse");
    assert_eq!(nine.patterns.len(), 9);
    let eleven = Puzzle::try_from(
        "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab abc | ab",
    )
    .expect("eleven patterns should parse");
    assert_eq!(eleven.patterns.len(), 11);
}

#[test]
fn test_parse_input() {
    let text = format!("{}\n\n{}\n", EXAMPLE, EXAMPLE);
    let puzzles = parse_input(&text).expect("two example lines should parse");
    assert_eq!(puzzles.len(), 2);
    assert_eq!(puzzles[0], puzzles[1]);

    let text = format!("{}\nnonsense\n", EXAMPLE);
    match parse_input(&text) {
        Err(BadInput(msg)) => assert!(msg.starts_with("line 2:"), "{}", msg),
        Ok(_) => panic!("nonsense should not parse"),
    }
}
