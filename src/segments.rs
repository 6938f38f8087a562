use std::fmt::{self, Display, Formatter};
use std::ops::{BitOr, BitXor};
use std::str::FromStr;

use crate::error::{BadInput, DecodeError};

/// One of the seven segments of a display.
///
/// ```text
///  aaaa
/// b    c
/// b    c
///  dddd
/// e    f
/// e    f
///  gggg
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Segment {
    pub const ALL: [Segment; 7] = [
        Segment::A,
        Segment::B,
        Segment::C,
        Segment::D,
        Segment::E,
        Segment::F,
        Segment::G,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn letter(self) -> char {
        (b'a' + self as u8) as char
    }

    pub fn from_letter(ch: char) -> Option<Segment> {
        match ch {
            'a'..='g' => Some(Segment::ALL[(ch as u8 - b'a') as usize]),
            _ => None,
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[test]
fn test_segment_letters() {
    for seg in Segment::ALL {
        assert_eq!(Segment::from_letter(seg.letter()), Some(seg));
    }
    assert_eq!(Segment::A.letter(), 'a');
    assert_eq!(Segment::G.letter(), 'g');
    assert_eq!(Segment::from_letter('h'), None);
    assert_eq!(Segment::from_letter('A'), None);
}

/// A set of lit segments, one bit per segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SegmentSet(u8);

/// The unscrambled shape of each digit, indexed by digit value.
pub const DIGITS: [SegmentSet; 10] = [
    SegmentSet::of(&[Segment::A, Segment::B, Segment::C, Segment::E, Segment::F, Segment::G]),
    SegmentSet::of(&[Segment::C, Segment::F]),
    SegmentSet::of(&[Segment::A, Segment::C, Segment::D, Segment::E, Segment::G]),
    SegmentSet::of(&[Segment::A, Segment::C, Segment::D, Segment::F, Segment::G]),
    SegmentSet::of(&[Segment::B, Segment::C, Segment::D, Segment::F]),
    SegmentSet::of(&[Segment::A, Segment::B, Segment::D, Segment::F, Segment::G]),
    SegmentSet::of(&[Segment::A, Segment::B, Segment::D, Segment::E, Segment::F, Segment::G]),
    SegmentSet::of(&[Segment::A, Segment::C, Segment::F]),
    SegmentSet::ALL,
    SegmentSet::of(&[Segment::A, Segment::B, Segment::C, Segment::D, Segment::F, Segment::G]),
];

impl SegmentSet {
    pub const EMPTY: SegmentSet = SegmentSet(0);
    pub const ALL: SegmentSet = SegmentSet(0b111_1111);

    pub const fn of(segments: &[Segment]) -> SegmentSet {
        let mut bits: u8 = 0;
        let mut i = 0;
        while i < segments.len() {
            bits |= segments[i].bit();
            i += 1;
        }
        SegmentSet(bits)
    }

    /// The number of lit segments.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, seg: Segment) -> bool {
        self.0 & seg.bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = Segment> {
        Segment::ALL.into_iter().filter(move |seg| self.contains(*seg))
    }

    /// Exclusive-or `self` with each of `others` in turn.
    ///
    /// When each of `others` is a subset of what remains, this removes
    /// them.  Nothing checks that; callers rely on the shapes of the
    /// digits involved.
    pub fn difference<I>(self, others: I) -> SegmentSet
    where
        I: IntoIterator<Item = SegmentSet>,
    {
        others.into_iter().fold(self, |acc, other| acc ^ other)
    }

    /// How many segments `self` and `other` have in common.
    pub fn overlap(self, other: SegmentSet) -> usize {
        SegmentSet(self.0 & other.0).len()
    }

    /// Returns the highest segment in the set (if any) together with
    /// the number of segments in the set.
    pub fn count_segments(self) -> (Option<Segment>, usize) {
        (self.iter().last(), self.len())
    }

    /// Returns the only member of the set.  `step` names the deduction
    /// which produced the set, for the error.
    pub fn must_one(self, step: &'static str) -> Result<Segment, DecodeError> {
        match self.count_segments() {
            (Some(seg), 1) => Ok(seg),
            _ => Err(DecodeError::ContractViolation { step, set: self }),
        }
    }

    /// The digit this set shows when the wiring is not scrambled.
    pub fn value(self) -> Option<u8> {
        DIGITS
            .iter()
            .position(|shape| *shape == self)
            .map(|digit| digit as u8)
    }
}

impl From<Segment> for SegmentSet {
    fn from(seg: Segment) -> SegmentSet {
        SegmentSet(seg.bit())
    }
}

impl FromIterator<Segment> for SegmentSet {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> SegmentSet {
        iter.into_iter()
            .fold(SegmentSet::EMPTY, |acc, seg| acc | SegmentSet::from(seg))
    }
}

impl BitOr for SegmentSet {
    type Output = SegmentSet;
    fn bitor(self, rhs: SegmentSet) -> SegmentSet {
        SegmentSet(self.0 | rhs.0)
    }
}

impl BitXor for SegmentSet {
    type Output = SegmentSet;
    fn bitxor(self, rhs: SegmentSet) -> SegmentSet {
        SegmentSet(self.0 ^ rhs.0)
    }
}

impl Display for SegmentSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for seg in self.iter() {
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

impl FromStr for SegmentSet {
    type Err = BadInput;
    fn from_str(s: &str) -> Result<SegmentSet, BadInput> {
        if s.is_empty() {
            return Err(BadInput("empty segment pattern".to_string()));
        }
        let mut result = SegmentSet::EMPTY;
        for ch in s.chars() {
            match Segment::from_letter(ch) {
                Some(seg) if result.contains(seg) => {
                    return Err(BadInput(format!(
                        "segment '{}' appears more than once in '{}'",
                        ch, s
                    )));
                }
                Some(seg) => {
                    result = result | SegmentSet::from(seg);
                }
                None => {
                    return Err(BadInput(format!(
                        "'{}' in '{}' is not a segment (expected a-g)",
                        ch, s
                    )));
                }
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
fn set(s: &str) -> SegmentSet {
    s.parse().expect("valid test pattern")
}

#[test]
fn test_parse_is_order_independent() {
    assert_eq!(set("cf"), set("fc"));
    assert_eq!(set("acedgfb"), SegmentSet::ALL);
    assert_eq!(set("gfedcba").to_string(), "abcdefg");
    assert_eq!(set("eafb").to_string(), "abef");
}

#[test]
fn test_parse_rejects_junk() {
    assert!("".parse::<SegmentSet>().is_err());
    assert!("abh".parse::<SegmentSet>().is_err());
    assert!("aba".parse::<SegmentSet>().is_err());
    assert!("aB".parse::<SegmentSet>().is_err());
}

#[test]
fn test_digit_table() {
    let lengths: Vec<usize> = DIGITS.iter().map(|d| d.len()).collect();
    assert_eq!(lengths, vec![6, 2, 5, 5, 4, 5, 6, 3, 7, 6]);
    assert_eq!(DIGITS[0], set("abcefg"));
    assert_eq!(DIGITS[4], set("bcdf"));
    assert_eq!(DIGITS[9], set("abcdfg"));
    for (digit, shape) in DIGITS.iter().enumerate() {
        assert_eq!(shape.value(), Some(digit as u8));
    }
    assert_eq!(set("ab").value(), None);
    assert_eq!(SegmentSet::EMPTY.value(), None);
}

#[test]
fn test_difference() {
    // {A} = [7] - [1]
    assert_eq!(DIGITS[7].difference([DIGITS[1]]), set("a"));
    assert_eq!(
        DIGITS[4].difference([DIGITS[1], set("b")]),
        set("d"),
    );
    assert_eq!(
        DIGITS[8].difference([DIGITS[1], set("a"), set("b"), set("d"), set("e")]),
        set("g"),
    );
    // Not a subset, so this is a symmetric difference.
    assert_eq!(set("ab").difference([set("bc")]), set("ac"));
    assert_eq!(set("abc").difference(std::iter::empty()), set("abc"));
}

#[test]
fn test_overlap() {
    assert_eq!(DIGITS[4].overlap(DIGITS[1]), 2);
    assert_eq!(DIGITS[2].overlap(DIGITS[4]), 2);
    assert_eq!(DIGITS[1].overlap(set("abdeg")), 0);
}

#[test]
fn test_count_segments() {
    assert_eq!(set("e").count_segments(), (Some(Segment::E), 1));
    assert_eq!(SegmentSet::EMPTY.count_segments(), (None, 0));
    assert_eq!(set("bd").count_segments(), (Some(Segment::D), 2));
}

#[test]
fn test_must_one() {
    assert_eq!(set("c").must_one("C"), Ok(Segment::C));
    assert_eq!(
        SegmentSet::EMPTY.must_one("E"),
        Err(DecodeError::ContractViolation {
            step: "E",
            set: SegmentSet::EMPTY,
        }),
    );
    assert!(matches!(
        set("dg").must_one("G"),
        Err(DecodeError::ContractViolation { step: "G", .. })
    ));
}
