use thiserror::Error;

use crate::segments::SegmentSet;

/// Reasons a single puzzle could not be decoded.
///
/// None of these should ever happen for well-formed puzzle input.  A
/// batch records them per puzzle and carries on with the rest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A deduction step needed exactly one segment but got some other
    /// number of them.
    #[error("deduction of {step} expected exactly one segment, but {set} has {}", .set.len())]
    ContractViolation { step: &'static str, set: SegmentSet },

    #[error("puzzle cannot be solved: {0}")]
    UnsolvablePuzzle(String),

    /// The readout used a pattern which is not one of the ten observed ones.
    #[error("readout pattern {0} is not one of the observed patterns")]
    UnknownPattern(SegmentSet),

    #[error("readout of {0} digits does not fit in a u64")]
    ReadoutTooLong(usize),
}

/// Puzzle text that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BadInput(pub String);

#[test]
fn test_error_messages() {
    let set: SegmentSet = "bdg".parse().expect("valid pattern");
    assert_eq!(
        DecodeError::ContractViolation { step: "A", set }.to_string(),
        "deduction of A expected exactly one segment, but bdg has 3"
    );
    assert_eq!(
        DecodeError::UnknownPattern(set).to_string(),
        "readout pattern bdg is not one of the observed patterns"
    );
    assert_eq!(BadInput("oops".to_string()).to_string(), "oops");
}
