//! Decoding scrambled seven-segment displays.
//!
//! Each display has its segment wires connected in some unknown
//! order.  From the ten distinct patterns a display shows for the
//! digits 0-9, [`solve`] works out which pattern is which digit (and
//! how the wires are connected), and a [`Solution`] then decodes the
//! display's readout.

pub mod batch;
pub mod error;
pub mod puzzle;
pub mod segments;
pub mod solver;

pub use batch::{decode_batch, decode_puzzle, BatchReport, Decoded};
pub use error::{BadInput, DecodeError};
pub use puzzle::{parse_input, Puzzle};
pub use segments::{Segment, SegmentSet, DIGITS};
pub use solver::{easy_digit, readout_value, solve, Solution, Wiring};
