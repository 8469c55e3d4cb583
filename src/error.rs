use thiserror::Error;

/// Errors surfaced by the fallible conversion seams.
///
/// Arithmetic itself never fails: divide-by-zero and quotient overflow
/// saturate in-band (see [`crate::SQ64x64`]), and out-of-range floats clamp.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum FixedPointError {
    /// The input contained no parsable number.
    #[error("invalid fixed-point literal")]
    InvalidLiteral,
    /// The input parsed, but characters remained after the number.
    #[error("trailing characters after fixed-point literal")]
    TrailingCharacters,
}
