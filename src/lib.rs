//! Signed 128-bit (Q64.64) fixed-point arithmetic.
//!
//! [`SQ64x64`] stores the real number scaled by 2^64 in an `i128`: 64
//! integer bits (one of them the sign) and 64 fractional bits. Results are
//! exact, deterministic and bit-reproducible across platforms; there is no
//! NaN, no infinity, and no heap allocation anywhere in the arithmetic or
//! formatting paths.
//!
//! ```
//! use fixed128::{FormatOptions, SQ64x64};
//!
//! let a = SQ64x64::from(3i64) / SQ64x64::from(4i64);
//! assert_eq!(format!("{a}"), "0.75");
//!
//! let mut buf = [0u8; 64];
//! let opt = FormatOptions { precision: 4, ..Default::default() };
//! let n = a.format(&mut buf, &opt);
//! assert_eq!(&buf[..n], b"0.7500");
//!
//! let (v, end) = SQ64x64::parse("0x1.8 and change");
//! assert_eq!(v, SQ64x64::from(1.5f64));
//! assert_eq!(end, 5);
//! ```

pub mod error;
pub mod format;
mod parse;
pub mod q64;
mod wide;

pub use error::FixedPointError;
pub use format::{decimal_point, set_decimal_point, FormatOptions, Sign};
pub use q64::SQ64x64;

/// Construct a constant [`SQ64x64`] from an integer or a `num / den` ratio
/// literal, rounded to the nearest representable value.
///
/// ```
/// use fixed128::{sq64x64, SQ64x64};
///
/// const HALF: SQ64x64 = sq64x64!(1 / 2);
/// const TWO: SQ64x64 = sq64x64!(2);
/// assert_eq!(HALF + HALF, SQ64x64::ONE);
/// assert_eq!(TWO, SQ64x64::from(2i64));
/// ```
#[macro_export]
macro_rules! sq64x64 {
    ($num:literal / $den:literal) => {{
        const S: i128 = 1i128 << 64;
        const N: i128 = $num as i128;
        const D: i128 = $den as i128;
        const VAL: i128 = (N * S + if (N < 0) != (D < 0) { -D / 2 } else { D / 2 }) / D;
        $crate::q64::SQ64x64::new(VAL)
    }};
    ($int:expr) => {{
        const S: i128 = 1i128 << 64;
        const VAL: i128 = ($int as i128) * S;
        $crate::q64::SQ64x64::new(VAL)
    }};
}

#[cfg(test)]
mod tests {
    use crate::SQ64x64;

    #[test]
    fn ratio_literals() {
        assert_eq!(sq64x64!(1 / 2), SQ64x64::from_words(1 << 63, 0));
        assert_eq!(sq64x64!(-3 / 2), SQ64x64::from(-1.5f64));
        assert_eq!(sq64x64!(1 / 3), SQ64x64::new(0x5555_5555_5555_5555));
        assert_eq!(sq64x64!(-40), SQ64x64::from(-40i64));
    }
}
