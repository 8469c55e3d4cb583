use crate::error::FixedPointError;
use crate::format::decimal_point;
use crate::{wide, SQ64x64};
use std::str::FromStr;

impl SQ64x64 {
    /// Parse a decimal or hexadecimal (`0x`/`0X`) fixed-point literal:
    /// optional leading whitespace, optional sign, whole digits, then an
    /// optional fractional part after the current decimal-point byte.
    ///
    /// Never fails: parsing stops at the first byte that does not belong to
    /// the number and returns whatever was accumulated (ZERO when nothing
    /// was), together with the number of bytes consumed. Whole-part
    /// overflow wraps in the 64-bit integer word; the fractional part is
    /// rounded toward zero.
    pub fn parse(s: &str) -> (Self, usize) {
        let (value, consumed, _) = Self::parse_digits(s);
        (value, consumed)
    }

    /// [`Self::parse`] plus whether the digit loops consumed anything, so
    /// the strict [`FromStr`] can reject digitless input like a bare `0x`
    /// prefix (whose `0` belongs to the prefix, not the number).
    fn parse_digits(s: &str) -> (Self, usize, bool) {
        let b = s.as_bytes();
        let mut i = 0usize;
        let mut digits = false;

        while matches!(b.get(i), Some(&(b' ' | b'\t' | b'\r' | b'\n' | 0x0b))) {
            i += 1;
        }

        let mut negative = false;
        match b.get(i) {
            Some(&b'-') => {
                negative = true;
                i += 1;
            }
            Some(&b'+') => i += 1,
            _ => {}
        }

        let base: u64 = if b.get(i) == Some(&b'0') && matches!(b.get(i + 1), Some(&(b'x' | b'X'))) {
            i += 2;
            16
        } else {
            10
        };

        let digit = |c: u8| -> Option<u64> {
            match c {
                b'0'..=b'9' => Some((c - b'0') as u64),
                b'a'..=b'f' if base == 16 => Some((c - b'a' + 10) as u64),
                b'A'..=b'F' if base == 16 => Some((c - b'A' + 10) as u64),
                _ => None,
            }
        };

        let mut hi = 0u64;
        while let Some(&c) = b.get(i) {
            let Some(d) = digit(c) else { break };
            hi = hi.wrapping_mul(base).wrapping_add(d);
            digits = true;
            i += 1;
        }

        // fractional digits accumulate backward: each step computes
        // (digit * 2^64 + acc) / base, which truncates toward zero
        let mut lo = 0u64;
        if b.get(i) == Some(&decimal_point()) {
            i += 1;
            let start = i;
            while b.get(i).is_some_and(|&c| digit(c).is_some()) {
                digits = true;
                i += 1;
            }
            for &c in b[start..i].iter().rev() {
                if let Some(d) = digit(c) {
                    (lo, _) = wide::udiv_128_by_64(lo, d, base);
                }
            }
        }

        let value = Self::from_words(lo, hi);
        (if negative { -value } else { value }, i, digits)
    }
}

impl FromStr for SQ64x64 {
    type Err = FixedPointError;

    /// Strict form of [`SQ64x64::parse`]: the input must contain at least
    /// one digit and must be consumed completely.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, consumed, digits) = Self::parse_digits(s);
        if !digits {
            Err(FixedPointError::InvalidLiteral)
        } else if consumed < s.len() {
            Err(FixedPointError::TrailingCharacters)
        } else {
            Ok(value)
        }
    }
}
