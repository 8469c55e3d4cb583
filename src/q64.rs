// Copyright (c) 2025, Arcane Labs
// SPDX-License-Identifier: Apache-2.0

use crate::wide;
use std::ops::*;

/// Signed Q64.64 fixed-point number
///
/// ## Fields
///
/// * `0` - The Q64.64 value represented as an i128
///
/// ## Notes
///
/// * The raw value is the real number scaled by 2^64: sign bit, 63 integer
///   bits, 64 fractional bits
/// * Range: [-2^63, 2^63), fractional resolution = 2^-64 ≈ 5.421 * 10^-20
/// * Every bit pattern is a valid number; there is no NaN or infinity
/// * Addition, subtraction and negation wrap; division by zero and quotient
///   overflow saturate to [`Self::MIN`] / [`Self::MAX`]
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Hash, Default)]
pub struct SQ64x64(pub i128);

impl SQ64x64 {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1 << 64);
    /// The smallest positive value, 2^-64.
    pub const SMALLEST: Self = Self(1);
    pub const MIN: Self = Self(i128::MIN);
    pub const MAX: Self = Self(i128::MAX);

    #[inline]
    pub const fn new(raw: i128) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn into_raw(self) -> i128 {
        self.0
    }

    /// Assemble a value from its unsigned fractional word `lo` and its
    /// two's-complement integer word `hi`.
    #[inline]
    pub const fn from_words(lo: u64, hi: u64) -> Self {
        Self((((hi as u128) << 64) | lo as u128) as i128)
    }

    /// The fractional word, in units of 2^-64.
    #[inline]
    pub const fn lo(self) -> u64 {
        self.0 as u64
    }

    /// The integer word (two's-complement).
    #[inline]
    pub const fn hi(self) -> u64 {
        ((self.0 as u128) >> 64) as u64
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Absolute value. `MIN.abs()` wraps to `MIN`, like negation.
    #[inline]
    pub const fn abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    /// Magnitude as an unsigned raw Q64.64 quantity.
    #[inline]
    pub const fn unsigned_abs(self) -> u128 {
        self.0.unsigned_abs()
    }

    /// Two's-complement negation. `MIN` negates to itself.
    #[inline]
    pub const fn wrapping_neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }

    /// Logical left shift. The amount is taken modulo 128.
    #[inline]
    pub const fn shl(self, amount: u32) -> Self {
        Self(((self.0 as u128) << (amount & 127)) as i128)
    }

    /// Logical right shift. The amount is taken modulo 128.
    #[inline]
    pub const fn shr(self, amount: u32) -> Self {
        Self(((self.0 as u128) >> (amount & 127)) as i128)
    }

    /// Arithmetic right shift, replicating the sign bit. The amount is
    /// taken modulo 128.
    #[inline]
    pub const fn sar(self, amount: u32) -> Self {
        Self(self.0 >> (amount & 127))
    }

    /// Largest integer value not above `self`. The integer word already
    /// floors in two's complement, so this clears the fractional word.
    #[inline]
    pub const fn floor(self) -> Self {
        Self::from_words(0, self.hi())
    }

    /// Smallest integer value not below `self`. `MAX` wraps, like addition.
    #[inline]
    pub const fn ceil(self) -> Self {
        Self::from_words(0, self.hi().wrapping_add((self.lo() != 0) as u64))
    }

    /// The integer part as an `i64`, rounded toward negative infinity.
    #[inline]
    pub const fn to_int(self) -> i64 {
        (self.0 >> 64) as i64
    }

    /// Nearest `f64`. Values far from zero lose precision; the sign and
    /// roughly the top 53 bits survive.
    pub fn to_f64(self) -> f64 {
        let abs = self.unsigned_abs();
        let d = ((abs >> 64) as u64) as f64
            + (abs as u64) as f64 * (1.0 / 18446744073709551616.0);
        if self.is_negative() {
            -d
        } else {
            d
        }
    }
}

// ---- arithmetic ----

impl Add for SQ64x64 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for SQ64x64 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl Neg for SQ64x64 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        self.wrapping_neg()
    }
}

impl Mul for SQ64x64 {
    type Output = Self;

    /// Q64.64 product: the middle 128 bits of the 256-bit product of the
    /// magnitudes, rounded half-up on the discarded bit, sign reapplied.
    /// Product bits beyond the representable range wrap.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let negative = self.is_negative() != rhs.is_negative();
        let p = wide::umul_q64(self.unsigned_abs(), rhs.unsigned_abs());
        let p = if negative { p.wrapping_neg() } else { p };
        Self(p as i128)
    }
}

impl Div for SQ64x64 {
    type Output = Self;

    /// Q64.64 quotient. Division by zero returns `MIN` for a negative
    /// dividend and `MAX` otherwise; a quotient whose magnitude overflows
    /// 128 bits saturates the same way by combined sign.
    fn div(self, rhs: Self) -> Self {
        if rhs.0 == 0 {
            return if self.is_negative() { Self::MIN } else { Self::MAX };
        }

        let negative = self.is_negative() != rhs.is_negative();
        match wide::udiv_q64(self.unsigned_abs(), rhs.unsigned_abs()) {
            Some(q) => {
                let q = if negative { q.wrapping_neg() } else { q };
                Self(q as i128)
            }
            None if negative => Self::MIN,
            None => Self::MAX,
        }
    }
}

impl Rem for SQ64x64 {
    type Output = Self;

    /// Truncated modulo: `a - trunc(a/b) * b`, so the result follows the
    /// dividend's sign. Division by zero saturates like [`Div`].
    fn rem(self, rhs: Self) -> Self {
        if rhs.0 == 0 {
            return if self.is_negative() { Self::MIN } else { Self::MAX };
        }

        let negative = self.is_negative() != rhs.is_negative();
        let q = wide::udiv_int(self.unsigned_abs(), rhs.unsigned_abs());
        let q = if negative { q.wrapping_neg() } else { q };

        // trunc(a/b) as an integer-valued Q64.64, then peel it off
        self - Self::from_words(0, q) * rhs
    }
}

impl AddAssign for SQ64x64 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for SQ64x64 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for SQ64x64 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for SQ64x64 {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl RemAssign for SQ64x64 {
    #[inline]
    fn rem_assign(&mut self, rhs: Self) {
        *self = *self % rhs;
    }
}

// ---- logical layer ----

impl Not for SQ64x64 {
    type Output = Self;
    #[inline]
    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl BitAnd for SQ64x64 {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for SQ64x64 {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOr for SQ64x64 {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SQ64x64 {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitXor for SQ64x64 {
    type Output = Self;
    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for SQ64x64 {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Shl<u32> for SQ64x64 {
    type Output = Self;

    #[inline]
    fn shl(self, amount: u32) -> Self {
        SQ64x64::shl(self, amount)
    }
}

impl Shl<usize> for SQ64x64 {
    type Output = Self;

    #[inline]
    fn shl(self, amount: usize) -> Self {
        SQ64x64::shl(self, amount as u32)
    }
}

/// `>>` on the signed type is arithmetic, matching the primitive integers.
/// Use [`SQ64x64::shr`] for the logical shift.
impl Shr<u32> for SQ64x64 {
    type Output = Self;

    #[inline]
    fn shr(self, amount: u32) -> Self {
        self.sar(amount)
    }
}

impl Shr<usize> for SQ64x64 {
    type Output = Self;

    #[inline]
    fn shr(self, amount: usize) -> Self {
        self.sar(amount as u32)
    }
}

impl ShlAssign<u32> for SQ64x64 {
    #[inline]
    fn shl_assign(&mut self, amount: u32) {
        *self = SQ64x64::shl(*self, amount);
    }
}

impl ShlAssign<usize> for SQ64x64 {
    #[inline]
    fn shl_assign(&mut self, amount: usize) {
        *self = SQ64x64::shl(*self, amount as u32);
    }
}

impl ShrAssign<u32> for SQ64x64 {
    #[inline]
    fn shr_assign(&mut self, amount: u32) {
        *self = self.sar(amount);
    }
}

impl ShrAssign<usize> for SQ64x64 {
    #[inline]
    fn shr_assign(&mut self, amount: usize) {
        *self = self.sar(amount as u32);
    }
}

// ---- conversions ----

impl From<i64> for SQ64x64 {
    #[inline]
    fn from(v: i64) -> Self {
        Self((v as i128) << 64)
    }
}

impl From<i32> for SQ64x64 {
    #[inline]
    fn from(v: i32) -> Self {
        Self((v as i128) << 64)
    }
}

impl From<i16> for SQ64x64 {
    #[inline]
    fn from(v: i16) -> Self {
        Self((v as i128) << 64)
    }
}

impl From<i8> for SQ64x64 {
    #[inline]
    fn from(v: i8) -> Self {
        Self((v as i128) << 64)
    }
}

impl From<u32> for SQ64x64 {
    #[inline]
    fn from(v: u32) -> Self {
        Self((v as i128) << 64)
    }
}

impl From<u16> for SQ64x64 {
    #[inline]
    fn from(v: u16) -> Self {
        Self((v as i128) << 64)
    }
}

impl From<u8> for SQ64x64 {
    #[inline]
    fn from(v: u8) -> Self {
        Self((v as i128) << 64)
    }
}

impl From<f64> for SQ64x64 {
    /// Saturates to `MIN` below -2^63 and to `MAX` at or above 2^63; NaN
    /// maps to `ZERO`. The fractional part keeps whatever the double held,
    /// truncated to 64 bits.
    fn from(v: f64) -> Self {
        if v < -9223372036854775808.0 {
            Self::MIN
        } else if v >= 9223372036854775808.0 {
            Self::MAX
        } else {
            let negative = v < 0.0;
            let a = v.abs();
            let int = a as u64;
            let frac = ((a - int as f64) * 18446744073709551616.0) as u64;
            let r = Self::from_words(frac, int);
            if negative {
                -r
            } else {
                r
            }
        }
    }
}

impl From<SQ64x64> for f64 {
    #[inline]
    fn from(v: SQ64x64) -> f64 {
        v.to_f64()
    }
}

#[cfg(feature = "bytemuck")]
unsafe impl bytemuck::Zeroable for SQ64x64 {}
#[cfg(feature = "bytemuck")]
unsafe impl bytemuck::Pod for SQ64x64 {}

#[cfg(feature = "serde")]
impl serde::Serialize for SQ64x64 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SQ64x64 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        i128::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consts() {
        assert_eq!(SQ64x64::ZERO, SQ64x64::from_words(0, 0));
        assert_eq!(SQ64x64::ONE, SQ64x64::from_words(0, 1));
        assert_eq!(SQ64x64::SMALLEST, SQ64x64::from_words(1, 0));
        assert_eq!(SQ64x64::MIN, SQ64x64::from_words(0, 0x8000_0000_0000_0000));
        assert_eq!(
            SQ64x64::MAX,
            SQ64x64::from_words(u64::MAX, 0x7fff_ffff_ffff_ffff)
        );
    }

    #[test]
    fn words_round_trip() {
        let v = SQ64x64::from_words(0xdead_beef, 0xffff_ffff_ffff_fffe);
        assert_eq!(v.lo(), 0xdead_beef);
        assert_eq!(v.hi(), 0xffff_ffff_ffff_fffe);
        assert!(v.is_negative());
    }

    #[test]
    fn additive_group() {
        let a = SQ64x64::from(17i64) + SQ64x64::from_words(0x8000_0000_0000_0000, 0);
        assert_eq!(a + (-a), SQ64x64::ZERO);
        assert_eq!(SQ64x64::MIN.wrapping_neg(), SQ64x64::MIN);
        assert_eq!(SQ64x64::MAX + SQ64x64::SMALLEST, SQ64x64::MIN);
    }

    #[test]
    fn mul_signs_and_identity() {
        let x = SQ64x64::from(3i64) * SQ64x64::from(7i64);
        assert_eq!(x, SQ64x64::from(21i64));
        assert_eq!(x * SQ64x64::ONE, x);
        assert_eq!(x * SQ64x64::ZERO, SQ64x64::ZERO);
        assert_eq!(
            SQ64x64::from(-3i64) * SQ64x64::from(7i64),
            SQ64x64::from(-21i64)
        );
        assert_eq!(
            SQ64x64::from(-3i64) * SQ64x64::from(-7i64),
            SQ64x64::from(21i64)
        );
    }

    #[test]
    fn div_basics() {
        let third = SQ64x64::ONE / SQ64x64::from(3i64);
        assert_eq!(third.into_raw(), 0x5555_5555_5555_5555);
        assert_eq!(
            SQ64x64::from(-21i64) / SQ64x64::from(7i64),
            SQ64x64::from(-3i64)
        );
    }

    #[test]
    fn div_by_zero_saturates() {
        let a = SQ64x64::from(5i64);
        assert_eq!(a / SQ64x64::ZERO, SQ64x64::MAX);
        assert_eq!(-a / SQ64x64::ZERO, SQ64x64::MIN);
        assert_eq!(a % SQ64x64::ZERO, SQ64x64::MAX);
        assert_eq!(-a % SQ64x64::ZERO, SQ64x64::MIN);
    }

    #[test]
    fn div_overflow_saturates() {
        // 2^62 / 2^-64 = 2^126, far past the representable range
        let big = SQ64x64::from(1i64 << 62);
        assert_eq!(big / SQ64x64::SMALLEST, SQ64x64::MAX);
        assert_eq!(-big / SQ64x64::SMALLEST, SQ64x64::MIN);
    }

    #[test]
    fn modulo_follows_dividend() {
        let a = SQ64x64::from(-7i64);
        let b = SQ64x64::from(3i64);
        let m = a % b;
        assert_eq!(m, SQ64x64::from(-1i64));
        // reconstruction: trunc(a/b) * b + a % b == a
        let q = a / b;
        let trunc = if q.is_negative() { q.ceil() } else { q.floor() };
        assert_eq!(trunc * b + m, a);
    }

    #[test]
    fn floor_and_ceil() {
        let half = SQ64x64::from_words(1 << 63, 0);
        assert_eq!(half.floor(), SQ64x64::ZERO);
        assert_eq!(half.ceil(), SQ64x64::ONE);
        let neg_half = -half;
        assert_eq!(neg_half.floor(), SQ64x64::from(-1i64));
        assert_eq!(neg_half.ceil(), SQ64x64::ZERO);
        assert_eq!(SQ64x64::from(2i64).floor(), SQ64x64::from(2i64));
        assert_eq!(SQ64x64::from(2i64).ceil(), SQ64x64::from(2i64));
        let neg_2_5 = SQ64x64::from(-2i64) - half;
        assert_eq!(neg_2_5.floor(), SQ64x64::from(-3i64));
        assert_eq!(neg_2_5.ceil(), SQ64x64::from(-2i64));
    }

    #[test]
    fn shifts() {
        let x = SQ64x64::from_words(0x1234, 0);
        assert_eq!(x.shl(0), x);
        assert_eq!(x.shl(128), x);
        assert_eq!(x.shl(64).hi(), 0x1234);
        assert_eq!(x.shl(64).shr(64), x);
        let neg = SQ64x64::from(-2i64);
        assert_eq!(neg.sar(127), SQ64x64::new(-1));
        assert_eq!(neg.sar(1), SQ64x64::from(-1i64));
        assert!(!neg.shr(1).is_negative());
        assert_eq!(neg >> 1u32, neg.sar(1));
    }

    #[test]
    fn compare_is_signed_then_unsigned() {
        assert!(SQ64x64::MIN < SQ64x64::MAX);
        assert!(SQ64x64::from(-1i64) < SQ64x64::ZERO);
        assert!(SQ64x64::SMALLEST > SQ64x64::ZERO);
        let a = SQ64x64::from_words(5, 3);
        let b = SQ64x64::from_words(9, 3);
        assert!(a < b);
        assert_eq!(a.max(b), b);
        assert_eq!(a.min(b), a);
    }

    #[test]
    fn int_conversions() {
        assert_eq!(SQ64x64::from(-5i64).to_int(), -5);
        assert_eq!(SQ64x64::from(5i64).to_int(), 5);
        // floor semantics for negative fractions
        let v = SQ64x64::from(-1i64) - SQ64x64::from_words(1 << 63, 0);
        assert_eq!(v.to_int(), -2);
    }

    #[test]
    fn float_conversions() {
        assert_eq!(SQ64x64::from(1.5f64).into_raw(), 3i128 << 63);
        assert_eq!(SQ64x64::from(-1.25f64).to_f64(), -1.25);
        assert_eq!(SQ64x64::from(1e300f64), SQ64x64::MAX);
        assert_eq!(SQ64x64::from(-1e300f64), SQ64x64::MIN);
        assert_eq!(SQ64x64::from(f64::NAN), SQ64x64::ZERO);
        assert_eq!(f64::from(SQ64x64::from(42i64)), 42.0);
    }
}
