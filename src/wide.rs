// Copyright (c) 2025, Arcane Labs
// SPDX-License-Identifier: Apache-2.0

//! Unsigned wide-arithmetic cores.
//!
//! Everything here operates on raw `u64`/`u128` words. Sign extraction,
//! saturation policy and Q64.64 interpretation live with the callers in
//! [`crate::q64`].

/// 64x64 -> 128 unsigned multiply.
#[inline]
pub(crate) fn umul_64x64_128(a: u64, b: u64) -> u128 {
    a as u128 * b as u128
}

/// 128/64 -> 64 unsigned divide with remainder.
///
/// Callers guarantee `d != 0` and `n_hi < d`, so the quotient fits 64 bits.
#[inline]
pub(crate) fn udiv_128_by_64(n_lo: u64, n_hi: u64, d: u64) -> (u64, u64) {
    debug_assert!(d != 0, "division by zero");
    debug_assert!(n_hi < d, "quotient does not fit 64 bits");

    let n = ((n_hi as u128) << 64) | n_lo as u128;
    ((n / d as u128) as u64, (n % d as u128) as u64)
}

#[inline]
pub(crate) fn clz_64(x: u64) -> u32 {
    x.leading_zeros()
}

/// Q64.64 multiply of unsigned 128-bit operands: the middle 128 bits of the
/// 256-bit product, rounded half-up on the first discarded fractional bit.
/// Product bits above 2^128 are discarded.
pub(crate) fn umul_q64(a: u128, b: u128) -> u128 {
    let (a_lo, a_hi) = (a as u64, (a >> 64) as u64);
    let (b_lo, b_hi) = (b as u64, (b >> 64) as u64);

    let p0 = umul_64x64_128(a_lo, b_lo);
    let p1 = umul_64x64_128(a_lo, b_hi);
    let p2 = umul_64x64_128(a_hi, b_lo);
    let p3 = umul_64x64_128(a_hi, b_hi);

    // bit 63 of the full 256-bit product
    let round = (p0 as u64) >> 63;

    (p3 << 64)
        .wrapping_add(p2)
        .wrapping_add(p1)
        .wrapping_add(p0 >> 64)
        .wrapping_add(round as u128)
}

/// Shift `d` left until its top bit is set and shift `n` by the same amount,
/// returning the bits pushed out of `n`'s high word as the extension word
/// `n2`. Returns `None` when the quotient `(n << 64) / d` cannot fit 128
/// bits, which can only happen while `d` fits a single word.
fn norm(n: u128, d: u128) -> Option<(u128, u128, u64)> {
    let n_hi = (n >> 64) as u64;
    let d_hi = (d >> 64) as u64;

    if d_hi != 0 {
        let s = clz_64(d_hi);
        let n2 = if s == 0 { 0 } else { n_hi >> (64 - s) };
        Some((n << s, d << s, n2))
    } else {
        let d_lo = d as u64;
        if n_hi >= d_lo {
            return None; // quotient >= 2^128
        }
        // d fits one word: shift a full word further so the divisor's top
        // bit lands at bit 127
        let s = clz_64(d_lo);
        let n2 = (n >> (64 - s)) as u64;
        Some((n << (s + 64), d << (s + 64), n2))
    }
}

/// One quotient digit of the three-word prefix `(u2, u1, u0)` divided by the
/// normalized two-word divisor `(d1, d0)`, Knuth TAOCP 4.3.1 Algorithm D:
/// estimate from the top words, then refine downward while `q*d0` exceeds
/// `r*2^64 + u0`, bumping the remainder by `d1` until it overflows 64 bits.
/// For a two-word divisor the refined digit is exact, so no add-back pass
/// is needed.
///
/// Requires `(u2, u1) < (d1, d0)` and `d1` with its top bit set.
fn quotient_digit(u2: u64, u1: u64, u0: u64, d1: u64, d0: u64) -> u64 {
    debug_assert!(d1 >> 63 == 1, "divisor not normalized");
    debug_assert!(u2 < d1 || (u2 == d1 && u1 < d0), "digit does not fit");

    let (mut q, mut r, saturated) = if u2 == d1 {
        // the 128/64 estimate would overflow; start from the largest digit
        let (r, overflow) = d1.overflowing_add(u1);
        (u64::MAX, r, overflow)
    } else {
        let (q, r) = udiv_128_by_64(u1, u2, d1);
        (q, r, false)
    };

    if saturated {
        return q;
    }

    while umul_64x64_128(q, d0) > ((r as u128) << 64 | u0 as u128) {
        q -= 1;
        let (next, overflow) = r.overflowing_add(d1);
        if overflow {
            break;
        }
        r = next;
    }

    q
}

/// Unsigned Q64.64 divide: the 128-bit quotient `(n << 64) / d`.
///
/// Returns `None` when the quotient overflows 128 bits.
pub(crate) fn udiv_q64(n: u128, d: u128) -> Option<u128> {
    debug_assert!(d != 0, "division by zero");

    let (n, d, n2) = norm(n, d)?;
    let d1 = (d >> 64) as u64;
    let d0 = d as u64;
    let n1 = (n >> 64) as u64;
    let n0 = n as u64;

    // first digit, against the (n2, n1, n0) prefix
    let q1 = quotient_digit(n2, n1, n0, d1, d0);

    // multiply-subtract; the remainder is below the divisor, so wrapping
    // 128-bit arithmetic reproduces it exactly
    let rem = (((n1 as u128) << 64) | n0 as u128)
        .wrapping_sub(umul_64x64_128(q1, d0))
        .wrapping_sub(umul_64x64_128(q1, d1) << 64);

    // second digit, against (rem, 0)
    let q0 = quotient_digit((rem >> 64) as u64, rem as u64, 0, d1, d0);

    Some(((q1 as u128) << 64) | q0 as u128)
}

/// Integer quotient `floor(n / d)` of two raw 128-bit magnitudes, saturating
/// to `u64::MAX` when it does not fit 64 bits. Modulo reconstructs its
/// result from this single digit.
pub(crate) fn udiv_int(n: u128, d: u128) -> u64 {
    debug_assert!(d != 0, "division by zero");

    let Some((n, d, n2)) = norm(n, d) else {
        return u64::MAX;
    };
    let d1 = (d >> 64) as u64;
    let d0 = d as u64;

    quotient_digit(n2, (n >> 64) as u64, n as u64, d1, d0)
}
