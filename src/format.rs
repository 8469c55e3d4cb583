use crate::{wide, SQ64x64};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// The byte printed and parsed as the decimal point. Process-wide.
static DECIMAL_POINT: AtomicU8 = AtomicU8::new(b'.');

/// The current decimal-point byte (`b'.'` unless changed).
#[inline]
pub fn decimal_point() -> u8 {
    DECIMAL_POINT.load(Ordering::Relaxed)
}

/// Replace the decimal-point byte used by formatting and parsing.
///
/// The update is atomic but unsynchronized with concurrent formatting;
/// callers that need a stable value across calls own that coordination.
#[inline]
pub fn set_decimal_point(byte: u8) {
    DECIMAL_POINT.store(byte, Ordering::Relaxed);
}

/// Sign column behavior for non-negative values.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Sign {
    /// No sign character.
    #[default]
    Default,
    /// A leading space.
    Space,
    /// A leading `+`.
    Plus,
}

/// Rendering options, printf-flavored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    pub sign: Sign,
    /// Minimum total width in characters. One column is always reserved
    /// for the sign slot.
    pub width: i32,
    /// Fractional digits to print, or `-1` to print the exact expansion,
    /// stopping after the last nonzero digit. Every fraction terminates
    /// within 64 digits, so the output re-parses to the exact same value.
    pub precision: i32,
    pub zero_pad: bool,
    /// Print the decimal point even when no fractional digits follow.
    pub force_decimal: bool,
    pub left_align: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            sign: Sign::Default,
            width: 0,
            precision: -1,
            zero_pad: false,
            force_decimal: false,
            left_align: false,
        }
    }
}

/// Output cursor that truncates at the buffer boundary, always leaving one
/// byte for the terminator.
struct Out<'a> {
    dst: &'a mut [u8],
    len: usize,
}

impl Out<'_> {
    #[inline]
    fn put(&mut self, byte: u8) -> Option<()> {
        if self.len + 1 == self.dst.len() {
            return None;
        }
        self.dst[self.len] = byte;
        self.len += 1;
        Some(())
    }
}

impl SQ64x64 {
    /// Render into `dst` with explicit options.
    ///
    /// A buffer of `max(width, precision + 22) + 1` bytes (or
    /// `max(width, 87) + 1` when the precision is defaulted) always holds
    /// the complete string. A smaller buffer truncates the output, which is
    /// still NUL-terminated. Returns the number of bytes written, terminator
    /// excluded.
    ///
    /// # Panics
    ///
    /// Panics when `dst` is empty.
    pub fn format(self, dst: &mut [u8], opt: &FormatOptions) -> usize {
        assert!(!dst.is_empty(), "destination cannot hold the terminator");

        let mut scratch = [0u8; 128];
        let negative = self.is_negative();
        let tmp = self.abs();

        let width = opt.width.max(0) as usize;
        let mut precision;
        let full_precision;
        let mut trail = 0usize;
        if opt.precision < 0 {
            // the exact expansion: any 64-bit fraction terminates within 64
            // digits, well inside the scratch capacity
            precision = scratch.len() - 21;
            full_precision = false;
        } else {
            precision = opt.precision as usize;
            full_precision = true;
            if precision > scratch.len() - 21 {
                trail = precision - (scratch.len() - 21);
                precision = scratch.len() - 21;
            }
        }

        let mut whole = tmp.hi();
        let mut frac = tmp.lo();
        let mut cursor = 0usize;
        let mut point = 0usize; // scratch below this index is fractional

        // fractional digits first: rounding may carry into the whole part
        if frac != 0 || opt.force_decimal {
            while frac != 0 || (full_precision && precision != 0) {
                if cursor == precision {
                    if (frac as i64) < 0 {
                        // the residue is half a digit or more: round up,
                        // walking the carry backward
                        let mut carry = true;
                        for c in scratch[..cursor].iter_mut().rev() {
                            if *c == b'9' {
                                *c = b'0';
                            } else {
                                *c += 1;
                                carry = false;
                                break;
                            }
                        }
                        if carry {
                            whole = whole.wrapping_add(1);
                        }
                    }
                    break;
                }
                let p = wide::umul_64x64_128(frac, 10);
                frac = p as u64;
                scratch[cursor] = (p >> 64) as u8 + b'0';
                cursor += 1;
            }

            point = cursor;
            if opt.force_decimal || precision != 0 {
                scratch[cursor] = decimal_point();
                cursor += 1;
            }
        }

        // whole digits, least significant first
        loop {
            scratch[cursor] = (whole % 10) as u8 + b'0';
            cursor += 1;
            whole /= 10;
            if whole == 0 {
                break;
            }
        }

        let mut out = Out { dst, len: 0 };
        let _ = render(&mut out, &scratch, cursor, point, negative, opt, width, trail);
        let n = out.len;
        out.dst[n] = 0;
        n
    }

    /// Render with a printf-style specification: an optional `%`, the flags
    /// `' '`, `+`, `0`, `-`, `#` in any order, an optional width, an
    /// optional `.precision` and an optional trailing `f`, all of which may
    /// be omitted. Same buffer contract as [`Self::format`].
    pub fn formatf(self, dst: &mut [u8], spec: &str) -> usize {
        let mut opt = FormatOptions::default();
        let mut s = spec.as_bytes();

        if let [b'%', rest @ ..] = s {
            s = rest;
        }

        loop {
            match s.first() {
                Some(&b' ') if opt.sign != Sign::Plus => opt.sign = Sign::Space,
                Some(&b'+') => opt.sign = Sign::Plus,
                Some(&b'0') => opt.zero_pad = true,
                Some(&b'-') => opt.left_align = true,
                Some(&b'#') => opt.force_decimal = true,
                _ => break,
            }
            s = &s[1..];
        }

        opt.width = 0;
        while let Some(&d) = s.first() {
            if !d.is_ascii_digit() {
                break;
            }
            opt.width = opt.width.wrapping_mul(10).wrapping_add((d - b'0') as i32);
            s = &s[1..];
        }

        if s.first() == Some(&b'.') {
            s = &s[1..];
            opt.precision = 0;
            while let Some(&d) = s.first() {
                if !d.is_ascii_digit() {
                    break;
                }
                opt.precision = opt
                    .precision
                    .wrapping_mul(10)
                    .wrapping_add((d - b'0') as i32);
                s = &s[1..];
            }
        }

        self.format(dst, &opt)
    }

    /// Render with default options. Same buffer contract as
    /// [`Self::format`]; 87 bytes always suffice.
    #[inline]
    pub fn to_chars(self, dst: &mut [u8]) -> usize {
        self.format(dst, &FormatOptions::default())
    }
}

#[allow(clippy::too_many_arguments)]
fn render(
    out: &mut Out<'_>,
    scratch: &[u8],
    cursor: usize,
    point: usize,
    negative: bool,
    opt: &FormatOptions,
    width: usize,
    trail: usize,
) -> Option<()> {
    let sign = if negative {
        Some(b'-')
    } else {
        match opt.sign {
            Sign::Plus => Some(b'+'),
            Sign::Space => Some(b' '),
            Sign::Default => None,
        }
    };

    // one column is reserved for the sign slot whether or not it is used
    let mut pad = width as isize - cursor as isize - 1;

    if !opt.left_align {
        if opt.zero_pad {
            match sign {
                Some(c) => out.put(c)?,
                None => pad += 1,
            }
            while pad > 0 {
                out.put(b'0')?;
                pad -= 1;
            }
        } else {
            while pad > 0 {
                out.put(b' ')?;
                pad -= 1;
            }
        }
    }

    if opt.left_align || !opt.zero_pad {
        match sign {
            Some(c) => out.put(c)?,
            None => pad += 1,
        }
    }

    // the whole digits were stored in reverse, with the decimal point at
    // the section boundary
    for &c in scratch[point..cursor].iter().rev() {
        out.put(c)?;
    }
    for &c in &scratch[..point] {
        out.put(c)?;
    }

    if opt.left_align {
        let pad_char = if opt.zero_pad { b'0' } else { b' ' };
        while pad > 0 {
            out.put(pad_char)?;
            pad -= 1;
        }
    }

    // explicit precision beyond the scratch capacity continues with zeros
    for _ in 0..trail {
        out.put(b'0')?;
    }

    Some(())
}

impl fmt::Display for SQ64x64 {
    /// Maps the standard formatter onto [`FormatOptions`]: `+` requests the
    /// leading plus, `#` forces the decimal point, `0` zero-pads, `<`
    /// left-aligns; width and precision carry over, clamped to 160 and 107
    /// so the rendering fits a stack buffer.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut opt = FormatOptions::default();
        if f.sign_plus() {
            opt.sign = Sign::Plus;
        }
        if f.alternate() {
            opt.force_decimal = true;
        }
        if f.sign_aware_zero_pad() {
            opt.zero_pad = true;
        }
        if f.align() == Some(fmt::Alignment::Left) {
            opt.left_align = true;
        }
        if let Some(w) = f.width() {
            opt.width = w.min(160) as i32;
        }
        if let Some(p) = f.precision() {
            opt.precision = p.min(107) as i32;
        }

        let mut buf = [0u8; 192];
        let n = self.format(&mut buf, &opt);
        let s = core::str::from_utf8(&buf[..n]).map_err(|_| fmt::Error)?;
        f.write_str(s)
    }
}

impl fmt::Debug for SQ64x64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
