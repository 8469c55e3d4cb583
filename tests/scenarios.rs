//! End-to-end scenarios through the public surface.

use fixed128::{FormatOptions, SQ64x64, Sign};

fn fmt(v: SQ64x64, opt: &FormatOptions) -> String {
    let mut buf = [0u8; 192];
    let n = v.format(&mut buf, opt);
    String::from_utf8(buf[..n].to_vec()).unwrap()
}

#[test]
fn integer_product_renders_plain() {
    let v = SQ64x64::from(3i64) * SQ64x64::from(7i64);
    assert_eq!(fmt(v, &FormatOptions::default()), "21");

    let opt = FormatOptions {
        force_decimal: true,
        ..Default::default()
    };
    assert_eq!(fmt(v, &opt), "21.");
}

#[test]
fn one_third_at_twenty_digits() {
    let v = SQ64x64::ONE / SQ64x64::from(3i64);
    let opt = FormatOptions {
        precision: 20,
        ..Default::default()
    };
    // the stored quotient is floor(2^64 / 3) * 2^-64, one ulp shy of 1/3,
    // and the final digit rounds half-up on the residue
    assert_eq!(fmt(v, &opt), "0.33333333333333333332");
}

#[test]
fn hex_fraction_parses_exactly() {
    let (v, end) = SQ64x64::parse("0x1.8");
    assert_eq!(end, 5);
    assert_eq!(v.hi(), 1);
    assert_eq!(v.lo(), 0x8000_0000_0000_0000);
    assert_eq!(v, SQ64x64::from(1.5f64));
}

#[test]
fn zero_padded_signed_width() {
    let opt = FormatOptions {
        sign: Sign::Plus,
        width: 8,
        zero_pad: true,
        precision: 2,
        ..Default::default()
    };
    assert_eq!(fmt(SQ64x64::from(-1.25f64), &opt), "-0001.25");
}

#[test]
fn extremes_compare() {
    assert!(SQ64x64::MIN < SQ64x64::MAX);
    assert_eq!(SQ64x64::MIN.cmp(&SQ64x64::MAX), std::cmp::Ordering::Less);
}

#[test]
fn negative_dividend_modulo() {
    let a = SQ64x64::from(-7i64);
    let b = SQ64x64::from(3i64);
    assert_eq!(a % b, SQ64x64::from(-1i64));
    assert_eq!((a % b).to_int(), -1);

    let q = a / b;
    let t = if q.is_negative() { q.ceil() } else { q.floor() };
    assert_eq!(t * b + a % b, a);
}

#[test]
fn parse_reports_first_unconsumed_byte() {
    let s = "  +3.14abc";
    let (v, end) = SQ64x64::parse(s);
    assert_eq!(&s[end..], "abc");
    assert_eq!(v.hi(), 3);
    assert!((v.to_f64() - 3.14).abs() < 1e-15);
}

#[test]
fn out_of_range_doubles_saturate() {
    assert_eq!(SQ64x64::from(1e300f64), SQ64x64::MAX);
    assert_eq!(SQ64x64::from(-1e300f64), SQ64x64::MIN);
}
