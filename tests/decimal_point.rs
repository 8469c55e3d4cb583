//! The process-wide decimal-point byte. Kept in its own binary so the
//! global swap cannot race the other string tests.

use fixed128::{decimal_point, set_decimal_point, SQ64x64};

#[test]
fn comma_decimal_point_round_trips() {
    assert_eq!(decimal_point(), b'.');
    set_decimal_point(b',');

    let v = SQ64x64::from(-1.25f64);
    let mut buf = [0u8; 96];
    let n = v.to_chars(&mut buf);
    assert_eq!(&buf[..n], b"-1,25");

    let (back, end) = SQ64x64::parse("-1,25");
    assert_eq!(end, 5);
    assert_eq!(back, v);

    // '.' is no longer the decimal point, so parsing stops at it
    let (w, end) = SQ64x64::parse("1.5");
    assert_eq!(w, SQ64x64::ONE);
    assert_eq!(end, 1);

    set_decimal_point(b'.');
}
