use rstest::rstest;

use crate::{Format, PrintBuffer, Value, parse_str, print, print_buffered, print_compact,
    print_into, printed_len};

#[rstest]
#[case::zero(0.0, "0")]
#[case::negative_zero(-0.0, "0")]
#[case::small_int(3.0, "3")]
#[case::negative_int(-42.0, "-42")]
#[case::fraction(3.5, "3.500000")]
#[case::quarter(-0.25, "-0.250000")]
#[case::nan(f64::NAN, "null")]
#[case::infinity(f64::INFINITY, "null")]
#[case::negative_infinity(f64::NEG_INFINITY, "null")]
#[case::whole_beyond_i64(1.0e19, "10000000000000000000")]
#[case::tiny(1.0e-9, "1.000000e-09")]
#[case::whole_above_threshold(1.5e10, "15000000000")]
#[case::fractional_above_threshold(5_000_000_000.25, "5.000000e+09")]
#[case::large_exponent(1.0e120, "1.000000e+120")]
fn number_forms(#[case] d: f64, #[case] expected: &str) {
    assert_eq!(print_compact(&Value::from(d)), expected);
}

#[rstest]
#[case::scalar("null")]
#[case::string(r#""a\tb\u0001c""#)]
#[case::every_escape(r#""\" \\ \b \f \n \r \t""#)]
#[case::array("[1,[2,[]],3]")]
#[case::object(r#"{"a":{"b":[true,null]},"empty":{}}"#)]
fn both_formats_reparse_equal(#[case] text: &str) {
    let v = parse_str(text).unwrap();
    assert_eq!(parse_str(&print(&v)).unwrap(), v);
    assert_eq!(parse_str(&print_compact(&v)).unwrap(), v);
}

#[rstest]
#[case::compact(Format::Compact)]
#[case::pretty(Format::Pretty)]
fn measured_length_is_exact(#[case] format: Format) {
    let v = parse_str(r#"{"s":"tab\there","xs":[0,1.25,-3],"o":{"inner":{}},"e":[]}"#).unwrap();
    let mut out = PrintBuffer::new();
    print_into(&v, &mut out, format).unwrap();
    assert_eq!(out.len(), printed_len(&v, format));
}

#[test]
fn buffered_printing_matches_direct() {
    let v = parse_str(r#"{"a":[1,2,3]}"#).unwrap();
    for prebuffer in [0, 1, 4096] {
        let text = print_buffered(&v, prebuffer, Format::Pretty).unwrap();
        assert_eq!(text, print(&v));
    }
}

#[test]
fn compact_output_is_valid_for_other_readers() {
    let v = parse_str(r#"{"name":"demo \"quoted\"","xs":[1,2.5],"flag":true,"none":null}"#)
        .unwrap();
    let reparsed: serde_json::Value = serde_json::from_str(&print_compact(&v)).unwrap();
    assert_eq!(reparsed["name"], "demo \"quoted\"");
    assert_eq!(reparsed["xs"][1], 2.5);
    assert_eq!(reparsed["flag"], true);
    assert!(reparsed["none"].is_null());
}

#[test]
fn display_is_compact() {
    let v = parse_str(r#"{ "a" : 1 }"#).unwrap();
    assert_eq!(v.to_string(), r#"{"a":1}"#);
}
