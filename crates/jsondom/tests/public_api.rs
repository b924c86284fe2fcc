//! Exercises the crate surface the way an application would: parse a
//! configuration-style document, address into it, edit it, diff it, and
//! print it back.

use jsondom::{
    Format, Member, PrintBuffer, Value, apply_patches, compare, generate_patches, get_pointer,
    get_pointer_mut, minify, parse, parse_with_budget, print, print_compact, print_into,
    printed_len, sort_object,
};

const CONFIG: &[u8] = br#"
// service configuration
{
    "name": "gateway",   /* display name */
    "listen": { "host": "0.0.0.0", "port": 8080 },
    "upstreams": [ "one", "two" ],
    "limits": { "max_body": 1048576, "timeout_s": 2.5 }
}
"#;

#[test]
fn parse_edit_print_cycle() {
    let mut config = CONFIG.to_vec();
    minify(&mut config);
    let mut root = parse(&config).unwrap();

    assert_eq!(
        get_pointer(&root, "/listen/port"),
        Some(&Value::from(8080))
    );
    assert_eq!(
        get_pointer(&root, "/upstreams/1").and_then(Value::as_str),
        Some("two")
    );

    *get_pointer_mut(&mut root, "/listen/port").unwrap() = Value::from(9090);
    root.get_member_mut("upstreams").unwrap().push(Value::from("three"));

    let text = print_compact(&root);
    let reparsed = parse(text.as_bytes()).unwrap();
    assert_eq!(compare(&reparsed, &root), Ok(()));
    assert_eq!(
        get_pointer(&reparsed, "/listen/port"),
        Some(&Value::from(9090))
    );
}

#[test]
fn diffing_two_configs() {
    let mut old = parse(br#"{"name":"gateway","upstreams":["one","two"]}"#).unwrap();
    let new = parse(br#"{"name":"gateway","upstreams":["one"],"debug":true}"#).unwrap();
    let patches = generate_patches(&old, &new);
    apply_patches(&mut old, &patches).unwrap();
    assert_eq!(compare(&old, &new), Ok(()));
}

#[test]
fn building_documents_without_parsing() {
    let root = Value::Object(vec![
        Member::new("enabled", Value::Bool(true)),
        Member::new("ratio", Value::from(0.25)),
        Member::new("tags", Value::from_iter([Value::from("a"), Value::from("b")])),
    ]);
    assert_eq!(
        print_compact(&root),
        r#"{"enabled":true,"ratio":0.250000,"tags":["a","b"]}"#
    );
}

#[test]
fn incremental_printing_into_one_buffer() {
    let a = parse(b"[1,2]").unwrap();
    let b = parse(br#"{"x":null}"#).unwrap();
    let mut out = PrintBuffer::new();
    print_into(&a, &mut out, Format::Compact).unwrap();
    out.write_str("\n").unwrap();
    print_into(&b, &mut out, Format::Compact).unwrap();
    assert_eq!(out.as_str(), "[1,2]\n{\"x\":null}");
}

#[test]
fn exact_size_precomputation() {
    let root = parse(CONFIG_MINIFIED).unwrap();
    for format in [Format::Pretty, Format::Compact] {
        let expected = printed_len(&root, format);
        let text = match format {
            Format::Pretty => print(&root),
            Format::Compact => print_compact(&root),
        };
        assert_eq!(text.len(), expected);
    }
}

const CONFIG_MINIFIED: &[u8] =
    br#"{"name":"gateway","listen":{"host":"0.0.0.0","port":8080},"upstreams":["one","two"]}"#;

#[test]
fn budgeted_parsing_caps_allocation() {
    assert!(parse_with_budget(CONFIG_MINIFIED, 32).is_err());
    let bounded = parse_with_budget(CONFIG_MINIFIED, 1 << 16).unwrap();
    assert_eq!(bounded, parse(CONFIG_MINIFIED).unwrap());
}

#[test]
fn sorted_output_is_stable_for_comparison() {
    let mut a = parse(br#"{"b":1,"a":2}"#).unwrap();
    let mut b = parse(br#"{"a":2,"b":1}"#).unwrap();
    sort_object(&mut a);
    sort_object(&mut b);
    assert_eq!(print_compact(&a), print_compact(&b));
}

#[cfg(feature = "serde")]
#[test]
fn values_serialize_through_serde() {
    let root = parse(br#"{"a":[1,true,"x"]}"#).unwrap();
    let encoded = serde_json::to_string(&root).unwrap();
    let decoded: jsondom::Value = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, root);
}
