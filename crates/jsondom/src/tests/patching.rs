//! End-to-end patch scenarios over larger documents.

use crate::{
    Value, apply_patches, compare, find_pointer_from_object_to, generate_patches, get_pointer,
    parse_str, print_compact,
};

fn doc(text: &str) -> Value {
    parse_str(text).unwrap()
}

const LIBRARY: &str = r#"{
    "title": "catalogue",
    "books": [
        {"id": 1, "name": "first",  "tags": ["a", "b"]},
        {"id": 2, "name": "second", "tags": []}
    ],
    "meta": {"rev": 3, "locked": false}
}"#;

#[test]
fn rfc_appendix_style_sequence() {
    let mut root = doc(r#"{"foo":"bar"}"#);
    let patches = doc(
        r#"[
            {"op":"add","path":"/baz","value":"qux"},
            {"op":"add","path":"/list","value":[]},
            {"op":"add","path":"/list/-","value":1},
            {"op":"add","path":"/list/0","value":0},
            {"op":"test","path":"/list","value":[0,1]},
            {"op":"move","from":"/baz","path":"/list/-"},
            {"op":"copy","from":"/list/2","path":"/copied"},
            {"op":"replace","path":"/foo","value":"BAR"},
            {"op":"remove","path":"/list/0"}
        ]"#,
    );
    apply_patches(&mut root, &patches).unwrap();
    let expected = doc(r#"{"foo":"BAR","list":[1,"qux"],"copied":"qux"}"#);
    assert_eq!(compare(&root, &expected), Ok(()));
}

#[test]
fn generated_patches_round_trip_on_nested_documents() {
    let mut from = doc(LIBRARY);
    let to = doc(
        r#"{
            "title": "catalogue v2",
            "books": [
                {"id": 1, "name": "first", "tags": ["a"]},
                {"id": 2, "name": "second", "tags": ["x"]},
                {"id": 3, "name": "third", "tags": []}
            ],
            "meta": {"rev": 4, "locked": false, "owner": "ops"}
        }"#,
    );
    let patches = generate_patches(&from, &to);
    apply_patches(&mut from, &patches).unwrap();
    assert_eq!(compare(&from, &to), Ok(()));
}

#[test]
fn generated_patch_paths_escape_member_names() {
    let from = doc(r#"{"a/b":1,"t~s":2}"#);
    let to = doc(r#"{"a/b":2}"#);
    let patches = generate_patches(&from, &to);
    let text = print_compact(&patches);
    assert!(text.contains(r#""path":"/a~1b""#), "{text}");
    assert!(text.contains(r#""path":"/t~0s""#), "{text}");
}

#[test]
fn found_pointers_resolve_back_to_the_same_node() {
    let root = doc(LIBRARY);
    let targets = [
        get_pointer(&root, "/books/1/tags").unwrap(),
        get_pointer(&root, "/meta/rev").unwrap(),
        get_pointer(&root, "/title").unwrap(),
    ];
    for target in targets {
        let pointer = find_pointer_from_object_to(&root, target).unwrap();
        assert!(core::ptr::eq(get_pointer(&root, &pointer).unwrap(), target));
    }
}

#[test]
fn patching_preserves_untouched_subtrees() {
    let mut root = doc(LIBRARY);
    let patches = doc(r#"[{"op":"replace","path":"/meta/rev","value":4}]"#);
    apply_patches(&mut root, &patches).unwrap();
    assert_eq!(
        get_pointer(&root, "/books/0/tags/1"),
        Some(&Value::from("b"))
    );
    assert_eq!(get_pointer(&root, "/meta/rev"), Some(&Value::from(4)));
}
