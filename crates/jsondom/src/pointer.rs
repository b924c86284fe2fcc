//! JSON Pointer (RFC 6901) resolution.

use crate::value::Value;

/// Escapes a single path segment: `~` becomes `~0`, `/` becomes `~1`.
#[must_use]
pub fn escape_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '~' => out.push_str("~0"),
            '/' => out.push_str("~1"),
            _ => out.push(c),
        }
    }
    out
}

/// Decodes a single path segment: `~0` becomes `~`, any other `~x` becomes
/// `/`.
#[must_use]
pub fn unescape_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some(_) => out.push('/'),
                None => out.push('~'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// A plain decimal array index; anything else is not an index.
pub(crate) fn parse_array_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Resolves an RFC 6901 pointer against `root`.
///
/// The empty pointer addresses the root itself. Any type mismatch,
/// out-of-range index, or missing member yields `None`. Member comparison is
/// case-sensitive.
///
/// # Examples
///
/// ```
/// use jsondom::{get_pointer, parse, Value};
///
/// let root = parse(br#"{"a/b":1,"c":{"d":2}}"#).unwrap();
/// assert_eq!(get_pointer(&root, "/a~1b"), Some(&Value::from(1)));
/// assert_eq!(get_pointer(&root, "/c/d"), Some(&Value::from(2)));
/// assert_eq!(get_pointer(&root, "/missing"), None);
/// ```
#[must_use]
pub fn get_pointer<'a>(root: &'a Value, pointer: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in segments(pointer)? {
        current = match current {
            Value::Array(items) => items.get(parse_array_index(segment)?)?,
            Value::Object(_) => current.get_member(&unescape_segment(segment))?,
            _ => return None,
        };
    }
    Some(current)
}

/// Mutable variant of [`get_pointer`].
#[must_use]
pub fn get_pointer_mut<'a>(root: &'a mut Value, pointer: &str) -> Option<&'a mut Value> {
    let mut current = root;
    for segment in segments(pointer)? {
        current = match current {
            Value::Array(items) => items.get_mut(parse_array_index(segment)?)?,
            Value::Object(_) => current.get_member_mut(&unescape_segment(segment))?,
            _ => return None,
        };
    }
    Some(current)
}

fn segments(pointer: &str) -> Option<impl Iterator<Item = &str>> {
    if pointer.is_empty() {
        Some(None.into_iter().flatten())
    } else {
        let rest = pointer.strip_prefix('/')?;
        Some(Some(rest.split('/')).into_iter().flatten())
    }
}

/// Finds the pointer addressing `target` inside `root`, by node identity.
///
/// Returns the empty string when `root` *is* `target`, and `None` when the
/// target is unreachable.
#[must_use]
pub fn find_pointer_from_object_to(root: &Value, target: &Value) -> Option<String> {
    if core::ptr::eq(root, target) {
        return Some(String::new());
    }
    match root {
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if let Some(suffix) = find_pointer_from_object_to(item, target) {
                    return Some(format!("/{index}{suffix}"));
                }
            }
        }
        Value::Object(members) => {
            for member in members {
                if let Some(suffix) = find_pointer_from_object_to(&member.value, target) {
                    return Some(format!("/{}{suffix}", escape_segment(&member.name)));
                }
            }
        }
        _ => {}
    }
    None
}
