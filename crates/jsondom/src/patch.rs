//! JSON Patch (RFC 6902): structural comparison, patch application, and
//! patch generation.
//!
//! Application is not transactional: patches apply in order, and a failing
//! patch leaves the document with every earlier patch already applied.

use thiserror::Error;

use crate::pointer::{escape_segment, get_pointer, get_pointer_mut, parse_array_index,
    unescape_segment};
use crate::value::{Member, Value};

/// Why two values were found structurally unequal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CompareError {
    #[error("values have different types")]
    TypeMismatch,
    #[error("numbers differ")]
    NumberMismatch,
    #[error("strings differ")]
    StringMismatch,
    #[error("arrays have different lengths or items")]
    ArrayMismatch,
    #[error("objects have different member names")]
    MemberNameMismatch,
    #[error("objects have different member counts")]
    ObjectLengthMismatch,
}

/// Why a patch document could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("patch document is not an array")]
    NotAPatchArray,
    #[error("patch is missing the {0:?} field")]
    MissingField(&'static str),
    #[error("patch field {0:?} has the wrong type")]
    InvalidField(&'static str),
    #[error("unknown patch operation {0:?}")]
    UnknownOp(String),
    #[error("path {0:?} does not resolve")]
    PathNotFound(String),
    #[error("path {0:?} is not a valid target")]
    InvalidPath(String),
    #[error("test failed: {0}")]
    TestFailed(CompareError),
}

/// Compares two values structurally.
///
/// Numbers compare on both their floating and integer views, strings and
/// member names byte for byte (case-sensitive). Object member order is
/// ignored: both sides are compared through temporarily sorted views, so
/// neither argument is mutated. `true` and `false` are distinct types here.
///
/// # Errors
///
/// The first [`CompareError`] encountered, in document order.
pub fn compare(a: &Value, b: &Value) -> Result<(), CompareError> {
    if kind_code(a) != kind_code(b) {
        return Err(CompareError::TypeMismatch);
    }
    match (a, b) {
        (Value::Null, Value::Null) | (Value::Bool(_), Value::Bool(_)) => Ok(()),
        (Value::Number(x), Value::Number(y)) => {
            if x == y {
                Ok(())
            } else {
                Err(CompareError::NumberMismatch)
            }
        }
        (Value::String(x), Value::String(y)) => {
            if x == y {
                Ok(())
            } else {
                Err(CompareError::StringMismatch)
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            if xs.len() != ys.len() {
                return Err(CompareError::ArrayMismatch);
            }
            for (x, y) in xs.iter().zip(ys) {
                compare(x, y)?;
            }
            Ok(())
        }
        (Value::Object(xs), Value::Object(ys)) => {
            if xs.len() != ys.len() {
                return Err(CompareError::ObjectLengthMismatch);
            }
            for (x, y) in sorted_refs(xs).into_iter().zip(sorted_refs(ys)) {
                if x.name != y.name {
                    return Err(CompareError::MemberNameMismatch);
                }
                compare(&x.value, &y.value)?;
            }
            Ok(())
        }
        _ => Err(CompareError::TypeMismatch),
    }
}

/// Applies a whole RFC 6902 patch document, in order.
///
/// # Errors
///
/// [`PatchError::NotAPatchArray`] if `patches` is not an array, otherwise the
/// first per-patch failure. Earlier patches stay applied on failure.
pub fn apply_patches(root: &mut Value, patches: &Value) -> Result<(), PatchError> {
    let Value::Array(items) = patches else {
        return Err(PatchError::NotAPatchArray);
    };
    for patch in items {
        apply_patch(root, patch)?;
    }
    Ok(())
}

/// Applies one patch object (`op`, `path`, and op-specific fields).
///
/// `add` on an existing object member replaces it; `add` to an array at
/// index `-` or past the end appends. The empty path addresses the whole
/// document for `add` and `replace`.
///
/// # Errors
///
/// A [`PatchError`] describing the malformed field or unresolvable path.
pub fn apply_patch(root: &mut Value, patch: &Value) -> Result<(), PatchError> {
    let op = required_str(patch, "op")?;
    let path = required_str(patch, "path")?;
    match op {
        "test" => {
            let expected = required_value(patch, "value")?;
            let actual =
                get_pointer(root, path).ok_or_else(|| PatchError::PathNotFound(path.to_owned()))?;
            compare(actual, expected).map_err(PatchError::TestFailed)
        }
        "remove" => {
            patch_detach(root, path)?;
            Ok(())
        }
        "add" => {
            let value = required_value(patch, "value")?.clone();
            if path.is_empty() {
                *root = value;
                Ok(())
            } else {
                patch_insert(root, path, value)
            }
        }
        "replace" => {
            let value = required_value(patch, "value")?.clone();
            if path.is_empty() {
                *root = value;
                Ok(())
            } else {
                patch_detach(root, path)?;
                patch_insert(root, path, value)
            }
        }
        "move" => {
            let from = required_str(patch, "from")?;
            let value = patch_detach(root, from)?;
            patch_insert(root, path, value)
        }
        "copy" => {
            let from = required_str(patch, "from")?;
            let value = get_pointer(root, from)
                .ok_or_else(|| PatchError::PathNotFound(from.to_owned()))?
                .clone();
            patch_insert(root, path, value)
        }
        other => Err(PatchError::UnknownOp(other.to_owned())),
    }
}

/// Computes a patch document transforming `from` into `to`.
///
/// Applying the result to `from` with [`apply_patches`] yields a document
/// that [`compare`]s equal to `to`. Array diffs rewrite the common prefix,
/// then remove or append the tail; object diffs walk both member sets in
/// sorted order.
#[must_use]
pub fn generate_patches(from: &Value, to: &Value) -> Value {
    let mut patches = Value::Array(Vec::new());
    diff(&mut patches, "", from, to);
    patches
}

/// Appends one patch object to `patches`, which must be an array.
pub fn add_patch_to_array(patches: &mut Value, op: &str, path: &str, value: Option<&Value>) {
    let mut patch = Value::Object(Vec::new());
    patch.push_member("op", Value::from(op));
    patch.push_member("path", Value::from(path));
    if let Some(value) = value {
        patch.push_member("value", value.clone());
    }
    patches.push(patch);
}

/// Sorts an object's members by name, in place. Stable, single level.
pub fn sort_object(value: &mut Value) {
    if let Value::Object(members) = value {
        members.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

fn sorted_refs(members: &[Member]) -> Vec<&Member> {
    let mut refs: Vec<&Member> = members.iter().collect();
    refs.sort_by(|a, b| a.name.cmp(&b.name));
    refs
}

fn kind_code(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(false) => 1,
        Value::Bool(true) => 2,
        Value::Number(_) => 3,
        Value::String(_) => 4,
        Value::Array(_) => 5,
        Value::Object(_) => 6,
    }
}

fn required_value<'a>(patch: &'a Value, field: &'static str) -> Result<&'a Value, PatchError> {
    patch
        .get_member(field)
        .ok_or(PatchError::MissingField(field))
}

fn required_str<'a>(patch: &'a Value, field: &'static str) -> Result<&'a str, PatchError> {
    required_value(patch, field)?
        .as_str()
        .ok_or(PatchError::InvalidField(field))
}

fn split_path(path: &str) -> Result<(&str, &str), PatchError> {
    path.rfind('/')
        .map(|at| (&path[..at], &path[at + 1..]))
        .ok_or_else(|| PatchError::InvalidPath(path.to_owned()))
}

fn patch_detach(root: &mut Value, path: &str) -> Result<Value, PatchError> {
    let (parent_path, last) = split_path(path)?;
    let parent = get_pointer_mut(root, parent_path)
        .ok_or_else(|| PatchError::PathNotFound(path.to_owned()))?;
    let detached = match parent {
        Value::Array(_) => {
            let index =
                parse_array_index(last).ok_or_else(|| PatchError::InvalidPath(path.to_owned()))?;
            parent.detach(index)
        }
        Value::Object(_) => parent.detach_member(&unescape_segment(last)),
        _ => None,
    };
    detached.ok_or_else(|| PatchError::PathNotFound(path.to_owned()))
}

fn patch_insert(root: &mut Value, path: &str, value: Value) -> Result<(), PatchError> {
    let (parent_path, last) = split_path(path)?;
    let parent = get_pointer_mut(root, parent_path)
        .ok_or_else(|| PatchError::PathNotFound(path.to_owned()))?;
    match parent {
        Value::Array(_) => {
            if last == "-" {
                parent.push(value);
            } else {
                let index = parse_array_index(last)
                    .ok_or_else(|| PatchError::InvalidPath(path.to_owned()))?;
                // Past-the-end indices append.
                parent.insert(index, value);
            }
            Ok(())
        }
        Value::Object(_) => {
            let name = unescape_segment(last);
            // Upsert: an existing member is displaced, the new one appended.
            parent.remove_member(&name);
            parent.push_member(name, value);
            Ok(())
        }
        _ => Err(PatchError::PathNotFound(path.to_owned())),
    }
}

fn diff(patches: &mut Value, path: &str, from: &Value, to: &Value) {
    if kind_code(from) != kind_code(to) {
        add_patch_to_array(patches, "replace", path, Some(to));
        return;
    }
    match (from, to) {
        (Value::Number(x), Value::Number(y)) => {
            if x != y {
                add_patch_to_array(patches, "replace", path, Some(to));
            }
        }
        (Value::String(x), Value::String(y)) => {
            if x != y {
                add_patch_to_array(patches, "replace", path, Some(to));
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            let common = xs.len().min(ys.len());
            for (i, (x, y)) in xs.iter().zip(ys).enumerate() {
                diff(patches, &format!("{path}/{i}"), x, y);
            }
            // Surplus items vacate the same index as earlier removals shift
            // the tail down.
            for _ in common..xs.len() {
                add_patch_to_array(patches, "remove", &format!("{path}/{common}"), None);
            }
            for y in &ys[common..] {
                add_patch_to_array(patches, "add", &format!("{path}/-"), Some(y));
            }
        }
        (Value::Object(xs), Value::Object(ys)) => {
            let xs = sorted_refs(xs);
            let ys = sorted_refs(ys);
            let mut i = 0;
            let mut j = 0;
            while i < xs.len() || j < ys.len() {
                let order = match (xs.get(i), ys.get(j)) {
                    (Some(x), Some(y)) => x.name.cmp(&y.name),
                    (Some(_), None) => core::cmp::Ordering::Less,
                    (None, _) => core::cmp::Ordering::Greater,
                };
                match order {
                    core::cmp::Ordering::Less => {
                        let member_path = format!("{path}/{}", escape_segment(&xs[i].name));
                        add_patch_to_array(patches, "remove", &member_path, None);
                        i += 1;
                    }
                    core::cmp::Ordering::Greater => {
                        let member_path = format!("{path}/{}", escape_segment(&ys[j].name));
                        add_patch_to_array(patches, "add", &member_path, Some(&ys[j].value));
                        j += 1;
                    }
                    core::cmp::Ordering::Equal => {
                        let member_path = format!("{path}/{}", escape_segment(&xs[i].name));
                        diff(patches, &member_path, &xs[i].value, &ys[j].value);
                        i += 1;
                        j += 1;
                    }
                }
            }
        }
        _ => {}
    }
}
