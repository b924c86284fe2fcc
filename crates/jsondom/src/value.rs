//! JSON value tree and structural editing.
//!
//! This module defines the [`Value`] enum, which represents any valid JSON
//! value, plus the in-place editing operations (append, insert, detach,
//! replace) that the patch engine builds on.

use core::fmt;

/// An object member: a name paired with a value.
///
/// Objects are insertion-ordered member lists. Duplicate names are permitted;
/// name-based lookups return the first match.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    pub name: String,
    pub value: Value,
}

impl Member {
    /// Creates a member from a name and a value.
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A JSON number carrying both of its views.
///
/// The `f64` is authoritative; the `i64` is a truncated alias kept in sync on
/// construction. Consumers needing exact integers beyond the float's mantissa
/// must go through [`Number::as_f64`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug)]
pub struct Number {
    double: f64,
    int: i64,
}

impl Number {
    /// Creates a number from a double, deriving the truncated integer alias.
    ///
    /// The alias saturates at the `i64` range; NaN maps to `0`.
    #[must_use]
    pub fn from_f64(double: f64) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let int = double as i64;
        Self { double, int }
    }

    /// The double view.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.double
    }

    /// The truncated integer alias.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        self.int
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        // Both views must agree, mirroring structural comparison.
        self.double == other.double && self.int == other.int
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Self::from_f64(v)
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let double = v as f64;
        Self { double, int: v }
    }
}

impl From<i32> for Number {
    fn from(v: i32) -> Self {
        Self::from(i64::from(v))
    }
}

/// A JSON value as defined by [RFC 8259].
///
/// Children of arrays and objects are owned vectors; every node exclusively
/// owns its payload, and dropping a node drops exactly the buffers it owns.
///
/// # Examples
///
/// ```
/// use jsondom::{Member, Value};
///
/// let mut v = Value::Object(Vec::new());
/// v.push_member("key", Value::from("value"));
/// assert_eq!(v.to_string(), r#"{"key":"value"}"#);
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(Vec<Member>),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(Number::from_f64(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Number(Number::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(Number::from(v))
    }
}

impl From<Number> for Value {
    fn from(v: Number) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Vec<Member>> for Value {
    fn from(v: Vec<Member>) -> Self {
        Self::Object(v)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::Array(iter.into_iter().collect())
    }
}

impl FromIterator<Member> for Value {
    fn from_iter<I: IntoIterator<Item = Member>>(iter: I) -> Self {
        Self::Object(iter.into_iter().collect())
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self::Object(
            iter.into_iter()
                .map(|(name, value)| Member { name, value })
                .collect(),
        )
    }
}

impl Value {
    /// Creates a string value holding the lowercase hex encoding of `bytes`.
    #[must_use]
    pub fn hex_string(bytes: &[u8]) -> Self {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut out = String::with_capacity(bytes.len() * 2);
        for &b in bytes {
            out.push(HEX[usize::from(b >> 4)] as char);
            out.push(HEX[usize::from(b & 0x0f)] as char);
        }
        Self::String(out)
    }

    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Bool`].
    ///
    /// [`Bool`]: Value::Bool
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(..))
    }

    /// Returns `true` if the value is [`Number`].
    ///
    /// [`Number`]: Value::Number
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(..))
    }

    /// Returns `true` if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Object`].
    ///
    /// [`Object`]: Value::Object
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// The boolean payload, if this is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The double view of the number, if this is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// The truncated integer alias of the number, if this is a number.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(n.as_i64()),
            _ => None,
        }
    }

    /// The string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Mutable access to the elements, if this is an array.
    #[must_use]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The members, if this is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&[Member]> {
        match self {
            Self::Object(members) => Some(members),
            _ => None,
        }
    }

    /// Mutable access to the members, if this is an object.
    #[must_use]
    pub fn as_object_mut(&mut self) -> Option<&mut Vec<Member>> {
        match self {
            Self::Object(members) => Some(members),
            _ => None,
        }
    }

    /// Number of children (array elements or object members); `0` for
    /// scalars.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Array(items) => items.len(),
            Self::Object(members) => members.len(),
            _ => 0,
        }
    }

    /// Returns `true` if the value has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The array element at `index`, if this is an array and `index` is in
    /// range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        match self {
            Self::Array(items) => items.get(index),
            _ => None,
        }
    }

    /// Mutable variant of [`Value::get`].
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        match self {
            Self::Array(items) => items.get_mut(index),
            _ => None,
        }
    }

    /// The value of the first member named `name`, if this is an object.
    ///
    /// Lookup is a case-sensitive byte comparison.
    #[must_use]
    pub fn get_member(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Object(members) => members
                .iter()
                .find(|member| member.name == name)
                .map(|member| &member.value),
            _ => None,
        }
    }

    /// Mutable variant of [`Value::get_member`].
    #[must_use]
    pub fn get_member_mut(&mut self, name: &str) -> Option<&mut Value> {
        match self {
            Self::Object(members) => members
                .iter_mut()
                .find(|member| member.name == name)
                .map(|member| &mut member.value),
            _ => None,
        }
    }

    /// Appends `value` to an array. Returns `false` (without mutating) if
    /// this is not an array.
    pub fn push(&mut self, value: Value) -> bool {
        match self {
            Self::Array(items) => {
                items.push(value);
                true
            }
            _ => false,
        }
    }

    /// Inserts `value` before `index`; an index past the end appends.
    ///
    /// Returns `false` (without mutating) if this is not an array.
    pub fn insert(&mut self, index: usize, value: Value) -> bool {
        match self {
            Self::Array(items) => {
                if index >= items.len() {
                    items.push(value);
                } else {
                    items.insert(index, value);
                }
                true
            }
            _ => false,
        }
    }

    /// Unlinks and returns the element at `index`, leaving its former
    /// siblings attached.
    pub fn detach(&mut self, index: usize) -> Option<Value> {
        match self {
            Self::Array(items) if index < items.len() => Some(items.remove(index)),
            _ => None,
        }
    }

    /// Detaches and drops the element at `index`. Returns `true` if an
    /// element was removed.
    pub fn remove(&mut self, index: usize) -> bool {
        self.detach(index).is_some()
    }

    /// Splices `value` into the position the element at `index` occupied,
    /// returning the old element.
    pub fn replace(&mut self, index: usize, value: Value) -> Option<Value> {
        match self {
            Self::Array(items) => items
                .get_mut(index)
                .map(|slot| core::mem::replace(slot, value)),
            _ => None,
        }
    }

    /// Appends a member to an object. Appends even when the name already
    /// exists. Returns `false` (without mutating) if this is not an object.
    pub fn push_member(&mut self, name: impl Into<String>, value: Value) -> bool {
        match self {
            Self::Object(members) => {
                members.push(Member::new(name, value));
                true
            }
            _ => false,
        }
    }

    /// Unlinks and returns the value of the first member named `name`.
    pub fn detach_member(&mut self, name: &str) -> Option<Value> {
        match self {
            Self::Object(members) => members
                .iter()
                .position(|member| member.name == name)
                .map(|index| members.remove(index).value),
            _ => None,
        }
    }

    /// Detaches and drops the first member named `name`. Returns `true` if a
    /// member was removed.
    pub fn remove_member(&mut self, name: &str) -> bool {
        self.detach_member(name).is_some()
    }

    /// Replaces the value of the first member named `name`, returning the
    /// old value. Does not insert when the name is absent.
    pub fn replace_member(&mut self, name: &str, value: Value) -> Option<Value> {
        self.get_member_mut(name)
            .map(|slot| core::mem::replace(slot, value))
    }
}

impl fmt::Display for Value {
    /// Renders the value compactly; use [`crate::print`] for the formatted
    /// form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::printer::print_compact(self))
    }
}
