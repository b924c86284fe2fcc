//! Dual-mode JSON renderer.
//!
//! Every value can be rendered along two independent dimensions: format
//! ([`Format::Pretty`] with tabs or [`Format::Compact`]) and destination (a
//! fresh exactly-sized allocation, or a caller-managed [`PrintBuffer`]).
//! The exact output size is computed by [`printed_len`] before any byte is
//! written; the measuring and writing passes share one escape predicate so
//! their accounting cannot drift apart.

use core::convert::Infallible;

use crate::buffer::{PrintBuffer, PrintError};
use crate::value::{Member, Number, Value};

/// Output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Objects one member per line, tab indentation; arrays inline with a
    /// space after each comma.
    #[default]
    Pretty,
    /// No whitespace at all.
    Compact,
}

/// Renders a value as formatted text.
///
/// # Examples
///
/// ```
/// use jsondom::{parse, print};
///
/// let v = parse(br#"{"a":[1,2]}"#).unwrap();
/// assert_eq!(print(&v), "{\n\t\"a\":\t[1, 2]\n}");
/// ```
#[must_use]
pub fn print(value: &Value) -> String {
    render(value, Format::Pretty)
}

/// Renders a value as compact text.
#[must_use]
pub fn print_compact(value: &Value) -> String {
    render(value, Format::Compact)
}

/// Renders a value into a caller-managed buffer, appending at its cursor.
///
/// # Errors
///
/// [`PrintError`] if growing the buffer fails; every write checks the grow
/// result first, so the buffer holds a valid prefix of the output.
pub fn print_into(value: &Value, out: &mut PrintBuffer, format: Format) -> Result<(), PrintError> {
    write_value(value, 0, format, out)
}

/// Renders into a fresh buffer pre-sized to `prebuffer` bytes.
///
/// # Errors
///
/// [`PrintError`] if an allocation fails.
pub fn print_buffered(
    value: &Value,
    prebuffer: usize,
    format: Format,
) -> Result<String, PrintError> {
    let mut out = PrintBuffer::with_capacity(prebuffer)?;
    print_into(value, &mut out, format)?;
    Ok(out.into_string())
}

/// Computes the exact byte length [`print`]/[`print_compact`] will produce.
#[must_use]
pub fn printed_len(value: &Value, format: Format) -> usize {
    measure_value(value, 0, format)
}

fn render(value: &Value, format: Format) -> String {
    let expected = printed_len(value, format);
    let mut out = String::with_capacity(expected);
    match write_value(value, 0, format, &mut out) {
        Ok(()) => {}
        Err(never) => match never {},
    }
    debug_assert_eq!(out.len(), expected);
    out
}

/// Output destination for the writer pass.
trait Sink {
    type Error;
    fn write_str(&mut self, text: &str) -> Result<(), Self::Error>;
}

impl Sink for String {
    type Error = Infallible;

    fn write_str(&mut self, text: &str) -> Result<(), Infallible> {
        self.push_str(text);
        Ok(())
    }
}

impl Sink for PrintBuffer {
    type Error = PrintError;

    fn write_str(&mut self, text: &str) -> Result<(), PrintError> {
        PrintBuffer::write_str(self, text)
    }
}

fn write_value<S: Sink>(
    value: &Value,
    depth: usize,
    format: Format,
    out: &mut S,
) -> Result<(), S::Error> {
    match value {
        Value::Null => out.write_str("null"),
        Value::Bool(true) => out.write_str("true"),
        Value::Bool(false) => out.write_str("false"),
        Value::Number(n) => out.write_str(&number_text(*n)),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => write_array(items, depth, format, out),
        Value::Object(members) => write_object(members, depth, format, out),
    }
}

fn measure_value(value: &Value, depth: usize, format: Format) -> usize {
    match value {
        Value::Null | Value::Bool(true) => 4,
        Value::Bool(false) => 5,
        Value::Number(n) => number_text(*n).len(),
        Value::String(s) => measure_string(s),
        Value::Array(items) => measure_array(items, depth, format),
        Value::Object(members) => measure_object(members, depth, format),
    }
}

/// Renders a number with the fixed special-case priority order:
/// zero, integer form, non-finite, whole, scientific, fixed 6-decimal.
fn number_text(n: Number) -> String {
    let d = n.as_f64();
    #[allow(clippy::cast_precision_loss)]
    let int_roundtrips = d >= i64::MIN as f64
        && d <= i64::MAX as f64
        && (n.as_i64() as f64 - d).abs() <= f64::EPSILON;
    if d == 0.0 {
        "0".to_owned()
    } else if int_roundtrips {
        n.as_i64().to_string()
    } else if d.is_nan() || d.is_infinite() {
        "null".to_owned()
    } else if (d.floor() - d).abs() <= f64::EPSILON && d.abs() < 1.0e60 {
        format!("{d:.0}")
    } else if d.abs() < 1.0e-6 || d.abs() > 1.0e9 {
        exponential_text(d)
    } else {
        format!("{d:.6}")
    }
}

/// `printf %e` layout: six fractional digits, signed two-digit-plus exponent.
fn exponential_text(d: f64) -> String {
    let raw = format!("{d:.6e}");
    match raw.find('e') {
        Some(split) => {
            let (mantissa, exponent) = raw.split_at(split);
            let exponent = &exponent[1..];
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(rest) => ('-', rest),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => raw,
    }
}

/// How many output bytes `byte` occupies inside a string literal: `None`
/// means it passes through raw. Both the measuring and writing scans go
/// through this one predicate.
fn escaped_len(byte: u8) -> Option<usize> {
    match byte {
        b'"' | b'\\' | 0x08 | 0x0c | b'\n' | b'\r' | b'\t' => Some(2),
        b if b < 0x20 => Some(6),
        _ => None,
    }
}

fn measure_string(s: &str) -> usize {
    2 + s
        .bytes()
        .map(|b| escaped_len(b).unwrap_or(1))
        .sum::<usize>()
}

fn write_string<S: Sink>(s: &str, out: &mut S) -> Result<(), S::Error> {
    out.write_str("\"")?;
    let bytes = s.as_bytes();
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if escaped_len(b).is_some() {
            // Escaped bytes are all ASCII, so slicing here stays on char
            // boundaries.
            out.write_str(&s[start..i])?;
            write_escape(b, out)?;
            start = i + 1;
        }
    }
    out.write_str(&s[start..])?;
    out.write_str("\"")
}

fn write_escape<S: Sink>(byte: u8, out: &mut S) -> Result<(), S::Error> {
    match byte {
        b'"' => out.write_str("\\\""),
        b'\\' => out.write_str("\\\\"),
        0x08 => out.write_str("\\b"),
        0x0c => out.write_str("\\f"),
        b'\n' => out.write_str("\\n"),
        b'\r' => out.write_str("\\r"),
        b'\t' => out.write_str("\\t"),
        other => out.write_str(&format!("\\u{:04x}", u32::from(other))),
    }
}

fn write_array<S: Sink>(
    items: &[Value],
    depth: usize,
    format: Format,
    out: &mut S,
) -> Result<(), S::Error> {
    if items.is_empty() {
        return out.write_str("[]");
    }
    out.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_str(match format {
                Format::Pretty => ", ",
                Format::Compact => ",",
            })?;
        }
        write_value(item, depth + 1, format, out)?;
    }
    out.write_str("]")
}

fn measure_array(items: &[Value], depth: usize, format: Format) -> usize {
    if items.is_empty() {
        return 2;
    }
    let separator = match format {
        Format::Pretty => 2,
        Format::Compact => 1,
    };
    2 + (items.len() - 1) * separator
        + items
            .iter()
            .map(|item| measure_value(item, depth + 1, format))
            .sum::<usize>()
}

fn write_object<S: Sink>(
    members: &[Member],
    depth: usize,
    format: Format,
    out: &mut S,
) -> Result<(), S::Error> {
    let pretty = format == Format::Pretty;
    if members.is_empty() {
        // The closing brace sits at the parent's indentation.
        out.write_str("{")?;
        if pretty {
            out.write_str("\n")?;
            write_tabs(depth, out)?;
        }
        return out.write_str("}");
    }
    out.write_str("{")?;
    if pretty {
        out.write_str("\n")?;
    }
    for (i, member) in members.iter().enumerate() {
        if pretty {
            write_tabs(depth + 1, out)?;
        }
        write_string(&member.name, out)?;
        out.write_str(":")?;
        if pretty {
            out.write_str("\t")?;
        }
        write_value(&member.value, depth + 1, format, out)?;
        if i + 1 < members.len() {
            out.write_str(",")?;
        }
        if pretty {
            out.write_str("\n")?;
        }
    }
    if pretty {
        write_tabs(depth, out)?;
    }
    out.write_str("}")
}

fn measure_object(members: &[Member], depth: usize, format: Format) -> usize {
    let pretty = format == Format::Pretty;
    if members.is_empty() {
        return if pretty { 3 + depth } else { 2 };
    }
    let mut total = 2; // braces
    if pretty {
        total += 1 + depth; // newline after '{' plus closing indentation
    }
    for (i, member) in members.iter().enumerate() {
        if pretty {
            total += depth + 1; // member indentation
        }
        total += measure_string(&member.name) + 1; // name and ':'
        if pretty {
            total += 1; // '\t' after ':'
        }
        total += measure_value(&member.value, depth + 1, format);
        if i + 1 < members.len() {
            total += 1; // ','
        }
        if pretty {
            total += 1; // '\n'
        }
    }
    total
}

fn write_tabs<S: Sink>(depth: usize, out: &mut S) -> Result<(), S::Error> {
    for _ in 0..depth {
        out.write_str("\t")?;
    }
    Ok(())
}
