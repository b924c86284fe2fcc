//! Recursive-descent JSON parser.
//!
//! A single cursor walks the input byte slice; `parse_value` dispatches on
//! the lookahead byte and each sub-parser leaves the cursor exactly past the
//! text it consumed. Failures are values: every error carries the byte offset
//! where parsing stopped.

use core::mem;

use thiserror::Error;

use crate::value::{Member, Number, Value};

/// What went wrong during a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected byte 0x{0:02x}")]
    UnexpectedByte(u8),
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid literal")]
    InvalidLiteral,
    #[error("invalid number")]
    InvalidNumber,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    #[error("allocation budget exhausted")]
    BudgetExhausted,
}

/// A parse failure and the byte offset where it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at byte {offset}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

/// Parses a JSON document from bytes.
///
/// Leading whitespace is skipped and trailing bytes after the root value are
/// ignored.
///
/// # Errors
///
/// [`ParseError`] with the offset of the first offending byte.
///
/// # Examples
///
/// ```
/// use jsondom::{parse, Value};
///
/// let v = parse(b"[1, 2, 3]").unwrap();
/// assert_eq!(v.len(), 3);
/// ```
pub fn parse(input: &[u8]) -> Result<Value, ParseError> {
    Parser::new(input, Budget::Unbounded).parse_document()
}

/// Parses a JSON document from a string slice.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_str(input: &str) -> Result<Value, ParseError> {
    parse(input.as_bytes())
}

/// Parses with a fixed allocation budget, in bytes.
///
/// Every node and string allocation is charged against the budget; once it is
/// exhausted all further allocations fail and the parse stops with
/// [`ParseErrorKind::BudgetExhausted`]. The partially built tree is dropped
/// as a whole. Like an arena, the budget must be sized generously up front.
///
/// # Errors
///
/// See [`parse`], plus [`ParseErrorKind::BudgetExhausted`].
pub fn parse_with_budget(input: &[u8], budget: usize) -> Result<Value, ParseError> {
    Parser::new(input, Budget::Bounded(budget)).parse_document()
}

/// Allocation accounting for bounded parsing.
#[derive(Debug, Clone, Copy)]
enum Budget {
    Unbounded,
    Bounded(usize),
}

impl Budget {
    fn charge(&mut self, bytes: usize) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Bounded(remaining) => {
                if *remaining >= bytes {
                    *remaining -= bytes;
                    true
                } else {
                    false
                }
            }
        }
    }
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    budget: Budget,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8], budget: Budget) -> Self {
        Self {
            input,
            pos: 0,
            budget,
        }
    }

    fn parse_document(mut self) -> Result<Value, ParseError> {
        self.skip_whitespace();
        self.parse_value()
    }

    fn err(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            offset: self.pos,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Any byte `<= 0x20` counts as whitespace between tokens.
    fn skip_whitespace(&mut self) {
        while self.input.get(self.pos).is_some_and(|&b| b <= 0x20) {
            self.pos += 1;
        }
    }

    fn charge(&mut self, bytes: usize) -> Result<(), ParseError> {
        if self.budget.charge(bytes) {
            Ok(())
        } else {
            Err(self.err(ParseErrorKind::BudgetExhausted))
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        self.charge(mem::size_of::<Value>())?;
        match self.peek() {
            Some(b'n') => self.parse_literal(b"null", Value::Null),
            Some(b't') => self.parse_literal(b"true", Value::Bool(true)),
            Some(b'f') => self.parse_literal(b"false", Value::Bool(false)),
            Some(b'"') => self.parse_string().map(Value::String),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(b'[') => self.parse_array(),
            Some(b'{') => self.parse_object(),
            Some(other) => Err(self.err(ParseErrorKind::UnexpectedByte(other))),
            None => Err(self.err(ParseErrorKind::UnexpectedEof)),
        }
    }

    /// Case-sensitive, exact-length literal match.
    fn parse_literal(&mut self, literal: &[u8], value: Value) -> Result<Value, ParseError> {
        if self.input[self.pos..].starts_with(literal) {
            self.pos += literal.len();
            Ok(value)
        } else {
            Err(self.err(ParseErrorKind::InvalidLiteral))
        }
    }

    /// Scans the longest numeric lexeme and hands it to the standard float
    /// parser; the truncated integer alias is derived from the same double.
    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        self.skip_digits();
        if self.peek() == Some(b'.') {
            self.pos += 1;
            self.skip_digits();
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            self.skip_digits();
        }
        let lexeme = &self.input[start..self.pos];
        let invalid = ParseError {
            kind: ParseErrorKind::InvalidNumber,
            offset: start,
        };
        let text = core::str::from_utf8(lexeme).map_err(|_| invalid)?;
        let double: f64 = text.parse().map_err(|_| invalid)?;
        Ok(Value::Number(Number::from_f64(double)))
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    /// Parses a quoted string, decoding escapes and UTF-16 surrogate pairs.
    fn parse_string(&mut self) -> Result<String, ParseError> {
        if self.peek() != Some(b'"') {
            return Err(self.err(match self.peek() {
                Some(b) => ParseErrorKind::UnexpectedByte(b),
                None => ParseErrorKind::UnexpectedEof,
            }));
        }
        let quote = self.pos;
        self.pos += 1;

        // Find the closing quote, skipping escaped bytes, so the output can
        // be sized (and charged) up front. The raw span is an upper bound on
        // the decoded length: every escape shrinks.
        let mut end = self.pos;
        loop {
            match self.input.get(end) {
                Some(b'"') => break,
                Some(b'\\') => end += 2,
                Some(_) => end += 1,
                None => {
                    return Err(ParseError {
                        kind: ParseErrorKind::UnterminatedString,
                        offset: quote,
                    });
                }
            }
        }
        let span = end - self.pos;
        self.charge(span)?;

        let mut out = String::with_capacity(span);
        while self.pos < end {
            match self.input[self.pos] {
                b'\\' => {
                    self.pos += 1;
                    self.decode_escape(&mut out)?;
                }
                _ => {
                    // Copy the contiguous run of unescaped bytes in one go.
                    let run_start = self.pos;
                    while self.pos < end && self.input[self.pos] != b'\\' {
                        self.pos += 1;
                    }
                    let run = &self.input[run_start..self.pos];
                    let text = core::str::from_utf8(run).map_err(|e| ParseError {
                        kind: ParseErrorKind::InvalidUtf8,
                        offset: run_start + e.valid_up_to(),
                    })?;
                    out.push_str(text);
                }
            }
        }
        // Consume the closing quote.
        self.pos = end + 1;
        Ok(out)
    }

    /// Decodes one escape sequence; the cursor sits just past the backslash.
    fn decode_escape(&mut self, out: &mut String) -> Result<(), ParseError> {
        let Some(byte) = self.peek() else {
            return Err(self.err(ParseErrorKind::UnterminatedString));
        };
        self.pos += 1;
        match byte {
            b'b' => out.push('\u{0008}'),
            b'f' => out.push('\u{000c}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => return self.decode_unicode_escape(out),
            other if other.is_ascii() => out.push(other as char),
            _ => {
                return Err(ParseError {
                    kind: ParseErrorKind::InvalidEscape,
                    offset: self.pos - 1,
                });
            }
        }
        Ok(())
    }

    /// Decodes `\uXXXX`, combining UTF-16 surrogate pairs.
    ///
    /// A NUL escape or an unmatched/invalid surrogate half is dropped without
    /// emitting anything; parsing continues.
    fn decode_unicode_escape(&mut self, out: &mut String) -> Result<(), ParseError> {
        let unit = self.parse_hex4()?;

        // Lone low half or NUL: drop silently.
        if unit == 0 || (0xdc00..=0xdfff).contains(&unit) {
            return Ok(());
        }

        let code_point = if (0xd800..=0xdbff).contains(&unit) {
            // High half: require an immediately following low half, or drop.
            if self.input.get(self.pos) != Some(&b'\\') || self.input.get(self.pos + 1) != Some(&b'u')
            {
                return Ok(());
            }
            self.pos += 2;
            let low = self.parse_hex4()?;
            if !(0xdc00..=0xdfff).contains(&low) {
                return Ok(());
            }
            0x10000 + (((unit & 0x3ff) << 10) | (low & 0x3ff))
        } else {
            unit
        };

        match char::from_u32(code_point) {
            Some(c) => {
                out.push(c);
                Ok(())
            }
            None => Err(ParseError {
                kind: ParseErrorKind::InvalidEscape,
                offset: self.pos - 4,
            }),
        }
    }

    /// Reads exactly four hex digits. A non-hex digit is a hard error.
    fn parse_hex4(&mut self) -> Result<u32, ParseError> {
        let mut acc: u32 = 0;
        for _ in 0..4 {
            let digit = match self.peek() {
                Some(b @ b'0'..=b'9') => u32::from(b - b'0'),
                Some(b @ b'a'..=b'f') => u32::from(b - b'a') + 10,
                Some(b @ b'A'..=b'F') => u32::from(b - b'A') + 10,
                Some(_) => return Err(self.err(ParseErrorKind::InvalidEscape)),
                None => return Err(self.err(ParseErrorKind::UnexpectedEof)),
            };
            acc = (acc << 4) | digit;
            self.pos += 1;
        }
        Ok(acc)
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        self.pos += 1; // consume '['
        self.skip_whitespace();
        let mut elements = Vec::new();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(Value::Array(elements));
        }
        loop {
            elements.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                }
                Some(b']') => {
                    self.pos += 1;
                    return Ok(Value::Array(elements));
                }
                Some(other) => return Err(self.err(ParseErrorKind::UnexpectedByte(other))),
                None => return Err(self.err(ParseErrorKind::UnexpectedEof)),
            }
        }
    }

    fn parse_object(&mut self) -> Result<Value, ParseError> {
        self.pos += 1; // consume '{'
        self.skip_whitespace();
        let mut members = Vec::new();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(Value::Object(members));
        }
        loop {
            self.charge(mem::size_of::<Member>())?;
            let name = self.parse_string()?;
            self.skip_whitespace();
            match self.peek() {
                Some(b':') => self.pos += 1,
                Some(other) => return Err(self.err(ParseErrorKind::UnexpectedByte(other))),
                None => return Err(self.err(ParseErrorKind::UnexpectedEof)),
            }
            self.skip_whitespace();
            let value = self.parse_value()?;
            members.push(Member { name, value });
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                }
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(Value::Object(members));
                }
                Some(other) => return Err(self.err(ParseErrorKind::UnexpectedByte(other))),
                None => return Err(self.err(ParseErrorKind::UnexpectedEof)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ParseErrorKind, parse, parse_str};
    use crate::value::Value;

    #[test]
    fn literals() {
        assert_eq!(parse(b"null").unwrap(), Value::Null);
        assert_eq!(parse(b" true ").unwrap(), Value::Bool(true));
        assert_eq!(parse(b"false").unwrap(), Value::Bool(false));
    }

    #[test]
    fn literal_is_case_sensitive() {
        let err = parse(b"Null").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedByte(b'N'));
        let err = parse(b"nul").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidLiteral);
    }

    #[test]
    fn numbers() {
        assert_eq!(parse(b"0").unwrap().as_f64(), Some(0.0));
        assert_eq!(parse(b"-12.5").unwrap().as_f64(), Some(-12.5));
        assert_eq!(parse(b"1e3").unwrap().as_f64(), Some(1000.0));
        assert_eq!(parse(b"2.5E-1").unwrap().as_f64(), Some(0.25));
        assert_eq!(parse(b"7").unwrap().as_i64(), Some(7));
    }

    #[test]
    fn number_cursor_stops_at_lexeme_end() {
        let v = parse(b"[1,2]").unwrap();
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn bad_number_reports_start_offset() {
        let err = parse(b"  -").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidNumber);
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn strings_with_escapes() {
        let v = parse_str(r#""a\"b\\c\/d\n""#).unwrap();
        assert_eq!(v.as_str(), Some("a\"b\\c/d\n"));
    }

    #[test]
    fn unknown_escape_passes_byte_through() {
        let v = parse_str(r#""\q""#).unwrap();
        assert_eq!(v.as_str(), Some("q"));
    }

    #[test]
    fn unicode_escape_bmp() {
        let v = parse_str(r#""Aé""#).unwrap();
        assert_eq!(v.as_str(), Some("Aé"));
    }

    #[test]
    fn surrogate_pair_decodes_to_four_utf8_bytes() {
        let v = parse_str(r#""😀""#).unwrap();
        assert_eq!(v.as_str(), Some("😀"));
        assert_eq!(v.as_str().unwrap().len(), 4);
    }

    #[test]
    fn lone_surrogate_halves_are_dropped() {
        assert_eq!(parse_str(r#""a\uD83Db""#).unwrap().as_str(), Some("ab"));
        assert_eq!(parse_str(r#""a\uDE00b""#).unwrap().as_str(), Some("ab"));
        assert_eq!(parse_str(r#""a\u0000b""#).unwrap().as_str(), Some("ab"));
    }

    #[test]
    fn invalid_hex_digit_is_a_hard_error() {
        let err = parse_str(r#""\u00zz""#).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidEscape);
    }

    #[test]
    fn unterminated_string_fails_at_opening_quote() {
        let err = parse_str(r#"{"a": "b"#).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
        assert_eq!(err.offset, 6);
    }

    #[test]
    fn nested_containers() {
        let v = parse_str(r#"{"a": [1, {"b": null}], "c": "d"}"#).unwrap();
        assert_eq!(v.len(), 2);
        let a = v.get_member("a").unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a.get(1).unwrap().get_member("b"), Some(&Value::Null));
    }

    #[test]
    fn missing_comma_or_bracket_is_malformed() {
        let err = parse(b"[1 2]").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedByte(b'2'));
        let err = parse(b"{\"a\" 1}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedByte(b'1'));
        let err = parse(b"[1,").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = parse(b"   ").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        assert_eq!(parse(b"1 trailing").unwrap().as_i64(), Some(1));
    }

    #[test]
    fn budget_exhaustion_fails_cleanly() {
        let doc = br#"{"a": [1, 2, 3, 4], "b": "some longer string value"}"#;
        let err = super::parse_with_budget(doc, 16).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::BudgetExhausted);
        // A generous budget parses to the same tree as heap mode.
        let bounded = super::parse_with_budget(doc, 1 << 16).unwrap();
        assert_eq!(bounded, parse(doc).unwrap());
    }
}
