//! In-place whitespace and comment stripping.
//!
//! This is a best-effort lexical pass, not grammar-aware beyond tracking
//! string literals: it never inspects string contents except to skip escaped
//! quotes.

use bstr::ByteSlice;

/// Strips JSON whitespace, `//` line comments and `/* */` block comments in
/// place, truncating `json` to the written length.
///
/// String literals are copied verbatim, including escaped quotes. The pass is
/// idempotent.
///
/// # Examples
///
/// ```
/// use jsondom::minify;
///
/// let mut doc = b"{ \"a\" : 1 } // done".to_vec();
/// minify(&mut doc);
/// assert_eq!(doc, b"{\"a\":1}");
/// ```
pub fn minify(json: &mut Vec<u8>) {
    let len = json.len();
    let mut read = 0;
    let mut write = 0;
    while read < len {
        match json[read] {
            b' ' | b'\t' | b'\r' | b'\n' => read += 1,
            b'/' if json.get(read + 1) == Some(&b'/') => {
                // Line comment: skip to the end of the line.
                read += 2;
                read = json[read..]
                    .find_byte(b'\n')
                    .map_or(len, |offset| read + offset);
            }
            b'/' if json.get(read + 1) == Some(&b'*') => {
                // Block comment: skip past the terminator.
                read += 2;
                read = json[read..]
                    .find(b"*/")
                    .map_or(len, |offset| read + offset + 2);
            }
            b'"' => {
                json[write] = b'"';
                write += 1;
                read += 1;
                while read < len && json[read] != b'"' {
                    if json[read] == b'\\' && read + 1 < len {
                        json[write] = b'\\';
                        write += 1;
                        read += 1;
                    }
                    json[write] = json[read];
                    write += 1;
                    read += 1;
                }
                if read < len {
                    json[write] = b'"';
                    write += 1;
                    read += 1;
                }
            }
            other => {
                json[write] = other;
                write += 1;
                read += 1;
            }
        }
    }
    json.truncate(write);
}

#[cfg(test)]
mod tests {
    use super::minify;

    fn minified(input: &[u8]) -> Vec<u8> {
        let mut data = input.to_vec();
        minify(&mut data);
        data
    }

    #[test]
    fn strips_whitespace() {
        assert_eq!(minified(b" [ 1 ,\n\t2 ] "), b"[1,2]");
    }

    #[test]
    fn strips_comments() {
        assert_eq!(
            minified(b"{\n  \"a\": 1, // trailing\n  \"b\": /* inline */ 2\n}"),
            br#"{"a":1,"b":2}"#
        );
    }

    #[test]
    fn unterminated_comment_consumes_the_rest() {
        assert_eq!(minified(b"[1] /* dangling"), b"[1]");
    }

    #[test]
    fn preserves_string_contents() {
        assert_eq!(
            minified(br#"{ "a b": "c // not a comment \" d" }"#),
            br#"{"a b":"c // not a comment \" d"}"#
        );
    }

    #[test]
    fn idempotent() {
        let once = minified(b"{ \"a\" : [ 1 , 2 ] /* x */ }");
        let twice = minified(&once);
        assert_eq!(once, twice);
    }
}
