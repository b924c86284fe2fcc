//! An owned JSON document tree with a dual-mode text codec, JSON Pointer
//! (RFC 6901) addressing, and JSON Patch (RFC 6902) diff/apply.
//!
//! Documents are parsed from bytes into a [`Value`] tree, edited in place,
//! and printed back either pretty (tab-indented objects, inline arrays) or
//! compact. The printer measures its exact output size before writing, so
//! [`print`] allocates once and [`printed_len`] is always truthful.
//!
//! ```rust
//! use jsondom::{apply_patches, generate_patches, parse, print_compact};
//!
//! let mut doc = parse(br#"{"name":"demo","tags":["a"]}"#)?;
//! let target = parse(br#"{"name":"demo","tags":["a","b"]}"#)?;
//!
//! let patches = generate_patches(&doc, &target);
//! apply_patches(&mut doc, &patches).unwrap();
//! assert_eq!(print_compact(&doc), r#"{"name":"demo","tags":["a","b"]}"#);
//! # Ok::<(), jsondom::ParseError>(())
//! ```

#![allow(missing_docs)]

mod buffer;
mod minify;
mod parser;
mod patch;
mod pointer;
mod printer;
mod value;

#[cfg(test)]
mod tests;

pub use buffer::{PrintBuffer, PrintError};
pub use minify::minify;
pub use parser::{ParseError, ParseErrorKind, parse, parse_str, parse_with_budget};
pub use patch::{
    CompareError, PatchError, add_patch_to_array, apply_patch, apply_patches, compare,
    generate_patches, sort_object,
};
pub use pointer::{
    escape_segment, find_pointer_from_object_to, get_pointer, get_pointer_mut, unescape_segment,
};
pub use printer::{Format, print, print_buffered, print_compact, print_into, printed_len};
pub use value::{Member, Number, Value};
