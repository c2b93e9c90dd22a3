//! Output formatting: layout (compact or indented) and string escaping.
//!
//! `serde_json` already applies the escapes JSON requires (quote, backslash,
//! control characters).  With `relaxed_escaping` off the formatter also
//! escapes characters that are unsafe to embed in HTML or script contexts and
//! every non-ASCII character, as `\uXXXX` (UTF-16 surrogate pairs above the
//! BMP).

use std::io;

use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};

use crate::Dialect;

enum Layout<'a> {
    Compact(CompactFormatter),
    Pretty(PrettyFormatter<'a>),
}

pub(crate) struct DialectFormatter<'a> {
    layout: Layout<'a>,
    escape_unsafe: bool,
}

impl<'a> DialectFormatter<'a> {
    /// `indent` is the per-level indentation, used only when the dialect
    /// writes indented output.
    pub(crate) fn new(dialect: &Dialect, indent: &'a [u8]) -> Self {
        let layout = if dialect.write_indented {
            Layout::Pretty(PrettyFormatter::with_indent(indent))
        } else {
            Layout::Compact(CompactFormatter)
        };
        Self {
            layout,
            escape_unsafe: !dialect.relaxed_escaping,
        }
    }
}

fn must_escape(c: char) -> bool {
    !c.is_ascii() || matches!(c, '<' | '>' | '&' | '\'' | '+' | '`')
}

macro_rules! delegate_layout {
    ($($method:ident($($arg:ident: $ty:ty),*);)*) => {
        $(
            fn $method<W>(&mut self, writer: &mut W $(, $arg: $ty)*) -> io::Result<()>
            where
                W: ?Sized + io::Write,
            {
                match &mut self.layout {
                    Layout::Compact(f) => f.$method(writer $(, $arg)*),
                    Layout::Pretty(f) => f.$method(writer $(, $arg)*),
                }
            }
        )*
    };
}

impl Formatter for DialectFormatter<'_> {
    delegate_layout! {
        begin_array();
        end_array();
        begin_array_value(first: bool);
        end_array_value();
        begin_object();
        end_object();
        begin_object_key(first: bool);
        end_object_key();
        begin_object_value();
        end_object_value();
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !self.escape_unsafe {
            return writer.write_all(fragment.as_bytes());
        }

        let mut start = 0;
        for (idx, c) in fragment.char_indices() {
            if !must_escape(c) {
                continue;
            }
            writer.write_all(fragment[start..idx].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04X}")?;
            }
            start = idx + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
