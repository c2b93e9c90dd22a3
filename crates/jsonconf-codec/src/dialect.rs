//! Serializer switches controlling how tolerant the reader is and how the
//! writer formats its output.
//!
//! A [`Dialect`] is plain data.  Build it once, wrap it in an `Arc` if many
//! options bundles should share it, and never mutate it afterwards: the codec
//! reads the switches on every call and assumes they do not change under it.

/// Encoder/decoder switches for configuration files.
///
/// The default dialect is the relaxed one used for hand-edited config files.
/// Use [`Dialect::strict`] to get the plain `serde_json` behaviour.
///
/// # Example
///
/// ```rust
/// use jsonconf_codec::Dialect;
///
/// let dialect = Dialect::default();
/// assert!(dialect.allow_trailing_commas);
/// assert_eq!(dialect.indent_width, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    /// Read: accept a comma after the last element of an array or object.
    pub allow_trailing_commas: bool,
    /// Read: ignore `//` line comments and `/* */` block comments.
    pub skip_comments: bool,
    /// Read: match struct field names ignoring ASCII case.
    pub case_insensitive_fields: bool,
    /// Write: emit unit enum variants by name.  When `false`, the variant's
    /// ordinal is written instead.  The reader accepts both forms.
    ///
    /// The written ordinal is the declaration index, while the reader counts
    /// only variants it can deserialize.  An enum with a
    /// `#[serde(skip)]`/`skip_deserializing` variant ahead of others cannot
    /// round-trip as ordinals; [`crate::encode_verified`] reports that as an
    /// encode error.
    pub enums_as_strings: bool,
    /// Read: accept numbers given as quoted strings, plus `"NaN"`,
    /// `"Infinity"` and `"-Infinity"` for floats.
    /// Write: emit non-finite floats as those strings instead of `null`.
    pub permissive_numbers: bool,
    /// Write: apply only the escapes JSON requires.  When `false`, HTML
    /// sensitive characters and all non-ASCII text are written as `\uXXXX`.
    pub relaxed_escaping: bool,
    /// Write: pretty-print with newlines and indentation.
    pub write_indented: bool,
    /// Spaces per nesting level when `write_indented` is set.
    pub indent_width: usize,
}

impl Default for Dialect {
    /// | Field                     | Default |
    /// |---------------------------|---------|
    /// | allow_trailing_commas     | `true`  |
    /// | skip_comments             | `true`  |
    /// | case_insensitive_fields   | `true`  |
    /// | enums_as_strings          | `true`  |
    /// | permissive_numbers        | `true`  |
    /// | relaxed_escaping          | `true`  |
    /// | write_indented            | `true`  |
    /// | indent_width              | `2`     |
    fn default() -> Self {
        Self {
            allow_trailing_commas: true,
            skip_comments: true,
            case_insensitive_fields: true,
            enums_as_strings: true,
            permissive_numbers: true,
            relaxed_escaping: true,
            write_indented: true,
            indent_width: 2,
        }
    }
}

impl Dialect {
    /// Every tolerance switch off, compact output with conservative escaping.
    pub fn strict() -> Self {
        Self {
            allow_trailing_commas: false,
            skip_comments: false,
            case_insensitive_fields: false,
            enums_as_strings: true,
            permissive_numbers: false,
            relaxed_escaping: false,
            write_indented: false,
            indent_width: 0,
        }
    }

    /// `true` when the input text must be rewritten before parsing.
    pub(crate) fn needs_relaxing(&self) -> bool {
        self.allow_trailing_commas || self.skip_comments
    }
}
