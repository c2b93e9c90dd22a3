//! Encoding and decoding of configuration documents under a [`Dialect`].
//!
//! Decoding runs in three steps:
//!
//! ```text
//! text ──relax──▶ strict JSON ──serde_json──▶ Value ──DialectDeserializer──▶ T
//! ```
//!
//! Splitting the parse (step 2) from the shape check (step 3) is what lets
//! callers tell a syntax error apart from a schema mismatch.
//!
//! Encoding wraps the value in the dialect serializer and writes it with the
//! dialect formatter.

use std::string::FromUtf8Error;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::trace;

use crate::de::DialectDeserializer;
use crate::escape::DialectFormatter;
use crate::relax::relax;
use crate::ser::DialectSerialize;
use crate::Dialect;

/// Errors produced while encoding or decoding a document.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The text is not valid JSON (after dialect relaxation).
    #[error("malformed JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    /// The text is valid JSON but does not fit the target type.
    #[error("JSON does not match the expected shape: {0}")]
    Schema(#[source] serde_json::Error),

    /// The value could not be serialized.
    #[error("failed to serialize value: {0}")]
    Encode(#[source] serde_json::Error),

    /// The serializer produced bytes that are not UTF-8.
    #[error("serialized output is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// Serializes `value` to a JSON document under `dialect`.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if the value's `Serialize` impl fails (for
/// example a map with non-string keys).
///
/// # Examples
///
/// ```rust
/// use jsonconf_codec::{encode, Dialect};
///
/// let text = encode(&vec![1, 2], &Dialect::strict()).unwrap();
/// assert_eq!(text, "[1,2]");
/// ```
pub fn encode<T>(value: &T, dialect: &Dialect) -> Result<String, CodecError>
where
    T: ?Sized + Serialize,
{
    let indent = " ".repeat(dialect.indent_width);
    let formatter = DialectFormatter::new(dialect, indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(Vec::with_capacity(128), formatter);

    DialectSerialize::new(value, dialect)
        .serialize(&mut ser)
        .map_err(CodecError::Encode)?;

    let text = String::from_utf8(ser.into_inner())?;
    trace!(bytes = text.len(), "encoded document");
    Ok(text)
}

/// [`encode`], then proves the text decodes back to the same document.
///
/// The check only runs when `dialect.enums_as_strings` is off: ordinal enums
/// are the one encoding the reader may resolve differently from the writer
/// (see [`Dialect::enums_as_strings`]).  Name-based dialects skip it.
///
/// # Errors
///
/// Everything [`encode`] returns, plus [`CodecError::Encode`] when the
/// written text does not read back as the same value.
pub fn encode_verified<T>(value: &T, dialect: &Dialect) -> Result<String, CodecError>
where
    T: Serialize + DeserializeOwned,
{
    let text = encode(value, dialect)?;
    if dialect.enums_as_strings {
        return Ok(text);
    }

    let reread = decode::<T>(&text, dialect)
        .map_err(|err| unstable_encoding(&format!("written text does not read back: {err}")))?;
    let rewritten = match reread {
        Some(reread) => encode(&reread, dialect)?,
        None => "null".to_owned(),
    };
    if parse_document(&text)? != parse_document(&rewritten)? {
        return Err(unstable_encoding(
            "enum ordinals read back as different variants; \
             a variant skipped for deserialization shifts the ordinals",
        ));
    }
    trace!("ordinal encoding verified");
    Ok(text)
}

fn parse_document(text: &str) -> Result<Value, CodecError> {
    serde_json::from_str(text).map_err(CodecError::Encode)
}

fn unstable_encoding(msg: &str) -> CodecError {
    CodecError::Encode(<serde_json::Error as serde::ser::Error>::custom(msg))
}

/// Deserializes a document into `T` under `dialect`.
///
/// A document consisting of the JSON literal `null` decodes to `Ok(None)`
/// rather than an error: callers treat a null body as "no value".  A leading
/// UTF-8 byte order mark is ignored.
///
/// # Errors
///
/// Returns [`CodecError::Syntax`] if the text is not JSON, and
/// [`CodecError::Schema`] if it does not fit `T`.
///
/// # Examples
///
/// ```rust
/// use jsonconf_codec::{decode, Dialect};
///
/// let v: Option<Vec<u8>> = decode("[1, 2, /* three */ 3,]", &Dialect::default()).unwrap();
/// assert_eq!(v, Some(vec![1, 2, 3]));
///
/// let none: Option<Vec<u8>> = decode("null", &Dialect::default()).unwrap();
/// assert_eq!(none, None);
/// ```
pub fn decode<T>(text: &str, dialect: &Dialect) -> Result<Option<T>, CodecError>
where
    T: DeserializeOwned,
{
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let relaxed = relax(text, dialect);
    let value: Value = serde_json::from_str(&relaxed).map_err(CodecError::Syntax)?;

    if value.is_null() {
        trace!("document is the literal null");
        return Ok(None);
    }

    T::deserialize(DialectDeserializer::new(value, dialect))
        .map(Some)
        .map_err(CodecError::Schema)
}
