//! # jsonconf-codec
//!
//! The JSON layer underneath `jsonconf`: turns configuration payloads into
//! text and back under a configurable [`Dialect`].
//!
//! This crate has no file-system access.  It is a thin, dialect-aware layer
//! over `serde_json`:
//!
//! - **`dialect`** – the switch bundle (trailing commas, comments, case
//!   insensitive fields, enum names vs ordinals, permissive numbers, escaping,
//!   indentation).
//! - **`relax`** – rewrites hand-edited text (comments, trailing commas) into
//!   strict JSON before parsing.
//! - **`codec`** – [`encode`] and [`decode`], the two entry points, plus
//!   [`encode_verified`] for writers that must read back what they wrote.
//!
//! The serde adapters doing the field-level work (`de`, `ser`, `escape`) are
//! internal.

pub mod codec;
mod de;
pub mod dialect;
mod escape;
pub mod relax;
mod ser;

pub use codec::{decode, encode, encode_verified, CodecError};
pub use dialect::Dialect;
