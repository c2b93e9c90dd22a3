//! Text pre-pass that turns hand-edited JSON into strict JSON.
//!
//! `serde_json` rejects comments and trailing commas.  Rather than fork the
//! parser, the reader rewrites the input first:
//!
//! - `// ...` comments are dropped up to (not including) the newline, so line
//!   numbers in later parse errors still point at the right place.
//! - `/* ... */` comments are replaced by a single space, keeping any newlines
//!   they contained.
//! - A comma whose next significant character is `]` or `}` is removed.
//!
//! String literals are copied verbatim, escapes included.  An unterminated
//! block comment is left in place so the parser reports it.

use std::borrow::Cow;

use crate::Dialect;

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    String,
    StringEscape,
    LineComment,
    BlockComment,
}

/// Rewrites `input` according to the read-side switches of `dialect`.
///
/// Returns the input unchanged (borrowed) when the dialect has no read-side
/// tolerance enabled.
pub fn relax<'a>(input: &'a str, dialect: &Dialect) -> Cow<'a, str> {
    if !dialect.needs_relaxing() {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut state = State::Code;
    // Byte offset in `out` of a comma that may turn out to be trailing.
    let mut pending_comma: Option<usize> = None;
    // Start of the current block comment in `input`, for the unterminated case.
    let mut block_start = 0;
    let mut chars = input.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        match state {
            State::String => {
                out.push(c);
                match c {
                    '\\' => state = State::StringEscape,
                    '"' => state = State::Code,
                    _ => {}
                }
            }
            State::StringEscape => {
                out.push(c);
                state = State::String;
            }
            State::LineComment => {
                if c == '\n' {
                    out.push(c);
                    state = State::Code;
                }
            }
            State::BlockComment => {
                if c == '\n' {
                    out.push(c);
                } else if c == '*' && matches!(chars.peek(), Some((_, '/'))) {
                    chars.next();
                    out.push(' ');
                    state = State::Code;
                }
            }
            State::Code => {
                if dialect.skip_comments && c == '/' {
                    match chars.peek() {
                        Some((_, '/')) => {
                            chars.next();
                            state = State::LineComment;
                            continue;
                        }
                        Some((_, '*')) => {
                            chars.next();
                            block_start = idx;
                            state = State::BlockComment;
                            continue;
                        }
                        _ => {}
                    }
                }

                if c.is_whitespace() {
                    out.push(c);
                    continue;
                }

                if let Some(pos) = pending_comma.take() {
                    if dialect.allow_trailing_commas && (c == ']' || c == '}') {
                        out.remove(pos);
                    }
                }

                match c {
                    '"' => state = State::String,
                    ',' => pending_comma = Some(out.len()),
                    _ => {}
                }
                out.push(c);
            }
        }
    }

    if state == State::BlockComment {
        out.push_str(&input[block_start..]);
    }

    Cow::Owned(out)
}
