//! Define shared string semantics (policy + pure helpers).
//!
//! This module holds **pure/deterministic** helpers used by the syntax frontend (literal spelling)
//! and by the runtime (decoding, `repr`, indexing) so both sides agree on one policy.
//!
//! ## Notes
//! - **Indexing model**: Unicode scalar indexing (Rust `char`), not bytes or grapheme clusters.
//! - **Negative indices**: supported (Python-style): `s[-1]` is the last scalar.
//! - **Slicing**: Python-like `start` / `end` with negative indices and bounds clamping; the
//!   host grammar has no slice step.
//! - **Literals**: string leaves keep their raw spelling (quotes included); [`decode_literal`]
//!   turns that spelling into the runtime value.

/// Describe a sequence index-out-of-range error message.
pub const INDEX_OUT_OF_RANGE_MSG: &str = "index out of range";

/// Represent sequence access errors produced by semantic-core helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringAccessError {
    IndexOutOfRange,
}

impl StringAccessError {
    /// Return the canonical error message for this access error.
    pub fn message(self) -> &'static str {
        match self {
            StringAccessError::IndexOutOfRange => INDEX_OUT_OF_RANGE_MSG,
        }
    }
}

/// Represent a malformed string literal spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    /// The spelling does not start and end with matching quotes.
    Unquoted(String),
}

/// Return the string length in Unicode scalars (Rust `char`).
pub fn str_len(s: &str) -> usize {
    s.chars().count()
}

/// Normalize an index (supports negatives). Returns `None` if out of range.
///
/// ## Examples
/// ```rust
/// use witness_core::strings::normalize_index;
///
/// assert_eq!(normalize_index(3, -1), Some(2));
/// assert_eq!(normalize_index(3, 3), None);
/// assert_eq!(normalize_index(0, 0), None);
/// ```
pub fn normalize_index(len: usize, idx: i64) -> Option<usize> {
    let len_i = i64::try_from(len).ok()?;
    let i = if idx < 0 { idx + len_i } else { idx };
    if i < 0 || i >= len_i { None } else { usize::try_from(i).ok() }
}

/// Resolve optional slice bounds against a sequence length (Python-like clamping).
///
/// ## Returns
/// - `(start, end)` with `start <= end <= len`; an empty range when the bounds cross.
pub fn slice_bounds(len: usize, start: Option<i64>, end: Option<i64>) -> (usize, usize) {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let clamp = |raw: i64| -> usize {
        let shifted = if raw < 0 { raw + len_i } else { raw };
        usize::try_from(shifted.clamp(0, len_i)).unwrap_or(len)
    };
    let lo = start.map_or(0, clamp);
    let hi = end.map_or(len, clamp);
    (lo, hi.max(lo))
}

/// Index a string by Unicode scalar index.
///
/// ## Returns
/// - `Ok(String)`: Single-character string (one Unicode scalar).
/// - `Err(StringAccessError)`: If the index is out of range.
pub fn str_char_at(s: &str, idx: i64) -> Result<String, StringAccessError> {
    normalize_index(str_len(s), idx)
        .and_then(|pos| s.chars().nth(pos))
        .map(|ch| ch.to_string())
        .ok_or(StringAccessError::IndexOutOfRange)
}

/// Slice a string over Unicode scalars (Python-like semantics, step 1).
pub fn str_slice(s: &str, start: Option<i64>, end: Option<i64>) -> String {
    let (lo, hi) = slice_bounds(str_len(s), start, end);
    s.chars().skip(lo).take(hi - lo).collect()
}

/// Escape text so it can be embedded between double quotes and decoded back unchanged.
///
/// Both string delimiters are escaped, so the result is also safe between single quotes.
///
/// ## Examples
/// ```rust
/// use witness_core::strings::escape_for_double_quotes;
///
/// assert_eq!(escape_for_double_quotes("print 'hi'"), r"print \'hi\'");
/// assert_eq!(escape_for_double_quotes(r#"a == "\n""#), r#"a == \"\\n\""#);
/// ```
pub fn escape_for_double_quotes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Decode the raw spelling of a string literal (quotes included) into its value.
///
/// ## Notes
/// - Accepts `'...'`, `"..."` and the triple-quoted forms.
/// - Known escapes: `\n \t \r \\ \' \" \0`, and backslash-newline (a line continuation).
/// - An unknown escape keeps the backslash, as Python does.
///
/// ## Examples
/// ```rust
/// use witness_core::strings::decode_literal;
///
/// assert_eq!(decode_literal(r"'it\'s'").unwrap(), "it's");
/// assert_eq!(decode_literal(r#""a\qb""#).unwrap(), r"a\qb");
/// assert_eq!(decode_literal("'''x'''").unwrap(), "x");
/// ```
pub fn decode_literal(raw: &str) -> Result<String, LiteralError> {
    let body = strip_quotes(raw).ok_or_else(|| LiteralError::Unquoted(raw.to_string()))?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Ok(out)
}

fn strip_quotes(raw: &str) -> Option<&str> {
    for quote in ["'''", "\"\"\"", "'", "\""] {
        if raw.len() >= 2 * quote.len() && raw.starts_with(quote) && raw.ends_with(quote) {
            return Some(&raw[quote.len()..raw.len() - quote.len()]);
        }
    }
    None
}

/// Render a string the way Python's `repr` does.
///
/// ## Notes
/// - Single quotes are preferred; double quotes are used when the text contains a single quote
///   but no double quote.
///
/// ## Examples
/// ```rust
/// use witness_core::strings::repr_str;
///
/// assert_eq!(repr_str("bar"), "'bar'");
/// assert_eq!(repr_str("it's"), "\"it's\"");
/// assert_eq!(repr_str("a\nb"), r"'a\nb'");
/// ```
pub fn repr_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_then_decode_restores_text() {
        let text = r#"print 'a' , "b\n" , x"#;
        let quoted = format!("\"{}\"", escape_for_double_quotes(text));
        assert_eq!(decode_literal(&quoted).unwrap(), text);
    }

    #[test]
    fn decode_rejects_unquoted() {
        assert_eq!(decode_literal("abc"), Err(LiteralError::Unquoted("abc".to_string())));
        assert_eq!(decode_literal("'").map_err(|_| ()), Err(()));
    }

    #[test]
    fn decode_empty_literals() {
        assert_eq!(decode_literal("''").unwrap(), "");
        assert_eq!(decode_literal("\"\"\"\"\"\"").unwrap(), "");
    }

    #[test]
    fn indexing_and_slicing() {
        assert_eq!(str_char_at("héllo", 1).unwrap(), "é");
        assert_eq!(str_char_at("abc", -1).unwrap(), "c");
        assert_eq!(str_char_at("abc", 5), Err(StringAccessError::IndexOutOfRange));
        assert_eq!(str_slice("hello", Some(1), Some(-1)), "ell");
        assert_eq!(str_slice("hello", Some(4), Some(2)), "");
        assert_eq!(str_slice("hello", None, Some(100)), "hello");
    }

    #[test]
    fn repr_escapes_backslashes() {
        assert_eq!(repr_str(r"a\b"), r"'a\\b'");
        assert_eq!(repr_str("'\""), r#"'\'"'"#);
    }
}
