//! Character classes used across the sub-lexers.
//!
//! PHP labels start with an ASCII letter, an underscore, or any non-ASCII
//! rune (Unicode identifiers are accepted wholesale); label continuation adds
//! ASCII digits. All predicates accept `Option<char>` so end of input can
//! flow through lookahead without special cases.

#[inline]
pub(crate) fn is_label_start(c: Option<char>) -> bool {
    matches!(c, Some(c) if c.is_ascii_alphabetic() || c == '_' || (c as u32) >= 0x80)
}

#[inline]
pub(crate) fn is_label_char(c: Option<char>) -> bool {
    matches!(c, Some(c) if c.is_ascii_alphanumeric() || c == '_' || (c as u32) >= 0x80)
}

#[inline]
pub(crate) fn is_whitespace(c: Option<char>) -> bool {
    matches!(c, Some(' ' | '\t' | '\n' | '\r'))
}

/// End of input satisfies the whitespace predicate wherever tag detection
/// asks for trailing whitespace.
#[inline]
pub(crate) fn is_whitespace_or_eof(c: Option<char>) -> bool {
    c.is_none() || is_whitespace(c)
}

#[inline]
pub(crate) fn is_digit(c: Option<char>) -> bool {
    matches!(c, Some(c) if c.is_ascii_digit())
}

#[inline]
pub(crate) fn is_hex_digit(c: Option<char>) -> bool {
    matches!(c, Some(c) if c.is_ascii_hexdigit())
}
