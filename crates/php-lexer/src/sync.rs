//! Incremental re-lex.
//!
//! [`sync`] re-tokenizes an edited buffer while re-attaching the unaffected
//! tail of the previous token sequence, shifted by the edit's size delta.
//! The contract is equivalence: the result is element-wise identical to a
//! full [`crate::lex`] of the new buffer. Reattachment only happens at a
//! rendezvous where the lexer's state is memoryless (a single
//! `Initial`/`Scripting` mode with no cached heredoc label or double-quote
//! scan) *and* the freshly lexed token matches the shifted old token; edits
//! that change the surrounding string or heredoc context never rendezvous
//! and the loop degrades to a full re-lex.

use crate::Lexer;
use php_token::{Token, TokenKind};

/// A replaced byte region of the previous source: `[start, end)` became
/// `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Change {
    /// Signed size delta the tail offsets shift by.
    fn shift(&self) -> i64 {
        self.text.len() as i64 - (self.end - self.start) as i64
    }
}

/// Consecutive token matches required before the old tail is trusted. A
/// single coincidental match is possible when an edit changes the enclosing
/// string context (the same kind/span can lex in two modes); a verified run
/// makes a false splice require several consecutive coincidences.
const VERIFY_RUN: usize = 3;

/// Re-lex `new_source` after `change`, reusing the tail of `old_tokens`
/// where possible. Produces the same sequence as `lex(new_source)`.
pub fn sync(new_source: &str, change: &Change, old_tokens: &[Token]) -> Vec<Token> {
    let shift = change.shift();
    // First old token starting at or after the edited region; earlier tokens
    // are re-derived by the fresh scan below.
    let mut tail = old_tokens
        .iter()
        .position(|t| t.offset as usize >= change.end)
        .unwrap_or(old_tokens.len());
    // Rendezvous is only meaningful past the end of the replacement text.
    let resume_at = change.start + change.text.len();

    let mut lexer = Lexer::new(new_source);
    let mut tokens = Vec::new();
    let mut run = 0;
    loop {
        let memoryless = lexer.offset() >= resume_at && lexer.is_state_memoryless();
        let token = lexer.next_token();
        tokens.push(token);

        if run > 0 {
            // Extend the verified run, or give it up on the first mismatch.
            if tail + run < old_tokens.len()
                && shifted(old_tokens[tail + run], shift) == Some(token)
            {
                run += 1;
            } else {
                run = 0;
            }
        }
        if run == 0 && memoryless {
            while tail < old_tokens.len()
                && shifted_offset(old_tokens[tail], shift) < token.offset as i64
            {
                tail += 1;
            }
            if tail < old_tokens.len() && shifted(old_tokens[tail], shift) == Some(token) {
                run = 1;
            }
        }
        if run >= VERIFY_RUN {
            for &old in &old_tokens[tail + run..] {
                if let Some(shifted) = shifted(old, shift) {
                    tokens.push(shifted);
                }
            }
            return tokens;
        }
        if token.kind == TokenKind::EndOfFile {
            return tokens;
        }
    }
}

fn shifted_offset(token: Token, shift: i64) -> i64 {
    token.offset as i64 + shift
}

fn shifted(token: Token, shift: i64) -> Option<Token> {
    let offset = shifted_offset(token, shift);
    if offset < 0 {
        return None;
    }
    Some(Token::new(token.kind, offset as u32, token.length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex;
    use pretty_assertions::assert_eq;

    fn apply(source: &str, change: &Change) -> String {
        let mut out = String::new();
        out.push_str(&source[..change.start]);
        out.push_str(&change.text);
        out.push_str(&source[change.end..]);
        out
    }

    #[test]
    fn replacement_at_every_offset_matches_full_lex() {
        let source = "<?php echo 'Hello world';";
        let old = lex(source);
        for i in 0..source.len() {
            let change = Change { start: i, end: i, text: "r".to_string() };
            let new_source = apply(source, &change);
            assert_eq!(
                sync(&new_source, &change, &old),
                lex(&new_source),
                "insertion at {i}"
            );
        }
    }

    #[test]
    fn deletion_and_replacement() {
        let source = "<?php echo 'Hello world';";
        let old = lex(source);
        let change = Change { start: 10, end: 11, text: "print(".to_string() };
        let new_source = apply(source, &change);
        assert_eq!(sync(&new_source, &change, &old), lex(&new_source));
    }

    #[test]
    fn sync_from_scratch() {
        let source = "<?php echo 'Hello world';";
        let change = Change { start: 0, end: 0, text: source.to_string() };
        assert_eq!(sync(source, &change, &[]), lex(source));
    }

    #[test]
    fn edit_that_rewrites_string_context() {
        // Deleting the opening quote turns the string body into code; the
        // old tail must not be spliced blindly.
        let source = "<?php echo 'ab cd';";
        let old = lex(source);
        let change = Change { start: 11, end: 12, text: String::new() };
        let new_source = apply(source, &change);
        assert_eq!(sync(&new_source, &change, &old), lex(&new_source));
    }

    #[test]
    fn edit_inside_heredoc_body() {
        let source = "<?php $a = <<<EOT\nhello\nEOT;\n";
        let old = lex(source);
        let change = Change { start: 19, end: 20, text: "u".to_string() };
        let new_source = apply(source, &change);
        assert_eq!(sync(&new_source, &change, &old), lex(&new_source));
    }
}
