//! Sub-lexer for `/** ... */` document comments.
//!
//! Document blocks are tokenized line-wise: `* ` start-of-line markers,
//! line terminators, `@tag` names classified against a fixed table, version
//! literals (`x.y[.z]`), identifiers, and runs of printable text. The
//! punctuation that matters to type expressions (`|`, `/`, `\`, `<`, `>`,
//! `(`, `)`, `=`, `,`, `$`, `[]`) keeps its usual kind so the doc-comment
//! sub-parser can reuse the ordinary name machinery.

use crate::chars::{is_digit, is_label_char, is_label_start, is_whitespace, is_whitespace_or_eof};
use crate::keywords::DOC_TAGS;
use crate::Lexer;
use php_token::{Token, TokenKind};

/// Printable doc-comment text: anything visible that is not the `*/` close.
fn is_doc_text(c: Option<char>, next: Option<char>) -> bool {
    let Some(c) = c else { return false };
    if c == '*' && next == Some('/') {
        return false;
    }
    ('!'..='~').contains(&c) || (c as u32) >= 0x80
}

impl Lexer<'_> {
    pub(crate) fn document_block(&mut self) -> Token {
        let start = self.cursor.offset();
        match self.cursor.current() {
            Some(' ' | '\t') => {
                self.cursor.step();
                while matches!(self.cursor.current(), Some(' ' | '\t')) {
                    self.cursor.step();
                }
                self.token(TokenKind::Whitespace, start)
            }
            Some('\r' | '\n') => {
                self.cursor.step();
                self.token(TokenKind::DocumentCommentEndline, start)
            }
            Some('@') => self.doc_block_tag_name(),
            Some('$') => self.scripting_dollar(),
            Some('*') => {
                if self.cursor.peek(1) == Some('/') {
                    self.cursor.step_n(2);
                    self.pop_mode();
                    return self.token(TokenKind::DocumentCommentEnd, start);
                }
                self.cursor.step();
                while is_whitespace(self.cursor.current()) || self.cursor.current() == Some('*') {
                    if self.cursor.current() == Some('*') && self.cursor.peek(1) == Some('/') {
                        break;
                    }
                    self.cursor.step();
                }
                self.token(TokenKind::DocumentCommentStartline, start)
            }
            _ => self.doc_block_label(),
        }
    }

    fn doc_block_tag_name(&mut self) -> Token {
        let start = self.cursor.offset();
        let mut end = 1;
        while !is_whitespace_or_eof(self.cursor.peek(end)) {
            end += 1;
        }
        let tag = self.cursor.span_at(1, end - 1);
        let kind = DOC_TAGS.get(tag.as_str()).copied().unwrap_or(TokenKind::DocumentCommentTagName);
        self.cursor.step_n(end);
        self.token(kind, start)
    }

    fn doc_block_label(&mut self) -> Token {
        let start = self.cursor.offset();
        let Some(c) = self.cursor.current() else {
            return self.token(TokenKind::DocumentCommentUnknown, start);
        };
        self.cursor.step();
        match c {
            '[' if self.cursor.current() == Some(']') => {
                self.cursor.step();
                return self.token(TokenKind::Array, start);
            }
            '|' => return self.token(TokenKind::Bar, start),
            '/' => return self.token(TokenKind::ForwardSlash, start),
            '\\' => return self.token(TokenKind::Backslash, start),
            '<' => return self.token(TokenKind::LessThan, start),
            '>' => return self.token(TokenKind::GreaterThan, start),
            '(' => return self.token(TokenKind::OpenParenthesis, start),
            ')' => return self.token(TokenKind::CloseParenthesis, start),
            '=' => return self.token(TokenKind::Equals, start),
            ',' => return self.token(TokenKind::Comma, start),
            _ => {}
        }
        if (c == 's' || c == 'S')
            && matches!(self.cursor.current(), Some('t' | 'T'))
            && self.cursor.span_at(1, 4).eq_ignore_ascii_case("atic")
            && self.cursor.peek(5) == Some(' ')
        {
            self.cursor.step_n(5);
            return self.token(TokenKind::Static, start);
        }
        if c.is_ascii_digit() {
            let mut kind = TokenKind::IntegerLiteral;
            while is_digit(self.cursor.current()) || self.cursor.current() == Some('.') {
                if self.cursor.current() == Some('.') {
                    kind = TokenKind::DocumentCommentVersion;
                }
                self.cursor.step();
            }
            return self.token(kind, start);
        }
        if is_label_start(Some(c)) {
            while is_label_char(self.cursor.current()) {
                self.cursor.step();
            }
            return self.token(TokenKind::Name, start);
        }
        if is_doc_text(Some(c), self.cursor.current()) {
            while is_doc_text(self.cursor.current(), self.cursor.peek(1))
                && !matches!(
                    self.cursor.current(),
                    Some('[' | '|' | '/' | '\\' | '<' | '>' | '(' | ')')
                )
            {
                self.cursor.step();
            }
            return self.token(TokenKind::DocumentCommentText, start);
        }
        while !self.cursor.at_eof() && !is_doc_text(self.cursor.current(), self.cursor.peek(1)) {
            self.cursor.step();
        }
        self.token(TokenKind::DocumentCommentUnknown, start)
    }
}

#[cfg(test)]
mod tests {
    use crate::lex;
    use php_token::TokenKind as T;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<T> {
        lex(source).iter().map(|t| t.kind).collect()
    }

    fn non_hidden(source: &str) -> Vec<T> {
        lex(source).iter().map(|t| t.kind).filter(|k| !k.is_hidden()).collect()
    }

    #[test]
    fn doc_block_open_and_close() {
        assert_eq!(
            kinds("<?php /** x */"),
            vec![
                T::OpenTag,
                T::DocumentCommentStart,
                T::Whitespace,
                T::Name,
                T::Whitespace,
                T::DocumentCommentEnd,
                T::EndOfFile,
            ]
        );
    }

    #[test]
    fn plain_block_comment_is_not_a_doc_block() {
        assert_eq!(kinds("<?php /* x */"), vec![T::OpenTag, T::Comment, T::EndOfFile]);
        // `/**/` is an empty plain comment, not a doc block.
        assert_eq!(kinds("<?php /**/"), vec![T::OpenTag, T::Comment, T::EndOfFile]);
    }

    #[test]
    fn param_tag_with_type_and_variable() {
        assert_eq!(
            non_hidden("<?php /** @param int $x the x */"),
            vec![
                T::OpenTag,
                T::DocumentCommentStart,
                T::AtParam,
                T::Name,
                T::VariableName,
                T::Name,
                T::Name,
                T::DocumentCommentEnd,
                T::EndOfFile,
            ]
        );
    }

    #[test]
    fn known_and_unknown_tags() {
        assert_eq!(non_hidden("<?php /** @return int */")[2], T::AtReturn);
        assert_eq!(non_hidden("<?php /** @property-read int $x */")[2], T::AtPropertyRead);
        assert_eq!(non_hidden("<?php /** @whatever stuff */")[2], T::DocumentCommentTagName);
    }

    #[test]
    fn star_lines_and_endlines() {
        assert_eq!(
            kinds("<?php /**\n * Words here\n */"),
            vec![
                T::OpenTag,
                T::DocumentCommentStart,
                T::DocumentCommentEndline,
                T::Whitespace,
                T::DocumentCommentStartline,
                T::Name,
                T::Whitespace,
                T::Name,
                T::DocumentCommentEndline,
                T::Whitespace,
                T::DocumentCommentEnd,
                T::EndOfFile,
            ]
        );
    }

    #[test]
    fn version_literal() {
        assert_eq!(non_hidden("<?php /** @since 1.2.3 */")[3], T::DocumentCommentVersion);
        assert_eq!(non_hidden("<?php /** @since 12 */")[3], T::IntegerLiteral);
    }

    #[test]
    fn type_punctuation_keeps_usual_kinds() {
        assert_eq!(
            non_hidden("<?php /** @param int|string[] $x */"),
            vec![
                T::OpenTag,
                T::DocumentCommentStart,
                T::AtParam,
                T::Name,
                T::Bar,
                T::Name,
                T::Array,
                T::VariableName,
                T::DocumentCommentEnd,
                T::EndOfFile,
            ]
        );
    }

    #[test]
    fn tag_at_eof_terminates() {
        // No trailing whitespace after the tag name; the scan must stop at
        // end of input rather than spin.
        assert_eq!(non_hidden("<?php /** @param")[2], T::AtParam);
    }
}
