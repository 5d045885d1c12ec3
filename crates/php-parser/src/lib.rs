//! Error-recovering recursive-descent PHP parser.
//!
//! [`parse`] turns a source buffer into a lossless concrete syntax tree: a
//! [`Tree`] rooted at a `StatementList` phrase whose leaves are the exact
//! tokens of [`php_lexer::lex`], hidden tokens included. Parsing never
//! fails; ill-formed input produces `Error` phrases carrying the unexpected
//! token and the expectation, with skipped tokens preserved as children.
//!
//! ```
//! use php_parser::{parse, PhraseKind};
//!
//! let tree = parse("<?php $a ?? $b;");
//! let coalesce = tree.find_first(PhraseKind::CoalesceExpression).unwrap();
//! assert_eq!(
//!     tree.child_phrase_kinds(coalesce),
//!     vec![PhraseKind::SimpleVariable, PhraseKind::SimpleVariable],
//! );
//! assert!(tree.errors().is_empty());
//! ```

mod doc_comment;
mod expr;
mod parser;
pub mod phrase;
pub mod tree;

pub use phrase::PhraseKind;
pub use tree::{Node, ParseErr, Phrase, PhraseId, Tree};

use php_token::{Token, TokenKind};

/// Parse a source buffer into a CST. Total: any byte sequence yields a tree.
pub fn parse(source: &str) -> Tree {
    let span = tracing::trace_span!("parse", bytes = source.len());
    let _guard = span.enter();
    parse_tokens(php_lexer::lex(source))
}

/// Parse an existing token buffer (as produced by [`php_lexer::lex`] or
/// [`php_lexer::sync`]). A missing terminal `EndOfFile` is supplied.
pub fn parse_tokens(mut tokens: Vec<Token>) -> Tree {
    if tokens.last().map(|t| t.kind) != Some(TokenKind::EndOfFile) {
        let offset = tokens.last().map_or(0, Token::end);
        tokens.push(Token::new(TokenKind::EndOfFile, offset, 0));
    }
    parser::Parser::new(tokens).run()
}
