//! Structured `/** ... */` document comments.
//!
//! A document comment is a list of per-line statements; each `@tag` opens a
//! tagged sub-phrase with its own small grammar. Types are unions of
//! `TypeDeclaration`s joined by `|`; descriptions run until a line that
//! starts with a tag or the comment ends. Unknown tags keep the generic
//! `DocumentCommentTag` kind with a plain description.

use crate::expr::is_parameter_start;
use crate::parser::Parser;
use crate::phrase::PhraseKind;
use crate::tree::{Node, PhraseId};
use php_token::TokenKind;

impl Parser {
    pub(crate) fn doc_comment(&mut self) -> PhraseId {
        let comment = self.list(
            PhraseKind::DocumentComment,
            &mut |p| p.doc_comment_statement(),
            is_doc_comment_statement_start,
            Some(&[TokenKind::DocumentCommentEnd]),
            Some(&[TokenKind::DocumentCommentStartline, TokenKind::DocumentCommentEndline]),
        );
        self.hidden_into(comment);
        if self.peek(0).kind == TokenKind::DocumentCommentEnd {
            let end = self.next(true);
            self.push_child_to(comment, Node::Token(end));
        }
        comment
    }

    fn doc_comment_statement(&mut self) -> Node {
        let token = self.peek(0);
        match token.kind {
            TokenKind::DocumentCommentStart | TokenKind::DocumentCommentEndline => {
                Node::Token(self.next(true))
            }
            TokenKind::DocumentCommentStartline
            | TokenKind::Name
            | TokenKind::DocumentCommentText => {
                if self.peek(1).kind.is_doc_tag_name() {
                    self.doc_comment_tag()
                } else {
                    Node::Phrase(self.doc_comment_description())
                }
            }
            kind if kind.is_doc_tag_name() => self.doc_comment_tag(),
            // Unreachable through the element-start predicate; consume one
            // token to keep the list progressing.
            _ => Node::Token(self.next(true)),
        }
    }

    fn doc_comment_description(&mut self) -> PhraseId {
        self.start(PhraseKind::DocumentCommentDescription, false);
        if !is_description_start(self.peek(0).kind) {
            return self.end();
        }
        self.next(false);
        loop {
            let token = self.peek(0);
            if token.kind == TokenKind::DocumentCommentEndline
                && (self.peek(1).kind != TokenKind::DocumentCommentStartline
                    || !is_description_start(self.peek(2).kind))
            {
                self.next(false);
                break;
            }
            if matches!(token.kind, TokenKind::DocumentCommentEnd | TokenKind::EndOfFile) {
                break;
            }
            self.next(false);
        }
        self.end()
    }

    fn doc_comment_tag(&mut self) -> Node {
        self.start(PhraseKind::DocumentCommentTag, false);
        if self.peek(0).kind == TokenKind::DocumentCommentStartline {
            self.next(false);
        }
        let tag = self.next(false);
        match tag.kind {
            TokenKind::AtAuthor => self.author_tag(),
            TokenKind::AtDeprecated => self.deprecated_tag(),
            TokenKind::AtGlobal => self.global_tag(),
            TokenKind::AtMethod => self.method_tag(),
            TokenKind::AtParam => self.param_tag(),
            TokenKind::AtProperty | TokenKind::AtPropertyRead | TokenKind::AtPropertyWrite => {
                self.property_tag()
            }
            TokenKind::AtReturn => self.return_tag(),
            TokenKind::AtThrows => self.throws_tag(),
            TokenKind::AtVar => self.var_tag(),
            _ => {
                let description = self.doc_comment_description();
                self.push_child(Node::Phrase(description));
            }
        }
        Node::Phrase(self.end())
    }

    fn author_tag(&mut self) {
        self.relabel_top(PhraseKind::DocumentCommentAuthorTag);

        self.start(PhraseKind::DocumentCommentAuthor, false);
        loop {
            let token = self.peek(0);
            if matches!(
                token.kind,
                TokenKind::DocumentCommentEndline
                    | TokenKind::LessThan
                    | TokenKind::DocumentCommentEnd
                    | TokenKind::EndOfFile
            ) {
                break;
            }
            self.next(false);
        }
        let author = self.end();
        self.push_child(Node::Phrase(author));

        if self.peek(0).kind == TokenKind::LessThan {
            self.start(PhraseKind::DocumentCommentEmail, false);
            self.next(false); // <
            loop {
                let token = self.peek(0);
                if matches!(
                    token.kind,
                    TokenKind::DocumentCommentEndline
                        | TokenKind::GreaterThan
                        | TokenKind::DocumentCommentEnd
                        | TokenKind::EndOfFile
                ) {
                    break;
                }
                self.next(false);
            }
            self.optional(TokenKind::GreaterThan);
            let email = self.end();
            self.push_child(Node::Phrase(email));
        }
    }

    fn deprecated_tag(&mut self) {
        self.relabel_top(PhraseKind::DocumentCommentDeprecatedTag);
        self.optional(TokenKind::DocumentCommentVersion);
        if self.peek(0).kind != TokenKind::DocumentCommentEndline {
            self.push_description_if_any();
        }
    }

    fn global_tag(&mut self) {
        self.relabel_top(PhraseKind::DocumentCommentGlobalTag);
        match self.doc_comment_type_union_or_type_declaration() {
            Some(ty) => self.push_child(ty),
            None => self.error(TokenKind::Name),
        }
        self.optional(TokenKind::VariableName);
        self.push_description_if_any();
    }

    fn method_tag(&mut self) {
        self.relabel_top(PhraseKind::DocumentCommentMethodTag);
        self.optional(TokenKind::Static);
        if self.peek(1).kind != TokenKind::OpenParenthesis {
            if let Some(ty) = self.doc_comment_type_union_or_type_declaration() {
                self.push_child(ty);
            }
        }
        let name = self.identifier();
        self.push_child(Node::Phrase(name));
        self.expect(TokenKind::OpenParenthesis);
        if is_parameter_start(self.peek(0).kind) {
            let params = self.delimited_list(
                PhraseKind::ParameterDeclarationList,
                &mut |p| p.doc_comment_parameter_declaration(),
                is_parameter_start,
                TokenKind::Comma,
                Some(&[TokenKind::CloseParenthesis]),
                false,
            );
            self.push_child(Node::Phrase(params));
        }
        self.expect(TokenKind::CloseParenthesis);
        self.push_description_if_any();
    }

    fn param_tag(&mut self) {
        self.relabel_top(PhraseKind::DocumentCommentParamTag);
        match self.doc_comment_type_union_or_type_declaration() {
            Some(ty) => self.push_child(ty),
            None => self.error(TokenKind::Name),
        }
        self.expect(TokenKind::VariableName);
        self.push_description_if_any();
    }

    fn property_tag(&mut self) {
        self.relabel_top(PhraseKind::DocumentCommentPropertyTag);
        if self.peek(0).kind != TokenKind::VariableName {
            match self.doc_comment_type_union_or_type_declaration() {
                Some(ty) => self.push_child(ty),
                None => self.error(TokenKind::Name),
            }
        }
        self.expect(TokenKind::VariableName);
        self.push_description_if_any();
    }

    fn return_tag(&mut self) {
        self.relabel_top(PhraseKind::DocumentCommentReturnTag);
        match self.doc_comment_type_union_or_type_declaration() {
            Some(ty) => self.push_child(ty),
            None => self.error(TokenKind::Name),
        }
        self.push_description_if_any();
    }

    fn throws_tag(&mut self) {
        self.relabel_top(PhraseKind::DocumentCommentThrowsTag);
        match self.doc_comment_type_union_or_type_declaration() {
            Some(ty) => self.push_child(ty),
            None => self.error(TokenKind::Name),
        }
        self.push_description_if_any();
    }

    fn var_tag(&mut self) {
        self.relabel_top(PhraseKind::DocumentCommentVarTag);
        match self.doc_comment_type_union_or_type_declaration() {
            Some(ty) => self.push_child(ty),
            None => self.error(TokenKind::Name),
        }
        self.optional(TokenKind::VariableName);
        self.push_description_if_any();
    }

    /// Trailing description; empty ones are not attached.
    fn push_description_if_any(&mut self) {
        let description = self.doc_comment_description();
        if self.phrase_has_children(description) {
            self.push_child(Node::Phrase(description));
        }
    }

    fn doc_comment_type_name(&mut self) -> Option<Node> {
        self.start(PhraseKind::TypeDeclaration, false);
        match self.peek(0).kind {
            TokenKind::Callable | TokenKind::Array => {
                self.next(false);
            }
            TokenKind::Name | TokenKind::Backslash => {
                let name = self.qualified_name();
                self.push_child(name);
                while self.peek(0).kind == TokenKind::Array {
                    self.next(false); // []
                }
            }
            TokenKind::VariableName => {
                self.next(false);
            }
            _ => {
                self.abandon_into_parent();
                return None;
            }
        }
        Some(Node::Phrase(self.end()))
    }

    fn doc_comment_type_union_or_type_declaration(&mut self) -> Option<Node> {
        self.start(PhraseKind::TypeUnion, false);
        let Some(first) = self.doc_comment_type_name() else {
            self.abandon_into_parent();
            return None;
        };
        self.push_child(first);
        if self.peek(0).kind != TokenKind::Bar {
            // Single type; drop the union wrapper but keep anything that was
            // already drained into it.
            let mut children = self.abandon();
            let first = children.pop();
            for node in children {
                self.push_child(node);
            }
            return first;
        }
        while self.peek(0).kind == TokenKind::Bar {
            self.next(false);
            match self.doc_comment_type_name() {
                Some(name) => self.push_child(name),
                None => break,
            }
        }
        Some(Node::Phrase(self.end()))
    }

    fn doc_comment_parameter_declaration(&mut self) -> Node {
        self.start(PhraseKind::ParameterDeclaration, false);
        // A leading `$name` is the parameter itself, not a type.
        if self.peek(0).kind != TokenKind::VariableName {
            if let Some(ty) = self.doc_comment_type_union_or_type_declaration() {
                self.push_child(ty);
            }
        }
        self.optional(TokenKind::Ampersand);
        self.optional(TokenKind::Ellipsis);
        self.expect(TokenKind::VariableName);
        if self.peek(0).kind == TokenKind::Equals {
            self.next(false);
            let value = self.doc_comment_parameter_value();
            self.push_child(Node::Phrase(value));
        }
        Node::Phrase(self.end())
    }

    fn doc_comment_parameter_value(&mut self) -> PhraseId {
        self.start(PhraseKind::ParameterValue, false);
        loop {
            let token = self.peek(0);
            if matches!(
                token.kind,
                TokenKind::CloseParenthesis
                    | TokenKind::Comma
                    | TokenKind::DocumentCommentEnd
                    | TokenKind::EndOfFile
            ) {
                break;
            }
            self.next(false);
        }
        self.end()
    }
}

fn is_doc_comment_statement_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::DocumentCommentStart
            | TokenKind::DocumentCommentStartline
            | TokenKind::DocumentCommentEndline
            | TokenKind::Name
            | TokenKind::DocumentCommentText
    ) || kind.is_doc_tag_name()
}

fn is_description_start(kind: TokenKind) -> bool {
    !kind.is_doc_tag_name()
        && !matches!(
            kind,
            TokenKind::DocumentCommentEndline
                | TokenKind::DocumentCommentEnd
                | TokenKind::EndOfFile
        )
}
