//! Parser driver and statement/declaration productions.
//!
//! The parser pulls a token buffer from `php-lexer` and builds the CST with
//! a stack of open phrases. Hidden tokens (whitespace, comments) are routed
//! transparently to the phrase that is open when they are encountered and
//! never count toward lookahead.
//!
//! Errors are structural, never fatal: a failed expectation installs an
//! `Error` phrase and recovery proceeds by single-token skip or by
//! synchronizing against the stack of recovery sets. Skipped tokens become
//! children of the active error phrase so the tree stays a faithful record
//! of every byte.

use crate::expr::{is_expression_start, is_parameter_start, is_qualified_name_start};
use crate::phrase::PhraseKind;
use crate::tree::{Node, ParseErr, Phrase, PhraseId, Tree};
use php_token::{Token, TokenKind};
use rustc_hash::FxHashSet;

pub(crate) const STATEMENT_LIST_RECOVER_SET: &[TokenKind] = &[
    TokenKind::Use,
    TokenKind::HaltCompiler,
    TokenKind::Const,
    TokenKind::Function,
    TokenKind::Class,
    TokenKind::Abstract,
    TokenKind::Final,
    TokenKind::Trait,
    TokenKind::Interface,
    TokenKind::OpenBrace,
    TokenKind::If,
    TokenKind::While,
    TokenKind::Do,
    TokenKind::For,
    TokenKind::Switch,
    TokenKind::Break,
    TokenKind::Continue,
    TokenKind::Return,
    TokenKind::Global,
    TokenKind::Static,
    TokenKind::Echo,
    TokenKind::Unset,
    TokenKind::ForEach,
    TokenKind::Declare,
    TokenKind::Try,
    TokenKind::Throw,
    TokenKind::Goto,
    TokenKind::Semicolon,
    TokenKind::CloseTag,
    TokenKind::OpenTagEcho,
    TokenKind::Text,
    TokenKind::OpenTag,
    TokenKind::DocumentCommentStart,
];

const CLASS_MEMBER_DECLARATION_LIST_RECOVER_SET: &[TokenKind] = &[
    TokenKind::Public,
    TokenKind::Protected,
    TokenKind::Private,
    TokenKind::Static,
    TokenKind::Abstract,
    TokenKind::Final,
    TokenKind::Function,
    TokenKind::Var,
    TokenKind::Const,
    TokenKind::Use,
    TokenKind::DocumentCommentStart,
];

/// An interior node still under construction on the phrase stack.
struct OpenPhrase {
    kind: PhraseKind,
    children: Vec<Node>,
}

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    stack: Vec<OpenPhrase>,
    pool: Vec<Phrase>,
    /// While set, further `error` calls are suppressed and skipped tokens
    /// are attached here; cleared by any successful consumption.
    active_error: Option<PhraseId>,
    recover_sets: Vec<Vec<TokenKind>>,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            pos: 0,
            stack: Vec::new(),
            pool: Vec::new(),
            active_error: None,
            recover_sets: Vec::new(),
        }
    }

    /// Parse the whole buffer into a tree rooted at a `StatementList`.
    pub(crate) fn run(mut self) -> Tree {
        let root = self.statement_list(&[TokenKind::EndOfFile]);
        // Trailing hidden tokens and the terminal EOF belong to the root so
        // the flattened tree reproduces the entire token stream.
        self.hidden_into(root);
        let eof = self.token_at(self.pos);
        self.push_child_to(root, Node::Token(eof));
        tracing::trace!(phrases = self.pool.len(), errors = self.active_error.is_some(), "parse finished");
        Tree::new(self.pool, root)
    }

    // ---- Driver primitives ----

    fn token_at(&self, i: usize) -> Token {
        let last = self.tokens.len() - 1;
        self.tokens[i.min(last)]
    }

    pub(crate) fn start(&mut self, kind: PhraseKind, dont_push_hidden_to_parent: bool) {
        // The parent gets the hidden tokens that sit between its children.
        if !dont_push_hidden_to_parent {
            self.hidden_top();
        }
        self.stack.push(OpenPhrase { kind, children: Vec::new() });
    }

    pub(crate) fn end(&mut self) -> PhraseId {
        let open = match self.stack.pop() {
            Some(open) => open,
            None => OpenPhrase { kind: PhraseKind::Unknown, children: Vec::new() },
        };
        self.alloc(Phrase { kind: open.kind, children: open.children, error: None })
    }

    /// Discard the open phrase wrapper, handing back its children.
    pub(crate) fn abandon(&mut self) -> Vec<Node> {
        match self.stack.pop() {
            Some(open) => open.children,
            None => Vec::new(),
        }
    }

    /// Discard the open phrase wrapper but keep its children (hidden tokens
    /// included) in the enclosing phrase, preserving tree faithfulness.
    pub(crate) fn abandon_into_parent(&mut self) {
        let children = self.abandon();
        for node in children {
            self.push_child(node);
        }
    }

    fn alloc(&mut self, phrase: Phrase) -> PhraseId {
        let id = PhraseId(self.pool.len() as u32);
        self.pool.push(phrase);
        id
    }

    pub(crate) fn push_child(&mut self, node: Node) {
        if let Some(top) = self.stack.last_mut() {
            top.children.push(node);
        }
    }

    pub(crate) fn push_child_to(&mut self, id: PhraseId, node: Node) {
        self.pool[id.index()].children.push(node);
    }

    pub(crate) fn relabel_top(&mut self, kind: PhraseKind) {
        if let Some(top) = self.stack.last_mut() {
            top.kind = kind;
        }
    }

    pub(crate) fn top_kind(&self) -> PhraseKind {
        self.stack.last().map_or(PhraseKind::Unknown, |open| open.kind)
    }

    pub(crate) fn relabel(&mut self, id: PhraseId, kind: PhraseKind) {
        self.pool[id.index()].kind = kind;
    }

    pub(crate) fn phrase_kind(&self, id: PhraseId) -> PhraseKind {
        self.pool[id.index()].kind
    }

    pub(crate) fn phrase_has_children(&self, id: PhraseId) -> bool {
        !self.pool[id.index()].children.is_empty()
    }

    pub(crate) fn node_phrase_kind(&self, node: Node) -> Option<PhraseKind> {
        match node {
            Node::Phrase(id) => Some(self.phrase_kind(id)),
            Node::Token(_) => None,
        }
    }

    /// Drain leading hidden tokens into the phrase currently on top.
    fn hidden_top(&mut self) {
        if self.stack.is_empty() {
            return;
        }
        while self.token_at(self.pos).kind.is_hidden() {
            let token = self.token_at(self.pos);
            self.pos += 1;
            self.push_child(Node::Token(token));
        }
    }

    /// Drain leading hidden tokens into an already pooled phrase.
    pub(crate) fn hidden_into(&mut self, id: PhraseId) {
        while self.token_at(self.pos).kind.is_hidden() {
            let token = self.token_at(self.pos);
            self.pos += 1;
            self.push_child_to(id, Node::Token(token));
        }
    }

    /// Consume the next non-hidden token, attaching any hidden tokens passed
    /// over. With `do_not_push` the consumed token is returned for manual
    /// attachment instead of going to the open phrase. `EndOfFile` is never
    /// consumed.
    pub(crate) fn next(&mut self, do_not_push: bool) -> Token {
        loop {
            let token = self.token_at(self.pos);
            if token.kind == TokenKind::EndOfFile {
                return token;
            }
            self.pos += 1;
            if token.kind.is_hidden() {
                self.push_child(Node::Token(token));
                continue;
            }
            if !do_not_push {
                self.push_child(Node::Token(token));
            }
            return token;
        }
    }

    /// The n-th non-hidden token ahead, without consuming.
    pub(crate) fn peek(&self, n: usize) -> Token {
        let mut remaining = n + 1;
        let mut i = self.pos;
        loop {
            let token = self.token_at(i);
            if !token.kind.is_hidden() {
                remaining -= 1;
                if remaining == 0 || token.kind == TokenKind::EndOfFile {
                    return token;
                }
            }
            i += 1;
        }
    }

    pub(crate) fn optional(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek(0).kind == kind {
            self.active_error = None;
            return Some(self.next(false));
        }
        None
    }

    pub(crate) fn optional_one_of(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        if kinds.contains(&self.peek(0).kind) {
            self.active_error = None;
            return Some(self.next(false));
        }
        None
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Option<Token> {
        let token = self.peek(0);
        if token.kind == kind {
            self.active_error = None;
            return Some(self.next(false));
        }
        if kind == TokenKind::Semicolon && token.kind == TokenKind::CloseTag {
            // Implicit statement end; the close tag is left for inline text.
            return Some(token);
        }
        self.error(kind);
        // Try a single-token skip to resync.
        if self.peek(1).kind == kind {
            self.skip(|t| t.kind == kind);
            self.active_error = None;
            return Some(self.next(false));
        }
        None
    }

    pub(crate) fn expect_one_of(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        let token = self.peek(0);
        if kinds.contains(&token.kind) {
            self.active_error = None;
            return Some(self.next(false));
        }
        if kinds.contains(&TokenKind::Semicolon) && token.kind == TokenKind::CloseTag {
            return Some(token);
        }
        self.error(TokenKind::Undefined);
        if kinds.contains(&self.peek(1).kind) {
            let kinds = kinds.to_vec();
            self.skip(move |t| kinds.contains(&t.kind));
            self.active_error = None;
            return Some(self.next(false));
        }
        None
    }

    pub(crate) fn error(&mut self, expected: TokenKind) {
        // One error per recovery; avalanches are suppressed until a
        // successful consumption clears the active error.
        if self.active_error.is_some() {
            return;
        }
        let unexpected = self.peek(0);
        tracing::debug!(%unexpected, expected = %expected, "syntax error");
        let id = self.alloc(Phrase {
            kind: PhraseKind::Error,
            children: Vec::new(),
            error: Some(ParseErr { unexpected, expected }),
        });
        self.active_error = Some(id);
        self.push_child(Node::Phrase(id));
    }

    /// Skip tokens (into the active error phrase) until `predicate` matches
    /// or the end of input; the matching token is not consumed.
    pub(crate) fn skip(&mut self, predicate: impl Fn(Token) -> bool) {
        loop {
            let token = self.token_at(self.pos);
            if predicate(token) || token.kind == TokenKind::EndOfFile {
                break;
            }
            self.pos += 1;
            if let Some(error) = self.active_error {
                self.push_child_to(error, Node::Token(token));
            }
        }
    }

    pub(crate) fn push_recover_set(&mut self, set: Vec<TokenKind>) {
        self.recover_sets.push(set);
    }

    pub(crate) fn pop_recover_set(&mut self) {
        self.recover_sets.pop();
    }

    /// Skip to any member of the union of all stacked recovery sets.
    pub(crate) fn default_sync_strategy(&mut self) {
        let merged: FxHashSet<TokenKind> =
            self.recover_sets.iter().flatten().copied().collect();
        self.skip(move |t| merged.contains(&t.kind));
    }

    // ---- List machinery ----

    pub(crate) fn list(
        &mut self,
        kind: PhraseKind,
        element: &mut dyn FnMut(&mut Parser) -> Node,
        is_element_start: fn(TokenKind) -> bool,
        break_on: Option<&[TokenKind]>,
        recover_set: Option<&[TokenKind]>,
    ) -> PhraseId {
        self.start(kind, false);
        let mut list_recover_set: Vec<TokenKind> =
            recover_set.map(<[TokenKind]>::to_vec).unwrap_or_default();
        if let Some(break_on) = break_on {
            list_recover_set.extend_from_slice(break_on);
        }
        self.recover_sets.push(list_recover_set);
        let mut recovery_attempted = false;

        loop {
            let token = self.peek(0);
            if is_element_start(token.kind) {
                recovery_attempted = false;
                let before = self.pos;
                let node = element(self);
                self.push_child(node);
                if self.pos == before {
                    // An element that consumed nothing would repeat forever.
                    break;
                }
            } else if break_on.is_none_or(|b| b.contains(&token.kind))
                || recovery_attempted
            {
                break;
            } else {
                self.error(TokenKind::Undefined);
                // Attempt to sync with the token stream.
                let ahead = self.peek(1);
                if is_element_start(ahead.kind)
                    || break_on.is_some_and(|b| b.contains(&ahead.kind))
                {
                    self.skip(move |t| t == ahead);
                } else {
                    self.default_sync_strategy();
                }
                recovery_attempted = true;
            }
        }

        self.recover_sets.pop();
        self.end()
    }

    pub(crate) fn delimited_list(
        &mut self,
        kind: PhraseKind,
        element: &mut dyn FnMut(&mut Parser) -> Node,
        is_element_start: fn(TokenKind) -> bool,
        delimiter: TokenKind,
        break_on: Option<&[TokenKind]>,
        dont_push_hidden_to_parent: bool,
    ) -> PhraseId {
        self.start(kind, dont_push_hidden_to_parent);
        let mut recover_set: Vec<TokenKind> =
            break_on.map(<[TokenKind]>::to_vec).unwrap_or_default();
        recover_set.push(delimiter);
        self.recover_sets.push(recover_set);

        loop {
            let before = self.pos;
            let node = element(self);
            self.push_child(node);
            let token = self.peek(0);

            if token.kind == delimiter {
                self.next(false);
            } else if break_on.is_none_or(|b| b.contains(&token.kind)) {
                break;
            } else {
                self.error(TokenKind::Undefined);
                // Missing delimiter with another element right behind? Only
                // worth re-entering when the element made progress.
                if is_element_start(token.kind) && self.pos != before {
                    continue;
                }
                if break_on.is_some() {
                    self.default_sync_strategy();
                    if self.peek(0).kind == delimiter {
                        continue;
                    }
                }
                break;
            }
        }

        self.recover_sets.pop();
        self.end()
    }

    // ---- Statements ----

    pub(crate) fn statement_list(&mut self, break_on: &[TokenKind]) -> PhraseId {
        self.list(
            PhraseKind::StatementList,
            &mut |p| p.statement(),
            is_statement_start,
            Some(break_on),
            Some(STATEMENT_LIST_RECOVER_SET),
        )
    }

    pub(crate) fn statement(&mut self) -> Node {
        let token = self.peek(0);
        match token.kind {
            TokenKind::Namespace => self.namespace_definition(),
            TokenKind::Use => self.namespace_use_declaration(),
            TokenKind::HaltCompiler => self.halt_compiler_statement(),
            TokenKind::Const => self.const_declaration(),
            TokenKind::Function => {
                let ahead = self.peek(1);
                if ahead.kind == TokenKind::OpenParenthesis
                    || (ahead.kind == TokenKind::Ampersand
                        && self.peek(2).kind == TokenKind::OpenParenthesis)
                {
                    // Anonymous function without assignment.
                    self.expression_statement()
                } else {
                    self.function_declaration()
                }
            }
            TokenKind::Class | TokenKind::Abstract | TokenKind::Final => self.class_declaration(),
            TokenKind::Trait => self.trait_declaration(),
            TokenKind::Interface => self.interface_declaration(),
            TokenKind::OpenBrace => Node::Phrase(self.compound_statement()),
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::Do => self.do_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Switch => self.switch_statement(),
            TokenKind::Break => self.break_statement(),
            TokenKind::Continue => self.continue_statement(),
            TokenKind::Return => self.return_statement(),
            TokenKind::Global => self.global_declaration(),
            TokenKind::Static => {
                if self.peek(1).kind == TokenKind::VariableName
                    && matches!(
                        self.peek(2).kind,
                        TokenKind::Semicolon
                            | TokenKind::Comma
                            | TokenKind::CloseTag
                            | TokenKind::Equals
                    )
                {
                    self.function_static_declaration()
                } else {
                    self.expression_statement()
                }
            }
            TokenKind::Text | TokenKind::OpenTag | TokenKind::CloseTag => self.inline_text(),
            TokenKind::ForEach => self.foreach_statement(),
            TokenKind::Declare => self.declare_statement(),
            TokenKind::Try => self.try_statement(),
            TokenKind::Throw => self.throw_statement(),
            TokenKind::Goto => self.goto_statement(),
            TokenKind::Echo | TokenKind::OpenTagEcho => self.echo_intrinsic(),
            TokenKind::Unset => self.unset_intrinsic(),
            TokenKind::Semicolon => self.null_statement(),
            TokenKind::DocumentCommentStart => Node::Phrase(self.doc_comment()),
            TokenKind::Name if self.peek(1).kind == TokenKind::Colon => {
                self.named_label_statement()
            }
            _ => self.expression_statement(),
        }
    }

    fn inline_text(&mut self) -> Node {
        self.start(PhraseKind::InlineText, false);
        self.optional(TokenKind::CloseTag);
        self.optional(TokenKind::Text);
        self.optional(TokenKind::OpenTag);
        Node::Phrase(self.end())
    }

    fn null_statement(&mut self) -> Node {
        self.start(PhraseKind::NullStatement, false);
        self.next(false); // ;
        Node::Phrase(self.end())
    }

    fn expression_statement(&mut self) -> Node {
        self.start(PhraseKind::ExpressionStatement, false);
        let expr = self.expression(0);
        self.push_child(expr);
        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    pub(crate) fn compound_statement(&mut self) -> PhraseId {
        self.start(PhraseKind::CompoundStatement, false);
        self.expect(TokenKind::OpenBrace);
        if is_statement_start(self.peek(0).kind) {
            let list = self.statement_list(&[TokenKind::CloseBrace]);
            self.push_child(Node::Phrase(list));
        }
        self.expect(TokenKind::CloseBrace);
        self.end()
    }

    // ---- Control flow ----

    fn if_statement(&mut self) -> Node {
        self.start(PhraseKind::IfStatement, false);
        self.next(false); // if
        self.expect(TokenKind::OpenParenthesis);
        let condition = self.expression(0);
        self.push_child(condition);
        self.expect(TokenKind::CloseParenthesis);

        let token = self.peek(0);
        let mut alternative_form = false;
        if token.kind == TokenKind::Colon {
            self.next(false);
            let body = self.statement_list(&[TokenKind::ElseIf, TokenKind::Else, TokenKind::EndIf]);
            self.push_child(Node::Phrase(body));
            alternative_form = true;
        } else if is_statement_start(token.kind) {
            let body = self.statement();
            self.push_child(body);
        } else {
            self.error(TokenKind::Undefined);
        }

        if self.peek(0).kind == TokenKind::ElseIf {
            let list = if alternative_form {
                self.list(
                    PhraseKind::ElseIfClauseList,
                    &mut |p| p.else_if_clause_alternative(),
                    |k| k == TokenKind::ElseIf,
                    None,
                    None,
                )
            } else {
                self.list(
                    PhraseKind::ElseIfClauseList,
                    &mut |p| p.else_if_clause(),
                    |k| k == TokenKind::ElseIf,
                    None,
                    None,
                )
            };
            self.push_child(Node::Phrase(list));
        }

        if self.peek(0).kind == TokenKind::Else {
            let clause = if alternative_form {
                self.else_clause_alternative()
            } else {
                self.else_clause()
            };
            self.push_child(clause);
        }

        if alternative_form {
            self.expect(TokenKind::EndIf);
            self.expect(TokenKind::Semicolon);
        }

        Node::Phrase(self.end())
    }

    fn else_if_clause(&mut self) -> Node {
        self.start(PhraseKind::ElseIfClause, false);
        self.next(false); // elseif
        self.expect(TokenKind::OpenParenthesis);
        let condition = self.expression(0);
        self.push_child(condition);
        self.expect(TokenKind::CloseParenthesis);
        let body = self.statement();
        self.push_child(body);
        Node::Phrase(self.end())
    }

    fn else_if_clause_alternative(&mut self) -> Node {
        self.start(PhraseKind::ElseIfClause, false);
        self.next(false); // elseif
        self.expect(TokenKind::OpenParenthesis);
        let condition = self.expression(0);
        self.push_child(condition);
        self.expect(TokenKind::CloseParenthesis);
        self.expect(TokenKind::Colon);
        let body =
            self.statement_list(&[TokenKind::EndIf, TokenKind::Else, TokenKind::ElseIf]);
        self.push_child(Node::Phrase(body));
        Node::Phrase(self.end())
    }

    fn else_clause(&mut self) -> Node {
        self.start(PhraseKind::ElseClause, false);
        self.next(false); // else
        let body = self.statement();
        self.push_child(body);
        Node::Phrase(self.end())
    }

    fn else_clause_alternative(&mut self) -> Node {
        self.start(PhraseKind::ElseClause, false);
        self.next(false); // else
        self.expect(TokenKind::Colon);
        let body = self.statement_list(&[TokenKind::EndIf]);
        self.push_child(Node::Phrase(body));
        Node::Phrase(self.end())
    }

    fn while_statement(&mut self) -> Node {
        self.start(PhraseKind::WhileStatement, false);
        self.next(false); // while
        self.expect(TokenKind::OpenParenthesis);
        let condition = self.expression(0);
        self.push_child(condition);
        self.expect(TokenKind::CloseParenthesis);

        let token = self.peek(0);
        if token.kind == TokenKind::Colon {
            self.next(false);
            let body = self.statement_list(&[TokenKind::EndWhile]);
            self.push_child(Node::Phrase(body));
            self.expect(TokenKind::EndWhile);
            self.expect(TokenKind::Semicolon);
        } else if is_statement_start(token.kind) {
            let body = self.statement();
            self.push_child(body);
        } else {
            self.error(TokenKind::Undefined);
        }

        Node::Phrase(self.end())
    }

    fn do_statement(&mut self) -> Node {
        self.start(PhraseKind::DoStatement, false);
        self.next(false); // do
        let body = self.statement();
        self.push_child(body);
        self.expect(TokenKind::While);
        self.expect(TokenKind::OpenParenthesis);
        let condition = self.expression(0);
        self.push_child(condition);
        self.expect(TokenKind::CloseParenthesis);
        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    fn for_expression_group(&mut self, kind: PhraseKind, break_on: &[TokenKind]) -> PhraseId {
        self.delimited_list(
            kind,
            &mut |p| p.expression(0),
            is_expression_start,
            TokenKind::Comma,
            Some(break_on),
            false,
        )
    }

    fn for_statement(&mut self) -> Node {
        self.start(PhraseKind::ForStatement, false);
        self.next(false); // for
        self.expect(TokenKind::OpenParenthesis);

        if is_expression_start(self.peek(0).kind) {
            let group =
                self.for_expression_group(PhraseKind::ForInitialiser, &[TokenKind::Semicolon]);
            self.push_child(Node::Phrase(group));
        }
        self.expect(TokenKind::Semicolon);

        if is_expression_start(self.peek(0).kind) {
            let group = self.for_expression_group(PhraseKind::ForControl, &[TokenKind::Semicolon]);
            self.push_child(Node::Phrase(group));
        }
        self.expect(TokenKind::Semicolon);

        if is_expression_start(self.peek(0).kind) {
            let group =
                self.for_expression_group(PhraseKind::ForEndOfLoop, &[TokenKind::CloseParenthesis]);
            self.push_child(Node::Phrase(group));
        }
        self.expect(TokenKind::CloseParenthesis);

        let token = self.peek(0);
        if token.kind == TokenKind::Colon {
            self.next(false);
            let body = self.statement_list(&[TokenKind::EndFor]);
            self.push_child(Node::Phrase(body));
            self.expect(TokenKind::EndFor);
            self.expect(TokenKind::Semicolon);
        } else if is_statement_start(token.kind) {
            let body = self.statement();
            self.push_child(body);
        } else {
            self.error(TokenKind::Undefined);
        }

        Node::Phrase(self.end())
    }

    fn foreach_statement(&mut self) -> Node {
        self.start(PhraseKind::ForeachStatement, false);
        self.next(false); // foreach
        self.expect(TokenKind::OpenParenthesis);
        let collection = self.foreach_collection();
        self.push_child(collection);
        self.expect(TokenKind::As);

        let key_or_value = if self.peek(0).kind == TokenKind::Ampersand {
            self.foreach_value()
        } else {
            self.foreach_key_or_value()
        };
        self.push_child(key_or_value);

        if self.node_phrase_kind(key_or_value) == Some(PhraseKind::ForeachKey) {
            let value = self.foreach_value();
            self.push_child(value);
        }

        self.expect(TokenKind::CloseParenthesis);

        let token = self.peek(0);
        if token.kind == TokenKind::Colon {
            self.next(false);
            let body = self.statement_list(&[TokenKind::EndForeach]);
            self.push_child(Node::Phrase(body));
            self.expect(TokenKind::EndForeach);
            self.expect(TokenKind::Semicolon);
        } else if is_statement_start(token.kind) {
            let body = self.statement();
            self.push_child(body);
        } else {
            self.error(TokenKind::Undefined);
        }

        Node::Phrase(self.end())
    }

    fn foreach_collection(&mut self) -> Node {
        self.start(PhraseKind::ForeachCollection, false);
        let expr = self.expression(0);
        self.push_child(expr);
        Node::Phrase(self.end())
    }

    fn foreach_key_or_value(&mut self) -> Node {
        self.start(PhraseKind::ForeachValue, false);
        let expr = self.expression(0);
        self.push_child(expr);
        if self.peek(0).kind == TokenKind::FatArrow {
            self.next(false);
            self.relabel_top(PhraseKind::ForeachKey);
        }
        Node::Phrase(self.end())
    }

    fn foreach_value(&mut self) -> Node {
        self.start(PhraseKind::ForeachValue, false);
        self.optional(TokenKind::Ampersand);
        let expr = self.expression(0);
        self.push_child(expr);
        Node::Phrase(self.end())
    }

    fn switch_statement(&mut self) -> Node {
        self.start(PhraseKind::SwitchStatement, false);
        self.next(false); // switch
        self.expect(TokenKind::OpenParenthesis);
        let subject = self.expression(0);
        self.push_child(subject);
        self.expect(TokenKind::CloseParenthesis);

        let opener = self.expect_one_of(&[TokenKind::Colon, TokenKind::OpenBrace]);
        let alternative_form = matches!(opener, Some(t) if t.kind == TokenKind::Colon);

        let token = self.peek(0);
        if matches!(token.kind, TokenKind::Case | TokenKind::Default) {
            let break_on = if alternative_form { TokenKind::EndSwitch } else { TokenKind::CloseBrace };
            let cases = self.case_statements(break_on);
            self.push_child(Node::Phrase(cases));
        }

        if alternative_form {
            self.expect(TokenKind::EndSwitch);
            self.expect(TokenKind::Semicolon);
        } else {
            self.expect(TokenKind::CloseBrace);
        }

        Node::Phrase(self.end())
    }

    fn case_statements(&mut self, break_on: TokenKind) -> PhraseId {
        self.start(PhraseKind::CaseStatementList, false);
        let case_break_on = [TokenKind::Case, TokenKind::Default, break_on];

        loop {
            let token = self.peek(0);
            if token.kind == TokenKind::Case {
                let case = self.case_statement(&case_break_on);
                self.push_child(case);
            } else if token.kind == TokenKind::Default {
                let default = self.default_statement(&case_break_on);
                self.push_child(default);
            } else if token.kind == break_on {
                break;
            } else {
                self.error(TokenKind::Undefined);
                break;
            }
        }

        self.end()
    }

    fn case_statement(&mut self, break_on: &[TokenKind]) -> Node {
        self.start(PhraseKind::CaseStatement, false);
        self.next(false); // case
        let expr = self.expression(0);
        self.push_child(expr);
        self.expect_one_of(&[TokenKind::Colon, TokenKind::Semicolon]);
        if is_statement_start(self.peek(0).kind) {
            let body = self.statement_list(break_on);
            self.push_child(Node::Phrase(body));
        }
        Node::Phrase(self.end())
    }

    fn default_statement(&mut self, break_on: &[TokenKind]) -> Node {
        self.start(PhraseKind::DefaultStatement, false);
        self.next(false); // default
        self.expect_one_of(&[TokenKind::Colon, TokenKind::Semicolon]);
        if is_statement_start(self.peek(0).kind) {
            let body = self.statement_list(break_on);
            self.push_child(Node::Phrase(body));
        }
        Node::Phrase(self.end())
    }

    fn break_statement(&mut self) -> Node {
        self.start(PhraseKind::BreakStatement, false);
        self.next(false); // break
        if is_expression_start(self.peek(0).kind) {
            let expr = self.expression(0);
            self.push_child(expr);
        }
        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    fn continue_statement(&mut self) -> Node {
        self.start(PhraseKind::ContinueStatement, false);
        self.next(false); // continue
        if is_expression_start(self.peek(0).kind) {
            let expr = self.expression(0);
            self.push_child(expr);
        }
        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    fn return_statement(&mut self) -> Node {
        self.start(PhraseKind::ReturnStatement, false);
        self.next(false); // return
        if is_expression_start(self.peek(0).kind) {
            let expr = self.expression(0);
            self.push_child(expr);
        }
        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    fn throw_statement(&mut self) -> Node {
        self.start(PhraseKind::ThrowStatement, false);
        self.next(false); // throw
        let expr = self.expression(0);
        self.push_child(expr);
        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    fn goto_statement(&mut self) -> Node {
        self.start(PhraseKind::GotoStatement, false);
        self.next(false); // goto
        self.expect(TokenKind::Name);
        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    fn named_label_statement(&mut self) -> Node {
        self.start(PhraseKind::NamedLabelStatement, false);
        self.next(false); // name
        self.next(false); // :
        Node::Phrase(self.end())
    }

    fn try_statement(&mut self) -> Node {
        self.start(PhraseKind::TryStatement, false);
        self.next(false); // try
        let body = self.compound_statement();
        self.push_child(Node::Phrase(body));

        let token = self.peek(0);
        if token.kind == TokenKind::Catch {
            let catches = self.list(
                PhraseKind::CatchClauseList,
                &mut |p| p.catch_clause(),
                |k| k == TokenKind::Catch,
                None,
                None,
            );
            self.push_child(Node::Phrase(catches));
        } else if token.kind != TokenKind::Finally {
            self.error(TokenKind::Undefined);
        }

        if self.peek(0).kind == TokenKind::Finally {
            let finally = self.finally_clause();
            self.push_child(finally);
        }

        Node::Phrase(self.end())
    }

    fn catch_clause(&mut self) -> Node {
        self.start(PhraseKind::CatchClause, false);
        self.next(false); // catch
        self.expect(TokenKind::OpenParenthesis);
        let names = self.delimited_list(
            PhraseKind::CatchNameList,
            &mut |p| p.qualified_name(),
            is_qualified_name_start,
            TokenKind::Bar,
            Some(&[TokenKind::VariableName]),
            false,
        );
        self.push_child(Node::Phrase(names));
        self.expect(TokenKind::VariableName);
        self.expect(TokenKind::CloseParenthesis);
        let body = self.compound_statement();
        self.push_child(Node::Phrase(body));
        Node::Phrase(self.end())
    }

    fn finally_clause(&mut self) -> Node {
        self.start(PhraseKind::FinallyClause, false);
        self.next(false); // finally
        let body = self.compound_statement();
        self.push_child(Node::Phrase(body));
        Node::Phrase(self.end())
    }

    fn declare_statement(&mut self) -> Node {
        self.start(PhraseKind::DeclareStatement, false);
        self.next(false); // declare
        self.expect(TokenKind::OpenParenthesis);
        let directive = self.declare_directive();
        self.push_child(Node::Phrase(directive));
        self.expect(TokenKind::CloseParenthesis);

        let token = self.peek(0);
        if token.kind == TokenKind::Colon {
            self.next(false);
            let body = self.statement_list(&[TokenKind::EndDeclare]);
            self.push_child(Node::Phrase(body));
            self.expect(TokenKind::EndDeclare);
            self.expect(TokenKind::Semicolon);
        } else if is_statement_start(token.kind) {
            let body = self.statement();
            self.push_child(body);
        } else if token.kind == TokenKind::Semicolon {
            self.next(false);
        } else {
            self.error(TokenKind::Undefined);
        }

        Node::Phrase(self.end())
    }

    fn declare_directive(&mut self) -> PhraseId {
        self.start(PhraseKind::DeclareDirective, false);
        self.expect(TokenKind::Name);
        self.expect(TokenKind::Equals);
        self.expect_one_of(&[
            TokenKind::IntegerLiteral,
            TokenKind::FloatingLiteral,
            TokenKind::StringLiteral,
        ]);
        self.end()
    }

    // ---- Simple declarations ----

    fn const_declaration(&mut self) -> Node {
        self.start(PhraseKind::ConstDeclaration, false);
        self.next(false); // const
        let elements = self.delimited_list(
            PhraseKind::ConstElementList,
            &mut |p| p.const_element(),
            |k| k == TokenKind::Name,
            TokenKind::Comma,
            Some(&[TokenKind::Semicolon]),
            false,
        );
        self.push_child(Node::Phrase(elements));
        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    fn const_element(&mut self) -> Node {
        self.start(PhraseKind::ConstElement, false);
        self.expect(TokenKind::Name);
        self.expect(TokenKind::Equals);
        let value = self.expression(0);
        self.push_child(value);
        Node::Phrase(self.end())
    }

    fn echo_intrinsic(&mut self) -> Node {
        self.start(PhraseKind::EchoIntrinsic, false);
        self.next(false); // echo or <?=
        let expressions = self.delimited_list(
            PhraseKind::ExpressionList,
            &mut |p| p.expression(0),
            is_expression_start,
            TokenKind::Comma,
            None,
            false,
        );
        self.push_child(Node::Phrase(expressions));
        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    fn unset_intrinsic(&mut self) -> Node {
        self.start(PhraseKind::UnsetIntrinsic, false);
        self.next(false); // unset
        self.expect(TokenKind::OpenParenthesis);
        let variables = self.variable_list(&[TokenKind::CloseParenthesis]);
        self.push_child(Node::Phrase(variables));
        self.expect(TokenKind::CloseParenthesis);
        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    pub(crate) fn variable_list(&mut self, break_on: &[TokenKind]) -> PhraseId {
        self.delimited_list(
            PhraseKind::VariableList,
            &mut |p| {
                let atom = p.variable_atom(0);
                p.variable(atom)
            },
            crate::expr::is_variable_start,
            TokenKind::Comma,
            Some(break_on),
            false,
        )
    }

    fn function_static_declaration(&mut self) -> Node {
        self.start(PhraseKind::FunctionStaticDeclaration, false);
        self.next(false); // static
        let list = self.delimited_list(
            PhraseKind::StaticVariableDeclarationList,
            &mut |p| p.static_variable_declaration(),
            |k| k == TokenKind::VariableName,
            TokenKind::Comma,
            Some(&[TokenKind::Semicolon]),
            false,
        );
        self.push_child(Node::Phrase(list));
        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    fn static_variable_declaration(&mut self) -> Node {
        self.start(PhraseKind::StaticVariableDeclaration, false);
        self.expect(TokenKind::VariableName);
        if self.peek(0).kind == TokenKind::Equals {
            self.start(PhraseKind::FunctionStaticInitialiser, false);
            self.next(false); // =
            let value = self.expression(0);
            self.push_child(value);
            let initialiser = self.end();
            self.push_child(Node::Phrase(initialiser));
        }
        Node::Phrase(self.end())
    }

    fn global_declaration(&mut self) -> Node {
        self.start(PhraseKind::GlobalDeclaration, false);
        self.next(false); // global
        let list = self.delimited_list(
            PhraseKind::VariableNameList,
            &mut |p| p.simple_variable(),
            |k| matches!(k, TokenKind::VariableName | TokenKind::Dollar),
            TokenKind::Comma,
            Some(&[TokenKind::Semicolon]),
            false,
        );
        self.push_child(Node::Phrase(list));
        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    fn halt_compiler_statement(&mut self) -> Node {
        self.start(PhraseKind::HaltCompilerStatement, false);
        self.next(false); // __halt_compiler
        self.expect(TokenKind::OpenParenthesis);
        self.expect(TokenKind::CloseParenthesis);
        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    // ---- Functions ----

    fn function_declaration(&mut self) -> Node {
        self.start(PhraseKind::FunctionDeclaration, false);
        let header = self.function_declaration_header();
        self.push_child(Node::Phrase(header));
        let body = self.function_declaration_body();
        self.push_child(Node::Phrase(body));
        Node::Phrase(self.end())
    }

    pub(crate) fn function_declaration_body(&mut self) -> PhraseId {
        let body = self.compound_statement();
        self.relabel(body, PhraseKind::FunctionDeclarationBody);
        body
    }

    fn function_declaration_header(&mut self) -> PhraseId {
        self.start(PhraseKind::FunctionDeclarationHeader, false);
        self.next(false); // function
        self.optional(TokenKind::Ampersand);
        self.expect(TokenKind::Name);
        self.expect(TokenKind::OpenParenthesis);

        if is_parameter_start(self.peek(0).kind) {
            let params = self.parameter_declaration_list();
            self.push_child(Node::Phrase(params));
        }

        self.expect(TokenKind::CloseParenthesis);

        if self.peek(0).kind == TokenKind::Colon {
            let return_type = self.return_type();
            self.push_child(Node::Phrase(return_type));
        }

        self.end()
    }

    pub(crate) fn parameter_declaration_list(&mut self) -> PhraseId {
        self.delimited_list(
            PhraseKind::ParameterDeclarationList,
            &mut |p| p.parameter_declaration(),
            is_parameter_start,
            TokenKind::Comma,
            Some(&[TokenKind::CloseParenthesis]),
            false,
        )
    }

    fn parameter_declaration(&mut self) -> Node {
        self.start(PhraseKind::ParameterDeclaration, false);
        if is_type_declaration_start(self.peek(0).kind) {
            let ty = self.type_declaration();
            self.push_child(Node::Phrase(ty));
        }
        self.optional(TokenKind::Ampersand);
        self.optional(TokenKind::Ellipsis);
        self.expect(TokenKind::VariableName);
        if self.peek(0).kind == TokenKind::Equals {
            self.next(false);
            let default = self.expression(0);
            self.push_child(default);
        }
        Node::Phrase(self.end())
    }

    pub(crate) fn return_type(&mut self) -> PhraseId {
        self.start(PhraseKind::ReturnType, false);
        self.next(false); // :
        let ty = self.type_declaration();
        self.push_child(Node::Phrase(ty));
        self.end()
    }

    fn type_declaration(&mut self) -> PhraseId {
        self.start(PhraseKind::TypeDeclaration, false);
        self.optional(TokenKind::Question);
        match self.peek(0).kind {
            TokenKind::Callable | TokenKind::Array => {
                self.next(false);
            }
            TokenKind::Name | TokenKind::Namespace | TokenKind::Backslash => {
                let name = self.qualified_name();
                self.push_child(name);
            }
            _ => self.error(TokenKind::Undefined),
        }
        self.end()
    }

    // ---- Classes, interfaces, traits ----

    fn class_declaration(&mut self) -> Node {
        self.start(PhraseKind::ClassDeclaration, false);
        let header = self.class_declaration_header();
        self.push_child(Node::Phrase(header));
        let body = self.type_declaration_body(
            PhraseKind::ClassDeclarationBody,
            is_class_member_start,
            |p| p.class_member_declaration_list(),
        );
        self.push_child(Node::Phrase(body));
        Node::Phrase(self.end())
    }

    fn class_declaration_header(&mut self) -> PhraseId {
        self.start(PhraseKind::ClassDeclarationHeader, false);
        self.optional_one_of(&[TokenKind::Abstract, TokenKind::Final]);
        self.expect(TokenKind::Class);
        self.expect(TokenKind::Name);

        if self.peek(0).kind == TokenKind::Extends {
            let base = self.class_base_clause();
            self.push_child(Node::Phrase(base));
        }
        if self.peek(0).kind == TokenKind::Implements {
            let interfaces = self.class_interface_clause();
            self.push_child(Node::Phrase(interfaces));
        }

        self.end()
    }

    fn class_base_clause(&mut self) -> PhraseId {
        self.start(PhraseKind::ClassBaseClause, false);
        self.next(false); // extends
        let name = self.qualified_name();
        self.push_child(name);
        self.end()
    }

    fn class_interface_clause(&mut self) -> PhraseId {
        self.start(PhraseKind::ClassInterfaceClause, false);
        self.next(false); // implements
        let names = self.qualified_name_list(&[TokenKind::OpenBrace]);
        self.push_child(Node::Phrase(names));
        self.end()
    }

    fn type_declaration_body(
        &mut self,
        kind: PhraseKind,
        is_element_start: fn(TokenKind) -> bool,
        member_list: fn(&mut Parser) -> PhraseId,
    ) -> PhraseId {
        self.start(kind, false);
        self.expect(TokenKind::OpenBrace);
        if is_element_start(self.peek(0).kind) {
            let members = member_list(self);
            self.push_child(Node::Phrase(members));
        }
        self.expect(TokenKind::CloseBrace);
        self.end()
    }

    fn class_member_declaration_list(&mut self) -> PhraseId {
        self.list(
            PhraseKind::ClassMemberDeclarationList,
            &mut |p| p.class_member_declaration(),
            is_class_member_start,
            Some(&[TokenKind::CloseBrace]),
            Some(CLASS_MEMBER_DECLARATION_LIST_RECOVER_SET),
        )
    }

    fn class_member_declaration(&mut self) -> Node {
        // Annotated members are common; the doc comment is a member-level
        // node of its own.
        if self.peek(0).kind == TokenKind::DocumentCommentStart {
            return Node::Phrase(self.doc_comment());
        }

        self.start(PhraseKind::ErrorClassMemberDeclaration, false);
        let token = self.peek(0);

        match token.kind {
            TokenKind::Public
            | TokenKind::Protected
            | TokenKind::Private
            | TokenKind::Static
            | TokenKind::Abstract
            | TokenKind::Final => {
                let modifiers = self.member_modifier_list();
                let token = self.peek(0);
                if token.kind == TokenKind::VariableName {
                    self.push_child(Node::Phrase(modifiers));
                    self.property_declaration()
                } else if token.kind == TokenKind::Function {
                    self.method_declaration(Some(modifiers))
                } else if token.kind == TokenKind::Const {
                    self.push_child(Node::Phrase(modifiers));
                    self.class_const_declaration()
                } else {
                    self.push_child(Node::Phrase(modifiers));
                    self.error(TokenKind::Undefined);
                    Node::Phrase(self.end())
                }
            }
            TokenKind::Function => self.method_declaration(None),
            TokenKind::Var => {
                self.next(false);
                self.property_declaration()
            }
            TokenKind::Const => self.class_const_declaration(),
            TokenKind::Use => self.trait_use_clause(),
            _ => {
                // The element-start predicate keeps this branch out of
                // reach; record an error rather than abort if it is hit.
                self.error(TokenKind::Undefined);
                Node::Phrase(self.end())
            }
        }
    }

    fn member_modifier_list(&mut self) -> PhraseId {
        self.start(PhraseKind::MemberModifierList, false);
        while is_member_modifier(self.peek(0).kind) {
            self.next(false);
        }
        self.end()
    }

    fn property_declaration(&mut self) -> Node {
        self.relabel_top(PhraseKind::PropertyDeclaration);
        let elements = self.delimited_list(
            PhraseKind::PropertyElementList,
            &mut |p| p.property_element(),
            |k| k == TokenKind::VariableName,
            TokenKind::Comma,
            Some(&[TokenKind::Semicolon]),
            false,
        );
        self.push_child(Node::Phrase(elements));
        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    fn property_element(&mut self) -> Node {
        self.start(PhraseKind::PropertyElement, false);
        self.expect(TokenKind::VariableName);
        if self.peek(0).kind == TokenKind::Equals {
            self.start(PhraseKind::PropertyInitialiser, false);
            self.next(false); // =
            let value = self.expression(0);
            self.push_child(value);
            let initialiser = self.end();
            self.push_child(Node::Phrase(initialiser));
        }
        Node::Phrase(self.end())
    }

    fn class_const_declaration(&mut self) -> Node {
        self.relabel_top(PhraseKind::ClassConstDeclaration);
        self.next(false); // const
        let elements = self.delimited_list(
            PhraseKind::ClassConstElementList,
            &mut |p| p.class_const_element(),
            is_class_const_element_start,
            TokenKind::Comma,
            Some(&[TokenKind::Semicolon]),
            false,
        );
        self.push_child(Node::Phrase(elements));
        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    fn class_const_element(&mut self) -> Node {
        self.start(PhraseKind::ClassConstElement, false);
        let identifier = self.identifier();
        self.push_child(Node::Phrase(identifier));
        self.expect(TokenKind::Equals);
        let value = self.expression(0);
        self.push_child(value);
        Node::Phrase(self.end())
    }

    fn method_declaration(&mut self, modifiers: Option<PhraseId>) -> Node {
        self.relabel_top(PhraseKind::MethodDeclaration);
        let header = self.method_declaration_header(modifiers);
        self.push_child(Node::Phrase(header));
        let body = self.method_declaration_body();
        self.push_child(Node::Phrase(body));
        Node::Phrase(self.end())
    }

    fn method_declaration_header(&mut self, modifiers: Option<PhraseId>) -> PhraseId {
        self.start(PhraseKind::MethodDeclarationHeader, true);
        if let Some(modifiers) = modifiers {
            self.push_child(Node::Phrase(modifiers));
        }
        self.next(false); // function
        self.optional(TokenKind::Ampersand);
        let name = self.identifier();
        self.push_child(Node::Phrase(name));
        self.expect(TokenKind::OpenParenthesis);

        if is_parameter_start(self.peek(0).kind) {
            let params = self.parameter_declaration_list();
            self.push_child(Node::Phrase(params));
        }

        self.expect(TokenKind::CloseParenthesis);

        if self.peek(0).kind == TokenKind::Colon {
            let return_type = self.return_type();
            self.push_child(Node::Phrase(return_type));
        }

        self.end()
    }

    fn method_declaration_body(&mut self) -> PhraseId {
        self.start(PhraseKind::MethodDeclarationBody, false);
        if self.peek(0).kind == TokenKind::Semicolon {
            self.next(false);
        } else {
            let body = self.compound_statement();
            self.push_child(Node::Phrase(body));
        }
        self.end()
    }

    pub(crate) fn identifier(&mut self) -> PhraseId {
        self.start(PhraseKind::Identifier, false);
        let token = self.peek(0);
        if token.kind == TokenKind::Name || is_semi_reserved(token.kind) {
            self.next(false);
        } else {
            self.error(TokenKind::Undefined);
        }
        self.end()
    }

    fn interface_declaration(&mut self) -> Node {
        self.start(PhraseKind::InterfaceDeclaration, false);
        let header = self.interface_declaration_header();
        self.push_child(Node::Phrase(header));
        let body = self.type_declaration_body(
            PhraseKind::InterfaceDeclarationBody,
            is_class_member_start,
            |p| {
                p.list(
                    PhraseKind::InterfaceMemberDeclarationList,
                    &mut |p| p.class_member_declaration(),
                    is_class_member_start,
                    Some(&[TokenKind::CloseBrace]),
                    Some(CLASS_MEMBER_DECLARATION_LIST_RECOVER_SET),
                )
            },
        );
        self.push_child(Node::Phrase(body));
        Node::Phrase(self.end())
    }

    fn interface_declaration_header(&mut self) -> PhraseId {
        self.start(PhraseKind::InterfaceDeclarationHeader, false);
        self.next(false); // interface
        self.expect(TokenKind::Name);
        if self.peek(0).kind == TokenKind::Extends {
            self.start(PhraseKind::InterfaceBaseClause, false);
            self.next(false); // extends
            let names = self.qualified_name_list(&[TokenKind::OpenBrace]);
            self.push_child(Node::Phrase(names));
            let base = self.end();
            self.push_child(Node::Phrase(base));
        }
        self.end()
    }

    fn trait_declaration(&mut self) -> Node {
        self.start(PhraseKind::TraitDeclaration, false);
        let header = self.trait_declaration_header();
        self.push_child(Node::Phrase(header));
        let body = self.type_declaration_body(
            PhraseKind::TraitDeclarationBody,
            is_class_member_start,
            |p| {
                p.list(
                    PhraseKind::TraitMemberDeclarationList,
                    &mut |p| p.class_member_declaration(),
                    is_class_member_start,
                    Some(&[TokenKind::CloseBrace]),
                    Some(CLASS_MEMBER_DECLARATION_LIST_RECOVER_SET),
                )
            },
        );
        self.push_child(Node::Phrase(body));
        Node::Phrase(self.end())
    }

    fn trait_declaration_header(&mut self) -> PhraseId {
        self.start(PhraseKind::TraitDeclarationHeader, false);
        self.next(false); // trait
        self.expect(TokenKind::Name);
        self.end()
    }

    pub(crate) fn anonymous_class_declaration(&mut self) -> PhraseId {
        self.start(PhraseKind::AnonymousClassDeclaration, false);
        let header = self.anonymous_class_declaration_header();
        self.push_child(Node::Phrase(header));
        let body = self.type_declaration_body(
            PhraseKind::ClassDeclarationBody,
            is_class_member_start,
            |p| p.class_member_declaration_list(),
        );
        self.push_child(Node::Phrase(body));
        self.end()
    }

    fn anonymous_class_declaration_header(&mut self) -> PhraseId {
        self.start(PhraseKind::AnonymousClassDeclarationHeader, false);
        self.next(false); // class
        if self.optional(TokenKind::OpenParenthesis).is_some() {
            if crate::expr::is_argument_start(self.peek(0).kind) {
                let arguments = self.argument_list();
                self.push_child(Node::Phrase(arguments));
            }
            self.expect(TokenKind::CloseParenthesis);
        }
        if self.peek(0).kind == TokenKind::Extends {
            let base = self.class_base_clause();
            self.push_child(Node::Phrase(base));
        }
        if self.peek(0).kind == TokenKind::Implements {
            let interfaces = self.class_interface_clause();
            self.push_child(Node::Phrase(interfaces));
        }
        self.end()
    }

    // ---- Trait use ----

    fn trait_use_clause(&mut self) -> Node {
        self.relabel_top(PhraseKind::TraitUseClause);
        self.next(false); // use
        let names = self.qualified_name_list(&[TokenKind::Semicolon, TokenKind::OpenBrace]);
        self.push_child(Node::Phrase(names));
        let specification = self.trait_use_specification();
        self.push_child(Node::Phrase(specification));
        Node::Phrase(self.end())
    }

    fn trait_use_specification(&mut self) -> PhraseId {
        self.start(PhraseKind::TraitUseSpecification, false);
        let token = self.expect_one_of(&[TokenKind::Semicolon, TokenKind::OpenBrace]);
        if matches!(token, Some(t) if t.kind == TokenKind::OpenBrace) {
            if is_trait_adaptation_start(self.peek(0).kind) {
                let adaptations = self.list(
                    PhraseKind::TraitAdaptationList,
                    &mut |p| p.trait_adaptation(),
                    is_trait_adaptation_start,
                    Some(&[TokenKind::CloseBrace]),
                    None,
                );
                self.push_child(Node::Phrase(adaptations));
            }
            self.expect(TokenKind::CloseBrace);
        }
        self.end()
    }

    fn trait_adaptation(&mut self) -> Node {
        self.start(PhraseKind::ErrorTraitAdaptation, false);
        let token = self.peek(0);
        let ahead = self.peek(1);

        if token.kind == TokenKind::Namespace
            || token.kind == TokenKind::Backslash
            || (token.kind == TokenKind::Name
                && matches!(ahead.kind, TokenKind::ColonColon | TokenKind::Backslash))
        {
            let reference = self.method_reference();
            self.push_child(Node::Phrase(reference));
            if self.peek(0).kind == TokenKind::InsteadOf {
                self.next(false);
                return self.trait_precedence();
            }
        } else if token.kind == TokenKind::Name || is_semi_reserved(token.kind) {
            self.start(PhraseKind::MethodReference, false);
            let identifier = self.identifier();
            self.push_child(Node::Phrase(identifier));
            let reference = self.end();
            self.push_child(Node::Phrase(reference));
        } else {
            self.error(TokenKind::Undefined);
            return Node::Phrase(self.end());
        }

        self.trait_alias()
    }

    fn trait_alias(&mut self) -> Node {
        self.relabel_top(PhraseKind::TraitAlias);
        self.expect(TokenKind::As);

        let token = self.peek(0);
        if token.kind == TokenKind::Name || is_reserved(token.kind) {
            let identifier = self.identifier();
            self.push_child(Node::Phrase(identifier));
        } else if is_member_modifier(token.kind) {
            self.next(false);
            let token = self.peek(0);
            if token.kind == TokenKind::Name || is_semi_reserved(token.kind) {
                let identifier = self.identifier();
                self.push_child(Node::Phrase(identifier));
            }
        } else {
            self.error(TokenKind::Undefined);
        }

        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    fn trait_precedence(&mut self) -> Node {
        self.relabel_top(PhraseKind::TraitPrecedence);
        let names = self.qualified_name_list(&[TokenKind::Semicolon]);
        self.push_child(Node::Phrase(names));
        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    fn method_reference(&mut self) -> PhraseId {
        self.start(PhraseKind::MethodReference, false);
        let name = self.qualified_name();
        self.push_child(name);
        self.expect(TokenKind::ColonColon);
        let identifier = self.identifier();
        self.push_child(Node::Phrase(identifier));
        self.end()
    }

    // ---- Namespaces ----

    fn namespace_definition(&mut self) -> Node {
        self.start(PhraseKind::NamespaceDefinition, false);
        self.next(false); // namespace
        if self.peek(0).kind == TokenKind::Name {
            let name = self.namespace_name();
            self.push_child(Node::Phrase(name));
            let token = self.expect_one_of(&[TokenKind::Semicolon, TokenKind::OpenBrace]);
            if !matches!(token, Some(t) if t.kind == TokenKind::OpenBrace) {
                return Node::Phrase(self.end());
            }
        } else {
            self.expect(TokenKind::OpenBrace);
        }

        let body = self.statement_list(&[TokenKind::CloseBrace]);
        self.push_child(Node::Phrase(body));
        self.expect(TokenKind::CloseBrace);
        Node::Phrase(self.end())
    }

    pub(crate) fn namespace_name(&mut self) -> PhraseId {
        self.start(PhraseKind::NamespaceName, false);
        self.expect(TokenKind::Name);
        while self.peek(0).kind == TokenKind::Backslash && self.peek(1).kind == TokenKind::Name {
            self.next(false);
            self.next(false);
        }
        self.end()
    }

    fn namespace_use_declaration(&mut self) -> Node {
        self.start(PhraseKind::NamespaceUseDeclaration, false);
        self.next(false); // use
        self.optional_one_of(&[TokenKind::Function, TokenKind::Const]);
        self.optional(TokenKind::Backslash);
        let ns_name = self.namespace_name();
        let token = self.peek(0);

        if matches!(token.kind, TokenKind::Backslash | TokenKind::OpenBrace) {
            self.push_child(Node::Phrase(ns_name));
            self.expect(TokenKind::Backslash);
            self.expect(TokenKind::OpenBrace);
            let clauses = self.delimited_list(
                PhraseKind::NamespaceUseGroupClauseList,
                &mut |p| p.namespace_use_group_clause(),
                |k| matches!(k, TokenKind::Const | TokenKind::Function | TokenKind::Name),
                TokenKind::Comma,
                Some(&[TokenKind::CloseBrace]),
                false,
            );
            self.push_child(Node::Phrase(clauses));
            self.expect(TokenKind::CloseBrace);
            self.expect(TokenKind::Semicolon);
            return Node::Phrase(self.end());
        }

        // The name already parsed becomes the first use clause.
        let mut prefix = Some(ns_name);
        let clauses = self.delimited_list(
            PhraseKind::NamespaceUseClauseList,
            &mut move |p: &mut Parser| {
                let prefilled = prefix.take();
                p.start(PhraseKind::NamespaceUseClause, prefilled.is_some());
                if let Some(name) = prefilled {
                    p.push_child(Node::Phrase(name));
                } else {
                    let name = p.namespace_name();
                    p.push_child(Node::Phrase(name));
                }
                if p.peek(0).kind == TokenKind::As {
                    let alias = p.namespace_aliasing_clause();
                    p.push_child(Node::Phrase(alias));
                }
                Node::Phrase(p.end())
            },
            |k| matches!(k, TokenKind::Name | TokenKind::Backslash),
            TokenKind::Comma,
            Some(&[TokenKind::Semicolon]),
            true,
        );
        self.push_child(Node::Phrase(clauses));
        self.expect(TokenKind::Semicolon);
        Node::Phrase(self.end())
    }

    fn namespace_use_group_clause(&mut self) -> Node {
        self.start(PhraseKind::NamespaceUseGroupClause, false);
        self.optional_one_of(&[TokenKind::Function, TokenKind::Const]);
        let name = self.namespace_name();
        self.push_child(Node::Phrase(name));
        if self.peek(0).kind == TokenKind::As {
            let alias = self.namespace_aliasing_clause();
            self.push_child(Node::Phrase(alias));
        }
        Node::Phrase(self.end())
    }

    fn namespace_aliasing_clause(&mut self) -> PhraseId {
        self.start(PhraseKind::NamespaceAliasingClause, false);
        self.next(false); // as
        self.expect(TokenKind::Name);
        self.end()
    }

    pub(crate) fn qualified_name(&mut self) -> Node {
        self.start(PhraseKind::QualifiedName, false);
        let token = self.peek(0);
        if token.kind == TokenKind::Backslash {
            self.next(false);
            self.relabel_top(PhraseKind::FullyQualifiedName);
        } else if token.kind == TokenKind::Namespace {
            self.relabel_top(PhraseKind::RelativeQualifiedName);
            self.next(false);
            self.expect(TokenKind::Backslash);
        }
        let name = self.namespace_name();
        self.push_child(Node::Phrase(name));
        Node::Phrase(self.end())
    }

    pub(crate) fn qualified_name_list(&mut self, break_on: &[TokenKind]) -> PhraseId {
        self.delimited_list(
            PhraseKind::QualifiedNameList,
            &mut |p| p.qualified_name(),
            is_qualified_name_start,
            TokenKind::Comma,
            Some(break_on),
            false,
        )
    }
}

// ---- Token-kind predicates ----

pub(crate) fn is_statement_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Namespace
            | TokenKind::Use
            | TokenKind::HaltCompiler
            | TokenKind::Const
            | TokenKind::Function
            | TokenKind::Class
            | TokenKind::Abstract
            | TokenKind::Final
            | TokenKind::Trait
            | TokenKind::Interface
            | TokenKind::OpenBrace
            | TokenKind::If
            | TokenKind::While
            | TokenKind::Do
            | TokenKind::For
            | TokenKind::Switch
            | TokenKind::Break
            | TokenKind::Continue
            | TokenKind::Return
            | TokenKind::Global
            | TokenKind::Static
            | TokenKind::Echo
            | TokenKind::Unset
            | TokenKind::ForEach
            | TokenKind::Declare
            | TokenKind::Try
            | TokenKind::Throw
            | TokenKind::Goto
            | TokenKind::Name
            | TokenKind::Semicolon
            | TokenKind::CloseTag
            | TokenKind::Text
            | TokenKind::OpenTag
            | TokenKind::OpenTagEcho
            | TokenKind::DocumentCommentStart
    ) || is_expression_start(kind)
}

fn is_class_member_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Public
            | TokenKind::Protected
            | TokenKind::Private
            | TokenKind::Static
            | TokenKind::Abstract
            | TokenKind::Final
            | TokenKind::Function
            | TokenKind::Var
            | TokenKind::Const
            | TokenKind::Use
            | TokenKind::DocumentCommentStart
    )
}

fn is_class_const_element_start(kind: TokenKind) -> bool {
    kind == TokenKind::Name || is_semi_reserved(kind)
}

fn is_member_modifier(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Public
            | TokenKind::Protected
            | TokenKind::Private
            | TokenKind::Static
            | TokenKind::Abstract
            | TokenKind::Final
    )
}

fn is_trait_adaptation_start(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Name | TokenKind::Backslash | TokenKind::Namespace)
        || is_semi_reserved(kind)
}

pub(crate) fn is_reserved(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Include
            | TokenKind::IncludeOnce
            | TokenKind::Eval
            | TokenKind::Require
            | TokenKind::RequireOnce
            | TokenKind::Or
            | TokenKind::Xor
            | TokenKind::And
            | TokenKind::InstanceOf
            | TokenKind::New
            | TokenKind::Clone
            | TokenKind::Exit
            | TokenKind::If
            | TokenKind::ElseIf
            | TokenKind::Else
            | TokenKind::EndIf
            | TokenKind::Echo
            | TokenKind::Do
            | TokenKind::While
            | TokenKind::EndWhile
            | TokenKind::For
            | TokenKind::EndFor
            | TokenKind::ForEach
            | TokenKind::EndForeach
            | TokenKind::Declare
            | TokenKind::EndDeclare
            | TokenKind::As
            | TokenKind::Try
            | TokenKind::Catch
            | TokenKind::Finally
            | TokenKind::Throw
            | TokenKind::Use
            | TokenKind::InsteadOf
            | TokenKind::Global
            | TokenKind::Var
            | TokenKind::Unset
            | TokenKind::Isset
            | TokenKind::Empty
            | TokenKind::Continue
            | TokenKind::Goto
            | TokenKind::Function
            | TokenKind::Const
            | TokenKind::Return
            | TokenKind::Print
            | TokenKind::Yield
            | TokenKind::List
            | TokenKind::Switch
            | TokenKind::EndSwitch
            | TokenKind::Case
            | TokenKind::Default
            | TokenKind::Break
            | TokenKind::Array
            | TokenKind::Callable
            | TokenKind::Extends
            | TokenKind::Implements
            | TokenKind::Namespace
            | TokenKind::Trait
            | TokenKind::Interface
            | TokenKind::Class
            | TokenKind::ClassConstant
            | TokenKind::TraitConstant
            | TokenKind::FunctionConstant
            | TokenKind::MethodConstant
            | TokenKind::LineConstant
            | TokenKind::FileConstant
            | TokenKind::DirectoryConstant
            | TokenKind::NamespaceConstant
    )
}

pub(crate) fn is_semi_reserved(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Static
            | TokenKind::Abstract
            | TokenKind::Final
            | TokenKind::Private
            | TokenKind::Protected
            | TokenKind::Public
    ) || is_reserved(kind)
}

pub(crate) fn is_type_declaration_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Backslash
            | TokenKind::Name
            | TokenKind::Namespace
            | TokenKind::Question
            | TokenKind::Array
            | TokenKind::Callable
    )
}
