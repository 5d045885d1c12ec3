//! Expression parsing: precedence climbing over the binary operator table,
//! expression atoms, variable access chains, and the intrinsic forms.

use crate::parser::{is_semi_reserved, is_type_declaration_start, Parser};
use crate::phrase::PhraseKind;
use crate::tree::{Node, PhraseId};
use php_token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Associativity {
    None,
    Left,
    Right,
}

/// Fixed precedence/associativity table for binary and unary operators.
fn precedence_associativity(kind: TokenKind) -> (u8, Associativity) {
    use Associativity::{Left, None, Right};
    match kind {
        TokenKind::AsteriskAsterisk => (48, Right),
        TokenKind::PlusPlus
        | TokenKind::MinusMinus
        | TokenKind::Tilde
        | TokenKind::IntegerCast
        | TokenKind::FloatCast
        | TokenKind::StringCast
        | TokenKind::ArrayCast
        | TokenKind::ObjectCast
        | TokenKind::BooleanCast
        | TokenKind::UnsetCast
        | TokenKind::AtSymbol => (47, Right),
        TokenKind::InstanceOf => (46, None),
        TokenKind::Exclamation => (45, Right),
        TokenKind::Asterisk | TokenKind::ForwardSlash | TokenKind::Percent => (44, Left),
        TokenKind::Plus | TokenKind::Minus | TokenKind::Dot => (43, Left),
        TokenKind::LessThanLessThan | TokenKind::GreaterThanGreaterThan => (42, Left),
        TokenKind::LessThan
        | TokenKind::GreaterThan
        | TokenKind::LessThanEquals
        | TokenKind::GreaterThanEquals => (41, None),
        TokenKind::EqualsEquals
        | TokenKind::EqualsEqualsEquals
        | TokenKind::ExclamationEquals
        | TokenKind::ExclamationEqualsEquals
        | TokenKind::Spaceship => (40, None),
        TokenKind::Ampersand => (39, Left),
        TokenKind::Caret => (38, Left),
        TokenKind::Bar => (37, Left),
        TokenKind::AmpersandAmpersand => (36, Left),
        TokenKind::BarBar => (35, Left),
        TokenKind::QuestionQuestion => (34, Right),
        TokenKind::Question => (33, Left), // ?: ternary
        TokenKind::Equals
        | TokenKind::DotEquals
        | TokenKind::PlusEquals
        | TokenKind::MinusEquals
        | TokenKind::AsteriskEquals
        | TokenKind::ForwardslashEquals
        | TokenKind::PercentEquals
        | TokenKind::AsteriskAsteriskEquals
        | TokenKind::AmpersandEquals
        | TokenKind::BarEquals
        | TokenKind::CaretEquals
        | TokenKind::LessThanLessThanEquals
        | TokenKind::GreaterThanGreaterThanEquals => (32, Right),
        TokenKind::And => (31, Left),
        TokenKind::Xor => (30, Left),
        TokenKind::Or => (29, Left),
        _ => (0, None),
    }
}

/// Phrase kind a binary operator builds, or `None` for non-operators.
fn binary_op_phrase_kind(kind: TokenKind) -> Option<PhraseKind> {
    let phrase = match kind {
        TokenKind::Question => PhraseKind::TernaryExpression,
        TokenKind::Dot | TokenKind::Plus | TokenKind::Minus => PhraseKind::AdditiveExpression,
        TokenKind::Bar | TokenKind::Ampersand | TokenKind::Caret => PhraseKind::BitwiseExpression,
        TokenKind::Asterisk | TokenKind::ForwardSlash | TokenKind::Percent => {
            PhraseKind::MultiplicativeExpression
        }
        TokenKind::AsteriskAsterisk => PhraseKind::ExponentiationExpression,
        TokenKind::LessThanLessThan | TokenKind::GreaterThanGreaterThan => {
            PhraseKind::ShiftExpression
        }
        TokenKind::AmpersandAmpersand
        | TokenKind::BarBar
        | TokenKind::And
        | TokenKind::Or
        | TokenKind::Xor => PhraseKind::LogicalExpression,
        TokenKind::EqualsEqualsEquals
        | TokenKind::ExclamationEqualsEquals
        | TokenKind::EqualsEquals
        | TokenKind::ExclamationEquals => PhraseKind::EqualityExpression,
        TokenKind::LessThan
        | TokenKind::LessThanEquals
        | TokenKind::GreaterThan
        | TokenKind::GreaterThanEquals
        | TokenKind::Spaceship => PhraseKind::RelationalExpression,
        TokenKind::QuestionQuestion => PhraseKind::CoalesceExpression,
        TokenKind::Equals => PhraseKind::SimpleAssignmentExpression,
        TokenKind::PlusEquals
        | TokenKind::MinusEquals
        | TokenKind::AsteriskEquals
        | TokenKind::AsteriskAsteriskEquals
        | TokenKind::ForwardslashEquals
        | TokenKind::DotEquals
        | TokenKind::PercentEquals
        | TokenKind::AmpersandEquals
        | TokenKind::BarEquals
        | TokenKind::CaretEquals
        | TokenKind::LessThanLessThanEquals
        | TokenKind::GreaterThanGreaterThanEquals => PhraseKind::CompoundAssignmentExpression,
        TokenKind::InstanceOf => PhraseKind::InstanceOfExpression,
        _ => return None,
    };
    Some(phrase)
}

impl Parser {
    /// Precedence-climbing expression parser.
    pub(crate) fn expression(&mut self, min_precedence: u8) -> Node {
        let mut lhs = self.expression_atom(min_precedence);

        loop {
            let op = self.peek(0);
            let Some(binary_kind) = binary_op_phrase_kind(op.kind) else { break };

            let (mut precedence, associativity) = precedence_associativity(op.kind);
            if precedence < min_precedence {
                break;
            }
            if associativity == Associativity::Left {
                precedence += 1;
            }

            if binary_kind == PhraseKind::TernaryExpression {
                lhs = self.ternary_expression(lhs);
                continue;
            }

            self.start(binary_kind, true);
            self.push_child(lhs);
            self.next(false); // operator

            if binary_kind == PhraseKind::InstanceOfExpression {
                let designator = self.type_designator(PhraseKind::InstanceofTypeDesignator);
                self.push_child(Node::Phrase(designator));
            } else {
                if binary_kind == PhraseKind::SimpleAssignmentExpression
                    && self.peek(0).kind == TokenKind::Ampersand
                {
                    self.next(false); // &
                    self.relabel_top(PhraseKind::ByRefAssignmentExpression);
                }
                let rhs = self.expression(precedence);
                self.push_child(rhs);
            }

            lhs = Node::Phrase(self.end());
        }

        lhs
    }

    /// Ternary tail, including the short `a ?: b` form.
    fn ternary_expression(&mut self, test: Node) -> Node {
        self.start(PhraseKind::TernaryExpression, true);
        self.push_child(test);
        self.next(false); // ?

        if self.optional(TokenKind::Colon).is_some() {
            let alternative = self.expression(0);
            self.push_child(alternative);
        } else {
            let consequent = self.expression(0);
            self.push_child(consequent);
            self.expect(TokenKind::Colon);
            let alternative = self.expression(0);
            self.push_child(alternative);
        }

        Node::Phrase(self.end())
    }

    fn expression_atom(&mut self, precedence: u8) -> Node {
        let token = self.peek(0);

        match token.kind {
            TokenKind::Static => {
                if self.peek(1).kind == TokenKind::Function {
                    self.anonymous_function_creation_expression()
                } else if self.peek(1).kind == TokenKind::Fn {
                    self.arrow_function_creation_expression()
                } else {
                    self.variable_or_expression(0)
                }
            }
            TokenKind::StringLiteral => {
                if is_dereference_operator(self.peek(1).kind) {
                    self.variable_or_expression(0)
                } else {
                    Node::Token(self.next(true))
                }
            }
            TokenKind::VariableName
            | TokenKind::Dollar
            | TokenKind::Array
            | TokenKind::OpenBracket
            | TokenKind::Backslash
            | TokenKind::Name
            | TokenKind::Namespace
            | TokenKind::OpenParenthesis => self.variable_or_expression(precedence),
            TokenKind::PlusPlus => self.unary_expression(PhraseKind::PrefixIncrementExpression),
            TokenKind::MinusMinus => self.unary_expression(PhraseKind::PrefixDecrementExpression),
            TokenKind::Plus | TokenKind::Minus | TokenKind::Exclamation | TokenKind::Tilde => {
                self.unary_expression(PhraseKind::UnaryOpExpression)
            }
            TokenKind::AtSymbol => self.unary_expression(PhraseKind::ErrorControlExpression),
            TokenKind::IntegerCast
            | TokenKind::FloatCast
            | TokenKind::StringCast
            | TokenKind::ArrayCast
            | TokenKind::ObjectCast
            | TokenKind::BooleanCast
            | TokenKind::UnsetCast => self.unary_expression(PhraseKind::CastExpression),
            TokenKind::List => self.list_intrinsic(),
            TokenKind::Clone => self.clone_expression(),
            TokenKind::New => self.object_creation_expression(),
            TokenKind::FloatingLiteral
            | TokenKind::IntegerLiteral
            | TokenKind::LineConstant
            | TokenKind::FileConstant
            | TokenKind::DirectoryConstant
            | TokenKind::TraitConstant
            | TokenKind::MethodConstant
            | TokenKind::FunctionConstant
            | TokenKind::NamespaceConstant
            | TokenKind::ClassConstant => Node::Token(self.next(true)),
            TokenKind::StartHeredoc => self.heredoc_string_literal(),
            TokenKind::DoubleQuote => self.double_quoted_string_literal(),
            TokenKind::Backtick => self.shell_command_expression(),
            TokenKind::Print => self.print_intrinsic(),
            TokenKind::Yield => self.yield_expression(),
            TokenKind::YieldFrom => self.yield_from_expression(),
            TokenKind::Function => self.anonymous_function_creation_expression(),
            TokenKind::Fn => self.arrow_function_creation_expression(),
            TokenKind::Include => self.script_inclusion(PhraseKind::IncludeExpression),
            TokenKind::IncludeOnce => self.script_inclusion(PhraseKind::IncludeOnceExpression),
            TokenKind::Require => self.script_inclusion(PhraseKind::RequireExpression),
            TokenKind::RequireOnce => self.script_inclusion(PhraseKind::RequireOnceExpression),
            TokenKind::Eval => self.eval_intrinsic(),
            TokenKind::Empty => self.empty_intrinsic(),
            TokenKind::Exit => self.exit_intrinsic(),
            TokenKind::Isset => self.isset_intrinsic(),
            _ => {
                self.start(PhraseKind::ErrorExpression, false);
                self.error(TokenKind::Undefined);
                Node::Phrase(self.end())
            }
        }
    }

    fn unary_expression(&mut self, kind: PhraseKind) -> Node {
        self.start(kind, false);
        let op = self.next(false);

        match kind {
            PhraseKind::PrefixDecrementExpression | PhraseKind::PrefixIncrementExpression => {
                let atom = self.variable_atom(0);
                let variable = self.variable(atom);
                self.push_child(variable);
            }
            _ => {
                let (precedence, _) = precedence_associativity(op.kind);
                let operand = self.expression(precedence);
                self.push_child(operand);
            }
        }

        Node::Phrase(self.end())
    }

    // ---- Variables and access chains ----

    fn variable_or_expression(&mut self, precedence: u8) -> Node {
        let part = self.variable_atom(precedence);
        let mut is_variable = self.node_phrase_kind(part) == Some(PhraseKind::SimpleVariable);

        let part = if is_dereference_operator(self.peek(0).kind) {
            is_variable = true;
            self.variable(part)
        } else {
            match self.node_phrase_kind(part) {
                Some(
                    PhraseKind::QualifiedName
                    | PhraseKind::FullyQualifiedName
                    | PhraseKind::RelativeQualifiedName,
                ) => self.constant_access_expression(part),
                _ => part,
            }
        };

        if !is_variable {
            return part;
        }

        match self.peek(0).kind {
            TokenKind::PlusPlus => {
                self.postfix_expression(PhraseKind::PostfixIncrementExpression, part)
            }
            TokenKind::MinusMinus => {
                self.postfix_expression(PhraseKind::PostfixDecrementExpression, part)
            }
            _ => part,
        }
    }

    fn constant_access_expression(&mut self, name: Node) -> Node {
        self.start(PhraseKind::ConstantAccessExpression, true);
        self.push_child(name);
        Node::Phrase(self.end())
    }

    fn postfix_expression(&mut self, kind: PhraseKind, variable: Node) -> Node {
        self.start(kind, true);
        self.push_child(variable);
        self.next(false); // operator
        Node::Phrase(self.end())
    }

    /// Wrap an atom in dereference operations for as long as they continue.
    pub(crate) fn variable(&mut self, mut atom: Node) -> Node {
        let mut count = 0;

        loop {
            count += 1;
            match self.peek(0).kind {
                TokenKind::ColonColon => {
                    atom = self.scoped_access_expression(atom);
                    continue;
                }
                TokenKind::Arrow => {
                    atom = self.property_or_method_access_expression(atom);
                    continue;
                }
                TokenKind::OpenBracket => {
                    atom = self.subscript_expression(atom, TokenKind::CloseBracket);
                    continue;
                }
                TokenKind::OpenBrace => {
                    atom = self.subscript_expression(atom, TokenKind::CloseBrace);
                    continue;
                }
                TokenKind::OpenParenthesis => {
                    atom = self.function_call_expression(atom);
                    continue;
                }
                _ => {
                    // Only simple variable atoms qualify as variables.
                    if count == 1
                        && self.node_phrase_kind(atom) != Some(PhraseKind::SimpleVariable)
                    {
                        self.start(PhraseKind::ErrorVariable, true);
                        self.push_child(atom);
                        self.error(TokenKind::Undefined);
                        return Node::Phrase(self.end());
                    }
                }
            }
            break;
        }

        atom
    }

    pub(crate) fn variable_atom(&mut self, precedence: u8) -> Node {
        let token = self.peek(0);
        match token.kind {
            TokenKind::VariableName | TokenKind::Dollar => self.simple_variable(),
            TokenKind::OpenParenthesis => self.encapsulated_expression(
                TokenKind::OpenParenthesis,
                TokenKind::CloseParenthesis,
            ),
            TokenKind::Array => self.long_array_creation_expression(),
            TokenKind::OpenBracket => self.short_array_creation_expression(precedence),
            TokenKind::StringLiteral => Node::Token(self.next(true)),
            TokenKind::Static => self.relative_scope(),
            TokenKind::Name | TokenKind::Namespace | TokenKind::Backslash => self.qualified_name(),
            _ => {
                self.start(PhraseKind::ErrorVariableAtom, false);
                self.error(TokenKind::Undefined);
                Node::Phrase(self.end())
            }
        }
    }

    pub(crate) fn simple_variable(&mut self) -> Node {
        self.start(PhraseKind::SimpleVariable, false);
        let token = self.expect_one_of(&[TokenKind::VariableName, TokenKind::Dollar]);

        if matches!(token, Some(t) if t.kind == TokenKind::Dollar) {
            let token = self.peek(0);
            if token.kind == TokenKind::OpenBrace {
                let inner =
                    self.encapsulated_expression(TokenKind::OpenBrace, TokenKind::CloseBrace);
                self.push_child(inner);
            } else if token.kind == TokenKind::Dollar || token.kind == TokenKind::VariableName {
                let inner = self.simple_variable();
                self.push_child(inner);
            } else {
                self.error(TokenKind::Undefined);
            }
        }

        Node::Phrase(self.end())
    }

    fn relative_scope(&mut self) -> Node {
        self.start(PhraseKind::RelativeScope, false);
        self.next(false);
        Node::Phrase(self.end())
    }

    pub(crate) fn encapsulated_expression(
        &mut self,
        open: TokenKind,
        close: TokenKind,
    ) -> Node {
        self.start(PhraseKind::EncapsulatedExpression, false);
        self.expect(open);
        let expr = self.expression(0);
        self.push_child(expr);
        self.expect(close);
        Node::Phrase(self.end())
    }

    pub(crate) fn subscript_expression(&mut self, lhs: Node, close: TokenKind) -> Node {
        self.start(PhraseKind::SubscriptExpression, true);
        self.push_child(lhs);
        self.next(false); // [ or {
        if is_expression_start(self.peek(0).kind) {
            let index = self.expression(0);
            self.push_child(index);
        }
        self.expect(close);
        Node::Phrase(self.end())
    }

    fn function_call_expression(&mut self, lhs: Node) -> Node {
        self.start(PhraseKind::FunctionCallExpression, true);
        self.push_child(lhs);
        self.expect(TokenKind::OpenParenthesis);
        if is_argument_start(self.peek(0).kind) {
            let arguments = self.argument_list();
            self.push_child(Node::Phrase(arguments));
        }
        self.expect(TokenKind::CloseParenthesis);
        Node::Phrase(self.end())
    }

    fn scoped_access_expression(&mut self, lhs: Node) -> Node {
        self.start(PhraseKind::ErrorScopedAccessExpression, true);
        self.push_child(lhs);
        self.next(false); // ::
        let (member, parent_kind) = self.scoped_member_name();
        if let Some(kind) = parent_kind {
            self.relabel_top(kind);
        }
        self.push_child(member);

        if self.optional(TokenKind::OpenParenthesis).is_some() {
            self.relabel_top(PhraseKind::ScopedCallExpression);
            if is_argument_start(self.peek(0).kind) {
                let arguments = self.argument_list();
                self.push_child(Node::Phrase(arguments));
            }
            self.expect(TokenKind::CloseParenthesis);
            return Node::Phrase(self.end());
        }
        if self.top_kind() == PhraseKind::ScopedCallExpression {
            // `::{expr}` member demands a call; the parenthesis is missing.
            self.error(TokenKind::Undefined);
        }

        Node::Phrase(self.end())
    }

    /// Member after `::`. Reports back what the parent must become: call,
    /// property access, or class constant access.
    fn scoped_member_name(&mut self) -> (Node, Option<PhraseKind>) {
        self.start(PhraseKind::ScopedMemberName, false);
        let token = self.peek(0);
        let mut parent_kind = None;

        match token.kind {
            TokenKind::OpenBrace => {
                parent_kind = Some(PhraseKind::ScopedCallExpression);
                let inner =
                    self.encapsulated_expression(TokenKind::OpenBrace, TokenKind::CloseBrace);
                self.push_child(inner);
            }
            TokenKind::VariableName => {
                // Kept as a bare token: a static property name is not a
                // simple variable.
                parent_kind = Some(PhraseKind::ScopedPropertyAccessExpression);
                self.next(false);
            }
            TokenKind::Dollar => {
                let variable = self.simple_variable();
                self.push_child(variable);
                parent_kind = Some(PhraseKind::ScopedPropertyAccessExpression);
            }
            _ => {
                if token.kind == TokenKind::Name || is_semi_reserved(token.kind) {
                    let identifier = self.identifier();
                    self.push_child(Node::Phrase(identifier));
                    parent_kind = Some(PhraseKind::ClassConstantAccessExpression);
                } else {
                    self.error(TokenKind::Undefined);
                }
            }
        }

        (Node::Phrase(self.end()), parent_kind)
    }

    fn property_or_method_access_expression(&mut self, lhs: Node) -> Node {
        self.start(PhraseKind::PropertyAccessExpression, true);
        self.push_child(lhs);
        self.next(false); // ->
        let member = self.member_name();
        self.push_child(member);

        if self.optional(TokenKind::OpenParenthesis).is_some() {
            self.relabel_top(PhraseKind::MethodCallExpression);
            if is_argument_start(self.peek(0).kind) {
                let arguments = self.argument_list();
                self.push_child(Node::Phrase(arguments));
            }
            self.expect(TokenKind::CloseParenthesis);
        }

        Node::Phrase(self.end())
    }

    pub(crate) fn property_access_expression(&mut self, lhs: Node) -> Node {
        self.start(PhraseKind::PropertyAccessExpression, true);
        self.push_child(lhs);
        self.next(false); // ->
        let member = self.member_name();
        self.push_child(member);
        Node::Phrase(self.end())
    }

    fn member_name(&mut self) -> Node {
        self.start(PhraseKind::MemberName, false);
        match self.peek(0).kind {
            TokenKind::Name => {
                self.next(false);
            }
            TokenKind::OpenBrace => {
                let inner =
                    self.encapsulated_expression(TokenKind::OpenBrace, TokenKind::CloseBrace);
                self.push_child(inner);
            }
            TokenKind::Dollar | TokenKind::VariableName => {
                let variable = self.simple_variable();
                self.push_child(variable);
            }
            _ => self.error(TokenKind::Undefined),
        }
        Node::Phrase(self.end())
    }

    // ---- Object creation ----

    fn object_creation_expression(&mut self) -> Node {
        self.start(PhraseKind::ObjectCreationExpression, false);
        self.next(false); // new
        if self.peek(0).kind == TokenKind::Class {
            let anonymous = self.anonymous_class_declaration();
            self.push_child(Node::Phrase(anonymous));
            return Node::Phrase(self.end());
        }

        let designator = self.type_designator(PhraseKind::ClassTypeDesignator);
        self.push_child(Node::Phrase(designator));

        if self.optional(TokenKind::OpenParenthesis).is_some() {
            if is_argument_start(self.peek(0).kind) {
                let arguments = self.argument_list();
                self.push_child(Node::Phrase(arguments));
            }
            self.expect(TokenKind::CloseParenthesis);
        }

        Node::Phrase(self.end())
    }

    /// Class reference after `new` or `instanceof`: a name, `static`, or a
    /// variable, continued by a restricted dereference chain.
    fn type_designator(&mut self, kind: PhraseKind) -> PhraseId {
        self.start(kind, false);
        let mut part = self.class_type_designator_atom();

        loop {
            match self.peek(0).kind {
                TokenKind::OpenBracket => {
                    part = self.subscript_expression(part, TokenKind::CloseBracket);
                    continue;
                }
                TokenKind::OpenBrace => {
                    part = self.subscript_expression(part, TokenKind::CloseBrace);
                    continue;
                }
                TokenKind::Arrow => {
                    part = self.property_access_expression(part);
                    continue;
                }
                TokenKind::ColonColon => {
                    self.start(PhraseKind::ScopedPropertyAccessExpression, false);
                    self.push_child(part);
                    self.next(false); // ::
                    let member = self.restricted_scoped_member_name();
                    self.push_child(member);
                    part = Node::Phrase(self.end());
                    continue;
                }
                _ => {}
            }
            break;
        }

        self.push_child(part);
        self.end()
    }

    fn restricted_scoped_member_name(&mut self) -> Node {
        self.start(PhraseKind::ScopedMemberName, false);
        let token = self.peek(0);
        match token.kind {
            TokenKind::VariableName => {
                self.next(false);
            }
            TokenKind::Dollar => {
                let variable = self.simple_variable();
                self.push_child(variable);
            }
            _ => self.error(TokenKind::Undefined),
        }
        Node::Phrase(self.end())
    }

    fn class_type_designator_atom(&mut self) -> Node {
        let token = self.peek(0);
        match token.kind {
            TokenKind::Static => self.relative_scope(),
            TokenKind::VariableName | TokenKind::Dollar => self.simple_variable(),
            TokenKind::Name | TokenKind::Namespace | TokenKind::Backslash => self.qualified_name(),
            _ => {
                self.start(PhraseKind::ErrorClassTypeDesignatorAtom, false);
                self.error(TokenKind::Undefined);
                Node::Phrase(self.end())
            }
        }
    }

    // ---- Anonymous and arrow functions ----

    fn anonymous_function_creation_expression(&mut self) -> Node {
        self.start(PhraseKind::AnonymousFunctionCreationExpression, false);
        let header = self.anonymous_function_header();
        self.push_child(Node::Phrase(header));
        let body = self.function_declaration_body();
        self.push_child(Node::Phrase(body));
        Node::Phrase(self.end())
    }

    fn anonymous_function_header(&mut self) -> PhraseId {
        self.start(PhraseKind::AnonymousFunctionHeader, false);
        self.optional(TokenKind::Static);
        self.next(false); // function
        self.optional(TokenKind::Ampersand);
        self.expect(TokenKind::OpenParenthesis);

        if is_parameter_start(self.peek(0).kind) {
            let params = self.parameter_declaration_list();
            self.push_child(Node::Phrase(params));
        }

        self.expect(TokenKind::CloseParenthesis);

        if self.peek(0).kind == TokenKind::Use {
            let use_clause = self.anonymous_function_use_clause();
            self.push_child(Node::Phrase(use_clause));
        }

        if self.peek(0).kind == TokenKind::Colon {
            let return_type = self.return_type();
            self.push_child(Node::Phrase(return_type));
        }

        self.end()
    }

    fn anonymous_function_use_clause(&mut self) -> PhraseId {
        self.start(PhraseKind::AnonymousFunctionUseClause, false);
        self.next(false); // use
        self.expect(TokenKind::OpenParenthesis);
        let variables = self.delimited_list(
            PhraseKind::ClosureUseList,
            &mut |p| p.anonymous_function_use_variable(),
            |k| matches!(k, TokenKind::VariableName | TokenKind::Ampersand),
            TokenKind::Comma,
            Some(&[TokenKind::CloseParenthesis]),
            false,
        );
        self.push_child(Node::Phrase(variables));
        self.expect(TokenKind::CloseParenthesis);
        self.end()
    }

    fn anonymous_function_use_variable(&mut self) -> Node {
        self.start(PhraseKind::AnonymousFunctionUseVariable, false);
        self.optional(TokenKind::Ampersand);
        self.expect(TokenKind::VariableName);
        Node::Phrase(self.end())
    }

    fn arrow_function_creation_expression(&mut self) -> Node {
        self.start(PhraseKind::ArrowFunctionCreationExpression, false);
        let header = self.arrow_function_header();
        self.push_child(Node::Phrase(header));
        self.expect(TokenKind::FatArrow);
        let body = self.expression(0);
        self.push_child(body);
        Node::Phrase(self.end())
    }

    fn arrow_function_header(&mut self) -> PhraseId {
        self.start(PhraseKind::ArrowFunctionHeader, false);
        self.optional(TokenKind::Static);
        self.next(false); // fn
        self.optional(TokenKind::Ampersand);
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

    // ---- Intrinsics ----

    fn exit_intrinsic(&mut self) -> Node {
        self.start(PhraseKind::ExitIntrinsic, false);
        self.next(false); // exit or die
        if self.optional(TokenKind::OpenParenthesis).is_some() {
            if is_expression_start(self.peek(0).kind) {
                let expr = self.expression(0);
                self.push_child(expr);
            }
            self.expect(TokenKind::CloseParenthesis);
        }
        Node::Phrase(self.end())
    }

    fn isset_intrinsic(&mut self) -> Node {
        self.start(PhraseKind::IssetIntrinsic, false);
        self.next(false); // isset
        self.expect(TokenKind::OpenParenthesis);
        let variables = self.variable_list(&[TokenKind::CloseParenthesis]);
        self.push_child(Node::Phrase(variables));
        self.expect(TokenKind::CloseParenthesis);
        Node::Phrase(self.end())
    }

    fn empty_intrinsic(&mut self) -> Node {
        self.start(PhraseKind::EmptyIntrinsic, false);
        self.next(false); // empty
        self.expect(TokenKind::OpenParenthesis);
        let expr = self.expression(0);
        self.push_child(expr);
        self.expect(TokenKind::CloseParenthesis);
        Node::Phrase(self.end())
    }

    fn eval_intrinsic(&mut self) -> Node {
        self.start(PhraseKind::EvalIntrinsic, false);
        self.next(false); // eval
        self.expect(TokenKind::OpenParenthesis);
        let expr = self.expression(0);
        self.push_child(expr);
        self.expect(TokenKind::CloseParenthesis);
        Node::Phrase(self.end())
    }

    fn script_inclusion(&mut self, kind: PhraseKind) -> Node {
        self.start(kind, false);
        self.next(false); // include/require keyword
        let expr = self.expression(0);
        self.push_child(expr);
        Node::Phrase(self.end())
    }

    fn print_intrinsic(&mut self) -> Node {
        self.start(PhraseKind::PrintIntrinsic, false);
        self.next(false); // print
        let expr = self.expression(0);
        self.push_child(expr);
        Node::Phrase(self.end())
    }

    fn yield_from_expression(&mut self) -> Node {
        self.start(PhraseKind::YieldFromExpression, false);
        self.next(false); // yield from
        let expr = self.expression(0);
        self.push_child(expr);
        Node::Phrase(self.end())
    }

    fn yield_expression(&mut self) -> Node {
        self.start(PhraseKind::YieldExpression, false);
        self.next(false); // yield
        if !is_expression_start(self.peek(0).kind) {
            return Node::Phrase(self.end());
        }

        let key_or_value = self.expression(0);
        self.push_child(key_or_value);

        if self.optional(TokenKind::FatArrow).is_some() {
            let value = self.expression(0);
            self.push_child(value);
        }

        Node::Phrase(self.end())
    }

    fn clone_expression(&mut self) -> Node {
        self.start(PhraseKind::CloneExpression, false);
        self.next(false); // clone
        let expr = self.expression(0);
        self.push_child(expr);
        Node::Phrase(self.end())
    }

    fn list_intrinsic(&mut self) -> Node {
        self.start(PhraseKind::ListIntrinsic, false);
        self.next(false); // list
        self.expect(TokenKind::OpenParenthesis);
        let elements = self.array_initialiser_list(TokenKind::CloseParenthesis);
        self.push_child(Node::Phrase(elements));
        self.expect(TokenKind::CloseParenthesis);
        Node::Phrase(self.end())
    }

    // ---- String literals with interpolation ----

    fn double_quoted_string_literal(&mut self) -> Node {
        self.start(PhraseKind::DoubleQuotedStringLiteral, false);
        self.next(false); // "
        let list = self.encapsulated_variable_list(TokenKind::DoubleQuote);
        self.push_child(Node::Phrase(list));
        self.expect(TokenKind::DoubleQuote);
        Node::Phrase(self.end())
    }

    fn heredoc_string_literal(&mut self) -> Node {
        self.start(PhraseKind::HeredocStringLiteral, false);
        self.next(false); // <<<LABEL
        let list = self.encapsulated_variable_list(TokenKind::EndHeredoc);
        self.push_child(Node::Phrase(list));
        self.expect(TokenKind::EndHeredoc);
        Node::Phrase(self.end())
    }

    fn shell_command_expression(&mut self) -> Node {
        self.start(PhraseKind::ShellCommandExpression, false);
        self.next(false); // `
        let list = self.encapsulated_variable_list(TokenKind::Backtick);
        self.push_child(Node::Phrase(list));
        self.expect(TokenKind::Backtick);
        Node::Phrase(self.end())
    }

    fn encapsulated_variable_list(&mut self, break_on: TokenKind) -> PhraseId {
        self.list(
            PhraseKind::EncapsulatedVariableList,
            &mut |p| p.encapsulated_variable(),
            is_encapsulated_variable_start,
            Some(&[break_on]),
            Some(&[
                TokenKind::EncapsulatedAndWhitespace,
                TokenKind::DollarCurlyOpen,
                TokenKind::CurlyOpen,
            ]),
        )
    }

    fn encapsulated_variable(&mut self) -> Node {
        match self.peek(0).kind {
            TokenKind::EncapsulatedAndWhitespace => Node::Token(self.next(true)),
            TokenKind::VariableName => match self.peek(1).kind {
                TokenKind::OpenBracket => self.encapsulated_dimension(),
                TokenKind::Arrow => self.encapsulated_property(),
                _ => self.simple_variable(),
            },
            TokenKind::DollarCurlyOpen => self.dollar_curly_open_encapsulated_variable(),
            TokenKind::CurlyOpen => self.curly_open_encapsulated_variable(),
            _ => {
                // The element-start predicate makes this unreachable; stay
                // total regardless.
                self.start(PhraseKind::ErrorExpression, false);
                self.error(TokenKind::Undefined);
                Node::Phrase(self.end())
            }
        }
    }

    fn curly_open_encapsulated_variable(&mut self) -> Node {
        self.start(PhraseKind::EncapsulatedVariable, false);
        self.next(false); // {
        let atom = self.variable_atom(0);
        let variable = self.variable(atom);
        self.push_child(variable);
        self.expect(TokenKind::CloseBrace);
        Node::Phrase(self.end())
    }

    fn dollar_curly_open_encapsulated_variable(&mut self) -> Node {
        self.start(PhraseKind::EncapsulatedVariable, false);
        self.next(false); // ${
        let token = self.peek(0);

        if token.kind == TokenKind::VariableName {
            if self.peek(1).kind == TokenKind::OpenBracket {
                let dimension = self.dollar_curly_encapsulated_dimension();
                self.push_child(dimension);
            } else {
                self.start(PhraseKind::SimpleVariable, false);
                self.next(false);
                let variable = self.end();
                self.push_child(Node::Phrase(variable));
            }
        } else if is_expression_start(token.kind) {
            let expr = self.expression(0);
            self.push_child(expr);
        } else {
            self.error(TokenKind::Undefined);
        }

        self.expect(TokenKind::CloseBrace);
        Node::Phrase(self.end())
    }

    fn dollar_curly_encapsulated_dimension(&mut self) -> Node {
        self.start(PhraseKind::SubscriptExpression, false);
        self.next(false); // VariableName
        self.next(false); // [
        let index = self.expression(0);
        self.push_child(index);
        self.expect(TokenKind::CloseBracket);
        Node::Phrase(self.end())
    }

    /// `$name[...]` inside an interpolated string: a restricted subscript
    /// grammar of names, integers, and simple variables.
    fn encapsulated_dimension(&mut self) -> Node {
        self.start(PhraseKind::SubscriptExpression, false);
        let variable = self.simple_variable();
        self.push_child(variable);
        self.next(false); // [

        match self.peek(0).kind {
            TokenKind::Name | TokenKind::IntegerLiteral => {
                self.next(false);
            }
            TokenKind::VariableName => {
                let variable = self.simple_variable();
                self.push_child(variable);
            }
            TokenKind::Minus => {
                self.start(PhraseKind::UnaryOpExpression, false);
                self.next(false); // -
                self.expect(TokenKind::IntegerLiteral);
                let negated = self.end();
                self.push_child(Node::Phrase(negated));
            }
            _ => self.error(TokenKind::Undefined),
        }

        self.expect(TokenKind::CloseBracket);
        Node::Phrase(self.end())
    }

    fn encapsulated_property(&mut self) -> Node {
        self.start(PhraseKind::PropertyAccessExpression, false);
        let variable = self.simple_variable();
        self.push_child(variable);
        self.next(false); // ->
        self.expect(TokenKind::Name);
        Node::Phrase(self.end())
    }

    // ---- Arrays and arguments ----

    fn short_array_creation_expression(&mut self, precedence: u8) -> Node {
        self.start(PhraseKind::ArrayCreationExpression, false);
        self.next(false); // [
        if is_array_element_start(self.peek(0).kind)
            || (precedence == 0 && self.peek(0).kind == TokenKind::Comma)
        {
            let elements = self.array_initialiser_list(TokenKind::CloseBracket);
            self.push_child(Node::Phrase(elements));
        }
        self.expect(TokenKind::CloseBracket);
        Node::Phrase(self.end())
    }

    fn long_array_creation_expression(&mut self) -> Node {
        self.start(PhraseKind::ArrayCreationExpression, false);
        self.next(false); // array
        self.expect(TokenKind::OpenParenthesis);
        if is_array_element_start(self.peek(0).kind) {
            let elements = self.array_initialiser_list(TokenKind::CloseParenthesis);
            self.push_child(Node::Phrase(elements));
        }
        self.expect(TokenKind::CloseParenthesis);
        Node::Phrase(self.end())
    }

    fn array_initialiser_list(&mut self, break_on: TokenKind) -> PhraseId {
        self.start(PhraseKind::ArrayInitialiserList, false);
        self.push_recover_set(vec![break_on, TokenKind::Comma]);

        loop {
            // Arrays tolerate empty elements between commas.
            if is_array_element_start(self.peek(0).kind) {
                let element = self.array_element();
                self.push_child(element);
            }

            let token = self.peek(0);
            if token.kind == TokenKind::Comma {
                self.next(false);
            } else if token.kind == break_on {
                break;
            } else {
                self.error(TokenKind::Undefined);
                // A missing delimiter with an element right behind?
                if is_array_element_start(token.kind) {
                    continue;
                }
                self.default_sync_strategy();
                let token = self.peek(0);
                if token.kind == TokenKind::Comma || token.kind == break_on {
                    continue;
                }
                break;
            }
        }

        self.pop_recover_set();
        self.end()
    }

    fn array_element(&mut self) -> Node {
        self.start(PhraseKind::ArrayElement, false);

        if self.peek(0).kind == TokenKind::Ampersand {
            let value = self.array_value();
            self.push_child(value);
            return Node::Phrase(self.end());
        }

        let key_or_value = self.array_key();
        self.push_child(Node::Phrase(key_or_value));

        if self.optional(TokenKind::FatArrow).is_none() {
            self.relabel(key_or_value, PhraseKind::ArrayValue);
            return Node::Phrase(self.end());
        }

        let value = self.array_value();
        self.push_child(value);
        Node::Phrase(self.end())
    }

    fn array_key(&mut self) -> PhraseId {
        self.start(PhraseKind::ArrayKey, false);
        let expr = self.expression(0);
        self.push_child(expr);
        self.end()
    }

    fn array_value(&mut self) -> Node {
        self.start(PhraseKind::ArrayValue, false);
        self.optional(TokenKind::Ampersand);
        let expr = self.expression(0);
        self.push_child(expr);
        Node::Phrase(self.end())
    }

    pub(crate) fn argument_list(&mut self) -> PhraseId {
        self.delimited_list(
            PhraseKind::ArgumentExpressionList,
            &mut |p| {
                if p.peek(0).kind == TokenKind::Ellipsis {
                    p.variadic_unpacking()
                } else {
                    p.expression(0)
                }
            },
            is_argument_start,
            TokenKind::Comma,
            Some(&[TokenKind::CloseParenthesis]),
            false,
        )
    }

    fn variadic_unpacking(&mut self) -> Node {
        self.start(PhraseKind::VariadicUnpacking, false);
        self.next(false); // ...
        let expr = self.expression(0);
        self.push_child(expr);
        Node::Phrase(self.end())
    }
}

// ---- Token-kind predicates ----

pub(crate) fn is_dereference_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::OpenBracket
            | TokenKind::OpenBrace
            | TokenKind::Arrow
            | TokenKind::OpenParenthesis
            | TokenKind::ColonColon
    )
}

pub(crate) fn is_expression_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::VariableName
            | TokenKind::Dollar
            | TokenKind::Array
            | TokenKind::OpenBracket
            | TokenKind::StringLiteral
            | TokenKind::Backslash
            | TokenKind::Name
            | TokenKind::Namespace
            | TokenKind::OpenParenthesis
            | TokenKind::Static
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Exclamation
            | TokenKind::Tilde
            | TokenKind::AtSymbol
            | TokenKind::IntegerCast
            | TokenKind::FloatCast
            | TokenKind::StringCast
            | TokenKind::ArrayCast
            | TokenKind::ObjectCast
            | TokenKind::BooleanCast
            | TokenKind::UnsetCast
            | TokenKind::List
            | TokenKind::Clone
            | TokenKind::New
            | TokenKind::FloatingLiteral
            | TokenKind::IntegerLiteral
            | TokenKind::LineConstant
            | TokenKind::FileConstant
            | TokenKind::DirectoryConstant
            | TokenKind::TraitConstant
            | TokenKind::MethodConstant
            | TokenKind::FunctionConstant
            | TokenKind::NamespaceConstant
            | TokenKind::ClassConstant
            | TokenKind::StartHeredoc
            | TokenKind::DoubleQuote
            | TokenKind::Backtick
            | TokenKind::Print
            | TokenKind::Yield
            | TokenKind::YieldFrom
            | TokenKind::Function
            | TokenKind::Fn
            | TokenKind::Include
            | TokenKind::IncludeOnce
            | TokenKind::Require
            | TokenKind::RequireOnce
            | TokenKind::Eval
            | TokenKind::Empty
            | TokenKind::Isset
            | TokenKind::Exit
    )
}

pub(crate) fn is_variable_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::VariableName
            | TokenKind::Dollar
            | TokenKind::OpenParenthesis
            | TokenKind::Array
            | TokenKind::OpenBracket
            | TokenKind::StringLiteral
            | TokenKind::Static
            | TokenKind::Name
            | TokenKind::Namespace
            | TokenKind::Backslash
    )
}

pub(crate) fn is_argument_start(kind: TokenKind) -> bool {
    kind == TokenKind::Ellipsis || is_expression_start(kind)
}

fn is_array_element_start(kind: TokenKind) -> bool {
    kind == TokenKind::Ampersand || is_expression_start(kind)
}

fn is_encapsulated_variable_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::EncapsulatedAndWhitespace
            | TokenKind::VariableName
            | TokenKind::DollarCurlyOpen
            | TokenKind::CurlyOpen
    )
}

pub(crate) fn is_parameter_start(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Ampersand | TokenKind::Ellipsis | TokenKind::VariableName)
        || is_type_declaration_start(kind)
}

pub(crate) fn is_qualified_name_start(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Backslash | TokenKind::Name | TokenKind::Namespace)
}
