//! Tree-shape tests for the statement, declaration, and expression grammar.

use php_parser::{parse, PhraseKind as P};
use pretty_assertions::assert_eq;

/// Phrase kinds of the root's direct phrase children.
fn top_level(source: &str) -> Vec<P> {
    let tree = parse(source);
    tree.child_phrase_kinds(tree.root())
}

#[test]
fn empty_input_is_an_empty_statement_list() {
    let tree = parse("");
    assert_eq!(tree.kind(tree.root()), P::StatementList);
    assert_eq!(tree.child_phrase_kinds(tree.root()), vec![]);
}

#[test]
fn coalesce_expression_shape() {
    let tree = parse("<?php $a ?? $b;");
    assert_eq!(
        tree.child_phrase_kinds(tree.root()),
        vec![P::InlineText, P::ExpressionStatement]
    );
    let statement = tree.find_first(P::ExpressionStatement).unwrap();
    assert_eq!(tree.child_phrase_kinds(statement), vec![P::CoalesceExpression]);
    let coalesce = tree.find_first(P::CoalesceExpression).unwrap();
    assert_eq!(
        tree.child_phrase_kinds(coalesce),
        vec![P::SimpleVariable, P::SimpleVariable]
    );
}

#[test]
fn statement_coverage() {
    let cases: &[(&str, P)] = &[
        ("<?php namespace A\\B;", P::NamespaceDefinition),
        ("<?php use A\\B as C;", P::NamespaceUseDeclaration),
        ("<?php use function A\\{b, c};", P::NamespaceUseDeclaration),
        ("<?php __halt_compiler();", P::HaltCompilerStatement),
        ("<?php const A = 1, B = 2;", P::ConstDeclaration),
        ("<?php function f($x) {}", P::FunctionDeclaration),
        ("<?php class A extends B implements C {}", P::ClassDeclaration),
        ("<?php abstract class A {}", P::ClassDeclaration),
        ("<?php trait T {}", P::TraitDeclaration),
        ("<?php interface I extends J {}", P::InterfaceDeclaration),
        ("<?php { 1; }", P::CompoundStatement),
        ("<?php if ($a) {} elseif ($b) {} else {}", P::IfStatement),
        ("<?php if ($a): endif;", P::IfStatement),
        ("<?php while ($a) {}", P::WhileStatement),
        ("<?php while ($a): endwhile;", P::WhileStatement),
        ("<?php do {} while ($a);", P::DoStatement),
        ("<?php for ($i = 0; $i < 3; $i++) {}", P::ForStatement),
        ("<?php for (;;): endfor;", P::ForStatement),
        ("<?php foreach ($a as $k => $v) {}", P::ForeachStatement),
        ("<?php foreach ($a as &$v): endforeach;", P::ForeachStatement),
        ("<?php switch ($a) { case 1: break; default: }", P::SwitchStatement),
        ("<?php switch ($a): case 1: endswitch;", P::SwitchStatement),
        ("<?php break 2;", P::BreakStatement),
        ("<?php continue;", P::ContinueStatement),
        ("<?php return $a;", P::ReturnStatement),
        ("<?php global $a, $b;", P::GlobalDeclaration),
        ("<?php static $a = 1;", P::FunctionStaticDeclaration),
        ("<?php echo 1, 2;", P::EchoIntrinsic),
        ("<?= $a;", P::EchoIntrinsic),
        ("<?php unset($a, $b);", P::UnsetIntrinsic),
        ("<?php declare(strict_types=1);", P::DeclareStatement),
        ("<?php try {} catch (A | B $e) {} finally {}", P::TryStatement),
        ("<?php throw new E();", P::ThrowStatement),
        ("<?php goto end;", P::GotoStatement),
        ("<?php end: 1;", P::NamedLabelStatement),
        ("<?php ;", P::NullStatement),
        ("<?php 1 + 2;", P::ExpressionStatement),
    ];
    for (source, kind) in cases {
        let kinds = top_level(source);
        assert!(
            kinds.contains(kind),
            "expected {kind} at top level of {source:?}, got {kinds:?}"
        );
    }
}

#[test]
fn expression_coverage() {
    let cases: &[(&str, P)] = &[
        ("<?php $a = $b;", P::SimpleAssignmentExpression),
        ("<?php $a = &$b;", P::ByRefAssignmentExpression),
        ("<?php $a += 1;", P::CompoundAssignmentExpression),
        ("<?php 1 + 2;", P::AdditiveExpression),
        ("<?php 'a' . 'b';", P::AdditiveExpression),
        ("<?php 2 * 3;", P::MultiplicativeExpression),
        ("<?php 2 ** 3;", P::ExponentiationExpression),
        ("<?php 1 << 2;", P::ShiftExpression),
        ("<?php $a && $b;", P::LogicalExpression),
        ("<?php $a and $b;", P::LogicalExpression),
        ("<?php $a == $b;", P::EqualityExpression),
        ("<?php $a <=> $b;", P::EqualityExpression),
        ("<?php $a < $b;", P::RelationalExpression),
        ("<?php $a | $b;", P::BitwiseExpression),
        ("<?php $a ?? $b;", P::CoalesceExpression),
        ("<?php $a ? $b : $c;", P::TernaryExpression),
        ("<?php $a ?: $b;", P::TernaryExpression),
        ("<?php $a instanceof B;", P::InstanceOfExpression),
        ("<?php !$a;", P::UnaryOpExpression),
        ("<?php -$a;", P::UnaryOpExpression),
        ("<?php @f();", P::ErrorControlExpression),
        ("<?php (int) $a;", P::CastExpression),
        ("<?php ++$a;", P::PrefixIncrementExpression),
        ("<?php $a--;", P::PostfixDecrementExpression),
        ("<?php $a[0];", P::SubscriptExpression),
        ("<?php $a->b;", P::PropertyAccessExpression),
        ("<?php $a->b(1);", P::MethodCallExpression),
        ("<?php A::$b;", P::ScopedPropertyAccessExpression),
        ("<?php A::B;", P::ClassConstantAccessExpression),
        ("<?php A::b();", P::ScopedCallExpression),
        ("<?php f(1, ...$args);", P::FunctionCallExpression),
        ("<?php f(1, ...$args);", P::VariadicUnpacking),
        ("<?php CONST_NAME;", P::ConstantAccessExpression),
        ("<?php array(1, 2);", P::ArrayCreationExpression),
        ("<?php [1 => 2, 3];", P::ArrayCreationExpression),
        ("<?php list($a, $b) = $c;", P::ListIntrinsic),
        ("<?php new A(1);", P::ObjectCreationExpression),
        ("<?php new class { };", P::AnonymousClassDeclaration),
        ("<?php clone $a;", P::CloneExpression),
        ("<?php print 1;", P::PrintIntrinsic),
        ("<?php function () use (&$x) { };", P::AnonymousFunctionCreationExpression),
        ("<?php static function () { };", P::AnonymousFunctionCreationExpression),
        ("<?php fn($x) => $x + 1;", P::ArrowFunctionCreationExpression),
        ("<?php static fn(): int => 1;", P::ArrowFunctionCreationExpression),
        ("<?php include 'a.php';", P::IncludeExpression),
        ("<?php include_once 'a.php';", P::IncludeOnceExpression),
        ("<?php require 'a.php';", P::RequireExpression),
        ("<?php require_once 'a.php';", P::RequireOnceExpression),
        ("<?php eval('1;');", P::EvalIntrinsic),
        ("<?php empty($a);", P::EmptyIntrinsic),
        ("<?php isset($a, $b);", P::IssetIntrinsic),
        ("<?php exit(1);", P::ExitIntrinsic),
        ("<?php die;", P::ExitIntrinsic),
        ("<?php `ls $dir`;", P::ShellCommandExpression),
        ("<?php \"a $b c\";", P::DoubleQuotedStringLiteral),
        ("<?php <<<EOT\ntext $v\nEOT;\n", P::HeredocStringLiteral),
        ("<?php yield 1 => 2;", P::YieldExpression),
        ("<?php yield from g();", P::YieldFromExpression),
        ("<?php ${'dyn'};", P::SimpleVariable),
        ("<?php $$indirect;", P::SimpleVariable),
    ];
    for (source, kind) in cases {
        let tree = parse(source);
        assert!(
            tree.find_first(*kind).is_some(),
            "expected a {kind} somewhere in {source:?}"
        );
        assert_eq!(tree.errors(), vec![], "unexpected errors for {source:?}");
    }
}

#[test]
fn precedence_multiplication_binds_tighter() {
    // 1 + 2 * 3 parses as 1 + (2 * 3).
    let tree = parse("<?php 1 + 2 * 3;");
    let additive = tree.find_first(P::AdditiveExpression).unwrap();
    assert_eq!(tree.child_phrase_kinds(additive), vec![P::MultiplicativeExpression]);
}

#[test]
fn assignment_is_right_associative() {
    // $a = $b = 1 parses as $a = ($b = 1).
    let tree = parse("<?php $a = $b = 1;");
    let outer = tree.find_first(P::SimpleAssignmentExpression).unwrap();
    assert_eq!(
        tree.child_phrase_kinds(outer),
        vec![P::SimpleVariable, P::SimpleAssignmentExpression]
    );
}

#[test]
fn subtraction_is_left_associative() {
    // 1 - 2 - 3 parses as (1 - 2) - 3.
    let tree = parse("<?php 1 - 2 - 3;");
    let outer = tree.find_first(P::AdditiveExpression).unwrap();
    assert_eq!(tree.child_phrase_kinds(outer), vec![P::AdditiveExpression]);
}

#[test]
fn class_members() {
    let source = r#"<?php
class A {
    use T1, T2 { T1::f insteadof T2; f as protected g; }
    const X = 1;
    public static $p = [1], $q;
    var $r;
    abstract protected function m(int $x, ...$rest): ?B;
    public function n() { return $this->p; }
}
"#;
    let tree = parse(source);
    assert_eq!(tree.errors(), vec![]);
    for kind in [
        P::TraitUseClause,
        P::TraitPrecedence,
        P::TraitAlias,
        P::ClassConstDeclaration,
        P::PropertyDeclaration,
        P::PropertyInitialiser,
        P::MethodDeclaration,
        P::ParameterDeclarationList,
        P::ReturnType,
        P::MemberModifierList,
    ] {
        assert!(tree.find_first(kind).is_some(), "missing {kind}");
    }
}

#[test]
fn function_declaration_shape() {
    let tree = parse("<?php function f(A $a, &$b, ...$c) : \\B\\C {}");
    let header = tree.find_first(P::FunctionDeclarationHeader).unwrap();
    assert_eq!(
        tree.child_phrase_kinds(header),
        vec![P::ParameterDeclarationList, P::ReturnType]
    );
    assert!(tree.find_first(P::FunctionDeclarationBody).is_some());
    assert_eq!(tree.errors(), vec![]);
}

#[test]
fn interpolated_string_shape() {
    let tree = parse(r#"<?php "hi $x[0] {$y->z}";"#);
    let list = tree.find_first(P::EncapsulatedVariableList).unwrap();
    let kinds = tree.child_phrase_kinds(list);
    assert!(kinds.contains(&P::SubscriptExpression));
    assert!(kinds.contains(&P::EncapsulatedVariable));
    assert_eq!(tree.errors(), vec![]);
}

#[test]
fn qualified_name_variants() {
    assert!(parse("<?php \\A\\B::C;").find_first(P::FullyQualifiedName).is_some());
    // Relative names only occur in expression position; a leading
    // `namespace` at statement level opens a namespace definition.
    assert!(parse("<?php $x = namespace\\A::C;").find_first(P::RelativeQualifiedName).is_some());
    assert!(parse("<?php A\\B::C;").find_first(P::QualifiedName).is_some());
}

#[test]
fn inline_text_round_trip() {
    let tree = parse("before <?php echo 1; ?> after");
    let kinds = tree.child_phrase_kinds(tree.root());
    assert_eq!(kinds, vec![P::InlineText, P::EchoIntrinsic, P::InlineText]);
    assert_eq!(tree.errors(), vec![]);
}

#[test]
fn close_tag_ends_statement_implicitly() {
    // `?>` satisfies the expected `;` without being consumed by it.
    let tree = parse("<?php echo 1 ?>");
    assert_eq!(tree.errors(), vec![]);
    let kinds = tree.child_phrase_kinds(tree.root());
    assert_eq!(kinds, vec![P::InlineText, P::EchoIntrinsic, P::InlineText]);
}

#[test]
fn doc_comment_statement() {
    let source = "<?php\n/**\n * Summary line.\n * @param int|string $x the value\n * @return bool\n */\nfunction f($x) {}\n";
    let tree = parse(source);
    assert_eq!(tree.errors(), vec![]);
    let comment = tree.find_first(P::DocumentComment).unwrap();
    let kinds = tree.child_phrase_kinds(comment);
    assert!(kinds.contains(&P::DocumentCommentDescription));
    assert!(kinds.contains(&P::DocumentCommentParamTag));
    assert!(kinds.contains(&P::DocumentCommentReturnTag));
    let param = tree.find_first(P::DocumentCommentParamTag).unwrap();
    let param_kinds = tree.child_phrase_kinds(param);
    assert!(param_kinds.contains(&P::TypeUnion));
    assert!(param_kinds.contains(&P::DocumentCommentDescription));
}

#[test]
fn doc_comment_in_class_body() {
    let source = "<?php\nclass A {\n    /** @var int */\n    public $x;\n}\n";
    let tree = parse(source);
    assert_eq!(tree.errors(), vec![]);
    let members = tree.find_first(P::ClassMemberDeclarationList).unwrap();
    let kinds = tree.child_phrase_kinds(members);
    assert_eq!(kinds, vec![P::DocumentComment, P::PropertyDeclaration]);
    assert!(tree.find_first(P::DocumentCommentVarTag).is_some());
}

#[test]
fn doc_comment_method_tag() {
    let source = "<?php\n/** @method static int f(int $a, $b = 1) does things */\nclass A {}\n";
    let tree = parse(source);
    let method = tree.find_first(P::DocumentCommentMethodTag).unwrap();
    let kinds = tree.child_phrase_kinds(method);
    assert!(kinds.contains(&P::Identifier));
    assert!(kinds.contains(&P::ParameterDeclarationList));
    assert!(tree.find_first(P::ParameterValue).is_some());
}

#[test]
fn doc_comment_author_tag() {
    let source = "<?php\n/** @author Jo Coder <jo@example.com> */\n$x;\n";
    let tree = parse(source);
    let author = tree.find_first(P::DocumentCommentAuthorTag).unwrap();
    let kinds = tree.child_phrase_kinds(author);
    assert_eq!(kinds, vec![P::DocumentCommentAuthor, P::DocumentCommentEmail]);
}

#[test]
fn unknown_doc_tag_gets_description() {
    let source = "<?php\n/** @whatever free text here */\n$x;\n";
    let tree = parse(source);
    let tag = tree.find_first(P::DocumentCommentTag).unwrap();
    assert!(tree.child_phrase_kinds(tag).contains(&P::DocumentCommentDescription));
}

#[test]
fn json_serialization_round_trips_kind_names() {
    let tree = parse("<?php $a;");
    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json["PhraseType"], "StatementList");
    let children = json["Children"].as_array().unwrap();
    assert_eq!(children[0]["PhraseType"], "InlineText");
    assert_eq!(children[1]["PhraseType"], "ExpressionStatement");
}
