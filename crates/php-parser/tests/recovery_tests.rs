//! Error recovery: every input yields a tree, errors are structural, and
//! skipped tokens stay in the tree.

use php_parser::{parse, Node, PhraseKind as P};
use php_token::TokenKind as T;
use pretty_assertions::assert_eq;

#[test]
fn unterminated_if_reports_expected_close_parenthesis() {
    let tree = parse("<?php if (a");
    let if_statement = tree.find_first(P::IfStatement).unwrap();
    let errors = tree.errors();
    assert_eq!(errors.len(), 1);
    let (_, err) = errors[0];
    assert_eq!(err.expected, T::CloseParenthesis);
    assert_eq!(err.unexpected.kind, T::EndOfFile);
    // The error phrase hangs off the if statement itself.
    let error_id = tree
        .children(if_statement)
        .iter()
        .find_map(|c| match *c {
            Node::Phrase(id) if tree.kind(id) == P::Error => Some(id),
            _ => None,
        });
    assert!(error_id.is_some());
}

#[test]
fn missing_semicolon_recovers_at_next_statement() {
    let tree = parse("<?php $a = 1 $b = 2;");
    assert!(!tree.errors().is_empty());
    // Both assignments survive in the tree.
    let root_kinds = tree.child_phrase_kinds(tree.root());
    assert_eq!(
        root_kinds
            .iter()
            .filter(|k| **k == P::ExpressionStatement)
            .count(),
        2
    );
}

#[test]
fn skipped_tokens_are_attached_to_the_error_phrase() {
    // `??` cannot start a class member; recovery skips to `function`.
    let tree = parse("<?php class A { public $x; ?? function f() {} }");
    let errors = tree.errors();
    assert!(!errors.is_empty());
    let (error_id, _) = errors[0];
    let skipped: Vec<T> = tree
        .children(error_id)
        .iter()
        .filter_map(|c| match *c {
            Node::Token(t) => Some(t.kind),
            Node::Phrase(_) => None,
        })
        .collect();
    assert!(skipped.contains(&T::QuestionQuestion), "skipped {skipped:?}");
    // The method declaration still parses.
    assert!(tree.find_first(P::MethodDeclaration).is_some());
}

#[test]
fn error_avalanche_is_suppressed() {
    // A run of unparseable tokens produces a bounded number of errors, not
    // one per token.
    let tree = parse("<?php if (");
    let errors = tree.errors();
    assert!(errors.len() <= 2, "got {} errors", errors.len());
}

#[test]
fn close_brace_missing_in_class_body() {
    let tree = parse("<?php class A { public $x = 1;");
    assert!(!tree.errors().is_empty());
    assert!(tree.find_first(P::PropertyDeclaration).is_some());
}

#[test]
fn garbage_between_statements_is_preserved() {
    let source = "<?php 1; ) 2;";
    let tree = parse(source);
    assert!(!tree.errors().is_empty());
    // The stray token is somewhere in the tree, so the byte span is intact.
    let kinds: Vec<T> = tree.tokens().iter().map(|t| t.kind).collect();
    assert!(kinds.contains(&T::CloseParenthesis));
}

#[test]
fn every_error_node_carries_the_lookahead_token() {
    for source in [
        "<?php if (a",
        "<?php class {",
        "<?php foreach () {}",
        "<?php $a->;",
        "<?php A::;",
        "<?php function f(",
        "<?php \"unterminated $x",
    ] {
        let tree = parse(source);
        for (_, err) in tree.errors() {
            assert!(err.unexpected.offset as usize <= source.len());
        }
    }
}
