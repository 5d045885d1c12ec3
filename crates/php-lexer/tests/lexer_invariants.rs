//! Stream-level invariants of the lexer: offset monotonicity, full
//! coverage, stability, and sync equivalence, over both hand-picked
//! boundary inputs and generated ones.

use php_lexer::{lex, sync, Change, Lexer};
use php_token::TokenKind;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const BOUNDARY_INPUTS: &[&str] = &[
    "",
    "<?php",
    "<?php\r\n",
    "<?",
    "<?=",
    "<?= 1 ?>",
    "no php here at all",
    "text <?php echo 1; ?> more text",
    "<?php 'unterminated",
    "<?php \"unterminated $x",
    "<?php /* unterminated",
    "<?php /** unterminated",
    "<?php <<<EOT\nEOT\n",
    "<?php <<<EOT\nbody\n",
    "<?php <<<'EOT'\n$x\nEOT;\n",
    "<?php \"a{$b}c\";",
    "<?php \"${x}\";",
    "<?php $a->b . $c;",
    "<?php `cmd $arg`;",
    "<?php if ($a ?? $b) {}",
    "<?php 0b11 0x1F 1.5e3 .5;",
    "<?php $héllo = \"wörld\";",
    "<?php ?>",
    "<?php // comment ?>after",
];

fn assert_stream_invariants(source: &str) {
    let tokens = lex(source);
    // Exactly one terminal EndOfFile of length zero.
    let last = tokens.last().copied();
    assert_eq!(
        last.map(|t| (t.kind, t.length)),
        Some((TokenKind::EndOfFile, 0)),
        "missing EOF for {source:?}"
    );
    assert_eq!(
        tokens.iter().filter(|t| t.kind == TokenKind::EndOfFile).count(),
        1,
        "multiple EOF tokens for {source:?}"
    );
    // Contiguous, monotone coverage of [0, len).
    let mut offset = 0u32;
    for token in &tokens {
        assert_eq!(token.offset, offset, "gap or overlap before {token} in {source:?}");
        offset = token.end();
    }
    assert_eq!(offset as usize, source.len(), "coverage short of EOF for {source:?}");
    // Spans index the buffer on char boundaries.
    for token in &tokens {
        assert!(source.is_char_boundary(token.offset as usize));
        assert!(source.is_char_boundary(token.end() as usize));
    }
}

#[test]
fn boundary_inputs_hold_invariants() {
    for source in BOUNDARY_INPUTS {
        assert_stream_invariants(source);
    }
}

#[test]
fn lexing_is_stable() {
    for source in BOUNDARY_INPUTS {
        assert_eq!(lex(source), lex(source));
    }
}

#[test]
fn mode_stack_balances_on_well_formed_input() {
    for source in ["<?php \"a{$b['{$c}']}d\";", "<?php `x $a`; ?>", "<?php /** @var int $x */ $x;"] {
        let mut lexer = Lexer::new(source);
        while lexer.next_token().kind != TokenKind::EndOfFile {}
        assert_eq!(lexer.mode_stack().len(), 1, "unbalanced modes for {source:?}");
    }
}

#[test]
fn known_token_dumps() {
    let dump = |source: &str| {
        lex(source).iter().map(|t| t.to_string()).collect::<Vec<_>>()
    };
    assert_eq!(dump(""), vec!["EndOfFile 0 0"]);
    assert_eq!(
        dump("<?php $a ?? $b;"),
        vec![
            "OpenTag 0 6",
            "VariableName 6 2",
            "Whitespace 8 1",
            "QuestionQuestion 9 2",
            "Whitespace 11 1",
            "VariableName 12 2",
            "Semicolon 14 1",
            "EndOfFile 15 0",
        ]
    );
    assert_eq!(
        dump("<?php (int) $x;"),
        vec![
            "OpenTag 0 6",
            "IntegerCast 6 5",
            "Whitespace 11 1",
            "VariableName 12 2",
            "Semicolon 14 1",
            "EndOfFile 15 0",
        ]
    );
}

proptest! {
    #[test]
    fn arbitrary_input_holds_invariants(source in any::<String>()) {
        assert_stream_invariants(&source);
    }

    #[test]
    fn arbitrary_php_flavoured_input_holds_invariants(
        body in proptest::collection::vec(
            prop_oneof![
                Just("$a"), Just(" "), Just(";"), Just("\"x $y\""), Just("'s'"),
                Just("foo"), Just("->"), Just("::"), Just("1.5"), Just("0xFF"),
                Just("{"), Just("}"), Just("["), Just("]"), Just("("), Just(")"),
                Just("?>"), Just("<?php "), Just("/* c */"), Just("/** @param int $x */"),
                Just("`cmd`"), Just("<<<E\nE\n"), Just("=="), Just("==="), Just("\\"),
            ],
            0..24,
        )
    ) {
        let source = format!("<?php {}", body.concat());
        assert_stream_invariants(&source);
        prop_assert_eq!(lex(&source), lex(&source));
    }

    #[test]
    fn sync_equivalence_on_random_edits(
        seed in 0usize..BOUNDARY_INPUTS.len(),
        at in 0usize..40,
        text in prop_oneof![Just(""), Just("r"), Just("$x"), Just("\""), Just(" echo 1;")],
    ) {
        let source = BOUNDARY_INPUTS[seed];
        let mut start = at.min(source.len());
        while !source.is_char_boundary(start) {
            start -= 1;
        }
        let change = Change { start, end: start, text: text.to_string() };
        let mut new_source = String::new();
        new_source.push_str(&source[..change.start]);
        new_source.push_str(&change.text);
        new_source.push_str(&source[change.end..]);
        let old = lex(source);
        prop_assert_eq!(sync(&new_source, &change, &old), lex(&new_source));
    }
}
