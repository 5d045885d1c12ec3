//! Whole-tree invariants: the flattened tree reproduces the token stream
//! exactly, for well-formed and broken input alike.

use php_lexer::lex;
use php_parser::parse;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const CORPUS: &[&str] = &[
    "",
    "plain text only",
    "<?php",
    "<?php echo 1;",
    "<?php $a ?? $b;",
    "<?php $a->b;",
    "<?php \"hi $x[0]\";",
    "<?php if (a",
    "<?php class A { public function f(int $x): ?B { return $this->x; } }",
    "<?php /** @param int $x */ function f($x) {}",
    "<?php foreach ($xs as $k => &$v): echo $k; endforeach;",
    "<?php $a = <<<EOT\nhello $name\nEOT;\n",
    "<?php $a = <<<'RAW'\nno $interp\nRAW;\n",
    "before <?= $x ?> middle <?php echo 1; ?> after",
    "<?php `cmd ${dir}`;",
    "<?php new class(1) extends B implements C { use T; };",
    "<?php use A\\B\\{C, function d, const E};",
    "<?php try { f(); } catch (A|B $e) { } finally { }",
    "<?php switch ($x): case 1: case 2: break; default: endswitch;",
    "<?php fn($x) => $x * 2;",
    "<?php list($a, [$b, $c]) = $d;",
    "<?php $x{0} . $y[1]{2};",
    "<?php 1 + ) nonsense ( ;; class",
    "<?php \"unterminated $x",
    "<?php 'unterminated",
    "<?php /** @broken",
];

#[test]
fn flattening_reproduces_the_token_stream() {
    for source in CORPUS {
        let tree = parse(source);
        assert_eq!(
            tree.tokens(),
            lex(source),
            "tree flattening diverged from lex for {source:?}"
        );
    }
}

#[test]
fn parsing_is_deterministic() {
    for source in CORPUS {
        let a = serde_json::to_string(&parse(source)).unwrap();
        let b = serde_json::to_string(&parse(source)).unwrap();
        assert_eq!(a, b);
    }
}

proptest! {
    #[test]
    fn arbitrary_input_flattens_faithfully(source in any::<String>()) {
        let tree = parse(&source);
        prop_assert_eq!(tree.tokens(), lex(&source));
    }

    #[test]
    fn php_flavoured_input_flattens_faithfully(
        body in proptest::collection::vec(
            prop_oneof![
                Just("$a"), Just(" "), Just(";"), Just("\"x $y\""), Just("'s'"),
                Just("foo"), Just("->"), Just("::"), Just("1.5"), Just("=="),
                Just("{"), Just("}"), Just("["), Just("]"), Just("("), Just(")"),
                Just("if"), Just("else"), Just("class"), Just("function"),
                Just("echo"), Just("?>"), Just("<?php "), Just(","), Just("=>"),
                Just("/** @var int $x */"), Just("`c`"), Just("<<<E\nE\n"),
                Just("new"), Just("&"), Just("..."), Just("fn"), Just("=>"),
            ],
            0..32,
        )
    ) {
        let source = format!("<?php {}", body.concat());
        let tree = parse(&source);
        prop_assert_eq!(tree.tokens(), lex(&source));
    }
}
