//! Compile-time classification tables for labels.
//!
//! Keywords are matched on the ASCII-lowercased spelling; magic constants are
//! matched exactly (they are conventionally upper-case with the underscores).
//! `yield` is absent from the keyword map on purpose: the lexer resolves it
//! separately because `yield from` fuses two words into one token.

use phf::phf_map;
use php_token::TokenKind;

pub(crate) static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "exit" => TokenKind::Exit,
    "die" => TokenKind::Exit,
    "function" => TokenKind::Function,
    "fn" => TokenKind::Fn,
    "const" => TokenKind::Const,
    "return" => TokenKind::Return,
    "try" => TokenKind::Try,
    "catch" => TokenKind::Catch,
    "finally" => TokenKind::Finally,
    "throw" => TokenKind::Throw,
    "if" => TokenKind::If,
    "elseif" => TokenKind::ElseIf,
    "endif" => TokenKind::EndIf,
    "else" => TokenKind::Else,
    "while" => TokenKind::While,
    "endwhile" => TokenKind::EndWhile,
    "do" => TokenKind::Do,
    "for" => TokenKind::For,
    "endfor" => TokenKind::EndFor,
    "foreach" => TokenKind::ForEach,
    "endforeach" => TokenKind::EndForeach,
    "declare" => TokenKind::Declare,
    "enddeclare" => TokenKind::EndDeclare,
    "instanceof" => TokenKind::InstanceOf,
    "as" => TokenKind::As,
    "switch" => TokenKind::Switch,
    "endswitch" => TokenKind::EndSwitch,
    "case" => TokenKind::Case,
    "default" => TokenKind::Default,
    "break" => TokenKind::Break,
    "continue" => TokenKind::Continue,
    "goto" => TokenKind::Goto,
    "echo" => TokenKind::Echo,
    "print" => TokenKind::Print,
    "class" => TokenKind::Class,
    "interface" => TokenKind::Interface,
    "trait" => TokenKind::Trait,
    "extends" => TokenKind::Extends,
    "implements" => TokenKind::Implements,
    "new" => TokenKind::New,
    "clone" => TokenKind::Clone,
    "var" => TokenKind::Var,
    "eval" => TokenKind::Eval,
    "include_once" => TokenKind::IncludeOnce,
    "include" => TokenKind::Include,
    "require_once" => TokenKind::RequireOnce,
    "require" => TokenKind::Require,
    "namespace" => TokenKind::Namespace,
    "use" => TokenKind::Use,
    "insteadof" => TokenKind::InsteadOf,
    "global" => TokenKind::Global,
    "isset" => TokenKind::Isset,
    "empty" => TokenKind::Empty,
    "__halt_compiler" => TokenKind::HaltCompiler,
    "static" => TokenKind::Static,
    "abstract" => TokenKind::Abstract,
    "final" => TokenKind::Final,
    "private" => TokenKind::Private,
    "protected" => TokenKind::Protected,
    "public" => TokenKind::Public,
    "unset" => TokenKind::Unset,
    "list" => TokenKind::List,
    "array" => TokenKind::Array,
    "callable" => TokenKind::Callable,
    "or" => TokenKind::Or,
    "and" => TokenKind::And,
    "xor" => TokenKind::Xor,
};

pub(crate) static MAGIC_CONSTANTS: phf::Map<&'static str, TokenKind> = phf_map! {
    "__CLASS__" => TokenKind::ClassConstant,
    "__TRAIT__" => TokenKind::TraitConstant,
    "__FUNCTION__" => TokenKind::FunctionConstant,
    "__METHOD__" => TokenKind::MethodConstant,
    "__LINE__" => TokenKind::LineConstant,
    "__FILE__" => TokenKind::FileConstant,
    "__DIR__" => TokenKind::DirectoryConstant,
    "__NAMESPACE__" => TokenKind::NamespaceConstant,
};

/// `@tag` names recognised inside document comments. Anything else becomes
/// the generic `DocumentCommentTagName`.
pub(crate) static DOC_TAGS: phf::Map<&'static str, TokenKind> = phf_map! {
    "author" => TokenKind::AtAuthor,
    "deprecated" => TokenKind::AtDeprecated,
    "global" => TokenKind::AtGlobal,
    "license" => TokenKind::AtLicense,
    "link" => TokenKind::AtLink,
    "method" => TokenKind::AtMethod,
    "param" => TokenKind::AtParam,
    "property" => TokenKind::AtProperty,
    "property-read" => TokenKind::AtPropertyRead,
    "property-write" => TokenKind::AtPropertyWrite,
    "return" => TokenKind::AtReturn,
    "since" => TokenKind::AtSince,
    "throws" => TokenKind::AtThrows,
    "var" => TokenKind::AtVar,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_aliases() {
        assert_eq!(KEYWORDS.get("exit"), Some(&TokenKind::Exit));
        assert_eq!(KEYWORDS.get("die"), Some(&TokenKind::Exit));
        assert_eq!(KEYWORDS.get("yield"), None);
    }

    #[test]
    fn magic_constants_are_case_sensitive() {
        assert_eq!(MAGIC_CONSTANTS.get("__CLASS__"), Some(&TokenKind::ClassConstant));
        assert_eq!(MAGIC_CONSTANTS.get("__class__"), None);
    }

    #[test]
    fn hyphenated_doc_tags() {
        assert_eq!(DOC_TAGS.get("property-read"), Some(&TokenKind::AtPropertyRead));
        assert_eq!(DOC_TAGS.get("unknowntag"), None);
    }
}
