//! Shared token definitions for the PHP lexer and parser.
//!
//! A [`Token`] is a `kind` plus a byte span into the source buffer; it never
//! owns its text. The [`TokenKind`] enum is a closed set whose declaration
//! order is load-bearing: every kind from [`TokenKind::Comment`] onwards is
//! *hidden*, meaning the parser attaches it to the tree transparently and it
//! never participates in lookahead.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Token classification.
///
/// The variants are grouped as: structural kinds, keywords, magic constants,
/// literals, names, operators/punctuation/casts, the document-comment family,
/// and finally the hidden kinds (`Comment`, `Whitespace`). The ordering
/// invariant `kind >= Comment ⇒ hidden` is relied on by
/// [`TokenKind::is_hidden`] and must be preserved when editing this list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TokenKind {
    /// Sentinel used for "expected one of a set" parse errors.
    Undefined,
    /// A rune no sub-lexer recognises.
    Unknown,
    /// Terminal token; always length zero.
    EndOfFile,

    // Keywords
    Abstract,
    Array,
    As,
    Break,
    Callable,
    Case,
    Catch,
    Class,
    /// The magic constant `__CLASS__`.
    ClassConstant,
    Clone,
    Const,
    Continue,
    Declare,
    Default,
    Do,
    Echo,
    Else,
    ElseIf,
    Empty,
    EndDeclare,
    EndFor,
    EndForeach,
    EndIf,
    EndSwitch,
    EndWhile,
    EndHeredoc,
    Eval,
    /// `exit` or `die`.
    Exit,
    Extends,
    Final,
    Finally,
    /// Arrow-function keyword `fn`.
    Fn,
    For,
    ForEach,
    Function,
    Global,
    Goto,
    /// `__halt_compiler`.
    HaltCompiler,
    If,
    Implements,
    Include,
    IncludeOnce,
    InstanceOf,
    InsteadOf,
    Interface,
    Isset,
    List,
    And,
    Or,
    Xor,
    Namespace,
    New,
    Print,
    Private,
    Public,
    Protected,
    Require,
    RequireOnce,
    Return,
    Static,
    Switch,
    Throw,
    Trait,
    Try,
    Unset,
    Use,
    Var,
    While,
    Yield,
    /// `yield from`, including the whitespace between the two words.
    YieldFrom,

    // Magic constants other than __CLASS__
    DirectoryConstant,
    FileConstant,
    LineConstant,
    FunctionConstant,
    MethodConstant,
    NamespaceConstant,
    TraitConstant,

    // Literals
    StringLiteral,
    FloatingLiteral,
    /// A run of uninterpreted text inside an interpolated string, heredoc or
    /// backtick body. Also the best-effort kind for unterminated
    /// single-quoted strings.
    EncapsulatedAndWhitespace,
    /// Passthrough text outside `<?` ... `?>`.
    Text,
    IntegerLiteral,

    // Names
    Name,
    /// `$foo` including the sigil (or the bare name inside `${name}`).
    VariableName,

    // Operators and punctuation
    Equals,
    Tilde,
    Colon,
    Semicolon,
    Exclamation,
    Dollar,
    ForwardSlash,
    Percent,
    Comma,
    AtSymbol,
    Backtick,
    Question,
    DoubleQuote,
    SingleQuote,
    LessThan,
    GreaterThan,
    Asterisk,
    AmpersandAmpersand,
    Ampersand,
    AmpersandEquals,
    CaretEquals,
    LessThanLessThan,
    LessThanLessThanEquals,
    GreaterThanGreaterThan,
    GreaterThanGreaterThanEquals,
    BarEquals,
    Plus,
    PlusEquals,
    AsteriskAsterisk,
    AsteriskAsteriskEquals,
    Arrow,
    OpenBrace,
    OpenBracket,
    OpenParenthesis,
    CloseBrace,
    CloseBracket,
    CloseParenthesis,
    QuestionQuestion,
    Bar,
    BarBar,
    Caret,
    Dot,
    DotEquals,
    /// `{` opening a `{$...}` interpolation scope.
    CurlyOpen,
    MinusMinus,
    ForwardslashEquals,
    /// `${` opening a dynamic-name interpolation scope.
    DollarCurlyOpen,
    FatArrow,
    ColonColon,
    Ellipsis,
    PlusPlus,
    EqualsEquals,
    GreaterThanEquals,
    EqualsEqualsEquals,
    ExclamationEquals,
    ExclamationEqualsEquals,
    LessThanEquals,
    Spaceship,
    Minus,
    MinusEquals,
    PercentEquals,
    AsteriskEquals,
    Backslash,
    BooleanCast,
    UnsetCast,
    StringCast,
    ObjectCast,
    IntegerCast,
    FloatCast,
    StartHeredoc,
    ArrayCast,
    OpenTag,
    /// `<?=`.
    OpenTagEcho,
    CloseTag,

    // Document-comment family. Not hidden: the doc-comment sub-parser
    // consumes these.
    DocumentCommentStart,
    DocumentCommentVersion,
    DocumentCommentText,
    DocumentCommentUnknown,
    DocumentCommentStartline,
    DocumentCommentEndline,
    DocumentCommentTagName,
    AtAuthor,
    AtDeprecated,
    AtGlobal,
    AtLicense,
    AtLink,
    AtMethod,
    AtParam,
    AtProperty,
    AtPropertyRead,
    AtPropertyWrite,
    AtReturn,
    AtSince,
    AtThrows,
    AtVar,
    DocumentCommentEnd,

    // Hidden kinds. Everything from here on is attached transparently.
    Comment,
    Whitespace,
}

impl TokenKind {
    /// Hidden tokens are attached to the tree as they are encountered and do
    /// not count toward parser lookahead.
    #[inline]
    pub fn is_hidden(self) -> bool {
        self >= TokenKind::Comment
    }

    /// Whether this kind is a recognised or generic `@tag` name inside a
    /// document comment.
    pub fn is_doc_tag_name(self) -> bool {
        matches!(
            self,
            TokenKind::DocumentCommentTagName
                | TokenKind::AtAuthor
                | TokenKind::AtDeprecated
                | TokenKind::AtGlobal
                | TokenKind::AtLicense
                | TokenKind::AtLink
                | TokenKind::AtMethod
                | TokenKind::AtParam
                | TokenKind::AtProperty
                | TokenKind::AtPropertyRead
                | TokenKind::AtPropertyWrite
                | TokenKind::AtReturn
                | TokenKind::AtSince
                | TokenKind::AtThrows
                | TokenKind::AtVar
        )
    }

    /// Stable diagnostic name, used by `Display` and the JSON forms.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Undefined => "Undefined",
            TokenKind::Unknown => "Unknown",
            TokenKind::EndOfFile => "EndOfFile",
            TokenKind::Abstract => "Abstract",
            TokenKind::Array => "Array",
            TokenKind::As => "As",
            TokenKind::Break => "Break",
            TokenKind::Callable => "Callable",
            TokenKind::Case => "Case",
            TokenKind::Catch => "Catch",
            TokenKind::Class => "Class",
            TokenKind::ClassConstant => "ClassConstant",
            TokenKind::Clone => "Clone",
            TokenKind::Const => "Const",
            TokenKind::Continue => "Continue",
            TokenKind::Declare => "Declare",
            TokenKind::Default => "Default",
            TokenKind::Do => "Do",
            TokenKind::Echo => "Echo",
            TokenKind::Else => "Else",
            TokenKind::ElseIf => "ElseIf",
            TokenKind::Empty => "Empty",
            TokenKind::EndDeclare => "EndDeclare",
            TokenKind::EndFor => "EndFor",
            TokenKind::EndForeach => "EndForeach",
            TokenKind::EndIf => "EndIf",
            TokenKind::EndSwitch => "EndSwitch",
            TokenKind::EndWhile => "EndWhile",
            TokenKind::EndHeredoc => "EndHeredoc",
            TokenKind::Eval => "Eval",
            TokenKind::Exit => "Exit",
            TokenKind::Extends => "Extends",
            TokenKind::Final => "Final",
            TokenKind::Finally => "Finally",
            TokenKind::Fn => "Fn",
            TokenKind::For => "For",
            TokenKind::ForEach => "ForEach",
            TokenKind::Function => "Function",
            TokenKind::Global => "Global",
            TokenKind::Goto => "Goto",
            TokenKind::HaltCompiler => "HaltCompiler",
            TokenKind::If => "If",
            TokenKind::Implements => "Implements",
            TokenKind::Include => "Include",
            TokenKind::IncludeOnce => "IncludeOnce",
            TokenKind::InstanceOf => "InstanceOf",
            TokenKind::InsteadOf => "InsteadOf",
            TokenKind::Interface => "Interface",
            TokenKind::Isset => "Isset",
            TokenKind::List => "List",
            TokenKind::And => "And",
            TokenKind::Or => "Or",
            TokenKind::Xor => "Xor",
            TokenKind::Namespace => "Namespace",
            TokenKind::New => "New",
            TokenKind::Print => "Print",
            TokenKind::Private => "Private",
            TokenKind::Public => "Public",
            TokenKind::Protected => "Protected",
            TokenKind::Require => "Require",
            TokenKind::RequireOnce => "RequireOnce",
            TokenKind::Return => "Return",
            TokenKind::Static => "Static",
            TokenKind::Switch => "Switch",
            TokenKind::Throw => "Throw",
            TokenKind::Trait => "Trait",
            TokenKind::Try => "Try",
            TokenKind::Unset => "Unset",
            TokenKind::Use => "Use",
            TokenKind::Var => "Var",
            TokenKind::While => "While",
            TokenKind::Yield => "Yield",
            TokenKind::YieldFrom => "YieldFrom",
            TokenKind::DirectoryConstant => "DirectoryConstant",
            TokenKind::FileConstant => "FileConstant",
            TokenKind::LineConstant => "LineConstant",
            TokenKind::FunctionConstant => "FunctionConstant",
            TokenKind::MethodConstant => "MethodConstant",
            TokenKind::NamespaceConstant => "NamespaceConstant",
            TokenKind::TraitConstant => "TraitConstant",
            TokenKind::StringLiteral => "StringLiteral",
            TokenKind::FloatingLiteral => "FloatingLiteral",
            TokenKind::EncapsulatedAndWhitespace => "EncapsulatedAndWhitespace",
            TokenKind::Text => "Text",
            TokenKind::IntegerLiteral => "IntegerLiteral",
            TokenKind::Name => "Name",
            TokenKind::VariableName => "VariableName",
            TokenKind::Equals => "Equals",
            TokenKind::Tilde => "Tilde",
            TokenKind::Colon => "Colon",
            TokenKind::Semicolon => "Semicolon",
            TokenKind::Exclamation => "Exclamation",
            TokenKind::Dollar => "Dollar",
            TokenKind::ForwardSlash => "ForwardSlash",
            TokenKind::Percent => "Percent",
            TokenKind::Comma => "Comma",
            TokenKind::AtSymbol => "AtSymbol",
            TokenKind::Backtick => "Backtick",
            TokenKind::Question => "Question",
            TokenKind::DoubleQuote => "DoubleQuote",
            TokenKind::SingleQuote => "SingleQuote",
            TokenKind::LessThan => "LessThan",
            TokenKind::GreaterThan => "GreaterThan",
            TokenKind::Asterisk => "Asterisk",
            TokenKind::AmpersandAmpersand => "AmpersandAmpersand",
            TokenKind::Ampersand => "Ampersand",
            TokenKind::AmpersandEquals => "AmpersandEquals",
            TokenKind::CaretEquals => "CaretEquals",
            TokenKind::LessThanLessThan => "LessThanLessThan",
            TokenKind::LessThanLessThanEquals => "LessThanLessThanEquals",
            TokenKind::GreaterThanGreaterThan => "GreaterThanGreaterThan",
            TokenKind::GreaterThanGreaterThanEquals => "GreaterThanGreaterThanEquals",
            TokenKind::BarEquals => "BarEquals",
            TokenKind::Plus => "Plus",
            TokenKind::PlusEquals => "PlusEquals",
            TokenKind::AsteriskAsterisk => "AsteriskAsterisk",
            TokenKind::AsteriskAsteriskEquals => "AsteriskAsteriskEquals",
            TokenKind::Arrow => "Arrow",
            TokenKind::OpenBrace => "OpenBrace",
            TokenKind::OpenBracket => "OpenBracket",
            TokenKind::OpenParenthesis => "OpenParenthesis",
            TokenKind::CloseBrace => "CloseBrace",
            TokenKind::CloseBracket => "CloseBracket",
            TokenKind::CloseParenthesis => "CloseParenthesis",
            TokenKind::QuestionQuestion => "QuestionQuestion",
            TokenKind::Bar => "Bar",
            TokenKind::BarBar => "BarBar",
            TokenKind::Caret => "Caret",
            TokenKind::Dot => "Dot",
            TokenKind::DotEquals => "DotEquals",
            TokenKind::CurlyOpen => "CurlyOpen",
            TokenKind::MinusMinus => "MinusMinus",
            TokenKind::ForwardslashEquals => "ForwardslashEquals",
            TokenKind::DollarCurlyOpen => "DollarCurlyOpen",
            TokenKind::FatArrow => "FatArrow",
            TokenKind::ColonColon => "ColonColon",
            TokenKind::Ellipsis => "Ellipsis",
            TokenKind::PlusPlus => "PlusPlus",
            TokenKind::EqualsEquals => "EqualsEquals",
            TokenKind::GreaterThanEquals => "GreaterThanEquals",
            TokenKind::EqualsEqualsEquals => "EqualsEqualsEquals",
            TokenKind::ExclamationEquals => "ExclamationEquals",
            TokenKind::ExclamationEqualsEquals => "ExclamationEqualsEquals",
            TokenKind::LessThanEquals => "LessThanEquals",
            TokenKind::Spaceship => "Spaceship",
            TokenKind::Minus => "Minus",
            TokenKind::MinusEquals => "MinusEquals",
            TokenKind::PercentEquals => "PercentEquals",
            TokenKind::AsteriskEquals => "AsteriskEquals",
            TokenKind::Backslash => "Backslash",
            TokenKind::BooleanCast => "BooleanCast",
            TokenKind::UnsetCast => "UnsetCast",
            TokenKind::StringCast => "StringCast",
            TokenKind::ObjectCast => "ObjectCast",
            TokenKind::IntegerCast => "IntegerCast",
            TokenKind::FloatCast => "FloatCast",
            TokenKind::StartHeredoc => "StartHeredoc",
            TokenKind::ArrayCast => "ArrayCast",
            TokenKind::OpenTag => "OpenTag",
            TokenKind::OpenTagEcho => "OpenTagEcho",
            TokenKind::CloseTag => "CloseTag",
            TokenKind::DocumentCommentStart => "DocumentCommentStart",
            TokenKind::DocumentCommentVersion => "DocumentCommentVersion",
            TokenKind::DocumentCommentText => "DocumentCommentText",
            TokenKind::DocumentCommentUnknown => "DocumentCommentUnknown",
            TokenKind::DocumentCommentStartline => "DocumentCommentStartline",
            TokenKind::DocumentCommentEndline => "DocumentCommentEndline",
            TokenKind::DocumentCommentTagName => "DocumentCommentTagName",
            TokenKind::AtAuthor => "AtAuthor",
            TokenKind::AtDeprecated => "AtDeprecated",
            TokenKind::AtGlobal => "AtGlobal",
            TokenKind::AtLicense => "AtLicense",
            TokenKind::AtLink => "AtLink",
            TokenKind::AtMethod => "AtMethod",
            TokenKind::AtParam => "AtParam",
            TokenKind::AtProperty => "AtProperty",
            TokenKind::AtPropertyRead => "AtPropertyRead",
            TokenKind::AtPropertyWrite => "AtPropertyWrite",
            TokenKind::AtReturn => "AtReturn",
            TokenKind::AtSince => "AtSince",
            TokenKind::AtThrows => "AtThrows",
            TokenKind::AtVar => "AtVar",
            TokenKind::DocumentCommentEnd => "DocumentCommentEnd",
            TokenKind::Comment => "Comment",
            TokenKind::Whitespace => "Whitespace",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A token: a kind plus a byte span into the source.
///
/// Invariants maintained by the lexer: `offset + length <= |source|`, tokens
/// appear in strictly non-overlapping source order, and exactly one
/// [`TokenKind::EndOfFile`] token of length zero terminates the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset into the source buffer.
    pub offset: u32,
    /// Byte length of the token's span.
    pub length: u32,
}

impl Token {
    pub fn new(kind: TokenKind, offset: u32, length: u32) -> Self {
        Token { kind, offset, length }
    }

    /// End of the span (one past the last byte).
    #[inline]
    pub fn end(&self) -> u32 {
        self.offset + self.length
    }

    /// Slice the token's text out of the source it was lexed from.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.offset as usize..self.end() as usize]
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind.name(), self.offset, self.length)
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Token", 3)?;
        s.serialize_field("TokenType", self.kind.name())?;
        s.serialize_field("Offset", &self.offset)?;
        s.serialize_field("Length", &self.length)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hidden_boundary() {
        assert!(TokenKind::Comment.is_hidden());
        assert!(TokenKind::Whitespace.is_hidden());
        assert!(!TokenKind::DocumentCommentEnd.is_hidden());
        assert!(!TokenKind::EndOfFile.is_hidden());
        assert!(!TokenKind::Name.is_hidden());
    }

    #[test]
    fn doc_tag_names() {
        assert!(TokenKind::AtParam.is_doc_tag_name());
        assert!(TokenKind::AtVar.is_doc_tag_name());
        assert!(TokenKind::DocumentCommentTagName.is_doc_tag_name());
        assert!(!TokenKind::DocumentCommentText.is_doc_tag_name());
        assert!(!TokenKind::Name.is_doc_tag_name());
    }

    #[test]
    fn display_forms() {
        let t = Token::new(TokenKind::IntegerLiteral, 11, 1);
        assert_eq!(t.to_string(), "IntegerLiteral 11 1");
        assert_eq!(TokenKind::QuestionQuestion.to_string(), "QuestionQuestion");
    }

    #[test]
    fn json_shape() {
        let t = Token::new(TokenKind::OpenTag, 0, 6);
        let json = serde_json::to_value(t).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"TokenType": "OpenTag", "Offset": 0, "Length": 6})
        );
    }

    #[test]
    fn text_slicing() {
        let src = "<?php echo 1;";
        let t = Token::new(TokenKind::IntegerLiteral, 11, 1);
        assert_eq!(t.text(src), "1");
    }
}
