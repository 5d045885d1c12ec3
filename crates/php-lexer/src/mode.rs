//! Lexer modes.
//!
//! The lexer is a pushdown automaton: the top of the mode stack selects the
//! sub-lexer that produces the next token. Interpolation constructs push
//! modes (`{$`, `${`, `$name[`, `$name->`) and their closers pop them; tag
//! and string delimiters replace the top instead.

use std::fmt;

/// Active sub-lexer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Verbatim passthrough until an open tag.
    Initial,
    /// Ordinary PHP code.
    Scripting,
    /// Just consumed `->`; a name or another arrow may follow.
    LookingForProperty,
    /// Inside an interpolated `"..."` literal.
    DoubleQuotes,
    /// Inside a `<<<'LABEL'` body (no interpolation).
    NowDoc,
    /// Inside a `<<<LABEL` body (interpolation).
    HereDoc,
    /// The terminator line of a heredoc/nowdoc has been sighted.
    EndHereDoc,
    /// Inside a backtick shell-command literal.
    Backtick,
    /// Inside the `[...]` subscript of an interpolated `$name[...]`.
    VarOffset,
    /// Just consumed `${`; a bare variable name may follow.
    LookingForVarName,
    /// Inside a `/** ... */` document comment.
    DocumentBlock,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Initial => "Initial",
            Mode::Scripting => "Scripting",
            Mode::LookingForProperty => "LookingForProperty",
            Mode::DoubleQuotes => "DoubleQuotes",
            Mode::NowDoc => "NowDoc",
            Mode::HereDoc => "HereDoc",
            Mode::EndHereDoc => "EndHereDoc",
            Mode::Backtick => "Backtick",
            Mode::VarOffset => "VarOffset",
            Mode::LookingForVarName => "LookingForVarName",
            Mode::DocumentBlock => "DocumentBlock",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
