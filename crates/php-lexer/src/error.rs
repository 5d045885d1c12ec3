//! Advisory lexer diagnostics.
//!
//! The lexer never fails: unterminated constructs are emitted as best-effort
//! tokens that run to end of input. Each such anomaly also records a
//! diagnostic so tooling can surface it.

use thiserror::Error;

/// What ran off the end of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexDiagnosticKind {
    #[error("unterminated single-quoted string")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("unterminated heredoc or nowdoc body")]
    UnterminatedHeredoc,
}

/// A diagnostic with the byte span of the affected token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset} ({length} bytes)")]
pub struct LexDiagnostic {
    pub kind: LexDiagnosticKind,
    pub offset: u32,
    pub length: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_span() {
        let d = LexDiagnostic {
            kind: LexDiagnosticKind::UnterminatedString,
            offset: 6,
            length: 4,
        };
        assert_eq!(
            d.to_string(),
            "unterminated single-quoted string at offset 6 (4 bytes)"
        );
    }
}
