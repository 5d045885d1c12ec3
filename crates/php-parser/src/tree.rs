//! The concrete syntax tree and its backing phrase pool.
//!
//! Phrases live in an append-only pool owned by the [`Tree`]; children refer
//! to other phrases by [`PhraseId`] and carry tokens inline (tokens are
//! `Copy`). Allocation never fails and ids stay stable as the pool grows.
//!
//! The tree is lossless: the in-order flattening of all tokens under the
//! root equals the lexer's output for the same buffer, hidden tokens and the
//! terminal `EndOfFile` included.

use crate::phrase::PhraseKind;
use php_token::{Token, TokenKind};
use serde::ser::{Serialize, SerializeSeq, SerializeStruct, Serializer};

/// Index of a phrase in its tree's pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhraseId(pub(crate) u32);

impl PhraseId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A child of a phrase: either a leaf token or another phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Token(Token),
    Phrase(PhraseId),
}

/// Details carried by an `Error` phrase: the token that was found and the
/// kind that was required (`Undefined` when the expectation was a set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseErr {
    pub unexpected: Token,
    pub expected: TokenKind,
}

/// An interior CST node: a kind tag plus ordered children, and error details
/// when the kind is [`PhraseKind::Error`].
#[derive(Debug, Clone)]
pub struct Phrase {
    pub kind: PhraseKind,
    pub children: Vec<Node>,
    pub error: Option<ParseErr>,
}

/// The parse result: the phrase pool plus the root `StatementList`.
#[derive(Debug, Clone)]
pub struct Tree {
    phrases: Vec<Phrase>,
    root: PhraseId,
}

impl Tree {
    pub(crate) fn new(phrases: Vec<Phrase>, root: PhraseId) -> Self {
        Tree { phrases, root }
    }

    pub fn root(&self) -> PhraseId {
        self.root
    }

    pub fn phrase(&self, id: PhraseId) -> &Phrase {
        &self.phrases[id.index()]
    }

    pub fn kind(&self, id: PhraseId) -> PhraseKind {
        self.phrase(id).kind
    }

    pub fn children(&self, id: PhraseId) -> &[Node] {
        &self.phrase(id).children
    }

    /// In-order flattening of every token under the root, hidden tokens and
    /// the terminal `EndOfFile` included.
    pub fn tokens(&self) -> Vec<Token> {
        let mut out = Vec::new();
        self.collect_tokens(self.root, &mut out);
        out
    }

    fn collect_tokens(&self, id: PhraseId, out: &mut Vec<Token>) {
        for child in self.children(id) {
            match *child {
                Node::Token(token) => out.push(token),
                Node::Phrase(child_id) => self.collect_tokens(child_id, out),
            }
        }
    }

    /// All `Error` phrases reachable from the root, in source order.
    pub fn errors(&self) -> Vec<(PhraseId, ParseErr)> {
        let mut out = Vec::new();
        self.collect_errors(self.root, &mut out);
        out
    }

    fn collect_errors(&self, id: PhraseId, out: &mut Vec<(PhraseId, ParseErr)>) {
        let phrase = self.phrase(id);
        if let Some(err) = phrase.error {
            out.push((id, err));
        }
        for child in &phrase.children {
            if let Node::Phrase(child_id) = *child {
                self.collect_errors(child_id, out);
            }
        }
    }

    /// Depth-first search for the first phrase of the given kind.
    pub fn find_first(&self, kind: PhraseKind) -> Option<PhraseId> {
        self.find_from(self.root, kind)
    }

    fn find_from(&self, id: PhraseId, kind: PhraseKind) -> Option<PhraseId> {
        if self.kind(id) == kind {
            return Some(id);
        }
        for child in self.children(id) {
            if let Node::Phrase(child_id) = *child {
                if let Some(found) = self.find_from(child_id, kind) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Kinds of the phrase children of `id`, skipping tokens. Convenient for
    /// asserting tree shapes.
    pub fn child_phrase_kinds(&self, id: PhraseId) -> Vec<PhraseKind> {
        self.children(id)
            .iter()
            .filter_map(|c| match *c {
                Node::Phrase(child_id) => Some(self.kind(child_id)),
                Node::Token(_) => None,
            })
            .collect()
    }
}

struct NodeRef<'t> {
    tree: &'t Tree,
    node: Node,
}

struct ChildrenRef<'t> {
    tree: &'t Tree,
    children: &'t [Node],
}

impl Serialize for ChildrenRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.children.len()))?;
        for &child in self.children {
            seq.serialize_element(&NodeRef { tree: self.tree, node: child })?;
        }
        seq.end()
    }
}

impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.node {
            Node::Token(token) => token.serialize(serializer),
            Node::Phrase(id) => {
                let phrase = self.tree.phrase(id);
                let fields = if phrase.error.is_some() { 4 } else { 2 };
                let mut s = serializer.serialize_struct("Phrase", fields)?;
                s.serialize_field("PhraseType", phrase.kind.name())?;
                s.serialize_field(
                    "Children",
                    &ChildrenRef { tree: self.tree, children: &phrase.children },
                )?;
                if let Some(err) = phrase.error {
                    s.serialize_field("Unexpected", &err.unexpected)?;
                    s.serialize_field("Expected", err.expected.name())?;
                }
                s.end()
            }
        }
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeRef { tree: self, node: Node::Phrase(self.root) }.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_shape_of_error_phrase() {
        let error = Phrase {
            kind: PhraseKind::Error,
            children: vec![Node::Token(Token::new(TokenKind::Name, 6, 3))],
            error: Some(ParseErr {
                unexpected: Token::new(TokenKind::EndOfFile, 9, 0),
                expected: TokenKind::CloseParenthesis,
            }),
        };
        let root = Phrase {
            kind: PhraseKind::StatementList,
            children: vec![Node::Phrase(PhraseId(0))],
            error: None,
        };
        let tree = Tree::new(vec![error, root], PhraseId(1));
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "PhraseType": "StatementList",
                "Children": [{
                    "PhraseType": "Error",
                    "Children": [{"TokenType": "Name", "Offset": 6, "Length": 3}],
                    "Unexpected": {"TokenType": "EndOfFile", "Offset": 9, "Length": 0},
                    "Expected": "CloseParenthesis",
                }],
            })
        );
    }
}
