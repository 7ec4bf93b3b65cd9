//! Token types for the Graft lexer.

use graft_types::Span;
use std::fmt;

/// All reserved words.
///
/// `self` and `ref` are reserved so receivers parse unambiguously.
/// `path` is deliberately absent: it only has meaning inside `component!(..)`.
pub const ALL_KEYWORDS: &[&str] = &[
    "component", "contract", "storage", "event", "interface", "impl", "of", "fn", "ref",
    "self",
];

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// User identifier, including type names like `u128`.
    Identifier(String),

    // ── Keywords ─────────────────────────────────────────────
    Component,
    Contract,
    Storage,
    Event,
    Interface,
    Impl,
    Of,
    Fn,
    Ref,
    SelfKw,

    // ── Punctuation ──────────────────────────────────────────
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    /// `<`
    Less,
    /// `>`
    Greater,
    Comma,
    Colon,
    /// `::`
    ColonColon,
    Semicolon,
    /// `#`
    Hash,
    /// `!`
    Bang,
    /// `@`
    At,
    /// `=`
    Eq,
    /// `->`
    Arrow,

    Eof,
}

impl TokenKind {
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        Some(match s {
            "component" => TokenKind::Component,
            "contract" => TokenKind::Contract,
            "storage" => TokenKind::Storage,
            "event" => TokenKind::Event,
            "interface" => TokenKind::Interface,
            "impl" => TokenKind::Impl,
            "of" => TokenKind::Of,
            "fn" => TokenKind::Fn,
            "ref" => TokenKind::Ref,
            "self" => TokenKind::SelfKw,
            _ => return None,
        })
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Component
                | TokenKind::Contract
                | TokenKind::Storage
                | TokenKind::Event
                | TokenKind::Interface
                | TokenKind::Impl
                | TokenKind::Of
                | TokenKind::Fn
                | TokenKind::Ref
                | TokenKind::SelfKw
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Identifier(s) => return f.write_str(s),
            TokenKind::Component => "component",
            TokenKind::Contract => "contract",
            TokenKind::Storage => "storage",
            TokenKind::Event => "event",
            TokenKind::Interface => "interface",
            TokenKind::Impl => "impl",
            TokenKind::Of => "of",
            TokenKind::Fn => "fn",
            TokenKind::Ref => "ref",
            TokenKind::SelfKw => "self",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::ColonColon => "::",
            TokenKind::Semicolon => ";",
            TokenKind::Hash => "#",
            TokenKind::Bang => "!",
            TokenKind::At => "@",
            TokenKind::Eq => "=",
            TokenKind::Arrow => "->",
            TokenKind::Eof => "end of file",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_keyword_recognises_all() {
        for &kw in ALL_KEYWORDS {
            let kind = TokenKind::from_keyword(kw)
                .unwrap_or_else(|| panic!("'{kw}' should be a keyword"));
            assert!(kind.is_keyword());
            assert_eq!(kind.to_string(), kw, "display should match source text");
        }
    }

    #[test]
    fn test_non_keywords() {
        for name in ["path", "Storage", "Event", "ComponentState", "self_", "u128"] {
            assert!(TokenKind::from_keyword(name).is_none(), "'{name}'");
        }
    }

    #[test]
    fn test_display_punctuation() {
        assert_eq!(TokenKind::ColonColon.to_string(), "::");
        assert_eq!(TokenKind::Arrow.to_string(), "->");
        assert_eq!(TokenKind::Eof.to_string(), "end of file");
        assert_eq!(TokenKind::Identifier("owner".into()).to_string(), "owner");
    }
}
