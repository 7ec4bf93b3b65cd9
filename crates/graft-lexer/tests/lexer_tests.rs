//! Lexer tests: keywords, punctuation, comments, spans, error recovery,
//! and the 100-iteration determinism check.

use graft_lexer::{Lexer, TokenKind};
use graft_types::{ErrorCode, SourceFile};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex source text and return just the token kinds (excluding final Eof).
fn kinds(source: &str) -> Vec<TokenKind> {
    let sf = SourceFile::new("test.graft", source);
    Lexer::new(&sf)
        .lex()
        .tokens
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.kind)
        .collect()
}

fn ident(s: &str) -> TokenKind {
    TokenKind::Identifier(s.into())
}

// ─────────────────────────────────────────────────────────────────────
// Tokens
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_keywords() {
    let pairs = [
        ("component", TokenKind::Component),
        ("contract", TokenKind::Contract),
        ("storage", TokenKind::Storage),
        ("event", TokenKind::Event),
        ("interface", TokenKind::Interface),
        ("impl", TokenKind::Impl),
        ("of", TokenKind::Of),
        ("fn", TokenKind::Fn),
        ("ref", TokenKind::Ref),
        ("self", TokenKind::SelfKw),
    ];
    for (src, expected) in pairs {
        assert_eq!(kinds(src), vec![expected], "keyword '{src}'");
    }
}

#[test]
fn test_path_is_not_reserved() {
    assert_eq!(kinds("path"), vec![ident("path")]);
}

#[test]
fn test_component_macro_tokens() {
    assert_eq!(
        kinds("component!(path: ownable, storage: ownable, event: OwnableEvent);"),
        vec![
            TokenKind::Component,
            TokenKind::Bang,
            TokenKind::LParen,
            ident("path"),
            TokenKind::Colon,
            ident("ownable"),
            TokenKind::Comma,
            TokenKind::Storage,
            TokenKind::Colon,
            ident("ownable"),
            TokenKind::Comma,
            TokenKind::Event,
            TokenKind::Colon,
            ident("OwnableEvent"),
            TokenKind::RParen,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn test_receiver_and_arrow() {
    assert_eq!(
        kinds("fn owner(self: @ComponentState) -> Address;"),
        vec![
            TokenKind::Fn,
            ident("owner"),
            TokenKind::LParen,
            TokenKind::SelfKw,
            TokenKind::Colon,
            TokenKind::At,
            ident("ComponentState"),
            TokenKind::RParen,
            TokenKind::Arrow,
            ident("Address"),
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn test_path_with_generics() {
    assert_eq!(
        kinds("ownable::Ownable<ContractState>"),
        vec![
            ident("ownable"),
            TokenKind::ColonColon,
            ident("Ownable"),
            TokenKind::Less,
            ident("ContractState"),
            TokenKind::Greater,
        ]
    );
}

#[test]
fn test_attribute_tokens() {
    assert_eq!(
        kinds("#[substorage(v0)]"),
        vec![
            TokenKind::Hash,
            TokenKind::LBracket,
            ident("substorage"),
            TokenKind::LParen,
            ident("v0"),
            TokenKind::RParen,
            TokenKind::RBracket,
        ]
    );
}

#[test]
fn test_identifiers_with_digits_and_underscores() {
    assert_eq!(
        kinds("u128 felt252 _private new_owner"),
        vec![
            ident("u128"),
            ident("felt252"),
            ident("_private"),
            ident("new_owner"),
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Trivia
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_comments_and_newlines_skipped() {
    let src = "// header\ncomponent // trailing\n\n  counter {\n}\n";
    assert_eq!(
        kinds(src),
        vec![
            TokenKind::Component,
            ident("counter"),
            TokenKind::LBrace,
            TokenKind::RBrace,
        ]
    );
}

#[test]
fn test_empty_source_is_just_eof() {
    let sf = SourceFile::new("test.graft", "");
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.tokens.len(), 1);
    assert_eq!(result.tokens[0].kind, TokenKind::Eof);
    assert!(!result.errors.has_errors());
}

#[test]
fn test_spans_track_lines_and_columns() {
    let sf = SourceFile::new("test.graft", "contract\n  Wallet");
    let tokens = Lexer::new(&sf).lex().tokens;
    assert_eq!(tokens[0].span.start.line, 1);
    assert_eq!(tokens[0].span.start.column, 1);
    assert_eq!(tokens[0].span.end.column, 8);
    assert_eq!(tokens[1].span.start.line, 2);
    assert_eq!(tokens[1].span.start.column, 3);
}

// ─────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_unexpected_character_recovers() {
    let sf = SourceFile::new("test.graft", "storage $ event");
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.errors.total_errors, 1);
    let err = &result.errors.errors[0];
    assert_eq!(err.code, ErrorCode::UNEXPECTED_CHARACTER);
    assert_eq!(err.message, "Unexpected character '$'");
    assert_eq!(err.source_line, "storage $ event");
    let kinds: Vec<_> = result.tokens.into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::Storage, TokenKind::Event, TokenKind::Eof]
    );
}

#[test]
fn test_lone_minus_is_an_error() {
    let sf = SourceFile::new("test.graft", "a - b");
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.errors.total_errors, 1);
}

#[test]
fn test_error_cap_stops_lexing() {
    let src = "$".repeat(50);
    let sf = SourceFile::new("test.graft", src);
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.errors.errors.len(), graft_types::MAX_ERRORS);
    assert_eq!(result.tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
}

// ─────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_determinism_100_iterations() {
    let src = "contract Wallet {\n  component!(path: ownable, storage: ownable, event: OwnableEvent);\n}";
    let first = kinds(src);
    for i in 0..100 {
        assert_eq!(first, kinds(src), "Determinism failure at iteration {i}");
    }
}
