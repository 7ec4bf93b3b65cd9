//! Graft parser: converts a token stream into component and contract
//! declarations.

mod parse_item;
mod parse_type;
mod parser;

pub use parser::{ParseResult, Parser};

use graft_types::SourceFile;

/// Lex and parse one source file.
pub fn parse_source(source: &SourceFile) -> ParseResult {
    let lexed = graft_lexer::Lexer::new(source).lex();
    let mut result = Parser::new(lexed.tokens, source).parse();
    let mut errors = lexed.errors;
    errors.absorb(result.errors);
    result.errors = errors;
    result
}
