//! Shared types for the Graft compiler.
//!
//! This crate defines the AST for component and contract declarations,
//! the component/host data model that the registry, validator and
//! synthesizers exchange, source spans, and the diagnostic taxonomy.

mod diagnostic;
mod error;
mod span;
pub mod ast;
pub mod model;

pub use diagnostic::{Diagnostic, MalformedReason};
pub use error::{CompileErrors, ErrorCategory, ErrorCode, GraftError, Severity, MAX_ERRORS};
pub use span::{Position, SourceFile, Span};

/// Result type used throughout the Graft compiler.
pub type Result<T> = std::result::Result<T, GraftError>;
