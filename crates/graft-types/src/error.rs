use crate::{Diagnostic, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of errors stored before further errors are only counted.
pub const MAX_ERRORS: usize = 20;

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Component,
    Binding,
    Exposure,
    Structure,
}

/// Numeric error code (E100–E599).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax errors (E100–E199) ──
    pub const UNEXPECTED_TOKEN: Self = Self(100);
    pub const UNCLOSED_BRACE: Self = Self(101);
    pub const UNEXPECTED_CHARACTER: Self = Self(102);
    pub const DUPLICATE_BLOCK: Self = Self(103);

    // ── Malformed components (E200–E299) ──
    pub const DUPLICATE_STORAGE_FIELD: Self = Self(200);
    pub const DUPLICATE_EVENT_VARIANT: Self = Self(201);
    pub const EMBEDDABLE_NOT_INTERFACE: Self = Self(202);
    pub const UNKNOWN_INTERFACE: Self = Self(203);
    pub const MULTIPLE_ALIASES: Self = Self(204);
    pub const MISSING_ALIAS: Self = Self(205);
    pub const DUPLICATE_ALIAS: Self = Self(206);
    pub const DUPLICATE_METHOD: Self = Self(207);
    pub const METHOD_NOT_IN_INTERFACE: Self = Self(208);
    pub const DUPLICATE_COMPONENT: Self = Self(209);

    // ── Host/component binding errors (E300–E399) ──
    pub const MISSING_SUBSTORAGE_MEMBER: Self = Self(300);
    pub const MISSING_NESTED_EVENT: Self = Self(301);
    pub const UNKNOWN_COMPONENT: Self = Self(302);
    pub const ALIASED_SUBSTORAGE: Self = Self(303);
    pub const DUPLICATE_EVENT_BINDING: Self = Self(304);
    pub const STORAGE_COLLISION: Self = Self(305);

    // ── Exposure errors (E400–E499) ──
    pub const UNRESOLVED_ALIAS: Self = Self(400);
    pub const AMBIGUOUS_EXPOSURE: Self = Self(401);
    pub const HOST_TYPE_MISMATCH: Self = Self(402);
    pub const DUPLICATE_ENTRY_POINT: Self = Self(403);

    // ── Host structure errors (E500–E599) ──
    pub const DUPLICATE_HOST_MEMBER: Self = Self(500);
    pub const DUPLICATE_HOST_VARIANT: Self = Self(501);
    pub const DUPLICATE_CONTRACT: Self = Self(502);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            200..=299 => ErrorCategory::Component,
            300..=399 => ErrorCategory::Binding,
            400..=499 => ErrorCategory::Exposure,
            500..=599 => ErrorCategory::Structure,
            _ => ErrorCategory::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Syntax => "syntax",
            Self::Component => "component",
            Self::Binding => "binding",
            Self::Exposure => "exposure",
            Self::Structure => "structure",
        })
    }
}

/// A rendered, user-facing compiler error.
///
/// Tooling consumes these as JSON and must not parse `message`; the
/// structured form lives in [`Diagnostic`] until rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraftError {
    pub file: String,
    pub code: ErrorCode,
    pub severity: Severity,
    pub category: ErrorCategory,
    pub message: String,
    pub span: Span,
    /// The source line the span starts on.
    pub source_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl GraftError {
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            severity: Severity::Error,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Render a structured diagnostic.
    pub fn from_diagnostic(
        file: impl Into<String>,
        diagnostic: &Diagnostic,
        source_line: impl Into<String>,
    ) -> Self {
        let err = Self::new(
            file,
            diagnostic.code(),
            diagnostic.message(),
            diagnostic.span(),
            source_line,
        );
        match diagnostic.suggestion() {
            Some(s) => err.with_suggestion(s),
            None => err,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for GraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.file, self.span, self.code, self.category, self.message
        )
    }
}

impl std::error::Error for GraftError {}

/// Errors and warnings collected over one compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileErrors {
    pub errors: Vec<GraftError>,
    pub warnings: Vec<GraftError>,
    pub total_errors: usize,
    pub total_warnings: usize,
    #[serde(skip, default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    MAX_ERRORS
}

impl CompileErrors {
    pub fn empty() -> Self {
        Self::with_limit(MAX_ERRORS)
    }

    /// Store at most `limit` errors; later ones are only counted.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            total_errors: 0,
            total_warnings: 0,
            limit,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// `true` once the stored-error cap is reached.
    pub fn is_saturated(&self) -> bool {
        self.total_errors >= self.limit
    }

    pub fn push_error(&mut self, error: GraftError) {
        if self.errors.len() < self.limit {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    pub fn push_warning(&mut self, warning: GraftError) {
        self.warnings.push(warning);
        self.total_warnings += 1;
    }

    /// Move everything from `other` into `self`, keeping order.
    pub fn absorb(&mut self, other: CompileErrors) {
        let dropped = other.total_errors - other.errors.len();
        for err in other.errors {
            self.push_error(err);
        }
        self.total_errors += dropped;
        for warning in other.warnings {
            self.push_warning(warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::UNEXPECTED_TOKEN.category(), ErrorCategory::Syntax);
        assert_eq!(
            ErrorCode::DUPLICATE_STORAGE_FIELD.category(),
            ErrorCategory::Component
        );
        assert_eq!(
            ErrorCode::MISSING_SUBSTORAGE_MEMBER.category(),
            ErrorCategory::Binding
        );
        assert_eq!(ErrorCode::UNRESOLVED_ALIAS.category(), ErrorCategory::Exposure);
        assert_eq!(
            ErrorCode::DUPLICATE_HOST_MEMBER.category(),
            ErrorCategory::Structure
        );
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::MISSING_NESTED_EVENT.to_string(), "E301");
        assert_eq!(ErrorCode::UNEXPECTED_TOKEN.to_string(), "E100");
    }

    #[test]
    fn test_graft_error_json_shape() {
        let err = GraftError::new(
            "wallet.graft",
            ErrorCode::UNRESOLVED_ALIAS,
            "Trait not found. Not a trait.",
            Span::new(4, 5, 4, 40),
            "    impl OwnableExternal = ownable::OwnableImpl<ContractState>;",
        )
        .with_suggestion("ownable::Ownable");

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"code\":400"));
        assert!(json.contains("\"category\":\"exposure\""));
        assert!(json.contains("\"suggestion\""));

        let back: GraftError = serde_json::from_str(&json).unwrap();
        assert_eq!(back.code, err.code);
        assert_eq!(back.span, err.span);
    }

    #[test]
    fn test_suggestion_omitted_when_absent() {
        let err = GraftError::new("a.graft", ErrorCode::UNEXPECTED_TOKEN, "x", Span::point(1, 1), "");
        let json = serde_json::to_string(&err).unwrap();
        assert!(!json.contains("suggestion"));
    }

    #[test]
    fn test_compile_errors_limit() {
        let mut errs = CompileErrors::with_limit(3);
        for i in 0..5 {
            errs.push_error(GraftError::new(
                "a.graft",
                ErrorCode::UNEXPECTED_TOKEN,
                format!("error {i}"),
                Span::point(i + 1, 1),
                "",
            ));
        }
        assert_eq!(errs.errors.len(), 3);
        assert_eq!(errs.total_errors, 5);
        assert!(errs.is_saturated());
    }

    #[test]
    fn test_absorb_keeps_totals() {
        let mut inner = CompileErrors::with_limit(1);
        for _ in 0..3 {
            inner.push_error(GraftError::new(
                "a.graft",
                ErrorCode::UNEXPECTED_TOKEN,
                "e",
                Span::point(1, 1),
                "",
            ));
        }
        let mut outer = CompileErrors::empty();
        outer.absorb(inner);
        assert_eq!(outer.errors.len(), 1);
        assert_eq!(outer.total_errors, 3);
    }

    #[test]
    fn test_compile_errors_empty() {
        let errs = CompileErrors::empty();
        assert!(!errs.has_errors());
        let json = serde_json::to_string(&errs).unwrap();
        assert!(json.contains("\"total_errors\":0"));
    }
}
