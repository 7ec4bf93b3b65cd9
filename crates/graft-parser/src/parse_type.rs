//! Type expressions, attributes and method signatures.

use graft_lexer::token::TokenKind;
use graft_types::ast::*;
use graft_types::ErrorCode;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Types
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse `@T`, `(A, B)` or `a::b::C<T>`.
    pub(crate) fn parse_type(&mut self) -> Option<TypeExpr> {
        let start = self.current_span();
        match self.peek_kind() {
            TokenKind::At => {
                self.advance();
                let inner = self.parse_type()?;
                let span = start.to(self.previous_span());
                Some(TypeExpr::Snapshot(Box::new(inner), span))
            }
            TokenKind::LParen => {
                self.advance();
                let mut items = Vec::new();
                while !self.check(&TokenKind::RParen) && !self.at_end() {
                    items.push(self.parse_type()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RParen)?;
                Some(TypeExpr::Tuple(items, start.to(self.previous_span())))
            }
            _ => self.parse_type_path().map(TypeExpr::Path),
        }
    }

    /// Parse `a::b::C<T, U>`.
    pub(crate) fn parse_type_path(&mut self) -> Option<TypePath> {
        let start = self.current_span();
        let mut segments = vec![self.expect_identifier()?];
        while self.eat(&TokenKind::ColonColon) {
            segments.push(self.expect_identifier()?);
        }

        let mut generics = Vec::new();
        if self.eat(&TokenKind::Less) {
            loop {
                generics.push(self.parse_type()?);
                if !self.eat(&TokenKind::Comma) || self.check(&TokenKind::Greater) {
                    break;
                }
            }
            self.expect(&TokenKind::Greater)?;
        }

        Some(TypePath {
            segments,
            generics,
            span: start.to(self.previous_span()),
        })
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Attributes
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse zero or more `#[name]` / `#[name(arg, ..)]` attributes.
    pub(crate) fn parse_attributes(&mut self) -> Option<Vec<Attribute>> {
        let mut attrs = Vec::new();
        while self.check(&TokenKind::Hash) {
            let start = self.current_span();
            self.advance();
            self.expect(&TokenKind::LBracket)?;
            let name = self.expect_identifier()?;
            let mut args = Vec::new();
            if self.eat(&TokenKind::LParen) {
                while !self.check(&TokenKind::RParen) && !self.at_end() {
                    args.push(self.expect_identifier()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RParen)?;
            }
            self.expect(&TokenKind::RBracket)?;
            attrs.push(Attribute {
                name,
                args,
                span: start.to(self.previous_span()),
            });
        }
        Some(attrs)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Methods
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse `fn name(receiver, params..) -> Ret;`.
    pub(crate) fn parse_method_sig(&mut self) -> Option<MethodSig> {
        let start = self.current_span();
        self.expect(&TokenKind::Fn)?;
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::LParen)?;
        let receiver = self.parse_receiver()?;

        let mut params = Vec::new();
        while self.eat(&TokenKind::Comma) {
            if self.check(&TokenKind::RParen) {
                break;
            }
            let pstart = self.current_span();
            let pname = self.expect_identifier()?;
            self.expect(&TokenKind::Colon)?;
            let ty = self.parse_type()?;
            params.push(Param {
                name: pname,
                ty,
                span: pstart.to(self.previous_span()),
            });
        }
        self.expect(&TokenKind::RParen)?;

        let ret = if self.eat(&TokenKind::Arrow) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect(&TokenKind::Semicolon)?;

        Some(MethodSig {
            name,
            receiver,
            params,
            ret,
            span: start.to(self.previous_span()),
        })
    }

    /// Parse `self: @T` or `ref self: T`.
    fn parse_receiver(&mut self) -> Option<Receiver> {
        let start = self.current_span();
        let is_ref = self.eat(&TokenKind::Ref);
        if !self.check(&TokenKind::SelfKw) {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!(
                    "methods take 'self: @State' or 'ref self: State' first, got '{}'",
                    self.peek_kind()
                ),
            );
            return None;
        }
        self.advance();
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;

        let kind = match (is_ref, ty) {
            (true, TypeExpr::Snapshot(_, span)) => {
                self.error_at(
                    ErrorCode::UNEXPECTED_TOKEN,
                    "'ref self' cannot take a snapshot type",
                    span,
                );
                return None;
            }
            (true, ty) => (ReceiverKind::Ref, ty),
            (false, TypeExpr::Snapshot(inner, _)) => (ReceiverKind::Snapshot, *inner),
            (false, ty) => {
                self.error_at(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("by-value receiver 'self: {ty}' is not supported; use '@{ty}' or 'ref self'"),
                    ty.span(),
                );
                return None;
            }
        };

        Some(Receiver {
            kind: kind.0,
            ty: kind.1,
            span: start.to(self.previous_span()),
        })
    }
}
