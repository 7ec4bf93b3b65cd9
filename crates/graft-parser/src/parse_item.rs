//! Top-level items: components and contracts, and their member blocks.

use graft_lexer::token::TokenKind;
use graft_types::ast::*;
use graft_types::{ErrorCode, Span};

use crate::parser::Parser;

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Source Unit
    // ══════════════════════════════════════════════════════════════════════════

    pub(crate) fn parse_unit(&mut self) -> SourceUnit {
        let start = self.current_span();
        let mut items = Vec::new();

        while !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            let parsed = match self.peek_kind() {
                TokenKind::Component => self.parse_component().map(Item::Component),
                TokenKind::Contract => self.parse_contract().map(Item::Contract),
                other => {
                    let message =
                        format!("expected 'component' or 'contract', got '{other}'");
                    self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, message);
                    self.advance();
                    None
                }
            };
            match parsed {
                Some(item) => items.push(item),
                None => self.synchronize_item(),
            }
        }

        SourceUnit {
            items,
            span: start.to(self.previous_span()),
        }
    }

    /// Consume the closing `}` of a block opened at `open`.
    fn close_block(&mut self, open: Span) -> Option<Span> {
        if self.eat(&TokenKind::RBrace) {
            return Some(self.previous_span());
        }
        self.error_at(
            ErrorCode::UNCLOSED_BRACE,
            format!("unclosed '{{' opened at {open}"),
            open,
        );
        None
    }

    fn duplicate_block(&mut self, block: &str, owner: &str, span: Span) {
        self.error_at(
            ErrorCode::DUPLICATE_BLOCK,
            format!("'{owner}' declares more than one {block} block"),
            span,
        );
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Components
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_component(&mut self) -> Option<ComponentDecl> {
        let start = self.current_span();
        self.expect(&TokenKind::Component)?;
        let name = self.expect_identifier()?;
        let open = self.expect(&TokenKind::LBrace)?.span;

        let mut decl = ComponentDecl {
            name,
            storage: None,
            event: None,
            interfaces: Vec::new(),
            impls: Vec::new(),
            span: start,
        };

        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            if self.too_many_errors() {
                return None;
            }
            if self.parse_component_member(&mut decl).is_none() {
                self.synchronize_member();
            }
        }

        self.close_block(open)?;
        decl.span = start.to(self.previous_span());
        Some(decl)
    }

    fn parse_component_member(&mut self, decl: &mut ComponentDecl) -> Option<()> {
        let attrs = self.parse_attributes()?;
        match self.peek_kind() {
            TokenKind::Storage if attrs.is_empty() => {
                let block = self.parse_storage_block()?;
                if decl.storage.is_some() {
                    self.duplicate_block("storage", &decl.name.name, block.span);
                } else {
                    decl.storage = Some(block);
                }
            }
            TokenKind::Event if attrs.is_empty() => {
                let block = self.parse_event_block()?;
                if decl.event.is_some() {
                    self.duplicate_block("event", &decl.name.name, block.span);
                } else {
                    decl.event = Some(block);
                }
            }
            TokenKind::Interface if attrs.is_empty() => {
                decl.interfaces.push(self.parse_interface()?);
            }
            TokenKind::Impl => {
                decl.impls.push(self.parse_impl(attrs)?);
            }
            other => {
                let message = if attrs.is_empty() {
                    format!("expected 'storage', 'event', 'interface' or 'impl', got '{other}'")
                } else {
                    format!("attributes may only precede 'impl' here, got '{other}'")
                };
                self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, message);
                return None;
            }
        }
        Some(())
    }

    fn parse_interface(&mut self) -> Option<InterfaceDecl> {
        let start = self.current_span();
        self.expect(&TokenKind::Interface)?;
        let name = self.expect_identifier()?;
        let methods = self.parse_method_block()?;
        Some(InterfaceDecl {
            name,
            methods,
            span: start.to(self.previous_span()),
        })
    }

    /// `impl Name of I;`, `impl Name of I { .. }` or `impl Name { .. }`.
    fn parse_impl(&mut self, attrs: Vec<Attribute>) -> Option<ImplDecl> {
        let start = attrs.first().map(|a| a.span).unwrap_or(self.current_span());
        self.expect(&TokenKind::Impl)?;
        let name = self.expect_identifier()?;
        let interface = if self.eat(&TokenKind::Of) {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        let methods = if interface.is_some() && self.eat(&TokenKind::Semicolon) {
            Vec::new()
        } else {
            self.parse_method_block()?
        };

        Some(ImplDecl {
            attrs,
            name,
            interface,
            methods,
            span: start.to(self.previous_span()),
        })
    }

    /// `{ fn ..; fn ..; }`
    fn parse_method_block(&mut self) -> Option<Vec<MethodSig>> {
        let open = self.expect(&TokenKind::LBrace)?.span;
        let mut methods = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            if self.too_many_errors() {
                return None;
            }
            match self.parse_method_sig() {
                Some(sig) => methods.push(sig),
                None => self.synchronize_member(),
            }
        }
        self.close_block(open)?;
        Some(methods)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Storage & Event Blocks
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_storage_block(&mut self) -> Option<StorageBlock> {
        let start = self.current_span();
        self.expect(&TokenKind::Storage)?;
        let open = self.expect(&TokenKind::LBrace)?.span;

        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            if self.too_many_errors() {
                return None;
            }
            match self.parse_storage_member() {
                Some(member) => members.push(member),
                None => self.synchronize_member(),
            }
        }
        self.close_block(open)?;

        Some(StorageBlock {
            members,
            span: start.to(self.previous_span()),
        })
    }

    fn parse_storage_member(&mut self) -> Option<StorageMemberDecl> {
        let start = self.current_span();
        let attrs = self.parse_attributes()?;
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let span = start.to(self.previous_span());
        self.end_of_member()?;
        Some(StorageMemberDecl {
            attrs,
            name,
            ty,
            span,
        })
    }

    fn parse_event_block(&mut self) -> Option<EventBlock> {
        let start = self.current_span();
        self.expect(&TokenKind::Event)?;
        let open = self.expect(&TokenKind::LBrace)?.span;

        let mut variants = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            if self.too_many_errors() {
                return None;
            }
            match self.parse_event_variant() {
                Some(variant) => variants.push(variant),
                None => self.synchronize_member(),
            }
        }
        self.close_block(open)?;

        Some(EventBlock {
            variants,
            span: start.to(self.previous_span()),
        })
    }

    fn parse_event_variant(&mut self) -> Option<EventVariantDecl> {
        let start = self.current_span();
        let attrs = self.parse_attributes()?;
        let name = self.expect_identifier()?;
        let payload = if self.eat(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let span = start.to(self.previous_span());
        self.end_of_member()?;
        Some(EventVariantDecl {
            attrs,
            name,
            payload,
            span,
        })
    }

    /// Members are separated by `,`; the last one may omit it.
    fn end_of_member(&mut self) -> Option<()> {
        if self.eat(&TokenKind::Comma) || self.check(&TokenKind::RBrace) {
            return Some(());
        }
        self.expect(&TokenKind::Comma).map(|_| ())
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Contracts
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_contract(&mut self) -> Option<ContractDecl> {
        let start = self.current_span();
        self.expect(&TokenKind::Contract)?;
        let name = self.expect_identifier()?;
        let open = self.expect(&TokenKind::LBrace)?.span;

        let mut decl = ContractDecl {
            name,
            inclusions: Vec::new(),
            exposures: Vec::new(),
            storage: None,
            event: None,
            span: start,
        };

        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            if self.too_many_errors() {
                return None;
            }
            if self.parse_contract_member(&mut decl).is_none() {
                self.synchronize_member();
            }
        }

        self.close_block(open)?;
        decl.span = start.to(self.previous_span());
        Some(decl)
    }

    fn parse_contract_member(&mut self, decl: &mut ContractDecl) -> Option<()> {
        let attrs = self.parse_attributes()?;
        match self.peek_kind() {
            TokenKind::Component if attrs.is_empty() => {
                decl.inclusions.push(self.parse_component_macro()?);
            }
            TokenKind::Impl => {
                decl.exposures.push(self.parse_exposure(attrs)?);
            }
            TokenKind::Storage if attrs.is_empty() => {
                let block = self.parse_storage_block()?;
                if decl.storage.is_some() {
                    self.duplicate_block("storage", &decl.name.name, block.span);
                } else {
                    decl.storage = Some(block);
                }
            }
            TokenKind::Event if attrs.is_empty() => {
                let block = self.parse_event_block()?;
                if decl.event.is_some() {
                    self.duplicate_block("event", &decl.name.name, block.span);
                } else {
                    decl.event = Some(block);
                }
            }
            other => {
                let message = if attrs.is_empty() {
                    format!("expected 'component!', 'impl', 'storage' or 'event', got '{other}'")
                } else {
                    format!("attributes may only precede 'impl' here, got '{other}'")
                };
                self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, message);
                return None;
            }
        }
        Some(())
    }

    /// `component!(path: p, storage: s, event: E);`
    fn parse_component_macro(&mut self) -> Option<ComponentMacro> {
        let start = self.current_span();
        self.expect(&TokenKind::Component)?;
        self.expect(&TokenKind::Bang)?;
        self.expect(&TokenKind::LParen)?;

        self.expect_word("path")?;
        self.expect(&TokenKind::Colon)?;
        let path = self.expect_identifier()?;
        self.expect(&TokenKind::Comma)?;

        self.expect(&TokenKind::Storage)?;
        self.expect(&TokenKind::Colon)?;
        let storage = self.expect_identifier()?;
        self.expect(&TokenKind::Comma)?;

        self.expect(&TokenKind::Event)?;
        self.expect(&TokenKind::Colon)?;
        let event = self.expect_identifier()?;
        self.eat(&TokenKind::Comma);

        self.expect(&TokenKind::RParen)?;
        let span = start.to(self.previous_span());
        self.expect(&TokenKind::Semicolon)?;

        Some(ComponentMacro {
            path,
            storage,
            event,
            span,
        })
    }

    /// `impl Local = path::Alias<ContractState>;`
    fn parse_exposure(&mut self, attrs: Vec<Attribute>) -> Option<ExposureDecl> {
        let start = attrs.first().map(|a| a.span).unwrap_or(self.current_span());
        self.expect(&TokenKind::Impl)?;
        let local_name = self.expect_identifier()?;
        self.expect(&TokenKind::Eq)?;
        let target = self.parse_type_path()?;
        self.expect(&TokenKind::Semicolon)?;

        Some(ExposureDecl {
            attrs,
            local_name,
            target,
            span: start.to(self.previous_span()),
        })
    }
}
