//! AST node types for Graft declaration files.
//!
//! Every node carries a [`Span`] for error reporting. Declaration order is
//! significant downstream (bindings, entry points, diagnostics), so all
//! collections are `Vec`s in source order.

use std::fmt;

use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// One parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceUnit {
    pub items: Vec<Item>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Component(ComponentDecl),
    Contract(ContractDecl),
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// `#[name]` or `#[name(arg)]`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Ident,
    pub args: Vec<Ident>,
    pub span: Span,
}

impl Attribute {
    pub fn is(&self, name: &str) -> bool {
        self.name.name == name
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Components
// ══════════════════════════════════════════════════════════════════════════════

/// `component name { storage {..} event {..} interface .. impl .. }`
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDecl {
    pub name: Ident,
    pub storage: Option<StorageBlock>,
    pub event: Option<EventBlock>,
    pub interfaces: Vec<InterfaceDecl>,
    pub impls: Vec<ImplDecl>,
    pub span: Span,
}

/// `storage { name: Type, ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct StorageBlock {
    pub members: Vec<StorageMemberDecl>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageMemberDecl {
    pub attrs: Vec<Attribute>,
    pub name: Ident,
    pub ty: TypeExpr,
    pub span: Span,
}

/// `event { Variant: Payload, Unit, ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct EventBlock {
    pub variants: Vec<EventVariantDecl>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventVariantDecl {
    pub attrs: Vec<Attribute>,
    pub name: Ident,
    pub payload: Option<TypeExpr>,
    pub span: Span,
}

/// `interface IName { fn ...; }`
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: Ident,
    pub methods: Vec<MethodSig>,
    pub span: Span,
}

/// `impl Name of IName;`, `impl Name of IName { .. }` or `impl Name { .. }`
#[derive(Debug, Clone, PartialEq)]
pub struct ImplDecl {
    pub attrs: Vec<Attribute>,
    pub name: Ident,
    pub interface: Option<Ident>,
    pub methods: Vec<MethodSig>,
    pub span: Span,
}

/// How a method receives its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiverKind {
    /// `self: @T`, a read-only view.
    Snapshot,
    /// `ref self: T`, a mutable view.
    Ref,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Receiver {
    pub kind: ReceiverKind,
    pub ty: TypeExpr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub ty: TypeExpr,
    pub span: Span,
}

/// `fn name(self: @T, arg: Type, ...) -> Ret;`
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSig {
    pub name: Ident,
    pub receiver: Receiver,
    pub params: Vec<Param>,
    pub ret: Option<TypeExpr>,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Contracts
// ══════════════════════════════════════════════════════════════════════════════

/// `contract Name { component!(..); impl X = ..; storage {..} event {..} }`
#[derive(Debug, Clone, PartialEq)]
pub struct ContractDecl {
    pub name: Ident,
    pub inclusions: Vec<ComponentMacro>,
    pub exposures: Vec<ExposureDecl>,
    pub storage: Option<StorageBlock>,
    pub event: Option<EventBlock>,
    pub span: Span,
}

/// `component!(path: p, storage: s, event: E);`
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentMacro {
    pub path: Ident,
    pub storage: Ident,
    pub event: Ident,
    pub span: Span,
}

/// `#[abi(embed_v0)] impl Local = path::Alias<ContractState>;`
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureDecl {
    pub attrs: Vec<Attribute>,
    pub local_name: Ident,
    pub target: TypePath,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Types
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Path(TypePath),
    /// `@T`
    Snapshot(Box<TypeExpr>, Span),
    /// `(A, B)`; the empty tuple is unit.
    Tuple(Vec<TypeExpr>, Span),
}

/// `a::b::C<T, U>`
#[derive(Debug, Clone, PartialEq)]
pub struct TypePath {
    pub segments: Vec<Ident>,
    pub generics: Vec<TypeExpr>,
    pub span: Span,
}

impl TypeExpr {
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Path(p) => p.span,
            TypeExpr::Snapshot(_, span) | TypeExpr::Tuple(_, span) => *span,
        }
    }

    /// Span-insensitive equality against rendered type text.
    pub fn is(&self, text: &str) -> bool {
        self.to_string() == text
    }
}

impl TypePath {
    /// The `::`-joined segments without generics.
    pub fn path(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join("::")
    }

    pub fn last(&self) -> Option<&Ident> {
        self.segments.last()
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())?;
        if !self.generics.is_empty() {
            f.write_str("<")?;
            for (i, g) in self.generics.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{g}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Path(p) => write!(f, "{p}"),
            TypeExpr::Snapshot(inner, _) => write!(f, "@{inner}"),
            TypeExpr::Tuple(items, _) => {
                f.write_str("(")?;
                for (i, t) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{t}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Ident {
        Ident::new(name, Span::default())
    }

    fn path(segments: &[&str], generics: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr::Path(TypePath {
            segments: segments.iter().map(|s| ident(s)).collect(),
            generics,
            span: Span::default(),
        })
    }

    #[test]
    fn test_type_display() {
        let storage = path(&["ownable", "Storage"], vec![]);
        assert_eq!(storage.to_string(), "ownable::Storage");

        let array = path(&["Array"], vec![path(&["u32"], vec![])]);
        let snap = TypeExpr::Snapshot(Box::new(array), Span::default());
        assert_eq!(snap.to_string(), "@Array<u32>");

        let unit = TypeExpr::Tuple(vec![], Span::default());
        assert_eq!(unit.to_string(), "()");
    }

    #[test]
    fn test_type_is_ignores_spans() {
        let a = path(&["ownable", "Event"], vec![]);
        assert!(a.is("ownable::Event"));
        assert!(!a.is("ownable::Storage"));
    }
}
