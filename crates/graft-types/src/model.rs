//! The composition data model shared by the registry, the validator and
//! the synthesizers.
//!
//! Types here are plain records: a [`ComponentDefinition`] is only built by
//! the registry after its internal consistency checks pass, and a
//! [`HostDeclaration`] only records what the host declared.

use serde::Serialize;

use crate::ast::ReceiverKind;
use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Components
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageField {
    pub name: String,
    pub ty: String,
    pub span: Span,
}

/// Ordered storage fields; names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageSchema {
    pub fields: Vec<StorageField>,
}

impl StorageSchema {
    pub fn get(&self, name: &str) -> Option<&StorageField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventVariant {
    pub name: String,
    pub payload: Option<String>,
    pub span: Span,
}

/// Event variants; names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventSchema {
    pub variants: Vec<EventVariant>,
}

impl EventSchema {
    pub fn get(&self, name: &str) -> Option<&EventVariant> {
        self.variants.iter().find(|v| v.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodParam {
    pub name: String,
    pub ty: String,
}

/// A method signature with its receiver abstracted to a mutability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSignature {
    pub name: String,
    pub receiver: ReceiverKind,
    pub params: Vec<MethodParam>,
    pub ret: Option<String>,
}

impl MethodSignature {
    pub fn is_mutable(&self) -> bool {
        self.receiver == ReceiverKind::Ref
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceDef {
    pub name: String,
    pub methods: Vec<MethodSignature>,
    pub span: Span,
}

/// An implementation inside a component, embeddable or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityImpl {
    pub name: String,
    /// The implemented interface; `None` for inherent impls.
    pub interface: Option<String>,
    /// Public name of the generated wrapper; `Some` exactly when embeddable.
    pub alias: Option<String>,
    /// Methods in interface declaration order.
    pub methods: Vec<MethodSignature>,
    pub span: Span,
}

impl CapabilityImpl {
    pub fn is_embeddable(&self) -> bool {
        self.alias.is_some()
    }
}

/// A registered, internally consistent component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentDefinition {
    pub name: String,
    pub file: String,
    pub storage: StorageSchema,
    pub events: EventSchema,
    pub interfaces: Vec<InterfaceDef>,
    pub impls: Vec<CapabilityImpl>,
    pub span: Span,
}

impl ComponentDefinition {
    /// Type a host storage member must have to hold this component.
    pub fn storage_type(&self) -> String {
        format!("{}::Storage", self.name)
    }

    /// Payload type a host event variant must have to nest this component's events.
    pub fn event_type(&self) -> String {
        format!("{}::Event", self.name)
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceDef> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn embeddable_impls(&self) -> impl Iterator<Item = &CapabilityImpl> {
        self.impls.iter().filter(|i| i.is_embeddable())
    }

    pub fn impl_by_alias(&self, alias: &str) -> Option<&CapabilityImpl> {
        self.impls
            .iter()
            .find(|i| i.alias.as_deref() == Some(alias))
    }

    pub fn aliases(&self) -> Vec<String> {
        self.embeddable_impls()
            .filter_map(|i| i.alias.clone())
            .collect()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Hosts
// ══════════════════════════════════════════════════════════════════════════════

/// Storage layout of a substorage member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubstorageLayout {
    /// `v0`: component fields share the host's storage namespace.
    Flat,
    /// `v1`: component fields live under the member's own namespace.
    Nested,
}

impl SubstorageLayout {
    pub fn from_version(version: &str) -> Option<Self> {
        match version {
            "v0" => Some(Self::Flat),
            "v1" => Some(Self::Nested),
            _ => None,
        }
    }

    pub fn version(self) -> &'static str {
        match self {
            Self::Flat => "v0",
            Self::Nested => "v1",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostStorageMember {
    pub name: String,
    pub ty: String,
    /// Set when the member carries `#[substorage(..)]`; `Err` holds an
    /// unrecognised version string.
    pub substorage: Option<Result<SubstorageLayout, String>>,
    pub span: Span,
}

impl HostStorageMember {
    pub fn layout(&self) -> Option<SubstorageLayout> {
        self.substorage.as_ref().and_then(|s| s.as_ref().ok().copied())
    }

    /// A member declared by the host itself rather than for a component.
    pub fn is_native(&self) -> bool {
        self.substorage.is_none()
    }
}

/// One `component!(..)` inclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub component: String,
    pub storage_field: String,
    pub event_variant: String,
    pub span: Span,
}

impl Binding {
    /// Name of the accessor impl synthesized for this binding.
    pub fn accessor_name(&self) -> String {
        format!("HasComponentImpl_{}", self.storage_field)
    }
}

/// `impl Local = path::Alias<Host[, Accessor]>;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exposure {
    pub local_name: String,
    pub path: Vec<String>,
    pub generics: Vec<String>,
    /// `#[abi(embed_v0)]` was present.
    pub embedded: bool,
    pub span: Span,
}

impl Exposure {
    pub fn path_text(&self) -> String {
        self.path.join("::")
    }
}

/// Everything one host declared, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostDeclaration {
    /// Host type name, the `contract` item's name.
    pub name: String,
    /// File the contract was declared in.
    pub file: String,
    pub span: Span,
    /// Storage members, native and substorage alike.
    pub storage: Vec<HostStorageMember>,
    /// Event enum variants.
    pub events: Vec<EventVariant>,
    /// `impl Local = path::Alias<..>;` declarations.
    pub exposures: Vec<Exposure>,
    /// `component!(..)` inclusions; only appended through [`Self::include`].
    bindings: Vec<Binding>,
}

impl HostDeclaration {
    pub fn new(name: impl Into<String>, file: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            span,
            storage: Vec::new(),
            events: Vec::new(),
            exposures: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Record an inclusion. No validation happens here.
    pub fn include(&mut self, binding: Binding) {
        self.bindings.push(binding);
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Every binding of `component`, in declaration order.
    pub fn bindings_for<'a>(&'a self, component: &'a str) -> impl Iterator<Item = &'a Binding> {
        self.bindings.iter().filter(move |b| b.component == component)
    }

    pub fn storage_member(&self, name: &str) -> Option<&HostStorageMember> {
        self.storage.iter().find(|m| m.name == name)
    }

    pub fn event_variant(&self, name: &str) -> Option<&EventVariant> {
        self.events.iter().find(|v| v.name == name)
    }
}

/// Progress of one binding through validation and synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingState {
    Declared,
    Validating,
    Invalid,
    Valid,
    AccessorSynthesized,
    WrapperSynthesized,
}

impl BindingState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Invalid | Self::AccessorSynthesized | Self::WrapperSynthesized
        )
    }

    pub fn has_accessor(self) -> bool {
        matches!(self, Self::AccessorSynthesized | Self::WrapperSynthesized)
    }
}
