//! Structured diagnostics for component registration, host validation and
//! exposure resolution.
//!
//! Validators produce [`Diagnostic`] values; [`Diagnostic::message`] and
//! [`Diagnostic::suggestion`] turn them into text. Nothing upstream of
//! rendering depends on message wording.

use crate::{ErrorCode, Span};
use serde::Serialize;

/// Why a component failed registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MalformedReason {
    DuplicateStorageField { field: String },
    DuplicateEventVariant { variant: String },
    EmbeddableNotInterface { impl_name: String },
    UnknownInterface { impl_name: String, interface: String },
    MultipleAliases { impl_name: String },
    MissingAlias { impl_name: String },
    DuplicateAlias { alias: String },
    DuplicateMethod { owner: String, method: String },
    MethodNotInInterface { impl_name: String, interface: String, method: String },
    DuplicateComponent,
}

/// A compiler diagnostic before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    MalformedComponent {
        component: String,
        reason: MalformedReason,
        span: Span,
    },
    UnknownComponent {
        host: String,
        component: String,
        span: Span,
    },
    MissingSubstorageMember {
        host: String,
        component: String,
        member: String,
        /// Field declaration to add to the host's storage.
        declaration: String,
        span: Span,
    },
    MissingNestedEvent {
        host: String,
        component: String,
        variant: String,
        /// Variant declaration to add to the host's event enum.
        declaration: String,
        span: Span,
    },
    AliasedSubstorage {
        host: String,
        component: String,
        member: String,
        span: Span,
    },
    DuplicateEventBinding {
        host: String,
        component: String,
        variant: String,
        span: Span,
    },
    StorageCollision {
        host: String,
        component: String,
        field: String,
        /// Who else owns the name: `"the contract"`, a nested substorage
        /// member, or another component.
        owner: String,
        span: Span,
    },
    UnresolvedAlias {
        host: String,
        path: String,
        /// Aliases the named component does export, if it is bound.
        available: Vec<String>,
        span: Span,
    },
    AmbiguousExposure {
        host: String,
        component: String,
        accessors: Vec<String>,
        span: Span,
    },
    HostTypeMismatch {
        host: String,
        expected: String,
        found: String,
        span: Span,
    },
    DuplicateEntryPoint {
        host: String,
        entry_point: String,
        span: Span,
    },
    DuplicateHostMember {
        host: String,
        member: String,
        span: Span,
    },
    DuplicateHostVariant {
        host: String,
        variant: String,
        span: Span,
    },
    DuplicateContract {
        host: String,
        span: Span,
    },
}

impl MalformedReason {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateStorageField { .. } => ErrorCode::DUPLICATE_STORAGE_FIELD,
            Self::DuplicateEventVariant { .. } => ErrorCode::DUPLICATE_EVENT_VARIANT,
            Self::EmbeddableNotInterface { .. } => ErrorCode::EMBEDDABLE_NOT_INTERFACE,
            Self::UnknownInterface { .. } => ErrorCode::UNKNOWN_INTERFACE,
            Self::MultipleAliases { .. } => ErrorCode::MULTIPLE_ALIASES,
            Self::MissingAlias { .. } => ErrorCode::MISSING_ALIAS,
            Self::DuplicateAlias { .. } => ErrorCode::DUPLICATE_ALIAS,
            Self::DuplicateMethod { .. } => ErrorCode::DUPLICATE_METHOD,
            Self::MethodNotInInterface { .. } => ErrorCode::METHOD_NOT_IN_INTERFACE,
            Self::DuplicateComponent => ErrorCode::DUPLICATE_COMPONENT,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::DuplicateStorageField { field } => {
                format!("storage field '{field}' is declared more than once")
            }
            Self::DuplicateEventVariant { variant } => {
                format!("event variant '{variant}' is declared more than once")
            }
            Self::EmbeddableNotInterface { impl_name } => format!(
                "#[embeddable_as] on impl '{impl_name}', which does not implement an interface"
            ),
            Self::UnknownInterface {
                impl_name,
                interface,
            } => format!(
                "#[embeddable_as] on impl '{impl_name}' of '{interface}', which is not an interface declared in this component"
            ),
            Self::MultipleAliases { impl_name } => {
                format!("impl '{impl_name}' carries more than one #[embeddable_as] alias")
            }
            Self::MissingAlias { impl_name } => {
                format!("#[embeddable_as] on impl '{impl_name}' names no alias")
            }
            Self::DuplicateAlias { alias } => {
                format!("embeddable alias '{alias}' is used by more than one impl")
            }
            Self::DuplicateMethod { owner, method } => {
                format!("method '{method}' is declared more than once in '{owner}'")
            }
            Self::MethodNotInInterface {
                impl_name,
                interface,
                method,
            } => format!(
                "impl '{impl_name}' declares method '{method}', which interface '{interface}' does not have"
            ),
            Self::DuplicateComponent => "a component with this name is already registered".into(),
        }
    }
}

impl Diagnostic {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedComponent { reason, .. } => reason.code(),
            Self::UnknownComponent { .. } => ErrorCode::UNKNOWN_COMPONENT,
            Self::MissingSubstorageMember { .. } => ErrorCode::MISSING_SUBSTORAGE_MEMBER,
            Self::MissingNestedEvent { .. } => ErrorCode::MISSING_NESTED_EVENT,
            Self::AliasedSubstorage { .. } => ErrorCode::ALIASED_SUBSTORAGE,
            Self::DuplicateEventBinding { .. } => ErrorCode::DUPLICATE_EVENT_BINDING,
            Self::StorageCollision { .. } => ErrorCode::STORAGE_COLLISION,
            Self::UnresolvedAlias { .. } => ErrorCode::UNRESOLVED_ALIAS,
            Self::AmbiguousExposure { .. } => ErrorCode::AMBIGUOUS_EXPOSURE,
            Self::HostTypeMismatch { .. } => ErrorCode::HOST_TYPE_MISMATCH,
            Self::DuplicateEntryPoint { .. } => ErrorCode::DUPLICATE_ENTRY_POINT,
            Self::DuplicateHostMember { .. } => ErrorCode::DUPLICATE_HOST_MEMBER,
            Self::DuplicateHostVariant { .. } => ErrorCode::DUPLICATE_HOST_VARIANT,
            Self::DuplicateContract { .. } => ErrorCode::DUPLICATE_CONTRACT,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::MalformedComponent { span, .. }
            | Self::UnknownComponent { span, .. }
            | Self::MissingSubstorageMember { span, .. }
            | Self::MissingNestedEvent { span, .. }
            | Self::AliasedSubstorage { span, .. }
            | Self::DuplicateEventBinding { span, .. }
            | Self::StorageCollision { span, .. }
            | Self::UnresolvedAlias { span, .. }
            | Self::AmbiguousExposure { span, .. }
            | Self::HostTypeMismatch { span, .. }
            | Self::DuplicateEntryPoint { span, .. }
            | Self::DuplicateHostMember { span, .. }
            | Self::DuplicateHostVariant { span, .. }
            | Self::DuplicateContract { span, .. } => *span,
        }
    }

    /// The user-facing message.
    pub fn message(&self) -> String {
        match self {
            Self::MalformedComponent {
                component, reason, ..
            } => format!("malformed component '{component}': {}", reason.describe()),
            Self::UnknownComponent {
                host, component, ..
            } => format!("component '{component}' included by '{host}' was not found"),
            Self::MissingSubstorageMember {
                member,
                declaration,
                ..
            } => format!(
                "{member} is not a substorage member in the contract's Storage. Consider adding to Storage: {declaration}"
            ),
            Self::MissingNestedEvent {
                variant,
                declaration,
                ..
            } => format!(
                "{variant} is not a nested event in the contract's Event enum. Consider adding to the Event enum: {declaration}"
            ),
            Self::AliasedSubstorage {
                member, component, ..
            } => format!(
                "storage member '{member}' already holds another inclusion; component '{component}' needs its own member"
            ),
            Self::DuplicateEventBinding {
                variant, component, ..
            } => format!(
                "event variant '{variant}' already nests another inclusion's events; component '{component}' needs its own variant"
            ),
            Self::StorageCollision {
                component,
                field,
                owner,
                ..
            } => format!(
                "storage field '{field}' of component '{component}' collides with a member of {owner} under the flat substorage layout"
            ),
            Self::UnresolvedAlias { .. } => "Trait not found. Not a trait.".into(),
            Self::AmbiguousExposure {
                component,
                accessors,
                ..
            } => format!(
                "component '{component}' is included {} times; name the accessor to expose ({})",
                accessors.len(),
                accessors.join(", ")
            ),
            Self::HostTypeMismatch {
                expected, found, ..
            } => format!("wrapper instantiated for '{found}', expected '{expected}'"),
            Self::DuplicateEntryPoint { entry_point, .. } => {
                format!("entry point '{entry_point}' is exposed more than once")
            }
            Self::DuplicateHostMember { member, host, .. } => {
                format!("storage member '{member}' is declared more than once in '{host}'")
            }
            Self::DuplicateHostVariant { variant, host, .. } => {
                format!("event variant '{variant}' is declared more than once in '{host}'")
            }
            Self::DuplicateContract { host, .. } => {
                format!("contract '{host}' is declared more than once")
            }
        }
    }

    /// An actionable fix, where one can be computed.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::MissingSubstorageMember { declaration, .. }
            | Self::MissingNestedEvent { declaration, .. } => Some(declaration.clone()),
            Self::UnresolvedAlias { available, .. } if !available.is_empty() => Some(format!(
                "embeddable aliases available: {}",
                available.join(", ")
            )),
            Self::AmbiguousExposure { accessors, .. } => accessors
                .first()
                .map(|a| format!("add the accessor as a second generic argument, e.g. <ContractState, {a}>")),
            Self::StorageCollision { .. } => {
                Some("use the nested layout: #[substorage(v1)]".into())
            }
            _ => None,
        }
    }
}
