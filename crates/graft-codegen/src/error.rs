//! Codegen error types.

use thiserror::Error;

/// Errors raised when synthesis is asked to do something the registry
/// and validator should already have ruled out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// The impl carries no `#[embeddable_as]` alias.
    #[error("impl '{impl_name}' of component '{component}' is not embeddable")]
    NotEmbeddable { component: String, impl_name: String },

    /// The impl names an interface the component does not declare.
    #[error("component '{component}' declares no interface '{interface}'")]
    UnknownInterface { component: String, interface: String },

    /// The binding or accessor belongs to a different component.
    #[error("binding of '{found}' cannot be synthesized against component '{expected}'")]
    ComponentMismatch { expected: String, found: String },

    /// The binding's storage member is missing or is not a substorage member.
    #[error("host '{host}' has no substorage member '{member}'")]
    MissingSubstorage { host: String, member: String },
}

/// Codegen result type alias.
pub type CodegenResult<T> = Result<T, CodegenError>;
