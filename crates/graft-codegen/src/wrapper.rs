//! Embeddable wrapper synthesis.
//!
//! A wrapper re-implements an embeddable impl's interface for the host
//! state. Every method fetches the component view through the binding's
//! accessor, with the mutability the original receiver asks for, then
//! calls the component impl with the remaining arguments untouched. The
//! call is the method's tail expression, so results and errors pass
//! through as they are.

use graft_types::ast::ReceiverKind;
use graft_types::model::{CapabilityImpl, ComponentDefinition, MethodSignature};
use graft_types::Span;
use serde::Serialize;

use crate::accessor::AccessorImpl;
use crate::error::{CodegenError, CodegenResult};
use crate::writer::CodeWriter;

/// `impl <Alias><Host, Accessor> of <component>::<Interface><Host>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrapperImpl {
    pub alias: String,
    pub component: String,
    pub impl_name: String,
    pub interface: String,
    pub accessor: String,
    pub host_state: String,
    pub methods: Vec<WrapperMethod>,
    pub span: Span,
}

/// One forwarding method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrapperMethod {
    pub signature: MethodSignature,
    /// Body statements; the last one is the tail call.
    pub body: Vec<String>,
}

impl WrapperMethod {
    fn new(sig: &MethodSignature, component: &str, impl_name: &str, accessor: &str) -> Self {
        let (view, receiver) = match sig.receiver {
            ReceiverKind::Snapshot => (
                format!("let component = {accessor}::get_component(self);"),
                "component",
            ),
            ReceiverKind::Ref => (
                format!("let mut component = {accessor}::get_component_mut(ref self);"),
                "ref component",
            ),
        };

        let mut args = vec![receiver.to_string()];
        args.extend(sig.params.iter().map(|p| p.name.clone()));
        let call = format!(
            "{component}::{impl_name}::{}({})",
            sig.name,
            args.join(", ")
        );

        Self {
            signature: sig.clone(),
            body: vec![view, call],
        }
    }

    /// The method header with the host state substituted for the receiver.
    pub fn header(&self, host_state: &str) -> String {
        let sig = &self.signature;
        let mut params = vec![match sig.receiver {
            ReceiverKind::Snapshot => format!("self: @{host_state}"),
            ReceiverKind::Ref => format!("ref self: {host_state}"),
        }];
        params.extend(sig.params.iter().map(|p| format!("{}: {}", p.name, p.ty)));

        let mut header = format!("fn {}({})", sig.name, params.join(", "));
        if let Some(ret) = &sig.ret {
            header.push_str(" -> ");
            header.push_str(ret);
        }
        header
    }
}

impl WrapperImpl {
    pub fn render(&self) -> String {
        let mut w = CodeWriter::new();
        w.open(format!(
            "impl {}<{host}, {}> of {}::{}<{host}>",
            self.alias,
            self.accessor,
            self.component,
            self.interface,
            host = self.host_state,
        ));
        for method in &self.methods {
            w.open(method.header(&self.host_state));
            for stmt in &method.body {
                w.line(stmt);
            }
            w.close();
        }
        w.close();
        w.finish()
    }
}

/// Build the host-facing wrapper of `capability` over `accessor`.
pub fn synthesize_wrapper(
    component: &ComponentDefinition,
    capability: &CapabilityImpl,
    accessor: &AccessorImpl,
) -> CodegenResult<WrapperImpl> {
    if accessor.component != component.name {
        return Err(CodegenError::ComponentMismatch {
            expected: component.name.clone(),
            found: accessor.component.clone(),
        });
    }
    let not_embeddable = || CodegenError::NotEmbeddable {
        component: component.name.clone(),
        impl_name: capability.name.clone(),
    };
    let alias = capability.alias.clone().ok_or_else(not_embeddable)?;
    let interface_name = capability.interface.as_deref().ok_or_else(not_embeddable)?;
    let interface = component
        .interface(interface_name)
        .ok_or_else(|| CodegenError::UnknownInterface {
            component: component.name.clone(),
            interface: interface_name.to_string(),
        })?;

    let methods = interface
        .methods
        .iter()
        .map(|sig| WrapperMethod::new(sig, &component.name, &capability.name, &accessor.name))
        .collect();

    tracing::debug!(
        component = %component.name,
        alias = %alias,
        accessor = %accessor.name,
        "synthesized wrapper"
    );

    Ok(WrapperImpl {
        alias,
        component: component.name.clone(),
        impl_name: capability.name.clone(),
        interface: interface.name.clone(),
        accessor: accessor.name.clone(),
        host_state: accessor.host_state.clone(),
        methods,
        span: capability.span,
    })
}
