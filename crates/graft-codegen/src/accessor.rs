//! Accessor synthesis: one `HasComponent` impl per valid binding.
//!
//! The accessor projects the host state onto the component's storage view
//! (at the binding's storage member, using that member's layout), recovers
//! the host from a view, and nests component events under the binding's
//! event variant before handing them to the host's own `emit`.

use graft_types::model::{Binding, ComponentDefinition, HostDeclaration, SubstorageLayout};
use graft_types::Span;
use serde::Serialize;

use crate::error::{CodegenError, CodegenResult};
use crate::writer::CodeWriter;
use crate::SynthesisOptions;

/// `impl HasComponentImpl_<field> of <component>::HasComponent<Host>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorImpl {
    pub name: String,
    pub component: String,
    pub host: String,
    pub host_state: String,
    pub storage_field: String,
    pub event_variant: String,
    pub layout: SubstorageLayout,
    pub span: Span,
}

impl AccessorImpl {
    /// `<component>::ComponentState<Host>`
    pub fn view_type(&self) -> String {
        format!("{}::ComponentState<{}>", self.component, self.host_state)
    }

    fn location(&self) -> String {
        match self.layout {
            SubstorageLayout::Flat => "flat".to_string(),
            SubstorageLayout::Nested => format!("nested({})", self.storage_field),
        }
    }

    pub fn render(&self) -> String {
        let comp = &self.component;
        let host = &self.host_state;
        let view = self.view_type();
        let location = self.location();

        let mut w = CodeWriter::new();
        w.open(format!(
            "impl {} of {comp}::HasComponent<{host}>",
            self.name
        ));

        w.open(format!("fn get_component(self: @{host}) -> @{view}"));
        w.line(format!("@{comp}::ComponentState::at(self, {location})"));
        w.close();

        w.open(format!("fn get_component_mut(ref self: {host}) -> {view}"));
        w.line(format!("{comp}::ComponentState::at_mut(ref self, {location})"));
        w.close();

        w.open(format!("fn get_contract(self: @{view}) -> @{host}"));
        w.line("self.contract");
        w.close();

        w.open(format!("fn get_contract_mut(ref self: {view}) -> {host}"));
        w.line("self.contract");
        w.close();

        w.open(format!(
            "fn emit<S, +Into<S, {comp}::Event>>(ref self: {view}, event: S)"
        ));
        w.line(format!("let event: {comp}::Event = Into::into(event);"));
        w.line(format!(
            "let mut contract = {}::get_contract_mut(ref self);",
            self.name
        ));
        w.line(format!("contract.emit(Event::{}(event));", self.event_variant));
        w.close();

        w.close();
        w.finish()
    }
}

/// Build the accessor for `binding`.
///
/// The binding must already have passed validation; the substorage member
/// is looked up again only to read its layout.
pub fn synthesize_accessor(
    component: &ComponentDefinition,
    host: &HostDeclaration,
    binding: &Binding,
    options: &SynthesisOptions,
) -> CodegenResult<AccessorImpl> {
    if binding.component != component.name {
        return Err(CodegenError::ComponentMismatch {
            expected: component.name.clone(),
            found: binding.component.clone(),
        });
    }

    let layout = host
        .storage_member(&binding.storage_field)
        .and_then(|m| m.layout())
        .ok_or_else(|| CodegenError::MissingSubstorage {
            host: host.name.clone(),
            member: binding.storage_field.clone(),
        })?;

    let accessor = AccessorImpl {
        name: binding.accessor_name(),
        component: component.name.clone(),
        host: host.name.clone(),
        host_state: options.host_state.clone(),
        storage_field: binding.storage_field.clone(),
        event_variant: binding.event_variant.clone(),
        layout,
        span: binding.span,
    };
    tracing::debug!(
        host = %host.name,
        component = %component.name,
        accessor = %accessor.name,
        layout = layout.version(),
        "synthesized accessor"
    );
    Ok(accessor)
}
