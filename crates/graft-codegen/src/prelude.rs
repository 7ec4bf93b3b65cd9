//! Per-component prelude: the `ComponentState` storage view and the
//! `HasComponent` accessor trait every binding implements.

use graft_types::model::ComponentDefinition;
use serde::Serialize;

use crate::writer::CodeWriter;

/// Declarations emitted once per registered component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentPrelude {
    pub component: String,
    /// `(field, type)` pairs of the storage view, in declaration order.
    pub fields: Vec<(String, String)>,
}

impl ComponentPrelude {
    pub fn new(component: &ComponentDefinition) -> Self {
        Self {
            component: component.name.clone(),
            fields: component
                .storage
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.ty.clone()))
                .collect(),
        }
    }

    pub fn render(&self) -> String {
        let mut w = CodeWriter::new();
        w.open(format!("mod {}", self.component));

        w.open("pub struct ComponentState<TContractState>");
        w.line("pub contract: TContractState,");
        for (name, ty) in &self.fields {
            w.line(format!("pub {name}: StorageSlot<{ty}>,"));
        }
        w.close();
        w.line("");

        w.open("pub trait HasComponent<TContractState>");
        w.line("fn get_component(self: @TContractState) -> @ComponentState<TContractState>;");
        w.line("fn get_component_mut(ref self: TContractState) -> ComponentState<TContractState>;");
        w.line("fn get_contract(self: @ComponentState<TContractState>) -> @TContractState;");
        w.line("fn get_contract_mut(ref self: ComponentState<TContractState>) -> TContractState;");
        w.line("fn emit<S, +Into<S, Event>>(ref self: ComponentState<TContractState>, event: S);");
        w.close();

        w.close();
        w.finish()
    }
}
