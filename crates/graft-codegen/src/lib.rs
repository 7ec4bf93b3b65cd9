//! Graft code generator: accessor and embeddable wrapper synthesis.
//!
//! # Artifacts
//!
//! - [`ComponentPrelude`]: once per registered component; declares the
//!   component's `ComponentState` view and its `HasComponent` trait.
//! - [`AccessorImpl`]: once per valid binding; implements `HasComponent`
//!   for the host, named `HasComponentImpl_<storage field>`.
//! - [`WrapperImpl`]: once per valid binding and embeddable impl; named by
//!   the impl's alias and forwarding each method through the accessor.
//!
//! Synthesis is a pure function of its inputs: the same component, host
//! and binding always yield identical artifacts and identical rendered text.

pub mod abi;
pub mod accessor;
pub mod error;
pub mod prelude;
pub mod source_map;
pub mod wrapper;
mod writer;

pub use abi::{entry_points, EntryKind, EntryPoint};
pub use accessor::{synthesize_accessor, AccessorImpl};
pub use error::{CodegenError, CodegenResult};
pub use prelude::ComponentPrelude;
pub use source_map::{ItemKind, SourceMap, SourceMapEntry};
pub use wrapper::{synthesize_wrapper, WrapperImpl, WrapperMethod};

use graft_types::model::{Binding, ComponentDefinition, HostDeclaration};
use serde::Serialize;

/// Knobs shared by every synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Name of the host state type, substituted for every receiver.
    pub host_state: String,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            host_state: "ContractState".to_string(),
        }
    }
}

/// Everything one fully valid binding produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingArtifacts {
    pub accessor: AccessorImpl,
    /// One wrapper per embeddable impl, in component declaration order.
    pub wrappers: Vec<WrapperImpl>,
}

/// Synthesize the accessor and every embeddable wrapper for `binding`.
pub fn synthesize(
    component: &ComponentDefinition,
    host: &HostDeclaration,
    binding: &Binding,
    options: &SynthesisOptions,
) -> CodegenResult<BindingArtifacts> {
    let accessor = synthesize_accessor(component, host, binding, options)?;
    let wrappers = component
        .embeddable_impls()
        .map(|capability| synthesize_wrapper(component, capability, &accessor))
        .collect::<CodegenResult<Vec<_>>>()?;
    Ok(BindingArtifacts { accessor, wrappers })
}

/// Generated code for one host, in binding declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostOutput {
    pub host: String,
    pub accessors: Vec<AccessorImpl>,
    pub wrappers: Vec<WrapperImpl>,
    pub entry_points: Vec<EntryPoint>,
}

impl HostOutput {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Rendered accessors, then wrappers, separated by blank lines.
    pub fn render(&self) -> String {
        let mut out = format!("// contract {}\n", self.host);
        for accessor in &self.accessors {
            out.push('\n');
            out.push_str(&accessor.render());
        }
        for wrapper in &self.wrappers {
            out.push('\n');
            out.push_str(&wrapper.render());
        }
        out
    }
}
