//! Exposure resolution: `impl Local = path::Alias<ContractState>;`.
//!
//! The first path segment names a bound component, the last segment the
//! alias of one of its embeddable impls. An optional second generic
//! argument names the accessor, which picks one binding when a component
//! is included more than once.

use std::collections::HashSet;

use graft_codegen::{entry_points, BindingArtifacts, EntryPoint, WrapperImpl};
use graft_types::model::{Binding, Exposure, HostDeclaration};
use graft_types::{Diagnostic, Span};
use serde::Serialize;

use crate::registry::ComponentRegistry;

/// A wrapper the host instantiated under a local name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExposedImpl {
    pub local_name: String,
    pub component: String,
    pub alias: String,
    pub accessor: String,
    /// Part of the external ABI (`#[abi(embed_v0)]`); otherwise internal only.
    pub embedded: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub exposed: Vec<ExposedImpl>,
    /// Exposure order, then interface order.
    pub entry_points: Vec<EntryPoint>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolve every exposure of `host` against the synthesized artifacts.
///
/// `artifacts` is aligned with `host.bindings()`; `None` marks a binding
/// that produced nothing.
pub fn resolve_exposures(
    host: &HostDeclaration,
    registry: &ComponentRegistry,
    artifacts: &[Option<BindingArtifacts>],
    contract_state: &str,
) -> Resolution {
    let _span = tracing::debug_span!("resolve", host = %host.name).entered();
    let mut resolver = Resolver {
        host,
        registry,
        artifacts,
        contract_state,
        out: Resolution::default(),
        names: HashSet::new(),
    };
    for exposure in &host.exposures {
        resolver.resolve(exposure);
    }
    tracing::debug!(
        exposed = resolver.out.exposed.len(),
        entry_points = resolver.out.entry_points.len(),
        "exposures resolved"
    );
    resolver.out
}

struct Resolver<'a> {
    host: &'a HostDeclaration,
    registry: &'a ComponentRegistry,
    artifacts: &'a [Option<BindingArtifacts>],
    contract_state: &'a str,
    out: Resolution,
    /// Entry-point names already on the external surface.
    names: HashSet<String>,
}

impl<'a> Resolver<'a> {
    fn unresolved(&mut self, exposure: &Exposure, available: Vec<String>) {
        tracing::debug!(local = %exposure.local_name, path = %exposure.path_text(), "unresolved alias");
        self.out.diagnostics.push(Diagnostic::UnresolvedAlias {
            host: self.host.name.clone(),
            path: exposure.path_text(),
            available,
            span: exposure.span,
        });
    }

    fn resolve(&mut self, exposure: &Exposure) {
        let (component_name, alias) = match exposure.path.as_slice() {
            [first, .., last] => (first.as_str(), last.as_str()),
            _ => return self.unresolved(exposure, Vec::new()),
        };

        let bound: Vec<(usize, &Binding)> = self
            .host
            .bindings()
            .iter()
            .enumerate()
            .filter(|(_, b)| b.component == component_name)
            .collect();

        let Some(component) = self.registry.get(component_name) else {
            // Unknown or rejected components were diagnosed at their inclusion.
            if bound.is_empty() {
                self.unresolved(exposure, Vec::new());
            }
            return;
        };
        if bound.is_empty() || component.impl_by_alias(alias).is_none() {
            return self.unresolved(exposure, component.aliases());
        }

        match exposure.generics.first() {
            Some(found) if found == self.contract_state => {}
            found => {
                self.out.diagnostics.push(Diagnostic::HostTypeMismatch {
                    host: self.host.name.clone(),
                    expected: self.contract_state.to_string(),
                    found: found.cloned().unwrap_or_else(|| "()".to_string()),
                    span: exposure.span,
                });
                return;
            }
        }

        let index = match exposure.generics.get(1) {
            Some(accessor) => match bound.iter().find(|(_, b)| &b.accessor_name() == accessor) {
                Some((i, _)) => *i,
                None => return self.unresolved(exposure, Vec::new()),
            },
            None if bound.len() > 1 => {
                self.out.diagnostics.push(Diagnostic::AmbiguousExposure {
                    host: self.host.name.clone(),
                    component: component.name.clone(),
                    accessors: bound.iter().map(|(_, b)| b.accessor_name()).collect(),
                    span: exposure.span,
                });
                return;
            }
            None => bound[0].0,
        };

        // Bindings without wrappers were already diagnosed.
        let Some(wrapper) = self.wrapper(index, alias) else {
            tracing::debug!(local = %exposure.local_name, "binding has no wrapper; exposure skipped");
            return;
        };

        if exposure.embedded {
            for entry in entry_points(wrapper, &exposure.local_name) {
                if !self.names.insert(entry.name.clone()) {
                    self.out.diagnostics.push(Diagnostic::DuplicateEntryPoint {
                        host: self.host.name.clone(),
                        entry_point: entry.name.clone(),
                        span: exposure.span,
                    });
                    continue;
                }
                tracing::trace!(entry = %entry.name, "entry point exposed");
                self.out.entry_points.push(entry);
            }
        }

        self.out.exposed.push(ExposedImpl {
            local_name: exposure.local_name.clone(),
            component: wrapper.component.clone(),
            alias: wrapper.alias.clone(),
            accessor: wrapper.accessor.clone(),
            embedded: exposure.embedded,
            span: exposure.span,
        });
    }

    fn wrapper(&self, binding: usize, alias: &str) -> Option<&'a WrapperImpl> {
        self.artifacts
            .get(binding)?
            .as_ref()?
            .wrappers
            .iter()
            .find(|w| w.alias == alias)
    }
}
