//! Diagnostic validator: checks every binding of a host against the host's
//! storage and event declarations.
//!
//! Checks are batched: a failing binding never stops later ones. Per
//! binding, the storage check and the event check are independent, so a
//! binding can produce zero, one or two binding diagnostics.

use std::collections::{HashMap, HashSet};

use graft_types::model::{Binding, ComponentDefinition, HostDeclaration, SubstorageLayout};
use graft_types::Diagnostic;
use serde::Serialize;

use crate::registry::ComponentRegistry;

/// What validation allows synthesis to do for one binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No artifacts.
    Invalid,
    /// Storage is sound but events cannot be nested: accessor only.
    AccessorOnly,
    /// Accessor and wrappers.
    Valid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// One verdict per binding, aligned with `host.bindings()`.
    pub verdicts: Vec<Verdict>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Validate every binding of `host`, in declaration order.
///
/// `default_layout` picks the `#[substorage(..)]` version written into
/// suggested storage declarations.
pub fn validate_host(
    host: &HostDeclaration,
    registry: &ComponentRegistry,
    default_layout: SubstorageLayout,
) -> Validation {
    let _span = tracing::debug_span!("validate", host = %host.name).entered();
    let mut v = Validator {
        host,
        default_layout,
        diagnostics: Vec::new(),
        storage_owners: HashSet::new(),
        event_owners: HashSet::new(),
        flat_names: HashMap::new(),
    };

    v.check_host_members();
    let verdicts = host
        .bindings()
        .iter()
        .map(|binding| match registry.get(&binding.component) {
            Some(component) => v.check_binding(binding, component),
            None => {
                if !registry.is_rejected(&binding.component) {
                    v.diagnostics.push(Diagnostic::UnknownComponent {
                        host: host.name.clone(),
                        component: binding.component.clone(),
                        span: binding.span,
                    });
                }
                Verdict::Invalid
            }
        })
        .collect();

    tracing::debug!(diagnostics = v.diagnostics.len(), "host validated");
    Validation {
        verdicts,
        diagnostics: v.diagnostics,
    }
}

struct Validator<'a> {
    host: &'a HostDeclaration,
    default_layout: SubstorageLayout,
    diagnostics: Vec<Diagnostic>,
    /// Storage members already claimed by a binding.
    storage_owners: HashSet<&'a str>,
    event_owners: HashSet<&'a str>,
    /// Names occupying the host's root storage namespace → their owner.
    flat_names: HashMap<String, String>,
}

impl<'a> Validator<'a> {
    fn host_name(&self) -> String {
        self.host.name.clone()
    }

    // ── Host ──────────────────────────────────────────────────────────────────

    fn check_host_members(&mut self) {
        let mut members = HashSet::new();
        for m in &self.host.storage {
            if !members.insert(m.name.as_str()) {
                self.diagnostics.push(Diagnostic::DuplicateHostMember {
                    host: self.host_name(),
                    member: m.name.clone(),
                    span: m.span,
                });
            } else if m.is_native() {
                self.flat_names.insert(m.name.clone(), "the contract".to_string());
            } else if m.layout() != Some(SubstorageLayout::Flat) {
                // A nested member's own name still sits in the root namespace.
                self.flat_names
                    .insert(m.name.clone(), format!("substorage member '{}'", m.name));
            }
        }

        let mut variants = HashSet::new();
        for v in &self.host.events {
            if !variants.insert(v.name.as_str()) {
                self.diagnostics.push(Diagnostic::DuplicateHostVariant {
                    host: self.host_name(),
                    variant: v.name.clone(),
                    span: v.span,
                });
            }
        }
    }

    // ── Bindings ──────────────────────────────────────────────────────────────

    fn check_binding(&mut self, binding: &'a Binding, component: &ComponentDefinition) -> Verdict {
        let storage_ok = self.check_storage(binding, component);
        let event_ok = self.check_event(binding, component);
        let verdict = match (storage_ok, event_ok) {
            (false, _) => Verdict::Invalid,
            (true, false) => Verdict::AccessorOnly,
            (true, true) => Verdict::Valid,
        };
        tracing::trace!(
            component = %binding.component,
            storage = %binding.storage_field,
            ?verdict,
            "binding checked"
        );
        verdict
    }

    fn check_storage(&mut self, binding: &'a Binding, component: &ComponentDefinition) -> bool {
        let field = binding.storage_field.as_str();
        if !self.storage_owners.insert(field) {
            self.diagnostics.push(Diagnostic::AliasedSubstorage {
                host: self.host_name(),
                component: component.name.clone(),
                member: binding.storage_field.clone(),
                span: binding.span,
            });
            return false;
        }

        let layout = self
            .host
            .storage_member(field)
            .filter(|m| m.ty == component.storage_type())
            .and_then(|m| m.layout());
        let Some(layout) = layout else {
            self.diagnostics.push(Diagnostic::MissingSubstorageMember {
                host: self.host_name(),
                component: component.name.clone(),
                member: binding.storage_field.clone(),
                declaration: format!(
                    "#[substorage({})] {}: {},",
                    self.default_layout.version(),
                    field,
                    component.storage_type()
                ),
                span: binding.span,
            });
            return false;
        };

        if layout == SubstorageLayout::Flat {
            return self.check_flat_collisions(binding, component);
        }
        true
    }

    /// Flat layout puts the component's fields in the host's namespace.
    fn check_flat_collisions(&mut self, binding: &Binding, component: &ComponentDefinition) -> bool {
        let mut clean = true;
        for f in &component.storage.fields {
            if let Some(owner) = self.flat_names.get(&f.name) {
                self.diagnostics.push(Diagnostic::StorageCollision {
                    host: self.host_name(),
                    component: component.name.clone(),
                    field: f.name.clone(),
                    owner: owner.clone(),
                    span: binding.span,
                });
                clean = false;
            }
        }
        if clean {
            let owner = format!("component '{}' at '{}'", component.name, binding.storage_field);
            for name in component.storage.names() {
                self.flat_names.insert(name.to_string(), owner.clone());
            }
        }
        clean
    }

    fn check_event(&mut self, binding: &'a Binding, component: &ComponentDefinition) -> bool {
        let variant = binding.event_variant.as_str();
        if !self.event_owners.insert(variant) {
            self.diagnostics.push(Diagnostic::DuplicateEventBinding {
                host: self.host_name(),
                component: component.name.clone(),
                variant: binding.event_variant.clone(),
                span: binding.span,
            });
            return false;
        }

        let expected = component.event_type();
        let nested = self
            .host
            .event_variant(variant)
            .is_some_and(|v| v.payload.as_deref() == Some(expected.as_str()));
        if !nested {
            self.diagnostics.push(Diagnostic::MissingNestedEvent {
                host: self.host_name(),
                component: component.name.clone(),
                variant: binding.event_variant.clone(),
                declaration: format!("{variant}: {expected},"),
                span: binding.span,
            });
        }
        nested
    }
}
