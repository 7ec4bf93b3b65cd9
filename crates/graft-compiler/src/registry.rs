//! Component definition registry.
//!
//! Turns parsed `component` declarations into [`ComponentDefinition`]s after
//! checking them for internal consistency. Every problem with a component
//! is collected before the component is rejected; rejected names are
//! remembered so later inclusions of them stay quiet.

use std::collections::{BTreeSet, HashSet};

use graft_types::ast::{ComponentDecl, ImplDecl, MethodSig};
use graft_types::model::*;
use graft_types::{Diagnostic, MalformedReason, Span};

const EMBEDDABLE_AS: &str = "embeddable_as";

#[derive(Debug, Default)]
pub struct ComponentRegistry {
    /// Registered components, in registration order.
    components: Vec<ComponentDefinition>,
    rejected: BTreeSet<String>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register one component declaration.
    pub fn register(
        &mut self,
        decl: &ComponentDecl,
        file: &str,
    ) -> Result<&ComponentDefinition, Vec<Diagnostic>> {
        let name = decl.name.name.clone();
        let _span = tracing::debug_span!("register", component = %name).entered();

        if self.get(&name).is_some() || self.is_rejected(&name) {
            tracing::debug!("duplicate component");
            return Err(vec![Diagnostic::MalformedComponent {
                component: name,
                reason: MalformedReason::DuplicateComponent,
                span: decl.name.span,
            }]);
        }

        let mut builder = Builder::new(&name);
        let definition = builder.build(decl, file);
        if !builder.problems.is_empty() {
            tracing::debug!(problems = builder.problems.len(), "component rejected");
            let diagnostics = builder.into_diagnostics();
            self.rejected.insert(name);
            return Err(diagnostics);
        }

        tracing::debug!(
            fields = definition.storage.fields.len(),
            impls = definition.impls.len(),
            "component registered"
        );
        self.components.push(definition);
        let idx = self.components.len() - 1;
        Ok(&self.components[idx])
    }

    pub fn get(&self, name: &str) -> Option<&ComponentDefinition> {
        self.components.iter().find(|c| c.name == name)
    }

    /// True when a component of this name failed registration.
    pub fn is_rejected(&self, name: &str) -> bool {
        self.rejected.contains(name)
    }

    pub fn components(&self) -> &[ComponentDefinition] {
        &self.components
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Builder
// ══════════════════════════════════════════════════════════════════════════════

struct Builder<'a> {
    component: &'a str,
    problems: Vec<(MalformedReason, Span)>,
}

impl<'a> Builder<'a> {
    fn new(component: &'a str) -> Self {
        Self {
            component,
            problems: Vec::new(),
        }
    }

    fn problem(&mut self, reason: MalformedReason, span: Span) {
        self.problems.push((reason, span));
    }

    fn into_diagnostics(self) -> Vec<Diagnostic> {
        let component = self.component;
        self.problems
            .into_iter()
            .map(|(reason, span)| Diagnostic::MalformedComponent {
                component: component.to_string(),
                reason,
                span,
            })
            .collect()
    }

    fn build(&mut self, decl: &ComponentDecl, file: &str) -> ComponentDefinition {
        let storage = self.storage_schema(decl);
        let events = self.event_schema(decl);
        let interfaces: Vec<InterfaceDef> = decl
            .interfaces
            .iter()
            .map(|iface| InterfaceDef {
                name: iface.name.name.clone(),
                methods: self.signatures(&iface.name.name, &iface.methods),
                span: iface.span,
            })
            .collect();

        let mut impls: Vec<CapabilityImpl> = Vec::new();
        let mut aliases = HashSet::new();
        for imp in &decl.impls {
            let capability = self.capability(imp, &interfaces);
            if let Some(alias) = &capability.alias {
                if !aliases.insert(alias.clone()) {
                    self.problem(
                        MalformedReason::DuplicateAlias {
                            alias: alias.clone(),
                        },
                        imp.span,
                    );
                }
            }
            impls.push(capability);
        }

        ComponentDefinition {
            name: self.component.to_string(),
            file: file.to_string(),
            storage,
            events,
            interfaces,
            impls,
            span: decl.span,
        }
    }

    fn storage_schema(&mut self, decl: &ComponentDecl) -> StorageSchema {
        let mut schema = StorageSchema::default();
        let Some(block) = &decl.storage else {
            return schema;
        };
        for member in &block.members {
            if schema.get(&member.name.name).is_some() {
                self.problem(
                    MalformedReason::DuplicateStorageField {
                        field: member.name.name.clone(),
                    },
                    member.name.span,
                );
                continue;
            }
            schema.fields.push(StorageField {
                name: member.name.name.clone(),
                ty: member.ty.to_string(),
                span: member.span,
            });
        }
        schema
    }

    fn event_schema(&mut self, decl: &ComponentDecl) -> EventSchema {
        let mut schema = EventSchema::default();
        let Some(block) = &decl.event else {
            return schema;
        };
        for variant in &block.variants {
            if schema.get(&variant.name.name).is_some() {
                self.problem(
                    MalformedReason::DuplicateEventVariant {
                        variant: variant.name.name.clone(),
                    },
                    variant.name.span,
                );
                continue;
            }
            schema.variants.push(EventVariant {
                name: variant.name.name.clone(),
                payload: variant.payload.as_ref().map(|t| t.to_string()),
                span: variant.span,
            });
        }
        schema
    }

    /// Lower method signatures, reporting repeated names within `owner`.
    fn signatures(&mut self, owner: &str, methods: &[MethodSig]) -> Vec<MethodSignature> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for m in methods {
            if !seen.insert(m.name.name.as_str()) {
                self.problem(
                    MalformedReason::DuplicateMethod {
                        owner: owner.to_string(),
                        method: m.name.name.clone(),
                    },
                    m.name.span,
                );
                continue;
            }
            out.push(lower_signature(m));
        }
        out
    }

    fn capability(&mut self, imp: &ImplDecl, interfaces: &[InterfaceDef]) -> CapabilityImpl {
        let impl_name = imp.name.name.clone();
        let alias = self.alias(imp);
        let own_methods = self.signatures(&impl_name, &imp.methods);

        let methods = match (&imp.interface, alias.is_some()) {
            (None, true) => {
                self.problem(
                    MalformedReason::EmbeddableNotInterface {
                        impl_name: impl_name.clone(),
                    },
                    imp.span,
                );
                own_methods
            }
            (None, false) => own_methods,
            (Some(iface), embeddable) => {
                match interfaces.iter().find(|i| i.name == iface.name) {
                    Some(def) => {
                        for m in &own_methods {
                            if !def.methods.iter().any(|d| d.name == m.name) {
                                self.problem(
                                    MalformedReason::MethodNotInInterface {
                                        impl_name: impl_name.clone(),
                                        interface: def.name.clone(),
                                        method: m.name.clone(),
                                    },
                                    imp.span,
                                );
                            }
                        }
                        def.methods.clone()
                    }
                    // Interfaces declared elsewhere are fine for internal impls.
                    None if !embeddable => own_methods,
                    None => {
                        self.problem(
                            MalformedReason::UnknownInterface {
                                impl_name: impl_name.clone(),
                                interface: iface.name.clone(),
                            },
                            iface.span,
                        );
                        own_methods
                    }
                }
            }
        };

        CapabilityImpl {
            name: impl_name,
            interface: imp.interface.as_ref().map(|i| i.name.clone()),
            alias,
            methods,
            span: imp.span,
        }
    }

    /// The impl's `#[embeddable_as(Alias)]` alias, if any.
    fn alias(&mut self, imp: &ImplDecl) -> Option<String> {
        let attrs: Vec<_> = imp.attrs.iter().filter(|a| a.is(EMBEDDABLE_AS)).collect();
        let first = attrs.first()?;
        let impl_name = imp.name.name.clone();

        if attrs.len() > 1 || first.args.len() > 1 {
            self.problem(MalformedReason::MultipleAliases { impl_name }, first.span);
        } else if first.args.is_empty() {
            self.problem(MalformedReason::MissingAlias { impl_name }, first.span);
            return None;
        }
        first.args.first().map(|a| a.name.clone())
    }
}

fn lower_signature(m: &MethodSig) -> MethodSignature {
    MethodSignature {
        name: m.name.name.clone(),
        receiver: m.receiver.kind,
        params: m
            .params
            .iter()
            .map(|p| MethodParam {
                name: p.name.name.clone(),
                ty: p.ty.to_string(),
            })
            .collect(),
        ret: m.ret.as_ref().map(|t| t.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_parser::parse_source;
    use graft_types::ast::Item;
    use graft_types::SourceFile;

    fn decl(source: &str) -> ComponentDecl {
        let sf = SourceFile::new("c.graft", source);
        let result = parse_source(&sf);
        assert!(!result.errors.has_errors(), "{:?}", result.errors.errors);
        match result.unit.items.into_iter().next() {
            Some(Item::Component(c)) => c,
            other => panic!("expected component, got {other:?}"),
        }
    }

    fn reasons(source: &str) -> Vec<MalformedReason> {
        let mut registry = ComponentRegistry::new();
        match registry.register(&decl(source), "c.graft") {
            Ok(_) => Vec::new(),
            Err(diags) => diags
                .into_iter()
                .map(|d| match d {
                    Diagnostic::MalformedComponent { reason, .. } => reason,
                    other => panic!("unexpected {other:?}"),
                })
                .collect(),
        }
    }

    #[test]
    fn registers_interface_impl_with_interface_methods() {
        let mut registry = ComponentRegistry::new();
        let def = registry
            .register(
                &decl(
                    "component c {
                        interface I { fn a(self: @S); fn b(ref self: S, x: u8) -> u8; }
                        #[embeddable_as(Cee)] impl CImpl of I { fn b(ref self: S, x: u8) -> u8; }
                    }",
                ),
                "c.graft",
            )
            .unwrap();
        let imp = &def.impls[0];
        assert_eq!(imp.alias.as_deref(), Some("Cee"));
        let names: Vec<_> = imp.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(imp.methods[1].params[0].ty, "u8");
        assert!(registry.get("c").is_some());
    }

    #[test]
    fn collects_every_reason() {
        let found = reasons(
            "component c {
                storage { a: u8, a: u16 }
                event { E, E }
                #[embeddable_as(X)] impl Inherent { fn f(self: @S); }
            }",
        );
        assert_eq!(
            found,
            vec![
                MalformedReason::DuplicateStorageField { field: "a".into() },
                MalformedReason::DuplicateEventVariant { variant: "E".into() },
                MalformedReason::EmbeddableNotInterface {
                    impl_name: "Inherent".into()
                },
            ]
        );
    }

    #[test]
    fn alias_rules() {
        let found = reasons(
            "component c {
                interface I { fn f(self: @S); }
                #[embeddable_as(A)] #[embeddable_as(B)] impl One of I;
                #[embeddable_as] impl Two of I;
                #[embeddable_as(A)] impl Three of I;
            }",
        );
        assert_eq!(
            found,
            vec![
                MalformedReason::MultipleAliases {
                    impl_name: "One".into()
                },
                MalformedReason::MissingAlias {
                    impl_name: "Two".into()
                },
                MalformedReason::DuplicateAlias { alias: "A".into() },
            ]
        );
    }

    #[test]
    fn interface_rules() {
        let found = reasons(
            "component c {
                interface I { fn f(self: @S); fn f(self: @S); }
                #[embeddable_as(A)] impl One of Missing;
                impl Two of I { fn g(self: @S); }
                impl Three of External { fn h(self: @S); }
            }",
        );
        assert_eq!(
            found,
            vec![
                MalformedReason::DuplicateMethod {
                    owner: "I".into(),
                    method: "f".into()
                },
                MalformedReason::UnknownInterface {
                    impl_name: "One".into(),
                    interface: "Missing".into()
                },
                MalformedReason::MethodNotInInterface {
                    impl_name: "Two".into(),
                    interface: "I".into(),
                    method: "g".into()
                },
            ]
        );
    }

    #[test]
    fn rejection_returns_every_problem_and_remembers_name() {
        let mut registry = ComponentRegistry::new();
        let bad = decl("component twice { storage { a: u8, a: u8 } event { E: E, E: E } }");
        let diags = registry.register(&bad, "t.graft").unwrap_err();
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().all(|d| matches!(
            d,
            Diagnostic::MalformedComponent { component, .. } if component == "twice"
        )));
        assert!(registry.is_rejected("twice"));
        assert!(registry.components().is_empty());
    }

    #[test]
    fn rejected_and_duplicate_components() {
        let mut registry = ComponentRegistry::new();
        let bad = decl("component c { storage { a: u8, a: u8 } }");
        assert!(registry.register(&bad, "c.graft").is_err());
        assert!(registry.is_rejected("c"));
        assert!(registry.get("c").is_none());

        let again = decl("component c { }");
        let diags = registry.register(&again, "d.graft").unwrap_err();
        assert!(matches!(
            diags[0],
            Diagnostic::MalformedComponent {
                reason: MalformedReason::DuplicateComponent,
                ..
            }
        ));
    }
}
