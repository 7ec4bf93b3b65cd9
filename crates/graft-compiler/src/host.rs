//! Host declaration model: records what a `contract` declares.

use graft_types::ast::{Attribute, ContractDecl};
use graft_types::model::*;

const SUBSTORAGE: &str = "substorage";
const ABI: &str = "abi";
const EMBED_V0: &str = "embed_v0";

/// Build the [`HostDeclaration`] for a parsed contract. Nothing is
/// validated; inclusions are recorded in declaration order.
pub fn build_host(decl: &ContractDecl, file: &str) -> HostDeclaration {
    let mut host = HostDeclaration::new(&decl.name.name, file, decl.span);

    if let Some(storage) = &decl.storage {
        host.storage = storage
            .members
            .iter()
            .map(|m| HostStorageMember {
                name: m.name.name.clone(),
                ty: m.ty.to_string(),
                substorage: substorage(&m.attrs),
                span: m.span,
            })
            .collect();
    }

    if let Some(event) = &decl.event {
        host.events = event
            .variants
            .iter()
            .map(|v| EventVariant {
                name: v.name.name.clone(),
                payload: v.payload.as_ref().map(|t| t.to_string()),
                span: v.span,
            })
            .collect();
    }

    host.exposures = decl
        .exposures
        .iter()
        .map(|e| Exposure {
            local_name: e.local_name.name.clone(),
            path: e.target.segments.iter().map(|s| s.name.clone()).collect(),
            generics: e.target.generics.iter().map(|g| g.to_string()).collect(),
            embedded: e
                .attrs
                .iter()
                .any(|a| a.is(ABI) && a.args.iter().any(|arg| arg.name == EMBED_V0)),
            span: e.span,
        })
        .collect();

    for inclusion in &decl.inclusions {
        host.include(Binding {
            component: inclusion.path.name.clone(),
            storage_field: inclusion.storage.name.clone(),
            event_variant: inclusion.event.name.clone(),
            span: inclusion.span,
        });
    }

    tracing::trace!(
        host = %host.name,
        bindings = host.bindings().len(),
        exposures = host.exposures.len(),
        "host declared"
    );
    host
}

fn substorage(attrs: &[Attribute]) -> Option<Result<SubstorageLayout, String>> {
    let attr = attrs.iter().find(|a| a.is(SUBSTORAGE))?;
    let version = attr.args.first().map(|a| a.name.as_str()).unwrap_or("");
    Some(SubstorageLayout::from_version(version).ok_or_else(|| version.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_parser::parse_source;
    use graft_types::ast::Item;
    use graft_types::SourceFile;

    fn host(source: &str) -> HostDeclaration {
        let sf = SourceFile::new("w.graft", source);
        let result = parse_source(&sf);
        assert!(!result.errors.has_errors(), "{:?}", result.errors.errors);
        match &result.unit.items[0] {
            Item::Contract(c) => build_host(c, "w.graft"),
            other => panic!("expected contract, got {other:?}"),
        }
    }

    #[test]
    fn records_everything_in_order() {
        let h = host(
            "contract W {
                component!(path: ownable, storage: owner_a, event: AEvent);
                component!(path: ownable, storage: owner_b, event: BEvent);
                #[abi(embed_v0)] impl X = ownable::Ownable<ContractState, HasComponentImpl_owner_a>;
                impl Y = ownable::Ownable<ContractState, HasComponentImpl_owner_b>;
                storage {
                    n: u8,
                    #[substorage(v0)] owner_a: ownable::Storage,
                    #[substorage(v1)] owner_b: ownable::Storage,
                    #[substorage(v7)] odd: ownable::Storage,
                }
                event { AEvent: ownable::Event, BEvent: ownable::Event }
            }",
        );
        assert_eq!(h.name, "W");
        assert_eq!(h.bindings().len(), 2);
        assert_eq!(h.bindings_for("ownable").count(), 2);
        assert_eq!(h.bindings()[1].accessor_name(), "HasComponentImpl_owner_b");

        assert!(h.storage_member("n").unwrap().is_native());
        assert_eq!(h.storage_member("owner_a").unwrap().layout(), Some(SubstorageLayout::Flat));
        assert_eq!(h.storage_member("owner_b").unwrap().layout(), Some(SubstorageLayout::Nested));
        assert_eq!(
            h.storage_member("odd").unwrap().substorage,
            Some(Err("v7".to_string()))
        );

        assert_eq!(h.event_variant("BEvent").unwrap().payload.as_deref(), Some("ownable::Event"));

        assert!(h.exposures[0].embedded);
        assert!(!h.exposures[1].embedded);
        assert_eq!(h.exposures[0].path_text(), "ownable::Ownable");
        assert_eq!(h.exposures[0].generics, vec!["ContractState", "HasComponentImpl_owner_a"]);
    }

    #[test]
    fn empty_contract() {
        let h = host("contract Empty { }");
        assert!(h.bindings().is_empty());
        assert!(h.storage.is_empty());
        assert!(h.events.is_empty());
    }
}
