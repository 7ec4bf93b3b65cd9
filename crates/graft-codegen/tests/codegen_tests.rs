//! Synthesis tests: accessor shape, wrapper delegation, layout handling,
//! entry points, error cases, and byte-identical re-synthesis.

use graft_codegen::*;
use graft_types::ast::ReceiverKind;
use graft_types::model::*;
use graft_types::Span;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn sig(name: &str, receiver: ReceiverKind, params: &[(&str, &str)], ret: Option<&str>) -> MethodSignature {
    MethodSignature {
        name: name.into(),
        receiver,
        params: params
            .iter()
            .map(|(n, t)| MethodParam {
                name: n.to_string(),
                ty: t.to_string(),
            })
            .collect(),
        ret: ret.map(String::from),
    }
}

fn ownable() -> ComponentDefinition {
    let methods = vec![
        sig("owner", ReceiverKind::Snapshot, &[], Some("Address")),
        sig(
            "transfer_ownership",
            ReceiverKind::Ref,
            &[("new_owner", "Address")],
            None,
        ),
    ];
    ComponentDefinition {
        name: "ownable".into(),
        file: "ownable.graft".into(),
        storage: StorageSchema {
            fields: vec![StorageField {
                name: "owner".into(),
                ty: "Address".into(),
                span: Span::default(),
            }],
        },
        events: EventSchema::default(),
        interfaces: vec![InterfaceDef {
            name: "IOwnable".into(),
            methods: methods.clone(),
            span: Span::default(),
        }],
        impls: vec![
            CapabilityImpl {
                name: "OwnableImpl".into(),
                interface: Some("IOwnable".into()),
                alias: Some("Ownable".into()),
                methods,
                span: Span::new(10, 5, 11, 30),
            },
            CapabilityImpl {
                name: "InternalImpl".into(),
                interface: None,
                alias: None,
                methods: vec![sig("assert_only_owner", ReceiverKind::Snapshot, &[], None)],
                span: Span::default(),
            },
        ],
        span: Span::default(),
    }
}

fn member(name: &str, ty: &str, layout: Option<SubstorageLayout>) -> HostStorageMember {
    HostStorageMember {
        name: name.into(),
        ty: ty.into(),
        substorage: layout.map(Ok),
        span: Span::default(),
    }
}

fn binding(field: &str, variant: &str) -> Binding {
    Binding {
        component: "ownable".into(),
        storage_field: field.into(),
        event_variant: variant.into(),
        span: Span::new(3, 5, 3, 70),
    }
}

fn wallet() -> HostDeclaration {
    let mut host = HostDeclaration::new("Wallet", "wallet.graft", Span::default());
    host.storage.push(member("balance", "u128", None));
    host.storage.push(member("ownable", "ownable::Storage", Some(SubstorageLayout::Flat)));
    host.storage.push(member("admin", "ownable::Storage", Some(SubstorageLayout::Nested)));
    host.include(binding("ownable", "OwnableEvent"));
    host.include(binding("admin", "AdminEvent"));
    host
}

fn opts() -> SynthesisOptions {
    SynthesisOptions::default()
}

// ─────────────────────────────────────────────────────────────────────
// Accessors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_accessor_named_after_storage_field() {
    let host = wallet();
    let acc = synthesize_accessor(&ownable(), &host, &host.bindings()[0], &opts()).unwrap();
    assert_eq!(acc.name, "HasComponentImpl_ownable");
    assert_eq!(acc.layout, SubstorageLayout::Flat);
    assert_eq!(acc.view_type(), "ownable::ComponentState<ContractState>");
    assert_eq!(acc.span, Span::new(3, 5, 3, 70));
}

#[test]
fn test_accessor_render() {
    let host = wallet();
    let acc = synthesize_accessor(&ownable(), &host, &host.bindings()[0], &opts()).unwrap();
    let expected = "\
impl HasComponentImpl_ownable of ownable::HasComponent<ContractState> {
    fn get_component(self: @ContractState) -> @ownable::ComponentState<ContractState> {
        @ownable::ComponentState::at(self, flat)
    }
    fn get_component_mut(ref self: ContractState) -> ownable::ComponentState<ContractState> {
        ownable::ComponentState::at_mut(ref self, flat)
    }
    fn get_contract(self: @ownable::ComponentState<ContractState>) -> @ContractState {
        self.contract
    }
    fn get_contract_mut(ref self: ownable::ComponentState<ContractState>) -> ContractState {
        self.contract
    }
    fn emit<S, +Into<S, ownable::Event>>(ref self: ownable::ComponentState<ContractState>, event: S) {
        let event: ownable::Event = Into::into(event);
        let mut contract = HasComponentImpl_ownable::get_contract_mut(ref self);
        contract.emit(Event::OwnableEvent(event));
    }
}
";
    assert_eq!(acc.render(), expected);
}

#[test]
fn test_nested_layout_addresses_member() {
    let host = wallet();
    let acc = synthesize_accessor(&ownable(), &host, &host.bindings()[1], &opts()).unwrap();
    let text = acc.render();
    assert!(text.contains("@ownable::ComponentState::at(self, nested(admin))"));
    assert!(text.contains("contract.emit(Event::AdminEvent(event));"));
}

#[test]
fn test_custom_host_state_name() {
    let host = wallet();
    let options = SynthesisOptions {
        host_state: "WalletState".into(),
    };
    let acc = synthesize_accessor(&ownable(), &host, &host.bindings()[0], &options).unwrap();
    assert!(acc.render().starts_with("impl HasComponentImpl_ownable of ownable::HasComponent<WalletState> {"));
}

#[test]
fn test_accessor_requires_substorage_member() {
    let host = wallet();
    let err = synthesize_accessor(&ownable(), &host, &binding("balance", "E"), &opts()).unwrap_err();
    assert_eq!(
        err,
        CodegenError::MissingSubstorage {
            host: "Wallet".into(),
            member: "balance".into()
        }
    );
}

#[test]
fn test_accessor_rejects_foreign_binding() {
    let host = wallet();
    let mut other = binding("ownable", "E");
    other.component = "pausable".into();
    let err = synthesize_accessor(&ownable(), &host, &other, &opts()).unwrap_err();
    assert!(matches!(err, CodegenError::ComponentMismatch { .. }));
}

// ─────────────────────────────────────────────────────────────────────
// Wrappers
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_wrapper_render() {
    let host = wallet();
    let artifacts = synthesize(&ownable(), &host, &host.bindings()[0], &opts()).unwrap();
    assert_eq!(artifacts.wrappers.len(), 1);
    let expected = "\
impl Ownable<ContractState, HasComponentImpl_ownable> of ownable::IOwnable<ContractState> {
    fn owner(self: @ContractState) -> Address {
        let component = HasComponentImpl_ownable::get_component(self);
        ownable::OwnableImpl::owner(component)
    }
    fn transfer_ownership(ref self: ContractState, new_owner: Address) {
        let mut component = HasComponentImpl_ownable::get_component_mut(ref self);
        ownable::OwnableImpl::transfer_ownership(ref component, new_owner)
    }
}
";
    assert_eq!(artifacts.wrappers[0].render(), expected);
}

#[test]
fn test_wrapper_per_binding_uses_its_accessor() {
    let host = wallet();
    let admin = synthesize(&ownable(), &host, &host.bindings()[1], &opts()).unwrap();
    let wrapper = &admin.wrappers[0];
    assert_eq!(wrapper.accessor, "HasComponentImpl_admin");
    assert!(wrapper.methods[0].body[0].contains("HasComponentImpl_admin::get_component(self)"));
}

#[test]
fn test_wrapper_methods_follow_interface_order() {
    let host = wallet();
    let artifacts = synthesize(&ownable(), &host, &host.bindings()[0], &opts()).unwrap();
    let names: Vec<_> = artifacts.wrappers[0]
        .methods
        .iter()
        .map(|m| m.signature.name.as_str())
        .collect();
    assert_eq!(names, vec!["owner", "transfer_ownership"]);
}

#[test]
fn test_non_embeddable_impl_has_no_wrapper() {
    let component = ownable();
    let host = wallet();
    let acc = synthesize_accessor(&component, &host, &host.bindings()[0], &opts()).unwrap();
    let err = synthesize_wrapper(&component, &component.impls[1], &acc).unwrap_err();
    assert_eq!(
        err,
        CodegenError::NotEmbeddable {
            component: "ownable".into(),
            impl_name: "InternalImpl".into()
        }
    );
}

#[test]
fn test_component_without_embeddable_impls() {
    let mut component = ownable();
    component.impls.retain(|i| !i.is_embeddable());
    let host = wallet();
    let artifacts = synthesize(&component, &host, &host.bindings()[0], &opts()).unwrap();
    assert!(artifacts.wrappers.is_empty());
}

#[test]
fn test_unknown_interface_is_an_error() {
    let mut component = ownable();
    component.interfaces.clear();
    let host = wallet();
    let err = synthesize(&component, &host, &host.bindings()[0], &opts()).unwrap_err();
    assert!(matches!(err, CodegenError::UnknownInterface { .. }));
    assert_eq!(err.to_string(), "component 'ownable' declares no interface 'IOwnable'");
}

// ─────────────────────────────────────────────────────────────────────
// Prelude, ABI and host output
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_prelude_lists_storage_view() {
    let text = ComponentPrelude::new(&ownable()).render();
    assert!(text.starts_with("mod ownable {\n"));
    assert!(text.contains(
        "    pub struct ComponentState<TContractState> {\n        pub contract: TContractState,\n        pub owner: StorageSlot<Address>,\n    }\n"
    ));
    assert!(text.contains("fn get_contract_mut(ref self: ComponentState<TContractState>) -> TContractState;"));
}

#[test]
fn test_entry_points() {
    let host = wallet();
    let artifacts = synthesize(&ownable(), &host, &host.bindings()[0], &opts()).unwrap();
    let entries = entry_points(&artifacts.wrappers[0], "OwnableExternal");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "owner");
    assert_eq!(entries[0].kind, EntryKind::View);
    assert_eq!(entries[0].ret.as_deref(), Some("Address"));
    assert_eq!(entries[1].kind, EntryKind::External);
    assert_eq!(entries[1].params[0].name, "new_owner");
    assert_eq!(entries[1].exposure, "OwnableExternal");
    assert_eq!(entries[1].alias, "Ownable");
}

#[test]
fn test_host_output_render_order() {
    let host = wallet();
    let mut out = HostOutput::new("Wallet");
    for b in host.bindings() {
        let artifacts = synthesize(&ownable(), &host, b, &opts()).unwrap();
        out.accessors.push(artifacts.accessor);
        out.wrappers.extend(artifacts.wrappers);
    }
    let text = out.render();
    assert!(text.starts_with("// contract Wallet\n"));
    let first = text.find("impl HasComponentImpl_ownable").unwrap();
    let second = text.find("impl HasComponentImpl_admin").unwrap();
    let wrapper = text.find("impl Ownable<").unwrap();
    assert!(first < second && second < wrapper);
}

#[test]
fn test_artifacts_serialize() {
    let host = wallet();
    let artifacts = synthesize(&ownable(), &host, &host.bindings()[0], &opts()).unwrap();
    let json = serde_json::to_value(&artifacts).unwrap();
    assert_eq!(json["accessor"]["layout"], "flat");
    assert_eq!(json["wrappers"][0]["alias"], "Ownable");
}

// ─────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_determinism_100_iterations() {
    let component = ownable();
    let host = wallet();
    let first = synthesize(&component, &host, &host.bindings()[0], &opts()).unwrap();
    for i in 0..100 {
        let again = synthesize(&component, &host, &host.bindings()[0], &opts()).unwrap();
        assert_eq!(first, again, "synthesis diverged on iteration {i}");
        assert_eq!(
            first.wrappers[0].render(),
            again.wrappers[0].render(),
            "wrapper text diverged on iteration {i}"
        );
    }
}
