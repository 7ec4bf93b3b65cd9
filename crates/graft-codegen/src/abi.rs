//! Host ABI listing: the entry points an exposed wrapper contributes.

use graft_types::model::MethodParam;
use serde::{Deserialize, Serialize};

use crate::wrapper::WrapperImpl;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Takes a read-only host view.
    View,
    /// Takes a mutable host view.
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryPoint {
    pub name: String,
    pub kind: EntryKind,
    pub params: Vec<MethodParam>,
    pub ret: Option<String>,
    pub component: String,
    pub alias: String,
    /// Local name of the exposure that added this entry point.
    pub exposure: String,
}

/// Entry points of `wrapper` exposed as `exposure`, in interface order.
pub fn entry_points(wrapper: &WrapperImpl, exposure: &str) -> Vec<EntryPoint> {
    wrapper
        .methods
        .iter()
        .map(|m| EntryPoint {
            name: m.signature.name.clone(),
            kind: if m.signature.is_mutable() {
                EntryKind::External
            } else {
                EntryKind::View
            },
            params: m.signature.params.clone(),
            ret: m.signature.ret.clone(),
            component: wrapper.component.clone(),
            alias: wrapper.alias.clone(),
            exposure: exposure.to_string(),
        })
        .collect()
}
