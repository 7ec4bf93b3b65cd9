//! Compilation options, loadable from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use graft_types::model::SubstorageLayout;
use graft_types::MAX_ERRORS;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid options JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown substorage version '{0}' (expected v0 or v1)")]
    UnknownSubstorage(String),

    #[error("max_errors must be at least 1")]
    ZeroMaxErrors,

    #[error("contract_state must not be empty")]
    EmptyContractState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    /// Host state type every exposure must instantiate wrappers for.
    pub contract_state: String,
    /// Stored error cap; further errors are only counted.
    pub max_errors: usize,
    /// Substorage version written into suggested storage declarations.
    pub default_substorage: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            contract_state: "ContractState".to_string(),
            max_errors: MAX_ERRORS,
            default_substorage: SubstorageLayout::Flat.version().to_string(),
        }
    }
}

impl CompileOptions {
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.max_errors == 0 {
            return Err(OptionsError::ZeroMaxErrors);
        }
        if self.contract_state.is_empty() {
            return Err(OptionsError::EmptyContractState);
        }
        self.substorage_layout().map(|_| ())
    }

    pub fn substorage_layout(&self) -> Result<SubstorageLayout, OptionsError> {
        SubstorageLayout::from_version(&self.default_substorage)
            .ok_or_else(|| OptionsError::UnknownSubstorage(self.default_substorage.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let o = CompileOptions::default();
        assert_eq!(o.contract_state, "ContractState");
        assert_eq!(o.max_errors, MAX_ERRORS);
        assert_eq!(o.substorage_layout().unwrap(), SubstorageLayout::Flat);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let o = CompileOptions::from_json(r#"{ "default_substorage": "v1" }"#).unwrap();
        assert_eq!(o.default_substorage, "v1");
        assert_eq!(o.contract_state, "ContractState");
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            CompileOptions::from_json(r#"{ "default_substorage": "v9" }"#),
            Err(OptionsError::UnknownSubstorage(v)) if v == "v9"
        ));
        assert!(matches!(
            CompileOptions::from_json(r#"{ "max_errors": 0 }"#),
            Err(OptionsError::ZeroMaxErrors)
        ));
        assert!(matches!(
            CompileOptions::from_json(r#"{ "colour": "red" }"#),
            Err(OptionsError::Json(_))
        ));
        assert!(matches!(
            CompileOptions::from_json(r#"{ "contract_state": "" }"#),
            Err(OptionsError::EmptyContractState)
        ));
    }
}
