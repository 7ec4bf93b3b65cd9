//! Graft compiler as a WASM module for browser environments.
//!
//! Exposes the composition pipeline via `wasm-bindgen`, for editors and
//! playgrounds that run the compiler in a Web Worker.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { compile, check } from 'graft-wasm';
//!
//! await init();
//!
//! const result = JSON.parse(compile(source, "vault.graft"));
//! for (const host of result.hosts) console.log(host.rendered);
//! ```

use graft_compiler::CompileOptions;
use graft_types::SourceFile;
use wasm_bindgen::prelude::*;

/// Compile a source file with default options.
///
/// Returns a JSON `CompileResult`:
/// ```json
/// {
///   "success": true,
///   "preludes": [...],
///   "hosts": [{ "name": "Vault", "rendered": "...", "fingerprint": "..." }],
///   "errors": { "errors": [], "warnings": [], "total_errors": 0, "total_warnings": 0 }
/// }
/// ```
#[wasm_bindgen]
pub fn compile(source: &str, filename: &str) -> String {
    let result = graft_compiler::compile_to_result(source, filename);
    serde_json::to_string(&result).unwrap_or_else(|e| failure(&e.to_string()))
}

/// Compile with options given as JSON, e.g.
/// `{"contract_state": "State", "default_substorage": "v1"}`.
#[wasm_bindgen]
pub fn compile_with_options(source: &str, filename: &str, options: &str) -> String {
    let options = match CompileOptions::from_json(options) {
        Ok(options) => options,
        Err(e) => return failure(&format!("Invalid options: {e}")),
    };
    let result = graft_compiler::compile_sources(&[SourceFile::new(filename, source)], &options);
    serde_json::to_string(&result).unwrap_or_else(|e| failure(&e.to_string()))
}

/// Diagnostics only, without rendering any code.
#[wasm_bindgen]
pub fn check(source: &str, filename: &str) -> String {
    let errors = graft_compiler::check(source, filename);
    serde_json::to_string(&errors).unwrap_or_else(|e| {
        format!(
            r#"{{"errors":[{{"message":"Serialization error: {}"}}],"warnings":[],"total_errors":1,"total_warnings":0}}"#,
            e
        )
    })
}

/// Return the compiler version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn failure(message: &str) -> String {
    serde_json::json!({
        "success": false,
        "preludes": [],
        "hosts": [],
        "errors": {
            "errors": [{ "message": message }],
            "warnings": [],
            "total_errors": 1,
            "total_warnings": 0,
        },
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
component counter {
    storage { value: u64 }
    event { Bumped: Bumped }
    interface ICounter {
        fn get(self: @ComponentState) -> u64;
    }
    #[embeddable_as(CounterImpl)]
    impl CounterLogic of ICounter;
}

contract Vault {
    component!(path: counter, storage: counter, event: CounterEvent);

    #[abi(embed_v0)]
    impl Counter = counter::CounterImpl<ContractState>;

    storage {
        #[substorage(v0)]
        counter: counter::Storage,
    }
    event {
        CounterEvent: counter::Event,
    }
}
"#;

    #[test]
    fn test_compile_returns_json() {
        let json: serde_json::Value = serde_json::from_str(&compile(SOURCE, "vault.graft")).unwrap();
        assert_eq!(json["success"], true, "{json}");
        assert_eq!(json["hosts"][0]["name"], "Vault");
    }

    #[test]
    fn test_check_reports_syntax_error() {
        let json: serde_json::Value =
            serde_json::from_str(&check("component {", "bad.graft")).unwrap();
        assert!(json["total_errors"].as_u64().unwrap() >= 1);
    }

    #[test]
    fn test_invalid_options_fail_cleanly() {
        let json: serde_json::Value =
            serde_json::from_str(&compile_with_options(SOURCE, "vault.graft", "{\"bogus\":1}"))
                .unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["errors"]["total_errors"], 1);
    }

    #[test]
    fn test_version_is_set() {
        assert!(!version().is_empty());
    }
}
