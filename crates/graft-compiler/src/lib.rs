//! Graft compiler: orchestrates the composition pipeline.
//!
//! ```text
//! Source → Lexer → Parser → Registry ─┐
//!                         → Host Model ┴→ Validator → Accessor/Wrapper Synthesis → Exposures
//! ```
//!
//! Every stage batches its diagnostics. A failing binding or exposure only
//! loses its own artifacts; the compilation as a whole fails if any error
//! was reported.

pub mod exposure;
pub mod host;
pub mod options;
pub mod registry;
pub mod validator;

pub use exposure::{resolve_exposures, ExposedImpl, Resolution};
pub use host::build_host;
pub use options::{CompileOptions, OptionsError};
pub use registry::ComponentRegistry;
pub use validator::{validate_host, Validation, Verdict};

use std::collections::HashSet;

use graft_codegen::{
    synthesize, synthesize_accessor, BindingArtifacts, CodegenResult, ComponentPrelude,
    HostOutput, ItemKind, SourceMap, SynthesisOptions,
};
use graft_types::ast::Item;
use graft_types::model::{BindingState, HostDeclaration, SubstorageLayout};
use graft_types::{CompileErrors, Diagnostic, GraftError, SourceFile};
use serde::Serialize;
use sha2::{Digest, Sha256};

// ══════════════════════════════════════════════════════════════════════════════
// Results
// ══════════════════════════════════════════════════════════════════════════════

/// Where one binding ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingReport {
    pub component: String,
    pub storage_field: String,
    pub event_variant: String,
    pub state: BindingState,
}

/// Everything generated for one contract.
#[derive(Debug, Clone, Serialize)]
pub struct HostArtifacts {
    pub name: String,
    pub file: String,
    pub bindings: Vec<BindingReport>,
    pub exposed: Vec<ExposedImpl>,
    pub output: HostOutput,
    pub source_map: SourceMap,
    /// `output` rendered to text.
    pub rendered: String,
    /// Hex SHA-256 of `rendered`.
    pub fingerprint: String,
}

/// Structured compilation result, serializable to JSON.
#[derive(Debug, Clone, Serialize)]
pub struct CompileResult {
    pub success: bool,
    /// Rendered prelude of every registered component.
    pub preludes: Vec<ComponentPrelude>,
    pub hosts: Vec<HostArtifacts>,
    pub errors: CompileErrors,
}

// ══════════════════════════════════════════════════════════════════════════════
// Entry Points
// ══════════════════════════════════════════════════════════════════════════════

/// Compile one source file with default options.
pub fn compile(source: &str, filename: &str) -> Result<Vec<HostArtifacts>, CompileErrors> {
    let result = compile_to_result(source, filename);
    if result.success {
        Ok(result.hosts)
    } else {
        Err(result.errors)
    }
}

/// Compile one source file with default options, keeping partial output.
pub fn compile_to_result(source: &str, filename: &str) -> CompileResult {
    compile_sources(
        &[SourceFile::new(filename, source)],
        &CompileOptions::default(),
    )
}

/// Diagnostics only, for editor integration.
pub fn check(source: &str, filename: &str) -> CompileErrors {
    compile_to_result(source, filename).errors
}

/// Compile a set of files as one unit: components from any file may be
/// included by contracts in any file.
pub fn compile_sources(sources: &[SourceFile], options: &CompileOptions) -> CompileResult {
    let _span = tracing::info_span!("compile", files = sources.len()).entered();
    Pipeline::new(sources, options).run()
}

/// Hex SHA-256 of generated text.
pub fn fingerprint(text: &str) -> String {
    Sha256::digest(text.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

// ══════════════════════════════════════════════════════════════════════════════
// Pipeline
// ══════════════════════════════════════════════════════════════════════════════

struct Pipeline<'a> {
    sources: &'a [SourceFile],
    options: &'a CompileOptions,
    errors: CompileErrors,
}

impl<'a> Pipeline<'a> {
    fn new(sources: &'a [SourceFile], options: &'a CompileOptions) -> Self {
        Self {
            sources,
            options,
            errors: CompileErrors::with_limit(options.max_errors),
        }
    }

    fn failed(self) -> CompileResult {
        CompileResult {
            success: false,
            preludes: Vec::new(),
            hosts: Vec::new(),
            errors: self.errors,
        }
    }

    fn report(&mut self, file: &str, diagnostic: &Diagnostic) {
        let source_line = self
            .sources
            .iter()
            .find(|s| s.name == file)
            .and_then(|s| s.line(diagnostic.span().start_line()))
            .unwrap_or("");
        self.errors
            .push_error(GraftError::from_diagnostic(file, diagnostic, source_line));
    }

    fn run(mut self) -> CompileResult {
        let layout = self.options.substorage_layout().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to the flat substorage layout");
            SubstorageLayout::Flat
        });

        // ── Parse ────────────────────────────────────────────────────────────
        let mut units = Vec::new();
        {
            let _span = tracing::debug_span!("parse").entered();
            for source in self.sources {
                let parsed = graft_parser::parse_source(source);
                tracing::debug!(
                    file = %source.name,
                    items = parsed.unit.items.len(),
                    errors = parsed.errors.total_errors,
                    "parsed"
                );
                self.errors.absorb(parsed.errors);
                units.push((source.name.as_str(), parsed.unit));
            }
        }
        if self.errors.has_errors() {
            tracing::debug!(errors = self.errors.total_errors, "syntax errors; stopping");
            return self.failed();
        }

        // ── Register ─────────────────────────────────────────────────────────
        let mut registry = ComponentRegistry::new();
        for (file, unit) in &units {
            for item in &unit.items {
                if let Item::Component(decl) = item {
                    if let Err(diagnostics) = registry.register(decl, file) {
                        for d in &diagnostics {
                            self.report(file, d);
                        }
                    }
                }
            }
        }
        let preludes: Vec<ComponentPrelude> =
            registry.components().iter().map(ComponentPrelude::new).collect();

        // ── Hosts ────────────────────────────────────────────────────────────
        let mut seen = HashSet::new();
        let mut hosts = Vec::new();
        for (file, unit) in &units {
            for item in &unit.items {
                let Item::Contract(decl) = item else { continue };
                if !seen.insert(decl.name.name.clone()) {
                    self.report(
                        file,
                        &Diagnostic::DuplicateContract {
                            host: decl.name.name.clone(),
                            span: decl.name.span,
                        },
                    );
                    continue;
                }
                let host = build_host(decl, file);
                hosts.push(self.compile_host(&host, &registry, layout));
            }
        }

        tracing::info!(
            components = registry.components().len(),
            hosts = hosts.len(),
            errors = self.errors.total_errors,
            "compilation finished"
        );
        CompileResult {
            success: !self.errors.has_errors(),
            preludes,
            hosts,
            errors: self.errors,
        }
    }

    fn compile_host(
        &mut self,
        host: &HostDeclaration,
        registry: &ComponentRegistry,
        layout: SubstorageLayout,
    ) -> HostArtifacts {
        let _span = tracing::debug_span!("host", name = %host.name).entered();
        let synthesis = SynthesisOptions {
            host_state: self.options.contract_state.clone(),
        };

        let validation = validate_host(host, registry, layout);
        for d in &validation.diagnostics {
            self.report(&host.file, d);
        }

        // ── Synthesize ───────────────────────────────────────────────────────
        let mut output = HostOutput::new(&host.name);
        let mut source_map = SourceMap::new();
        let mut reports = Vec::new();
        let mut artifacts: Vec<Option<BindingArtifacts>> = Vec::new();

        for (binding, verdict) in host.bindings().iter().zip(&validation.verdicts) {
            let component = registry.get(&binding.component);
            let synthesized: Option<CodegenResult<BindingArtifacts>> = match (component, verdict) {
                (Some(c), Verdict::Valid) => Some(synthesize(c, host, binding, &synthesis)),
                (Some(c), Verdict::AccessorOnly) => Some(
                    synthesize_accessor(c, host, binding, &synthesis).map(|accessor| {
                        BindingArtifacts {
                            accessor,
                            wrappers: Vec::new(),
                        }
                    }),
                ),
                _ => None,
            };

            let mut state = BindingState::Invalid;
            let mut produced = None;
            match synthesized {
                Some(Ok(synthesized)) => {
                    state = if synthesized.wrappers.is_empty() {
                        BindingState::AccessorSynthesized
                    } else {
                        BindingState::WrapperSynthesized
                    };
                    let accessor = &synthesized.accessor;
                    source_map.push(&accessor.name, ItemKind::Accessor, &host.file, binding.span);
                    output.accessors.push(accessor.clone());
                    for wrapper in &synthesized.wrappers {
                        let file = component.map(|c| c.file.as_str()).unwrap_or(&host.file);
                        source_map.push(&wrapper.alias, ItemKind::Wrapper, file, wrapper.span);
                        output.wrappers.push(wrapper.clone());
                    }
                    produced = Some(synthesized);
                }
                Some(Err(e)) => {
                    tracing::error!(error = %e, component = %binding.component, "synthesis failed");
                }
                None => {}
            }

            tracing::trace!(
                component = %binding.component,
                storage = %binding.storage_field,
                ?state,
                "binding finished"
            );
            reports.push(BindingReport {
                component: binding.component.clone(),
                storage_field: binding.storage_field.clone(),
                event_variant: binding.event_variant.clone(),
                state,
            });
            artifacts.push(produced);
        }

        // ── Expose ───────────────────────────────────────────────────────────
        let resolution = resolve_exposures(host, registry, &artifacts, &self.options.contract_state);
        for d in &resolution.diagnostics {
            self.report(&host.file, d);
        }
        for exposed in &resolution.exposed {
            let entries = resolution
                .entry_points
                .iter()
                .filter(|e| e.exposure == exposed.local_name);
            for entry in entries {
                source_map.push(&entry.name, ItemKind::EntryPoint, &host.file, exposed.span);
            }
        }
        output.entry_points = resolution.entry_points;

        let rendered = output.render();
        let fingerprint = fingerprint(&rendered);
        tracing::debug!(%fingerprint, "host rendered");

        HostArtifacts {
            name: host.name.clone(),
            file: host.file.clone(),
            bindings: reports,
            exposed: resolution.exposed,
            output,
            source_map,
            rendered,
            fingerprint,
        }
    }
}
