use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use graft_compiler::{compile_sources, CompileOptions, CompileResult};
use graft_types::SourceFile;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "graftc", version, about = "Compile component and contract declarations")]
struct Cli {
    /// Source files, compiled together as one unit.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// JSON file with compile options.
    #[arg(short, long)]
    options: Option<PathBuf>,

    /// Print the structured result as JSON.
    #[arg(long)]
    json: bool,

    /// Report diagnostics without printing generated code.
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(message) => {
            eprintln!("graftc: {message}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<bool, String> {
    let options = match &cli.options {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            CompileOptions::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => CompileOptions::default(),
    };

    let sources = cli
        .files
        .iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .map(|text| SourceFile::new(path.display().to_string(), text))
                .map_err(|e| format!("cannot read {}: {e}", path.display()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let result = compile_sources(&sources, &options);
    if cli.json {
        let json = if cli.check {
            serde_json::to_string_pretty(&result.errors)
        } else {
            serde_json::to_string_pretty(&result)
        };
        println!("{}", json.map_err(|e| format!("serialization error: {e}"))?);
    } else {
        print_text(&result, cli.check);
    }
    Ok(result.success)
}

fn print_text(result: &CompileResult, check: bool) {
    for error in &result.errors.errors {
        eprintln!("{error}");
        if !error.source_line.is_empty() {
            eprintln!("    | {}", error.source_line);
        }
        if let Some(suggestion) = &error.suggestion {
            eprintln!("    = help: {suggestion}");
        }
    }
    let hidden = result.errors.total_errors.saturating_sub(result.errors.errors.len());
    if hidden > 0 {
        eprintln!("... and {hidden} more errors");
    }

    if check {
        return;
    }
    for prelude in &result.preludes {
        println!("{}", prelude.render());
    }
    for host in &result.hosts {
        println!("{}", host.rendered);
        println!("// sha256 {}", host.fingerprint);
    }
}
