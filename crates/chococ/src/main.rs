//! ChocoPy compiler front end
//!
//! Usage: chococ [OPTIONS] <input>

use anyhow::Context;
use choco_compiler::common::DiagnosticReporter;
use choco_compiler::driver::Pipeline;
use choco_compiler::frontend::FrontendConfig;
use clap::Parser as ClapParser;
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(ClapParser, Debug)]
#[command(name = "chococ")]
#[command(author = "ChocoPy Toolchain Developers")]
#[command(version)]
#[command(about = "Front end for the ChocoPy language", long_about = None)]
struct Args {
    /// Input source file (.py)
    #[arg(required = true)]
    input: PathBuf,

    /// Dump tokens (for debugging)
    #[arg(short = 't', long)]
    dump_tokens: bool,

    /// Dump AST (for debugging)
    #[arg(long = "ast-dump")]
    dump_ast: bool,

    /// Run semantic analysis
    #[arg(long)]
    run_sema: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(true) => {}
        // Compile errors have already been rendered by the reporter
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the default level
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// Compile the input file; `Ok(false)` means errors were reported
fn run(args: &Args) -> anyhow::Result<bool> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let filename = args.input.display().to_string();

    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file(&filename, &source);

    let config = FrontendConfig {
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        run_sema: args.run_sema,
    };

    let pipeline = Pipeline::with_default_frontends();
    let result =
        pipeline.compile_source(&source, &filename, Some("chocopy"), &config, &reporter, file_id);
    match result {
        Ok(analysis) => {
            tracing::info!(
                declarations = analysis.program.declarations.len(),
                types = analysis.types.len(),
                "compiled {}",
                filename
            );
            Ok(true)
        }
        Err(e) => {
            tracing::debug!(error = %e, "compilation failed");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn args(input: &Path) -> Args {
        Args::parse_from(["chococ", "--run-sema", input.to_str().unwrap()])
    }

    fn source_file(name: &str, source: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("chococ-{}-{}", process::id(), name));
        fs::write(&path, source).unwrap();
        path
    }

    #[test]
    fn test_run_well_typed_file() {
        let path = source_file("ok.py", "x: int = 1\nprint(x)\n");
        assert!(run(&args(&path)).unwrap());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_file_with_semantic_errors() {
        let path = source_file("bad.py", "x: int = 1\nx = \"s\"\n");
        assert!(!run(&args(&path)).unwrap());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_input_file() {
        let err = run(&args(Path::new("does-not-exist.py"))).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
    }
}
