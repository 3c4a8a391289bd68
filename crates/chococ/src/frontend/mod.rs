//! Frontend trait and the ChocoPy implementation
//!
//! The frontend is responsible for:
//! 1. Lexing source code into tokens
//! 2. Parsing tokens into an AST
//! 3. Performing semantic analysis

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod sema;

use crate::common::{CompileError, CompileResult, Diagnostic, DiagnosticReporter};
use tracing::{debug, info};

pub use ast::{AstContext, Program};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use sema::{SemanticAnalyzer, TypeUniverse};

/// Configuration options passed to frontends
#[derive(Debug, Clone, Default)]
pub struct FrontendConfig {
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub run_sema: bool,
}

/// Compilation context providing access to diagnostics and file info
pub struct CompileContext<'a> {
    pub filename: String,
    pub file_id: usize,
    pub reporter: &'a DiagnosticReporter,
}

impl<'a> CompileContext<'a> {
    pub fn new(filename: String, file_id: usize, reporter: &'a DiagnosticReporter) -> Self {
        Self {
            filename,
            file_id,
            reporter,
        }
    }
}

/// Everything the frontend produced for one source file
#[derive(Debug)]
pub struct Analysis {
    pub ast: AstContext,
    pub program: Program,
    pub types: TypeUniverse,
    /// Empty when semantic analysis was not requested
    pub diagnostics: Vec<Diagnostic>,
}

/// Trait for language frontends
pub trait Frontend: Send + Sync {
    /// The name of this frontend (e.g., "chocopy")
    fn name(&self) -> &'static str;

    /// File extensions this frontend handles (e.g., &[".py"])
    fn extensions(&self) -> &'static [&'static str];

    /// Run the frontend pipeline: lex -> parse -> analyze
    ///
    /// Errors are rendered through the context's reporter before being
    /// returned. Semantic diagnostics turn into [`CompileError::Semantic`].
    fn compile(
        &self,
        source: &str,
        ctx: &CompileContext,
        config: &FrontendConfig,
    ) -> CompileResult<Analysis>;
}

/// Registry of available frontends
pub struct FrontendRegistry {
    frontends: Vec<Box<dyn Frontend>>,
}

impl FrontendRegistry {
    pub fn new() -> Self {
        Self {
            frontends: Vec::new(),
        }
    }

    pub fn register(&mut self, frontend: Box<dyn Frontend>) {
        self.frontends.push(frontend);
    }

    pub fn find_by_extension(&self, ext: &str) -> Option<&dyn Frontend> {
        self.frontends
            .iter()
            .find(|f| f.extensions().iter().any(|e| *e == ext))
            .map(|f| f.as_ref())
    }

    pub fn find_by_name(&self, name: &str) -> Option<&dyn Frontend> {
        self.frontends
            .iter()
            .find(|f| f.name() == name)
            .map(|f| f.as_ref())
    }

    pub fn list(&self) -> impl Iterator<Item = &dyn Frontend> {
        self.frontends.iter().map(|f| f.as_ref())
    }
}

impl Default for FrontendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// ChocoPy frontend
pub struct ChocoFrontend;

impl ChocoFrontend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ChocoFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl Frontend for ChocoFrontend {
    fn name(&self) -> &'static str {
        "chocopy"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".py"]
    }

    #[tracing::instrument(level = "info", skip_all, fields(file = %ctx.filename))]
    fn compile(
        &self,
        source: &str,
        ctx: &CompileContext,
        config: &FrontendConfig,
    ) -> CompileResult<Analysis> {
        let report = |e: CompileError| {
            ctx.reporter.report_error(ctx.file_id, &e);
            e
        };

        // Phase 1: Lexing (optional token dump)
        if config.dump_tokens {
            let tokens = Lexer::new(source).tokenize_all().map_err(report)?;
            eprintln!("=== Tokens ===");
            for token in &tokens {
                eprintln!("{:?}", token);
            }
            eprintln!("=== End Tokens ===\n");
        }

        // Phase 2: Parsing
        info!("parsing");
        let mut ast = AstContext::new();
        let program = Parser::new(source, &mut ast)
            .and_then(|mut parser| parser.parse())
            .map_err(report)?;
        debug!(
            declarations = program.declarations.len(),
            statements = program.statements.len(),
            "parsed program"
        );

        if config.dump_ast {
            eprintln!("=== AST ===");
            eprintln!("{:#?}", program);
            eprintln!("=== End AST ===\n");
        }

        // Phase 3: Semantic analysis
        let mut types = TypeUniverse::new();
        let mut diagnostics = Vec::new();
        if config.run_sema {
            info!("semantic analysis");
            SemanticAnalyzer::new(&ast, &mut types, &mut diagnostics)
                .analyze(&program)
                .map_err(report)?;

            for diagnostic in &diagnostics {
                ctx.reporter.report_diagnostic(ctx.file_id, diagnostic);
            }
            let errors = diagnostics.iter().filter(|d| d.is_error()).count();
            if errors > 0 {
                return Err(report(CompileError::semantic(errors)));
            }
        }

        Ok(Analysis {
            ast,
            program,
            types,
            diagnostics,
        })
    }
}
