//! ChocoPy compiler front end
//!
//! This library lexes, parses and semantically analyzes ChocoPy, a
//! statically typed subset of Python with classes, nested functions and
//! list types.
//!
//! ## Architecture
//!
//! The compiler is organized into:
//! - **Frontend** (`frontend/`): lexer, parser, AST and semantic analysis
//! - **Driver** (`driver/`): frontend selection and pipeline orchestration
//! - **Common** (`common/`): shared infrastructure (errors, diagnostics, spans)

pub mod common;
pub mod driver;
pub mod frontend;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, Diagnostic, DiagnosticReporter, Span};
pub use driver::Pipeline;
pub use frontend::{
    Analysis, ChocoFrontend, CompileContext, Frontend, FrontendConfig, FrontendRegistry,
};
