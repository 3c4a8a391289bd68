//! Common infrastructure shared by every compiler phase

mod diagnostic;
mod error;
mod span;

pub use diagnostic::{DiagKind, Diagnostic, DiagnosticSink, Severity};
pub use error::{CompileError, CompileResult, DiagnosticReporter};
pub use span::Span;
