//! Structured diagnostics emitted by semantic analysis
//!
//! The analyzer never formats text itself. It reports a [`Diagnostic`]
//! (severity, location, kind, substitution arguments) into a
//! [`DiagnosticSink`]; rendering happens in
//! [`DiagnosticReporter`](super::DiagnosticReporter).

use super::Span;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Every semantic diagnostic the analyzer can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagKind {
    // === Resolution ===
    UndefinedName,
    NotAVariable,
    DuplicateDeclaration,
    ShadowClassName,
    InvalidGlobal,
    InvalidNonlocal,
    BadLocalAssign,
    InvalidTypeAnnotation,
    NotCallable,

    // === Class hierarchy ===
    SuperclassNotDefined,
    SuperclassSpecial,
    SuperclassNotClass,
    MethodOverride,
    AttributeRedefinition,
    FirstMethodParam,
    InitRedefinesAttribute,

    // === Types ===
    AssignTypeMismatch,
    BinaryTypeMismatch,
    UnaryTypeMismatch,
    ArgumentCount,
    ArgumentTypeMismatch,
    IndexNotInt,
    CannotIndex,
    StrIndexAssign,
    ListElementMismatch,
    ConditionNotBool,
    NotIterable,
    AttributeNotFound,
    MethodNotFound,
    MissingReturn,
    ReturnTypeMismatch,
    ReturnAtTopLevel,
}

impl DiagKind {
    /// Message template with positional `{0}`, `{1}`, ... placeholders
    pub fn template(self) -> &'static str {
        match self {
            DiagKind::UndefinedName => "name '{0}' is not defined",
            DiagKind::NotAVariable => "'{0}' is not a variable",
            DiagKind::DuplicateDeclaration => {
                "duplicate declaration of identifier in the same scope: {0}"
            }
            DiagKind::ShadowClassName => "cannot shadow class name: {0}",
            DiagKind::InvalidGlobal => "not a global variable: {0}",
            DiagKind::InvalidNonlocal => "not a nonlocal variable: {0}",
            DiagKind::BadLocalAssign => {
                "cannot assign to variable that is not explicitly declared in this scope: {0}"
            }
            DiagKind::InvalidTypeAnnotation => {
                "invalid type annotation; there is no class named: {0}"
            }
            DiagKind::NotCallable => "not a function or class: {0}",
            DiagKind::SuperclassNotDefined => "super-class not defined: {0}",
            DiagKind::SuperclassSpecial => "cannot extend special class: {0}",
            DiagKind::SuperclassNotClass => "super-class must be a class: {0}",
            DiagKind::MethodOverride => "method overridden with different type signature: {0}",
            DiagKind::AttributeRedefinition => "cannot re-define attribute: {0}",
            DiagKind::FirstMethodParam => {
                "first parameter of the following method must be of the enclosing class: {0}"
            }
            DiagKind::InitRedefinesAttribute => {
                "parameter '{0}' of __init__ conflicts with attribute of type `{1}`"
            }
            DiagKind::AssignTypeMismatch => "expected type `{0}`; got type `{1}`",
            DiagKind::BinaryTypeMismatch => "cannot apply operator `{0}` on types `{1}` and `{2}`",
            DiagKind::UnaryTypeMismatch => "cannot apply operator `{0}` on type `{1}`",
            DiagKind::ArgumentCount => "expected {0} arguments; got {1}",
            DiagKind::ArgumentTypeMismatch => {
                "expected type `{0}`; got type `{1}` in parameter {2}"
            }
            DiagKind::IndexNotInt => "index is of non-integer type `{0}`",
            DiagKind::CannotIndex => "cannot index into type `{0}`",
            DiagKind::StrIndexAssign => "`{0}` is not a list type",
            DiagKind::ListElementMismatch => "list elements have mismatched types `{0}` and `{1}`",
            DiagKind::ConditionNotBool => "condition expression cannot be of type `{0}`",
            DiagKind::NotIterable => "cannot iterate over value of type `{0}`",
            DiagKind::AttributeNotFound => "there is no attribute named `{0}` in class `{1}`",
            DiagKind::MethodNotFound => "there is no method named `{0}` in class `{1}`",
            DiagKind::MissingReturn => {
                "all paths in this function/method must have a return statement: {0}"
            }
            DiagKind::ReturnTypeMismatch => "expected return type `{0}`; got type `{1}`",
            DiagKind::ReturnAtTopLevel => "return statement cannot appear at the top level",
        }
    }

    /// Substitute `args` into the template; unmatched placeholders are kept
    pub fn format(self, args: &[String]) -> String {
        let template = self.template();
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let substituted = after.find('}').and_then(|close| {
                let index: usize = after[..close].parse().ok()?;
                Some((args.get(index)?, close))
            });
            match substituted {
                Some((arg, close)) => {
                    out.push_str(arg);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// A single structured diagnostic event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub span: Span,
    pub kind: DiagKind,
    pub args: Vec<String>,
}

impl Diagnostic {
    pub fn error(kind: DiagKind, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            span,
            kind,
            args: Vec::new(),
        }
    }

    pub fn warning(kind: DiagKind, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            span,
            kind,
            args: Vec::new(),
        }
    }

    /// Append a substitution argument
    pub fn with_arg(mut self, arg: impl ToString) -> Self {
        self.args.push(arg.to_string());
        self
    }

    pub fn message(&self) -> String {
        self.kind.format(&self.args)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message())
    }
}

/// Receiver of diagnostics
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);

    /// Number of error-severity diagnostics received so far
    fn error_count(&self) -> usize;
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }

    fn error_count(&self) -> usize {
        self.iter().filter(|d| d.is_error()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_substitutes_positional_args() {
        let diag = Diagnostic::error(DiagKind::BinaryTypeMismatch, Span::new(0, 3))
            .with_arg("+")
            .with_arg("[int]")
            .with_arg("[str]");
        assert_eq!(
            diag.message(),
            "cannot apply operator `+` on types `[int]` and `[str]`"
        );
        assert_eq!(
            diag.to_string(),
            "error: cannot apply operator `+` on types `[int]` and `[str]`"
        );
    }

    #[test]
    fn test_format_keeps_missing_placeholders() {
        assert_eq!(
            DiagKind::ArgumentCount.format(&["2".to_string()]),
            "expected 2 arguments; got {1}"
        );
    }

    #[test]
    fn test_vec_sink_counts_errors_only() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.emit(Diagnostic::error(DiagKind::ReturnAtTopLevel, Span::default()));
        sink.emit(Diagnostic::warning(DiagKind::NotAVariable, Span::default()).with_arg("f"));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink[1].to_string(), "warning: 'f' is not a variable");
    }
}
