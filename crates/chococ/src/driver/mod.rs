//! Compilation driver and pipeline orchestration

use crate::common::{CompileError, CompileResult, DiagnosticReporter, Span};
use crate::frontend::{
    Analysis, ChocoFrontend, CompileContext, Frontend, FrontendConfig, FrontendRegistry,
};
use std::path::Path;
use tracing::debug;

/// Compilation pipeline that selects a frontend for each source file
pub struct Pipeline {
    frontends: FrontendRegistry,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            frontends: FrontendRegistry::new(),
        }
    }

    /// Pipeline with every built-in frontend registered
    pub fn with_default_frontends() -> Self {
        let mut pipeline = Self::new();
        pipeline.register_frontend(Box::new(ChocoFrontend::new()));
        pipeline
    }

    pub fn register_frontend(&mut self, frontend: Box<dyn Frontend>) {
        self.frontends.register(frontend);
    }

    pub fn frontends(&self) -> &FrontendRegistry {
        &self.frontends
    }

    /// Compile source code using the appropriate frontend
    pub fn compile_source(
        &self,
        source: &str,
        filename: &str,
        frontend_name: Option<&str>,
        config: &FrontendConfig,
        reporter: &DiagnosticReporter,
        file_id: usize,
    ) -> CompileResult<Analysis> {
        let frontend = if let Some(name) = frontend_name {
            self.frontends.find_by_name(name)
        } else {
            // Auto-detect from file extension
            let ext = Path::new(filename)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{}", e))
                .unwrap_or_default();
            self.frontends.find_by_extension(&ext)
        };

        let Some(frontend) = frontend else {
            let err = CompileError::internal(
                format!("no frontend found for file: {}", filename),
                Span::default(),
            );
            reporter.report_error(file_id, &err);
            return Err(err);
        };
        debug!(frontend = frontend.name(), filename, "selected frontend");

        let ctx = CompileContext::new(filename.to_string(), file_id, reporter);
        frontend.compile(source, &ctx, config)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(filename: &str, frontend: Option<&str>) -> CompileResult<Analysis> {
        let source = "print(1)\n";
        let mut reporter = DiagnosticReporter::new();
        let file_id = reporter.add_file(filename, source);
        let config = FrontendConfig {
            run_sema: true,
            ..Default::default()
        };
        Pipeline::with_default_frontends().compile_source(
            source, filename, frontend, &config, &reporter, file_id,
        )
    }

    #[test]
    fn test_frontend_selected_by_extension() {
        assert!(compile("main.py", None).is_ok());
    }

    #[test]
    fn test_frontend_selected_by_name() {
        assert!(compile("main.txt", Some("chocopy")).is_ok());
    }

    #[test]
    fn test_unknown_extension() {
        let err = compile("main.c", None).unwrap_err();
        assert!(matches!(err, CompileError::Internal { .. }));
    }
}
