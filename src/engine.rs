//! Pipeline orchestration: parse, analyze, transform, render.
//!
//! The pipeline itself is thin and stateless between documents, which is
//! what makes [`migrate_many`] safe: every document gets its own tree and
//! plan, the adapter vocabulary tables are immutable, and the only shared
//! handle is the cancellation token.

use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::analyzer::analyze;
use crate::error::MigrateError;
use crate::parser;
use crate::plan::ConversionFailure;
use crate::semantic::resolver::SymbolResolver;
use crate::semantic::{adapter_for, SourceFramework};
use crate::syntax::render::render;
use crate::transformer::transform;

/// Result of migrating one document.
#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    /// Rewritten source text. Equal to the input when nothing converted.
    pub text: String,
    pub changed: bool,
    /// Number of conversions applied.
    pub conversions: usize,
    /// Constructs that could not be converted, for host-side reporting.
    pub failures: Vec<ConversionFailure>,
    /// Manual-review notes embedded in the output.
    pub todo_count: usize,
}

pub struct MigrationPipeline {
    framework: SourceFramework,
    resolver: Box<dyn SymbolResolver>,
    cancel: CancellationToken,
}

impl MigrationPipeline {
    pub fn new(framework: SourceFramework, resolver: Box<dyn SymbolResolver>) -> Self {
        Self {
            framework,
            resolver,
            cancel: CancellationToken::new(),
        }
    }

    /// Use the caller's token instead of a private never-cancelled one.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn run(&self, source: &str) -> Result<MigrationOutcome, MigrateError> {
        if source.trim().is_empty() {
            return Err(MigrateError::EmptyDocument);
        }
        let doc = parser::parse(source);
        let adapter = adapter_for(self.framework);
        let mut analysis = analyze(&doc, adapter, self.resolver.as_ref(), &self.cancel)?;
        let conversions = analysis.plan.conversion_count();
        if analysis.plan.is_empty() {
            debug!("[PIPELINE] nothing to convert");
            return Ok(MigrationOutcome {
                text: source.to_string(),
                changed: false,
                conversions: 0,
                failures: Vec::new(),
                todo_count: 0,
            });
        }
        transform(&mut analysis.work, &analysis.plan);
        let text = render(&analysis.work);
        info!(
            "[PIPELINE] {}: {} conversion(s), {} failure(s)",
            self.framework,
            conversions,
            analysis.plan.failures.len()
        );
        Ok(MigrationOutcome {
            text,
            changed: conversions > 0,
            conversions,
            todo_count: analysis.plan.todo_count(),
            failures: analysis.plan.failures,
        })
    }

    /// Migrate a batch in parallel. Documents are independent, so order of
    /// results matches order of inputs.
    pub fn migrate_many(&self, sources: &[&str]) -> Vec<Result<MigrationOutcome, MigrateError>> {
        sources.par_iter().map(|s| self.run(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::NullResolver;

    fn pipeline(framework: SourceFramework) -> MigrationPipeline {
        MigrationPipeline::new(framework, Box::new(NullResolver))
    }

    #[test]
    fn empty_document_is_a_contract_violation() {
        let err = pipeline(SourceFramework::XUnit).run("   \n  ").unwrap_err();
        assert_eq!(err, MigrateError::EmptyDocument);
    }

    #[test]
    fn cancelled_token_aborts_the_run() {
        let token = CancellationToken::new();
        token.cancel();
        let p = pipeline(SourceFramework::XUnit).with_cancellation(token);
        let err = p
            .run("using Xunit;\n\npublic class T\n{\n    [Fact]\n    public void M()\n    {\n        Assert.Equal(1, 1);\n    }\n}\n")
            .unwrap_err();
        assert_eq!(err, MigrateError::Cancelled);
    }

    #[test]
    fn untouched_document_comes_back_verbatim() {
        let source = "public class Calculator\n{\n    public int Add(int a, int b)\n    {\n        return a + b;\n    }\n}\n";
        let outcome = pipeline(SourceFramework::XUnit).run(source).unwrap();
        assert!(!outcome.changed);
        assert_eq!(outcome.text, source);
        assert_eq!(outcome.conversions, 0);
    }

    #[test]
    fn batch_results_line_up_with_inputs() {
        let converted = "using Xunit;\n\npublic class T\n{\n    [Fact]\n    public void M()\n    {\n        Assert.True(true);\n    }\n}\n";
        let untouched = "public class Plain\n{\n}\n";
        let outcomes = pipeline(SourceFramework::XUnit).migrate_many(&[converted, untouched, ""]);
        assert!(outcomes[0].as_ref().unwrap().changed);
        assert!(!outcomes[1].as_ref().unwrap().changed);
        assert_eq!(outcomes[2].as_ref().unwrap_err(), &MigrateError::EmptyDocument);
    }
}
