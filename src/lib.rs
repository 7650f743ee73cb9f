//! # tunit-migrate
//!
//! Core library for migrating xUnit, NUnit and MSTest C# test sources to
//! the TUnit framework.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! engine       → Pipeline orchestration, batch migration
//!   ↓
//! transformer  → Phase 2: applies a frozen plan to the working tree
//!   ↓
//! analyzer     → Phase 1: classification, plan construction, tagging
//!   ↓
//! semantic     → Symbol resolution, per-framework adapters
//!   ↓
//! plan         → Conversion plan records and failure taxonomy
//!   ↓
//! parser       → Logos lexer, lossy recursive-descent C# parser
//!   ↓
//! syntax       → Document tree, node payloads, rendering
//!   ↓
//! base         → Primitives (Tag, TextRange, LineIndex)
//! ```
//!
//! The two phases never overlap: the analyzer reads the pristine tree and
//! annotates a working copy with stable tags, the transformer edits the
//! working copy through those tags only. Source text the parser does not
//! model survives both phases verbatim.

// ============================================================================
// MODULES (dependency order: base → syntax → parser → plan → semantic →
// analyzer → transformer → engine)
// ============================================================================

/// Foundation types: Tag, TextRange, LineIndex
pub mod base;

/// Document tree: node payloads, append-only arena, rendering
pub mod syntax;

/// Parser: Logos lexer, lossy recursive-descent C# parser
pub mod parser;

/// Conversion plan: typed records, analysis stages, failures
pub mod plan;

/// Semantic layer: symbol resolution and framework adapters
pub mod semantic;

/// Phase 1: candidate discovery, classification, tagging
pub mod analyzer;

/// Phase 2: plan application over the working tree
pub mod transformer;

/// Pipeline orchestration and batch migration
pub mod engine;

/// Top-level error contract
pub mod error;

// Re-export the pipeline surface
pub use engine::{MigrationOutcome, MigrationPipeline};
pub use error::MigrateError;
pub use plan::{AnalysisStage, ConversionFailure, ConversionPlan};
pub use semantic::{
    detect_framework, MapResolver, NullResolver, Resolution, SourceFramework, SymbolResolver,
};

// Re-export foundation types
pub use base::{LineCol, LineIndex, Tag, TextRange, TextSize};
