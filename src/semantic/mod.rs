//! # Semantic Analysis
//!
//! Semantic queries over a parsed document: symbol resolution and the
//! per-framework adapters that classify legacy test constructs. Everything
//! here operates on the pristine tree only; once analysis ends and the
//! working tree starts changing, semantic queries are no longer valid.

pub mod adapters;
pub mod resolver;

pub use adapters::{
    adapter_for, detect_framework, AssertionRewrite, AttributeDisposition, BaseTypeDisposition,
    ClassContext, ClassRole, ClassifyError, CollectionDefinition, DataTableRewrite,
    FrameworkAdapter, LifecycleDisposition, SourceFramework, SpecialRewrite,
};
pub use resolver::{MapResolver, NullResolver, Resolution, SymbolResolver};
