//! # Framework Adapters
//!
//! Adapters form the **architectural boundary** between framework-specific
//! test vocabulary and framework-agnostic planning.
//!
//! ## Architecture
//!
//! ```text
//! Syntax Layer (document tree)
//!      ↓
//! Adapters (framework-aware) ← YOU ARE HERE
//!      ↓ (classify into plan records)
//! Conversion Plan (framework-agnostic)
//!      ↓
//! Transformation
//! ```
//!
//! Each adapter knows one legacy framework's assertion methods, attributes
//! and base types, and classifies candidate nodes into rewrites targeting
//! the TUnit surface. The analyzer drives the adapters; the transformer
//! never sees framework vocabulary at all.
//!
//! This is the ONLY module that should encode framework names. Analyzer
//! and transformer code must work solely with plan records and the
//! dispositions defined here.

pub mod common;
pub mod mstest;
pub mod nunit;
pub mod xunit;

use smol_str::SmolStr;
use thiserror::Error;

use crate::plan::{ArgsChange, AssertionKind};
use crate::syntax::ast::{AttributeSpec, BaseTypeRef, CallExpr, ParamDecl};
use crate::syntax::SyntaxTree;

pub use mstest::MsTestAdapter;
pub use nunit::NUnitAdapter;
pub use xunit::XUnitAdapter;

/// The legacy framework a document migrates away from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFramework {
    XUnit,
    NUnit,
    MsTest,
}

impl std::fmt::Display for SourceFramework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SourceFramework::XUnit => "xUnit",
            SourceFramework::NUnit => "NUnit",
            SourceFramework::MsTest => "MSTest",
        };
        f.write_str(s)
    }
}

/// Detect the source framework from a document's using directives.
/// The first framework-owned using wins.
pub fn detect_framework<'a>(usings: impl IntoIterator<Item = &'a str>) -> Option<SourceFramework> {
    for path in usings {
        if path == "Xunit" || path.starts_with("Xunit.") {
            return Some(SourceFramework::XUnit);
        }
        if path == "NUnit.Framework" || path.starts_with("NUnit.Framework.") {
            return Some(SourceFramework::NUnit);
        }
        if path == "Microsoft.VisualStudio.TestTools.UnitTesting"
            || path.starts_with("Microsoft.VisualStudio.TestTools.UnitTesting.")
        {
            return Some(SourceFramework::MsTest);
        }
    }
    None
}

/// The adapter for one framework. Instances are stateless.
pub fn adapter_for(framework: SourceFramework) -> &'static dyn FrameworkAdapter {
    match framework {
        SourceFramework::XUnit => &XUnitAdapter,
        SourceFramework::NUnit => &NUnitAdapter,
        SourceFramework::MsTest => &MsTestAdapter,
    }
}

/// A candidate the adapter recognized but could not plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// Recognized construct with no mechanical TUnit equivalent.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Recognized construct with an argument shape the conversion cannot
    /// work with.
    #[error("malformed: {0}")]
    Malformed(String),
}

impl ClassifyError {
    pub fn unsupported(msg: impl Into<String>) -> Self {
        ClassifyError::Unsupported(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        ClassifyError::Malformed(msg.into())
    }
}

/// A planned assertion rewrite, minus the tag the analyzer attaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionRewrite {
    pub kind: AssertionKind,
    /// Replacement expression without the trailing semicolon.
    pub replacement: String,
    pub introduces_await: bool,
    pub todo: Option<String>,
}

/// What happens to a recognized attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeDisposition {
    /// Delete the attribute.
    Remove,
    /// Rename it, adjust its arguments, possibly add sibling attributes.
    Convert {
        name: SmolStr,
        args: ArgsChange,
        /// Sibling attributes, as source text without brackets.
        additional: Vec<String>,
    },
}

impl AttributeDisposition {
    pub fn rename(name: impl Into<SmolStr>, args: ArgsChange) -> Self {
        AttributeDisposition::Convert {
            name: name.into(),
            args,
            additional: Vec::new(),
        }
    }
}

/// Whether a class contains test methods. Decides how async lifecycle
/// interfaces are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassRole {
    TestClass,
    PlainClass,
}

/// Replacement behavior for a removed async lifecycle interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleDisposition {
    /// Hook attribute (without brackets) added per method name.
    pub method_hooks: Vec<(SmolStr, String)>,
    /// Base types added in place of the removed interface.
    pub base_additions: Vec<String>,
    /// Methods whose `ValueTask` return becomes `Task`.
    pub method_retypes: Vec<SmolStr>,
}

/// What happens to a base-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseTypeDisposition {
    /// Not framework-owned; leave it alone.
    Keep,
    Remove,
    /// Remove and attach a class-level attribute (without brackets).
    RemoveAddingClassAttribute(String),
    /// Remove and rewrite the class's async lifecycle members.
    RemoveRewritingLifecycle(LifecycleDisposition),
}

/// Framework-special statement rewrites outside the assertion tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialRewrite {
    /// Replace the invocation expression in place.
    ReplaceInvocation { replacement: String },
    /// Expand `var ex = Record.Exception(action)` into a try/catch block.
    RecordException { variable: SmolStr, action: String },
}

/// A data-table member retyped away from the framework's table type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTableRewrite {
    pub new_type: String,
    pub new_initializer: Option<String>,
}

/// One collection definition discovered during analysis, keyed by the
/// literal text of its name argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionDefinition {
    /// Type argument of `ICollectionFixture<T>` on the definition class.
    pub fixture_type: Option<String>,
    pub disable_parallelization: bool,
}

/// Document-wide context attribute classification may need.
#[derive(Debug, Clone, Default)]
pub struct ClassContext {
    pub collections: rustc_hash::FxHashMap<String, CollectionDefinition>,
}

/// One framework's migration vocabulary.
pub trait FrameworkAdapter: Send + Sync {
    fn framework(&self) -> SourceFramework;

    /// Namespace prefixes owned by the framework. Receivers resolving
    /// outside these are not candidates; unresolved receivers are treated
    /// as candidates so syntax-only runs still convert.
    fn namespace_prefixes(&self) -> &'static [&'static str];

    /// Static receivers whose calls may be assertions, e.g. `Assert`.
    fn assertion_receivers(&self) -> &'static [&'static str];

    /// Classify one assertion invocation. `Ok(None)` means the call is
    /// left untouched on purpose.
    fn classify_assertion(
        &self,
        call: &CallExpr,
    ) -> Result<Option<AssertionRewrite>, ClassifyError>;

    /// Gather document-wide context from the pristine tree before any
    /// attribute is classified, e.g. xUnit collection definitions.
    fn collect_context(&self, _tree: &SyntaxTree) -> ClassContext {
        ClassContext::default()
    }

    /// Classify one attribute. `Ok(None)` means not framework-owned.
    fn classify_attribute(
        &self,
        attr: &AttributeSpec,
        ctx: &ClassContext,
    ) -> Result<Option<AttributeDisposition>, ClassifyError>;

    /// Classify an attribute sitting on a method parameter.
    fn classify_parameter_attribute(
        &self,
        _attr: &AttributeSpec,
        _param: &ParamDecl,
    ) -> Option<AttributeDisposition> {
        None
    }

    fn classify_base_type(&self, _base: &BaseTypeRef, _role: ClassRole) -> BaseTypeDisposition {
        BaseTypeDisposition::Keep
    }

    /// Field, property and constructor-parameter types deleted outright.
    fn removes_member_of_type(&self, _ty: &str) -> bool {
        false
    }

    /// Framework-special plain invocations, e.g. output-helper writes.
    fn classify_invocation(&self, _call: &CallExpr) -> Option<SpecialRewrite> {
        None
    }

    /// Framework-special call-initialized locals, e.g. `Record.Exception`.
    fn classify_local(&self, _variable: &str, _init: &CallExpr) -> Option<SpecialRewrite> {
        None
    }

    /// Framework data-table types, e.g. `TheoryData<...>`.
    fn classify_data_table(&self, _ty: &str, _initializer: Option<&str>) -> Option<DataTableRewrite> {
        None
    }

    /// Attribute names that mark a method as a test, pre- or post-conversion.
    fn is_test_marker(&self, name: &str) -> bool;

    /// Attribute names that require a test marker on the same method.
    fn implies_test_marker(&self, _name: &str) -> bool {
        false
    }

    /// Attributes whose carrier method must be public after migration.
    fn visibility_sensitive_attrs(&self) -> &'static [&'static str] {
        &[]
    }

    /// Using-directive prefixes stripped from migrated documents.
    fn using_prefixes_to_remove(&self) -> &'static [&'static str];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_framework_from_usings() {
        assert_eq!(
            detect_framework(["System", "Xunit"]),
            Some(SourceFramework::XUnit)
        );
        assert_eq!(
            detect_framework(["NUnit.Framework"]),
            Some(SourceFramework::NUnit)
        );
        assert_eq!(
            detect_framework(["Microsoft.VisualStudio.TestTools.UnitTesting"]),
            Some(SourceFramework::MsTest)
        );
        assert_eq!(detect_framework(["System", "System.Linq"]), None);
    }

    #[test]
    fn framework_prefixes_respect_segment_boundaries() {
        assert_eq!(detect_framework(["XunitExtras"]), None);
        assert_eq!(detect_framework(["NUnit.FrameworkLegacy"]), None);
        assert_eq!(
            detect_framework(["Xunit.Abstractions"]),
            Some(SourceFramework::XUnit)
        );
    }

    #[test]
    fn adapters_report_their_framework() {
        for fw in [
            SourceFramework::XUnit,
            SourceFramework::NUnit,
            SourceFramework::MsTest,
        ] {
            assert_eq!(adapter_for(fw).framework(), fw);
        }
    }
}
