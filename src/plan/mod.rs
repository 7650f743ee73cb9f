//! The conversion plan: everything phase 1 decides, everything phase 2 applies.
//!
//! The plan is append-only and ordered by discovery. Every record points at
//! its target through a [`Tag`] attached to the working tree during analysis,
//! never through a node id, so records survive arbitrary interleaved edits.
//! Candidates that could not be planned are recorded as failures instead of
//! aborting the document.

use std::fmt;

use indexmap::IndexSet;
use smol_str::SmolStr;

use crate::base::Tag;

/// What a converted assertion asserts. Closed set; anything that does not
/// fit is a [`AssertionKind::Passthrough`] with a todo note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssertionKind {
    Equality,
    Reference,
    Boolean,
    Nullity,
    Collection,
    StringOp,
    Comparison,
    TypeCheck,
    Exception,
    /// Fail / Skip / Inconclusive style control assertions.
    Control,
    /// Kept as-is, usually with a manual-conversion note.
    Passthrough,
}

/// One assertion statement rewritten to the fluent form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionConversion {
    pub tag: Tag,
    pub kind: AssertionKind,
    /// Full replacement expression, without the trailing semicolon.
    pub replacement: String,
    /// True when the replacement awaits and the enclosing method must
    /// become async.
    pub introduces_await: bool,
    /// Manual-conversion note to surface as a comment above the statement.
    pub todo: Option<String>,
    pub original: String,
}

/// What happens to an attribute's argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsChange {
    Keep,
    Remove,
    Replace(String),
}

/// An attribute renamed (and possibly re-argued) in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeConversion {
    pub tag: Tag,
    pub name: SmolStr,
    pub args: ArgsChange,
    /// Extra attributes added next to the converted one, as source text
    /// without brackets, e.g. `DisplayName("fast path")`.
    pub additional: Vec<String>,
}

/// An attribute added to a method: a missing test marker, or a lifecycle
/// hook such as `Before(Test)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodAttributeAddition {
    pub tag: Tag,
    /// Attribute text without brackets.
    pub attribute: String,
    /// Return type rewritten alongside, e.g. `ValueTask` to `Task`.
    pub new_return_type: Option<String>,
}

/// An attribute added to a class, e.g. `NotInParallel("io")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassAttributeAddition {
    pub tag: Tag,
    pub attribute: String,
}

/// A base type added to a class, e.g. `IAsyncInitializer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTypeAddition {
    pub tag: Tag,
    pub text: String,
}

/// A statically-known invocation rewritten in place, e.g.
/// `_output.WriteLine(x)` to `Console.WriteLine(x)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationReplacement {
    pub tag: Tag,
    /// Replacement expression, without the trailing semicolon.
    pub replacement: String,
}

/// `var ex = Record.Exception(() => ...)` rewritten to the throws form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordExceptionConversion {
    pub tag: Tag,
    pub variable: SmolStr,
    /// The action argument, verbatim, e.g. `() => Work()`.
    pub action: String,
}

/// A `TheoryData<...>` member retyped to a plain enumerable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTableConversion {
    pub tag: Tag,
    pub new_type: String,
    pub new_initializer: Option<String>,
}

/// How a method's return type changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnChange {
    None,
    VoidToTask,
    ValueTaskToTask,
}

/// Signature adjustments for one method. At most one per method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignatureChange {
    pub tag: Tag,
    pub add_async: bool,
    pub return_change: ReturnChange,
    pub make_public: bool,
}

/// Where in the pipeline a candidate was being considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisStage {
    Assertions,
    Attributes,
    ParameterAttributes,
    MissingTestAttributes,
    BaseTypes,
    Members,
    ConstructorParameters,
    SpecialInvocations,
    DataTables,
    MethodSignatures,
    Usings,
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnalysisStage::Assertions => "assertions",
            AnalysisStage::Attributes => "attributes",
            AnalysisStage::ParameterAttributes => "parameter attributes",
            AnalysisStage::MissingTestAttributes => "missing test attributes",
            AnalysisStage::BaseTypes => "base types",
            AnalysisStage::Members => "members",
            AnalysisStage::ConstructorParameters => "constructor parameters",
            AnalysisStage::SpecialInvocations => "special invocations",
            AnalysisStage::DataTables => "data tables",
            AnalysisStage::MethodSignatures => "method signatures",
            AnalysisStage::Usings => "usings",
        };
        f.write_str(s)
    }
}

/// A candidate that could not be planned. The document still migrates;
/// the failure is surfaced in the output banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionFailure {
    pub stage: AnalysisStage,
    pub description: String,
    pub original_code: String,
    /// 1-based source line of the candidate.
    pub line: u32,
}

/// Everything the analyzer decided, in discovery order per record list.
#[derive(Debug, Default, Clone)]
pub struct ConversionPlan {
    pub assertions: Vec<AssertionConversion>,
    pub attributes: Vec<AttributeConversion>,
    pub parameter_attributes: Vec<AttributeConversion>,
    pub method_attribute_additions: Vec<MethodAttributeAddition>,
    pub class_attribute_additions: Vec<ClassAttributeAddition>,
    pub attribute_removals: Vec<Tag>,
    pub base_type_removals: Vec<Tag>,
    pub base_type_additions: Vec<BaseTypeAddition>,
    pub member_removals: Vec<Tag>,
    pub ctor_param_removals: Vec<Tag>,
    pub invocation_replacements: Vec<InvocationReplacement>,
    pub record_exceptions: Vec<RecordExceptionConversion>,
    pub data_tables: Vec<DataTableConversion>,
    pub method_signatures: Vec<MethodSignatureChange>,
    pub usings_to_add: IndexSet<SmolStr>,
    pub using_prefixes_to_remove: Vec<SmolStr>,
    pub failures: Vec<ConversionFailure>,
}

impl ConversionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of planned conversions, failures excluded.
    pub fn conversion_count(&self) -> usize {
        self.assertions.len()
            + self.attributes.len()
            + self.parameter_attributes.len()
            + self.method_attribute_additions.len()
            + self.class_attribute_additions.len()
            + self.attribute_removals.len()
            + self.base_type_removals.len()
            + self.base_type_additions.len()
            + self.member_removals.len()
            + self.ctor_param_removals.len()
            + self.invocation_replacements.len()
            + self.record_exceptions.len()
            + self.data_tables.len()
            + self.method_signatures.len()
    }

    /// True when nothing was planned and nothing failed.
    pub fn is_empty(&self) -> bool {
        self.conversion_count() == 0
            && self.usings_to_add.is_empty()
            && self.using_prefixes_to_remove.is_empty()
            && self.failures.is_empty()
    }

    pub fn add_using(&mut self, ns: impl Into<SmolStr>) {
        self.usings_to_add.insert(ns.into());
    }

    pub fn fail(
        &mut self,
        stage: AnalysisStage,
        description: impl Into<String>,
        original_code: impl Into<String>,
        line: u32,
    ) {
        self.failures.push(ConversionFailure {
            stage,
            description: description.into(),
            original_code: original_code.into(),
            line,
        });
    }

    /// Manual-conversion notes carried by planned conversions.
    pub fn todo_count(&self) -> usize {
        self.assertions.iter().filter(|a| a.todo.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_plan_reports_empty() {
        let plan = ConversionPlan::new();
        assert!(plan.is_empty());
        assert_eq!(plan.conversion_count(), 0);
    }

    #[test]
    fn failures_keep_discovery_order() {
        let mut plan = ConversionPlan::new();
        plan.fail(AnalysisStage::Assertions, "first", "Assert.Equal(1)", 10);
        plan.fail(AnalysisStage::Attributes, "second", "[Weird]", 3);
        assert_eq!(plan.failures[0].description, "first");
        assert_eq!(plan.failures[1].description, "second");
        assert!(!plan.is_empty());
    }

    #[test]
    fn usings_deduplicate_but_keep_order() {
        let mut plan = ConversionPlan::new();
        plan.add_using("TUnit.Assertions");
        plan.add_using("TUnit.Core");
        plan.add_using("TUnit.Assertions");
        let all: Vec<&SmolStr> = plan.usings_to_add.iter().collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], "TUnit.Assertions");
    }
}
