//! Phase 1: single-pass analysis of the pristine tree.
//!
//! The analyzer walks the pristine document stage by stage, asks the active
//! framework adapter to classify each candidate, and for every accepted
//! candidate appends a record to the [`ConversionPlan`] and attaches a fresh
//! [`Tag`] to the matching node of the working tree. The pristine tree is
//! never edited, so every stage reads stable syntax; the working tree is
//! reached exclusively through the origin index, so earlier annotations
//! never invalidate later ones.
//!
//! A classification error is recorded as a [`ConversionFailure`] for that
//! candidate and analysis moves on. Cancellation is the only way out early.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::base::Tag;
use crate::error::MigrateError;
use crate::parser::SourceDocument;
use crate::plan::{
    AnalysisStage, AssertionConversion, AttributeConversion, BaseTypeAddition,
    ClassAttributeAddition, ConversionPlan, DataTableConversion, InvocationReplacement,
    MethodAttributeAddition, MethodSignatureChange, RecordExceptionConversion, ReturnChange,
};
use crate::semantic::{
    AttributeDisposition, BaseTypeDisposition, ClassContext, ClassRole, FrameworkAdapter,
    SpecialRewrite,
};
use crate::semantic::resolver::SymbolResolver;
use crate::syntax::ast::{type_head, NodeKind, StmtKind};
use crate::syntax::tree::{NodeId, SyntaxTree};

/// Everything phase 1 produces: the frozen plan and the annotated working
/// tree the transformer rewrites.
#[derive(Debug)]
pub struct Analysis {
    pub plan: ConversionPlan,
    pub work: SyntaxTree,
}

pub fn analyze(
    doc: &SourceDocument,
    adapter: &dyn FrameworkAdapter,
    resolver: &dyn SymbolResolver,
    cancel: &CancellationToken,
) -> Result<Analysis, MigrateError> {
    let mut analyzer = Analyzer {
        doc,
        adapter,
        resolver,
        cancel,
        work: doc.tree.fork(),
        plan: ConversionPlan::new(),
        signatures: FxHashMap::default(),
    };
    analyzer.run()?;
    debug!(
        "[ANALYZE] {} conversion(s), {} failure(s)",
        analyzer.plan.conversion_count(),
        analyzer.plan.failures.len()
    );
    Ok(Analysis {
        plan: analyzer.plan,
        work: analyzer.work,
    })
}

/// Pending signature adjustments for one method, merged across stages so
/// the plan carries at most one [`MethodSignatureChange`] per method.
#[derive(Debug, Default, Clone, Copy)]
struct SigDelta {
    add_async: bool,
    retype_value_task: bool,
    make_public: bool,
}

struct Analyzer<'a> {
    doc: &'a SourceDocument,
    adapter: &'a dyn FrameworkAdapter,
    resolver: &'a dyn SymbolResolver,
    cancel: &'a CancellationToken,
    work: SyntaxTree,
    plan: ConversionPlan,
    signatures: FxHashMap<NodeId, SigDelta>,
}

impl<'a> Analyzer<'a> {
    fn run(&mut self) -> Result<(), MigrateError> {
        let ctx = self.adapter.collect_context(&self.doc.tree);
        self.assertions()?;
        self.special_invocations()?;
        self.attributes(&ctx)?;
        self.missing_test_attributes()?;
        self.base_types()?;
        self.members()?;
        self.constructor_parameters()?;
        self.data_tables()?;
        self.method_signatures()?;
        self.usings();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    fn check_cancel(&self) -> Result<(), MigrateError> {
        if self.cancel.is_cancelled() {
            warn!("[ANALYZE] cancelled");
            return Err(MigrateError::Cancelled);
        }
        Ok(())
    }

    /// Attach a fresh tag to the working-tree counterpart of a pristine
    /// node. `None` when the node was already removed from the working tree.
    fn tag_origin(&mut self, pristine: NodeId) -> Option<Tag> {
        let current = self.work.current_for_origin(pristine)?;
        let tag = Tag::new();
        self.work.attach_tag(current, tag);
        trace!("[ANALYZE] tag {} attached", tag);
        Some(tag)
    }

    /// 1-based source line of a pristine node, for failure records.
    fn line_of(&self, id: NodeId) -> u32 {
        self.doc
            .tree
            .range(id)
            .map(|r| self.doc.line_index.line_col(r.start()).line + 1)
            .unwrap_or(0)
    }

    fn sig_delta(&mut self, method: NodeId) -> &mut SigDelta {
        self.signatures.entry(method).or_default()
    }

    fn bodies(&self) -> Vec<NodeId> {
        let tree = &self.doc.tree;
        let mut out = Vec::new();
        for class in tree.classes() {
            out.extend(tree.ctors_of(class));
            out.extend(tree.methods_of(class));
        }
        out
    }

    // ------------------------------------------------------------------
    // Stage 1: assertions
    // ------------------------------------------------------------------

    fn assertions(&mut self) -> Result<(), MigrateError> {
        let tree = &self.doc.tree;
        for class in tree.classes() {
            for method in tree.methods_of(class) {
                let by_ref = tree
                    .params_of(method)
                    .iter()
                    .filter_map(|&p| tree.parameter(p))
                    .any(|p| p.is_by_ref());
                for stmt_id in tree.statements_of(method) {
                    self.check_cancel()?;
                    self.assertion_candidate(method, stmt_id, by_ref);
                }
            }
        }
        Ok(())
    }

    fn assertion_candidate(&mut self, method: NodeId, stmt_id: NodeId, by_ref: bool) {
        let tree = &self.doc.tree;
        let Some(stmt) = tree.statement(stmt_id) else {
            return;
        };
        let Some(call) = stmt.call() else { return };
        let Some(head) = call.receiver_head() else {
            return;
        };
        if !self.adapter.assertion_receivers().contains(&head) {
            return;
        }
        // Semantic confirmation, fail-open: an unresolved receiver that
        // already passed the syntax prefilter counts as a candidate.
        match self
            .resolver
            .resolve_receiver(head)
            .belongs_to(self.adapter.namespace_prefixes())
        {
            Some(false) => {
                trace!("[ANALYZE] '{}' resolves outside {}, skipped", head, self.adapter.framework());
                return;
            }
            Some(true) => {}
            None => {
                debug!(
                    "[ANALYZE] '{}' unresolved, assuming {}",
                    head,
                    self.adapter.framework()
                );
            }
        }

        match self.adapter.classify_assertion(call) {
            Err(e) => {
                warn!("[ANALYZE] assertion failure: {}", e);
                let line = self.line_of(stmt_id);
                self.plan
                    .fail(AnalysisStage::Assertions, e.to_string(), stmt.text(), line);
            }
            Ok(None) => {}
            Ok(Some(mut rewrite)) => {
                // `await` is illegal in methods with ref/out parameters;
                // block on the assertion instead.
                if rewrite.introduces_await && by_ref {
                    if let Some(rest) = rewrite.replacement.strip_prefix("await ") {
                        rewrite.replacement = format!("{rest}.Wait()");
                        rewrite.introduces_await = false;
                    }
                }
                let replacement = match &stmt.kind {
                    StmtKind::Local { ty, name, .. } => {
                        format!("{ty} {name} = {}", rewrite.replacement)
                    }
                    _ => rewrite.replacement.clone(),
                };
                let Some(tag) = self.tag_origin(stmt_id) else {
                    return;
                };
                if rewrite.introduces_await {
                    self.sig_delta(method).add_async = true;
                }
                self.plan.assertions.push(AssertionConversion {
                    tag,
                    kind: rewrite.kind,
                    replacement,
                    introduces_await: rewrite.introduces_await,
                    todo: rewrite.todo,
                    original: stmt.text().to_string(),
                });
            }
        }
    }

    // ------------------------------------------------------------------
    // Stage 2: special invocations
    // ------------------------------------------------------------------

    fn special_invocations(&mut self) -> Result<(), MigrateError> {
        for body in self.bodies() {
            for stmt_id in self.doc.tree.statements_of(body) {
                self.check_cancel()?;
                let Some(stmt) = self.doc.tree.statement(stmt_id) else {
                    continue;
                };
                let rewrite = match &stmt.kind {
                    StmtKind::Call(call) => self.adapter.classify_invocation(call),
                    StmtKind::Local { name, init, .. } => {
                        self.adapter.classify_local(name, init)
                    }
                    StmtKind::Raw(_) => None,
                };
                let Some(rewrite) = rewrite else { continue };
                let Some(tag) = self.tag_origin(stmt_id) else {
                    continue;
                };
                match rewrite {
                    SpecialRewrite::ReplaceInvocation { replacement } => {
                        self.plan
                            .invocation_replacements
                            .push(InvocationReplacement { tag, replacement });
                    }
                    SpecialRewrite::RecordException { variable, action } => {
                        self.plan
                            .record_exceptions
                            .push(RecordExceptionConversion { tag, variable, action });
                    }
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Stage 3: attributes (class, method, parameter)
    // ------------------------------------------------------------------

    fn attributes(&mut self, ctx: &ClassContext) -> Result<(), MigrateError> {
        let tree = &self.doc.tree;
        let mut owners: Vec<NodeId> = Vec::new();
        for class in tree.classes() {
            owners.push(class);
            owners.extend(tree.methods_of(class));
        }
        for owner in owners {
            for attr_id in self.doc.tree.attributes_of(owner) {
                self.check_cancel()?;
                self.attribute_candidate(owner, attr_id, ctx);
            }
        }
        self.parameter_attributes(ctx)
    }

    fn attribute_candidate(&mut self, owner: NodeId, attr_id: NodeId, ctx: &ClassContext) {
        let Some(attr) = self.doc.tree.attribute(attr_id).cloned() else {
            return;
        };
        // Non-public lifecycle hooks must become public to stay discoverable.
        if self.adapter.visibility_sensitive_attrs().contains(&attr.name.as_str()) {
            if let Some(m) = self.doc.tree.method(owner) {
                if !m.is_public() {
                    self.sig_delta(owner).make_public = true;
                }
            }
        }
        match self.adapter.classify_attribute(&attr, ctx) {
            Err(e) => {
                let line = self.line_of(attr_id);
                self.plan
                    .fail(AnalysisStage::Attributes, e.to_string(), attr.code(), line);
            }
            Ok(None) => {}
            Ok(Some(AttributeDisposition::Remove)) => {
                if let Some(tag) = self.tag_origin(attr_id) {
                    self.plan.attribute_removals.push(tag);
                }
            }
            Ok(Some(AttributeDisposition::Convert { name, args, additional })) => {
                if let Some(tag) = self.tag_origin(attr_id) {
                    self.plan.attributes.push(AttributeConversion {
                        tag,
                        name,
                        args,
                        additional,
                    });
                }
            }
        }
    }

    fn parameter_attributes(&mut self, ctx: &ClassContext) -> Result<(), MigrateError> {
        let tree = &self.doc.tree;
        let mut params: Vec<NodeId> = Vec::new();
        for class in tree.classes() {
            for method in tree.methods_of(class) {
                params.extend(tree.params_of(method));
            }
        }
        for param_id in params {
            let Some(param) = self.doc.tree.parameter(param_id).cloned() else {
                continue;
            };
            for attr_id in self.doc.tree.attributes_of(param_id) {
                self.check_cancel()?;
                let Some(attr) = self.doc.tree.attribute(attr_id).cloned() else {
                    continue;
                };
                let disposition = match self
                    .adapter
                    .classify_parameter_attribute(&attr, &param)
                {
                    Some(d) => Some(d),
                    // Parameter attributes shared with the method table,
                    // e.g. NUnit `[Values]`.
                    None => match self.adapter.classify_attribute(&attr, ctx) {
                        Ok(d) => d,
                        Err(e) => {
                            let line = self.line_of(attr_id);
                            self.plan.fail(
                                AnalysisStage::ParameterAttributes,
                                e.to_string(),
                                attr.code(),
                                line,
                            );
                            continue;
                        }
                    },
                };
                match disposition {
                    None => {}
                    Some(AttributeDisposition::Remove) => {
                        if let Some(tag) = self.tag_origin(attr_id) {
                            self.plan.attribute_removals.push(tag);
                        }
                    }
                    Some(AttributeDisposition::Convert { name, args, additional }) => {
                        if let Some(tag) = self.tag_origin(attr_id) {
                            self.plan.parameter_attributes.push(AttributeConversion {
                                tag,
                                name,
                                args,
                                additional,
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Stage 4: missing test attributes
    // ------------------------------------------------------------------

    fn missing_test_attributes(&mut self) -> Result<(), MigrateError> {
        let tree = &self.doc.tree;
        let mut additions = Vec::new();
        for class in tree.classes() {
            for method in tree.methods_of(class) {
                self.check_cancel()?;
                let names: Vec<SmolStr> = tree
                    .attributes_of(method)
                    .iter()
                    .filter_map(|&a| tree.attribute(a))
                    .map(|a| a.name.clone())
                    .collect();
                let implies = names.iter().any(|n| self.adapter.implies_test_marker(n));
                let marked = names.iter().any(|n| self.adapter.is_test_marker(n));
                if implies && !marked {
                    additions.push(method);
                }
            }
        }
        for method in additions {
            if let Some(tag) = self.tag_origin(method) {
                self.plan
                    .method_attribute_additions
                    .push(MethodAttributeAddition {
                        tag,
                        attribute: "Test".to_string(),
                        new_return_type: None,
                    });
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Stage 5: base types and the lifecycle cascade
    // ------------------------------------------------------------------

    /// Classify → role token → dispatch. A class counts as a test class
    /// when any method carries (or implies) a test marker.
    fn class_role(&self, class: NodeId) -> ClassRole {
        let tree = &self.doc.tree;
        let is_test = tree.methods_of(class).iter().any(|&m| {
            tree.attributes_of(m).iter().any(|&a| {
                tree.attribute(a).is_some_and(|attr| {
                    self.adapter.is_test_marker(&attr.name)
                        || self.adapter.implies_test_marker(&attr.name)
                })
            })
        });
        if is_test {
            ClassRole::TestClass
        } else {
            ClassRole::PlainClass
        }
    }

    fn base_types(&mut self) -> Result<(), MigrateError> {
        let tree = &self.doc.tree;
        let classes = tree.classes();
        for class in classes {
            let role = self.class_role(class);
            for base_id in self.doc.tree.base_types_of(class) {
                self.check_cancel()?;
                let Some(base) = self.doc.tree.base_type(base_id).cloned() else {
                    continue;
                };
                match self.adapter.classify_base_type(&base, role) {
                    BaseTypeDisposition::Keep => {}
                    BaseTypeDisposition::Remove => {
                        if let Some(tag) = self.tag_origin(base_id) {
                            self.plan.base_type_removals.push(tag);
                        }
                    }
                    BaseTypeDisposition::RemoveAddingClassAttribute(attribute) => {
                        if let Some(tag) = self.tag_origin(base_id) {
                            self.plan.base_type_removals.push(tag);
                        }
                        if let Some(tag) = self.tag_origin(class) {
                            self.plan
                                .class_attribute_additions
                                .push(ClassAttributeAddition { tag, attribute });
                        }
                    }
                    BaseTypeDisposition::RemoveRewritingLifecycle(lifecycle) => {
                        if let Some(tag) = self.tag_origin(base_id) {
                            self.plan.base_type_removals.push(tag);
                        }
                        for (method_name, hook) in &lifecycle.method_hooks {
                            let Some(method) = self.find_method(class, method_name) else {
                                continue;
                            };
                            if let Some(tag) = self.tag_origin(method) {
                                self.plan
                                    .method_attribute_additions
                                    .push(MethodAttributeAddition {
                                        tag,
                                        attribute: hook.clone(),
                                        new_return_type: None,
                                    });
                            }
                        }
                        for text in &lifecycle.base_additions {
                            if let Some(tag) = self.tag_origin(class) {
                                self.plan.base_type_additions.push(BaseTypeAddition {
                                    tag,
                                    text: text.clone(),
                                });
                            }
                        }
                        for method_name in &lifecycle.method_retypes {
                            if let Some(method) = self.find_method(class, method_name) {
                                self.sig_delta(method).retype_value_task = true;
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn find_method(&self, class: NodeId, name: &str) -> Option<NodeId> {
        let tree = &self.doc.tree;
        tree.methods_of(class)
            .into_iter()
            .find(|&m| tree.method(m).is_some_and(|decl| decl.name == name))
    }

    // ------------------------------------------------------------------
    // Stages 6-7: members and constructor parameters
    // ------------------------------------------------------------------

    fn members(&mut self) -> Result<(), MigrateError> {
        let tree = &self.doc.tree;
        let mut removals = Vec::new();
        for class in tree.classes() {
            for member in tree.fields_and_properties_of(class) {
                self.check_cancel()?;
                let ty = match tree.kind(member) {
                    NodeKind::Field(f) => &f.ty,
                    NodeKind::Property(p) => &p.ty,
                    _ => continue,
                };
                if self.adapter.removes_member_of_type(ty) {
                    removals.push(member);
                }
            }
        }
        for member in removals {
            if let Some(tag) = self.tag_origin(member) {
                self.plan.member_removals.push(tag);
            }
        }
        Ok(())
    }

    fn constructor_parameters(&mut self) -> Result<(), MigrateError> {
        let tree = &self.doc.tree;
        let mut param_removals = Vec::new();
        let mut stmt_removals = Vec::new();
        for class in tree.classes() {
            for ctor in tree.ctors_of(class) {
                for param_id in tree.params_of(ctor) {
                    self.check_cancel()?;
                    let Some(param) = tree.parameter(param_id) else {
                        continue;
                    };
                    if !self.adapter.removes_member_of_type(&param.ty) {
                        continue;
                    }
                    param_removals.push(param_id);
                    // Assignments that stored the removed parameter go too.
                    let suffix = format!("= {};", param.name);
                    for stmt_id in tree.statements_of(ctor) {
                        let Some(stmt) = tree.statement(stmt_id) else {
                            continue;
                        };
                        if stmt.text().trim_end().ends_with(&suffix) {
                            stmt_removals.push(stmt_id);
                        }
                    }
                }
            }
        }
        for id in param_removals {
            if let Some(tag) = self.tag_origin(id) {
                self.plan.ctor_param_removals.push(tag);
            }
        }
        for id in stmt_removals {
            if let Some(tag) = self.tag_origin(id) {
                self.plan.member_removals.push(tag);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Stage 8: typed data tables
    // ------------------------------------------------------------------

    fn data_tables(&mut self) -> Result<(), MigrateError> {
        let tree = &self.doc.tree;
        let mut rewrites = Vec::new();
        for class in tree.classes() {
            for member in tree.fields_and_properties_of(class) {
                self.check_cancel()?;
                let (ty, init) = match tree.kind(member) {
                    NodeKind::Field(f) => (&f.ty, f.initializer.as_deref()),
                    NodeKind::Property(p) => (&p.ty, p.initializer.as_deref()),
                    _ => continue,
                };
                if let Some(rw) = self.adapter.classify_data_table(ty, init) {
                    rewrites.push((member, rw));
                }
            }
        }
        for (member, rw) in rewrites {
            if let Some(tag) = self.tag_origin(member) {
                self.plan.data_tables.push(DataTableConversion {
                    tag,
                    new_type: rw.new_type,
                    new_initializer: rw.new_initializer,
                });
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Stage 9: method signatures
    // ------------------------------------------------------------------

    fn method_signatures(&mut self) -> Result<(), MigrateError> {
        let mut pending: Vec<(NodeId, SigDelta)> =
            self.signatures.drain().collect();
        // deterministic plan order regardless of hash-map iteration
        pending.sort_by_key(|(id, _)| *id);
        for (method_id, delta) in pending {
            self.check_cancel()?;
            let Some(method) = self.doc.tree.method(method_id).cloned() else {
                continue;
            };
            let add_async = delta.add_async && !method.is_async();
            let return_change = if delta.retype_value_task
                && type_head(&method.return_type) == "ValueTask"
            {
                ReturnChange::ValueTaskToTask
            } else if add_async && method.return_type == "void" {
                ReturnChange::VoidToTask
            } else {
                ReturnChange::None
            };
            let make_public = delta.make_public && !method.is_public();
            if !add_async && return_change == ReturnChange::None && !make_public {
                continue;
            }
            if let Some(tag) = self.tag_origin(method_id) {
                self.plan.method_signatures.push(MethodSignatureChange {
                    tag,
                    add_async,
                    return_change,
                    make_public,
                });
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Stage 10: namespace imports
    // ------------------------------------------------------------------

    fn usings(&mut self) {
        if self.plan.conversion_count() == 0 {
            return;
        }
        for prefix in self.adapter.using_prefixes_to_remove() {
            self.plan
                .using_prefixes_to_remove
                .push(SmolStr::new(*prefix));
        }
        if !self.plan.assertions.is_empty() {
            self.plan.add_using("TUnit.Assertions");
            self.plan.add_using("TUnit.Assertions.Extensions");
        }
        let attribute_work = self.plan.attributes.len()
            + self.plan.parameter_attributes.len()
            + self.plan.method_attribute_additions.len()
            + self.plan.class_attribute_additions.len();
        if attribute_work > 0 {
            self.plan.add_using("TUnit.Core");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::plan::AssertionKind;
    use crate::semantic::{adapter_for, MapResolver, NullResolver, SourceFramework};

    fn analyze_with(
        source: &str,
        framework: SourceFramework,
        resolver: &dyn SymbolResolver,
    ) -> Analysis {
        let doc = parse(source);
        analyze(
            &doc,
            adapter_for(framework),
            resolver,
            &CancellationToken::new(),
        )
        .unwrap()
    }

    fn analyze_xunit(source: &str) -> Analysis {
        analyze_with(source, SourceFramework::XUnit, &NullResolver)
    }

    #[test]
    fn equality_with_message_is_one_conversion() {
        let analysis = analyze_with(
            "using Microsoft.VisualStudio.TestTools.UnitTesting;\n\npublic class T\n{\n    [TestMethod]\n    public void M()\n    {\n        Assert.AreEqual(42, result, \"the answer\");\n    }\n}\n",
            SourceFramework::MsTest,
            &NullResolver,
        );
        assert_eq!(analysis.plan.assertions.len(), 1);
        let c = &analysis.plan.assertions[0];
        assert_eq!(c.kind, AssertionKind::Equality);
        assert!(c.introduces_await);
        assert!(c.replacement.contains("result"));
        assert!(c.replacement.contains("\"the answer\""));
    }

    #[test]
    fn malformed_candidate_is_recorded_not_fatal() {
        let analysis = analyze_xunit(
            "using Xunit;\n\npublic class T\n{\n    [Fact]\n    public void M()\n    {\n        Assert.Equal(1, 1);\n        Assert.Equal(1);\n    }\n}\n",
        );
        assert_eq!(analysis.plan.assertions.len(), 1);
        assert_eq!(analysis.plan.failures.len(), 1);
        assert_eq!(analysis.plan.failures[0].stage, AnalysisStage::Assertions);
        assert!(analysis.plan.failures[0].line > 0);
    }

    #[test]
    fn resolved_foreign_receiver_is_skipped() {
        let source = "using Xunit;\n\npublic class T\n{\n    [Fact]\n    public void M()\n    {\n        Assert.Equal(1, 2);\n    }\n}\n";
        let foreign = MapResolver::new().with_type("Assert", "MyApp.Assert");
        let analysis = analyze_with(source, SourceFramework::XUnit, &foreign);
        assert!(analysis.plan.assertions.is_empty());

        // unresolved: fail-open, still converted
        let analysis = analyze_with(source, SourceFramework::XUnit, &NullResolver);
        assert_eq!(analysis.plan.assertions.len(), 1);
    }

    #[test]
    fn await_introduction_cascades_to_method_signature() {
        let analysis = analyze_xunit(
            "using Xunit;\n\npublic class T\n{\n    [Fact]\n    public void M()\n    {\n        Assert.Equal(1, 1);\n    }\n}\n",
        );
        assert_eq!(analysis.plan.method_signatures.len(), 1);
        let sig = &analysis.plan.method_signatures[0];
        assert!(sig.add_async);
        assert_eq!(sig.return_change, ReturnChange::VoidToTask);
    }

    #[test]
    fn by_ref_parameter_downgrades_await() {
        let analysis = analyze_xunit(
            "using Xunit;\n\npublic class T\n{\n    public void M(out int x)\n    {\n        x = 1;\n        Assert.Equal(1, x);\n    }\n}\n",
        );
        let c = &analysis.plan.assertions[0];
        assert!(!c.introduces_await);
        assert!(c.replacement.ends_with(".Wait()"));
        assert!(analysis.plan.method_signatures.is_empty());
    }

    #[test]
    fn lifecycle_cascade_depends_on_test_markers() {
        // test class: hooks on the lifecycle methods
        let analysis = analyze_xunit(
            "using Xunit;\n\npublic class T : IAsyncLifetime\n{\n    [Fact]\n    public void M()\n    {\n    }\n\n    public Task InitializeAsync()\n    {\n        return Task.CompletedTask;\n    }\n\n    public Task DisposeAsync()\n    {\n        return Task.CompletedTask;\n    }\n}\n",
        );
        assert_eq!(analysis.plan.base_type_removals.len(), 1);
        let hooks: Vec<&str> = analysis
            .plan
            .method_attribute_additions
            .iter()
            .map(|a| a.attribute.as_str())
            .collect();
        assert_eq!(hooks, vec!["Before(Test)", "After(Test)"]);

        // plain helper class: substitute interfaces instead
        let analysis = analyze_xunit(
            "using Xunit;\n\npublic class Fixture : IAsyncLifetime\n{\n    public ValueTask InitializeAsync()\n    {\n        return ValueTask.CompletedTask;\n    }\n}\n",
        );
        assert_eq!(analysis.plan.base_type_additions.len(), 2);
        assert!(analysis.plan.method_attribute_additions.is_empty());
        assert_eq!(analysis.plan.method_signatures.len(), 1);
        assert_eq!(
            analysis.plan.method_signatures[0].return_change,
            ReturnChange::ValueTaskToTask
        );
    }

    #[test]
    fn output_helper_plumbing_is_removed() {
        let analysis = analyze_xunit(
            "using Xunit;\nusing Xunit.Abstractions;\n\npublic class T\n{\n    private readonly ITestOutputHelper _outputHelper;\n\n    public T(ITestOutputHelper outputHelper)\n    {\n        _outputHelper = outputHelper;\n    }\n\n    [Fact]\n    public void M()\n    {\n        _outputHelper.WriteLine(\"hi\");\n    }\n}\n",
        );
        assert_eq!(analysis.plan.invocation_replacements.len(), 1);
        assert_eq!(analysis.plan.ctor_param_removals.len(), 1);
        // field plus the `_output = output;` assignment
        assert_eq!(analysis.plan.member_removals.len(), 2);
    }

    #[test]
    fn nunit_test_case_without_test_gains_marker() {
        let analysis = analyze_with(
            "using NUnit.Framework;\n\npublic class T\n{\n    [TestCase(1)]\n    public void M(int x)\n    {\n    }\n}\n",
            SourceFramework::NUnit,
            &NullResolver,
        );
        assert_eq!(analysis.plan.method_attribute_additions.len(), 1);
        assert_eq!(analysis.plan.method_attribute_additions[0].attribute, "Test");
    }

    #[test]
    fn nunit_private_setup_is_made_public() {
        let analysis = analyze_with(
            "using NUnit.Framework;\n\npublic class T\n{\n    [SetUp]\n    private void Init()\n    {\n    }\n\n    [Test]\n    public void M()\n    {\n    }\n}\n",
            SourceFramework::NUnit,
            &NullResolver,
        );
        let sig = analysis
            .plan
            .method_signatures
            .iter()
            .find(|s| s.make_public)
            .expect("make-public signature change");
        assert!(!sig.add_async);
    }

    #[test]
    fn cancellation_aborts_between_candidates() {
        let doc = parse(
            "using Xunit;\n\npublic class T\n{\n    [Fact]\n    public void M()\n    {\n        Assert.Equal(1, 1);\n    }\n}\n",
        );
        let token = CancellationToken::new();
        token.cancel();
        let err = analyze(
            &doc,
            adapter_for(SourceFramework::XUnit),
            &NullResolver,
            &token,
        )
        .unwrap_err();
        assert_eq!(err, MigrateError::Cancelled);
    }

    #[test]
    fn usings_are_planned_only_when_something_converted() {
        let analysis = analyze_xunit("public class Untouched\n{\n}\n");
        assert!(analysis.plan.usings_to_add.is_empty());
        assert!(analysis.plan.using_prefixes_to_remove.is_empty());

        let analysis = analyze_xunit(
            "using Xunit;\n\npublic class T\n{\n    [Fact]\n    public void M()\n    {\n        Assert.NotNull(this);\n    }\n}\n",
        );
        assert!(analysis.plan.usings_to_add.contains("TUnit.Assertions"));
        assert!(analysis.plan.usings_to_add.contains("TUnit.Core"));
        assert_eq!(analysis.plan.using_prefixes_to_remove, vec!["Xunit"]);
    }
}
