//! Phase 2: applying a frozen [`ConversionPlan`] to the working tree.
//!
//! Pure syntax, no classification. Every edit locates its node through
//! `current(tag)`; a tag whose node an earlier edit removed is skipped
//! silently, since the plan may legally contain conversions shadowed by a
//! removal. The apply order is fixed so that structural expansions happen
//! before statement replacements and removals happen last.

use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::plan::{AnalysisStage, ArgsChange, ConversionFailure, ConversionPlan, ReturnChange};
use crate::syntax::ast::{AttributeSpec, BaseTypeRef, NodeKind, Statement, StmtKind, UsingDirective};
use crate::syntax::tree::{NodeId, SyntaxTree};

const INDENT: &str = "    ";

pub fn transform(work: &mut SyntaxTree, plan: &ConversionPlan) {
    let mut t = Transformer { work };
    t.record_exceptions(plan);
    t.invocation_replacements(plan);
    t.data_tables(plan);
    t.assertions(plan);
    t.method_signatures(plan);
    t.method_attribute_additions(plan);
    t.attribute_conversions(&plan.attributes);
    t.attribute_conversions(&plan.parameter_attributes);
    t.removals(&plan.attribute_removals);
    t.removals(&plan.base_type_removals);
    t.base_type_additions(plan);
    t.class_attribute_additions(plan);
    t.removals(&plan.member_removals);
    t.removals(&plan.ctor_param_removals);
    t.rewrite_usings(plan);
    t.failure_banner(&plan.failures);
    debug!("[TRANSFORM] {} conversion(s) applied", plan.conversion_count());
}

struct Transformer<'a> {
    work: &'a mut SyntaxTree,
}

impl<'a> Transformer<'a> {
    fn record_exceptions(&mut self, plan: &ConversionPlan) {
        for conv in &plan.record_exceptions {
            let Some(id) = self.work.current(conv.tag) else {
                continue;
            };
            let Some(stmt) = self.work.statement(id).cloned() else {
                continue;
            };
            let outer = stmt.indent.clone();
            let inner = format!("{outer}{INDENT}");
            let body = lambda_body(&conv.action);
            let raw = |indent: &str, text: String| {
                NodeKind::Statement(Statement::raw(indent, text))
            };
            let kinds = vec![
                raw(&outer, format!("Exception {} = null;", conv.variable)),
                raw(&outer, "try".to_string()),
                raw(&outer, "{".to_string()),
                raw(&inner, body),
                raw(&outer, "}".to_string()),
                raw(&outer, "catch (Exception exception)".to_string()),
                raw(&outer, "{".to_string()),
                raw(&inner, format!("{} = exception;", conv.variable)),
                raw(&outer, "}".to_string()),
            ];
            trace!("[TRANSFORM] expanding exception capture '{}'", conv.variable);
            self.work.replace_with_many(id, kinds);
        }
    }

    fn invocation_replacements(&mut self, plan: &ConversionPlan) {
        for conv in &plan.invocation_replacements {
            let Some(id) = self.work.current(conv.tag) else {
                continue;
            };
            let Some(stmt) = self.work.statement(id).cloned() else {
                continue;
            };
            self.work.replace_kind(
                id,
                NodeKind::Statement(Statement {
                    indent: stmt.indent,
                    comments: stmt.comments,
                    kind: StmtKind::Raw(format!("{};", conv.replacement)),
                }),
            );
        }
    }

    fn data_tables(&mut self, plan: &ConversionPlan) {
        for conv in &plan.data_tables {
            let Some(id) = self.work.current(conv.tag) else {
                continue;
            };
            let kind = match self.work.kind(id) {
                NodeKind::Field(f) => {
                    let mut f = f.clone();
                    f.ty = conv.new_type.clone();
                    f.initializer = conv.new_initializer.clone();
                    NodeKind::Field(f)
                }
                NodeKind::Property(p) => {
                    let mut p = p.clone();
                    p.ty = conv.new_type.clone();
                    p.initializer = conv.new_initializer.clone();
                    NodeKind::Property(p)
                }
                _ => continue,
            };
            self.work.replace_kind(id, kind);
        }
    }

    fn assertions(&mut self, plan: &ConversionPlan) {
        for conv in &plan.assertions {
            let Some(id) = self.work.current(conv.tag) else {
                continue;
            };
            let Some(stmt) = self.work.statement(id).cloned() else {
                continue;
            };
            let mut comments = stmt.comments;
            if let Some(todo) = &conv.todo {
                // adapter todo notes are complete comment lines already
                comments.push(todo.clone());
            }
            self.work.replace_kind(
                id,
                NodeKind::Statement(Statement {
                    indent: stmt.indent,
                    comments,
                    kind: StmtKind::Raw(format!("{};", conv.replacement)),
                }),
            );
        }
    }

    fn method_signatures(&mut self, plan: &ConversionPlan) {
        for conv in &plan.method_signatures {
            let Some(id) = self.work.current(conv.tag) else {
                continue;
            };
            let Some(method) = self.work.method(id) else {
                continue;
            };
            let mut method = method.clone();
            if conv.make_public {
                method
                    .modifiers
                    .retain(|m| m != "private" && m != "protected" && m != "internal");
                if !method.modifiers.iter().any(|m| m == "public") {
                    method.modifiers.insert(0, SmolStr::new("public"));
                }
            }
            if conv.add_async && !method.is_async() {
                method.modifiers.push(SmolStr::new("async"));
            }
            match conv.return_change {
                ReturnChange::None => {}
                ReturnChange::VoidToTask => method.return_type = "Task".to_string(),
                ReturnChange::ValueTaskToTask => {
                    if let Some(rest) = method.return_type.strip_prefix("ValueTask") {
                        method.return_type = format!("Task{rest}");
                    }
                }
            }
            self.work.replace_kind(id, NodeKind::Method(method));
        }
    }

    fn method_attribute_additions(&mut self, plan: &ConversionPlan) {
        for conv in &plan.method_attribute_additions {
            let Some(id) = self.work.current(conv.tag) else {
                continue;
            };
            let attr = self.work.alloc(NodeKind::Attribute(parse_attribute(&conv.attribute)));
            self.work.insert_child(id, 0, attr);
            if let Some(rt) = &conv.new_return_type {
                if let Some(method) = self.work.method(id) {
                    let mut method = method.clone();
                    method.return_type = rt.clone();
                    self.work.replace_kind(id, NodeKind::Method(method));
                }
            }
        }
    }

    fn attribute_conversions(&mut self, convs: &[crate::plan::AttributeConversion]) {
        for conv in convs {
            let Some(id) = self.work.current(conv.tag) else {
                continue;
            };
            let Some(old) = self.work.attribute(id).cloned() else {
                continue;
            };
            let args = match &conv.args {
                ArgsChange::Keep => old.args,
                ArgsChange::Remove => None,
                ArgsChange::Replace(a) => Some(a.clone()),
            };
            let new_id = self
                .work
                .replace_kind(id, NodeKind::Attribute(AttributeSpec::new(conv.name.clone(), args)));
            // extra attributes go right after the converted one
            if let Some(parent) = self.work.parent(new_id) {
                if let Some(pos) = self.work.child_index(parent, new_id) {
                    for (i, extra) in conv.additional.iter().enumerate() {
                        let sibling = self.work.alloc(NodeKind::Attribute(parse_attribute(extra)));
                        self.work.insert_child(parent, pos + 1 + i, sibling);
                    }
                }
            }
        }
    }

    fn removals(&mut self, tags: &[crate::base::Tag]) {
        for &tag in tags {
            if let Some(id) = self.work.current(tag) {
                trace!("[TRANSFORM] removing node for {}", tag);
                self.work.detach(id);
            }
        }
    }

    fn base_type_additions(&mut self, plan: &ConversionPlan) {
        for conv in &plan.base_type_additions {
            let Some(class) = self.work.current(conv.tag) else {
                continue;
            };
            let base = self.work.alloc(NodeKind::BaseType(BaseTypeRef {
                text: conv.text.clone(),
            }));
            self.work.push_child(class, base);
        }
    }

    fn class_attribute_additions(&mut self, plan: &ConversionPlan) {
        for conv in &plan.class_attribute_additions {
            let Some(class) = self.work.current(conv.tag) else {
                continue;
            };
            let attr = self.work.alloc(NodeKind::Attribute(parse_attribute(&conv.attribute)));
            self.work.insert_child(class, 0, attr);
        }
    }

    fn rewrite_usings(&mut self, plan: &ConversionPlan) {
        if plan.using_prefixes_to_remove.is_empty() && plan.usings_to_add.is_empty() {
            return;
        }
        let mut all: Vec<NodeId> = self.work.usings();
        let root = self.work.root();
        for &child in self.work.children(root) {
            if matches!(self.work.kind(child), NodeKind::Namespace(_)) {
                all.extend(
                    self.work
                        .children(child)
                        .iter()
                        .copied()
                        .filter(|&c| matches!(self.work.kind(c), NodeKind::Using(_)))
                        .collect::<Vec<_>>(),
                );
            }
        }
        let mut kept_paths: Vec<SmolStr> = Vec::new();
        for id in all {
            let Some(u) = self.work.using(id).cloned() else {
                continue;
            };
            let remove = plan
                .using_prefixes_to_remove
                .iter()
                .any(|p| path_matches_prefix(&u.path, p));
            if remove {
                trace!("[TRANSFORM] dropping using {}", u.path);
                self.work.detach(id);
            } else {
                kept_paths.push(u.path);
            }
        }
        // new namespaces go after the surviving root-level usings
        let mut at = self
            .work
            .children(root)
            .iter()
            .rposition(|&c| matches!(self.work.kind(c), NodeKind::Using(_)))
            .map(|p| p + 1)
            .unwrap_or(0);
        for ns in &plan.usings_to_add {
            if kept_paths.iter().any(|p| p == ns) {
                continue;
            }
            let using = self.work.alloc(NodeKind::Using(UsingDirective {
                path: ns.clone(),
                is_static: false,
            }));
            self.work.insert_child(root, at, using);
            at += 1;
        }
    }

    fn failure_banner(&mut self, failures: &[ConversionFailure]) {
        if failures.is_empty() {
            return;
        }
        let root = self.work.root();
        self.work.push_leading(
            root,
            format!(
                "// {} construct(s) could not be converted automatically:",
                failures.len()
            ),
        );
        let mut stages: Vec<AnalysisStage> = Vec::new();
        for f in failures {
            if !stages.contains(&f.stage) {
                stages.push(f.stage);
            }
        }
        for stage in stages {
            for f in failures.iter().filter(|f| f.stage == stage) {
                self.work.push_leading(
                    root,
                    format!("//   [{}] line {}: {}", f.stage, f.line, f.description),
                );
            }
        }
    }
}

/// `[Name(args)]` body text into an [`AttributeSpec`].
fn parse_attribute(text: &str) -> AttributeSpec {
    match text.find('(') {
        Some(open) if text.ends_with(')') => AttributeSpec::new(
            SmolStr::new(&text[..open]),
            Some(text[open + 1..text.len() - 1].to_string()),
        ),
        _ => AttributeSpec::bare(text),
    }
}

/// Statement form of a `Record.Exception`-style action argument. Lambdas
/// contribute their body; method groups become a call.
fn lambda_body(action: &str) -> String {
    match action.split_once("=>") {
        Some((_, body)) => format!("{};", body.trim()),
        None => format!("{}();", action.trim()),
    }
}

fn path_matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_text_splits_name_and_args() {
        let a = parse_attribute("Before(Test)");
        assert_eq!(a.name, "Before");
        assert_eq!(a.args.as_deref(), Some("Test"));

        let a = parse_attribute("Test");
        assert_eq!(a.name, "Test");
        assert_eq!(a.args, None);
    }

    #[test]
    fn lambda_actions_unwrap_to_their_body() {
        assert_eq!(lambda_body("() => Do(1, 2)"), "Do(1, 2);");
        assert_eq!(lambda_body("Cleanup"), "Cleanup();");
    }

    #[test]
    fn using_prefix_respects_segment_boundaries() {
        assert!(path_matches_prefix("Xunit", "Xunit"));
        assert!(path_matches_prefix("Xunit.Abstractions", "Xunit"));
        assert!(!path_matches_prefix("XunitExtras", "Xunit"));
        assert!(!path_matches_prefix("MyXunit", "Xunit"));
    }
}
