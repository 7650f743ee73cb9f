//! Shared rewrite-building helpers for the framework adapters.

use crate::plan::AssertionKind;
use crate::syntax::ast::{CallArg, CallExpr};
use crate::syntax::scan;

use super::{AssertionRewrite, ClassifyError};

/// `await Assert.That({subject}){rest}`.
pub(crate) fn that(subject: &str, rest: &str) -> String {
    format!("await Assert.That({subject}){rest}")
}

/// An awaited fluent rewrite.
pub(crate) fn fluent(kind: AssertionKind, replacement: String) -> AssertionRewrite {
    AssertionRewrite {
        kind,
        replacement,
        introduces_await: true,
        todo: None,
    }
}

pub(crate) fn fluent_todo(
    kind: AssertionKind,
    replacement: String,
    todo: impl Into<String>,
) -> AssertionRewrite {
    AssertionRewrite {
        kind,
        replacement,
        introduces_await: true,
        todo: Some(todo.into()),
    }
}

/// A rewrite that does not await.
pub(crate) fn plain(kind: AssertionKind, replacement: impl Into<String>) -> AssertionRewrite {
    AssertionRewrite {
        kind,
        replacement: replacement.into(),
        introduces_await: false,
        todo: None,
    }
}

pub(crate) fn with_because(assertion: String, message: Option<&str>) -> String {
    match message {
        Some(m) => format!("{assertion}.Because({m})"),
        None => assertion,
    }
}

/// Minimum-arity check; failures become recorded conversion failures
/// rather than silent skips.
pub(crate) fn need_args(call: &CallExpr, n: usize) -> Result<(), ClassifyError> {
    if call.args.len() < n {
        Err(ClassifyError::malformed(format!(
            "{} expects at least {n} argument(s), found {}",
            call.method,
            call.args.len()
        )))
    } else {
        Ok(())
    }
}

/// Original argument-list text of a call, parentheses excluded.
pub(crate) fn call_args_text(call: &CallExpr) -> String {
    if let Some(open) = call.text.find('(') {
        if let Some(close) = scan::matching_bracket(&call.text, open) {
            return call.text[open + 1..close - 1].to_string();
        }
    }
    call.args
        .iter()
        .map(render_arg)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_arg(arg: &CallArg) -> String {
    match &arg.name {
        Some(n) => format!("{n}: {}", arg.value),
        None => arg.value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_call_expression;

    #[test]
    fn because_is_optional() {
        let a = that("x", ".IsTrue()");
        assert_eq!(
            with_because(a.clone(), Some("\"why\"")),
            "await Assert.That(x).IsTrue().Because(\"why\")"
        );
        assert_eq!(with_because(a, None), "await Assert.That(x).IsTrue()");
    }

    #[test]
    fn args_text_preserves_original_spelling() {
        let call = parse_call_expression("_output.WriteLine($\"got {x}\", 1)").unwrap();
        assert_eq!(call_args_text(&call), "$\"got {x}\", 1");
    }
}
