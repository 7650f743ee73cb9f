//! Constraint-model translation for `Assert.That(actual, Is.*)`.
//!
//! Constraints are matched textually against the common `Is.*`, `Does.*`,
//! `Has.*` and `Contains.*` spellings. Anything outside the table is left
//! in place with a manual-conversion note.

use crate::plan::AssertionKind;
use crate::syntax::scan;

/// Fluent suffix for one constraint expression, e.g. `Is.EqualTo(5)`
/// becomes `.IsEqualTo(5)`. `None` when the constraint is not in the table.
pub(super) fn constraint_suffix(text: &str) -> Option<(AssertionKind, String)> {
    let text = text.trim();

    // `.Within(delta)` chains onto the inner constraint's result.
    if let Some((inner, delta)) = split_within(text) {
        let (kind, suffix) = constraint_suffix(inner)?;
        return Some((kind, format!("{suffix}.Within({delta})")));
    }

    if let Some(mapped) = property_constraint(text) {
        return Some(mapped);
    }

    let (name, inner, rest) = split_call(text)?;
    call_constraint(name, inner, rest)
}

/// Bare property constraints with no argument list.
fn property_constraint(text: &str) -> Option<(AssertionKind, String)> {
    use AssertionKind::*;
    let suffix = match text {
        "Is.True" => (Boolean, ".IsTrue()"),
        "Is.False" => (Boolean, ".IsFalse()"),
        "Is.Null" => (Nullity, ".IsNull()"),
        "Is.Not.Null" => (Nullity, ".IsNotNull()"),
        "Is.Empty" => (Collection, ".IsEmpty()"),
        "Is.Not.Empty" => (Collection, ".IsNotEmpty()"),
        "Is.Positive" => (Comparison, ".IsPositive()"),
        "Is.Negative" => (Comparison, ".IsNegative()"),
        "Is.Zero" => (Comparison, ".IsZero()"),
        "Is.Not.Zero" => (Comparison, ".IsNotZero()"),
        "Is.Not.Positive" => (Comparison, ".IsLessThanOrEqualTo(0)"),
        "Is.Not.Negative" => (Comparison, ".IsGreaterThanOrEqualTo(0)"),
        "Is.NaN" => (Comparison, ".IsNaN()"),
        "Is.Not.NaN" => (Comparison, ".IsNotNaN()"),
        "Is.Ordered" | "Is.Ordered.Ascending" => (Collection, ".IsInOrder()"),
        "Is.Ordered.Descending" => (Collection, ".IsInDescendingOrder()"),
        "Is.Unique" => (Collection, ".HasDistinctItems()"),
        _ => return None,
    };
    Some((suffix.0, suffix.1.to_string()))
}

fn call_constraint(name: &str, inner: &str, rest: &str) -> Option<(AssertionKind, String)> {
    use AssertionKind::*;

    // `Has.Exactly(n).Items`
    if name == "Has.Exactly" && rest == ".Items" {
        return Some((Collection, format!(".Count().IsEqualTo({inner})")));
    }
    if !rest.is_empty() {
        return None;
    }

    // Generic type constraints keep their type argument.
    let (head, generic) = match name.find('<') {
        Some(lt) => (&name[..lt], Some(&name[lt..])),
        None => (name, None),
    };
    if let Some(g) = generic {
        let mapped = match head {
            "Is.InstanceOf" | "Is.AssignableTo" => "IsAssignableTo",
            "Is.TypeOf" => "IsTypeOf",
            "Is.Not.InstanceOf" => "IsNotAssignableTo",
            "Is.Not.TypeOf" => "IsNotTypeOf",
            _ => return None,
        };
        return Some((TypeCheck, format!(".{mapped}{g}()")));
    }
    if head == "Is.InstanceOf" {
        return Some((TypeCheck, format!(".IsAssignableTo({inner})")));
    }

    if name == "Has.Count.EqualTo" {
        return Some((Collection, format!(".Count().IsEqualTo({inner})")));
    }

    let (kind, mapped) = match name {
        "Is.EqualTo" => (Equality, "IsEqualTo"),
        "Is.Not.EqualTo" => (Equality, "IsNotEqualTo"),
        "Is.SameAs" => (Reference, "IsSameReferenceAs"),
        "Is.Not.SameAs" => (Reference, "IsNotSameReferenceAs"),
        "Is.GreaterThan" => (Comparison, "IsGreaterThan"),
        "Is.GreaterThanOrEqualTo" => (Comparison, "IsGreaterThanOrEqualTo"),
        "Is.LessThan" => (Comparison, "IsLessThan"),
        "Is.LessThanOrEqualTo" => (Comparison, "IsLessThanOrEqualTo"),
        "Is.Not.GreaterThan" => (Comparison, "IsLessThanOrEqualTo"),
        "Is.Not.LessThan" => (Comparison, "IsGreaterThanOrEqualTo"),
        "Is.Not.GreaterThanOrEqualTo" => (Comparison, "IsLessThan"),
        "Is.Not.LessThanOrEqualTo" => (Comparison, "IsGreaterThan"),
        "Does.StartWith" => (StringOp, "StartsWith"),
        "Does.EndWith" => (StringOp, "EndsWith"),
        "Does.Contain" => (StringOp, "Contains"),
        "Does.Not.StartWith" => (StringOp, "DoesNotStartWith"),
        "Does.Not.EndWith" => (StringOp, "DoesNotEndWith"),
        "Does.Not.Contain" => (StringOp, "DoesNotContain"),
        "Does.Match" => (StringOp, "Matches"),
        "Does.Not.Match" => (StringOp, "DoesNotMatch"),
        "Has.Member" | "Contains.Item" => (Collection, "Contains"),
        _ => return None,
    };
    Some((kind, format!(".{mapped}({inner})")))
}

/// `inner.Within(delta)` at the top level of the expression.
fn split_within(text: &str) -> Option<(&str, &str)> {
    let pos = text.rfind(".Within(")?;
    let open = pos + ".Within".len();
    let end = scan::matching_bracket(text, open)?;
    if end != text.len() {
        return None;
    }
    Some((&text[..pos], &text[open + 1..end - 1]))
}

/// `Name(args)rest`, with the argument list bracket-matched.
fn split_call(text: &str) -> Option<(&str, &str, &str)> {
    let open = text.find('(')?;
    let end = scan::matching_bracket(text, open)?;
    Some((&text[..open], &text[open + 1..end - 1], &text[end..]))
}
