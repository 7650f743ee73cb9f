//! NUnit vocabulary: classic and constraint-model assertions, the
//! `StringAssert`/`CollectionAssert`/`FileAssert`/`DirectoryAssert`
//! families, lifecycle attributes and `[TestCase]` property expansion.

mod constraints;

use smol_str::SmolStr;

use crate::plan::{ArgsChange, AssertionKind};
use crate::syntax::ast::{AttributeSpec, CallExpr, ParamDecl};

use super::common::{fluent, need_args, plain, that, with_because};
use super::{
    AssertionRewrite, AttributeDisposition, ClassContext, ClassifyError, FrameworkAdapter,
    SourceFramework,
};

pub struct NUnitAdapter;

const LIFECYCLE_ATTRS: &[&str] = &["SetUp", "TearDown", "OneTimeSetUp", "OneTimeTearDown"];

/// Unlike the other frameworks, NUnit treats any trailing expression as
/// a message.
fn message_at(call: &CallExpr, idx: usize) -> Option<&str> {
    call.arg(idx)
}

fn subject_with_message(
    call: &CallExpr,
    kind: AssertionKind,
    suffix: &str,
) -> Result<Option<AssertionRewrite>, ClassifyError> {
    need_args(call, 1)?;
    let assertion = that(call.arg(0).unwrap_or(""), suffix);
    Ok(Some(fluent(
        kind,
        with_because(assertion, message_at(call, 1)),
    )))
}

fn pair_with_message(
    call: &CallExpr,
    kind: AssertionKind,
    suffix: &str,
    subject_second: bool,
) -> Result<Option<AssertionRewrite>, ClassifyError> {
    need_args(call, 2)?;
    let (a, b) = (call.arg(0).unwrap_or(""), call.arg(1).unwrap_or(""));
    let (subject, operand) = if subject_second { (b, a) } else { (a, b) };
    let assertion = that(subject, &format!(".{suffix}({operand})"));
    Ok(Some(fluent(
        kind,
        with_because(assertion, message_at(call, 2)),
    )))
}

fn control(replacement: String) -> Result<Option<AssertionRewrite>, ClassifyError> {
    Ok(Some(plain(AssertionKind::Control, replacement)))
}

/// Exception type named by a `Throws` constraint argument, e.g.
/// `Is.TypeOf<InvalidOperationException>()`.
fn constraint_exception_type(constraint: &str) -> Option<&str> {
    let c = constraint.trim();
    for head in ["Is.TypeOf<", "Is.InstanceOf<"] {
        if let Some(rest) = c.strip_prefix(head) {
            if let Some(gt) = rest.find('>') {
                return Some(&rest[..gt]);
            }
        }
    }
    if let Some(rest) = c.strip_prefix("Is.TypeOf(typeof(") {
        if let Some(close) = rest.find(')') {
            return Some(&rest[..close]);
        }
    }
    None
}

impl NUnitAdapter {
    fn convert_that(&self, call: &CallExpr) -> Result<Option<AssertionRewrite>, ClassifyError> {
        if call.args.len() < 2 {
            return Ok(None);
        }
        let actual = call.arg(0).unwrap_or("");
        let constraint = call.arg(1).unwrap_or("");

        let Some((kind, suffix)) = constraints::constraint_suffix(constraint) else {
            return Ok(Some(AssertionRewrite {
                kind: AssertionKind::Passthrough,
                replacement: call.text.clone(),
                introduces_await: false,
                todo: Some(
                    "// TODO: TUnit migration - Complex NUnit constraint. Manual conversion required."
                        .to_string(),
                ),
            }));
        };

        let assertion = that(actual, &suffix);
        Ok(Some(fluent(
            kind,
            with_because(assertion, message_at(call, 2)),
        )))
    }

    fn convert_classic(&self, call: &CallExpr) -> Result<Option<AssertionRewrite>, ClassifyError> {
        use AssertionKind::*;
        match call.method.as_str() {
            "That" => self.convert_that(call),
            "AreEqual" => pair_with_message(call, Equality, "IsEqualTo", true),
            "AreNotEqual" => pair_with_message(call, Equality, "IsNotEqualTo", true),
            "AreSame" => pair_with_message(call, Reference, "IsSameReferenceAs", true),
            "AreNotSame" => pair_with_message(call, Reference, "IsNotSameReferenceAs", true),
            "IsTrue" | "True" => subject_with_message(call, Boolean, ".IsTrue()"),
            "IsFalse" | "False" => subject_with_message(call, Boolean, ".IsFalse()"),
            "IsNull" | "Null" => subject_with_message(call, Nullity, ".IsNull()"),
            "IsNotNull" | "NotNull" => subject_with_message(call, Nullity, ".IsNotNull()"),
            "IsEmpty" => subject_with_message(call, Collection, ".IsEmpty()"),
            "IsNotEmpty" => subject_with_message(call, Collection, ".IsNotEmpty()"),
            "Greater" => pair_with_message(call, Comparison, "IsGreaterThan", false),
            "GreaterOrEqual" => {
                pair_with_message(call, Comparison, "IsGreaterThanOrEqualTo", false)
            }
            "Less" => pair_with_message(call, Comparison, "IsLessThan", false),
            "LessOrEqual" => pair_with_message(call, Comparison, "IsLessThanOrEqualTo", false),
            "Contains" => pair_with_message(call, Collection, "Contains", true),
            "Positive" => subject_with_message(call, Comparison, ".IsPositive()"),
            "Negative" => subject_with_message(call, Comparison, ".IsNegative()"),
            "Zero" => subject_with_message(call, Comparison, ".IsZero()"),
            "NotZero" => subject_with_message(call, Comparison, ".IsNotZero()"),
            "Pass" => control("// Test passed".to_string()),
            "Fail" => control(match call.arg(0) {
                Some(m) => format!("Fail.Test({m})"),
                None => "Fail.Test(\"\")".to_string(),
            }),
            "Inconclusive" => control(match call.arg(0) {
                Some(m) => format!("Skip.Test({m})"),
                None => "Skip.Test(\"Test inconclusive\")".to_string(),
            }),
            "Ignore" => control(match call.arg(0) {
                Some(m) => format!("Skip.Test({m})"),
                None => "Skip.Test(\"Ignored\")".to_string(),
            }),
            "Warn" => control(match call.arg(0) {
                Some(m) => format!("Skip.Test($\"Warning: {{{m}}}\")"),
                None => "Skip.Test(\"Warning\")".to_string(),
            }),
            "Throws" | "ThrowsAsync" | "Catch" | "CatchAsync" => self.convert_throws(call),
            "DoesNotThrow" | "DoesNotThrowAsync" => {
                need_args(call, 1)?;
                Ok(Some(fluent(
                    Exception,
                    that(call.arg(0).unwrap_or(""), ".ThrowsNothing()"),
                )))
            }
            _ => Ok(None),
        }
    }

    fn convert_throws(&self, call: &CallExpr) -> Result<Option<AssertionRewrite>, ClassifyError> {
        need_args(call, 1)?;
        let (ty, action) = if let Some(ty) = call.first_type_arg() {
            (ty.to_string(), call.arg(0).unwrap_or(""))
        } else if call.args.len() >= 2 {
            match constraint_exception_type(call.arg(0).unwrap_or("")) {
                Some(ty) => (ty.to_string(), call.arg(1).unwrap_or("")),
                None => ("Exception".to_string(), call.arg(1).unwrap_or("")),
            }
        } else {
            ("Exception".to_string(), call.arg(0).unwrap_or(""))
        };
        Ok(Some(fluent(
            AssertionKind::Exception,
            format!("await Assert.ThrowsAsync<{ty}>({action})"),
        )))
    }

    fn convert_string_assert(
        &self,
        call: &CallExpr,
    ) -> Result<Option<AssertionRewrite>, ClassifyError> {
        use AssertionKind::*;
        match call.method.as_str() {
            "Contains" => pair_with_message(call, StringOp, "Contains", true),
            "StartsWith" => pair_with_message(call, StringOp, "StartsWith", true),
            "EndsWith" => pair_with_message(call, StringOp, "EndsWith", true),
            "AreEqualIgnoringCase" => {
                need_args(call, 2)?;
                let (expected, actual) = (call.arg(0).unwrap_or(""), call.arg(1).unwrap_or(""));
                let assertion = that(
                    actual,
                    &format!(".IsEqualTo({expected}, StringComparison.OrdinalIgnoreCase)"),
                );
                Ok(Some(fluent(
                    Equality,
                    with_because(assertion, message_at(call, 2)),
                )))
            }
            "IsMatch" => pair_with_message(call, StringOp, "Matches", true),
            "DoesNotMatch" => pair_with_message(call, StringOp, "DoesNotMatch", true),
            _ => Ok(None),
        }
    }

    fn convert_collection_assert(
        &self,
        call: &CallExpr,
    ) -> Result<Option<AssertionRewrite>, ClassifyError> {
        use AssertionKind::*;
        match call.method.as_str() {
            "AreEqual" | "AreEquivalent" => {
                pair_with_message(call, Collection, "IsEquivalentTo", true)
            }
            "AreNotEqual" | "AreNotEquivalent" => {
                pair_with_message(call, Collection, "IsNotEquivalentTo", true)
            }
            "Contains" => pair_with_message(call, Collection, "Contains", false),
            "DoesNotContain" => pair_with_message(call, Collection, "DoesNotContain", false),
            "IsSubsetOf" => pair_with_message(call, Collection, "IsSubsetOf", false),
            "IsNotSubsetOf" => pair_with_message(call, Collection, "IsNotSubsetOf", false),
            "AllItemsAreUnique" => {
                subject_with_message(call, Collection, ".HasDistinctItems()")
            }
            "AllItemsAreNotNull" => {
                subject_with_message(call, Collection, ".All(x => x != null)")
            }
            "IsEmpty" => subject_with_message(call, Collection, ".IsEmpty()"),
            "IsNotEmpty" => subject_with_message(call, Collection, ".IsNotEmpty()"),
            _ => Ok(None),
        }
    }

    fn convert_path_assert(
        &self,
        call: &CallExpr,
        probe: &str,
        info: &str,
    ) -> Result<Option<AssertionRewrite>, ClassifyError> {
        use AssertionKind::*;
        need_args(call, 1)?;
        let path = call.arg(0).unwrap_or("");
        match call.method.as_str() {
            "Exists" => Ok(Some(fluent(
                Boolean,
                that(&format!("{probe}.Exists({path})"), ".IsTrue()"),
            ))),
            "DoesNotExist" => Ok(Some(fluent(
                Boolean,
                that(&format!("{probe}.Exists({path})"), ".IsFalse()"),
            ))),
            "AreEqual" | "AreNotEqual" => {
                need_args(call, 2)?;
                let (expected, actual) = (call.arg(0).unwrap_or(""), call.arg(1).unwrap_or(""));
                let suffix = match (probe, call.method.as_str()) {
                    ("File", "AreEqual") => format!(".HasSameContentAs(new {info}({expected}))"),
                    ("File", _) => format!(".DoesNotHaveSameContentAs(new {info}({expected}))"),
                    (_, "AreEqual") => format!(".IsEquivalentTo(new {info}({expected}))"),
                    _ => format!(".IsNotEquivalentTo(new {info}({expected}))"),
                };
                let assertion = that(&format!("new {info}({actual})"), &suffix);
                Ok(Some(fluent(
                    Equality,
                    with_because(assertion, message_at(call, 2)),
                )))
            }
            _ => Ok(None),
        }
    }

    fn convert_test_case(
        &self,
        attr: &AttributeSpec,
    ) -> Result<AttributeDisposition, ClassifyError> {
        let mut inline = Vec::new();
        let mut additional = Vec::new();
        for arg in attr.parse_args() {
            match arg.name.as_deref() {
                None => inline.push(arg.value),
                Some("TestName") => inline.push(format!("DisplayName = {}", arg.value)),
                Some("Category") => inline.push(format!("Categories = [{}]", arg.value)),
                Some("Ignore") | Some("IgnoreReason") => {
                    inline.push(format!("Skip = {}", arg.value))
                }
                Some("Description") => {
                    additional.push(format!("Property(\"Description\", {})", arg.value))
                }
                Some("Author") => {
                    additional.push(format!("Property(\"Author\", {})", arg.value))
                }
                Some("Explicit") => {
                    if arg.value == "true" {
                        additional.push("Explicit".to_string());
                    }
                }
                Some("ExplicitReason") => {
                    additional.push("Explicit".to_string());
                    additional.push(format!("Property(\"ExplicitReason\", {})", arg.value));
                }
                Some("ExpectedResult") => {
                    return Err(ClassifyError::unsupported(
                        "TestCase with ExpectedResult requires a return-value assertion",
                    ));
                }
                Some(_) => {}
            }
        }
        let args = if inline.is_empty() {
            ArgsChange::Remove
        } else {
            ArgsChange::Replace(inline.join(", "))
        };
        Ok(AttributeDisposition::Convert {
            name: SmolStr::new("Arguments"),
            args,
            additional,
        })
    }

    fn convert_test_full(&self, attr: &AttributeSpec) -> AttributeDisposition {
        let mut additional = Vec::new();
        for arg in attr.parse_args() {
            match arg.name.as_deref() {
                Some("Description") => {
                    additional.push(format!("Property(\"Description\", {})", arg.value))
                }
                Some("Author") => {
                    additional.push(format!("Property(\"Author\", {})", arg.value))
                }
                _ => {}
            }
        }
        AttributeDisposition::Convert {
            name: SmolStr::new("Test"),
            args: ArgsChange::Remove,
            additional,
        }
    }

    fn single_property_args(&self, attr: &AttributeSpec, key: &str) -> ArgsChange {
        match attr.parse_args().first() {
            Some(arg) => ArgsChange::Replace(format!("\"{key}\", {}", arg.value)),
            None => ArgsChange::Keep,
        }
    }
}

impl FrameworkAdapter for NUnitAdapter {
    fn framework(&self) -> SourceFramework {
        SourceFramework::NUnit
    }

    fn namespace_prefixes(&self) -> &'static [&'static str] {
        &["NUnit"]
    }

    fn assertion_receivers(&self) -> &'static [&'static str] {
        &[
            "Assert",
            "ClassicAssert",
            "StringAssert",
            "CollectionAssert",
            "FileAssert",
            "DirectoryAssert",
        ]
    }

    fn classify_assertion(
        &self,
        call: &CallExpr,
    ) -> Result<Option<AssertionRewrite>, ClassifyError> {
        match call.receiver_head() {
            Some("Assert") | Some("ClassicAssert") => self.convert_classic(call),
            Some("StringAssert") => self.convert_string_assert(call),
            Some("CollectionAssert") => self.convert_collection_assert(call),
            Some("FileAssert") => self.convert_path_assert(call, "File", "FileInfo"),
            Some("DirectoryAssert") => {
                self.convert_path_assert(call, "Directory", "DirectoryInfo")
            }
            _ => Ok(None),
        }
    }

    fn classify_attribute(
        &self,
        attr: &AttributeSpec,
        _ctx: &ClassContext,
    ) -> Result<Option<AttributeDisposition>, ClassifyError> {
        let name = attr.name.as_str();
        let disposition = match name {
            "TestFixture" | "Combinatorial" | "Sequential" | "Platform" | "FixtureLifeCycle" => {
                Some(AttributeDisposition::Remove)
            }
            "Parallelizable" => {
                let scope_none = attr
                    .args
                    .as_deref()
                    .is_some_and(|a| a.contains("None"));
                if scope_none {
                    Some(AttributeDisposition::rename("NotInParallel", ArgsChange::Remove))
                } else {
                    // TUnit runs in parallel by default.
                    Some(AttributeDisposition::Remove)
                }
            }
            "Apartment" => {
                let sta = attr.args.as_deref().is_some_and(|a| a.contains("STA"));
                sta.then(|| {
                    AttributeDisposition::rename("STAThreadExecutor", ArgsChange::Remove)
                })
            }
            "Test" => Some(self.convert_test_full(attr)),
            "TestCase" => Some(self.convert_test_case(attr)?),
            "Theory" => Some(AttributeDisposition::rename("Test", ArgsChange::Keep)),
            "TestCaseSource" => {
                let args = match attr.parse_args().first() {
                    Some(arg) => ArgsChange::Replace(arg.value.clone()),
                    None => ArgsChange::Keep,
                };
                Some(AttributeDisposition::rename("MethodDataSource", args))
            }
            "SetUp" => Some(AttributeDisposition::rename(
                "Before",
                ArgsChange::Replace("HookType.Test".to_string()),
            )),
            "TearDown" => Some(AttributeDisposition::rename(
                "After",
                ArgsChange::Replace("HookType.Test".to_string()),
            )),
            "OneTimeSetUp" => Some(AttributeDisposition::rename(
                "Before",
                ArgsChange::Replace("HookType.Class".to_string()),
            )),
            "OneTimeTearDown" => Some(AttributeDisposition::rename(
                "After",
                ArgsChange::Replace("HookType.Class".to_string()),
            )),
            "Category" => Some(AttributeDisposition::rename("Category", ArgsChange::Keep)),
            "Ignore" => Some(AttributeDisposition::rename("Skip", ArgsChange::Keep)),
            "Explicit" => Some(AttributeDisposition::rename("Explicit", ArgsChange::Keep)),
            "Description" => Some(AttributeDisposition::rename(
                "Property",
                self.single_property_args(attr, "Description"),
            )),
            "Author" => Some(AttributeDisposition::rename(
                "Property",
                self.single_property_args(attr, "Author"),
            )),
            "Repeat" => Some(AttributeDisposition::rename("Repeat", ArgsChange::Keep)),
            "Values" => Some(AttributeDisposition::rename("Matrix", ArgsChange::Keep)),
            "ValueSource" => Some(AttributeDisposition::rename(
                "MatrixSourceMethod",
                ArgsChange::Keep,
            )),
            "NonParallelizable" => {
                Some(AttributeDisposition::rename("NotInParallel", ArgsChange::Keep))
            }
            "ExpectedException" => {
                return Err(ClassifyError::unsupported(
                    "ExpectedException must become an explicit Assert.ThrowsAsync",
                ));
            }
            _ => None,
        };
        Ok(disposition)
    }

    fn classify_parameter_attribute(
        &self,
        attr: &AttributeSpec,
        param: &ParamDecl,
    ) -> Option<AttributeDisposition> {
        if attr.name != "Range" {
            return None;
        }
        let args = attr.parse_args();
        if args.len() < 2 {
            return None;
        }
        let element = infer_range_type(&args[0].value, &param.ty);
        Some(AttributeDisposition::rename(
            format!("MatrixRange<{element}>"),
            ArgsChange::Keep,
        ))
    }

    fn is_test_marker(&self, name: &str) -> bool {
        matches!(name, "Test" | "Theory")
    }

    fn implies_test_marker(&self, name: &str) -> bool {
        matches!(name, "TestCase" | "Arguments" | "TestCaseSource")
    }

    fn visibility_sensitive_attrs(&self) -> &'static [&'static str] {
        LIFECYCLE_ATTRS
    }

    fn using_prefixes_to_remove(&self) -> &'static [&'static str] {
        &["NUnit"]
    }
}

/// Element type for `[Range]`, from the literal suffix first and the
/// parameter type second.
fn infer_range_type(literal: &str, param_type: &str) -> &'static str {
    let lit = literal.trim();
    if lit.ends_with('L') || lit.ends_with('l') {
        return "long";
    }
    if lit.ends_with('f') || lit.ends_with('F') {
        return "float";
    }
    if lit.ends_with('d') || lit.ends_with('D') || lit.contains('.') {
        return "double";
    }
    match param_type.trim() {
        "long" => "long",
        "float" => "float",
        "double" => "double",
        "decimal" => "decimal",
        "short" => "short",
        "byte" => "byte",
        _ => "int",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_call_expression;
    use rstest::rstest;

    fn rewrite(src: &str) -> AssertionRewrite {
        let call = parse_call_expression(src).unwrap();
        NUnitAdapter.classify_assertion(&call).unwrap().unwrap()
    }

    #[rstest]
    #[case(
        "Assert.AreEqual(42, result)",
        "await Assert.That(result).IsEqualTo(42)"
    )]
    #[case(
        "ClassicAssert.AreNotSame(a, b)",
        "await Assert.That(b).IsNotSameReferenceAs(a)"
    )]
    #[case("Assert.Greater(x, 5)", "await Assert.That(x).IsGreaterThan(5)")]
    #[case(
        "Assert.Contains(item, list)",
        "await Assert.That(list).Contains(item)"
    )]
    #[case("Assert.Zero(count)", "await Assert.That(count).IsZero()")]
    #[case(
        "Assert.That(total, Is.EqualTo(10))",
        "await Assert.That(total).IsEqualTo(10)"
    )]
    #[case(
        "Assert.That(items, Has.Count.EqualTo(3))",
        "await Assert.That(items).Count().IsEqualTo(3)"
    )]
    #[case(
        "StringAssert.Contains(\"ab\", text)",
        "await Assert.That(text).Contains(\"ab\")"
    )]
    #[case(
        "CollectionAssert.AreEquivalent(expected, actual)",
        "await Assert.That(actual).IsEquivalentTo(expected)"
    )]
    #[case(
        "FileAssert.Exists(path)",
        "await Assert.That(File.Exists(path)).IsTrue()"
    )]
    #[case(
        "DirectoryAssert.DoesNotExist(dir)",
        "await Assert.That(Directory.Exists(dir)).IsFalse()"
    )]
    fn assertion_table(#[case] src: &str, #[case] expected: &str) {
        assert_eq!(rewrite(src).replacement, expected);
    }

    #[test]
    fn message_argument_becomes_because() {
        let r = rewrite("Assert.AreEqual(42, result, \"answer\")");
        assert_eq!(
            r.replacement,
            "await Assert.That(result).IsEqualTo(42).Because(\"answer\")"
        );
        let r = rewrite("Assert.IsTrue(flag, errorDetails)");
        assert_eq!(
            r.replacement,
            "await Assert.That(flag).IsTrue().Because(errorDetails)"
        );
    }

    #[test]
    fn unknown_constraint_is_passed_through_with_todo() {
        let r = rewrite("Assert.That(items, Is.All.GreaterThan(0))");
        assert_eq!(r.replacement, "Assert.That(items, Is.All.GreaterThan(0))");
        assert!(!r.introduces_await);
        assert!(r.todo.is_some());
    }

    #[rstest]
    #[case("Assert.Pass()", "// Test passed")]
    #[case("Assert.Fail(\"boom\")", "Fail.Test(\"boom\")")]
    #[case("Assert.Fail()", "Fail.Test(\"\")")]
    #[case("Assert.Inconclusive()", "Skip.Test(\"Test inconclusive\")")]
    #[case("Assert.Ignore(\"later\")", "Skip.Test(\"later\")")]
    fn control_assertions_do_not_await(#[case] src: &str, #[case] expected: &str) {
        let r = rewrite(src);
        assert_eq!(r.replacement, expected);
        assert!(!r.introduces_await);
    }

    #[test]
    fn throws_takes_type_from_generic_or_constraint() {
        let r = rewrite("Assert.Throws<ArgumentException>(() => Run())");
        assert_eq!(
            r.replacement,
            "await Assert.ThrowsAsync<ArgumentException>(() => Run())"
        );
        let r = rewrite("Assert.Throws(Is.TypeOf<IOException>(), () => Run())");
        assert_eq!(
            r.replacement,
            "await Assert.ThrowsAsync<IOException>(() => Run())"
        );
        let r = rewrite("Assert.DoesNotThrow(() => Run())");
        assert_eq!(
            r.replacement,
            "await Assert.That(() => Run()).ThrowsNothing()"
        );
    }

    fn attribute(name: &str, args: Option<&str>) -> AttributeDisposition {
        let attr = AttributeSpec::new(name, args.map(String::from));
        NUnitAdapter
            .classify_attribute(&attr, &ClassContext::default())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn lifecycle_attributes_become_hooks() {
        assert_eq!(
            attribute("SetUp", None),
            AttributeDisposition::rename(
                "Before",
                ArgsChange::Replace("HookType.Test".to_string())
            )
        );
        assert_eq!(
            attribute("OneTimeTearDown", None),
            AttributeDisposition::rename(
                "After",
                ArgsChange::Replace("HookType.Class".to_string())
            )
        );
    }

    #[test]
    fn test_case_properties_are_expanded() {
        let d = attribute(
            "TestCase",
            Some("1, 2, TestName = \"sum\", Category = \"math\", Ignore = \"slow\""),
        );
        match d {
            AttributeDisposition::Convert {
                name,
                args,
                additional,
            } => {
                assert_eq!(name, "Arguments");
                assert_eq!(
                    args,
                    ArgsChange::Replace(
                        "1, 2, DisplayName = \"sum\", Categories = [\"math\"], Skip = \"slow\""
                            .to_string()
                    )
                );
                assert!(additional.is_empty());
            }
            other => panic!("unexpected disposition: {other:?}"),
        }
    }

    #[test]
    fn test_case_description_moves_to_property_attribute() {
        let d = attribute("TestCase", Some("1, Description = \"adds\""));
        match d {
            AttributeDisposition::Convert { additional, .. } => {
                assert_eq!(
                    additional,
                    vec!["Property(\"Description\", \"adds\")".to_string()]
                );
            }
            other => panic!("unexpected disposition: {other:?}"),
        }
    }

    #[test]
    fn expected_result_is_unsupported() {
        let attr = AttributeSpec::new(
            "TestCase",
            Some("2, ExpectedResult = 4".to_string()),
        );
        let err = NUnitAdapter
            .classify_attribute(&attr, &ClassContext::default())
            .unwrap_err();
        assert!(matches!(err, ClassifyError::Unsupported(_)));
    }

    #[test]
    fn parallelizable_depends_on_scope() {
        assert_eq!(
            attribute("Parallelizable", Some("ParallelScope.None")),
            AttributeDisposition::rename("NotInParallel", ArgsChange::Remove)
        );
        assert_eq!(
            attribute("Parallelizable", Some("ParallelScope.Self")),
            AttributeDisposition::Remove
        );
        assert_eq!(attribute("Parallelizable", None), AttributeDisposition::Remove);
    }

    #[rstest]
    #[case("1, 5", "int", "int")]
    #[case("1L, 100L", "long", "long")]
    #[case("0.5, 2.5", "double", "double")]
    #[case("1.0f, 5.0f", "float", "float")]
    #[case("1, 5", "byte", "byte")]
    fn range_type_inference(
        #[case] args: &str,
        #[case] param_ty: &str,
        #[case] expected: &str,
    ) {
        let attr = AttributeSpec::new("Range", Some(args.to_string()));
        let param = ParamDecl {
            modifiers: Vec::new(),
            ty: param_ty.to_string(),
            name: "value".into(),
            default: None,
        };
        let d = NUnitAdapter
            .classify_parameter_attribute(&attr, &param)
            .unwrap();
        assert_eq!(
            d,
            AttributeDisposition::rename(format!("MatrixRange<{expected}>"), ArgsChange::Keep)
        );
    }
}
