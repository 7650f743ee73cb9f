//! MSTest vocabulary: `Assert`/`CollectionAssert`/`StringAssert` methods
//! and the `[TestClass]`/`[TestMethod]` attribute family.

use smol_str::SmolStr;

use crate::plan::{ArgsChange, AssertionKind};
use crate::syntax::ast::{is_string_literal, AttributeSpec, CallExpr};

use super::common::{call_args_text, fluent, need_args, that, with_because};
use super::{
    AssertionRewrite, AttributeDisposition, ClassContext, ClassifyError, FrameworkAdapter,
    SourceFramework, SpecialRewrite,
};

pub struct MsTestAdapter;

/// Message argument at exactly `idx`: named `message`, or a string or
/// interpolated literal. MSTest trailing format params are dropped.
fn message_at(call: &CallExpr, idx: usize) -> Option<&str> {
    let arg = call.args.get(idx)?;
    if arg.name.as_deref() == Some("message") || is_string_literal(&arg.value) {
        Some(&arg.value)
    } else {
        None
    }
}

fn pair(
    call: &CallExpr,
    kind: AssertionKind,
    suffix: &str,
    subject_second: bool,
) -> Result<Option<AssertionRewrite>, ClassifyError> {
    need_args(call, 2)?;
    let (a, b) = (call.arg(0).unwrap_or(""), call.arg(1).unwrap_or(""));
    let (subject, operand) = if subject_second { (b, a) } else { (a, b) };
    let assertion = that(subject, &format!(".{suffix}({operand})"));
    Ok(Some(fluent(kind, with_because(assertion, message_at(call, 2)))))
}

fn single(
    call: &CallExpr,
    kind: AssertionKind,
    suffix: &str,
) -> Result<Option<AssertionRewrite>, ClassifyError> {
    need_args(call, 1)?;
    let assertion = that(call.arg(0).unwrap_or(""), suffix);
    Ok(Some(fluent(kind, with_because(assertion, message_at(call, 1)))))
}

impl MsTestAdapter {
    fn convert_assert(&self, call: &CallExpr) -> Result<Option<AssertionRewrite>, ClassifyError> {
        use AssertionKind::*;
        match call.method.as_str() {
            "AreEqual" => pair(call, Equality, "IsEqualTo", true),
            "AreNotEqual" => pair(call, Equality, "IsNotEqualTo", true),
            "AreSame" => pair(call, Reference, "IsSameReferenceAs", true),
            "AreNotSame" => pair(call, Reference, "IsNotSameReferenceAs", true),
            "IsTrue" => single(call, Boolean, ".IsTrue()"),
            "IsFalse" => single(call, Boolean, ".IsFalse()"),
            "IsNull" => single(call, Nullity, ".IsNull()"),
            "IsNotNull" => single(call, Nullity, ".IsNotNull()"),
            "IsInstanceOfType" => self.instance_of(call, "IsAssignableTo"),
            "IsNotInstanceOfType" => self.instance_of(call, "IsNotAssignableTo"),
            "ThrowsException" | "ThrowsExceptionAsync" => self.throws(call),
            "Fail" => Ok(Some(fluent(
                Control,
                format!("await Assert.Fail({})", call.arg(0).unwrap_or("\"\"")),
            ))),
            "Inconclusive" => Ok(Some(fluent(
                Control,
                format!(
                    "await Assert.Skip({})",
                    call.arg(0).unwrap_or("\"Test inconclusive\"")
                ),
            ))),
            _ => Ok(None),
        }
    }

    fn instance_of(
        &self,
        call: &CallExpr,
        suffix: &str,
    ) -> Result<Option<AssertionRewrite>, ClassifyError> {
        need_args(call, 2)?;
        let (value, expected) = (call.arg(0).unwrap_or(""), call.arg(1).unwrap_or(""));
        let assertion = that(value, &format!(".{suffix}({expected})"));
        Ok(Some(fluent(
            AssertionKind::TypeCheck,
            with_because(assertion, message_at(call, 2)),
        )))
    }

    fn throws(&self, call: &CallExpr) -> Result<Option<AssertionRewrite>, ClassifyError> {
        need_args(call, 1)?;
        let action = call.arg(0).unwrap_or("");
        let ty = call.first_type_arg().unwrap_or("Exception");
        Ok(Some(fluent(
            AssertionKind::Exception,
            format!("await Assert.ThrowsAsync<{ty}>({action})"),
        )))
    }

    fn convert_collection_assert(
        &self,
        call: &CallExpr,
    ) -> Result<Option<AssertionRewrite>, ClassifyError> {
        use AssertionKind::*;
        match call.method.as_str() {
            "AreEqual" | "AreEquivalent" => pair(call, Collection, "IsEquivalentTo", true),
            "AreNotEqual" | "AreNotEquivalent" => {
                pair(call, Collection, "IsNotEquivalentTo", true)
            }
            "Contains" => pair(call, Collection, "Contains", false),
            "DoesNotContain" => pair(call, Collection, "DoesNotContain", false),
            "IsSubsetOf" => pair(call, Collection, "IsSubsetOf", false),
            "IsNotSubsetOf" => pair(call, Collection, "IsNotSubsetOf", false),
            "AllItemsAreUnique" => single(call, Collection, ".HasDistinctItems()"),
            "AllItemsAreNotNull" => single(call, Collection, ".All(x => x != null)"),
            "AllItemsAreInstancesOfType" => {
                need_args(call, 2)?;
                let (collection, ty) = (call.arg(0).unwrap_or(""), call.arg(1).unwrap_or(""));
                let assertion = that(
                    collection,
                    &format!(".All(x => {ty}.IsInstanceOfType(x))"),
                );
                Ok(Some(fluent(
                    Collection,
                    with_because(assertion, message_at(call, 2)),
                )))
            }
            _ => Ok(None),
        }
    }

    fn convert_string_assert(
        &self,
        call: &CallExpr,
    ) -> Result<Option<AssertionRewrite>, ClassifyError> {
        use AssertionKind::*;
        match call.method.as_str() {
            "Contains" => pair(call, StringOp, "Contains", false),
            "StartsWith" => pair(call, StringOp, "StartsWith", false),
            "EndsWith" => pair(call, StringOp, "EndsWith", false),
            "Matches" => pair(call, StringOp, "Matches", false),
            "DoesNotMatch" => pair(call, StringOp, "DoesNotMatch", false),
            _ => Ok(None),
        }
    }

    fn single_property_args(&self, attr: &AttributeSpec, key: &str, quote: bool) -> ArgsChange {
        match attr.parse_args().first() {
            Some(arg) if quote => ArgsChange::Replace(format!("\"{key}\", \"{}\"", arg.value)),
            Some(arg) => ArgsChange::Replace(format!("\"{key}\", {}", arg.value)),
            None => ArgsChange::Keep,
        }
    }
}

impl FrameworkAdapter for MsTestAdapter {
    fn framework(&self) -> SourceFramework {
        SourceFramework::MsTest
    }

    fn namespace_prefixes(&self) -> &'static [&'static str] {
        &["Microsoft.VisualStudio.TestTools.UnitTesting"]
    }

    fn assertion_receivers(&self) -> &'static [&'static str] {
        &["Assert", "CollectionAssert", "StringAssert"]
    }

    fn classify_assertion(
        &self,
        call: &CallExpr,
    ) -> Result<Option<AssertionRewrite>, ClassifyError> {
        match call.receiver_head() {
            Some("Assert") => self.convert_assert(call),
            Some("CollectionAssert") => self.convert_collection_assert(call),
            Some("StringAssert") => self.convert_string_assert(call),
            _ => Ok(None),
        }
    }

    fn classify_attribute(
        &self,
        attr: &AttributeSpec,
        _ctx: &ClassContext,
    ) -> Result<Option<AttributeDisposition>, ClassifyError> {
        let disposition = match attr.name.as_str() {
            "TestClass" => Some(AttributeDisposition::Remove),
            "TestMethod" => Some(AttributeDisposition::rename("Test", ArgsChange::Keep)),
            "DataRow" => Some(AttributeDisposition::rename("Arguments", ArgsChange::Keep)),
            "DynamicData" => {
                let args = match attr.parse_args().first() {
                    Some(arg) => ArgsChange::Replace(arg.value.clone()),
                    None => ArgsChange::Keep,
                };
                Some(AttributeDisposition::rename("MethodDataSource", args))
            }
            "TestInitialize" => Some(AttributeDisposition::rename(
                "Before",
                ArgsChange::Replace("HookType.Test".to_string()),
            )),
            "TestCleanup" => Some(AttributeDisposition::rename(
                "After",
                ArgsChange::Replace("HookType.Test".to_string()),
            )),
            "ClassInitialize" => Some(AttributeDisposition::rename(
                "Before",
                ArgsChange::Replace("HookType.Class".to_string()),
            )),
            "ClassCleanup" => Some(AttributeDisposition::rename(
                "After",
                ArgsChange::Replace("HookType.Class".to_string()),
            )),
            "TestCategory" => Some(AttributeDisposition::rename(
                "Property",
                self.single_property_args(attr, "Category", false),
            )),
            "Ignore" => Some(AttributeDisposition::rename("Skip", ArgsChange::Keep)),
            "Priority" => Some(AttributeDisposition::rename(
                "Property",
                self.single_property_args(attr, "Priority", true),
            )),
            "Owner" => Some(AttributeDisposition::rename(
                "Property",
                self.single_property_args(attr, "Owner", false),
            )),
            "ExpectedException" => {
                return Err(ClassifyError::unsupported(
                    "ExpectedException must become an explicit Assert.ThrowsAsync",
                ));
            }
            _ => None,
        };
        Ok(disposition)
    }

    fn is_test_marker(&self, name: &str) -> bool {
        matches!(name, "TestMethod" | "Test")
    }

    fn removes_member_of_type(&self, ty: &str) -> bool {
        crate::syntax::ast::type_head(ty) == "TestContext"
    }

    fn classify_invocation(&self, call: &CallExpr) -> Option<SpecialRewrite> {
        if call.method != "WriteLine" {
            return None;
        }
        let receiver = call.receiver.as_deref()?;
        if !receiver.to_ascii_lowercase().contains("testcontext") {
            return None;
        }
        Some(SpecialRewrite::ReplaceInvocation {
            replacement: format!("Console.WriteLine({})", call_args_text(call)),
        })
    }

    fn using_prefixes_to_remove(&self) -> &'static [&'static str] {
        &["Microsoft.VisualStudio.TestTools"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_call_expression;
    use rstest::rstest;

    fn rewrite(src: &str) -> AssertionRewrite {
        let call = parse_call_expression(src).unwrap();
        MsTestAdapter.classify_assertion(&call).unwrap().unwrap()
    }

    #[rstest]
    #[case(
        "Assert.AreEqual(3, sum)",
        "await Assert.That(sum).IsEqualTo(3)"
    )]
    #[case(
        "Assert.IsInstanceOfType(result, typeof(Order))",
        "await Assert.That(result).IsAssignableTo(typeof(Order))"
    )]
    #[case(
        "CollectionAssert.Contains(items, 5)",
        "await Assert.That(items).Contains(5)"
    )]
    #[case(
        "StringAssert.StartsWith(text, \"ab\")",
        "await Assert.That(text).StartsWith(\"ab\")"
    )]
    fn assertion_table(#[case] src: &str, #[case] expected: &str) {
        assert_eq!(rewrite(src).replacement, expected);
    }

    #[test]
    fn message_literal_becomes_because() {
        let r = rewrite("Assert.IsTrue(done, \"must finish\")");
        assert_eq!(
            r.replacement,
            "await Assert.That(done).IsTrue().Because(\"must finish\")"
        );
        // A comparer argument is not a message.
        let r = rewrite("Assert.AreEqual(a, b, comparer)");
        assert_eq!(r.replacement, "await Assert.That(b).IsEqualTo(a)");
    }

    #[test]
    fn throws_exception_keeps_type_argument() {
        let r = rewrite("Assert.ThrowsException<ArgumentException>(() => Parse(null))");
        assert_eq!(
            r.replacement,
            "await Assert.ThrowsAsync<ArgumentException>(() => Parse(null))"
        );
        assert!(r.introduces_await);
    }

    #[test]
    fn fail_and_inconclusive_are_awaited() {
        assert_eq!(rewrite("Assert.Fail()").replacement, "await Assert.Fail(\"\")");
        assert_eq!(
            rewrite("Assert.Inconclusive(\"no env\")").replacement,
            "await Assert.Skip(\"no env\")"
        );
    }

    fn attribute(name: &str, args: Option<&str>) -> AttributeDisposition {
        let attr = AttributeSpec::new(name, args.map(String::from));
        MsTestAdapter
            .classify_attribute(&attr, &ClassContext::default())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_class_is_removed_and_test_method_renamed() {
        assert_eq!(attribute("TestClass", None), AttributeDisposition::Remove);
        assert_eq!(
            attribute("TestMethod", None),
            AttributeDisposition::rename("Test", ArgsChange::Keep)
        );
    }

    #[test]
    fn category_and_priority_become_properties() {
        assert_eq!(
            attribute("TestCategory", Some("\"integration\"")),
            AttributeDisposition::rename(
                "Property",
                ArgsChange::Replace("\"Category\", \"integration\"".to_string())
            )
        );
        assert_eq!(
            attribute("Priority", Some("2")),
            AttributeDisposition::rename(
                "Property",
                ArgsChange::Replace("\"Priority\", \"2\"".to_string())
            )
        );
    }

    #[test]
    fn dynamic_data_keeps_only_the_member_reference() {
        assert_eq!(
            attribute("DynamicData", Some("nameof(Cases), DynamicDataSourceType.Method")),
            AttributeDisposition::rename(
                "MethodDataSource",
                ArgsChange::Replace("nameof(Cases)".to_string())
            )
        );
    }

    #[test]
    fn expected_exception_is_unsupported() {
        let attr = AttributeSpec::new(
            "ExpectedException",
            Some("typeof(InvalidOperationException)".to_string()),
        );
        let err = MsTestAdapter
            .classify_attribute(&attr, &ClassContext::default())
            .unwrap_err();
        assert!(matches!(err, ClassifyError::Unsupported(_)));
    }

    #[test]
    fn test_context_plumbing_is_rewritten() {
        assert!(MsTestAdapter.removes_member_of_type("TestContext"));
        assert!(!MsTestAdapter.removes_member_of_type("HttpContext"));

        let call = parse_call_expression("TestContext.WriteLine($\"x = {x}\")").unwrap();
        assert_eq!(
            MsTestAdapter.classify_invocation(&call),
            Some(SpecialRewrite::ReplaceInvocation {
                replacement: "Console.WriteLine($\"x = {x}\")".to_string()
            })
        );
        let call = parse_call_expression("Console.WriteLine(\"x\")").unwrap();
        assert_eq!(MsTestAdapter.classify_invocation(&call), None);
    }
}
