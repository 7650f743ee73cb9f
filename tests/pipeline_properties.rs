//! Cross-cutting pipeline guarantees: idempotence, fail-skip isolation,
//! annotation stability under many edits, and fail-open resolution.

mod helpers;

use once_cell::sync::Lazy;
use rstest::rstest;

use helpers::{migrate, pipeline, MSTEST_INVENTORY_TESTS, NUNIT_CALCULATOR_TESTS, XUNIT_ORDER_TESTS};
use tunit_migrate::{MapResolver, MigrationPipeline, SourceFramework};

/// One method holding fifty convertible assertions, each on its own flag.
static MANY_ASSERTIONS: Lazy<String> = Lazy::new(|| {
    let mut body = String::new();
    for i in 0..50 {
        body.push_str(&format!("        Assert.True(flag{i});\n"));
    }
    format!(
        "using Xunit;\n\npublic class FlagTests\n{{\n    [Fact]\n    public void AllFlags()\n    {{\n{body}    }}\n}}\n"
    )
});

#[rstest]
#[case(SourceFramework::XUnit, XUNIT_ORDER_TESTS)]
#[case(SourceFramework::NUnit, NUNIT_CALCULATOR_TESTS)]
fn migrated_output_is_stable(#[case] framework: SourceFramework, #[case] source: &str) {
    let first = migrate(framework, source);
    let second = migrate(framework, &first.text);
    assert_eq!(second.text, first.text);
    assert!(second.failures.is_empty());
}

#[test]
fn migrated_mstest_output_is_stable_once_failures_are_resolved() {
    // ExpectedException never stabilizes; drop that method first
    let source = MSTEST_INVENTORY_TESTS.replace(
        "        [ExpectedException(typeof(InvalidOperationException))]\n",
        "",
    );
    let first = migrate(SourceFramework::MsTest, &source);
    assert!(first.failures.is_empty());
    let second = migrate(SourceFramework::MsTest, &first.text);
    assert_eq!(second.text, first.text);
}

#[test]
fn second_xunit_run_plans_nothing() {
    let first = migrate(SourceFramework::XUnit, XUNIT_ORDER_TESTS);
    let second = migrate(SourceFramework::XUnit, &first.text);
    assert!(!second.changed);
    assert_eq!(second.conversions, 0);
}

#[test]
fn one_malformed_candidate_does_not_poison_the_rest() {
    let mut body = String::new();
    for i in 0..9 {
        body.push_str(&format!("        Assert.True(flag{i});\n"));
    }
    body.push_str("        Assert.Equal(1);\n");
    let source = format!(
        "using Xunit;\n\npublic class T\n{{\n    [Fact]\n    public void M()\n    {{\n{body}    }}\n}}\n"
    );

    let outcome = migrate(SourceFramework::XUnit, &source);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.text.matches("await Assert.That(flag").count(), 9);
    // the malformed call survives verbatim
    assert!(outcome.text.contains("Assert.Equal(1);"));
    assert!(outcome.text.contains("could not be converted automatically"));
}

#[test]
fn fifty_edits_leave_every_annotation_intact() {
    let outcome = migrate(SourceFramework::XUnit, &MANY_ASSERTIONS);
    assert!(outcome.failures.is_empty());
    for i in 0..50 {
        assert!(
            outcome.text.contains(&format!("await Assert.That(flag{i}).IsTrue();")),
            "assertion {i} lost its conversion"
        );
    }
    assert!(!outcome.text.contains("Assert.True"));
}

#[test]
fn resolved_foreign_assert_is_left_alone() {
    let source = "using Xunit;\n\npublic class T\n{\n    [Fact]\n    public void M()\n    {\n        Assert.Equal(1, 2);\n    }\n}\n";

    let foreign = MapResolver::new().with_type("Assert", "MyCompany.Testing.Assert");
    let p = MigrationPipeline::new(SourceFramework::XUnit, Box::new(foreign));
    let outcome = p.run(source).unwrap();
    assert!(outcome.text.contains("Assert.Equal(1, 2);"));
    assert!(!outcome.text.contains("await Assert.That"));

    // unresolved symbols fall back to conversion
    let outcome = pipeline(SourceFramework::XUnit).run(source).unwrap();
    assert!(outcome.text.contains("await Assert.That(2).IsEqualTo(1);"));
}

#[test]
fn todos_are_counted_and_surfaced() {
    let source = "using Xunit;\n\npublic class T\n{\n    [Fact]\n    public void M()\n    {\n        Assert.Collection(items, e => e.Id, e => e.Name);\n    }\n}\n";
    let outcome = migrate(SourceFramework::XUnit, source);
    assert_eq!(outcome.todo_count, 1);
    assert!(outcome.text.contains("// TODO: TUnit migration"));
    assert!(outcome.text.contains("await Assert.That(items).HasCount(2);"));
}
