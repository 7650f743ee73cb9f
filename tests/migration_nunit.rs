//! End-to-end migration of an NUnit test class.

mod helpers;

use helpers::{migrate, NUNIT_CALCULATOR_TESTS};
use tunit_migrate::SourceFramework;

#[test]
fn constraint_assertions_become_fluent() {
    let outcome = migrate(SourceFramework::NUnit, NUNIT_CALCULATOR_TESTS);
    assert!(outcome.changed);
    assert!(outcome.failures.is_empty());

    assert!(outcome.text.contains("await Assert.That(_calc.Add(2, 3)).IsEqualTo(5);"));
    assert!(outcome.text.contains("await Assert.That(input * 2).IsEqualTo(expected);"));
    assert!(outcome.text.contains("public async Task Adds()"));
}

#[test]
fn lifecycle_hook_is_renamed_and_made_public() {
    let outcome = migrate(SourceFramework::NUnit, NUNIT_CALCULATOR_TESTS);
    assert!(!outcome.text.contains("[SetUp]"));
    assert!(outcome.text.contains("[Before(HookType.Test)]"));
    assert!(outcome.text.contains("public void Init()"));
    assert!(!outcome.text.contains("private void Init()"));
}

#[test]
fn test_case_gains_a_test_marker() {
    let outcome = migrate(SourceFramework::NUnit, NUNIT_CALCULATOR_TESTS);
    assert!(!outcome.text.contains("TestCase"));
    assert!(outcome.text.contains("[Arguments(1, 2)]"));
    assert!(outcome.text.contains("[Arguments(3, 6)]"));
    // one converted [Test] on Adds, one added above the [Arguments] pair
    assert_eq!(outcome.text.matches("[Test]").count(), 2);
}

#[test]
fn rewrites_usings() {
    let outcome = migrate(SourceFramework::NUnit, NUNIT_CALCULATOR_TESTS);
    assert!(!outcome.text.contains("using NUnit.Framework;"));
    assert!(outcome.text.contains("using System;"));
    assert!(outcome.text.contains("using TUnit.Assertions;"));
    assert!(outcome.text.contains("using TUnit.Core;"));
}
