//! End-to-end migration of an xUnit test class.

mod helpers;

use helpers::{migrate, XUNIT_ORDER_TESTS};
use tunit_migrate::SourceFramework;

#[test]
fn converts_assertions_and_signatures() {
    let outcome = migrate(SourceFramework::XUnit, XUNIT_ORDER_TESTS);
    assert!(outcome.changed);
    assert!(outcome.failures.is_empty());

    assert!(outcome.text.contains("await Assert.That(order.Total).IsEqualTo(5);"));
    assert!(outcome.text.contains("await Assert.That(input * 2).IsEqualTo(expected);"));
    assert!(outcome.text.contains("public async Task Total_adds_line_items()"));
    assert!(outcome.text.contains("public async Task Doubles(int input, int expected)"));
}

#[test]
fn converts_attributes() {
    let outcome = migrate(SourceFramework::XUnit, XUNIT_ORDER_TESTS);
    assert!(!outcome.text.contains("[Fact]"));
    assert!(!outcome.text.contains("[Theory]"));
    assert!(!outcome.text.contains("InlineData"));
    assert!(outcome.text.contains("[Test]"));
    assert!(outcome.text.contains("[Arguments(1, 2)]"));
    assert!(outcome.text.contains("[Arguments(2, 4)]"));
}

#[test]
fn class_fixture_becomes_class_data_source() {
    let outcome = migrate(SourceFramework::XUnit, XUNIT_ORDER_TESTS);
    assert!(!outcome.text.contains("IClassFixture"));
    assert!(outcome
        .text
        .contains("[ClassDataSource<DatabaseFixture>(Shared = SharedType.PerClass)]"));
}

#[test]
fn output_helper_plumbing_is_replaced() {
    let outcome = migrate(SourceFramework::XUnit, XUNIT_ORDER_TESTS);
    assert!(!outcome.text.contains("ITestOutputHelper"));
    assert!(!outcome.text.contains("_outputHelper = outputHelper"));
    assert!(outcome.text.contains("Console.WriteLine(\"checking total\");"));
}

#[test]
fn record_exception_expands_to_try_catch() {
    let outcome = migrate(SourceFramework::XUnit, XUNIT_ORDER_TESTS);
    assert!(!outcome.text.contains("Record.Exception"));
    assert!(outcome.text.contains("Exception ex = null;"));
    assert!(outcome.text.contains("new Order().Add(-1, 1);"));
    assert!(outcome.text.contains("catch (Exception exception)"));
    assert!(outcome.text.contains("ex = exception;"));
    assert!(outcome.text.contains("await Assert.That(ex).IsNotNull();"));
}

#[test]
fn rewrites_usings() {
    let outcome = migrate(SourceFramework::XUnit, XUNIT_ORDER_TESTS);
    assert!(!outcome.text.contains("using Xunit"));
    assert!(outcome.text.contains("using System;"));
    assert!(outcome.text.contains("using TUnit.Assertions;"));
    assert!(outcome.text.contains("using TUnit.Assertions.Extensions;"));
    assert!(outcome.text.contains("using TUnit.Core;"));
}
