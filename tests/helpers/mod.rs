//! Shared fixtures and pipeline builders for the migration tests.
#![allow(dead_code)]

use tunit_migrate::{MigrationPipeline, NullResolver, SourceFramework};

pub fn pipeline(framework: SourceFramework) -> MigrationPipeline {
    MigrationPipeline::new(framework, Box::new(NullResolver))
}

pub fn migrate(framework: SourceFramework, source: &str) -> tunit_migrate::MigrationOutcome {
    pipeline(framework).run(source).expect("migration should succeed")
}

// Complete xUnit test class: fixture interface, output-helper plumbing,
// facts, theories and a Record.Exception capture.
pub const XUNIT_ORDER_TESTS: &str = r#"using System;
using Xunit;
using Xunit.Abstractions;

namespace Orders.Tests
{
    public class OrderTests : IClassFixture<DatabaseFixture>
    {
        private readonly ITestOutputHelper _outputHelper;

        public OrderTests(ITestOutputHelper outputHelper)
        {
            _outputHelper = outputHelper;
        }

        [Fact]
        public void Total_adds_line_items()
        {
            var order = new Order();
            order.Add(2, 3);
            _outputHelper.WriteLine("checking total");
            Assert.Equal(5, order.Total);
        }

        [Theory]
        [InlineData(1, 2)]
        [InlineData(2, 4)]
        public void Doubles(int input, int expected)
        {
            Assert.Equal(expected, input * 2);
        }

        [Fact]
        public void Rejects_negative_quantity()
        {
            var ex = Record.Exception(() => new Order().Add(-1, 1));
            Assert.NotNull(ex);
        }
    }
}
"#;

pub const NUNIT_CALCULATOR_TESTS: &str = r#"using System;
using NUnit.Framework;

namespace Calc.Tests
{
    public class CalculatorTests
    {
        private Calculator _calc;

        [SetUp]
        private void Init()
        {
            _calc = new Calculator();
        }

        [Test]
        public void Adds()
        {
            Assert.That(_calc.Add(2, 3), Is.EqualTo(5));
        }

        [TestCase(1, 2)]
        [TestCase(3, 6)]
        public void Doubles(int input, int expected)
        {
            ClassicAssert.AreEqual(expected, input * 2);
        }
    }
}
"#;

pub const MSTEST_INVENTORY_TESTS: &str = r#"using Microsoft.VisualStudio.TestTools.UnitTesting;

namespace Inventory.Tests
{
    [TestClass]
    public class InventoryTests
    {
        public TestContext TestContext { get; set; }

        [TestMethod]
        public void Restock_increases_count()
        {
            var count = Restock(40, 2);
            TestContext.WriteLine($"count = {count}");
            Assert.AreEqual(42, count, "restock should add");
        }

        [ExpectedException(typeof(InvalidOperationException))]
        [TestMethod]
        public void Restock_rejects_closed_store()
        {
            Restock(-1, 0);
        }
    }
}
"#;
