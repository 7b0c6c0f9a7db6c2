//! Test framework conventions
//!
//! A framework contributes three things to a generated file: the attribute
//! marking a test class, the attribute marking a test method, and the call
//! that unconditionally fails a test.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported C# test frameworks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestFramework {
    /// MSTest (`[TestClass]`, `[TestMethod]`)
    #[default]
    MsTest,
    /// NUnit (`[TestFixture]`, `[Test]`)
    NUnit,
    /// xUnit (no class marker, `[Fact]`)
    XUnit,
}

impl TestFramework {
    /// Attribute marking a test class, if the framework has one
    #[inline]
    #[must_use]
    pub fn class_attribute(&self) -> Option<&'static str> {
        match self {
            Self::MsTest => Some("TestClass"),
            Self::NUnit => Some("TestFixture"),
            Self::XUnit => None,
        }
    }

    /// Attribute marking a test method
    #[inline]
    #[must_use]
    pub fn method_attribute(&self) -> &'static str {
        match self {
            Self::MsTest => "TestMethod",
            Self::NUnit => "Test",
            Self::XUnit => "Fact",
        }
    }

    /// Dotted path of the forced-failure call
    #[inline]
    #[must_use]
    pub fn fail_callee(&self) -> &'static [&'static str] {
        &["Assert", "Fail"]
    }

    /// Lowercase name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::MsTest => "mstest",
            Self::NUnit => "nunit",
            Self::XUnit => "xunit",
        }
    }
}

impl fmt::Display for TestFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown framework name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown test framework: '{0}' (expected mstest, nunit or xunit)")]
pub struct UnknownFramework(pub String);

impl FromStr for TestFramework {
    type Err = UnknownFramework;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mstest" => Ok(Self::MsTest),
            "nunit" => Ok(Self::NUnit),
            "xunit" => Ok(Self::XUnit),
            _ => Err(UnknownFramework(s.to_string())),
        }
    }
}
