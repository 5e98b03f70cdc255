//! Element locators

use std::fmt;

/// Immutable descriptor selecting elements in the current DOM
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// CSS selector
    Css(String),
    /// XPath expression
    XPath(String),
    /// Element `id` attribute
    Id(String),
    /// Element `name` attribute
    Name(String),
}

impl Locator {
    pub fn css<S: Into<String>>(selector: S) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath<S: Into<String>>(expression: S) -> Self {
        Locator::XPath(expression.into())
    }

    pub fn id<S: Into<String>>(id: S) -> Self {
        Locator::Id(id.into())
    }

    pub fn name<S: Into<String>>(name: S) -> Self {
        Locator::Name(name.into())
    }

    /// Selector strategy label used in messages
    pub fn strategy(&self) -> &'static str {
        match self {
            Locator::Css(_) => "css",
            Locator::XPath(_) => "xpath",
            Locator::Id(_) => "id",
            Locator::Name(_) => "name",
        }
    }

    /// Raw selector value
    pub fn value(&self) -> &str {
        match self {
            Locator::Css(v) | Locator::XPath(v) | Locator::Id(v) | Locator::Name(v) => v,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}
