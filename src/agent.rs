//! Agents taking part in the tournament.
//!
//! The tournament never looks inside an agent: it only needs a name that stays the same from one
//! run to the next, because that name is the key of the agent's rating record.

use std::fmt;

/// Something that can be seated in a match.
pub trait Agent {
    /// Stable identifier, used as the rating record key.
    fn name(&self) -> &str;
}

/// An agent known only by its name.
///
/// This is what the roster collector produces: the referee process receives the name and knows
/// how to build the actual player from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedAgent {
    pub name: String,
}

impl NamedAgent {
    pub fn new(name: impl Into<String>) -> NamedAgent {
        NamedAgent { name: name.into() }
    }
}

impl Agent for NamedAgent {
    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for NamedAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Agent for String {
    fn name(&self) -> &str {
        self
    }
}

impl Agent for &str {
    fn name(&self) -> &str {
        self
    }
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }
}
