//! Declarative substring predicates used by the rule tables.
//!
//! Every predicate is evaluated against already normalized text, so the
//! needles must be lowercase ASCII.

#[derive(Debug, Clone, Copy)]
pub enum Predicate {
    /// The needle occurs anywhere in the text.
    Contains(&'static str),
    /// At least one needle occurs.
    AnyOf(&'static [&'static str]),
    /// Every nested predicate holds.
    All(&'static [Predicate]),
    /// At least one nested predicate holds.
    Any(&'static [Predicate]),
}

impl Predicate {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Predicate::Contains(needle) => text.contains(needle),
            Predicate::AnyOf(needles) => needles.iter().any(|n| text.contains(n)),
            Predicate::All(parts) => parts.iter().all(|p| p.matches(text)),
            Predicate::Any(parts) => parts.iter().any(|p| p.matches(text)),
        }
    }
}

/// A named predicate. `label` is a department code for routing rules and a
/// red-flag name for safety rules.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub label: &'static str,
    pub predicate: Predicate,
}

impl Rule {
    pub const fn new(label: &'static str, predicate: Predicate) -> Self {
        Self { label, predicate }
    }

    pub fn matches(&self, text: &str) -> bool {
        self.predicate.matches(text)
    }
}

/// First rule in table order whose predicate holds.
pub fn first_match<'a>(rules: &'a [Rule], text: &str) -> Option<&'a Rule> {
    rules.iter().find(|rule| rule.matches(text))
}
