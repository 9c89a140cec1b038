//! Red-flag detection. Highest priority; nothing may override it.

use super::rules::{Predicate, Rule};

const CHEST_ROOTS: &[&str] = &["gogus", "gogsum", "chest"];
const CHEST_QUALIFIERS: &[&str] = &[
    "agri", "baski", "sikisma", "pain", "pressure", "tightness",
];
const BREATH_ROOTS: &[&str] = &["nefes", "breath"];
const BREATHING_DIFFICULTY: &[&str] = &[
    "darl",     // nefes darligi, daraliyor
    "zor",      // nefes zor
    "zorlan",   // nefes almakta zorlaniyorum
    "alam",     // nefes alamiyorum
    "yetmiyor", // nefes yetmiyor
    "tikan",    // tikanir gibi
    "short",
    "difficult",
    "cant",
    "can t",
    "cannot",
];

/// Ordered safety rules; any match marks the text urgent.
///
/// Matching is substring based and deliberately over-inclusive.
pub const URGENT_RULES: &[Rule] = &[
    Rule::new(
        "chest_pain",
        Predicate::All(&[Predicate::AnyOf(CHEST_ROOTS), Predicate::AnyOf(CHEST_QUALIFIERS)]),
    ),
    Rule::new(
        "breathing_difficulty",
        Predicate::All(&[Predicate::AnyOf(BREATH_ROOTS), Predicate::AnyOf(BREATHING_DIFFICULTY)]),
    ),
    Rule::new(
        "loss_of_consciousness",
        Predicate::AnyOf(&["bayil", "suur kayb", "faint", "passed out", "unconscious"]),
    ),
    Rule::new("paralysis", Predicate::AnyOf(&["felc", "paralys"])),
    Rule::new(
        "sudden_vision_loss",
        Predicate::AnyOf(&[
            "ani gorme kaybi",
            "ani gorme bozuklugu",
            "sudden vision loss",
            "sudden loss of vision",
        ]),
    ),
];

/// Names of every safety rule that fires on `normalized`.
pub fn urgent_flags(normalized: &str) -> Vec<&'static str> {
    URGENT_RULES
        .iter()
        .filter(|rule| rule.matches(normalized))
        .map(|rule| rule.label)
        .collect()
}

pub fn is_urgent(normalized: &str) -> bool {
    URGENT_RULES.iter().any(|rule| rule.matches(normalized))
}
