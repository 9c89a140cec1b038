//! Laboratory-result heuristics.

use std::sync::LazyLock;

use regex::Regex;

use super::normalizer::normalize;
use super::rules::Predicate;

/// Keywords checked against normalized text.
pub const LAB_KEYWORDS: Predicate = Predicate::AnyOf(&[
    "tahlil",
    "sonuc",
    "test",
    "deger",
    "kan",
    "kolesterol",
    "seker",
    "glukoz",
    "trigliserid",
    "vitamin",
    "hemogram",
    "hba1c",
    "laborat",
    "result",
    "blood",
    "cholesterol",
    "sugar",
    "glucose",
    "triglyceride",
]);

/// A number (comma or dot decimals) followed by a lab unit, with at most one
/// space in between. Applied to the raw text.
static LAB_VALUE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+(?:[.,]\d+)?\s?(?:mg/dl|mmol/l|miu/l|iu/l|ng/ml|pg/ml|%)")
        .expect("lab value pattern is valid")
});

pub fn has_lab_keyword(normalized: &str) -> bool {
    LAB_KEYWORDS.matches(normalized)
}

pub fn has_lab_value(raw: &str) -> bool {
    LAB_VALUE_PATTERN.is_match(raw)
}

/// True for text that reads like a laboratory result.
pub fn looks_like_lab(raw: &str) -> bool {
    has_lab_keyword(&normalize(raw)) || has_lab_value(raw)
}
