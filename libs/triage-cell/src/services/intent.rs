use super::department::route;
use super::lab::{has_lab_keyword, has_lab_value};
use super::normalizer::normalize;
use super::safety::is_urgent;
use crate::models::{ClassificationResult, Intent};

/// Strict precedence: urgent, then lab, then route, then general.
///
/// Later checks are skipped once an earlier one fires, so an urgent match can
/// never be shadowed by a lab or department match on the same text.
pub fn resolve_intent(raw: &str) -> Intent {
    let normalized = normalize(raw);

    if is_urgent(&normalized) {
        return Intent::Urgent;
    }
    if has_lab_keyword(&normalized) || has_lab_value(raw) {
        return Intent::Lab;
    }
    if route(&normalized).is_some() {
        return Intent::Route;
    }
    Intent::General
}

/// Full classification snapshot with every flag evaluated.
pub fn classify(raw: &str) -> ClassificationResult {
    let normalized = normalize(raw);
    let urgent = is_urgent(&normalized);
    let lab = has_lab_keyword(&normalized) || has_lab_value(raw);
    let department = route(&normalized);

    let intent = if urgent {
        Intent::Urgent
    } else if lab {
        Intent::Lab
    } else if department.is_some() {
        Intent::Route
    } else {
        Intent::General
    };

    ClassificationResult {
        intent,
        urgent,
        lab,
        department,
    }
}
