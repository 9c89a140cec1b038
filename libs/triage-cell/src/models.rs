use serde::{Deserialize, Serialize};

use shared_models::DepartmentRef;

/// Top-level classification driving the response strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Urgent,
    Lab,
    Route,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Urgent => "urgent",
            Intent::Lab => "lab",
            Intent::Route => "route",
            Intent::General => "general",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request classification snapshot. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub intent: Intent,
    pub urgent: bool,
    pub lab: bool,
    pub department: Option<DepartmentRef>,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyQuery {
    #[serde(default)]
    pub text: String,
}
