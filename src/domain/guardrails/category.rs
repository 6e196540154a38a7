//! Guardrail categories and violations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of security rule a query broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardrailCategory {
    /// Request for classified material.
    Classification,
    /// Request for personally identifiable information.
    Pii,
    /// Request touching real-world operational data.
    Opsec,
}

impl GuardrailCategory {
    /// Fixed advisory shown to the user when this category blocks a query.
    pub fn advisory(&self) -> &'static str {
        match self {
            GuardrailCategory::Classification => {
                "CLASSIFICATION WARNING: Request for classified information blocked."
            }
            GuardrailCategory::Pii => "PII PROTECTION: Personal information request blocked.",
            GuardrailCategory::Opsec => "OPSEC VIOLATION: Real operational data request blocked.",
        }
    }

    /// Display text for a blocked query.
    pub fn block_message(&self) -> String {
        format!("[SECURITY BLOCK] {}", self.advisory())
    }
}

impl fmt::Display for GuardrailCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GuardrailCategory::Classification => "classification",
            GuardrailCategory::Pii => "pii",
            GuardrailCategory::Opsec => "opsec",
        };
        f.write_str(s)
    }
}

/// A failed guardrail check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardrailViolation {
    pub category: GuardrailCategory,
    /// Name of the check that fired.
    pub guardrail: String,
    /// Keyword or pattern that matched.
    pub matched: String,
}

impl GuardrailViolation {
    pub fn new(
        category: GuardrailCategory,
        guardrail: impl Into<String>,
        matched: impl Into<String>,
    ) -> Self {
        Self {
            category,
            guardrail: guardrail.into(),
            matched: matched.into(),
        }
    }
}

impl fmt::Display for GuardrailViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} guardrail matched '{}'", self.category, self.matched)
    }
}
