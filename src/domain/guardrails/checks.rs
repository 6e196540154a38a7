//! Pre-flight checks run against the latest user turn.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::conversation::{Role, Turn};

use super::{GuardrailCategory, GuardrailViolation};

const CLASSIFICATION_KEYWORDS: &[&str] = &[
    "classified",
    "secret",
    "top secret",
    "ts/sci",
    "noforn",
    "crypto",
    "sigint",
    "humint",
];

const PII_PATTERNS: &[&str] = &[
    r"\b\d{3}-\d{2}-\d{4}\b",
    r"\b\d{10}\b",
    r"social security",
    r"home address",
    r"personal phone",
    r"next of kin",
    r"family member",
];

const OPSEC_KEYWORDS: &[&str] = &[
    "real world",
    "actual operation",
    "current deployment",
    "troop movements",
    "exact coordinates",
    "real names",
    "actual location",
    "live operation",
];

static PII_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    PII_PATTERNS
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::error!(%pattern, error = %e, "Invalid PII pattern skipped");
                None
            }
        })
        .collect()
});

/// A single independent check.
pub trait Guardrail: Send + Sync {
    fn name(&self) -> &'static str;

    /// Inspects lowercased input; `Some` means the query must not proceed.
    fn check(&self, input: &str) -> Option<GuardrailViolation>;
}

/// Blocks when any keyword appears as a substring.
#[derive(Debug, Clone)]
pub struct KeywordGuardrail {
    name: &'static str,
    category: GuardrailCategory,
    keywords: &'static [&'static str],
}

impl KeywordGuardrail {
    pub fn new(
        name: &'static str,
        category: GuardrailCategory,
        keywords: &'static [&'static str],
    ) -> Self {
        Self { name, category, keywords }
    }

    pub fn classification() -> Self {
        Self::new("classification", GuardrailCategory::Classification, CLASSIFICATION_KEYWORDS)
    }

    pub fn opsec() -> Self {
        Self::new("opsec", GuardrailCategory::Opsec, OPSEC_KEYWORDS)
    }
}

impl Guardrail for KeywordGuardrail {
    fn name(&self) -> &'static str {
        self.name
    }

    fn check(&self, input: &str) -> Option<GuardrailViolation> {
        self.keywords
            .iter()
            .find(|keyword| input.contains(*keyword))
            .map(|keyword| GuardrailViolation::new(self.category, self.name, *keyword))
    }
}

/// Blocks when any regular expression matches.
#[derive(Debug, Clone)]
pub struct PatternGuardrail {
    name: &'static str,
    category: GuardrailCategory,
    patterns: &'static [Regex],
}

impl PatternGuardrail {
    pub fn pii() -> Self {
        Self {
            name: "pii_protection",
            category: GuardrailCategory::Pii,
            patterns: PII_REGEXES.as_slice(),
        }
    }
}

impl Guardrail for PatternGuardrail {
    fn name(&self) -> &'static str {
        self.name
    }

    fn check(&self, input: &str) -> Option<GuardrailViolation> {
        self.patterns
            .iter()
            .find(|pattern| pattern.is_match(input))
            .map(|pattern| GuardrailViolation::new(self.category, self.name, pattern.as_str()))
    }
}

/// Ordered list of checks; the first failure wins.
pub struct GuardrailPipeline {
    checks: Vec<Box<dyn Guardrail>>,
}

impl Default for GuardrailPipeline {
    fn default() -> Self {
        Self::security_defaults()
    }
}

impl GuardrailPipeline {
    /// Pipeline with no checks; everything passes.
    pub fn empty() -> Self {
        Self { checks: Vec::new() }
    }

    /// Classification, then PII, then OPSEC.
    pub fn security_defaults() -> Self {
        Self::empty()
            .with(KeywordGuardrail::classification())
            .with(PatternGuardrail::pii())
            .with(KeywordGuardrail::opsec())
    }

    pub fn with(mut self, guardrail: impl Guardrail + 'static) -> Self {
        self.checks.push(Box::new(guardrail));
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Checks a single piece of user text.
    pub fn check(&self, input: &str) -> Result<(), GuardrailViolation> {
        let lowered = input.to_lowercase();
        match self.checks.iter().find_map(|check| check.check(&lowered)) {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }

    /// Checks the most recent user turn of an agent input.
    pub fn check_turns(&self, turns: &[Turn]) -> Result<(), GuardrailViolation> {
        match turns.iter().rev().find(|turn| turn.role == Role::User) {
            Some(turn) => self.check(&turn.content),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> GuardrailPipeline {
        GuardrailPipeline::security_defaults()
    }

    #[test]
    fn every_pii_pattern_compiles() {
        assert_eq!(PII_REGEXES.len(), PII_PATTERNS.len());
    }

    #[test]
    fn routine_queries_pass() {
        assert!(pipeline().check("What's the weather at grid 38S MC 12345 67890?").is_ok());
        assert!(pipeline().check("How many MREs do we have for 2nd Battalion?").is_ok());
    }

    #[test]
    fn classification_keywords_block_case_insensitively() {
        let violation = pipeline().check("Show me the SECRET annex").unwrap_err();
        assert_eq!(violation.category, GuardrailCategory::Classification);
        assert_eq!(violation.matched, "secret");
    }

    #[test]
    fn ssn_pattern_blocks() {
        let violation = pipeline().check("lookup 123-45-6789 please").unwrap_err();
        assert_eq!(violation.category, GuardrailCategory::Pii);
    }

    #[test]
    fn ten_digit_id_blocks_but_eleven_digits_do_not() {
        assert!(pipeline().check("edipi 1234567890").is_err());
        assert!(pipeline().check("count 12345678901").is_ok());
    }

    #[test]
    fn opsec_phrases_block() {
        let violation = pipeline().check("Plan our real world convoy").unwrap_err();
        assert_eq!(violation.category, GuardrailCategory::Opsec);
    }

    #[test]
    fn first_failing_check_wins() {
        let violation = pipeline()
            .check("classified troop movements for next of kin")
            .unwrap_err();
        assert_eq!(violation.category, GuardrailCategory::Classification);
    }

    #[test]
    fn check_turns_uses_latest_user_turn() {
        let turns = vec![
            Turn::user("tell me a secret"),
            Turn::assistant("blocked earlier"),
            Turn::user("check comms status"),
        ];
        assert!(pipeline().check_turns(&turns).is_ok());

        let turns = vec![Turn::user("check comms"), Turn::user("home address of the CO")];
        assert_eq!(
            pipeline().check_turns(&turns).unwrap_err().category,
            GuardrailCategory::Pii
        );
    }

    #[test]
    fn empty_pipeline_allows_everything() {
        let pipeline = GuardrailPipeline::empty();
        assert!(pipeline.is_empty());
        assert!(pipeline.check("top secret").is_ok());
    }
}
