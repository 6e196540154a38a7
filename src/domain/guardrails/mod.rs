//! Security guardrails evaluated before any agent call.

mod category;
mod checks;

pub use category::{GuardrailCategory, GuardrailViolation};
pub use checks::{Guardrail, GuardrailPipeline, KeywordGuardrail, PatternGuardrail};
