//! Agent runtime adapters.
//!
//! - [`ScriptedRuntime`] - keyword-scripted runtime for tests and offline demos
//! - [`OpenAIRuntime`] - OpenAI-compatible function-calling runtime

mod openai;
mod scripted;

pub use openai::{OpenAIRuntime, OpenAIRuntimeConfig};
pub use scripted::{Script, ScriptedRuntime};
