//! Shared plumbing for the staff tool bodies.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{ToolDefinition, ToolError};

/// Signature every tool body shares: JSON arguments in, JSON record out.
pub type ToolHandler = fn(&Value, &mut StdRng) -> Result<Value, ToolError>;

/// A tool's published definition paired with its body.
#[derive(Clone)]
pub struct ToolSpec {
    pub definition: ToolDefinition,
    pub handler: ToolHandler,
}

impl ToolSpec {
    pub fn new(definition: ToolDefinition, handler: ToolHandler) -> Self {
        Self {
            definition,
            handler,
        }
    }
}

impl std::fmt::Debug for ToolSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSpec")
            .field("name", &self.definition.name())
            .finish_non_exhaustive()
    }
}

/// Deserializes tool arguments. A missing argument object reads as `{}`.
pub(crate) fn parse_args<P: DeserializeOwned>(tool: &str, args: &Value) -> Result<P, ToolError> {
    let args = match args {
        Value::Null => Value::Object(Map::new()),
        other => other.clone(),
    };
    serde_json::from_value(args).map_err(|err| ToolError::invalid(tool, err.to_string()))
}

pub(crate) fn to_json<T: Serialize>(tool: &str, record: &T) -> Result<Value, ToolError> {
    serde_json::to_value(record).map_err(|err| ToolError::failed(tool, err.to_string()))
}

pub(crate) fn pick<'a>(rng: &mut StdRng, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Args {
        unit: String,
        #[serde(default)]
        hours: i64,
    }

    #[test]
    fn null_arguments_read_as_empty_object() {
        let err = parse_args::<Args>("t", &Value::Null).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
        assert!(err.to_string().contains("unit"));
    }

    #[test]
    fn defaults_fill_optional_arguments() {
        let args: Args = parse_args("t", &serde_json::json!({"unit": "3rd LAR"})).unwrap();
        assert_eq!(args.unit, "3rd LAR");
        assert_eq!(args.hours, 0);
    }

    #[test]
    fn pick_stays_within_options() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert!(["a", "b"].contains(&pick(&mut rng, &["a", "b"])));
        }
        assert_eq!(pick(&mut rng, &[]), "");
    }
}
