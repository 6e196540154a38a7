//! The staff tool set: lookup by name, monitored invocation and the
//! published catalogue.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use serde_json::Value;

use super::catalog::ToolSpec;
use super::{intelligence, logistics, operations, personnel, ToolDefinition, ToolError};
use crate::domain::telemetry::{Section, ToolMonitor, ToolObserver};

/// Dashboard entry for one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
}

/// Tools grouped by owning section, in staff order.
pub type ToolsBySection = BTreeMap<Section, Vec<ToolInfo>>;

/// Every domain tool, wrapped with telemetry.
///
/// The observer is fixed at construction. Mock data comes from a shared
/// random source so a seeded set is reproducible.
pub struct ToolSet {
    specs: Vec<ToolSpec>,
    index: HashMap<String, usize>,
    monitor: ToolMonitor,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSet")
            .field("tools", &self.specs.len())
            .finish_non_exhaustive()
    }
}

impl ToolSet {
    pub fn new(observer: Arc<dyn ToolObserver>) -> Self {
        Self::build(ToolMonitor::new(observer), StdRng::from_entropy())
    }

    /// Deterministic mock data, for tests and demos.
    pub fn with_seed(observer: Arc<dyn ToolObserver>, seed: u64) -> Self {
        Self::build(ToolMonitor::new(observer), StdRng::seed_from_u64(seed))
    }

    /// A tool set whose telemetry goes nowhere.
    pub fn unmonitored() -> Self {
        Self::build(ToolMonitor::disabled(), StdRng::from_entropy())
    }

    fn build(monitor: ToolMonitor, rng: StdRng) -> Self {
        let specs: Vec<ToolSpec> = personnel::specs()
            .into_iter()
            .chain(intelligence::specs())
            .chain(operations::specs())
            .chain(logistics::specs())
            .collect();
        let index = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.definition.name().to_string(), i))
            .collect();
        Self {
            specs,
            index,
            monitor,
            rng: Mutex::new(rng),
        }
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn definition(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.specs[i].definition)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.specs.iter().map(|spec| &spec.definition)
    }

    /// Function-calling definitions for an OpenAI-compatible API.
    pub fn openai_tools(&self) -> Vec<Value> {
        self.definitions().map(ToolDefinition::to_openai_format).collect()
    }

    /// Calls a tool by name.
    ///
    /// Unknown names fail before any telemetry is emitted. Known tools emit
    /// one start event and then one complete or error event; the tool's own
    /// result or error is returned unchanged.
    pub fn invoke(&self, name: &str, arguments: &Value) -> Result<Value, ToolError> {
        let spec = self.spec(name)?;

        self.monitor
            .call(name, spec.definition.section(), arguments, || {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                (spec.handler)(arguments, &mut rng)
            })
    }

    /// Calls a tool with its arguments still in wire form.
    ///
    /// A blank payload means no arguments. A payload that is not JSON fails
    /// as invalid arguments inside the monitor, with the raw text as the
    /// parameter snapshot.
    pub fn invoke_raw(&self, name: &str, raw_arguments: &str) -> Result<Value, ToolError> {
        if raw_arguments.trim().is_empty() {
            return self.invoke(name, &Value::Null);
        }
        match serde_json::from_str::<Value>(raw_arguments) {
            Ok(arguments) => self.invoke(name, &arguments),
            Err(err) => {
                let spec = self.spec(name)?;
                let raw = Value::String(raw_arguments.to_string());
                self.monitor
                    .call(name, spec.definition.section(), &raw, || {
                        Err::<Value, _>(ToolError::invalid(
                            name,
                            format!("invalid JSON arguments: {}", err),
                        ))
                    })
            }
        }
    }

    fn spec(&self, name: &str) -> Result<&ToolSpec, ToolError> {
        match self.index.get(name) {
            Some(&i) => Ok(&self.specs[i]),
            None => {
                tracing::warn!(tool_name = name, "unknown tool requested");
                Err(ToolError::UnknownTool(name.to_string()))
            }
        }
    }

    /// Catalogue grouped by section for the dashboard.
    pub fn tools_info(&self) -> ToolsBySection {
        let mut grouped: ToolsBySection = Section::ALL.iter().map(|s| (*s, Vec::new())).collect();
        for definition in self.definitions() {
            grouped
                .entry(definition.section())
                .or_default()
                .push(ToolInfo {
                    name: definition.name().to_string(),
                    display_name: definition.display_name(),
                    description: definition.description().to_string(),
                });
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::{ToolEvent, ToolPhase};
    use serde_json::json;
    use std::sync::Mutex;

    fn recording() -> (Arc<Mutex<Vec<ToolEvent>>>, Arc<dyn ToolObserver>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let observer: Arc<dyn ToolObserver> = Arc::new(move |event: &ToolEvent| {
            sink.lock().unwrap().push(event.clone());
        });
        (events, observer)
    }

    #[test]
    fn catalogue_covers_every_section() {
        let tools = ToolSet::unmonitored();
        assert_eq!(tools.len(), 17);
        for name in [
            "get_weather_conditions",
            "compute_operation_feasibility",
            "generate_decision_package",
            "calculate_sustainment",
            "generate_perstat_report",
            "submit_report",
        ] {
            assert!(tools.contains(name), "missing {name}");
        }

        let info = tools.tools_info();
        assert_eq!(info[&Section::S1].len(), 1);
        assert_eq!(info[&Section::S2].len(), 4);
        assert_eq!(info[&Section::S3].len(), 7);
        assert_eq!(info[&Section::S4].len(), 5);
    }

    #[test]
    fn invoke_is_transparent_and_emits_start_then_complete() {
        let (events, observer) = recording();
        let tools = ToolSet::with_seed(observer, 1);

        let value = tools
            .invoke("check_vehicle_status", &json!({"vehicle_type": "HMMWV", "unit": "2/5"}))
            .unwrap();
        assert_eq!(value["operational"], 15);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].phase(), ToolPhase::Start);
        assert_eq!(events[1].phase(), ToolPhase::Complete);
        assert_eq!(events[1].success(), Some(true));
        assert_eq!(events[1].section(), Section::S4);
        assert_eq!(events[1].result(), Some(&value));
    }

    #[test]
    fn invalid_arguments_emit_error_and_return_it() {
        let (events, observer) = recording();
        let tools = ToolSet::with_seed(observer, 1);

        let err = tools
            .invoke(
                "calculate_sustainment",
                &json!({"unit": "2/5", "personnel_count": -5, "duration_hours": 24}),
            )
            .unwrap_err();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].phase(), ToolPhase::Error);
        assert_eq!(events[1].success(), Some(false));
        assert_eq!(events[1].error_message(), Some(err.to_string().as_str()));
        assert!(events[1].duration_secs().is_some_and(|d| d >= 0.0));
    }

    #[test]
    fn malformed_json_arguments_fail_through_the_monitor() {
        let (events, observer) = recording();
        let tools = ToolSet::with_seed(observer, 1);

        let err = tools.invoke_raw("check_comms_status", "{bad").unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
        assert!(err.to_string().contains("invalid JSON arguments"));

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].phase(), ToolPhase::Start);
        assert_eq!(events[0].parameters().unwrap()["args"], "{bad");
        assert_eq!(events[1].phase(), ToolPhase::Error);
        assert_eq!(events[1].section(), Section::S3);
    }

    #[test]
    fn raw_arguments_parse_before_invoking() {
        let (events, observer) = recording();
        let tools = ToolSet::with_seed(observer, 1);

        let value = tools
            .invoke_raw("check_vehicle_status", r#"{"vehicle_type":"LAV","unit":"1st LAR"}"#)
            .unwrap();
        assert_eq!(value["operational"], 8);
        assert!(tools.invoke_raw("check_comms_status", "  ").is_ok());
        assert_eq!(events.lock().unwrap().len(), 4);
    }

    #[test]
    fn decision_package_tolerates_malformed_fields() {
        let tools = ToolSet::unmonitored();

        let missing_id = tools
            .invoke("generate_decision_package", &json!({"mission_summary": "Screen"}))
            .unwrap();
        assert_eq!(missing_id["package"]["frago_id"], "");
        assert_eq!(missing_id["decision"], "GO");

        let mixed = tools
            .invoke(
                "generate_decision_package",
                &json!({"frago_id": "FRAGO-9", "issues": ["fuel low", 7]}),
            )
            .unwrap();
        assert_eq!(mixed["package"]["score"], 7);

        let null_issues = tools
            .invoke(
                "generate_decision_package",
                &json!({"frago_id": "FRAGO-9", "issues": null, "recommendations": null}),
            )
            .unwrap();
        assert_eq!(null_issues["package"]["score"], 10);
    }

    #[test]
    fn unknown_tool_emits_nothing() {
        let (events, observer) = recording();
        let tools = ToolSet::with_seed(observer, 1);

        let err = tools.invoke("launch_missiles", &json!({})).unwrap_err();
        assert_eq!(err, ToolError::UnknownTool("launch_missiles".into()));
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn seeded_sets_are_reproducible() {
        let a = ToolSet::with_seed(Arc::new(crate::domain::telemetry::NoopObserver), 9);
        let b = ToolSet::with_seed(Arc::new(crate::domain::telemetry::NoopObserver), 9);
        let args = json!({"area": "AO RED"});
        assert_eq!(
            a.invoke("check_threat_assessment", &args).unwrap(),
            b.invoke("check_threat_assessment", &args).unwrap()
        );
    }

    #[test]
    fn openai_tools_match_catalogue() {
        let tools = ToolSet::unmonitored();
        let openai = tools.openai_tools();
        assert_eq!(openai.len(), tools.len());
        assert!(openai.iter().all(|t| t["type"] == "function"));
    }
}
