//! Scripted agent runtime for tests and offline demos.
//!
//! Stands in for an LLM: each request is matched against keyword triggers
//! on the newest input turn, and the matching [`Script`] plays a fixed
//! sequence of tool calls through the real [`ToolSet`] before producing its
//! final output. Tool telemetry and run attribution therefore behave
//! exactly as they do with a live model.
//!
//! # Features
//!
//! - Keyword-triggered scripts with a fallback
//! - Simulated latency per step
//! - Error and guardrail-tripwire injection
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let runtime = ScriptedRuntime::new()
//!     .on("lav", Script::reply("8 of 10 LAVs up")
//!         .call("check_vehicle_status", json!({"vehicle_type": "LAV", "unit": "1st LAR"})))
//!     .with_delay(Duration::from_millis(50));
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::debug;

use crate::domain::conversation::AgentOutput;
use crate::domain::guardrails::{GuardrailCategory, GuardrailViolation};
use crate::domain::tools::ToolSet;
use crate::ports::{AgentError, AgentRequest, AgentRuntime, RuntimeInfo};

/// How a script ends.
#[derive(Debug, Clone)]
enum Finish {
    Output(AgentOutput),
    /// Returns the last successful tool result as structured output.
    LastToolResult,
    Fail(String),
    Tripwire(GuardrailCategory),
}

/// Tool calls to make, then how to finish.
#[derive(Debug, Clone)]
pub struct Script {
    calls: Vec<(String, Value)>,
    finish: Finish,
}

impl Script {
    /// Finishes with model text.
    pub fn reply(text: impl Into<String>) -> Self {
        Self::finishing(Finish::Output(AgentOutput::from_model_text(text)))
    }

    /// Finishes with a structured record.
    pub fn structured(value: Value) -> Self {
        Self::finishing(Finish::Output(AgentOutput::Structured(value)))
    }

    /// Finishes with whatever the last successful tool call returned.
    pub fn last_tool_result() -> Self {
        Self::finishing(Finish::LastToolResult)
    }

    /// Fails as an unavailable provider.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::finishing(Finish::Fail(message.into()))
    }

    /// Trips a runtime-side input guardrail before any tool call.
    pub fn tripwire(category: GuardrailCategory) -> Self {
        Self::finishing(Finish::Tripwire(category))
    }

    /// Adds a tool call, made in order before finishing.
    pub fn call(mut self, tool: impl Into<String>, arguments: Value) -> Self {
        self.calls.push((tool.into(), arguments));
        self
    }

    fn finishing(finish: Finish) -> Self {
        Self {
            calls: Vec::new(),
            finish,
        }
    }
}

/// Agent runtime driven by keyword-triggered scripts.
#[derive(Debug, Clone)]
pub struct ScriptedRuntime {
    /// Lowercased trigger and script, first match wins.
    scripts: Vec<(String, Script)>,
    fallback: Script,
    delay: Duration,
    calls: Arc<Mutex<Vec<AgentRequest>>>,
}

impl Default for ScriptedRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedRuntime {
    pub fn new() -> Self {
        Self {
            scripts: Vec::new(),
            fallback: Script::reply("Roger, standing by. How copy, over?"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Runtime answering the dashboard's sample queries with real tool calls.
    pub fn demo() -> Self {
        Self::new()
            .with_delay(Duration::from_millis(150))
            .on(
                "weather",
                Script::reply(
                    "[S-2 INTELLIGENCE] INTSUM: current conditions at the requested grid are \
                     within operational limits. How copy, over?",
                )
                .call(
                    "get_weather_conditions",
                    json!({"grid_reference": "38S MC 12345 67890"}),
                ),
            )
            .on(
                "readiness",
                Script::reply(
                    "[S-3 OPERATIONS] Unit readiness reported. See C-rating in the status feed.",
                )
                .call("check_unit_readiness", json!({"unit": "3rd Platoon"})),
            )
            .on(
                "mre",
                Script::reply("[S-4 LOGISTICS] Class I on hand reported with days of supply.").call(
                    "check_supply_inventory",
                    json!({"unit": "2nd Battalion", "supply_type": "MREs"}),
                ),
            )
            .on(
                "lav",
                Script::reply("[S-4 LOGISTICS] LAV fleet status reported.").call(
                    "check_vehicle_status",
                    json!({"vehicle_type": "LAV", "unit": "1st LAR"}),
                ),
            )
            .on(
                "mission",
                Script::reply("[S-3 OPERATIONS] Mission status reported.")
                    .call("get_mission_status", json!({})),
            )
            .on(
                "threat",
                Script::reply("[S-2 INTELLIGENCE] Threat assessment complete.")
                    .call("check_threat_assessment", json!({"area": "Sector Alpha"})),
            )
            .on(
                "feasib",
                Script::last_tool_result()
                    .call(
                        "get_weather_conditions",
                        json!({"grid_reference": "38S MC 12345 67890"}),
                    )
                    .call("check_threat_assessment", json!({"area": "Objective"}))
                    .call("check_comms_status", json!({}))
                    .call(
                        "compute_operation_feasibility",
                        json!({
                            "operation_name": "Demo Convoy",
                            "grid_reference": "38S MC 12345 67890",
                            "start_time_zulu": "0600Z",
                            "duration_hours": 24,
                            "weather": {"wind_speed_mph": 10, "visibility_meters": 10000},
                            "terrain": {"primary_terrain": "Desert", "mobility_assessment": "Good"},
                            "threat": {"threat_level": "MODERATE"},
                            "readiness": {
                                "personnel_readiness": "92%",
                                "equipment_readiness": "88%"
                            },
                            "vehicle_status": {"operational": 8, "total": 10},
                            "comms": {
                                "primary_net": {"status": "OPERATIONAL"},
                                "alternate_net": {"status": "OPERATIONAL"}
                            },
                            "supply_mres": {"quantity": 1200, "unit": "meals"},
                            "supply_fuel": {"quantity": 3000, "unit": "gallons"}
                        }),
                    ),
            )
    }

    /// Adds a script for inputs containing `trigger` (case-insensitive).
    pub fn on(mut self, trigger: &str, script: Script) -> Self {
        self.scripts.push((trigger.to_lowercase(), script));
        self
    }

    /// Sets the script used when no trigger matches.
    pub fn with_default(mut self, script: Script) -> Self {
        self.fallback = script;
        self
    }

    /// Sets simulated latency before each step.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// All requests received, oldest first.
    pub fn requests(&self) -> Vec<AgentRequest> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn script_for(&self, request: &AgentRequest) -> &Script {
        let input = request.latest_input().unwrap_or_default().to_lowercase();
        self.scripts
            .iter()
            .find(|(trigger, _)| input.contains(trigger.as_str()))
            .map(|(_, script)| script)
            .unwrap_or(&self.fallback)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

fn tripwire(category: GuardrailCategory, request: &AgentRequest) -> AgentError {
    AgentError::GuardrailTripped(GuardrailViolation::new(
        category,
        "runtime",
        request.latest_input().unwrap_or_default(),
    ))
}

#[async_trait]
impl AgentRuntime for ScriptedRuntime {
    async fn run(&self, request: AgentRequest, tools: &ToolSet) -> Result<AgentOutput, AgentError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let script = self.script_for(&request).clone();

        if let Finish::Tripwire(category) = script.finish {
            return Err(tripwire(category, &request));
        }

        // Each tool call costs a turn and the final answer needs one more.
        if script.calls.len() as u32 >= request.max_turns {
            return Err(AgentError::MaxTurnsExceeded {
                max_turns: request.max_turns,
            });
        }

        let mut last_result = None;
        for (tool, arguments) in &script.calls {
            self.pause().await;
            match tools.invoke(tool, arguments) {
                Ok(result) => last_result = Some(result),
                // Tool errors go back to the model, which carries on.
                Err(err) => debug!(tool_name = %tool, error = %err, "Scripted tool call failed"),
            }
        }
        self.pause().await;

        match script.finish {
            Finish::Output(output) => Ok(output),
            Finish::LastToolResult => {
                Ok(last_result.map_or(AgentOutput::Empty, AgentOutput::Structured))
            }
            Finish::Fail(message) => Err(AgentError::unavailable(message)),
            Finish::Tripwire(category) => Err(tripwire(category, &request)),
        }
    }

    fn runtime_info(&self) -> RuntimeInfo {
        RuntimeInfo::new("scripted", "scripted-1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Turn;
    use crate::domain::telemetry::{ToolEvent, ToolObserver, ToolPhase};

    fn request(text: &str) -> AgentRequest {
        AgentRequest::new("Command_Agent", "", vec![Turn::user(text)])
    }

    fn observed_tools() -> (ToolSet, Arc<Mutex<Vec<ToolEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let observer: Arc<dyn ToolObserver> = Arc::new(move |event: &ToolEvent| {
            sink.lock().unwrap().push(event.clone());
        });
        (ToolSet::with_seed(observer, 1), events)
    }

    #[tokio::test]
    async fn trigger_selects_script() {
        let runtime = ScriptedRuntime::new()
            .on("weather", Script::reply("clear"))
            .on("supply", Script::reply("full"));
        let tools = ToolSet::unmonitored();

        let out = runtime.run(request("Supply status?"), &tools).await.unwrap();
        assert_eq!(out, AgentOutput::Text("full".into()));

        let out = runtime.run(request("hello"), &tools).await.unwrap();
        assert!(matches!(out, AgentOutput::Text(t) if t.starts_with("Roger")));
        assert_eq!(runtime.call_count(), 2);
    }

    #[tokio::test]
    async fn tool_calls_go_through_the_tool_set() {
        let runtime = ScriptedRuntime::new().with_default(
            Script::reply("done")
                .call("check_comms_status", json!({}))
                .call("no_such_tool", json!({})),
        );
        let (tools, events) = observed_tools();

        runtime.run(request("comms"), &tools).await.unwrap();

        let phases: Vec<ToolPhase> = events.lock().unwrap().iter().map(|e| e.phase()).collect();
        assert_eq!(phases, vec![ToolPhase::Start, ToolPhase::Complete]);
    }

    #[tokio::test]
    async fn last_tool_result_is_structured_output() {
        let runtime = ScriptedRuntime::new().with_default(Script::last_tool_result().call(
            "check_vehicle_status",
            json!({"vehicle_type": "MTVR", "unit": "CLB-1"}),
        ));
        let tools = ToolSet::unmonitored();

        let out = runtime.run(request("trucks"), &tools).await.unwrap();
        match out {
            AgentOutput::Structured(value) => assert_eq!(value["operational"], 6),
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[tokio::test]
    async fn turn_budget_is_enforced() {
        let mut script = Script::reply("never");
        for _ in 0..3 {
            script = script.call("check_comms_status", json!({}));
        }
        let runtime = ScriptedRuntime::new().with_default(script);
        let tools = ToolSet::unmonitored();

        let err = runtime
            .run(request("x").with_max_turns(3), &tools)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::MaxTurnsExceeded { max_turns: 3 }));
    }

    #[tokio::test]
    async fn demo_feasibility_script_returns_assessment() {
        let runtime = ScriptedRuntime::demo().with_delay(Duration::ZERO);
        let tools = ToolSet::unmonitored();

        let out = runtime
            .run(request("Run a feasibility check for the convoy"), &tools)
            .await
            .unwrap();

        let text = out.into_display_text();
        assert!(text.starts_with("[S-3 OPERATIONS] FEASIBILITY - Demo Convoy"));
        assert!(text.contains("GO"));
    }
}
