//! Integration tests for the query pipeline.
//!
//! These tests drive the assembled services with the scripted runtime:
//! 1. Feasibility queries run every staff tool and surface the S-3 report
//! 2. Concurrent runs keep their tool telemetry apart
//! 3. Guardrail blocks and runtime failures close their runs cleanly

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use mcoa::adapters::agent::{Script, ScriptedRuntime};
use mcoa::adapters::telemetry::RecordingSink;
use mcoa::application::{
    AddContextCommand, AssistantServices, ClearHistoryCommand, DispatchCommand, DispatchResult,
    QueryOutcome, ServiceOptions,
};
use mcoa::domain::guardrails::GuardrailCategory;
use mcoa::domain::run::RunStatus;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn services(runtime: ScriptedRuntime) -> (AssistantServices, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let services = AssistantServices::build(
        Arc::new(runtime),
        sink.clone(),
        ServiceOptions {
            tool_seed: Some(42),
            ..ServiceOptions::default()
        },
    );
    (services, sink)
}

fn tool_names(services: &AssistantServices, result: &DispatchResult) -> Vec<String> {
    services
        .registry
        .get(result.run_id)
        .map(|run| run.tools().iter().map(|t| t.tool_name.clone()).collect())
        .unwrap_or_default()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn feasibility_query_runs_staff_tools_and_returns_report() {
    let (services, sink) = services(ScriptedRuntime::demo().with_delay(Duration::ZERO));

    let result = services
        .dispatcher
        .handle(DispatchCommand::Query("Is the convoy feasible tomorrow?".into()))
        .await;

    assert!(result.outcome.is_success());
    let response = result.outcome.response();
    assert!(response.starts_with("[S-3 OPERATIONS] FEASIBILITY - Demo Convoy"));
    assert!(response.contains("DECISION: GO (score 9/10) | Sustainment OK: YES"));

    assert_eq!(
        tool_names(&services, &result),
        vec![
            "get_weather_conditions",
            "check_threat_assessment",
            "check_comms_status",
            "compute_operation_feasibility",
        ]
    );

    let stats = services.stats.snapshot();
    assert_eq!(stats.s2_calls, 2);
    assert_eq!(stats.s3_calls, 2);
    assert_eq!(stats.total_queries, 1);
    assert_eq!(sink.events_of_type("tool_complete").len(), 4);
}

#[tokio::test]
async fn concurrent_queries_are_isolated() {
    let runtime = ScriptedRuntime::new()
        .with_delay(Duration::from_millis(10))
        .on(
            "alpha",
            Script::reply("alpha done")
                .call("check_unit_readiness", json!({"unit": "Alpha Co"}))
                .call("check_comms_status", json!({})),
        )
        .on(
            "bravo",
            Script::reply("bravo done")
                .call("check_vehicle_status", json!({"vehicle_type": "HMMWV", "unit": "Bravo Co"})),
        )
        .on(
            "charlie",
            Script::reply("charlie done")
                .call("generate_perstat_report", json!({"unit": "Charlie Co"})),
        );
    let (services, _) = services(runtime);

    let handles: Vec<_> = ["alpha status", "bravo status", "charlie status"]
        .into_iter()
        .map(|query| {
            let dispatcher = services.dispatcher.clone();
            tokio::spawn(async move {
                dispatcher
                    .handle(DispatchCommand::Query(query.into()))
                    .await
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    assert_eq!(
        tool_names(&services, &results[0]),
        vec!["check_unit_readiness", "check_comms_status"]
    );
    assert_eq!(tool_names(&services, &results[1]), vec!["check_vehicle_status"]);
    assert_eq!(tool_names(&services, &results[2]), vec!["generate_perstat_report"]);

    let stats = services.stats.snapshot();
    assert_eq!(stats.total_queries, 3);
    assert_eq!(stats.s1_calls, 1);
    assert_eq!(stats.s3_calls, 2);
    assert_eq!(stats.s4_calls, 1);
    assert_eq!(services.registry.len(), 3);
}

#[tokio::test]
async fn guardrail_block_closes_run_without_agent_call() {
    let (services, sink) = services(ScriptedRuntime::new());

    let result = services
        .dispatcher
        .handle(DispatchCommand::Query("Give me the next of kin for Cpl Smith".into()))
        .await;

    match &result.outcome {
        QueryOutcome::Blocked { category, response } => {
            assert_eq!(*category, GuardrailCategory::Pii);
            assert_eq!(
                response,
                "[SECURITY BLOCK] PII PROTECTION: Personal information request blocked."
            );
        }
        other => panic!("expected block, got {:?}", other),
    }

    let run = services.registry.get(result.run_id).unwrap();
    assert_eq!(run.status(), RunStatus::Closed);
    assert!(run.tools().is_empty());
    assert_eq!(sink.events_of_type("guardrail_triggered").len(), 1);
    assert!(services.assistant.history().is_empty());
}

#[tokio::test]
async fn runtime_failure_is_reported_and_run_closed() {
    let (services, sink) = services(
        ScriptedRuntime::new().with_default(Script::failing("upstream model unavailable")),
    );

    let result = services
        .dispatcher
        .handle(DispatchCommand::Query("status".into()))
        .await;

    assert!(!result.outcome.is_success());
    assert!(result
        .outcome
        .response()
        .starts_with("Error processing query: "));
    assert_eq!(result.run.unwrap().success(), Some(false));
    assert_eq!(sink.events_of_type("processing_error").len(), 1);
    assert_eq!(services.stats.snapshot().total_queries, 1);
}

#[tokio::test]
async fn history_feeds_follow_up_queries_until_cleared() {
    let runtime = ScriptedRuntime::new().with_default(Script::reply("Roger."));
    let (services, _) = services(runtime);

    services
        .add_context
        .handle(AddContextCommand::new("Battalion is in the defense."))
        .unwrap();
    services
        .dispatcher
        .handle(DispatchCommand::Query("first".into()))
        .await;

    let turns: Vec<String> = services
        .assistant
        .history()
        .into_iter()
        .map(|t| t.content)
        .collect();
    assert_eq!(turns, vec!["Battalion is in the defense.", "first", "Roger."]);

    let cleared = services.clear_history.handle(ClearHistoryCommand);
    assert_eq!(cleared.cleared_turns, 3);
    assert_eq!(cleared.stats.total_queries, 0);
    assert!(services.assistant.history().is_empty());
}

#[tokio::test]
async fn frago_is_recorded_in_history_with_markers() {
    let runtime = ScriptedRuntime::new().with_default(Script::reply("GO WITH CAVEATS"));
    let (services, _) = services(runtime);

    let result = services
        .dispatcher
        .handle(DispatchCommand::Frago("FRAGO 12: seize OBJ IRON NLT 0600Z".into()))
        .await;

    assert_eq!(result.outcome.response(), "GO WITH CAVEATS");
    let turns: Vec<String> = services
        .assistant
        .history()
        .into_iter()
        .map(|t| t.content)
        .collect();
    assert_eq!(
        turns,
        vec![
            "[FRAGO RECEIVED]\nFRAGO 12: seize OBJ IRON NLT 0600Z",
            "[FRAGO ANALYSIS]\nGO WITH CAVEATS",
        ]
    );
}
