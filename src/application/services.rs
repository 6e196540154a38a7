//! Wiring of the assistant's shared state and handlers.

use std::sync::Arc;

use crate::domain::run::{RunRegistry, StatsTracker, DEFAULT_RUN_CAPACITY};
use crate::domain::tools::ToolSet;
use crate::ports::{AgentRuntime, TelemetrySink};

use super::assistant::{Assistant, AssistantSettings};
use super::handlers::{
    AddContextHandler, ClearHistoryHandler, DispatchQueryHandler, ProcessFragoHandler,
    ProcessQueryHandler, DEFAULT_PREVIEW_CHARS,
};
use super::run_recorder::RunRecorder;

/// Knobs for [`AssistantServices::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    pub settings: AssistantSettings,
    pub registry_capacity: usize,
    pub preview_chars: usize,
    /// Seed for mock tool data; `None` draws from entropy.
    pub tool_seed: Option<u64>,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            settings: AssistantSettings::default(),
            registry_capacity: DEFAULT_RUN_CAPACITY,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            tool_seed: None,
        }
    }
}

/// Everything the delivery surface needs, sharing one registry, one
/// statistics tracker and one telemetry sink.
#[derive(Clone)]
pub struct AssistantServices {
    pub assistant: Arc<Assistant>,
    pub registry: Arc<RunRegistry>,
    pub stats: Arc<StatsTracker>,
    pub dispatcher: Arc<DispatchQueryHandler>,
    pub clear_history: Arc<ClearHistoryHandler>,
    pub add_context: Arc<AddContextHandler>,
}

impl AssistantServices {
    pub fn build(
        runtime: Arc<dyn AgentRuntime>,
        sink: Arc<dyn TelemetrySink>,
        options: ServiceOptions,
    ) -> Self {
        let registry = Arc::new(RunRegistry::new(options.registry_capacity));
        let stats = Arc::new(StatsTracker::new());

        let recorder = Arc::new(RunRecorder::new(registry.clone(), stats.clone(), sink.clone()));
        let tools = match options.tool_seed {
            Some(seed) => ToolSet::with_seed(recorder, seed),
            None => ToolSet::new(recorder),
        };

        let assistant = Arc::new(Assistant::new(
            runtime,
            Arc::new(tools),
            stats.clone(),
            sink.clone(),
            options.settings,
        ));

        let dispatcher = DispatchQueryHandler::new(
            Arc::new(ProcessQueryHandler::new(assistant.clone())),
            Arc::new(ProcessFragoHandler::new(assistant.clone())),
            registry.clone(),
            stats.clone(),
            sink,
        )
        .with_preview_chars(options.preview_chars);

        Self {
            clear_history: Arc::new(ClearHistoryHandler::new(assistant.clone())),
            add_context: Arc::new(AddContextHandler::new(assistant.clone())),
            dispatcher: Arc::new(dispatcher),
            assistant,
            registry,
            stats,
        }
    }
}
