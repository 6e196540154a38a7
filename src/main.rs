use std::process::ExitCode;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use mcoa::adapters::{
    app_router, BroadcastSink, DashboardAppState, OpenAIRuntime, OpenAIRuntimeConfig,
    ScriptedRuntime,
};
use mcoa::application::AssistantServices;
use mcoa::config::{AgentConfig, AgentProvider, AppConfig};
use mcoa::ports::{AgentError, AgentRuntime};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server terminated");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn build_runtime(config: &AgentConfig) -> Result<Arc<dyn AgentRuntime>, AgentError> {
    match config.provider {
        AgentProvider::Scripted => Ok(Arc::new(ScriptedRuntime::demo())),
        AgentProvider::OpenAI => {
            let api_key = config
                .api_key
                .as_ref()
                .map(|key| key.expose_secret().clone())
                .unwrap_or_default();
            let runtime = OpenAIRuntime::new(
                OpenAIRuntimeConfig::new(api_key)
                    .with_model(config.model.clone())
                    .with_base_url(config.base_url.clone())
                    .with_timeout(config.timeout())
                    .with_max_retries(config.max_retries),
            )?;
            Ok(Arc::new(runtime))
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = build_runtime(&config.agent)?;
    let telemetry = Arc::new(BroadcastSink::new(config.runs.telemetry_channel_capacity));
    let services = AssistantServices::build(runtime, telemetry.clone(), config.service_options());

    let info = services.assistant.runtime_info();
    tracing::info!(
        runtime = %info.name,
        model = %info.model,
        tools = services.assistant.tools().len(),
        "Assistant initialized"
    );

    let app = app_router(DashboardAppState::new(services, telemetry), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Dashboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
