use std::sync::Arc;

use anyhow::Context;

use lab_ai_gateway::ai::GroqClient;
use lab_ai_gateway::config::GatewayConfig;
use lab_ai_gateway::handlers::{AppState, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = GatewayConfig::from_env().context("Failed to load gateway configuration")?;

    eprintln!("🧪 Lab AI Gateway v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.groq.model);
    eprintln!("   API: http://0.0.0.0:{}/api/ai", config.port);
    eprintln!(
        "   Caller headers: {}",
        if config.trust_caller_headers { "trusted" } else { "ignored" }
    );

    let groq = GroqClient::new(&config.groq).context("Failed to create Groq client")?;
    tracing::info!(model = groq.model_name(), "Groq client ready");
    let state = AppState::new(Arc::new(groq));

    let app = build_app(state, config.trust_caller_headers);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "Gateway started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
