use clap::Parser; // for cli
use policy_bot_gateway::{
    build_router,
    config::Args,
    metrics::RATE_LIMIT_CLIENTS,
    orchestrator::AnswerOrchestrator,
    provider::OpenAiProvider,
    rate_limit::RateLimiter,
    state::AppState,
    sweeper::rate_limit_sweeper,
    telemetry,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();
    let args = Args::parse();

    let policy_context = args.load_policy_context()?;
    if args.api_key.as_deref().is_none_or(|key| key.trim().is_empty()) {
        tracing::warn!("no completion API key configured, every answer will come from the fallback responder");
    }

    let client = reqwest::Client::builder()
        .timeout(args.provider_timeout())
        .build()?;
    let provider = Arc::new(OpenAiProvider::new(
        client,
        args.api_url.clone(),
        args.model.clone(),
        args.api_key.clone(),
    ));

    let rate_limit = args.rate_limit_config();
    let limiter = Arc::new(RateLimiter::new(rate_limit));
    let orchestrator =
        AnswerOrchestrator::new(Arc::clone(&limiter), provider, policy_context, args.max_tokens);
    let state = Arc::new(AppState::new(orchestrator));

    // spawn the background sweeper
    tokio::spawn(rate_limit_sweeper(
        limiter,
        args.sweep_every(),
        RATE_LIMIT_CLIENTS.clone(),
    ));

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, "policy bot gateway running");
    tracing::info!(upstream = %args.api_url, model = %args.model, "completion provider");
    tracing::info!(
        max_requests = rate_limit.max_requests,
        window_secs = rate_limit.window.as_secs(),
        "rate limit"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
