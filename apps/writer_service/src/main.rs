use anyhow::Context;
use dotenvy::dotenv;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};
use writer_service::{
    app_module::AppState,
    app_router::app,
    config::{AppConfig, Environment},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = AppConfig::from_env().context("failed to load configuration")?;
    init_tracing(&config.environment)?;

    let addr = config.socket_addr()?;
    tracing::info!(
        base_url = %config.writer.base_url,
        model = %config.writer.model,
        "chat completion endpoint configured"
    );

    let state = AppState::new(config).context("failed to build application state")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("unable to bind {}", addr))?;

    tracing::info!("Server started, listening on {}", addr);
    axum::serve(listener, app(state))
        .await
        .context("server terminated unexpectedly")?;

    Ok(())
}

fn init_tracing(environment: &Environment) -> anyhow::Result<()> {
    let subscriber_builder = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("writer_service=info,xhs_llm=info,tower_http=info")),
        )
        .with_level(true)
        .with_span_events(FmtSpan::CLOSE);

    if *environment == Environment::Dev {
        tracing::subscriber::set_global_default(
            subscriber_builder
                .compact()
                .pretty()
                .with_ansi(true)
                .finish(),
        )
        .context("setting dev subscriber failed")
    } else {
        tracing::subscriber::set_global_default(
            subscriber_builder.json().with_ansi(false).finish(),
        )
        .context("setting prod subscriber failed")
    }
}
