use anyhow::{Context, Result};
use locale_router::config::Config;
use locale_router::i18n::LocaleRegistry;
use locale_router::server::{build_app, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_router=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let registry = LocaleRegistry::standard(&config.default_locale)
        .context("Invalid DEFAULT_LOCALE")?;
    info!(
        "Serving {} locales (default '{}')",
        registry.list().len(),
        registry.default_locale()
    );

    let app = build_app(AppState::new(registry));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on {}", address);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
