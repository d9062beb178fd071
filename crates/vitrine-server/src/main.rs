use vitrine_server::{ServerError, Settings};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitrine_server=info,tower_http=info".into()),
        )
        .init();

    let settings = Settings::load()?;
    vitrine_server::run(settings).await
}
