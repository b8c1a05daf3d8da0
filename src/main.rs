use bootcamp_api::{aggregate, config, db, routes};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bootcamp_api=debug,tower_http=info".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting bootcamp API in {:?} mode", config.environment);

    if let Err(e) = db::connect().await {
        tracing::error!("database startup failed: {}", e);
        std::process::exit(1);
    }

    aggregate::start();

    let app = routes::app();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
