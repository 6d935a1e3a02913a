use std::sync::Arc;

use depthq::{
    app,
    auth::repo::PgUserStore,
    config::AppConfig,
    state::{self, AppState},
    weather::client::OpenWeatherClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "depthq=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(AppConfig::from_env()?);
    let db = state::connect_db(&config).await?;

    if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    let weather = OpenWeatherClient::new(&config.weather)?;
    let app_state = AppState::from_parts(
        config.clone(),
        Arc::new(PgUserStore::new(db)),
        Arc::new(weather),
    );

    let router = app::build_app(app_state)?;
    app::serve(router, &config).await
}
