use anyhow::Context;

mod app;
mod auth;
mod config;
mod dates;
mod db;
mod dto;
mod error;
mod events;
mod expenses;
mod guests;
mod mailer;
mod notify;
mod ownership;
mod state;
mod tasks;

#[cfg(test)]
mod test_utils;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "event_planner=debug,axum=info,tower_http=info".to_string());
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

    let config = AppConfig::from_env()?;
    let pool = db::connect(&config.database).await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("run migrations")?;
    tracing::info!("migrations applied");

    if !config.email.enabled {
        tracing::warn!("EMAIL_ENABLED=false, invitations will not be sent");
    }
    let state = AppState::init(&config, pool)?;

    app::serve(app::build_app(state), &config.server).await
}
