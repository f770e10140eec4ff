use anyhow::Context;

mod app;
mod auth;
mod blogs;
mod categories;
mod config;
mod error;
mod events;
mod extract;
mod seed;
mod seo;
mod slug;
mod state;
mod store;
mod validation;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "blogwave=debug,axum=info,tower_http=info".to_string());
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

    let state = state::AppState::init().await?;

    if state.config.seed_demo_data {
        seed::load_demo_data(state.store.as_ref())
            .await
            .context("loading demo data")?;
    }

    tokio::spawn(events::log_invalidations(state.events.subscribe()));

    app::serve(app::build_app(state)).await
}
