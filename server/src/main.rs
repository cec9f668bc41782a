use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use todo_core::TodoService;
use todo_server::{postgres, telemetry, Config, PostgresTodoRepository};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("load config")?;
    telemetry::init(&config.log_level);

    let pool = postgres::connect(&config)
        .await
        .context("connect to database")?;
    info!("database connection established");

    postgres::MIGRATOR
        .run(&pool)
        .await
        .context("run migrations")?;

    let repo = PostgresTodoRepository::new(pool.clone());
    let service = Arc::new(TodoService::new(repo, tracing::info_span!("todo_service")));
    let router = todo_server::app_with_timeout(service, config.request_timeout);

    let listener = TcpListener::bind(config.http_addr)
        .await
        .with_context(|| format!("bind {}", config.http_addr))?;
    info!(addr = %config.http_addr, "server starting");

    todo_server::run(listener, router).await.context("serve")?;

    pool.close().await;
    info!("server stopped");
    Ok(())
}
