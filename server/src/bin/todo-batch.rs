//! Operator tool: schema migrations and bulk todo operations.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use todo_core::TodoService;
use todo_server::{postgres, telemetry, Config, PostgresTodoRepository};
use tracing::info;

/// Todo API batch tool.
#[derive(Parser, Debug)]
#[command(name = "todo-batch")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run database migrations.
    Migrate {
        #[command(subcommand)]
        direction: Direction,
    },
    /// List all todos.
    List,
    /// Mark all todos as complete.
    CompleteAll,
}

#[derive(Subcommand, Debug)]
enum Direction {
    /// Run all pending migrations.
    Up,
    /// Roll back the last migration.
    Down,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_env().context("load config")?;
    telemetry::init(&config.log_level);

    let pool = postgres::connect(&config)
        .await
        .context("connect to database")?;

    match cli.command {
        Command::Migrate { direction } => migrate(&pool, direction).await?,
        Command::List => {
            let service = service(&pool);
            let todos = service.list_todos().await.context("list todos")?;
            if todos.is_empty() {
                println!("No todos found.");
            }
            for todo in &todos {
                let status = if todo.completed() { "[x]" } else { "[ ]" };
                println!("{status} {} {}", todo.id(), todo.title());
            }
        }
        Command::CompleteAll => {
            let service = service(&pool);
            let count = service
                .complete_all_todos()
                .await
                .context("complete all")?;
            println!("Marked {count} todos as complete.");
        }
    }

    pool.close().await;
    Ok(())
}

fn service(pool: &sqlx::PgPool) -> TodoService<PostgresTodoRepository> {
    TodoService::new(
        PostgresTodoRepository::new(pool.clone()),
        tracing::info_span!("todo_batch"),
    )
}

async fn migrate(pool: &sqlx::PgPool, direction: Direction) -> Result<()> {
    match direction {
        Direction::Up => {
            postgres::MIGRATOR.run(pool).await.context("migrate up")?;
            info!("migrations applied successfully");
        }
        Direction::Down => {
            let Some((latest, target)) = postgres::rollback_target(pool)
                .await
                .context("read applied migrations")?
            else {
                info!("no migrations to roll back");
                return Ok(());
            };
            postgres::MIGRATOR
                .undo(pool, target)
                .await
                .context("migrate down")?;
            info!(version = latest, "migration rolled back successfully");
        }
    }
    Ok(())
}
