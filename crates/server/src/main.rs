mod config;
mod http;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use api::{AppState, mailer::LogMailer, seed};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_obs::{ObsConfig, init_tracing};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use tracing::{info, warn};

use crate::{config::AppConfig, http::ServeConfig};

#[derive(Parser, Debug)]
#[command(name = "ems-server", version, about = "Employee Management System server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the REST + GraphQL + WebSocket server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Insert the demo organization with HR accounts, employees and history.
    Seed,
    /// Print the GraphQL schema.
    #[command(name = "schema:print")]
    SchemaPrint {
        #[arg(long, value_name = "FILE", help = "Destination file path")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
    /// Rollback every migration, then apply them all again.
    Reset,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, env = "PORT", default_value_t = 5001)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(ObsConfig {
        service_name: "ems-server",
        ..ObsConfig::default()
    })?;
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, AppConfig::load()?).await,
        Command::Migrate(action) => {
            let config = AppConfig::load()?;
            let db = connect(&config.database_url).await?;
            match action {
                MigrateCommand::Up => {
                    Migrator::up(&db, None).await?;
                    info!("database migrations applied");
                }
                MigrateCommand::Down => {
                    Migrator::down(&db, Some(1)).await?;
                    info!("most recent migration rolled back");
                }
                MigrateCommand::Reset => {
                    Migrator::reset(&db).await?;
                    Migrator::up(&db, None).await?;
                    info!("database reset");
                }
            }
            Ok(())
        }
        Command::Seed => run_seed(AppConfig::load()?).await,
        Command::SchemaPrint { output } => schema_print(output),
    }
}

async fn connect(url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(url.to_string());
    options.sqlx_logging(false);
    Database::connect(options)
        .await
        .with_context(|| "failed to connect to DATABASE_URL")
}

async fn run_server(cmd: ServeCommand, config: AppConfig) -> Result<()> {
    let db = connect(&config.database_url).await?;
    ensure_migrations(&db, cmd.allow_dirty).await?;
    info!(
        env = ?config.env,
        debug_routes = config.api.debug_routes,
        currency = %config.api.currency,
        "starting ems server"
    );
    let state = AppState::new(db, config.auth, config.api, Arc::new(LogMailer));
    http::serve((&cmd).into(), state, &config.cors_allowed_origins).await
}

async fn ensure_migrations(db: &DatabaseConnection, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(db).await?;
    if pending.is_empty() {
        return Ok(());
    }
    if allow_dirty {
        warn!(pending = pending.len(), "starting with pending migrations");
        return Ok(());
    }
    anyhow::bail!(
        "pending migrations detected; run `ems-server migrate up` or pass --allow-dirty"
    );
}

async fn run_seed(config: AppConfig) -> Result<()> {
    let db = connect(&config.database_url).await?;
    Migrator::up(&db, None).await?;
    let organizations = entity::organization::Entity::find().count(&db).await?;
    if organizations > 0 {
        warn!(organizations, "database already holds data; seed skipped");
        return Ok(());
    }
    let seeded = seed::seed_demo(&db, Utc::now().date_naive())
        .await
        .context("seed data failed")?;
    info!(
        organization = %seeded.organization.name,
        employees = seeded.employees.len(),
        hr_accounts = seeded.hr_profiles.len(),
        "demo data seeded"
    );
    println!("HR admin:   {} / {}", seed::ADMIN_EMAIL, seed::ADMIN_PASSWORD);
    println!("HR manager: {} / {}", seed::MANAGER_EMAIL, seed::MANAGER_PASSWORD);
    println!(
        "Employees:  {} / {}",
        seeded
            .employees
            .iter()
            .map(|employee| employee.email.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        seed::EMPLOYEE_PASSWORD
    );
    Ok(())
}

fn schema_print(path: Option<PathBuf>) -> Result<()> {
    let schema = api::graphql::build_schema(
        DatabaseConnection::Disconnected,
        Arc::new(api::ApiSettings::default()),
    );
    let sdl = schema.0.sdl();
    match path {
        Some(target) => {
            std::fs::write(&target, sdl)
                .with_context(|| format!("failed to write {}", target.display()))?;
            info!(path = %target.display(), "graphql schema written");
        }
        None => println!("{sdl}"),
    }
    Ok(())
}
