use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod menu;
mod sync;

#[derive(Debug, Parser)]
#[command(name = "shopsync-cli")]
#[command(about = "POS to Shopify catalog sync and mega-menu export")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Reconcile the POS catalog into the storefront
    Sync {
        /// Fetch and summarize the POS feed without touching the storefront
        #[arg(long)]
        dry_run: bool,
    },
    /// Generate the Qikify mega menu and write it to disk
    Menu {
        /// Directory for the export; defaults to `SHOPSYNC_MENU_OUTPUT_DIR`
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Show when each action last completed
    Status,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("shopsync-cli: no command given; try --help");
        return Ok(());
    };

    let config = shopsync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Sync { dry_run: true } => sync::run_dry_run(&config).await,
        command => {
            let pool = connect(&config).await?;
            match command {
                Commands::Db {
                    command: DbCommands::Ping,
                } => {
                    shopsync_db::health_check(&pool).await?;
                    println!("database: ok");
                    Ok(())
                }
                Commands::Db {
                    command: DbCommands::Migrate,
                } => {
                    let applied = shopsync_db::run_migrations(&pool).await?;
                    println!("migrations applied: {applied}");
                    Ok(())
                }
                Commands::Sync { .. } => sync::run_sync(&pool, &config).await,
                Commands::Menu { output_dir } => {
                    let dir = output_dir.unwrap_or_else(|| config.menu_output_dir.clone());
                    menu::run_menu(&pool, &config, &dir).await
                }
                Commands::Status => print_status(&pool).await,
            }
        }
    }
}

async fn connect(config: &shopsync_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool = shopsync_db::connect_pool(
        &config.database_url,
        shopsync_db::PoolConfig::from_app_config(config),
    )
    .await?;
    Ok(pool)
}

async fn print_status(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    for (action, synced_at) in shopsync_db::last_syncs(pool).await? {
        match synced_at {
            Some(at) => println!("{:<14} {}", action.as_str(), at.to_rfc3339()),
            None => println!("{:<14} never", action.as_str()),
        }
    }
    Ok(())
}

/// Records a completed action; the run itself already succeeded, so a log
/// failure is reported but not returned.
pub(crate) async fn record_best_effort(pool: &sqlx::PgPool, action: shopsync_core::SyncAction) {
    if let Err(e) = shopsync_db::record_sync(pool, action).await {
        tracing::warn!(action = %action, error = %e, "failed to record sync completion");
    }
}
