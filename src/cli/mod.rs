use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use time::OffsetDateTime;
use tracing_subscriber::{fmt, EnvFilter};

use crate::app::PlannerApp;
use crate::config::ConfigLoader;
use crate::model::ShopId;
use crate::remote::HttpContentApi;

pub mod commands;

use self::commands::{
    DeleteArgs, ExportArgs, NewArgs, PlanArgs, PromoteArgs, SetTimeArgs, StatusArgs, TrackerArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "planboard",
    version,
    about = "Content-scheduling planner and delivery tracker"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Override the config file location (takes precedence over PLANBOARD_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Shop scope to operate on (falls back to planner.shop in the config)
    #[arg(long)]
    pub shop: Option<String>,

    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the planner board (default)
    Plan(PlanArgs),
    /// Show the delivery tracker
    Tracker(TrackerArgs),
    /// Show the backlog of unscheduled items
    Inbox,
    /// Create a new content item
    New(NewArgs),
    /// Set one item's planner status
    Status(StatusArgs),
    /// Move a whole day's items to one wall-clock time
    SetTime(SetTimeArgs),
    /// Promote every item at one status to another
    Promote(PromoteArgs),
    /// Print a plain-text digest of a day or the backlog
    Export(ExportArgs),
    /// Delete one item
    Delete(DeleteArgs),
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        env::set_var("PLANBOARD_CONFIG", path);
    }

    let loader = ConfigLoader::discover()?;
    loader.paths().ensure_directories()?;
    init_tracing(&cli.log_level)
        .with_context(|| format!("initialising logging at level {}", cli.log_level))?;
    let config = loader.load_or_init()?;

    let shop = cli
        .shop
        .clone()
        .or_else(|| config.planner.shop.clone())
        .context("no shop scope given; pass --shop or set planner.shop in the config")?;

    let api = HttpContentApi::new(
        &config.api.base_url,
        config.api.resolve_token().as_deref(),
        config.api.timeout(),
    )
    .context("building api client")?;

    let mut app = PlannerApp::new(Arc::new(api), ShopId::from(shop), config.planner.window);
    app.reload().await.context("loading planner items")?;

    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());

    let command = cli.command.unwrap_or(Commands::Plan(PlanArgs::default()));
    match command {
        Commands::Plan(args) => commands::plan(&mut app, now, args),
        Commands::Tracker(args) => commands::tracker(&mut app, now, args),
        Commands::Inbox => commands::inbox(&mut app, now),
        Commands::New(args) => commands::new_item(&mut app, args).await,
        Commands::Status(args) => commands::set_status(&mut app, args).await,
        Commands::SetTime(args) => commands::set_time(&mut app, now, args).await,
        Commands::Promote(args) => commands::promote(&mut app, now, args).await,
        Commands::Export(args) => commands::export(&mut app, now, args),
        Commands::Delete(args) => commands::delete(&mut app, args).await,
    }
}

fn init_tracing(level: &str) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| {
        let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
        Ok(())
    })
    .map(|_| ())
}
