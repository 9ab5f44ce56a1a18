use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use liked_library_sync as lib;
use lib::config::Config;
use lib::tasks::{self, Task};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::subscriber as tracing_subscriber_global;
use tracing_appender::rolling::RollingFileAppender;
use tracing_log::LogTracer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "liked-library-sync", version)]
struct Cli {
    /// Path to config TOML. Without it, configuration comes from the environment.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run a single task and exit. Without a subcommand the interactive menu starts.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the catalog tables and print a summary
    Init,
    /// Import liked tracks from Yandex Music
    Import,
    /// Look up genres on MusicBrainz
    Enrich,
    /// Rebuild the genre/artist folder tree
    Folders,
    /// Register one Lidarr root folder per genre
    RootFolders,
    /// Register every artist folder with Lidarr
    Artists,
    /// Validate configuration and exit
    ConfigValidate,
}

impl Commands {
    fn task(&self) -> Option<Task> {
        match self {
            Commands::Init => Some(Task::InitCatalog),
            Commands::Import => Some(Task::ImportLikes),
            Commands::Enrich => Some(Task::EnrichGenres),
            Commands::Folders => Some(Task::RebuildFolders),
            Commands::RootFolders => Some(Task::RegisterRootFolders),
            Commands::Artists => Some(Task::RegisterArtists),
            Commands::ConfigValidate => None,
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let cfg = match &cli.config {
        Some(p) => Config::from_path(p).with_context(|| format!("loading config from {}", p.display()))?,
        None => Config::from_env(),
    };
    cfg.validate()?;
    Ok(cfg)
}

fn init_logging(cfg: &Config) -> tracing_appender::non_blocking::WorkerGuard {
    // Logs go to both stdout and a daily-rotated file in cfg.log_dir.
    let _ = LogTracer::init();
    let file_appender: RollingFileAppender = tracing_appender::rolling::daily(&cfg.log_dir, "liked-library-sync.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Honor RUST_LOG if set, otherwise default to info.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer);

    if tracing_subscriber_global::set_global_default(subscriber).is_err() {
        eprintln!("a global tracing subscriber was already installed");
    }
    guard
}

fn print_menu() {
    println!("\n=== Main menu ===");
    for task in Task::ALL {
        println!("{}. {}", task.menu_key(), task.label());
    }
    println!("0. Exit");
}

async fn run_menu(cfg: &Config) -> Result<()> {
    let stdin = io::stdin();
    loop {
        print_menu();
        print!("Choose an option: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            return Ok(());
        }
        let choice = line.trim();
        if choice == "0" {
            return Ok(());
        }
        match Task::from_menu_key(choice) {
            Some(task) => {
                if let Err(e) = tasks::run(task, cfg).await {
                    eprintln!("Task failed: {:#}", e);
                }
            }
            None => println!("Invalid choice, try again."),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = match load_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            std::process::exit(2);
        }
    };

    if let Some(Commands::ConfigValidate) = cli.command {
        println!("OK");
        return Ok(());
    }

    let _guard = init_logging(&cfg);

    match cli.command.as_ref().and_then(Commands::task) {
        Some(task) => tasks::run(task, &cfg).await.with_context(|| format!("running task: {}", task.label()))?,
        None => run_menu(&cfg).await?,
    }

    Ok(())
}
