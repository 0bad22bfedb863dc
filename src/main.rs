//! Binary entrypoint for the ZapGames CLI.
//!
//! Commands:
//! - `start` - serve chat events as JSON lines on stdin, replies on stdout
//! - `init` - write a starter `config.toml`
//! - `ranking` - print the chess ranking from the ledger
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use zapgames::bot::BotServer;
use zapgames::chess::ledger::{format_ranking, ranking};
use zapgames::chess::{JsonLedger, Ledger};
use zapgames::config::Config;

#[derive(Parser)]
#[command(name = "zapgames")]
#[command(about = "Checkers and chess for WhatsApp group chats")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Start,
    /// Write a default configuration file
    Init,
    /// Print the chess ranking
    Ranking,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start => {
            let config = Config::load(&cli.config).await?;
            init_logging(Some(&config), cli.verbose);
            info!("Starting ZapGames v{}", env!("CARGO_PKG_VERSION"));
            let mut server = BotServer::new(config);
            server.run().await?;
        }
        Commands::Init => {
            init_logging(None, cli.verbose);
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
        }
        Commands::Ranking => {
            let config = Config::load(&cli.config).await?;
            init_logging(Some(&config), cli.verbose);
            let ledger = JsonLedger::in_data_dir(&config.storage.data_dir);
            let book = ledger.load()?;
            println!("{}", format_ranking(&ranking(&book)));
        }
    }

    Ok(())
}

/// Log to stderr (stdout carries replies), optionally mirrored into the configured file.
fn init_logging(config: Option<&Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    let configured = config
        .and_then(|cfg| cfg.logging.level.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info);
    // CLI verbosity overrides config
    let level = match verbosity {
        0 => configured,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(level);

    let log_file = config
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });

    if let Some(file) = log_file {
        let file = std::sync::Mutex::new(file);
        let is_tty = atty::is(atty::Stream::Stderr);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = file.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
