//! Command-line entry point for the whitelist service

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};
use whitelist::{config::Config, Registration, WhitelistRegistrar};

#[derive(Parser)]
#[command(
    name = "whitelist",
    about = "Verified membership whitelist backed by a shared document",
    version
)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify names and add them to the whitelist
    Register {
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,
    },

    /// Show the entry count and most recent additions
    Stats {
        #[arg(long, default_value_t = 5)]
        recent: usize,
    },

    /// List every entry, paged
    List {
        #[arg(long, default_value_t = 20)]
        page_size: usize,
    },

    /// Check whether a name is whitelisted
    Check { name: String },

    /// Print an example configuration file
    GenConfig,
}

#[derive(Serialize)]
struct RegisterReport<'a> {
    name: &'a str,
    #[serde(flatten)]
    registration: Option<&'a Registration>,
    error: Option<ErrorReport>,
}

#[derive(Serialize)]
struct ErrorReport {
    kind: whitelist::ErrorKind,
    code: &'static str,
    message: String,
}

impl From<&whitelist::Error> for ErrorReport {
    fn from(err: &whitelist::Error) -> Self {
        Self {
            kind: err.kind(),
            code: err.error_code(),
            message: err.to_string(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Command::GenConfig = args.command {
        println!("{}", Config::generate_example()?);
        return Ok(());
    }

    let config = Config::load(args.config.as_deref()).context("failed to load configuration")?;

    let level = if args.debug {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    common::journal::init_logging(level, config.logging.json)
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    info!(
        "Starting whitelist v{} for document {}",
        whitelist::VERSION,
        config.store.document_id
    );

    let registrar = WhitelistRegistrar::from_config(&config)?;

    match args.command {
        Command::Register { names } => register(&registrar, &names, args.json).await,
        Command::Stats { recent } => stats(&registrar, recent, args.json).await,
        Command::List { page_size } => list(&registrar, page_size, args.json).await,
        Command::Check { name } => check(&registrar, &name, args.json).await,
        Command::GenConfig => Ok(()),
    }
}

async fn register(registrar: &WhitelistRegistrar, names: &[String], json: bool) -> Result<()> {
    let results = registrar.register_many(names).await;
    let mut failures = 0;

    for (name, result) in names.iter().zip(&results) {
        if let Err(e) = result {
            failures += 1;
            error!(name = %name, code = e.error_code(), "Registration failed: {}", e);
        }

        if json {
            let report = RegisterReport {
                name,
                registration: result.as_ref().ok(),
                error: result.as_ref().err().map(ErrorReport::from),
            };
            println!("{}", serde_json::to_string(&report)?);
            continue;
        }

        match result {
            Ok(r) if r.is_new => println!(
                "registered {} (id {}, display name {}), {} total",
                r.canonical_name,
                r.identity.id,
                r.identity.display_name_or_name(),
                r.total_count
            ),
            Ok(r) => println!(
                "{} is already registered, {} total",
                r.canonical_name, r.total_count
            ),
            Err(e) => println!("{name}: {e}"),
        }
    }

    if failures > 0 {
        bail!("{failures} of {} registrations failed", names.len());
    }
    Ok(())
}

async fn stats(registrar: &WhitelistRegistrar, recent: usize, json: bool) -> Result<()> {
    let stats = registrar.stats().await.context("failed to read whitelist")?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "count": stats.count, "recent": stats.recent(recent) })
        );
        return Ok(());
    }

    println!("{} registered", stats.count);
    if stats.count > 0 && recent > 0 {
        println!("most recent:");
        for name in stats.recent(recent) {
            println!("  {name}");
        }
    }
    Ok(())
}

async fn list(registrar: &WhitelistRegistrar, page_size: usize, json: bool) -> Result<()> {
    let stats = registrar.stats().await.context("failed to read whitelist")?;

    if json {
        println!("{}", serde_json::to_string(&stats)?);
        return Ok(());
    }

    if stats.count == 0 {
        println!("whitelist is empty");
        return Ok(());
    }

    let pages = stats.pages(page_size);
    let total_pages = pages.len();
    for (i, page) in pages.enumerate() {
        println!("page {}/{} ({} total)", i + 1, total_pages, stats.count);
        for name in page {
            println!("  {name}");
        }
    }
    Ok(())
}

async fn check(registrar: &WhitelistRegistrar, name: &str, json: bool) -> Result<()> {
    let registered = registrar
        .check_membership(name)
        .await
        .context("failed to read whitelist")?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "name": name, "registered": registered })
        );
    } else if registered {
        println!("{name} is whitelisted");
    } else {
        println!("{name} is not whitelisted");
    }
    Ok(())
}
