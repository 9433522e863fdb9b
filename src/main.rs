//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `news_ingest` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use news_ingest::config::{Command, GlobalOpts, Opt, SourcesCommand};
use news_ingest::initialization::init_logger_with;
use news_ingest::{run_ingest, SourceConfig, SourceRegistry, SourceSelection};

#[tokio::main]
async fn main() -> Result<()> {
    // Endpoints and tokens may live in a .env file next to the working
    // directory or the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();

    let log_level = opt.global.log_level.clone();
    let log_format = opt.global.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let result = match opt.command {
        Command::Scrape(ref scrape) => {
            let config = opt.to_config(scrape);
            let names = (!scrape.sources.is_empty()).then(|| scrape.sources.clone());
            scrape_command(config, SourceSelection::from_names(names)).await
        }
        Command::Sources(ref command) => sources_command(&opt.global, command).await,
    };

    if let Err(e) = result {
        eprintln!("news_ingest error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn scrape_command(config: news_ingest::Config, selection: SourceSelection) -> Result<()> {
    let db_path = config.db_path.clone();
    let report = run_ingest(config, selection).await?;
    println!(
        "✅ Stored {} new article{} from {} headline{} ({} stor{}, {} failed source{}) in {:.1}s",
        report.new_articles,
        if report.new_articles == 1 { "" } else { "s" },
        report.headlines,
        if report.headlines == 1 { "" } else { "s" },
        report.stories,
        if report.stories == 1 { "y" } else { "ies" },
        report.sources_failed,
        if report.sources_failed == 1 { "" } else { "s" },
        report.elapsed_seconds
    );
    println!("Results saved in {}", db_path.display());
    Ok(())
}

async fn sources_command(global: &GlobalOpts, command: &SourcesCommand) -> Result<()> {
    match command {
        SourcesCommand::List => {
            let registry = SourceRegistry::load(&global.sources).await?;
            for source in registry.sources() {
                println!(
                    "{:<24} {:<8} {:<14} {:<8} {}",
                    source.name,
                    format!("{:?}", source.method).to_lowercase(),
                    format!("{:?}", source.origin).to_lowercase(),
                    if source.active { "active" } else { "inactive" },
                    source.url
                );
            }
        }
        SourcesCommand::Add {
            name,
            url,
            method,
            selector,
            origin,
            inactive,
        } => {
            let mut registry = SourceRegistry::load_or_empty(&global.sources).await?;
            let mut source = SourceConfig::new(name.as_str(), url.as_str(), *method);
            source.selector = selector.clone();
            source.origin = *origin;
            source.active = !inactive;
            registry.add(source).await?;
            println!("Added {} to {}", name, global.sources.display());
        }
        SourcesCommand::Toggle { name } => {
            let mut registry = SourceRegistry::load(&global.sources).await?;
            let active = registry.toggle(name).await?;
            println!(
                "{} is now {}",
                name,
                if active { "active" } else { "inactive" }
            );
        }
    }
    Ok(())
}
