//! `gemstore-notifier`: checks the wiki gem store data once and posts a
//! webhook message when something on the watch list goes on sale.
mod config;
mod outcome;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use gemstore_engine::{
    DiscordWebhookDispatcher, FileStateStore, FileWatchListSource, Pipeline, ReqwestPageFetcher,
    RunOutcome,
};
use gemstore_logging::{gem_error, gem_info, gem_warn, LogOptions};
use log::LevelFilter;

use config::{Config, WEBHOOK_ENV};
use outcome::Exit;

/// Notify about discounted gem store items on your watch list
#[derive(Parser, Debug)]
#[command(name = "gemstore-notifier")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the RON configuration file
    #[arg(short, long, default_value = "gemstore.ron")]
    config: PathBuf,

    /// Log debug detail
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let loaded = Config::load(&args.config);
    let log_file = match &loaded {
        Ok(Some(config)) => config.log_path.clone(),
        _ => Config::default().log_path,
    };
    gemstore_logging::initialize(&LogOptions {
        level,
        log_file,
        terminal: true,
    });

    let exit = match loaded {
        Ok(config) => {
            let config = config.unwrap_or_else(|| {
                gem_warn!("Config {:?} not found; using defaults", args.config);
                Config::default()
            });
            run(&config)
        }
        Err(err) => Exit::NotConfigured(err.to_string()),
    };

    if exit.is_error() {
        gem_error!("{}", exit.log_line());
    } else {
        gem_info!("{}", exit.log_line());
    }
    exit.code()
}

fn run(config: &Config) -> Exit {
    let webhook_url = match config.resolve_webhook(std::env::var(WEBHOOK_ENV).ok()) {
        Ok(url) => url,
        Err(err) => return Exit::NotConfigured(err.to_string()),
    };

    match execute(config, webhook_url) {
        Ok(outcome) => Exit::from_outcome(outcome),
        Err(err) => Exit::Failed(format!("{err:#}")),
    }
}

fn execute(config: &Config, webhook_url: String) -> anyhow::Result<RunOutcome> {
    gem_info!(
        "Checking {} for sales on {:?}",
        config.page_name,
        config.watch_list_path
    );

    let fetcher = ReqwestPageFetcher::new(config.fetch_settings());
    let dispatcher = DiscordWebhookDispatcher::new(config.webhook_settings(webhook_url));
    let state_store = FileStateStore::new(&config.state_path);
    let watch_list = FileWatchListSource::new(&config.watch_list_path);

    Pipeline::new(
        config.pipeline_config(),
        &fetcher,
        &dispatcher,
        &state_store,
        &watch_list,
    )
    .run_blocking()
    .with_context(|| format!("checking {} failed", config.page_name))
}
