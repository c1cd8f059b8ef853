mod cli;
mod config;
mod console;
mod logger;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use config::Config;
use console::ConsoleInteraction;
use stamp_card::{ManualClock, RedbStore, StampCardService};

fn main() -> anyhow::Result<()> {
    let command = Cli::parse().command();

    // 1. Environment (.env, config, logging)
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    logger::init_logger(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    // 2. Storage
    std::fs::create_dir_all(&config.work_dir)
        .with_context(|| format!("failed to create work dir {}", config.work_dir.display()))?;
    let db_path = config.db_path();
    let store = RedbStore::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;

    // 3. Service
    let ui = ConsoleInteraction::new().assume_yes(command.assume_yes());
    let mut service = StampCardService::new(store, ui)
        .with_profile(config.profile_context())
        .with_config(config.card.clone());
    if let Some(today) = config.today {
        tracing::info!(%today, "Clock pinned");
        service = service.with_clock(ManualClock::on(today));
    }

    tracing::debug!(
        db = %db_path.display(),
        profile = %service.profile_context(),
        command = ?command,
        "Stamp kiosk ready"
    );

    let output = cli::run(&service, &command)?;
    println!("{}", output);
    Ok(())
}
