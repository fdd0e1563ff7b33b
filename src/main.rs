#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use threat_intel_harvester_lib::application::harvest;
use threat_intel_harvester_lib::infrastructure::{
    AppConfig, ConfigManager, HttpClient, init_logging_with_config, seed_loader,
};

/// Harvest threat-intel report listings for actors and malware families
#[derive(Debug, Parser)]
#[command(name = "threat-intel-harvester", version, about)]
struct Cli {
    /// Configuration file (JSON); defaults to the per-user config location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the default configuration if the file does not exist yet
    #[arg(long)]
    init_config: bool,

    /// Threat actor seed list
    #[arg(long)]
    actors: Option<PathBuf>,

    /// Malware family seed list
    #[arg(long)]
    families: Option<PathBuf>,

    /// Directory for the output documents
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Only write the aggregate document
    #[arg(long)]
    no_detail_files: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// CLI flags take precedence over the configuration file
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(path) = &self.actors {
            config.seeds.actors_path.clone_from(path);
        }
        if let Some(path) = &self.families {
            config.seeds.families_path.clone_from(path);
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory.clone_from(dir);
        }
        if self.no_detail_files {
            config.output.write_detail_files = false;
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
    }
}

async fn load_config(cli: &Cli) -> Result<(AppConfig, PathBuf)> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };

    let mut config = if cli.init_config {
        manager.initialize_on_first_run().await?
    } else {
        manager.load_config().await?
    };
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    Ok((config, manager.config_path().to_path_buf()))
}

async fn run(cli: Cli) -> Result<()> {
    let (config, config_path) = load_config(&cli).await?;
    init_logging_with_config(&config.logging)?;
    info!("Using configuration {:?}", config_path);

    let entities = seed_loader::load_entities(&config.seeds.actors_path, &config.seeds.families_path)
        .await
        .context("Failed to load seed lists")?;

    let transport = Arc::new(HttpClient::new(&config.http)?);
    let run = harvest(&config, transport, &entities)
        .await
        .context("Harvest failed")?;

    info!("📊 {}", run.summary);
    for path in &run.written {
        info!("   {:?}", path);
    }
    Ok(())
}

/// Config and seed failures can happen before logging is up, so the final
/// report goes to stderr directly
fn exit_status(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    exit_status(run(cli).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "threat-intel-harvester",
            "--actors",
            "a.json",
            "--output-dir",
            "out",
            "--no-detail-files",
            "--log-level",
            "debug",
        ]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.seeds.actors_path, PathBuf::from("a.json"));
        assert_eq!(config.seeds.families_path, PathBuf::from("malware_families.json"));
        assert_eq!(config.output.directory, PathBuf::from("out"));
        assert!(!config.output.write_detail_files);
        assert_eq!(config.logging.level, "debug");
    }

    #[tokio::test]
    async fn test_config_failure_exits_non_zero_without_logging() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let cli = Cli::parse_from(["threat-intel-harvester", "--config", path.to_str().unwrap()]);
        let result = run(cli).await;
        assert!(result.is_err());
        assert_eq!(exit_status(result), ExitCode::FAILURE);
        assert_eq!(exit_status(Ok(())), ExitCode::SUCCESS);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
