//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::engine::Pipeline;
use crate::error::Result;
use serde_json::json;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.resolve_config()?;

        match self.cli.command {
            Commands::Validate => self.validate(&config),
            Commands::Run => {
                let stats = Pipeline::new(config)?.run().await?;
                print_json(&serde_json::to_value(&stats)?)
            }
            Commands::Songs => {
                let stats = Pipeline::new(config)?.process_song_data().await?;
                print_json(&serde_json::to_value(&stats)?)
            }
            Commands::Logs => {
                let stats = Pipeline::new(config)?.process_log_data().await?;
                print_json(&serde_json::to_value(&stats)?)
            }
        }
    }

    /// Load the config file (if any) and apply command-line overrides
    pub fn resolve_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.cli.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(input) = &self.cli.input {
            config.input.clone_from(input);
        }
        if let Some(output) = &self.cli.output {
            config.output.clone_from(output);
        }
        if let Some(zone) = self.cli.time_zone {
            config.time_zone = zone;
        }
        if let Some(strategy) = self.cli.songplay_id {
            config.songplay_id = strategy.into();
        }

        Ok(config)
    }

    /// Validate config and print the resolved settings
    fn validate(&self, config: &PipelineConfig) -> Result<()> {
        config.validate()?;
        print_json(&validation_report(config))
    }
}

/// JSON report printed by `validate`
fn validation_report(config: &PipelineConfig) -> serde_json::Value {
    json!({
        "name": crate::NAME,
        "version": crate::VERSION,
        "valid": true,
        "config": config,
    })
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
