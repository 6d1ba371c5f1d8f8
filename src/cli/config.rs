//! Configuration management CLI commands.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use clap::{Args, Subcommand};

/// Configuration management commands
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Print the configuration file location
    Path,
    /// Write a configuration file with default values
    Init(ConfigInitArgs),
}

/// Display current configuration
#[derive(Args, Debug, Clone)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Write a configuration file with default values
#[derive(Args, Debug, Clone)]
pub struct ConfigInitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    force: bool,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Path => {
                let path = Config::config_file_path()?;
                println!("{}", path.display());
                Ok(())
            }
            ConfigCommand::Init(args) => args.execute(),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;

        if self.json {
            let json = serde_json::to_string_pretty(&config).map_err(|e| {
                CliError::io(format!("Failed to serialize configuration to JSON: {e}"))
            })?;
            println!("{json}");
        } else {
            output_human_readable(&config);
        }

        Ok(())
    }
}

impl ConfigInitArgs {
    /// Execute init command
    pub fn execute(&self) -> CliResult<()> {
        if Config::exists() && !self.force {
            let path = Config::config_file_path()?;
            return Err(CliError::validation(format!(
                "Configuration file already exists: {} (use --force to overwrite)",
                path.display()
            )));
        }

        let path = Config::new()
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration written to {}", path.display());
        Ok(())
    }
}

/// Output configuration in human-readable format
fn output_human_readable(config: &Config) {
    println!("ProbeMapper Configuration");
    println!("=========================");
    println!();

    println!("Output:");
    match &config.output.out_dir {
        Some(dir) => println!("  Output Directory: {}", dir.display()),
        None => println!("  Output Directory: (current directory)"),
    }
    println!("  Export TXT: {}", config.output.export_txt);
    println!("  Export XML: {}", config.output.export_xml);
    println!(
        "  Version Labels: {}",
        config.output.version_labels.join(", ")
    );
    println!();

    let params = &config.neuroscope;
    println!("Neuroscope:");
    println!("  Bits: {}", params.n_bits);
    println!("  Sampling Rate: {} Hz", params.sampling_rate);
    println!("  LFP Sampling Rate: {} Hz", params.lfp_sampling_rate);
    println!("  Voltage Range: {}", params.voltage_range);
    println!("  Amplification: {}", params.amplification);
    println!("  Offset: {}", params.offset);
    println!("  Spike Samples: {}", params.n_samples);
    println!("  Peak Sample Index: {}", params.peak_sample_index);
    println!("  Screen Gain: {}", params.screen_gain);
    println!("  Skip Channels: {:?}", params.skip_channels);
    println!("  Extra Channels: {:?}", params.extra_channels);
    println!("  Channel Color: {}", params.channel_color);
    println!();
}
