//! Layouts command for registry discovery and inspection.

use crate::cli::common::{load_registry, CliError, CliResult};
use crate::models::Layout;
use clap::Args;
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;

/// List supported probe connectors and Intan headstages
#[derive(Debug, Clone, Args)]
pub struct LayoutsArgs {
    /// Optional regex filter on layout keys and names
    #[arg(long, value_name = "REGEX")]
    pub filter: Option<String>,

    /// Print the pins of one layout (e.g. neuronexus-H16 or intan32)
    #[arg(long, value_name = "NAME")]
    pub show: Option<String>,

    /// Layout catalog TOML adding connectors or headstages
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON entry of an Omnetics layout
#[derive(Debug, Clone, Serialize)]
struct OmneticsEntryResponse {
    key: String,
    probe_type: String,
    connector: String,
    name: String,
    channels: usize,
}

/// JSON entry of an Intan layout
#[derive(Debug, Clone, Serialize)]
struct IntanEntryResponse {
    name: String,
    channels: usize,
}

/// JSON response for the layouts command
#[derive(Debug, Clone, Serialize)]
struct LayoutsResponse {
    omnetics: Vec<OmneticsEntryResponse>,
    intan: Vec<IntanEntryResponse>,
}

impl LayoutsArgs {
    /// Execute the layouts command
    pub fn execute(&self) -> CliResult<()> {
        let registry = load_registry(self.catalog.as_deref())?;

        if let Some(name) = &self.show {
            let layout = registry.find_by_name(name).ok_or_else(|| {
                let known: Vec<String> = registry
                    .omnetics_keys()
                    .iter()
                    .map(ToString::to_string)
                    .chain(registry.intan().map(|(_, l)| l.name.clone()))
                    .collect();
                CliError::validation(format!(
                    "Unknown layout '{}'. Known: {}",
                    name,
                    known.join(", ")
                ))
            })?;
            return self.print_layout(layout);
        }

        let filter = self
            .filter
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| CliError::validation(format!("Invalid regex pattern: {e}")))?;
        let keep = |text: &str| filter.as_ref().map_or(true, |re| re.is_match(text));

        let response = LayoutsResponse {
            omnetics: registry
                .omnetics()
                .filter(|(key, layout)| keep(&key.to_string()) || keep(&layout.name))
                .map(|(key, layout)| OmneticsEntryResponse {
                    key: key.to_string(),
                    probe_type: key.probe_type.clone(),
                    connector: key.connector.clone(),
                    name: layout.name.clone(),
                    channels: layout.len(),
                })
                .collect(),
            intan: registry
                .intan()
                .filter(|(_, layout)| keep(&layout.name))
                .map(|(size, layout)| IntanEntryResponse {
                    name: layout.name.clone(),
                    channels: size,
                })
                .collect(),
        };

        if response.omnetics.is_empty() && response.intan.is_empty() {
            if let Some(filter) = &self.filter {
                return Err(CliError::validation(format!(
                    "No layouts match filter: {}",
                    filter
                )));
            }
        }

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            println!("Omnetics connectors ({}):", response.omnetics.len());
            for entry in &response.omnetics {
                println!("  {:<24} {:>3} channels", entry.key, entry.channels);
            }
            println!();
            println!("Intan headstages ({}):", response.intan.len());
            for entry in &response.intan {
                println!("  {:<24} {:>3} channels", entry.name, entry.channels);
            }
        }

        Ok(())
    }

    fn print_layout(&self, layout: &Layout) -> CliResult<()> {
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(layout)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            println!("{} ({} channels)", layout.name, layout.len());
            for (row, pins) in layout.pins.chunks(16).enumerate() {
                let pins = pins
                    .iter()
                    .map(|p| format!("{p:>2}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("  {:>3}: {}", row * 16, pins);
            }
        }
        Ok(())
    }
}
