//! Map command: compute both orientations and write the export files.

use crate::cli::common::{CliError, CliResult, RequestArgs};
use crate::config::Config;
use crate::models::Orientation;
use crate::services::MappingService;
use clap::Args;
use serde::Serialize;

/// Map probe channels to Intan channels and write export files
#[derive(Debug, Clone, Args)]
pub struct MapArgs {
    #[command(flatten)]
    pub input: RequestArgs,

    /// Compute and print the mapping without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON response for the map command
#[derive(Debug, Serialize)]
struct MapResponse<'a> {
    probe_type: &'a str,
    probe_name: &'a str,
    omnetics_layout: &'a str,
    intan_layout: &'a str,
    orientations: Vec<OrientationResponse<'a>>,
    written: Vec<String>,
}

#[derive(Debug, Serialize)]
struct OrientationResponse<'a> {
    orientation: Orientation,
    label: &'a str,
    channels: &'a [u32],
    shanks: Vec<&'a [u32]>,
}

impl MapArgs {
    /// Execute the map command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()?;
        let request = self.input.build_request()?;
        let registry = self.input.registry()?;

        let service = MappingService::new(&registry, &config);
        let outcome = service.run(&request, self.dry_run)?;

        if self.json {
            let mapping = &outcome.mapping;
            let response = MapResponse {
                probe_type: &mapping.probe_type,
                probe_name: &mapping.probe_name,
                omnetics_layout: &mapping.omnetics_layout,
                intan_layout: &mapping.intan_layout,
                orientations: Orientation::ALL
                    .into_iter()
                    .map(|orientation| OrientationResponse {
                        orientation,
                        label: mapping.label(orientation),
                        channels: mapping.channels(orientation),
                        shanks: mapping.shank_groups(orientation),
                    })
                    .collect(),
                written: outcome
                    .written
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            for path in &outcome.written {
                println!("Saved: {}", path.display());
            }
            println!("{}", outcome.report);
        }

        Ok(())
    }
}
