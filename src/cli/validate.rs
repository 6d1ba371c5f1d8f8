//! Validation command for mapping requests.

use crate::cli::common::{CliError, CliResult, RequestArgs};
use crate::config::Config;
use crate::error::MapperError;
use crate::services::MappingService;
use clap::Args;
use serde::Serialize;

/// Validate a mapping request without writing any file
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: RequestArgs,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON response for the validate command
#[derive(Debug, Clone, Serialize)]
struct ValidationResponse {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    omnetics_layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    intan_layout: Option<String>,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()?;
        let request = self.input.build_request()?;
        let registry = self.input.registry()?;

        let service = MappingService::new(&registry, &config);
        let response = match service.plan(&request) {
            Ok((_, mapping)) => ValidationResponse {
                valid: true,
                kind: None,
                error: None,
                omnetics_layout: Some(mapping.omnetics_layout),
                intan_layout: Some(mapping.intan_layout),
            },
            Err(err) => {
                let kind = err
                    .downcast_ref::<MapperError>()
                    .map(|e| e.kind().to_string());
                ValidationResponse {
                    valid: false,
                    kind,
                    error: Some(format!("{err:#}")),
                    omnetics_layout: None,
                    intan_layout: None,
                }
            }
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else if response.valid {
            println!("✓ Mapping request is valid");
            if let (Some(omnetics), Some(intan)) = (&response.omnetics_layout, &response.intan_layout) {
                println!("  Omnetics layout: {omnetics}");
                println!("  Intan layout:    {intan}");
            }
        } else {
            println!("✗ Mapping request is invalid");
            if let Some(error) = &response.error {
                println!("  {error}");
            }
        }

        if response.valid {
            Ok(())
        } else {
            Err(CliError::validation(
                response.error.unwrap_or_else(|| "Validation failed".to_string()),
            ))
        }
    }
}
