//! End-to-end mapping runs: settings resolution, validation, export.

use crate::config::Config;
use crate::export::render_report;
use crate::mapper::{ChannelMapper, ChannelMapping};
use crate::models::{MappingRequest, NeuroscopeParams};
use crate::registry::LayoutRegistry;
use crate::services::export::{ExportOptions, ExportService};
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Outcome of a mapping run.
#[derive(Debug, Clone)]
pub struct MappingOutcome {
    /// Computed mapping
    pub mapping: ChannelMapping,
    /// Files written, in write order
    pub written: Vec<PathBuf>,
    /// Human-readable report
    pub report: String,
}

/// Runs mapping requests against a registry with configured defaults.
pub struct MappingService<'a> {
    registry: &'a LayoutRegistry,
    config: &'a Config,
}

impl<'a> MappingService<'a> {
    /// Creates a service.
    pub fn new(registry: &'a LayoutRegistry, config: &'a Config) -> Self {
        Self { registry, config }
    }

    /// Fills the unset optional fields of `request` from the configuration.
    pub fn resolve(&self, request: &MappingRequest) -> MappingRequest {
        let mut resolved = request.clone();
        let output = &self.config.output;

        if resolved.out_dir.is_none() {
            resolved.out_dir = Some(self.config.out_dir());
        }
        resolved.export_txt = resolved.export_txt.or(Some(output.export_txt));
        resolved.export_xml = resolved.export_xml.or(Some(output.export_xml));
        if resolved.version_labels.is_none() {
            resolved.version_labels = Some(output.version_labels.clone());
        }

        resolved
    }

    /// Neuroscope parameters: the configured ones with the request's set
    /// fields replaced.
    pub fn neuroscope_params(&self, request: &MappingRequest) -> NeuroscopeParams {
        match &request.neuroscope {
            Some(overrides) => overrides.apply(&self.config.neuroscope),
            None => self.config.neuroscope.clone(),
        }
    }

    /// Validates `request` and computes both orientations without writing.
    pub fn plan(&self, request: &MappingRequest) -> Result<(MappingRequest, ChannelMapping)> {
        let resolved = self.resolve(request);
        let mapping = ChannelMapper::new(self.registry, &resolved)?.compute();
        Ok((resolved, mapping))
    }

    /// Export options for a resolved request.
    pub fn export_options(&self, resolved: &MappingRequest) -> ExportOptions {
        ExportOptions {
            out_dir: resolved.out_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
            export_txt: resolved.export_txt.unwrap_or(false),
            export_xml: resolved.export_xml.unwrap_or(true),
            params: self.neuroscope_params(resolved),
        }
    }

    /// Validates, maps and writes the enabled artifacts.
    ///
    /// Nothing is written if validation fails. With `dry_run` the mapping and
    /// report are produced but no file is touched.
    pub fn run(&self, request: &MappingRequest, dry_run: bool) -> Result<MappingOutcome> {
        let (resolved, mapping) = self.plan(request)?;

        let written = if dry_run {
            Vec::new()
        } else {
            ExportService::write(&mapping, &self.export_options(&resolved))?
        };

        info!(
            omnetics = %mapping.omnetics_layout,
            intan = %mapping.intan_layout,
            files = written.len(),
            "Mapping complete"
        );

        let report = render_report(&mapping);
        Ok(MappingOutcome {
            mapping,
            written,
            report,
        })
    }
}
