//! Shared CLI plumbing: error type, exit codes and request assembly.

use crate::error::{ErrorKind, MapperError};
use crate::models::{parse_channel_list, MappingRequest, NeuroscopeOverrides};
use crate::registry::{LayoutCatalog, LayoutRegistry};
use anyhow::Context;
use clap::Args;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Invalid input: unknown probe, bad channel map, bad partition...
    Validation = 1,
    /// File system or parse failure
    Io = 2,
}

impl ExitCode {
    /// Numeric process exit code.
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by CLI commands.
#[derive(Debug, Clone)]
pub struct CliError {
    /// Exit code to terminate with
    pub exit_code: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// Validation or configuration failure (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::Validation,
            message: message.into(),
        }
    }

    /// I/O failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::Io,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<MapperError> for CliError {
    fn from(err: MapperError) -> Self {
        match err.kind() {
            ErrorKind::Io => Self::io(err.to_string()),
            ErrorKind::Configuration | ErrorKind::Validation => Self::validation(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<MapperError>() {
            Ok(mapper_err) => mapper_err.into(),
            Err(other) => Self::io(format!("{other:#}")),
        }
    }
}

/// Result type of CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Inputs describing a mapping request, from a request file and/or flags.
///
/// Flags override the corresponding request file fields.
#[derive(Debug, Clone, Default, Args)]
pub struct RequestArgs {
    /// Mapping request TOML file
    #[arg(short, long, value_name = "FILE")]
    pub request: Option<PathBuf>,

    /// Probe family (e.g. neuronexus)
    #[arg(long, value_name = "FAMILY", required_unless_present = "request")]
    pub probe_type: Option<String>,

    /// Omnetics connector (e.g. H16)
    #[arg(long, value_name = "CONNECTOR", required_unless_present = "request")]
    pub connector: Option<String>,

    /// Probe model, used in output file names (e.g. A1x16)
    #[arg(long, value_name = "NAME", required_unless_present = "request")]
    pub probe_name: Option<String>,

    /// Probe channels in shank order, e.g. "1-16" or "3,1,2,4"
    #[arg(long, value_name = "CHANNELS", required_unless_present = "request")]
    pub channel_map: Option<String>,

    /// Channels per shank, e.g. "16,16,16,16"
    #[arg(
        long,
        value_name = "COUNTS",
        value_delimiter = ',',
        required_unless_present = "request"
    )]
    pub chan_per_shank: Option<Vec<usize>>,

    /// Output directory for generated files
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Also write .txt shank files
    #[arg(long)]
    pub txt: bool,

    /// Do not write Neuroscope .xml files
    #[arg(long)]
    pub no_xml: bool,

    /// Neuroscope parameter TOML file
    #[arg(long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// Channels to flag as skipped in the XML, e.g. "5,9"
    #[arg(long, value_name = "CHANNELS")]
    pub skip: Option<String>,

    /// Extra non-probe channels (ADC/AUX) appended in the XML, e.g. "16-18"
    #[arg(long, value_name = "CHANNELS")]
    pub extra: Option<String>,

    /// Labels for the normal and flipped outputs, e.g. "up,down"
    #[arg(long, value_name = "NORMAL,FLIPPED", value_delimiter = ',')]
    pub labels: Option<Vec<String>>,

    /// Layout catalog TOML adding connectors or headstages
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,
}

impl RequestArgs {
    /// Assembles the mapping request.
    ///
    /// Neuroscope fields are layered: request file, then `--params`, then
    /// `--skip`/`--extra`. Fields left unset by all of them keep the
    /// configured value when the request runs.
    pub fn build_request(&self) -> CliResult<MappingRequest> {
        let mut request = match &self.request {
            Some(path) => MappingRequest::load(path)?,
            None => MappingRequest {
                probe_type: required(self.probe_type.as_ref(), "--probe-type")?,
                connector: required(self.connector.as_ref(), "--connector")?,
                probe_name: required(self.probe_name.as_ref(), "--probe-name")?,
                channel_map: Vec::new(),
                chan_per_shank: required(self.chan_per_shank.as_ref(), "--chan-per-shank")?,
                out_dir: None,
                export_txt: None,
                export_xml: None,
                version_labels: None,
                neuroscope: None,
            },
        };

        if let Some(probe_type) = &self.probe_type {
            request.probe_type.clone_from(probe_type);
        }
        if let Some(connector) = &self.connector {
            request.connector.clone_from(connector);
        }
        if let Some(probe_name) = &self.probe_name {
            request.probe_name.clone_from(probe_name);
        }
        if let Some(channels) = &self.channel_map {
            request.channel_map = parse_channel_list(channels)?;
        } else if self.request.is_none() {
            return Err(CliError::validation("Missing required option --channel-map"));
        }
        if let Some(counts) = &self.chan_per_shank {
            request.chan_per_shank.clone_from(counts);
        }
        if let Some(out_dir) = &self.out_dir {
            request.out_dir = Some(out_dir.clone());
        }
        if self.txt {
            request.export_txt = Some(true);
        }
        if self.no_xml {
            request.export_xml = Some(false);
        }
        if let Some(labels) = &self.labels {
            request.version_labels = Some(labels.clone());
        }

        let mut overrides = request.neuroscope.take().unwrap_or_default();
        if let Some(path) = &self.params {
            overrides.merge(load_params(path)?);
        }
        if let Some(skip) = &self.skip {
            overrides.skip_channels = Some(parse_channel_list(skip)?);
        }
        if let Some(extra) = &self.extra {
            overrides.extra_channels = Some(parse_channel_list(extra)?);
        }
        if overrides != NeuroscopeOverrides::default() {
            request.neuroscope = Some(overrides);
        }

        Ok(request)
    }

    /// Built-in registry, extended by `--catalog` when given.
    pub fn registry(&self) -> CliResult<Cow<'static, LayoutRegistry>> {
        load_registry(self.catalog.as_deref())
    }
}

/// Built-in registry, extended by a catalog file when given.
pub fn load_registry(catalog: Option<&Path>) -> CliResult<Cow<'static, LayoutRegistry>> {
    match catalog {
        None => Ok(Cow::Borrowed(LayoutRegistry::builtin())),
        Some(path) => {
            let catalog = LayoutCatalog::load(path)?;
            let mut builder = LayoutRegistry::builder();
            builder.add_catalog(&catalog);
            Ok(Cow::Owned(builder.build()?))
        }
    }
}

fn load_params(path: &Path) -> CliResult<NeuroscopeOverrides> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read Neuroscope parameters: {}", path.display()))?;
    let params = toml::from_str(&content)
        .with_context(|| format!("Failed to parse Neuroscope parameters: {}", path.display()))?;
    Ok(params)
}

fn required<T: Clone>(value: Option<&T>, flag: &str) -> CliResult<T> {
    value
        .cloned()
        .ok_or_else(|| CliError::validation(format!("Missing required option {flag}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline_args() -> RequestArgs {
        RequestArgs {
            probe_type: Some("neuronexus".to_string()),
            connector: Some("H16".to_string()),
            probe_name: Some("A1x16".to_string()),
            channel_map: Some("1-16".to_string()),
            chan_per_shank: Some(vec![16]),
            ..RequestArgs::default()
        }
    }

    #[test]
    fn test_build_request_from_flags() {
        let request = inline_args().build_request().unwrap();
        assert_eq!(request.probe_type, "neuronexus");
        assert_eq!(request.channel_map, (1..=16).collect::<Vec<u32>>());
        assert_eq!(request.chan_per_shank, vec![16]);
        assert_eq!(request.export_txt, None);
        assert_eq!(request.neuroscope, None);
    }

    #[test]
    fn test_skip_and_extra_are_partial_overrides() {
        let args = RequestArgs {
            skip: Some("5".to_string()),
            extra: Some("16-18".to_string()),
            txt: true,
            no_xml: true,
            ..inline_args()
        };

        let request = args.build_request().unwrap();
        let overrides = request.neuroscope.unwrap();
        assert_eq!(overrides.skip_channels, Some(vec![5]));
        assert_eq!(overrides.extra_channels, Some(vec![16, 17, 18]));
        assert_eq!(overrides.sampling_rate, None);
        assert_eq!(request.export_txt, Some(true));
        assert_eq!(request.export_xml, Some(false));
    }

    #[test]
    fn test_params_file_layers_under_skip_flag() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("params.toml");
        std::fs::write(&path, "skip_channels = [1]\nsampling_rate = 25000\n").unwrap();

        let args = RequestArgs {
            params: Some(path),
            skip: Some("5".to_string()),
            ..inline_args()
        };

        let overrides = args.build_request().unwrap().neuroscope.unwrap();
        assert_eq!(overrides.skip_channels, Some(vec![5]));
        assert_eq!(overrides.sampling_rate, Some(25_000));
        assert_eq!(overrides.channel_color, None);
    }

    #[test]
    fn test_missing_channel_map() {
        let args = RequestArgs {
            channel_map: None,
            ..inline_args()
        };
        let err = args.build_request().unwrap_err();
        assert_eq!(err.exit_code, ExitCode::Validation);
    }

    #[test]
    fn test_bad_channel_list_is_validation_error() {
        let args = RequestArgs {
            channel_map: Some("1-x".to_string()),
            ..inline_args()
        };
        let err = args.build_request().unwrap_err();
        assert_eq!(err.exit_code, ExitCode::Validation);
        assert!(err.message.contains("1-x"));
    }

    #[test]
    fn test_anyhow_conversion_keeps_kind() {
        let err: CliError = anyhow::Error::from(MapperError::LengthMismatch {
            channel_map: 15,
            layout: 16,
        })
        .into();
        assert_eq!(err.exit_code, ExitCode::Validation);

        let err: CliError = anyhow::anyhow!("disk full").into();
        assert_eq!(err.exit_code, ExitCode::Io);
    }
}
