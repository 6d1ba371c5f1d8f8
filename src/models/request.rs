//! Mapping request inputs: channel ordering, shank partition and labels.

use crate::constants::DEFAULT_VERSION_LABELS;
use crate::error::{MapperError, Result};
use crate::models::NeuroscopeOverrides;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A complete mapping request, as stored in a request TOML file.
///
/// Optional fields fall back to the user configuration when the request is
/// executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRequest {
    /// Probe family (e.g. "neuronexus"), matched case-insensitively
    pub probe_type: String,
    /// Omnetics connector (e.g. "H16"), matched case-insensitively
    pub connector: String,
    /// Probe model, used in output file names
    pub probe_name: String,
    /// Probe channels in shank order (dorsal to ventral, left to right)
    pub channel_map: Vec<u32>,
    /// Number of channels per shank
    pub chan_per_shank: Vec<usize>,
    /// Output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    /// Write `.txt` shank files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_txt: Option<bool>,
    /// Write Neuroscope `.xml` files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_xml: Option<bool>,
    /// Labels for the normal and flipped outputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_labels: Option<Vec<String>>,
    /// Neuroscope parameters replacing the configured ones, field by field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neuroscope: Option<NeuroscopeOverrides>,
}

impl MappingRequest {
    /// Loads a request from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse request file: {}", path.display()))
    }

    /// Probe family as used for registry lookup and file names.
    pub fn normalized_probe_type(&self) -> String {
        self.probe_type.trim().to_lowercase()
    }

    /// Connector as used for registry lookup.
    pub fn normalized_connector(&self) -> String {
        self.connector.trim().to_uppercase()
    }
}

/// Pair of labels naming the normal and flipped outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionLabels {
    normal: String,
    flipped: String,
}

impl VersionLabels {
    /// Validates a label list: exactly two, distinct and non-empty.
    pub fn new(labels: &[String]) -> Result<Self> {
        match labels {
            [normal, flipped]
                if !normal.trim().is_empty()
                    && !flipped.trim().is_empty()
                    && normal != flipped =>
            {
                Ok(Self {
                    normal: normal.clone(),
                    flipped: flipped.clone(),
                })
            }
            _ => Err(MapperError::InvalidVersionLabels {
                labels: labels.to_vec(),
            }),
        }
    }

    /// Label of the normal orientation output.
    pub fn normal(&self) -> &str {
        &self.normal
    }

    /// Label of the flipped orientation output.
    pub fn flipped(&self) -> &str {
        &self.flipped
    }
}

impl Default for VersionLabels {
    fn default() -> Self {
        Self {
            normal: DEFAULT_VERSION_LABELS[0].to_string(),
            flipped: DEFAULT_VERSION_LABELS[1].to_string(),
        }
    }
}

/// Split of the channel map into contiguous shank groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShankPartition {
    counts: Vec<usize>,
}

impl ShankPartition {
    /// Validates that `counts` has no empty shank and covers exactly `total` channels.
    pub fn new(counts: Vec<usize>, total: usize) -> Result<Self> {
        if counts.is_empty() || counts.contains(&0) {
            return Err(MapperError::EmptyShank { partition: counts });
        }

        let sum: usize = counts.iter().sum();
        if sum != total {
            return Err(MapperError::PartitionMismatch {
                sum,
                expected: total,
            });
        }

        Ok(Self { counts })
    }

    /// Channels per shank.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of shanks.
    pub fn shank_count(&self) -> usize {
        self.counts.len()
    }

    /// Splits `values` into one slice per shank.
    ///
    /// `values` must be as long as the partition total.
    pub fn split<'a, T>(&'a self, values: &'a [T]) -> impl Iterator<Item = &'a [T]> + 'a {
        let mut start = 0;
        self.counts.iter().map(move |&count| {
            let end = start + count;
            let group = &values[start..end];
            start = end;
            group
        })
    }
}

/// Largest number of channels a single range may expand to.
pub const MAX_CHANNEL_RANGE: u32 = 4096;

/// Parses a comma separated channel list with optional inclusive ranges.
///
/// `"1-4,8"` gives `[1, 2, 3, 4, 8]`; a descending range such as `"4-1"`
/// yields its channels in descending order.
pub fn parse_channel_list(input: &str) -> Result<Vec<u32>> {
    let mut channels = Vec::new();

    for entry in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if let Some((start, end)) = entry.split_once('-') {
            let start = parse_channel(entry, start)?;
            let end = parse_channel(entry, end)?;
            if start.abs_diff(end) >= MAX_CHANNEL_RANGE {
                return Err(MapperError::InvalidChannelList {
                    entry: entry.to_string(),
                    reason: format!("a range may span at most {MAX_CHANNEL_RANGE} channels"),
                });
            }
            if start <= end {
                channels.extend(start..=end);
            } else {
                channels.extend((end..=start).rev());
            }
        } else {
            channels.push(parse_channel(entry, entry)?);
        }
    }

    if channels.is_empty() {
        return Err(MapperError::InvalidChannelList {
            entry: input.to_string(),
            reason: "no channels given".to_string(),
        });
    }

    Ok(channels)
}

fn parse_channel(entry: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|e| MapperError::InvalidChannelList {
            entry: entry.to_string(),
            reason: e.to_string(),
        })
}
