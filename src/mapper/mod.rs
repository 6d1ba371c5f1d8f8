//! Omnetics → Intan channel mapping.
//!
//! A probe channel sits at some position `p` on the Omnetics connector; the
//! headstage delivers whatever is plugged into position `p` on Intan channel
//! `intan_pins[p]`. Mapping is therefore a gather through the connector's
//! [`PinIndex`](crate::models::PinIndex), done once per orientation.

use crate::error::{MapperError, Result};
use crate::models::{Layout, MappingRequest, Orientation, ShankPartition, VersionLabels};
use crate::registry::LayoutRegistry;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Maps `channel_map` through `omnetics` onto `intan_pins`.
///
/// `intan_pins` is either the stored Intan order or its reversal. Fails if
/// the lengths differ or a channel is not a pin of `omnetics`.
pub fn map_channels(channel_map: &[u32], omnetics: &Layout, intan_pins: &[u32]) -> Result<Vec<u32>> {
    if intan_pins.len() != omnetics.len() {
        return Err(MapperError::IntanSizeMismatch {
            layout: omnetics.name.clone(),
            omnetics: omnetics.len(),
            intan: intan_pins.len(),
        });
    }
    let positions = resolve_positions(channel_map, omnetics)?;
    Ok(gather(&positions, intan_pins))
}

/// Validates `channel_map` against `omnetics` and returns each channel's
/// connector position.
pub fn resolve_positions(channel_map: &[u32], omnetics: &Layout) -> Result<Vec<usize>> {
    if channel_map.len() != omnetics.len() {
        return Err(MapperError::LengthMismatch {
            channel_map: channel_map.len(),
            layout: omnetics.len(),
        });
    }

    let mut seen: HashMap<u32, usize> = HashMap::with_capacity(channel_map.len());
    let mut positions = Vec::with_capacity(channel_map.len());

    for (idx, &channel) in channel_map.iter().enumerate() {
        let position = omnetics
            .position_of(channel)
            .ok_or_else(|| MapperError::UnknownChannel {
                channel,
                layout: omnetics.name.clone(),
                valid: omnetics.sorted_pins(),
            })?;

        if let Some(first) = seen.insert(channel, idx) {
            return Err(MapperError::DuplicateChannel {
                channel,
                first,
                second: idx,
            });
        }

        positions.push(position);
    }

    Ok(positions)
}

fn gather(positions: &[usize], intan_pins: &[u32]) -> Vec<u32> {
    positions.iter().map(|&p| intan_pins[p]).collect()
}

/// A validated mapping request bound to its registry layouts.
///
/// All validation happens in [`ChannelMapper::new`]; mapping afterwards
/// cannot fail.
#[derive(Debug, Clone)]
pub struct ChannelMapper<'r> {
    probe_type: String,
    probe_name: String,
    omnetics: &'r Layout,
    intan: &'r Layout,
    channel_map: Vec<u32>,
    positions: Vec<usize>,
    partition: ShankPartition,
    labels: VersionLabels,
}

impl<'r> ChannelMapper<'r> {
    /// Resolves layouts and validates the request.
    ///
    /// Checks, in order: probe/connector known, Intan layout for the pin
    /// count, channel map length, channel membership and uniqueness, shank
    /// partition, version labels.
    pub fn new(registry: &'r LayoutRegistry, request: &MappingRequest) -> Result<Self> {
        let probe_type = request.normalized_probe_type();
        let omnetics = registry.lookup_omnetics(&probe_type, &request.connector)?;
        let intan = registry.lookup_intan(omnetics.len())?;

        let positions = resolve_positions(&request.channel_map, omnetics)?;
        let partition =
            ShankPartition::new(request.chan_per_shank.clone(), request.channel_map.len())?;
        let labels = match &request.version_labels {
            Some(labels) => VersionLabels::new(labels)?,
            None => VersionLabels::default(),
        };

        debug!(
            omnetics = %omnetics.name,
            intan = %intan.name,
            shanks = partition.shank_count(),
            "Mapping request validated"
        );

        Ok(Self {
            probe_type,
            probe_name: request.probe_name.clone(),
            omnetics,
            intan,
            channel_map: request.channel_map.clone(),
            positions,
            partition,
            labels,
        })
    }

    /// Omnetics layout of the probe connector.
    pub fn omnetics_layout(&self) -> &Layout {
        self.omnetics
    }

    /// Intan layout of the headstage.
    pub fn intan_layout(&self) -> &Layout {
        self.intan
    }

    /// Intan channels for one orientation.
    pub fn map(&self, orientation: Orientation) -> Vec<u32> {
        gather(&self.positions, &self.intan.oriented(orientation))
    }

    /// Computes both orientations.
    pub fn compute(&self) -> ChannelMapping {
        ChannelMapping {
            probe_type: self.probe_type.clone(),
            probe_name: self.probe_name.clone(),
            omnetics_layout: self.omnetics.name.clone(),
            intan_layout: self.intan.name.clone(),
            channel_map: self.channel_map.clone(),
            partition: self.partition.clone(),
            labels: self.labels.clone(),
            normal: self.map(Orientation::Normal),
            flipped: self.map(Orientation::Flipped),
        }
    }
}

/// Result of a mapping request: Intan channels in both orientations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelMapping {
    /// Probe family, lowercase
    pub probe_type: String,
    /// Probe model
    pub probe_name: String,
    /// Name of the Omnetics layout used
    pub omnetics_layout: String,
    /// Name of the Intan layout used
    pub intan_layout: String,
    /// Probe channels as requested
    pub channel_map: Vec<u32>,
    /// Shank partition
    pub partition: ShankPartition,
    /// Output labels
    pub labels: VersionLabels,
    /// Intan channels, headstage in stored orientation
    pub normal: Vec<u32>,
    /// Intan channels, headstage flipped
    pub flipped: Vec<u32>,
}

impl ChannelMapping {
    /// Intan channels for `orientation`.
    pub fn channels(&self, orientation: Orientation) -> &[u32] {
        match orientation {
            Orientation::Normal => &self.normal,
            Orientation::Flipped => &self.flipped,
        }
    }

    /// Output label for `orientation`.
    pub fn label(&self, orientation: Orientation) -> &str {
        match orientation {
            Orientation::Normal => self.labels.normal(),
            Orientation::Flipped => self.labels.flipped(),
        }
    }

    /// Intan channels for `orientation`, one slice per shank.
    pub fn shank_groups(&self, orientation: Orientation) -> Vec<&[u32]> {
        self.partition.split(self.channels(orientation)).collect()
    }

    /// File name without extension: `<probe_type>_<probe_name>_<label>`.
    pub fn file_stem(&self, orientation: Orientation) -> String {
        format!(
            "{}_{}_{}",
            self.probe_type,
            self.probe_name,
            self.label(orientation)
        )
    }
}
