//! Neuroscope parameter file generation.
//!
//! The document is first assembled as a [`NeuroscopeDocument`] from the mapped
//! channels, the shank partition and [`NeuroscopeParams`]; [`NeuroscopeDocument::to_xml`]
//! then serializes it. Element names and nesting follow what Neuroscope 2.0
//! reads, so they must not change.

use crate::mapper::ChannelMapping;
use crate::models::{NeuroscopeParams, Orientation, EXTRA_CHANNEL_COLOR};
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::BTreeSet;
use std::fmt::Display;
use tracing::warn;

/// Acquisition settings block.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionSystem {
    /// Bit depth
    pub n_bits: u32,
    /// Probe channels plus extra channels
    pub n_channels: usize,
    /// Sampling rate in Hz
    pub sampling_rate: u32,
    /// Voltage range in mV
    pub voltage_range: u32,
    /// Amplifier gain
    pub amplification: u32,
    /// DC offset
    pub offset: i64,
}

/// Channel entry of an anatomical group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnatomicalChannel {
    /// Intan channel number
    pub channel: u32,
    /// Excluded from analysis
    pub skip: bool,
}

/// Display settings of one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDisplay {
    /// Intan channel number
    pub channel: u32,
    /// Trace color
    pub color: String,
    /// Anatomy view color
    pub anatomy_color: String,
    /// Spike view color
    pub spike_color: String,
    /// Default trace offset
    pub default_offset: i64,
}

/// Neuroscope parameter document for one orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuroscopeDocument {
    /// Acquisition settings
    pub acquisition: AcquisitionSystem,
    /// LFP sampling rate in Hz
    pub lfp_sampling_rate: u32,
    /// One group per shank; extra channels close the last group
    pub anatomical_groups: Vec<Vec<AnatomicalChannel>>,
    /// One group per shank, non-skipped probe channels only
    pub spike_groups: Vec<Vec<u32>>,
    /// Trace display gain
    pub screen_gain: f64,
    /// Spike waveform samples
    pub n_samples: u32,
    /// Peak sample index
    pub peak_sample_index: u32,
    /// Display settings, ascending by channel
    pub channels: Vec<ChannelDisplay>,
}

impl NeuroscopeDocument {
    /// Builds the document for one orientation of a mapping.
    pub fn from_mapping(
        mapping: &ChannelMapping,
        orientation: Orientation,
        params: &NeuroscopeParams,
    ) -> Self {
        Self::build(&mapping.shank_groups(orientation), params)
    }

    /// Builds the document from per-shank Intan channels.
    pub fn build(shanks: &[&[u32]], params: &NeuroscopeParams) -> Self {
        let probe_channels: BTreeSet<u32> = shanks.iter().flat_map(|s| s.iter().copied()).collect();
        report_suspicious_params(&probe_channels, params);

        let n_probe: usize = shanks.iter().map(|s| s.len()).sum();
        let last_shank = shanks.len().saturating_sub(1);

        let mut anatomical_groups = Vec::with_capacity(shanks.len());
        let mut spike_groups = Vec::with_capacity(shanks.len());

        for (idx, shank) in shanks.iter().enumerate() {
            let mut group: Vec<AnatomicalChannel> = shank
                .iter()
                .map(|&channel| AnatomicalChannel {
                    channel,
                    skip: params.is_skipped(channel),
                })
                .collect();

            if idx == last_shank {
                group.extend(params.extra_channels.iter().map(|&channel| AnatomicalChannel {
                    channel,
                    skip: true,
                }));
            }
            anatomical_groups.push(group);

            spike_groups.push(
                shank
                    .iter()
                    .copied()
                    .filter(|&channel| !params.is_skipped(channel))
                    .collect(),
            );
        }

        let all_channels: BTreeSet<u32> = probe_channels
            .iter()
            .chain(params.extra_channels.iter())
            .copied()
            .collect();
        let channels = all_channels
            .into_iter()
            .map(|channel| ChannelDisplay {
                channel,
                color: if params.is_extra(channel) {
                    EXTRA_CHANNEL_COLOR.to_string()
                } else {
                    params.channel_color.clone()
                },
                anatomy_color: params.channel_color.clone(),
                spike_color: params.channel_color.clone(),
                default_offset: 0,
            })
            .collect();

        Self {
            acquisition: AcquisitionSystem {
                n_bits: params.n_bits,
                n_channels: n_probe + params.extra_channels.len(),
                sampling_rate: params.sampling_rate,
                voltage_range: params.voltage_range,
                amplification: params.amplification,
                offset: params.offset,
            },
            lfp_sampling_rate: params.lfp_sampling_rate,
            anatomical_groups,
            spike_groups,
            screen_gain: params.screen_gain,
            n_samples: params.n_samples,
            peak_sample_index: params.peak_sample_index,
            channels,
        }
    }

    /// Serializes the document as Neuroscope XML.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = XmlOut::new();
        xml.declaration()?;
        xml.open("parameters", &[("version", "1.0"), ("creator", "neuroscope-2.0.0")])?;

        let acq = &self.acquisition;
        xml.open("acquisitionSystem", &[])?;
        xml.leaf("nBits", acq.n_bits)?;
        xml.leaf("nChannels", acq.n_channels)?;
        xml.leaf("samplingRate", acq.sampling_rate)?;
        xml.leaf("voltageRange", acq.voltage_range)?;
        xml.leaf("amplification", acq.amplification)?;
        xml.leaf("offset", acq.offset)?;
        xml.close("acquisitionSystem")?;

        xml.open("fieldPotentials", &[])?;
        xml.leaf("lfpSamplingRate", self.lfp_sampling_rate)?;
        xml.close("fieldPotentials")?;

        xml.open("anatomicalDescription", &[])?;
        xml.open("channelGroups", &[])?;
        for group in &self.anatomical_groups {
            xml.open("group", &[])?;
            for entry in group {
                let skip = if entry.skip { "1" } else { "0" };
                xml.leaf_with("channel", &[("skip", skip)], entry.channel)?;
            }
            xml.close("group")?;
        }
        xml.close("channelGroups")?;
        xml.close("anatomicalDescription")?;

        xml.open("spikeDetection", &[])?;
        xml.open("channelGroups", &[])?;
        for group in &self.spike_groups {
            xml.open("group", &[])?;
            xml.open("channels", &[])?;
            for channel in group {
                xml.leaf("channel", channel)?;
            }
            xml.close("channels")?;
            xml.close("group")?;
        }
        xml.close("channelGroups")?;
        xml.close("spikeDetection")?;

        xml.open("neuroscope", &[("version", "2.0.0")])?;
        xml.open("miscellaneous", &[])?;
        xml.leaf("screenGain", format!("{:?}", self.screen_gain))?;
        xml.leaf("traceBackgroundImage", "")?;
        xml.close("miscellaneous")?;

        xml.open("video", &[])?;
        xml.leaf("rotate", 0)?;
        xml.leaf("flip", 0)?;
        xml.leaf("videoImage", "")?;
        xml.leaf("positionsBackground", 0)?;
        xml.close("video")?;

        xml.open("spikes", &[])?;
        xml.leaf("nSamples", self.n_samples)?;
        xml.leaf("peakSampleIndex", self.peak_sample_index)?;
        xml.close("spikes")?;

        xml.open("channels", &[])?;
        for display in &self.channels {
            xml.open("channelColors", &[])?;
            xml.leaf("channel", display.channel)?;
            xml.leaf("color", &display.color)?;
            xml.leaf("anatomyColor", &display.anatomy_color)?;
            xml.leaf("spikeColor", &display.spike_color)?;
            xml.close("channelColors")?;

            xml.open("channelOffset", &[])?;
            xml.leaf("channel", display.channel)?;
            xml.leaf("defaultOffset", display.default_offset)?;
            xml.close("channelOffset")?;
        }
        xml.close("channels")?;
        xml.close("neuroscope")?;

        xml.close("parameters")?;
        xml.finish()
    }
}

/// Renders the Neuroscope XML for one orientation of a mapping.
pub fn render_neuroscope_xml(
    mapping: &ChannelMapping,
    orientation: Orientation,
    params: &NeuroscopeParams,
) -> Result<String> {
    NeuroscopeDocument::from_mapping(mapping, orientation, params).to_xml()
}

fn report_suspicious_params(probe_channels: &BTreeSet<u32>, params: &NeuroscopeParams) {
    for channel in &params.skip_channels {
        if !probe_channels.contains(channel) && !params.is_extra(*channel) {
            warn!(channel, "Skip channel is not a mapped probe channel");
        }
    }
    for channel in &params.extra_channels {
        if probe_channels.contains(channel) {
            warn!(channel, "Extra channel collides with a mapped probe channel");
        }
    }
}

/// Indented XML writer, one space per level.
struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 1),
        }
    }

    fn declaration(&mut self) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
        Ok(())
    }

    fn open(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for &attribute in attributes {
            start.push_attribute(attribute);
        }
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn leaf(&mut self, name: &str, value: impl Display) -> Result<()> {
        self.leaf_with(name, &[], value)
    }

    // Text keeps the closing tag on the same line, also for empty values.
    fn leaf_with(&mut self, name: &str, attributes: &[(&str, &str)], value: impl Display) -> Result<()> {
        self.open(name, attributes)?;
        let text = value.to_string();
        self.writer.write_event(Event::Text(BytesText::new(&text)))?;
        self.close(name)
    }

    fn finish(self) -> Result<String> {
        Ok(String::from_utf8(self.writer.into_inner())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_with(skip: Vec<u32>, extra: Vec<u32>) -> NeuroscopeParams {
        NeuroscopeParams {
            skip_channels: skip,
            extra_channels: extra,
            ..NeuroscopeParams::default()
        }
    }

    #[test]
    fn test_channel_count_includes_extras() {
        let shanks: [&[u32]; 2] = [&[3, 1], &[0, 2]];
        let doc = NeuroscopeDocument::build(&shanks, &params_with(vec![], vec![4, 5]));
        assert_eq!(doc.acquisition.n_channels, 6);
    }

    #[test]
    fn test_extras_join_last_anatomical_group_only() {
        let shanks: [&[u32]; 2] = [&[3, 1], &[0, 2]];
        let doc = NeuroscopeDocument::build(&shanks, &params_with(vec![], vec![4, 5]));

        assert_eq!(doc.anatomical_groups[0].len(), 2);
        assert_eq!(
            doc.anatomical_groups[1],
            vec![
                AnatomicalChannel { channel: 0, skip: false },
                AnatomicalChannel { channel: 2, skip: false },
                AnatomicalChannel { channel: 4, skip: true },
                AnatomicalChannel { channel: 5, skip: true },
            ]
        );
    }

    #[test]
    fn test_spike_groups_exclude_skipped_and_extras() {
        let shanks: [&[u32]; 2] = [&[3, 1], &[0, 2]];
        let doc = NeuroscopeDocument::build(&shanks, &params_with(vec![1], vec![4]));

        assert_eq!(doc.spike_groups, vec![vec![3], vec![0, 2]]);
        assert!(doc.anatomical_groups[0]
            .iter()
            .any(|c| c.channel == 1 && c.skip));
    }

    #[test]
    fn test_channel_colors_sorted_and_distinct() {
        let shanks: [&[u32]; 1] = [&[3, 1, 0, 2]];
        let doc = NeuroscopeDocument::build(&shanks, &params_with(vec![], vec![5, 4]));

        let channels: Vec<u32> = doc.channels.iter().map(|c| c.channel).collect();
        assert_eq!(channels, vec![0, 1, 2, 3, 4, 5]);

        for display in &doc.channels {
            let expected = if display.channel >= 4 {
                EXTRA_CHANNEL_COLOR
            } else {
                "#0080ff"
            };
            assert_eq!(display.color, expected);
            assert_eq!(display.anatomy_color, "#0080ff");
            assert_eq!(display.spike_color, "#0080ff");
            assert_eq!(display.default_offset, 0);
        }
    }

    #[test]
    fn test_xml_layout() {
        let shanks: [&[u32]; 1] = [&[1, 0]];
        let doc = NeuroscopeDocument::build(&shanks, &params_with(vec![0], vec![2]));
        let xml = doc.to_xml().unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\"?>"));
        assert!(xml.contains("<parameters version=\"1.0\" creator=\"neuroscope-2.0.0\">"));
        assert!(xml.contains("  <nBits>16</nBits>"));
        assert!(xml.contains("<nChannels>3</nChannels>"));
        assert!(xml.contains("<samplingRate>20000</samplingRate>"));
        assert!(xml.contains("<lfpSamplingRate>1250</lfpSamplingRate>"));
        assert!(xml.contains("<channel skip=\"0\">1</channel>"));
        assert!(xml.contains("<channel skip=\"1\">0</channel>"));
        assert!(xml.contains("<channel skip=\"1\">2</channel>"));
        assert!(xml.contains("<screenGain>0.2</screenGain>"));
        assert!(xml.contains("<traceBackgroundImage></traceBackgroundImage>"));
        assert!(xml.contains("<nSamples>32</nSamples>"));
        assert!(xml.contains("<peakSampleIndex>16</peakSampleIndex>"));
        assert!(xml.contains("<color>#ffffff</color>"));
        assert!(xml.contains("<defaultOffset>0</defaultOffset>"));
        assert!(xml.trim_end().ends_with("</parameters>"));

        let spike_section = xml
            .split("<spikeDetection>")
            .nth(1)
            .and_then(|s| s.split("</spikeDetection>").next())
            .unwrap();
        assert!(spike_section.contains("<channel>1</channel>"));
        assert!(!spike_section.contains("<channel>0</channel>"));
        assert!(!spike_section.contains("<channel>2</channel>"));
    }

    #[test]
    fn test_xml_is_deterministic() {
        let shanks: [&[u32]; 2] = [&[7, 5], &[4, 0]];
        let params = params_with(vec![5], vec![16]);
        let first = NeuroscopeDocument::build(&shanks, &params).to_xml().unwrap();
        let second = NeuroscopeDocument::build(&shanks, &params).to_xml().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_screen_gain_keeps_decimal_point() {
        let shanks: [&[u32]; 1] = [&[0, 1]];
        let params = NeuroscopeParams {
            screen_gain: 1.0,
            ..NeuroscopeParams::default()
        };
        let xml = NeuroscopeDocument::build(&shanks, &params).to_xml().unwrap();
        assert!(xml.contains("<screenGain>1.0</screenGain>"));
    }
}
