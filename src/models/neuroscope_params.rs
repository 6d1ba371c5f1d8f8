//! Acquisition and display parameters for Neuroscope XML export.

use serde::{Deserialize, Serialize};

/// Default display color for probe channels.
pub const DEFAULT_CHANNEL_COLOR: &str = "#0080ff";

/// Display color used for extra (non-probe) channels.
pub const EXTRA_CHANNEL_COLOR: &str = "#ffffff";

/// Parameters written verbatim into the Neuroscope document.
///
/// Any subset of fields may be given in TOML; missing fields take the
/// defaults below.
///
/// | Field | Default |
/// |-------|---------|
/// | `n_bits` | 16 |
/// | `sampling_rate` | 20000 Hz |
/// | `lfp_sampling_rate` | 1250 Hz |
/// | `voltage_range` | 20 mV |
/// | `amplification` | 1000 |
/// | `offset` | 0 |
/// | `n_samples` | 32 |
/// | `peak_sample_index` | 16 |
/// | `screen_gain` | 0.2 |
/// | `skip_channels` | empty |
/// | `extra_channels` | empty |
/// | `channel_color` | `#0080ff` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeuroscopeParams {
    /// Bit depth of the recording
    pub n_bits: u32,
    /// Acquisition sampling rate in Hz
    pub sampling_rate: u32,
    /// LFP downsampled rate in Hz
    pub lfp_sampling_rate: u32,
    /// Voltage range in mV
    pub voltage_range: u32,
    /// Amplifier gain
    pub amplification: u32,
    /// DC offset
    pub offset: i64,
    /// Spike waveform samples
    pub n_samples: u32,
    /// Peak sample index within the waveform
    pub peak_sample_index: u32,
    /// Trace display gain
    pub screen_gain: f64,
    /// Channels flagged as skipped
    pub skip_channels: Vec<u32>,
    /// Non-probe channels (ADC, AUX) appended after the probe channels
    pub extra_channels: Vec<u32>,
    /// Display color for probe channels, as hex
    pub channel_color: String,
}

impl Default for NeuroscopeParams {
    fn default() -> Self {
        Self {
            n_bits: 16,
            sampling_rate: 20_000,
            lfp_sampling_rate: 1250,
            voltage_range: 20,
            amplification: 1000,
            offset: 0,
            n_samples: 32,
            peak_sample_index: 16,
            screen_gain: 0.2,
            skip_channels: Vec::new(),
            extra_channels: Vec::new(),
            channel_color: DEFAULT_CHANNEL_COLOR.to_string(),
        }
    }
}

impl NeuroscopeParams {
    /// Returns true if `channel` is flagged as skipped.
    pub fn is_skipped(&self, channel: u32) -> bool {
        self.skip_channels.contains(&channel)
    }

    /// Returns true if `channel` is one of the extra channels.
    pub fn is_extra(&self, channel: u32) -> bool {
        self.extra_channels.contains(&channel)
    }
}

/// Partial [`NeuroscopeParams`], as given in a request file or `--params`.
///
/// Set fields replace the corresponding field of the base parameters (the
/// user configuration); unset fields keep the base value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeuroscopeOverrides {
    /// Bit depth of the recording
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_bits: Option<u32>,
    /// Acquisition sampling rate in Hz
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_rate: Option<u32>,
    /// LFP downsampled rate in Hz
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfp_sampling_rate: Option<u32>,
    /// Voltage range in mV
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage_range: Option<u32>,
    /// Amplifier gain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amplification: Option<u32>,
    /// DC offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Spike waveform samples
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_samples: Option<u32>,
    /// Peak sample index within the waveform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_sample_index: Option<u32>,
    /// Trace display gain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_gain: Option<f64>,
    /// Channels flagged as skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_channels: Option<Vec<u32>>,
    /// Non-probe channels (ADC, AUX)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_channels: Option<Vec<u32>>,
    /// Display color for probe channels, as hex
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_color: Option<String>,
}

impl NeuroscopeOverrides {
    /// Layers `other` on top of `self`; fields set in `other` win.
    pub fn merge(&mut self, other: Self) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })*
            };
        }
        take!(
            n_bits,
            sampling_rate,
            lfp_sampling_rate,
            voltage_range,
            amplification,
            offset,
            n_samples,
            peak_sample_index,
            screen_gain,
            skip_channels,
            extra_channels,
            channel_color
        );
    }

    /// Complete parameters: `base` with every set field replaced.
    pub fn apply(&self, base: &NeuroscopeParams) -> NeuroscopeParams {
        NeuroscopeParams {
            n_bits: self.n_bits.unwrap_or(base.n_bits),
            sampling_rate: self.sampling_rate.unwrap_or(base.sampling_rate),
            lfp_sampling_rate: self.lfp_sampling_rate.unwrap_or(base.lfp_sampling_rate),
            voltage_range: self.voltage_range.unwrap_or(base.voltage_range),
            amplification: self.amplification.unwrap_or(base.amplification),
            offset: self.offset.unwrap_or(base.offset),
            n_samples: self.n_samples.unwrap_or(base.n_samples),
            peak_sample_index: self.peak_sample_index.unwrap_or(base.peak_sample_index),
            screen_gain: self.screen_gain.unwrap_or(base.screen_gain),
            skip_channels: self
                .skip_channels
                .clone()
                .unwrap_or_else(|| base.skip_channels.clone()),
            extra_channels: self
                .extra_channels
                .clone()
                .unwrap_or_else(|| base.extra_channels.clone()),
            channel_color: self
                .channel_color
                .clone()
                .unwrap_or_else(|| base.channel_color.clone()),
        }
    }
}
