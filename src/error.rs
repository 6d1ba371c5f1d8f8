//! Error types for layout lookup, request validation and export.
//!
//! Every error carries the offending value and, where one exists, the set of
//! valid alternatives so the message is directly actionable.

use std::path::PathBuf;
use thiserror::Error;

/// Broad category of a [`MapperError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown probe, connector or channel count, or a broken layout catalog
    Configuration,
    /// Malformed mapping request
    Validation,
    /// File system failure while exporting
    Io,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration Error"),
            Self::Validation => write!(f, "Validation Error"),
            Self::Io => write!(f, "I/O Error"),
        }
    }
}

/// Errors raised while resolving layouts or building a mapping.
#[derive(Error, Debug)]
pub enum MapperError {
    /// No Omnetics layout is registered for the probe family / connector pair
    #[error("Unsupported probe/connector: ({probe_type}, {connector}). Known: {}", known.join(", "))]
    UnsupportedProbe {
        /// Requested probe family
        probe_type: String,
        /// Requested connector
        connector: String,
        /// Registered keys, formatted `family-CONNECTOR`
        known: Vec<String>,
    },

    /// No Intan layout has the required number of channels
    #[error("No Intan layout for {channel_count} channels. Known sizes: {}", join_numbers(known))]
    UnsupportedChannelCount {
        /// Channel count of the Omnetics layout
        channel_count: usize,
        /// Registered Intan sizes
        known: Vec<usize>,
    },

    /// An Intan pin table does not have one pin per connector position
    #[error("Intan pin table has {intan} pins but Omnetics layout '{layout}' has {omnetics}")]
    IntanSizeMismatch {
        /// Omnetics layout name
        layout: String,
        /// Connector pin count
        omnetics: usize,
        /// Intan pin count supplied
        intan: usize,
    },

    /// A layout table repeats a pin value
    #[error("Layout '{layout}' contains pin {pin} more than once (positions {first} and {second})")]
    DuplicatePin {
        /// Layout name
        layout: String,
        /// Repeated pin value
        pin: u32,
        /// Position of the first occurrence
        first: usize,
        /// Position of the repeat
        second: usize,
    },

    /// A catalog tried to redefine an already registered layout
    #[error("Layout key '{key}' is already registered; catalogs can only add new layouts")]
    DuplicateLayoutKey {
        /// Offending registry key
        key: String,
    },

    /// The channel map length differs from the connector pin count
    #[error("channel_map length must match Omnetics layout length ({channel_map} vs {layout})")]
    LengthMismatch {
        /// Number of channels supplied
        channel_map: usize,
        /// Number of pins on the connector
        layout: usize,
    },

    /// A channel in the map is not a pin of the connector
    #[error("Channel {channel} is not a pin of layout '{layout}'. Valid pins: {}", join_numbers(valid))]
    UnknownChannel {
        /// Offending channel number
        channel: u32,
        /// Layout name
        layout: String,
        /// Sorted pins of the layout
        valid: Vec<u32>,
    },

    /// A channel appears more than once in the map
    #[error("Channel {channel} appears more than once in channel_map (positions {first} and {second})")]
    DuplicateChannel {
        /// Repeated channel number
        channel: u32,
        /// Position of the first occurrence
        first: usize,
        /// Position of the repeat
        second: usize,
    },

    /// The shank partition does not cover the channel map exactly
    #[error("chan_per_shank must sum to the total number of channels ({sum} vs {expected})")]
    PartitionMismatch {
        /// Sum of the partition
        sum: usize,
        /// Channel map length
        expected: usize,
    },

    /// The shank partition is empty or contains a zero-sized shank
    #[error("chan_per_shank must contain at least one shank and every shank needs channels (got {partition:?})")]
    EmptyShank {
        /// Partition as supplied
        partition: Vec<usize>,
    },

    /// Orientation labels are not two distinct non-empty strings
    #[error("version labels must be a pair of distinct non-empty strings (got {labels:?})")]
    InvalidVersionLabels {
        /// Labels as supplied
        labels: Vec<String>,
    },

    /// A textual channel list could not be parsed
    #[error("Invalid channel list entry '{entry}': {reason}")]
    InvalidChannelList {
        /// Offending token
        entry: String,
        /// Why it was rejected
        reason: String,
    },

    /// Writing an export file failed
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// Target path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl MapperError {
    /// Returns the category of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedProbe { .. }
            | Self::UnsupportedChannelCount { .. }
            | Self::IntanSizeMismatch { .. }
            | Self::DuplicatePin { .. }
            | Self::DuplicateLayoutKey { .. } => ErrorKind::Configuration,
            Self::LengthMismatch { .. }
            | Self::UnknownChannel { .. }
            | Self::DuplicateChannel { .. }
            | Self::PartitionMismatch { .. }
            | Self::EmptyShank { .. }
            | Self::InvalidVersionLabels { .. }
            | Self::InvalidChannelList { .. } => ErrorKind::Validation,
            Self::Io { .. } => ErrorKind::Io,
        }
    }
}

/// Result alias for mapping operations.
pub type Result<T> = std::result::Result<T, MapperError>;

fn join_numbers<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
