//! Data models for layouts, mapping requests and export parameters.
//!
//! Models are independent of the registry, the mapper and the exporters.

pub mod layout;
pub mod neuroscope_params;
pub mod request;

// Re-export all model types
pub use layout::{Layout, Orientation, PinIndex};
pub use neuroscope_params::{
    NeuroscopeOverrides, NeuroscopeParams, DEFAULT_CHANNEL_COLOR, EXTRA_CHANNEL_COLOR,
};
pub use request::{parse_channel_list, MappingRequest, ShankPartition, VersionLabels};
