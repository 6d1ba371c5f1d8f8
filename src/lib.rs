//! ProbeMapper Library
//!
//! This library maps the channel order of NeuroNexus silicon probes, wired
//! through Omnetics connectors, onto Intan headstage channels. It provides
//! the connector and headstage layout registry, the channel mapper for both
//! headstage orientations, and exporters for per-shank text files and
//! Neuroscope XML parameter files.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod mapper;
pub mod models;
pub mod registry;
pub mod services;

pub use error::{ErrorKind, MapperError, Result};
pub use mapper::{ChannelMapper, ChannelMapping};
pub use models::{Layout, MappingRequest, NeuroscopeParams, Orientation};
pub use registry::LayoutRegistry;
