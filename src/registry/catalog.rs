//! Layout catalog files that extend the built-in tables.
//!
//! ```toml
//! [[omnetics]]
//! probe_type = "cambridge"
//! connector = "ASSY-4"
//! pins = [4, 3, 2, 1]
//!
//! [[intan]]
//! name = "intan4"
//! pins = [0, 1, 2, 3]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Omnetics layout entry of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OmneticsEntry {
    /// Probe family
    pub probe_type: String,
    /// Connector
    pub connector: String,
    /// Pins in datasheet order
    pub pins: Vec<u32>,
}

/// Intan layout entry of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntanEntry {
    /// Layout name, `intan<N>` when omitted
    #[serde(default)]
    pub name: Option<String>,
    /// Pins in preamp order
    pub pins: Vec<u32>,
}

/// Additional layouts loaded from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutCatalog {
    /// Omnetics connectors
    #[serde(default)]
    pub omnetics: Vec<OmneticsEntry>,
    /// Intan headstages
    #[serde(default)]
    pub intan: Vec<IntanEntry>,
}

impl LayoutCatalog {
    /// Loads a catalog from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout catalog: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse layout catalog: {}", path.display()))
    }

    /// Parses catalog TOML.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.omnetics.len() + self.intan.len()
    }

    /// Returns true if the catalog adds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
