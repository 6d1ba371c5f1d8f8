//! Read-only registry of Omnetics connector and Intan headstage layouts.
//!
//! The registry is assembled once through [`RegistryBuilder`], which checks
//! every table for repeated pins and refuses to redefine a key. After
//! [`RegistryBuilder::build`] the registry exposes lookups only. The
//! built-in catalog is available process-wide through [`LayoutRegistry::builtin`].

pub mod builtin;
pub mod catalog;

pub use catalog::LayoutCatalog;

use crate::error::{MapperError, Result};
use crate::models::Layout;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

static BUILTIN: LazyLock<LayoutRegistry> = LazyLock::new(|| {
    RegistryBuilder::with_builtin()
        .build()
        .expect("built-in layout tables must not repeat pins or keys")
});

/// Key of an Omnetics layout: (probe family, connector).
///
/// Probe family is stored lowercase and connector uppercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OmneticsKey {
    /// Probe family, lowercase
    pub probe_type: String,
    /// Connector, uppercase
    pub connector: String,
}

impl OmneticsKey {
    /// Creates a normalized key.
    pub fn new(probe_type: &str, connector: &str) -> Self {
        Self {
            probe_type: probe_type.trim().to_lowercase(),
            connector: connector.trim().to_uppercase(),
        }
    }

    /// Name given to the layout registered under this key.
    pub fn layout_name(&self) -> String {
        format!("{}_{}", self.probe_type, self.connector)
    }
}

impl std::fmt::Display for OmneticsKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.probe_type, self.connector)
    }
}

/// Immutable Omnetics and Intan layout tables.
#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    omnetics: BTreeMap<OmneticsKey, Layout>,
    intan: BTreeMap<usize, Layout>,
}

impl LayoutRegistry {
    /// The process-wide registry holding the built-in tables.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Starts a registry from the built-in tables.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::with_builtin()
    }

    /// Looks up the Omnetics layout for a probe family and connector.
    pub fn lookup_omnetics(&self, probe_type: &str, connector: &str) -> Result<&Layout> {
        let key = OmneticsKey::new(probe_type, connector);
        self.omnetics
            .get(&key)
            .ok_or_else(|| MapperError::UnsupportedProbe {
                probe_type: key.probe_type.clone(),
                connector: key.connector.clone(),
                known: self.omnetics_keys().iter().map(ToString::to_string).collect(),
            })
    }

    /// Looks up the Intan layout with `channel_count` channels.
    pub fn lookup_intan(&self, channel_count: usize) -> Result<&Layout> {
        self.intan
            .get(&channel_count)
            .ok_or_else(|| MapperError::UnsupportedChannelCount {
                channel_count,
                known: self.intan_sizes(),
            })
    }

    /// Registered Omnetics keys, sorted.
    pub fn omnetics_keys(&self) -> Vec<OmneticsKey> {
        self.omnetics.keys().cloned().collect()
    }

    /// Registered Intan sizes, ascending.
    pub fn intan_sizes(&self) -> Vec<usize> {
        self.intan.keys().copied().collect()
    }

    /// Iterates over Omnetics layouts in key order.
    pub fn omnetics(&self) -> impl Iterator<Item = (&OmneticsKey, &Layout)> {
        self.omnetics.iter()
    }

    /// Iterates over Intan layouts by ascending size.
    pub fn intan(&self) -> impl Iterator<Item = (usize, &Layout)> {
        self.intan.iter().map(|(size, layout)| (*size, layout))
    }

    /// Finds a layout by name (`neuronexus_H16`, `intan32`) or Omnetics key
    /// (`neuronexus-H16`), case-insensitively.
    pub fn find_by_name(&self, name: &str) -> Option<&Layout> {
        let wanted = name.trim().to_lowercase();
        self.omnetics
            .iter()
            .find(|(key, layout)| {
                layout.name.to_lowercase() == wanted || key.to_string().to_lowercase() == wanted
            })
            .map(|(_, layout)| layout)
            .or_else(|| {
                self.intan
                    .values()
                    .find(|layout| layout.name.to_lowercase() == wanted)
            })
    }
}

/// Collects layout tables before freezing them into a [`LayoutRegistry`].
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    omnetics: Vec<(OmneticsKey, Vec<u32>)>,
    intan: Vec<(String, Vec<u32>)>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder holding the built-in tables.
    pub fn with_builtin() -> Self {
        let mut builder = Self::new();
        builtin::register_builtin(&mut builder);
        builder
    }

    /// Adds an Omnetics connector layout.
    pub fn add_omnetics(&mut self, probe_type: &str, connector: &str, pins: Vec<u32>) -> &mut Self {
        self.omnetics
            .push((OmneticsKey::new(probe_type, connector), pins));
        self
    }

    /// Adds an Intan headstage layout, keyed by its channel count.
    pub fn add_intan(&mut self, name: &str, pins: Vec<u32>) -> &mut Self {
        self.intan.push((name.to_string(), pins));
        self
    }

    /// Adds every layout of a catalog file.
    pub fn add_catalog(&mut self, catalog: &LayoutCatalog) -> &mut Self {
        for entry in &catalog.omnetics {
            self.add_omnetics(&entry.probe_type, &entry.connector, entry.pins.clone());
        }
        for entry in &catalog.intan {
            let name = entry
                .name
                .clone()
                .unwrap_or_else(|| format!("intan{}", entry.pins.len()));
            self.add_intan(&name, entry.pins.clone());
        }
        self
    }

    /// Validates every table and freezes the registry.
    pub fn build(self) -> Result<LayoutRegistry> {
        let mut omnetics = BTreeMap::new();
        for (key, pins) in self.omnetics {
            let layout = Layout::new(key.layout_name(), pins)?;
            if omnetics.contains_key(&key) {
                return Err(MapperError::DuplicateLayoutKey {
                    key: key.to_string(),
                });
            }
            omnetics.insert(key, layout);
        }

        let mut intan = BTreeMap::new();
        for (name, pins) in self.intan {
            let layout = Layout::new(name, pins)?;
            let size = layout.len();
            if intan.contains_key(&size) {
                return Err(MapperError::DuplicateLayoutKey {
                    key: format!("intan ({} channels)", size),
                });
            }
            intan.insert(size, layout);
        }

        debug!(
            omnetics = omnetics.len(),
            intan = intan.len(),
            "Layout registry built"
        );

        Ok(LayoutRegistry { omnetics, intan })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_lookup() {
        let registry = LayoutRegistry::builtin();
        let layout = registry.lookup_omnetics("neuronexus", "H16").unwrap();
        assert_eq!(layout.name, "neuronexus_H16");
        assert_eq!(layout.len(), 16);

        let intan = registry.lookup_intan(16).unwrap();
        assert_eq!(intan.name, "intan16");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = LayoutRegistry::builtin();
        let layout = registry.lookup_omnetics("NeuroNexus", "h64lp").unwrap();
        assert_eq!(layout.name, "neuronexus_H64LP");
    }

    #[test]
    fn test_unsupported_probe_lists_all_keys() {
        let registry = LayoutRegistry::builtin();
        let err = registry.lookup_omnetics("neuronexus", "H999").unwrap_err();
        match &err {
            MapperError::UnsupportedProbe { known, .. } => {
                assert_eq!(
                    known,
                    &vec![
                        "neuronexus-H16".to_string(),
                        "neuronexus-H32".to_string(),
                        "neuronexus-H64".to_string(),
                        "neuronexus-H64LP".to_string(),
                    ]
                );
            }
            other => panic!("Unexpected error: {other}"),
        }
        assert!(err.to_string().contains("neuronexus-H64LP"));
    }

    #[test]
    fn test_unsupported_channel_count() {
        let err = LayoutRegistry::builtin().lookup_intan(128).unwrap_err();
        assert!(matches!(
            err,
            MapperError::UnsupportedChannelCount {
                channel_count: 128,
                ..
            }
        ));
        assert!(err.to_string().contains("16, 32, 64"));
    }

    #[test]
    fn test_every_omnetics_layout_has_matching_intan() {
        let registry = LayoutRegistry::builtin();
        for (key, layout) in registry.omnetics() {
            let unique: HashSet<u32> = layout.pins.iter().copied().collect();
            assert_eq!(unique.len(), layout.len(), "{key} repeats pins");

            let intan = registry
                .lookup_intan(layout.len())
                .unwrap_or_else(|e| panic!("{key}: {e}"));
            assert_eq!(intan.len(), layout.len());
        }
    }

    #[test]
    fn test_intan_tables_cover_zero_based_channels() {
        for (size, layout) in LayoutRegistry::builtin().intan() {
            let expected: Vec<u32> = (0..u32::try_from(size).unwrap()).collect();
            assert_eq!(layout.sorted_pins(), expected, "{}", layout.name);
        }
    }

    #[test]
    fn test_builder_rejects_duplicate_pins() {
        let mut builder = RegistryBuilder::new();
        builder.add_omnetics("acme", "X4", vec![1, 2, 2, 4]);
        let err = builder.build().unwrap_err();
        assert!(matches!(err, MapperError::DuplicatePin { pin: 2, .. }));
    }

    #[test]
    fn test_builder_rejects_redefinition() {
        let mut builder = RegistryBuilder::with_builtin();
        builder.add_omnetics("NEURONEXUS", "h16", (1..=16).collect());
        let err = builder.build().unwrap_err();
        assert!(matches!(err, MapperError::DuplicateLayoutKey { .. }));

        let mut builder = RegistryBuilder::with_builtin();
        builder.add_intan("other16", (0..16).collect());
        assert!(matches!(
            builder.build(),
            Err(MapperError::DuplicateLayoutKey { .. })
        ));
    }

    #[test]
    fn test_builder_extends_builtin() {
        let mut builder = LayoutRegistry::builder();
        builder
            .add_omnetics("acme", "x4", vec![4, 3, 2, 1])
            .add_intan("intan4", vec![0, 1, 2, 3]);
        let registry = builder.build().unwrap();

        assert_eq!(
            registry.lookup_omnetics("acme", "X4").unwrap().name,
            "acme_X4"
        );
        assert_eq!(registry.intan_sizes(), vec![4, 16, 32, 64]);
        assert!(registry.lookup_omnetics("neuronexus", "H32").is_ok());
    }

    #[test]
    fn test_find_by_name() {
        let registry = LayoutRegistry::builtin();
        assert_eq!(
            registry.find_by_name("neuronexus-h32").unwrap().name,
            "neuronexus_H32"
        );
        assert_eq!(
            registry.find_by_name("NEURONEXUS_H64").unwrap().name,
            "neuronexus_H64"
        );
        assert_eq!(registry.find_by_name("intan64").unwrap().len(), 64);
        assert!(registry.find_by_name("intan128").is_none());
    }
}
