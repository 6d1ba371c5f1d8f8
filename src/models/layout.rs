//! Connector and headstage pin layouts.

use crate::error::{MapperError, Result};
use serde::Serialize;
use std::collections::HashMap;

/// Ordered pin sequence of a connector or headstage.
///
/// Order encodes the physical position on the connector (dorsal to ventral,
/// left to right). Pins are unique within a layout; this is checked once by
/// [`Layout::new`], so every `Layout` value carries a valid [`PinIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    /// Layout identifier (e.g. `neuronexus_H16`, `intan32`)
    pub name: String,
    /// Pin numbers in physical order
    pub pins: Vec<u32>,
    #[serde(skip)]
    index: PinIndex,
}

impl Layout {
    /// Creates a layout, rejecting repeated pins.
    pub fn new(name: impl Into<String>, pins: Vec<u32>) -> Result<Self> {
        let name = name.into();
        let index = PinIndex::build(&name, &pins)?;
        Ok(Self { name, pins, index })
    }

    /// Number of pins.
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Returns true if the layout has no pins.
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Pin sequence reversed end to end (headstage mounted upside down).
    pub fn flipped(&self) -> Vec<u32> {
        self.pins.iter().rev().copied().collect()
    }

    /// Pins in the given orientation.
    pub fn oriented(&self, orientation: Orientation) -> Vec<u32> {
        match orientation {
            Orientation::Normal => self.pins.clone(),
            Orientation::Flipped => self.flipped(),
        }
    }

    /// Zero-based position of `pin` in this layout.
    pub fn position_of(&self, pin: u32) -> Option<usize> {
        self.index.position(pin)
    }

    /// Returns true if `pin` belongs to this layout.
    pub fn contains(&self, pin: u32) -> bool {
        self.index.position(pin).is_some()
    }

    /// Resolved pin → position table.
    pub const fn index(&self) -> &PinIndex {
        &self.index
    }

    /// Pins in ascending order, for error messages and listings.
    pub fn sorted_pins(&self) -> Vec<u32> {
        let mut pins = self.pins.clone();
        pins.sort_unstable();
        pins
    }
}

/// Pin value → zero-based position lookup for one layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinIndex {
    positions: HashMap<u32, usize>,
}

impl PinIndex {
    /// Builds the lookup table, failing on the first repeated pin.
    pub fn build(layout_name: &str, pins: &[u32]) -> Result<Self> {
        let mut positions = HashMap::with_capacity(pins.len());
        for (position, &pin) in pins.iter().enumerate() {
            if let Some(first) = positions.insert(pin, position) {
                return Err(MapperError::DuplicatePin {
                    layout: layout_name.to_string(),
                    pin,
                    first,
                    second: position,
                });
            }
        }
        Ok(Self { positions })
    }

    /// Position of `pin`, if present.
    pub fn position(&self, pin: u32) -> Option<usize> {
        self.positions.get(&pin).copied()
    }

    /// Number of resolved pins.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if no pins were resolved.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Physical mounting orientation of the headstage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Stored Intan pin order
    Normal,
    /// Intan pin order reversed
    Flipped,
}

impl Orientation {
    /// Both orientations, in output order.
    pub const ALL: [Self; 2] = [Self::Normal, Self::Flipped];
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Flipped => write!(f, "flipped"),
        }
    }
}
