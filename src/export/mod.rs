//! Rendering of mapping results.
//!
//! Produces the per-shank text files, the Neuroscope XML documents and the
//! report printed after a run. Rendering is pure; writing files is left to
//! [`crate::services::ExportService`].

pub mod neuroscope;
pub mod report;
pub mod shank_text;

pub use neuroscope::{render_neuroscope_xml, NeuroscopeDocument};
pub use report::render_report;
pub use shank_text::{format_shank_lines, render_shank_text};
