//! Human-readable report echoing the text output of both orientations.

use crate::export::shank_text::render_shank_text;
use crate::mapper::ChannelMapping;
use crate::models::Orientation;
use std::fmt::Write as _;

/// Builds the report printed after a mapping run.
///
/// ```text
/// Contents of neuronexus_A1x16_version1.txt:
/// shank1: 7 5 4 0 ...
///
/// Contents of neuronexus_A1x16_version2.txt:
/// shank1: 15 13 12 8 ...
/// ```
pub fn render_report(mapping: &ChannelMapping) -> String {
    let mut output = String::new();

    for (idx, orientation) in Orientation::ALL.into_iter().enumerate() {
        if idx > 0 {
            output.push_str("\n\n");
        }
        let _ = writeln!(output, "Contents of {}.txt:", mapping.file_stem(orientation));
        output.push_str(&render_shank_text(mapping, orientation));
    }

    output
}
