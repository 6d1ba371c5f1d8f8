//! Per-shank text rendering.

use crate::mapper::ChannelMapping;
use crate::models::Orientation;

/// Formats one line per shank: `shank<N>: <channels>`, numbered from 1.
pub fn format_shank_lines(groups: &[&[u32]]) -> Vec<String> {
    groups
        .iter()
        .enumerate()
        .map(|(idx, channels)| {
            let channels = channels
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            format!("shank{}: {}", idx + 1, channels)
        })
        .collect()
}

/// Contents of the `.txt` file for one orientation (no trailing newline).
pub fn render_shank_text(mapping: &ChannelMapping, orientation: Orientation) -> String {
    format_shank_lines(&mapping.shank_groups(orientation)).join("\n")
}
