//! Export file I/O service.
//!
//! Renders every requested artifact in memory first, then writes them. A
//! rendering failure therefore never leaves a partial set of files behind.

use crate::error::MapperError;
use crate::export::{render_neuroscope_xml, render_shank_text};
use crate::mapper::ChannelMapping;
use crate::models::{NeuroscopeParams, Orientation};
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What to write and where.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Target directory, created when missing
    pub out_dir: PathBuf,
    /// Write `.txt` shank files
    pub export_txt: bool,
    /// Write Neuroscope `.xml` files
    pub export_xml: bool,
    /// Neuroscope parameters
    pub params: NeuroscopeParams,
}

/// A rendered file waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    /// Destination
    pub path: PathBuf,
    /// Full file contents
    pub contents: String,
}

/// Service writing mapping artifacts to disk.
pub struct ExportService;

impl ExportService {
    /// Renders all enabled artifacts for both orientations.
    ///
    /// Order: text files (normal, flipped) then XML files (normal, flipped).
    pub fn render(mapping: &ChannelMapping, options: &ExportOptions) -> Result<Vec<PendingFile>> {
        let mut files = Vec::new();

        if options.export_txt {
            for orientation in Orientation::ALL {
                files.push(PendingFile {
                    path: Self::output_path(mapping, orientation, &options.out_dir, "txt"),
                    contents: render_shank_text(mapping, orientation),
                });
            }
        }

        if options.export_xml {
            for orientation in Orientation::ALL {
                files.push(PendingFile {
                    path: Self::output_path(mapping, orientation, &options.out_dir, "xml"),
                    contents: render_neuroscope_xml(mapping, orientation, &options.params)?,
                });
            }
        }

        Ok(files)
    }

    /// Renders and writes all enabled artifacts, returning the written paths.
    pub fn write(mapping: &ChannelMapping, options: &ExportOptions) -> Result<Vec<PathBuf>> {
        let files = Self::render(mapping, options)?;
        if files.is_empty() {
            debug!("No export formats enabled, nothing written");
            return Ok(Vec::new());
        }

        fs::create_dir_all(&options.out_dir).map_err(|source| MapperError::Io {
            path: options.out_dir.clone(),
            source,
        })?;

        let mut written = Vec::with_capacity(files.len());
        for file in files {
            fs::write(&file.path, &file.contents).map_err(|source| MapperError::Io {
                path: file.path.clone(),
                source,
            })?;
            info!(path = %file.path.display(), "Wrote export file");
            written.push(file.path);
        }

        Ok(written)
    }

    /// Path of the `extension` file for one orientation.
    pub fn output_path(
        mapping: &ChannelMapping,
        orientation: Orientation,
        out_dir: &Path,
        extension: &str,
    ) -> PathBuf {
        out_dir.join(format!("{}.{}", mapping.file_stem(orientation), extension))
    }
}
