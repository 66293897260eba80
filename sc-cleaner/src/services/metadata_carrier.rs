//! Carry source tags over to the exported track
//!
//! Reads the primary (or first) tag block of the source file with lofty and
//! writes it to the output file, re-mapped to the output format's primary tag
//! type. Items the target tag type cannot represent are dropped by lofty.

use lofty::config::WriteOptions;
use lofty::file::{FileType, TaggedFileExt};
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::Tag;
use std::path::Path;
use thiserror::Error;

use crate::models::OutputFormat;

/// Metadata errors
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Source tags could not be read
    #[error("Failed to read tags: {0}")]
    ReadError(String),

    /// Tags could not be written to the output file
    #[error("Failed to write tags: {0}")]
    WriteError(String),
}

/// Tag reader/writer for one output format
#[derive(Debug, Clone, Copy)]
pub struct MetadataCarrier {
    output_format: OutputFormat,
}

impl MetadataCarrier {
    pub fn new(output_format: OutputFormat) -> Self {
        Self { output_format }
    }

    /// Read the source tag block, `None` when the file carries no tags
    pub fn read_tags(&self, source: &Path) -> Result<Option<Tag>, MetadataError> {
        let tagged_file = Probe::open(source)
            .map_err(|e| MetadataError::ReadError(e.to_string()))?
            .read()
            .map_err(|e| MetadataError::ReadError(e.to_string()))?;

        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .filter(|tag| !tag.is_empty())
            .cloned();

        tracing::debug!(
            file = %source.display(),
            items = tag.as_ref().map(|t| t.len()).unwrap_or(0),
            "Read source tags"
        );

        Ok(tag)
    }

    /// Write `tag` to an already-encoded output file
    pub fn write_tags(&self, tag: Tag, output: &Path) -> Result<(), MetadataError> {
        let mut tag = tag;
        tag.re_map(self.output_file_type().primary_tag_type());

        if tag.is_empty() {
            // Nothing survived the conversion
            return Ok(());
        }

        tag.save_to_path(output, WriteOptions::default())
            .map_err(|e| MetadataError::WriteError(e.to_string()))
    }

    fn output_file_type(&self) -> FileType {
        match self.output_format {
            OutputFormat::Mp3 => FileType::Mpeg,
            OutputFormat::Wav => FileType::Wav,
        }
    }
}
