/*!
 * Export formats.
 *
 * Each writable format implements [`SubtitleFormat`], advertising a display
 * name and the file extensions it writes. Callers pick a writer from the
 * destination path with [`writer_for_path`].
 */

use std::fmt::Debug;
use std::path::Path;
use log::info;

use crate::app_config::ExportConfig;
use crate::errors::ExportError;
use crate::file_utils::FileManager;
use crate::normalize;
use crate::srv3::{CueSerializer, LogTracer, NoTrace, Srv3Document};
use crate::subtitle_document::{SubtitleDocument, SubtitleEvent};

/// Common trait for all export formats
pub trait SubtitleFormat: Debug {
    /// Human readable format name
    fn name(&self) -> &str;

    /// Extensions (without the dot) this format writes
    fn write_wildcards(&self) -> Vec<&'static str>;

    /// Whether this format writes files with the extension of `path`
    fn can_write_file(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.write_wildcards().iter().any(|w| *w == ext))
    }

    /// Write `document` to `path`
    ///
    /// The document is not modified; normalisation runs on a copy of its events.
    fn write_file(&self, document: &SubtitleDocument, path: &Path, config: &ExportConfig) -> Result<(), ExportError>;
}

/// YouTube's undocumented srv3 timed-text XML
#[derive(Debug, Default, Clone, Copy)]
pub struct Srv3SubtitleFormat;

impl Srv3SubtitleFormat {
    /// Normalise a copy of the events and serialize them
    pub fn build_document(&self, events: &[SubtitleEvent], config: &ExportConfig) -> Srv3Document {
        let mut events = events.to_vec();
        normalize::normalize(&mut events, config);

        if config.trace_overrides {
            CueSerializer::with_tracer(LogTracer).serialize(&events)
        } else {
            CueSerializer::with_tracer(NoTrace).serialize(&events)
        }
    }
}

impl Srv3SubtitleFormat {
    /// File extension written by this format
    pub const EXTENSION: &'static str = "srv3";
}

impl SubtitleFormat for Srv3SubtitleFormat {
    fn name(&self) -> &str {
        "YouTube SRV3"
    }

    fn write_wildcards(&self) -> Vec<&'static str> {
        vec![Self::EXTENSION]
    }

    fn write_file(&self, document: &SubtitleDocument, path: &Path, config: &ExportConfig) -> Result<(), ExportError> {
        let srv3 = self.build_document(&document.events, config);

        let writer = FileManager::create_output(path)?;
        srv3.write_to(writer)?;

        info!("Wrote {} cues to {:?}", srv3.cues().len(), path);
        Ok(())
    }
}

/// Every format this crate can write
pub fn writable_formats() -> Vec<Box<dyn SubtitleFormat>> {
    vec![Box::new(Srv3SubtitleFormat)]
}

/// Find the format that writes files like `path`
pub fn writer_for_path(path: &Path) -> Result<Box<dyn SubtitleFormat>, ExportError> {
    writable_formats()
        .into_iter()
        .find(|format| format.can_write_file(path))
        .ok_or_else(|| ExportError::UnsupportedFormat(path.display().to_string()))
}
