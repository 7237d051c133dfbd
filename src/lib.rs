/*!
 * # srv3conv - subtitle export to YouTube srv3
 *
 * A Rust library for converting ASS/SSA and SRT subtitle projects into
 * YouTube's timed-text XML format (`srv3`, `<timedtext format="3">`).
 *
 * ## Features
 *
 * - Read ASS/SSA `[Events]` sections and SRT files
 * - Split event text into plain, override, comment and drawing blocks
 * - Flatten documents before export (sort, drop comments, split overlaps, merge duplicates)
 * - Serialize events into srv3 cues with XML escaping and `\N` line breaks
 * - Optional tracing of override tags through a pluggable side channel
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_document`: Event model and input readers
 * - `tag_parser`: Override-tag block parsing
 * - `normalize`: Document normalisation passes
 * - `srv3`: Cue serializer and document assembly
 * - `subtitle_format`: Export format registry
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod normalize;
pub mod srv3;
pub mod subtitle_document;
pub mod subtitle_format;
pub mod tag_parser;

// Re-export main types for easier usage
pub use app_config::{Config, ExportConfig};
pub use subtitle_document::{SubtitleDocument, SubtitleEvent};
pub use srv3::{CueFragment, CueSerializer, Srv3Document, encode_plain_text};
pub use subtitle_format::{SubtitleFormat, Srv3SubtitleFormat, writer_for_path};
pub use tag_parser::{Block, OverrideBlock, OverrideTag};
pub use errors::{AppError, ExportError, SubtitleError};
