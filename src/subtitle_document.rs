use std::fmt;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context};
use log::{warn, debug};
use crate::errors::SubtitleError;
use crate::file_utils::{FileManager, FileType};
use crate::tag_parser::{self, Block};

// @module: Subtitle document model and readers

// @const: SRT timestamp regex
static SRT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2})[,.](\d{3})").unwrap()
});

// @const: ASS timestamp regex (H:MM:SS.cc)
static ASS_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{1,2}):(\d{1,2})(?:[.,](\d{1,3}))?$").unwrap()
});

// @const: SRT inline style tags that have an ASS override equivalent
static SRT_STYLE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(/?)([bisu])>").unwrap()
});

// @const: SRT font tags, which are dropped
static SRT_FONT_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?font[^>]*>").unwrap()
});

/// Field layout assumed when an `[Events]` section has no `Format:` line
const DEFAULT_EVENT_FORMAT: [&str; 10] = [
    "layer", "start", "end", "style", "name", "marginl", "marginr", "marginv", "effect", "text",
];

// @struct: Single subtitle event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEvent {
    // @field: Layer (SSA "Marked" reads as 0)
    pub layer: i32,

    // @field: Start time in ms
    pub start_ms: i64,

    // @field: End time in ms
    pub end_ms: i64,

    // @field: Style name
    pub style: String,

    // @field: Actor / speaker name
    pub actor: String,

    // @field: Effect field
    pub effect: String,

    // @field: Raw text including override blocks
    pub text: String,

    // @field: Commented-out line
    pub comment: bool,
}

impl SubtitleEvent {
    /// Creates a dialogue event on the default style
    pub fn new(start_ms: i64, end_ms: i64, text: impl Into<String>) -> Self {
        SubtitleEvent {
            layer: 0,
            start_ms,
            end_ms,
            style: "Default".to_string(),
            actor: String::new(),
            effect: String::new(),
            text: text.into(),
            comment: false,
        }
    }

    /// Creates a commented-out event
    pub fn new_comment(start_ms: i64, end_ms: i64, text: impl Into<String>) -> Self {
        SubtitleEvent {
            comment: true,
            ..Self::new(start_ms, end_ms, text)
        }
    }

    // @returns: End minus start, may be negative for malformed input
    pub fn duration_ms(&self) -> i64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Decompose the text into plain, override, comment and drawing blocks
    pub fn parse_blocks(&self) -> Vec<Block> {
        tag_parser::parse_blocks(&self.text)
    }

    /// Parse an ASS timestamp (`H:MM:SS.cc`) to milliseconds
    pub fn parse_ass_timestamp(timestamp: &str) -> Result<i64, SubtitleError> {
        let caps = ASS_TIMESTAMP_REGEX
            .captures(timestamp.trim())
            .ok_or_else(|| SubtitleError::InvalidTimestamp(timestamp.to_string()))?;

        let field = |idx: usize| -> Result<i64, SubtitleError> {
            caps.get(idx)
                .map_or(Ok(0), |m| m.as_str().parse::<i64>())
                .map_err(|_| SubtitleError::InvalidTimestamp(timestamp.to_string()))
        };

        let hours = field(1)?;
        let minutes = field(2)?;
        let seconds = field(3)?;

        // Fraction digits are scaled to milliseconds: ".5" = 500, ".05" = 50, ".005" = 5
        let millis = match caps.get(4) {
            Some(m) => {
                let digits = m.as_str();
                let value = field(4)?;
                value * 10_i64.pow(3 - digits.len() as u32)
            }
            None => 0,
        };

        if minutes >= 60 || seconds >= 60 {
            return Err(SubtitleError::InvalidTimestamp(timestamp.to_string()));
        }

        hours
            .checked_mul(3_600_000)
            .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
            .ok_or_else(|| SubtitleError::InvalidTimestamp(timestamp.to_string()))
    }

    /// Format milliseconds as an ASS timestamp (`H:MM:SS.cc`), truncating to centiseconds
    pub fn format_ass_timestamp(ms: i64) -> String {
        let ms = ms.max(0);
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let centis = (ms % 1_000) / 10;

        format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, centis)
    }
}

impl fmt::Display for SubtitleEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {},{},{},{},{},0,0,0,{},{}",
            if self.comment { "Comment" } else { "Dialogue" },
            self.layer,
            Self::format_ass_timestamp(self.start_ms),
            Self::format_ass_timestamp(self.end_ms),
            self.style,
            self.actor,
            self.effect,
            self.text
        )
    }
}

/// A subtitle project: the ordered list of events read from one file
#[derive(Debug, Clone)]
pub struct SubtitleDocument {
    /// Source filename
    pub source_file: PathBuf,

    /// Events in file order
    pub events: Vec<SubtitleEvent>,
}

impl SubtitleDocument {
    /// Create an empty document
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleDocument {
            source_file,
            events: Vec::new(),
        }
    }

    /// Create a document from already-built events
    pub fn from_events(source_file: PathBuf, events: Vec<SubtitleEvent>) -> Self {
        SubtitleDocument { source_file, events }
    }

    /// Read an ASS/SSA or SRT file, picking the reader from the detected file type
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;

        let events = match FileManager::detect_file_type(path)? {
            FileType::Ass => Self::parse_ass_string(&content)
                .with_context(|| format!("Failed to parse ASS script: {:?}", path))?,
            FileType::Srt => Self::parse_srt_string(&content)
                .with_context(|| format!("Failed to parse SRT file: {:?}", path))?,
            FileType::Unknown => {
                return Err(anyhow::anyhow!("Unrecognised subtitle file: {:?}", path));
            }
        };

        debug!("Read {} events from {:?}", events.len(), path);
        Ok(Self::from_events(path.to_path_buf(), events))
    }

    /// Parse the `[Events]` section of an ASS/SSA script
    pub fn parse_ass_string(content: &str) -> Result<Vec<SubtitleEvent>, SubtitleError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut in_events = false;
        let mut seen_events = false;
        let mut format: Vec<String> = DEFAULT_EVENT_FORMAT.iter().map(|s| s.to_string()).collect();
        let mut events = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = line.trim();

            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                in_events = trimmed.eq_ignore_ascii_case("[events]");
                seen_events |= in_events;
                continue;
            }

            if !in_events || trimmed.is_empty() || trimmed.starts_with(';') {
                continue;
            }

            let Some((kind, value)) = trimmed.split_once(':') else {
                debug!("Ignoring line {} in [Events]: {}", line_no, trimmed);
                continue;
            };

            match kind.trim().to_ascii_lowercase().as_str() {
                "format" => {
                    format = value.split(',').map(|f| f.trim().to_ascii_lowercase()).collect();
                    if format.last().map(String::as_str) != Some("text") {
                        return Err(SubtitleError::MalformedEvent {
                            line: line_no,
                            reason: "Format line must end with Text".to_string(),
                        });
                    }
                }
                "dialogue" => events.push(Self::parse_ass_event(&format, value, false, line_no)?),
                "comment" => events.push(Self::parse_ass_event(&format, value, true, line_no)?),
                other => debug!("Ignoring '{}' line {} in [Events]", other, line_no),
            }
        }

        if !seen_events {
            return Err(SubtitleError::MissingEventsSection);
        }

        Ok(events)
    }

    /// Split one `Dialogue:`/`Comment:` value into fields according to the format line
    fn parse_ass_event(format: &[String], value: &str, comment: bool, line: usize) -> Result<SubtitleEvent, SubtitleError> {
        // Only the trailing Text field may contain commas
        let fields: Vec<&str> = value.trim_start().splitn(format.len(), ',').collect();
        if fields.len() != format.len() {
            return Err(SubtitleError::MalformedEvent {
                line,
                reason: format!("expected {} fields, found {}", format.len(), fields.len()),
            });
        }

        let mut event = SubtitleEvent::new(0, 0, "");
        event.comment = comment;

        for (name, field) in format.iter().zip(fields) {
            match name.as_str() {
                "layer" => event.layer = field.trim().parse().unwrap_or(0),
                "start" => event.start_ms = SubtitleEvent::parse_ass_timestamp(field)
                    .map_err(|e| SubtitleError::MalformedEvent { line, reason: e.to_string() })?,
                "end" => event.end_ms = SubtitleEvent::parse_ass_timestamp(field)
                    .map_err(|e| SubtitleError::MalformedEvent { line, reason: e.to_string() })?,
                "style" => event.style = field.trim().to_string(),
                "name" | "actor" => event.actor = field.trim().to_string(),
                "effect" => event.effect = field.trim().to_string(),
                "text" => event.text = field.to_string(),
                _ => {}
            }
        }

        Ok(event)
    }

    /// Parse SRT content into events, mapping line breaks to `\N` and basic HTML styling to overrides
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEvent>, SubtitleError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut events = Vec::new();

        // State variables for parsing
        let mut current_times: Option<(i64, i64)> = None;
        let mut current_lines: Vec<&str> = Vec::new();

        let mut flush = |times: Option<(i64, i64)>, lines: &mut Vec<&str>| {
            if let Some((start_ms, end_ms)) = times {
                if lines.is_empty() {
                    warn!("Skipping empty subtitle entry at {} ms", start_ms);
                } else {
                    events.push(SubtitleEvent::new(start_ms, end_ms, Self::srt_text_to_ass(&lines.join("\\N"))));
                }
            }
            lines.clear();
        };

        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if let Some(caps) = SRT_TIMESTAMP_REGEX.captures(trimmed) {
                // A bare sequence number preceding the timing line is not text
                if current_lines.last().is_some_and(|l| l.parse::<usize>().is_ok()) {
                    current_lines.pop();
                }
                flush(current_times, &mut current_lines);
                current_times = Some((Self::srt_caps_to_ms(&caps, 1), Self::srt_caps_to_ms(&caps, 5)));
                continue;
            }

            if trimmed.is_empty() {
                if current_times.is_some() && !current_lines.is_empty() {
                    flush(current_times.take(), &mut current_lines);
                }
                continue;
            }

            if current_times.is_some() {
                current_lines.push(trimmed);
            } else if trimmed.parse::<usize>().is_ok() {
                current_lines.push(trimmed);
            } else {
                warn!("Unexpected text at line {} before timestamp: {}", idx + 1, trimmed);
            }
        }
        flush(current_times, &mut current_lines);

        if events.is_empty() {
            return Err(SubtitleError::Empty("no timed entries in SRT content".to_string()));
        }

        Ok(events)
    }

    /// Parse timestamp captures to milliseconds
    fn srt_caps_to_ms(caps: &regex::Captures, start_idx: usize) -> i64 {
        let part = |i: usize| -> i64 {
            caps.get(start_idx + i).map_or(0, |m| m.as_str().parse().unwrap_or(0))
        };
        (part(0) * 3600 + part(1) * 60 + part(2)) * 1000 + part(3)
    }

    // @converts: <i>..</i> style tags to {\i1}..{\i0}, drops font tags
    fn srt_text_to_ass(text: &str) -> String {
        let text = SRT_FONT_TAG_REGEX.replace_all(text, "");
        SRT_STYLE_TAG_REGEX
            .replace_all(&text, |caps: &regex::Captures| {
                let value = if caps[1].is_empty() { "1" } else { "0" };
                format!("{{\\{}{}}}", caps[2].to_ascii_lowercase(), value)
            })
            .into_owned()
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Document")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Events: {}", self.events.len())?;
        Ok(())
    }
}
