/*!
 * YouTube srv3 (`<timedtext format="3">`) serialization.
 *
 * Each event becomes one `<p t="START" d="DURATION">` cue. Only plain text
 * blocks contribute to the cue body; override tags are reported to an
 * [`OverrideTracer`] and otherwise dropped, comments and drawings vanish.
 */

use std::fmt;
use std::io::{self, Write};
use log::debug;
use crate::subtitle_document::SubtitleEvent;
use crate::tag_parser::Block;

/// First line of every document
pub const PROLOG: &str = r#"<?xml version="1.0" encoding="utf-8" ?><timedtext format="3">"#;

/// Empty head element, written as a single two-line chunk
pub const HEAD: &str = "<head>\n</head>";

pub const BODY_OPEN: &str = "<body>";
pub const BODY_CLOSE: &str = "</body>";
pub const TIMEDTEXT_CLOSE: &str = "</timedtext>";

/// ASS hard line break as it appears in event text
const LINE_BREAK_MARKER: &str = "\\N";

/// Receives one record per override tag parameter seen while serializing
pub trait OverrideTracer {
    fn trace(&mut self, tag: &str, param: &str);
}

impl<F: FnMut(&str, &str)> OverrideTracer for F {
    fn trace(&mut self, tag: &str, param: &str) {
        self(tag, param)
    }
}

/// Discards override diagnostics
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl OverrideTracer for NoTrace {
    fn trace(&mut self, _tag: &str, _param: &str) {}
}

/// Sends override diagnostics to the log at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTracer;

impl OverrideTracer for LogTracer {
    fn trace(&mut self, tag: &str, param: &str) {
        debug!("Override: {}:{}", tag, param);
    }
}

/// Collects override diagnostics in memory
#[derive(Debug, Default, Clone)]
pub struct TraceRecorder {
    pub records: Vec<(String, String)>,
}

impl OverrideTracer for TraceRecorder {
    fn trace(&mut self, tag: &str, param: &str) {
        self.records.push((tag.to_string(), param.to_string()));
    }
}

/// The serialized `<p>...</p>` element for one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueFragment(String);

impl CueFragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CueFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// XML-escape plain subtitle text and turn `\N` markers into newlines.
///
/// Escaping runs first; the marker contains no XML-special characters so it survives intact.
pub fn encode_plain_text(text: &str) -> String {
    quick_xml::escape::escape(text).replace(LINE_BREAK_MARKER, "\n")
}

/// Builds srv3 cues from subtitle events
#[derive(Debug, Default)]
pub struct CueSerializer<T: OverrideTracer = NoTrace> {
    tracer: T,
}

impl CueSerializer<NoTrace> {
    pub fn new() -> Self {
        Self { tracer: NoTrace }
    }
}

impl<T: OverrideTracer> CueSerializer<T> {
    /// Serializer that reports override tags to `tracer`
    pub fn with_tracer(tracer: T) -> Self {
        Self { tracer }
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    pub fn into_tracer(self) -> T {
        self.tracer
    }

    /// Serialize one event into its cue fragment
    pub fn build_cue(&mut self, event: &SubtitleEvent) -> CueFragment {
        let mut cue = format!(r#"<p t="{}" d="{}">"#, event.start_ms, event.duration_ms());

        for block in event.parse_blocks() {
            match block {
                Block::Plain(text) => cue.push_str(&encode_plain_text(&text)),
                Block::Override(overrides) => {
                    for tag in &overrides.tags {
                        for param in &tag.params {
                            self.tracer.trace(&tag.name, param);
                        }
                    }
                }
                Block::Comment(_) | Block::Drawing(_) => {}
            }
        }

        cue.push_str("</p>");
        CueFragment(cue)
    }

    /// Serialize all events, preserving their order
    pub fn serialize(&mut self, events: &[SubtitleEvent]) -> Srv3Document {
        let cues = events.iter().map(|event| self.build_cue(event)).collect();
        Srv3Document { cues }
    }
}

/// A complete srv3 document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Srv3Document {
    cues: Vec<CueFragment>,
}

impl Srv3Document {
    pub fn from_cues(cues: Vec<CueFragment>) -> Self {
        Self { cues }
    }

    pub fn cues(&self) -> &[CueFragment] {
        &self.cues
    }

    /// Output lines in order; none of them carries its own terminator
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        let header: [&str; 3] = [PROLOG, HEAD, BODY_OPEN];
        let footer: [&str; 2] = [BODY_CLOSE, TIMEDTEXT_CLOSE];
        header
            .into_iter()
            .chain(self.cues.iter().map(CueFragment::as_str))
            .chain(footer)
    }

    /// Stream the document to `writer`, one line at a time
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for line in self.lines() {
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }

    /// Render the whole document into a string
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Srv3Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
