/*!
 * Override-tag block parsing for ASS event text.
 *
 * Event text is a run of plain text interleaved with `{...}` blocks. A block
 * containing a backslash is an override block (`{\b1\pos(10,20)}`), a block
 * without one is a comment (`{translator note}`). Plain text that follows a
 * `\p` tag with a non-zero level is vector drawing commands rather than
 * visible text. Unclosed `{` is treated as plain text.
 */

use once_cell::sync::Lazy;

/// Known override tag names, longest first so prefix matching picks `\fscx` over `\fs`.
static KNOWN_TAGS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut tags = vec![
        "\\alpha", "\\bord", "\\xbord", "\\ybord", "\\shad", "\\xshad", "\\yshad",
        "\\fade", "\\fad", "\\move", "\\clip", "\\iclip", "\\fscx", "\\fscy", "\\fsp",
        "\\fs", "\\frx", "\\fry", "\\frz", "\\fr", "\\fax", "\\fay", "\\fn", "\\fe",
        "\\an", "\\a", "\\blur", "\\be", "\\b", "\\i", "\\u", "\\s",
        "\\1c", "\\2c", "\\3c", "\\4c", "\\c", "\\1a", "\\2a", "\\3a", "\\4a",
        "\\kf", "\\ko", "\\k", "\\K", "\\q", "\\r", "\\t", "\\org", "\\pos", "\\pbo", "\\p",
    ];
    tags.sort_by_key(|t| std::cmp::Reverse(t.len()));
    tags
});

/// One tag inside an override block, e.g. `\pos(10,20)` is `("\pos", ["10", "20"])`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideTag {
    /// Tag name including the leading backslash; unrecognised tags keep their full text
    pub name: String,
    /// Parameters in source order
    pub params: Vec<String>,
}

impl OverrideTag {
    /// Parse a single `\name...` segment
    pub fn parse(text: &str) -> Self {
        let Some(name) = KNOWN_TAGS.iter().find(|name| text.starts_with(**name)) else {
            return OverrideTag {
                name: text.to_string(),
                params: Vec::new(),
            };
        };

        OverrideTag {
            name: name.to_string(),
            params: parse_params(&text[name.len()..]),
        }
    }

    /// Integer value of the first parameter, if it has one
    pub fn first_param_as_int(&self) -> Option<i64> {
        self.params.first().and_then(|p| p.trim().parse().ok())
    }
}

/// An override block: the raw contents between `{` and `}` and the tags parsed from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideBlock {
    pub raw: String,
    pub tags: Vec<OverrideTag>,
}

impl OverrideBlock {
    pub fn parse(raw: &str) -> Self {
        OverrideBlock {
            raw: raw.to_string(),
            tags: split_tags(raw).into_iter().map(OverrideTag::parse).collect(),
        }
    }
}

/// A segment of event text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Visible text, still carrying `\N` line-break markers
    Plain(String),
    /// `{\...}` style overrides
    Override(OverrideBlock),
    /// `{...}` without any backslash
    Comment(String),
    /// Drawing commands while `\p` is non-zero
    Drawing(String),
}

/// Decompose event text into blocks.
///
/// Empty text yields a single empty plain block.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    if text.is_empty() {
        return vec![Block::Plain(String::new())];
    }

    let mut blocks = Vec::new();
    let mut drawing_level = 0;
    let mut cur = 0;

    while cur < text.len() {
        if text[cur..].starts_with('{') {
            if let Some(close) = text[cur..].find('}') {
                let work = &text[cur + 1..cur + close];
                cur += close + 1;

                if !work.is_empty() && !work.contains('\\') {
                    blocks.push(Block::Comment(work.to_string()));
                } else {
                    let block = OverrideBlock::parse(work);
                    for tag in block.tags.iter().filter(|t| t.name == "\\p") {
                        drawing_level = tag.first_param_as_int().unwrap_or(0);
                    }
                    blocks.push(Block::Override(block));
                }
                continue;
            }
        }

        // Plain run up to the next '{' after the current character
        let next = cur + text[cur..].chars().next().map_or(1, char::len_utf8);
        let end = text[next..]
            .find('{')
            .map_or(text.len(), |pos| next + pos);
        let work = text[cur..end].to_string();
        cur = end;

        if drawing_level == 0 {
            blocks.push(Block::Plain(work));
        } else {
            blocks.push(Block::Drawing(work));
        }
    }

    blocks
}

/// Split override block contents on backslashes that are not inside parentheses
fn split_tags(raw: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, ch) in raw.char_indices().skip(1) {
        match ch {
            ')' if depth > 0 => depth -= 1,
            _ if depth > 0 => {}
            '\\' => {
                segments.push(&raw[start..i]);
                start = i;
            }
            '(' => depth += 1,
            _ => {}
        }
    }

    if !raw.is_empty() {
        segments.push(&raw[start..]);
    }

    segments
}

// @parses: "(a,b,c)" into ["a","b","c"] and "1" into ["1"]
fn parse_params(rest: &str) -> Vec<String> {
    let rest = rest.trim();
    let Some(inner) = rest.strip_prefix('(') else {
        return if rest.is_empty() { Vec::new() } else { vec![rest.to_string()] };
    };

    // Closing paren is optional, as renderers accept unterminated argument lists
    let mut depth = 0usize;
    let mut end = inner.len();
    for (i, ch) in inner.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' if depth == 0 => {
                end = i;
                break;
            }
            ')' => depth -= 1,
            _ => {}
        }
    }

    let mut params = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let inner = &inner[..end];
    for (i, ch) in inner.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                params.push(inner[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = inner[start..].trim();
    if !last.is_empty() || !params.is_empty() {
        params.push(last.to_string());
    }

    params
}
