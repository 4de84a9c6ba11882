//! Splits a recommendation into one block per destination.
//!
//! The scan is a small line state machine:
//!
//! ```text
//! SeekingHeader --header--> InDescription --section heading--> InNamedSection
//!                                 ^                                  |
//!                                 +------------ header --------------+
//! ```
//!
//! A numbered line is only a destination header when it does not look like
//! a numbered point inside the current destination.

use super::fields::{match_heading, SectionKind};
use super::structurer::split_name;
use regex::Regex;
use std::sync::OnceLock;

static HEADER: OnceLock<Regex> = OnceLock::new();

fn header() -> &'static Regex {
    HEADER.get_or_init(|| {
        Regex::new(r"^\s*(?:#{1,6}\s*)?(\*\*)?\s*(\d+)\.\s+(.+)$").expect("valid header regex")
    })
}

/// Raw text belonging to one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationBlock {
    /// Header label, markup removed
    pub name: String,
    /// Everything after the header up to the next accepted header
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub blocks: Vec<DestinationBlock>,
    /// Numbered lines that were kept as block content instead of headers
    pub rejected_headers: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekingHeader,
    InDescription,
    InNamedSection(SectionKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PreviousLine {
    StartOfText,
    Blank,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastContent {
    None,
    Heading,
    Rule,
    Text,
}

struct HeaderCandidate {
    name: String,
    inline: String,
}

struct Scanner {
    state: ScanState,
    previous: PreviousLine,
    last_content: LastContent,
    blocks: Vec<DestinationBlock>,
    rejected: usize,
}

impl Scanner {
    fn new() -> Self {
        Self {
            state: ScanState::SeekingHeader,
            previous: PreviousLine::StartOfText,
            last_content: LastContent::None,
            blocks: Vec::new(),
            rejected: 0,
        }
    }

    fn feed(&mut self, line: &str) {
        let trimmed = line.trim();

        if let Some(candidate) = parse_header(trimmed) {
            if self.accepts(&candidate) {
                self.open(candidate);
                self.previous = PreviousLine::Text;
                self.last_content = LastContent::Text;
                return;
            }
            self.rejected += 1;
            tracing::debug!(
                target: "travel_parser::segmenter",
                candidate = %candidate.name,
                "numbered line kept as block content"
            );
        }

        if self.state != ScanState::SeekingHeader {
            if let Some((kind, _)) = match_heading(line) {
                self.state = ScanState::InNamedSection(kind);
            }
            if let Some(block) = self.blocks.last_mut() {
                if !block.body.is_empty() {
                    block.body.push('\n');
                }
                block.body.push_str(line);
            }
        }

        if trimmed.is_empty() {
            self.previous = PreviousLine::Blank;
        } else {
            self.previous = PreviousLine::Text;
            self.last_content = if is_rule(trimmed) {
                LastContent::Rule
            } else if match_heading(line).is_some() {
                LastContent::Heading
            } else {
                LastContent::Text
            };
        }
    }

    /// Destinations are usually "City, Country"; numbered points inside a
    /// destination usually are not.
    fn accepts(&self, candidate: &HeaderCandidate) -> bool {
        if self.state == ScanState::SeekingHeader || candidate.name.contains(',') {
            return true;
        }
        if self.last_content == LastContent::Rule {
            return true;
        }
        let mid_section = self.previous == PreviousLine::Text;
        let under_heading = matches!(self.state, ScanState::InNamedSection(_))
            && self.last_content == LastContent::Heading;
        !(mid_section || under_heading)
    }

    fn open(&mut self, candidate: HeaderCandidate) {
        tracing::debug!(
            target: "travel_parser::segmenter",
            name = %candidate.name,
            "destination header"
        );
        self.blocks.push(DestinationBlock {
            name: candidate.name,
            body: candidate.inline,
        });
        self.state = ScanState::InDescription;
    }

    fn finish(self) -> Segmentation {
        Segmentation {
            blocks: self.blocks,
            rejected_headers: self.rejected,
        }
    }
}

/// Split raw recommendation text into destination blocks.
///
/// Text before the first header is ignored. No headers yields no blocks.
pub fn segment(text: &str) -> Segmentation {
    let mut scanner = Scanner::new();
    for line in text.lines() {
        scanner.feed(line);
    }
    scanner.finish()
}

fn parse_header(line: &str) -> Option<HeaderCandidate> {
    let caps = header().captures(line)?;
    let number_bolded = caps.get(1).is_some();
    let rest = caps.get(3)?.as_str().trim();

    let (name, inline) = if number_bolded {
        match rest.find("**") {
            Some(end) => (rest[..end].to_string(), rest[end + 2..].to_string()),
            None => (rest.to_string(), String::new()),
        }
    } else if let Some(inner) = rest.strip_prefix("**") {
        match inner.find("**") {
            Some(end) => (inner[..end].to_string(), inner[end + 2..].to_string()),
            None => (inner.to_string(), String::new()),
        }
    } else {
        split_name(rest, false)
    };

    let name = clean_name(&name);
    if name.is_empty() {
        return None;
    }
    let inline = inline
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '-' | '–' | '—'))
        .trim()
        .to_string();

    Some(HeaderCandidate { name, inline })
}

fn clean_name(raw: &str) -> String {
    raw.replace("**", "")
        .trim()
        .trim_end_matches(':')
        .trim_matches(|c: char| matches!(c, '*' | '#' | '[' | ']' | '{' | '}' | '_'))
        .trim()
        .to_string()
}

fn is_rule(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| matches!(c, '-' | '*' | '=' | '_'))
}
