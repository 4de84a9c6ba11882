//! Splits a section span into raw item strings along bullet markers.

use regex::Regex;
use std::sync::OnceLock;

static LEADING_MARKER: OnceLock<Regex> = OnceLock::new();
static INLINE_MARKER: OnceLock<Regex> = OnceLock::new();

fn leading_marker() -> &'static Regex {
    LEADING_MARKER.get_or_init(|| {
        Regex::new(r"^(?:[•*]|[-–]\s|\d{1,2}[.)]\s)\s*").expect("valid leading marker regex")
    })
}

fn inline_marker() -> &'static Regex {
    INLINE_MARKER.get_or_init(|| Regex::new(r"•|\s\*\s+").expect("valid inline marker regex"))
}

/// Remove bold/underline emphasis markup.
pub fn strip_emphasis(text: &str) -> String {
    text.replace("**", "").replace("__", "")
}

/// True when any line of `span` is bulleted or carries inline bullets.
pub fn has_bullets(span: &str) -> bool {
    strip_emphasis(span).lines().any(|line| {
        let trimmed = line.trim();
        leading_marker().is_match(trimmed) || inline_marker().is_match(trimmed)
    })
}

/// Split a raw section span into trimmed, non-empty item strings in source order.
///
/// Continuation lines are folded into the preceding item. A span without any
/// bullet markers yields one item per non-empty line.
pub fn tokenize(span: &str) -> Vec<String> {
    let cleaned = strip_emphasis(span);

    if !has_bullets(&cleaned) {
        return cleaned
            .lines()
            .map(clean_fragment)
            .filter(|line| !line.is_empty())
            .collect();
    }

    let mut items = Vec::new();
    let mut current: Option<String> = None;

    for line in cleaned.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush(&mut items, &mut current);
            continue;
        }

        let (starts_item, body) = match leading_marker().find(trimmed) {
            Some(found) => (true, &trimmed[found.end()..]),
            None => (false, trimmed),
        };
        if starts_item {
            flush(&mut items, &mut current);
        }

        let mut pieces = inline_marker().split(body);
        if let Some(first) = pieces.next() {
            match current.as_mut() {
                Some(text) => {
                    text.push(' ');
                    text.push_str(first.trim());
                }
                None => current = Some(first.trim().to_string()),
            }
        }
        for piece in pieces {
            flush(&mut items, &mut current);
            current = Some(piece.trim().to_string());
        }
    }
    flush(&mut items, &mut current);

    items
}

fn flush(items: &mut Vec<String>, current: &mut Option<String>) {
    if let Some(text) = current.take() {
        let cleaned = clean_fragment(&text);
        if !cleaned.is_empty() {
            items.push(cleaned);
        }
    }
}

fn clean_fragment(fragment: &str) -> String {
    fragment
        .trim_matches(|c: char| c.is_whitespace() || c == '•' || c == '*')
        .trim_start_matches(['-', '–'])
        .trim()
        .to_string()
}
