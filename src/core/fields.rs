//! Locates the named sub-sections of one destination block.

use super::structurer::tidy;
use regex::Regex;
use std::sync::OnceLock;

const LABELS: &str =
    r"why\s+(?:this|it)\s+fits|places\s+to\s+(?:visit|see)|restaurants?|activities|accommodations?";

static COLON_HEADING: OnceLock<Regex> = OnceLock::new();
static MARKDOWN_HEADING: OnceLock<Regex> = OnceLock::new();

fn colon_heading() -> &'static Regex {
    COLON_HEADING.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)^\s*(?:[-–#]+\s*)?(?:\*\*|__)?\s*({LABELS})\b([^:\n]{{0,40}}):\s*(.*)$"
        ))
        .expect("valid section heading regex")
    })
}

fn markdown_heading() -> &'static Regex {
    MARKDOWN_HEADING.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)^\s*#{{1,6}}\s*(?:\*\*|__)?\s*({LABELS})\b[^:\n]{{0,40}}$"
        ))
        .expect("valid markdown heading regex")
    })
}

/// Named sub-section of a destination block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Description,
    WhyItFits,
    Places,
    Restaurants,
    Activities,
    Accommodations,
}

impl SectionKind {
    fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        let label = label.split_whitespace().collect::<Vec<_>>().join(" ");
        match label.as_str() {
            l if l.starts_with("why") => SectionKind::WhyItFits,
            l if l.starts_with("places") => SectionKind::Places,
            l if l.starts_with("restaurant") => SectionKind::Restaurants,
            "activities" => SectionKind::Activities,
            _ => SectionKind::Accommodations,
        }
    }
}

/// Recognise a section heading line, returning its kind and any text that
/// follows the colon on the same line.
pub fn match_heading(line: &str) -> Option<(SectionKind, &str)> {
    if let Some(caps) = colon_heading().captures(line) {
        let kind = SectionKind::from_label(caps.get(1)?.as_str());
        let rest = caps.get(3).map_or("", |m| m.as_str());
        return Some((kind, rest.trim_start_matches(['*', '_']).trim()));
    }
    markdown_heading()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|label| (SectionKind::from_label(label.as_str()), ""))
}

/// Raw, untokenized spans of one destination block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    pub description: String,
    pub why_it_fits: String,
    pub places: String,
    pub restaurants: String,
    pub activities: String,
    pub accommodations: String,
}

impl RawFields {
    fn span_mut(&mut self, kind: SectionKind) -> &mut String {
        match kind {
            SectionKind::Description => &mut self.description,
            SectionKind::WhyItFits => &mut self.why_it_fits,
            SectionKind::Places => &mut self.places,
            SectionKind::Restaurants => &mut self.restaurants,
            SectionKind::Activities => &mut self.activities,
            SectionKind::Accommodations => &mut self.accommodations,
        }
    }
}

/// Slice a destination block into its description and named section spans.
///
/// Sections may appear in any order; each runs to the next recognised
/// heading of any kind. A section that appears twice is concatenated.
pub fn extract_fields(block: &str) -> RawFields {
    let mut raw = RawFields::default();
    let mut current = SectionKind::Description;
    let mut headings = 0usize;

    for line in block.lines() {
        if let Some((kind, rest)) = match_heading(line) {
            headings += 1;
            current = kind;
            if !rest.is_empty() {
                append_line(raw.span_mut(kind), rest);
            }
            continue;
        }
        append_line(raw.span_mut(current), line);
    }

    raw.description = prose(&raw.description);
    raw.why_it_fits = prose(&raw.why_it_fits);

    tracing::trace!(
        target: "travel_parser::fields",
        headings,
        description_len = raw.description.len(),
        "extracted section spans"
    );

    raw
}

fn append_line(span: &mut String, line: &str) {
    if !span.is_empty() {
        span.push('\n');
    }
    span.push_str(line);
}

/// Join the lines of a free-text span into one paragraph.
fn prose(span: &str) -> String {
    let joined = span
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(['•', '*', '-', '–', '>'])
                .trim()
        })
        .filter(|line| !line.is_empty() && !is_rule(line))
        .collect::<Vec<_>>()
        .join(" ");
    tidy(&joined)
}

fn is_rule(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| matches!(c, '-' | '*' | '=' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = "A vibrant coastal city with Gaudí architecture.\nGreat food scene.\n\
- Why This Fits Your Preferences: Walkable and full of culture.\n\
- Places to Visit:\n\
• Sagrada Família - basilica\n\
• Park Güell - mosaics\n\
- Restaurants:\n\
• Can Solé - seafood (mid-range)\n\
- Activities:\n\
• Day 1: beach walk, and tapas\n\
- Accommodation Options:\n\
• Hotel Arts (luxury)\n";

    #[test]
    fn all_sections_are_found() {
        let raw = extract_fields(BLOCK);
        assert_eq!(
            raw.description,
            "A vibrant coastal city with Gaudí architecture. Great food scene."
        );
        assert_eq!(raw.why_it_fits, "Walkable and full of culture.");
        assert!(raw.places.contains("Sagrada Família"));
        assert!(raw.places.contains("Park Güell"));
        assert!(!raw.places.contains("Can Solé"));
        assert!(raw.restaurants.contains("Can Solé"));
        assert!(raw.activities.contains("Day 1"));
        assert!(raw.accommodations.contains("Hotel Arts"));
    }

    #[test]
    fn order_does_not_matter() {
        let block = "Intro.\n- Accommodation:\n• Ryokan Kurashiki\n- Places to Visit:\n• Fushimi Inari\n";
        let raw = extract_fields(block);
        assert_eq!(raw.accommodations.trim(), "• Ryokan Kurashiki");
        assert_eq!(raw.places.trim(), "• Fushimi Inari");
        assert_eq!(raw.description, "Intro.");
    }

    #[test]
    fn missing_sections_are_empty() {
        let raw = extract_fields("Just a blurb with no headings.");
        assert_eq!(raw.description, "Just a blurb with no headings.");
        assert!(raw.places.is_empty());
        assert!(raw.restaurants.is_empty());
        assert!(raw.why_it_fits.is_empty());
    }

    #[test]
    fn bold_and_markdown_headings() {
        assert_eq!(
            match_heading("- **Places to Visit:**"),
            Some((SectionKind::Places, ""))
        );
        assert_eq!(
            match_heading("**Restaurants**: tapas everywhere"),
            Some((SectionKind::Restaurants, "tapas everywhere"))
        );
        assert_eq!(
            match_heading("### Accommodation Options"),
            Some((SectionKind::Accommodations, ""))
        );
        assert_eq!(match_heading("• Sagrada Família - basilica"), None);
        assert_eq!(match_heading("• Hotel Arts: beachfront"), None);
    }

    #[test]
    fn star_bulleted_items_are_not_headings() {
        assert_eq!(match_heading("* Dining cruise on the Seine: sunset dinner"), None);
        assert_eq!(match_heading("* Activities: kayaking"), None);
        assert_eq!(match_heading("- Dining cruise on the Seine: sunset dinner"), None);
        assert_eq!(match_heading("- Hotels: see below"), None);
    }

    #[test]
    fn repeated_section_is_concatenated() {
        let block = "- Activities:\n• Hike\n- Restaurants:\n• Cal Pep\n- Activities:\n• Swim\n";
        let raw = extract_fields(block);
        assert!(raw.activities.contains("Hike"));
        assert!(raw.activities.contains("Swim"));
        assert!(!raw.activities.contains("Cal Pep"));
    }
}
