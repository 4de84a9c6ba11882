//! Day-by-day decomposition of generated itinerary text.

use super::config::ParserConfig;
use super::structurer::{structure_place, tidy};
use super::tokenizer::{has_bullets, tokenize};
use crate::types::{Day, RoutePlan, TimeBlock};
use regex::Regex;
use std::sync::OnceLock;

static DAY_HEADER: OnceLock<Regex> = OnceLock::new();
static INLINE_DAY: OnceLock<Regex> = OnceLock::new();
static MARKDOWN_HEADING: OnceLock<Regex> = OnceLock::new();
static SLOT: OnceLock<Regex> = OnceLock::new();

fn day_header() -> &'static Regex {
    DAY_HEADER.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?:#{1,6}\s*)?(?:\*\*)?\s*day\s+(\d+)\s*(?:\*\*)?\s*(?:[:\-–.]\s*(?:\*\*)?\s*(.*)|$)",
        )
        .expect("valid day header regex")
    })
}

fn inline_day() -> &'static Regex {
    INLINE_DAY.get_or_init(|| Regex::new(r"([^\s#*>•\-])[ \t]+(Day\s+\d+\s*:)").expect("valid inline day regex"))
}

fn markdown_heading() -> &'static Regex {
    MARKDOWN_HEADING.get_or_init(|| Regex::new(r"^\s*#{1,6}\s+\S").expect("valid heading regex"))
}

fn slot() -> &'static Regex {
    SLOT.get_or_init(|| {
        Regex::new(
            r"(?im)(?:^[ \t]*(?:[-*•][ \t]*)?(?:\*\*|#{1,6}[ \t]*)(morning|afternoon|evening)(?:\*\*)?[ \t]*:?[ \t]*(?:\*\*)?[ \t]*$)|(?:(?:\*\*)?\b(morning|afternoon|evening)[ \t]*(?:\*\*)?[ \t]*:(?:\*\*)?)",
        )
        .expect("valid time block regex")
    })
}

/// One `Day N:` block before time-block decomposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBlock {
    /// 1-based; falls back to position when the header number is 0 or unreadable
    pub day_number: u32,
    /// Text on the header line after the day label
    pub header_rest: String,
    /// Lines up to the next day header or non-day heading
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Morning,
    Afternoon,
    Evening,
}

impl Slot {
    fn from_word(word: &str) -> Self {
        match word.to_ascii_lowercase().as_str() {
            "morning" => Slot::Morning,
            "afternoon" => Slot::Afternoon,
            _ => Slot::Evening,
        }
    }
}

/// First pass: split itinerary text into day blocks.
///
/// A `Day N:` label in the middle of a line also starts a new day.
pub fn split_days(text: &str) -> Vec<DayBlock> {
    let normalized = inline_day().replace_all(text, "$1\n$2");

    let mut blocks: Vec<DayBlock> = Vec::new();
    let mut open = false;

    for line in normalized.lines() {
        if let Some(caps) = day_header().captures(line) {
            let position = blocks.len() as u32 + 1;
            let day_number = caps
                .get(1)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(position);
            blocks.push(DayBlock {
                day_number,
                header_rest: caps.get(2).map_or("", |m| m.as_str()).trim().to_string(),
                content: String::new(),
            });
            open = true;
            continue;
        }

        if markdown_heading().is_match(line) && !is_slot_line(line) {
            if open {
                tracing::trace!(target: "travel_parser::route_days", heading = %line.trim(), "heading closes day");
            }
            open = false;
            continue;
        }

        if open {
            if let Some(block) = blocks.last_mut() {
                if !block.content.is_empty() {
                    block.content.push('\n');
                }
                block.content.push_str(line);
            }
        }
    }

    blocks
}

/// Second pass: split one day into its morning, afternoon and evening.
pub fn decompose_day(block: &DayBlock, config: &ParserConfig) -> Day {
    let mut day = Day::new(block.day_number);

    let header_is_content = slot().find(&block.header_rest).is_some_and(|m| m.start() == 0)
        || block.header_rest.trim_start_matches('*').trim().is_empty();
    let content = if header_is_content && !block.header_rest.is_empty() {
        format!("{}\n{}", block.header_rest, block.content)
    } else {
        if !header_is_content {
            day.title = non_empty(clean_title(&block.header_rest));
        }
        block.content.clone()
    };

    let matches: Vec<_> = slot()
        .captures_iter(&content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let word = caps.get(1).or_else(|| caps.get(2))?;
            Some((Slot::from_word(word.as_str()), whole.start(), whole.end()))
        })
        .collect();

    if let Some(&(_, first_start, _)) = matches.first() {
        if day.title.is_none() {
            day.title = content[..first_start]
                .lines()
                .map(clean_title)
                .find(|line| !line.is_empty());
        }
    }

    let mut texts: [String; 3] = Default::default();
    for (idx, &(which, _, end)) in matches.iter().enumerate() {
        let stop = matches.get(idx + 1).map_or(content.len(), |next| next.1);
        let text = clean_slot(&content[end..stop]);
        if text.is_empty() {
            continue;
        }
        let target = &mut texts[which as usize];
        if !target.is_empty() {
            target.push('\n');
        }
        target.push_str(&text);
    }

    let [morning, afternoon, evening] = texts;
    day.morning = time_block(morning, config);
    day.afternoon = time_block(afternoon, config);
    day.evening = time_block(evening, config);
    day
}

/// Decompose itinerary text into days.
pub fn decompose_route(text: &str, config: &ParserConfig) -> Vec<Day> {
    let days: Vec<Day> = split_days(text)
        .iter()
        .map(|block| decompose_day(block, config))
        .collect();
    tracing::debug!(target: "travel_parser::route_days", days = days.len(), "decomposed itinerary");
    days
}

/// Build a [`RoutePlan`] for `destination_name` from itinerary text.
pub fn parse_route_plan(destination_name: &str, text: &str, config: &ParserConfig) -> RoutePlan {
    RoutePlan::new(destination_name.trim(), decompose_route(text, config))
}

/// `### Morning`, `## Evening:` and similar lines open a time block, not a new section.
fn is_slot_line(line: &str) -> bool {
    slot().find(line).is_some_and(|m| {
        line[..m.start()]
            .trim()
            .trim_start_matches('#')
            .trim()
            .is_empty()
    })
}

fn time_block(text: String, config: &ParserConfig) -> TimeBlock {
    if config.itemize_time_blocks && has_bullets(&text) {
        let items: Vec<_> = tokenize(&text)
            .iter()
            .filter_map(|raw| structure_place(raw))
            .collect();
        if !items.is_empty() {
            return TimeBlock::ActivityList(items);
        }
    }
    TimeBlock::PlainText(text)
}

fn clean_slot(raw: &str) -> String {
    raw.replace("**", "")
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | '*' | '•'))
        .to_string()
}

fn clean_title(raw: &str) -> String {
    tidy(raw)
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '#' | '*' | ':' | '-' | '–'))
        .to_string()
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Item;

    fn config() -> ParserConfig {
        ParserConfig::default()
    }

    #[test]
    fn morning_and_evening_without_afternoon() {
        let days = decompose_route("Day 1:\nMorning: Museum\nEvening: Dinner", &config());
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].day_number, 1);
        assert_eq!(days[0].morning, TimeBlock::PlainText("Museum".to_string()));
        assert_eq!(days[0].afternoon, TimeBlock::PlainText(String::new()));
        assert_eq!(days[0].evening, TimeBlock::PlainText("Dinner".to_string()));
        assert_eq!(days[0].title, None);
    }

    #[test]
    fn markdown_itinerary_with_bold_slots() {
        let text = "## Day 1: Historical Berlin\n**Morning**\n- Brandenburg Gate - photos\n- Reichstag\n**Afternoon**\nMuseum Island\n**Evening**\nDinner in Mitte\n\n## Day 2: Art\nMorning: East Side Gallery\n\n## Transportation Tips:\nBuy a day pass.";
        let days = decompose_route(text, &config());
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].title.as_deref(), Some("Historical Berlin"));
        assert_eq!(
            days[0].morning,
            TimeBlock::ActivityList(vec![
                Item::new("Brandenburg Gate", "photos"),
                Item::new("Reichstag", "")
            ])
        );
        assert_eq!(days[0].afternoon.as_text(), "Museum Island");
        assert_eq!(days[0].evening.as_text(), "Dinner in Mitte");
        assert_eq!(days[1].morning.as_text(), "East Side Gallery");
        assert!(days[1].evening.is_empty());
    }

    #[test]
    fn markdown_slot_headings_stay_inside_the_day() {
        let days = decompose_route(
            "## Day 1: Arrival\n### Morning\nLouvre\n### Evening\nDinner cruise\n## Packing List\nUmbrella",
            &config(),
        );
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].title.as_deref(), Some("Arrival"));
        assert_eq!(days[0].morning.as_text(), "Louvre");
        assert!(days[0].afternoon.is_empty());
        assert_eq!(days[0].evening.as_text(), "Dinner cruise");
    }

    #[test]
    fn trailing_notes_do_not_leak_into_last_day() {
        let days = decompose_route(
            "Day 1:\nEvening: Fado show\n## Tips\nCarry cash.",
            &config(),
        );
        assert_eq!(days[0].evening.as_text(), "Fado show");
    }

    #[test]
    fn itemizing_can_be_disabled() {
        let mut config = config();
        config.itemize_time_blocks = false;
        let days = decompose_route("Day 1:\nMorning:\n• Temple\n• Garden", &config);
        assert!(matches!(days[0].morning, TimeBlock::PlainText(_)));
    }

    #[test]
    fn zero_day_number_falls_back_to_position() {
        let blocks = split_days("Day 0: Arrival\nMorning: Check in\nDay 7: Beach");
        assert_eq!(blocks[0].day_number, 1);
        assert_eq!(blocks[1].day_number, 7);
        assert_eq!(blocks[0].header_rest, "Arrival");
    }

    #[test]
    fn single_line_itinerary_is_split() {
        let days = decompose_route(
            "Day 1: Morning: Louvre Afternoon: Seine walk Day 2: Evening: Jazz club",
            &config(),
        );
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].morning.as_text(), "Louvre");
        assert_eq!(days[0].afternoon.as_text(), "Seine walk");
        assert_eq!(days[1].day_number, 2);
        assert_eq!(days[1].evening.as_text(), "Jazz club");
    }

    #[test]
    fn day_without_slots_keeps_title_only() {
        let days = decompose_route("Day 3: Day trip to Nara", &config());
        assert_eq!(days[0].title.as_deref(), Some("Day trip to Nara"));
        assert!(days[0].is_blank());
    }

    #[test]
    fn no_day_headers_yields_no_days() {
        assert!(decompose_route("", &config()).is_empty());
        assert!(decompose_route("Enjoy your trip!", &config()).is_empty());
    }
}
