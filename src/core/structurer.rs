//! Turns raw item strings into typed records.
//!
//! Every function here is total: malformed input degrades to an item whose
//! name is the whole trimmed string, and blank names never escape.

use super::config::ParserConfig;
use crate::types::{AccommodationItem, Item, ItemKind, RestaurantItem, StructuredItem};
use regex::Regex;
use std::sync::OnceLock;

const DASH_SEPARATORS: &[&str] = &[" - ", " – ", " — "];
const MAX_TYPE_WORDS: usize = 3;

static PARENTHETICAL: OnceLock<Regex> = OnceLock::new();
static DAY_LABEL: OnceLock<Regex> = OnceLock::new();
static BARE_DAY: OnceLock<Regex> = OnceLock::new();
static SPACE_RUN: OnceLock<Regex> = OnceLock::new();
static SPACE_BEFORE_PUNCT: OnceLock<Regex> = OnceLock::new();

fn parenthetical() -> &'static Regex {
    PARENTHETICAL.get_or_init(|| Regex::new(r"\(([^()]*)\)").expect("valid parenthetical regex"))
}

fn day_label() -> &'static Regex {
    DAY_LABEL.get_or_init(|| {
        Regex::new(r"(?i)^\s*day\s+\d+(?:\s*[-–]\s*\d+)?\s*[:.\-–]\s*").expect("valid day label regex")
    })
}

fn bare_day() -> &'static Regex {
    BARE_DAY.get_or_init(|| {
        Regex::new(r"(?i)^day\s+\d+(?:\s*[-–]\s*\d+)?$").expect("valid bare day regex")
    })
}

fn space_run() -> &'static Regex {
    SPACE_RUN.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

fn space_before_punct() -> &'static Regex {
    SPACE_BEFORE_PUNCT
        .get_or_init(|| Regex::new(r"\s+([,.;:)])").expect("valid punctuation regex"))
}

/// Structure one raw item according to the section it came from.
///
/// Day-labeled activities may expand into several items or none at all.
pub fn structure_item(raw: &str, kind: ItemKind, config: &ParserConfig) -> Vec<StructuredItem> {
    match kind {
        ItemKind::Place => structure_place(raw)
            .map(StructuredItem::Place)
            .into_iter()
            .collect(),
        ItemKind::Activity => structure_activity(raw, config)
            .into_iter()
            .map(StructuredItem::Activity)
            .collect(),
        ItemKind::Restaurant => structure_restaurant(raw, config)
            .map(StructuredItem::Restaurant)
            .into_iter()
            .collect(),
        ItemKind::Accommodation => structure_accommodation(raw, config)
            .map(StructuredItem::Accommodation)
            .into_iter()
            .collect(),
    }
}

/// `"Name - description"` or `"Name: description"`; no separator means no description.
pub fn structure_place(raw: &str) -> Option<Item> {
    let text = tidy(raw);
    let (name, description) = split_name(&text, false);
    named_item(name, description)
}

/// Activities, with `Day N:` labels stripped and their clauses exploded.
pub fn structure_activity(raw: &str, config: &ParserConfig) -> Vec<Item> {
    let text = tidy(raw);

    let Some(label) = day_label().find(&text) else {
        if bare_day().is_match(&text) {
            tracing::debug!(target: "travel_parser::structurer", item = %text, "dropped bare day label");
            return Vec::new();
        }
        return structure_place(&text).into_iter().collect();
    };

    split_clauses(&text[label.end()..])
        .into_iter()
        .filter_map(|fragment| {
            let fragment = fragment
                .trim()
                .trim_end_matches(['.', '!'])
                .trim()
                .to_string();
            if fragment.is_empty() || bare_day().is_match(&fragment) {
                return None;
            }
            if config.is_noise(&fragment) {
                tracing::debug!(
                    target: "travel_parser::structurer",
                    fragment = %fragment,
                    "dropped non-activity fragment"
                );
                return None;
            }
            Some(Item::new(fragment, ""))
        })
        .collect()
}

pub fn structure_restaurant(raw: &str, config: &ParserConfig) -> Option<RestaurantItem> {
    let parts = split_priced(raw, config)?;
    let item_type = if parts.item_type.is_empty() {
        infer_type(&config.cuisine_vocabulary, &parts.description, &parts.name)
    } else {
        parts.item_type
    };
    Some(RestaurantItem {
        item_type: distinct_from(item_type, &parts.name),
        name: parts.name,
        price_range: parts.price_range,
        description: parts.description,
    })
}

pub fn structure_accommodation(raw: &str, config: &ParserConfig) -> Option<AccommodationItem> {
    let parts = split_priced(raw, config)?;
    let item_type = if parts.item_type.is_empty() {
        infer_type(&config.lodging_vocabulary, &parts.description, &parts.name)
    } else {
        parts.item_type
    };
    Some(AccommodationItem {
        item_type: distinct_from(item_type, &parts.name),
        name: parts.name,
        price_range: parts.price_range,
        description: parts.description,
    })
}

/// Infer a cuisine for a restaurant that arrived without one.
pub fn infer_cuisine(config: &ParserConfig, description: &str, name: &str) -> String {
    infer_type(&config.cuisine_vocabulary, description, name)
}

/// Collapse whitespace, drop emphasis markup and stray spaces before punctuation.
pub fn tidy(text: &str) -> String {
    let stripped = text.replace("**", "").replace("__", "");
    let collapsed = space_run().replace_all(stripped.trim(), " ");
    let tightened = space_before_punct().replace_all(&collapsed, "$1");
    tightened.replace("( ", "(").trim().to_string()
}

/// Split at the earliest name separator. With `stop_at_paren`, an opening
/// parenthesis also ends the name.
pub fn split_name(text: &str, stop_at_paren: bool) -> (String, String) {
    let mut cut: Option<(usize, usize)> = None;
    let mut consider = |idx: usize, len: usize| {
        if cut.map_or(true, |(best, _)| idx < best) {
            cut = Some((idx, len));
        }
    };

    for separator in DASH_SEPARATORS.iter().chain(std::iter::once(&": ")) {
        if let Some(idx) = text.find(separator) {
            consider(idx, separator.len());
        }
    }
    if stop_at_paren {
        if let Some(idx) = text.find('(') {
            consider(idx, 0);
        }
    }

    match cut {
        Some((idx, len)) => (
            text[..idx].trim().to_string(),
            text[idx + len..].trim().to_string(),
        ),
        None => (text.trim().to_string(), String::new()),
    }
}

struct PricedParts {
    name: String,
    item_type: String,
    price_range: String,
    description: String,
}

fn split_priced(raw: &str, config: &ParserConfig) -> Option<PricedParts> {
    let mut working = tidy(raw);
    if working.is_empty() {
        return None;
    }

    let mut price_range = String::new();
    let price_clause = parenthetical()
        .captures_iter(&working)
        .find(|caps| config.mentions_price(&caps[1]))
        .and_then(|caps| caps.get(0).map(|whole| (whole.range(), caps[1].trim().to_string())));
    if let Some((range, price)) = price_clause {
        price_range = price;
        working.replace_range(range, "");
        working = tidy(&working);
    }

    let (name, rest) = split_name(&working, true);
    let (item_type, rest) = take_type(&rest);
    let description = tidy(rest.trim_start_matches(|c: char| {
        c.is_whitespace() || matches!(c, '-' | '–' | '—' | ':' | ',')
    }));

    let (name, description) = if name.is_empty() {
        if description.is_empty() && item_type.is_empty() {
            return None;
        }
        let fallback = if description.is_empty() {
            item_type.clone()
        } else {
            description
        };
        (fallback, String::new())
    } else {
        (name, description)
    };

    Some(PricedParts {
        name,
        item_type,
        price_range,
        description,
    })
}

/// Take a type from a leading parenthetical, or from the middle of
/// `"Name - Type - description"` when that segment is short. `rest` is the
/// text after the name and its separator.
fn take_type(rest: &str) -> (String, String) {
    let trimmed = rest.trim_start();

    if trimmed.starts_with('(') {
        if let Some(close) = trimmed.find(')') {
            let inner = trimmed[1..close].trim().to_string();
            return (inner, trimmed[close + 1..].to_string());
        }
    }

    let first_dash = DASH_SEPARATORS
        .iter()
        .filter_map(|separator| trimmed.find(separator).map(|idx| (idx, separator.len())))
        .min_by_key(|(idx, _)| *idx);
    if let Some((idx, len)) = first_dash {
        let middle = trimmed[..idx].trim();
        let words = middle.split_whitespace().count();
        if words > 0 && words <= MAX_TYPE_WORDS {
            return (middle.to_string(), trimmed[idx + len..].to_string());
        }
    }

    (String::new(), trimmed.to_string())
}

/// Earliest vocabulary term found in the description, then in the name.
fn infer_type(vocabulary: &[String], description: &str, name: &str) -> String {
    [description, name]
        .iter()
        .find_map(|haystack| earliest_term(vocabulary, haystack))
        .unwrap_or_default()
}

fn earliest_term(vocabulary: &[String], haystack: &str) -> Option<String> {
    let lowered = haystack.to_lowercase();
    vocabulary
        .iter()
        .filter_map(|term| {
            find_word(&lowered, &term.to_lowercase()).map(|pos| (pos, term.len(), term))
        })
        .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, _, term)| term.clone())
}

fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack.match_indices(needle).map(|(idx, _)| idx).find(|&idx| {
        let before = haystack[..idx].chars().next_back();
        let after = haystack[idx + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn distinct_from(item_type: String, name: &str) -> String {
    if item_type.eq_ignore_ascii_case(name.trim()) {
        String::new()
    } else {
        item_type
    }
}

fn named_item(name: String, description: String) -> Option<Item> {
    match (name.is_empty(), description.is_empty()) {
        (false, _) => Some(Item::new(name, description)),
        (true, false) => Some(Item::new(description, "")),
        (true, true) => None,
    }
}

/// Split on commas, semicolons and the word "and", outside parentheses.
fn split_clauses(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut skip_until = 0;

    for (idx, ch) in text.char_indices() {
        if idx < skip_until {
            continue;
        }
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' | ';' if depth == 0 => {
                parts.push(&text[start..idx]);
                start = idx + ch.len_utf8();
            }
            c if c.is_whitespace() && depth == 0 => {
                let after = idx + c.len_utf8();
                if conjunction_at(text, after) {
                    parts.push(&text[start..idx]);
                    start = after + 3;
                    skip_until = start;
                }
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);

    parts
        .into_iter()
        .map(|part| {
            let part = part.trim();
            match part.get(..4) {
                Some(head) if head.eq_ignore_ascii_case("and ") => part[4..].trim(),
                _ => part,
            }
        })
        .collect()
}

fn conjunction_at(text: &str, idx: usize) -> bool {
    let Some(word) = text.get(idx..idx + 3) else {
        return false;
    };
    word.eq_ignore_ascii_case("and")
        && text[idx + 3..]
            .chars()
            .next()
            .is_some_and(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ParserConfig {
        ParserConfig::default()
    }

    #[test]
    fn place_splits_on_dash_or_colon() {
        let item = structure_place("Sagrada Família - Gaudí's unfinished basilica").unwrap();
        assert_eq!(item.name, "Sagrada Família");
        assert_eq!(item.description, "Gaudí's unfinished basilica");

        let item = structure_place("Fushimi Inari: thousands of torii gates").unwrap();
        assert_eq!(item.name, "Fushimi Inari");
        assert_eq!(item.description, "thousands of torii gates");

        let item = structure_place("Kinkaku-ji").unwrap();
        assert_eq!(item.name, "Kinkaku-ji");
        assert_eq!(item.description, "");
    }

    #[test]
    fn place_with_blank_name_promotes_description() {
        let item = structure_place(" - riverside promenade").unwrap();
        assert_eq!(item.name, "riverside promenade");
        assert!(structure_place("   ").is_none());
    }

    #[test]
    fn restaurant_price_name_and_description() {
        let item = structure_restaurant("Can Solé - historic Catalan spot (mid-range)", &config())
            .unwrap();
        assert_eq!(item.name, "Can Solé");
        assert_eq!(item.price_range, "mid-range");
        assert!(item.description.contains("historic Catalan spot"));
        assert_eq!(item.item_type, "Catalan");
    }

    #[test]
    fn restaurant_type_from_leading_parenthetical() {
        let item = structure_restaurant(
            "Cal Pep (Tapas) - counter seating, long queues (moderate)",
            &config(),
        )
        .unwrap();
        assert_eq!(item.name, "Cal Pep");
        assert_eq!(item.item_type, "Tapas");
        assert_eq!(item.price_range, "moderate");
        assert_eq!(item.description, "counter seating, long queues");
    }

    #[test]
    fn restaurant_type_from_middle_segment() {
        let item = structure_restaurant(
            "Cervejaria Ramiro - Seafood - famous for garlic prawns (€€)",
            &config(),
        )
        .unwrap();
        assert_eq!(item.name, "Cervejaria Ramiro");
        assert_eq!(item.item_type, "Seafood");
        assert_eq!(item.price_range, "€€");
        assert_eq!(item.description, "famous for garlic prawns");
    }

    #[test]
    fn restaurant_without_separators_is_all_name() {
        let item = structure_restaurant("Nishiki Market", &config()).unwrap();
        assert_eq!(item.name, "Nishiki Market");
        assert_eq!(item.item_type, "");
        assert_eq!(item.price_range, "");
        assert_eq!(item.description, "");
    }

    #[test]
    fn accommodation_type_inferred_from_vocabulary() {
        let item = structure_accommodation(
            "The Yeatman - luxury wine hotel with river views (high-end)",
            &config(),
        )
        .unwrap();
        assert_eq!(item.name, "The Yeatman");
        assert_eq!(item.price_range, "high-end");
        assert_eq!(item.item_type, "hotel");
    }

    #[test]
    fn accommodation_prefers_longest_term_at_same_position() {
        let item =
            structure_accommodation("Casa Camper - boutique hotel in El Raval", &config()).unwrap();
        assert_eq!(item.item_type, "boutique hotel");
    }

    #[test]
    fn day_labeled_activity_is_exploded() {
        let items = structure_activity("Day 3: visit museum, and eat lunch", &config());
        assert_eq!(
            items,
            vec![Item::new("visit museum", ""), Item::new("eat lunch", "")]
        );
        assert!(items.iter().all(|item| !item.name.contains("Day")));
    }

    #[test]
    fn departure_line_is_noise() {
        assert!(structure_activity("Day 5: depart for airport", &config()).is_empty());
        assert!(structure_activity("Day 4-5: checkout and leave Kyoto", &config()).is_empty());
    }

    #[test]
    fn sightseeing_phrased_as_check_out_is_kept() {
        let items = structure_activity(
            "Day 2: check out the Picasso Museum, and tapas crawl",
            &config(),
        );
        assert_eq!(
            items,
            vec![
                Item::new("check out the Picasso Museum", ""),
                Item::new("tapas crawl", "")
            ]
        );

        let mut strict = config();
        strict.extend_noise_keywords(["check out"]);
        let items = structure_activity("Day 2: check out the Picasso Museum, and tapas crawl", &strict);
        assert_eq!(items, vec![Item::new("tapas crawl", "")]);
    }

    #[test]
    fn conjunction_inside_parentheses_is_kept() {
        let items = structure_activity(
            "Day 2: tapas tour (bread and tomato included); flamenco show",
            &config(),
        );
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "tapas tour (bread and tomato included)");
        assert_eq!(items[1].name, "flamenco show");
    }

    #[test]
    fn words_starting_with_and_are_not_split() {
        let items = structure_activity("Day 1: Explore Andalusian courtyards", &config());
        assert_eq!(items, vec![Item::new("Explore Andalusian courtyards", "")]);
    }

    #[test]
    fn unlabeled_activity_splits_like_place() {
        let items = structure_activity("Port wine tasting - cellars in Gaia", &config());
        assert_eq!(items, vec![Item::new("Port wine tasting", "cellars in Gaia")]);
        assert!(structure_activity("Day 2", &config()).is_empty());
    }

    #[test]
    fn structure_item_dispatches_on_kind() {
        let out = structure_item("Hotel Arts (luxury)", ItemKind::Accommodation, &config());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind(), ItemKind::Accommodation);
        assert_eq!(out[0].name(), "Hotel Arts");
    }

    #[test]
    fn tidy_collapses_whitespace() {
        assert_eq!(tidy("  **Ribeira**   district ,  Porto "), "Ribeira district, Porto");
    }
}
