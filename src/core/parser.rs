use super::{
    config::ParserConfig,
    fields::extract_fields,
    merger::merge_destinations,
    route_days,
    segmenter::{segment, DestinationBlock},
    structurer::structure_item,
    tokenizer::tokenize,
};
use crate::{
    schemas::{RecordSchema, Validator},
    services::json_payload::decode_destinations,
    types::{Destination, ItemKind, ParseResult, ParseSource, ParseStats, RoutePlan, StructuredItem},
};

/// Turns raw model output into destination records and route plans.
///
/// Parsing never fails: unrecognisable input produces an empty result.
#[derive(Debug, Clone, Default)]
pub struct RecommendationParser {
    config: ParserConfig,
    validator: Validator,
}

impl RecommendationParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Validation applied when the content is JSON
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Require JSON content to match the `Destination` schema exactly
    pub fn with_strict_json(mut self, strict: bool) -> Self {
        self.validator = if strict {
            Validator::strict_for(Destination::schema())
        } else {
            Validator::SerdeFirst
        };
        self
    }

    pub fn with_merge_duplicates(mut self, merge: bool) -> Self {
        self.config.merge_duplicates = merge;
        self
    }

    pub fn with_itemized_time_blocks(mut self, itemize: bool) -> Self {
        self.config.itemize_time_blocks = itemize;
        self
    }

    pub fn with_noise_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.extend_noise_keywords(keywords);
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Parse a recommendation, trying JSON first and falling back to text.
    pub fn parse(&self, content: &str) -> ParseResult {
        match decode_destinations(content, &self.validator, &self.config) {
            Some(Ok(destinations)) => {
                let found = destinations.len();
                let (destinations, merged) = self.maybe_merge(destinations);
                tracing::info!(
                    target: "travel_parser::parser",
                    destinations = destinations.len(),
                    "parsed structured JSON recommendation"
                );
                ParseResult::new(
                    destinations,
                    ParseSource::Json,
                    ParseStats {
                        blocks_found: found,
                        merged_duplicates: merged,
                        ..ParseStats::default()
                    },
                )
            }
            Some(Err(err)) => {
                tracing::warn!(
                    target: "travel_parser::json",
                    error = %err,
                    "JSON recommendation rejected, falling back to text parsing"
                );
                self.parse_text(content)
            }
            None => self.parse_text(content),
        }
    }

    /// Run the heuristic text pipeline only.
    pub fn parse_text(&self, text: &str) -> ParseResult {
        let segmentation = segment(text);
        let mut stats = ParseStats {
            blocks_found: segmentation.blocks.len(),
            rejected_headers: segmentation.rejected_headers,
            ..ParseStats::default()
        };

        let destinations: Vec<Destination> = segmentation
            .blocks
            .iter()
            .map(|block| {
                let (destination, dropped) = self.parse_block(block);
                stats.dropped_items += dropped;
                destination
            })
            .collect();

        let (destinations, merged) = self.maybe_merge(destinations);
        stats.merged_duplicates = merged;

        if destinations.is_empty() {
            tracing::warn!(
                target: "travel_parser::parser",
                input_len = text.len(),
                "no destinations found in recommendation"
            );
        } else {
            tracing::info!(
                target: "travel_parser::parser",
                destinations = destinations.len(),
                blocks = stats.blocks_found,
                merged = stats.merged_duplicates,
                "parsed recommendation text"
            );
        }

        ParseResult::new(destinations, ParseSource::Text, stats)
    }

    /// Structure a single destination block. Returns the record and the
    /// number of raw items that produced nothing.
    pub fn parse_block(&self, block: &DestinationBlock) -> (Destination, usize) {
        let raw = extract_fields(&block.body);
        let mut destination = Destination::new(block.name.clone());
        destination.description = raw.description;
        destination.why_it_fits = raw.why_it_fits;

        let mut dropped = 0;
        let sections = [
            (ItemKind::Place, raw.places),
            (ItemKind::Restaurant, raw.restaurants),
            (ItemKind::Activity, raw.activities),
            (ItemKind::Accommodation, raw.accommodations),
        ];

        for (kind, span) in sections {
            for item in tokenize(&span) {
                let structured = structure_item(&item, kind, &self.config);
                if structured.is_empty() {
                    dropped += 1;
                }
                for record in structured {
                    match record {
                        StructuredItem::Place(item) => destination.places_to_visit.push(item),
                        StructuredItem::Activity(item) => destination.activities.push(item),
                        StructuredItem::Restaurant(item) => destination.restaurants.push(item),
                        StructuredItem::Accommodation(item) => {
                            destination.accommodations.push(item)
                        }
                    }
                }
            }
        }

        tracing::debug!(
            target: "travel_parser::parser",
            destination = %destination.name,
            items = destination.item_count(),
            dropped,
            "structured destination block"
        );

        (destination, dropped)
    }

    /// Decompose generated itinerary text for one destination.
    pub fn parse_route_plan(&self, destination_name: &str, itinerary: &str) -> RoutePlan {
        route_days::parse_route_plan(destination_name, itinerary, &self.config)
    }

    fn maybe_merge(&self, destinations: Vec<Destination>) -> (Vec<Destination>, usize) {
        if !self.config.merge_duplicates {
            return (destinations, 0);
        }
        let outcome = merge_destinations(destinations);
        (outcome.destinations, outcome.merged)
    }
}

/// Parse with default settings and return the destinations.
pub fn parse_recommendation(content: &str) -> Vec<Destination> {
    RecommendationParser::new().parse(content).into_destinations()
}

/// Decompose itinerary text with default settings.
pub fn parse_itinerary(destination_name: &str, itinerary: &str) -> RoutePlan {
    RecommendationParser::new().parse_route_plan(destination_name, itinerary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimeBlock;
    use serde_json::json;

    const TWO_CITIES: &str = "Here are my picks!\n\n\
1. Tokyo, Japan\n\
Neon nights and quiet shrines.\n\
- Places to Visit:\n\
• Senso-ji - oldest temple\n\
- Accommodation:\n\
• Park Hyatt - skyline views (luxury)\n\
\n\
2. Oslo, Norway\n\
Fjords and design.\n\
- Accommodation:\n\
• Anker Hostel - central (budget)\n";

    #[test]
    fn text_pipeline_end_to_end() {
        let result = RecommendationParser::new().parse(TWO_CITIES);
        assert_eq!(result.source, ParseSource::Text);
        assert_eq!(result.len(), 2);

        let tokyo = &result.destinations[0];
        assert_eq!(tokyo.name, "Tokyo, Japan");
        assert_eq!(tokyo.description, "Neon nights and quiet shrines.");
        assert_eq!(tokyo.places_to_visit[0].name, "Senso-ji");
        assert_eq!(tokyo.accommodations.len(), 1);
        assert_eq!(tokyo.accommodations[0].name, "Park Hyatt");

        let oslo = &result.destinations[1];
        assert_eq!(oslo.accommodations[0].price_range, "budget");
    }

    #[test]
    fn duplicates_merge_unless_disabled() {
        let text = "1. Paris, France\n- Places to Visit:\n• Louvre\n\n2. Paris\n- Restaurants:\n• Le Comptoir\n";
        let merged = RecommendationParser::new().parse(text);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.stats.merged_duplicates, 1);

        let separate = RecommendationParser::new()
            .with_merge_duplicates(false)
            .parse(text);
        assert_eq!(separate.len(), 2);
    }

    #[test]
    fn json_content_takes_the_json_path() {
        let content = json!([{ "name": "Kyoto, Japan", "placesToVisit": ["Gion - geisha district"] }])
            .to_string();
        let result = RecommendationParser::new().parse(&content);
        assert_eq!(result.source, ParseSource::Json);
        assert_eq!(result.destinations[0].places_to_visit[0].name, "Gion");
    }

    #[test]
    fn rejected_json_falls_back_to_text() {
        let content = json!({ "name": "Kyoto", "placesToVisit": ["Gion"] }).to_string();
        let result = RecommendationParser::new()
            .with_strict_json(true)
            .parse(&content);
        assert_eq!(result.source, ParseSource::Text);
        assert!(result.is_empty());
    }

    #[test]
    fn extra_noise_keywords_apply() {
        let text = "1. Lima, Peru\n- Activities:\n• Day 1: airport transfer, and ceviche lunch\n";
        let result = RecommendationParser::new()
            .with_noise_keywords(["airport"])
            .parse(text);
        let names: Vec<_> = result.destinations[0]
            .activities
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["ceviche lunch"]);
        assert_eq!(result.stats.dropped_items, 0);
    }

    #[test]
    fn route_plan_uses_parser_config() {
        let plan = RecommendationParser::new()
            .with_itemized_time_blocks(false)
            .parse_route_plan("Kyoto", "Day 1:\nMorning:\n• Temple\n• Garden");
        assert_eq!(plan.destination_name, "Kyoto");
        assert!(matches!(plan.days[0].morning, TimeBlock::PlainText(_)));
    }

    #[test]
    fn convenience_functions() {
        assert_eq!(parse_recommendation(TWO_CITIES).len(), 2);
        assert_eq!(parse_itinerary("Oslo", "Day 2:\nEvening: Opera").days[0].day_number, 2);
        assert!(parse_recommendation("").is_empty());
    }
}
