use super::destination::Destination;
use crate::error::{Result, TravelError};
use serde::{Deserialize, Serialize};

/// Outcome of parsing one recommendation.
///
/// An empty `destinations` list is a valid outcome, not a failure. Callers
/// that want to treat it as an error (for example to re-ask the model) can use
/// [`ParseResult::ensure_destinations`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Final, deduplicated destinations in order of first appearance
    pub destinations: Vec<Destination>,
    /// Which decoding path produced the records
    pub source: ParseSource,
    /// Counters collected while parsing
    pub stats: ParseStats,
}

/// Which decoder produced a [`ParseResult`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseSource {
    /// Heuristic text pipeline
    #[default]
    Text,
    /// Structured JSON emitted by the model
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Destination blocks found before merging
    pub blocks_found: usize,
    /// Header candidates rejected as in-section numbered points
    pub rejected_headers: usize,
    /// Destinations folded into an earlier one with the same base name
    pub merged_duplicates: usize,
    /// Raw items that produced no record (empty or noise)
    pub dropped_items: usize,
}

impl ParseResult {
    pub fn new(destinations: Vec<Destination>, source: ParseSource, stats: ParseStats) -> Self {
        Self {
            destinations,
            source,
            stats,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn into_destinations(self) -> Vec<Destination> {
        self.destinations
    }

    /// Turn "no destinations extracted" into [`TravelError::NoDestinations`].
    pub fn ensure_destinations(self) -> Result<Self> {
        if self.destinations.is_empty() {
            Err(TravelError::NoDestinations)
        } else {
            Ok(self)
        }
    }

    /// Human-readable overview of what was extracted
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push("=== Parsed Recommendation ===".to_string());
        lines.push(format!("Source: {:?}", self.source));
        lines.push(format!(
            "Destinations: {} ({} blocks, {} merged, {} rejected headers, {} dropped items)",
            self.destinations.len(),
            self.stats.blocks_found,
            self.stats.merged_duplicates,
            self.stats.rejected_headers,
            self.stats.dropped_items
        ));

        for (idx, dest) in self.destinations.iter().enumerate() {
            lines.push(String::new());
            lines.push(format!("{}. {}", idx + 1, dest.name));
            if !dest.description.is_empty() {
                lines.push(format!("   {}", dest.description));
            }
            lines.push(format!(
                "   places: {}, restaurants: {}, activities: {}, accommodations: {}",
                dest.places_to_visit.len(),
                dest.restaurants.len(),
                dest.activities.len(),
                dest.accommodations.len()
            ));

            for place in &dest.places_to_visit {
                lines.push(format!("   - [place] {}", place.name));
            }
            for restaurant in &dest.restaurants {
                let mut line = format!("   - [restaurant] {}", restaurant.name);
                if !restaurant.item_type.is_empty() {
                    line.push_str(&format!(" ({})", restaurant.item_type));
                }
                if !restaurant.price_range.is_empty() {
                    line.push_str(&format!(" [{}]", restaurant.price_range));
                }
                lines.push(line);
            }
            for activity in &dest.activities {
                lines.push(format!("   - [activity] {}", activity.name));
            }
            for stay in &dest.accommodations {
                let mut line = format!("   - [stay] {}", stay.name);
                if !stay.price_range.is_empty() {
                    line.push_str(&format!(" [{}]", stay.price_range));
                }
                lines.push(line);
            }
        }

        lines.join("\n")
    }
}
