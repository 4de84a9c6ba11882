use super::destination::Item;
use crate::record_schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Day-by-day plan generated for one destination of a recommendation.
///
/// Keyed by destination *name*, not by a destination record, so it survives
/// re-parsing of the recommendation it came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[record_schema(name = "route_plan")]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    /// Destination label the itinerary was generated for
    pub destination_name: String,
    /// Days in source order
    #[serde(default)]
    pub days: Vec<Day>,
}

impl RoutePlan {
    pub fn new(destination_name: impl Into<String>, days: Vec<Day>) -> Self {
        Self {
            destination_name: destination_name.into(),
            days,
        }
    }

    pub fn day(&self, day_number: u32) -> Option<&Day> {
        self.days.iter().find(|day| day.day_number == day_number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    /// 1-based day number
    pub day_number: u32,
    /// Text on the "Day N:" line that is not a time block, e.g. "Historical Berlin"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub morning: TimeBlock,
    #[serde(default)]
    pub afternoon: TimeBlock,
    #[serde(default)]
    pub evening: TimeBlock,
}

impl Day {
    pub fn new(day_number: u32) -> Self {
        Self {
            day_number: day_number.max(1),
            title: None,
            morning: TimeBlock::default(),
            afternoon: TimeBlock::default(),
            evening: TimeBlock::default(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.morning.is_empty() && self.afternoon.is_empty() && self.evening.is_empty()
    }
}

/// Content of a Morning/Afternoon/Evening slot.
///
/// Serialized untagged: a plain string or an array of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum TimeBlock {
    PlainText(String),
    ActivityList(Vec<Item>),
}

impl Default for TimeBlock {
    fn default() -> Self {
        TimeBlock::PlainText(String::new())
    }
}

impl TimeBlock {
    pub fn is_empty(&self) -> bool {
        match self {
            TimeBlock::PlainText(text) => text.trim().is_empty(),
            TimeBlock::ActivityList(items) => items.is_empty(),
        }
    }

    /// Flattened text view; list entries are joined one per line.
    pub fn as_text(&self) -> String {
        match self {
            TimeBlock::PlainText(text) => text.clone(),
            TimeBlock::ActivityList(items) => items
                .iter()
                .map(|item| {
                    if item.description.is_empty() {
                        item.name.clone()
                    } else {
                        format!("{} - {}", item.name, item.description)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn items(&self) -> &[Item] {
        match self {
            TimeBlock::PlainText(_) => &[],
            TimeBlock::ActivityList(items) => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn time_block_deserializes_from_string_or_list() {
        let day: Day = serde_json::from_value(json!({
            "dayNumber": 2,
            "morning": "Museum",
            "afternoon": [{ "name": "Park Güell", "description": "views" }]
        }))
        .unwrap();

        assert_eq!(day.morning, TimeBlock::PlainText("Museum".to_string()));
        assert_eq!(day.afternoon.items().len(), 1);
        assert!(day.evening.is_empty());
    }

    #[test]
    fn day_number_is_at_least_one() {
        assert_eq!(Day::new(0).day_number, 1);
        assert!(Day::new(3).is_blank());
    }

    #[test]
    fn list_flattens_to_text() {
        let block = TimeBlock::ActivityList(vec![
            Item::new("Brandenburg Gate", "photos"),
            Item::new("Checkpoint Charlie", ""),
        ]);
        assert_eq!(
            block.as_text(),
            "Brandenburg Gate - photos\nCheckpoint Charlie"
        );
    }
}
