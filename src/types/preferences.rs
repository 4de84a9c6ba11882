use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Traveller preferences collected before asking the model for recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TravelPreferences {
    /// Overall spending tier for the trip
    pub budget: Budget,
    /// Travel styles such as "adventure" or "relaxation"
    #[serde(default)]
    pub travel_style: Vec<String>,
    /// Activities the traveller enjoys
    #[serde(default)]
    pub activities: Vec<String>,
    /// Preferred lodging kinds (hotel, hostel, ...)
    #[serde(default)]
    pub accommodation: Vec<String>,
    /// Preferred travel seasons
    #[serde(default)]
    pub season: Vec<String>,
    /// Trip length in days
    pub duration_days: u32,
    /// Accessibility requirements, if any
    #[serde(default)]
    pub accessibility: Vec<String>,
    /// Dietary or cuisine preferences
    #[serde(default)]
    pub food_preferences: Vec<String>,
    #[serde(default)]
    pub with_children: bool,
    #[serde(default)]
    pub with_pets: bool,
}

impl Default for TravelPreferences {
    fn default() -> Self {
        Self {
            budget: Budget::MidRange,
            travel_style: Vec::new(),
            activities: Vec::new(),
            accommodation: Vec::new(),
            season: Vec::new(),
            duration_days: 7,
            accessibility: Vec::new(),
            food_preferences: Vec::new(),
            with_children: false,
            with_pets: false,
        }
    }
}

/// Spending tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Budget {
    Budget,
    MidRange,
    Luxury,
}

impl Budget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Budget::Budget => "budget",
            Budget::MidRange => "mid-range",
            Budget::Luxury => "luxury",
        }
    }

    /// Lenient parse of a budget word; unknown words yield `None`.
    pub fn from_word(word: &str) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "budget" | "low" | "cheap" | "affordable" => Some(Budget::Budget),
            "mid-range" | "midrange" | "moderate" | "medium" => Some(Budget::MidRange),
            "luxury" | "high" | "high-end" | "premium" => Some(Budget::Luxury),
            _ => None,
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preferences recovered from a rendered preferences prompt.
///
/// Every field is optional because the prompt is free text by the time it is
/// stored alongside the model output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub travel_style: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accommodation: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub season: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accessibility: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub food_preferences: Vec<String>,
    pub with_children: bool,
    pub with_pets: bool,
}
