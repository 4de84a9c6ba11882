use crate::{
    schemas::{schema_instructions, RecordSchema},
    types::{Destination, ExtractedPreferences, TravelPreferences},
};
use regex::Regex;
use std::sync::OnceLock;

/// System message for recommendation requests.
pub const RECOMMENDATION_SYSTEM_PROMPT: &str = "You are a knowledgeable travel assistant that provides detailed, personalized travel recommendations based on user preferences.";

const LIST_LABELS: &[&str] = &[
    "Travel Style:",
    "Activities I enjoy:",
    "Preferred accommodation:",
    "Preferred travel season:",
    "Trip duration:",
    "Accessibility requirements:",
    "Food preferences:",
    "I will be traveling",
    "For my recommendation",
];

const WITH_CHILDREN: &str = "I will be traveling with children";
const WITH_PETS: &str = "I will be traveling with pets";

static BUDGET: OnceLock<Regex> = OnceLock::new();
static DURATION: OnceLock<Regex> = OnceLock::new();

fn budget_pattern() -> &'static Regex {
    BUDGET.get_or_init(|| Regex::new(r"(?i)Budget:\s*(\w+(?:-\w+)?)").expect("valid budget regex"))
}

fn duration_pattern() -> &'static Regex {
    DURATION.get_or_init(|| {
        Regex::new(r"(?i)Trip duration:\s*(\d+)\s*days?").expect("valid duration regex")
    })
}

/// Render traveller preferences as the user message.
pub fn generate_preferences_prompt(preferences: &TravelPreferences) -> String {
    let mut lines = vec![
        "I need a travel recommendation with the following preferences:".to_string(),
        String::new(),
        format!("Budget: {}", preferences.budget),
        format!("Travel Style: {}", preferences.travel_style.join(", ")),
        format!("Activities I enjoy: {}", preferences.activities.join(", ")),
        format!(
            "Preferred accommodation: {}",
            preferences.accommodation.join(", ")
        ),
        format!("Preferred travel season: {}", preferences.season.join(", ")),
        format!("Trip duration: {} days", preferences.duration_days),
        format!(
            "Accessibility requirements: {}",
            preferences.accessibility.join(", ")
        ),
        format!(
            "Food preferences: {}",
            preferences.food_preferences.join(", ")
        ),
    ];
    if preferences.with_children {
        lines.push(format!("{}.", WITH_CHILDREN));
    }
    if preferences.with_pets {
        lines.push(format!("{}.", WITH_PETS));
    }
    lines.push(String::new());
    lines.push("For my recommendation, please include:".to_string());
    lines.push("1. 3-5 destination suggestions that match my preferences".to_string());
    lines.push("2. Brief description of why each destination is suitable".to_string());
    lines.push("3. Key attractions or activities at each destination".to_string());
    lines.push("4. Best time to visit considering my season preferences".to_string());
    lines.push("5. Approximate budget estimate for each destination".to_string());
    lines.push("6. Any special considerations for my specific needs (accessibility, children, pets, food requirements)".to_string());

    lines.join("\n")
}

/// Instruction block that asks for the numbered-header, dashed-section,
/// bulleted-item layout the text parser expects.
pub fn generate_recommendation_prompt(preferences_text: &str, destination_count: usize) -> String {
    let count = destination_count.max(1);
    let noun = if count == 1 {
        "destination"
    } else {
        "destinations"
    };

    format!(
        r#"Based on the user's travel preferences: "{preferences}", recommend exactly {count} travel {noun}.

For each destination, follow this exact format with clear section headers:

1. {{City/Region Name, Country}}
A brief 1-2 sentence description of the destination that captures its essence.

- Why This Fits Your Preferences:
  [Explain how this destination matches the user's specific preferences in 2-3 sentences]

- Places to Visit:
  [List 4-5 must-see attractions or landmarks with a brief description of each. Use bullet points.]

- Restaurants You Should Try:
  [Recommend 3-4 restaurants across different price points, including a brief note on cuisine type and the price range in parentheses. Use bullet points.]

- Activities for Your Trip:
  [Suggest activities tailored to the user's specified trip duration, organized day by day if possible. Use bullet points.]

- Accommodation Recommendations:
  [Suggest 2-3 accommodations that match the user's preferences and budget, with the price range in parentheses. Use bullet points.]

IMPORTANT: Do not use numbered points (1., 2., etc.) within any section except for the main destination headers. For all lists, use bullet points (•) instead.
Make sure all information for each destination is grouped together - do not split a destination across multiple sections.
Use this exact structure and formatting for all {count} {noun}."#,
        preferences = preferences_text.trim(),
        count = count,
        noun = noun,
    )
}

/// Same request, but asking for JSON records instead of formatted text.
pub fn generate_json_recommendation_prompt(
    preferences_text: &str,
    destination_count: usize,
) -> String {
    let count = destination_count.max(1);
    format!(
        "Based on the user's travel preferences: \"{}\", recommend exactly {} travel destinations.\n\n{}",
        preferences_text.trim(),
        count,
        schema_instructions(Destination::schema(), true)
    )
}

/// System prompt for day-by-day itinerary generation.
pub fn generate_itinerary_prompt(duration_days: u32) -> String {
    let days = duration_days.max(1);
    let label = if days == 1 {
        "1-day".to_string()
    } else {
        format!("{}-day", days)
    };

    format!(
        "You are an expert travel planner. Create a detailed daily itinerary based on the user's preferences and available attractions.

The user is requesting a {label} itinerary. You MUST create an itinerary for EXACTLY {days} day(s).

Format the response as:

Day 1:
Morning: [Activities or places]
Afternoon: [Activities or places]
Evening: [Activities or places]

Day 2:
Morning: [Activities or places]
Afternoon: [Activities or places]
Evening: [Activities or places]

... and so on until you have covered ALL {days} days.

Make sure each day has a good balance of activities, not too crowded, and considers travel time between places."
    )
}

/// Recover structured preferences from a rendered preferences prompt.
pub fn extract_preferences_from_prompt(text: &str) -> ExtractedPreferences {
    let lowered = text.to_lowercase();

    ExtractedPreferences {
        budget: budget_pattern()
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_lowercase()),
        travel_style: list_after(text, &lowered, "Travel Style:"),
        activities: list_after(text, &lowered, "Activities I enjoy:"),
        accommodation: list_after(text, &lowered, "Preferred accommodation:"),
        season: list_after(text, &lowered, "Preferred travel season:"),
        duration_days: duration_pattern()
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok()),
        accessibility: list_after(text, &lowered, "Accessibility requirements:"),
        food_preferences: list_after(text, &lowered, "Food preferences:"),
        with_children: lowered.contains(&WITH_CHILDREN.to_lowercase()),
        with_pets: lowered.contains(&WITH_PETS.to_lowercase()),
    }
}

/// Comma list following `label`, up to the next known label.
fn list_after(text: &str, lowered: &str, label: &str) -> Vec<String> {
    let label_lower = label.to_lowercase();
    let Some(found) = lowered.find(&label_lower) else {
        return Vec::new();
    };
    let start = found + label_lower.len();

    let end = LIST_LABELS
        .iter()
        .filter(|other| **other != label)
        .filter_map(|other| lowered[start..].find(&other.to_lowercase()))
        .min()
        .map_or(lowered.len(), |offset| start + offset);

    // Offsets come from the lowercased copy and may not be char boundaries here.
    let Some(value) = text.get(start..end) else {
        return Vec::new();
    };

    value
        .split([',', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Budget;

    fn preferences() -> TravelPreferences {
        TravelPreferences {
            budget: Budget::Luxury,
            travel_style: vec!["Cultural".to_string(), "Relaxation".to_string()],
            activities: vec!["Museums".to_string(), "Food tours".to_string()],
            accommodation: vec!["Boutique hotel".to_string()],
            season: vec!["Spring".to_string()],
            duration_days: 5,
            accessibility: Vec::new(),
            food_preferences: vec!["Seafood".to_string()],
            with_children: true,
            with_pets: false,
        }
    }

    #[test]
    fn preferences_prompt_lists_every_field() {
        let prompt = generate_preferences_prompt(&preferences());
        assert!(prompt.contains("Budget: luxury"));
        assert!(prompt.contains("Travel Style: Cultural, Relaxation"));
        assert!(prompt.contains("Trip duration: 5 days"));
        assert!(prompt.contains("I will be traveling with children."));
        assert!(!prompt.contains("with pets"));
    }

    #[test]
    fn extraction_reverses_rendering() {
        let prompt = generate_preferences_prompt(&preferences());
        let extracted = extract_preferences_from_prompt(&prompt);
        assert_eq!(extracted.budget.as_deref(), Some("luxury"));
        assert_eq!(extracted.travel_style, vec!["Cultural", "Relaxation"]);
        assert_eq!(extracted.activities, vec!["Museums", "Food tours"]);
        assert_eq!(extracted.accommodation, vec!["Boutique hotel"]);
        assert_eq!(extracted.season, vec!["Spring"]);
        assert_eq!(extracted.duration_days, Some(5));
        assert!(extracted.accessibility.is_empty());
        assert_eq!(extracted.food_preferences, vec!["Seafood"]);
        assert!(extracted.with_children);
        assert!(!extracted.with_pets);
    }

    #[test]
    fn extraction_from_free_text() {
        let extracted = extract_preferences_from_prompt("Something cheap. Budget: mid-range please");
        assert_eq!(extracted.budget.as_deref(), Some("mid-range"));
        assert_eq!(extracted.duration_days, None);
        assert!(extracted.travel_style.is_empty());
    }

    #[test]
    fn recommendation_prompt_requests_format() {
        let prompt = generate_recommendation_prompt("beaches and food", 3);
        assert!(prompt.contains("recommend exactly 3 travel destinations"));
        assert!(prompt.contains("1. {City/Region Name, Country}"));
        assert!(prompt.contains("- Places to Visit:"));
        assert!(prompt.contains("bullet points (•)"));

        let single = generate_recommendation_prompt("mountains", 0);
        assert!(single.contains("exactly 1 travel destination."));
    }

    #[test]
    fn itinerary_prompt_names_day_count() {
        let prompt = generate_itinerary_prompt(4);
        assert!(prompt.contains("4-day itinerary"));
        assert!(prompt.contains("ALL 4 days"));
        assert!(prompt.contains("Morning: [Activities or places]"));
    }

    #[test]
    fn json_prompt_embeds_destination_schema() {
        let prompt = generate_json_recommendation_prompt("temples", 2);
        assert!(prompt.contains("exactly 2 travel destinations"));
        assert!(prompt.contains("whyItFits"));
    }
}
