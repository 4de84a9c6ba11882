use crate::error::{Result, TravelError};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

pub const NOISE_KEYWORDS_ENV: &str = "TRAVEL_PARSER_NOISE_KEYWORDS";
pub const PRICE_KEYWORDS_ENV: &str = "TRAVEL_PARSER_PRICE_KEYWORDS";

const DEFAULT_PRICE_KEYWORDS: &[&str] = &[
    "budget",
    "affordable",
    "cheap",
    "inexpensive",
    "mid-range",
    "moderate",
    "high-end",
    "upscale",
    "luxury",
    "expensive",
    "splurge",
    "various",
    "$",
    "€",
    "£",
];

const DEFAULT_NOISE_KEYWORDS: &[&str] = &[
    "depart",
    "checkout",
    "check-out",
    "leave",
    "return home",
];

const DEFAULT_CUISINES: &[&str] = &[
    "Italian",
    "French",
    "Chinese",
    "Japanese",
    "Mexican",
    "Thai",
    "Indian",
    "Mediterranean",
    "Middle Eastern",
    "American",
    "Seafood",
    "Vegetarian",
    "Vegan",
    "Spanish",
    "Catalan",
    "Portuguese",
    "Tapas",
    "Kaiseki",
    "Sushi",
    "Ramen",
    "Tempura",
];

const DEFAULT_LODGING: &[&str] = &[
    "boutique hotel",
    "hotel",
    "hostel",
    "resort",
    "ryokan",
    "guesthouse",
    "guest house",
    "apartment",
    "villa",
    "inn",
    "bed and breakfast",
    "b&b",
    "lodge",
    "pousada",
];

/// Vocabularies and switches used by the parsing heuristics.
///
/// Every field is optional when loaded from JSON; missing ones take the
/// built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Words that mark a parenthetical as a price tier
    pub price_keywords: Vec<String>,
    /// Substrings that mark a day-labeled activity fragment as non-activity
    pub noise_keywords: Vec<String>,
    /// Cuisine names used to infer a restaurant type
    pub cuisine_vocabulary: Vec<String>,
    /// Lodging kinds used to infer an accommodation type
    pub lodging_vocabulary: Vec<String>,
    /// Fold destinations that share a base name
    pub merge_duplicates: bool,
    /// Turn bulleted time blocks into item lists
    pub itemize_time_blocks: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            price_keywords: owned(DEFAULT_PRICE_KEYWORDS),
            noise_keywords: owned(DEFAULT_NOISE_KEYWORDS),
            cuisine_vocabulary: owned(DEFAULT_CUISINES),
            lodging_vocabulary: owned(DEFAULT_LODGING),
            merge_duplicates: true,
            itemize_time_blocks: true,
        }
    }
}

impl ParserConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let config: Self = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
            TravelError::Config(format!("invalid parser config at {}: {}", err.path(), err))
        })?;
        config.validated()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        tracing::debug!(
            target: "travel_parser::config",
            path = %path.display(),
            "loaded parser config file"
        );
        Self::from_json_str(&raw)
    }

    /// Defaults extended with comma-separated keywords from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = env::var(NOISE_KEYWORDS_ENV) {
            config.extend_noise_keywords(split_list(&raw));
        }
        if let Ok(raw) = env::var(PRICE_KEYWORDS_ENV) {
            config.extend_price_keywords(split_list(&raw));
        }
        config
    }

    pub fn extend_noise_keywords<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_unique(&mut self.noise_keywords, keywords);
    }

    pub fn extend_price_keywords<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_unique(&mut self.price_keywords, keywords);
    }

    /// True when `text` contains any noise keyword, ignoring case.
    pub fn is_noise(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.noise_keywords
            .iter()
            .any(|keyword| lowered.contains(&keyword.to_lowercase()))
    }

    /// True when `text` contains any price keyword, ignoring case.
    pub fn mentions_price(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.price_keywords
            .iter()
            .any(|keyword| lowered.contains(&keyword.to_lowercase()))
    }

    fn validated(self) -> Result<Self> {
        if self.price_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(TravelError::Config(
                "price_keywords must not contain blank entries".to_string(),
            ));
        }
        if self.noise_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(TravelError::Config(
                "noise_keywords must not contain blank entries".to_string(),
            ));
        }
        Ok(self)
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|word| word.to_string()).collect()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

fn extend_unique<I, S>(target: &mut Vec<String>, keywords: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for keyword in keywords {
        let keyword = keyword.into();
        let trimmed = keyword.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !target.iter().any(|k| k.eq_ignore_ascii_case(trimmed)) {
            target.push(trimmed.to_string());
        }
    }
}
