use crate::record_schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One recommended place, extracted from a single recommendation text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[record_schema(name = "destination")]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    /// Destination label as written by the model, usually "City, Country"
    pub name: String,
    /// Short blurb that follows the destination header
    #[serde(default)]
    pub description: String,
    /// Why the destination matches the traveller's preferences
    #[serde(default)]
    pub why_it_fits: String,
    /// Sights and landmarks worth visiting
    #[serde(default)]
    pub places_to_visit: Vec<Item>,
    /// Restaurant suggestions with optional cuisine and price tier
    #[serde(default)]
    pub restaurants: Vec<RestaurantItem>,
    /// Things to do, with any "Day N:" labels already removed
    #[serde(default)]
    pub activities: Vec<Item>,
    /// Places to stay with optional lodging type and price tier
    #[serde(default)]
    pub accommodations: Vec<AccommodationItem>,
}

impl Destination {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Text before the first comma, trimmed. Used as the deduplication key.
    pub fn base_name(&self) -> &str {
        base_name_of(&self.name)
    }

    /// Text after the first comma, if there is any.
    pub fn country(&self) -> Option<&str> {
        self.name
            .split_once(',')
            .map(|(_, rest)| rest.trim())
            .filter(|rest| !rest.is_empty())
    }

    /// True when nothing beyond the name was extracted.
    pub fn is_empty_shell(&self) -> bool {
        self.description.is_empty()
            && self.why_it_fits.is_empty()
            && self.places_to_visit.is_empty()
            && self.restaurants.is_empty()
            && self.activities.is_empty()
            && self.accommodations.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.places_to_visit.len()
            + self.restaurants.len()
            + self.activities.len()
            + self.accommodations.len()
    }
}

pub(crate) fn base_name_of(name: &str) -> &str {
    name.split(',').next().unwrap_or_default().trim()
}

/// A named entry with free-text description. `name` is never blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Item {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantItem {
    pub name: String,
    /// Cuisine, empty when unknown
    #[serde(default, rename = "type")]
    pub item_type: String,
    /// Price tier such as "mid-range", empty when unknown
    #[serde(default)]
    pub price_range: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationItem {
    pub name: String,
    /// Lodging kind (hotel, hostel, resort, ...), empty when unknown
    #[serde(default, rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub price_range: String,
    #[serde(default)]
    pub description: String,
}

/// Which section an item came from; selects the structuring rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Place,
    Restaurant,
    Activity,
    Accommodation,
}

/// Output of structuring a single raw item string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredItem {
    Place(Item),
    Restaurant(RestaurantItem),
    Activity(Item),
    Accommodation(AccommodationItem),
}

impl StructuredItem {
    pub fn name(&self) -> &str {
        match self {
            StructuredItem::Place(item) | StructuredItem::Activity(item) => &item.name,
            StructuredItem::Restaurant(item) => &item.name,
            StructuredItem::Accommodation(item) => &item.name,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            StructuredItem::Place(_) => ItemKind::Place,
            StructuredItem::Restaurant(_) => ItemKind::Restaurant,
            StructuredItem::Activity(_) => ItemKind::Activity,
            StructuredItem::Accommodation(_) => ItemKind::Accommodation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_and_country_split_on_first_comma() {
        let dest = Destination::new("Porto, Portugal");
        assert_eq!(dest.base_name(), "Porto");
        assert_eq!(dest.country(), Some("Portugal"));

        let bare = Destination::new("Kyoto");
        assert_eq!(bare.base_name(), "Kyoto");
        assert_eq!(bare.country(), None);
    }

    #[test]
    fn serializes_with_camel_case_and_type_keys() {
        let mut dest = Destination::new("Barcelona, Spain");
        dest.restaurants.push(RestaurantItem {
            name: "Can Solé".to_string(),
            item_type: "Catalan".to_string(),
            price_range: "mid-range".to_string(),
            description: String::new(),
        });

        let value = serde_json::to_value(&dest).unwrap();
        assert!(value.get("whyItFits").is_some());
        assert!(value.get("placesToVisit").is_some());
        assert_eq!(value["restaurants"][0]["type"], "Catalan");
        assert_eq!(value["restaurants"][0]["priceRange"], "mid-range");
    }

    #[test]
    fn empty_shell_detection() {
        let mut dest = Destination::new("Oslo, Norway");
        assert!(dest.is_empty_shell());
        dest.activities.push(Item::new("Fjord cruise", ""));
        assert!(!dest.is_empty_shell());
        assert_eq!(dest.item_count(), 1);
    }
}
