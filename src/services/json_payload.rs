//! Decoding of recommendations the model returned as JSON.

use crate::{
    core::{
        config::ParserConfig,
        structurer::{infer_cuisine, structure_item, tidy},
    },
    schemas::Validator,
    types::{AccommodationItem, Destination, Item, ItemKind, RestaurantItem, StructuredItem},
    Result, TravelError,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireEnvelope {
    Wrapped { destinations: Vec<Value> },
    List(Vec<Value>),
    Single(Value),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDestination {
    #[serde(alias = "destinationName", alias = "destination", alias = "city")]
    name: String,
    #[serde(default, alias = "overview")]
    description: String,
    #[serde(default, alias = "whyFits", alias = "why_it_fits")]
    why_it_fits: String,
    #[serde(default, alias = "places_to_visit", alias = "places", alias = "attractions")]
    places_to_visit: Vec<WireItem>,
    #[serde(default)]
    restaurants: Vec<WireItem>,
    #[serde(default)]
    activities: Vec<WireItem>,
    #[serde(default, alias = "accommodation", alias = "hotels")]
    accommodations: Vec<WireItem>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireItem {
    Text(String),
    Record(WireRecord),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireRecord {
    #[serde(alias = "title")]
    name: String,
    description: String,
    #[serde(rename = "type", alias = "cuisineType", alias = "cuisine_type", alias = "cuisine")]
    item_type: String,
    #[serde(alias = "price_range", alias = "price")]
    price_range: String,
}

/// Strip a surrounding markdown code fence, if any.
fn unfence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    let inner = inner
        .strip_prefix("json")
        .or_else(|| inner.strip_prefix("JSON"))
        .unwrap_or(inner);
    inner.trim()
}

/// Try to read `text` as a JSON recommendation.
///
/// Returns `None` when the text is not JSON at all, so the caller can run the
/// text pipeline. `Some(Err(..))` means it was JSON but did not decode.
pub fn decode_destinations(
    text: &str,
    validator: &Validator,
    config: &ParserConfig,
) -> Option<Result<Vec<Destination>>> {
    let body = unfence(text);
    if !(body.starts_with('{') || body.starts_with('[')) {
        return None;
    }

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(target: "travel_parser::json", error = %err, "content looks like JSON but does not parse");
            return None;
        }
    };

    Some(decode_value(value, validator, config))
}

fn decode_value(
    value: Value,
    validator: &Validator,
    config: &ParserConfig,
) -> Result<Vec<Destination>> {
    let records = match serde_json::from_value::<WireEnvelope>(value)? {
        WireEnvelope::Wrapped { destinations } => destinations,
        WireEnvelope::List(list) => list,
        WireEnvelope::Single(Value::Object(map)) => vec![Value::Object(map)],
        WireEnvelope::Single(other) => {
            return Err(TravelError::Validation(format!(
                "expected a destination object or list, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut destinations = Vec::with_capacity(records.len());
    for (idx, record) in records.into_iter().enumerate() {
        let decoded = if validator.is_strict() {
            validator
                .validate::<Destination>(record)
                .and_then(|destination| normalize(destination, config))
        } else {
            validator
                .validate::<WireDestination>(record)
                .and_then(|wire| from_wire(wire, config))
        };
        let decoded = decoded.map_err(|err| match err {
            TravelError::Validation(msg) => {
                TravelError::Validation(format!("destination #{}: {}", idx + 1, msg))
            }
            other => other,
        })?;
        match decoded {
            Some(destination) => destinations.push(destination),
            None => tracing::debug!(target: "travel_parser::json", index = idx, "skipped destination without a name"),
        }
    }

    Ok(destinations)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Schema-shaped records still get blank items dropped and cuisines inferred.
fn normalize(mut destination: Destination, config: &ParserConfig) -> Result<Option<Destination>> {
    destination.name = tidy(&destination.name);
    if destination.name.is_empty() {
        return Ok(None);
    }
    destination.places_to_visit.retain(|item| !item.name.trim().is_empty());
    destination.activities.retain(|item| !item.name.trim().is_empty());
    destination.accommodations.retain(|item| !item.name.trim().is_empty());
    destination.restaurants.retain(|item| !item.name.trim().is_empty());
    for restaurant in &mut destination.restaurants {
        if restaurant.item_type.is_empty() {
            restaurant.item_type = infer_cuisine(config, &restaurant.description, &restaurant.name);
        }
    }
    Ok(Some(destination))
}

fn from_wire(wire: WireDestination, config: &ParserConfig) -> Result<Option<Destination>> {
    let name = tidy(&wire.name);
    if name.is_empty() {
        return Ok(None);
    }

    let mut destination = Destination::new(name);
    destination.description = tidy(&wire.description);
    destination.why_it_fits = wire.why_it_fits.trim().to_string();

    for structured in collect(wire.places_to_visit, ItemKind::Place, config) {
        if let StructuredItem::Place(item) = structured {
            destination.places_to_visit.push(item);
        }
    }
    for structured in collect(wire.activities, ItemKind::Activity, config) {
        if let StructuredItem::Activity(item) = structured {
            destination.activities.push(item);
        }
    }
    for structured in collect(wire.restaurants, ItemKind::Restaurant, config) {
        if let StructuredItem::Restaurant(item) = structured {
            destination.restaurants.push(item);
        }
    }
    for structured in collect(wire.accommodations, ItemKind::Accommodation, config) {
        if let StructuredItem::Accommodation(item) = structured {
            destination.accommodations.push(item);
        }
    }

    Ok(Some(destination))
}

/// Plain strings go through the text structurer; objects are taken as-is.
fn collect(items: Vec<WireItem>, kind: ItemKind, config: &ParserConfig) -> Vec<StructuredItem> {
    items
        .into_iter()
        .flat_map(|item| match item {
            WireItem::Text(text) => structure_item(&text, kind, config),
            WireItem::Record(record) => record_item(record, kind, config).into_iter().collect(),
        })
        .collect()
}

fn record_item(record: WireRecord, kind: ItemKind, config: &ParserConfig) -> Option<StructuredItem> {
    let name = tidy(&record.name);
    let description = tidy(&record.description);
    let (name, description) = match (name.is_empty(), description.is_empty()) {
        (false, _) => (name, description),
        (true, false) => (description, String::new()),
        (true, true) => return None,
    };

    Some(match kind {
        ItemKind::Place => StructuredItem::Place(Item::new(name, description)),
        ItemKind::Activity => StructuredItem::Activity(Item::new(name, description)),
        ItemKind::Restaurant => {
            let item_type = if record.item_type.trim().is_empty() {
                infer_cuisine(config, &description, &name)
            } else {
                record.item_type.trim().to_string()
            };
            StructuredItem::Restaurant(RestaurantItem {
                name,
                item_type,
                price_range: record.price_range.trim().to_string(),
                description,
            })
        }
        ItemKind::Accommodation => StructuredItem::Accommodation(AccommodationItem {
            name,
            item_type: record.item_type.trim().to_string(),
            price_range: record.price_range.trim().to_string(),
            description,
        }),
    })
}
