use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::any::TypeId;
use travel_parser_rs::{record_schema, RecordSchema};

/// A guidebook entry suggested alongside a destination.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[record_schema(name = "guidebook_entry")]
#[serde(rename_all = "camelCase")]
struct GuidebookEntry {
    /// Title printed on the cover
    book_title: String,
    /// Year of the latest edition
    #[serde(default)]
    edition_year: Option<u32>,
    #[serde(rename = "pages")]
    page_count: u32,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[allow(dead_code)]
#[record_schema(description = "Packing list item")]
struct PackingItem {
    label: String,
}

/// Opening hours for a sight.
#[derive(Debug, Deserialize, JsonSchema)]
#[allow(dead_code)]
#[record_schema]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct OpeningHours {
    /// Local time the doors open
    opens_at: String,
    closes_at: String,
}

#[test]
fn generated_handle_describes_the_type() {
    let handle = GuidebookEntry::schema();
    assert_eq!(handle.schema_name(), "guidebook_entry");
    assert_eq!(handle.type_name(), "GuidebookEntry");
    assert_eq!(handle.type_id(), TypeId::of::<GuidebookEntry>());

    let names = handle.property_names();
    assert!(names.contains(&"bookTitle"));
    assert!(names.contains(&"editionYear"));
    assert!(names.contains(&"pages"));
}

#[test]
fn doc_comments_reach_the_schema() {
    let schema = GuidebookEntry::schema().schema_json();
    assert_eq!(
        schema["description"],
        "A guidebook entry suggested alongside a destination."
    );
    assert_eq!(
        schema["properties"]["bookTitle"]["description"],
        "Title printed on the cover"
    );
}

#[test]
fn explicit_description_and_default_name() {
    let handle = PackingItem::schema();
    assert_eq!(handle.schema_name(), "PackingItem");
    assert_eq!(handle.schema_json()["description"], "Packing list item");
}

#[test]
fn handle_is_built_once() {
    let first = GuidebookEntry::schema() as *const _;
    let second = GuidebookEntry::schema() as *const _;
    assert_eq!(first, second);
}

#[test]
fn generated_record_deserializes_through_its_handle() {
    let payload = json!({ "bookTitle": "Lonely Planet Japan", "pages": 912 });
    let entry: GuidebookEntry =
        travel_parser_rs::types::deserialize_record_payload(&payload, GuidebookEntry::schema())
            .unwrap();
    assert_eq!(entry.book_title, "Lonely Planet Japan");
    assert_eq!(entry.edition_year, None);
    assert_eq!(entry.page_count, 912);
}

#[test]
fn screaming_snake_fields_keep_their_docs() {
    let handle = OpeningHours::schema();
    assert_eq!(handle.schema_name(), "OpeningHours");
    let names = handle.property_names();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"OPENS_AT") && names.contains(&"CLOSES_AT"));
    assert_eq!(
        handle.schema_json()["properties"]["OPENS_AT"]["description"],
        "Local time the doors open"
    );
    assert_eq!(handle.schema_json()["description"], "Opening hours for a sight.");
}
