//! travel-parser-rs: structured records from free-text travel recommendations
//!
//! Language models asked for travel advice answer in loosely formatted prose:
//! numbered destination headers, dashed section headings and bulleted items.
//! This crate turns that text into typed [`Destination`] records and turns
//! generated itineraries into [`RoutePlan`]s. Parsing is total: malformed
//! input degrades to empty fields or an empty list, never to an error.
//!
//! # Quick Start
//!
//! ```rust
//! use travel_parser_rs::RecommendationParser;
//!
//! let text = "1. Porto, Portugal\n\
//! Riverside city of port wine.\n\
//! - Restaurants:\n\
//! • Cervejaria Ribeiro - Seafood - grilled sardines (mid-range)\n";
//!
//! let result = RecommendationParser::new().parse(text);
//! assert_eq!(result.destinations.len(), 1);
//! assert_eq!(result.destinations[0].restaurants[0].price_range, "mid-range");
//! ```

extern crate self as travel_parser_rs;

pub mod core;
pub mod error;
pub mod schemas;
pub mod services;
pub mod types;

pub use self::core::{parse_itinerary, parse_recommendation, ParserConfig, RecommendationParser};
pub use error::{Result, TravelError};
pub use schemas::validator::Validator;
pub use schemas::{schema_type_name, RecordSchema, SchemaHandle};
pub use services::prompts;
pub use travel_parser_macros::record_schema;
pub use types::{
    AccommodationItem, Day, Destination, Item, ItemKind, ParseResult, ParseSource, ParseStats,
    RestaurantItem, RoutePlan, TimeBlock,
};

pub use schemars;
pub use schemas as schema;

#[cfg(feature = "cli")]
pub mod cli;
