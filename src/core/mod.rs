pub mod config;
pub mod fields;
pub mod merger;
pub mod parser;
pub mod route_days;
pub mod segmenter;
pub mod structurer;
pub mod tokenizer;

pub use config::ParserConfig;
pub use fields::{extract_fields, RawFields, SectionKind};
pub use merger::{merge_destinations, MergeOutcome};
pub use parser::{parse_itinerary, parse_recommendation, RecommendationParser};
pub use route_days::{decompose_day, decompose_route, split_days, DayBlock};
pub use segmenter::{segment, DestinationBlock, Segmentation};
pub use structurer::{
    structure_accommodation, structure_activity, structure_item, structure_place,
    structure_restaurant,
};
pub use tokenizer::tokenize;
