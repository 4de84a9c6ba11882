pub mod json_payload;
pub mod prompts;

pub use json_payload::decode_destinations;
pub use prompts::{
    extract_preferences_from_prompt, generate_itinerary_prompt,
    generate_json_recommendation_prompt, generate_preferences_prompt,
    generate_recommendation_prompt, RECOMMENDATION_SYSTEM_PROMPT,
};
