pub mod destination;
pub mod preferences;
pub mod response;
pub mod result;
pub mod route_plan;

pub use destination::{
    AccommodationItem, Destination, Item, ItemKind, RestaurantItem, StructuredItem,
};
pub use preferences::{Budget, ExtractedPreferences, TravelPreferences};
pub use response::{deserialize_record_payload, RecordPayload};
pub use result::{ParseResult, ParseSource, ParseStats};
pub use route_plan::{Day, RoutePlan, TimeBlock};
