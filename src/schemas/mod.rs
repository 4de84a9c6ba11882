pub mod schema;
pub mod validation;
pub mod validator;

pub use schema::{apply_doc_comments, schema_type_name, RecordSchema, SchemaHandle};
pub use validation::{schema_instructions, validate_payload};
pub use validator::Validator;
