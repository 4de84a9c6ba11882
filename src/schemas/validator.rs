use crate::{
    schemas::{validation::validate_payload, SchemaHandle},
    Result, TravelError,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Validation strategies for model-emitted JSON records
#[derive(Debug, Clone, Default)]
pub enum Validator {
    /// Fast validation using serde
    #[default]
    SerdeFirst,
    /// Check against the JSON schema before deserializing
    Strict(SchemaHandle),
}

impl Validator {
    /// Strict validator for a record type's own schema
    pub fn strict_for(schema: &SchemaHandle) -> Self {
        Validator::Strict(schema.clone())
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, Validator::Strict(_))
    }

    /// Validate and deserialize a value into type T
    pub fn validate<T: DeserializeOwned>(&self, value: Value) -> Result<T> {
        match self {
            Validator::SerdeFirst => serde_first_validate(value),
            Validator::Strict(schema) => {
                validate_payload(schema, &value)?;
                serde_first_validate(value)
            }
        }
    }
}

fn serde_first_validate<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_path_to_error::deserialize(value).map_err(|e| {
        TravelError::Validation(format!("Record validation failed at {}: {}", e.path(), e))
    })
}
