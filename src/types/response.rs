use std::any::{type_name, TypeId};

use serde_json::Value;

use crate::{
    error::{Result, TravelError},
    schemas::{RecordSchema, SchemaHandle},
};

/// A JSON value paired with the schema it is supposed to satisfy.
#[derive(Clone, Debug)]
pub struct RecordPayload {
    schema: SchemaHandle,
    value: Value,
}

impl RecordPayload {
    pub fn new(schema: SchemaHandle, value: Value) -> Self {
        Self { schema, value }
    }

    pub fn schema(&self) -> &SchemaHandle {
        &self.schema
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_inner(self) -> (SchemaHandle, Value) {
        (self.schema, self.value)
    }

    pub fn deserialize<T>(&self) -> Result<T>
    where
        T: RecordSchema,
    {
        deserialize_record_payload::<T>(&self.value, &self.schema)
    }
}

/// Deserialize `payload` into `T`, reporting the JSON path of the first failure.
pub fn deserialize_record_payload<T>(payload: &Value, schema: &SchemaHandle) -> Result<T>
where
    T: RecordSchema,
{
    ensure_schema_matches::<T>(schema)?;

    let raw = payload.to_string();
    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        TravelError::Validation(format!(
            "failed to deserialize `{}` at {}: {}",
            schema.schema_name(),
            location,
            err
        ))
    })?;

    Ok(value)
}

fn ensure_schema_matches<T: 'static>(schema: &SchemaHandle) -> Result<()> {
    let expected = TypeId::of::<T>();
    if schema.type_id() != expected {
        return Err(TravelError::Validation(format!(
            "schema `{}` does not match target type `{}`",
            schema.schema_name(),
            type_name::<T>(),
        )));
    }
    Ok(())
}
