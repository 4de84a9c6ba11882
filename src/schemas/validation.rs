use crate::{error::TravelError, schemas::SchemaHandle};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

const MAX_SCHEMA_ERRORS: usize = 3;

/// Validate a JSON payload against a record schema.
///
/// At most three violations are reported; the rest are summarised.
pub fn validate_payload(schema: &SchemaHandle, payload: &Value) -> Result<(), TravelError> {
    let validator = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema.schema_json())
        .map_err(|err| {
            TravelError::Validation(format!(
                "Failed to prepare `{}` schema for validation: {}",
                schema.schema_name(),
                err
            ))
        })?;

    if let Err(errors) = validator.validate(payload) {
        let mut details = Vec::new();
        let mut truncated = false;

        for (idx, error) in errors.enumerate() {
            if idx < MAX_SCHEMA_ERRORS {
                let mut path = error.instance_path.to_string();
                if path.is_empty() {
                    path = "<root>".to_string();
                }
                details.push(format!("{}: {}", path, error));
            } else {
                truncated = true;
                break;
            }
        }

        let mut detail_str = if details.is_empty() {
            "payload failed schema validation".to_string()
        } else {
            details.join("; ")
        };

        if truncated {
            detail_str.push_str("; additional errors truncated");
        }

        return Err(TravelError::Validation(format!(
            "Payload does not match `{}` schema: {}",
            schema.schema_name(),
            detail_str
        )));
    }

    Ok(())
}

/// Instruction block asking the model to answer with JSON matching `schema`.
pub fn schema_instructions(schema: &SchemaHandle, as_array: bool) -> String {
    let shape = if as_array {
        format!("a JSON array of `{}` objects", schema.schema_name())
    } else {
        format!("a single `{}` JSON object", schema.schema_name())
    };

    format!(
        "Structured response requirement: respond with {} that strictly conforms to this JSON schema, with no prose before or after it.\n{}",
        shape,
        schema.to_pretty_string()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::RecordSchema;
    use crate::types::Destination;
    use serde_json::json;

    #[test]
    fn accepts_well_formed_destination() {
        let payload = json!({
            "name": "Porto, Portugal",
            "placesToVisit": [{ "name": "Ribeira", "description": "riverside" }]
        });
        assert!(validate_payload(Destination::schema(), &payload).is_ok());
    }

    #[test]
    fn rejects_wrong_types_with_path() {
        let payload = json!({ "name": 12, "restaurants": "none" });
        let err = validate_payload(Destination::schema(), &payload).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("`destination`"));
        assert!(message.contains("/name") || message.contains("/restaurants"));
    }

    #[test]
    fn instructions_embed_schema() {
        let text = schema_instructions(Destination::schema(), true);
        assert!(text.contains("JSON array of `destination` objects"));
        assert!(text.contains("placesToVisit"));
    }
}
