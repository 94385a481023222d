//! JSON schema validators for patchrelay DTOs.
//!
//! Schemas are generated in-process from the schemars derives on the
//! DTOs themselves, so the validators cannot drift from the types they
//! check.

use jsonschema::Validator;
use patchrelay_types::{ChangeSet, ReportDocument};

/// Error type for schema validation failures.
#[derive(Debug)]
pub struct SchemaValidationError {
    /// The validation errors.
    pub errors: Vec<String>,
}

impl std::fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Schema validation failed: {}", self.errors.join("; "))
    }
}

impl std::error::Error for SchemaValidationError {}

/// Build a validator for the ChangeSet JSON schema.
pub fn changeset_validator() -> Validator {
    let schema = serde_json::to_value(schemars::schema_for!(ChangeSet))
        .expect("ChangeSet schema should serialize");
    jsonschema::validator_for(&schema).expect("ChangeSet schema should compile")
}

/// Build a validator for the ReportDocument JSON schema.
pub fn report_validator() -> Validator {
    let schema = serde_json::to_value(schemars::schema_for!(ReportDocument))
        .expect("ReportDocument schema should serialize");
    jsonschema::validator_for(&schema).expect("ReportDocument schema should compile")
}

/// Validate a ChangeSet against its JSON schema.
///
/// # Returns
///
/// - `Ok(())` if the change set is valid
/// - `Err(SchemaValidationError)` with details if validation fails
pub fn validate_change_set(set: &ChangeSet) -> Result<(), SchemaValidationError> {
    let json = serde_json::to_value(set).expect("ChangeSet should serialize to JSON");
    validate_with_schema(&changeset_validator(), &json)
}

/// Validate a ReportDocument against its JSON schema.
///
/// # Returns
///
/// - `Ok(())` if the document is valid
/// - `Err(SchemaValidationError)` with details if validation fails
pub fn validate_report_document(doc: &ReportDocument) -> Result<(), SchemaValidationError> {
    let json = serde_json::to_value(doc).expect("ReportDocument should serialize to JSON");
    validate_with_schema(&report_validator(), &json)
}

/// Validate any JSON value against the ChangeSet schema.
pub fn validate_changeset_json(json: &serde_json::Value) -> Result<(), SchemaValidationError> {
    validate_with_schema(&changeset_validator(), json)
}

/// Validate any JSON value against the ReportDocument schema.
pub fn validate_report_json(json: &serde_json::Value) -> Result<(), SchemaValidationError> {
    validate_with_schema(&report_validator(), json)
}

fn validate_with_schema(
    validator: &Validator,
    json: &serde_json::Value,
) -> Result<(), SchemaValidationError> {
    let errors: Vec<String> = validator.iter_errors(json).map(|e| e.to_string()).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaValidationError { errors })
    }
}

/// Check if a string is in snake_case format.
///
/// Snake case rules:
/// - Only lowercase letters, digits, and underscores
/// - Must not start or end with underscore
/// - No consecutive underscores
pub fn is_snake_case(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.is_empty() || bytes[0] == b'_' || bytes[bytes.len() - 1] == b'_' {
        return false;
    }

    let mut prev_was_underscore = false;
    for &b in bytes {
        match b {
            b'_' if prev_was_underscore => return false,
            b'_' => prev_was_underscore = true,
            b'a'..=b'z' | b'0'..=b'9' => prev_was_underscore = false,
            _ => return false,
        }
    }
    true
}

/// Recursively collect all field names from a JSON value.
pub fn collect_field_names(value: &serde_json::Value) -> Vec<String> {
    let mut names = Vec::new();
    walk_field_names(value, &mut names);
    names
}

fn walk_field_names(value: &serde_json::Value, names: &mut Vec<String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map {
                names.push(key.clone());
                walk_field_names(val, names);
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                walk_field_names(item, names);
            }
        }
        _ => {}
    }
}

/// Verify all field names in a JSON value are snake_case.
///
/// # Returns
///
/// - `Ok(())` if all field names are snake_case
/// - `Err(Vec<String>)` with the non-snake_case field names
pub fn verify_snake_case_fields(value: &serde_json::Value) -> Result<(), Vec<String>> {
    let offenders: Vec<String> = collect_field_names(value)
        .into_iter()
        .filter(|name| !is_snake_case(name))
        .collect();

    if offenders.is_empty() { Ok(()) } else { Err(offenders) }
}
