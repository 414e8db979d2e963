//! Argument checking against tool input schemas.
//!
//! Arguments are checked before deserialization so that shape errors name
//! the offending field instead of surfacing a raw serde message.

use rmcp::model::JsonObject;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ToolError;

/// Accept `null` as "no arguments"; anything but an object is rejected.
pub fn into_object(arguments: Value) -> Result<JsonObject, ToolError> {
    match arguments {
        Value::Null => Ok(JsonObject::new()),
        Value::Object(map) => Ok(map),
        other => Err(ToolError::invalid_arguments(
            "arguments",
            format!("expected an object, got {}", json_type(&other)),
        )),
    }
}

/// Check required fields and declared property types.
///
/// Only the top-level `required` list and `type` keywords are enforced;
/// properties without a `type` accept anything.
pub fn check_against_schema(schema: &JsonObject, arguments: &JsonObject) -> Result<(), ToolError> {
    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if arguments.get(field).is_none_or(Value::is_null) {
                return Err(ToolError::invalid_arguments(field, "missing required field"));
            }
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };

    for (field, value) in arguments {
        let Some(declared) = properties.get(field).and_then(|p| p.get("type")) else {
            continue;
        };
        let allowed: Vec<&str> = match declared {
            Value::String(t) => vec![t.as_str()],
            Value::Array(types) => types.iter().filter_map(Value::as_str).collect(),
            _ => continue,
        };
        if !allowed.iter().any(|t| matches_type(value, t)) {
            return Err(ToolError::invalid_arguments(
                field.as_str(),
                format!("expected {}, got {}", allowed.join(" or "), json_type(value)),
            ));
        }
    }

    Ok(())
}

/// Check `arguments` against `schema`, then deserialize them into `P`.
pub fn parse<P: DeserializeOwned>(schema: &JsonObject, arguments: JsonObject) -> Result<P, ToolError> {
    check_against_schema(schema, &arguments)?;
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments("arguments", e.to_string()))
}

fn matches_type(value: &Value, declared: &str) -> bool {
    match declared {
        "string" => value.is_string(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        "number" => value.is_number(),
        "integer" => {
            value.is_i64() || value.is_u64() || value.as_f64().is_some_and(|f| f.fract() == 0.0)
        }
        // Unknown type keywords are not enforced.
        _ => true,
    }
}

/// JSON type name of a value, as used in schema `type` keywords.
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    fn schema() -> JsonObject {
        object(json!({
            "type": "object",
            "properties": {
                "path": { "type": "string" },
                "limit": { "type": "integer" },
                "note": { "type": ["string", "null"] },
                "body": {}
            },
            "required": ["path"]
        }))
    }

    #[test]
    fn test_missing_required_field() {
        let err = check_against_schema(&schema(), &object(json!({ "limit": 3 }))).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { ref field, .. } if field == "path"));

        let err = check_against_schema(&schema(), &object(json!({ "path": null }))).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { ref field, .. } if field == "path"));
    }

    #[test]
    fn test_wrong_type_names_field() {
        let err =
            check_against_schema(&schema(), &object(json!({ "path": "/a", "limit": "ten" })))
                .unwrap_err();
        match err {
            ToolError::InvalidArguments { field, message } => {
                assert_eq!(field, "limit");
                assert_eq!(message, "expected integer, got string");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_accepts_valid_and_untyped() {
        let args = object(json!({
            "path": "/a",
            "limit": 2.0,
            "note": null,
            "body": [1, 2],
            "extra": true
        }));
        assert!(check_against_schema(&schema(), &args).is_ok());
    }

    #[test]
    fn test_into_object() {
        assert!(into_object(Value::Null).unwrap().is_empty());
        let err = into_object(json!([1])).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { ref field, .. } if field == "arguments"));
    }
}
