use serde_json::Value;

use super::traits::{HandlerError, ProgressReporter, TaskHandler, decode_payload};
use super::types::{ParseJsonPayload, ParseOptions};
use crate::protocol::TaskType;

/// `options.type` value that turns on catalog validation
pub const STAC_CATALOG_KIND: &str = "stac-catalog";

#[derive(Debug, Clone, Default)]
pub struct ParseJsonHandler;

impl TaskHandler for ParseJsonHandler {
    fn task_type(&self) -> TaskType {
        TaskType::ParseLargeJson
    }

    fn handle(
        &self,
        data: Value,
        _progress: &mut dyn ProgressReporter,
    ) -> Result<Value, HandlerError> {
        let payload: ParseJsonPayload = decode_payload(self.task_type(), data)?;
        parse_large_json(&payload.json_string, &payload.options.unwrap_or_default())
    }
}

/// Parse a JSON document, optionally checking it is a minimal STAC catalog
pub fn parse_large_json(json: &str, options: &ParseOptions) -> Result<Value, HandlerError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| HandlerError::JsonParse(e.to_string()))?;

    if options.validate
        && options.kind.as_deref() == Some(STAC_CATALOG_KIND)
        && !is_stac_catalog(&value)
    {
        return Err(HandlerError::InvalidCatalog);
    }

    Ok(value)
}

/// `type == "Catalog"`, non-empty `id` and `description`, array `links`
pub fn is_stac_catalog(value: &Value) -> bool {
    let non_empty = |key: &str| value.get(key).and_then(Value::as_str).is_some_and(|s| !s.is_empty());

    value.get("type").and_then(Value::as_str) == Some("Catalog")
        && non_empty("id")
        && non_empty("description")
        && value.get("links").is_some_and(Value::is_array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validating() -> ParseOptions {
        ParseOptions {
            validate: true,
            kind: Some(STAC_CATALOG_KIND.into()),
        }
    }

    const CATALOG: &str =
        r#"{"type": "Catalog", "id": "root", "description": "Root catalog", "links": []}"#;

    #[test]
    fn test_parses_any_json_without_validation() {
        let value = parse_large_json("[1, 2, {\"a\": null}]", &ParseOptions::default()).unwrap();
        assert_eq!(value, json!([1, 2, {"a": null}]));
    }

    #[test]
    fn test_parse_failure_message() {
        let err = parse_large_json("{\"a\": ", &ParseOptions::default()).unwrap_err();
        assert!(err.to_string().starts_with("JSON parsing failed: "), "{err}");
    }

    #[test]
    fn test_valid_catalog_passes() {
        let value = parse_large_json(CATALOG, &validating()).unwrap();
        assert_eq!(value["id"], "root");
    }

    #[test]
    fn test_invalid_catalog_rejected() {
        for doc in [
            r#"{"type": "Collection", "id": "root", "description": "d", "links": []}"#,
            r#"{"type": "Catalog", "id": "", "description": "d", "links": []}"#,
            r#"{"type": "Catalog", "id": "root", "links": []}"#,
            r#"{"type": "Catalog", "id": "root", "description": "d", "links": {}}"#,
            "[]",
        ] {
            let err = parse_large_json(doc, &validating()).unwrap_err();
            assert_eq!(err.to_string(), "Invalid STAC catalog structure", "{doc}");
        }
    }

    #[test]
    fn test_validation_needs_catalog_kind() {
        let options = ParseOptions {
            validate: true,
            kind: Some("geojson".into()),
        };
        assert!(parse_large_json("{}", &options).is_ok());
    }

    #[test]
    fn test_handler() {
        let output = ParseJsonHandler
            .handle(
                json!({"jsonString": CATALOG, "options": {"validate": true, "type": "stac-catalog"}}),
                &mut |_: u8| {},
            )
            .unwrap();
        assert_eq!(output["type"], "Catalog");
    }
}
