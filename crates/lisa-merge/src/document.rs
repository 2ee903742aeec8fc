//! Parsing and canonical rendering of JSON documents

use serde_json::Value;

use crate::{Error, Object, Result};

/// Parse `text` as a JSON document whose root is an object.
///
/// `label` names the document in error messages (usually a path).
pub fn parse_object(text: &str, label: &str) -> Result<Object> {
    let value: Value = serde_json::from_str(text).map_err(|source| Error::Parse {
        label: label.to_string(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::NotAnObject {
            label: label.to_string(),
        }),
    }
}

/// Canonical form used for change detection: 2-space pretty JSON, keys in
/// document order.
pub fn render(object: &Object) -> String {
    format!("{:#}", Value::Object(object.clone()))
}

/// File contents for a written document: canonical form plus a trailing newline.
pub fn render_file(object: &Object) -> String {
    let mut out = render(object);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_object_keeps_key_order() {
        let obj = parse_object(r#"{"z": 1, "a": 2, "m": 3}"#, "test.json").unwrap();
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_parse_object_rejects_array_root() {
        let err = parse_object("[1, 2]", "list.json").unwrap_err();
        assert!(matches!(err, Error::NotAnObject { ref label } if label == "list.json"));
    }

    #[test]
    fn test_parse_object_reports_label_on_syntax_error() {
        let err = parse_object("{ not json", "broken.json").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_render_is_two_space_pretty() {
        let obj = parse_object(r#"{"a":{"b":[1,2]}}"#, "x").unwrap();
        assert_eq!(
            render(&obj),
            "{\n  \"a\": {\n    \"b\": [\n      1,\n      2\n    ]\n  }\n}"
        );
    }

    #[test]
    fn test_render_file_ends_with_newline() {
        let obj = parse_object(r#"{"a": true}"#, "x").unwrap();
        assert!(render_file(&obj).ends_with("}\n"));
    }
}
