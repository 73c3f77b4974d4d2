use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse a JSON object argument into a field map.
pub fn parse_fields(raw: &str) -> anyhow::Result<serde_json::Map<String, serde_json::Value>> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => anyhow::bail!("invalid fields: expected a JSON object"),
        Err(error) => anyhow::bail!("invalid fields JSON: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use tally_core::enums::{AuditAction, CommentStatus};

    use super::{parse_enum, parse_fields};

    #[test]
    fn parses_snake_case_enum() {
        let status: CommentStatus = parse_enum("answered", "status").expect("status should parse");
        assert_eq!(status, CommentStatus::Answered);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let action: AuditAction =
            parse_enum("suggestion-applied", "action").expect("action should parse");
        assert_eq!(action, AuditAction::SuggestionApplied);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<CommentStatus>("reopened", "status").expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'reopened'"));
    }

    #[test]
    fn fields_must_be_an_object() {
        let map = parse_fields(r#"{"status": "planning"}"#).expect("object should parse");
        assert_eq!(map["status"], "planning");
        assert!(parse_fields("[1, 2]").is_err());
        assert!(parse_fields("{oops").is_err());
    }
}
