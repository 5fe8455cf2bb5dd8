use serde::{Deserialize, Deserializer};

// `?page=abc` falls back to the first page instead of rejecting the request
pub fn deserialize_lenient_page<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.trim().parse::<u32>().ok()))
}

// informational ids, e.g. the quiz category id: numbers or numeric strings are kept,
// anything else is dropped rather than failing the whole body
pub fn deserialize_lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct PageParams {
        #[serde(default, deserialize_with = "deserialize_lenient_page")]
        page: Option<u32>,
    }

    fn parse(query: &str) -> Option<u32> {
        axum::extract::Query::<PageParams>::try_from_uri(&format!("/q?{query}").parse().unwrap())
            .unwrap()
            .0
            .page
    }

    #[test]
    fn numeric_page_is_parsed() {
        assert_eq!(parse("page=3"), Some(3));
    }

    #[derive(Deserialize)]
    struct IdParams {
        #[serde(default, deserialize_with = "deserialize_lenient_id")]
        id: Option<i64>,
    }

    fn id_of(json: &str) -> Option<i64> {
        serde_json::from_str::<IdParams>(json).unwrap().id
    }

    #[test]
    fn lenient_id_accepts_numbers_and_numeric_strings() {
        assert_eq!(id_of(r#"{"id": 3}"#), Some(3));
        assert_eq!(id_of(r#"{"id": "4"}"#), Some(4));
    }

    #[test]
    fn lenient_id_drops_anything_else() {
        assert_eq!(id_of(r#"{"id": "all"}"#), None);
        assert_eq!(id_of(r#"{"id": {"nested": 1}}"#), None);
        assert_eq!(id_of(r#"{"id": null}"#), None);
        assert_eq!(id_of(r#"{}"#), None);
    }

    #[test]
    fn garbage_page_is_ignored() {
        assert_eq!(parse("page=abc"), None);
        assert_eq!(parse("page=-2"), None);
        assert_eq!(parse(""), None);
    }
}
