//! Normalization of loosely-typed form input.
//!
//! Character forms submit every field as a string, so an untouched optional
//! field arrives as `""`. Those are stored as NULL.

/// Map an empty string to `None`. Whitespace-only strings are kept.
pub fn empty_as_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Character count as the user sees it (not UTF-8 byte length).
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// `deserialize_with` helper for optional integer fields.
///
/// Accepts a JSON integer, a numeric string, an empty string or `null`.
/// Use together with `#[serde(default)]` so a missing field is `None`.
pub mod optional_int {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Int(n)) => i32::try_from(n)
                .map(Some)
                .map_err(|_| D::Error::custom(format!("integer {n} is out of range"))),
            Some(Raw::Text(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse::<i32>()
                    .map(Some)
                    .map_err(|_| D::Error::custom(format!("'{text}' is not an integer")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "optional_int::deserialize")]
        age: Option<i32>,
    }

    fn parse(json: &str) -> Result<Form, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn empty_string_becomes_none() {
        assert_eq!(empty_as_none(Some(String::new())), None);
        assert_eq!(empty_as_none(None), None);
        assert_eq!(empty_as_none(Some(" ".into())), Some(" ".into()));
        assert_eq!(empty_as_none(Some("Tokyo".into())), Some("Tokyo".into()));
    }

    #[test]
    fn char_len_counts_code_points() {
        assert_eq!(char_len("初音ミク"), 4);
        assert_eq!(char_len("Miku"), 4);
    }

    #[test]
    fn optional_int_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse(r#"{"age": 16}"#).unwrap().age, Some(16));
        assert_eq!(parse(r#"{"age": "17"}"#).unwrap().age, Some(17));
        assert_eq!(parse(r#"{"age": " 18 "}"#).unwrap().age, Some(18));
    }

    #[test]
    fn optional_int_maps_blank_and_missing_to_none() {
        assert_eq!(parse(r#"{"age": ""}"#).unwrap().age, None);
        assert_eq!(parse(r#"{"age": null}"#).unwrap().age, None);
        assert_eq!(parse("{}").unwrap().age, None);
    }

    #[test]
    fn optional_int_rejects_garbage() {
        assert!(parse(r#"{"age": "sixteen"}"#).is_err());
        assert!(parse(r#"{"age": 99999999999}"#).is_err());
    }
}
