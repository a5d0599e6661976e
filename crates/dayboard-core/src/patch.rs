//! Serde helpers for partial-update payloads.
//!
//! PATCH bodies need three states per nullable field: absent (leave
//! unchanged), explicit `null` (clear), and a value (set). Plain
//! `Option<T>` collapses the first two, so nullable fields deserialize as
//! `Option<Option<T>>` via [`double_option`] combined with
//! `#[serde(default)]`.

use serde::{Deserialize, Deserializer};

/// Deserialize a field that was present in the payload, keeping `null`
/// distinct from absence.
///
/// Absent fields never reach this function (serde uses the `default`
/// attribute instead), so presence always maps to `Some(..)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        #[serde(default, deserialize_with = "super::double_option")]
        description: Option<Option<String>>,
    }

    #[test]
    fn absent_field_is_none() {
        let p: Payload = serde_json::from_str("{}").unwrap();
        assert_eq!(p.description, None);
    }

    #[test]
    fn explicit_null_is_some_none() {
        let p: Payload = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(p.description, Some(None));
    }

    #[test]
    fn value_is_some_some() {
        let p: Payload = serde_json::from_str(r#"{"description": "notes"}"#).unwrap();
        assert_eq!(p.description, Some(Some("notes".to_string())));
    }
}
