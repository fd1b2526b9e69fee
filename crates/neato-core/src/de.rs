//! Deserialization helpers for loosely typed service records.

use serde::{Deserialize, Deserializer};

/// Decode `null` the same way as an absent field: as `T::default()`.
///
/// Pair with `#[serde(default)]` so the field may also be missing.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "super::null_as_default")]
        name: String,
        #[serde(default, deserialize_with = "super::null_as_default")]
        tags: Vec<String>,
    }

    #[test]
    fn null_absent_and_present() {
        let null: Record = serde_json::from_value(json!({ "name": null, "tags": null })).unwrap();
        assert_eq!(null.name, "");
        assert!(null.tags.is_empty());

        let absent: Record = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.name, "");

        let present: Record =
            serde_json::from_value(json!({ "name": "Kitchen", "tags": ["maps"] })).unwrap();
        assert_eq!(present.name, "Kitchen");
        assert_eq!(present.tags, ["maps"]);
    }
}
