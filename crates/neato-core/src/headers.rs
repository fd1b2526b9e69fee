//! Multi-valued header set carried by sessions and signed requests.
//!
//! Names are kept as given and ordered; lookups ignore ASCII case so that a
//! header restored from a config file as `authorization` still matches.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// An ordered map from header name to one or more values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderSet(BTreeMap<String, Vec<String>>);

impl HeaderSet {
    /// Create an empty header set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every value of `name` with `value`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove(&name);
        self.0.insert(name, vec![value.into()]);
    }

    /// Append `value` to the values of `name`.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        let key = self
            .find_key(name)
            .map_or_else(|| name.to_string(), str::to_string);
        self.0.entry(key).or_default().push(value.into());
    }

    /// First value of `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.find_key(name)
            .and_then(|key| self.0.get(key))
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Remove every value of `name`.
    pub fn remove(&mut self, name: &str) {
        self.0.retain(|key, _| !key.eq_ignore_ascii_case(name));
    }

    /// Returns `true` if no header is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs, one per value.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().flat_map(|(name, values)| {
            values
                .iter()
                .map(move |value| (name.as_str(), value.as_str()))
        })
    }

    /// Convert into a `reqwest` header map.
    ///
    /// # Errors
    ///
    /// Returns `RequestBuild` if a name or value is not a legal HTTP header.
    pub fn to_header_map(&self) -> Result<HeaderMap, TransportError> {
        let mut map = HeaderMap::new();
        for (name, value) in self.iter() {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::RequestBuild(format!("header {name}: {e}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::RequestBuild(format!("header {name}: {e}")))?;
            map.append(header_name, header_value);
        }
        Ok(map)
    }

    fn find_key(&self, name: &str) -> Option<&str> {
        self.0
            .keys()
            .find(|key| key.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, value) in iter {
            let name = name.into();
            set.add(&name, value);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_case_insensitively() {
        let mut headers = HeaderSet::new();
        headers.add("authorization", "Token token=old");
        headers.set("Authorization", "Token token=new");

        assert_eq!(headers.get("AUTHORIZATION"), Some("Token token=new"));
        assert_eq!(headers.iter().count(), 1);
    }

    #[test]
    fn add_keeps_every_value() {
        let headers: HeaderSet = [("X-Trace", "a"), ("x-trace", "b")].into_iter().collect();
        let values: Vec<_> = headers.iter().map(|(_, v)| v).collect();
        assert_eq!(values, ["a", "b"]);
        assert_eq!(headers.get("x-trace"), Some("a"));
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut headers = HeaderSet::new();
        headers.set("Authorization", "Token token=abc");

        let json = serde_json::to_value(&headers).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "Authorization": ["Token token=abc"] })
        );
        let back: HeaderSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, headers);
    }

    #[test]
    fn illegal_value_is_a_build_error() {
        let mut headers = HeaderSet::new();
        headers.set("Authorization", "line\nbreak");
        assert!(matches!(
            headers.to_header_map(),
            Err(TransportError::RequestBuild(_))
        ));
    }
}
