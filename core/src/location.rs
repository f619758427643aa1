//! Navigable locations
//!
//! A [`Location`] is a path plus a query string. The query string is the
//! durable, shareable half of list-page state (`?page=2&search=tea`).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Decoded query string parameters, kept in key order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(BTreeMap<String, String>);

impl Query {
    /// Create an empty query
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Parse `a=1&b=two` (a leading `?` is accepted). Malformed pairs are skipped.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let params = raw
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter_map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                let key = decode(key)?;
                let value = decode(value)?;
                Some((key, value))
            })
            .collect();
        Self(params)
    }

    /// Raw value for `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value for `key` parsed as `T`; `None` when absent or unparsable
    #[must_use]
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|value| value.parse().ok())
    }

    /// Set `key`, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Remove `key`
    pub fn remove(&mut self, key: &str) {
        self.0.remove(key);
    }

    /// Whether no parameters are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn decode(raw: &str) -> Option<String> {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw).ok().map(std::borrow::Cow::into_owned)
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, value)) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}={}", urlencoding::encode(key), urlencoding::encode(value))?;
        }
        Ok(())
    }
}

/// A path plus its query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Path component, always starting with `/`
    pub path: String,
    /// Decoded query parameters
    pub query: Query,
}

impl Location {
    /// Create a location without query parameters
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        Self {
            path,
            query: Query::new(),
        }
    }

    /// Builder-style query parameter
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.set(key, value);
        self
    }

    /// Same path, different query
    #[must_use]
    pub fn with_query_params(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Parse `/path?query`
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('?') {
            Some((path, query)) => Self::new(path).with_query_params(Query::parse(query)),
            None => Self::new(raw),
        }
    }

    /// Path segments without empty parts (`/products/7` → `["products", "7"]`)
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|segment| !segment.is_empty())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_path_and_query() {
        let location = Location::parse("/products?page=2&search=green%20tea&category=");
        assert_eq!(location.path, "/products");
        assert_eq!(location.query.get_parsed::<u32>("page"), Some(2));
        assert_eq!(location.query.get("search"), Some("green tea"));
        assert_eq!(location.query.get("category"), Some(""));
    }

    #[test]
    fn plus_decodes_to_space() {
        let query = Query::parse("?search=green+tea");
        assert_eq!(query.get("search"), Some("green tea"));
    }

    #[test]
    fn display_encodes_values() {
        let location = Location::new("/products")
            .with_query("search", "green tea")
            .with_query("page", "1");
        assert_eq!(location.to_string(), "/products?page=1&search=green%20tea");
    }

    #[test]
    fn unparsable_numbers_are_absent() {
        let query = Query::parse("page=abc");
        assert_eq!(query.get_parsed::<u32>("page"), None);
    }

    #[test]
    fn segments_skip_empty_parts() {
        let location = Location::new("/orders/42/");
        assert_eq!(location.segments().collect::<Vec<_>>(), vec!["orders", "42"]);
    }
}
