//! Boundary contract with the transport layer.
//!
//! The core consumes exactly four things from a request: the path, the context
//! prefix the application is mounted under, the query parameters and the raw
//! body text. The verb is carried alongside so [`Dispatcher::dispatch`](crate::dispatcher::Dispatcher::dispatch)
//! can pick the terminal verb-method.

use http::Method;
use url::form_urlencoded;

/// Query parameters: string keys to ordered values, keys in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` query string.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Append a value, keeping earlier values for the same key.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// First value for `key`, the one used for binding.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.append(k, v);
        }
        params
    }
}

/// One request as the core sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRequest {
    pub method: Method,
    /// Request path without the query string, context prefix included
    pub path: String,
    /// Literal leading part of `path` that is not part of the resource chain
    pub context_prefix: String,
    pub query: QueryParams,
    /// Raw body text; empty when there is none
    pub body: String,
}

impl ExchangeRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            context_prefix: String::new(),
            query: QueryParams::new(),
            body: String::new(),
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Split a raw request target (`/ctx/a/b?x=1&x=2`) into path and query.
    #[must_use]
    pub fn from_target(method: Method, target: &str, context_prefix: &str) -> Self {
        let target = target.split_once('#').map(|(t, _)| t).unwrap_or(target);
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, QueryParams::parse(query)),
            None => (target, QueryParams::new()),
        };
        Self::new(method, path)
            .with_context_prefix(context_prefix)
            .with_query(query)
    }

    #[must_use]
    pub fn with_context_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.context_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Append one query parameter value.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.append(key, value);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_keeps_all_values_in_order() {
        let query = QueryParams::parse("name=John+Doe&tag=a&tag=b&email=j%40x.com");
        assert_eq!(query.first("name"), Some("John Doe"));
        assert_eq!(query.get_all("tag"), ["a", "b"]);
        assert_eq!(query.first("email"), Some("j@x.com"));
        let keys: Vec<&str> = query.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "tag", "email"]);
        assert!(query.get_all("missing").is_empty());
    }

    #[test]
    fn test_from_target_splits_path_and_query() {
        let req = ExchangeRequest::from_target(Method::POST, "/api/com/customer?name=x#frag", "/api");
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "/api/com/customer");
        assert_eq!(req.context_prefix, "/api");
        assert_eq!(req.query.first("name"), Some("x"));
        assert!(req.body.is_empty());
    }

    #[test]
    fn test_builders() {
        let req = ExchangeRequest::get("/a/b")
            .with_param("k", "1")
            .with_param("k", "2")
            .with_body("{}");
        assert_eq!(req.query.get_all("k"), ["1", "2"]);
        assert_eq!(req.body, "{}");
        assert_eq!(req.context_prefix, "");
    }
}
