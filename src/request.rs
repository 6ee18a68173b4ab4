use super::*;

/// Minimal view of an incoming HTTP request: the current URI and a
/// query-parameter getter. Implemented by host-framework adapters.
pub trait SortRequest {
    fn uri(&self) -> &str;

    fn get(&self, key: &str) -> Option<&str>;
}

/// Framework-free adapter answering `get` from its own parsed query
/// string. Duplicate keys keep the first value.
#[derive(Debug, Clone)]
pub struct RawRequest {
    uri: String,
    query: Vec<(String, String)>,
}

impl RawRequest {
    pub fn new(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let query = form_urlencoded::parse(query_of(&uri).as_bytes())
            .into_owned()
            .collect();
        Self { uri, query }
    }
}

impl SortRequest for RawRequest {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Splits a URI into its path and raw query string. Absolute URIs lose
/// their scheme and authority; a URI with no path yields an empty path.
pub(crate) fn split_uri(uri: &str) -> (String, String) {
    if uri.contains("://") {
        if let Ok(url) = Url::parse(uri) {
            return (
                url.path().to_owned(),
                url.query().unwrap_or("").to_owned(),
            );
        }
    }
    match uri.split_once('?') {
        Some((path, query)) => (path.to_owned(), query.to_owned()),
        None => (uri.to_owned(), String::new()),
    }
}

fn query_of(uri: &str) -> String {
    split_uri(uri).1
}
