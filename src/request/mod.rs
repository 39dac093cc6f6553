//! Signed request construction
//!
//! Every API call goes through [`RequestBuilder::build`], which serializes
//! the body, asks the signing oracle for a fresh signature triple, draws new
//! trace ids and merges them into a fixed header template.

mod builder;
mod headers;

pub use builder::RequestBuilder;
pub use headers::{api_headers, page_headers, SIGNATURE_HEADERS, TRACE_HEADERS};

use crate::identity::Identity;
use reqwest::Method;
use std::collections::BTreeMap;

/// A fully signed API request, built fresh for every attempt
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// HTTP method
    pub method: Method,

    /// Path relative to the API host, query string included
    pub path: String,

    /// Header map (cookies excluded)
    pub headers: BTreeMap<String, String>,

    /// Compact JSON body
    pub body: Option<String>,

    /// Session cookies, sent by the transport
    pub cookies: Identity,
}

/// Appends raw query parameters to a path
///
/// Values are not percent-encoded: the platform signs the path exactly as
/// it appears on the wire, and callers encode free text themselves.
///
/// # Examples
///
/// ```
/// use xhs_crawler::request::splice_query;
///
/// let path = splice_query("/api/list", &[("num", "30"), ("cursor", "")]);
/// assert_eq!(path, "/api/list?num=30&cursor=");
/// assert_eq!(splice_query("/api/me", &[]), "/api/me");
/// ```
pub fn splice_query(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }

    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", path, query)
}

/// Percent-encodes free text for use in a query value
///
/// Spaces become `%20` rather than `+`.
pub fn encode_query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
