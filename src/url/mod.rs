//! URL handling for platform resources
//!
//! This module extracts resource ids and security tokens from note and
//! profile URLs, builds note URLs from search results, and rewrites CDN
//! image URLs to their origin form.

mod image;
mod tokens;

pub use image::original_image_url;
pub use tokens::{extract_tokens, UrlTokens, SOURCE_SEARCH, SOURCE_USER};

use serde_json::Value;

/// Web host serving note pages
pub const WEB_BASE_URL: &str = "https://www.xiaohongshu.com";

/// Builds the explore URL of a note
///
/// # Examples
///
/// ```
/// use xhs_crawler::url::note_url;
///
/// assert_eq!(
///     note_url("6650a1", "ABtoken"),
///     "https://www.xiaohongshu.com/explore/6650a1?xsec_token=ABtoken"
/// );
/// ```
pub fn note_url(note_id: &str, security_token: &str) -> String {
    format!(
        "{}/explore/{}?xsec_token={}",
        WEB_BASE_URL, note_id, security_token
    )
}

/// Maps note search results to explore URLs
///
/// Search pages mix notes with other cards (e.g. "hot queries"); only
/// items whose `model_type` is `note` are kept, in order.
pub fn search_result_note_urls(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter(|item| item.get("model_type").and_then(Value::as_str) == Some("note"))
        .filter_map(|item| {
            let id = item.get("id").and_then(Value::as_str)?;
            let token = item
                .get("xsec_token")
                .and_then(Value::as_str)
                .unwrap_or_default();
            Some(note_url(id, token))
        })
        .collect()
}
