use crate::UrlError;
use url::Url;

/// Default `xsec_source` for note, posted and collected lookups
pub const SOURCE_SEARCH: &str = "pc_search";

/// Default `xsec_source` for liked-note lookups
pub const SOURCE_USER: &str = "pc_user";

/// Resource id and security tokens carried by a platform URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTokens {
    /// Final path segment of the URL (note id or user id)
    pub resource_id: String,

    /// `xsec_token` query value, empty when absent
    pub security_token: String,

    /// `xsec_source` query value, or the call site's default
    pub security_source: String,
}

/// Extracts the resource id and security tokens from a platform URL
///
/// The query string is split on `&` and then on the first `=` of each pair.
/// Values are forwarded verbatim, without percent-decoding, because the
/// platform expects them back exactly as it issued them. Unknown keys are
/// ignored.
///
/// # Arguments
///
/// * `url` - A note or profile URL
/// * `default_source` - `xsec_source` used when the URL carries none
///
/// # Examples
///
/// ```
/// use xhs_crawler::url::{extract_tokens, SOURCE_SEARCH};
///
/// let tokens = extract_tokens("https://host/x/abc123?xsec_token=T1&xsec_source=pc_user", SOURCE_SEARCH).unwrap();
/// assert_eq!(tokens.resource_id, "abc123");
/// assert_eq!(tokens.security_token, "T1");
/// assert_eq!(tokens.security_source, "pc_user");
/// ```
pub fn extract_tokens(url: &str, default_source: &str) -> Result<UrlTokens, UrlError> {
    let parsed = Url::parse(url).map_err(|e| UrlError::Parse(format!("{}: {}", url, e)))?;

    let resource_id = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| UrlError::MissingResourceId(url.to_string()))?
        .to_string();

    let mut security_token = String::new();
    let mut security_source = None;

    for pair in parsed.query().unwrap_or("").split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match key {
            "xsec_token" => security_token = value.to_string(),
            "xsec_source" => security_source = Some(value.to_string()),
            _ => {}
        }
    }

    Ok(UrlTokens {
        resource_id,
        security_token,
        security_source: security_source.unwrap_or_else(|| default_source.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_full_url() {
        let tokens = extract_tokens(
            "https://host/x/abc123?xsec_token=T1&xsec_source=pc_user",
            SOURCE_SEARCH,
        )
        .unwrap();

        assert_eq!(
            tokens,
            UrlTokens {
                resource_id: "abc123".to_string(),
                security_token: "T1".to_string(),
                security_source: "pc_user".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_query_uses_call_site_default() {
        let tokens = extract_tokens("https://host/x/abc123", SOURCE_SEARCH).unwrap();
        assert_eq!(tokens.resource_id, "abc123");
        assert_eq!(tokens.security_token, "");
        assert_eq!(tokens.security_source, "pc_search");

        let tokens = extract_tokens("https://host/x/abc123", SOURCE_USER).unwrap();
        assert_eq!(tokens.security_source, "pc_user");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let tokens = extract_tokens(
            "https://www.xiaohongshu.com/user/profile/5f00?channel_type=web&xsec_token=AB%3D&foo",
            SOURCE_USER,
        )
        .unwrap();

        assert_eq!(tokens.resource_id, "5f00");
        assert_eq!(tokens.security_token, "AB%3D");
        assert_eq!(tokens.security_source, "pc_user");
    }

    #[test]
    fn test_token_keeps_everything_after_first_equals() {
        let tokens = extract_tokens("https://host/explore/n1?xsec_token=ab==", SOURCE_SEARCH).unwrap();
        assert_eq!(tokens.security_token, "ab==");
    }

    #[test]
    fn test_missing_resource_id() {
        let result = extract_tokens("https://host/", SOURCE_SEARCH);
        assert!(matches!(result, Err(UrlError::MissingResourceId(_))));

        let result = extract_tokens("not a url", SOURCE_SEARCH);
        assert!(matches!(result, Err(UrlError::Parse(_))));
    }
}
