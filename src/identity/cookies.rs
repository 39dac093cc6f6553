use crate::identity::IdentityError;
use std::collections::BTreeMap;

/// Name of the cookie the signing oracle uses as the identity token
pub const TOKEN_COOKIE: &str = "a1";

/// Parsed browser session cookies
///
/// Immutable once parsed; rebuilding a client re-parses the cookie string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    cookies: BTreeMap<String, String>,
}

impl Identity {
    /// Parses a raw cookie string into an identity
    ///
    /// Both `"name=value; name=value"` and `"name=value;name=value"` are
    /// accepted. When the string contains `"; "` it is split on that,
    /// otherwise on `";"`. Each segment is split on its first `=`; anything
    /// after it (further `=` included) is the value. Empty segments are
    /// skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use xhs_crawler::identity::Identity;
    ///
    /// let spaced = Identity::parse("a1=abc; web_session=x=y").unwrap();
    /// let tight = Identity::parse("a1=abc;web_session=x=y").unwrap();
    /// assert_eq!(spaced, tight);
    /// assert_eq!(spaced.get("web_session"), Some("x=y"));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        let delimiter = if raw.contains("; ") { "; " } else { ";" };

        let mut cookies = BTreeMap::new();
        for segment in raw.split(delimiter) {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            let (name, value) = segment
                .split_once('=')
                .ok_or_else(|| IdentityError::MissingDelimiter(segment.to_string()))?;
            cookies.insert(name.to_string(), value.to_string());
        }

        if cookies.is_empty() {
            return Err(IdentityError::Empty);
        }

        Ok(Self { cookies })
    }

    /// Returns the identity token handed to the signing oracle
    pub fn token(&self) -> Result<&str, IdentityError> {
        self.get(TOKEN_COOKIE)
            .ok_or_else(|| IdentityError::MissingToken(TOKEN_COOKIE.to_string()))
    }

    /// Looks up a single cookie value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Iterates over `(name, value)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Renders the cookies as a `Cookie` header value
    pub fn cookie_header(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
