//! Identity handling for authenticated requests
//!
//! The platform identifies a logged-in browser session by its cookies. This
//! module parses the raw cookie string copied from a browser and exposes the
//! `a1` cookie that the signing oracle needs.

mod cookies;

pub use cookies::{Identity, TOKEN_COOKIE};

use thiserror::Error;

/// Errors raised while parsing or reading an identity
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("cookie segment '{0}' has no '=' delimiter")]
    MissingDelimiter(String),

    #[error("cookie string is empty")]
    Empty,

    #[error("required cookie '{0}' is missing")]
    MissingToken(String),
}
