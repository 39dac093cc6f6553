//! Request signing capabilities
//!
//! The platform rejects API calls that do not carry a valid signature triple
//! (`x-s`, `x-t`, `x-s-common`). Computing it is delegated to a
//! [`SigningOracle`], an opaque capability injected into the client. This
//! module also holds the randomness used for trace ids, so tests can make
//! header contents deterministic.

mod command;

pub use command::CommandOracle;

use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;

/// Alphabet used for random trace ids
const TRACE_ID_ALPHABET: &[u8] = b"abcdef0123456789";

/// Length of the `x-b3-traceid` header value
pub const TRACE_ID_LEN: usize = 16;

/// Errors produced by a signing oracle
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("signer process failed to start: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("signer exited with status {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("signer timed out after {0} seconds")]
    Timeout(u64),

    #[error("signer returned invalid output: {0}")]
    InvalidOutput(String),

    #[error("signer rejected request: {0}")]
    Rejected(String),
}

/// The per-request signature triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub x_s: String,
    pub x_t: String,
    pub x_s_common: String,
}

/// Capability that computes request signatures
///
/// Implementations must be pure with respect to their inputs apart from
/// time-derived fields; the client never caches their output.
#[async_trait]
pub trait SigningOracle: Send + Sync {
    /// Signs a request path (query string included) and its serialized body
    ///
    /// `body` is the compact JSON body, or an empty string for body-less calls.
    async fn sign(&self, path: &str, body: &str, token: &str) -> Result<Signature, SigningError>;

    /// Produces a value for the `x-xray-traceid` header
    async fn xray_trace_id(&self) -> Result<String, SigningError>;
}

/// Source of randomness for trace and search ids
pub trait RandomSource: Send + Sync {
    /// Returns a uniformly distributed index in `0..bound`
    fn next_index(&self, bound: usize) -> usize;
}

/// Thread-local RNG backed random source
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_index(&self, bound: usize) -> usize {
        rand::thread_rng().gen_range(0..bound)
    }
}

/// Generates a lowercase hex id of the given length
///
/// # Examples
///
/// ```
/// use xhs_crawler::signing::{hex_id, ThreadRandom};
///
/// let id = hex_id(&ThreadRandom, 16);
/// assert_eq!(id.len(), 16);
/// assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
/// ```
pub fn hex_id(random: &dyn RandomSource, len: usize) -> String {
    (0..len)
        .map(|_| TRACE_ID_ALPHABET[random.next_index(TRACE_ID_ALPHABET.len())] as char)
        .collect()
}
