use crate::identity::Identity;
use crate::request::{api_headers, SignedRequest};
use crate::signing::{hex_id, RandomSource, SigningOracle, TRACE_ID_LEN};
use crate::Result;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

/// Builds signed requests from a path and an optional JSON payload
#[derive(Clone)]
pub struct RequestBuilder {
    oracle: Arc<dyn SigningOracle>,
    random: Arc<dyn RandomSource>,
}

impl RequestBuilder {
    /// Creates a builder around a signing oracle and random source
    pub fn new(oracle: Arc<dyn SigningOracle>, random: Arc<dyn RandomSource>) -> Self {
        Self { oracle, random }
    }

    /// Replaces the random source
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Returns the random source used for ids
    pub fn random(&self) -> &dyn RandomSource {
        self.random.as_ref()
    }

    /// Builds a signed request
    ///
    /// # Steps
    ///
    /// 1. Serialize `body` to compact JSON (empty string when absent)
    /// 2. Ask the oracle for the signature triple over `(path, body, token)`
    /// 3. Draw a 16-char hex `x-b3-traceid`
    /// 4. Ask the oracle for an `x-xray-traceid`
    /// 5. Merge everything into the base header template
    ///
    /// Only the signature and trace headers differ between two calls.
    pub async fn build(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        identity: &Identity,
    ) -> Result<SignedRequest> {
        let serialized = match body {
            Some(value) => Some(
                serde_json::to_string(value)
                    .map_err(|e| crate::XhsError::malformed(path, e.to_string()))?,
            ),
            None => None,
        };

        let token = identity.token()?;
        let signature = self
            .oracle
            .sign(path, serialized.as_deref().unwrap_or(""), token)
            .await?;
        let b3_trace_id = hex_id(self.random.as_ref(), TRACE_ID_LEN);
        let xray_trace_id = self.oracle.xray_trace_id().await?;

        let mut headers = api_headers();
        headers.insert("x-s".to_string(), signature.x_s);
        headers.insert("x-t".to_string(), signature.x_t);
        headers.insert("x-s-common".to_string(), signature.x_s_common);
        headers.insert("x-b3-traceid".to_string(), b3_trace_id);
        headers.insert("x-xray-traceid".to_string(), xray_trace_id);

        trace!(%method, path, "built signed request");

        Ok(SignedRequest {
            method,
            path: path.to_string(),
            headers,
            body: serialized,
            cookies: identity.clone(),
        })
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder").finish_non_exhaustive()
    }
}
