//! Fakes shared by the integration tests

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::MockServer;
use xhs_crawler::signing::{Signature, SigningError};
use xhs_crawler::transport::HttpTransport;
use xhs_crawler::{Identity, RandomSource, SigningOracle, XhsClient};

pub const COOKIES: &str = "a1=tok123; web_session=sess456";

/// Oracle producing `sig-<n>` signatures, numbered per call
#[derive(Default)]
pub struct FakeOracle {
    pub calls: AtomicUsize,
}

impl FakeOracle {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SigningOracle for FakeOracle {
    async fn sign(&self, _path: &str, _body: &str, token: &str) -> Result<Signature, SigningError> {
        if token != "tok123" {
            return Err(SigningError::Rejected(format!("unexpected token {}", token)));
        }
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Signature {
            x_s: format!("sig-{}", n),
            x_t: "1700000000000".to_string(),
            x_s_common: "common".to_string(),
        })
    }

    async fn xray_trace_id(&self) -> Result<String, SigningError> {
        Ok("xray-fixed".to_string())
    }
}

/// Always picks the first character, so ids are all `a`
pub struct FirstIndex;

impl RandomSource for FirstIndex {
    fn next_index(&self, _bound: usize) -> usize {
        0
    }
}

/// Builds a client talking to the mock server for both API and web pages
pub fn client(server: &MockServer) -> (XhsClient, Arc<FakeOracle>) {
    let oracle = Arc::new(FakeOracle::default());
    let transport = HttpTransport::with_client(reqwest::Client::new(), &server.uri());
    let identity = Identity::parse(COOKIES).unwrap();

    let client = XhsClient::new(identity, oracle.clone(), Arc::new(transport))
        .unwrap()
        .with_random(Arc::new(FirstIndex))
        .with_web_base_url(&server.uri());

    (client, oracle)
}

/// Successful response envelope
pub fn ok(data: Value) -> Value {
    json!({ "success": true, "code": 0, "msg": "成功", "data": data })
}
