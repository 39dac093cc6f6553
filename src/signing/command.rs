//! Signing oracle backed by an external helper process
//!
//! The helper reads one JSON request on stdin and answers with one JSON
//! object on stdout:
//!
//! | request | response |
//! |---------|----------|
//! | `{"op":"sign","api":..,"data":..,"a1":..}` | `{"xs":..,"xt":..,"xs_common":..}` |
//! | `{"op":"trace_id"}` | `{"trace_id":..}` |
//!
//! An `{"error": "..."}` response is reported as [`SigningError::Rejected`].

use crate::signing::{Signature, SigningError, SigningOracle};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Oracle that spawns a helper command for every signature
#[derive(Debug, Clone)]
pub struct CommandOracle {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandOracle {
    /// Creates an oracle running `program args...`
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    #[instrument(skip(self, request), fields(program = %self.program))]
    async fn call(&self, request: Value) -> Result<Value, SigningError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(SigningError::Spawn)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(request.to_string().as_bytes())
                .await
                .map_err(SigningError::Spawn)?;
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| SigningError::Timeout(self.timeout.as_secs()))?
            .map_err(SigningError::Spawn)?;

        if !output.status.success() {
            return Err(SigningError::NonZeroExit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let response: Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| SigningError::InvalidOutput(e.to_string()))?;
        debug!("signer responded");

        if let Some(error) = response.get("error").and_then(Value::as_str) {
            return Err(SigningError::Rejected(error.to_string()));
        }

        Ok(response)
    }
}

#[async_trait]
impl SigningOracle for CommandOracle {
    async fn sign(&self, path: &str, body: &str, token: &str) -> Result<Signature, SigningError> {
        let response = self
            .call(json!({ "op": "sign", "api": path, "data": body, "a1": token }))
            .await?;

        Ok(Signature {
            x_s: string_field(&response, "xs")?,
            x_t: string_field(&response, "xt")?,
            x_s_common: string_field(&response, "xs_common")?,
        })
    }

    async fn xray_trace_id(&self) -> Result<String, SigningError> {
        let response = self.call(json!({ "op": "trace_id" })).await?;
        string_field(&response, "trace_id")
    }
}

/// Reads a field that may be a JSON string or number
fn string_field(response: &Value, key: &str) -> Result<String, SigningError> {
    match response.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(SigningError::InvalidOutput(format!(
            "missing field '{}'",
            key
        ))),
    }
}
