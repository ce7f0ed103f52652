// src/gateway/wire.rs — Backend JSON shapes and response decoding
//
// Upload success:  {"message": "..."}
// Query success:   {"response": "..."} or {"test_cases": ["...", ...]}
// Any failure:     {"error": "..."}; other failure shapes get a generic message.

use serde::{Deserialize, Serialize};

use super::{QueryAnswer, UploadReceipt};
use crate::infra::errors::GatewayError;
use crate::util::truncate_str;

/// Body of `POST /query`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Deserialize)]
struct UploadBody {
    message: String,
}

/// The two accepted query success payloads.
/// When both keys are present, `response` wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum QueryPayload {
    Response { response: String },
    TestCases { test_cases: Vec<String> },
}

impl From<QueryPayload> for QueryAnswer {
    fn from(payload: QueryPayload) -> Self {
        match payload {
            QueryPayload::Response { response } => QueryAnswer::new(vec![response]),
            QueryPayload::TestCases { test_cases } => QueryAnswer::new(test_cases),
        }
    }
}

pub fn decode_upload(status: u16, body: &str) -> Result<UploadReceipt, GatewayError> {
    let value = decode_body(status, body)?;
    let parsed: UploadBody =
        serde_json::from_value(value).map_err(|e| GatewayError::Malformed(e.to_string()))?;
    Ok(UploadReceipt {
        message: parsed.message,
    })
}

pub fn decode_query(status: u16, body: &str) -> Result<QueryAnswer, GatewayError> {
    let value = decode_body(status, body)?;
    let payload: QueryPayload =
        serde_json::from_value(value).map_err(|e| GatewayError::Malformed(e.to_string()))?;
    Ok(payload.into())
}

/// Split a response into the error path or the JSON value to decode.
fn decode_body(status: u16, body: &str) -> Result<serde_json::Value, GatewayError> {
    let value: Option<serde_json::Value> = serde_json::from_str(body).ok();

    let server_error = value
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(|e| e.as_str())
        .map(str::trim)
        .filter(|m| !m.is_empty());
    if let Some(message) = server_error {
        return Err(GatewayError::Backend {
            status,
            message: message.to_string(),
        });
    }

    if !(200..300).contains(&status) {
        return Err(GatewayError::Status { status });
    }

    value.ok_or_else(|| GatewayError::Malformed(truncate_str(body, 200).to_string()))
}
