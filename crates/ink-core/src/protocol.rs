//! Wire format of the recognition service.
//!
//! Outbound: `POST {base}/calculate` with
//! `{ "image": "<data URL>", "dict_of_vars": { "x": "5", ... } }`.
//!
//! Inbound: `{ "data": [ { "expr": "...", "result": "...", "assign": bool }, ... ] }`.
//! Item order is significant and is preserved end to end.

use crate::error::{InkError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Symbol name → last evaluated textual value.
pub type Dictionary = BTreeMap<String, String>;

/// Path of the recognition endpoint relative to the service base URL.
pub const CALCULATE_PATH: &str = "/calculate";

/// Body of one recognition round-trip, built once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionRequest {
    /// Raster encoded as an embeddable `data:image/png;base64,...` URL.
    pub image: String,
    /// Snapshot of the session dictionary at submission time.
    #[serde(rename = "dict_of_vars")]
    pub variables: Dictionary,
}

impl RecognitionRequest {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| InkError::Encode(e.to_string()))
    }
}

/// One recognized expression and its evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecognitionItem {
    pub expr: String,
    pub result: String,
    #[serde(rename = "assign")]
    pub is_assignment: bool,
}

impl RecognitionItem {
    pub fn new(expr: impl Into<String>, result: impl Into<String>, is_assignment: bool) -> Self {
        Self {
            expr: expr.into(),
            result: result.into(),
            is_assignment,
        }
    }
}

#[derive(Deserialize)]
struct RawResponse {
    data: Vec<RawItem>,
}

#[derive(Deserialize)]
struct RawItem {
    expr: String,
    result: serde_json::Value,
    assign: bool,
}

/// Decode a response body into its ordered items.
///
/// `result` is accepted as a string, or as a number/boolean which is
/// rendered to text; anything else is malformed.
pub fn decode_response(body: &[u8]) -> Result<Vec<RecognitionItem>> {
    let raw: RawResponse =
        serde_json::from_slice(body).map_err(|e| InkError::MalformedResponse(e.to_string()))?;

    raw.data
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let result = match item.result {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(InkError::MalformedResponse(format!(
                        "item {i}: result must be text, got {other}"
                    )));
                }
            };
            Ok(RecognitionItem {
                expr: item.expr,
                result,
                is_assignment: item.assign,
            })
        })
        .collect()
}
