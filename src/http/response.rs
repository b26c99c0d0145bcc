//! Result envelope returned by every HTTP procedure.
//!
//! Wire shape (field names fixed, always present):
//! ```text
//! { "result": 0|1, "txs": ["<tx id>", ...], "error": "<message>" }
//! ```
//! Failures travel in `result`/`error`; the HTTP status is always 200.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::pipeline::PipelineOutcome;

/// Closed two-value status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    Failure,
}

impl ResultCode {
    pub fn code(&self) -> u8 {
        match self {
            ResultCode::Success => 0,
            ResultCode::Failure => 1,
        }
    }
}

impl Serialize for ResultCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for ResultCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(ResultCode::Success),
            1 => Ok(ResultCode::Failure),
            other => Err(de::Error::custom(format!("result must be 0 or 1, got {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub result: ResultCode,
    pub txs: Vec<String>,
    pub error: String,
}

impl ResultEnvelope {
    pub fn success(txs: Vec<String>) -> Self {
        Self {
            result: ResultCode::Success,
            txs,
            error: String::new(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            result: ResultCode::Failure,
            txs: Vec::new(),
            error: error.into(),
        }
    }
}

impl From<PipelineOutcome> for ResultEnvelope {
    fn from(outcome: PipelineOutcome) -> Self {
        match outcome {
            PipelineOutcome::Success { tx_ids } => ResultEnvelope::success(tx_ids),
            PipelineOutcome::Failure { error } => match error.remediation() {
                Some(hint) => ResultEnvelope::failure(format!("{}. {}", error, hint)),
                None => ResultEnvelope::failure(error.to_string()),
            },
        }
    }
}

impl IntoResponse for ResultEnvelope {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
