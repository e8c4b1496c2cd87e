//! Normalized upload results.
//!
//! The upload endpoint answers with a JSON object such as
//!
//! ```text
//! {"response": "success", "image_uid": "0f2cb08592d04eb4a5c22da8eeca.gif"}
//! ```
//!
//! Every outcome, including bodies that are not JSON and requests that never
//! got a response, is turned into an [`UploadResult`] with the same shape.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::UploadError;

/// Field carrying the outcome in the service's response.
pub const RESPONSE_FIELD: &str = "response";

/// Field carrying the new resource id.
pub const IMAGE_UID_FIELD: &str = "image_uid";

/// Field added to locally generated failures.
pub const MESSAGE_FIELD: &str = "message";

/// Outcome of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Success,
    Error,
}

/// Uniform result of an upload call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadResult {
    /// Whether the service accepted the upload
    pub status: UploadStatus,

    /// Fields of the response object
    pub fields: Map<String, Value>,
}

impl UploadResult {
    /// Parse a response body.
    ///
    /// The result is a success only when the body is an object whose
    /// `response` field is `"success"`.
    pub fn from_body(body: &str) -> Result<Self, UploadError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

        let Value::Object(fields) = value else {
            return Err(UploadError::MalformedResponse(
                "response is not a JSON object".to_string(),
            ));
        };

        let status = match fields.get(RESPONSE_FIELD).and_then(Value::as_str) {
            Some("success") => UploadStatus::Success,
            _ => UploadStatus::Error,
        };

        Ok(Self { status, fields })
    }

    /// The normalized error result: `{"response": "error"}`.
    pub fn error() -> Self {
        let mut fields = Map::new();
        fields.insert(RESPONSE_FIELD.to_string(), Value::from("error"));
        Self {
            status: UploadStatus::Error,
            fields,
        }
    }

    /// Error result for a failure that happened on this side.
    ///
    /// Malformed responses map to the plain error result; transport and I/O
    /// failures also carry a `message`.
    pub fn from_error(err: &UploadError) -> Self {
        let mut result = Self::error();
        if !matches!(err, UploadError::MalformedResponse(_)) {
            result
                .fields
                .insert(MESSAGE_FIELD.to_string(), Value::from(err.to_string()));
        }
        result
    }

    pub fn is_success(&self) -> bool {
        self.status == UploadStatus::Success
    }

    /// Resource id of the uploaded image, when the service returned one.
    pub fn image_uid(&self) -> Option<&str> {
        self.fields.get(IMAGE_UID_FIELD).and_then(Value::as_str)
    }

    /// Any response field as a string.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}
