use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Uniform `{code, message?, data?}` body used by every endpoint.
///
/// `code` mirrors the HTTP status the envelope is sent with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T = serde_json::Value> {
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            message: None,
            data: Some(data),
        }
    }
}

impl Envelope {
    pub fn message(msg: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, msg)
    }

    pub fn with_status(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            message: Some(msg.into()),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
