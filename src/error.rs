use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::{response::Envelope, weather::client::WeatherError};

pub const SERVER_ERROR: &str = "server error";
pub const WEATHER_ERROR: &str = "failed to fetch weather";

/// Errors a handler can end with. Each one renders as an envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad or conflicting input, e.g. a taken username.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown user or wrong password.
    #[error("auth error: {0}")]
    Auth(String),

    /// The weather provider failed or answered with something unusable.
    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::Auth(_) => "auth",
            ApiError::Upstream(_) => "upstream",
            ApiError::Internal(_) => "internal",
        }
    }

    /// Text sent to the client. Upstream and internal details stay in the logs.
    pub fn public_message(&self) -> &str {
        match self {
            ApiError::Validation(msg) | ApiError::Auth(msg) => msg.as_str(),
            ApiError::Upstream(_) => WEATHER_ERROR,
            ApiError::Internal(_) => SERVER_ERROR,
        }
    }
}

impl From<WeatherError> for ApiError {
    fn from(e: WeatherError) -> Self {
        ApiError::Upstream(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(tag = self.tag(), error = %self, "request failed");
        } else {
            warn!(tag = self.tag(), error = %self, "request rejected");
        }
        Envelope::with_status(status, self.public_message()).into_response()
    }
}
