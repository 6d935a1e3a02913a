//! Typed client for the HTTP API.
//!
//! Attaches the bearer token (when one is set) to every request and folds
//! every failure into [`ClientError`]: either the server's own envelope, or a
//! generic network error when no envelope came back.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    auth::dto::LoginData, error::WEATHER_ERROR, response::Envelope, weather::dto::WeatherSnapshot,
};

pub const NETWORK_ERROR: &str = "network error";

#[derive(Debug, Error, PartialEq)]
pub enum ClientError {
    /// The server answered with an error envelope.
    #[error("{message} (code {code})")]
    Api { code: u16, message: String },
    /// No usable envelope: connection failure, timeout or an unexpected body.
    #[error("{message}")]
    Network { message: String },
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` includes the API prefix, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<Envelope, ClientError> {
        let req = self
            .http
            .post(self.url("/register"))
            .json(&Credentials { username, password });
        self.send(req, NETWORK_ERROR).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginData, ClientError> {
        let req = self
            .http
            .post(self.url("/login"))
            .json(&Credentials { username, password });
        let env: Envelope<LoginData> = self.send(req, NETWORK_ERROR).await?;
        data_of(env, NETWORK_ERROR)
    }

    pub async fn logout(&self) -> Result<Envelope, ClientError> {
        self.send(self.http.post(self.url("/logout")), NETWORK_ERROR)
            .await
    }

    pub async fn weather(&self) -> Result<WeatherSnapshot, ClientError> {
        let env: Envelope<WeatherSnapshot> =
            self.send(self.http.get(self.url("/weather")), WEATHER_ERROR).await?;
        data_of(env, WEATHER_ERROR)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        mut req: reqwest::RequestBuilder,
        fallback: &str,
    ) -> Result<Envelope<T>, ClientError> {
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let res = req.send().await.map_err(|e| network_error(e, fallback))?;
        let status = res.status();
        let body = res.text().await.map_err(|e| network_error(e, fallback))?;

        if status.is_success() {
            return serde_json::from_str::<Envelope<T>>(&body)
                .map_err(|e| network_error(e, fallback));
        }

        match serde_json::from_str::<Envelope>(&body) {
            Ok(env) => Err(ClientError::Api {
                code: env.code,
                message: env.message.unwrap_or_else(|| fallback.to_string()),
            }),
            Err(e) => Err(network_error(e, fallback)),
        }
    }
}

fn network_error(e: impl std::fmt::Display, fallback: &str) -> ClientError {
    debug!(error = %e, "request failed without an envelope");
    ClientError::Network {
        message: fallback.to_string(),
    }
}

fn data_of<T>(env: Envelope<T>, fallback: &str) -> Result<T, ClientError> {
    env.data.ok_or_else(|| ClientError::Network {
        message: fallback.to_string(),
    })
}
