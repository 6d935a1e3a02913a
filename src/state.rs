use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    auth::{jwt::JwtKeys, repo::UserStore},
    config::AppConfig,
    weather::client::WeatherSource,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub weather: Arc<dyn WeatherSource>,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        weather: Arc<dyn WeatherSource>,
    ) -> Self {
        let jwt = JwtKeys::new(&config.jwt);
        Self {
            config,
            users,
            weather,
            jwt,
        }
    }
}

/// Open the bounded connection pool shared by all requests.
pub async fn connect_db(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")
}
