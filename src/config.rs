use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Longest accepted token lifetime: 30 days.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 30;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

/// Where the weather proxy asks the provider about.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum WeatherLocation {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    pub api_url: String,
    pub api_key: String,
    pub location: WeatherLocation,
    pub timeout_secs: u64,
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub base_path: String,
    pub frontend_origin: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub weather: WeatherConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| var(key).with_context(|| format!("{key} must be set"));
        let or_default = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let port = var("APP_PORT")
            .or_else(|| var("PORT"))
            .unwrap_or_else(|| "5000".into())
            .parse::<u16>()
            .context("APP_PORT must be a port number")?;

        let ttl_minutes: i64 = or_default("JWT_TTL_MINUTES", "120")
            .parse()
            .context("JWT_TTL_MINUTES must be an integer")?;
        anyhow::ensure!(
            (1..=MAX_TTL_MINUTES).contains(&ttl_minutes),
            "JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {ttl_minutes}"
        );
        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            ttl_minutes,
        };

        let location = match (var("WEATHER_LAT"), var("WEATHER_LON")) {
            (Some(lat), Some(lon)) => WeatherLocation::Coordinates {
                lat: lat.parse().context("WEATHER_LAT must be a number")?,
                lon: lon.parse().context("WEATHER_LON must be a number")?,
            },
            _ => WeatherLocation::City(or_default("WEATHER_CITY", "Guangzhou")),
        };

        let weather = WeatherConfig {
            api_url: or_default("WEATHER_API_URL", DEFAULT_WEATHER_URL),
            api_key: required("WEATHER_API_KEY")?,
            location,
            timeout_secs: or_default("WEATHER_TIMEOUT_SECS", "10")
                .parse()
                .context("WEATHER_TIMEOUT_SECS must be an integer")?,
        };

        Ok(Self {
            host: or_default("APP_HOST", "0.0.0.0"),
            port,
            base_path: normalize_base_path(&or_default("API_BASE_PATH", "/api")),
            frontend_origin: or_default("FRONTEND_ORIGIN", "http://localhost:5173"),
            database_url: required("DATABASE_URL")?,
            db_max_connections: or_default("DB_MAX_CONNECTIONS", "10")
                .parse()
                .context("DB_MAX_CONNECTIONS must be an integer")?,
            jwt,
            weather,
        })
    }
}

// "/api/" and "api" both become "/api"; "" and "/" mean the root.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
