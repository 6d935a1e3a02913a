use serde::{Deserialize, Serialize};

/// Current conditions returned by `GET /weather`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub temp: f64,       // °C
    pub humidity: i64,   // %
    pub wind_speed: f64, // m/s
    pub rain: f64,       // mm over the last hour
}

// Subset of the OpenWeatherMap current-weather response we read.

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderResponse {
    main: ProviderMain,
    wind: ProviderWind,
    #[serde(default)]
    rain: Option<ProviderRain>,
}

#[derive(Debug, Deserialize)]
struct ProviderMain {
    temp: f64,
    humidity: i64,
}

#[derive(Debug, Deserialize)]
struct ProviderWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct ProviderRain {
    #[serde(rename = "1h", default)]
    one_hour: Option<f64>,
}

impl From<ProviderResponse> for WeatherSnapshot {
    fn from(r: ProviderResponse) -> Self {
        Self {
            temp: r.main.temp,
            humidity: r.main.humidity,
            wind_speed: r.wind.speed,
            rain: r.rain.and_then(|rain| rain.one_hour).unwrap_or(0.0),
        }
    }
}
