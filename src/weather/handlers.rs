use axum::{extract::State, routing::get, Router};
use tracing::instrument;

use crate::{error::ApiError, response::Envelope, state::AppState, weather::dto::WeatherSnapshot};

pub fn weather_routes() -> Router<AppState> {
    Router::new().route("/weather", get(get_weather))
}

#[instrument(skip(state))]
pub async fn get_weather(
    State(state): State<AppState>,
) -> Result<Envelope<WeatherSnapshot>, ApiError> {
    let snapshot = state.weather.current().await?;
    Ok(Envelope::ok(snapshot))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        client::{ApiClient, ClientError},
        error::WEATHER_ERROR,
        testing::{spawn_app, test_state, FakeWeather, MemoryUserStore},
        weather::dto::WeatherSnapshot,
    };

    async fn client_for(weather: FakeWeather) -> ApiClient {
        let state = test_state(Arc::new(MemoryUserStore::new()), Arc::new(weather));
        ApiClient::new(format!("{}/api", spawn_app(state).await))
    }

    #[tokio::test]
    async fn returns_snapshot_in_envelope() {
        let client = client_for(FakeWeather::sunny()).await;
        let snapshot = client.weather().await.expect("weather");
        assert_eq!(snapshot, FakeWeather::SUNNY);
    }

    #[tokio::test]
    async fn upstream_failure_is_500_with_generic_message() {
        let client = client_for(FakeWeather::down()).await;
        match client.weather().await {
            Err(ClientError::Api { code, message }) => {
                assert_eq!(code, 500);
                assert_eq!(message, WEATHER_ERROR);
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn each_request_reaches_upstream() {
        let weather = Arc::new(FakeWeather::sunny());
        let state = test_state(Arc::new(MemoryUserStore::new()), weather.clone());
        let client = ApiClient::new(format!("{}/api", spawn_app(state).await));

        for _ in 0..3 {
            let _: WeatherSnapshot = client.weather().await.unwrap();
        }
        assert_eq!(weather.calls(), 3);
    }
}
