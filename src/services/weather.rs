use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client as RedisClient};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const WEATHER_CACHE_TTL: u64 = 1800; // 30 minutes

/// Current conditions for a city, as fed into the outfit prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub description: String,
    pub temperature_c: f64,
    pub fetched_at: DateTime<Utc>,
}

/// Service for resolving city weather via Open-Meteo
///
/// Two requests per lookup: geocoding to coordinates, then the current
/// forecast. Snapshots are cached briefly in Redis; the cache is purely an
/// accelerator, so a broken Redis only costs extra API calls.
pub struct WeatherService {
    http_client: HttpClient,
    redis_client: RedisClient,
    weather_api_url: String,
    geocoding_api_url: String,
}

impl WeatherService {
    pub fn new(
        redis_client: RedisClient,
        weather_api_url: String,
        geocoding_api_url: String,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            redis_client,
            weather_api_url,
            geocoding_api_url,
        }
    }

    /// Fetches current weather for a city (checks cache first).
    pub async fn current_for_city(&self, city: &str) -> AppResult<WeatherSnapshot> {
        let city = city.trim();
        if city.is_empty() {
            return Err(AppError::InvalidInput("City cannot be empty".to_string()));
        }

        let cache_key = format!("weather:{}", city.to_lowercase());
        if let Some(snapshot) = self.get_from_redis(&cache_key).await {
            tracing::debug!(city = %city, "Weather cache hit");
            return Ok(snapshot);
        }

        let (latitude, longitude, resolved_name) = self.geocode(city).await?;
        let snapshot = self.fetch_current(latitude, longitude, resolved_name).await?;
        self.store_in_redis(&cache_key, &snapshot).await;

        Ok(snapshot)
    }

    /// Resolves a city name to coordinates.
    async fn geocode(&self, city: &str) -> AppResult<(f64, f64, String)> {
        let url = format!("{}/v1/search", self.geocoding_api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("name", city), ("count", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Geocoding API returned status {status}: {body}"
            )));
        }

        let geocoding: GeocodingResponse = response.json().await?;
        let hit = geocoding
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("City '{city}' not found")))?;

        Ok((hit.latitude, hit.longitude, hit.name))
    }

    /// Fetches the current forecast for coordinates.
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
        city: String,
    ) -> AppResult<WeatherSnapshot> {
        let url = format!("{}/v1/forecast", self.weather_api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Weather API returned status {status}: {body}"
            )));
        }

        let forecast: ForecastResponse = response.json().await?;

        tracing::info!(
            city = %city,
            temperature = forecast.current_weather.temperature,
            code = forecast.current_weather.weathercode,
            "Weather fetched"
        );

        Ok(WeatherSnapshot {
            city,
            description: describe_weather_code(forecast.current_weather.weathercode).to_string(),
            temperature_c: forecast.current_weather.temperature,
            fetched_at: Utc::now(),
        })
    }

    async fn get_from_redis(&self, cache_key: &str) -> Option<WeatherSnapshot> {
        let mut conn = match self.redis_client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "Redis unavailable, skipping weather cache");
                return None;
            }
        };

        match conn.get::<_, Option<String>>(cache_key).await {
            Ok(Some(json)) => serde_json::from_str(&json).ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Redis get failed");
                None
            }
        }
    }

    async fn store_in_redis(&self, cache_key: &str, snapshot: &WeatherSnapshot) {
        let json = match serde_json::to_string(snapshot) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Weather snapshot serialization failed");
                return;
            }
        };

        let mut conn = match self.redis_client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "Redis unavailable, weather snapshot not cached");
                return;
            }
        };

        if let Err(e) = conn
            .set_ex::<_, _, ()>(cache_key, json, WEATHER_CACHE_TTL)
            .await
        {
            tracing::warn!(error = %e, "Redis set failed");
        }
    }
}

#[derive(Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingHit>>,
}

#[derive(Deserialize)]
struct GeocodingHit {
    name: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: i32,
}

/// Human-readable description for a WMO weather interpretation code.
fn describe_weather_code(code: i32) -> &'static str {
    match code {
        0 => "clear sky",
        1 => "mainly clear",
        2 => "partly cloudy",
        3 => "overcast",
        45 | 48 => "fog",
        51 | 53 | 55 => "drizzle",
        56 | 57 => "freezing drizzle",
        61 => "light rain",
        63 => "rain",
        65 => "heavy rain",
        66 | 67 => "freezing rain",
        71 => "light snow",
        73 => "snow",
        75 => "heavy snow",
        77 => "snow grains",
        80 | 81 | 82 => "rain showers",
        85 | 86 => "snow showers",
        95 => "thunderstorm",
        96 | 99 => "thunderstorm with hail",
        _ => "mixed conditions",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_weather_code_known_codes() {
        assert_eq!(describe_weather_code(0), "clear sky");
        assert_eq!(describe_weather_code(3), "overcast");
        assert_eq!(describe_weather_code(45), "fog");
        assert_eq!(describe_weather_code(63), "rain");
        assert_eq!(describe_weather_code(75), "heavy snow");
        assert_eq!(describe_weather_code(82), "rain showers");
        assert_eq!(describe_weather_code(95), "thunderstorm");
    }

    #[test]
    fn test_describe_weather_code_unknown_falls_back() {
        assert_eq!(describe_weather_code(42), "mixed conditions");
        assert_eq!(describe_weather_code(-1), "mixed conditions");
    }

    #[test]
    fn test_geocoding_response_deserialization() {
        let json = r#"{
            "results": [
                {"name": "Oslo", "latitude": 59.91, "longitude": 10.75, "country": "Norway"}
            ]
        }"#;

        let response: GeocodingResponse = serde_json::from_str(json).unwrap();
        let hit = &response.results.unwrap()[0];
        assert_eq!(hit.name, "Oslo");
        assert_eq!(hit.latitude, 59.91);
        assert_eq!(hit.longitude, 10.75);
    }

    #[test]
    fn test_geocoding_response_without_results() {
        let response: GeocodingResponse = serde_json::from_str("{}").unwrap();
        assert!(response.results.is_none());
    }

    #[test]
    fn test_forecast_response_deserialization() {
        let json = r#"{
            "latitude": 59.91,
            "longitude": 10.75,
            "current_weather": {
                "temperature": 4.5,
                "windspeed": 11.2,
                "weathercode": 71,
                "time": "2024-11-20T12:00"
            }
        }"#;

        let response: ForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.current_weather.temperature, 4.5);
        assert_eq!(response.current_weather.weathercode, 71);
    }
}
