//! Live weather providers.
//!
//! Weather is an optional refinement: the climate adjuster works from the
//! regional baseline alone, so every failure here degrades to "no reading"
//! rather than an error for the caller of [`resolve_location`].

use std::time::Duration;

use farm_carbon_climate_models::{Coordinates, LocationContext, WeatherSnapshot};

use crate::ClimateError;
use crate::adjust::ClimateAdjuster;

/// Default `OpenWeatherMap` current-weather endpoint.
pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Request timeout for weather lookups.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of live weather readings.
#[async_trait::async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetches the current reading for a city within a region.
    ///
    /// Returns `Ok(None)` when the service has no data for the location.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError`] if the request or response parsing fails.
    async fn current(
        &self,
        city: &str,
        region: &str,
    ) -> Result<Option<WeatherSnapshot>, ClimateError>;
}

/// `OpenWeatherMap` current weather client (metric units).
pub struct OpenWeatherMapProvider {
    api_key: String,
    base_url: String,
    country_code: String,
    client: reqwest::Client,
}

impl OpenWeatherMapProvider {
    /// Creates a client for the given API key and ISO country code.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: String, country_code: String) -> Result<Self, ClimateError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            api_key,
            base_url: OPENWEATHER_BASE_URL.to_string(),
            country_code,
            client,
        })
    }

    /// Overrides the endpoint URL (self-hosted proxies, tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Creates a client from `OPENWEATHER_API_KEY` and the optional
    /// `OPENWEATHER_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::Config`] if `OPENWEATHER_API_KEY` is not set.
    pub fn from_env(country_code: &str) -> Result<Self, ClimateError> {
        let api_key = std::env::var("OPENWEATHER_API_KEY").map_err(|_| ClimateError::Config {
            message: "OPENWEATHER_API_KEY environment variable not set".to_string(),
        })?;
        let provider = Self::new(api_key, country_code.to_string())?;
        Ok(match std::env::var("OPENWEATHER_BASE_URL") {
            Ok(url) => provider.with_base_url(url),
            Err(_) => provider,
        })
    }
}

#[async_trait::async_trait]
impl WeatherProvider for OpenWeatherMapProvider {
    async fn current(
        &self,
        city: &str,
        region: &str,
    ) -> Result<Option<WeatherSnapshot>, ClimateError> {
        let location = format!("{},{},{}", city.trim(), region.trim(), self.country_code);
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", location.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            log::warn!(
                "Weather service returned {} for '{location}'",
                resp.status()
            );
            return Ok(None);
        }

        let body: serde_json::Value = resp.json().await?;
        parse_response(&body).map(Some)
    }
}

/// Parses an `OpenWeatherMap` current-weather response body.
///
/// # Errors
///
/// Returns [`ClimateError::Parse`] if temperature or humidity are missing.
pub fn parse_response(body: &serde_json::Value) -> Result<WeatherSnapshot, ClimateError> {
    let temperature_c = body["main"]["temp"]
        .as_f64()
        .ok_or_else(|| ClimateError::Parse {
            message: "Missing main.temp in weather response".to_string(),
        })?;
    let humidity_pct = body["main"]["humidity"]
        .as_f64()
        .ok_or_else(|| ClimateError::Parse {
            message: "Missing main.humidity in weather response".to_string(),
        })?;

    let first = &body["weather"][0];
    let coordinates = match (body["coord"]["lat"].as_f64(), body["coord"]["lon"].as_f64()) {
        (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
        _ => None,
    };

    Ok(WeatherSnapshot {
        temperature_c,
        humidity_pct,
        condition: first["main"].as_str().map(String::from),
        description: first["description"].as_str().map(String::from),
        coordinates,
    })
}

/// Builds a [`LocationContext`], consulting `provider` for live weather
/// when both a provider and a city are available.
///
/// Provider failures are logged and fall back to the regional baseline.
pub async fn resolve_location(
    adjuster: &ClimateAdjuster,
    provider: Option<&dyn WeatherProvider>,
    city: Option<&str>,
    region: &str,
) -> LocationContext {
    let weather = match (provider, city) {
        (Some(provider), Some(city)) => match provider.current(city, region).await {
            Ok(Some(reading)) => {
                log::info!(
                    "Weather for {city}, {region}: {}°C, {}% humidity",
                    reading.temperature_c,
                    reading.humidity_pct
                );
                Some(reading)
            }
            Ok(None) => {
                log::info!("No weather data for {city}, {region}; using regional baseline");
                None
            }
            Err(e) => {
                log::warn!(
                    "Weather lookup for {city}, {region} failed: {e}; using regional baseline"
                );
                None
            }
        },
        _ => None,
    };

    adjuster.location_context(city, region, weather)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedWeather(Result<Option<WeatherSnapshot>, ()>);

    #[async_trait::async_trait]
    impl WeatherProvider for FixedWeather {
        async fn current(
            &self,
            _city: &str,
            _region: &str,
        ) -> Result<Option<WeatherSnapshot>, ClimateError> {
            self.0.clone().map_err(|()| ClimateError::Parse {
                message: "stub failure".to_string(),
            })
        }
    }

    #[test]
    fn parses_openweather_response() {
        let body = serde_json::json!({
            "coord": {"lat": 9.93, "lon": 76.26},
            "weather": [{"main": "Clouds", "description": "scattered clouds"}],
            "main": {"temp": 28.4, "humidity": 78}
        });
        let reading = parse_response(&body).unwrap();
        assert!((reading.temperature_c - 28.4).abs() < f64::EPSILON);
        assert!((reading.humidity_pct - 78.0).abs() < f64::EPSILON);
        assert_eq!(reading.condition.as_deref(), Some("Clouds"));
        assert_eq!(reading.description.as_deref(), Some("scattered clouds"));
        assert!(reading.coordinates.is_some());
    }

    #[test]
    fn rejects_response_without_temperature() {
        let body = serde_json::json!({"main": {"humidity": 50}});
        assert!(matches!(
            parse_response(&body),
            Err(ClimateError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn uses_provider_reading() {
        let adjuster = ClimateAdjuster::default();
        let provider = FixedWeather(Ok(Some(WeatherSnapshot::new(25.0, 80.0))));
        let provider: &dyn WeatherProvider = &provider;
        let ctx = resolve_location(&adjuster, Some(provider), Some("Kochi"), "Kerala").await;
        assert!(ctx.adjustment.weather_used);
        assert!(ctx.weather.is_some());
    }

    #[tokio::test]
    async fn provider_failure_falls_back_to_baseline() {
        let adjuster = ClimateAdjuster::default();
        let provider = FixedWeather(Err(()));
        let provider: &dyn WeatherProvider = &provider;
        let ctx = resolve_location(&adjuster, Some(provider), Some("Jaipur"), "Rajasthan").await;
        assert!(!ctx.adjustment.weather_used);
        assert!((ctx.climate_multiplier() - 0.7).abs() < f64::EPSILON);
        assert!(ctx.adjustment.adjustments[0].contains("weather data unavailable"));
    }

    #[tokio::test]
    async fn no_city_skips_provider() {
        let adjuster = ClimateAdjuster::default();
        let provider = FixedWeather(Ok(Some(WeatherSnapshot::new(25.0, 80.0))));
        let provider: &dyn WeatherProvider = &provider;
        let ctx = resolve_location(&adjuster, Some(provider), None, "Kerala").await;
        assert!(!ctx.adjustment.weather_used);
    }
}
