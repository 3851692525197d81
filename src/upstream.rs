//! Client for the upstream forecast and measurement feeds

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::UpstreamConfig;
use crate::Result;
use crate::error::AirQualityError;
use crate::models::{ForecastSite, MeasurementSite};

const USER_AGENT: &str = concat!("check-air-quality/", env!("CARGO_PKG_VERSION"));
const RETRY_MIN_INTERVAL: Duration = Duration::from_millis(100);
const RETRY_MAX_INTERVAL: Duration = Duration::from_secs(5);

/// Fetches site collections, retrying transient failures with
/// exponential backoff.
pub struct AirQualityClient {
    client: ClientWithMiddleware,
    forecasts_url: String,
    measurements_url: String,
}

impl AirQualityClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let inner = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AirQualityError::upstream(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(RETRY_MIN_INTERVAL, RETRY_MAX_INTERVAL)
            .build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(inner)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            forecasts_url: config.forecasts_url.clone(),
            measurements_url: config.measurements_url.clone(),
        })
    }

    /// Forecast grid points with their daily DAQI values
    #[instrument(skip(self), fields(url = %self.forecasts_url))]
    pub async fn fetch_forecasts(&self) -> Result<Vec<ForecastSite>> {
        let body = self.get(&self.forecasts_url).await?;
        let sites = decode_collection(&body, "forecasts")?;
        info!("Fetched {} forecast sites", sites.len());
        Ok(sites)
    }

    /// Monitoring sites with their latest readings
    #[instrument(skip(self), fields(url = %self.measurements_url))]
    pub async fn fetch_measurements(&self) -> Result<Vec<MeasurementSite>> {
        let body = self.get(&self.measurements_url).await?;
        let sites = decode_collection(&body, "measurements")?;
        info!("Fetched {} measurement sites", sites.len());
        Ok(sites)
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AirQualityError::upstream(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(%status, "upstream returned an error");
            return Err(AirQualityError::upstream(format!(
                "{url} returned {status}: {error_text}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AirQualityError::upstream(format!("Failed to read {url}: {e}")))?;
        debug!(bytes = bytes.len(), "received upstream body");
        Ok(bytes.to_vec())
    }
}

/// Decode a collection sent either as a bare array or wrapped as
/// `{ "<key>": [...] }`.
pub fn decode_collection<T: DeserializeOwned>(
    body: &[u8],
    key: &str,
) -> Result<Vec<T>> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AirQualityError::upstream(format!("Invalid JSON for {key}: {e}")))?;

    let items = match value {
        Value::Array(_) => value,
        Value::Object(mut object) => object.remove(key).ok_or_else(|| {
            AirQualityError::upstream(format!("Response has no '{key}' collection"))
        })?,
        _ => {
            return Err(AirQualityError::upstream(format!(
                "Unexpected response shape for {key}"
            )));
        }
    };

    serde_json::from_value(items)
        .map_err(|e| AirQualityError::upstream(format!("Malformed {key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bare_array() {
        let body = br#"[{"name":"Belfast","location":{"coordinates":[54.6,-5.93]},"forecast":[{"day":"Mon","value":2}]}]"#;
        let sites: Vec<ForecastSite> = decode_collection(body, "forecasts").unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].forecast[0].value, 2);
    }

    #[test]
    fn test_decode_wrapped_collection() {
        let body = br#"{"measurements":[{"name":"Marylebone Road","localSiteID":"MY1","location":{"coordinates":[51.52,-0.15]},"pollutants":{}}]}"#;
        let sites: Vec<MeasurementSite> = decode_collection(body, "measurements").unwrap();
        assert_eq!(sites[0].local_site_id.as_deref(), Some("MY1"));
    }

    #[test]
    fn test_decode_rejects_missing_key_and_scalars() {
        let missing = decode_collection::<ForecastSite>(br#"{"other":[]}"#, "forecasts");
        assert!(matches!(missing, Err(AirQualityError::Upstream { .. })));

        let scalar = decode_collection::<ForecastSite>(b"42", "forecasts");
        assert!(scalar.is_err());

        let garbage = decode_collection::<ForecastSite>(b"<html>", "forecasts");
        assert!(garbage.unwrap_err().to_string().contains("Invalid JSON"));
    }

    #[test]
    fn test_client_builds_from_default_config() {
        assert!(AirQualityClient::new(&UpstreamConfig::default()).is_ok());
    }
}
