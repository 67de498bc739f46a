use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::errors::AppResult;

const HTTP_TIMEOUT_SECS: u64 = 10;

/// Result of resolving one query address. Non-OK service status and empty
/// candidate lists both collapse to `Invalid`.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Resolved {
        latitude: f64,
        longitude: f64,
        formatted_address: String,
    },
    Invalid,
}

#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn resolve(&self, address: &str) -> AppResult<GeocodeOutcome>;
}

pub struct HttpGeocodeClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

impl HttpGeocodeClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("address-auditor/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.geocode_endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl LocationResolver for HttpGeocodeClient {
    async fn resolve(&self, address: &str) -> AppResult<GeocodeOutcome> {
        #[derive(Deserialize)]
        struct Response {
            status: String,
            #[serde(default)]
            results: Vec<ResponseResult>,
        }

        #[derive(Deserialize)]
        struct ResponseResult {
            formatted_address: String,
            geometry: ResponseGeometry,
        }

        #[derive(Deserialize)]
        struct ResponseGeometry {
            location: ResponseLocation,
        }

        #[derive(Deserialize)]
        struct ResponseLocation {
            lat: f64,
            lng: f64,
        }

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("address", address), ("key", self.api_key.expose_secret())])
            .send()
            .await?
            .error_for_status()?;

        let parsed: Response = response.json().await?;
        if parsed.status != "OK" {
            return Ok(GeocodeOutcome::Invalid);
        }

        // First candidate only; ambiguous multi-candidate responses are not
        // disambiguated.
        match parsed.results.into_iter().next() {
            Some(first) => Ok(GeocodeOutcome::Resolved {
                latitude: first.geometry.location.lat,
                longitude: first.geometry.location.lng,
                formatted_address: first.formatted_address,
            }),
            None => Ok(GeocodeOutcome::Invalid),
        }
    }
}
