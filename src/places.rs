use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::errors::AppResult;

const HTTP_TIMEOUT_SECS: u64 = 10;
const SEARCH_RADIUS_METERS: u32 = 50;
const PLACE_TYPE: &str = "clothing_store";

/// One nearby-search hit in service order. Ephemeral, consumed by the matcher
/// within the same row.
#[derive(Debug, Clone)]
pub struct PlaceCandidate {
    pub name: String,
    pub vicinity: String,
    pub types: Vec<String>,
}

#[async_trait]
pub trait NearbySearch: Send + Sync {
    async fn nearby(&self, latitude: f64, longitude: f64) -> AppResult<Vec<PlaceCandidate>>;
}

pub struct HttpNearbyClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

impl HttpNearbyClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("address-auditor/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.places_endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl NearbySearch for HttpNearbyClient {
    async fn nearby(&self, latitude: f64, longitude: f64) -> AppResult<Vec<PlaceCandidate>> {
        #[derive(Deserialize)]
        struct Response {
            status: String,
            #[serde(default)]
            results: Vec<ResponsePlace>,
        }

        #[derive(Deserialize)]
        struct ResponsePlace {
            #[serde(default)]
            name: String,
            #[serde(default)]
            vicinity: String,
            #[serde(default)]
            types: Vec<String>,
        }

        let location = format!("{latitude},{longitude}");
        let radius = SEARCH_RADIUS_METERS.to_string();
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("type", PLACE_TYPE),
                ("key", self.api_key.expose_secret()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let parsed: Response = response.json().await?;
        // Non-OK (including ZERO_RESULTS) reads as no candidates; the row still
        // gets its input-field pass.
        if parsed.status != "OK" {
            return Ok(Vec::new());
        }

        Ok(parsed
            .results
            .into_iter()
            .map(|place| PlaceCandidate {
                name: place.name,
                vicinity: place.vicinity,
                types: place.types,
            })
            .collect())
    }
}
