use std::path::PathBuf;
use std::{env, io};

use secrecy::SecretString;
use tracing::debug;

use crate::errors::{AppError, AppResult};

const DEFAULT_GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const DEFAULT_PLACES_ENDPOINT: &str =
    "https://maps.googleapis.com/maps/api/place/nearbysearch/json";
const DEFAULT_OUTPUT_PATH: &str = "output.csv";
const DEFAULT_THROTTLE_MS: u64 = 100;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_key: SecretString,
    pub geocode_endpoint: String,
    pub places_endpoint: String,
    pub input_path: Option<PathBuf>,
    pub output_path: PathBuf,
    pub throttle_ms: u64,
}

impl AppConfig {
    /// Reads configuration from the process environment. The API credential is
    /// the only mandatory value; its absence aborts before any row is touched.
    pub fn from_env() -> AppResult<Self> {
        load_dotenv_if_applicable();

        let api_key = read_api_key().ok_or_else(|| {
            AppError::Config("missing API credential: set API_KEY or MAPS_API_KEY".into())
        })?;

        Ok(Self {
            api_key,
            geocode_endpoint: env::var("GEOCODE_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_GEOCODE_ENDPOINT.to_string()),
            places_endpoint: env::var("PLACES_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_PLACES_ENDPOINT.to_string()),
            input_path: env::var("INPUT_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            output_path: env::var("OUTPUT_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            throttle_ms: parse_u64("THROTTLE_MS", DEFAULT_THROTTLE_MS),
        })
    }
}

fn read_api_key() -> Option<SecretString> {
    ["API_KEY", "MAPS_API_KEY"]
        .iter()
        .find_map(|name| env::var(name).ok())
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

fn load_dotenv_if_applicable() {
    if !should_load_dotenv() {
        debug!("skipping .env load outside dev mode");
        return;
    }

    if let Err(err) = dotenvy::dotenv() {
        match &err {
            dotenvy::Error::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound => {}
            _ => debug!(?err, "unable to load .env file"),
        }
    }
}

fn should_load_dotenv() -> bool {
    cfg!(debug_assertions) || parse_bool("ALLOW_DOTENV", false)
}

fn parse_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(default)
}

fn parse_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    // Single test so the env mutations cannot race a parallel test thread.
    #[test]
    fn credential_lookup_tries_both_names() {
        env::remove_var("API_KEY");
        env::remove_var("MAPS_API_KEY");
        let err = AppConfig::from_env().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        env::set_var("MAPS_API_KEY", "fallback-credential");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.api_key.expose_secret(), "fallback-credential");
        assert_eq!(config.geocode_endpoint, DEFAULT_GEOCODE_ENDPOINT);
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(config.throttle_ms, DEFAULT_THROTTLE_MS);

        env::set_var("API_KEY", "primary-credential");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.api_key.expose_secret(), "primary-credential");

        env::remove_var("API_KEY");
        env::remove_var("MAPS_API_KEY");
    }
}
