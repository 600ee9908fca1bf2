use std::{env, path::PathBuf, str::FromStr, time::Duration};

use dotenv::dotenv;

const DEFAULT_STRAVA_API_URL: &str = "https://www.strava.com/api/v3";
const DEFAULT_PROFILES_FILE: &str = "profiles.json";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 3600;
const DEFAULT_VIGOROUS_HEART_RATE: f64 = 150.0;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub strava_api_url: String,
    pub records_api_url: String,
    pub profiles_file: PathBuf,
    pub poll_interval: Duration,
    pub vigorous_heart_rate: f64,
}

impl Config {
    /// Reads the configuration from the environment, after loading `.env`
    /// if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let poll_interval_secs: u64 =
            parse_or(&lookup, "POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        if poll_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "POLL_INTERVAL_SECS",
                value: poll_interval_secs.to_string(),
            });
        }

        Ok(Self {
            strava_api_url: lookup("STRAVA_API_URL")
                .unwrap_or_else(|| DEFAULT_STRAVA_API_URL.to_owned()),
            records_api_url: lookup("RECORDS_API_URL")
                .ok_or(ConfigError::Missing("RECORDS_API_URL"))?,
            profiles_file: lookup("PROFILES_FILE")
                .unwrap_or_else(|| DEFAULT_PROFILES_FILE.to_owned())
                .into(),
            poll_interval: Duration::from_secs(poll_interval_secs),
            vigorous_heart_rate: parse_or(
                &lookup,
                "VIGOROUS_HEART_RATE",
                DEFAULT_VIGOROUS_HEART_RATE,
            )?,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
