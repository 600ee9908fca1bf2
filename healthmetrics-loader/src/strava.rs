use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;

const ACTIVITIES_PER_PAGE: &str = "200";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("strava unreachable")]
    CommunicationError,
    #[error("access token rejected")]
    Unauthorized,
    #[error("invalid request")]
    RequestError,
    #[error("strava server error")]
    ServerError,
    #[error("incorrect strava response")]
    ResponseError,
}

pub type Result<T> = std::result::Result<T, Error>;

/// The subset of Strava's summary activity that gets imported.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SummaryActivity {
    pub id: u64,
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default)]
    pub sport_type: Option<String>,
    pub start_date: DateTime<Utc>,
    /// Strava marks local times with a `Z` suffix too.
    #[serde(default)]
    pub start_date_local: Option<DateTime<Utc>>,
    /// Seconds.
    pub elapsed_time: u32,
    /// Seconds.
    #[serde(default)]
    pub moving_time: u32,
    /// Metres.
    pub distance: f64,
    #[serde(default)]
    pub average_heartrate: Option<f64>,
}

#[mockall::automock]
#[async_trait]
pub trait StravaApi: Send + Sync {
    async fn athlete_activities(&self, access_token: &str) -> Result<Vec<SummaryActivity>>;
}

pub struct StravaClient {
    url: String,
    client: reqwest::Client,
}

impl StravaClient {
    fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

pub fn create(url: String) -> impl StravaApi {
    StravaClient::new(url)
}

#[async_trait]
impl StravaApi for StravaClient {
    async fn athlete_activities(&self, access_token: &str) -> Result<Vec<SummaryActivity>> {
        let url = format!("{}/athlete/activities", self.url.trim_end_matches('/'));
        debug!("Fetching {}", url);
        self.client
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("per_page", ACTIVITIES_PER_PAGE)])
            .send()
            .await
            .map_err(|_| Error::CommunicationError)
            .and_then(|resp| {
                if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
                    Err(Error::Unauthorized)
                } else if resp.status().is_client_error() {
                    Err(Error::RequestError)
                } else if resp.status().is_server_error() {
                    Err(Error::ServerError)
                } else {
                    Ok(resp)
                }
            })?
            .json()
            .await
            .map_err(|_| Error::ResponseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_summary_activity() {
        let json = r#"[{
            "id": 154504250376823,
            "name": "Happy Friday",
            "type": "Ride",
            "sport_type": "MountainBikeRide",
            "start_date": "2018-05-02T12:15:09Z",
            "start_date_local": "2018-05-02T05:15:09Z",
            "elapsed_time": 4500,
            "moving_time": 4207,
            "distance": 28099.0,
            "average_speed": 6.679
        }]"#;

        let activities: Vec<SummaryActivity> = serde_json::from_str(json).unwrap();

        assert_eq!(activities.len(), 1);
        let activity = &activities[0];
        assert_eq!(activity.id, 154504250376823);
        assert_eq!(activity.activity_type, "Ride");
        assert_eq!(activity.sport_type.as_deref(), Some("MountainBikeRide"));
        assert_eq!(activity.elapsed_time, 4500);
        assert_eq!(activity.moving_time, 4207);
        assert_eq!(activity.average_heartrate, None);
    }
}
