use async_trait::async_trait;
use healthmetrics_model::{activity::Activity, user::UserId};
use log::debug;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("server unreachable")]
    CommunicationError,
    #[error("internal server error")]
    InternalServerError,
    #[error("invalid request")]
    RequestError,
    #[error("incorrect server response")]
    ResponseError,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Hands validated records over to the web application, which owns their
/// storage.
#[mockall::automock]
#[async_trait]
pub trait Client: Send + Sync {
    async fn get_activities(&self, user: UserId) -> Result<Vec<Activity>>;
    async fn post_activities(&self, activities: &[Activity]) -> Result<()>;
}

pub struct ClientImpl {
    url: String,
    client: reqwest::Client,
}

impl ClientImpl {
    fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

pub fn create(url: String) -> impl Client {
    ClientImpl::new(url)
}

#[async_trait]
impl Client for ClientImpl {
    async fn get_activities(&self, user: UserId) -> Result<Vec<Activity>> {
        debug!("Fetching activities of {} from {}", user, self.url);
        self.client
            .get(&self.url)
            .query(&[("user", user.0)])
            .send()
            .await
            .map_err(|_| Error::CommunicationError)
            .and_then(|resp| {
                if resp.status().is_client_error() {
                    Err(Error::RequestError)
                } else if resp.status().is_server_error() {
                    Err(Error::InternalServerError)
                } else {
                    Ok(resp)
                }
            })?
            .json()
            .await
            .map_err(|_| Error::ResponseError)
    }

    async fn post_activities(&self, activities: &[Activity]) -> Result<()> {
        debug!("Posting {} activities to {}", activities.len(), self.url);
        self.client
            .post(&self.url)
            .json(&activities)
            .send()
            .await
            .map_err(|_| Error::CommunicationError)
            .and_then(|resp| {
                if resp.status().is_client_error() {
                    Err(Error::RequestError)
                } else if resp.status().is_server_error() {
                    Err(Error::InternalServerError)
                } else {
                    Ok(())
                }
            })
    }
}
