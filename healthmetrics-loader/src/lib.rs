pub mod config;
pub mod mapping;
pub mod profiles;
pub mod strava;

use std::{
    collections::{hash_map::Entry, HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use futures::lock::Mutex;
use healthmetrics_client::Client;
use healthmetrics_model::{
    activity::{Activity, Source},
    profile::{Profile, ProfileLookup},
    user::UserId,
};
use log::{debug, error, info, warn};
use tokio::time;

use crate::{
    mapping::{ActivityMapper, MappingError},
    strava::StravaApi,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to fetch activities from Strava: {0}")]
    Strava(#[from] strava::Error),
    #[error("record store request failed: {0}")]
    Client(#[from] healthmetrics_client::Error),
}

/// Periodically copies new Strava activities of every connected user into
/// the record store.
pub struct Loader {
    strava: Box<dyn StravaApi>,
    profiles: Box<dyn ProfileLookup>,
    client: Box<dyn Client>,
    mapper: ActivityMapper,
    poll_interval: Duration,
    /// Strava ids already in the store, per user. Seeded from the store the
    /// first time a user is seen and limited to the most recent page.
    imported: Mutex<HashMap<UserId, HashSet<u64>>>,
    running: Arc<AtomicBool>,
}

impl Loader {
    pub fn new(
        strava: Box<dyn StravaApi>,
        profiles: Box<dyn ProfileLookup>,
        client: Box<dyn Client>,
        mapper: ActivityMapper,
        poll_interval: Duration,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            strava,
            profiles,
            client,
            mapper,
            poll_interval,
            imported: Mutex::new(HashMap::new()),
            running,
        }
    }

    pub async fn run(&self) {
        info!("Polling Strava every {:?}", self.poll_interval);
        let mut next_poll = Instant::now();
        while self.running.load(Ordering::Relaxed) {
            if Instant::now() >= next_poll {
                let imported = self.poll(Utc::now()).await;
                info!("Imported {} activities", imported);
                next_poll = Instant::now() + self.poll_interval;
            }
            time::sleep(Duration::from_secs(1)).await;
        }
        info!("Received stop signal, terminating...");
    }

    /// Imports activities of all connected profiles and returns how many
    /// were stored. Failures are logged and only affect their own profile.
    pub async fn poll(&self, now: DateTime<Utc>) -> usize {
        let profiles = self.profiles.connected_profiles();
        info!("Checking {} connected profiles", profiles.len());
        self.imported
            .lock()
            .await
            .retain(|user, _| profiles.iter().any(|profile| profile.user == *user));

        let mut total = 0;
        for profile in profiles {
            match self.import_profile(&profile, now).await {
                Ok(count) => total += count,
                Err(e) => error!("Failed to import activities of {}: {}", profile.user, e),
            }
        }
        total
    }

    async fn import_profile(&self, profile: &Profile, now: DateTime<Utc>) -> Result<usize, Error> {
        let Some(credentials) = &profile.strava else {
            return Ok(0);
        };
        if credentials.is_expired(now) {
            warn!(
                "Strava token of {} has expired, skipping until it is refreshed",
                profile.user
            );
            return Ok(0);
        }

        let summaries = self
            .strava
            .athlete_activities(&credentials.access_token)
            .await?;
        info!("Fetched {} activities for {}", summaries.len(), profile.user);

        let mut imported = self.imported.lock().await;
        let known = match imported.entry(profile.user) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let stored = strava_ids(&self.client.get_activities(profile.user).await?);
                debug!("{} already has {} Strava activities", profile.user, stored.len());
                entry.insert(stored)
            }
        };
        known.retain(|id| summaries.iter().any(|summary| summary.id == *id));

        let (ids, activities): (Vec<u64>, Vec<Activity>) = summaries
            .iter()
            .filter(|summary| !known.contains(&summary.id))
            .filter_map(|summary| match self.mapper.map(profile.user, summary, now) {
                Ok(activity) => Some((summary.id, activity)),
                Err(MappingError::UnsupportedType(activity_type)) => {
                    debug!(
                        "Skipping Strava activity {} of type {}",
                        summary.id, activity_type
                    );
                    None
                }
                Err(e) => {
                    warn!("Skipping Strava activity {}: {}", summary.id, e);
                    None
                }
            })
            .unzip();

        if activities.is_empty() {
            return Ok(0);
        }
        debug!("Last 3 activities mapped");
        activities
            .iter()
            .rev()
            .take(3)
            .for_each(|activity| debug!("{:?}", activity));

        info!("Posting {} activities", activities.len());
        self.client.post_activities(&activities).await?;
        known.extend(ids);
        Ok(activities.len())
    }
}

fn strava_ids(activities: &[Activity]) -> HashSet<u64> {
    activities
        .iter()
        .filter_map(|activity| match activity.source {
            Source::Strava(id) => Some(id),
            Source::Manual => None,
        })
        .collect()
}
