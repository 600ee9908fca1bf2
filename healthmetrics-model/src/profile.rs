use chrono::{DateTime, Utc};

use crate::user::UserId;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StravaCredentials {
    #[cfg_attr(feature = "serde", serde(default))]
    pub athlete_id: Option<u64>,
    pub access_token: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub refresh_token: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StravaCredentials {
    /// Tokens without a known expiry are assumed to be valid.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now)
    }
}

/// Per-user settings kept next to the records, currently the link to the
/// user's Strava account.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile {
    pub user: UserId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub strava: Option<StravaCredentials>,
}

impl Profile {
    pub fn new(user: UserId) -> Self {
        Self { user, strava: None }
    }

    pub fn is_strava_connected(&self) -> bool {
        self.strava.is_some()
    }
}

/// Lookup of user profiles, provided by whatever stores them.
#[mockall::automock]
pub trait ProfileLookup: Send + Sync {
    fn profile_for(&self, user: UserId) -> Option<Profile>;
    fn connected_profiles(&self) -> Vec<Profile>;
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn credentials(expires_at: Option<DateTime<Utc>>) -> StravaCredentials {
        StravaCredentials {
            athlete_id: Some(1234),
            access_token: "token".to_owned(),
            refresh_token: None,
            expires_at,
        }
    }

    #[test]
    fn token_expiry() {
        let now = Utc.with_ymd_and_hms(2024, 9, 7, 16, 50, 0).unwrap();
        let test_data = [
            (None, false),
            (Some(now + Duration::hours(1)), false),
            (Some(now), true),
            (Some(now - Duration::seconds(1)), true),
        ];

        for (i, (expires_at, expected)) in test_data.into_iter().enumerate() {
            assert_eq!(
                credentials(expires_at).is_expired(now),
                expected,
                "Test case #{}",
                i
            );
        }
    }

    #[test]
    fn new_profile_is_not_connected() {
        let mut profile = Profile::new(UserId(3));
        assert!(!profile.is_strava_connected());

        profile.strava = Some(credentials(None));
        assert!(profile.is_strava_connected());
    }
}
