use chrono::{DateTime, Utc};
use healthmetrics_model::{
    activity::{Activity, ActivityType, Source},
    user::UserId,
    validation::{Validate, ValidationErrors},
};

use crate::strava::SummaryActivity;

const SECONDS_PER_MINUTE: u32 = 60;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum MappingError {
    #[error("unsupported activity type {0}")]
    UnsupportedType(String),
    #[error("invalid activity: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// Turns Strava activities into activity records. The whole activity is
/// counted as vigorous when its average heart rate reaches
/// `vigorous_heart_rate`, and as moderate otherwise.
#[derive(Clone, Copy, Debug)]
pub struct ActivityMapper {
    vigorous_heart_rate: f64,
}

impl ActivityMapper {
    pub fn new(vigorous_heart_rate: f64) -> Self {
        Self {
            vigorous_heart_rate,
        }
    }

    pub fn map(
        &self,
        user: UserId,
        summary: &SummaryActivity,
        now: DateTime<Utc>,
    ) -> Result<Activity, MappingError> {
        let activity_type = activity_type(summary)?;
        let duration = whole_minutes(summary.elapsed_time);
        let vigorous = summary
            .average_heartrate
            .is_some_and(|heart_rate| heart_rate >= self.vigorous_heart_rate);
        let (moderate, vigorous) = if vigorous {
            (0, duration)
        } else {
            (duration, 0)
        };

        // Dates are local to the athlete, and so is "today".
        let local_start = summary.start_date_local.unwrap_or(summary.start_date);
        let today = (now + (local_start - summary.start_date)).date_naive();

        let activity = Activity {
            user,
            date: local_start.date_naive(),
            activity_type,
            duration,
            distance: summary.distance / 1000.0,
            intensity_minutes_moderate: moderate,
            intensity_minutes_vigorous: vigorous,
            source: Source::Strava(summary.id),
        };
        activity.validate(today)?;
        Ok(activity)
    }
}

fn activity_type(summary: &SummaryActivity) -> Result<ActivityType, MappingError> {
    let name = summary
        .sport_type
        .as_deref()
        .unwrap_or(&summary.activity_type);
    match name {
        "Run" | "TrailRun" | "VirtualRun" => Ok(ActivityType::Run),
        "Walk" | "Hike" => Ok(ActivityType::Walk),
        "Ride" | "VirtualRide" | "EBikeRide" | "GravelRide" | "MountainBikeRide" => {
            Ok(ActivityType::Cycle)
        }
        other => Err(MappingError::UnsupportedType(other.to_owned())),
    }
}

/// Rounds to the nearest minute; anything recorded lasts at least one.
fn whole_minutes(seconds: u32) -> i32 {
    let minutes = (seconds.saturating_add(SECONDS_PER_MINUTE / 2) / SECONDS_PER_MINUTE).max(1);
    i32::try_from(minutes).unwrap_or(i32::MAX)
}
