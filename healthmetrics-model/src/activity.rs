use chrono::NaiveDate;
use strum::{Display, EnumIter, EnumString};

use crate::{
    user::UserId,
    validation::{check_not_in_future, FieldError, Validate, ValidationErrors},
};

/// Vigorous minutes count this many times towards the intensity total.
pub const VIGOROUS_WEIGHT: i64 = 2;

#[derive(Clone, Copy, Debug, Display, EnumIter, EnumString, Eq, Hash, PartialEq)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ActivityType {
    Run,
    Walk,
    Cycle,
}

impl ActivityType {
    pub fn parse(value: &str) -> Result<Self, FieldError> {
        value.parse().map_err(|_| {
            FieldError::new(
                "activity_type",
                format!(
                    "Select a valid choice. {} is not one of the available choices.",
                    value
                ),
            )
        })
    }
}

/// Where an activity entry came from.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Source {
    #[default]
    Manual,
    Strava(u64),
}

/// An exercise entry. Duration and intensity minutes are whole minutes,
/// distance is in kilometres.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Activity {
    pub user: UserId,
    pub date: NaiveDate,
    pub activity_type: ActivityType,
    pub duration: i32,
    pub distance: f64,
    pub intensity_minutes_moderate: i32,
    pub intensity_minutes_vigorous: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub source: Source,
}

impl Activity {
    pub fn intensity_minutes_total(&self) -> i64 {
        intensity_minutes_total(
            self.intensity_minutes_moderate,
            self.intensity_minutes_vigorous,
        )
    }
}

pub fn intensity_minutes_total(moderate: i32, vigorous: i32) -> i64 {
    i64::from(moderate) + VIGOROUS_WEIGHT * i64::from(vigorous)
}

impl Validate for Activity {
    fn validate(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_not_in_future(&mut errors, "date", self.date, today);
        errors.check(
            self.duration > 0,
            "duration",
            "Duration must be greater than zero.",
        );
        errors.check(
            self.distance >= 0.0,
            "distance",
            "Distance cannot be negative.",
        );
        errors.check(
            self.intensity_minutes_moderate >= 0,
            "intensity_minutes_moderate",
            "Moderate intensity minutes cannot be negative.",
        );
        errors.check(
            self.intensity_minutes_vigorous >= 0,
            "intensity_minutes_vigorous",
            "Vigorous intensity minutes cannot be negative.",
        );

        let intensity_minutes = i64::from(self.intensity_minutes_moderate)
            + i64::from(self.intensity_minutes_vigorous);
        errors.check(
            i64::from(self.duration) <= intensity_minutes,
            "duration",
            format!(
                "Duration of {} minutes exceeds the {} reported intensity minutes.",
                self.duration, intensity_minutes
            ),
        );

        errors.into_result()
    }
}
