//! Body measurements and the BMI classification derived from them.

use chrono::NaiveDate;
use strum::{Display, EnumIter, EnumString};

use crate::{
    user::UserId,
    validation::{check_not_in_future, FieldError, Validate, ValidationErrors},
};

const UNDERWEIGHT_BELOW: f64 = 18.5;

/// A waist narrower than this many times the height (in metres) counts as
/// healthy. Waist is in centimetres, so this is a 0.5 waist-to-height ratio.
const WAIST_TO_HEIGHT_FACTOR: f64 = 50.0;

#[derive(Clone, Copy, Debug, Default, Display, EnumIter, EnumString, Eq, Hash, PartialEq)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Ethnicity {
    Asian,
    Black,
    MiddleEastern,
    Mixed,
    White,
    Other,
    #[default]
    PreferNotToSay,
}

impl Ethnicity {
    pub fn parse(value: &str) -> Result<Self, FieldError> {
        value.parse().map_err(|_| {
            FieldError::new(
                "ethnicity",
                format!(
                    "Select a valid choice. {} is not one of the available choices.",
                    value
                ),
            )
        })
    }

    fn thresholds(self) -> BmiThresholds {
        match self {
            Ethnicity::Asian | Ethnicity::Black | Ethnicity::MiddleEastern | Ethnicity::Mixed => {
                BmiThresholds {
                    overweight_from: 23.0,
                    obese_from: 27.5,
                }
            }
            Ethnicity::White | Ethnicity::Other | Ethnicity::PreferNotToSay => BmiThresholds {
                overweight_from: 25.0,
                obese_from: 30.0,
            },
        }
    }
}

struct BmiThresholds {
    overweight_from: f64,
    obese_from: f64,
}

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BmiCategory {
    Underweight,
    Healthy,
    Overweight,
    Obese,
}

pub fn bmi(height: f64, weight: f64) -> Option<f64> {
    if height > 0.0 {
        Some(weight / (height * height))
    } else {
        None
    }
}

pub fn classify(bmi: f64, ethnicity: Ethnicity) -> BmiCategory {
    let thresholds = ethnicity.thresholds();
    if bmi < UNDERWEIGHT_BELOW {
        BmiCategory::Underweight
    } else if bmi < thresholds.overweight_from {
        BmiCategory::Healthy
    } else if bmi < thresholds.obese_from {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

pub fn is_waist_healthy(height: f64, waist_circumference: f64) -> bool {
    waist_circumference < height * WAIST_TO_HEIGHT_FACTOR
}

/// A weight entry. Height is in metres, weight in kilograms and waist
/// circumference in centimetres. BMI is cached whenever height or weight
/// change.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "NewBodyMeasurement")
)]
pub struct BodyMeasurement {
    user: UserId,
    date: NaiveDate,
    height: f64,
    weight: f64,
    ethnicity: Ethnicity,
    waist_circumference: Option<f64>,
    bmi: Option<f64>,
}

/// Body measurement as submitted, before the BMI is derived.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct NewBodyMeasurement {
    pub user: UserId,
    pub date: NaiveDate,
    pub height: f64,
    pub weight: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ethnicity: Ethnicity,
    #[cfg_attr(feature = "serde", serde(default))]
    pub waist_circumference: Option<f64>,
}

impl From<NewBodyMeasurement> for BodyMeasurement {
    fn from(new: NewBodyMeasurement) -> Self {
        Self {
            user: new.user,
            date: new.date,
            height: new.height,
            weight: new.weight,
            ethnicity: new.ethnicity,
            waist_circumference: new.waist_circumference,
            bmi: bmi(new.height, new.weight),
        }
    }
}

impl BodyMeasurement {
    pub fn new(
        user: UserId,
        date: NaiveDate,
        height: f64,
        weight: f64,
        ethnicity: Ethnicity,
        waist_circumference: Option<f64>,
    ) -> Self {
        NewBodyMeasurement {
            user,
            date,
            height,
            weight,
            ethnicity,
            waist_circumference,
        }
        .into()
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn ethnicity(&self) -> Ethnicity {
        self.ethnicity
    }

    pub fn waist_circumference(&self) -> Option<f64> {
        self.waist_circumference
    }

    /// BMI cached when height or weight were last set.
    pub fn bmi(&self) -> Option<f64> {
        self.bmi
    }

    pub fn set_height(&mut self, height: f64) {
        self.height = height;
        self.bmi = self.compute_bmi();
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
        self.bmi = self.compute_bmi();
    }

    pub fn set_ethnicity(&mut self, ethnicity: Ethnicity) {
        self.ethnicity = ethnicity;
    }

    pub fn set_waist_circumference(&mut self, waist_circumference: Option<f64>) {
        self.waist_circumference = waist_circumference;
    }

    pub fn compute_bmi(&self) -> Option<f64> {
        bmi(self.height, self.weight)
    }

    pub fn bmi_category(&self) -> Option<BmiCategory> {
        self.compute_bmi().map(|value| classify(value, self.ethnicity))
    }

    pub fn is_waist_healthy(&self) -> Option<bool> {
        self.waist_circumference.map(|waist| is_waist_healthy(self.height, waist))
    }
}

impl Validate for BodyMeasurement {
    fn validate(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_not_in_future(&mut errors, "date", self.date, today);
        errors.check(
            self.height > 0.0,
            "height",
            "Height must be greater than zero.",
        );
        errors.check(
            self.weight > 0.0,
            "weight",
            "Weight must be greater than zero.",
        );
        if let Some(waist) = self.waist_circumference {
            errors.check(
                waist.is_finite() && waist > 0.0,
                "waist_circumference",
                "Waist circumference must be greater than zero.",
            );
        }

        errors.into_result()
    }
}
