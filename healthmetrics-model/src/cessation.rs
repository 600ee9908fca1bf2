use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::{
    calendar::{self, ElapsedTime},
    user::UserId,
    validation::{check_not_in_future, FieldError, Validate, ValidationErrors},
};

pub const CIGARETTES_PER_PACK: u32 = 20;

/// Largest number of fractional digits accepted for a pack price.
pub const COST_DECIMAL_PLACES: u32 = 2;

/// A smoking-cessation entry. Everything derived from it is computed
/// against a caller-supplied instant and never stored.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cessation {
    pub user: UserId,
    pub start_date: NaiveDate,
    pub quit_date: NaiveDate,
    #[cfg_attr(feature = "serde", serde(with = "rust_decimal::serde::str"))]
    pub cost_per_pack: Decimal,
    pub cigarettes_per_day: u32,
}

impl Cessation {
    pub fn new(
        user: UserId,
        start_date: NaiveDate,
        quit_date: NaiveDate,
        cost_per_pack: Decimal,
        cigarettes_per_day: u32,
    ) -> Self {
        Self {
            user,
            start_date,
            quit_date,
            cost_per_pack,
            cigarettes_per_day,
        }
    }

    /// Time since midnight of the quit date. Fails when the quit date is
    /// after `now`.
    pub fn time_since_quit_breakdown(
        &self,
        now: NaiveDateTime,
    ) -> Result<ElapsedTime, ValidationErrors> {
        calendar::elapsed(self.quit_date, now).ok_or_else(|| {
            FieldError::new("quit_date", "Quit date cannot be in the future.").into()
        })
    }

    /// Whole days between the quit date and the date of `now`, never
    /// negative.
    pub fn days_since_quit(&self, now: NaiveDateTime) -> i64 {
        now.date()
            .signed_duration_since(self.quit_date)
            .num_days()
            .max(0)
    }

    pub fn money_saved(&self, now: NaiveDateTime) -> Decimal {
        money_saved(
            self.days_since_quit(now),
            self.cigarettes_per_day,
            self.cost_per_pack,
        )
    }
}

/// Money not spent on cigarettes over `days` days, computed in exact
/// decimal arithmetic.
pub fn money_saved(days: i64, cigarettes_per_day: u32, cost_per_pack: Decimal) -> Decimal {
    let packs_per_day = Decimal::from(cigarettes_per_day) / Decimal::from(CIGARETTES_PER_PACK);
    Decimal::from(days) * packs_per_day * cost_per_pack
}

impl Validate for Cessation {
    fn validate(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_not_in_future(&mut errors, "start_date", self.start_date, today);
        check_not_in_future(&mut errors, "quit_date", self.quit_date, today);
        errors.check(
            self.quit_date >= self.start_date,
            "quit_date",
            "Quit date cannot be before the start date.",
        );
        errors.check(
            self.cost_per_pack > Decimal::ZERO,
            "cost_per_pack",
            "Cost per pack must be greater than zero.",
        );
        errors.check(
            self.cost_per_pack.normalize().scale() <= COST_DECIMAL_PLACES,
            "cost_per_pack",
            format!(
                "Ensure that there are no more than {} decimal places.",
                COST_DECIMAL_PLACES
            ),
        );
        errors.check(
            self.cigarettes_per_day > 0,
            "cigarettes_per_day",
            "Cigarettes per day must be greater than zero.",
        );

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use rust_decimal_macros::dec;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn at_midnight(date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN)
    }

    fn cessation() -> Cessation {
        Cessation::new(
            UserId(1),
            date(2019, 11, 6),
            date(2022, 2, 28),
            dec!(20.18),
            25,
        )
    }

    #[test]
    fn time_since_quit_breakdown() {
        let now = at_midnight(date(2024, 6, 29));
        let breakdown = cessation().time_since_quit_breakdown(now).unwrap();

        assert_eq!(breakdown.calendar.years, 2);
        assert_eq!(breakdown.calendar.months, 4);
        assert_eq!(breakdown.calendar.days, 1);
        assert!(breakdown.calendar.hours >= 0);
        assert!(breakdown.calendar.minutes >= 0);
        assert!(breakdown.calendar.seconds >= 0);
    }

    #[test]
    fn quitting_today_gives_zero_breakdown() {
        let record = Cessation {
            quit_date: date(2024, 6, 29),
            ..cessation()
        };
        let breakdown = record
            .time_since_quit_breakdown(at_midnight(date(2024, 6, 29)))
            .unwrap();

        assert_eq!((breakdown.calendar.years, breakdown.calendar.months), (0, 0));
        assert_eq!(breakdown.calendar.days, 0);
        assert_eq!(breakdown.calendar.hours, 0);
        assert_eq!(breakdown.calendar.minutes, 0);
        assert_eq!(breakdown.calendar.seconds, 0);
    }

    #[test]
    fn months_borrowed_from_years() {
        let record = Cessation {
            quit_date: date(2023, 8, 29),
            ..cessation()
        };
        let breakdown = record
            .time_since_quit_breakdown(at_midnight(date(2024, 6, 1)))
            .unwrap();

        assert_eq!(breakdown.calendar.years, 0);
        assert_eq!(breakdown.calendar.months, 9);
        assert!(breakdown.calendar.days >= 0);
    }

    #[test]
    fn months_borrowed_because_of_days() {
        let record = Cessation {
            quit_date: date(2023, 12, 31),
            ..cessation()
        };
        let breakdown = record
            .time_since_quit_breakdown(at_midnight(date(2024, 1, 1)))
            .unwrap();

        assert_eq!(breakdown.calendar.years, 0);
        assert_eq!(breakdown.calendar.months, 0);
        assert_eq!(breakdown.calendar.days, 1);
    }

    #[test]
    fn breakdown_rejects_quit_date_after_now() {
        let errors = cessation()
            .time_since_quit_breakdown(at_midnight(date(2022, 2, 27)))
            .unwrap_err();

        assert!(errors.contains("quit_date"));
    }

    #[test]
    fn money_saved_since_quit() {
        let now = at_midnight(date(2024, 6, 29));
        let days = (date(2024, 6, 29) - date(2022, 2, 28)).num_days();

        assert_eq!(days, 852);
        assert_eq!(
            cessation().money_saved(now),
            Decimal::from(days) * dec!(1.25) * dec!(20.18)
        );
        assert_eq!(cessation().money_saved(now), dec!(21491.70));
    }

    #[test]
    fn money_saved_is_linear() {
        let test_data = [
            (10, 20, dec!(8.50)),
            (365, 7, dec!(12.99)),
            (1, 1, dec!(0.01)),
            (852, 25, dec!(20.18)),
        ];

        for (i, (days, per_day, cost)) in test_data.into_iter().enumerate() {
            assert_eq!(
                money_saved(2 * days, per_day, cost),
                dec!(2) * money_saved(days, per_day, cost),
                "Test case #{}",
                i
            );
            assert_eq!(
                money_saved(days, 3 * per_day, cost),
                dec!(3) * money_saved(days, per_day, cost),
                "Test case #{}",
                i
            );
        }
    }

    #[test]
    fn money_saved_before_quitting_is_zero() {
        let now = at_midnight(date(2022, 1, 1));
        assert_eq!(cessation().money_saved(now), Decimal::ZERO);
    }

    #[test]
    fn valid_record_passes() {
        assert_eq!(cessation().validate(date(2024, 6, 29)), Ok(()));
    }

    #[test]
    fn invalid_records_are_rejected() {
        let today = date(2024, 6, 29);
        let test_data = [
            (
                Cessation {
                    quit_date: date(2019, 1, 1),
                    ..cessation()
                },
                "quit_date",
            ),
            (
                Cessation {
                    quit_date: date(2024, 7, 1),
                    ..cessation()
                },
                "quit_date",
            ),
            (
                Cessation {
                    start_date: date(2024, 7, 1),
                    quit_date: date(2024, 7, 2),
                    ..cessation()
                },
                "start_date",
            ),
            (
                Cessation {
                    cost_per_pack: dec!(0),
                    ..cessation()
                },
                "cost_per_pack",
            ),
            (
                Cessation {
                    cost_per_pack: dec!(-3.50),
                    ..cessation()
                },
                "cost_per_pack",
            ),
            (
                Cessation {
                    cost_per_pack: dec!(10.125),
                    ..cessation()
                },
                "cost_per_pack",
            ),
            (
                Cessation {
                    cigarettes_per_day: 0,
                    ..cessation()
                },
                "cigarettes_per_day",
            ),
        ];

        for (i, (record, field)) in test_data.into_iter().enumerate() {
            let errors = record.validate(today).unwrap_err();
            assert!(errors.contains(field), "Test case #{}: {}", i, errors);
        }
    }

    #[test]
    fn trailing_zeros_do_not_count_as_decimal_places() {
        let record = Cessation {
            cost_per_pack: dec!(10.5000),
            ..cessation()
        };
        assert_eq!(record.validate(date(2024, 6, 29)), Ok(()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn cost_is_serialized_as_exact_string() {
        let json = serde_json::to_value(cessation()).unwrap();
        assert_eq!(json["cost_per_pack"], "20.18");

        let parsed: Cessation = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, cessation());
    }
}
