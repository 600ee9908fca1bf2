use std::{env, error::Error, fs::File, io::BufReader};

use chrono::Local;
use healthmetrics_model::{
    activity::Activity,
    body::BodyMeasurement,
    cessation::Cessation,
    validation::{Validate, ValidationErrors},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Deserialize)]
struct Records {
    #[serde(default)]
    cessation: Vec<Cessation>,
    #[serde(default)]
    body: Vec<BodyMeasurement>,
    #[serde(default)]
    activity: Vec<Activity>,
}

fn rejected(errors: &ValidationErrors) -> Value {
    json!({ "rejected": errors })
}

fn with_record<T: Serialize>(record: &T, derived: Value) -> Value {
    json!({ "record": record, "derived": derived })
}

fn main() -> Result<(), Box<dyn Error>> {
    let path = env::args().nth(1).unwrap_or_else(|| "data.json".to_owned());
    let file = File::open(path)?;
    let records: Records = serde_json::from_reader(BufReader::new(file))?;

    let now = Local::now().naive_local();
    let today = now.date();

    let cessation: Vec<Value> = records
        .cessation
        .iter()
        .map(|record| {
            let derived = match record
                .validate(today)
                .and_then(|_| record.time_since_quit_breakdown(now))
            {
                Ok(breakdown) => json!({
                    "time_since_quit": breakdown,
                    "money_saved": record.money_saved(now).round_dp(2).to_string(),
                }),
                Err(errors) => rejected(&errors),
            };
            with_record(record, derived)
        })
        .collect();

    let body: Vec<Value> = records
        .body
        .iter()
        .map(|record| {
            let derived = match record.validate(today) {
                Ok(()) => json!({
                    "bmi": record.bmi(),
                    "bmi_category": record.bmi_category(),
                    "waist_healthy": record.is_waist_healthy(),
                }),
                Err(errors) => rejected(&errors),
            };
            with_record(record, derived)
        })
        .collect();

    let activity: Vec<Value> = records
        .activity
        .iter()
        .map(|record| {
            let derived = match record.validate(today) {
                Ok(()) => json!({ "intensity_minutes_total": record.intensity_minutes_total() }),
                Err(errors) => rejected(&errors),
            };
            with_record(record, derived)
        })
        .collect();

    let report = json!({
        "generated_at": now,
        "cessation": cessation,
        "body": body,
        "activity": activity,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
