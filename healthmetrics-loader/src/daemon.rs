use std::error::Error;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::info;

use healthmetrics_loader::{
    config::Config, mapping::ActivityMapper, profiles::ProfileFile, strava, Loader,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    log4rs::init_file("log4rs.yml", Default::default())?;

    info!("Reading configuration");
    let config = Config::from_env()?;

    info!("Loading profiles from {}", config.profiles_file.display());
    let profiles = Box::new(ProfileFile::from_file(&config.profiles_file)?);
    let strava = Box::new(strava::create(config.strava_api_url.clone()));
    let client = Box::new(healthmetrics_client::create(
        config.records_api_url.clone(),
    ));

    let running = Arc::new(AtomicBool::new(true));
    let loader = Loader::new(
        strava,
        profiles,
        client,
        ActivityMapper::new(config.vigorous_heart_rate),
        config.poll_interval,
        running.clone(),
    );
    ctrlc::set_handler(move || running.store(false, Ordering::Relaxed))?;

    loader.run().await;
    Ok(())
}
