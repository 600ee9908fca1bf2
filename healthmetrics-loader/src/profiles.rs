use std::{error::Error, fs::File, io::BufReader, path::Path};

use healthmetrics_model::{
    profile::{Profile, ProfileLookup},
    user::UserId,
};
use log::{debug, info};

/// Profiles read once from a JSON array.
pub struct ProfileFile {
    profiles: Vec<Profile>,
}

impl ProfileFile {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let file = File::open(path)?;
        let profiles: Vec<Profile> = serde_json::from_reader(BufReader::new(file))?;

        info!("Loaded {} profiles from file", profiles.len());
        debug!(
            "Loaded profiles for users: {:?}",
            profiles.iter().map(|p| p.user).collect::<Vec<_>>()
        );
        Ok(Self::new(profiles))
    }
}

impl ProfileLookup for ProfileFile {
    fn profile_for(&self, user: UserId) -> Option<Profile> {
        self.profiles.iter().find(|p| p.user == user).cloned()
    }

    fn connected_profiles(&self) -> Vec<Profile> {
        self.profiles
            .iter()
            .filter(|p| p.is_strava_connected())
            .cloned()
            .collect()
    }
}
