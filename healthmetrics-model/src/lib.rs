pub mod activity;
pub mod body;
pub mod calendar;
pub mod cessation;
pub mod profile;
pub mod user;
pub mod validation;
