pub mod account;
pub mod calendar;
pub mod config;
pub mod friend;
pub mod journal;
pub mod lang;
pub mod press;
pub mod status;
pub mod tz;
