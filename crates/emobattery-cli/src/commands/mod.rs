pub mod battery;
pub mod config;
pub mod month;
pub mod record;
