//! Shared command context: configuration, database and aggregator wiring.

use std::path::PathBuf;

use emobattery_core::{Config, Database, MonthlyAggregator, SystemClock};

/// Global options resolved once per invocation.
pub struct Context {
    pub config: Config,
    pub config_path: PathBuf,
    db_override: Option<PathBuf>,
}

impl Context {
    pub fn load(
        config_path: Option<PathBuf>,
        db_override: Option<PathBuf>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = match config_path {
            Some(path) => path,
            None => Config::path()?,
        };
        let config = Config::load_from(&config_path)?;
        tracing::debug!(path = %config_path.display(), "loaded configuration");
        Ok(Self {
            config,
            config_path,
            db_override,
        })
    }

    pub fn database_path(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        match &self.db_override {
            Some(path) => Ok(path.clone()),
            None => Ok(self.config.database_path()?),
        }
    }

    pub fn open_db(&self) -> Result<Database, Box<dyn std::error::Error>> {
        let path = self.database_path()?;
        tracing::debug!(path = %path.display(), "opening database");
        Ok(Database::open_at(path)?)
    }

    pub fn aggregator<'a>(&self, db: &'a Database) -> MonthlyAggregator<&'a Database, SystemClock> {
        MonthlyAggregator::new(db, self.config.battery.clone(), self.config.clock())
    }
}

/// Print a value as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
