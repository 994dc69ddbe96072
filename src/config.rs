use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::model::{BudgetLevel, Priority};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub trip: TripDefaults,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub directory: Option<String>,
    pub retention_days: Option<u64>,
}

/// Prefill values for the trip form. Dates default to a window a month out
/// so a fresh install can submit without typing everything.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TripDefaults {
    #[serde(default = "default_city")]
    pub destination_city: String,
    #[serde(default = "default_country")]
    pub destination_country: String,
    #[serde(default)]
    pub depart_date: Option<String>,
    #[serde(default)]
    pub return_date: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    #[serde(default = "default_budget")]
    pub budget_level: BudgetLevel,
    #[serde(default = "default_departure_airport")]
    pub departure_airport: String,
    #[serde(default)]
    pub destination_airport: Option<String>,
    #[serde(default)]
    pub additional_preferences: Option<String>,
}

impl Default for TripDefaults {
    fn default() -> Self {
        Self {
            destination_city: default_city(),
            destination_country: default_country(),
            depart_date: None,
            return_date: None,
            priority: default_priority(),
            budget_level: default_budget(),
            departure_airport: default_departure_airport(),
            destination_airport: None,
            additional_preferences: None,
        }
    }
}

impl TripDefaults {
    pub fn depart_date_or_default(&self) -> String {
        self.depart_date
            .clone()
            .unwrap_or_else(|| date_weeks_out(4))
    }

    pub fn return_date_or_default(&self) -> String {
        self.return_date
            .clone()
            .unwrap_or_else(|| date_weeks_out(5))
    }
}

fn date_weeks_out(weeks: i64) -> String {
    (chrono::Local::now().date_naive() + chrono::Duration::weeks(weeks))
        .format("%Y-%m-%d")
        .to_string()
}

fn default_city() -> String {
    "Tokyo".to_string()
}

fn default_country() -> String {
    "Japan".to_string()
}

fn default_priority() -> Priority {
    Priority::Food
}

fn default_budget() -> BudgetLevel {
    BudgetLevel::Flexible
}

fn default_departure_airport() -> String {
    "LHR".to_string()
}

impl Config {
    /// Load the config, returning the path it came from. Search order:
    /// `TRIPDECK_CONFIG`, `./tripdeck.toml`, then the per-user config dir.
    /// No file found falls back to defaults.
    pub fn load_with_path() -> Result<(Self, Option<PathBuf>)> {
        let mut candidates = Vec::new();

        if let Ok(explicit) = std::env::var("TRIPDECK_CONFIG") {
            candidates.push(PathBuf::from(explicit));
        }

        candidates.push(PathBuf::from("tripdeck.toml"));

        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("tripdeck").join("tripdeck.toml"));
        }

        for path in candidates {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: Config = toml::from_str(&content)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((Config::default(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.trip.destination_city, "Tokyo");
        assert_eq!(config.trip.priority, Priority::Food);
        assert_eq!(config.trip.budget_level, BudgetLevel::Flexible);
    }

    #[test]
    fn partial_config_overrides_selectively() {
        let raw = r#"
            [api]
            base_url = "http://planner.internal:9000/"

            [trip]
            destination_city = "Lisbon"
            destination_country = "Portugal"
            priority = "culture"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.api.base_url, "http://planner.internal:9000/");
        assert_eq!(config.trip.destination_city, "Lisbon");
        assert_eq!(config.trip.priority, Priority::Culture);
        // Untouched fields keep their defaults.
        assert_eq!(config.trip.departure_airport, "LHR");
    }

    #[test]
    fn default_dates_are_iso_formatted() {
        let defaults = TripDefaults::default();
        let depart = defaults.depart_date_or_default();
        assert!(chrono::NaiveDate::parse_from_str(&depart, "%Y-%m-%d").is_ok());
        assert!(defaults.return_date_or_default() > depart);
    }
}
