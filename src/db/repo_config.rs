//! Service configuration file support.
//!
//! Reads `slotgrid.toml`: which repository backend to use, where the HTTP
//! server binds, and the listing records to seed at startup. Seeding through
//! configuration keeps bootstrap out of request handlers entirely.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::RepositoryError;
use super::factory::RepositoryType;
use crate::api::{ListingId, OperatorId};
use crate::models::window::{BookingUnitType, ListingConfig, ListingRecord};

/// Service configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub server: ServerSettings,
    /// Listings to upsert at startup.
    #[serde(default, rename = "listing")]
    pub listings: Vec<ListingSeed>,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
        }
    }
}

fn default_repo_type() -> String {
    "local".to_string()
}

/// HTTP bind settings, overridable via `HOST`/`PORT` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// One listing record as declared in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSeed {
    pub id: i64,
    pub operator_id: i64,
    pub booking_unit_type: BookingUnitType,
    #[serde(default)]
    pub slot_duration_minutes: Option<u32>,
    #[serde(default)]
    pub min_advance_hours: Option<u32>,
    #[serde(default)]
    pub max_advance_days: Option<u32>,
}

impl ListingSeed {
    pub fn to_record(&self) -> ListingRecord {
        ListingRecord {
            id: ListingId::new(self.id),
            operator_id: OperatorId::new(self.operator_id),
            config: ListingConfig {
                booking_unit_type: self.booking_unit_type,
                slot_duration_minutes: self.slot_duration_minutes,
                min_advance_hours: self.min_advance_hours,
                max_advance_days: self.max_advance_days,
            },
        }
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            repository: RepositorySettings::default(),
            server: ServerSettings::default(),
            listings: Vec::new(),
        }
    }
}

impl RepositoryConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: RepositoryConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load configuration from the default locations, falling back to the
    /// built-in defaults when no file exists.
    ///
    /// Searches for `slotgrid.toml` in the current directory and the parent
    /// directory.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("slotgrid.toml"),
            PathBuf::from("../slotgrid.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Get the repository type, letting `REPOSITORY_TYPE` override the file.
    pub fn repository_type(&self) -> Result<RepositoryType, RepositoryError> {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return RepositoryType::from_str(&val).map_err(RepositoryError::configuration);
        }
        RepositoryType::from_str(&self.repository.repo_type).map_err(RepositoryError::configuration)
    }
}
