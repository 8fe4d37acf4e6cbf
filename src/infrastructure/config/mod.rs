// ============================================================
// APPLICATION CONFIGURATION
// ============================================================
// Defaults, then Dashboard.toml, then DASHBOARD_* environment variables

use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};
use crate::infrastructure::storage::resolve_data_path;

pub const CONFIG_FILE: &str = "Dashboard.toml";
pub const ENV_PREFIX: &str = "DASHBOARD_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Interface the HTTP server binds to
    pub host: String,

    pub port: u16,

    /// Raises the default log level to debug
    pub debug: bool,

    /// Directory relative file names are resolved against
    pub data_dir: PathBuf,

    /// Primary spreadsheet source (first sheet is used)
    pub spreadsheet_file: String,

    /// Flat-table cache refreshed from the spreadsheet
    pub cache_file: String,

    /// File rewritten on every CSV download
    pub export_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: false,
            data_dir: PathBuf::from("."),
            spreadsheet_file: "India-Advocate -1750.xlsx".to_string(),
            cache_file: "advocates_cache.csv".to_string(),
            export_file: "advocates_normalized.csv".to_string(),
        }
    }
}

impl AppConfig {
    /// Layered configuration sources
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load and validate the configuration
    pub fn load() -> Result<Self> {
        let config: AppConfig = Self::figment()
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(AppError::ValidationError("port must be > 0".to_string()));
        }
        for (name, value) in [
            ("spreadsheet_file", &self.spreadsheet_file),
            ("cache_file", &self.cache_file),
            ("export_file", &self.export_file),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::ValidationError(format!("{} must not be empty", name)));
            }
        }
        Ok(())
    }

    pub fn spreadsheet_path(&self) -> PathBuf {
        resolve_data_path(&self.data_dir, &self.spreadsheet_file)
    }

    pub fn cache_path(&self) -> PathBuf {
        resolve_data_path(&self.data_dir, &self.cache_file)
    }

    pub fn export_path(&self) -> PathBuf {
        resolve_data_path(&self.data_dir, &self.export_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.port, 5000);
        assert!(!config.debug);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.cache_path(),
            PathBuf::from(".").join("advocates_cache.csv")
        );
    }

    #[test]
    fn test_layering_file_then_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                    port = 8080
                    data_dir = "/srv/advocates"
                    cache_file = "cache.csv"
                "#,
            )?;
            jail.set_env("DASHBOARD_PORT", "9090");
            jail.set_env("DASHBOARD_DEBUG", "true");

            let config: AppConfig = AppConfig::figment().extract()?;
            assert_eq!(config.port, 9090);
            assert!(config.debug);
            assert_eq!(config.host, "0.0.0.0");
            assert_eq!(config.cache_path(), PathBuf::from("/srv/advocates/cache.csv"));
            Ok(())
        });
    }

    #[test]
    fn test_validate_rejects_port_zero_and_blank_files() {
        let config = AppConfig {
            port: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AppError::ValidationError(_))));

        let config = AppConfig {
            export_file: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AppError::ValidationError(_))));
    }
}
