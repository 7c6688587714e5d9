//! Service configuration

use anyhow::Result;
use std::env;

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `APP_HOST`: Interface to bind (default: "0.0.0.0")
    /// - `APP_PORT`: Port to listen on (default: 8080)
    /// - `RUN_MIGRATIONS`: Apply migrations at startup (default: true)
    pub fn from_env() -> Result<Self> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid APP_PORT: {}", e))?;

        let run_migrations = env::var("RUN_MIGRATIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(true);

        Ok(AppConfig {
            host,
            port,
            run_migrations,
        })
    }

    /// Address the listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            env::remove_var("APP_HOST");
            env::remove_var("APP_PORT");
            env::remove_var("RUN_MIGRATIONS");
        }
    }

    #[test]
    #[serial]
    fn test_app_config_defaults() {
        clear_env();

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert!(config.run_migrations);
    }

    #[test]
    #[serial]
    fn test_app_config_from_env_with_custom_values() {
        clear_env();
        unsafe {
            env::set_var("APP_HOST", "127.0.0.1");
            env::set_var("APP_PORT", "9000");
            env::set_var("RUN_MIGRATIONS", "false");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert!(!config.run_migrations);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_app_config_rejects_bad_port() {
        clear_env();
        unsafe {
            env::set_var("APP_PORT", "http");
        }

        assert!(AppConfig::from_env().is_err());

        clear_env();
    }
}
