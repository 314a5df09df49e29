//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Email (SMTP) configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Base URL of the browser client, used to build reset links.
    #[serde(default = "default_client_url")]
    pub client_url: String,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_client_url() -> String {
    "http://localhost:5173".to_string()
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Token expiration in hours.
    #[serde(default = "default_token_expiry_hours")]
    pub token_expiry_hours: i64,
}

fn default_token_expiry_hours() -> i64 {
    24
}

/// Email (SMTP) configuration.
///
/// All transport fields are optional; when any is missing the email service
/// reports delivery as unavailable instead of failing requests.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host.
    pub smtp_host: Option<String>,
    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    pub smtp_username: Option<String>,
    /// SMTP password.
    pub smtp_password: Option<String>,
    /// From address for outgoing mail.
    pub from_email: Option<String>,
    /// From display name for outgoing mail.
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "BudgetMate".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            from_email: None,
            from_name: default_from_name(),
        }
    }
}

impl EmailConfig {
    /// Returns true when every transport field needed to send mail is set.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.smtp_host.is_some()
            && self.smtp_username.is_some()
            && self.smtp_password.is_some()
            && self.from_email.is_some()
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BUDGETMATE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_config_unconfigured_by_default() {
        let config = EmailConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.from_name, "BudgetMate");
    }

    #[test]
    fn test_email_config_configured_when_all_fields_set() {
        let config = EmailConfig {
            smtp_host: Some("smtp.example.com".to_string()),
            smtp_port: 587,
            smtp_username: Some("mailer".to_string()),
            smtp_password: Some("secret".to_string()),
            from_email: Some("noreply@example.com".to_string()),
            from_name: "BudgetMate".to_string(),
        };
        assert!(config.is_configured());
    }

    #[test]
    fn test_email_config_partial_is_unconfigured() {
        let config = EmailConfig {
            smtp_host: Some("smtp.example.com".to_string()),
            ..EmailConfig::default()
        };
        assert!(!config.is_configured());
    }
}
