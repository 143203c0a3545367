use serde::Deserialize;
use std::{error::Error, fs};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CommonConfig {
    pub project_name: String,
    pub database_url: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BackendConfig {
    pub server_address: String,
    pub log_level: String,
    pub cors_origin: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    pub api_url: String,
    /// Brevo API key. Usually injected via BREVO_API_KEY rather than the
    /// config file; an empty key is reported as a delivery failure at send
    /// time, not a startup failure.
    #[serde(default)]
    pub api_key: String,
    pub sender_name: String,
    pub sender_email: String,
    #[serde(default)]
    pub reply_to_email: Option<String>,
    pub send_timeout_ms: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.brevo.com/v3/smtp/email".to_string(),
            api_key: String::new(),
            sender_name: "WatchCraft".to_string(),
            sender_email: "noreply@watchcraft.com".to_string(),
            reply_to_email: None,
            send_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub common: CommonConfig,
    pub backend: BackendConfig,
    pub email: EmailConfig,
}

impl Config {
    pub fn load(config_path: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let contents = fs::read_to_string(config_path)?;
        let mut config: Config = serde_yml::from_str(&contents)?;

        // Secrets come from the environment when present.
        if let Ok(key) = std::env::var("BREVO_API_KEY") {
            config.email.api_key = key;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.common.database_url = url;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_full_config_from_yaml() {
        let yaml = r#"
common:
  project_name: watchcraft
  database_url: postgres://localhost/watchcraft
backend:
  server_address: 0.0.0.0:5000
  log_level: info
  cors_origin: http://localhost:5173
email:
  api_url: https://api.brevo.com/v3/smtp/email
  sender_name: WatchCraft
  sender_email: noreply@watchcraft.com
  send_timeout_ms: 5000
"#;
        let config: Config = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.common.project_name, "watchcraft");
        assert_eq!(config.backend.server_address, "0.0.0.0:5000");
        assert_eq!(config.email.send_timeout_ms, 5000);
        assert!(config.email.api_key.is_empty());
        assert!(config.email.reply_to_email.is_none());
    }
}
