//! Environment-driven configuration.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Every setting has a default except the database URL and the Mailgun
//! credentials, whose absence switches to the in-memory store and to
//! log-only notifications respectively.

use crate::notification::{MailgunConfig, DEFAULT_MAILGUN_BASE_URL};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_ASSETS_DIR: &str = "assets";
pub const DEFAULT_HELLO_TEMPLATE: &str = "Hello, %s!";
pub const DEFAULT_HELLO_NAME: &str = "Stranger";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub assets_dir: String,
    pub hello_template: String,
    pub hello_default_name: String,
    pub mailgun: Option<MailgunConfig>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        // a missing .env file is normal
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mailgun = match (get("MAILGUN_DOMAIN"), get("MAILGUN_API_KEY")) {
            (Some(domain), Some(api_key)) => Some(MailgunConfig {
                from: get("MAILGUN_FROM")
                    .unwrap_or_else(|| format!("WizardsBay No-Reply <noreply@{}>", domain)),
                base_url: get("MAILGUN_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_MAILGUN_BASE_URL.to_string()),
                domain,
                api_key,
            }),
            _ => None,
        };

        Self {
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            database_url: get("DATABASE_URL"),
            db_max_connections: get("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            assets_dir: get("ASSETS_DIR").unwrap_or_else(|| DEFAULT_ASSETS_DIR.to_string()),
            hello_template: get("HELLO_TEMPLATE")
                .unwrap_or_else(|| DEFAULT_HELLO_TEMPLATE.to_string()),
            hello_default_name: get("HELLO_DEFAULT_NAME")
                .unwrap_or_else(|| DEFAULT_HELLO_NAME.to_string()),
            mailgun,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.database_url, None);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.hello_template, "Hello, %s!");
        assert_eq!(config.hello_default_name, "Stranger");
        assert!(config.mailgun.is_none());
    }

    #[test]
    fn blank_and_unparsable_values_fall_back() {
        let config = config_from(&[("DATABASE_URL", "  "), ("DB_MAX_CONNECTIONS", "many")]);
        assert_eq!(config.database_url, None);
        assert_eq!(config.db_max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn mailgun_needs_domain_and_key() {
        let config = config_from(&[("MAILGUN_DOMAIN", "mg.example.com")]);
        assert!(config.mailgun.is_none());

        let config = config_from(&[
            ("MAILGUN_DOMAIN", "mg.example.com"),
            ("MAILGUN_API_KEY", "key-123"),
        ]);
        let mailgun = config.mailgun.unwrap();
        assert_eq!(mailgun.from, "WizardsBay No-Reply <noreply@mg.example.com>");
        assert_eq!(mailgun.base_url, DEFAULT_MAILGUN_BASE_URL);
    }
}
