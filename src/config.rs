use std::env;

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://slack.com/api";
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not found")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Process-wide settings, read once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    /// Slack signing secret. Empty means every signed route rejects.
    pub signing_secret: String,
    pub slack_token: String,
    pub api_url: String,
    pub tolerance_secs: i64,
    pub bind: String,
    pub hostname: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let signing_secret = env::var("SLACK_SIGNING_SECRET").unwrap_or_default();
        let slack_token = env::var("SLACK_TOKEN").map_err(|_| ConfigError::Missing("SLACK_TOKEN"))?;

        let tolerance_secs = match env::var("SLACK_SIGNATURE_TOLERANCE_SECS") {
            Ok(raw) => parse_tolerance(&raw)?,
            Err(_) => DEFAULT_TOLERANCE_SECS,
        };

        let bind = format!(
            "{}:{}",
            env::var("IP").unwrap_or("0.0.0.0".to_string()),
            env::var("PORT").unwrap_or("3000".to_string())
        );

        Ok(Self {
            signing_secret,
            slack_token,
            api_url: env::var("SLACK_API_URL")
                .unwrap_or(DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            tolerance_secs,
            bind,
            hostname: env::var("HOSTNAME").unwrap_or_else(|_| local_hostname()),
        })
    }

    pub fn has_signing_secret(&self) -> bool {
        !self.signing_secret.is_empty()
    }
}

fn parse_tolerance(raw: &str) -> Result<i64, ConfigError> {
    match raw.trim().parse::<i64>() {
        Ok(secs) if secs >= 0 => Ok(secs),
        _ => Err(ConfigError::Invalid {
            name: "SLACK_SIGNATURE_TOLERANCE_SECS",
            value: raw.to_string(),
        }),
    }
}

fn local_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_default()
}

#[cfg(test)]
impl Config {
    pub fn for_tests(secret: &str) -> Self {
        Self {
            signing_secret: secret.to_string(),
            slack_token: "xoxb-test".to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
            bind: "127.0.0.1:0".to_string(),
            hostname: "test-host".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_accepts_non_negative_seconds() {
        assert_eq!(parse_tolerance("60").unwrap(), 60);
        assert_eq!(parse_tolerance(" 0 ").unwrap(), 0);
    }

    #[test]
    fn tolerance_rejects_garbage() {
        assert!(matches!(
            parse_tolerance("-5"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(parse_tolerance("five minutes").is_err());
    }

    #[test]
    fn empty_secret_is_reported() {
        assert!(!Config::for_tests("").has_signing_secret());
        assert!(Config::for_tests("s3cr3t").has_signing_secret());
    }
}
