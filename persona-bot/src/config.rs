//! Persona bot settings. Loaded from env: ALLOWED_ROLES (required), DEFAULT_ROLE, MAX_TOKENS.

use anyhow::{Context, Result};
use std::env;
use text_generation::DEFAULT_MAX_TOKENS;

/// Default log file when LOG_FILE is not set.
pub const DEFAULT_LOG_FILE: &str = "logs/persona-bot.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaBotConfig {
    pub allowed_roles: Vec<String>,
    pub default_role: Option<String>,
    pub max_tokens: usize,
}

impl PersonaBotConfig {
    pub fn new(allowed_roles: Vec<String>) -> Self {
        Self {
            allowed_roles,
            default_role: None,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn from_env() -> Result<Self> {
        let raw = env::var("ALLOWED_ROLES").context("ALLOWED_ROLES not set")?;
        let allowed_roles = parse_allowed_roles(&raw);
        if allowed_roles.is_empty() {
            anyhow::bail!("ALLOWED_ROLES has no entries");
        }
        let default_role = env::var("DEFAULT_ROLE")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let max_tokens = match env::var("MAX_TOKENS").ok().filter(|s| !s.trim().is_empty()) {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid MAX_TOKENS: {}", v))?,
            None => DEFAULT_MAX_TOKENS,
        };
        if max_tokens == 0 {
            anyhow::bail!("MAX_TOKENS must be greater than 0");
        }
        Ok(Self {
            allowed_roles,
            default_role,
            max_tokens,
        })
    }
}

/// Splits a comma-separated list; entries are trimmed and empty ones dropped.
pub fn parse_allowed_roles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in ["ALLOWED_ROLES", "DEFAULT_ROLE", "MAX_TOKENS"] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_parse_allowed_roles() {
        assert_eq!(parse_allowed_roles("@a, @b,,  "), vec!["@a", "@b"]);
        assert!(parse_allowed_roles(" , ").is_empty());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        env::set_var("ALLOWED_ROLES", "@a,@b");
        env::set_var("DEFAULT_ROLE", "@b");

        let config = PersonaBotConfig::from_env().unwrap();
        assert_eq!(config.allowed_roles, vec!["@a", "@b"]);
        assert_eq!(config.default_role.as_deref(), Some("@b"));
        assert_eq!(config.max_tokens, 128);

        env::set_var("MAX_TOKENS", "256");
        assert_eq!(PersonaBotConfig::from_env().unwrap().max_tokens, 256);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_values() {
        clear_env();
        assert!(PersonaBotConfig::from_env().is_err());

        env::set_var("ALLOWED_ROLES", " , ");
        assert!(PersonaBotConfig::from_env().is_err());

        env::set_var("ALLOWED_ROLES", "@a");
        env::set_var("MAX_TOKENS", "many");
        assert!(PersonaBotConfig::from_env().is_err());
        env::set_var("MAX_TOKENS", "0");
        assert!(PersonaBotConfig::from_env().is_err());
        clear_env();
    }
}
