use std::path::Path;

use crate::config::schema::Config;
use crate::error::{Error, Result};

pub const ENV_LOG_LEVEL: &str = "INTENTMAP_LOG_LEVEL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "INTENTMAP_REQUEST_TIMEOUT_SECS";

pub fn load_from_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        Error::Config(format!("failed to read config '{}': {err}", path.display()))
    })?;

    toml::from_str(&content).map_err(|err| {
        Error::Config(format!(
            "failed to parse config '{}': {err}",
            path.display()
        ))
    })
}

/// Applies environment overrides on top of `config`.
pub fn load_from_env(config: Config) -> Result<Config> {
    merge(config, |name| std::env::var(name).ok())
}

/// Applies overrides resolved through `lookup`, which maps a variable name to its value.
pub fn merge<F>(mut config: Config, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        let level = level.trim();
        if !level.is_empty() {
            config.logging.level = level.to_owned();
        }
    }

    if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
        config.session.request_timeout_secs = raw.trim().parse::<u64>().map_err(|err| {
            Error::Config(format!(
                "invalid {ENV_REQUEST_TIMEOUT_SECS} value '{raw}': {err}"
            ))
        })?;
    }

    Ok(config)
}

pub fn load(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => load_from_file(path)?,
        None => Config::default(),
    };
    load_from_env(config)
}

#[cfg(test)]
mod tests {
    use super::{merge, ENV_LOG_LEVEL, ENV_REQUEST_TIMEOUT_SECS};
    use crate::config::schema::Config;

    #[test]
    fn parses_partial_layout_overrides() {
        let config: Config = toml::from_str(
            r#"
            [layout.routing]
            column_spacing = 300.0

            [session]
            request_timeout_secs = 30
            "#,
        )
        .expect("config should parse");

        let routing = config.layout.routing_constants();
        assert_eq!(routing.column_spacing, 300.0);
        assert_eq!(routing.row_spacing, 90.0);
        assert_eq!(config.layout.intent_constants().column_spacing, 350.0);
        assert_eq!(config.session.request_timeout_secs, 30);
        assert_eq!(config.workflow.export_version, "1.0");
    }

    #[test]
    fn env_overrides_take_precedence() {
        let config = merge(Config::default(), |name| match name {
            ENV_LOG_LEVEL => Some("debug".to_owned()),
            ENV_REQUEST_TIMEOUT_SECS => Some("15".to_owned()),
            _ => None,
        })
        .expect("overrides should apply");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.session.request_timeout_secs, 15);
    }

    #[test]
    fn rejects_non_numeric_timeout_override() {
        let error = merge(Config::default(), |name| {
            (name == ENV_REQUEST_TIMEOUT_SECS).then(|| "soon".to_owned())
        })
        .expect_err("override should fail");

        assert!(error.to_string().contains(ENV_REQUEST_TIMEOUT_SECS));
    }
}
