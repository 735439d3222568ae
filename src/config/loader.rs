//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::Config;

pub const CONFIG_FILENAME: &str = "settings-patcher.toml";

/// Load configuration from an explicit path, or from the nearest
/// settings-patcher.toml, falling back to the built-in defaults
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config_from_path(path);
    }

    match find_config_file() {
        Some(path) => load_config_from_path(&path),
        None => {
            tracing::debug!("No {} found, using defaults", CONFIG_FILENAME);
            Ok(Config::default())
        }
    }
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::ConfigNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;

    let mut config = load_config_from_str(&content)?;
    if let Some(dir) = path.parent() {
        config.resolve_relative_to(dir);
    }

    tracing::debug!("Loaded config from {:?}", path);
    Ok(config)
}

/// Parse and validate configuration from TOML text
pub fn load_config_from_str(content: &str) -> Result<Config> {
    let content = interpolate_env_vars(content);
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Option<PathBuf> {
    let mut current = env::current_dir().ok()?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // Compile-time constant pattern; a failure here is a bug, not bad input
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# settings-patcher configuration
# Every value below is the built-in default; delete what you don't change.

# Settings module to patch (relative to this file)
settings_path = "backend/settings.py"

[cors]
# The CORS block is appended only when this text is absent
marker = "CORS_ALLOWED_ORIGINS"
allowed_origins = [
    "http://localhost:3000",
    "http://127.0.0.1:3000",
]
allow_credentials = true
# allowed_origins = ["${FRONTEND_ORIGIN:-http://localhost:3000}"]

[rest_framework]
permission_classes = ["rest_framework.permissions.AllowAny"]
authentication_classes = ["rest_framework.authentication.SessionAuthentication"]

[installed_apps]
list = "INSTALLED_APPS"
# The first app guards the insertion
apps = ["corsheaders", "rest_framework"]

[middleware]
list = "MIDDLEWARE"
class = "corsheaders.middleware.CorsMiddleware"
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_interpolation() {
        env::set_var("SETTINGS_PATCHER_TEST_VAR", "hello");
        let content = "value = \"${SETTINGS_PATCHER_TEST_VAR}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"hello\"");
        env::remove_var("SETTINGS_PATCHER_TEST_VAR");
    }

    #[test]
    fn test_env_interpolation_with_default() {
        let content = "value = \"${NONEXISTENT_VAR:-default_value}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"default_value\"");
    }

    #[test]
    fn test_default_config_content_matches_defaults() {
        let config = load_config_from_str(default_config_content()).unwrap();
        let defaults = Config::default();
        assert_eq!(config.settings_path, defaults.settings_path);
        assert_eq!(config.cors.allowed_origins, defaults.cors.allowed_origins);
        assert_eq!(config.installed_apps.apps, defaults.installed_apps.apps);
        assert_eq!(config.middleware.class_name, defaults.middleware.class_name);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/settings-patcher.toml"))).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }
}
