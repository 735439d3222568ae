//! Configuration schema definitions

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Settings module to patch
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,

    #[serde(default)]
    pub cors: CorsConfig,

    #[serde(default)]
    pub rest_framework: RestFrameworkConfig,

    #[serde(default)]
    pub installed_apps: InstalledAppsConfig,

    #[serde(default)]
    pub middleware: MiddlewareConfig,
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("backend/settings.py")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
            cors: CorsConfig::default(),
            rest_framework: RestFrameworkConfig::default(),
            installed_apps: InstalledAppsConfig::default(),
            middleware: MiddlewareConfig::default(),
        }
    }
}

/// CORS block appended to the end of the settings module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Substring whose presence means the block was already added
    #[serde(default = "default_cors_marker")]
    pub marker: String,

    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    #[serde(default = "default_allow_credentials")]
    pub allow_credentials: bool,
}

fn default_cors_marker() -> String {
    "CORS_ALLOWED_ORIGINS".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

fn default_allow_credentials() -> bool {
    true
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            marker: default_cors_marker(),
            allowed_origins: default_allowed_origins(),
            allow_credentials: default_allow_credentials(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestFrameworkConfig {
    #[serde(default = "default_permission_classes")]
    pub permission_classes: Vec<String>,

    #[serde(default = "default_authentication_classes")]
    pub authentication_classes: Vec<String>,
}

fn default_permission_classes() -> Vec<String> {
    vec!["rest_framework.permissions.AllowAny".to_string()]
}

fn default_authentication_classes() -> Vec<String> {
    vec!["rest_framework.authentication.SessionAuthentication".to_string()]
}

impl Default for RestFrameworkConfig {
    fn default() -> Self {
        Self {
            permission_classes: default_permission_classes(),
            authentication_classes: default_authentication_classes(),
        }
    }
}

/// Applications appended to the installed applications list.
///
/// The first app doubles as the guard: if it already appears in the
/// settings (single or double quoted) nothing is inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledAppsConfig {
    #[serde(default = "default_installed_apps_list")]
    pub list: String,

    #[serde(default = "default_apps")]
    pub apps: Vec<String>,
}

fn default_installed_apps_list() -> String {
    "INSTALLED_APPS".to_string()
}

fn default_apps() -> Vec<String> {
    vec!["corsheaders".to_string(), "rest_framework".to_string()]
}

impl Default for InstalledAppsConfig {
    fn default() -> Self {
        Self {
            list: default_installed_apps_list(),
            apps: default_apps(),
        }
    }
}

impl InstalledAppsConfig {
    /// The app whose presence marks the list as already patched
    pub fn guard(&self) -> Option<&str> {
        self.apps.first().map(String::as_str)
    }
}

/// Middleware class prepended to the middleware list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    #[serde(default = "default_middleware_list")]
    pub list: String,

    #[serde(rename = "class", default = "default_middleware_class")]
    pub class_name: String,
}

fn default_middleware_list() -> String {
    "MIDDLEWARE".to_string()
}

fn default_middleware_class() -> String {
    "corsheaders.middleware.CorsMiddleware".to_string()
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            list: default_middleware_list(),
            class_name: default_middleware_class(),
        }
    }
}

impl Config {
    /// Check the values that the patch steps rely on
    pub fn validate(&self) -> Result<()> {
        let identifier = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")
            .expect("Invalid regex pattern - this is a bug in the codebase");

        for list in [&self.installed_apps.list, &self.middleware.list] {
            if !identifier.is_match(list) {
                return Err(Error::Config(format!(
                    "'{}' is not a valid list name",
                    list
                )));
            }
        }

        if self.cors.marker.trim().is_empty() {
            return Err(Error::Config("cors.marker must not be empty".to_string()));
        }

        if self.installed_apps.apps.iter().any(|a| a.trim().is_empty()) {
            return Err(Error::Config(
                "installed_apps.apps must not contain empty names".to_string(),
            ));
        }
        if self.installed_apps.guard().is_none() {
            return Err(Error::Config(
                "installed_apps.apps needs at least one app".to_string(),
            ));
        }

        if self.middleware.class_name.trim().is_empty() {
            return Err(Error::Config("middleware.class must not be empty".to_string()));
        }

        Ok(())
    }

    /// Resolve a relative `settings_path` against the directory holding the
    /// config file
    pub fn resolve_relative_to(&mut self, dir: &Path) {
        if self.settings_path.is_relative() {
            self.settings_path = dir.join(&self.settings_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_pass_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.installed_apps.guard(), Some("corsheaders"));
    }

    #[test]
    fn test_rejects_bad_list_name() {
        let mut config = Config::default();
        config.middleware.list = "MIDDLE WARE".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_empty_apps() {
        let mut config = Config::default();
        config.installed_apps.apps.clear();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_resolve_relative_settings_path() {
        let mut config = Config::default();
        config.resolve_relative_to(Path::new("/srv/app"));
        assert_eq!(
            config.settings_path,
            PathBuf::from("/srv/app/backend/settings.py")
        );

        config.resolve_relative_to(Path::new("/elsewhere"));
        assert_eq!(
            config.settings_path,
            PathBuf::from("/srv/app/backend/settings.py")
        );
    }
}
