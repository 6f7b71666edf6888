use crate::infra::conduit::cache::DEFAULT_CACHE_CAPACITY;
use crate::infra::conduit::client::{HGMO_JSON_REV_URL_TEMPLATE, MOZILLA_PHABRICATOR_PROD};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Conduit endpoint, ending with `/api/`.
    pub api_url: String,
    pub api_token: Option<String>,
    /// Revision the working copy falls back to when a stack has no usable base.
    pub default_revision: String,
    /// URL template fetched to know whether a revision landed; `{}` is the revision.
    pub canonical_rev_url: String,
    pub cache_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: MOZILLA_PHABRICATOR_PROD.to_string(),
            api_token: None,
            default_revision: "origin/HEAD".to_string(),
            canonical_rev_url: HGMO_JSON_REV_URL_TEMPLATE.to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Load the config at `path`, falling back to defaults when it is missing or
/// unreadable. `PHABSTACK_API_TOKEN` always wins over the file's token.
pub fn load_config_from(path: &Path) -> AppConfig {
    let mut config = match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
            log::warn!("Ignoring invalid config {}: {}", path.display(), err);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    };

    if let Ok(token) = std::env::var("PHABSTACK_API_TOKEN")
        && !token.trim().is_empty()
    {
        config.api_token = Some(token.trim().to_string());
    }
    config
}

pub fn save_config_to(config: &AppConfig, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    std::fs::write(path, contents)
}

pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("PHABSTACK_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    app_data_dir().join("config.toml")
}

fn app_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var("PHABSTACK_DATA_HOME") {
        return PathBuf::from(path);
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = home::home_dir() {
            return home
                .join("Library")
                .join("Application Support")
                .join("phabstack");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("phabstack");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("phabstack");
        }
        if let Some(home) = home::home_dir() {
            return home.join(".config").join("phabstack");
        }
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".phabstack")
}
