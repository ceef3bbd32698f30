use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use parlor_api::{DEFAULT_BASE_URL, HttpConfig};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

use crate::store::{FileSessionStore, SESSION_FILE_NAME};

pub const SETTINGS_DIRECTORY_NAME: &str = "parlor";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const ENV_PREFIX: &str = "PARLOR_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. Unset means requests wait as long as the
    /// transport does.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
            session_file: None,
        }
    }
}

impl ClientSettings {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".parlor"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn load() -> Self {
        Self::load_from(&Self::default_config_path())
    }

    /// Defaults, then `path` if it exists, then `PARLOR_*` variables. Anything
    /// unparseable falls back to defaults.
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(settings) => {
                tracing::info!(base_url = %settings.base_url, "loaded client settings");
                settings
            }
            Err(error) => {
                tracing::warn!("{error}. using defaults");
                Self::default()
            }
        }
    }

    pub fn try_load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::info!("settings file not found at {:?}, using defaults", path);
        }

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Json::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract::<Self>()
            .context(ExtractSnafu {
                stage: "extract-client-settings",
                path: path.to_path_buf(),
            })
            .map(Self::normalized)
    }

    fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim().to_string();
        if self.base_url.is_empty() {
            self.base_url = default_base_url();
        }
        self.request_timeout_secs = self.request_timeout_secs.filter(|secs| *secs > 0);
        self.session_file = self
            .session_file
            .filter(|path| !path.as_os_str().is_empty());
        self
    }

    pub fn http_config(&self) -> HttpConfig {
        let config = HttpConfig::new(self.base_url.clone());
        match self.request_timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }

    pub fn session_file_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| Self::default_config_dir().join(SESSION_FILE_NAME))
    }

    pub fn session_store(&self) -> FileSessionStore {
        FileSessionStore::new(self.session_file_path())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SettingsError {
    #[snafu(display("failed to parse settings from {path:?} on `{stage}`: {source}"))]
    Extract {
        stage: &'static str,
        path: PathBuf,
        #[snafu(source(from(figment::Error, Box::new)))]
        source: Box<figment::Error>,
    },
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ClientSettings::load_from(&dir.path().join(SETTINGS_FILE_NAME));

        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.http_config().timeout, None);
        assert!(settings.session_file_path().ends_with(SESSION_FILE_NAME));
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        let session = dir.path().join("me.json");
        std::fs::write(
            &path,
            serde_json::json!({
                "base_url": " http://localhost:8000/api ",
                "request_timeout_secs": 15,
                "session_file": session,
            })
            .to_string(),
        )
        .unwrap();

        let settings = ClientSettings::try_load_from(&path).unwrap();

        assert_eq!(settings.base_url, "http://localhost:8000/api");
        assert_eq!(
            settings.http_config().timeout,
            Some(Duration::from_secs(15))
        );
        assert_eq!(settings.session_store().path(), session.as_path());
    }

    #[test]
    fn zero_timeout_and_blank_url_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, r#"{"base_url": "  ", "request_timeout_secs": 0}"#).unwrap();

        let settings = ClientSettings::load_from(&path);

        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.request_timeout_secs, None);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, r#"{"request_timeout_secs": "soon"}"#).unwrap();

        assert!(ClientSettings::try_load_from(&path).is_err());
        assert_eq!(ClientSettings::load_from(&path), ClientSettings::default());
    }
}
