use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{APP_DIR_NAME, NOTICE_DEBOUNCE_MS, USER_CONFIG_FILE};
use crate::error::NoticeError;
use crate::host::WindowState;
use crate::plain_text::PlainTextOptions;

/// Window-visibility predicate gating a notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowCondition {
    /// Fire regardless of window state
    Always,
    /// Fire only while the window does not have input focus
    #[default]
    OnWindowBlur,
    /// Fire only while the window is hidden or minimized
    OnWindowHide,
}

impl WindowCondition {
    pub fn matches(self, state: &WindowState) -> bool {
        match self {
            WindowCondition::Always => true,
            WindowCondition::OnWindowBlur => !state.focused,
            WindowCondition::OnWindowHide => !state.visible || state.minimized,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_hide_condition() -> WindowCondition {
    WindowCondition::OnWindowHide
}

/// Per-user notification preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    #[serde(default = "default_true")]
    pub enable_window_notification: bool,
    /// Hide sender and content from popups
    #[serde(default)]
    pub safe_window_notification: bool,
    #[serde(default)]
    pub window_notification_condition: WindowCondition,
    #[serde(default = "default_true")]
    pub enable_sound: bool,
    #[serde(default = "default_true")]
    pub mute_on_user_is_busy: bool,
    #[serde(default = "default_hide_condition")]
    pub play_sound_condition: WindowCondition,
    #[serde(default = "default_true")]
    pub flash_tray_icon: bool,
    #[serde(default)]
    pub flash_tray_icon_condition: WindowCondition,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            enable_window_notification: true,
            safe_window_notification: false,
            window_notification_condition: WindowCondition::OnWindowBlur,
            enable_sound: true,
            mute_on_user_is_busy: true,
            play_sound_condition: WindowCondition::OnWindowHide,
            flash_tray_icon: true,
            flash_tray_icon_condition: WindowCondition::OnWindowBlur,
        }
    }
}

/// User config persisted as JSON in the data dir
pub struct UserConfigStorage {
    path: PathBuf,
    pub config: UserConfig,
}

impl UserConfigStorage {
    /// Load from `data_dir`, falling back to defaults when the file is missing or invalid.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        let path = data_dir.as_ref().join(USER_CONFIG_FILE);
        let config = match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::debug!("Using default user config: {}", err);
                UserConfig::default()
            }
        };
        Self { path, config }
    }

    fn load_from_file(path: &Path) -> Result<UserConfig, NoticeError> {
        let contents = fs::read_to_string(path).map_err(|source| NoticeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| NoticeError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn save(&self) -> Result<(), NoticeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| NoticeError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.path, json).map_err(|source| NoticeError::Write {
            path: self.path.clone(),
            source,
        })
    }

    pub fn set(&mut self, config: UserConfig) -> Result<(), NoticeError> {
        self.config = config;
        self.save()
    }
}

/// Process-level settings for the notice runtime.
#[derive(Debug, Clone)]
pub struct NoticeConfig {
    pub data_dir: PathBuf,
    /// Trailing debounce window for the aggregation pass
    pub debounce: Duration,
    /// Upper bound on how long repeated triggers may postpone a pass.
    /// `None` keeps pure trailing debounce.
    pub max_wait: Option<Duration>,
    pub plain_text: PlainTextOptions,
    pub locale: String,
}

impl NoticeConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            debounce: Duration::from_millis(NOTICE_DEBOUNCE_MS),
            max_wait: None,
            plain_text: PlainTextOptions::default(),
            locale: "en".to_string(),
        }
    }
}

impl Default for NoticeConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(APP_DIR_NAME));
        Self::new(data_dir)
    }
}
