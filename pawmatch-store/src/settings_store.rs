//! User preferences store.
//!
//! Manages user settings with persistence and change notification.

use pawmatch_core::{DEFAULT_PAGE_SIZE, SortField, SortOrder};
use pawmatch_fetch::{DEFAULT_BASE_URL, FetchSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Dogs service base URL.
    pub base_url: String,

    /// Dogs requested per page.
    pub page_size: usize,

    /// Per-request timeout in seconds. Unset waits indefinitely.
    pub request_timeout_secs: Option<u64>,

    /// Log level.
    pub log_level: LogLevel,

    /// Sort key for new sessions.
    pub default_sort: SortField,

    /// Sort direction for new sessions.
    pub default_order: SortOrder,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: None,
            log_level: LogLevel::default(),
            default_sort: SortField::default(),
            default_order: SortOrder::default(),
        }
    }
}

impl Settings {
    /// Builds the API client settings.
    pub fn fetch_settings(&self) -> FetchSettings {
        let settings = FetchSettings::default().with_base_url(&self.base_url);
        match self.request_timeout_secs {
            Some(secs) => settings.with_timeout(Duration::from_secs(secs)),
            None => settings,
        }
    }

    /// Checks the settings can drive a session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for a zero page size or an unusable
    /// base URL.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.page_size == 0 {
            return Err(StoreError::Config("page_size must be at least 1".to_string()));
        }
        self.fetch_settings()
            .parsed_base_url()
            .map_err(|e| StoreError::Config(e.to_string()))?;
        Ok(())
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store with change notifications.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl SettingsStore {
    /// Creates a store with default settings backed by `path`.
    pub fn new(path: PathBuf) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing or corrupt file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        let store = Self::new(path);
        *store.settings.write().await = settings;
        Ok(store)
    }

    /// Path the settings are saved to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings and notifies subscribers.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        {
            let mut settings = self.settings.write().await;
            f(&mut settings);
        }
        self.notify_change().await;
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings are invalid or cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        settings.validate()?;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Subscribes to settings changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Notifies subscribers of a change.
    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }

    // ========================================================================
    // Convenience Methods
    // ========================================================================

    /// Sets the service base URL.
    pub async fn set_base_url(&self, base_url: impl Into<String>) {
        let base_url = base_url.into();
        self.update(|s| s.base_url = base_url).await;
    }

    /// Sets the page size.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for a zero page size.
    pub async fn set_page_size(&self, page_size: usize) -> Result<(), StoreError> {
        if page_size == 0 {
            return Err(StoreError::Config("page_size must be at least 1".to_string()));
        }
        self.update(|s| s.page_size = page_size).await;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
