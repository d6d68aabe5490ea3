use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{AppPaths, PreprocessFlags};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub settings: SettingsSection,
    #[serde(default)]
    pub preprocesses: PreprocessSection,
    #[serde(default)]
    pub backup: BackupSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSection {
    #[serde(default)]
    pub app_path: String,
    #[serde(default)]
    pub prefs_path: String,
    #[serde(default)]
    pub process_name: String,
    #[serde(default)]
    pub launch_command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessSection {
    #[serde(default = "enabled")]
    pub disable_sentry: bool,
    #[serde(default = "enabled")]
    pub disable_ui_logging: bool,
    #[serde(default = "enabled")]
    pub remove_rtl_rule: bool,
    #[serde(default = "enabled")]
    pub expose_apis: bool,
    #[serde(default)]
    pub stop_autoupdate: bool,
}

impl Default for PreprocessSection {
    fn default() -> Self {
        Self {
            disable_sentry: true,
            disable_ui_logging: true,
            remove_rtl_rule: true,
            expose_apis: true,
            stop_autoupdate: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupSection {
    #[serde(default)]
    pub version: String,
}

fn enabled() -> bool {
    true
}

impl ConfigFile {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).context("failed to parse reskin config")
    }

    pub fn preprocess_flags(&self) -> PreprocessFlags {
        PreprocessFlags {
            disable_sentry: self.preprocesses.disable_sentry,
            disable_ui_logging: self.preprocesses.disable_ui_logging,
            remove_rtl_rule: self.preprocesses.remove_rtl_rule,
            expose_apis: self.preprocesses.expose_apis,
            stop_autoupdate: self.preprocesses.stop_autoupdate,
        }
    }

    pub fn app_paths(&self) -> Result<AppPaths> {
        let app_path = self.settings.app_path.trim();
        if app_path.is_empty() {
            anyhow::bail!("settings.app_path is not set: point it at the application install directory");
        }
        let prefs_path = self.settings.prefs_path.trim();
        if prefs_path.is_empty() {
            anyhow::bail!("settings.prefs_path is not set: point it at the application prefs file");
        }
        Ok(AppPaths::new(app_path, prefs_path))
    }
}

/// Durable config backed by a TOML file. Writes are deferred until
/// [`ConfigStore::flush`].
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    file: ConfigFile,
    dirty: bool,
}

impl ConfigStore {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed reading config: {}", path.display()))?;
            ConfigFile::from_toml_str(&content)
                .with_context(|| format!("failed parsing config: {}", path.display()))?
        } else {
            ConfigFile::default()
        };

        Ok(Self {
            path,
            file,
            dirty: false,
        })
    }

    pub fn with_file(path: impl Into<PathBuf>, file: ConfigFile) -> Self {
        Self {
            path: path.into(),
            file,
            dirty: false,
        }
    }

    pub fn file(&self) -> &ConfigFile {
        &self.file
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn backup_version(&self) -> &str {
        self.file.backup.version.trim()
    }

    pub fn set_backup_version(&mut self, version: &str) {
        if self.file.backup.version != version {
            self.file.backup.version = version.to_string();
            self.dirty = true;
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!(
                    "config-write-failed: failed creating config dir {}",
                    parent.display()
                )
            })?;
        }
        let content = toml::to_string(&self.file).with_context(|| {
            format!(
                "config-write-failed: failed serializing config {}",
                self.path.display()
            )
        })?;
        fs::write(&self.path, content).with_context(|| {
            format!("config-write-failed: failed writing {}", self.path.display())
        })?;
        self.dirty = false;
        Ok(())
    }
}
