use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directories owned by reskin itself: the three role directories and the
/// config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateLayout {
    root: PathBuf,
}

impl StateLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Pristine copies of the application packages.
    pub fn backup_dir(&self) -> PathBuf {
        self.root.join("Backup")
    }

    pub fn extracted_dir(&self) -> PathBuf {
        self.root.join("Extracted")
    }

    /// Scratch tree rebuilt on every backup.
    pub fn raw_dir(&self) -> PathBuf {
        self.extracted_dir().join("Raw")
    }

    /// Filtered, preprocessed tree consumed by apply.
    pub fn themed_dir(&self) -> PathBuf {
        self.extracted_dir().join("Themed")
    }

    pub fn role_dirs(&self) -> [PathBuf; 3] {
        [self.backup_dir(), self.raw_dir(), self.themed_dir()]
    }

    pub fn ensure_role_dirs(&self) -> Result<()> {
        for dir in self.role_dirs() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(())
    }
}

/// Where the target application lives on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    install_dir: PathBuf,
    prefs_path: PathBuf,
}

impl AppPaths {
    pub fn new(install_dir: impl Into<PathBuf>, prefs_path: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
            prefs_path: prefs_path.into(),
        }
    }

    pub fn prefs_path(&self) -> &Path {
        &self.prefs_path
    }

    /// The mutable asset subtree that backup reads and restore replaces.
    pub fn apps_dir(&self) -> PathBuf {
        self.install_dir.join("Apps")
    }
}

pub fn default_state_root() -> Result<PathBuf> {
    if cfg!(windows) {
        let app_data = std::env::var("LOCALAPPDATA")
            .context("LOCALAPPDATA is not set; cannot resolve Windows state root")?;
        return Ok(PathBuf::from(app_data).join("Reskin"));
    }

    let home = std::env::var("HOME").context("HOME is not set; cannot resolve state root")?;
    Ok(PathBuf::from(home).join(".reskin"))
}
