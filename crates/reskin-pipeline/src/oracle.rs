use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use reskin_core::{AppPaths, BackupStatus, InstallStatus};

use crate::fs_ops::{has_extension, list_files};

const VERSION_PREF_KEY: &str = "app.last-launched-version";

/// Read-only queries about the live install and the backup store.
pub trait StatusOracle {
    fn install_status(&self, app: &AppPaths) -> Result<InstallStatus>;

    fn backup_status(
        &self,
        app: &AppPaths,
        backup_dir: &Path,
        recorded_version: &str,
    ) -> Result<BackupStatus>;

    fn live_version(&self, app: &AppPaths) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FsStatusOracle;

impl StatusOracle for FsStatusOracle {
    fn install_status(&self, app: &AppPaths) -> Result<InstallStatus> {
        let apps_dir = app.apps_dir();
        if !apps_dir.is_dir() {
            return Ok(InstallStatus::Modified);
        }

        let mut packages = 0_usize;
        let mut extracted = 0_usize;
        for entry in fs::read_dir(&apps_dir)
            .with_context(|| format!("failed reading {}", apps_dir.display()))?
        {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                extracted += 1;
            } else if file_type.is_file() && has_extension(&entry.path(), &["spa"]) {
                packages += 1;
            }
        }

        if packages > 0 && extracted == 0 {
            Ok(InstallStatus::Stock)
        } else {
            Ok(InstallStatus::Modified)
        }
    }

    fn backup_status(
        &self,
        app: &AppPaths,
        backup_dir: &Path,
        recorded_version: &str,
    ) -> Result<BackupStatus> {
        if list_files(backup_dir, &["spa"], false)?.is_empty() {
            return Ok(BackupStatus::Empty);
        }

        let recorded_version = recorded_version.trim();
        if recorded_version.is_empty() || recorded_version != self.live_version(app)? {
            return Ok(BackupStatus::Outdated);
        }
        Ok(BackupStatus::Current)
    }

    fn live_version(&self, app: &AppPaths) -> Result<String> {
        let prefs_path = app.prefs_path();
        let raw = fs::read_to_string(prefs_path)
            .with_context(|| format!("failed reading prefs file: {}", prefs_path.display()))?;
        read_live_version(&raw).with_context(|| {
            format!(
                "prefs file {} has no {VERSION_PREF_KEY} entry: launch the application once and try again",
                prefs_path.display()
            )
        })
    }
}

/// Extracts the last launched version from a prefs file body.
pub fn read_live_version(raw: &str) -> Option<String> {
    raw.lines().map(str::trim).find_map(|line| {
        let (key, value) = line.split_once('=')?;
        if key.trim() != VERSION_PREF_KEY {
            return None;
        }
        let value = value.trim().trim_matches('"').trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}
