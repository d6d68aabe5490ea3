use serde::{Deserialize, Serialize};

/// Presence and version alignment of the pristine backup.
///
/// Always derived from disk and the recorded version, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupStatus {
    Empty,
    Outdated,
    Current,
}

impl BackupStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Outdated => "outdated",
            Self::Current => "current",
        }
    }
}

/// Whether the target application's assets are in their shipped form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallStatus {
    Stock,
    Modified,
}

impl InstallStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Modified => "modified",
        }
    }

    pub fn is_stock(self) -> bool {
        matches!(self, Self::Stock)
    }
}
