mod config;
mod layout;
mod preprocess;
mod status;

pub use config::{
    BackupSection, ConfigFile, ConfigStore, PreprocessSection, SettingsSection,
};
pub use layout::{default_state_root, AppPaths, StateLayout};
pub use preprocess::{PreprocessFlags, RESTORE_EXTENSIONS, THEMED_EXTENSIONS};
pub use status::{BackupStatus, InstallStatus};
