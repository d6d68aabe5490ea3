/// Extensions copied from the raw tree into the themed tree.
pub const THEMED_EXTENSIONS: &[&str] = &["html", "js", "css"];

/// Extensions copied back into the install on restore.
pub const RESTORE_EXTENSIONS: &[&str] = &["spa"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreprocessFlags {
    pub disable_sentry: bool,
    pub disable_ui_logging: bool,
    pub remove_rtl_rule: bool,
    pub expose_apis: bool,
    pub stop_autoupdate: bool,
}
