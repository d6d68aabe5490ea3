use std::fs;

use anyhow::{Context, Result};
use reskin_core::{AppPaths, BackupStatus, ConfigStore, InstallStatus, StateLayout};

use crate::fs_ops::list_files;
use crate::rules::PREPROCESS_EXTENSIONS;
use crate::{Pipeline, ProgressTracker, Prompter, Reporter, StatusOracle};

/// Everything an operation reads or mutates on disk.
pub struct OverlayContext<'a> {
    pub layout: &'a StateLayout,
    pub app: &'a AppPaths,
    pub config: &'a mut ConfigStore,
    pub oracle: &'a dyn StatusOracle,
    pub pipeline: &'a dyn Pipeline,
}

/// The user-facing side of an operation.
pub struct Interaction<'a> {
    pub reporter: &'a mut dyn Reporter,
    pub prompter: &'a mut dyn Prompter,
    pub progress: &'a mut ProgressTracker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    Completed,
    Refused(Refusal),
}

/// A policy precondition was not met. Nothing on disk was touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    BackupOverModifiedInstall,
    NoBackup,
    Declined,
}

impl Refusal {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BackupOverModifiedInstall => "backup-over-modified-install",
            Self::NoBackup => "no-backup",
            Self::Declined => "declined",
        }
    }
}

/// Stores the original app packages, extracts them and preprocesses the
/// extracted assets. The recorded backup version only changes once every
/// stage has succeeded.
pub fn backup(ctx: &mut OverlayContext<'_>, io: &mut Interaction<'_>) -> Result<OperationOutcome> {
    let backup_dir = ctx.layout.backup_dir();
    let raw_dir = ctx.layout.raw_dir();
    let themed_dir = ctx.layout.themed_dir();

    let live_version = ctx.oracle.live_version(ctx.app)?;
    let recorded_version = ctx.config.backup_version().to_string();
    let backup_status = ctx
        .oracle
        .backup_status(ctx.app, &backup_dir, &recorded_version)?;
    match backup_status {
        BackupStatus::Empty => {}
        BackupStatus::Outdated | BackupStatus::Current => {
            io.reporter.info("There is an existing backup.");
            match ctx.oracle.install_status(ctx.app)? {
                InstallStatus::Stock => {
                    io.reporter.info("Clearing current backup:");
                    clear_backup(ctx, io)?;
                }
                InstallStatus::Modified => {
                    io.reporter.warn(
                        "After clearing the backup, the application cannot be backed up again in its current state.",
                    );
                    io.reporter.info(
                        "Restore first, then back up: run `reskin restore`, or reinstall the application and run `reskin backup`.",
                    );
                    return Ok(OperationOutcome::Refused(
                        Refusal::BackupOverModifiedInstall,
                    ));
                }
            }
        }
    }

    ctx.layout.ensure_role_dirs()?;

    io.reporter.section("Backing up app files");
    let apps_dir = ctx.app.apps_dir();
    let package_count = list_files(&apps_dir, &["spa"], false)?.len() as u64;
    run_stage(io.progress, "backup", package_count, |on_item_done| {
        ctx.pipeline.backup(&apps_dir, &backup_dir, on_item_done)
    })?;

    let backed_up = list_files(&backup_dir, &["spa"], false)?.len() as u64;
    if backed_up == 0 {
        anyhow::bail!(
            "backup-empty: no app packages found in {}: reinstall the application and try again",
            apps_dir.display()
        );
    }
    io.reporter.success(&format!("backed up {backed_up} app packages"));

    io.reporter.section("Extracting");
    run_stage(io.progress, "extract", backed_up, |on_item_done| {
        ctx.pipeline.extract(&backup_dir, &raw_dir, on_item_done)
    })?;

    io.reporter.section("Preprocessing");
    let flags = ctx.config.file().preprocess_flags();
    let asset_count = list_files(&raw_dir, PREPROCESS_EXTENSIONS, true)?.len() as u64;
    run_stage(io.progress, "preprocess", asset_count, |on_item_done| {
        ctx.pipeline.preprocess(&raw_dir, flags, on_item_done)
    })?;

    ctx.pipeline.copy_themed(&raw_dir, &themed_dir)?;

    let stylesheet_count = list_files(&themed_dir, &["css"], true)?.len() as u64;
    run_stage(io.progress, "css", stylesheet_count, |on_item_done| {
        ctx.pipeline.preprocess_css(&themed_dir, on_item_done)
    })?;

    ctx.config.set_backup_version(&live_version);
    ctx.config.flush()?;
    io.reporter.success("Everything is ready, you can start applying now!");
    Ok(OperationOutcome::Completed)
}

/// Clears the current backup after checking the install can be backed up
/// again.
pub fn clear(ctx: &mut OverlayContext<'_>, io: &mut Interaction<'_>) -> Result<OperationOutcome> {
    match ctx.oracle.install_status(ctx.app)? {
        InstallStatus::Stock => {}
        InstallStatus::Modified => {
            io.reporter.warn(
                "Before clearing the backup, restore or reinstall the application to its stock state.",
            );
            if !io.prompter.confirm("Continue clearing anyway? [y/N]: ")? {
                return Ok(OperationOutcome::Refused(Refusal::Declined));
            }
        }
    }

    clear_backup(ctx, io)?;
    Ok(OperationOutcome::Completed)
}

/// Puts the backed up packages back into the install.
pub fn restore(
    ctx: &mut OverlayContext<'_>,
    io: &mut Interaction<'_>,
    launcher: Option<&dyn crate::AppLauncher>,
) -> Result<OperationOutcome> {
    let backup_dir = ctx.layout.backup_dir();
    let recorded_version = ctx.config.backup_version().to_string();
    let backup_status = ctx
        .oracle
        .backup_status(ctx.app, &backup_dir, &recorded_version)?;
    let install_status = ctx.oracle.install_status(ctx.app)?;

    match backup_status {
        BackupStatus::Empty => {
            io.reporter.error("You haven't backed up.");
            if !install_status.is_stock() {
                io.reporter.warn(
                    "The application cannot be backed up in its current state: reinstall it, then run `reskin backup`.",
                );
            }
            return Ok(OperationOutcome::Refused(Refusal::NoBackup));
        }
        BackupStatus::Outdated => {
            io.reporter.warn("Application version and backup version are mismatched.");
            if install_status.is_stock() {
                io.reporter.info(
                    "The application is in its stock state: run `reskin backup` to back up the current version instead.",
                );
            }
            if !io.prompter.confirm("Continue restoring anyway? [y/N]: ")? {
                return Ok(OperationOutcome::Refused(Refusal::Declined));
            }
        }
        BackupStatus::Current => {}
    }

    let apps_dir = ctx.app.apps_dir();
    if apps_dir.exists() {
        fs::remove_dir_all(&apps_dir).with_context(|| {
            format!("restore-remove-failed: failed removing {}", apps_dir.display())
        })?;
    }
    ctx.pipeline.restore(&backup_dir, &apps_dir)?;
    io.reporter.success("Application is restored.");

    if let Some(launcher) = launcher {
        if let Err(err) = launcher.restart() {
            io.reporter.warn(&format!("restart skipped: {err:#}"));
        }
    }

    Ok(OperationOutcome::Completed)
}

/// Runs one stage against a rearmed tracker. The tracker is flushed even when
/// the stage fails.
fn run_stage<F>(progress: &mut ProgressTracker, label: &str, total: u64, stage: F) -> Result<()>
where
    F: FnOnce(&mut dyn FnMut()) -> Result<()>,
{
    progress.reset(label, total);
    let result = stage(&mut || progress.update());
    progress.finish();
    result
}

fn clear_backup(ctx: &mut OverlayContext<'_>, io: &mut Interaction<'_>) -> Result<()> {
    for dir in ctx.layout.role_dirs() {
        if dir.exists() {
            fs::remove_dir_all(&dir)
                .with_context(|| format!("clear-failed: failed removing {}", dir.display()))?;
        }
        fs::create_dir_all(&dir)
            .with_context(|| format!("clear-failed: failed creating {}", dir.display()))?;
    }

    ctx.config.set_backup_version("");
    ctx.config.flush()?;
    io.reporter.success("Backup is cleared.");
    Ok(())
}
