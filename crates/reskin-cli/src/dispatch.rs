use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use reskin_core::{
    default_state_root, AppPaths, BackupStatus, ConfigStore, InstallStatus, StateLayout,
};
use reskin_pipeline::{
    backup, clear, restore, AppLauncher, CommandExtractor, FsPipeline, FsStatusOracle,
    Interaction, OperationOutcome, OverlayContext, ProgressTracker, StatusOracle,
};
use serde::Serialize;

use crate::completion::write_completions_script;
use crate::launcher::CommandLauncher;
use crate::prompt::LinePrompter;
use crate::render::{OutputStyle, TerminalProgressView, TerminalRenderer};
use crate::{BackupAction, Cli, Commands};

/// State loaded once per invocation and shared by the operations.
struct CommandEnv {
    layout: StateLayout,
    app: AppPaths,
    config: ConfigStore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct StatusReport {
    pub(crate) backup: BackupStatus,
    pub(crate) install: InstallStatus,
    pub(crate) recorded_version: String,
    pub(crate) live_version: String,
}

impl CommandEnv {
    fn load(state_root: Option<PathBuf>) -> Result<Self> {
        let root = match state_root {
            Some(root) => root,
            None => default_state_root()?,
        };
        let layout = StateLayout::new(root);
        let config = ConfigStore::load(layout.config_path())?;
        let app = config
            .file()
            .app_paths()
            .with_context(|| format!("edit {} to continue", layout.config_path().display()))?;
        Ok(Self {
            layout,
            app,
            config,
        })
    }

    fn run<F>(&mut self, style: OutputStyle, quiet: bool, operation: F) -> Result<OperationOutcome>
    where
        F: FnOnce(&mut OverlayContext<'_>, &mut Interaction<'_>) -> Result<OperationOutcome>,
    {
        let oracle = FsStatusOracle;
        let pipeline = FsPipeline::new(CommandExtractor);
        let mut renderer = TerminalRenderer::from_style(style);
        let mut prompter = LinePrompter::new(io::stdin().lock(), io::stdout());
        let mut progress =
            ProgressTracker::new("idle", 0).with_view(Box::new(TerminalProgressView::new(style)));
        if quiet {
            progress.quiet();
        }

        let mut ctx = OverlayContext {
            layout: &self.layout,
            app: &self.app,
            config: &mut self.config,
            oracle: &oracle,
            pipeline: &pipeline,
        };
        let mut interaction = Interaction {
            reporter: &mut renderer,
            prompter: &mut prompter,
            progress: &mut progress,
        };
        operation(&mut ctx, &mut interaction)
    }

    fn status_report(&self, oracle: &dyn StatusOracle) -> Result<StatusReport> {
        let recorded_version = self.config.backup_version().to_string();
        Ok(StatusReport {
            backup: oracle.backup_status(&self.app, &self.layout.backup_dir(), &recorded_version)?,
            install: oracle.install_status(&self.app)?,
            live_version: oracle.live_version(&self.app)?,
            recorded_version,
        })
    }
}

pub(crate) fn run_cli(cli: Cli, style: OutputStyle) -> Result<OperationOutcome> {
    match cli.command {
        Commands::Completions { shell } => {
            write_completions_script(shell, &mut io::stdout())?;
            Ok(OperationOutcome::Completed)
        }
        Commands::Backup { action: None } => {
            CommandEnv::load(cli.state_root)?.run(style, cli.quiet, backup)
        }
        Commands::Backup {
            action: Some(BackupAction::Clear),
        } => CommandEnv::load(cli.state_root)?.run(style, cli.quiet, clear),
        Commands::Backup {
            action: Some(BackupAction::Status { json }),
        } => {
            let env = CommandEnv::load(cli.state_root)?;
            let report = env.status_report(&FsStatusOracle)?;
            if json {
                let rendered = serde_json::to_string_pretty(&report)
                    .context("failed serializing status report")?;
                println!("{rendered}");
            } else {
                TerminalRenderer::from_style(style).print_lines(&format_status_lines(&report));
            }
            Ok(OperationOutcome::Completed)
        }
        Commands::Restore => {
            let mut env = CommandEnv::load(cli.state_root)?;
            let launcher = CommandLauncher::from_settings(&env.config.file().settings);
            let launcher: Option<&dyn AppLauncher> = if cli.no_restart {
                None
            } else {
                Some(&launcher)
            };
            env.run(style, cli.quiet, |ctx, interaction| {
                restore(ctx, interaction, launcher)
            })
        }
    }
}

pub(crate) fn format_status_lines(report: &StatusReport) -> Vec<String> {
    let recorded = if report.recorded_version.is_empty() {
        "(none)"
    } else {
        report.recorded_version.as_str()
    };
    vec![
        format!("backup: {}", report.backup.as_str()),
        format!("install: {}", report.install.as_str()),
        format!("backup version: {recorded}"),
        format!("app version: {}", report.live_version),
    ]
}
