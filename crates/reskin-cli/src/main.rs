use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use reskin_pipeline::OperationOutcome;

mod completion;
mod dispatch;
mod launcher;
mod prompt;
mod render;

use dispatch::run_cli;
use render::{current_output_style, render_status_line};

#[derive(Parser, Debug)]
#[command(name = "reskin")]
#[command(
    about = "Back up, preprocess and restore a desktop application's bundled web assets",
    long_about = None
)]
struct Cli {
    /// Directory holding config.toml and the backup/extracted trees.
    #[arg(long, global = true)]
    state_root: Option<PathBuf>,
    /// Suppress progress rendering.
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Do not restart the application after restoring.
    #[arg(short = 'n', long, global = true)]
    no_restart: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Back up, extract and preprocess the application's packages.
    Backup {
        #[command(subcommand)]
        action: Option<BackupAction>,
    },
    /// Put the backed up packages back into the application.
    Restore,
    Completions {
        #[arg(value_enum)]
        shell: CliCompletionShell,
    },
}

#[derive(Subcommand, Debug)]
enum BackupAction {
    /// Remove the backup and the extracted trees.
    Clear,
    /// Show backup and install state.
    Status {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliCompletionShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl From<CliCompletionShell> for Shell {
    fn from(value: CliCompletionShell) -> Self {
        match value {
            CliCompletionShell::Bash => Shell::Bash,
            CliCompletionShell::Zsh => Shell::Zsh,
            CliCompletionShell::Fish => Shell::Fish,
            CliCompletionShell::Powershell => Shell::PowerShell,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let style = current_output_style();

    match run_cli(cli, style) {
        Ok(OperationOutcome::Completed) => ExitCode::SUCCESS,
        Ok(OperationOutcome::Refused(_)) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{}", render_status_line(style, "error", &format!("{err:#}")));
            ExitCode::FAILURE
        }
    }
}
