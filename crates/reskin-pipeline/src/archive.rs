use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Context, Result};

/// Unpacks one application package into a directory.
pub trait Extractor {
    fn extract(&self, archive_path: &Path, destination: &Path) -> Result<()>;
}

/// Shells out to the platform's archive tools. Packages are zip archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandExtractor;

impl Extractor for CommandExtractor {
    fn extract(&self, archive_path: &Path, destination: &Path) -> Result<()> {
        if cfg!(windows) {
            let mut command = Command::new("powershell");
            command.arg("-NoProfile").arg("-Command").arg(format!(
                "Expand-Archive -LiteralPath '{}' -DestinationPath '{}' -Force",
                escape_ps_single_quote(archive_path),
                escape_ps_single_quote(destination)
            ));
            if run_command(&mut command, "failed to extract package with powershell").is_ok() {
                return Ok(());
            }
        }

        let mut unzip_command = Command::new("unzip");
        unzip_command
            .arg("-q")
            .arg("-o")
            .arg(archive_path)
            .arg("-d")
            .arg(destination);
        if run_command(&mut unzip_command, "failed to extract package with unzip").is_ok() {
            return Ok(());
        }

        run_command(
            Command::new("tar")
                .arg("-xf")
                .arg(archive_path)
                .arg("-C")
                .arg(destination),
            "failed to extract package with tar fallback",
        )
    }
}

pub(crate) fn run_command(command: &mut Command, context_message: &str) -> Result<()> {
    let output = command
        .output()
        .with_context(|| format!("{context_message}: command failed to start"))?;
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    Err(anyhow!(
        "{context_message}: status={} stdout='{}' stderr='{}'",
        output.status,
        stdout.trim(),
        stderr.trim()
    ))
}

fn escape_ps_single_quote(path: &Path) -> String {
    path.display().to_string().replace('\'', "''")
}
