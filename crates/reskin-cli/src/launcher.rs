use std::process::{Command, Stdio};

use anyhow::{anyhow, Context, Result};
use reskin_core::SettingsSection;
use reskin_pipeline::AppLauncher;

/// Kills the running application and starts it again, detached.
#[derive(Debug, Clone)]
pub(crate) struct CommandLauncher {
    process_name: String,
    launch_command: String,
}

impl CommandLauncher {
    pub(crate) fn from_settings(settings: &SettingsSection) -> Self {
        Self {
            process_name: settings.process_name.trim().to_string(),
            launch_command: settings.launch_command.trim().to_string(),
        }
    }
}

impl AppLauncher for CommandLauncher {
    fn restart(&self) -> Result<()> {
        if self.process_name.is_empty() {
            return Err(anyhow!(
                "settings.process_name is not set; restart the application manually"
            ));
        }
        let mut launch = build_launch_command(&self.launch_command)?;

        // Exit status is ignored: the application may not be running.
        let _ = build_kill_command(&self.process_name, cfg!(windows))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        launch
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to launch '{}'", self.launch_command))?;
        Ok(())
    }
}

pub(crate) fn build_kill_command(process_name: &str, is_windows: bool) -> Command {
    if is_windows {
        let mut command = Command::new("taskkill");
        command
            .arg("/F")
            .arg("/IM")
            .arg(format!("{process_name}.exe"));
        command
    } else {
        let mut command = Command::new("pkill");
        command.arg("-x").arg(process_name);
        command
    }
}

pub(crate) fn build_launch_command(launch_command: &str) -> Result<Command> {
    let mut parts = launch_command.split_whitespace();
    let Some(program) = parts.next() else {
        return Err(anyhow!(
            "settings.launch_command is not set; restart the application manually"
        ));
    };
    let mut command = Command::new(program);
    command.args(parts);
    Ok(command)
}
