use anyhow::Result;

/// Sink for the status lines an operation emits.
pub trait Reporter {
    fn section(&mut self, title: &str);
    fn info(&mut self, message: &str);
    fn warn(&mut self, message: &str);
    fn success(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Blocking yes/no confirmation. Implementations answer "no" on empty input.
pub trait Prompter {
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Restarts the target application after a restore.
pub trait AppLauncher {
    fn restart(&self) -> Result<()>;
}
