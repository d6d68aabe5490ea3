/// Draws a tracker's state. Only called when the tracker is not quiet.
pub trait ProgressView {
    fn start(&mut self, label: &str, total: u64);
    fn update(&mut self, current: u64, total: u64);
    fn finish(&mut self, snapshot: &ProgressSnapshot);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub label: String,
    pub current: u64,
    pub total: u64,
}

impl ProgressSnapshot {
    pub fn percent(&self) -> u64 {
        if self.total == 0 {
            return 100;
        }
        (self.current.min(self.total) * 100) / self.total
    }
}

/// Counts completed items for the running stage.
///
/// Increments are accepted in quiet mode too, so stage code never branches
/// on verbosity.
pub struct ProgressTracker {
    label: String,
    total: u64,
    current: u64,
    quiet: bool,
    started: bool,
    view: Option<Box<dyn ProgressView>>,
}

impl ProgressTracker {
    pub fn new(label: &str, total: u64) -> Self {
        Self {
            label: label.to_string(),
            total,
            current: 0,
            quiet: false,
            started: false,
            view: None,
        }
    }

    pub fn with_view(mut self, view: Box<dyn ProgressView>) -> Self {
        self.view = Some(view);
        self
    }

    pub fn quiet(&mut self) {
        self.quiet = true;
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            label: self.label.clone(),
            current: self.current,
            total: self.total,
        }
    }

    pub fn update(&mut self) {
        self.current = self.current.saturating_add(1);
        let (current, total) = (self.current.min(self.total), self.total);
        if let Some(view) = self.active_view() {
            view.update(current, total);
        }
    }

    /// Rearms the tracker for the next stage.
    pub fn reset(&mut self, label: &str, total: u64) {
        self.label = label.to_string();
        self.total = total;
        self.current = 0;
        self.started = false;
    }

    pub fn finish(&mut self) -> ProgressSnapshot {
        let snapshot = self.snapshot();
        if let Some(view) = self.active_view() {
            view.finish(&snapshot);
        }
        self.started = false;
        snapshot
    }

    fn active_view(&mut self) -> Option<&mut Box<dyn ProgressView>> {
        if self.quiet {
            return None;
        }
        let view = self.view.as_mut()?;
        if !self.started {
            view.start(&self.label, self.total);
            self.started = true;
        }
        Some(view)
    }
}
