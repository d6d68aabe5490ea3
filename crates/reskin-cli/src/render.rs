use std::io::{self, IsTerminal};
use std::time::{Duration, Instant};

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{HumanCount, ProgressBar, ProgressStyle};
use reskin_pipeline::{ProgressSnapshot, ProgressView, Reporter};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum UiMode {
    Plain,
    Interactive,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct TerminalRenderer {
    style: OutputStyle,
    mode: UiMode,
}

pub(crate) struct TerminalProgressView {
    style: OutputStyle,
    progress_bar: Option<ProgressBar>,
    started_at: Instant,
}

pub(crate) fn resolve_output_style(stdout_is_tty: bool, _stderr_is_tty: bool) -> OutputStyle {
    if stdout_is_tty {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

pub(crate) fn current_output_style() -> OutputStyle {
    resolve_output_style(io::stdout().is_terminal(), io::stderr().is_terminal())
}

impl TerminalRenderer {
    pub(crate) fn from_style(style: OutputStyle) -> Self {
        Self {
            style,
            mode: ui_mode_from_style(style),
        }
    }

    pub(crate) fn print_lines(self, lines: &[String]) {
        for line in lines {
            println!("{line}");
        }
    }
}

impl Reporter for TerminalRenderer {
    fn section(&mut self, title: &str) {
        if let Some(line) = render_section_header(self.mode, title) {
            println!();
            let rendered = match self.style {
                OutputStyle::Plain => line,
                OutputStyle::Rich => colorize(section_style(), &line),
            };
            println!("{rendered}");
        }
    }

    fn info(&mut self, message: &str) {
        println!("{}", render_status_line(self.style, "step", message));
    }

    fn warn(&mut self, message: &str) {
        eprintln!("{}", render_status_line(self.style, "warn", message));
    }

    fn success(&mut self, message: &str) {
        println!("{}", render_status_line(self.style, "ok", message));
    }

    fn error(&mut self, message: &str) {
        eprintln!("{}", render_status_line(self.style, "error", message));
    }
}

impl TerminalProgressView {
    pub(crate) fn new(style: OutputStyle) -> Self {
        Self {
            style,
            progress_bar: None,
            started_at: Instant::now(),
        }
    }
}

impl ProgressView for TerminalProgressView {
    fn start(&mut self, label: &str, total: u64) {
        self.started_at = Instant::now();
        if self.style != OutputStyle::Rich {
            return;
        }

        let progress_bar = ProgressBar::new(total.max(1));
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.cyan.bold} {msg:<12} [{bar:20.cyan/blue}] {pos:>3}/{len:3} {elapsed_precise}",
        ) {
            progress_bar.set_style(
                style
                    .tick_chars(progress_tick_chars(label))
                    .progress_chars("=>-"),
            );
        }
        progress_bar.set_message(label.to_string());
        progress_bar.enable_steady_tick(Duration::from_millis(80));
        self.progress_bar = Some(progress_bar);
    }

    fn update(&mut self, current: u64, total: u64) {
        let Some(progress_bar) = &self.progress_bar else {
            return;
        };

        let safe_total = total.max(1);
        progress_bar.set_length(safe_total);
        progress_bar.set_position(current.min(safe_total));
    }

    fn finish(&mut self, snapshot: &ProgressSnapshot) {
        let Some(progress_bar) = self.progress_bar.take() else {
            return;
        };

        progress_bar.finish_and_clear();
        if let Some(line) =
            render_progress_line(self.style, snapshot, Some(self.started_at.elapsed()))
        {
            println!("{line}");
        }
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("{} {message}", status_badge(status)),
    }
}

fn status_badge(status: &str) -> &'static str {
    match status {
        "ok" => "[OK]",
        "warn" => "[WARN]",
        "error" => "[ERR]",
        _ => "[..]",
    }
}

fn stage_unit(label: &str) -> &'static str {
    match label {
        "backup" | "extract" => "packages",
        _ => "files",
    }
}

fn progress_tick_chars(label: &str) -> &'static str {
    match label {
        "backup" => ".oO@* ",
        "extract" => "-=~* ",
        "preprocess" => "<^>v ",
        "css" => ".:;* ",
        _ => "|/-\\ ",
    }
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn progress_label_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightCyan.into()))
        .effects(Effects::BOLD)
}

fn progress_bar_style() -> Style {
    Style::new().fg_color(Some(AnsiColor::BrightBlue.into()))
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

pub(crate) fn ui_mode_from_style(style: OutputStyle) -> UiMode {
    match style {
        OutputStyle::Plain => UiMode::Plain,
        OutputStyle::Rich => UiMode::Interactive,
    }
}

pub(crate) fn render_section_header(mode: UiMode, title: &str) -> Option<String> {
    match mode {
        UiMode::Plain => None,
        UiMode::Interactive => Some(format!("== {title} ==")),
    }
}

/// One summary line for a finished stage, e.g.
/// `extract [==================] 100% 3/3 packages (1.250s)`.
pub(crate) fn render_progress_line(
    style: OutputStyle,
    snapshot: &ProgressSnapshot,
    elapsed: Option<Duration>,
) -> Option<String> {
    if style == OutputStyle::Plain {
        return None;
    }

    const BAR_WIDTH: u64 = 18;
    let percent = snapshot.percent().min(100);
    let filled = (percent * BAR_WIDTH / 100) as usize;
    let bar = format!(
        "{}{}",
        "=".repeat(filled),
        "-".repeat(BAR_WIDTH as usize - filled)
    );
    let mut line = format!(
        "{} [{}] {percent:>3}% {}/{} {}",
        colorize(progress_label_style(), &snapshot.label),
        colorize(progress_bar_style(), &bar),
        HumanCount(snapshot.current),
        HumanCount(snapshot.total),
        stage_unit(&snapshot.label),
    );
    if let Some(elapsed) = elapsed {
        line.push_str(&format!(" ({:.3}s)", elapsed.as_secs_f64()));
    }
    Some(line)
}
