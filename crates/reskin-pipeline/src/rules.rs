use std::path::Path;

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use reskin_core::PreprocessFlags;

/// Asset types the first preprocessing pass rewrites.
pub const PREPROCESS_EXTENSIONS: &[&str] = &["js", "css", "html"];

const EXPOSE_SCRIPT_TAG: &str = r#"<script src="helper/reskin-expose.js"></script>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetKind {
    Script,
    Style,
    Markup,
}

impl AssetKind {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "js" => Some(Self::Script),
            "css" => Some(Self::Style),
            "html" => Some(Self::Markup),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Rule {
    kind: AssetKind,
    pattern: Regex,
    replacement: &'static str,
}

/// Flag-driven rewrite rules for extracted application assets.
#[derive(Debug)]
pub struct AssetRules {
    rules: Vec<Rule>,
    expose_apis: bool,
    body_close: Regex,
}

impl AssetRules {
    pub fn new(flags: PreprocessFlags) -> Result<Self> {
        let mut table: Vec<(AssetKind, &str, &'static str)> = Vec::new();
        if flags.disable_sentry {
            table.push((AssetKind::Script, r"sentry\.install\(\)[,;]?", ""));
            table.push((
                AssetKind::Script,
                r#""https://\w+@sentry\.io/\d+""#,
                r#""https://no-telemetry.invalid/""#,
            ));
        }
        if flags.disable_ui_logging {
            table.push((AssetKind::Script, r#""sp://logging/v3/\w+""#, r#""""#));
        }
        if flags.stop_autoupdate {
            table.push((AssetKind::Script, r#""sp://desktop/v1/upgrade/\w+""#, r#""""#));
        }
        if flags.remove_rtl_rule {
            table.push((AssetKind::Style, r"\[dir=ltr\]\s?", ""));
            table.push((AssetKind::Style, r"\[dir=rtl\][^{]*\{[^}]*\}", ""));
        }

        let mut rules = Vec::with_capacity(table.len());
        for (kind, pattern, replacement) in table {
            rules.push(Rule {
                kind,
                pattern: Regex::new(pattern)
                    .with_context(|| format!("invalid preprocess rule pattern: {pattern}"))?,
                replacement,
            });
        }

        Ok(Self {
            rules,
            expose_apis: flags.expose_apis,
            body_close: Regex::new(r"(?i)</body>").context("invalid body close pattern")?,
        })
    }

    /// Returns the rewritten content, or `None` when nothing changed or the
    /// file is not a preprocessed asset type.
    pub fn rewrite(&self, path: &Path, content: &str) -> Option<String> {
        let kind = AssetKind::from_path(path)?;
        let mut current = content.to_string();

        for rule in self.rules.iter().filter(|rule| rule.kind == kind) {
            current = rule
                .pattern
                .replace_all(&current, rule.replacement)
                .into_owned();
        }

        if self.expose_apis && kind == AssetKind::Markup && !current.contains(EXPOSE_SCRIPT_TAG) {
            current = self
                .body_close
                .replace(&current, format!("{EXPOSE_SCRIPT_TAG}</body>").as_str())
                .into_owned();
        }

        (current != content).then_some(current)
    }
}

/// Second pass over themed CSS: hex colour literals become overridable
/// custom properties.
#[derive(Debug)]
pub struct CssColorRewriter {
    pattern: Regex,
}

impl CssColorRewriter {
    pub fn new() -> Result<Self> {
        let pattern =
            Regex::new(r"(var\(--reskin-[0-9a-fA-F]{6}, #[0-9a-fA-F]{6}\))|#([0-9a-fA-F]{6})\b")
                .context("invalid css colour pattern")?;
        Ok(Self { pattern })
    }

    pub fn rewrite(&self, content: &str) -> Option<String> {
        let rewritten = self.pattern.replace_all(content, |caps: &Captures| {
            if let Some(existing) = caps.get(1) {
                return existing.as_str().to_string();
            }
            let hex = caps[2].to_ascii_lowercase();
            format!("var(--reskin-{hex}, #{hex})")
        });

        (rewritten != content).then(|| rewritten.into_owned())
    }
}
