use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use reskin_core::{PreprocessFlags, RESTORE_EXTENSIONS, THEMED_EXTENSIONS};

use crate::fs_ops::{copy_filtered, list_files, reset_dir};
use crate::rules::{AssetRules, CssColorRewriter, PREPROCESS_EXTENSIONS};
use crate::Extractor;

const PACKAGE_EXTENSIONS: &[&str] = &["spa"];

/// The filesystem stages a backup moves through, plus the restore copy.
///
/// Stages that take `on_item_done` call it exactly once per unit of work,
/// whether that unit succeeded or not. Stages overwrite their destination
/// and never clean up after a failure.
pub trait Pipeline {
    fn backup(
        &self,
        apps_dir: &Path,
        backup_dir: &Path,
        on_item_done: &mut dyn FnMut(),
    ) -> Result<()>;

    fn extract(
        &self,
        backup_dir: &Path,
        raw_dir: &Path,
        on_item_done: &mut dyn FnMut(),
    ) -> Result<()>;

    fn preprocess(
        &self,
        raw_dir: &Path,
        flags: PreprocessFlags,
        on_item_done: &mut dyn FnMut(),
    ) -> Result<()>;

    fn copy_themed(&self, raw_dir: &Path, themed_dir: &Path) -> Result<u64>;

    fn preprocess_css(&self, themed_dir: &Path, on_item_done: &mut dyn FnMut()) -> Result<()>;

    fn restore(&self, backup_dir: &Path, apps_dir: &Path) -> Result<u64>;
}

#[derive(Debug, Clone, Default)]
pub struct FsPipeline<E> {
    extractor: E,
}

impl<E: Extractor> FsPipeline<E> {
    pub fn new(extractor: E) -> Self {
        Self { extractor }
    }
}

impl<E: Extractor> Pipeline for FsPipeline<E> {
    fn backup(
        &self,
        apps_dir: &Path,
        backup_dir: &Path,
        on_item_done: &mut dyn FnMut(),
    ) -> Result<()> {
        fs::create_dir_all(backup_dir).with_context(|| {
            format!(
                "backup-copy-failed: failed creating {}",
                backup_dir.display()
            )
        })?;

        for package in list_files(apps_dir, PACKAGE_EXTENSIONS, false)
            .context("backup-copy-failed: failed listing app packages")?
        {
            let Some(file_name) = package.file_name() else {
                on_item_done();
                continue;
            };
            let destination = backup_dir.join(file_name);
            let copied = fs::copy(&package, &destination);
            on_item_done();
            copied.with_context(|| {
                format!(
                    "backup-copy-failed: failed copying {} to {}",
                    package.display(),
                    destination.display()
                )
            })?;
        }

        Ok(())
    }

    fn extract(
        &self,
        backup_dir: &Path,
        raw_dir: &Path,
        on_item_done: &mut dyn FnMut(),
    ) -> Result<()> {
        fs::create_dir_all(raw_dir).with_context(|| {
            format!("extract-failed: failed creating {}", raw_dir.display())
        })?;

        for package in list_files(backup_dir, PACKAGE_EXTENSIONS, false)
            .context("extract-failed: failed listing backed up packages")?
        {
            let result = extract_package(&self.extractor, &package, raw_dir);
            on_item_done();
            result.with_context(|| format!("extract-failed: {}", package.display()))?;
        }

        Ok(())
    }

    fn preprocess(
        &self,
        raw_dir: &Path,
        flags: PreprocessFlags,
        on_item_done: &mut dyn FnMut(),
    ) -> Result<()> {
        let rules = AssetRules::new(flags)?;
        for path in list_files(raw_dir, PREPROCESS_EXTENSIONS, true)
            .context("preprocess-failed: failed listing extracted assets")?
        {
            let result = rewrite_in_place(&path, |content| rules.rewrite(&path, content));
            on_item_done();
            result.with_context(|| format!("preprocess-failed: {}", path.display()))?;
        }
        Ok(())
    }

    fn copy_themed(&self, raw_dir: &Path, themed_dir: &Path) -> Result<u64> {
        copy_filtered(raw_dir, themed_dir, true, THEMED_EXTENSIONS).with_context(|| {
            format!(
                "theme-copy-failed: {} -> {}",
                raw_dir.display(),
                themed_dir.display()
            )
        })
    }

    fn preprocess_css(&self, themed_dir: &Path, on_item_done: &mut dyn FnMut()) -> Result<()> {
        let rewriter = CssColorRewriter::new()?;
        for path in list_files(themed_dir, &["css"], true)
            .context("preprocess-failed: failed listing themed stylesheets")?
        {
            let result = rewrite_in_place(&path, |content| rewriter.rewrite(content));
            on_item_done();
            result.with_context(|| format!("preprocess-failed: {}", path.display()))?;
        }
        Ok(())
    }

    fn restore(&self, backup_dir: &Path, apps_dir: &Path) -> Result<u64> {
        copy_filtered(backup_dir, apps_dir, false, RESTORE_EXTENSIONS).with_context(|| {
            format!(
                "restore-copy-failed: {} -> {}",
                backup_dir.display(),
                apps_dir.display()
            )
        })
    }
}

fn extract_package<E: Extractor>(extractor: &E, package: &Path, raw_dir: &Path) -> Result<()> {
    let stem = package
        .file_stem()
        .with_context(|| format!("package has no file name: {}", package.display()))?;
    let destination = raw_dir.join(stem);
    reset_dir(&destination)?;
    extractor.extract(package, &destination)
}

fn rewrite_in_place<F>(path: &Path, rewrite: F) -> Result<()>
where
    F: FnOnce(&str) -> Option<String>,
{
    let content =
        fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))?;
    if let Some(updated) = rewrite(&content) {
        fs::write(path, updated).with_context(|| format!("failed writing {}", path.display()))?;
    }
    Ok(())
}
