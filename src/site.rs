//! In-place versioning of asset links in generated site files.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::injector::AssetsVersionInjector;

const VERSIONED_EXTENSIONS: &[&str] = &["html", "htm", "css"];

/// Rewrite the asset links of a single file, writing it back only when something changed.
///
/// Returns whether the file was modified. The file path is appended to problem reports
/// unless an explicit `context` is given.
pub fn version_file(
  injector: &AssetsVersionInjector,
  file: &Path,
  assets_root: &Path,
  context: Option<&str>,
) -> Result<bool> {
  let text =
    fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;

  let default_context = format!("(in {})", file.display());
  let context = context.unwrap_or(&default_context);
  let versioned = injector
    .add_versions_to_asset_links(&text, assets_root, Some(context))
    .with_context(|| format!("failed to version asset links in {}", file.display()))?;

  let Cow::Owned(updated) = versioned else {
    return Ok(false);
  };
  if updated == text {
    return Ok(false);
  }

  fs::write(file, &updated).with_context(|| format!("failed to write {}", file.display()))?;
  debug!(file = %file.display(), "versioned asset links");
  Ok(true)
}

/// Version every HTML and CSS file below `site_root`, resolving links against `assets_root`.
///
/// Hidden entries are skipped. Returns the modified files in sorted order.
pub fn version_site(
  injector: &AssetsVersionInjector,
  site_root: &Path,
  assets_root: &Path,
) -> Result<Vec<PathBuf>> {
  let mut files = Vec::new();
  collect_versionable_files(site_root, &mut files)?;
  files.sort();

  let mut modified = Vec::new();
  for file in files {
    if version_file(injector, &file, assets_root, None)? {
      modified.push(file);
    }
  }

  Ok(modified)
}

fn collect_versionable_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
  for entry in
    fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?
  {
    let entry = entry?;
    let file_name = entry.file_name();
    if file_name.to_string_lossy().starts_with('.') {
      continue;
    }

    let path = entry.path();
    let file_type = entry.file_type()?;
    if file_type.is_dir() {
      collect_versionable_files(&path, files)?;
    } else if file_type.is_file() && is_versionable(&path) {
      files.push(path);
    }
  }

  Ok(())
}

fn is_versionable(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| {
      VERSIONED_EXTENSIONS
        .iter()
        .any(|known| ext.eq_ignore_ascii_case(known))
    })
}
