//! Resolution of bare links to asset files and hashing of their contents.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest as _, Sha256};

use super::query::parse_link;
use crate::error::Error;
use crate::models::Fingerprint;

/// Hash the full contents of the file at `path`.
///
/// Directories and other non-regular files are rejected with `InvalidInput` before the
/// file is opened, so a named pipe never blocks the caller.
pub fn fingerprint_file(path: &Path) -> io::Result<Fingerprint> {
  if !fs::metadata(path)?.is_file() {
    return Err(io::Error::new(
      io::ErrorKind::InvalidInput,
      format!("{} is not a regular file", path.display()),
    ));
  }

  let mut file = File::open(path)?;

  let mut hasher = Sha256::new();
  io::copy(&mut file, &mut hasher)?;
  Ok(Fingerprint(format!("{:x}", hasher.finalize())))
}

/// Path of the asset a link refers to, treating the link path as relative to `assets_root`
/// even when it starts with `/`.
pub fn asset_file_path(assets_root: &Path, link_path: &str) -> PathBuf {
  assets_root.join(link_path.trim_start_matches('/'))
}

/// Resolve `link` to a file under `assets_root` and fingerprint its contents.
///
/// # Errors
///
/// `Error::UnparsableLink` when the link has no path, `Error::UnreadableAsset` when the
/// file is missing, not a regular file, or cannot be read.
pub fn resolve_version(link: &str, assets_root: &Path) -> Result<Fingerprint, Error> {
  let parsed = parse_link(link);
  if parsed.path.is_empty() {
    return Err(Error::UnparsableLink {
      link: link.to_string(),
      context: None,
    });
  }

  let file = asset_file_path(assets_root, &parsed.path);
  fingerprint_file(&file).map_err(|source| Error::UnreadableAsset {
    link: link.to_string(),
    file,
    source,
    context: None,
  })
}
