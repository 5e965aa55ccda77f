//! Data structures produced while versioning asset links.

use std::fmt;

use indexmap::IndexMap;

/// Query key carrying the content fingerprint of the referenced asset.
pub const VERSION_KEY: &str = "version";

/// Content hash of an asset file, embedded as the `version` query value.
///
/// Lowercase hex SHA-256 digest. Only ever compared or embedded, never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(
  /// The hex-encoded digest.
  pub String,
);

impl Fingerprint {
  /// Borrow the digest text.
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Fingerprint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Structured view of a bare link: everything before `?`/`#`, the decoded query and the
/// fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
  /// Path component. Empty when the link is only a query or fragment.
  pub path: String,
  /// Decoded query parameters in first-seen order. A repeated key keeps its first position
  /// and its last value.
  pub query: IndexMap<String, String>,
  /// Trailing anchor without the `#`. Empty anchors are stored as `None`.
  pub fragment: Option<String>,
}
