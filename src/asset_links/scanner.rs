//! Discovery of asset reference tokens in arbitrary text.
//!
//! Each reference shape has its own scanner so the rules can be tested independently:
//! quoted `src` attributes are taken as they are, quoted `href` attributes only when they
//! point at a file, and CSS `url(...)` references unless they are inline `data:` URIs.

use regex::Regex;

use super::filters::{is_data_uri, looks_like_file_link};
use super::normalize::normalize_reference;

fn src_pattern() -> &'static Regex {
  use std::sync::OnceLock;

  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r#"src="[^"]+"|src='[^']+'"#).expect("invalid src regex"))
}

fn href_pattern() -> &'static Regex {
  use std::sync::OnceLock;

  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN
    .get_or_init(|| Regex::new(r#"href="[^"]+"|href='[^']+'"#).expect("invalid href regex"))
}

fn url_pattern() -> &'static Regex {
  use std::sync::OnceLock;

  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"url\([^)]+\)").expect("invalid url() regex"))
}

/// Quoted `src="..."` / `src='...'` attribute values, in order of appearance.
pub fn scan_src_references(content: &str) -> Vec<&str> {
  src_pattern()
    .find_iter(content)
    .map(|found| found.as_str())
    .collect()
}

/// Quoted `href` attribute values whose link ends in a file extension, optionally followed
/// by a query and/or fragment. Navigational links such as `href="#top"` or `href="/page"`
/// are not returned.
pub fn scan_href_references(content: &str) -> Vec<&str> {
  href_pattern()
    .find_iter(content)
    .map(|found| found.as_str())
    .filter(|token| looks_like_file_link(normalize_reference(token)))
    .collect()
}

/// CSS `url(...)` references in bare, double-quoted or single-quoted form, excluding
/// anything that starts with `data:`.
pub fn scan_url_references(content: &str) -> Vec<&str> {
  url_pattern()
    .find_iter(content)
    .map(|found| found.as_str())
    .filter(|token| !is_data_uri(normalize_reference(token)))
    .collect()
}

/// All reference tokens in `content`: quoted `src` first, then file `href`, then `url()`.
///
/// Duplicates are preserved. An empty result means the content needs no rewriting.
pub fn scan_references(content: &str) -> Vec<&str> {
  let mut tokens = scan_src_references(content);
  tokens.extend(scan_href_references(content));
  tokens.extend(scan_url_references(content));
  tokens
}
