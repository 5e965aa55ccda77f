use regex::Regex;

fn remote_link_patterns() -> &'static [Regex] {
  use std::sync::OnceLock;

  static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
  PATTERNS
    .get_or_init(|| {
      vec![
        Regex::new(r"(?i)^https?://").expect("invalid http(s) regex"),
        Regex::new(r"^//").expect("invalid protocol-relative regex"),
        Regex::new(r"(?i)^data:").expect("invalid data URI regex"),
        Regex::new(r"(?i)^mailto:").expect("invalid mailto regex"),
      ]
    })
    .as_slice()
}

fn file_link_pattern() -> &'static Regex {
  use std::sync::OnceLock;

  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r"^[^?#]*\.[0-9A-Za-z]+(?:[?#].*)?$").expect("invalid file link regex")
  })
}

/// Determine whether a bare link points outside the assets root and must be left alone.
///
/// Remote URLs, protocol-relative URLs, data URIs and mail links have no file under the
/// assets root, so they are skipped without being reported as problems.
pub fn is_remote_link(link: &str) -> bool {
  remote_link_patterns()
    .iter()
    .any(|pattern| pattern.is_match(link))
}

/// Determine whether a bare link is an inline `data:` URI.
pub fn is_data_uri(link: &str) -> bool {
  link
    .get(..5)
    .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Determine whether a bare link looks like a file reference: the part before any query or
/// fragment ends with an extension such as `.css` or `.png`.
pub fn looks_like_file_link(link: &str) -> bool {
  file_link_pattern().is_match(link)
}
