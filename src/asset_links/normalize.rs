use regex::Regex;

fn wrapper_patterns() -> &'static [Regex] {
  use std::sync::OnceLock;

  static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
  PATTERNS
    .get_or_init(|| {
      vec![
        Regex::new(r"(?s)^url\((.*)\)$").expect("invalid url() wrapper regex"),
        Regex::new(r#"(?s)^src=(".*"|'.*')$"#).expect("invalid src wrapper regex"),
        Regex::new(r#"(?s)^href=(".*"|'.*')$"#).expect("invalid href wrapper regex"),
      ]
    })
    .as_slice()
}

/// Strip a reference token down to its bare link.
///
/// Every wrapper rule is applied in turn and only the one matching the token has an effect,
/// so the caller does not need to know which reference shape produced the token. Residual
/// whitespace and quote characters around the link are trimmed afterwards.
pub fn normalize_reference(token: &str) -> &str {
  let mut link = token;
  for pattern in wrapper_patterns() {
    if let Some(inner) = pattern.captures(link).and_then(|caps| caps.get(1)) {
      link = inner.as_str();
    }
  }

  link.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}
