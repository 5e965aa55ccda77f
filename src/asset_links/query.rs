use indexmap::IndexMap;
use url::form_urlencoded;

use crate::models::{Fingerprint, ParsedLink, VERSION_KEY};

/// Split a bare link into path, decoded query and fragment.
pub fn parse_link(link: &str) -> ParsedLink {
  let (before_fragment, fragment) = match link.split_once('#') {
    Some((head, anchor)) => (head, Some(anchor)),
    None => (link, None),
  };
  let (path, raw_query) = match before_fragment.split_once('?') {
    Some((path, query)) => (path, query),
    None => (before_fragment, ""),
  };

  let mut query = IndexMap::new();
  for (key, value) in form_urlencoded::parse(raw_query.as_bytes()) {
    if key.is_empty() {
      continue;
    }
    query.insert(key.into_owned(), value.into_owned());
  }

  ParsedLink {
    path: path.to_string(),
    query,
    fragment: fragment
      .filter(|anchor| !anchor.is_empty())
      .map(str::to_string),
  }
}

/// Inject `fingerprint` as the `version` query parameter of `link`.
///
/// Returns `original` unchanged when the link already carries the same version. Otherwise
/// the whole query is re-encoded with `version` set: an existing key keeps its position, a
/// new one is appended. The fragment, if any, is reattached last.
pub fn merge_version(original: &str, link: &ParsedLink, fingerprint: &Fingerprint) -> String {
  if link
    .query
    .get(VERSION_KEY)
    .is_some_and(|current| current == fingerprint.as_str())
  {
    return original.to_string();
  }

  let mut query = link.query.clone();
  query.insert(VERSION_KEY.to_string(), fingerprint.to_string());

  let encoded = form_urlencoded::Serializer::new(String::new())
    .extend_pairs(query.iter())
    .finish();

  let mut versioned = format!("{}?{}", link.path, encoded);
  if let Some(fragment) = &link.fragment {
    versioned.push('#');
    versioned.push_str(fragment);
  }
  versioned
}
