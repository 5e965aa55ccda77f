//! Problems raised while resolving individual asset links.

use std::io;
use std::path::PathBuf;

/// Failure to version a single asset link.
///
/// Both variants are local to one link. Whether they abort the whole rewrite is decided by
/// the injector's [`ReportMode`](crate::ReportMode); the message always names the offending
/// link and ends with the caller's additional context, when one was supplied.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The link has no path component that could be resolved to a file.
  #[error("can not parse URL from link '{link}'{}", context_suffix(context))]
  UnparsableLink {
    /// Bare link as extracted from the reference.
    link: String,
    /// Free-text context appended for diagnostics.
    context: Option<String>,
  },

  /// The file figured from the link is missing or could not be read.
  #[error(
    "can not read asset file {} figured from link '{link}'{}",
    file.display(),
    context_suffix(context)
  )]
  UnreadableAsset {
    /// Bare link as extracted from the reference.
    link: String,
    /// Path that was attempted under the assets root.
    file: PathBuf,
    /// Underlying read failure.
    source: io::Error,
    /// Free-text context appended for diagnostics.
    context: Option<String>,
  },
}

/// Discriminant of [`Error`], for callers that only care about the kind of problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
  /// See [`Error::UnparsableLink`].
  UnparsableLink,
  /// See [`Error::UnreadableAsset`].
  UnreadableAsset,
}

impl Error {
  /// Kind of problem this error describes.
  pub fn kind(&self) -> ProblemKind {
    match self {
      Error::UnparsableLink { .. } => ProblemKind::UnparsableLink,
      Error::UnreadableAsset { .. } => ProblemKind::UnreadableAsset,
    }
  }

  /// Bare link the problem was raised for.
  pub fn link(&self) -> &str {
    match self {
      Error::UnparsableLink { link, .. } | Error::UnreadableAsset { link, .. } => link,
    }
  }

  /// Attach the caller supplied context, replacing any previous one.
  pub fn with_additional_context(mut self, additional: Option<&str>) -> Self {
    let value = additional.filter(|text| !text.is_empty()).map(str::to_string);
    match &mut self {
      Error::UnparsableLink { context, .. } | Error::UnreadableAsset { context, .. } => {
        *context = value;
      }
    }
    self
  }
}

fn context_suffix(context: &Option<String>) -> String {
  match context {
    Some(text) => format!(" {text}"),
    None => String::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn message_ends_with_additional_context() {
    let error = Error::UnreadableAsset {
      link: "missing.css".into(),
      file: PathBuf::from("public/missing.css"),
      source: io::Error::from(io::ErrorKind::NotFound),
      context: None,
    }
    .with_additional_context(Some("while rendering index.html"));

    let message = error.to_string();
    assert!(message.contains("public/missing.css"));
    assert!(message.contains("'missing.css'"));
    assert!(message.ends_with(" while rendering index.html"));
    assert_eq!(error.kind(), ProblemKind::UnreadableAsset);
  }

  #[test]
  fn empty_context_is_not_appended() {
    let error = Error::UnparsableLink {
      link: "?page=2".into(),
      context: None,
    }
    .with_additional_context(Some(""));

    assert_eq!(error.to_string(), "can not parse URL from link '?page=2'");
    assert_eq!(error.link(), "?page=2");
  }
}
