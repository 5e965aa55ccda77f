//! Rewriting of asset references in markup so they carry a content-derived `version`.

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::asset_links::{
  is_remote_link, merge_version, normalize_reference, parse_link, resolve_version,
  scan_references,
};
use crate::config::{InjectorConfig, ReportMode};
use crate::error::Error;

/// Adds cache-busting `version` query parameters to asset links.
///
/// The only state is the report mode chosen at construction, so one injector can be reused
/// for any number of documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetsVersionInjector {
  problem_report: ReportMode,
}

impl AssetsVersionInjector {
  /// Create an injector reporting unresolvable links according to `problem_report`.
  pub fn new(problem_report: ReportMode) -> Self {
    Self { problem_report }
  }

  /// Create an injector from a loaded configuration.
  pub fn from_config(config: &InjectorConfig) -> Self {
    Self::new(config.problem_report)
  }

  /// Report mode this injector was created with.
  pub fn problem_report(&self) -> ReportMode {
    self.problem_report
  }

  /// Append a `version` query parameter, derived from the referenced file's content, to
  /// every local asset link in `content`.
  ///
  /// Links are resolved against `assets_root`. `additional_context` is appended to problem
  /// reports and does not affect the rewrite. The content is borrowed back unchanged when
  /// there is nothing to version.
  ///
  /// # Errors
  ///
  /// Only in [`ReportMode::Exception`]: the first link that cannot be parsed or whose file
  /// cannot be read aborts the call.
  pub fn add_versions_to_asset_links<'a>(
    &self,
    content: &'a str,
    assets_root: impl AsRef<Path>,
    additional_context: Option<&str>,
  ) -> Result<Cow<'a, str>, Error> {
    let tokens = scan_references(content);
    if tokens.is_empty() {
      return Ok(Cow::Borrowed(content));
    }

    let assets_root = assets_root.as_ref();
    let mut replaced = Cow::Borrowed(content);
    let mut seen = HashSet::new();

    for token in tokens {
      if !seen.insert(token) {
        continue;
      }

      let Some(versioned_token) = self.version_token(token, assets_root, additional_context)?
      else {
        continue;
      };

      if replaced.contains(token) {
        replaced = Cow::Owned(replaced.replace(token, &versioned_token));
      }
    }

    Ok(replaced)
  }

  /// Produce the rewritten form of one reference token, or `None` when it stays as it is.
  fn version_token(
    &self,
    token: &str,
    assets_root: &Path,
    additional_context: Option<&str>,
  ) -> Result<Option<String>, Error> {
    let link = normalize_reference(token);
    if is_remote_link(link) {
      return Ok(None);
    }

    let fingerprint = match resolve_version(link, assets_root) {
      Ok(fingerprint) => fingerprint,
      Err(problem) => {
        self.report_problem(problem.with_additional_context(additional_context))?;
        return Ok(None);
      }
    };

    let versioned_link = merge_version(link, &parse_link(link), &fingerprint);
    if versioned_link == link {
      return Ok(None);
    }

    debug!(link, versioned = %versioned_link, "versioned asset link");
    Ok(Some(replace_link_in_token(token, link, &versioned_link)))
  }

  fn report_problem(&self, problem: Error) -> Result<(), Error> {
    match self.problem_report {
      ReportMode::Ignore => {
        debug!(link = problem.link(), kind = ?problem.kind(), "ignored asset link problem");
        Ok(())
      }
      ReportMode::Notice => {
        info!(link = problem.link(), kind = ?problem.kind(), "{problem}");
        Ok(())
      }
      ReportMode::Warning => {
        warn!(link = problem.link(), kind = ?problem.kind(), "{problem}");
        Ok(())
      }
      ReportMode::Exception => Err(problem),
    }
  }
}

/// Swap the bare link inside its token. The link is the last thing before the closing
/// quote or parenthesis, so the last occurrence is replaced and the wrapper is kept.
fn replace_link_in_token(token: &str, link: &str, versioned_link: &str) -> String {
  match token.rfind(link) {
    Some(start) => {
      let end = start + link.len();
      format!("{}{}{}", &token[..start], versioned_link, &token[end..])
    }
    None => token.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::asset_links::fingerprint_file;
  use crate::error::ProblemKind;
  use std::fs;
  use std::path::PathBuf;
  use tempfile::{TempDir, tempdir};

  fn assets() -> TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("css")).unwrap();
    fs::create_dir_all(dir.path().join("img")).unwrap();
    fs::create_dir_all(dir.path().join("js")).unwrap();
    fs::write(dir.path().join("css/a.css"), "body { color: red; }").unwrap();
    fs::write(dir.path().join("img/b.png"), [0x89, b'P', b'N', b'G']).unwrap();
    fs::write(dir.path().join("js/app.js"), "console.log('hi');").unwrap();
    dir
  }

  fn hash(root: &Path, relative: &str) -> String {
    fingerprint_file(&root.join(relative)).unwrap().0
  }

  fn lenient() -> AssetsVersionInjector {
    AssetsVersionInjector::new(ReportMode::Ignore)
  }

  #[test]
  fn versions_every_reference_shape() {
    let dir = assets();
    let root = dir.path();
    let html = r#"<link rel="stylesheet" href="/css/a.css">
<script src='/js/app.js'></script>
<style>.logo { background: url("img/b.png"); }</style>"#;

    let result = AssetsVersionInjector::default()
      .add_versions_to_asset_links(html, root, None)
      .unwrap();

    let css = hash(root, "css/a.css");
    let js = hash(root, "js/app.js");
    let png = hash(root, "img/b.png");
    assert_eq!(
      result,
      format!(
        r#"<link rel="stylesheet" href="/css/a.css?version={css}">
<script src='/js/app.js?version={js}'></script>
<style>.logo {{ background: url("img/b.png?version={png}"); }}</style>"#
      )
    );
  }

  #[test]
  fn content_without_references_is_borrowed_back() {
    let dir = assets();
    let text = "<p>Read /css/a.css for details.</p>";
    let result = AssetsVersionInjector::default()
      .add_versions_to_asset_links(text, dir.path(), None)
      .unwrap();
    assert!(matches!(result, Cow::Borrowed(_)));
    assert_eq!(result, text);
  }

  #[test]
  fn rewriting_twice_changes_nothing() {
    let dir = assets();
    let html = r#"<link href="/css/a.css?foo=bar"><img src="/img/b.png#frag">"#;
    let injector = AssetsVersionInjector::default();

    let once = injector
      .add_versions_to_asset_links(html, dir.path(), None)
      .unwrap()
      .into_owned();
    let twice = injector
      .add_versions_to_asset_links(&once, dir.path(), None)
      .unwrap();
    assert_eq!(twice, once);
  }

  #[test]
  fn preserves_existing_query_and_fragment() {
    let dir = assets();
    let root = dir.path();
    let html = r#"<link href="css/a.css?foo=bar"><i style="background: url(img/b.png#frag)"></i>"#;
    let result = lenient()
      .add_versions_to_asset_links(html, root, None)
      .unwrap();

    let css = hash(root, "css/a.css");
    let png = hash(root, "img/b.png");
    assert!(result.contains(&format!(r#"href="css/a.css?foo=bar&version={css}""#)));
    assert!(result.contains(&format!("url(img/b.png?version={png}#frag)")));
  }

  #[test]
  fn leaves_data_uris_navigation_and_remote_links_alone() {
    let dir = assets();
    let html = r#"<a href="/about">About</a>
<i style="background: url(data:image/png;base64,AAAA)"></i>
<script src="https://cdn.example.com/lib.js"></script>
<img src="//cdn.example.com/pixel.gif">"#;
    let result = AssetsVersionInjector::default()
      .add_versions_to_asset_links(html, dir.path(), None)
      .unwrap();
    assert_eq!(result, html);
  }

  #[test]
  fn versions_file_hrefs_but_not_pages() {
    let dir = assets();
    fs::write(dir.path().join("style.css"), "p{}").unwrap();
    let html = r#"<a href="/about">About</a><link href="/style.css">"#;
    let result = AssetsVersionInjector::default()
      .add_versions_to_asset_links(html, dir.path(), None)
      .unwrap();

    let version = hash(dir.path(), "style.css");
    assert_eq!(
      result,
      format!(r#"<a href="/about">About</a><link href="/style.css?version={version}">"#)
    );
  }

  #[test]
  fn does_not_touch_unwrapped_occurrences_of_the_link() {
    let dir = assets();
    let html = r#"<script src="/js/app.js"></script><code>/js/app.js</code>"#;
    let result = lenient()
      .add_versions_to_asset_links(html, dir.path(), None)
      .unwrap();

    let js = hash(dir.path(), "js/app.js");
    assert_eq!(
      result,
      format!(r#"<script src="/js/app.js?version={js}"></script><code>/js/app.js</code>"#)
    );
  }

  #[test]
  fn rewrites_every_occurrence_of_a_repeated_token() {
    let dir = assets();
    let html = r#"<img src="/img/b.png"><img src="/img/b.png">"#;
    let result = lenient()
      .add_versions_to_asset_links(html, dir.path(), None)
      .unwrap();

    let png = hash(dir.path(), "img/b.png");
    let expected = format!(r#"<img src="/img/b.png?version={png}">"#);
    assert_eq!(result, expected.repeat(2));
  }

  #[test]
  fn link_that_is_a_substring_of_its_wrapper_keeps_the_wrapper() {
    let dir = assets();
    fs::write(dir.path().join("c"), "x").unwrap();
    let html = r#"<img src="c">"#;
    let result = lenient()
      .add_versions_to_asset_links(html, dir.path(), None)
      .unwrap();

    let version = hash(dir.path(), "c");
    assert_eq!(result, format!(r#"<img src="c?version={version}">"#));
  }

  #[test]
  fn replaces_stale_version() {
    let dir = assets();
    let html = r#"<link href="/css/a.css?version=stale&foo=bar">"#;
    let result = lenient()
      .add_versions_to_asset_links(html, dir.path(), None)
      .unwrap();

    let css = hash(dir.path(), "css/a.css");
    assert_eq!(
      result,
      format!(r#"<link href="/css/a.css?version={css}&foo=bar">"#)
    );
  }

  #[test]
  fn version_follows_file_contents() {
    let dir = assets();
    let html = r#"<script src="/js/app.js"></script>"#;
    let injector = lenient();

    let first = injector
      .add_versions_to_asset_links(html, dir.path(), None)
      .unwrap()
      .into_owned();
    let again = injector
      .add_versions_to_asset_links(html, dir.path(), None)
      .unwrap();
    assert_eq!(again, first);

    fs::write(dir.path().join("js/app.js"), "console.log('hi!');").unwrap();
    let changed = injector
      .add_versions_to_asset_links(html, dir.path(), None)
      .unwrap();
    assert_ne!(changed, first);
  }

  #[test]
  fn missing_asset_fails_by_default_with_link_and_context() {
    let dir = tempdir().unwrap();
    let html = r#"<link type="text/css" href="missing_stylesheet_7f3a.css">"#;
    let error = AssetsVersionInjector::default()
      .add_versions_to_asset_links(html, dir.path(), Some("rendering blog/index.html"))
      .unwrap_err();

    assert_eq!(error.kind(), ProblemKind::UnreadableAsset);
    let message = error.to_string();
    assert!(message.contains("missing_stylesheet_7f3a.css"));
    assert!(message.ends_with(" rendering blog/index.html"));
    let attempted: PathBuf = dir.path().join("missing_stylesheet_7f3a.css");
    assert!(message.contains(&attempted.display().to_string()));
  }

  #[test]
  fn lenient_modes_skip_missing_assets_and_keep_going() {
    let dir = assets();
    let html = r#"<link href="/css/missing.css"><script src="/js/app.js"></script>"#;
    let js = hash(dir.path(), "js/app.js");
    let expected =
      format!(r#"<link href="/css/missing.css"><script src="/js/app.js?version={js}"></script>"#);

    for mode in [ReportMode::Ignore, ReportMode::Notice, ReportMode::Warning] {
      let result = AssetsVersionInjector::new(mode)
        .add_versions_to_asset_links(html, dir.path(), Some("ctx"))
        .unwrap();
      assert_eq!(result, expected, "mode {mode}");
    }
  }

  #[cfg(unix)]
  #[test]
  fn named_pipe_asset_is_skipped_in_lenient_mode() {
    let dir = assets();
    let status = std::process::Command::new("mkfifo")
      .arg(dir.path().join("pipe.css"))
      .status()
      .unwrap();
    assert!(status.success());

    let html = r#"<link href="/pipe.css">"#;
    let result = AssetsVersionInjector::new(ReportMode::Warning)
      .add_versions_to_asset_links(html, dir.path(), None)
      .unwrap();
    assert_eq!(result, html);
  }

  #[test]
  fn same_document_url_reference_is_unparsable() {
    let dir = assets();
    let svg = r#"<rect fill="url(#grad)"/>"#;
    let error = AssetsVersionInjector::default()
      .add_versions_to_asset_links(svg, dir.path(), None)
      .unwrap_err();
    assert_eq!(error.kind(), ProblemKind::UnparsableLink);

    let result = lenient()
      .add_versions_to_asset_links(svg, dir.path(), None)
      .unwrap();
    assert_eq!(result, svg);
  }

  #[test]
  fn unparsable_link_is_reported() {
    let dir = assets();
    let html = r#"<img src="?size=2">"#;
    let error = AssetsVersionInjector::default()
      .add_versions_to_asset_links(html, dir.path(), None)
      .unwrap_err();
    assert_eq!(error.kind(), ProblemKind::UnparsableLink);

    let result = lenient()
      .add_versions_to_asset_links(html, dir.path(), None)
      .unwrap();
    assert_eq!(result, html);
  }

  #[test]
  fn builds_from_config() {
    let config = InjectorConfig {
      problem_report: ReportMode::Notice,
    };
    let injector = AssetsVersionInjector::from_config(&config);
    assert_eq!(injector.problem_report(), ReportMode::Notice);
  }
}
