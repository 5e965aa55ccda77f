//! Helpers for finding, resolving and versioning asset links.
//!
//! The responsibilities are split into focused submodules so that scanning, unwrapping,
//! filtering, hashing and query merging can be tested independently. The injector wires
//! them together.

mod filters;
mod fingerprint;
mod normalize;
mod query;
mod scanner;

pub use filters::{is_data_uri, is_remote_link, looks_like_file_link};
pub use fingerprint::{asset_file_path, fingerprint_file, resolve_version};
pub use normalize::normalize_reference;
pub use query::{merge_version, parse_link};
pub use scanner::{
  scan_href_references, scan_references, scan_src_references, scan_url_references,
};
