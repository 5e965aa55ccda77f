#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_links;
pub mod config;
pub mod error;
pub mod injector;
pub mod models;
pub mod site;

pub use config::{InjectorConfig, ReportMode, UnknownReportMode};
pub use error::{Error, ProblemKind};
pub use injector::AssetsVersionInjector;
pub use models::{Fingerprint, ParsedLink, VERSION_KEY};
