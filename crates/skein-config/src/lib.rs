#![forbid(unsafe_code)]
#![warn(
    unused,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Client configuration for skein.
//!
//! Layout: `model.rs` (typed configuration), `defaults.rs` (built-in values),
//! `loader.rs` (JSON file and override layers), `validate.rs` (field checks).

mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLayer, DaemonLayer, LoggingLayer, RefreshLayer, load_file};
pub use model::{ClientConfig, DaemonConfig, LoggingSettings, RefreshConfig};
pub use skein_telemetry::LogFormat;
