pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::PrebundleConfig;

pub use adapters::esbuild::EsbuildBundler;
pub use core::engine::PrebundleEngine;
pub use domain::model::{BuildReport, BundleOptions, BundleOutcome, OutputFormat};
pub use utils::error::{PrebundleError, Result};
