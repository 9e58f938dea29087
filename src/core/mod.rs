pub mod assets;
pub mod engine;

pub use crate::domain::model::{BuildReport, BundleOptions, BundleOutcome, OutputFormat};
pub use crate::domain::ports::{Bundler, ConfigProvider};
pub use crate::utils::error::Result;
