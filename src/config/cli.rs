use crate::config::toml_config::PrebundleConfig;
use crate::domain::model::OutputFormat;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "prebundle")]
#[command(about = "Copy prebuilt assets and bundle each top-level script into a minified IIFE")]
pub struct CliArgs {
    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Prebuilt asset directory (default ./build/)
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Content directory receiving the copy and the bundles (default ./Content/)
    #[arg(long)]
    pub dest: Option<PathBuf>,

    /// Global variable the IIFE assigns its exports to (default wsbundle)
    #[arg(long)]
    pub global_name: Option<String>,

    /// Output module format
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Path to the esbuild executable
    #[arg(long)]
    pub esbuild: Option<PathBuf>,

    /// Maximum number of esbuild processes running at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Write a JSON build report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Show what would be bundled without copying or bundling
    #[arg(long)]
    pub dry_run: bool,

    /// Log CPU and memory usage per phase
    #[arg(long)]
    pub monitor: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Loads `--config` (or defaults) and applies command line overrides.
    pub fn resolve_config(&self) -> Result<PrebundleConfig> {
        let mut config = match &self.config {
            Some(path) => PrebundleConfig::from_file(path)?,
            None => PrebundleConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut PrebundleConfig) {
        if let Some(source) = &self.source {
            tracing::info!("🔧 Source overridden to: {}", source.display());
            config.paths.source = source.clone();
        }
        if let Some(dest) = &self.dest {
            tracing::info!("🔧 Destination overridden to: {}", dest.display());
            config.paths.dest = dest.clone();
        }
        if let Some(name) = &self.global_name {
            config.bundle.global_name = Some(name.clone());
        }
        if let Some(format) = self.format {
            config.bundle.format = format;
        }
        if let Some(esbuild) = &self.esbuild {
            config.bundle.esbuild = Some(esbuild.clone());
        }
        if let Some(concurrency) = self.concurrency {
            config.bundle.concurrency = Some(concurrency);
        }
    }
}
