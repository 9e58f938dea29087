use crate::utils::error::{PrebundleError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Iife,
    Esm,
    Cjs,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Iife => "iife",
            OutputFormat::Esm => "esm",
            OutputFormat::Cjs => "cjs",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iife" => Ok(OutputFormat::Iife),
            "esm" => Ok(OutputFormat::Esm),
            "cjs" => Ok(OutputFormat::Cjs),
            other => Err(format!("unknown output format '{}' (expected iife, esm or cjs)", other)),
        }
    }
}

/// One bundler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOptions {
    pub entry_point: PathBuf,
    pub outfile: PathBuf,
    pub bundle: bool,
    pub minify: bool,
    pub format: OutputFormat,
    pub global_name: Option<String>,
    pub allow_overwrite: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleOutcome {
    pub file: String,
    pub outfile: PathBuf,
    pub success: bool,
    pub elapsed_ms: u64,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    pub started_at: DateTime<Utc>,
    pub source: PathBuf,
    pub dest: PathBuf,
    pub copied_files: usize,
    pub outcomes: Vec<BundleOutcome>,
}

impl BuildReport {
    pub fn new(source: PathBuf, dest: PathBuf) -> Self {
        Self {
            started_at: Utc::now(),
            source,
            dest,
            copied_files: 0,
            outcomes: Vec::new(),
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &BundleOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }

    pub fn bundled_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    /// Fails with [`PrebundleError::BuildFailed`] if any bundle failed.
    pub fn into_result(self) -> Result<Self> {
        let failed: Vec<&str> = self.failures().map(|o| o.file.as_str()).collect();
        if failed.is_empty() {
            return Ok(self);
        }

        Err(PrebundleError::BuildFailed {
            failed: failed.len(),
            total: self.outcomes.len(),
            files: failed.join(", "),
        })
    }
}
