use crate::core::{BundleOptions, Bundler};
use crate::utils::error::{PrebundleError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

const ESBUILD_BINARY: &str = "esbuild";

/// Runs the esbuild CLI once per [`BundleOptions`].
#[derive(Debug, Clone)]
pub struct EsbuildBundler {
    program: PathBuf,
}

impl EsbuildBundler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolves the executable: an explicit path wins, then `PATH`, then the
    /// project-local `node_modules/.bin`.
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let resolved = which::which(path)?;
            tracing::debug!("Using configured esbuild at {}", resolved.display());
            return Ok(Self::new(resolved));
        }

        match which::which(ESBUILD_BINARY) {
            Ok(path) => {
                tracing::debug!("esbuild detected at {}", path.display());
                Ok(Self::new(path))
            }
            Err(e) => {
                let local = Path::new("node_modules").join(".bin").join(ESBUILD_BINARY);
                if local.is_file() {
                    tracing::debug!("Using project-local esbuild at {}", local.display());
                    return Ok(Self::new(local));
                }
                Err(e.into())
            }
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

/// Command line equivalent of the build options.
pub fn esbuild_args(options: &BundleOptions) -> Vec<String> {
    let mut args = vec![options.entry_point.display().to_string()];

    if options.bundle {
        args.push("--bundle".to_string());
    }
    if options.minify {
        args.push("--minify".to_string());
    }
    args.push(format!("--format={}", options.format));
    args.push(format!("--outfile={}", options.outfile.display()));
    if let Some(name) = &options.global_name {
        args.push(format!("--global-name={}", name));
    }
    if options.allow_overwrite {
        args.push("--allow-overwrite".to_string());
    }
    // CLI 預設 info 會印出檔案大小摘要
    args.push("--log-level=warning".to_string());

    args
}

#[async_trait]
impl Bundler for EsbuildBundler {
    async fn bundle(&self, options: &BundleOptions) -> Result<()> {
        let args = esbuild_args(options);
        tracing::debug!("{} {}", self.program.display(), args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| PrebundleError::BundlerSpawnError {
                program: self.program.display().to_string(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(PrebundleError::BundlerFailed {
                entry: options.entry_point.display().to_string(),
                status: output.status.to_string(),
                stderr,
            });
        }

        if !stderr.is_empty() {
            tracing::warn!("⚠️ {}: {}", options.entry_point.display(), stderr);
        }
        Ok(())
    }
}
