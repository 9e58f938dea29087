use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrebundleError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("esbuild executable not found: {0}")]
    BundlerNotFound(#[from] which::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    CopyError {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read asset directory {path}: {source}")]
    DiscoveryError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to launch {program}: {source}")]
    BundlerSpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Bundling {entry} failed ({status}): {stderr}")]
    BundlerFailed {
        entry: String,
        status: String,
        stderr: String,
    },

    #[error("{failed} of {total} bundles failed: {files}")]
    BuildFailed {
        failed: usize,
        total: usize,
        files: String,
    },

    #[error("Bundle task aborted: {message}")]
    TaskError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    FileSystem,
    Bundler,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PrebundleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PrebundleError::ConfigError { .. }
            | PrebundleError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            PrebundleError::IoError(_)
            | PrebundleError::CopyError { .. }
            | PrebundleError::DiscoveryError { .. } => ErrorCategory::FileSystem,
            PrebundleError::BundlerNotFound(_)
            | PrebundleError::BundlerSpawnError { .. }
            | PrebundleError::BundlerFailed { .. }
            | PrebundleError::BuildFailed { .. } => ErrorCategory::Bundler,
            PrebundleError::TaskError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 部分檔案失敗，其他輸出仍然有效
            PrebundleError::BundlerFailed { .. } | PrebundleError::BuildFailed { .. } => {
                ErrorSeverity::Medium
            }
            PrebundleError::ConfigError { .. }
            | PrebundleError::InvalidConfigValueError { .. }
            | PrebundleError::CopyError { .. }
            | PrebundleError::DiscoveryError { .. } => ErrorSeverity::High,
            PrebundleError::IoError(_)
            | PrebundleError::BundlerNotFound(_)
            | PrebundleError::BundlerSpawnError { .. }
            | PrebundleError::TaskError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PrebundleError::BundlerNotFound(_) | PrebundleError::BundlerSpawnError { .. } => {
                "Install esbuild (npm install esbuild) or pass its location with --esbuild"
            }
            PrebundleError::BundlerFailed { .. } | PrebundleError::BuildFailed { .. } => {
                "Check the esbuild output above for syntax or import resolution errors"
            }
            PrebundleError::CopyError { .. } | PrebundleError::DiscoveryError { .. } => {
                "Make sure the asset directory exists and the content directory is writable"
            }
            PrebundleError::ConfigError { .. }
            | PrebundleError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line arguments"
            }
            PrebundleError::IoError(_) => "Check file permissions and available disk space",
            PrebundleError::TaskError { .. } => {
                "Re-run with --verbose and report the log if the problem persists"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PrebundleError::BundlerNotFound(_) => {
                "Could not find the esbuild executable".to_string()
            }
            PrebundleError::BuildFailed { failed, total, files } => {
                format!("{} of {} files could not be bundled: {}", failed, total, files)
            }
            PrebundleError::CopyError { from, to, .. } => {
                format!("Could not copy assets from {} to {}", from, to)
            }
            PrebundleError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting {}: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PrebundleError>;
