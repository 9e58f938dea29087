use crate::core::assets::is_within;
use crate::core::ConfigProvider;
use crate::domain::model::OutputFormat;
use crate::utils::error::{PrebundleError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE_DIR: &str = "./build/";
pub const DEFAULT_DEST_DIR: &str = "./Content/";
pub const DEFAULT_GLOBAL_NAME: &str = "wsbundle";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrebundleConfig {
    pub paths: PathsConfig,
    pub bundle: BundleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub source: PathBuf,
    pub dest: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE_DIR),
            dest: PathBuf::from(DEFAULT_DEST_DIR),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    pub extension: String,
    pub bundle: bool,
    pub minify: bool,
    pub format: OutputFormat,
    pub global_name: Option<String>,
    pub allow_overwrite: bool,
    pub concurrency: Option<usize>,
    pub esbuild: Option<PathBuf>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            extension: "js".to_string(),
            bundle: true,
            minify: true,
            format: OutputFormat::Iife,
            global_name: Some(DEFAULT_GLOBAL_NAME.to_string()),
            allow_overwrite: true,
            concurrency: None,
            esbuild: None,
        }
    }
}

impl PrebundleConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PrebundleError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ASSET_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PrebundleError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        let source = self.paths.source.to_string_lossy();
        let dest = self.paths.dest.to_string_lossy();
        validation::validate_path("paths.source", &source)?;
        validation::validate_path("paths.dest", &dest)?;

        if is_within(&self.paths.source, &self.paths.dest) {
            return Err(PrebundleError::InvalidConfigValueError {
                field: "paths.dest".to_string(),
                value: dest.to_string(),
                reason: "Destination cannot be the source directory or inside it".to_string(),
            });
        }

        validation::validate_extension("bundle.extension", &self.bundle.extension)?;

        if let Some(name) = &self.bundle.global_name {
            validation::validate_js_identifier("bundle.global_name", name)?;
        }

        if let Some(concurrency) = self.bundle.concurrency {
            validation::validate_positive_number("bundle.concurrency", concurrency, 1)?;
        }

        if let Some(esbuild) = &self.bundle.esbuild {
            validation::validate_path("bundle.esbuild", &esbuild.to_string_lossy())?;
        }

        Ok(())
    }
}

impl ConfigProvider for PrebundleConfig {
    fn source_dir(&self) -> &Path {
        &self.paths.source
    }

    fn dest_dir(&self) -> &Path {
        &self.paths.dest
    }

    fn extension(&self) -> &str {
        &self.bundle.extension
    }

    fn bundle(&self) -> bool {
        self.bundle.bundle
    }

    fn minify(&self) -> bool {
        self.bundle.minify
    }

    fn format(&self) -> OutputFormat {
        self.bundle.format
    }

    fn global_name(&self) -> Option<&str> {
        self.bundle.global_name.as_deref()
    }

    fn allow_overwrite(&self) -> bool {
        self.bundle.allow_overwrite
    }

    fn concurrency(&self) -> Option<usize> {
        self.bundle.concurrency
    }
}

impl Validate for PrebundleConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_build_step() {
        let config = PrebundleConfig::default();

        assert_eq!(config.source_dir(), Path::new("./build/"));
        assert_eq!(config.dest_dir(), Path::new("./Content/"));

        let options = config.bundle_options("app.js");
        assert_eq!(options.entry_point, Path::new("./build/app.js"));
        assert_eq!(options.outfile, Path::new("./Content/app.js"));
        assert!(options.bundle);
        assert!(options.minify);
        assert_eq!(options.format, OutputFormat::Iife);
        assert_eq!(options.global_name.as_deref(), Some("wsbundle"));
        assert!(options.allow_overwrite);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[paths]
source = "dist/prebundle"

[bundle]
format = "esm"
concurrency = 4
"#;

        let config = PrebundleConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.paths.source, PathBuf::from("dist/prebundle"));
        assert_eq!(config.paths.dest, PathBuf::from(DEFAULT_DEST_DIR));
        assert_eq!(config.bundle.format, OutputFormat::Esm);
        assert_eq!(config.concurrency(), Some(4));
        assert!(config.bundle.minify);
        assert_eq!(config.extension(), "js");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PREBUNDLE_TEST_OUT", "wwwroot/Content");

        let toml_content = r#"
[paths]
dest = "${PREBUNDLE_TEST_OUT}"
source = "${PREBUNDLE_TEST_UNSET_VAR}"
"#;

        let config = PrebundleConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.paths.dest, PathBuf::from("wwwroot/Content"));
        assert_eq!(
            config.paths.source,
            PathBuf::from("${PREBUNDLE_TEST_UNSET_VAR}")
        );

        std::env::remove_var("PREBUNDLE_TEST_OUT");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = PrebundleConfig::from_toml_str("[bundle]\nformat = \"umd\"\n").unwrap_err();
        assert!(matches!(err, PrebundleError::ConfigError { .. }));
    }

    #[test]
    fn test_config_validation() {
        let mut config = PrebundleConfig::default();
        config.paths.dest = PathBuf::from("build");
        assert!(config.validate().is_err());

        let mut config = PrebundleConfig::default();
        config.bundle.global_name = Some("ws-bundle".to_string());
        assert!(config.validate().is_err());

        let mut config = PrebundleConfig::default();
        config.bundle.concurrency = Some(0);
        assert!(config.validate().is_err());

        let mut config = PrebundleConfig::default();
        config.bundle.global_name = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dest_inside_source_is_rejected() {
        let temp = tempfile::TempDir::new().unwrap();
        let source = temp.path().join("build");
        std::fs::create_dir_all(&source).unwrap();

        let mut config = PrebundleConfig::default();
        config.paths.source = source.clone();
        config.paths.dest = source.join("Content");

        match config.validate() {
            Err(PrebundleError::InvalidConfigValueError { field, .. }) => {
                assert_eq!(field, "paths.dest");
            }
            other => panic!("expected InvalidConfigValueError, got {:?}", other),
        }
        assert!(!source.join("Content").exists());

        config.paths.dest = temp.path().join("build-content");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[bundle]\nglobal_name = \"charts\"\nminify = false\n")
            .unwrap();

        let config = PrebundleConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.global_name(), Some("charts"));
        assert!(!config.minify());
    }
}
