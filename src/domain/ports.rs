use crate::domain::model::{BundleOptions, OutputFormat};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait ConfigProvider: Send + Sync {
    fn source_dir(&self) -> &Path;
    fn dest_dir(&self) -> &Path;
    fn extension(&self) -> &str;
    fn bundle(&self) -> bool;
    fn minify(&self) -> bool;
    fn format(&self) -> OutputFormat;
    fn global_name(&self) -> Option<&str>;
    fn allow_overwrite(&self) -> bool;
    /// `None` means every bundle runs at once.
    fn concurrency(&self) -> Option<usize>;

    /// Options for bundling `<source>/<file>` into `<dest>/<file>`.
    fn bundle_options(&self, file: &str) -> BundleOptions {
        BundleOptions {
            entry_point: self.source_dir().join(file),
            outfile: self.dest_dir().join(file),
            bundle: self.bundle(),
            minify: self.minify(),
            format: self.format(),
            global_name: self.global_name().map(str::to_string),
            allow_overwrite: self.allow_overwrite(),
        }
    }
}

#[async_trait]
pub trait Bundler: Send + Sync {
    async fn bundle(&self, options: &BundleOptions) -> Result<()>;
}
