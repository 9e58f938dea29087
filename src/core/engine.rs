use crate::core::assets::{copy_dir_recursive, discover_entries};
use crate::core::{BuildReport, BundleOptions, BundleOutcome, Bundler, ConfigProvider};
use crate::utils::error::{PrebundleError, Result};
use crate::utils::monitor::BuildMonitor;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Bundler invocations a run would issue. Touches nothing on disk.
pub fn plan<C: ConfigProvider>(config: &C) -> Result<Vec<BundleOptions>> {
    let entries = discover_entries(config.source_dir(), config.extension())?;
    Ok(entries
        .iter()
        .map(|file| config.bundle_options(file))
        .collect())
}

pub struct PrebundleEngine<B: Bundler + 'static, C: ConfigProvider> {
    bundler: Arc<B>,
    config: C,
    monitor: BuildMonitor,
}

impl<B: Bundler + 'static, C: ConfigProvider> PrebundleEngine<B, C> {
    pub fn new(bundler: B, config: C) -> Self {
        Self::new_with_monitoring(bundler, config, false)
    }

    pub fn new_with_monitoring(bundler: B, config: C, monitor_enabled: bool) -> Self {
        Self {
            bundler: Arc::new(bundler),
            config,
            monitor: BuildMonitor::new(monitor_enabled),
        }
    }

    /// Copies the asset directory, then bundles every entry concurrently.
    ///
    /// Copy and discovery failures abort the run. Bundle failures are
    /// recorded in the report; use [`BuildReport::into_result`] to turn them
    /// into an error.
    pub async fn run(&self) -> Result<BuildReport> {
        let source = self.config.source_dir();
        let dest = self.config.dest_dir();
        let mut report = BuildReport::new(source.to_path_buf(), dest.to_path_buf());

        tracing::info!("📂 Copying {} -> {}", source.display(), dest.display());
        report.copied_files = copy_dir_recursive(source, dest)?;
        tracing::info!("Copied {} files", report.copied_files);
        self.monitor.log_phase("copy");

        let entries = discover_entries(source, self.config.extension())?;
        tracing::debug!("Found {} entries: {:?}", entries.len(), entries);

        report.outcomes = self.bundle_all(entries).await?;
        self.monitor.log_phase("bundle");

        tracing::info!(
            "Bundled {}/{} files",
            report.bundled_count(),
            report.outcomes.len()
        );

        Ok(report)
    }

    async fn bundle_all(&self, entries: Vec<String>) -> Result<Vec<BundleOutcome>> {
        let limiter = self.config.concurrency().map(|n| Arc::new(Semaphore::new(n)));
        let mut tasks = JoinSet::new();

        for file in entries {
            let options = self.config.bundle_options(&file);
            let bundler = Arc::clone(&self.bundler);
            let limiter = limiter.clone();

            tasks.spawn(async move {
                let _permit = match &limiter {
                    Some(semaphore) => Arc::clone(semaphore).acquire_owned().await.ok(),
                    None => None,
                };

                tracing::info!("📦 Bundling: {}", file);
                let started = Instant::now();
                let result = bundler.bundle(&options).await;
                let elapsed_ms = started.elapsed().as_millis() as u64;

                if let Err(e) = &result {
                    tracing::error!("❌ {}: {}", file, e);
                }

                BundleOutcome {
                    file,
                    outfile: options.outfile,
                    success: result.is_ok(),
                    elapsed_ms,
                    error: result.err().map(|e| e.to_string()),
                }
            });
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|e| PrebundleError::TaskError {
                message: e.to_string(),
            })?;
            outcomes.push(outcome);
        }

        outcomes.sort_by(|a, b| a.file.cmp(&b.file));
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrebundleConfig;
    use async_trait::async_trait;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Writes a marker file instead of running esbuild.
    #[derive(Default)]
    struct FakeBundler {
        calls: Mutex<Vec<BundleOptions>>,
        fail_on: Option<&'static str>,
        running: AtomicUsize,
        max_running: AtomicUsize,
    }

    #[async_trait]
    impl Bundler for FakeBundler {
        async fn bundle(&self, options: &BundleOptions) -> Result<()> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_running.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.running.fetch_sub(1, Ordering::SeqCst);

            self.calls.lock().unwrap().push(options.clone());

            let name = options.entry_point.file_name().unwrap().to_string_lossy();
            if Some(name.as_ref()) == self.fail_on {
                return Err(PrebundleError::BundlerFailed {
                    entry: name.to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: "Could not resolve".to_string(),
                });
            }

            fs::write(&options.outfile, format!("bundled:{}", name))?;
            Ok(())
        }
    }

    fn setup(files: &[&str]) -> (TempDir, PrebundleConfig) {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("build");
        fs::create_dir_all(&source).unwrap();
        for file in files {
            fs::write(source.join(file), "raw").unwrap();
        }

        let mut config = PrebundleConfig::default();
        config.paths.source = source;
        config.paths.dest = temp.path().join("Content");
        (temp, config)
    }

    #[tokio::test]
    async fn test_run_copies_then_overwrites_with_bundles() {
        let (_temp, config) = setup(&["app.js", "charts.js", "site.css"]);
        let dest = config.paths.dest.clone();
        let engine = PrebundleEngine::new(FakeBundler::default(), config);

        let report = engine.run().await.unwrap().into_result().unwrap();

        assert_eq!(report.copied_files, 3);
        assert_eq!(report.bundled_count(), 2);
        assert_eq!(fs::read_to_string(dest.join("app.js")).unwrap(), "bundled:app.js");
        assert_eq!(fs::read_to_string(dest.join("charts.js")).unwrap(), "bundled:charts.js");
        assert_eq!(fs::read_to_string(dest.join("site.css")).unwrap(), "raw");

        let calls = engine.bundler.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.global_name.as_deref() == Some("wsbundle")));
    }

    #[tokio::test]
    async fn test_one_failure_does_not_stop_others() {
        let (_temp, config) = setup(&["a.js", "b.js", "c.js"]);
        let dest = config.paths.dest.clone();
        let bundler = FakeBundler {
            fail_on: Some("b.js"),
            ..Default::default()
        };
        let engine = PrebundleEngine::new(bundler, config);

        let report = engine.run().await.unwrap();

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.bundled_count(), 2);
        assert_eq!(fs::read_to_string(dest.join("c.js")).unwrap(), "bundled:c.js");
        // 失敗的檔案保留複製過去的原始內容
        assert_eq!(fs::read_to_string(dest.join("b.js")).unwrap(), "raw");

        match report.into_result() {
            Err(PrebundleError::BuildFailed { failed, total, files }) => {
                assert_eq!(failed, 1);
                assert_eq!(total, 3);
                assert_eq!(files, "b.js");
            }
            other => panic!("expected BuildFailed, got {:?}", other.map(|r| r.outcomes)),
        }
    }

    #[tokio::test]
    async fn test_concurrency_limit_is_respected() {
        let (_temp, mut config) = setup(&["1.js", "2.js", "3.js", "4.js", "5.js"]);
        config.bundle.concurrency = Some(2);
        let engine = PrebundleEngine::new(FakeBundler::default(), config);

        engine.run().await.unwrap();

        let max = engine.bundler.max_running.load(Ordering::SeqCst);
        assert!(max <= 2, "saw {} concurrent bundles", max);
    }

    #[tokio::test]
    async fn test_unbounded_runs_all_at_once() {
        let (_temp, config) = setup(&["1.js", "2.js", "3.js", "4.js"]);
        let engine = PrebundleEngine::new(FakeBundler::default(), config);

        engine.run().await.unwrap();

        assert_eq!(engine.bundler.max_running.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_missing_source_aborts_before_bundling() {
        let temp = TempDir::new().unwrap();
        let mut config = PrebundleConfig::default();
        config.paths.source = temp.path().join("missing");
        config.paths.dest = temp.path().join("Content");
        let engine = PrebundleEngine::new(FakeBundler::default(), config);

        let err = engine.run().await.unwrap_err();

        assert!(matches!(err, PrebundleError::CopyError { .. }));
        assert!(engine.bundler.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_source_succeeds() {
        let (_temp, config) = setup(&[]);
        let engine = PrebundleEngine::new(FakeBundler::default(), config);

        let report = engine.run().await.unwrap();
        assert!(report.outcomes.is_empty());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_plan_does_not_touch_destination() {
        let (_temp, config) = setup(&["b.js", "a.js"]);
        let dest = config.paths.dest.clone();
        let plan = plan(&config).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].outfile, dest.join("a.js"));
        assert!(!dest.exists());
    }
}
