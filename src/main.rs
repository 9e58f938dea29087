use anyhow::Context;
use clap::Parser;
use prebundle::core::ConfigProvider;
use prebundle::utils::error::ErrorSeverity;
use prebundle::utils::{logger, validation::Validate};
use prebundle::{BuildReport, CliArgs, EsbuildBundler, PrebundleConfig, PrebundleEngine};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting prebundle");
    tracing::debug!("CLI args: {:?}", args);

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be copied or bundled");
        return perform_dry_run(&config);
    }

    let bundler = match EsbuildBundler::locate(config.bundle.esbuild.as_deref()) {
        Ok(bundler) => bundler,
        Err(e) => exit_with(&e),
    };
    tracing::info!("🔧 Using esbuild at {}", bundler.program().display());

    let engine = PrebundleEngine::new_with_monitoring(bundler, config, args.monitor);

    let report = match engine.run().await {
        Ok(report) => report,
        Err(e) => exit_with(&e),
    };

    if let Some(path) = &args.report {
        write_report(&report, path)?;
        tracing::info!("📝 Report written to {}", path.display());
    }

    match report.into_result() {
        Ok(report) => {
            tracing::info!(
                "✅ Bundled {} files into {}",
                report.bundled_count(),
                report.dest.display()
            );
            Ok(())
        }
        Err(e) => exit_with(&e),
    }
}

fn display_config_summary(config: &PrebundleConfig) {
    tracing::info!("📋 Source: {}", config.source_dir().display());
    tracing::info!("📋 Destination: {}", config.dest_dir().display());
    tracing::info!(
        "📋 Format: {}, minify: {}, global name: {}",
        config.format(),
        config.minify(),
        config.global_name().unwrap_or("-")
    );
    match config.concurrency() {
        Some(n) => tracing::info!("📋 Concurrency: {}", n),
        None => tracing::info!("📋 Concurrency: unbounded"),
    }
}

fn perform_dry_run(config: &PrebundleConfig) -> anyhow::Result<()> {
    let source = config.source_dir().display().to_string();
    let plan = prebundle::core::engine::plan(config)
        .with_context(|| format!("listing entries in {}", source))?;

    if plan.is_empty() {
        println!("No entries found in {}", source);
    }
    for options in &plan {
        println!(
            "{} -> {}",
            options.entry_point.display(),
            options.outfile.display()
        );
    }
    tracing::info!("🔍 {} files would be bundled", plan.len());
    Ok(())
}

fn write_report(report: &BuildReport, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("serializing build report")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn exit_with(e: &prebundle::PrebundleError) -> ! {
    tracing::error!(
        "❌ prebundle failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
