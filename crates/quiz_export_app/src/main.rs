mod cli;
mod logging;
mod progress;
mod settings;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use quiz_export_core::{Phase, ReviewTarget};
use quiz_export_engine::{ensure_output_dir, ExportEngine, ExportSettings, SessionCredentials};
use quiz_logging::{quiz_error, quiz_info};
use url::Url;

use crate::cli::Cli;
use crate::progress::LogProgressSink;
use crate::settings::SettingsFile;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log);

    if let Err(err) = run(cli) {
        quiz_error!("{err:#}");
        return Err(err);
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let target = ReviewTarget::from_review_url(&cli.review_url, cli.title.clone())
        .context("cannot start the export")?;
    let settings = resolve_settings(&cli)?;
    ensure_output_dir(&settings.output_dir)?;

    let credentials = match cli.cookie.as_deref() {
        Some(cookie) if !cookie.trim().is_empty() => {
            let site = Url::parse(target.origin()).context("review origin is not a valid URL")?;
            Some(SessionCredentials::new(&site, cookie.trim()))
        }
        _ => {
            quiz_info!("No session cookie supplied; requests are sent unauthenticated");
            None
        }
    };

    let engine = ExportEngine::new(settings, credentials).with_progress_sink(Arc::new(LogProgressSink));
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    let summary = runtime.block_on(engine.run(&target))?;

    let outcome = match &summary.phase {
        Phase::Aborted { reason } => format!("stopped early ({reason})"),
        _ => "complete".to_string(),
    };
    println!(
        "Export {outcome}: {} unique of {} questions from {} pages written to {}",
        summary.unique_records,
        summary.total_records,
        summary.pages_fetched,
        summary.output_path.display()
    );
    Ok(())
}

/// Settings file values, then command-line overrides.
fn resolve_settings(cli: &Cli) -> anyhow::Result<ExportSettings> {
    let file = match &cli.config {
        Some(path) => SettingsFile::load(path)?,
        None => SettingsFile::default(),
    };
    let mut settings = file.into_export_settings();
    if let Some(dir) = &cli.output_dir {
        settings.output_dir = dir.clone();
    }
    if cli.no_images {
        settings.embed_images = false;
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["quiz-export", "https://lms.example/mod/quiz/review.php?attempt=1&cmid=2"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn command_line_overrides_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("quiz.ron");
        fs::write(&config, r#"(output_dir: "from_file", embed_images: true, throttle_base_ms: 10)"#)
            .unwrap();
        let config_arg = config.to_string_lossy().into_owned();

        let cli = parse(&["--config", &config_arg, "--output-dir", "from_cli", "--no-images"]);
        let settings = resolve_settings(&cli).unwrap();

        assert_eq!(settings.output_dir, PathBuf::from("from_cli"));
        assert!(!settings.embed_images);
        assert_eq!(settings.throttle.base.as_millis(), 10);
    }

    #[test]
    fn settings_file_applies_without_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("quiz.ron");
        fs::write(&config, r#"(output_dir: "from_file")"#).unwrap();
        let config_arg = config.to_string_lossy().into_owned();

        let settings = resolve_settings(&parse(&["--config", &config_arg])).unwrap();

        assert_eq!(settings.output_dir, PathBuf::from("from_file"));
        assert!(settings.embed_images);
    }

    #[test]
    fn missing_parameter_fails_before_any_request() {
        let cli = Cli::try_parse_from([
            "quiz-export",
            "https://lms.example/mod/quiz/review.php?attempt=1",
        ])
        .unwrap();
        let err = run(cli).unwrap_err();
        assert!(format!("{err:#}").contains("cmid"));
    }
}
