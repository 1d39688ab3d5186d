//! Subcommand implementations

use anyhow::{Context, Result};
use std::io::Read;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use veracity_classifiers::{Detection, FakeNewsDetector};
use veracity_core::Error;

use crate::config::AppConfig;
use crate::routes::create_router;
use crate::state::AppState;
use crate::telemetry::init_metrics;

/// Exit status when the input was blank and nothing was classified
pub const EXIT_NO_PREDICTION: i32 = 2;

/// Message shown instead of a label for blank input
pub const NO_PREDICTION: &str = "no prediction performed";

/// Where `classify` reads its text from
#[derive(Debug, Clone)]
pub enum TextSource {
    Inline(String),
    File(std::path::PathBuf),
    Stdin,
}

impl TextSource {
    pub fn from_args(text: Option<String>, file: Option<std::path::PathBuf>) -> Self {
        match (text, file) {
            (Some(text), _) => Self::Inline(text),
            (None, Some(path)) => Self::File(path),
            (None, None) => Self::Stdin,
        }
    }

    pub fn read(self) -> Result<String> {
        match self {
            Self::Inline(text) => Ok(text),
            Self::File(path) => std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display())),
            Self::Stdin => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("reading stdin")?;
                Ok(text)
            }
        }
    }
}

/// Load the detector, failing with context on any artifact problem
pub fn load_detector(config: &AppConfig) -> Result<FakeNewsDetector> {
    FakeNewsDetector::from_artifacts(&config.artifacts).context("loading model artifacts")
}

/// Render a detection for the terminal
pub fn render_detection(detection: &Detection, as_json: bool) -> Result<String> {
    if as_json {
        return Ok(serde_json::to_string_pretty(detection)?);
    }

    let decision = &detection.decision;
    Ok(format!(
        "Label: {}\nREAL: {:.2}%\nFAKE: {:.2}%",
        decision.label(),
        decision.real_percent(),
        decision.fake_percent()
    ))
}

/// `veracity classify`: returns the process exit status
pub fn run_classify(config: &AppConfig, source: TextSource, as_json: bool) -> Result<i32> {
    let detector = load_detector(config)?;
    let text = source.read()?;

    match detector.detect(&text) {
        Ok(detection) => {
            println!("{}", render_detection(&detection, as_json)?);
            Ok(0)
        }
        Err(Error::EmptyInput) => {
            if as_json {
                println!("{}", serde_json::json!({ "error": NO_PREDICTION }));
            } else {
                eprintln!("{}", NO_PREDICTION);
            }
            Ok(EXIT_NO_PREDICTION)
        }
        Err(e) => Err(anyhow::Error::new(e).context("classification failed")),
    }
}

/// `veracity check`: load every artifact and summarize
pub fn run_check(config: &AppConfig) -> Result<()> {
    let detector = load_detector(config)?;

    println!("Artifacts OK");
    println!("  Model:       {}", detector.classifier_name());
    println!("  Vocabulary:  {} tokens", detector.vocabulary().len());
    println!("  OOV id:      {}", detector.vocabulary().oov_id());
    println!("  Max length:  {}", detector.max_length());
    Ok(())
}

/// `veracity serve`: run the HTTP service until a shutdown signal
pub async fn run_serve(config: AppConfig) -> Result<()> {
    let metrics_handle = init_metrics()?;

    let artifacts = config.artifacts.clone();
    let detector = tokio::task::spawn_blocking(move || FakeNewsDetector::from_artifacts(&artifacts))
        .await
        .context("artifact loading task failed")?
        .context("loading model artifacts")?;

    let state = AppState::new(Arc::new(detector), metrics_handle);
    let app = create_router(state, &config.server);

    let addr: SocketAddr = format!("{}:{}", config.server.listen, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                config.server.listen, config.server.port
            )
        })?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Veracity listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Describe where configuration came from
pub fn describe_config_source(path: &Path) -> String {
    if path.exists() {
        format!("config file {}", path.display())
    } else {
        "built-in defaults".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use veracity_classifiers::{
        SequenceClassifier, SequenceNormalizer, TokenizationPolicy, WordIndexVocabulary,
    };

    struct FixedScore(f32);

    impl SequenceClassifier for FixedScore {
        fn score(&self, _ids: &[u32]) -> veracity_core::Result<f32> {
            Ok(self.0)
        }

        fn input_length(&self) -> Option<usize> {
            None
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn detection(score: f32) -> Detection {
        let word_index: HashMap<String, u32> =
            [("<OOV>".to_string(), 1), ("stocks".to_string(), 2)].into_iter().collect();
        let detector = FakeNewsDetector::new(
            Arc::new(
                WordIndexVocabulary::new(word_index, "<OOV>", TokenizationPolicy::default())
                    .unwrap(),
            ),
            SequenceNormalizer::new(4).unwrap(),
            Arc::new(FixedScore(score)),
        )
        .unwrap();
        detector.detect("stocks").unwrap()
    }

    #[test]
    fn test_render_text() {
        let rendered = render_detection(&detection(0.82), false).unwrap();
        assert_eq!(rendered, "Label: REAL\nREAL: 82.00%\nFAKE: 18.00%");
    }

    #[test]
    fn test_render_json() {
        let rendered = render_detection(&detection(0.25), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["label"], "FAKE");
        assert_eq!(value["real_confidence"], 25.0);
        assert_eq!(value["fake_confidence"], 75.0);
        assert_eq!(value["token_count"], 1);
    }

    #[test]
    fn test_text_source_precedence() {
        assert!(matches!(
            TextSource::from_args(Some("a".into()), Some("b.txt".into())),
            TextSource::Inline(_)
        ));
        assert!(matches!(
            TextSource::from_args(None, Some("b.txt".into())),
            TextSource::File(_)
        ));
        assert!(matches!(TextSource::from_args(None, None), TextSource::Stdin));
    }

    #[test]
    fn test_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("article.txt");
        std::fs::write(&path, "Stocks rally").unwrap();
        assert_eq!(TextSource::File(path).read().unwrap(), "Stocks rally");
    }

    #[test]
    fn test_missing_artifacts_fail_classify() {
        let mut config = AppConfig::default();
        config.artifacts = veracity_classifiers::ArtifactConfig::from_local("/nonexistent/models");
        assert!(run_classify(&config, TextSource::Inline("text".into()), false).is_err());
    }
}
