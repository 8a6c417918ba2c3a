//! Headless run of the surface: load the model, analyze one text, report.

use crate::config::SurfaceConfig;
use crate::models::{AnalyzeOutcome, SurfaceSnapshot};
use crate::state::SurfaceAppState;
use sentiment_classifiers::ModelBackend;
use sentiment_core::LoadState;
use std::sync::Arc;

/// Outcome of a one-shot analysis
#[derive(Debug)]
pub struct AnalysisReport {
    pub outcome: AnalyzeOutcome,
    pub snapshot: SurfaceSnapshot,
}

impl AnalysisReport {
    /// Score line and glyph run, as the page shows them
    pub fn render(&self) -> String {
        match (&self.snapshot.display, &self.snapshot.visualization) {
            (Some(display), Some(viz)) => format!("Score: {}\n{}", display, viz),
            (Some(display), None) => format!("Score: {}", display),
            _ => String::new(),
        }
    }
}

/// Load the model once and analyze `text` with it
pub async fn analyze_once(
    config: SurfaceConfig,
    backend: Arc<dyn ModelBackend>,
    text: &str,
) -> anyhow::Result<AnalysisReport> {
    let state = SurfaceAppState::new(config, backend);

    if state.loader.initialize().await == LoadState::Failed {
        anyhow::bail!("failed to load model '{}'", state.loader.model_id());
    }

    state.controller.on_input_change(text);
    let outcome = state.controller.on_analyze().await;
    if let AnalyzeOutcome::Rejected { reason } = &outcome {
        tracing::warn!(?reason, "Nothing to analyze");
    }

    Ok(AnalysisReport {
        outcome,
        snapshot: state.controller.snapshot(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RejectReason;
    use async_trait::async_trait;
    use sentiment_classifiers::{Classifier, LexiconBackend};
    use sentiment_core::Error;

    struct UnreachableHub;

    #[async_trait]
    impl ModelBackend for UnreachableHub {
        async fn load_model(&self, _model_id: &str) -> sentiment_core::Result<Arc<dyn Classifier>> {
            Err(Error::acquisition("hub unreachable"))
        }

        fn name(&self) -> &str {
            "unreachable"
        }
    }

    #[tokio::test]
    async fn test_analyze_once_with_lexicon() {
        let report = analyze_once(
            SurfaceConfig::default(),
            Arc::new(LexiconBackend::new()),
            "This is terrible.",
        )
        .await
        .unwrap();

        assert!(matches!(report.outcome, AnalyzeOutcome::Resolved { .. }));
        assert_eq!(report.render(), "Score: 1.000 (NEGATIVE)\n🌶️🌶️🌶️🌶️🌶️");
    }

    #[tokio::test]
    async fn test_analyze_once_blank_text() {
        let report = analyze_once(
            SurfaceConfig::default(),
            Arc::new(LexiconBackend::new()),
            "   ",
        )
        .await
        .unwrap();

        assert_eq!(
            report.outcome,
            AnalyzeOutcome::Rejected {
                reason: RejectReason::EmptyInput
            }
        );
        assert_eq!(report.render(), "");
    }

    #[tokio::test]
    async fn test_analyze_once_fails_when_model_does_not_load() {
        let err = analyze_once(
            SurfaceConfig::default(),
            Arc::new(UnreachableHub),
            "I love this!",
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("failed to load model"), "{err}");
        assert!(err
            .to_string()
            .contains("distilbert-base-uncased-finetuned-sst-2-english"));
    }
}
