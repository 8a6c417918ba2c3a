//! Lexicon-based sentiment classifier
//!
//! Keyword matching with no model download. Used for offline runs and the
//! demo surface when the Candle backend is not wanted.

use crate::backend::ModelBackend;
use crate::classifier::{ClassificationMetadata, ClassificationResult, Classifier};
use aho_corasick::{AhoCorasick, MatchKind};
use sentiment_core::Result;
use std::sync::Arc;
use std::time::Instant;

const POSITIVE_TERMS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "love",
    "amazing",
    "wonderful",
    "happy",
    "fantastic",
    "awesome",
    "best",
    "brilliant",
    "delightful",
];

const NEGATIVE_TERMS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "hate",
    "horrible",
    "worst",
    "sad",
    "angry",
    "disappointed",
    "poor",
    "boring",
    "broken",
];

pub struct LexiconClassifier {
    name: String,
    positive: AhoCorasick,
    negative: AhoCorasick,
}

impl LexiconClassifier {
    pub fn new() -> Result<Self> {
        Self::with_name("lexicon")
    }

    pub fn with_name(name: impl Into<String>) -> Result<Self> {
        let positive = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(POSITIVE_TERMS)
            .map_err(|e| {
                sentiment_core::Error::acquisition(format!(
                    "Failed to build positive sentiment matcher: {e}"
                ))
            })?;

        let negative = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(NEGATIVE_TERMS)
            .map_err(|e| {
                sentiment_core::Error::acquisition(format!(
                    "Failed to build negative sentiment matcher: {e}"
                ))
            })?;

        Ok(Self {
            name: name.into(),
            positive,
            negative,
        })
    }
}

/// Count matches that stand as whole words in `text`
fn whole_word_hits(matcher: &AhoCorasick, text: &str) -> usize {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    matcher
        .find_iter(text)
        .filter(|m| {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            !before.is_some_and(is_word) && !after.is_some_and(is_word)
        })
        .count()
}

#[async_trait::async_trait]
impl Classifier for LexiconClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<ClassificationResult>> {
        let start = Instant::now();

        let positive_hits = whole_word_hits(&self.positive, text) as f32;
        let negative_hits = whole_word_hits(&self.negative, text) as f32;
        let total = positive_hits + negative_hits;

        let positive = if total == 0.0 {
            0.5
        } else {
            positive_hits / total
        };
        let negative = 1.0 - positive;

        // No evidence either way
        let ranked = if positive == negative {
            vec![("NEUTRAL".to_string(), 0.5)]
        } else if positive > negative {
            vec![
                ("POSITIVE".to_string(), positive),
                ("NEGATIVE".to_string(), negative),
            ]
        } else {
            vec![
                ("NEGATIVE".to_string(), negative),
                ("POSITIVE".to_string(), positive),
            ]
        };

        let latency_us = start.elapsed().as_micros() as u64;
        Ok(ranked
            .into_iter()
            .map(|(label, score)| ClassificationResult {
                label,
                score,
                metadata: ClassificationMetadata {
                    model: Some(self.name.clone()),
                },
                latency_us,
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Backend handing out a [`LexiconClassifier`]
pub struct LexiconBackend;

impl LexiconBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LexiconBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ModelBackend for LexiconBackend {
    async fn load_model(&self, model_id: &str) -> Result<Arc<dyn Classifier>> {
        tracing::info!(model_id, "Using lexicon classifier in place of model weights");
        Ok(Arc::new(LexiconClassifier::new()?))
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}
