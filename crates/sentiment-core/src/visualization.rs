//! Score rendering: the numeric score line and the emoji glyph run

use crate::types::SentimentResult;
use serde::Serialize;

/// Upper bound of the glyph run (a score of 1.0)
pub const MAX_GLYPHS: usize = 5;

/// Icon family selected by the result label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Glyph {
    Positive,
    Negative,
    Neutral,
}

impl Glyph {
    /// Select the glyph for a label. Anything other than `POSITIVE` or
    /// `NEGATIVE` (including the failure sentinel) is neutral.
    pub fn for_label(label: &str) -> Self {
        match label {
            "POSITIVE" => Self::Positive,
            "NEGATIVE" => Self::Negative,
            _ => Self::Neutral,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Positive => "😎",
            Self::Negative => "🌶️",
            Self::Neutral => "🤷‍♂️",
        }
    }

    /// CSS class used by the page for this glyph
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Positive => "positive-icon",
            Self::Negative => "negative-icon",
            Self::Neutral => "neutral-icon",
        }
    }
}

/// A rendered glyph run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visualization {
    pub glyph: Glyph,
    pub icon: &'static str,
    pub css_class: &'static str,
    pub count: usize,
}

impl Visualization {
    /// Build the run for a label and score
    pub fn new(label: &str, score: f32) -> Self {
        let glyph = Glyph::for_label(label);
        Self {
            glyph,
            icon: glyph.icon(),
            css_class: glyph.css_class(),
            count: glyph_count(score),
        }
    }

    /// The icon repeated `count` times
    pub fn glyphs(&self) -> String {
        self.icon.repeat(self.count)
    }
}

impl std::fmt::Display for Visualization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.glyphs())
    }
}

/// `ceil(score * 5)`, clamped to `0..=MAX_GLYPHS`
pub fn glyph_count(score: f32) -> usize {
    if !score.is_finite() || score <= 0.0 {
        return 0;
    }
    let count = (score * MAX_GLYPHS as f32).ceil();
    (count as usize).min(MAX_GLYPHS)
}

/// Map a result to its glyph run. An absent result renders nothing.
pub fn render_visualization(result: Option<&SentimentResult>) -> Option<Visualization> {
    result.map(|r| Visualization::new(&r.label, r.score))
}

/// Score line shown above the glyph run, e.g. `0.980 (POSITIVE)`
pub fn format_score(result: &SentimentResult) -> String {
    format!("{:.3} ({})", result.score, result.label)
}
