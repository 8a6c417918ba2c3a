use chrono::{DateTime, Utc};
use sentiment_core::{format_score, render_visualization, LoadState, SentimentResult, Visualization};
use serde::{Deserialize, Serialize};

/// Shown when the analyze action is triggered without its preconditions
pub const ANALYZE_NOTICE: &str = "Please enter text and wait for the model to finish loading.";

/// Analyze button label while idle
pub const ANALYZE_LABEL: &str = "ANALYZE SENTIMENT";

/// Analyze button label while the model or an inference is outstanding
pub const LOADING_LABEL: &str = "Loading Model...";

/// User-visible state of the surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceState {
    pub input_text: String,
    pub busy: bool,
    pub load_state: LoadState,
    pub result: Option<SentimentResult>,
}

impl SurfaceState {
    /// Whether the analyze control is enabled
    pub fn analyze_enabled(&self) -> bool {
        !self.busy && self.load_state.is_ready()
    }
}

/// Serializable copy of [`SurfaceState`] plus everything derived from it
#[derive(Debug, Clone, Serialize)]
pub struct SurfaceSnapshot {
    pub input_text: String,
    pub busy: bool,
    pub load_state: LoadState,
    pub result: Option<SentimentResult>,
    /// Score line, e.g. `0.980 (POSITIVE)`
    pub display: Option<String>,
    pub visualization: Option<Visualization>,
    pub analyze_enabled: bool,
    pub analyze_label: &'static str,
}

impl From<&SurfaceState> for SurfaceSnapshot {
    fn from(state: &SurfaceState) -> Self {
        Self {
            input_text: state.input_text.clone(),
            busy: state.busy,
            load_state: state.load_state,
            result: state.result.clone(),
            display: state.result.as_ref().map(format_score),
            visualization: render_visualization(state.result.as_ref()),
            analyze_enabled: state.analyze_enabled(),
            analyze_label: if state.busy { LOADING_LABEL } else { ANALYZE_LABEL },
        }
    }
}

/// Why an analyze request was not dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The model is still loading or failed to load
    ModelNotReady,
    /// An inference is already in flight
    Busy,
    /// The input is empty or whitespace
    EmptyInput,
}

/// Result of one analyze invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnalyzeOutcome {
    /// Preconditions unmet; nothing was dispatched or mutated
    Rejected { reason: RejectReason },
    /// The classifier resolved; its top candidate is now displayed
    Resolved { result: SentimentResult },
    /// The classifier failed; the failure sentinel is now displayed
    Failed { result: SentimentResult },
}

impl AnalyzeOutcome {
    /// The stored result, if the request was dispatched
    pub fn result(&self) -> Option<&SentimentResult> {
        match self {
            Self::Rejected { .. } => None,
            Self::Resolved { result } | Self::Failed { result } => Some(result),
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// User-facing notice
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub message: String,
    pub reason: RejectReason,
    pub timestamp: DateTime<Utc>,
}

impl Notice {
    pub fn rejected(reason: RejectReason) -> Self {
        Self {
            message: ANALYZE_NOTICE.to_string(),
            reason,
            timestamp: Utc::now(),
        }
    }
}

/// Events pushed to observers of the surface
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SurfaceEvent {
    StateChanged(SurfaceSnapshot),
    Notice(Notice),
}
