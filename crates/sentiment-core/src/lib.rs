//! Sentiment Core
//!
//! Core types and utilities shared across the sentiment analyser crates.
//!
//! This crate provides:
//! - Error types and result handling
//! - The model lifecycle state (`LoadState`) and the analysis outcome (`SentimentResult`)
//! - Pure rendering of a result into its score line and glyph run

pub mod error;
pub mod types;
pub mod visualization;

pub use error::{Error, Result};
pub use types::{LoadState, SentimentResult, ANALYSIS_FAILED_LABEL};
pub use visualization::{format_score, render_visualization, Glyph, Visualization, MAX_GLYPHS};
