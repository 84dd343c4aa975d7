//! Structural diff and highlight engine for change-log review.
//!
//! Given the before and after value of an edited field, the engine works out
//! which fragments differ and renders two annotated, indented text blocks
//! (old side and new side) with the differing fragments wrapped in
//! highlight markers.
//!
//! Pipeline: [`normalize`] → [`diff_values`] (using [`match_arrays`] and
//! [`diff_words`]) → [`Renderer`] → [`RenderedCard`](chlog_types::RenderedCard).
//!
//! # Key Types
//!
//! - [`DiffConfig`] -- Identity keys, indentation, and highlight policy
//! - [`StructuralDiffer`] / [`SideBySide`] -- Pure recursive diff of two value trees
//! - [`MatchPlan`] / [`MatchKey`] -- Array element pairing
//! - [`MarkerStyle`] -- Pluggable highlight markers (HTML, Markdown, plain)
//! - [`CardSink`] -- Host mount point for rendered cards

pub mod array_match;
pub mod cards;
pub mod config;
pub mod error;
pub mod normalize;
pub mod render;
pub mod structural;
pub mod word_diff;

pub use array_match::{match_arrays, MatchKey, MatchPlan, MatchedPair};
pub use cards::{build_card, build_cards, mount_cards, CardSink, ChangeCardBuilder};
pub use config::{DiffConfig, MAX_INDENT_WIDTH};
pub use error::{DiffError, DiffResult};
pub use normalize::normalize;
pub use render::{HtmlMarkers, MarkdownMarkers, MarkerStyle, PlainMarkers, Renderer};
pub use structural::{diff_values, SideBySide, StructuralDiffer, INDEX_KEY};
pub use word_diff::diff_words;
