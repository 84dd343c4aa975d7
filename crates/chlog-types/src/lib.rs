//! Foundation types for change-log review.
//!
//! This crate provides the data shapes shared by the diff engine and its
//! hosts. Every other `chlog` crate depends on `chlog-types`.
//!
//! # Key Types
//!
//! - [`Value`] — Canonical semi-structured value (null, bool, number, string, object, array)
//! - [`Annotated`] — A value paired with its per-node change classification
//! - [`Segment`] — One run of a word-diffed string
//! - [`HighlightKind`] — Which side a highlight marker belongs to
//! - [`ChangeRecord`] — One field-level before/after pair from the audit log
//! - [`ChangeLogEntry`] — A document change event with its metadata and records
//! - [`RenderedCard`] — The display unit handed back to the host UI

pub mod annotated;
pub mod change;
pub mod error;
pub mod value;

pub use annotated::{Annotated, AnnotatedField, AnnotationTag, HighlightKind, Partial, Segment};
pub use change::{ChangeLogDocument, ChangeLogEntry, ChangeRecord, InfoRow, RawValue, RenderedCard};
pub use error::TypeError;
pub use value::{Value, ValueKind};
