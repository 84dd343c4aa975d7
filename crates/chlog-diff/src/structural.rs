//! Structural diff of two value trees.
//!
//! The differ is a pure function of its inputs: it reads both trees and
//! builds two fresh annotated trees, one per side. Object keys are classified
//! once (removed, added, changed, unchanged) and both sides are projected
//! from that single classification.

use std::collections::HashMap;

use chlog_types::{Annotated, AnnotatedField, HighlightKind, Partial, Segment, Value};
use tracing::trace;

use crate::array_match::match_arrays;
use crate::config::DiffConfig;
use crate::word_diff::diff_words;

/// Object field used only to pair array elements. Never rendered.
pub const INDEX_KEY: &str = "index";

/// The two annotated sides of one comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SideBySide {
    pub old: Annotated,
    pub new: Annotated,
}

impl SideBySide {
    /// Both values shown whole, without markers.
    fn unchanged(old: &Value, new: &Value) -> Self {
        Self {
            old: Annotated::Unchanged(strip(old)),
            new: Annotated::Unchanged(strip(new)),
        }
    }

    /// Returns `true` if either side carries a marker.
    pub fn has_highlight(&self) -> bool {
        self.old.has_highlight() || self.new.has_highlight()
    }

    /// Fold a partial result with no markers back into plain values.
    fn settle(self, old: &Value, new: &Value) -> Self {
        if self.has_highlight() {
            self
        } else {
            Self::unchanged(old, new)
        }
    }
}

/// Per-key classification of an object comparison.
enum KeyChange {
    /// Present (non-null) on the old side only.
    Removed,
    /// Present (non-null) on the new side only.
    Added,
    /// Present on both sides with differing content.
    Changed(SideBySide),
    /// Equal on both sides, or null/absent on both.
    Unchanged,
}

/// Recursive differ over [`Value`] trees.
#[derive(Clone, Debug)]
pub struct StructuralDiffer<'a> {
    identity_key: &'a str,
    highlight_replaced: bool,
}

impl<'a> StructuralDiffer<'a> {
    /// A differ that pairs array elements by `identity_key`.
    pub fn new(identity_key: &'a str) -> Self {
        Self {
            identity_key,
            highlight_replaced: false,
        }
    }

    /// A differ set up for one change-record field.
    pub fn for_field(config: &'a DiffConfig, field_name: &str) -> Self {
        Self {
            identity_key: config.identity_key_for(field_name),
            highlight_replaced: config.highlight_replaced_values,
        }
    }

    /// Mark differing scalars and shape changes as wholly removed/added.
    pub fn highlight_replaced_values(mut self, on: bool) -> Self {
        self.highlight_replaced = on;
        self
    }

    /// Diff two normalized values.
    ///
    /// When either side is null there is nothing to compare against: both
    /// sides are shown whole and unmarked.
    pub fn diff(&self, old: &Value, new: &Value) -> SideBySide {
        trace!(old = %old.kind(), new = %new.kind(), "diffing values");
        if old.is_null() || new.is_null() {
            return SideBySide::unchanged(old, new);
        }
        self.diff_nested(old, new)
    }

    fn diff_nested(&self, old: &Value, new: &Value) -> SideBySide {
        match (old, new) {
            (Value::Arr(o), Value::Arr(n)) => self.diff_arrays(o, n).settle(old, new),
            (Value::Obj(o), Value::Obj(n)) => self.diff_objects(o, n).settle(old, new),
            (Value::Str(o), Value::Str(n)) => diff_strings(o, n).settle(old, new),
            _ if self.highlight_replaced && old != new => SideBySide {
                old: Annotated::Removed(strip(old)),
                new: Annotated::Added(strip(new)),
            },
            _ => SideBySide::unchanged(old, new),
        }
    }

    fn diff_arrays(&self, old: &[Value], new: &[Value]) -> SideBySide {
        let plan = match_arrays(old, new, self.identity_key);
        let mut old_side: Vec<Option<Annotated>> = (0..old.len()).map(|_| None).collect();
        let mut new_side: Vec<Option<Annotated>> = (0..new.len()).map(|_| None).collect();

        for pair in &plan.pairs {
            match (pair.old, pair.new) {
                (Some(i), Some(j)) => {
                    let sides = self.diff_nested(&old[i], &new[j]);
                    old_side[i] = Some(sides.old);
                    new_side[j] = Some(sides.new);
                }
                (Some(i), None) => old_side[i] = Some(Annotated::Removed(strip(&old[i]))),
                (None, Some(j)) => new_side[j] = Some(Annotated::Added(strip(&new[j]))),
                (None, None) => {}
            }
        }

        SideBySide {
            old: Annotated::Partial(Partial::Array(old_side.into_iter().flatten().collect())),
            new: Annotated::Partial(Partial::Array(new_side.into_iter().flatten().collect())),
        }
    }

    fn diff_objects(&self, old: &[(String, Value)], new: &[(String, Value)]) -> SideBySide {
        let old_keys = old.iter().map(|(k, _)| k.as_str());
        let new_only = new
            .iter()
            .map(|(k, _)| k.as_str())
            .filter(|k| !old.iter().any(|(ok, _)| ok == k));

        let mut changes: HashMap<&str, KeyChange> = HashMap::new();
        for key in old_keys.chain(new_only).filter(|k| *k != INDEX_KEY) {
            let change = match (present(old, key), present(new, key)) {
                (Some(o), Some(n)) => {
                    let sides = self.diff_nested(o, n);
                    if sides.has_highlight() {
                        KeyChange::Changed(sides)
                    } else {
                        KeyChange::Unchanged
                    }
                }
                (Some(_), None) => KeyChange::Removed,
                (None, Some(_)) => KeyChange::Added,
                (None, None) => KeyChange::Unchanged,
            };
            changes.insert(key, change);
        }

        SideBySide {
            old: project(old, &changes, HighlightKind::Removed),
            new: project(new, &changes, HighlightKind::Added),
        }
    }
}

/// Build one side of an object comparison from the shared classification.
///
/// `side` names the side being built: removed entries only carry markers on
/// the old side, added entries only on the new side.
fn project(
    entries: &[(String, Value)],
    changes: &HashMap<&str, KeyChange>,
    side: HighlightKind,
) -> Annotated {
    let fields = entries
        .iter()
        .filter(|(k, _)| k != INDEX_KEY)
        .map(|(key, value)| {
            let (key_highlighted, value) = match (changes.get(key.as_str()), side) {
                (Some(KeyChange::Changed(sides)), HighlightKind::Removed) => (false, sides.old.clone()),
                (Some(KeyChange::Changed(sides)), HighlightKind::Added) => (false, sides.new.clone()),
                (Some(KeyChange::Removed), HighlightKind::Removed)
                | (Some(KeyChange::Added), HighlightKind::Added) => {
                    (true, Annotated::whole(side, strip(value)))
                }
                _ => (false, Annotated::Unchanged(strip(value))),
            };
            AnnotatedField {
                key: key.clone(),
                key_highlighted,
                value,
            }
        })
        .collect();
    Annotated::Partial(Partial::Object(fields))
}

/// The value under `key`, unless it is missing or null.
fn present<'v>(entries: &'v [(String, Value)], key: &str) -> Option<&'v Value> {
    entries
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
        .filter(|v| !v.is_null())
}

fn diff_strings(old: &str, new: &str) -> SideBySide {
    SideBySide {
        old: text_side(old, diff_words(old, new)),
        new: text_side(new, diff_words(new, old)),
    }
}

fn text_side(text: &str, segments: Vec<Segment>) -> Annotated {
    if segments.iter().any(|s| s.highlighted) {
        Annotated::Partial(Partial::Text(segments))
    } else {
        Annotated::Unchanged(Value::Str(text.to_string()))
    }
}

fn strip(value: &Value) -> Value {
    value.without_key(INDEX_KEY)
}

/// Diff two values with default settings and the given identity key.
pub fn diff_values(old: &Value, new: &Value, identity_key: &str) -> SideBySide {
    StructuralDiffer::new(identity_key).diff(old, new)
}
