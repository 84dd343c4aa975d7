use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Which side of a comparison a highlight marker belongs to.
///
/// The old side only ever shows removals, the new side only additions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    Removed,
    Added,
}

impl fmt::Display for HighlightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Removed => write!(f, "removed"),
            Self::Added => write!(f, "added"),
        }
    }
}

/// One run of a word-diffed string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: false,
        }
    }

    pub fn marked(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: true,
        }
    }
}

/// Coarse classification of an annotated node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnnotationTag {
    Unchanged,
    Removed,
    Added,
    PartiallyChanged,
}

/// A value paired with its change classification, for one side of a diff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Annotated {
    /// Shown as-is, no marker.
    Unchanged(Value),
    /// Shown wholly inside a "removed" marker (old side only).
    Removed(Value),
    /// Shown wholly inside an "added" marker (new side only).
    Added(Value),
    /// Some descendants differ.
    Partial(Partial),
}

/// The body of a partially changed node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Partial {
    Text(Vec<Segment>),
    Object(Vec<AnnotatedField>),
    Array(Vec<Annotated>),
}

/// One entry of a partially changed object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotatedField {
    pub key: String,
    /// Set when the whole entry exists on this side only.
    pub key_highlighted: bool,
    pub value: Annotated,
}

impl Annotated {
    /// Wrap a whole value with the marker for `kind`.
    pub fn whole(kind: HighlightKind, value: Value) -> Self {
        match kind {
            HighlightKind::Removed => Self::Removed(value),
            HighlightKind::Added => Self::Added(value),
        }
    }

    pub fn tag(&self) -> AnnotationTag {
        match self {
            Self::Unchanged(_) => AnnotationTag::Unchanged,
            Self::Removed(_) => AnnotationTag::Removed,
            Self::Added(_) => AnnotationTag::Added,
            Self::Partial(_) => AnnotationTag::PartiallyChanged,
        }
    }

    /// Returns `true` if any fragment of this tree carries a marker.
    pub fn has_highlight(&self) -> bool {
        match self {
            Self::Unchanged(_) => false,
            Self::Removed(_) | Self::Added(_) => true,
            Self::Partial(Partial::Text(segments)) => segments.iter().any(|s| s.highlighted),
            Self::Partial(Partial::Object(fields)) => fields
                .iter()
                .any(|f| f.key_highlighted || f.value.has_highlight()),
            Self::Partial(Partial::Array(items)) => items.iter().any(Annotated::has_highlight),
        }
    }

    /// Count wholly removed or added nodes, including object entries.
    pub fn whole_changes(&self) -> usize {
        match self {
            Self::Unchanged(_) | Self::Partial(Partial::Text(_)) => 0,
            Self::Removed(_) | Self::Added(_) => 1,
            Self::Partial(Partial::Object(fields)) => {
                fields.iter().map(|f| f.value.whole_changes()).sum()
            }
            Self::Partial(Partial::Array(items)) => items.iter().map(Annotated::whole_changes).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_picks_variant_by_kind() {
        let v = Value::Bool(true);
        assert_eq!(Annotated::whole(HighlightKind::Removed, v.clone()).tag(), AnnotationTag::Removed);
        assert_eq!(Annotated::whole(HighlightKind::Added, v).tag(), AnnotationTag::Added);
    }

    #[test]
    fn has_highlight_walks_children() {
        let clean = Annotated::Partial(Partial::Object(vec![AnnotatedField {
            key: "a".into(),
            key_highlighted: false,
            value: Annotated::Partial(Partial::Text(vec![Segment::plain("same")])),
        }]));
        assert!(!clean.has_highlight());

        let dirty = Annotated::Partial(Partial::Array(vec![
            Annotated::Unchanged(Value::Null),
            Annotated::Partial(Partial::Text(vec![Segment::plain("x"), Segment::marked("y")])),
        ]));
        assert!(dirty.has_highlight());
        assert_eq!(dirty.whole_changes(), 0);
    }

    #[test]
    fn whole_changes_counts_nested_entries() {
        let tree = Annotated::Partial(Partial::Array(vec![
            Annotated::Removed(Value::Null),
            Annotated::Partial(Partial::Object(vec![AnnotatedField {
                key: "k".into(),
                key_highlighted: true,
                value: Annotated::Removed(Value::Bool(false)),
            }])),
        ]));
        assert_eq!(tree.whole_changes(), 2);
    }

    #[test]
    fn highlight_kind_display() {
        assert_eq!(HighlightKind::Removed.to_string(), "removed");
        assert_eq!(HighlightKind::Added.to_string(), "added");
    }
}
