//! Serialization of annotated trees into highlighted text.
//!
//! Output mirrors pretty-printed JSON: one entry per line, a fixed number of
//! spaces per nesting level, quoted keys and strings. Line feeds inside
//! strings are emitted as real line breaks so multi-line text stays
//! readable. How a highlighted fragment is marked is up to the
//! [`MarkerStyle`], so the same diff can be shown as HTML spans, Markdown
//! emphasis, terminal colour, or plain-text brackets.

use std::borrow::Cow;

use chlog_types::{Annotated, HighlightKind, Partial, Segment, Value};

/// How highlighted fragments are marked in rendered text.
pub trait MarkerStyle {
    /// Wrap an already escaped fragment in the marker for `kind`.
    fn wrap(&self, kind: HighlightKind, text: &str) -> String;

    /// Escape literal text for the target format. Applied to keys and
    /// string contents only, never to markers or structural punctuation.
    fn escape<'t>(&self, text: &'t str) -> Cow<'t, str> {
        Cow::Borrowed(text)
    }
}

/// Inline `<span>` markers with the change-log colours, HTML-escaped text.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlMarkers;

impl HtmlMarkers {
    const REMOVED_OPEN: &'static str =
        "<span class='text-dark' style='background-color:#f9b2ba'>";
    const ADDED_OPEN: &'static str = "<span class='text-dark' style='background-color:#a6f1b8'>";
}

impl MarkerStyle for HtmlMarkers {
    fn wrap(&self, kind: HighlightKind, text: &str) -> String {
        let open = match kind {
            HighlightKind::Removed => Self::REMOVED_OPEN,
            HighlightKind::Added => Self::ADDED_OPEN,
        };
        format!("{open}{text}</span>")
    }

    fn escape<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if !text.contains(['&', '<', '>']) {
            return Cow::Borrowed(text);
        }
        let mut out = String::with_capacity(text.len() + 8);
        for c in text.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                c => out.push(c),
            }
        }
        Cow::Owned(out)
    }
}

/// `~~removed~~` and `**added**`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkdownMarkers;

impl MarkerStyle for MarkdownMarkers {
    fn wrap(&self, kind: HighlightKind, text: &str) -> String {
        match kind {
            HighlightKind::Removed => format!("~~{text}~~"),
            HighlightKind::Added => format!("**{text}**"),
        }
    }

    fn escape<'t>(&self, text: &'t str) -> Cow<'t, str> {
        const SPECIAL: [char; 4] = ['*', '~', '_', '`'];
        if !text.contains(SPECIAL) {
            return Cow::Borrowed(text);
        }
        let mut out = String::with_capacity(text.len() + 4);
        for c in text.chars() {
            if SPECIAL.contains(&c) {
                out.push('\\');
            }
            out.push(c);
        }
        Cow::Owned(out)
    }
}

/// `[-removed-]` and `{+added+}`, as in word-diff tools.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainMarkers;

impl MarkerStyle for PlainMarkers {
    fn wrap(&self, kind: HighlightKind, text: &str) -> String {
        match kind {
            HighlightKind::Removed => format!("[-{text}-]"),
            HighlightKind::Added => format!("{{+{text}+}}"),
        }
    }
}

/// Renders annotated trees with a given marker style.
pub struct Renderer<'m> {
    markers: &'m dyn MarkerStyle,
    indent_width: usize,
}

impl<'m> Renderer<'m> {
    pub fn new(markers: &'m dyn MarkerStyle) -> Self {
        Self {
            markers,
            indent_width: 5,
        }
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Render one side. `kind` is the marker used for every highlighted
    /// fragment: `Removed` for the old side, `Added` for the new side.
    ///
    /// A bare null renders as an empty string.
    pub fn render(&self, annotated: &Annotated, kind: HighlightKind) -> String {
        if let Annotated::Unchanged(Value::Null) = annotated {
            return String::new();
        }
        let mut out = String::new();
        self.write_node(&mut out, annotated, kind, 0);
        out
    }

    fn write_node(&self, out: &mut String, node: &Annotated, kind: HighlightKind, depth: usize) {
        match node {
            Annotated::Unchanged(value) => self.write_value(out, value, depth),
            Annotated::Removed(value) | Annotated::Added(value) => {
                let mut inner = String::new();
                self.write_value(&mut inner, value, depth);
                out.push_str(&self.markers.wrap(kind, &inner));
            }
            Annotated::Partial(Partial::Text(segments)) => self.write_segments(out, segments, kind),
            Annotated::Partial(Partial::Object(fields)) => {
                let entries = fields.iter().map(|f| {
                    let key = self.quoted(&f.key);
                    let key = if f.key_highlighted {
                        self.markers.wrap(kind, &key)
                    } else {
                        key
                    };
                    let mut line = format!("{key}: ");
                    self.write_node(&mut line, &f.value, kind, depth + 1);
                    line
                });
                self.write_block(out, ('{', '}'), entries, depth);
            }
            Annotated::Partial(Partial::Array(items)) => {
                let entries = items.iter().map(|item| {
                    let mut line = String::new();
                    self.write_node(&mut line, item, kind, depth + 1);
                    line
                });
                self.write_block(out, ('[', ']'), entries, depth);
            }
        }
    }

    fn write_value(&self, out: &mut String, value: &Value, depth: usize) {
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Num(n) => out.push_str(&n.to_string()),
            Value::Str(s) => out.push_str(&self.quoted(s)),
            Value::Obj(entries) => {
                let lines = entries.iter().map(|(k, v)| {
                    let mut line = format!("{}: ", self.quoted(k));
                    self.write_value(&mut line, v, depth + 1);
                    line
                });
                self.write_block(out, ('{', '}'), lines, depth);
            }
            Value::Arr(items) => {
                let lines = items.iter().map(|v| {
                    let mut line = String::new();
                    self.write_value(&mut line, v, depth + 1);
                    line
                });
                self.write_block(out, ('[', ']'), lines, depth);
            }
        }
    }

    fn write_segments(&self, out: &mut String, segments: &[Segment], kind: HighlightKind) {
        out.push('"');
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let text = self.escaped(&segment.text);
            if segment.highlighted {
                out.push_str(&self.markers.wrap(kind, &text));
            } else {
                out.push_str(&text);
            }
        }
        out.push('"');
    }

    /// Write `lines` one per line between `open` and `close`, indented one
    /// level deeper than `depth`.
    fn write_block(
        &self,
        out: &mut String,
        (open, close): (char, char),
        lines: impl Iterator<Item = String>,
        depth: usize,
    ) {
        let inner = " ".repeat(self.indent_width * (depth + 1));
        let mut empty = true;
        out.push(open);
        for line in lines {
            out.push_str(if empty { "\n" } else { ",\n" });
            out.push_str(&inner);
            out.push_str(&line);
            empty = false;
        }
        if !empty {
            out.push('\n');
            out.push_str(&" ".repeat(self.indent_width * depth));
        }
        out.push(close);
    }

    fn quoted(&self, text: &str) -> String {
        format!("\"{}\"", self.escaped(text))
    }

    fn escaped(&self, text: &str) -> String {
        self.markers.escape(&escape_control(text)).into_owned()
    }
}

/// JSON-style escaping that leaves line feeds and carriage returns literal.
fn escape_control(text: &str) -> Cow<'_, str> {
    let needs = |c: char| c == '"' || c == '\\' || (c.is_control() && c != '\n' && c != '\r');
    if !text.chars().any(needs) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' | '\r' => out.push(c),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structural::diff_values;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(&json)
    }

    fn render_pair(old: serde_json::Value, new: serde_json::Value) -> (String, String) {
        let sides = diff_values(&v(old), &v(new), "id");
        let renderer = Renderer::new(&PlainMarkers).with_indent_width(2);
        (
            renderer.render(&sides.old, HighlightKind::Removed),
            renderer.render(&sides.new, HighlightKind::Added),
        )
    }

    #[test]
    fn object_with_removed_key_and_changed_string() {
        let (old, new) = render_pair(
            json!({"name": "b", "gone": true}),
            json!({"name": "b2"}),
        );
        assert_eq!(old, "{\n  \"name\": \"[-b-]\",\n  [-\"gone\"-]: [-true-]\n}");
        assert_eq!(new, "{\n  \"name\": \"{+b2+}\"\n}");
    }

    #[test]
    fn array_of_scalars() {
        let (old, new) = render_pair(json!([1, 2]), json!([1, 3]));
        assert_eq!(old, "[\n  1,\n  [-2-]\n]");
        assert_eq!(new, "[\n  1,\n  {+3+}\n]");
    }

    #[test]
    fn nested_whole_value_keeps_indentation() {
        let (_, new) = render_pair(json!({"a": null}), json!({"a": {"b": 1}}));
        assert_eq!(new, "{\n  {+\"a\"+}: {+{\n    \"b\": 1\n  }+}\n}");
    }

    #[test]
    fn empty_containers() {
        let (old, new) = render_pair(json!({"list": [], "map": {}}), json!({"list": [], "map": {}}));
        assert_eq!(old, "{\n  \"list\": [],\n  \"map\": {}\n}");
        assert_eq!(old, new);
    }

    #[test]
    fn null_renders_blank() {
        let (old, new) = render_pair(json!(null), json!({"a": 1}));
        assert_eq!(old, "");
        assert_eq!(new, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn mismatch_renders_plain_literals() {
        let sides = diff_values(&Value::Str("5".into()), &v(json!(5)), "id");
        let renderer = Renderer::new(&PlainMarkers);
        assert_eq!(renderer.render(&sides.old, HighlightKind::Removed), "\"5\"");
        assert_eq!(renderer.render(&sides.new, HighlightKind::Added), "5");
    }

    #[test]
    fn default_indent_is_five() {
        let sides = diff_values(&v(json!({"a": 1})), &v(json!({"a": 1})), "id");
        let out = Renderer::new(&PlainMarkers).render(&sides.old, HighlightKind::Removed);
        assert_eq!(out, "{\n     \"a\": 1\n}");
    }

    #[test]
    fn strings_keep_line_breaks_and_escape_the_rest() {
        let (old, _) = render_pair(json!("line one\nsay \"hi\"\tnow"), json!(null));
        assert_eq!(old, "\"line one\nsay \\\"hi\\\"\\tnow\"");
        assert_eq!(escape_control("bell\u{7}"), "bell\\u0007");
        assert_eq!(escape_control("a\\b"), "a\\\\b");
    }

    #[test]
    fn html_markers_escape_text_not_markup() {
        let (old, new) = render_pair(json!("a <b> & c"), json!("a <i> & c"));
        let sides = diff_values(&v(json!("a <b> & c")), &v(json!("a <i> & c")), "id");
        let html = Renderer::new(&HtmlMarkers).render(&sides.old, HighlightKind::Removed);
        assert_eq!(
            html,
            "\"a <span class='text-dark' style='background-color:#f9b2ba'>&lt;b&gt;</span> &amp; c\""
        );
        let html_new = Renderer::new(&HtmlMarkers).render(&sides.new, HighlightKind::Added);
        assert!(html_new.contains("background-color:#a6f1b8'>&lt;i&gt;</span>"));
        assert_eq!(old, "\"a [-<b>-] & c\"");
        assert_eq!(new, "\"a {+<i>+} & c\"");
    }

    #[test]
    fn markdown_markers() {
        let sides = diff_values(&v(json!("use *old* api")), &v(json!("use new api")), "id");
        let renderer = Renderer::new(&MarkdownMarkers);
        assert_eq!(
            renderer.render(&sides.old, HighlightKind::Removed),
            "\"use ~~\\*old\\*~~ api\""
        );
        assert_eq!(
            renderer.render(&sides.new, HighlightKind::Added),
            "\"use **new** api\""
        );
    }

    #[test]
    fn identical_values_have_no_markers() {
        let value = json!({"tags": ["a", "b"], "owner": {"name": "x y"}, "n": 1.5});
        let (old, new) = render_pair(value.clone(), value);
        assert_eq!(old, new);
        assert!(!old.contains("[-"));
        assert!(!new.contains("{+"));
    }
}
