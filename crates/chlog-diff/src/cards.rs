//! Change cards: the unit the host UI displays.
//!
//! For each change record the builder normalizes both raw values, diffs
//! them, and renders both sides into a titled [`RenderedCard`]. Every call
//! works on its own copies, so concurrent renders never observe each other.

use chlog_types::{ChangeLogDocument, ChangeRecord, HighlightKind, RenderedCard};
use tracing::debug;

use crate::config::DiffConfig;
use crate::error::DiffResult;
use crate::normalize::normalize;
use crate::render::{HtmlMarkers, MarkerStyle, Renderer};
use crate::structural::StructuralDiffer;

/// A place the host mounts rendered cards into.
pub trait CardSink {
    /// Remove previously mounted cards.
    fn clear(&mut self);

    /// Append one card.
    fn push(&mut self, card: RenderedCard);
}

impl CardSink for Vec<RenderedCard> {
    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn push(&mut self, card: RenderedCard) {
        Vec::push(self, card);
    }
}

/// Builds cards with a fixed configuration and marker style.
pub struct ChangeCardBuilder<'a> {
    config: &'a DiffConfig,
    markers: &'a dyn MarkerStyle,
}

impl<'a> ChangeCardBuilder<'a> {
    pub fn new(config: &'a DiffConfig, markers: &'a dyn MarkerStyle) -> Self {
        Self { config, markers }
    }

    /// Build the card for one record, titled `"{prefix}: {field name}"`.
    pub fn build(&self, record: &ChangeRecord, prefix: &str) -> RenderedCard {
        let old = normalize(&record.old_value);
        let new = normalize(&record.new_value);
        let sides = StructuralDiffer::for_field(self.config, &record.field_name).diff(&old, &new);

        let renderer = Renderer::new(self.markers).with_indent_width(self.config.indent_width);
        let card = RenderedCard {
            title: format!("{}: {}", prefix, record.field_name),
            old_text: renderer.render(&sides.old, HighlightKind::Removed),
            new_text: renderer.render(&sides.new, HighlightKind::Added),
        };
        debug!(
            field = %record.field_name,
            highlighted = sides.has_highlight(),
            "built change card"
        );
        card
    }

    /// Build one card per record, in order.
    pub fn build_all(&self, changes: &[ChangeRecord], prefix: &str) -> Vec<RenderedCard> {
        changes.iter().map(|record| self.build(record, prefix)).collect()
    }

    /// Build the cards of a change-log document in its JSON wire form,
    /// titled with the configured field label.
    pub fn build_document(&self, json: &str) -> DiffResult<Vec<RenderedCard>> {
        let document = ChangeLogDocument::from_json_str(json)?;
        Ok(self.build_all(document.changes(), &self.config.field_label))
    }

    /// Replace the contents of `target` with freshly built cards.
    ///
    /// Without a target there is nowhere to show anything, and nothing is
    /// built.
    pub fn mount(&self, target: Option<&mut dyn CardSink>, changes: &[ChangeRecord], prefix: &str) {
        let Some(target) = target else {
            debug!("no card target mounted, skipping render");
            return;
        };
        target.clear();
        for record in changes {
            target.push(self.build(record, prefix));
        }
    }
}

/// Build one card with the default configuration and HTML markers.
pub fn build_card(record: &ChangeRecord, field_label_prefix: &str) -> RenderedCard {
    let config = DiffConfig::default();
    ChangeCardBuilder::new(&config, &HtmlMarkers).build(record, field_label_prefix)
}

/// Build the cards for a list of change records with the default
/// configuration and HTML markers. An empty list yields no cards.
pub fn build_cards(changes: &[ChangeRecord], field_label_prefix: &str) -> Vec<RenderedCard> {
    let config = DiffConfig::default();
    ChangeCardBuilder::new(&config, &HtmlMarkers).build_all(changes, field_label_prefix)
}

/// Mount cards into an optional host target. A missing target is a no-op.
pub fn mount_cards(
    target: Option<&mut dyn CardSink>,
    changes: &[ChangeRecord],
    config: &DiffConfig,
    markers: &dyn MarkerStyle,
) {
    ChangeCardBuilder::new(config, markers).mount(target, changes, &config.field_label);
}
