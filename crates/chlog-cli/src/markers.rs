use chlog_diff::MarkerStyle;
use chlog_types::HighlightKind;
use colored::Colorize;

/// Terminal colour markers: removed text on red, added text on green.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnsiMarkers;

impl MarkerStyle for AnsiMarkers {
    fn wrap(&self, kind: HighlightKind, text: &str) -> String {
        match kind {
            HighlightKind::Removed => text.black().on_bright_red().to_string(),
            HighlightKind::Added => text.black().on_bright_green().to_string(),
        }
    }
}
