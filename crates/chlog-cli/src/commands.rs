use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use chlog_diff::{
    ChangeCardBuilder, DiffConfig, HtmlMarkers, MarkdownMarkers, MarkerStyle, PlainMarkers,
};
use chlog_types::{ChangeLogDocument, ChangeRecord, InfoRow, RawValue, RenderedCard};
use colored::Colorize;
use serde::Serialize;

use crate::cli::*;
use crate::markers::AnsiMarkers;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let output = match cli.command {
        Command::Render(args) => cmd_render(args, config, cli.format)?,
        Command::Diff(args) => cmd_diff(args, config, cli.format)?,
    };
    print!("{output}");
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DiffConfig> {
    match path {
        Some(path) => DiffConfig::from_toml_file(path)
            .with_context(|| format!("loading diff configuration from {}", path.display())),
        None => Ok(DiffConfig::default()),
    }
}

fn cmd_render(args: RenderArgs, mut config: DiffConfig, format: OutputFormat) -> anyhow::Result<String> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let document = ChangeLogDocument::from_json_str(&text)
        .with_context(|| format!("parsing {}", args.file.display()))?;
    if let Some(label) = args.label {
        config.field_label = label;
    }
    tracing::debug!(changes = document.changes().len(), "rendering change log");

    let info = document.entry().map(|e| e.basic_info()).unwrap_or_default();
    format_report(&info, document.changes(), &config, format)
}

fn cmd_diff(args: DiffArgs, mut config: DiffConfig, format: OutputFormat) -> anyhow::Result<String> {
    if let Some(key) = args.identity_key {
        config.identity_key = key;
    }
    let record = ChangeRecord::new(args.field, parse_raw_arg(&args.old), parse_raw_arg(&args.new));
    format_report(&[], &[record], &config, format)
}

/// Command-line values are JSON when they parse as JSON, literal text otherwise.
fn parse_raw_arg(arg: &str) -> RawValue {
    serde_json::from_str(arg).unwrap_or_else(|_| RawValue::String(arg.to_string()))
}

#[derive(Serialize)]
struct JsonReport<'a> {
    info: &'a [InfoRow],
    cards: Vec<RenderedCard>,
}

fn format_report(
    info: &[InfoRow],
    changes: &[ChangeRecord],
    config: &DiffConfig,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let markers: &dyn MarkerStyle = match format {
        OutputFormat::Ansi => &AnsiMarkers,
        OutputFormat::Html => &HtmlMarkers,
        OutputFormat::Markdown => &MarkdownMarkers,
        OutputFormat::Plain | OutputFormat::Json => &PlainMarkers,
    };
    let cards = ChangeCardBuilder::new(config, markers).build_all(changes, &config.field_label);

    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            out = serde_json::to_string_pretty(&JsonReport { info, cards })?;
            out.push('\n');
        }
        OutputFormat::Html => write_html(&mut out, info, &cards)?,
        OutputFormat::Markdown => write_markdown(&mut out, info, &cards)?,
        OutputFormat::Ansi | OutputFormat::Plain => {
            write_text(&mut out, info, &cards, format == OutputFormat::Ansi)?
        }
    }
    Ok(out)
}

fn write_text(
    out: &mut String,
    info: &[InfoRow],
    cards: &[RenderedCard],
    colour: bool,
) -> std::fmt::Result {
    for row in info {
        writeln!(out, "{:<14} {}", format!("{}:", row.label), row.value)?;
    }
    if !info.is_empty() {
        writeln!(out)?;
    }
    if cards.is_empty() {
        writeln!(out, "No changes.")?;
    }
    for card in cards {
        if colour {
            writeln!(out, "{}", card.title.bold().cyan())?;
            writeln!(out, "{}", "--- old".red())?;
            writeln!(out, "{}", card.old_text)?;
            writeln!(out, "{}", "+++ new".green())?;
        } else {
            writeln!(out, "{}", card.title)?;
            writeln!(out, "--- old")?;
            writeln!(out, "{}", card.old_text)?;
            writeln!(out, "+++ new")?;
        }
        writeln!(out, "{}", card.new_text)?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_html(out: &mut String, info: &[InfoRow], cards: &[RenderedCard]) -> std::fmt::Result {
    let esc = |s: &str| HtmlMarkers.escape(s).into_owned();
    if !info.is_empty() {
        writeln!(out, "<table class=\"table label-value-table\">")?;
        for row in info {
            writeln!(out, "  <tr><td>{}:</td><td>{}</td></tr>", esc(row.label), esc(&row.value))?;
        }
        writeln!(out, "</table>")?;
    }
    for (i, card) in cards.iter().enumerate() {
        writeln!(out, "<div id=\"template-{}\" class=\"card border-info\">", i + 1)?;
        writeln!(out, "  <h3>{}</h3>", esc(&card.title))?;
        writeln!(out, "  <table style=\"width: 100%;table-layout: fixed\">")?;
        writeln!(out, "    <tr>")?;
        writeln!(
            out,
            "      <td class=\"oldValue\"><pre class=\"text-danger\" style=\"white-space: pre-wrap;word-break: break-all;\">{}</pre></td>",
            card.old_text
        )?;
        writeln!(
            out,
            "      <td class=\"newValue\"><pre class=\"text-success\" style=\"white-space: pre-wrap;word-break: break-all;\">{}</pre></td>",
            card.new_text
        )?;
        writeln!(out, "    </tr>")?;
        writeln!(out, "  </table>")?;
        writeln!(out, "</div>")?;
    }
    Ok(())
}

fn write_markdown(out: &mut String, info: &[InfoRow], cards: &[RenderedCard]) -> std::fmt::Result {
    let esc = |s: &str| MarkdownMarkers.escape(s).into_owned();
    for row in info {
        writeln!(out, "- **{}:** {}", row.label, esc(&row.value))?;
    }
    if !info.is_empty() {
        writeln!(out)?;
    }
    for card in cards {
        writeln!(out, "### {}", esc(&card.title))?;
        writeln!(out)?;
        writeln!(out, "Old:")?;
        writeln!(out)?;
        writeln!(out, "{}", card.old_text)?;
        writeln!(out)?;
        writeln!(out, "New:")?;
        writeln!(out)?;
        writeln!(out, "{}", card.new_text)?;
        writeln!(out)?;
    }
    Ok(())
}
