//! View building for editor frontends.
//!
//! A [`Renderer`] turns store state into whatever a frontend displays; the
//! session calls it after every mutation so the caller always holds a view
//! of the current state. Layout math (widths, truncation, padding) stays
//! here because it needs Unicode-aware processing.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::{AccountFilter, FixedText, Record, Signature};

/// Widest a name column will grow before truncation.
const NAME_WIDTH: usize = 40;

/// Context handed to the editor view: everything a form needs beyond the
/// record itself.
#[derive(Debug, Clone, Copy)]
pub struct EditorContext<'a> {
    /// Known account names for the filter selector, in configured order.
    pub accounts: &'a [String],
}

/// Builds frontend views of store state.
pub trait Renderer<R: Record> {
    type View;

    /// The record list in display order.
    fn render_list(&mut self, records: &[R]) -> Self::View;

    /// An editing form over one record (the open draft's working copy).
    fn render_editor(&mut self, record: &R, context: &EditorContext<'_>) -> Self::View;
}

/// Plain-text renderer used by the CLI and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl PlainRenderer {
    pub fn new() -> Self {
        PlainRenderer
    }
}

impl Renderer<Signature> for PlainRenderer {
    type View = String;

    fn render_list(&mut self, records: &[Signature]) -> String {
        if records.is_empty() {
            return "No signatures.\n".to_string();
        }
        let name_width = column_width(records.iter().map(|s| s.name.as_str()));
        let filters: Vec<String> = records.iter().map(|s| s.account.to_string()).collect();
        let filter_width = column_width(filters.iter().map(|f| f.as_str()));

        let mut out = String::new();
        for (position, sig) in records.iter().enumerate() {
            let name = pad_to_width(&sig.name, name_width);
            let filter = pad_to_width(&filters[position], filter_width);
            let marker = if sig.is_default { "  default" } else { "" };
            let line = format!("{:>3}. {name}  {filter}{marker}", position + 1);
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }

    fn render_editor(&mut self, record: &Signature, context: &EditorContext<'_>) -> String {
        let mut out = String::new();
        out.push_str(&format!("Name:    {}\n", record.name));
        let filter = match &record.account {
            AccountFilter::Any => "(any)".to_string(),
            other => other.to_string(),
        };
        out.push_str(&format!("Account: {filter}\n"));
        out.push_str(&format!(
            "Default: {}\n",
            if record.is_default { "yes" } else { "no" }
        ));
        out.push_str("Body:\n");
        out.push_str(&record.body);
        if !record.body.is_empty() && !record.body.ends_with('\n') {
            out.push('\n');
        }
        if !context.accounts.is_empty() {
            out.push_str(&format!("\nAccounts: {}\n", context.accounts.join(", ")));
        }
        out
    }
}

impl Renderer<FixedText> for PlainRenderer {
    type View = String;

    fn render_list(&mut self, records: &[FixedText]) -> String {
        if records.is_empty() {
            return "No texts.\n".to_string();
        }
        let mut out = String::new();
        for (position, text) in records.iter().enumerate() {
            let name = truncate_to_width(&text.name, NAME_WIDTH);
            out.push_str(&format!("{:>3}. {name}\n", position + 1));
        }
        out
    }

    fn render_editor(&mut self, record: &FixedText, _context: &EditorContext<'_>) -> String {
        let mut out = String::new();
        out.push_str(&format!("Name: {}\n", record.name));
        out.push_str("Body:\n");
        out.push_str(&record.body);
        if !record.body.is_empty() && !record.body.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

/// Display width of the widest cell, capped at [`NAME_WIDTH`].
fn column_width<'a>(cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(|c| c.width()).max().unwrap_or(0).min(NAME_WIDTH)
}

fn pad_to_width(s: &str, width: usize) -> String {
    let cell = truncate_to_width(s, width);
    let padding = width.saturating_sub(cell.width());
    format!("{cell}{}", " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            result.push('…');
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}
