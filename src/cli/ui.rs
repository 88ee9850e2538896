use crate::core::entry::EntryKind;
use crate::core::theme::Theme;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    Positive,
    Negative,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::Positive => style(text).green().bold(),
        StyleType::Negative => style(text).red().bold(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str, theme: Theme) -> Cell {
    let color = match theme {
        Theme::Light => Color::DarkBlue,
        Theme::Dark => Color::Cyan,
    };
    Cell::new(text).fg(color).add_attribute(Attribute::Bold)
}

/// Right-aligned amount, coloured by entry kind.
pub fn amount_cell(amount: f64, kind: EntryKind, theme: Theme) -> Cell {
    let color = match (kind, theme) {
        (EntryKind::Income, Theme::Light) => Color::DarkGreen,
        (EntryKind::Income, Theme::Dark) => Color::Green,
        (EntryKind::Expense, Theme::Light) => Color::DarkRed,
        (EntryKind::Expense, Theme::Dark) => Color::Red,
    };
    let text = match kind {
        EntryKind::Income => format!("+{amount:.2}"),
        EntryKind::Expense => format!("-{amount:.2}"),
    };
    Cell::new(text).fg(color).set_alignment(CellAlignment::Right)
}

/// Right-aligned plain number.
pub fn number_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

/// Creates a spinner for work of unknown length.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}
