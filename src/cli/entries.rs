use super::ui;
use crate::core::budget::Budget;
use crate::core::currency::convert;
use crate::core::entry::{EntryId, EntryKind};
use crate::core::form::Draft;
use crate::core::view::Filter;
use anyhow::Result;
use chrono::Utc;
use comfy_table::Cell;

#[derive(Debug, Clone)]
pub struct AddArgs {
    pub kind: EntryKind,
    pub label: String,
    pub amount: String,
    pub category: String,
    pub currency: Option<String>,
}

/// Fields left as `None` keep the entry's current value.
#[derive(Debug, Clone, Default)]
pub struct EditArgs {
    pub id: EntryId,
    pub kind: Option<EntryKind>,
    pub label: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub currency: Option<String>,
}

/// Creates an entry. An invalid draft is dropped without complaint and `None`
/// comes back.
pub fn add(budget: &mut Budget, args: AddArgs) -> Option<EntryId> {
    budget.cancel_edit();
    budget.stage(Draft {
        kind: args.kind,
        label: args.label,
        amount: args.amount,
        category: args.category,
        currency: args.currency,
    });
    budget.submit(Utc::now())
}

/// Edits an entry in place. `None` when the id is unknown or the result
/// doesn't validate.
pub fn edit(budget: &mut Budget, args: EditArgs) -> Option<EntryId> {
    if !budget.begin_edit(args.id) {
        return None;
    }

    let mut draft = budget.draft().clone();
    if let Some(kind) = args.kind {
        draft.kind = kind;
    }
    if let Some(label) = args.label {
        draft.label = label;
    }
    if let Some(amount) = args.amount {
        draft.amount = amount;
    }
    if let Some(category) = args.category {
        draft.category = category;
    }
    if let Some(currency) = args.currency {
        draft.currency = Some(currency);
    }
    budget.stage(draft);

    let result = budget.submit(Utc::now());
    if result.is_none() {
        budget.cancel_edit();
    }
    result
}

/// Deletes `id` once `confirm` agrees. Returns whether anything was removed.
pub fn delete(budget: &mut Budget, id: EntryId, confirm: impl FnOnce(&str) -> bool) -> bool {
    let Some(entry) = budget.request_delete(id) else {
        return false;
    };
    let prompt = format!("Delete \"{}\"?", entry.label);
    if confirm(&prompt) {
        budget.confirm_delete().is_some()
    } else {
        budget.cancel_delete();
        false
    }
}

/// Asks on the terminal; anything but y/yes is a no.
pub fn confirm_on_terminal(prompt: &str) -> bool {
    let term = console::Term::stderr();
    if term.write_str(&format!("{prompt} [y/N] ")).is_err() {
        return false;
    }
    match term.read_line() {
        Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

/// Renders the visible entries, newest first, with amounts also shown in the
/// display currency.
pub fn render_list(budget: &Budget) -> String {
    let theme = budget.theme();
    let display_currency = budget.display_currency();
    let rates = budget.rates().current();
    let visible = budget.visible();

    if visible.is_empty() {
        return ui::style_text(
            &format!("No entries to show (filter: {}).", budget.filter()),
            ui::StyleType::Subtle,
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID", theme),
        ui::header_cell("Date", theme),
        ui::header_cell("Type", theme),
        ui::header_cell("Label", theme),
        ui::header_cell("Category", theme),
        ui::header_cell("Amount", theme),
        ui::header_cell(&format!("Amount ({display_currency})"), theme),
    ]);

    for entry in &visible {
        let currency = entry.currency_or(display_currency);
        let converted = convert(entry.amount, currency, display_currency, &rates);
        table.add_row(vec![
            Cell::new(entry.id),
            Cell::new(entry.date.format("%Y-%m-%d %H:%M")),
            Cell::new(entry.kind),
            Cell::new(&entry.label),
            Cell::new(entry.category),
            Cell::new(format!("{:.2} {currency}", entry.amount)),
            ui::amount_cell(converted, entry.kind, theme),
        ]);
    }

    let mut output = format!(
        "Entries ({}): {}\n\n",
        budget.filter(),
        ui::style_text(&visible.len().to_string(), ui::StyleType::TotalLabel)
    );
    output.push_str(&table.to_string());
    output
}

pub fn list(budget: &mut Budget, filter: Filter) -> Result<()> {
    budget.set_filter(filter);
    println!("{}", render_list(budget));
    Ok(())
}
