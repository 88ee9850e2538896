use super::ui;
use crate::core::budget::Budget;
use crate::core::currency::{RateTable, convert};
use crate::core::theme::Theme;
use anyhow::Result;
use comfy_table::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeChange {
    Set(Theme),
    Toggle,
}

/// Shows or changes the display currency.
pub fn currency(budget: &mut Budget, code: Option<&str>) -> Result<()> {
    if let Some(code) = code {
        let wanted = code.trim().to_uppercase();
        let known = budget.rates().current().rate(&wanted).is_some()
            || budget.rates().fallback_table().rate(&wanted).is_some();
        budget.set_display_currency(code);
        if !known {
            println!(
                "{}",
                ui::style_text(
                    &format!(
                        "{} is not a known currency; amounts will be shown unconverted.",
                        budget.display_currency()
                    ),
                    ui::StyleType::Subtle
                )
            );
        }
    }
    println!(
        "Display currency: {}",
        ui::style_text(budget.display_currency(), ui::StyleType::TotalLabel)
    );
    Ok(())
}

pub fn theme(budget: &mut Budget, change: Option<ThemeChange>) -> Result<()> {
    match change {
        Some(ThemeChange::Set(theme)) => budget.set_theme(theme),
        Some(ThemeChange::Toggle) => {
            budget.toggle_theme();
        }
        None => {}
    }
    println!(
        "Dark mode: {}",
        ui::style_text(budget.theme().as_flag(), ui::StyleType::TotalLabel)
    );
    Ok(())
}

/// Renders one unit of the display currency in each known currency.
pub fn render_rates(table: &RateTable, display_currency: &str, theme: Theme) -> String {
    if table.is_empty() {
        return ui::style_text("No exchange rates loaded.", ui::StyleType::Subtle);
    }

    let mut codes: Vec<&String> = table.rates.keys().collect();
    codes.sort();

    let mut out = ui::new_styled_table();
    out.set_header(vec![
        ui::header_cell("Currency", theme),
        ui::header_cell(&format!("Rate (vs {})", table.base), theme),
        ui::header_cell(&format!("1 {display_currency} ="), theme),
    ]);
    for code in codes {
        let rate = table.rates[code];
        out.add_row(vec![
            Cell::new(code),
            Cell::new(format!("{rate:.4}")),
            Cell::new(format!(
                "{:.4} {code}",
                convert(1.0, display_currency, code, table)
            )),
        ]);
    }
    out.to_string()
}

pub fn rates(budget: &Budget) -> Result<()> {
    println!(
        "{}",
        render_rates(
            &budget.rates().current(),
            budget.display_currency(),
            budget.theme()
        )
    );
    Ok(())
}
