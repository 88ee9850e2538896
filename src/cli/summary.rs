use super::ui;
use crate::core::budget::Budget;
use crate::core::summary::Summary;
use crate::core::theme::Theme;
use anyhow::Result;
use comfy_table::Cell;

impl Summary {
    pub fn display_as_table(&self, theme: Theme) -> String {
        let currency = &self.currency;

        let mut output = format!(
            "Summary: {}\n\n",
            ui::style_text(
                &format!("{} entries", self.entry_count),
                ui::StyleType::Title
            )
        );

        if !self.by_category.is_empty() {
            let mut table = ui::new_styled_table();
            table.set_header(vec![
                ui::header_cell("Type", theme),
                ui::header_cell("Category", theme),
                ui::header_cell(&format!("Total ({currency})"), theme),
            ]);
            for ((kind, category), total) in &self.by_category {
                table.add_row(vec![
                    Cell::new(kind),
                    Cell::new(category),
                    ui::amount_cell(*total, *kind, theme),
                ]);
            }
            output.push_str(&table.to_string());
            output.push_str("\n\n");
        }

        let mut totals = ui::new_styled_table();
        totals.set_header(vec![
            ui::header_cell("Total Income", theme),
            ui::header_cell("Total Expenses", theme),
            ui::header_cell("Balance", theme),
        ]);
        totals.add_row(vec![
            ui::number_cell(self.total_income),
            ui::number_cell(self.total_expenses),
            ui::number_cell(self.balance),
        ]);
        output.push_str(&totals.to_string());

        let balance_style = if self.balance >= 0.0 {
            ui::StyleType::Positive
        } else {
            ui::StyleType::Negative
        };
        output.push_str(&format!(
            "\n\nBalance ({}): {}",
            ui::style_text(currency, ui::StyleType::TotalLabel),
            ui::style_text(&format!("{:.2}", self.balance), balance_style)
        ));

        output
    }
}

pub fn run(budget: &Budget) -> Result<()> {
    println!("{}", budget.summary().display_as_table(budget.theme()));
    Ok(())
}
