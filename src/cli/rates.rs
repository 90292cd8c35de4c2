use super::ui;
use crate::core::RateTable;
use comfy_table::Cell;

/// Renders every rate of a snapshot, one row per currency.
pub fn display_rates(table: &RateTable) -> String {
    let base = table.base();
    let mut rates_table = ui::new_styled_table();
    rates_table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Symbol"),
        ui::header_cell(&format!("Per 1 {base}")),
        ui::header_cell(&format!("{base} per unit")),
    ]);

    for (code, rate) in table.iter() {
        rates_table.add_row(vec![
            Cell::new(code.to_string()),
            Cell::new(code.symbol().unwrap_or("")),
            ui::number_cell(ui::format_rate(rate)),
            ui::number_cell(ui::format_rate(1.0 / rate)),
        ]);
    }

    let title = match table.as_of() {
        Some(date) => format!("Exchange rates for {base} as of {date}"),
        None => format!("Exchange rates for {base}"),
    };

    format!(
        "{}\n\n{}\n\n{}",
        ui::style_text(&title, ui::StyleType::Title),
        rates_table,
        ui::style_text(
            &format!("{} currencies", table.len()),
            ui::StyleType::Subtle
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CurrencyCode;
    use chrono::NaiveDate;

    #[test]
    fn test_display_rates() {
        let table = RateTable::new(
            CurrencyCode::USD,
            [
                (CurrencyCode::USD, 1.0),
                (CurrencyCode::INR, 83.0),
                (CurrencyCode::EUR, 0.92),
            ],
        )
        .unwrap()
        .with_as_of(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

        let output = console::strip_ansi_codes(&display_rates(&table)).to_string();
        assert!(output.contains("Exchange rates for USD as of 2024-01-02"));
        assert!(output.contains("83.0000"));
        assert!(output.contains("0.920000"));
        assert!(output.contains("₹"));
        assert!(output.contains("3 currencies"));

        let eur = output.find("EUR").unwrap();
        let inr = output.find("INR").unwrap();
        assert!(eur < inr, "rows should be sorted by code");
    }
}
