use super::ui;
use crate::core::{CurrencyCode, HistoryPeriod, HistoryProvider, RateHistory};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use comfy_table::Cell;

const MAX_ROWS: usize = 20;

/// Fetches the daily rates of `from`/`to` for the period ending on `end`.
pub async fn fetch<P: HistoryProvider + ?Sized>(
    provider: &P,
    from: CurrencyCode,
    to: CurrencyCode,
    period: HistoryPeriod,
    end: NaiveDate,
) -> Result<RateHistory> {
    if from == to {
        bail!("History needs two different currencies, got {from} twice");
    }
    provider
        .fetch_history(from, to, period.start_from(end), end)
        .await
}

/// Picks at most `max` points spread evenly over the series, always keeping
/// the first and last ones.
pub fn sample_points(points: &[(NaiveDate, f64)], max: usize) -> Vec<(NaiveDate, f64)> {
    if points.len() <= max || max < 2 {
        return points.to_vec();
    }
    let step = (points.len() - 1) as f64 / (max - 1) as f64;
    (0..max)
        .map(|i| points[((i as f64) * step).round() as usize])
        .collect()
}

pub fn display_history(history: &RateHistory, period: HistoryPeriod) -> String {
    let RateHistory { from, to, .. } = history;
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell(&format!("{from} → {to}")),
        ui::header_cell("Change"),
    ]);

    let start_rate = history.first().map(|(_, rate)| rate);
    for (date, rate) in sample_points(&history.points, MAX_ROWS) {
        let change = start_rate
            .filter(|start| *start > 0.0)
            .map(|start| ((rate - start) / start) * 100.0);
        table.add_row(vec![
            Cell::new(date.to_string()),
            ui::number_cell(ui::format_rate(rate)),
            change.map_or_else(|| Cell::new(""), ui::change_cell),
        ]);
    }

    let title = format!("{from} to {to} over {period}");
    let summary = match history.change_pct() {
        Some(change) => format!("Change over {period}: {change:+.2}%"),
        None => format!("Not enough data to compute change over {period}"),
    };

    format!(
        "{}\n\n{}\n\n{}",
        ui::style_text(&title, ui::StyleType::Title),
        table,
        ui::style_text(&summary, ui::StyleType::TotalLabel)
    )
}
