// src/ui/mod.rs
use eframe::egui;

use crate::analysis::AnalysisMode;
use crate::state::AppState;

pub mod balance;
pub mod overview;
pub mod products;
pub mod sidebar;
pub mod tables;

pub fn charts_view(ui: &mut egui::Ui, state: &mut AppState) {
    let Some(result) = state.result.as_ref() else {
        return;
    };

    if let Some(outcome) = result.monitor {
        if outcome.applied {
            ui.colored_label(
                egui::Color32::DARK_GREEN,
                format!(
                    "Monitor de Tarifados ATIVO. Exibindo dados para {} de {} registros.",
                    outcome.rows_after, outcome.rows_before
                ),
            );
        } else {
            ui.colored_label(
                egui::Color32::GOLD,
                "Monitor de Tarifados está ativo, mas a lista de NCMs não pôde ser carregada.",
            );
        }
        ui.add_space(4.0);
    }

    if result.is_empty() {
        ui.label("Nenhum dado encontrado para os filtros selecionados.");
        return;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        match result.mode {
            AnalysisMode::Export | AnalysisMode::Import => {
                overview::show_overview(ui, result);
                ui.add_space(12.0);
                ui.separator();
                products::show_products(ui, result);
            }
            AnalysisMode::Balance => {
                balance::show_balance(ui, result);
            }
        }
    });
}

/// X coordinate for a calendar month: fractional year, so the axis stays
/// readable without a custom formatter.
pub(crate) fn date_x(date: chrono::NaiveDate) -> f64 {
    use chrono::Datelike;
    date.year() as f64 + date.month0() as f64 / 12.0
}

/// "1234567.891" -> "1,234,567.89".
pub(crate) fn format_usd(value: f64) -> String {
    let negative = value < 0.0;
    let cents = format!("{:.2}", value.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let mut grouped = String::new();
    for (i, c) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let whole: String = grouped.chars().rev().collect();
    format!("{}US$ {}.{}", if negative { "-" } else { "" }, whole, frac)
}

pub(crate) fn truncate_label(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let short: String = name.chars().take(max).collect();
        format!("{}…", short)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usd_formatting_groups_thousands() {
        assert_eq!(format_usd(0.0), "US$ 0.00");
        assert_eq!(format_usd(1234567.891), "US$ 1,234,567.89");
        assert_eq!(format_usd(-45000.5), "-US$ 45,000.50");
    }

    #[test]
    fn date_x_is_monotonic_across_year_boundary() {
        let dec = date_x(chrono::NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        let jan = date_x(chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(dec < jan);
    }
}
