// src/ui/overview.rs
use eframe::egui;

use crate::analysis::AnalysisResult;
use crate::analysis::indicators::{monthly_totals, total_fob};
use crate::ui::{date_x, format_usd};

pub fn show_overview(ui: &mut egui::Ui, result: &AnalysisResult) {
    let records = result.selection();

    ui.heading(format!(
        "Visão Geral: {} para {}",
        result.mode.label(),
        result.country_label
    ));
    ui.add_space(4.0);
    ui.label(format!("Valor Total - {}", result.mode.label()));
    ui.label(egui::RichText::new(format_usd(total_fob(records))).heading().strong());

    ui.add_space(8.0);
    ui.label(egui::RichText::new("Evolução Mensal (Valor FOB US$)").strong());

    let series = monthly_totals(records);
    let points: Vec<[f64; 2]> = series
        .iter()
        .map(|(date, value)| [date_x(*date), *value])
        .collect();

    egui_plot::Plot::new("monthly_evolution")
        .height(240.0)
        .allow_drag(false)
        .label_formatter(|_name, point| {
            let year = point.x.floor();
            let month = ((point.x - year) * 12.0).round() as u32 + 1;
            format!("{}-{:02}\n{}", year as i32, month, format_usd(point.y))
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                egui_plot::Line::new(points)
                    .color(egui::Color32::from_rgb(100, 150, 255))
                    .width(2.0),
            );
        });
}
