// src/ui/balance.rs
use eframe::egui;

use crate::analysis::AnalysisResult;
use crate::analysis::balance::{balance_by_product, balance_series, top_impact};
use crate::analysis::indicators::total_fob;
use crate::ui::{date_x, format_usd, truncate_label};

const TOP_IMPACT: usize = 15;

const EXPORT_COLOR: egui::Color32 = egui::Color32::from_rgb(60, 160, 60);
const IMPORT_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 70, 70);
const BALANCE_COLOR: egui::Color32 = egui::Color32::from_rgb(80, 110, 230);

pub fn show_balance(ui: &mut egui::Ui, result: &AnalysisResult) {
    ui.heading(format!("Visão Geral: Saldo Comercial com {}", result.country_label));
    ui.add_space(4.0);

    let export_total = total_fob(&result.export);
    let import_total = total_fob(&result.import);
    let balance_total = export_total - import_total;

    ui.horizontal(|ui| {
        metric(ui, "Exportação Total", format_usd(export_total), EXPORT_COLOR);
        ui.separator();
        metric(ui, "Importação Total", format_usd(import_total), IMPORT_COLOR);
        ui.separator();
        let (tag, color) = if balance_total >= 0.0 {
            ("Superávit", EXPORT_COLOR)
        } else {
            ("Déficit", IMPORT_COLOR)
        };
        metric(ui, "Saldo Comercial", format!("{} ({})", format_usd(balance_total), tag), color);
    });

    ui.add_space(8.0);
    ui.label(egui::RichText::new("Evolução Temporal - Exportação vs Importação").strong());
    series_plot(ui, result);

    ui.add_space(12.0);
    ui.separator();
    ui.label(
        egui::RichText::new(format!(
            "Saldo Comercial por Produto (Top {} com maior impacto)",
            TOP_IMPACT
        ))
        .strong(),
    );
    ui.label("Verde = Superávit, Vermelho = Déficit");
    product_plot(ui, result);
}

fn metric(ui: &mut egui::Ui, label: &str, value: String, color: egui::Color32) {
    ui.vertical(|ui| {
        ui.label(label);
        ui.colored_label(color, egui::RichText::new(value).strong());
    });
}

fn series_plot(ui: &mut egui::Ui, result: &AnalysisResult) {
    let series = balance_series(&result.export, &result.import);

    let to_points = |select: fn(&crate::analysis::balance::BalancePoint) -> f64| -> Vec<[f64; 2]> {
        series.iter().map(|p| [date_x(p.date), select(p)]).collect()
    };
    let export_points = to_points(|p| p.export);
    let import_points = to_points(|p| p.import);
    let balance_points = to_points(|p| p.balance);

    egui_plot::Plot::new("balance_series")
        .height(260.0)
        .allow_drag(false)
        .legend(egui_plot::Legend::default())
        .label_formatter(|name, point| {
            let year = point.x.floor();
            let month = ((point.x - year) * 12.0).round() as u32 + 1;
            format!("{}\n{}-{:02}: {}", name, year as i32, month, format_usd(point.y))
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                egui_plot::Line::new(export_points)
                    .name("Exportação")
                    .color(EXPORT_COLOR)
                    .width(2.0),
            );
            plot_ui.line(
                egui_plot::Line::new(import_points)
                    .name("Importação")
                    .color(IMPORT_COLOR)
                    .width(2.0),
            );
            plot_ui.line(
                egui_plot::Line::new(balance_points)
                    .name("Saldo")
                    .color(BALANCE_COLOR)
                    .width(3.0)
                    .style(egui_plot::LineStyle::dashed_loose()),
            );
        });
}

fn product_plot(ui: &mut egui::Ui, result: &AnalysisResult) {
    let rows = balance_by_product(&result.export, &result.import);
    let top = top_impact(&rows, TOP_IMPACT);
    if top.is_empty() {
        ui.label("Nenhum dado para exibir.");
        return;
    }

    let bars: Vec<egui_plot::Bar> = top
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let color = if row.balance >= 0.0 { EXPORT_COLOR } else { IMPORT_COLOR };
            egui_plot::Bar::new((i + 1) as f64, row.balance)
                .name(truncate_label(&row.product, 50))
                .width(0.6)
                .fill(color)
        })
        .collect();

    egui_plot::Plot::new("balance_by_product")
        .height(320.0)
        .allow_zoom(false)
        .allow_drag(false)
        .show_axes([true, false])
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(egui_plot::BarChart::new(bars).horizontal());
            // Zero line separating surplus from deficit.
            plot_ui.vline(egui_plot::VLine::new(0.0).color(egui::Color32::BLACK));
        });

    for row in top.iter().rev() {
        ui.label(format!(
            "{} — {} — Saldo: {}",
            row.ncm,
            truncate_label(&row.product, 60),
            format_usd(row.balance)
        ));
    }
}
