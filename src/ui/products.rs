// src/ui/products.rs
use eframe::egui;

use crate::analysis::AnalysisResult;
use crate::analysis::indicators::{product_indicators, ProductIndicator};
use crate::ui::{format_usd, truncate_label};

/// Reference behavior shows the ten largest products by selection value.
const TOP_PRODUCTS: usize = 10;

pub fn show_products(ui: &mut egui::Ui, result: &AnalysisResult) {
    let indicators = product_indicators(result.selection(), result.world.as_deref());
    if indicators.is_empty() {
        ui.label("Nenhum dado para exibir nesta aba.");
        return;
    }
    let top: Vec<&ProductIndicator> = indicators.iter().take(TOP_PRODUCTS).collect();

    ui.heading("Análise Detalhada por Produto");
    ui.collapsing("O que estes indicadores significam?", |ui| {
        ui.label(
            "Share na Pauta: mede a importância de cada produto no total \
             comercializado com o país parceiro selecionado.",
        );
        ui.label(
            "Coeficiente de Concentração: mede o quanto do fluxo mundial de cada \
             produto é destinado ao país parceiro selecionado.",
        );
    });

    ui.add_space(8.0);
    ui.label(
        egui::RichText::new(format!(
            "Share na Pauta Brasil-{} (Top {} Produtos)",
            result.country_label,
            top.len()
        ))
        .strong(),
    );
    indicator_bars(ui, "share_chart", &top, |i| i.share);
    indicator_legend(ui, &top, |i| format!("{:.2}%", i.share));

    if top.iter().any(|i| i.concentration.is_some()) {
        ui.add_space(12.0);
        ui.separator();
        ui.label(
            egui::RichText::new(format!(
                "Coeficiente de Concentração Brasil-{} (Top {})",
                result.country_label,
                top.len()
            ))
            .strong(),
        );
        indicator_bars(ui, "concentration_chart", &top, |i| i.concentration.unwrap_or(0.0));
        indicator_legend(ui, &top, |i| format!("{:.2}%", i.concentration.unwrap_or(0.0)));
    }
}

/// Horizontal bars, largest product on top, bar length in percent.
fn indicator_bars(
    ui: &mut egui::Ui,
    id: &str,
    top: &[&ProductIndicator],
    value: impl Fn(&ProductIndicator) -> f64,
) {
    let bars: Vec<egui_plot::Bar> = top
        .iter()
        .enumerate()
        .map(|(i, indicator)| {
            egui_plot::Bar::new((top.len() - i) as f64, value(*indicator))
                .name(truncate_label(&indicator.product, 50))
                .width(0.6)
                .fill(egui::Color32::from_rgb(100, 150, 255))
        })
        .collect();

    egui_plot::Plot::new(id.to_string())
        .height(220.0)
        .allow_zoom(false)
        .allow_drag(false)
        .show_axes([true, false])
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(egui_plot::BarChart::new(bars).horizontal());
        });
}

fn indicator_legend(
    ui: &mut egui::Ui,
    top: &[&ProductIndicator],
    value: impl Fn(&ProductIndicator) -> String,
) {
    for (i, indicator) in top.iter().enumerate() {
        ui.label(format!(
            "{}. {} — {} ({})",
            i + 1,
            truncate_label(&indicator.product, 70),
            value(*indicator),
            format_usd(indicator.total_fob),
        ));
    }
}
