// src/ui/sidebar.rs
use eframe::egui;

use crate::analysis::AnalysisMode;
use crate::analysis::filter::{ALL_UFS, WORLD};
use crate::state::{AppState, FIRST_YEAR};

pub fn show_sidebar(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Filtros da Análise");
    ui.add_space(8.0);

    let current_year = state.current_year;
    let mut run_clicked = false;

    {
        let AppState { ref mut sidebar, ref store, .. } = *state;

        ui.label("1. Tipo de Análise:");
        ui.radio_value(&mut sidebar.mode, AnalysisMode::Export, "Exportação");
        ui.radio_value(&mut sidebar.mode, AnalysisMode::Import, "Importação");
        ui.radio_value(&mut sidebar.mode, AnalysisMode::Balance, "Saldo Comercial");

        if sidebar.mode == AnalysisMode::Export {
            ui.separator();
            ui.checkbox(&mut sidebar.monitor, "Ativar Monitor de Tarifados");
        }

        ui.separator();
        ui.label(egui::RichText::new("Período da Análise").strong());
        egui::Grid::new("period_grid")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label("Ano Início");
                ui.add(egui::DragValue::new(&mut sidebar.start_year).clamp_range(FIRST_YEAR..=current_year));
                ui.end_row();
                ui.label("Mês Início");
                month_combo(ui, "start_month", &mut sidebar.start_month);
                ui.end_row();
                ui.label("Ano Fim");
                ui.add(egui::DragValue::new(&mut sidebar.end_year).clamp_range(FIRST_YEAR..=current_year));
                ui.end_row();
                ui.label("Mês Fim");
                month_combo(ui, "end_month", &mut sidebar.end_month);
                ui.end_row();
            });

        ui.separator();
        egui::ComboBox::from_label("País Parceiro")
            .selected_text(sidebar.country.clone())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut sidebar.country, WORLD.to_string(), WORLD);
                for name in &store.tables.country_names {
                    ui.selectable_value(&mut sidebar.country, name.clone(), name);
                }
            });
        egui::ComboBox::from_label("UF de Origem/Destino")
            .selected_text(sidebar.uf.clone())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut sidebar.uf, ALL_UFS.to_string(), ALL_UFS);
                for uf in &store.tables.uf_abbrs {
                    ui.selectable_value(&mut sidebar.uf, uf.clone(), uf);
                }
            });

        ui.separator();
        ui.label(egui::RichText::new("Filtro de Produtos (Opcional)").strong());
        ui.label("Cole uma lista de NCMs (vírgula ou quebra de linha):");
        ui.add(
            egui::TextEdit::multiline(&mut sidebar.ncm_text)
                .desired_rows(5)
                .hint_text("1001, 2709\n8471"),
        );

        ui.add_space(12.0);
        if ui
            .add_sized(
                [ui.available_width(), 32.0],
                egui::Button::new(egui::RichText::new("Analisar Período").strong()),
            )
            .clicked()
        {
            run_clicked = true;
        }
    }

    if run_clicked {
        state.trigger_analysis();
    }
}

fn month_combo(ui: &mut egui::Ui, id: &str, month: &mut u32) {
    egui::ComboBox::from_id_source(id)
        .selected_text(format!("{:02}", month))
        .show_ui(ui, |ui| {
            for m in 1..=12 {
                ui.selectable_value(month, m, format!("{:02}", m));
            }
        });
}
