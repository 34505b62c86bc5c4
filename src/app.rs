// src/app.rs
use eframe::egui;

use crate::state::{AppState, Screen};
use crate::ui;

pub struct ComexApp {
    state: AppState,
}

impl ComexApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Dashboard de Análise COMEX | FACAMP");

            ui.separator();

            // Tab selection using buttons
            let tabs = [
                (Screen::Charts, "📊 Análise Gráfica"),
                (Screen::Tables, "📋 Tabelas Consolidadas"),
            ];
            for (screen, label) in tabs {
                if ui.selectable_label(self.state.current_screen == screen, label).clicked() {
                    self.state.current_screen = screen;
                }
            }
        });
    }
}

impl eframe::App for ComexApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("filter_panel")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                ui::sidebar::show_sidebar(ui, &mut self.state);
            });

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.show_header(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.result.is_none() {
                ui.label(
                    "Bem-vindo! Utilize os filtros na barra lateral e clique em \
                     'Analisar Período' para iniciar.",
                );
            } else {
                match self.state.current_screen {
                    Screen::Charts => ui::charts_view(ui, &mut self.state),
                    Screen::Tables => ui::tables::show_tables_view(ui, &mut self.state),
                }
            }
        });

        // Show error modal if needed
        let error_msg = self.state.error_message.clone();
        if let Some(error) = error_msg {
            egui::Window::new("Erro")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&error);
                    if ui.button("OK").clicked() {
                        self.state.error_message = None;
                    }
                });
        }
    }
}
