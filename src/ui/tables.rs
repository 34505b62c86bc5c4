// src/ui/tables.rs
use eframe::egui;
use rfd::FileDialog;

use crate::analysis::AnalysisMode;
use crate::analysis::assemble::AssembledRecord;
use crate::analysis::balance::balance_by_product;
use crate::export;
use crate::state::AppState;
use crate::ui::{format_usd, truncate_label};

/// Rendering thousands of Grid rows every frame is pointless; the CSV export
/// always carries the full set.
const MAX_VISIBLE_ROWS: usize = 500;

pub fn show_tables_view(ui: &mut egui::Ui, state: &mut AppState) {
    let mut pending_error: Option<String> = None;

    if let Some(result) = state.result.as_ref() {
        ui.heading(format!("Tabela de Dados para: {}", result.mode.label()));
        ui.add_space(8.0);

        match result.mode {
            AnalysisMode::Export | AnalysisMode::Import => {
                let mut sorted: Vec<&AssembledRecord> = result.selection().iter().collect();
                if sorted.is_empty() {
                    ui.label("Nenhum dado para exibir.");
                } else {
                    sorted.sort_by(|a, b| {
                        b.fob.partial_cmp(&a.fob).unwrap_or(std::cmp::Ordering::Equal)
                    });

                    if ui.button("📥 Baixar dados como CSV").clicked() {
                        let default_name =
                            format!("dados_{}.csv", result.mode.label().to_lowercase());
                        let owned: Vec<AssembledRecord> =
                            sorted.iter().map(|r| (*r).clone()).collect();
                        pending_error = save_csv(&default_name, || export::records_csv(&owned));
                    }
                    ui.add_space(8.0);
                    record_grid(ui, &sorted);
                }
            }
            AnalysisMode::Balance => {
                let rows = balance_by_product(&result.export, &result.import);
                if rows.is_empty() {
                    ui.label("Nenhum dado para exibir.");
                } else {
                    if ui.button("📥 Baixar tabela consolidada").clicked() {
                        pending_error = save_csv("saldo_comercial_consolidado.csv", || {
                            export::balance_csv(&rows)
                        });
                    }
                    ui.add_space(8.0);
                    balance_grid(ui, &rows);
                }
            }
        }
    }

    if let Some(error) = pending_error {
        state.error_message = Some(error);
    }
}

/// Opens a save dialog and writes the serialized table. Returns an error
/// message for the modal, or None on success/cancel.
fn save_csv(default_name: &str, serialize: impl FnOnce() -> anyhow::Result<Vec<u8>>) -> Option<String> {
    let path = FileDialog::new()
        .add_filter("CSV", &["csv"])
        .set_file_name(default_name)
        .save_file()?;
    let result = serialize().and_then(|bytes| {
        std::fs::write(&path, bytes)
            .map_err(|e| anyhow::anyhow!("Falha ao salvar {}: {}", path.display(), e))
    });
    result.err().map(|e| e.to_string())
}

fn record_grid(ui: &mut egui::Ui, sorted: &[&AssembledRecord]) {
    if sorted.len() > MAX_VISIBLE_ROWS {
        ui.label(format!(
            "Exibindo os {} maiores registros de {}; o CSV contém todos.",
            MAX_VISIBLE_ROWS,
            sorted.len()
        ));
    }

    egui::ScrollArea::both().show(ui, |ui| {
        egui::Grid::new("records_grid")
            .striped(true)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                for header in ["Data", "CO_NCM", "Produto", "País", "UF", "Valor FOB (US$)", "Peso (KG)"] {
                    ui.label(egui::RichText::new(header).strong());
                }
                ui.end_row();

                for record in sorted.iter().take(MAX_VISIBLE_ROWS) {
                    ui.label(record.date.format("%Y-%m-%d").to_string());
                    ui.label(&record.ncm);
                    ui.label(truncate_label(&record.product, 60));
                    ui.label(&record.country);
                    ui.label(&record.state);
                    ui.label(format_usd(record.fob));
                    ui.label(format!("{:.0}", record.kg));
                    ui.end_row();
                }
            });
    });
}

fn balance_grid(ui: &mut egui::Ui, rows: &[crate::analysis::balance::BalanceRow]) {
    egui::ScrollArea::both().show(ui, |ui| {
        egui::Grid::new("balance_grid")
            .striped(true)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                for header in ["CO_NCM", "Produto", "Exportação (US$)", "Importação (US$)", "Saldo (US$)"] {
                    ui.label(egui::RichText::new(header).strong());
                }
                ui.end_row();

                for row in rows.iter().take(MAX_VISIBLE_ROWS) {
                    ui.label(&row.ncm);
                    ui.label(truncate_label(&row.product, 60));
                    ui.label(format_usd(row.export));
                    ui.label(format_usd(row.import));
                    ui.label(format_usd(row.balance));
                    ui.end_row();
                }
            });
    });
}
