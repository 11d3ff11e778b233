use egui;

use super::UiState;
use crate::config;
use crate::readouts::StatusReadouts;

/// Fixed side panel: pause checkbox, restart and train buttons, readouts.
pub fn draw_controls(ctx: &egui::Context, ui_state: &mut UiState, readouts: &StatusReadouts) {
    egui::SidePanel::right("controls")
        .exact_width(config::CONTROL_PANEL_WIDTH)
        .resizable(false)
        .show(ctx, |ui| {
            ui.add_space(6.0);
            title_badge(ui, "FLOCKVIEW");
            ui.separator();

            if ui.checkbox(&mut ui_state.pause_checked, "Pause").changed() {
                ui_state.pause_toggled();
            }

            ui.horizontal(|ui| {
                if ui.button("Restart").clicked() {
                    ui_state.restart_clicked();
                }
                if ui.button("Next Generation").clicked() {
                    ui_state.train_clicked();
                }
            });

            ui.separator();
            readout(ui, &readouts.generation);
            readout(ui, &readouts.min_fitness);
            readout(ui, &readouts.max_fitness);
            readout(ui, &readouts.avg_fitness);
        });
}

fn title_badge(ui: &mut egui::Ui, label: &str) {
    let text = egui::RichText::new(label)
        .strong()
        .color(egui::Color32::from_rgb(190, 220, 255));
    ui.label(text);
}

fn readout(ui: &mut egui::Ui, text: &str) {
    ui.label(
        egui::RichText::new(text)
            .monospace()
            .color(egui::Color32::from_rgb(205, 215, 225)),
    );
}
