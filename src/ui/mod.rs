pub mod controls;

use crate::lifecycle::ControlCommand;
use crate::readouts::StatusReadouts;

/// Widget state for the control panel plus the commands its clicks produced.
/// Commands are drained by the host between display refreshes.
pub struct UiState {
    pub pause_checked: bool,
    pending: Vec<ControlCommand>,
}

impl UiState {
    pub fn new(paused: bool) -> Self {
        Self {
            pause_checked: paused,
            pending: Vec::new(),
        }
    }

    pub fn pause_toggled(&mut self) {
        self.pending.push(ControlCommand::SetPaused(self.pause_checked));
    }

    pub fn restart_clicked(&mut self) {
        self.pending.push(ControlCommand::Restart);
    }

    pub fn train_clicked(&mut self) {
        self.pending.push(ControlCommand::Train);
    }

    pub fn take_commands(&mut self) -> Vec<ControlCommand> {
        std::mem::take(&mut self.pending)
    }
}

/// Draw all egui UI panels.
pub fn draw_ui(ui_state: &mut UiState, readouts: &StatusReadouts) {
    egui_macroquad::ui(|ctx| {
        controls::draw_controls(ctx, ui_state, readouts);
    });

    egui_macroquad::draw();
}
