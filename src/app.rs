use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CsvKmlApp {
    pub state: AppState,
}

impl CsvKmlApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for CsvKmlApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        panels::handle_dropped_files(ctx, &mut self.state);

        // ---- Top panel: toolbar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: table or drop hint ----
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        egui::CentralPanel::default().show(ctx, |ui| match &self.state.dataset {
            Some(ds) if !hovering => table::data_table(ui, ds),
            _ => panels::drop_hint(ui, hovering),
        });
    }
}
