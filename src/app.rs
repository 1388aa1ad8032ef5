use eframe::egui::{self, ScrollArea, Ui};

use crate::callbacks::OutputSignal;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: dataset summary ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Central panel: controls and charts, top to bottom ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    panels::header(ui);

                    panels::site_dropdown(ui, &mut self.state);
                    ui.add_space(12.0);

                    plot::chart(ui, self.state.output(OutputSignal::SuccessPieChart));
                    ui.add_space(12.0);

                    panels::payload_slider(ui, &mut self.state);

                    plot::chart(
                        ui,
                        self.state.output(OutputSignal::SuccessPayloadScatterChart),
                    );
                });
        });

        // Widgets drawn above already show the new inputs; redraw so the
        // charts catch up in the next frame.
        if self.state.refresh() {
            ctx.request_repaint();
        }
    }
}
