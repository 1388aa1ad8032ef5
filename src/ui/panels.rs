use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::options::matching_options;
use crate::state::AppState;

const TITLE: &str = "SpaceX Launch Records Dashboard";
const TITLE_COLOR: Color32 = Color32::from_rgb(0x50, 0x3D, 0x36);

// ---------------------------------------------------------------------------
// Page header
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(TITLE).size(40.0).color(TITLE_COLOR).strong());
    });
    ui.add_space(8.0);
}

// ---------------------------------------------------------------------------
// Launch-site dropdown
// ---------------------------------------------------------------------------

/// Searchable launch-site selector. Defaults to "All Sites".
pub fn site_dropdown(ui: &mut Ui, state: &mut AppState) {
    let selected_text = state.selected_label().to_string();
    let current = state.inputs.site.value().to_string();

    // Clone what we need so we can mutate state inside the popup.
    let options = state.options.clone();

    // Clicking the search box must not close the popup.
    let popup = egui::ComboBox::from_id_salt("site-dropdown")
        .selected_text(selected_text)
        .width(ui.available_width())
        .close_behavior(egui::PopupCloseBehavior::CloseOnClickOutside)
        .show_ui(ui, |ui: &mut Ui| {
            ui.add(
                egui::TextEdit::singleline(&mut state.site_search)
                    .hint_text("Select a Launch Site"),
            );
            ui.separator();

            let mut chosen = None;
            for opt in matching_options(&options, &state.site_search) {
                if ui
                    .selectable_label(current == opt.value, opt.label.as_str())
                    .clicked()
                {
                    chosen = Some(opt.value.clone());
                }
            }
            if let Some(value) = chosen {
                state.choose_site(&value);
                ui.close_menu();
            }
        });

    if popup.inner.is_none() && !state.site_search.is_empty() {
        state.reset_site_search();
    }
}

// ---------------------------------------------------------------------------
// Payload range slider
// ---------------------------------------------------------------------------

/// Two handles snapping to the slider step, lower one never above the upper.
pub fn payload_slider(ui: &mut Ui, state: &mut AppState) {
    ui.label("Payload range (Kg):");

    let (lo, hi) = state.slider_bounds;
    let step = state.slider_step;
    let range = &mut state.inputs.payload;

    ui.horizontal(|ui: &mut Ui| {
        ui.add(
            egui::Slider::new(&mut range.min, lo..=hi)
                .step_by(step)
                .text("min"),
        );
        ui.add(
            egui::Slider::new(&mut range.max, lo..=hi)
                .step_by(step)
                .text("max"),
        );
    });

    state.clamp_payload();
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the status bar above the dashboard.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!(
            "{} launches from {} sites",
            state.table.len(),
            state.table.sites().len()
        ));

        ui.separator();

        ui.label(format!(
            "{} · {}",
            state.selected_label(),
            state.inputs.payload
        ));
    });
}
