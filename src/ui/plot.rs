use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::callbacks::CallbackResult;
use crate::color::ColorMap;
use crate::figure::{Figure, PieFigure, ScatterFigure};

const CHART_HEIGHT: f32 = 340.0;

/// Largest arc drawn as a single polygon; egui fills polygons as convex.
const MAX_ARC: f64 = std::f64::consts::FRAC_PI_4;
const ARC_SEGMENTS_PER_RADIAN: f64 = 24.0;

// ---------------------------------------------------------------------------
// Chart dispatch
// ---------------------------------------------------------------------------

/// Render one chart output: a figure, a pending placeholder, or the error
/// the callback reported.
pub fn chart(ui: &mut Ui, output: Option<&CallbackResult>) {
    match output {
        Some(Ok(Figure::Pie(pie))) => pie_chart(ui, pie),
        Some(Ok(Figure::Scatter(scatter))) => scatter_chart(ui, scatter),
        Some(Err(e)) => {
            ui.colored_label(Color32::RED, format!("Error: {e}"));
        }
        None => {
            ui.label("…");
        }
    }
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

pub fn pie_chart(ui: &mut Ui, figure: &PieFigure) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(figure.title.as_str());
    });

    let wedges = figure.wedges();
    if wedges.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No launches to show");
        });
        return;
    }

    let colors = ColorMap::new(figure.slices.iter().map(|s| s.label.as_str()));

    Plot::new("success-pie-chart")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for wedge in &wedges {
                let color = colors.color_for(wedge.label);

                for (start, sweep) in arc_chunks(wedge.start, wedge.sweep) {
                    plot_ui.polygon(
                        Polygon::new(wedge_points(start, sweep))
                            .name(wedge.label)
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, color)),
                    );
                }

                let mid = wedge.start + wedge.sweep / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                    RichText::new(format!("{:.1}%", wedge.share * 100.0)).color(Color32::WHITE),
                ));
            }
        });
}

/// Split an arc into pieces no wider than [`MAX_ARC`].
fn arc_chunks(start: f64, sweep: f64) -> Vec<(f64, f64)> {
    let n = (sweep / MAX_ARC).ceil().max(1.0) as usize;
    let step = sweep / n as f64;
    (0..n).map(|i| (start + i as f64 * step, step)).collect()
}

/// Closed fan from the origin along the unit circle.
fn wedge_points(start: f64, sweep: f64) -> PlotPoints<'static> {
    let segments = ((sweep * ARC_SEGMENTS_PER_RADIAN).ceil() as usize).max(1);
    std::iter::once([0.0, 0.0])
        .chain((0..=segments).map(|i| {
            let a = start + sweep * i as f64 / segments as f64;
            [a.cos(), a.sin()]
        }))
        .collect()
}

// ---------------------------------------------------------------------------
// Scatter chart
// ---------------------------------------------------------------------------

pub fn scatter_chart(ui: &mut Ui, figure: &ScatterFigure) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(figure.title.as_str());
    });

    let colors = ColorMap::new(figure.series.iter().map(|s| s.name.as_str()));

    Plot::new("success-payload-scatter-chart")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label(figure.x_label.as_str())
        .y_axis_label(figure.y_label.as_str())
        .include_y(-0.25)
        .include_y(1.25)
        .include_x(0.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &figure.series {
                let points: PlotPoints = series.points.iter().copied().collect();
                plot_ui.points(
                    Points::new(points)
                        .name(series.name.as_str())
                        .color(colors.color_for(&series.name))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });
}
