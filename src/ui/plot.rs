use eframe::egui::{RichText, Ui};
use egui_plot::{uniform_grid_spacer, Bar, BarChart, Plot};

use crate::color::{demo_color, grade_gradient};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Route pyramid (central panel)
// ---------------------------------------------------------------------------

/// Render the pyramid as a centered horizontal funnel, hardest grade on top.
pub fn pyramid_plot(ui: &mut Ui, state: &AppState) {
    let pyramid = &state.pyramid;
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new(&pyramid.title).strong());
    });

    if pyramid.rows.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No grade bands at or below the selected maximum grade");
        });
        return;
    }

    let n = pyramid.rows.len();
    let colors = if state.has_log() {
        grade_gradient(n)
    } else {
        vec![demo_color(); n]
    };

    // Row 0 is the hardest band and sits on the highest y position.
    let bars: Vec<Bar> = pyramid
        .rows
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (row, color))| {
            let width = row.routes as f64;
            Bar::new((n - 1 - i) as f64, width)
                .base_offset(-width / 2.0)
                .name(&row.grade)
                .fill(color)
                .width(0.8)
        })
        .collect();

    let labels: Vec<String> = pyramid.rows.iter().rev().map(|r| r.grade.clone()).collect();
    let half_span = (pyramid.max_count().max(1) as f64) / 2.0;

    let chart = BarChart::new(bars)
        .horizontal()
        .name("Routes")
        .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
            format!("{}: {} routes", bar.name, bar.value)
        }));

    Plot::new("route_pyramid")
        .show_axes([false, true])
        .show_grid([false, false])
        .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 1.0, 1.0]))
        .y_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .include_x(-half_span * 1.05)
        .include_x(half_span * 1.05)
        .include_y(-0.6)
        .include_y(n as f64 - 0.4)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}
