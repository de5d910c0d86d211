use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::config::DateFilterMode;
use crate::data::filter::DateFilter;
use crate::data::model::{LeadStyle, RouteType};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Only the widgets the view config enables
/// are shown.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Route Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            route_type_filter(ui, state);
            ui.separator();
            style_filter(ui, state);
            ui.separator();

            match state.config.date_filter {
                DateFilterMode::Range => {
                    date_range_filter(ui, state);
                    ui.separator();
                }
                DateFilterMode::Years => {
                    year_filter(ui, state);
                    ui.separator();
                }
                DateFilterMode::None => {}
            }

            if state.config.max_grade_selector {
                max_grade_filter(ui, state);
                ui.separator();
            }

            let mut include = state.criteria.pitches.includes_multipitch();
            if ui.checkbox(&mut include, "Include Multipitch Routes").changed() {
                state.set_include_multipitch(include);
            }
        });
}

fn route_type_filter(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Route type");
    for route_type in RouteType::ALL {
        let mut checked = state.criteria.route_types.contains(&route_type);
        if ui.checkbox(&mut checked, route_type.label()).changed() {
            state.toggle_route_type(route_type);
        }
    }
}

fn style_filter(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Lead style");
    for style in LeadStyle::ALL {
        let mut checked = state.criteria.styles.styles.contains(&style);
        if ui.checkbox(&mut checked, style.label()).changed() {
            state.toggle_style(style);
        }
    }
    let mut unknown = state.criteria.styles.include_unknown;
    if ui.checkbox(&mut unknown, LeadStyle::UNKNOWN_LABEL).changed() {
        state.toggle_unknown_style();
    }
}

fn date_range_filter(ui: &mut Ui, state: &mut AppState) {
    let DateFilter::Range { mut start, mut end } = state.criteria.dates.clone() else {
        return;
    };
    let earliest = state.config.date_bounds.earliest;
    let latest = state.config.date_bounds.latest_or_today();
    let mut changed = false;

    ui.strong("Date range");
    for (label, salt, bound, default) in [
        ("From", "date_start", &mut start, earliest),
        ("Until", "date_end", &mut end, latest),
    ] {
        ui.horizontal(|ui: &mut Ui| {
            let mut enabled = bound.is_some();
            if ui.checkbox(&mut enabled, label).changed() {
                *bound = enabled.then_some(default);
                changed = true;
            }
            if let Some(date) = bound.as_mut() {
                if ui.add(DatePickerButton::new(date).id_salt(salt)).changed() {
                    *date = (*date).max(earliest).min(latest);
                    changed = true;
                }
            }
        });
    }

    if changed {
        state.set_date_range(start, end);
    }
}

fn year_filter(ui: &mut Ui, state: &mut AppState) {
    let DateFilter::Years(selected) = &state.criteria.dates else {
        return;
    };
    let years = state
        .log
        .as_ref()
        .map(|log| log.years.clone())
        .unwrap_or_default();
    let n_selected = selected.len();
    let header = format!("Years  ({n_selected}/{})", years.len());

    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt("years")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            if years.is_empty() {
                ui.label("No dated ticks loaded.");
                return;
            }
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_years();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_years();
                }
            });
            for year in years {
                let mut checked = matches!(
                    &state.criteria.dates,
                    DateFilter::Years(sel) if sel.contains(&year)
                );
                if ui.checkbox(&mut checked, year.to_string()).changed() {
                    state.toggle_year(year);
                }
            }
        });
}

fn max_grade_filter(ui: &mut Ui, state: &mut AppState) {
    let bands = state.table.bands();
    let current = state
        .criteria
        .max_rating
        .and_then(|cutoff| state.table.band_with_cutoff(cutoff))
        .map(|b| b.label)
        .unwrap_or("none");

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Max grade:");
        egui::ComboBox::from_id_salt("max_grade")
            .selected_text(current)
            .show_ui(ui, |ui: &mut Ui| {
                for band in bands {
                    let selected = state.criteria.max_rating == Some(band.cutoff);
                    if ui.selectable_label(selected, band.label).clicked() {
                        state.set_max_rating(band.cutoff);
                    }
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.has_log(), egui::Button::new("Export pyramid…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
            if ui.add_enabled(state.has_log(), egui::Button::new("Clear")).clicked() {
                state.clear();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(log) = &state.log {
            ui.label(format!(
                "{} ticks loaded, {} matching, {} routes in pyramid",
                log.len(),
                state.matching,
                state.pyramid.total_routes()
            ));
        } else {
            ui.label("Upload your climbing ticks.csv to view your Route Pyramid!");
        }

        for msg in [&state.status_message, &state.pyramid_error]
            .into_iter()
            .flatten()
        {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::YELLOW
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open tick log")
        .add_filter("CSV", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export route pyramid")
        .set_file_name("pyramid.csv")
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = crate::export::export_pyramid(&path, &state.pyramid) {
            log::error!("Failed to export pyramid: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
