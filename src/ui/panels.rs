use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::config::{APP_TITLE, STATIONS, X_VARIABLES, Y_VARIABLES};
use crate::data::model::{Observation, Variable};
use crate::state::AppState;
use crate::ui::plot;

const INTRO: &str = "This dashboard explores air quality at the Guanyuan, Tiantan and \
Dingling monitoring stations between 2013 and 2017: PM2.5 levels, the distribution of \
air-quality categories, and how humidity and the seasons relate to pollution. Each \
section comes with a short explanation of the pattern it shows.";

const SEASONAL_TEXT: &str = "Average PM2.5 for every season present at the selected \
station. PM2.5 are fine particles smaller than 2.5 micrometres that reach deep into the \
lungs; higher values mean poorer air.";

const CATEGORY_TEXT: &str = "How often each air-quality category occurs. Categories come \
from PM2.5 thresholds applied during preprocessing: the higher the band, the more \
polluted the air.";

const TREND_TEXT: &str = "The yearly average of the numeric air-quality level, showing \
whether air quality improved or worsened over time.";

const SEASON_SCATTER_TEXT: &str = "Dew point (DEWP), the temperature at which air becomes \
saturated, against PM2.5, coloured by season. It shows whether the humidity/pollution \
relationship changes from one season to the next.";

// ---------------------------------------------------------------------------
// Left side panel – dashboard controls
// ---------------------------------------------------------------------------

/// Render the settings panel. Edits a copy of the controls and hands it to
/// the state, which rebuilds the charts when anything differs.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Settings");
    ui.separator();

    let mut controls = state.controls().clone();

    ui.strong("Station");
    egui::ComboBox::from_id_salt("station")
        .selected_text(controls.station.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for station in STATIONS {
                ui.selectable_value(&mut controls.station, station.to_string(), station);
            }
        });
    ui.add_space(8.0);

    ui.heading("Variable correlation");
    ui.separator();
    variable_selector(ui, "X variable", "x_variable", &mut controls.x, &X_VARIABLES);
    variable_selector(ui, "Y variable", "y_variable", &mut controls.y, &Y_VARIABLES);
    ui.add_space(8.0);

    ui.checkbox(&mut controls.show_raw_data, "Show raw data");

    state.set_controls(controls);
}

fn variable_selector(ui: &mut Ui, label: &str, id: &str, current: &mut Variable, choices: &[Variable]) {
    ui.strong(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.column())
        .show_ui(ui, |ui: &mut Ui| {
            for &choice in choices {
                ui.selectable_value(current, choice, choice.column());
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / status bar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
        ui.menu_button("View", |ui: &mut Ui| {
            let mut controls = state.controls().clone();
            if ui.checkbox(&mut controls.show_raw_data, "Show raw data").changed() {
                state.set_controls(controls);
                ui.close_menu();
            }
        });

        ui.separator();

        let view = state.view();
        ui.label(format!(
            "{} observations loaded from {}, {} for {}",
            state.dataset.len(),
            state.dataset.source.display(),
            view.visible_indices.len(),
            view.station
        ));
    });
}

// ---------------------------------------------------------------------------
// Central panel – page text and the five chart sections
// ---------------------------------------------------------------------------

fn section(ui: &mut Ui, heading: String, text: &str) {
    ui.add_space(12.0);
    ui.separator();
    ui.heading(heading);
    ui.label(text);
    ui.add_space(4.0);
}

/// Render the dashboard page.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let view = state.view();
    let controls = state.controls();
    let station = &view.station;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new(APP_TITLE).size(26.0));
            ui.label(
                RichText::new("Air-quality patterns in Guanyuan, Tiantan and Dingling").strong(),
            );
            ui.label(INTRO);

            if controls.show_raw_data {
                ui.add_space(12.0);
                ui.heading(format!("Dataset for {station}"));
                raw_data_table(ui, &state.visible_rows());
            }

            section(ui, format!("Seasonal variation of PM2.5 in {station}"), SEASONAL_TEXT);
            plot::seasonal_chart(ui, view);

            section(ui, format!("Air quality categories in {station}"), CATEGORY_TEXT);
            plot::category_chart(ui, view);

            let correlation_text = format!(
                "The relationship between {x} and {y}, with a least-squares line to show \
                 whether the two move together linearly. For example, DEWP against PM2.5 \
                 shows how moisture in the air relates to particle concentration.",
                x = controls.x,
                y = controls.y
            );
            section(
                ui,
                format!("Correlation of {} vs {} in {station}", controls.x, controls.y),
                &correlation_text,
            );
            plot::correlation_chart(ui, view);

            section(ui, format!("Yearly air quality trend in {station}"), TREND_TEXT);
            plot::yearly_chart(ui, view);

            section(
                ui,
                format!("DEWP and PM2.5 by season in {station}"),
                SEASON_SCATTER_TEXT,
            );
            plot::season_scatter_chart(ui, view);
        });
}

// ---------------------------------------------------------------------------
// Raw data table
// ---------------------------------------------------------------------------

const NUMERIC_COLUMNS: [Variable; 8] = [
    Variable::Pm25,
    Variable::So2,
    Variable::No2,
    Variable::Co,
    Variable::O3,
    Variable::Dewp,
    Variable::Temp,
    Variable::Pres,
];

fn format_value(v: Option<f64>) -> String {
    match v.filter(|x| !x.is_nan()) {
        Some(x) => format!("{x}"),
        None => "NaN".to_string(),
    }
}

fn format_label(label: Option<&str>) -> &str {
    label.unwrap_or("NaN")
}

/// Virtualised table of the filtered rows.
pub fn raw_data_table(ui: &mut Ui, rows: &[&Observation]) {
    let n_columns = NUMERIC_COLUMNS.len() + 5;
    ui.push_id("raw_data", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(true)
            .max_scroll_height(320.0)
            .columns(Column::auto().at_least(56.0), n_columns)
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("station");
                });
                header.col(|ui| {
                    ui.strong("datetime");
                });
                for v in NUMERIC_COLUMNS {
                    header.col(|ui| {
                        ui.strong(v.column());
                    });
                }
                for name in ["Season", "Air_Quality_Category", "Air_Quality_Numeric"] {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, rows.len(), |mut row| {
                    let obs = rows[row.index()];
                    row.col(|ui| {
                        ui.label(&obs.station);
                    });
                    row.col(|ui| {
                        ui.label(obs.datetime.format("%Y-%m-%d %H:%M:%S").to_string());
                    });
                    for v in NUMERIC_COLUMNS {
                        row.col(|ui| {
                            ui.label(format_value(v.value(obs)));
                        });
                    }
                    row.col(|ui| {
                        ui.label(format_label(obs.season.as_deref()));
                    });
                    row.col(|ui| {
                        ui.label(format_label(obs.category.as_deref()));
                    });
                    row.col(|ui| {
                        ui.label(format_value(obs.aq_numeric));
                    });
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_render_as_nan() {
        assert_eq!(format_value(None), "NaN");
        assert_eq!(format_value(Some(f64::NAN)), "NaN");
        assert_eq!(format_value(Some(12.5)), "12.5");
        assert_eq!(format_value(Some(1013.0)), "1013");
        assert_eq!(format_label(None), "NaN");
        assert_eq!(format_label(Some("Winter")), "Winter");
    }
}
