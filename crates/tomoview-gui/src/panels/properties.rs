//! Right-hand "Data Properties" panel. Renders the core panel's form and
//! forwards edits to its handlers once the form borrow is released.

use egui_plot::{Line, Plot, PlotPoints, Points};
use tomoview_core::adapter::DataInformation;
use tomoview_core::geometry::Axis;
use tomoview_core::panel::ColorMapWidget;

use crate::app::TomoviewApp;
use crate::convert::PRESETS;
use crate::panels::section_header;
use crate::states::CellEdit;

/// Height of the tilt angle plot in pixels.
const PLOT_HEIGHT: f32 = 120.0;

enum PanelEvent {
    UnitsEdited,
    LengthEdited(Axis),
    TiltCellCommitted { row: usize, text: String },
    SetTiltAngles,
    ColorPreset(String),
}

pub fn show(ctx: &egui::Context, app: &mut TomoviewApp) {
    let visible = app.settings.show_properties_panel;
    if app.panel.is_visible() != visible {
        app.panel.set_visible(visible);
    }
    if !visible {
        return;
    }

    let mut events = Vec::new();
    egui::SidePanel::right("properties")
        .resizable(true)
        .default_width(300.0)
        .show(ctx, |ui| {
            app.panel.on_paint();
            section_header(ui, "Data Properties", None);
            ui.separator();

            let Some(source) = app.panel.data_source() else {
                ui.weak("No data source selected");
                return;
            };
            app.ui_state.information.refresh(&app.panel);
            attach_color_map(app);

            egui::ScrollArea::vertical().show(ui, |ui| {
                let units = source.units(Axis::X);
                let info = &app.ui_state.information;
                information_section(ui, "Original Dimensions & Range", info.original.as_ref(), &units);
                information_section(ui, "Transformed Dimensions & Range", info.transformed.as_ref(), &units);
                color_map_section(ui, app, &mut events);
                units_section(ui, app, &mut events);
                tilt_section(ui, app, &source.tilt_angles(), &mut events);
            });
        });

    for event in events {
        dispatch(app, event);
    }
    app.panel.process_tilt_cell_changes();
}

fn dispatch(app: &mut TomoviewApp, event: PanelEvent) {
    match event {
        PanelEvent::UnitsEdited => app.panel.on_units_edited(),
        PanelEvent::LengthEdited(axis) => app.panel.on_axis_length_edited(axis),
        PanelEvent::TiltCellCommitted { row, text } => {
            app.panel.form_mut().tilt.table.set_cell_text(row, 0, text);
        }
        PanelEvent::SetTiltAngles => app.panel.request_tilt_angle_editor_dialog(),
        PanelEvent::ColorPreset(preset) => {
            if let Some(mut widget) = app.panel.color_map_widget() {
                widget.preset = preset.clone();
                app.panel.attach_color_map_widget(widget);
            }
            app.viewport.color_preset = preset;
            app.viewport.stale.set(true);
        }
    }
}

/// The panel drops its color map widget on every refresh; put it back.
fn attach_color_map(app: &TomoviewApp) {
    if app.panel.color_map_widget().is_some() {
        return;
    }
    let info = &app.ui_state.information;
    let range = info
        .transformed
        .as_ref()
        .or(info.original.as_ref())
        .and_then(|i| i.scalar_range);
    if let Some(range) = range {
        app.panel.attach_color_map_widget(ColorMapWidget {
            preset: app.viewport.color_preset.clone(),
            range,
        });
    }
}

fn information_section(ui: &mut egui::Ui, title: &str, info: Option<&DataInformation>, units: &str) {
    section_header(ui, title, None);
    let Some(info) = info else {
        ui.weak("No data");
        return;
    };

    egui::Grid::new(title).num_columns(2).striped(true).show(ui, |ui| {
        let d = info.dimensions;
        ui.label("Dimensions");
        ui.label(format!("{} x {} x {}", d[0], d[1], d[2]));
        ui.end_row();

        ui.label("Range");
        match info.scalar_range {
            Some((lo, hi)) => ui.label(format!("[{lo:.4}, {hi:.4}]")),
            None => ui.weak("n/a"),
        };
        ui.end_row();

        ui.label("Memory");
        ui.label(format!("{:.2} MiB", info.memory_mib()));
        ui.end_row();

        for axis in Axis::ALL {
            let [lo, hi] = info.bounds[axis.index()];
            ui.label(format!("{axis} Bounds"));
            ui.label(format!("{lo} .. {hi} {units}"));
            ui.end_row();
        }
    });
    ui.add_space(4.0);
}

fn color_map_section(ui: &mut egui::Ui, app: &TomoviewApp, events: &mut Vec<PanelEvent>) {
    let Some(widget) = app.panel.color_map_widget() else {
        return;
    };
    let (lo, hi) = widget.range;
    section_header(ui, "Color Map", Some(&format!("[{lo:.3}, {hi:.3}]")));
    egui::ComboBox::from_label("Preset")
        .selected_text(widget.preset.as_str())
        .show_ui(ui, |ui| {
            for preset in PRESETS {
                if ui.selectable_label(widget.preset == preset, preset).clicked() {
                    events.push(PanelEvent::ColorPreset(preset.to_string()));
                }
            }
        });
    ui.add_space(4.0);
}

fn units_section(ui: &mut egui::Ui, app: &TomoviewApp, events: &mut Vec<PanelEvent>) {
    section_header(ui, "Units and Size", None);
    let mut form = app.panel.form_mut();

    egui::Grid::new("units_and_size").num_columns(2).show(ui, |ui| {
        ui.label("Units");
        let resp = ui.add(egui::TextEdit::singleline(&mut form.units).desired_width(120.0));
        if resp.lost_focus() {
            events.push(PanelEvent::UnitsEdited);
        }
        ui.end_row();

        for axis in Axis::ALL {
            ui.label(format!("{axis} Length"));
            let field = &mut form.lengths[axis.index()];
            let resp = ui.add(egui::TextEdit::singleline(field).desired_width(120.0));
            if resp.lost_focus() {
                events.push(PanelEvent::LengthEdited(axis));
            }
            ui.end_row();
        }
    });
    ui.add_space(4.0);
}

fn tilt_section(ui: &mut egui::Ui, app: &mut TomoviewApp, angles: &[f64], events: &mut Vec<PanelEvent>) {
    let (separator, button, table) = {
        let form = app.panel.form();
        (
            form.tilt.separator_visible,
            form.tilt.button_visible,
            form.tilt.table.is_visible(),
        )
    };
    if separator {
        ui.separator();
    }
    if !button && !table {
        return;
    }

    section_header(ui, "Tilt Angles", None);
    if button && ui.button("Set Tilt Angles...").clicked() {
        events.push(PanelEvent::SetTiltAngles);
    }
    if table {
        tilt_table(ui, app, events);
        ui.add_space(4.0);
        tilt_plot(ui, angles);
    }
}

/// One editable cell per projection. Typing goes to `tilt_cell_edit` and is
/// committed to the form when the cell loses focus.
fn tilt_table(ui: &mut egui::Ui, app: &mut TomoviewApp, events: &mut Vec<PanelEvent>) {
    let form = app.panel.form();
    let table = &form.tilt.table;
    let edit = &mut app.ui_state.tilt_cell_edit;

    egui::ScrollArea::vertical()
        .id_salt("tilt_table")
        .max_height(240.0)
        .show(ui, |ui| {
            egui::Grid::new("tilt_angles_table")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    ui.strong("#");
                    ui.strong("Angle");
                    ui.end_row();

                    for row in 0..table.row_count() {
                        ui.label(row.to_string());
                        let id = ui.make_persistent_id(("tilt_cell", row));

                        let mut commit = None;
                        match edit.as_mut().filter(|e| e.row == row) {
                            Some(e) => {
                                let resp = ui.add(egui::TextEdit::singleline(&mut e.text).id(id).desired_width(100.0));
                                if resp.lost_focus() {
                                    commit = Some(e.text.clone());
                                }
                            }
                            None => {
                                let mut text = table.cell_text(row, 0).unwrap_or_default().to_string();
                                let resp = ui.add(egui::TextEdit::singleline(&mut text).id(id).desired_width(100.0));
                                if resp.changed() {
                                    *edit = Some(CellEdit { row, text });
                                }
                            }
                        }
                        if let Some(text) = commit {
                            events.push(PanelEvent::TiltCellCommitted { row, text });
                            *edit = None;
                        }
                        ui.end_row();
                    }
                });
        });
}

fn tilt_plot(ui: &mut egui::Ui, angles: &[f64]) {
    let points: Vec<[f64; 2]> = angles
        .iter()
        .enumerate()
        .map(|(i, angle)| [i as f64, *angle])
        .collect();

    Plot::new("tilt_angle_plot")
        .height(PLOT_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_label("projection")
        .y_axis_label("angle (°)")
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new("tilt angles", PlotPoints::from(points.clone())));
            plot_ui.points(Points::new("projections", PlotPoints::from(points)).radius(2.5));
        });
}
