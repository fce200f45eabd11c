use tomoview_core::data_source::DataSourceKind;
use tomoview_core::operator::{Operator, TransformOperator};

use crate::app::TomoviewApp;
use crate::loader;

const GAUSSIAN_SIGMA: f64 = 2.0;

pub fn show(ctx: &egui::Context, app: &mut TomoviewApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
                if ui.add(egui::Button::new("Open Dataset...").shortcut_text(ctx.format_shortcut(&open_shortcut))).clicked() {
                    ui.close();
                    loader::pick_and_load(app.msg_tx.clone(), ctx.clone());
                }

                ui.menu_button("Open Recent", |ui| {
                    if app.settings.recent_descriptors.is_empty() {
                        ui.weak("No recent datasets");
                    }
                    for path in app.settings.recent_descriptors.clone() {
                        if ui.button(path.display().to_string()).clicked() {
                            ui.close();
                            loader::spawn_load(path, app.msg_tx.clone(), ctx.clone());
                        }
                    }
                });

                let save_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
                let has_source = app.registry.active_data_source().is_some();
                if ui.add_enabled(has_source, egui::Button::new("Save Descriptor").shortcut_text(ctx.format_shortcut(&save_shortcut))).clicked() {
                    ui.close();
                    app.save_active_descriptor();
                }

                ui.separator();

                let quit_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui.add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut))).clicked() {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Data", |ui| data_menu(ui, app));

            ui.menu_button("View", |ui| {
                ui.checkbox(&mut app.settings.show_properties_panel, "Data Properties");
                if let Some(grid) = app.view.axes_grid() {
                    let mut visible = grid.is_visible();
                    if ui.checkbox(&mut visible, "Axes Grid").changed() {
                        grid.set_visible(visible);
                        app.view.render();
                    }
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.show_about = true;
                }
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O))) {
            loader::pick_and_load(app.msg_tx.clone(), ctx.clone());
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S))) {
            app.save_active_descriptor();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q))) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

fn data_menu(ui: &mut egui::Ui, app: &mut TomoviewApp) {
    let Some(source) = app.registry.active_data_source() else {
        ui.weak("No data source selected");
        return;
    };

    match source.kind() {
        DataSourceKind::Volume => {
            if ui.button("Mark as Tilt Series").clicked() {
                ui.close();
                source.set_kind(DataSourceKind::TiltSeries);
            }
        }
        DataSourceKind::TiltSeries => {
            if ui.button("Set Tilt Angles...").clicked() {
                ui.close();
                app.panel.request_tilt_angle_editor_dialog();
            }
            if ui.button("Mark as Volume").clicked() {
                ui.close();
                source.set_kind(DataSourceKind::Volume);
            }
        }
    }

    ui.separator();

    ui.menu_button("Transforms", |ui| {
        if ui.button("Invert").clicked() {
            ui.close();
            source.add_operator(Operator::Transform(TransformOperator::invert()));
        }
        if ui.button(format!("Gaussian Filter (sigma={GAUSSIAN_SIGMA})")).clicked() {
            ui.close();
            source.add_operator(Operator::Transform(TransformOperator::gaussian_filter(GAUSSIAN_SIGMA)));
        }
    });

    ui.separator();

    if ui.button("Close Data Source").clicked() {
        ui.close();
        app.close_data_source(&source);
    }
}
