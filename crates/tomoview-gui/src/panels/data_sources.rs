use std::rc::Rc;

use crate::app::TomoviewApp;

pub fn show(ctx: &egui::Context, app: &mut TomoviewApp) {
    let mut selected = None;
    let mut closed = None;

    egui::SidePanel::left("data_sources")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            crate::panels::section_header(ui, "Data Sources", None);
            ui.separator();

            let active = app.registry.active_data_source();
            let sources = app.registry.data_sources();
            if sources.is_empty() {
                ui.weak("Open a dataset descriptor (Ctrl+O)");
            }
            for source in sources {
                let is_active = active.as_ref().is_some_and(|a| Rc::ptr_eq(a, &source));
                ui.horizontal(|ui| {
                    let label = format!("{} ({})", source.name(), source.kind());
                    if ui.selectable_label(is_active, label).clicked() && !is_active {
                        selected = Some(Rc::clone(&source));
                    }
                    if ui.small_button("x").on_hover_text("Close").clicked() {
                        closed = Some(Rc::clone(&source));
                    }
                });
                if is_active {
                    for op in source.operators() {
                        ui.indent(source.name(), |ui| {
                            ui.small(op.to_string());
                        });
                    }
                }
            }
        });

    if let Some(source) = selected {
        app.registry.set_active_data_source(Some(source));
    }
    if let Some(source) = closed {
        app.close_data_source(&source);
    }
}
