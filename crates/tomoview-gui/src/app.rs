use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc;

use tomoview_core::active::ActiveObjects;
use tomoview_core::adapter::PipelineServer;
use tomoview_core::data_source::DataSource;
use tomoview_core::io::tilt::{read_tilt_angles, write_tilt_angles};
use tomoview_core::io::DatasetDescriptor;
use tomoview_core::panel::{HostWindow, PropertiesPanel};
use tomoview_core::settings::AppSettings;
use tomoview_core::view::{RenderTarget, View};
use tracing::{error, info};

use crate::dialog::{DialogLauncher, TiltDialogState};
use crate::messages::AppMessage;
use crate::panels;
use crate::states::{OpenDataset, UIState, ViewportState};

pub const APP_TITLE: &str = "Tomoview";

/// Asks egui for another frame when the slice view needs to be redrawn.
struct RepaintTarget {
    ctx: egui::Context,
}

impl RenderTarget for RepaintTarget {
    fn request_render(&self) {
        self.ctx.request_repaint();
    }
}

pub struct TomoviewApp {
    pub msg_tx: mpsc::Sender<AppMessage>,
    pub msg_rx: mpsc::Receiver<AppMessage>,
    pub registry: Rc<ActiveObjects>,
    pub server: Rc<PipelineServer>,
    pub view: Rc<View>,
    pub panel: Rc<PropertiesPanel>,
    pub dialog: Rc<RefCell<Option<TiltDialogState>>>,
    pub settings: AppSettings,
    pub ui_state: UIState,
    pub viewport: ViewportState,
    pub show_about: bool,
}

impl TomoviewApp {
    pub fn new(ctx: &egui::Context, settings: AppSettings) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();

        let registry = ActiveObjects::new();
        let server = PipelineServer::new();

        let view = View::new("Slice View");
        view.set_render_target(Some(Box::new(RepaintTarget { ctx: ctx.clone() })));

        let panel = PropertiesPanel::new(&registry, Rc::clone(&server));
        panel.set_host_window(HostWindow {
            title: APP_TITLE.to_string(),
        });
        let dialog = Rc::new(RefCell::new(None));
        panel.set_dialog_launcher(Rc::new(DialogLauncher::new(Rc::clone(&dialog))));
        panel.set_visible(settings.show_properties_panel);

        registry.set_active_view(Some(Rc::clone(&view)));

        Self {
            msg_tx,
            msg_rx,
            registry,
            server,
            view,
            panel,
            dialog,
            settings,
            ui_state: UIState::default(),
            viewport: ViewportState::default(),
            show_about: false,
        }
    }

    /// Drain all pending messages from background threads.
    fn poll_messages(&mut self) {
        while let Ok(message) = self.msg_rx.try_recv() {
            match message {
                AppMessage::DatasetLoaded {
                    path,
                    descriptor,
                    volume,
                } => {
                    self.ui_state.loading = None;
                    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
                    match descriptor.to_data_source_with_volume(
                        base_dir,
                        &self.settings.default_units,
                        volume,
                    ) {
                        Ok(source) => self.add_dataset(path, descriptor, source),
                        Err(e) => self.log_error(format!("Failed to open {}: {e}", path.display())),
                    }
                }
                AppMessage::Progress { done, total } => {
                    self.ui_state.loading = Some((done, total));
                }
                AppMessage::TiltFilePicked { path } => match read_tilt_angles(&path) {
                    Ok(angles) => {
                        if let Some(state) = self.dialog.borrow_mut().as_mut() {
                            state.load_angles(&angles);
                        }
                    }
                    Err(e) => self.log_error(format!("Failed to read {}: {e}", path.display())),
                },
                AppMessage::TiltExportPicked { path } => {
                    let angles = self
                        .dialog
                        .borrow()
                        .as_ref()
                        .and_then(|state| state.parsed_angles().ok());
                    if let Some(angles) = angles {
                        match write_tilt_angles(&path, &angles) {
                            Ok(()) => self.ui_state.add_log(format!("Saved: {}", path.display())),
                            Err(e) => self.log_error(format!("Failed to write {}: {e}", path.display())),
                        }
                    }
                }
                AppMessage::Error { message } => {
                    self.ui_state.loading = None;
                    self.log_error(message);
                }
            }
        }
    }

    fn add_dataset(&mut self, path: PathBuf, descriptor: DatasetDescriptor, source: Rc<DataSource>) {
        let dims = source.dimensions();
        self.ui_state.add_log(format!(
            "Opened: {} ({} x {} x {}, {})",
            path.display(),
            dims[0],
            dims[1],
            dims[2],
            source.kind()
        ));

        self.settings.push_recent(path.clone());
        self.settings.save();

        self.registry.add_data_source(Rc::clone(&source));
        self.ui_state.datasets.push(OpenDataset {
            path,
            descriptor,
            source: Rc::clone(&source),
        });
        self.registry.set_active_data_source(Some(source));
    }

    /// Write the active dataset's edited state back to its descriptor.
    pub fn save_active_descriptor(&mut self) {
        let Some(source) = self.registry.active_data_source() else {
            return;
        };
        let Some(dataset) = self.ui_state.dataset_mut(&source) else {
            return;
        };
        dataset.descriptor.update_from(&source);
        let result = dataset.descriptor.save(&dataset.path);
        let path = dataset.path.clone();
        match result {
            Ok(()) => {
                info!(path = %path.display(), "descriptor saved");
                self.ui_state.add_log(format!("Saved: {}", path.display()));
            }
            Err(e) => self.log_error(format!("Failed to save {}: {e}", path.display())),
        }
    }

    pub fn close_data_source(&mut self, source: &Rc<DataSource>) {
        self.registry.remove_data_source(source);
        self.ui_state.remove_dataset(source);
        if self.viewport.is_showing(source) {
            self.viewport.reset();
        }
    }

    pub fn log_error(&mut self, message: String) {
        error!("{message}");
        self.ui_state.add_log(format!("ERROR: {message}"));
    }

    fn remember_window_size(&mut self, ctx: &egui::Context) {
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.settings.window_width = Some(rect.width());
            self.settings.window_height = Some(rect.height());
        }
    }
}

impl eframe::App for TomoviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_messages();

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::data_sources::show(ctx, self);
        panels::properties::show(ctx, self);
        panels::viewport::show(ctx, self);
        crate::dialog::show(ctx, self);

        if self.show_about {
            egui::Window::new("About Tomoview")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading(APP_TITLE);
                        ui.label("Tomographic Dataset Properties");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }

        self.remember_window_size(ctx);
        if ctx.input(|i| i.viewport().close_requested()) {
            self.settings.save();
        }
    }
}
