//! "Set Tilt Angles" dialog window.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tomoview_core::data_source::DataSource;
use tomoview_core::operator::{Operator, SetTiltAnglesOperator};
use tomoview_core::panel::{format_number, parse_number, HostWindow, TiltAngleDialogLauncher};
use tomoview_core::tilt::angles_from_range;
use tracing::{info, warn};

use crate::app::TomoviewApp;
use crate::loader;

/// Editable copy of a tilt series' angles.
pub struct TiltDialogState {
    pub source: Weak<DataSource>,
    pub title: String,
    pub rows: Vec<String>,
    pub range_start: f64,
    pub range_end: f64,
    pub error: Option<String>,
}

impl TiltDialogState {
    fn new(window: &HostWindow, source: &Rc<DataSource>) -> Self {
        let angles = source.tilt_angles();
        Self {
            source: Rc::downgrade(source),
            title: format!("{} - Set Tilt Angles: {}", window.title, source.name()),
            rows: angles.iter().map(|a| format_number(*a)).collect(),
            range_start: angles.first().copied().unwrap_or(-60.0),
            range_end: angles.last().copied().unwrap_or(60.0),
            error: None,
        }
    }

    pub fn fill_range(&mut self) {
        self.rows = angles_from_range(self.range_start, self.range_end, self.rows.len())
            .into_iter()
            .map(format_number)
            .collect();
        self.error = None;
    }

    /// Replace the rows with angles read from a file. The count must match.
    pub fn load_angles(&mut self, angles: &[f64]) {
        if angles.len() != self.rows.len() {
            self.error = Some(format!(
                "File has {} angles, expected {}",
                angles.len(),
                self.rows.len()
            ));
            return;
        }
        self.rows = angles.iter().map(|a| format_number(*a)).collect();
        self.error = None;
    }

    pub fn parsed_angles(&self) -> Result<Vec<f64>, String> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, text)| {
                parse_number(text).ok_or_else(|| format!("Row {i}: invalid angle {text:?}"))
            })
            .collect()
    }
}

/// Opens the dialog by filling the shared state the app renders each frame.
pub struct DialogLauncher {
    state: Rc<RefCell<Option<TiltDialogState>>>,
}

impl DialogLauncher {
    pub fn new(state: Rc<RefCell<Option<TiltDialogState>>>) -> Self {
        Self { state }
    }
}

impl TiltAngleDialogLauncher for DialogLauncher {
    fn show_set_tilt_angles(&self, window: &HostWindow, source: Option<Rc<DataSource>>) {
        let Some(source) = source else {
            warn!("No data source for the tilt angle dialog.");
            return;
        };
        *self.state.borrow_mut() = Some(TiltDialogState::new(window, &source));
    }
}

enum DialogAction {
    None,
    Apply(Rc<DataSource>, Vec<f64>),
    LoadFile,
    Export,
    Close,
}

pub fn show(ctx: &egui::Context, app: &mut TomoviewApp) {
    let action = {
        let mut guard = app.dialog.borrow_mut();
        let Some(state) = guard.as_mut() else {
            return;
        };
        let Some(source) = state.source.upgrade() else {
            *guard = None;
            return;
        };

        let mut open = true;
        let mut action = DialogAction::None;
        egui::Window::new(state.title.clone())
            .id(egui::Id::new("set_tilt_angles"))
            .open(&mut open)
            .collapsible(false)
            .default_width(320.0)
            .show(ctx, |ui| {
                action = dialog_contents(ui, state, &source);
            });
        if !open {
            action = DialogAction::Close;
        }
        action
    };

    match action {
        DialogAction::None => {}
        DialogAction::Apply(source, angles) => {
            info!(source = source.name(), count = angles.len(), "tilt angles applied");
            let op = Rc::new(SetTiltAnglesOperator::new(angles));
            source.add_operator(Operator::SetTiltAngles(op));
            *app.dialog.borrow_mut() = None;
        }
        DialogAction::LoadFile => loader::pick_tilt_file(app.msg_tx.clone(), ctx.clone()),
        DialogAction::Export => loader::pick_tilt_export(app.msg_tx.clone(), ctx.clone()),
        DialogAction::Close => *app.dialog.borrow_mut() = None,
    }
}

fn dialog_contents(ui: &mut egui::Ui, state: &mut TiltDialogState, source: &Rc<DataSource>) -> DialogAction {
    let mut action = DialogAction::None;

    ui.horizontal(|ui| {
        ui.label("From");
        ui.add(egui::DragValue::new(&mut state.range_start).speed(0.5).suffix("°"));
        ui.label("to");
        ui.add(egui::DragValue::new(&mut state.range_end).speed(0.5).suffix("°"));
        if ui.button("Fill").clicked() {
            state.fill_range();
        }
    });

    ui.horizontal(|ui| {
        if ui.button("Load from File...").clicked() {
            action = DialogAction::LoadFile;
        }
        let can_export = state.parsed_angles().is_ok();
        if ui.add_enabled(can_export, egui::Button::new("Export...")).clicked() {
            action = DialogAction::Export;
        }
    });
    ui.separator();

    egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
        egui::Grid::new("tilt_dialog_rows")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                for (i, text) in state.rows.iter_mut().enumerate() {
                    ui.label(i.to_string());
                    ui.add(egui::TextEdit::singleline(text).desired_width(100.0));
                    ui.end_row();
                }
            });
    });

    if let Some(ref error) = state.error {
        ui.colored_label(egui::Color32::from_rgb(230, 90, 90), error);
    }

    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("Apply").clicked() {
            match state.parsed_angles() {
                Ok(angles) => action = DialogAction::Apply(Rc::clone(source), angles),
                Err(e) => state.error = Some(e),
            }
        }
        if ui.button("Cancel").clicked() {
            action = DialogAction::Close;
        }
    });

    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomoview_core::data_source::DataSourceKind;

    fn state(angles: Vec<f64>) -> (Rc<DataSource>, TiltDialogState) {
        let source = DataSource::builder("series")
            .kind(DataSourceKind::TiltSeries)
            .extent([0, 3, 0, 3, 0, angles.len() as i32 - 1])
            .tilt_angles(angles)
            .build()
            .unwrap();
        let window = HostWindow {
            title: "Tomoview".to_string(),
        };
        let state = TiltDialogState::new(&window, &source);
        (source, state)
    }

    #[test]
    fn fill_range_spans_every_projection() {
        let (_source, mut state) = state(vec![0.0; 5]);
        state.range_start = -60.0;
        state.range_end = 60.0;
        state.fill_range();
        assert_eq!(state.rows, vec!["-60", "-30", "0", "30", "60"]);
    }

    #[test]
    fn loaded_angles_must_match_projection_count() {
        let (_source, mut state) = state(vec![1.0, 2.0, 3.0]);
        state.load_angles(&[5.0, 6.0]);
        assert!(state.error.is_some());
        assert_eq!(state.rows, vec!["1", "2", "3"]);

        state.load_angles(&[5.0, 6.5, 7.0]);
        assert!(state.error.is_none());
        assert_eq!(state.parsed_angles().unwrap(), vec![5.0, 6.5, 7.0]);
    }

    #[test]
    fn launcher_fills_shared_state() {
        let (source, _) = state(vec![0.0, 10.0]);
        let shared = Rc::new(RefCell::new(None));
        let launcher = DialogLauncher::new(Rc::clone(&shared));
        launcher.show_set_tilt_angles(&HostWindow::default(), Some(Rc::clone(&source)));

        let guard = shared.borrow();
        let opened = guard.as_ref().unwrap();
        assert_eq!(opened.rows, vec!["0", "10"]);
        assert!(opened.source.upgrade().is_some());
    }
}
