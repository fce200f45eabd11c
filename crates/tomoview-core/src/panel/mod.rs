//! Data properties panel: geometry, units and tilt angles of the active
//! data source.
//!
//! The panel is toolkit independent. A host renders [`PanelForm`], writes
//! user input back into it and then calls the matching `on_*` handler.
//! Refreshes are deferred while the panel is hidden: [`PropertiesPanel::schedule_update`]
//! only marks the display stale, and the next [`PropertiesPanel::set_visible`]
//! or [`PropertiesPanel::on_paint`] performs the refresh.

mod form;

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

pub use form::{
    format_number, parse_number, EchoGuard, PanelForm, TiltAnglesSection, TiltAnglesTable,
};

use crate::active::ActiveObjects;
use crate::adapter::{DataInformation, DataPort, DisplayAdapter, PipelineServer};
use crate::data_source::{DataSource, DataSourceKind};
use crate::geometry::{self, Axis};
use crate::operator::{Operator, SetTiltAnglesOperator};
use crate::signal::Subscription;

/// The window hosting the panel, handed to dialogs it opens.
#[derive(Clone, Debug, Default)]
pub struct HostWindow {
    pub title: String,
}

/// Opens the tilt angle editor dialog.
pub trait TiltAngleDialogLauncher {
    fn show_set_tilt_angles(&self, window: &HostWindow, source: Option<Rc<DataSource>>);
}

/// Auxiliary color map editor that may be attached below the fields.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorMapWidget {
    pub preset: String,
    pub range: (f32, f32),
}

struct InformationAdapters {
    original: DisplayAdapter,
    transformed: DisplayAdapter,
}

pub struct PropertiesPanel {
    weak_self: Weak<PropertiesPanel>,
    registry: Weak<ActiveObjects>,
    server: Rc<PipelineServer>,
    host_window: RefCell<HostWindow>,
    dialog: RefCell<Option<Rc<dyn TiltAngleDialogLauncher>>>,

    data_source: RefCell<Weak<DataSource>>,
    source_links: RefCell<Vec<Subscription>>,
    adapters: RefCell<Option<InformationAdapters>>,
    _registry_links: Vec<Subscription>,

    update_needed: Cell<bool>,
    visible: Cell<bool>,
    form: RefCell<PanelForm>,
    color_map_widget: RefCell<Option<ColorMapWidget>>,
}

impl PropertiesPanel {
    /// Create a hidden panel listening to `registry`. If the registry
    /// already has an active data source it is adopted right away.
    pub fn new(registry: &Rc<ActiveObjects>, server: Rc<PipelineServer>) -> Rc<Self> {
        let panel = Rc::new_cyclic(|weak: &Weak<Self>| {
            let on_source = weak.clone();
            let source_link = registry.data_source_changed.connect(move |source| {
                if let Some(panel) = on_source.upgrade() {
                    panel.set_data_source(source.clone());
                    panel.refresh_axes_grid_labels();
                }
            });
            let on_view = weak.clone();
            let view_link = registry.view_changed.connect(move |_| {
                if let Some(panel) = on_view.upgrade() {
                    panel.refresh_axes_grid_labels();
                }
            });

            Self {
                weak_self: weak.clone(),
                registry: Rc::downgrade(registry),
                server,
                host_window: RefCell::new(HostWindow::default()),
                dialog: RefCell::new(None),
                data_source: RefCell::new(Weak::new()),
                source_links: RefCell::new(Vec::new()),
                adapters: RefCell::new(None),
                _registry_links: vec![source_link, view_link],
                update_needed: Cell::new(false),
                visible: Cell::new(false),
                form: RefCell::new(PanelForm::default()),
                color_map_widget: RefCell::new(None),
            }
        });
        panel.clear();
        if let Some(source) = registry.active_data_source() {
            panel.set_data_source(Some(source));
        }
        panel
    }

    pub fn set_host_window(&self, window: HostWindow) {
        *self.host_window.borrow_mut() = window;
    }

    pub fn set_dialog_launcher(&self, launcher: Rc<dyn TiltAngleDialogLauncher>) {
        *self.dialog.borrow_mut() = Some(launcher);
    }

    pub fn data_source(&self) -> Option<Rc<DataSource>> {
        self.data_source.borrow().upgrade()
    }

    pub fn form(&self) -> Ref<'_, PanelForm> {
        self.form.borrow()
    }

    /// Mutable access for the host binding its widgets. Must be released
    /// before calling any handler.
    pub fn form_mut(&self) -> RefMut<'_, PanelForm> {
        self.form.borrow_mut()
    }

    pub fn is_update_needed(&self) -> bool {
        self.update_needed.get()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// On-show hook. Becoming visible performs any pending refresh.
    pub fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
        if visible {
            self.update_data();
        }
    }

    /// Paint hook: bring the fields up to date before the host draws them.
    pub fn on_paint(&self) {
        self.update_data();
    }

    pub fn original_information(&self) -> Option<DataInformation> {
        self.adapter_information(DataPort::Original)
    }

    pub fn transformed_information(&self) -> Option<DataInformation> {
        self.adapter_information(DataPort::Transformed)
    }

    fn adapter_information(&self, port: DataPort) -> Option<DataInformation> {
        let adapters = self.adapters.borrow();
        let adapters = adapters.as_ref()?;
        match port {
            DataPort::Original => adapters.original.information(),
            DataPort::Transformed => adapters.transformed.information(),
        }
    }

    /// Observe `source` instead of the previous data source.
    pub fn set_data_source(&self, source: Option<Rc<DataSource>>) {
        drop(std::mem::take(&mut *self.source_links.borrow_mut()));
        drop(self.adapters.borrow_mut().take());
        self.form.borrow_mut().tilt.table.take_cell_changes();

        *self.data_source.borrow_mut() = source.as_ref().map(Rc::downgrade).unwrap_or_default();

        if let Some(source) = &source {
            let weak = self.weak_self.clone();
            let link = source.data_changed.connect(move |_| {
                if let Some(panel) = weak.upgrade() {
                    panel.schedule_update();
                }
            });
            self.source_links.borrow_mut().push(link);

            *self.adapters.borrow_mut() = Some(InformationAdapters {
                original: self.server.create_adapter(source, DataPort::Original),
                transformed: self.server.create_adapter(source, DataPort::Transformed),
            });
        }
        debug!(name = source.as_ref().map(|s| s.name()), "properties panel data source set");
        self.schedule_update();
    }

    /// Mark the display stale; refresh now if visible.
    pub fn schedule_update(&self) {
        self.update_needed.set(true);
        if self.visible.get() {
            self.update_data();
        }
    }

    /// Refresh the fields from the data source if a refresh is pending.
    pub fn update_data(&self) {
        if !self.update_needed.get() {
            return;
        }

        self.clear();
        let mut form = self.form.borrow_mut();
        form.clear_fields();
        let PanelForm {
            units,
            lengths,
            tilt,
        } = &mut *form;
        let mut table = tilt.table.suppress_echo();

        let Some(source) = self.data_source() else {
            self.update_needed.set(false);
            return;
        };

        let extent = source.extent();
        let spacing = source.spacing();
        for axis in Axis::ALL {
            lengths[axis.index()] = format_number(geometry::axis_length(&extent, &spacing, axis));
        }
        *units = source.units(Axis::X);

        if source.kind() == DataSourceKind::TiltSeries {
            tilt.separator_visible = true;
            tilt.button_visible = true;
            table.show();
            let angles = source.tilt_angles();
            table.set_row_count(angles.len());
            table.set_column_count(1);
            for (row, angle) in angles.iter().enumerate() {
                table.set_cell_text(row, 0, format_number(*angle));
            }
        } else {
            table.hide();
        }
        drop(table);

        self.update_needed.set(false);
        debug!(name = source.name(), "properties panel refreshed");
    }

    /// Hide the tilt UI, empty the table and drop the color map widget.
    pub fn clear(&self) {
        self.color_map_widget.borrow_mut().take();
        let mut form = self.form.borrow_mut();
        form.tilt.separator_visible = false;
        form.tilt.button_visible = false;
        let mut table = form.tilt.table.suppress_echo();
        clear_table(&mut table);
    }

    pub fn attach_color_map_widget(&self, widget: ColorMapWidget) {
        *self.color_map_widget.borrow_mut() = Some(widget);
    }

    pub fn color_map_widget(&self) -> Option<ColorMapWidget> {
        self.color_map_widget.borrow().clone()
    }

    /// Apply every cell the user changed. The texts are read before any
    /// edit is applied, since each applied edit refreshes the table.
    pub fn process_tilt_cell_changes(&self) {
        let edits: Vec<(usize, String)> = {
            let mut form = self.form.borrow_mut();
            let table = &mut form.tilt.table;
            table
                .take_cell_changes()
                .into_iter()
                .map(|(row, column)| {
                    let text = table.cell_text(row, column).unwrap_or_default().to_owned();
                    (row, text)
                })
                .collect()
        };
        for (row, text) in edits {
            self.apply_tilt_angle_text(row, &text);
        }
    }

    /// A tilt table cell was edited: record the new angle in a
    /// set-tilt-angles operator.
    pub fn on_tilt_angle_cell_edited(&self, row: usize, column: usize) {
        let text = self
            .form
            .borrow()
            .tilt
            .table
            .cell_text(row, column)
            .map(str::to_owned)
            .unwrap_or_default();
        self.apply_tilt_angle_text(row, &text);
    }

    fn apply_tilt_angle_text(&self, row: usize, text: &str) {
        let Some(source) = self.data_source() else {
            warn!("Tilt angle edited without a data source");
            return;
        };
        debug_assert_eq!(
            source.kind(),
            DataSourceKind::TiltSeries,
            "tilt table is only shown for tilt series"
        );
        if source.kind() != DataSourceKind::TiltSeries {
            warn!(name = source.name(), "Tilt angle edited on a data source that is not a tilt series");
            return;
        }

        let Some(value) = parse_number(text) else {
            warn!(row, text = %text, "Invalid tilt angle.");
            return;
        };

        let (op, need_to_add) = match source.last_operator() {
            Some(Operator::SetTiltAngles(op)) => (op, false),
            _ => (Rc::new(SetTiltAnglesOperator::new(source.tilt_angles())), true),
        };
        let mut angles = op.tilt_angles();
        if row >= angles.len() {
            angles.resize(row + 1, 0.0);
        }
        angles[row] = value;
        op.set_tilt_angles(angles);
        if need_to_add {
            source.add_operator(Operator::SetTiltAngles(op));
        }
    }

    /// "Set Tilt Angles" button.
    pub fn request_tilt_angle_editor_dialog(&self) {
        let launcher = self.dialog.borrow().clone();
        let Some(launcher) = launcher else {
            warn!("No tilt angle dialog available");
            return;
        };
        let window = self.host_window.borrow().clone();
        launcher.show_set_tilt_angles(&window, self.data_source());
    }

    /// Unit field editing finished.
    pub fn on_units_edited(&self) {
        let Some(source) = self.data_source() else {
            return;
        };
        let text = self.form.borrow().units.clone();
        source.set_units(&text);
        self.refresh_axes_grid_labels();
    }

    /// Length field for `axis` editing finished.
    pub fn on_axis_length_edited(&self, axis: Axis) {
        let text = self.form.borrow().lengths[axis.index()].clone();
        let Some(length) = parse_number(&text) else {
            warn!("Failed to parse {axis} Length string: {text:?}");
            return;
        };
        if let Some(source) = self.data_source() {
            let Some(spacing) =
                geometry::spacing_for_length(&source.extent(), &source.spacing(), axis, length)
            else {
                warn!(name = source.name(), "{axis} has no samples; spacing left unchanged");
                return;
            };
            source.set_spacing(spacing);
        }
        self.update_needed.set(true);
        self.update_data();
        if let Some(source) = self.data_source() {
            source.properties_changed.emit(&());
        }
    }

    /// Retitle the active view's axes grid with the active data source's units.
    pub fn refresh_axes_grid_labels(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let Some(view) = registry.active_view() else {
            return;
        };
        let (Some(axes_grid), Some(source)) = (view.axes_grid(), registry.active_data_source())
        else {
            return;
        };
        for axis in Axis::ALL {
            axes_grid.set_title(axis, format!("{axis} ({})", source.units(axis)));
        }
        axes_grid.update_objects();
        view.render();
    }
}

fn clear_table(table: &mut TiltAnglesTable) {
    table.clear();
    table.set_row_count(0);
    table.hide();
}
