#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tomoview_core::active::ActiveObjects;
use tomoview_core::adapter::PipelineServer;
use tomoview_core::data_source::{DataSource, DataSourceKind};
use tomoview_core::geometry::{Extent, Spacing};
use tomoview_core::panel::{HostWindow, PropertiesPanel, TiltAngleDialogLauncher};
use tomoview_core::view::RenderTarget;

/// Tilt series with one projection per angle on a 10x10 detector.
pub fn tilt_series(angles: &[f64]) -> Rc<DataSource> {
    DataSource::builder("tilt")
        .kind(DataSourceKind::TiltSeries)
        .extent([0, 9, 0, 9, 0, angles.len() as i32 - 1])
        .tilt_angles(angles.to_vec())
        .build()
        .expect("angle count matches extent")
}

pub fn volume(extent: Extent, spacing: Spacing) -> Rc<DataSource> {
    DataSource::builder("volume")
        .extent(extent)
        .spacing(spacing)
        .build()
        .expect("volume builds")
}

pub struct Harness {
    pub registry: Rc<ActiveObjects>,
    pub server: Rc<PipelineServer>,
    pub panel: Rc<PropertiesPanel>,
}

impl Harness {
    /// Registry, server and a visible panel.
    pub fn visible() -> Self {
        let harness = Self::hidden();
        harness.panel.set_visible(true);
        harness
    }

    pub fn hidden() -> Self {
        let registry = ActiveObjects::new();
        let server = PipelineServer::new();
        let panel = PropertiesPanel::new(&registry, Rc::clone(&server));
        Self {
            registry,
            server,
            panel,
        }
    }

    pub fn activate(&self, source: &Rc<DataSource>) {
        self.registry.add_data_source(Rc::clone(source));
        self.registry.set_active_data_source(Some(Rc::clone(source)));
    }
}

/// Counts emissions of a `()` signal.
pub fn counter() -> (Rc<Cell<u32>>, impl Fn(&()) + 'static) {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    (count, move |_: &()| c.set(c.get() + 1))
}

pub struct CountingTarget(pub Rc<Cell<u32>>);

impl RenderTarget for CountingTarget {
    fn request_render(&self) {
        self.0.set(self.0.get() + 1);
    }
}

#[derive(Default)]
pub struct RecordingLauncher {
    pub calls: RefCell<Vec<(String, Option<String>)>>,
}

impl TiltAngleDialogLauncher for RecordingLauncher {
    fn show_set_tilt_angles(&self, window: &HostWindow, source: Option<Rc<DataSource>>) {
        self.calls
            .borrow_mut()
            .push((window.title.clone(), source.map(|s| s.name().to_string())));
    }
}
