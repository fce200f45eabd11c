//! Temporary display adapters feeding the "Dimensions & Range" readouts.
//!
//! The properties panel creates one adapter per data port of the active data
//! source and releases both when the active source changes. Every adapter is
//! registered with a [`PipelineServer`] for as long as it is alive.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use ndarray::parallel::prelude::*;
use ndarray::Array3;
use tracing::debug;

use crate::data_source::DataSource;
use crate::geometry::{self, Axis, Extent, Spacing};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataPort {
    Original,
    Transformed,
}

impl fmt::Display for DataPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => write!(f, "Original"),
            Self::Transformed => write!(f, "Transformed"),
        }
    }
}

/// Book-keeping for live display adapters.
#[derive(Default)]
pub struct PipelineServer {
    live: Cell<usize>,
    created: Cell<usize>,
}

impl PipelineServer {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn live_adapters(&self) -> usize {
        self.live.get()
    }

    pub fn created_adapters(&self) -> usize {
        self.created.get()
    }

    pub fn create_adapter(self: &Rc<Self>, source: &Rc<DataSource>, port: DataPort) -> DisplayAdapter {
        self.live.set(self.live.get() + 1);
        self.created.set(self.created.get() + 1);
        debug!(source = source.name(), %port, live = self.live.get(), "display adapter created");
        DisplayAdapter {
            source: Rc::downgrade(source),
            port,
            server: Rc::clone(self),
        }
    }
}

/// Read-only view of one port of a data source. Unregisters on drop.
pub struct DisplayAdapter {
    source: Weak<DataSource>,
    port: DataPort,
    server: Rc<PipelineServer>,
}

impl DisplayAdapter {
    pub fn port(&self) -> DataPort {
        self.port
    }

    pub fn source(&self) -> Option<Rc<DataSource>> {
        self.source.upgrade()
    }

    /// Snapshot of the port's geometry and value range. `None` once the
    /// data source is gone.
    pub fn information(&self) -> Option<DataInformation> {
        let source = self.source.upgrade()?;
        let extent = source.extent();
        let spacing = source.spacing();
        let scalar_range = match self.port {
            DataPort::Original => source.original_volume().and_then(value_range),
            DataPort::Transformed => source.transformed_volume().as_ref().and_then(value_range),
        };
        Some(DataInformation {
            dimensions: geometry::dimensions(&extent),
            extent,
            spacing,
            bounds: bounds(&extent, &spacing),
            scalar_range,
        })
    }
}

impl Drop for DisplayAdapter {
    fn drop(&mut self) {
        self.server.live.set(self.server.live.get().saturating_sub(1));
        debug!(port = %self.port, live = self.server.live.get(), "display adapter released");
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataInformation {
    pub dimensions: [usize; 3],
    pub extent: Extent,
    pub spacing: Spacing,
    /// Physical `[min, max]` per axis.
    pub bounds: [[f64; 2]; 3],
    pub scalar_range: Option<(f32, f32)>,
}

impl DataInformation {
    pub fn voxel_count(&self) -> usize {
        self.dimensions.iter().product()
    }

    /// Size of the voxel payload in MiB, assuming 32-bit floats.
    pub fn memory_mib(&self) -> f64 {
        (self.voxel_count() * std::mem::size_of::<f32>()) as f64 / (1024.0 * 1024.0)
    }
}

fn bounds(extent: &Extent, spacing: &Spacing) -> [[f64; 2]; 3] {
    Axis::ALL.map(|axis| {
        let i = axis.index();
        [
            f64::from(extent[2 * i]) * spacing[i],
            f64::from(extent[2 * i + 1]) * spacing[i],
        ]
    })
}

fn value_range(volume: &Array3<f32>) -> Option<(f32, f32)> {
    if volume.is_empty() {
        return None;
    }
    let (min, max) = volume
        .par_iter()
        .fold(
            || (f32::INFINITY, f32::NEG_INFINITY),
            |(lo, hi), &v| (lo.min(v), hi.max(v)),
        )
        .reduce(
            || (f32::INFINITY, f32::NEG_INFINITY),
            |a, b| (a.0.min(b.0), a.1.max(b.1)),
        );
    Some((min, max))
}
