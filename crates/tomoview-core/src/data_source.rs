use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use ndarray::{Array2, Array3, Axis as NdAxis};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TomoviewError};
use crate::geometry::{self, Axis, Extent, Spacing};
use crate::operator::Operator;
use crate::signal::{Signal, Subscription};

pub const DEFAULT_UNITS: &str = "nm";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceKind {
    #[default]
    Volume,
    TiltSeries,
}

impl fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Volume => write!(f, "Volume"),
            Self::TiltSeries => write!(f, "Tilt Series"),
        }
    }
}

/// One loaded dataset: geometry, units, tilt angles, voxels and the
/// operator history applied to them.
///
/// Voxel arrays are laid out `(z, y, x)`. For a tilt series each z slice is
/// one projection and carries one tilt angle.
pub struct DataSource {
    name: String,
    kind: Cell<DataSourceKind>,
    extent: Cell<Extent>,
    spacing: Cell<Spacing>,
    units: RefCell<[String; 3]>,
    original_tilt_angles: RefCell<Vec<f64>>,
    tilt_angles: RefCell<Vec<f64>>,
    operators: RefCell<Vec<Operator>>,
    operator_links: RefCell<Vec<Subscription>>,
    original: Option<Array3<f32>>,
    transformed: RefCell<Option<Array3<f32>>>,
    /// Voxels, tilt angles or kind changed.
    pub data_changed: Signal<()>,
    /// Geometry or units were edited by a property editor.
    pub properties_changed: Signal<()>,
}

impl DataSource {
    pub fn builder(name: impl Into<String>) -> DataSourceBuilder {
        DataSourceBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DataSourceKind {
        self.kind.get()
    }

    /// Change the kind. Becoming a tilt series pads or truncates the angle
    /// list to the projection count.
    pub fn set_kind(&self, kind: DataSourceKind) {
        if self.kind.replace(kind) == kind {
            return;
        }
        if kind == DataSourceKind::TiltSeries {
            let count = self.projection_count();
            self.original_tilt_angles.borrow_mut().resize(count, 0.0);
            self.tilt_angles.borrow_mut().resize(count, 0.0);
        }
        debug!(name = %self.name, %kind, "data source kind changed");
        self.data_changed.emit(&());
    }

    pub fn extent(&self) -> Extent {
        self.extent.get()
    }

    pub fn spacing(&self) -> Spacing {
        self.spacing.get()
    }

    pub fn set_spacing(&self, spacing: Spacing) {
        debug!(name = %self.name, ?spacing, "spacing set");
        self.spacing.set(spacing);
    }

    pub fn dimensions(&self) -> [usize; 3] {
        geometry::dimensions(&self.extent())
    }

    /// Number of projections in a tilt series (samples along Z).
    pub fn projection_count(&self) -> usize {
        self.dimensions()[Axis::Z.index()]
    }

    pub fn units(&self, axis: Axis) -> String {
        self.units.borrow()[axis.index()].clone()
    }

    /// Set the same unit string on all three axes.
    pub fn set_units(&self, units: &str) {
        let mut all = self.units.borrow_mut();
        for u in all.iter_mut() {
            *u = units.to_string();
        }
        debug!(name = %self.name, units, "units set");
    }

    pub fn set_axis_units(&self, axis: Axis, units: &str) {
        self.units.borrow_mut()[axis.index()] = units.to_string();
    }

    /// Current tilt angles, after every operator in the history.
    pub fn tilt_angles(&self) -> Vec<f64> {
        self.tilt_angles.borrow().clone()
    }

    pub fn operators(&self) -> Vec<Operator> {
        self.operators.borrow().clone()
    }

    pub fn last_operator(&self) -> Option<Operator> {
        self.operators.borrow().last().cloned()
    }

    /// Append `op` to the history and re-apply the history.
    pub fn add_operator(self: &Rc<Self>, op: Operator) {
        if let Operator::SetTiltAngles(tilt) = &op {
            let weak = Rc::downgrade(self);
            let link = tilt.transform_modified.connect(move |_| {
                if let Some(source) = weak.upgrade() {
                    source.apply_operators();
                }
            });
            self.operator_links.borrow_mut().push(link);
        }
        debug!(name = %self.name, operator = %op, "operator added");
        self.operators.borrow_mut().push(op);
        self.apply_operators();
    }

    fn apply_operators(&self) {
        let mut angles = self.original_tilt_angles.borrow().clone();
        for op in self.operators.borrow().iter() {
            if let Some(tilt) = op.as_set_tilt_angles() {
                angles = tilt.tilt_angles();
            }
        }
        *self.tilt_angles.borrow_mut() = angles;
        self.data_changed.emit(&());
    }

    pub fn original_volume(&self) -> Option<&Array3<f32>> {
        self.original.as_ref()
    }

    pub fn transformed_volume(&self) -> Ref<'_, Option<Array3<f32>>> {
        self.transformed.borrow()
    }

    /// Replace the transformed voxels, e.g. with the output of a script run.
    pub fn set_transformed_volume(&self, volume: Array3<f32>) {
        *self.transformed.borrow_mut() = Some(volume);
        self.data_changed.emit(&());
    }

    /// Copy of z slice `index` of the transformed voxels.
    pub fn transformed_slice(&self, index: usize) -> Option<Array2<f32>> {
        let transformed = self.transformed.borrow();
        let volume = transformed.as_ref()?;
        if index >= volume.len_of(NdAxis(0)) {
            return None;
        }
        Some(volume.index_axis(NdAxis(0), index).to_owned())
    }
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSource")
            .field("name", &self.name)
            .field("kind", &self.kind.get())
            .field("extent", &self.extent.get())
            .field("spacing", &self.spacing.get())
            .field("operators", &self.operators.borrow().len())
            .finish_non_exhaustive()
    }
}

pub struct DataSourceBuilder {
    name: String,
    kind: DataSourceKind,
    extent: Option<Extent>,
    origin: [i32; 3],
    spacing: Spacing,
    units: [String; 3],
    tilt_angles: Option<Vec<f64>>,
    volume: Option<Array3<f32>>,
}

impl DataSourceBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DataSourceKind::Volume,
            extent: None,
            origin: [0; 3],
            spacing: [1.0; 3],
            units: [0; 3].map(|_| DEFAULT_UNITS.to_string()),
            tilt_angles: None,
            volume: None,
        }
    }

    pub fn kind(mut self, kind: DataSourceKind) -> Self {
        self.kind = kind;
        self
    }

    /// Explicit extent; ignored when voxels are supplied.
    pub fn extent(mut self, extent: Extent) -> Self {
        self.extent = Some(extent);
        self
    }

    /// Index of the first voxel along X, Y, Z when deriving the extent from voxels.
    pub fn origin(mut self, origin: [i32; 3]) -> Self {
        self.origin = origin;
        self
    }

    pub fn spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn units(mut self, units: &str) -> Self {
        self.units = [0; 3].map(|_| units.to_string());
        self
    }

    pub fn tilt_angles(mut self, angles: Vec<f64>) -> Self {
        self.tilt_angles = Some(angles);
        self
    }

    pub fn volume(mut self, volume: Array3<f32>) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn build(self) -> Result<Rc<DataSource>> {
        let extent = match (&self.volume, self.extent) {
            (Some(volume), _) => {
                let (z, y, x) = volume.dim();
                geometry::extent_from_dimensions([x, y, z], self.origin)
            }
            (None, Some(extent)) => extent,
            (None, None) => geometry::extent_from_dimensions([1, 1, 1], self.origin),
        };
        let projections = geometry::dimensions(&extent)[Axis::Z.index()];

        let tilt_angles = match (self.kind, self.tilt_angles) {
            (DataSourceKind::TiltSeries, Some(angles)) if angles.len() != projections => {
                return Err(TomoviewError::TiltAngleCountMismatch {
                    angles: angles.len(),
                    projections,
                });
            }
            (DataSourceKind::TiltSeries, None) => vec![0.0; projections],
            (_, angles) => angles.unwrap_or_default(),
        };

        Ok(Rc::new(DataSource {
            name: self.name,
            kind: Cell::new(self.kind),
            extent: Cell::new(extent),
            spacing: Cell::new(self.spacing),
            units: RefCell::new(self.units),
            original_tilt_angles: RefCell::new(tilt_angles.clone()),
            tilt_angles: RefCell::new(tilt_angles),
            operators: RefCell::new(Vec::new()),
            operator_links: RefCell::new(Vec::new()),
            transformed: RefCell::new(self.volume.clone()),
            original: self.volume,
            data_changed: Signal::new(),
            properties_changed: Signal::new(),
        }))
    }
}
