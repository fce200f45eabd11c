use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::signal::Signal;

/// One recorded step in a data source's processing history.
#[derive(Clone)]
pub enum Operator {
    /// Replaces the tilt angles of a tilt series. Shared so an edit can
    /// update the step in place while it is still the last one.
    SetTiltAngles(Rc<SetTiltAnglesOperator>),
    /// A scripted voxel transform. Only recorded here; execution belongs to
    /// the scripting backend.
    Transform(TransformOperator),
}

impl Operator {
    pub fn as_set_tilt_angles(&self) -> Option<&Rc<SetTiltAnglesOperator>> {
        match self {
            Self::SetTiltAngles(op) => Some(op),
            Self::Transform(_) => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::SetTiltAngles(_) => "Set Tilt Angles".to_string(),
            Self::Transform(t) => t.label.clone(),
        }
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetTiltAngles(op) => f
                .debug_tuple("SetTiltAngles")
                .field(&op.tilt_angles())
                .finish(),
            Self::Transform(t) => f.debug_tuple("Transform").field(t).finish(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetTiltAngles(op) => {
                write!(f, "Set Tilt Angles ({} projections)", op.tilt_angles().len())
            }
            Self::Transform(t) => write!(f, "{t}"),
        }
    }
}

/// Operator holding a full tilt angle array, one entry per projection.
pub struct SetTiltAnglesOperator {
    tilt_angles: RefCell<Vec<f64>>,
    /// Emitted after the angle array changes.
    pub transform_modified: Signal<()>,
}

impl SetTiltAnglesOperator {
    pub fn new(tilt_angles: Vec<f64>) -> Self {
        Self {
            tilt_angles: RefCell::new(tilt_angles),
            transform_modified: Signal::new(),
        }
    }

    pub fn tilt_angles(&self) -> Vec<f64> {
        self.tilt_angles.borrow().clone()
    }

    pub fn set_tilt_angles(&self, angles: Vec<f64>) {
        *self.tilt_angles.borrow_mut() = angles;
        self.transform_modified.emit(&());
    }
}

/// A named voxel transform with its numeric parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformOperator {
    pub label: String,
    pub script: String,
    pub parameters: Vec<(String, f64)>,
}

impl TransformOperator {
    pub fn invert() -> Self {
        Self {
            label: "Invert Data".to_string(),
            script: "InvertData".to_string(),
            parameters: Vec::new(),
        }
    }

    pub fn gaussian_filter(sigma: f64) -> Self {
        Self {
            label: "Gaussian Filter".to_string(),
            script: "GaussianFilter".to_string(),
            parameters: vec![("sigma".to_string(), sigma)],
        }
    }
}

impl fmt::Display for TransformOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        if !self.parameters.is_empty() {
            let params: Vec<String> = self
                .parameters
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            write!(f, " ({})", params.join(", "))?;
        }
        Ok(())
    }
}
