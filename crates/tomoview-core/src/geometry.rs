use std::fmt;
use std::str::FromStr;

use crate::error::TomoviewError;

/// Index extent as `[xmin, xmax, ymin, ymax, zmin, zmax]`, bounds inclusive.
pub type Extent = [i32; 6];

/// Physical size of one voxel along each axis.
pub type Spacing = [f64; 3];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
            Self::Z => write!(f, "Z"),
        }
    }
}

impl FromStr for Axis {
    type Err = TomoviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" | "0" => Ok(Self::X),
            "y" | "1" => Ok(Self::Y),
            "z" | "2" => Ok(Self::Z),
            _ => Err(TomoviewError::InvalidAxis(s.to_string())),
        }
    }
}

/// Number of samples along `axis` (`max - min + 1`).
pub fn sample_count(extent: &Extent, axis: Axis) -> i32 {
    let i = axis.index();
    extent[2 * i + 1] - extent[2 * i] + 1
}

/// Sample counts along X, Y and Z, clamped at zero for empty extents.
pub fn dimensions(extent: &Extent) -> [usize; 3] {
    Axis::ALL.map(|axis| sample_count(extent, axis).max(0) as usize)
}

/// Physical length along `axis`: spacing times sample count.
pub fn axis_length(extent: &Extent, spacing: &Spacing, axis: Axis) -> f64 {
    spacing[axis.index()] * f64::from(sample_count(extent, axis))
}

pub fn axis_lengths(extent: &Extent, spacing: &Spacing) -> [f64; 3] {
    Axis::ALL.map(|axis| axis_length(extent, spacing, axis))
}

/// Spacing vector giving `axis` the physical `length`, other axes untouched.
/// `None` if the extent has no samples along `axis`.
pub fn spacing_for_length(
    extent: &Extent,
    spacing: &Spacing,
    axis: Axis,
    length: f64,
) -> Option<Spacing> {
    let count = sample_count(extent, axis);
    if count <= 0 {
        return None;
    }
    let mut out = *spacing;
    out[axis.index()] = length / f64::from(count);
    Some(out)
}

/// Extent spanning `dims` samples per axis, starting at `origin`.
pub fn extent_from_dimensions(dims: [usize; 3], origin: [i32; 3]) -> Extent {
    let mut extent = [0; 6];
    for axis in Axis::ALL {
        let i = axis.index();
        extent[2 * i] = origin[i];
        extent[2 * i + 1] = origin[i] + dims[i] as i32 - 1;
    }
    extent
}
