use std::path::{Path, PathBuf};
use std::rc::Rc;

use ndarray::Array3;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::data_source::{DataSource, DataSourceKind};
use crate::error::Result;
use crate::geometry::{self, Axis, Spacing};

/// TOML description of a dataset on disk.
///
/// ```toml
/// name = "tilt series"
/// kind = "tilt_series"
/// units = "nm"
/// spacing = [0.5, 0.5, 1.0]
/// images = ["proj_000.tif", "proj_001.tif"]
/// tilt_angles = [-10.0, 10.0]
/// ```
///
/// Relative paths are resolved against the descriptor's directory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub name: String,
    #[serde(default)]
    pub kind: DataSourceKind,
    /// Unit string for all axes; the caller's default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default = "default_spacing")]
    pub spacing: Spacing,
    /// Index of the first voxel along X, Y, Z.
    #[serde(default)]
    pub origin: [i32; 3],
    /// Sample counts for a dataset described without images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<[usize; 3]>,
    /// One image per z slice (projection, for a tilt series).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt_angles: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt_angles_file: Option<PathBuf>,
}

fn default_spacing() -> Spacing {
    [1.0; 3]
}

impl Default for DatasetDescriptor {
    fn default() -> Self {
        Self {
            name: "dataset".to_string(),
            kind: DataSourceKind::default(),
            units: None,
            spacing: default_spacing(),
            origin: [0; 3],
            dimensions: None,
            images: Vec::new(),
            tilt_angles: None,
            tilt_angles_file: None,
        }
    }
}

impl DatasetDescriptor {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn image_paths(&self, base_dir: &Path) -> Vec<PathBuf> {
        self.images.iter().map(|p| base_dir.join(p)).collect()
    }

    /// Inline angles win over `tilt_angles_file`.
    pub fn resolve_tilt_angles(&self, base_dir: &Path) -> Result<Option<Vec<f64>>> {
        if let Some(angles) = &self.tilt_angles {
            return Ok(Some(angles.clone()));
        }
        match &self.tilt_angles_file {
            Some(file) => Ok(Some(super::tilt::read_tilt_angles(&base_dir.join(file))?)),
            None => Ok(None),
        }
    }

    /// Build a data source, decoding images if any. `on_slice` ticks once
    /// per decoded image.
    pub fn to_data_source<F>(
        &self,
        base_dir: &Path,
        default_units: &str,
        on_slice: F,
    ) -> Result<Rc<DataSource>>
    where
        F: Fn() + Sync,
    {
        let volume = self.read_volume(base_dir, on_slice)?;
        self.to_data_source_with_volume(base_dir, default_units, volume)
    }

    /// Decode the image stack, if the descriptor lists any images.
    pub fn read_volume<F>(&self, base_dir: &Path, on_slice: F) -> Result<Option<Array3<f32>>>
    where
        F: Fn() + Sync,
    {
        if self.images.is_empty() {
            return Ok(None);
        }
        let volume = super::stack::load_image_stack(&self.image_paths(base_dir), on_slice)?;
        Ok(Some(volume))
    }

    /// Build a data source around an already decoded volume.
    pub fn to_data_source_with_volume(
        &self,
        base_dir: &Path,
        default_units: &str,
        volume: Option<Array3<f32>>,
    ) -> Result<Rc<DataSource>> {
        let mut builder = DataSource::builder(self.name.clone())
            .kind(self.kind)
            .origin(self.origin)
            .spacing(self.spacing)
            .units(self.units.as_deref().unwrap_or(default_units));

        if let Some(volume) = volume {
            builder = builder.volume(volume);
        } else if let Some(dims) = self.dimensions {
            builder = builder.extent(geometry::extent_from_dimensions(dims, self.origin));
        }

        if let Some(angles) = self.resolve_tilt_angles(base_dir)? {
            builder = builder.tilt_angles(angles);
        }

        let source = builder.build()?;
        info!(name = source.name(), kind = %source.kind(), "dataset loaded");
        Ok(source)
    }

    /// Copy the editable state of `source` (kind, spacing, units, tilt
    /// angles) into this descriptor. Tilt angles are written inline.
    pub fn update_from(&mut self, source: &DataSource) {
        self.kind = source.kind();
        self.spacing = source.spacing();
        self.units = Some(source.units(Axis::X));
        if source.kind() == DataSourceKind::TiltSeries {
            self.tilt_angles = Some(source.tilt_angles());
            self.tilt_angles_file = None;
        }
    }
}
