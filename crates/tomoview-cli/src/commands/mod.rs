pub mod info;
pub mod length;
pub mod tilt;

use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tomoview_core::data_source::{DataSource, DEFAULT_UNITS};
use tomoview_core::io::DatasetDescriptor;

/// Read a descriptor and build its data source, with a progress bar while
/// images decode.
pub fn load(path: &Path) -> Result<(DatasetDescriptor, Rc<DataSource>)> {
    let descriptor = DatasetDescriptor::load(path)
        .with_context(|| format!("Failed to read descriptor {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let pb = ProgressBar::new(descriptor.images.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} slices")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    if descriptor.images.is_empty() {
        pb.finish_and_clear();
    }

    let source = descriptor
        .to_data_source(base_dir, DEFAULT_UNITS, || pb.inc(1))
        .with_context(|| format!("Failed to load dataset {}", path.display()))?;
    pb.finish_and_clear();

    Ok((descriptor, source))
}
