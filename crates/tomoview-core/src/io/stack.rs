use std::path::{Path, PathBuf};

use ndarray::{Array2, Array3};
use rayon::prelude::*;
use tracing::info;

use crate::error::{Result, TomoviewError};

/// Load 2D images as the z slices of a volume, shape `(z, y, x)`, values
/// in [0.0, 1.0]. `on_slice` is called once per decoded image, from any
/// thread.
pub fn load_image_stack<F>(paths: &[PathBuf], on_slice: F) -> Result<Array3<f32>>
where
    F: Fn() + Sync,
{
    if paths.is_empty() {
        return Err(TomoviewError::EmptyStack);
    }

    let slices = paths
        .par_iter()
        .map(|path| {
            let slice = load_slice(path);
            on_slice();
            slice
        })
        .collect::<Result<Vec<_>>>()?;

    let (height, width) = slices[0].dim();
    for (index, slice) in slices.iter().enumerate() {
        let (h, w) = slice.dim();
        if (h, w) != (height, width) {
            return Err(TomoviewError::SliceDimensionMismatch {
                index,
                width: w as u32,
                height: h as u32,
                expected_width: width as u32,
                expected_height: height as u32,
            });
        }
    }

    let mut volume = Array3::<f32>::zeros((slices.len(), height, width));
    for (mut plane, slice) in volume.outer_iter_mut().zip(&slices) {
        plane.assign(slice);
    }
    info!(slices = slices.len(), width, height, "image stack loaded");
    Ok(volume)
}

fn load_slice(path: &Path) -> Result<Array2<f32>> {
    let img = image::open(path)?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    let mut data = Array2::<f32>::zeros((h as usize, w as usize));

    for row in 0..h as usize {
        for col in 0..w as usize {
            let pixel = gray.get_pixel(col as u32, row as u32);
            data[[row, col]] = pixel.0[0] as f32 / 65535.0;
        }
    }

    Ok(data)
}
