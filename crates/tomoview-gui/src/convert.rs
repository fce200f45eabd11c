use ndarray::Array2;

/// Color map presets offered for the slice view.
pub const PRESETS: [&str; 3] = ["Grayscale", "Inverted", "Hot"];

/// Convert a slice (rows = y) to an egui ColorImage, mapping `range` onto
/// the preset's colors. Values outside the range are clamped.
pub fn slice_to_color_image(slice: &Array2<f32>, range: (f32, f32), preset: &str) -> egui::ColorImage {
    let (h, w) = slice.dim();
    let (lo, hi) = range;
    let scale = if hi > lo { 1.0 / (hi - lo) } else { 0.0 };
    let mut pixels = Vec::with_capacity(h * w);

    for row in 0..h {
        for col in 0..w {
            let t = ((slice[[row, col]] - lo) * scale).clamp(0.0, 1.0);
            pixels.push(map_color(t, preset));
        }
    }

    egui::ColorImage {
        size: [w, h],
        pixels,
        source_size: Default::default(),
    }
}

fn map_color(t: f32, preset: &str) -> egui::Color32 {
    match preset {
        "Inverted" => egui::Color32::from_gray(((1.0 - t) * 255.0) as u8),
        "Hot" => {
            let r = (t * 3.0).min(1.0);
            let g = (t * 3.0 - 1.0).clamp(0.0, 1.0);
            let b = (t * 3.0 - 2.0).clamp(0.0, 1.0);
            egui::Color32::from_rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
        }
        _ => egui::Color32::from_gray((t * 255.0) as u8),
    }
}
