use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;

use tomoview_core::io::DatasetDescriptor;
use tracing::info;

use crate::messages::AppMessage;

/// Read a descriptor and decode its images off the UI thread. The data
/// source itself is built on the UI thread when `DatasetLoaded` arrives.
pub fn spawn_load(path: PathBuf, tx: mpsc::Sender<AppMessage>, ctx: egui::Context) {
    std::thread::spawn(move || {
        let message = match load(&path, &tx, &ctx) {
            Ok((descriptor, volume)) => AppMessage::DatasetLoaded {
                path,
                descriptor,
                volume,
            },
            Err(e) => AppMessage::Error {
                message: format!("Failed to open {}: {e}", path.display()),
            },
        };
        let _ = tx.send(message);
        ctx.request_repaint();
    });
}

fn load(
    path: &Path,
    tx: &mpsc::Sender<AppMessage>,
    ctx: &egui::Context,
) -> tomoview_core::error::Result<(DatasetDescriptor, Option<ndarray::Array3<f32>>)> {
    let descriptor = DatasetDescriptor::load(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let total = descriptor.images.len();
    info!(path = %path.display(), images = total, "opening dataset");

    let done = AtomicUsize::new(0);
    let volume = descriptor.read_volume(base_dir, || {
        let done = done.fetch_add(1, Ordering::Relaxed) + 1;
        let _ = tx.send(AppMessage::Progress { done, total });
        ctx.request_repaint();
    })?;

    Ok((descriptor, volume))
}

/// Ask for a descriptor file, then load it.
pub fn pick_and_load(tx: mpsc::Sender<AppMessage>, ctx: egui::Context) {
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Dataset descriptor", &["toml"])
            .add_filter("All files", &["*"])
            .pick_file()
        {
            spawn_load(path, tx, ctx);
        }
    });
}

pub fn pick_tilt_file(tx: mpsc::Sender<AppMessage>, ctx: egui::Context) {
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Tilt angles", &["tlt", "rawtlt"])
            .add_filter("All files", &["*"])
            .pick_file()
        {
            let _ = tx.send(AppMessage::TiltFilePicked { path });
            ctx.request_repaint();
        }
    });
}

pub fn pick_tilt_export(tx: mpsc::Sender<AppMessage>, ctx: egui::Context) {
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Tilt angles", &["tlt", "rawtlt"])
            .set_file_name("tilt_angles.tlt")
            .save_file()
        {
            let _ = tx.send(AppMessage::TiltExportPicked { path });
            ctx.request_repaint();
        }
    });
}
