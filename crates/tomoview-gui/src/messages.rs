use std::path::PathBuf;

use ndarray::Array3;
use tomoview_core::io::DatasetDescriptor;

/// Results sent from background threads to the UI thread.
pub enum AppMessage {
    /// A descriptor was read and its image stack decoded.
    DatasetLoaded {
        path: PathBuf,
        descriptor: DatasetDescriptor,
        volume: Option<Array3<f32>>,
    },

    /// Image decoding progress for the dataset being opened.
    Progress { done: usize, total: usize },

    /// The user picked a tilt angle file in the tilt angle dialog.
    TiltFilePicked { path: PathBuf },

    /// The user picked a destination for exported tilt angles.
    TiltExportPicked { path: PathBuf },

    /// Error message to display in the log.
    Error { message: String },
}
