use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TomoviewError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid dataset descriptor: {0}")]
    DescriptorParse(#[from] toml::de::Error),

    #[error("Failed to serialize dataset descriptor: {0}")]
    DescriptorWrite(#[from] toml::ser::Error),

    #[error("Invalid tilt angle on line {line} of {}: {text:?}", path.display())]
    InvalidTiltAngle {
        path: PathBuf,
        line: usize,
        text: String,
    },

    #[error("Tilt angle count {angles} does not match projection count {projections}")]
    TiltAngleCountMismatch { angles: usize, projections: usize },

    #[error("Slice {index} is {width}x{height}, expected {expected_width}x{expected_height}")]
    SliceDimensionMismatch {
        index: usize,
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },

    #[error("Invalid axis: {0}")]
    InvalidAxis(String),

    #[error("Empty image stack")]
    EmptyStack,
}

pub type Result<T> = std::result::Result<T, TomoviewError>;
