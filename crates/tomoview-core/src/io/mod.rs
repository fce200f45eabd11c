pub mod descriptor;
pub mod stack;
pub mod tilt;

pub use descriptor::DatasetDescriptor;
