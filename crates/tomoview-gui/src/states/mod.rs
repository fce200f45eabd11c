mod information;
mod ui;
mod viewport;

pub use information::InformationCache;
pub use ui::{CellEdit, OpenDataset, UIState};
pub use viewport::ViewportState;
