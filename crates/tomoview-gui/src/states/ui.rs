use std::path::PathBuf;
use std::rc::Rc;

use tomoview_core::data_source::DataSource;
use tomoview_core::io::DatasetDescriptor;

use super::InformationCache;

/// A dataset opened from a descriptor file.
pub struct OpenDataset {
    pub path: PathBuf,
    pub descriptor: DatasetDescriptor,
    pub source: Rc<DataSource>,
}

/// Text typed into a tilt table cell, committed when the cell loses focus.
pub struct CellEdit {
    pub row: usize,
    pub text: String,
}

/// Overall UI state.
#[derive(Default)]
pub struct UIState {
    pub datasets: Vec<OpenDataset>,

    /// Images decoded so far for the dataset being opened.
    pub loading: Option<(usize, usize)>,

    pub tilt_cell_edit: Option<CellEdit>,
    pub information: InformationCache,

    /// Log messages.
    pub log_messages: Vec<String>,
}

impl UIState {
    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    pub fn dataset_mut(&mut self, source: &Rc<DataSource>) -> Option<&mut OpenDataset> {
        self.datasets
            .iter_mut()
            .find(|d| Rc::ptr_eq(&d.source, source))
    }

    pub fn remove_dataset(&mut self, source: &Rc<DataSource>) {
        self.datasets.retain(|d| !Rc::ptr_eq(&d.source, source));
    }
}
