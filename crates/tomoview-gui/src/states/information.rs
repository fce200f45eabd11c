use std::cell::Cell;
use std::rc::{Rc, Weak};

use tomoview_core::adapter::DataInformation;
use tomoview_core::data_source::DataSource;
use tomoview_core::panel::PropertiesPanel;
use tomoview_core::signal::Subscription;

/// Adapter information for the panel's data source, recomputed only after
/// the source reports a change.
#[derive(Default)]
pub struct InformationCache {
    source: Weak<DataSource>,
    links: Vec<Subscription>,
    stale: Rc<Cell<bool>>,
    pub original: Option<DataInformation>,
    pub transformed: Option<DataInformation>,
}

impl InformationCache {
    pub fn refresh(&mut self, panel: &PropertiesPanel) {
        let current = panel.data_source();
        let same = match (&current, self.source.upgrade()) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, &b),
            (None, None) => true,
            _ => false,
        };

        if !same {
            self.links.clear();
            self.source = current.as_ref().map(Rc::downgrade).unwrap_or_default();
            if let Some(source) = &current {
                let stale = Rc::clone(&self.stale);
                self.links.push(source.data_changed.connect(move |_| stale.set(true)));
                let stale = Rc::clone(&self.stale);
                self.links.push(source.properties_changed.connect(move |_| stale.set(true)));
            }
            self.stale.set(true);
        }

        if self.stale.replace(false) {
            self.original = panel.original_information();
            self.transformed = panel.transformed_information();
        }
    }
}
