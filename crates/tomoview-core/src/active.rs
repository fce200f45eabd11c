use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::data_source::DataSource;
use crate::signal::Signal;
use crate::view::View;

/// Registry of loaded data sources and of the currently active data source
/// and view. Handed to whoever needs it; there is no global instance.
#[derive(Default)]
pub struct ActiveObjects {
    data_sources: RefCell<Vec<Rc<DataSource>>>,
    active_data_source: RefCell<Weak<DataSource>>,
    active_view: RefCell<Option<Rc<View>>>,
    pub data_source_changed: Signal<Option<Rc<DataSource>>>,
    pub view_changed: Signal<Option<Rc<View>>>,
}

impl ActiveObjects {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn data_sources(&self) -> Vec<Rc<DataSource>> {
        self.data_sources.borrow().clone()
    }

    pub fn add_data_source(&self, source: Rc<DataSource>) {
        debug!(name = source.name(), "data source registered");
        self.data_sources.borrow_mut().push(source);
    }

    /// Unregister `source`, clearing the active data source if it was active.
    pub fn remove_data_source(&self, source: &Rc<DataSource>) {
        self.data_sources
            .borrow_mut()
            .retain(|item| !Rc::ptr_eq(item, source));
        let was_active = self
            .active_data_source()
            .is_some_and(|active| Rc::ptr_eq(&active, source));
        if was_active {
            self.set_active_data_source(None);
        }
    }

    pub fn active_data_source(&self) -> Option<Rc<DataSource>> {
        self.active_data_source.borrow().upgrade()
    }

    /// Change the active data source. Emits `data_source_changed` only when
    /// it actually changes.
    pub fn set_active_data_source(&self, source: Option<Rc<DataSource>>) {
        let current = self.active_data_source();
        let unchanged = match (&current, &source) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }
        *self.active_data_source.borrow_mut() =
            source.as_ref().map(Rc::downgrade).unwrap_or_default();
        debug!(name = source.as_ref().map(|s| s.name()), "active data source changed");
        self.data_source_changed.emit(&source);
    }

    pub fn active_view(&self) -> Option<Rc<View>> {
        self.active_view.borrow().clone()
    }

    pub fn set_active_view(&self, view: Option<Rc<View>>) {
        let unchanged = match (&*self.active_view.borrow(), &view) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }
        *self.active_view.borrow_mut() = view.clone();
        debug!(name = view.as_ref().map(|v| v.name()), "active view changed");
        self.view_changed.emit(&view);
    }
}
