use std::cell::Cell;
use std::rc::{Rc, Weak};

use tomoview_core::data_source::DataSource;
use tomoview_core::signal::Subscription;

/// Viewport display state.
pub struct ViewportState {
    pub texture: Option<egui::TextureHandle>,
    /// Size of the displayed slice, in samples.
    pub image_size: Option<[usize; 2]>,
    pub zoom: f32,
    pub pan_offset: egui::Vec2,
    pub viewing_label: String,

    /// Source whose slice is in `texture`.
    pub shown_source: Weak<DataSource>,
    pub slice_index: usize,
    pub color_preset: String,
    /// Set when the shown source reports new data.
    pub stale: Rc<Cell<bool>>,
    pub source_link: Option<Subscription>,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            texture: None,
            image_size: None,
            zoom: 1.0,
            pan_offset: egui::Vec2::ZERO,
            viewing_label: String::new(),
            shown_source: Weak::new(),
            slice_index: 0,
            color_preset: crate::convert::PRESETS[0].to_string(),
            stale: Rc::new(Cell::new(false)),
            source_link: None,
        }
    }
}

impl ViewportState {
    pub fn is_showing(&self, source: &Rc<DataSource>) -> bool {
        self.shown_source
            .upgrade()
            .is_some_and(|shown| Rc::ptr_eq(&shown, source))
    }

    pub fn reset(&mut self) {
        self.texture = None;
        self.image_size = None;
        self.viewing_label.clear();
        self.shown_source = Weak::new();
        self.source_link = None;
        self.stale.set(false);
    }
}
