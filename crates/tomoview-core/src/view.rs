use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use crate::geometry::Axis;

/// Something that can redraw a view, e.g. the GUI viewport.
pub trait RenderTarget {
    fn request_render(&self);
}

/// Scene decoration showing per-axis titles.
///
/// Titles are staged with [`AxesGrid::set_title`] and take effect in the
/// scene on [`AxesGrid::update_objects`].
#[derive(Default)]
pub struct AxesGrid {
    staged: RefCell<[String; 3]>,
    applied: RefCell<[String; 3]>,
    visible: Cell<bool>,
    revision: Cell<u64>,
}

impl AxesGrid {
    pub fn set_title(&self, axis: Axis, title: String) {
        self.staged.borrow_mut()[axis.index()] = title;
    }

    /// Title as currently shown in the scene.
    pub fn title(&self, axis: Axis) -> String {
        self.applied.borrow()[axis.index()].clone()
    }

    pub fn titles(&self) -> [String; 3] {
        self.applied.borrow().clone()
    }

    /// Push staged titles to the scene.
    pub fn update_objects(&self) {
        let staged = self.staged.borrow().clone();
        *self.applied.borrow_mut() = staged;
        self.revision.set(self.revision.get() + 1);
    }

    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }
}

/// A render view. The axes grid is created the first time it is asked for.
pub struct View {
    name: String,
    supports_axes_grid: bool,
    axes_grid: RefCell<Option<Rc<AxesGrid>>>,
    render_target: RefCell<Option<Box<dyn RenderTarget>>>,
    render_count: Cell<u64>,
}

impl View {
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            supports_axes_grid: true,
            axes_grid: RefCell::new(None),
            render_target: RefCell::new(None),
            render_count: Cell::new(0),
        })
    }

    /// A view type with no axes grid, such as a line chart.
    pub fn without_axes_grid(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            supports_axes_grid: false,
            axes_grid: RefCell::new(None),
            render_target: RefCell::new(None),
            render_count: Cell::new(0),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn axes_grid(&self) -> Option<Rc<AxesGrid>> {
        if !self.supports_axes_grid {
            return None;
        }
        let mut slot = self.axes_grid.borrow_mut();
        let grid = slot.get_or_insert_with(|| {
            debug!(view = %self.name, "axes grid created");
            Rc::new(AxesGrid::default())
        });
        Some(Rc::clone(grid))
    }

    pub fn set_render_target(&self, target: Option<Box<dyn RenderTarget>>) {
        *self.render_target.borrow_mut() = target;
    }

    /// Ask the render target to redraw. Returns `false` when there is none.
    pub fn render(&self) -> bool {
        let target = self.render_target.borrow();
        let Some(target) = target.as_ref() else {
            return false;
        };
        target.request_render();
        self.render_count.set(self.render_count.get() + 1);
        true
    }

    pub fn render_count(&self) -> u64 {
        self.render_count.get()
    }
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("name", &self.name)
            .field("render_count", &self.render_count.get())
            .finish_non_exhaustive()
    }
}
