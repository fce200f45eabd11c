use std::rc::Rc;

use tomoview_core::data_source::{DataSource, DataSourceKind};
use tomoview_core::geometry::Axis;
use tracing::debug;

use crate::app::TomoviewApp;
use crate::convert::slice_to_color_image;

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 20.0;

pub fn show(ctx: &egui::Context, app: &mut TomoviewApp) {
    sync_texture(ctx, app);

    egui::CentralPanel::default().show(ctx, |ui| {
        let Some(source) = app.registry.active_data_source() else {
            paint_background(ui, ui.available_rect_before_wrap());
            show_placeholder(ui, "Open a dataset to begin");
            return;
        };

        let slices = source.projection_count();
        if slices > 1 {
            ui.horizontal(|ui| {
                let label = match source.kind() {
                    DataSourceKind::TiltSeries => "Projection",
                    DataSourceKind::Volume => "Slice",
                };
                ui.label(label);
                let slider = egui::Slider::new(&mut app.viewport.slice_index, 0..=slices - 1);
                if ui.add(slider).changed() {
                    app.viewport.stale.set(true);
                }
            });
        }

        let rect = ui.available_rect_before_wrap();
        paint_background(ui, rect);

        let texture_info = app
            .viewport
            .texture
            .as_ref()
            .map(|t| (t.id(), [t.size()[0] as f32, t.size()[1] as f32]));

        if let Some((texture_id, tex_size)) = texture_info {
            let image_size = egui::vec2(tex_size[0], tex_size[1]);
            let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

            handle_zoom(ui, &response, app, rect);
            handle_pan(&response, app);

            if response.double_clicked() {
                fit_to_rect(&mut app.viewport.zoom, &mut app.viewport.pan_offset, image_size, rect);
            }

            let img_rect = compute_img_rect(rect, image_size, app);
            draw_image(ui, texture_id, img_rect);
            draw_axes_grid(ui, app, img_rect);
            draw_viewing_label(ui, rect, &app.viewport.viewing_label);
        } else {
            show_placeholder(ui, "No voxel data");
        }
    });
}

/// Rebuild the slice texture when the active source, its data or the
/// selected slice changed.
fn sync_texture(ctx: &egui::Context, app: &mut TomoviewApp) {
    let Some(source) = app.registry.active_data_source() else {
        if app.viewport.texture.is_some() {
            app.viewport.reset();
        }
        return;
    };

    if !app.viewport.is_showing(&source) {
        app.viewport.shown_source = Rc::downgrade(&source);
        app.viewport.slice_index = source.projection_count() / 2;
        let stale = Rc::clone(&app.viewport.stale);
        app.viewport.source_link = Some(source.data_changed.connect(move |_| stale.set(true)));
        app.viewport.stale.set(true);
    }

    if !app.viewport.stale.replace(false) {
        return;
    }

    app.viewport.slice_index = app.viewport.slice_index.min(source.projection_count().saturating_sub(1));
    update_texture(ctx, app, &source);
    app.view.render();
}

fn update_texture(ctx: &egui::Context, app: &mut TomoviewApp, source: &DataSource) {
    let index = app.viewport.slice_index;
    let Some(slice) = source.transformed_slice(index) else {
        app.viewport.texture = None;
        app.viewport.image_size = None;
        app.viewport.viewing_label.clear();
        return;
    };

    let (range, preset) = match app.panel.color_map_widget() {
        Some(widget) => (widget.range, widget.preset),
        None => (slice_range(&slice), app.viewport.color_preset.clone()),
    };
    let image = slice_to_color_image(&slice, range, &preset);
    let size = image.size;
    debug!(index, width = size[0], height = size[1], "slice texture updated");

    let texture = ctx.load_texture("viewport", image, egui::TextureOptions::NEAREST);
    app.viewport.texture = Some(texture);
    app.viewport.image_size = Some(size);
    app.viewport.viewing_label = format!("{} #{index}", source.name());
}

fn slice_range(slice: &ndarray::Array2<f32>) -> (f32, f32) {
    slice.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}

fn paint_background(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(30));
}

fn handle_zoom(ui: &egui::Ui, response: &egui::Response, app: &mut TomoviewApp, rect: egui::Rect) {
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
    if scroll_delta == 0.0 || !response.hovered() {
        return;
    }

    let zoom_factor = (scroll_delta * 0.005).exp();
    let new_zoom = (app.viewport.zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);

    // Zoom toward mouse cursor
    if let Some(mouse_pos) = ui.input(|i| i.pointer.hover_pos()) {
        let center = rect.center().to_vec2() + app.viewport.pan_offset;
        let mouse_rel = mouse_pos.to_vec2() - center;
        let scale_change = new_zoom / app.viewport.zoom;
        app.viewport.pan_offset += mouse_rel * (1.0 - scale_change);
    }

    app.viewport.zoom = new_zoom;
}

fn handle_pan(response: &egui::Response, app: &mut TomoviewApp) {
    if response.dragged_by(egui::PointerButton::Middle) || response.dragged_by(egui::PointerButton::Primary) {
        app.viewport.pan_offset += response.drag_delta();
    }
}

fn compute_img_rect(rect: egui::Rect, image_size: egui::Vec2, app: &TomoviewApp) -> egui::Rect {
    let scaled = image_size * app.viewport.zoom;
    let center = rect.center() + app.viewport.pan_offset;
    egui::Rect::from_center_size(center, scaled)
}

fn draw_image(ui: &egui::Ui, texture_id: egui::TextureId, img_rect: egui::Rect) {
    ui.painter().image(
        texture_id,
        img_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

/// Frame the slice and label its axes with the grid's applied titles.
fn draw_axes_grid(ui: &egui::Ui, app: &TomoviewApp, img_rect: egui::Rect) {
    let Some(grid) = app.view.axes_grid() else {
        return;
    };
    if !grid.is_visible() {
        return;
    }

    let color = egui::Color32::from_white_alpha(160);
    let painter = ui.painter();
    painter.rect_stroke(img_rect, 0.0, egui::Stroke::new(1.0, color), egui::StrokeKind::Outside);

    let font = egui::FontId::proportional(13.0);
    painter.text(
        img_rect.center_bottom() + egui::vec2(0.0, 6.0),
        egui::Align2::CENTER_TOP,
        grid.title(Axis::X),
        font.clone(),
        color,
    );
    painter.text(
        img_rect.left_center() - egui::vec2(6.0, 0.0),
        egui::Align2::RIGHT_CENTER,
        grid.title(Axis::Y),
        font.clone(),
        color,
    );
    painter.text(
        img_rect.right_top() + egui::vec2(6.0, 0.0),
        egui::Align2::LEFT_TOP,
        grid.title(Axis::Z),
        font,
        color,
    );
}

fn draw_viewing_label(ui: &egui::Ui, rect: egui::Rect, label: &str) {
    if label.is_empty() {
        return;
    }
    let label_pos = rect.left_top() + egui::vec2(8.0, 8.0);
    ui.painter().text(
        label_pos,
        egui::Align2::LEFT_TOP,
        label,
        egui::FontId::proportional(14.0),
        egui::Color32::from_white_alpha(200),
    );
}

fn show_placeholder(ui: &mut egui::Ui, text: &str) {
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new(text)
                .size(18.0)
                .color(egui::Color32::from_gray(100)),
        );
    });
}

fn fit_to_rect(zoom: &mut f32, pan: &mut egui::Vec2, image_size: egui::Vec2, rect: egui::Rect) {
    let available = rect.size();
    let fit_x = available.x / image_size.x;
    let fit_y = available.y / image_size.y;
    *zoom = fit_x.min(fit_y).clamp(MIN_ZOOM, MAX_ZOOM);
    *pan = egui::Vec2::ZERO;
}
