mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{counter, tilt_series, volume, CountingTarget, Harness, RecordingLauncher};
use tomoview_core::data_source::DataSourceKind;
use tomoview_core::geometry::Axis;
use tomoview_core::operator::{Operator, TransformOperator};
use tomoview_core::panel::{format_number, ColorMapWidget, HostWindow};
use tomoview_core::view::View;

fn edit_tilt_cell(h: &Harness, row: usize, text: &str) {
    assert!(h.panel.form_mut().tilt.table.set_cell_text(row, 0, text));
    h.panel.process_tilt_cell_changes();
}

// ---------------------------------------------------------------------------
// Geometry display and editing
// ---------------------------------------------------------------------------

#[test]
fn test_displayed_lengths_are_spacing_times_sample_count() {
    let cases = [
        ([0, 9, 0, 19, 0, 4], [1.0, 2.0, 3.0]),
        ([-5, 5, 3, 3, 10, 99], [0.1, 0.25, 1.7]),
        ([0, 511, 0, 511, 0, 119], [0.3, 0.3, 0.45]),
    ];
    for (extent, spacing) in cases {
        let h = Harness::visible();
        let source = volume(extent, spacing);
        h.activate(&source);

        let form = h.panel.form();
        for i in 0..3 {
            let expected = spacing[i] * f64::from(extent[2 * i + 1] - extent[2 * i] + 1);
            assert_eq!(form.lengths[i], format_number(expected));
            assert_eq!(form.lengths[i].parse::<f64>().unwrap(), expected);
        }
        assert_eq!(form.units, "nm");
    }
}

#[test]
fn test_axis_length_edit_recomputes_only_that_axis() {
    let h = Harness::visible();
    let source = volume([0, 9, 0, 19, 0, 4], [1.0, 2.0, 3.0]);
    h.activate(&source);
    let (emitted, handler) = counter();
    let _sub = source.properties_changed.connect(handler);

    h.panel.form_mut().lengths[1] = "50".to_string();
    h.panel.on_axis_length_edited(Axis::Y);

    assert_eq!(source.spacing(), [1.0, 2.5, 3.0]);
    assert_eq!(emitted.get(), 1);
    let form = h.panel.form();
    assert_eq!(form.lengths, ["10", "50", "15"]);
}

#[test]
fn test_axis_length_uses_current_extent_with_offset_origin() {
    let h = Harness::visible();
    let source = volume([10, 13, 0, 0, 0, 0], [1.0, 1.0, 1.0]);
    h.activate(&source);

    h.panel.form_mut().lengths[0] = "2".to_string();
    h.panel.on_axis_length_edited(Axis::X);

    assert_eq!(source.spacing(), [0.5, 1.0, 1.0]);
}

#[test]
fn test_unparseable_length_changes_nothing() {
    let h = Harness::visible();
    let source = volume([0, 9, 0, 9, 0, 9], [1.0, 1.0, 1.0]);
    h.activate(&source);
    let (emitted, handler) = counter();
    let _sub = source.properties_changed.connect(handler);

    for text in ["", "abc", "1.2.3", "inf"] {
        h.panel.form_mut().lengths[2] = text.to_string();
        h.panel.on_axis_length_edited(Axis::Z);
    }

    assert_eq!(source.spacing(), [1.0, 1.0, 1.0]);
    assert_eq!(emitted.get(), 0);
}

#[test]
fn test_length_edit_on_empty_axis_keeps_spacing() {
    let h = Harness::visible();
    let source = volume([0, 9, 3, 2, 0, 4], [1.0, 2.0, 3.0]);
    h.activate(&source);
    let (emitted, handler) = counter();
    let _sub = source.properties_changed.connect(handler);

    h.panel.form_mut().lengths[1] = "5".to_string();
    h.panel.on_axis_length_edited(Axis::Y);

    assert_eq!(source.spacing(), [1.0, 2.0, 3.0]);
    assert_eq!(emitted.get(), 0);
}

#[test]
fn test_length_edit_without_source_is_harmless() {
    let h = Harness::visible();
    h.panel.form_mut().lengths[0] = "4".to_string();
    h.panel.on_axis_length_edited(Axis::X);
    assert!(h.panel.data_source().is_none());
    assert!(h.panel.form().lengths[0].is_empty());
}

// ---------------------------------------------------------------------------
// Tilt angles
// ---------------------------------------------------------------------------

#[test]
fn test_tilt_series_rows_show_angles() {
    let h = Harness::visible();
    let source = tilt_series(&[0.0, 5.0, 10.0]);
    h.activate(&source);

    let form = h.panel.form();
    assert!(form.tilt.is_visible());
    assert_eq!(form.tilt.table.row_count(), 3);
    assert_eq!(form.tilt.table.column_count(), 1);
    let cells: Vec<_> = (0..3)
        .map(|row| form.tilt.table.cell_text(row, 0).unwrap())
        .collect();
    assert_eq!(cells, ["0", "5", "10"]);
}

#[test]
fn test_refresh_does_not_echo_cell_changes() {
    let h = Harness::visible();
    let source = tilt_series(&[1.0, 2.0]);
    h.activate(&source);
    source.data_changed.emit(&());

    let form = h.panel.form();
    assert!(!form.tilt.table.has_cell_changes());
    assert!(!form.tilt.table.is_echo_suppressed());
    assert!(source.operators().is_empty());
}

#[test]
fn test_tilt_edit_creates_then_reuses_operator() {
    let h = Harness::visible();
    let source = tilt_series(&[0.0, 5.0, 10.0]);
    h.activate(&source);

    edit_tilt_cell(&h, 1, "7.5");
    let ops = source.operators();
    assert_eq!(ops.len(), 1);
    let first = ops[0].as_set_tilt_angles().unwrap().clone();
    assert_eq!(first.tilt_angles(), vec![0.0, 7.5, 10.0]);
    assert_eq!(source.tilt_angles(), vec![0.0, 7.5, 10.0]);

    edit_tilt_cell(&h, 2, "12");
    let ops = source.operators();
    assert_eq!(ops.len(), 1);
    assert!(Rc::ptr_eq(ops[0].as_set_tilt_angles().unwrap(), &first));
    assert_eq!(first.tilt_angles(), vec![0.0, 7.5, 12.0]);
    assert_eq!(source.tilt_angles(), vec![0.0, 7.5, 12.0]);

    let form = h.panel.form();
    assert_eq!(form.tilt.table.cell_text(2, 0), Some("12"));
    assert!(!form.tilt.table.has_cell_changes());
}

#[test]
fn test_several_pending_cell_edits_all_apply() {
    let h = Harness::visible();
    let source = tilt_series(&[0.0, 5.0, 10.0]);
    h.activate(&source);

    {
        let mut form = h.panel.form_mut();
        assert!(form.tilt.table.set_cell_text(1, 0, "7.5"));
        assert!(form.tilt.table.set_cell_text(2, 0, "12"));
    }
    h.panel.process_tilt_cell_changes();

    assert_eq!(source.tilt_angles(), vec![0.0, 7.5, 12.0]);
    assert_eq!(source.operators().len(), 1);
    let form = h.panel.form();
    assert_eq!(form.tilt.table.cell_text(1, 0), Some("7.5"));
    assert_eq!(form.tilt.table.cell_text(2, 0), Some("12"));
    assert!(!form.tilt.table.has_cell_changes());
}

#[test]
fn test_pending_cell_edit_does_not_follow_source_switch() {
    for visible in [true, false] {
        let h = Harness::visible();
        let a = tilt_series(&[0.0, 5.0, 10.0]);
        let b = tilt_series(&[1.0, 2.0]);
        h.activate(&a);
        assert!(h.panel.form_mut().tilt.table.set_cell_text(1, 0, "9"));
        h.panel.set_visible(visible);

        h.activate(&b);
        h.panel.set_visible(true);
        h.panel.process_tilt_cell_changes();

        assert!(a.operators().is_empty());
        assert!(b.operators().is_empty());
        assert_eq!(b.tilt_angles(), vec![1.0, 2.0]);
    }
}

#[test]
fn test_interleaved_operator_starts_new_tilt_operator() {
    let h = Harness::visible();
    let source = tilt_series(&[0.0, 5.0, 10.0]);
    h.activate(&source);

    edit_tilt_cell(&h, 0, "-3");
    source.add_operator(Operator::Transform(TransformOperator::invert()));
    edit_tilt_cell(&h, 1, "6");

    let ops = source.operators();
    assert_eq!(ops.len(), 3);
    let first = ops[0].as_set_tilt_angles().unwrap();
    let last = ops[2].as_set_tilt_angles().unwrap();
    assert!(!Rc::ptr_eq(first, last));
    assert_eq!(first.tilt_angles(), vec![-3.0, 5.0, 10.0]);
    assert_eq!(last.tilt_angles(), vec![-3.0, 6.0, 10.0]);
    assert_eq!(source.tilt_angles(), vec![-3.0, 6.0, 10.0]);
}

#[test]
fn test_invalid_tilt_text_leaves_model_unchanged() {
    let h = Harness::visible();
    let source = tilt_series(&[0.0, 5.0, 10.0]);
    h.activate(&source);

    edit_tilt_cell(&h, 1, "seven");

    assert!(source.operators().is_empty());
    assert_eq!(source.tilt_angles(), vec![0.0, 5.0, 10.0]);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "tilt table is only shown for tilt series")]
fn test_tilt_edit_on_volume_is_a_contract_breach() {
    let h = Harness::visible();
    let source = volume([0, 1, 0, 1, 0, 1], [1.0; 3]);
    h.activate(&source);
    h.panel.on_tilt_angle_cell_edited(0, 0);
}

#[test]
fn test_switching_to_volume_hides_tilt_ui() {
    let h = Harness::visible();
    let tilt = tilt_series(&[0.0, 5.0, 10.0]);
    let vol = volume([0, 9, 0, 9, 0, 9], [1.0; 3]);
    h.activate(&tilt);
    assert!(h.panel.form().tilt.is_visible());

    h.activate(&vol);

    let form = h.panel.form();
    assert!(!form.tilt.separator_visible);
    assert!(!form.tilt.button_visible);
    assert!(!form.tilt.table.is_visible());
    assert_eq!(form.tilt.table.row_count(), 0);
}

#[test]
fn test_kind_change_shows_tilt_ui() {
    let h = Harness::visible();
    let source = volume([0, 3, 0, 3, 0, 1], [1.0; 3]);
    h.activate(&source);

    source.set_kind(DataSourceKind::TiltSeries);

    let form = h.panel.form();
    assert!(form.tilt.is_visible());
    assert_eq!(form.tilt.table.row_count(), 2);
}

#[test]
fn test_tilt_dialog_request_passes_window_and_source() {
    let h = Harness::visible();
    let launcher = Rc::new(RecordingLauncher::default());
    h.panel.set_dialog_launcher(launcher.clone());
    h.panel.set_host_window(HostWindow {
        title: "Tomoview".to_string(),
    });
    let source = tilt_series(&[0.0]);
    h.activate(&source);

    h.panel.request_tilt_angle_editor_dialog();

    assert_eq!(
        *launcher.calls.borrow(),
        vec![("Tomoview".to_string(), Some("tilt".to_string()))]
    );
}

#[test]
fn test_tilt_dialog_request_without_launcher_is_harmless() {
    let h = Harness::visible();
    h.panel.request_tilt_angle_editor_dialog();
}

// ---------------------------------------------------------------------------
// Data source lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_switching_sources_keeps_one_subscription_and_no_leaked_adapters() {
    let h = Harness::visible();
    let first = tilt_series(&[0.0, 1.0]);
    let second = volume([0, 1, 0, 1, 0, 1], [1.0; 3]);

    h.activate(&first);
    h.activate(&second);

    assert_eq!(first.data_changed.connection_count(), 0);
    assert_eq!(second.data_changed.connection_count(), 1);
    assert_eq!(h.server.live_adapters(), 2);
    assert_eq!(h.server.created_adapters(), 4);

    h.panel.set_data_source(Some(Rc::clone(&second)));
    h.panel.set_data_source(Some(Rc::clone(&second)));
    assert_eq!(second.data_changed.connection_count(), 1);
    assert_eq!(h.server.live_adapters(), 2);

    h.registry.set_active_data_source(None);
    assert_eq!(second.data_changed.connection_count(), 0);
    assert_eq!(h.server.live_adapters(), 0);
    assert!(h.panel.form().lengths.iter().all(String::is_empty));
}

#[test]
fn test_same_source_delivers_data_changed_once() {
    let h = Harness::hidden();
    let source = tilt_series(&[0.0]);
    h.panel.set_data_source(Some(Rc::clone(&source)));
    h.panel.set_data_source(Some(Rc::clone(&source)));
    h.panel.set_visible(true);
    assert!(!h.panel.is_update_needed());

    h.panel.set_visible(false);
    source.data_changed.emit(&());
    assert!(h.panel.is_update_needed());
    assert_eq!(source.data_changed.connection_count(), 1);
}

#[test]
fn test_information_adapters_follow_source() {
    let h = Harness::visible();
    assert!(h.panel.original_information().is_none());
    let source = volume([0, 3, 0, 1, 0, 0], [0.5, 1.0, 1.0]);
    h.activate(&source);

    let info = h.panel.original_information().unwrap();
    assert_eq!(info.dimensions, [4, 2, 1]);
    assert_eq!(info.bounds[0], [0.0, 1.5]);
    assert!(info.scalar_range.is_none());
    assert!(h.panel.transformed_information().is_some());
}

#[test]
fn test_dropped_source_reads_as_none() {
    let h = Harness::visible();
    let source = tilt_series(&[0.0, 1.0]);
    h.panel.set_data_source(Some(Rc::clone(&source)));
    drop(source);

    assert!(h.panel.data_source().is_none());
    assert!(h.panel.original_information().is_none());
}

// ---------------------------------------------------------------------------
// Deferred refresh
// ---------------------------------------------------------------------------

#[test]
fn test_hidden_panel_defers_refresh_until_shown() {
    let h = Harness::hidden();
    let source = tilt_series(&[0.0, 5.0, 10.0]);
    h.activate(&source);

    assert!(h.panel.is_update_needed());
    assert!(h.panel.form().lengths[0].is_empty());
    assert_eq!(h.panel.form().tilt.table.row_count(), 0);

    h.panel.set_visible(true);

    assert!(!h.panel.is_update_needed());
    assert_eq!(h.panel.form().lengths[0], "10");
    assert_eq!(h.panel.form().tilt.table.row_count(), 3);
}

#[test]
fn test_paint_hook_performs_pending_refresh() {
    let h = Harness::hidden();
    let source = volume([0, 4, 0, 4, 0, 4], [2.0; 3]);
    h.activate(&source);
    assert!(h.panel.is_update_needed());

    h.panel.on_paint();

    assert!(!h.panel.is_update_needed());
    assert_eq!(h.panel.form().lengths, ["10", "10", "10"]);
}

#[test]
fn test_refresh_is_noop_without_pending_update() {
    let h = Harness::visible();
    let source = volume([0, 4, 0, 4, 0, 4], [1.0; 3]);
    h.activate(&source);

    h.panel.form_mut().units = "typed but not committed".to_string();
    h.panel.on_paint();
    assert_eq!(h.panel.form().units, "typed but not committed");

    h.panel.schedule_update();
    assert_eq!(h.panel.form().units, "nm");
}

#[test]
fn test_clear_discards_color_map_widget() {
    let h = Harness::visible();
    h.panel.attach_color_map_widget(ColorMapWidget {
        preset: "Grayscale".to_string(),
        range: (0.0, 1.0),
    });
    assert!(h.panel.color_map_widget().is_some());

    h.panel.clear();

    assert!(h.panel.color_map_widget().is_none());
    assert_eq!(h.panel.form().tilt.table.row_count(), 0);
}

// ---------------------------------------------------------------------------
// Units and axes grid
// ---------------------------------------------------------------------------

#[test]
fn test_units_edit_retitles_axes_grid_and_renders() {
    let h = Harness::visible();
    let view = View::new("render view");
    let renders = Rc::new(Cell::new(0));
    view.set_render_target(Some(Box::new(CountingTarget(Rc::clone(&renders)))));
    h.registry.set_active_view(Some(Rc::clone(&view)));

    let source = volume([0, 1, 0, 1, 0, 1], [1.0; 3]);
    source.set_units("px");
    h.activate(&source);
    let grid = view.axes_grid().unwrap();
    assert_eq!(grid.title(Axis::X), "X (px)");

    h.panel.form_mut().units = "nm".to_string();
    h.panel.on_units_edited();

    assert_eq!(source.units(Axis::Z), "nm");
    assert_eq!(grid.titles(), ["X (nm)", "Y (nm)", "Z (nm)"]);
    assert_eq!(renders.get(), 2);
}

#[test]
fn test_view_change_retitles_axes_grid() {
    let h = Harness::visible();
    let source = volume([0, 1, 0, 1, 0, 1], [1.0; 3]);
    source.set_axis_units(Axis::Z, "deg");
    h.activate(&source);

    let view = View::new("second view");
    h.registry.set_active_view(Some(Rc::clone(&view)));

    let grid = view.axes_grid().unwrap();
    assert_eq!(grid.titles(), ["X (nm)", "Y (nm)", "Z (deg)"]);
    assert_eq!(grid.revision(), 1);
    assert_eq!(view.render_count(), 0);
}

#[test]
fn test_units_edit_without_view_is_noop() {
    let h = Harness::visible();
    let source = volume([0, 1, 0, 1, 0, 1], [1.0; 3]);
    h.activate(&source);

    h.panel.form_mut().units = "Å".to_string();
    h.panel.on_units_edited();

    assert_eq!(source.units(Axis::Y), "Å");
}

#[test]
fn test_axes_grid_untouched_without_active_source() {
    let h = Harness::visible();
    let view = View::new("render view");
    h.registry.set_active_view(Some(Rc::clone(&view)));

    h.panel.refresh_axes_grid_labels();
    h.panel.on_units_edited();

    let grid = view.axes_grid().unwrap();
    assert_eq!(grid.revision(), 0);
    assert_eq!(grid.title(Axis::X), "");
}

#[test]
fn test_view_without_axes_grid_is_noop() {
    let h = Harness::visible();
    let source = volume([0, 1, 0, 1, 0, 1], [1.0; 3]);
    h.activate(&source);
    let view = View::without_axes_grid("line chart");
    h.registry.set_active_view(Some(Rc::clone(&view)));

    h.panel.refresh_axes_grid_labels();

    assert!(view.axes_grid().is_none());
}
