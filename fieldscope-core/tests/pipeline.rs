//! End-to-end checks of the extent → LOD → geometry pipeline against a
//! resident field and the procedural sampler.

use fieldscope_core::{
    resolve, AxisSystem, CameraPose, CanvasSize, Domain, FractalField, FrameResolver, GridLayout,
    GridShape, IndexRange, SampleMemo, ScalarField, VisibleExtent,
};
use glam::DVec2;

fn resolver_for(layout: GridLayout, canvas: CanvasSize, flip_y: bool) -> FrameResolver {
    let axes = AxisSystem::fitting_canvas(
        layout.x_domain,
        layout.y_domain,
        canvas.width,
        canvas.height,
        flip_y,
    );
    FrameResolver::new(layout, axes)
}

#[test]
fn full_dataset_view_draws_full_canvas_window() {
    let layout = GridLayout::new(
        Domain::new(0.0, 128.0),
        Domain::new(0.0, 128.0),
        GridShape::new(128, 128),
    );
    let canvas = CanvasSize::new(256, 256);
    let mut resolver = resolver_for(layout, canvas, false);

    let view = resolver
        .frame(&CameraPose::centered(1.0), canvas)
        .expect("full dataset visible");

    assert_eq!(view.slice.level_of_detail, 1);
    assert_eq!(view.slice.x_slice, IndexRange::new(0, 129));
    assert_eq!(view.slice.x_lod_slice, IndexRange::new(0, 128));
    assert_eq!(view.slice.y_lod_slice, IndexRange::new(0, 128));
    // The quad spans the full world extent of the axes: the whole canvas at
    // zoom 1.
    assert_eq!(view.quad.position, [-128.0, -128.0, 0.0]);
    assert_eq!(view.quad.size, (256.0, 256.0));
}

#[test]
fn stored_field_window_matches_resolved_slice() {
    let shape = GridShape::new(64, 64);
    let field = ScalarField::random(shape, 42);
    let layout = GridLayout::index_aligned(shape);
    let canvas = CanvasSize::new(32, 32);
    let mut resolver = resolver_for(layout, canvas, false);

    let view = resolver.frame(&CameraPose::centered(1.0), canvas).unwrap();
    // 64 samples across 32 pixels decimates by 2.
    assert_eq!(view.slice.level_of_detail, 2);

    let window = field.window(&view.slice);
    assert_eq!(window.rows, view.slice.x_lod_slice.len());
    assert_eq!(window.cols, view.slice.y_lod_slice.len());
    assert_eq!(window.values.len(), window.rows * window.cols);
    // Decimated cell (0, 0) is raw cell (0, 0).
    assert_eq!(window.get(0, 0), field.get(0, 0));
}

#[test]
fn fractal_window_substitutes_for_stored_data() {
    let (x_domain, y_domain) = FractalField::canonical_domains();
    // A virtual high-resolution grid over the classic domain.
    let layout = GridLayout::new(x_domain, y_domain, GridShape::new(1024, 1024));
    let canvas = CanvasSize::new(64, 64);
    let mut resolver = resolver_for(layout, canvas, false);

    let view = resolver.frame(&CameraPose::centered(1.0), canvas).unwrap();
    let shape = GridShape::new(
        view.slice.x_lod_slice.len(),
        view.slice.y_lod_slice.len(),
    );

    let field = FractalField::new(32);
    let mut memo = SampleMemo::new();
    let window = memo
        .sample(&field, &view.slice.x_data, &view.slice.y_data, shape)
        .clone();

    assert_eq!((window.rows, window.cols), (shape.rows, shape.cols));
    assert!(window.values.iter().all(|v| (0.0..=1.0).contains(v)));
    // The window shape is exactly what a stored-array slice would produce.
    assert_eq!(window.rows, view.slice.x_lod_slice.len());
}

#[test]
fn zooming_in_refines_without_gaps() {
    let layout = GridLayout::new(
        Domain::new(0.0, 512.0),
        Domain::new(0.0, 512.0),
        GridShape::new(512, 512),
    );
    let canvas = CanvasSize::new(128, 128);
    let mut resolver = resolver_for(layout, canvas, false);

    let mut last_lod = u32::MAX;
    for zoom in [0.5, 1.0, 2.0, 4.0, 8.0] {
        let view = resolver
            .frame(&CameraPose::centered(zoom), canvas)
            .unwrap();
        assert!(view.slice.level_of_detail <= last_lod);
        last_lod = view.slice.level_of_detail;

        // The resolved data domain always sits inside the dataset domain,
        // and the slices cover it.
        assert!(view.slice.x_data.min >= layout.x_domain.min - 1e-9);
        assert!(view.slice.x_data.max <= layout.x_domain.max + 1e-9);
        let clamped = view.slice.x_slice.clamp(layout.shape.rows);
        assert!(!clamped.is_empty());
    }
}

#[test]
fn panned_out_viewport_is_silent_and_recoverable() {
    let layout = GridLayout::new(
        Domain::new(0.0, 10.0),
        Domain::new(0.0, 10.0),
        GridShape::new(32, 32),
    );
    let canvas = CanvasSize::new(100, 100);
    let mut resolver = resolver_for(layout, canvas, false);

    let home = CameraPose::centered(1.0);
    let outside = CameraPose::new(DVec2::new(500.0, 0.0), 1.0);

    assert!(resolver.frame(&home, canvas).is_some());
    assert!(resolver.frame(&outside, canvas).is_none());
    let back = resolver.frame(&home, canvas);
    assert!(back.is_some());
}

#[test]
fn unconditional_recompute_matches_memoized_path() {
    let layout = GridLayout::new(
        Domain::new(-2.5, 1.5),
        Domain::new(-2.0, 2.0),
        GridShape::new(400, 400),
    );
    let canvas = CanvasSize::new(200, 200);
    let axes = AxisSystem::fitting_canvas(layout.x_domain, layout.y_domain, 200, 200, false);
    let pose = CameraPose::new(DVec2::new(13.0, -7.0), 2.5);

    // The extent is a pure function of the pose: computing it fresh twice
    // and resolving both gives identical windows.
    let a = VisibleExtent::compute(&pose, canvas, &axes);
    let b = VisibleExtent::compute(&pose, canvas, &axes);
    assert_eq!(a, b);
    assert_eq!(resolve(&a, &layout), resolve(&b, &layout));
}

#[test]
fn flipped_ordinate_reaches_renderer() {
    let layout = GridLayout::new(
        Domain::new(0.0, 64.0),
        Domain::new(0.0, 64.0),
        GridShape::new(64, 64),
    );
    let canvas = CanvasSize::new(128, 128);
    let mut resolver = resolver_for(layout, canvas, true);
    let view = resolver.frame(&CameraPose::centered(1.0), canvas).unwrap();
    assert!(view.quad.flip_y);
}
