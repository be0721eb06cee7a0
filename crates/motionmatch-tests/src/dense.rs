//! Integration tests for dense motion field estimation.

use motionmatch_core::{GrayFrame, MotionError, Point, Rect};
use motionmatch_tracking::{
    tile_anchors, BlockMatcher, CostFunction, DenseField, DenseFieldParams, MatchParams,
    MotionConfig, MotionVector, SearchWindow,
};

use crate::support::{init_logging, shifted};

fn params(block: u32, step: u32, radius: u32) -> DenseFieldParams {
    DenseFieldParams {
        block_width: block,
        block_height: block,
        step,
        search_radius: radius,
        ..Default::default()
    }
}

// ── Identity ───────────────────────────────────────────────────

#[test]
fn identical_frames_give_zero_field_and_exact_reconstruction() {
    init_logging();
    let frame = shifted(40, 30, 0, 0);
    for p in [params(4, 4, 2), params(8, 3, 5), params(7, 7, 1), params(16, 5, 9)] {
        let dense = DenseField::estimate(&frame, &frame, &p).unwrap();
        assert!(!dense.field.is_empty());
        assert!(dense
            .field
            .vectors()
            .all(|v| v == Some(MotionVector::ZERO)));
        assert_eq!(dense.reconstruction, frame);
        assert_eq!(dense.segments.len(), dense.field.len());
    }
}

#[test]
fn field_size_follows_tiling_rule() {
    let frame = GrayFrame::filled(10, 10, 40);
    let dense = DenseField::estimate(&frame, &frame, &params(4, 4, 3)).unwrap();
    assert_eq!(dense.field.len(), 9);
    for y in [0, 4, 6] {
        for x in [0, 4, 6] {
            assert!(dense.field.get(Point::new(x, y)).is_some());
        }
    }

    let frame = shifted(37, 23, 0, 0);
    let p = params(6, 4, 2);
    let dense = DenseField::estimate(&frame, &frame, &p).unwrap();
    let expected = tile_anchors(37, 6, 4).len() * tile_anchors(23, 6, 4).len();
    assert_eq!(dense.field.len(), expected);
}

// ── Translation ────────────────────────────────────────────────

#[test]
fn global_pan_is_recovered_for_interior_tiles() {
    init_logging();
    let source = shifted(64, 48, 0, 0);
    let target = shifted(64, 48, -2, 3);
    let dense = DenseField::estimate(&source, &target, &params(8, 8, 4)).unwrap();

    let interior: Vec<_> = dense
        .field
        .entries()
        .iter()
        .filter(|e| e.anchor.x >= 8 && e.anchor.y < 32 && e.anchor.x <= 48)
        .collect();
    assert!(!interior.is_empty());
    for entry in interior {
        assert_eq!(entry.vector(), Some(MotionVector::new(-2, 3)), "{:?}", entry.anchor);
        assert_eq!(entry.outcome.cost(), Some(0));
    }
    assert!(dense.field.mean_magnitude() > 0.0);
}

#[test]
fn ssd_cost_agrees_with_sad_on_exact_pan() {
    let source = shifted(48, 48, 0, 0);
    let target = shifted(48, 48, 1, 2);
    let sad = DenseField::estimate(&source, &target, &params(8, 8, 4)).unwrap();
    let mut p = params(8, 8, 4);
    p.matching.cost = CostFunction::Ssd;
    let ssd = DenseField::estimate(&source, &target, &p).unwrap();
    let anchor = Point::new(16, 16);
    assert_eq!(
        sad.field.get(anchor).unwrap().vector(),
        ssd.field.get(anchor).unwrap().vector()
    );
}

// ── Overlap & determinism ──────────────────────────────────────

#[test]
fn overlapping_tiles_are_written_in_tiling_order() {
    let source = shifted(40, 40, 0, 0);
    let target = GrayFrame::from_fn(40, 40, |x, y| {
        // Different motion in the two halves makes overlaps visible.
        if x < 20 {
            crate::support::texture(x as i64 - 1, y as i64)
        } else {
            crate::support::texture(x as i64, y as i64 + 2)
        }
    });
    let p = params(8, 3, 4);
    let dense = DenseField::estimate(&source, &target, &p).unwrap();

    // Serial reference: search each tile, paste in row-major order.
    let matcher = BlockMatcher::new(p.matching);
    let block = p.block_size();
    let mut expected = source.clone();
    for &y in &tile_anchors(40, 8, 3) {
        for &x in &tile_anchors(40, 8, 3) {
            let anchor = Point::new(x, y);
            let reference = source.region(Rect::from_origin_size(anchor, block)).unwrap();
            let window = SearchWindow::around_anchor(anchor, block, p.search_radius, target.size());
            if let Some(pos) = matcher.find(&reference, anchor, &target, window).position() {
                expected
                    .blit(&target, Rect::from_origin_size(pos, block), anchor)
                    .unwrap();
            }
        }
    }
    assert_eq!(dense.reconstruction, expected);

    for _ in 0..3 {
        let again = DenseField::estimate(&source, &target, &p).unwrap();
        assert_eq!(again.reconstruction, dense.reconstruction);
        assert_eq!(again.field.entries(), dense.field.entries());
    }
}

#[test]
fn scan_stop_threshold_can_be_enabled() {
    let source = shifted(32, 32, 0, 0);
    let target = shifted(32, 32, 2, 2);
    let mut p = params(8, 8, 4);
    p.matching = MatchParams {
        scan_stop_threshold: Some(10),
        ..Default::default()
    };
    let dense = DenseField::estimate(&source, &target, &p).unwrap();
    let entry = dense.field.get(Point::new(8, 8)).unwrap();
    assert_eq!(entry.vector(), Some(MotionVector::new(2, 2)));
}

// ── Rendering & configuration ──────────────────────────────────

#[test]
fn vector_rendering_marks_anchors() {
    let source = shifted(32, 32, 0, 0);
    let target = shifted(32, 32, 3, 0);
    let dense = DenseField::estimate(&source, &target, &params(8, 8, 4)).unwrap();
    let canvas = dense.render_vectors();
    for segment in &dense.segments {
        assert_eq!(canvas.get(segment.from.x, segment.from.y), 0);
        assert_eq!(canvas.get(segment.to.x, segment.to.y), 0);
    }
}

#[test]
fn configuration_errors_abort_the_call() {
    let a = GrayFrame::new(16, 16);
    let b = GrayFrame::new(16, 17);
    assert!(matches!(
        DenseField::estimate(&a, &b, &DenseFieldParams::default()),
        Err(MotionError::FrameSizeMismatch { .. })
    ));
    assert!(matches!(
        DenseField::estimate(&a, &a, &params(0, 4, 4)),
        Err(MotionError::InvalidParameter(_))
    ));
    let small = GrayFrame::new(6, 6);
    assert!(matches!(
        DenseField::estimate(&small, &small, &params(8, 4, 4)),
        Err(MotionError::BlockExceedsFrame { .. })
    ));
}

#[test]
fn loaded_config_drives_estimation() {
    let config = MotionConfig::from_json(
        br#"{ "version": 1, "dense": { "block_width": 4, "block_height": 4, "step": 4, "search_radius": 2 } }"#,
    )
    .unwrap();
    let frame = GrayFrame::filled(10, 10, 7);
    let dense = DenseField::estimate(&frame, &frame, &config.dense).unwrap();
    assert_eq!(dense.field.len(), 9);
}
