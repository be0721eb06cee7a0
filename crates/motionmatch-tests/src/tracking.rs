//! Integration tests for single-object tracking.

use motionmatch_core::{BoundingBox, GrayFrame, MotionError};
use motionmatch_tracking::{
    track_object, CostFunction, LossReason, ObjectTracker, TrackerParams, TrackerState,
};

use crate::support::{init_logging, shifted};

// ── Helpers ────────────────────────────────────────────────────

/// Background in 0..100 with a bright 10x10 object in 200..250 at `(ox, oy)`.
fn scene_with_object(ox: u32, oy: u32) -> GrayFrame {
    GrayFrame::from_fn(64, 48, |x, y| {
        if (ox..ox + 10).contains(&x) && (oy..oy + 10).contains(&y) {
            200 + (((x - ox) * 7 + (y - oy) * 3) % 50) as u8
        } else {
            ((x * 7 + y * 13) % 100) as u8
        }
    })
}

/// Same scene with the object area overwritten by unrelated noise.
fn scene_with_noise(ox: u32, oy: u32) -> GrayFrame {
    let base = scene_with_object(ox, oy);
    GrayFrame::from_fn(64, 48, |x, y| {
        if (ox..ox + 10).contains(&x) && (oy..oy + 10).contains(&y) {
            100 + ((x * 31 + y * 17 + x * y) % 50) as u8
        } else {
            base.get(x, y)
        }
    })
}

fn assert_monotonic_loss(slots: &[Option<BoundingBox>]) {
    if let Some(first_gap) = slots.iter().position(Option::is_none) {
        assert!(slots[first_gap..].iter().all(Option::is_none));
    }
}

// ── Scenarios ──────────────────────────────────────────────────

#[test]
fn static_sequence_keeps_seed_box() {
    init_logging();
    let frame = shifted(48, 48, 0, 0);
    let frames = vec![frame.clone(), frame.clone(), frame];
    let seed = BoundingBox::from([10, 10, 20, 20]);
    let trajectory = track_object(&frames, seed, 3, &TrackerParams::default()).unwrap();
    assert_eq!(
        trajectory.as_slice(),
        &[
            Some(BoundingBox::new(10, 10, 20, 20)),
            Some(BoundingBox::new(10, 10, 20, 20)),
            Some(BoundingBox::new(10, 10, 20, 20)),
        ]
    );
}

#[test]
fn replaced_content_loses_the_object() {
    init_logging();
    let frames = vec![
        scene_with_object(20, 20),
        scene_with_noise(20, 20),
        scene_with_object(20, 20),
        scene_with_object(20, 20),
    ];
    let seed = BoundingBox::new(20, 20, 30, 30);
    let trajectory = track_object(&frames, seed, 4, &TrackerParams::default()).unwrap();
    assert_eq!(trajectory.len(), 4);
    assert_eq!(trajectory.get(0), Some(seed));
    assert_eq!(trajectory.lost_at(), Some(1));
    assert_monotonic_loss(trajectory.as_slice());
}

#[test]
fn lost_regardless_of_fast_path_threshold() {
    // With a huge fast-path threshold the co-located candidate is taken
    // without searching; the histogram gate still rejects it.
    let frames = vec![scene_with_object(20, 20), scene_with_noise(20, 20)];
    let params = TrackerParams {
        fast_path_threshold: u64::MAX,
        ..Default::default()
    };
    let seed = BoundingBox::new(20, 20, 30, 30);
    let mut tracker = ObjectTracker::new(seed, frames[0].size(), params).unwrap();
    assert_eq!(tracker.step(&frames[0], &frames[1]).unwrap(), None);
    match tracker.state() {
        TrackerState::Lost {
            frame: 1,
            reason: LossReason::HistogramMismatch { ratio },
        } => assert!(ratio < 0.5),
        other => panic!("unexpected state {:?}", other),
    }
}

#[test]
fn follows_a_moving_object() {
    init_logging();
    let positions = [(10u32, 10u32), (13, 11), (16, 13), (18, 16), (21, 18)];
    let frames: Vec<GrayFrame> = positions
        .iter()
        .map(|&(x, y)| scene_with_object(x, y))
        .collect();
    let seed = BoundingBox::new(10, 10, 20, 20);
    let trajectory =
        track_object(&frames, seed, frames.len(), &TrackerParams::default()).unwrap();
    for (i, &(x, y)) in positions.iter().enumerate() {
        let (x, y) = (x as i32, y as i32);
        assert_eq!(trajectory.get(i), Some(BoundingBox::new(x, y, x + 10, y + 10)));
    }
}

#[test]
fn follows_a_panning_scene_with_ssd() {
    let frames: Vec<GrayFrame> = (0..6).map(|k| shifted(96, 96, 2 * k, -k)).collect();
    let params = TrackerParams {
        cost: CostFunction::Ssd,
        ..Default::default()
    };
    let seed = BoundingBox::new(30, 40, 50, 60);
    let trajectory = track_object(&frames, seed, 6, &params).unwrap();
    for k in 0..6i32 {
        assert_eq!(
            trajectory.get(k as usize),
            Some(BoundingBox::new(30 + 2 * k, 40 - k, 50 + 2 * k, 60 - k))
        );
    }
}

#[test]
fn loss_is_permanent() {
    let frames = vec![
        scene_with_object(20, 20),
        scene_with_object(22, 21),
        GrayFrame::filled(64, 48, 0),
        scene_with_object(22, 21),
        scene_with_object(22, 21),
    ];
    let seed = BoundingBox::new(20, 20, 30, 30);
    let trajectory = track_object(&frames, seed, 5, &TrackerParams::default()).unwrap();
    assert_eq!(trajectory.get(1), Some(BoundingBox::new(22, 21, 32, 31)));
    assert_eq!(trajectory.lost_at(), Some(2));
    assert_monotonic_loss(trajectory.as_slice());
    assert_eq!(trajectory.tracked().count(), 2);
    assert_eq!(trajectory.overlay(&frames, 255).len(), 2);
}

#[test]
fn incremental_api_matches_batch() {
    let frames: Vec<GrayFrame> = (0..4).map(|k| shifted(64, 64, k, k)).collect();
    let seed = BoundingBox::new(20, 20, 36, 36);
    let params = TrackerParams::default();
    let batch = track_object(&frames, seed, 4, &params).unwrap();

    let mut tracker = ObjectTracker::new(seed, frames[0].size(), params).unwrap();
    let mut streamed = vec![tracker.current_box()];
    for pair in frames.windows(2) {
        streamed.push(tracker.step(&pair[0], &pair[1]).unwrap());
    }
    assert_eq!(batch.as_slice(), streamed.as_slice());
    assert_eq!(tracker.frame_index(), 3);
}

#[test]
fn trajectory_only_covers_requested_frames() {
    let frame = shifted(32, 32, 0, 0);
    let frames = vec![frame; 5];
    let seed = BoundingBox::new(4, 4, 12, 12);
    let trajectory = track_object(&frames, seed, 2, &TrackerParams::default()).unwrap();
    assert_eq!(trajectory.len(), 2);
}

#[test]
fn reversed_seed_corners_track_the_same_region() {
    let frame = shifted(32, 32, 0, 0);
    let frames = vec![frame.clone(), frame];
    let reversed = BoundingBox {
        x0: 20,
        y0: 20,
        x1: 10,
        y1: 10,
    };
    let trajectory = track_object(&frames, reversed, 2, &TrackerParams::default()).unwrap();
    let expected = BoundingBox::new(10, 10, 20, 20);
    assert_eq!(trajectory.as_slice(), &[Some(expected), Some(expected)]);
}

#[test]
fn bad_seed_is_rejected() {
    let frames = vec![GrayFrame::new(32, 32); 2];
    let params = TrackerParams::default();
    assert!(matches!(
        track_object(&frames, BoundingBox::new(-4, 0, 8, 8), 2, &params),
        Err(MotionError::BoxOutOfBounds { .. })
    ));
    assert!(matches!(
        track_object(&frames, BoundingBox::new(8, 8, 8, 20), 2, &params),
        Err(MotionError::InvalidParameter(_))
    ));
}
