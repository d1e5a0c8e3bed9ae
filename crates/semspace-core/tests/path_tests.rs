//! Path tracking tests driven by reduced embeddings

use pretty_assertions::assert_eq;
use semspace_core::{Method, Mode, PathTracker, Reducer, Vec3};

#[test]
fn test_walk_accumulation() {
    let mut tracker = PathTracker::new();
    tracker.record(Vec3::new(1.0, 0.0, 0.0), Mode::Walk);
    tracker.record(Vec3::new(0.0, 1.0, 0.0), Mode::Walk);

    assert_eq!(
        tracker.path_points(),
        &[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ]
    );
    assert_eq!(tracker.current_point(), Vec3::new(1.0, 1.0, 0.0));
}

#[test]
fn test_scatter_independence() {
    let mut tracker = PathTracker::new();
    for v in [Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)] {
        let segment = tracker.record(v, Mode::Scatter);
        assert_eq!(segment.start, Vec3::ZERO);
        assert_eq!(segment.end, v);
    }
    assert_eq!(tracker.path_points(), &[Vec3::ZERO]);
    assert_eq!(tracker.current_point(), Vec3::ZERO);
}

#[test]
fn test_mixed_modes_only_walk_extends_path() {
    let mut tracker = PathTracker::new();
    tracker.record(Vec3::new(1.0, 2.0, 3.0), Mode::Walk);
    tracker.record(Vec3::new(9.0, 9.0, 9.0), Mode::Scatter);
    let seg = tracker.record(Vec3::new(1.0, 0.0, 0.0), Mode::Walk);

    assert_eq!(seg.start, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(seg.end, Vec3::new(2.0, 2.0, 3.0));
    assert_eq!(tracker.path_points().len(), 3);
}

#[test]
fn test_walk_of_reduced_embeddings_steps_on_radius() {
    let reducer = Reducer::default();
    let mut tracker = PathTracker::new();

    for k in 0..5 {
        let embedding: Vec<f64> = (0..3072)
            .map(|i| ((i * (k + 2)) as f64 * 0.013).sin())
            .collect();
        let step = reducer.reduce(&embedding, Method::Projection).unwrap();
        let segment = tracker.record(step, Mode::Walk);
        assert!((segment.length() - 5.0).abs() < 1e-9);
    }

    assert_eq!(tracker.steps(), 5);
    assert_eq!(tracker.path_points()[0], Vec3::ZERO);
    assert!((tracker.total_distance() - 25.0).abs() < 1e-9);
}
