//! Integration tests for the planner facade.
//!
//! These drive the public API the way a host application would: a real
//! in-memory point store, a recording pose sink, and auto-save files in a
//! per-test temp location.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use stereoplan::{
    CoordinateSystem, LoadOutcome, MemoryPointStore, Planner, PlannerConfig, PointStore, PoseSink,
    Vec3, ViewFrame, DEFAULT_ENTRY, DEFAULT_TARGET, PLANE_PALETTE,
};

/// Everything the pose sink saw, shared with the test body.
#[derive(Default)]
struct SinkLog {
    jumps: Vec<Vec3>,
    poses: Vec<ViewFrame>,
    resets: usize,
}

#[derive(Clone, Default)]
struct RecordingSink(Rc<RefCell<SinkLog>>);

impl PoseSink for RecordingSink {
    fn set_slice_pose(&mut self, frame: &ViewFrame) {
        self.0.borrow_mut().poses.push(*frame);
    }

    fn reset_default_orientations(&mut self) {
        self.0.borrow_mut().resets += 1;
    }

    fn jump_to(&mut self, position: Vec3) {
        self.0.borrow_mut().jumps.push(position);
    }
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("stereoplan_{}_{name}", std::process::id()))
}

fn test_planner(name: &str) -> (Planner<MemoryPointStore>, Rc<RefCell<SinkLog>>) {
    let config = PlannerConfig {
        output_file: temp_path(&format!("{name}_landmarks.txt")),
        output_plane_file: temp_path(&format!("{name}_planes.txt")),
        ..PlannerConfig::default()
    };
    let sink = RecordingSink::default();
    let log = Rc::clone(&sink.0);
    let planner = Planner::new(config, MemoryPointStore::new(), MemoryPointStore::new())
        .with_pose_sink(Box::new(sink));
    (planner, log)
}

#[test]
fn add_trajectory_scenario() {
    let (mut planner, log) = test_planner("add_scenario");

    // First trajectory: hard-coded defaults, becomes selected.
    let first = planner.add_trajectory();
    assert_eq!(first, 1);
    let t1 = *planner.trajectories().get(1).unwrap();
    assert_eq!(planner.landmark_store().position(t1.target()), Some(DEFAULT_TARGET));
    assert_eq!(planner.landmark_store().position(t1.entry()), Some(DEFAULT_ENTRY));
    assert!(planner.trajectories().is_selected(1));
    assert_eq!(log.borrow().jumps.last(), Some(&DEFAULT_TARGET));

    // Second trajectory offsets from the selected one.
    let second = planner.add_trajectory();
    let t2 = *planner.trajectories().get(second).unwrap();
    assert_eq!(planner.landmark_store().position(t2.target()), Some(Vec3::splat(5.0)));
    assert_eq!(planner.landmark_store().position(t2.entry()), Some(Vec3::splat(105.0)));
    assert!(planner.trajectories().is_selected(2));

    // Switching selection reset the previous down-axis view.
    assert!(log.borrow().resets >= 1);

    // The auto-save file exists and lists all four points.
    let saved = std::fs::read_to_string(planner.config().output_file.clone()).unwrap();
    assert_eq!(saved.lines().filter(|l| l.starts_with("traj_")).count(), 4);
}

#[test]
fn delete_without_selection_is_noop() {
    let (mut planner, _log) = test_planner("delete_noop");
    planner.delete_selected_trajectory();
    assert!(planner.trajectories().is_empty());

    let id = planner.add_trajectory();
    planner.delete_selected_trajectory();
    assert!(planner.trajectories().is_empty());
    assert!(planner.landmark_store().is_empty());
    assert_eq!(id, 1);

    // Registry is valid and numbering restarts after emptying.
    assert_eq!(planner.add_trajectory(), 1);
}

#[test]
fn align_axes_pushes_frame_to_sink() {
    let (mut planner, log) = test_planner("align_axes");

    // No selection: logged no-op, nothing pushed.
    planner.align_axes_to_trajectory();
    assert!(log.borrow().poses.is_empty());

    planner.add_trajectory();
    planner.align_axes_to_trajectory();

    let log = log.borrow();
    let frame = log.poses.last().unwrap();
    // Normal points from entry (100,100,100) toward target (0,0,0),
    // standardized to a non-negative Y component.
    assert!((frame.normal - Vec3::splat(1.0 / 3.0f32.sqrt())).length() < 1e-5);
    assert_eq!(frame.position, DEFAULT_TARGET);
}

#[test]
fn plane_defaults_and_palette() {
    let (mut planner, _log) = test_planner("plane_defaults");

    let first = planner.add_plane();
    let plane = *planner.planes().get(first).unwrap();
    assert_eq!(plane.width(), 150.0);
    assert_eq!(plane.height(), 150.0);
    assert_eq!(plane.color(), PLANE_PALETTE[0]); // cyan

    let second = planner.add_plane();
    assert_eq!(planner.planes().get(second).unwrap().color(), PLANE_PALETTE[1]); // yellow
}

#[test]
fn sub_epsilon_resize_does_not_save() {
    let (mut planner, _log) = test_planner("resize_epsilon");
    let id = planner.add_plane();

    let plane_file = planner.config().output_plane_file.clone();
    std::fs::remove_file(&plane_file).unwrap();

    planner.set_plane_size(id, 150.0005, 150.0).unwrap();
    assert!(!plane_file.exists(), "no-op resize must not rewrite the file");

    planner.set_plane_size(id, 175.0, 150.0).unwrap();
    assert!(plane_file.exists());
}

#[test]
fn landmark_save_load_round_trip() {
    let (mut planner, _log) = test_planner("round_trip");

    planner.add_trajectory();
    planner.move_target(Vec3::new(12.3456, -7.25, 0.125));
    planner.move_entry(Vec3::new(-40.0, 55.5, 9.0625));
    planner.add_trajectory();

    let file = temp_path("round_trip_manual.txt");
    planner.save_landmarks_to(&file).unwrap();

    let (mut restored, _log) = test_planner("round_trip_restored");
    let outcome = restored.load_trajectories(&file, || true).unwrap();
    assert_eq!(outcome, LoadOutcome::Loaded(2));
    assert_eq!(restored.trajectories().len(), 2);

    let t1 = *restored.trajectories().get(1).unwrap();
    let target = restored.landmark_store().position(t1.target()).unwrap();
    let entry = restored.landmark_store().position(t1.entry()).unwrap();
    // Positions survive to the file format's 4-decimal precision.
    assert!((target - Vec3::new(12.3456, -7.25, 0.125)).abs().max_element() < 1e-4);
    assert!((entry - Vec3::new(-40.0, 55.5, 9.0625)).abs().max_element() < 1e-4);

    // The last loaded trajectory is selected.
    assert!(restored.trajectories().is_selected(2));
}

#[test]
fn declined_load_leaves_state_untouched() {
    let (mut planner, _log) = test_planner("load_declined");
    planner.add_trajectory();
    planner.move_target(Vec3::new(1.0, 2.0, 3.0));

    let file = temp_path("load_declined_source.txt");
    planner.save_landmarks_to(&file).unwrap();

    let outcome = planner.load_trajectories(&file, || false).unwrap();
    assert_eq!(outcome, LoadOutcome::Cancelled);
    assert_eq!(planner.trajectories().len(), 1);
    let t = *planner.trajectories().get(1).unwrap();
    assert_eq!(planner.landmark_store().position(t.target()), Some(Vec3::new(1.0, 2.0, 3.0)));
}

#[test]
fn load_missing_file_is_an_error() {
    let (mut planner, _log) = test_planner("load_missing");
    planner.add_trajectory();

    let err = planner
        .load_trajectories(&temp_path("does_not_exist.txt"), || true)
        .unwrap_err();
    assert!(matches!(err, stereoplan::PlannerError::Io(_)));
    // The confirmation gate never ran, so nothing was cleared.
    assert_eq!(planner.trajectories().len(), 1);
}

#[test]
fn end_interaction_rewrites_autosave() {
    let (mut planner, _log) = test_planner("end_interaction");
    planner.add_trajectory();
    let t = *planner.trajectories().get(1).unwrap();

    let file = planner.config().output_file.clone();
    std::fs::remove_file(&file).unwrap();

    planner.on_point_modified(t.target());
    assert!(!file.exists(), "mid-drag modification must not write");

    planner.on_point_end_interaction(t.target());
    assert!(file.exists());
}

#[test]
fn lps_planner_writes_lps_tag() {
    let config = PlannerConfig {
        output_file: temp_path("lps_landmarks.txt"),
        output_plane_file: temp_path("lps_planes.txt"),
        coordinate_system: CoordinateSystem::Lps,
        ..PlannerConfig::default()
    };
    let mut planner = Planner::new(config, MemoryPointStore::new(), MemoryPointStore::new());
    planner.add_plane();

    let text = std::fs::read_to_string(planner.config().output_plane_file.clone()).unwrap();
    assert!(text.lines().any(|l| l == "# CoordinateSystem: LPS"));
}
