#![cfg(feature = "sim")]

use std::fs;
use std::path::PathBuf;

use kaleido_execution::{
    ChoreographyConfig, ChoreographyError, FrameRepository, GridLayout, SimFrameRepository, Stage,
    planner_for,
};
use kaleido_robotics::{Pose, SlotId};

/// Write `contents` to a file unique to this test process.
fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kaleido-loading-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_config_file_overrides_defaults() {
    let path = scratch_file(
        "config.json",
        r#"{ "lateral_offset_mm": 50.0, "tool": "Schunk_EGP", "gripper": { "speed": 80 } }"#,
    );
    let config = ChoreographyConfig::load(&path).unwrap();
    assert_eq!(config.lateral_offset_mm, 50.0);
    assert_eq!(config.tool, "Schunk_EGP");
    assert_eq!(config.gripper.speed, 80);
    assert_eq!(config.gripper.force, 25);
    assert_eq!(config.dwell_ms, 10_000);
}

#[test]
fn test_invalid_config_file_rejected() {
    let path = scratch_file("bad_config.json", r#"{ "velocity_override": 0.0 }"#);
    assert!(matches!(
        ChoreographyConfig::load(&path),
        Err(ChoreographyError::InvalidConfig(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("kaleido-loading-does-not-exist.json");
    match GridLayout::load(&path) {
        Err(ChoreographyError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn test_malformed_layout_is_parse_error() {
    let path = scratch_file("broken_layout.json", r#"{ "slot_prefix": "/Grid/S", "#);
    assert!(matches!(
        GridLayout::load(&path),
        Err(ChoreographyError::Parse { .. })
    ));
}

#[test]
fn test_custom_layout_drives_planners() {
    let path = scratch_file(
        "layout.json",
        r#"{
            "slot_prefix": "/Grid/S",
            "clusters": [
                { "seed": 1, "lead": 2, "pivot_a": 3, "pivot_b": 4, "trail": 5 },
                { "seed": 6, "lead": 7, "pivot_a": 8, "pivot_b": 9, "trail": 10 }
            ],
            "colour": { "rows": [ { "start": 1, "end": 10, "step": 3 } ], "trailing": [12] }
        }"#,
    );
    let layout = GridLayout::load(&path).unwrap();

    let linear = planner_for(Stage::Linear).plan(&layout);
    assert_eq!(linear.len(), 8);
    assert_eq!(linear.operations[0].slot.as_str(), "/Grid/S2");

    let colour = planner_for(Stage::Colour).plan(&layout);
    let numbers: Vec<u32> = colour.iter().filter_map(|op| op.slot.number()).collect();
    assert_eq!(numbers, vec![1, 4, 7, 10, 12]);

    let hexagon = planner_for(Stage::Hexagon).plan(&layout);
    assert_eq!(hexagon.len(), 10);
    assert_eq!(hexagon.operations[5].slot.as_str(), "/Grid/S6");
}

#[test]
fn test_frames_file_resolves_slots() {
    let path = scratch_file(
        "frames.json",
        r#"{
            "/Kalidescope/Home": { "x": 300.0, "y": -300.0, "z": 500.0, "alpha": 0.0, "beta": 0.0, "gamma": 3.0 },
            "/Kalidescope/P3": { "x": 490.0, "y": 0.0, "z": 100.0, "alpha": 0.0, "beta": 0.0, "gamma": 3.0 }
        }"#,
    );
    let frames = SimFrameRepository::load(&path).unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(
        frames.resolve(&SlotId::from("/Kalidescope/P3")).unwrap(),
        Pose::new(490.0, 0.0, 100.0, 0.0, 0.0, 3.0)
    );
    assert!(!frames.contains(&SlotId::from("/Kalidescope/P4")));
}

#[test]
fn test_plan_exports_rotation_as_degrees() {
    let plan = planner_for(Stage::Linear).plan(&GridLayout::default());
    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["stage"], "linear");
    assert_eq!(json["operations"][0]["slot"], "/Kalidescope/P3");
    assert_eq!(json["operations"][1]["rotation"], 240.0);
}
