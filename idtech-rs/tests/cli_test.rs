//! CLI integration tests for MD5 model inspection
//!
//! Runs real invocations of the idtech-rs binary against small fixture
//! files written to a temporary directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const MODEL: &str = r#"MD5Version 10
commandline ""

numJoints 2
numMeshes 1

joints {
	"origin"	-1 ( 0 0 0 ) ( 0 0 0 )
	"arm"	0 ( 0 10 0 ) ( 0 0 0 )
}

mesh {
	shader "models/test/quad"

	numverts 3
	vert 0 ( 0 0 ) 0 1
	vert 1 ( 1 0 ) 1 1
	vert 2 ( 0 1 ) 2 1

	numtris 1
	tri 0 0 1 2

	numweights 3
	weight 0 0 1.0 ( 0 0 0 )
	weight 1 0 1.0 ( 1 0 0 )
	weight 2 1 1.0 ( 1 0 0 )
}
"#;

const LIFT: &str = r#"MD5Version 10
numFrames 2
numJoints 2
frameRate 10
numAnimatedComponents 2
hierarchy {
	"origin"	-1 0 0
	"arm"	0 3 0
}
bounds {
	( -1 -1 -1 ) ( 12 12 12 )
	( -1 -1 -1 ) ( 12 12 12 )
}
baseframe {
	( 0 0 0 ) ( 0 0 0 )
	( 0 10 0 ) ( 0 0 0 )
}
frame 0 {
	2 10
}
frame 1 {
	4 10
}
"#;

fn write_fixture(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

fn idtech() -> Command {
    Command::cargo_bin("idtech-rs").unwrap()
}

#[test]
fn info_reports_model_counts() {
    let dir = TempDir::new().unwrap();
    let mesh = write_fixture(&dir, "quadbot.md5mesh", MODEL);

    idtech()
        .args(["md5", "info"])
        .arg(&mesh)
        .assert()
        .success()
        .stdout(predicate::str::contains("MD5 Model Information"))
        .stdout(predicate::str::contains("Joints: 2"))
        .stdout(predicate::str::contains("Triangles: 1"))
        .stdout(predicate::str::contains("models/test/quad"));
}

#[test]
fn info_detailed_lists_joints() {
    let dir = TempDir::new().unwrap();
    let mesh = write_fixture(&dir, "quadbot.md5mesh", MODEL);

    idtech()
        .args(["md5", "info", "--detailed"])
        .arg(&mesh)
        .assert()
        .success()
        .stdout(predicate::str::contains("origin"))
        .stdout(predicate::str::contains("<root>"))
        .stdout(predicate::str::contains("arm"));
}

#[test]
fn info_json_is_parseable() {
    let dir = TempDir::new().unwrap();
    let mesh = write_fixture(&dir, "quadbot.md5mesh", MODEL);

    let assert = idtech()
        .args(["md5", "info", "--json"])
        .arg(&mesh)
        .assert()
        .success();

    let summary: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(summary["name"], "quadbot");
    assert_eq!(summary["joint_count"], 2);
    assert_eq!(summary["vertex_count"], 3);
    assert_eq!(summary["shaders"][0], "models/test/quad.tga");
}

#[test]
fn info_dispatches_on_animation_suffix() {
    let dir = TempDir::new().unwrap();
    let anim = write_fixture(&dir, "lift.md5anim", LIFT);

    idtech()
        .args(["md5", "info"])
        .arg(&anim)
        .assert()
        .success()
        .stdout(predicate::str::contains("MD5 Animation Information"))
        .stdout(predicate::str::contains("Frames: 2"))
        .stdout(predicate::str::contains("10 fps"));
}

#[test]
fn anims_attaches_compatible_animations() {
    let dir = TempDir::new().unwrap();
    let mesh = write_fixture(&dir, "quadbot.md5mesh", MODEL);
    let anim = write_fixture(&dir, "lift.md5anim", LIFT);

    idtech()
        .args(["md5", "anims"])
        .arg(&mesh)
        .arg(&anim)
        .assert()
        .success()
        .stdout(predicate::str::contains("slot 0"))
        .stdout(predicate::str::contains("Attached: 1"));
}

#[test]
fn anims_reports_joint_mismatches() {
    let dir = TempDir::new().unwrap();
    let mesh = write_fixture(&dir, "quadbot.md5mesh", MODEL);
    let renamed = LIFT.replace("\"arm\"", "\"leg\"");
    let anim = write_fixture(&dir, "lift.md5anim", &renamed);

    idtech()
        .args(["md5", "anims"])
        .arg(&mesh)
        .arg(&anim)
        .assert()
        .success()
        .stdout(predicate::str::contains("does not match model joint"))
        .stdout(predicate::str::contains("Attached: 0"));
}

#[test]
fn tree_draws_joint_hierarchy() {
    let dir = TempDir::new().unwrap();
    let mesh = write_fixture(&dir, "quadbot.md5mesh", MODEL);

    idtech()
        .args(["md5", "tree", "--no-color"])
        .arg(&mesh)
        .assert()
        .success()
        .stdout(predicate::str::contains("Skeleton"))
        .stdout(predicate::str::contains("└── 🦴 arm"))
        .stdout(predicate::str::contains("models/test/quad"));
}

#[test]
fn tree_depth_limit_prunes_joints() {
    let dir = TempDir::new().unwrap();
    let mesh = write_fixture(&dir, "quadbot.md5mesh", MODEL);

    idtech()
        .args(["md5", "tree", "--no-color", "--depth", "1"])
        .arg(&mesh)
        .assert()
        .success()
        .stdout(predicate::str::contains("Skeleton"))
        .stdout(predicate::str::contains("origin").not());
}

#[test]
fn tree_renders_animation_hierarchies() {
    let dir = TempDir::new().unwrap();
    let anim = write_fixture(&dir, "lift.md5anim", LIFT);

    idtech()
        .args(["md5", "tree", "--no-color"])
        .arg(&anim)
        .assert()
        .success()
        .stdout(predicate::str::contains("Hierarchy"))
        .stdout(predicate::str::contains("arm"))
        .stdout(predicate::str::contains("0x03"));
}

#[test]
fn validate_passes_clean_files() {
    let dir = TempDir::new().unwrap();
    let mesh = write_fixture(&dir, "quadbot.md5mesh", MODEL);

    idtech()
        .args(["md5", "validate"])
        .arg(&mesh)
        .assert()
        .success()
        .stdout(predicate::str::contains("loads cleanly"));
}

#[test]
fn validate_reports_bias_warnings() {
    let dir = TempDir::new().unwrap();
    let broken = MODEL.replace("weight 0 0 1.0", "weight 0 0 0.25");
    let mesh = write_fixture(&dir, "quadbot.md5mesh", &broken);

    idtech()
        .args(["md5", "validate"])
        .arg(&mesh)
        .assert()
        .success()
        .stdout(predicate::str::contains("warning"))
        .stdout(predicate::str::contains("weight biases sum to"));
}

#[test]
fn validate_fails_on_malformed_files() {
    let dir = TempDir::new().unwrap();
    let truncated = &MODEL[..MODEL.len() / 2];
    let mesh = write_fixture(&dir, "quadbot.md5mesh", truncated);

    idtech()
        .args(["md5", "validate"])
        .arg(&mesh)
        .assert()
        .failure();
}

#[test]
fn unknown_suffix_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "quadbot.obj", MODEL);

    idtech()
        .args(["md5", "info"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unrecognized file type"));
}

#[test]
fn completions_cover_the_cli() {
    idtech()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("idtech-rs"));
}
