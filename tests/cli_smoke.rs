use std::path::PathBuf;
use std::process::Output;

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_gala-motion")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "gala-motion.exe"
            } else {
                "gala-motion"
            });
            p
        })
}

fn fixture_arg() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("modal_scene.json")
        .to_string_lossy()
        .to_string()
}

fn run(args: &[&str]) -> Output {
    std::process::Command::new(exe())
        .args(args)
        .env_remove("GALA_REDUCED_MOTION")
        .output()
        .unwrap()
}

fn stdout_json(out: &Output) -> serde_json::Value {
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn cli_validate_reports_labels() {
    let fixture = fixture_arg();
    let out = run(&["validate", "--in", fixture.as_str()]);
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("duration 2500ms"), "{text}");
    assert!(text.contains("open"), "{text}");
    assert!(text.contains("close"), "{text}");
}

#[test]
fn cli_sample_prints_state_json() {
    let fixture = fixture_arg();
    let v = stdout_json(&run(&["sample", "--in", fixture.as_str(), "--at-ms", "600"]));
    assert_eq!(v["at"], 600);
    assert_eq!(v["targets"]["modal"]["opacity"], 1.0);

    let v = stdout_json(&run(&[
        "sample",
        "--in",
        fixture.as_str(),
        "--at-ms",
        "3600",
        "--looped",
    ]));
    assert_eq!(v["targets"]["modal"]["opacity"], 1.0);
}

#[test]
fn cli_terminal_for_builtin_scene() {
    let v = stdout_json(&run(&["terminal", "--scene", "calendar"]));
    assert!(v["targets"].as_object().is_some_and(|t| !t.is_empty()));
}

#[test]
fn cli_play_reduced_motion_prints_static_frame() {
    let fixture = fixture_arg();
    let v = stdout_json(&run(&["play", "--in", fixture.as_str(), "--reduced-motion"]));
    assert_eq!(v["targets"]["chipCount"]["text"], "12 tasks");
    assert_eq!(v["targets"]["modal"]["scale"], 1.0);
}

#[test]
fn cli_play_runs_one_loop() {
    let fixture = fixture_arg();
    let out = run(&["play", "--in", fixture.as_str(), "--loops", "1", "--fps", "50"]);
    assert!(out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("1 loop(s)"), "{err}");
}

#[test]
fn cli_rejects_unknown_scene() {
    let out = run(&["validate", "--scene", "nope"]);
    assert!(!out.status.success());
    let out = run(&["scenes", "--dump", "budget"]);
    assert!(out.status.success());
}
