use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::process::Command;

const LINE: &str = r#"{"type": "LineString", "coordinates": [[0.0, 0.0], [100.0, 0.0]]}"#;

fn cpt_json(id: &str, easting: f64, level: f64) -> String {
    format!(
        r#"{{"id": "{id}", "easting": {easting}, "northing": 3.0, "ground_level": {level},
            "final_depth": 20.0,
            "samples": [
                {{"depth": 0.0, "cone_resistance": 1.0, "friction_ratio": 2.0}},
                {{"depth": 20.0, "cone_resistance": 12.0, "friction_ratio": 1.0}}
            ]}}"#
    )
}

fn fixture() -> (assert_fs::TempDir, Vec<String>) {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("line.geojson").write_str(LINE).unwrap();
    dir.child("cpt1.json").write_str(&cpt_json("CPT01", 20.0, 5.0)).unwrap();
    dir.child("cpt2.json").write_str(&cpt_json("CPT02", 80.0, 3.0)).unwrap();
    dir.child("cpt3.gef").write_str("#GEFID= 1, 1, 0").unwrap();
    let path = |name: &str| dir.child(name).path().to_str().unwrap().to_string();
    let args = vec![
        "--line".to_string(),
        path("line.geojson"),
        "--cpts".to_string(),
        path("cpt1.json"),
        path("cpt2.json"),
        path("cpt3.gef"),
    ];
    (dir, args)
}

#[test]
fn project_command() {
    let (dir, inputs) = fixture();
    Command::cargo_bin("geo_profile_cli")
        .unwrap()
        .arg("project")
        .args(&inputs)
        .assert()
        .success()
        .stdout(predicate::str::contains("Line length: 100.000"))
        .stdout(predicate::str::contains("CPT01\tstation 20.000\tfraction 0.2000\toffset 3.000"));
    dir.close().unwrap();
}

#[test]
fn ground_level_command() {
    let (dir, inputs) = fixture();
    Command::cargo_bin("geo_profile_cli")
        .unwrap()
        .arg("ground-level")
        .args(&inputs)
        .assert()
        .success()
        .stdout("0.0000,5.000\n20.0000,5.000\n80.0000,3.000\n100.0000,3.000\n");
    dir.close().unwrap();
}

#[test]
fn canvas_command_writes_svg() {
    let (dir, inputs) = fixture();
    let clicks = dir.child("clicks.json");
    clicks
        .write_str(r#"[{"event": "append", "x": 10, "y": 300}, {"event": "append", "x": 900, "y": 320}]"#)
        .unwrap();
    let out = dir.child("canvas.svg");
    Command::cargo_bin("geo_profile_cli")
        .unwrap()
        .arg("canvas")
        .args(&inputs)
        .args(["--clicks", clicks.path().to_str().unwrap()])
        .args(["--output", out.path().to_str().unwrap()])
        .assert()
        .success();
    out.assert(predicate::str::starts_with("<svg"));
    out.assert(predicate::str::contains("10.00,300.00 900.00,320.00"));
    dir.close().unwrap();
}

#[test]
fn digitize_command_exports() {
    let (dir, inputs) = fixture();
    let config = dir.child("config.json");
    config
        .write_str(r#"{"canvas_width": 100, "canvas_height": 100, "company": "Acme"}"#)
        .unwrap();
    let clicks = dir.child("clicks.json");
    clicks
        .write_str(
            r#"[
                {"event": "append", "x": 0, "y": 50},
                {"event": "append", "x": 100, "y": 50},
                {"event": "append", "x": 100, "y": 50},
                {"event": "finish"}
            ]"#,
        )
        .unwrap();
    let layers = dir.child("layers.csv");
    layers.write_str("layer,material,color\n1,Clay,steelblue\n").unwrap();
    let geo = dir.child("out.geo");

    Command::cargo_bin("geo_profile_cli")
        .unwrap()
        .arg("digitize")
        .args(&inputs)
        .args(["--config", config.path().to_str().unwrap()])
        .args(["--clicks", clicks.path().to_str().unwrap()])
        .args(["--layers", layers.path().to_str().unwrap()])
        .args(["--label", "dike"])
        .args(["--geometry", geo.path().to_str().unwrap()])
        .args(["--image-dir", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 boundaries and 1 layers"));

    geo.assert(predicate::str::contains("COMPANY    : Acme"));
    geo.assert(predicate::str::contains("\t\t1\t0.000\t\t-5.000\t\t0.000"));
    dir.child("gtl_dike.svg").assert(predicate::path::exists());
    dir.child("gtl_dike.png").assert(predicate::path::exists());
    dir.close().unwrap();
}

#[test]
fn digitize_without_finish_fails() {
    let (dir, inputs) = fixture();
    let clicks = dir.child("clicks.json");
    clicks.write_str(r#"[{"event": "append", "x": 1, "y": 1}]"#).unwrap();
    let layers = dir.child("layers.csv");
    layers.write_str("layer,material,color\n1,Clay,steelblue\n").unwrap();

    Command::cargo_bin("geo_profile_cli")
        .unwrap()
        .arg("digitize")
        .args(&inputs)
        .args(["--clicks", clicks.path().to_str().unwrap()])
        .args(["--layers", layers.path().to_str().unwrap()])
        .args(["--geometry", dir.child("out.geo").path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("session closed without finishing"));
    dir.child("out.geo").assert(predicate::path::missing());
    dir.close().unwrap();
}

#[test]
fn empty_collection_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("line.geojson").write_str(LINE).unwrap();
    Command::cargo_bin("geo_profile_cli")
        .unwrap()
        .args(["project", "--line", dir.child("line.geojson").path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no measurements loaded"));
    dir.close().unwrap();
}

#[test]
fn failure_is_reported_once() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("line.geojson").write_str(LINE).unwrap();
    let output = Command::cargo_bin("geo_profile_cli")
        .unwrap()
        .args(["project", "--line", dir.child("line.geojson").path().to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("no measurements loaded").count(), 1, "{stderr}");
    dir.close().unwrap();
}
