use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn project_command() {
    Command::cargo_bin("survey_dxf_cli")
        .unwrap()
        .args(["project", "-77.0", "38.9", "10.0", "--instrument-height", "2.0"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("1312333.333,"))
        .stdout(predicate::str::contains(",26.247"));
}

#[test]
fn points_command() {
    let dir = assert_fs::TempDir::new().unwrap();
    let input = dir.child("site.csv");
    input
        .write_str(
            "ID,Latitude,Longitude,Elevation,Fix ID,Remarks\n\
             2,38.9,-77.0,10.0,4,IP found\n\
             1,,-77.0,10.0,4,missing\n",
        )
        .unwrap();
    let dxf = dir.child("out.dxf");
    let csv = dir.child("out.csv");

    Command::cargo_bin("survey_dxf_cli")
        .unwrap()
        .args([
            "points",
            input.path().to_str().unwrap(),
            "--dxf",
            dxf.path().to_str().unwrap(),
            "--csv",
            csv.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted 1 of 2 rows"))
        .stdout(predicate::str::contains("Wrote"));

    dxf.assert(predicate::str::contains("v-site-X"));
    csv.assert(predicate::str::contains("Layer,Ortho_ft,X_ft,Y_ft"));
    csv.assert(predicate::str::contains("IP found"));
    dir.close().unwrap();
}

#[test]
fn geometry_command_skips_plain_files() {
    let dir = assert_fs::TempDir::new().unwrap();
    let features = dir.child("features.csv");
    features
        .write_str(
            "Geometry,Name,Remarks\n\
             POINTZ(-77.0 38.9 1.0),CP1,\n\
             \"LINESTRINGZ(-77.0 38.9 1.0, -77.1 38.95 2.0)\",fence,\n",
        )
        .unwrap();
    let plain = dir.child("plain.csv");
    plain.write_str("Latitude,Longitude\n38.9,-77.0\n").unwrap();
    let dxf = dir.child("geo.dxf");
    let csv = dir.child("geo.csv");

    Command::cargo_bin("survey_dxf_cli")
        .unwrap()
        .args([
            "geometry",
            features.path().to_str().unwrap(),
            plain.path().to_str().unwrap(),
            "--dxf",
            dxf.path().to_str().unwrap(),
            "--csv",
            csv.path().to_str().unwrap(),
            "--size",
            "0.5",
            "--text-size",
            "1.0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped plain"));

    dxf.assert(predicate::str::contains("v-lines-fence"));
    csv.assert(predicate::str::starts_with("Type,Name,Remarks,X_ft,Y_ft,Z_ft,Vertices"));
    dir.close().unwrap();
}

#[test]
fn bad_config_writes_nothing() {
    let dir = assert_fs::TempDir::new().unwrap();
    let input = dir.child("site.csv");
    input
        .write_str("Latitude,Longitude,Elevation\n38.9,-77.0,1.0\n")
        .unwrap();
    let dxf = dir.child("out.dxf");
    let csv = dir.child("out.csv");

    Command::cargo_bin("survey_dxf_cli")
        .unwrap()
        .args([
            "points",
            input.path().to_str().unwrap(),
            "--dxf",
            dxf.path().to_str().unwrap(),
            "--csv",
            csv.path().to_str().unwrap(),
            "--size",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("marker size"));

    dxf.assert(predicate::path::missing());
    csv.assert(predicate::path::missing());
    dir.close().unwrap();
}

#[test]
fn missing_input_fails() {
    Command::cargo_bin("survey_dxf_cli")
        .unwrap()
        .args(["points", "does-not-exist.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn outputs_in_separate_directories() {
    let dir = assert_fs::TempDir::new().unwrap();
    let input = dir.child("site.csv");
    input
        .write_str("ID,Latitude,Longitude,Elevation\n1,38.9,-77.0,10.0\n")
        .unwrap();
    let drawings = dir.child("drawings");
    drawings.create_dir_all().unwrap();
    let tables = dir.child("tables");
    tables.create_dir_all().unwrap();
    let dxf = drawings.child("out.dxf");
    let csv = tables.child("out.csv");

    Command::cargo_bin("survey_dxf_cli")
        .unwrap()
        .args([
            "points",
            input.path().to_str().unwrap(),
            "--dxf",
            dxf.path().to_str().unwrap(),
            "--csv",
            csv.path().to_str().unwrap(),
        ])
        .assert()
        .success();

    dxf.assert(predicate::path::exists());
    csv.assert(predicate::str::starts_with("ID,Latitude"));
    assert_eq!(std::fs::read_dir(drawings.path()).unwrap().count(), 1);
    assert_eq!(std::fs::read_dir(tables.path()).unwrap().count(), 1);
}
