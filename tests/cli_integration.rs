//! Integration tests for the georesolve binary.
//!
//! These tests exercise the full CLI against fixture reference data.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Get a command with an isolated environment and fixture data.
fn georesolve(home: &assert_fs::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("georesolve").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("xdg"))
        .env_remove("GEORESOLVE_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--areas-data")
        .arg(fixture("areas.json"))
        .arg("--metro-data")
        .arg(fixture("metro.json"));
    cmd
}

#[test]
fn version_flag_works() {
    Command::cargo_bin("georesolve")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("georesolve"));
}

#[test]
fn help_flag_works() {
    Command::cargo_bin("georesolve")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("place names"));
}

mod resolve {
    use super::*;

    #[test]
    fn prints_area_ids() {
        let home = assert_fs::TempDir::new().unwrap();
        georesolve(&home)
            .args(["resolve", "area", "г.", "Москва"])
            .assert()
            .success()
            .stdout("1\n");
    }

    #[test]
    fn unknown_area_prints_fallback() {
        let home = assert_fs::TempDir::new().unwrap();
        georesolve(&home)
            .args(["resolve", "area", "Нижний Тагил"])
            .assert()
            .success()
            .stdout("113\n1\n");
    }

    #[test]
    fn unknown_station_prints_nothing() {
        let home = assert_fs::TempDir::new().unwrap();
        georesolve(&home)
            .args(["resolve", "metro", "Неизвестная"])
            .assert()
            .success()
            .stdout("");
    }

    #[test]
    fn explain_shows_strategy() {
        let home = assert_fs::TempDir::new().unwrap();
        georesolve(&home)
            .args(["resolve", "area", "Масква", "--explain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("strategy: fuzzy"))
            .stdout(predicate::str::contains("matched key: \"москва\""))
            .stdout(predicate::str::ends_with("1\n"));
    }

    #[test]
    fn json_output() {
        let home = assert_fs::TempDir::new().unwrap();
        let output = georesolve(&home)
            .args(["--json", "resolve", "metro", "м. Парк культуры"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["ids"], serde_json::json!(["1.3", "5.1"]));
        assert_eq!(json["strategy"], "exact");
        assert_eq!(json["normalized"], "парк культуры");
    }

    #[test]
    fn misspelled_area_json() {
        let home = assert_fs::TempDir::new().unwrap();
        let output = georesolve(&home)
            .args(["--json", "resolve", "area", "Масква"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["ids"], serde_json::json!(["1"]));
        assert_eq!(json["strategy"], "fuzzy");
    }

    #[test]
    fn missing_data_file_fails() {
        let home = assert_fs::TempDir::new().unwrap();
        Command::cargo_bin("georesolve")
            .unwrap()
            .env("HOME", home.path())
            .env("XDG_CONFIG_HOME", home.path().join("xdg"))
            .env_remove("GEORESOLVE_CONFIG")
            .args(["--areas-data"])
            .arg(home.path().join("missing.json"))
            .args(["resolve", "area", "Москва"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to read area reference data"));
    }

    #[test]
    fn malformed_data_file_fails() {
        let home = assert_fs::TempDir::new().unwrap();
        let areas = home.child("areas.json");
        areas.write_str("{ not json").unwrap();

        Command::cargo_bin("georesolve")
            .unwrap()
            .env("HOME", home.path())
            .env("XDG_CONFIG_HOME", home.path().join("xdg"))
            .env_remove("GEORESOLVE_CONFIG")
            .arg("--areas-data")
            .arg(areas.path())
            .args(["resolve", "area", "Москва"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("malformed area reference data"));
    }
}

mod inspect {
    use super::*;

    #[test]
    fn prints_stats() {
        let home = assert_fs::TempDir::new().unwrap();
        georesolve(&home)
            .args(["inspect", "area"])
            .assert()
            .success()
            .stdout(predicate::str::contains("entries: 12"))
            .stdout(predicate::str::contains("ambiguous keys: 1"))
            .stdout(predicate::str::contains("fingerprint: "));
    }

    #[test]
    fn lookup_dumps_bucket() {
        let home = assert_fs::TempDir::new().unwrap();
        georesolve(&home)
            .args(["inspect", "area", "--lookup", "г. Троицк"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Московская область > Троицк"))
            .stdout(predicate::str::contains("Челябинская область > Троицк"));
    }

    #[test]
    fn lookup_json() {
        let home = assert_fs::TempDir::new().unwrap();
        let output = georesolve(&home)
            .args(["--json", "inspect", "metro", "--lookup", "Курская"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["key"], "курская");
        assert_eq!(json["entries"][0]["id"], "5.2");
        assert_eq!(json["entries"][0]["line_name"], "Кольцевая");
    }
}

mod query {
    use super::*;

    #[test]
    fn builds_repeated_params() {
        let home = assert_fs::TempDir::new().unwrap();
        georesolve(&home)
            .args([
                "query",
                "--text",
                "rust",
                "--area",
                "Троицк",
                "--station",
                "Сокольники",
                "--experience",
                "between1And3",
                "--schedule",
                "sometimes",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("text=rust\n"))
            .stdout(predicate::str::contains("area=1385\narea=2034\n"))
            .stdout(predicate::str::contains("metro=1.1\n"))
            .stdout(predicate::str::contains("experience=between1And3\n"))
            .stdout(predicate::str::contains("schedule=").not())
            .stdout(predicate::str::ends_with("page=0\nper_page=20\nno_magic=true\n"));
    }

    #[test]
    fn metro_flag_filters_by_station() {
        let home = assert_fs::TempDir::new().unwrap();
        georesolve(&home)
            .args([
                "query",
                "--text",
                "rust",
                "--area",
                "Москва",
                "--metro",
                "Сокольники",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("area=1\n"))
            .stdout(predicate::str::contains("metro=1.1\n"));
    }

    #[test]
    fn unknown_station_is_omitted() {
        let home = assert_fs::TempDir::new().unwrap();
        georesolve(&home)
            .args(["query", "--station", "Неизвестная"])
            .assert()
            .success()
            .stdout(predicate::str::contains("metro=").not());
    }
}

mod config {
    use super::*;

    #[test]
    fn init_then_show() {
        let home = assert_fs::TempDir::new().unwrap();
        let config = home.child("georesolve.toml");

        georesolve(&home)
            .arg("--config")
            .arg(config.path())
            .args(["config", "init"])
            .assert()
            .success();
        config.assert(predicate::str::contains("fallback_ids"));

        georesolve(&home)
            .arg("--config")
            .arg(config.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("# Loaded from"))
            .stdout(predicate::str::contains("cutoff = 0.75"));
    }

    #[test]
    fn init_refuses_overwrite() {
        let home = assert_fs::TempDir::new().unwrap();
        let config = home.child("georesolve.toml");
        config.write_str("[fuzzy]\nlimit = 1\n").unwrap();

        georesolve(&home)
            .arg("--config")
            .arg(config.path())
            .args(["config", "init"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn invalid_config_fails() {
        let home = assert_fs::TempDir::new().unwrap();
        let config = home.child("georesolve.toml");
        config.write_str("[fuzzy]\ncutoff = 3.0\n").unwrap();

        georesolve(&home)
            .arg("--config")
            .arg(config.path())
            .args(["resolve", "area", "Москва"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("cutoff"));
    }

    #[test]
    fn configured_fallback_applies() {
        let home = assert_fs::TempDir::new().unwrap();
        let config = home.child("georesolve.toml");
        config.write_str("[areas]\nfallback_ids = [\"16\"]\n").unwrap();

        georesolve(&home)
            .arg("--config")
            .arg(config.path())
            .args(["resolve", "area", ""])
            .assert()
            .success()
            .stdout("16\n");
    }

    #[test]
    fn path_under_home() {
        let home = assert_fs::TempDir::new().unwrap();
        georesolve(&home)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains(".georesolve/config.toml"));
    }
}

#[test]
fn completion_generates_script() {
    let home = assert_fs::TempDir::new().unwrap();
    georesolve(&home)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("georesolve"));
}
