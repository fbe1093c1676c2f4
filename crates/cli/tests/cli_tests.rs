//! CLI integration tests

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const TRAINING_DATA: &str = "\
building,zone,event_type,day,time,rsvps,expected_attendance
Boelter Hall,north,club,wed,18:00,150,140
";

const TWO_SIZE_DATA: &str = "\
building,zone,event_type,day,time,rsvps,expected_attendance
Ackerman Union,central,social,fri,18:00,100,90
Ackerman Union,central,social,fri,18:00,110,100
Pauley Pavilion,west,sports,sat,20:00,200,150
Pauley Pavilion,west,sports,sat,20:00,210,170
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(training_data: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("past_events.csv"), training_data).unwrap();
        std::fs::write(
            dir.path().join("predictor_config.json"),
            r#"{"food_buffer": 15, "extra_percent": 0.1}"#,
        )
        .unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Run the binary with both input paths supplied through the environment
    fn run(&self, args: &[&str]) -> Output {
        foodlens(self.dir.path())
            .env("FOODLENS_DATA", self.path("past_events.csv"))
            .env("FOODLENS_CONFIG", self.path("predictor_config.json"))
            .args(args)
            .output()
            .expect("Failed to execute command")
    }
}

/// A command with an isolated home directory and no ambient FoodLens env
fn foodlens(home: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_foodlens"));
    command
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("FOODLENS_DATA")
        .env_remove("FOODLENS_CONFIG")
        .current_dir(home);
    command
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = foodlens(dir.path()).arg("--help").output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("FoodLens"), "Should show app name");
    assert!(stdout.contains("recommend"), "Should show recommend command");
    assert!(stdout.contains("evaluate"), "Should show evaluate command");
    assert!(stdout.contains("tree"), "Should show tree command");
    assert!(stdout.contains("init-config"), "Should show init-config command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let dir = tempfile::tempdir().unwrap();
    let output = foodlens(dir.path()).arg("--version").output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("foodlens"), "Should show binary name");
}

#[test]
fn test_recommend_help_lists_known_labels() {
    let dir = tempfile::tempdir().unwrap();
    let output = foodlens(dir.path())
        .args(["recommend", "--help"])
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("north, south, east, west"));
    assert!(stdout.contains("club, seminar, fair, career_fair"));
    assert!(stdout.contains("mon, tue, wed, thu, fri"));
    assert!(stdout.contains("09:00, 12:00, 15:00, 18:00, 20:00"));
    assert!(!stdout.contains("academic"));
}

#[test]
fn test_recommend_json() {
    let fixture = Fixture::new(TRAINING_DATA);
    let output = fixture.run(&[
        "--format",
        "json",
        "recommend",
        "--building",
        "Boelter Hall",
        "--zone",
        "north",
        "--event-type",
        "club",
        "--day",
        "wed",
        "--time",
        "18:00",
        "--rsvps",
        "150",
        "--planned-food",
        "160",
    ]);

    assert!(output.status.success(), "{:?}", output);
    let result = stdout_json(&output);
    assert_eq!(result["predicted_attendance"], 140);
    assert_eq!(result["recommended_food"], 155);
    assert_eq!(result["reduction"], 5);
    assert_eq!(result["explanation"].as_array().unwrap().len(), 3);
}

#[test]
fn test_recommend_table() {
    let fixture = Fixture::new(TRAINING_DATA);
    let output = fixture.run(&[
        "recommend",
        "--building",
        "Boelter Hall",
        "--zone",
        "north",
        "--event-type",
        "club",
        "--day",
        "wed",
        "--time",
        "18:00",
        "--rsvps",
        "150",
        "--planned-food",
        "160",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Recommended food"));
    assert!(stdout.contains("155"));
    assert!(stdout.contains("+5"));
}

#[test]
fn test_recommend_missing_data_fails() {
    let fixture = Fixture::new(TRAINING_DATA);
    std::fs::remove_file(fixture.path("past_events.csv")).unwrap();

    let output = fixture.run(&[
        "recommend",
        "--building",
        "Boelter Hall",
        "--zone",
        "north",
        "--event-type",
        "club",
        "--day",
        "wed",
        "--time",
        "18:00",
        "--rsvps",
        "150",
        "--planned-food",
        "160",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("data unavailable"), "stderr: {}", stderr);
}

#[test]
fn test_recommend_requires_event_fields() {
    let fixture = Fixture::new(TRAINING_DATA);
    let output = fixture.run(&["recommend", "--building", "Boelter Hall"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--zone"));
}

#[test]
fn test_evaluate_json() {
    let fixture = Fixture::new(TWO_SIZE_DATA);
    let output = fixture.run(&["--format", "json", "evaluate"]);

    assert!(output.status.success(), "{:?}", output);
    let body = stdout_json(&output);
    assert_eq!(body["report"]["rows"], 4);
    assert_eq!(body["model_version"].as_str().unwrap().len(), 12);
    let accuracy = body["report"]["surplus_accuracy"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&accuracy));
}

#[test]
fn test_evaluate_empty_table_fails() {
    let fixture = Fixture::new("building,zone,event_type,day,time,rsvps,expected_attendance\n");
    let output = fixture.run(&["evaluate"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no training data"), "stderr: {}", stderr);
}

#[test]
fn test_tree_prints_text() {
    let fixture = Fixture::new(TWO_SIZE_DATA);
    let output = fixture.run(&["tree"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("|--- "));
    assert!(stdout.contains("value: ["));
}

#[test]
fn test_verbose_logs_resolved_inputs() {
    let fixture = Fixture::new(TRAINING_DATA);
    let output = fixture.run(&["--verbose", "tree"]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Resolved inputs"), "stderr: {}", stderr);
    assert!(stderr.contains("Exported decision tree"), "stderr: {}", stderr);
}

#[test]
fn test_tree_writes_json_file() {
    let fixture = Fixture::new(TRAINING_DATA);
    let target = fixture.path("tree.json");
    let output = fixture.run(&["tree", "--output", target.to_str().unwrap()]);

    assert!(output.status.success());
    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(doc["tree"], "|--- value: [140.00]\n");
}

#[test]
fn test_init_config_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("model").join("predictor_config.json");

    let output = foodlens(dir.path())
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "init-config",
            "--food-buffer",
            "20",
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "{:?}", output);
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config_path).unwrap()).unwrap();
    assert_eq!(written["food_buffer"], 20);
    assert_eq!(written["extra_percent"], 0.1);
}

#[test]
fn test_init_config_refuses_overwrite_without_force() {
    let fixture = Fixture::new(TRAINING_DATA);

    let output = fixture.run(&["init-config", "--food-buffer", "30"]);
    assert!(!output.status.success());
    let content = std::fs::read_to_string(fixture.path("predictor_config.json")).unwrap();
    assert!(content.contains("15"));

    let output = fixture.run(&["init-config", "--food-buffer", "30", "--force"]);
    assert!(output.status.success());
    let content = std::fs::read_to_string(fixture.path("predictor_config.json")).unwrap();
    assert!(content.contains("30"));
}

#[test]
fn test_settings_file_supplies_default_paths() {
    let fixture = Fixture::new(TRAINING_DATA);
    let settings_dir = fixture.dir.path().join(".config").join("foodlens");
    std::fs::create_dir_all(&settings_dir).unwrap();
    std::fs::write(
        settings_dir.join("config.json"),
        serde_json::json!({
            "data_path": fixture.path("past_events.csv"),
            "config_path": fixture.path("predictor_config.json"),
            "default_format": "json",
        })
        .to_string(),
    )
    .unwrap();

    let output = foodlens(fixture.dir.path())
        .args(["evaluate"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{:?}", output);
    assert_eq!(stdout_json(&output)["report"]["rows"], 1);
}
