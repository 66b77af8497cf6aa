#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

const FAKE_BET: &str = r#"#!/bin/sh
touch "$(dirname "$0")/invoked"
if [ "$1" = "-V" ]; then
  echo "BET (Brain Extraction Tool) v2.1"
  exit 0
fi
echo "$@" > "$(dirname "$0")/last_args"
cp "$1" "$2.nii.gz"
"#;

const FAILING_BET: &str = r#"#!/bin/sh
touch "$(dirname "$0")/invoked"
if [ "$1" = "-V" ]; then
  exit 1
fi
printf 'partial' > "$2.nii.gz"
echo "Image Exception : #22" >&2
exit 1
"#;

struct Env {
    tmp: TempDir,
    input: PathBuf,
    output: PathBuf,
}

impl Env {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("bids");
        let anat = input.join("sub-0051160").join("anat");
        std::fs::create_dir_all(&anat).unwrap();
        std::fs::write(anat.join("sub-0051160_T1w.nii.gz"), b"t1w").unwrap();
        let output = tmp.path().join("results");
        Self { tmp, input, output }
    }

    fn tool(&self, script: &str) -> PathBuf {
        let dir = self.tmp.path().join("fsl");
        std::fs::create_dir_all(&dir).unwrap();
        let bet = dir.join("bet");
        std::fs::write(&bet, script).unwrap();
        std::fs::set_permissions(&bet, std::fs::Permissions::from_mode(0o755)).unwrap();
        bet
    }

    fn invoked(&self) -> bool {
        self.tmp.path().join("fsl").join("invoked").exists()
    }

    fn subject_dir(&self) -> PathBuf {
        self.output.join("sub-0051160")
    }

    fn cmd(&self, bet: &Path) -> Command {
        let mut cmd = Command::cargo_bin("skullstrip").unwrap();
        cmd.current_dir(self.tmp.path())
            .env("XDG_CONFIG_HOME", self.tmp.path().join("config"))
            .env("HOME", self.tmp.path())
            .env_remove("SKULLSTRIP_BET_BIN")
            .env_remove("SKULLSTRIP_LOG_DIR")
            .env_remove("RUST_LOG")
            .env_remove("FSLDIR")
            .arg("--input")
            .arg(&self.input)
            .arg("--output")
            .arg(&self.output)
            .arg("--subject")
            .arg("0051160")
            .arg("--bet-bin")
            .arg(bet);
        cmd
    }
}

#[test]
fn default_run_writes_image_and_metadata() {
    let env = Env::new();
    let bet = env.tool(FAKE_BET);

    env.cmd(&bet)
        .assert()
        .success()
        .stderr(contains("processing completed successfully"));

    let dir = env.subject_dir();
    assert!(dir.join("sub-0051160_T1w_brain.nii.gz").is_file());
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("processing_metadata.json")).unwrap())
            .unwrap();
    assert_eq!(json["parameters"]["fractional_intensity"], 0.5);
    assert_eq!(json["software_versions"]["external_tool"], "BET (Brain Extraction Tool) v2.1");

    let args = std::fs::read_to_string(env.tmp.path().join("fsl").join("last_args")).unwrap();
    assert!(args.trim_end().ends_with("-f 0.5 -R"));
}

#[test]
fn short_flag_and_no_robust() {
    let env = Env::new();
    let bet = env.tool(FAKE_BET);

    env.cmd(&bet).args(["--f", "0.4", "--no-robust"]).assert().success();

    let args = std::fs::read_to_string(env.tmp.path().join("fsl").join("last_args")).unwrap();
    assert!(args.trim_end().ends_with("-f 0.4"));
}

#[test]
fn missing_input_exits_non_zero_without_outputs() {
    let env = Env::new();
    let bet = env.tool(FAKE_BET);
    std::fs::remove_dir_all(env.input.join("sub-0051160")).unwrap();

    env.cmd(&bet)
        .assert()
        .code(3)
        .stderr(contains("input not found"));
    assert!(!env.output.exists());
    assert!(!env.invoked());
}

#[test]
fn out_of_range_threshold_fails_before_bet_runs() {
    for value in ["1.5", "-0.1"] {
        let env = Env::new();
        let bet = env.tool(FAKE_BET);

        env.cmd(&bet)
            .args(["--fractional-intensity", value])
            .assert()
            .code(2)
            .stderr(contains("outside (0, 1)"));
        assert!(!env.invoked(), "bet ran for {value}");
        assert!(!env.output.exists());
    }
}

#[test]
fn unparseable_threshold_is_invalid_parameter() {
    let env = Env::new();
    let bet = env.tool(FAKE_BET);

    env.cmd(&bet)
        .args(["--f", "abc"])
        .assert()
        .code(2)
        .stderr(contains("not a number"));
    assert!(!env.invoked());
}

#[test]
fn failing_bet_exits_with_tool_failure() {
    let env = Env::new();
    let bet = env.tool(FAILING_BET);

    env.cmd(&bet)
        .assert()
        .code(5)
        .stderr(contains("Image Exception"));
    assert!(!env.subject_dir().join("sub-0051160_T1w_brain.nii.gz").exists());
}

#[test]
fn missing_bet_binary_exits_with_tool_not_found() {
    let env = Env::new();
    let missing = env.tmp.path().join("fsl").join("bet");

    env.cmd(&missing).assert().code(6);
    assert!(!env.output.exists());
}

#[test]
fn metadata_write_failure_keeps_exit_zero() {
    let env = Env::new();
    let bet = env.tool(FAKE_BET);
    std::fs::create_dir_all(env.subject_dir().join("processing_metadata.json")).unwrap();

    env.cmd(&bet)
        .assert()
        .success()
        .stderr(contains("metadata could not be written"));
    assert!(env.subject_dir().join("sub-0051160_T1w_brain.nii.gz").is_file());
}

#[test]
fn verbose_enables_debug_logs() {
    let env = Env::new();
    let bet = env.tool(FAKE_BET);

    env.cmd(&bet)
        .arg("--verbose")
        .assert()
        .success()
        .stderr(contains("DEBUG"));
}

#[test]
fn log_directory_receives_a_copy() {
    let env = Env::new();
    let bet = env.tool(FAKE_BET);
    let logs = env.tmp.path().join("logs");

    env.cmd(&bet)
        .env("SKULLSTRIP_LOG_DIR", &logs)
        .assert()
        .success();

    let text = std::fs::read_to_string(logs.join("skullstrip.log")).unwrap();
    assert!(text.contains("processing completed successfully"));
}

#[test]
fn config_file_can_disable_robust() {
    let env = Env::new();
    let bet = env.tool(FAKE_BET);
    let cfg = env.tmp.path().join("custom.toml");
    std::fs::write(&cfg, "[tool]\nrobust = false\n").unwrap();

    env.cmd(&bet).arg("--config").arg(&cfg).assert().success();

    let args = std::fs::read_to_string(env.tmp.path().join("fsl").join("last_args")).unwrap();
    assert!(!args.contains("-R"));
}

#[test]
fn help_lists_threshold_alias() {
    Command::cargo_bin("skullstrip")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--fractional-intensity"))
        .stdout(contains("--f"));
}
