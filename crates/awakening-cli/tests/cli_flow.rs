use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const GUIDE1: &str = "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG";
const USER1: &str = "ST2JHG361ZXG51QTKY2NQCVBPPRRE2KZB1HR05NNC";
const USER2: &str = "ST3AM1A56AK2C1XAFJ4115ZSV26EB49BVQ10MGCS0";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_awakening"))
}

struct Env {
    dir: tempfile::TempDir,
}

impl Env {
    fn new() -> Self {
        let env = Self {
            dir: tempfile::tempdir().expect("temp dir"),
        };
        let output = env.run(None, &["init"]);
        assert!(output.status.success(), "init failed: {:?}", output);
        env
    }

    fn store(&self) -> PathBuf {
        self.dir.path().join("protocol.db")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(bin());
        cmd.env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("XDG_DATA_HOME", self.dir.path().join("data"))
            .env("AWAKENING_STORE", self.store())
            .env_remove("AWAKENING_CALLER")
            .env_remove("AWAKENING_CONFIG")
            .env_remove("AWAKENING_LOG");
        cmd
    }

    fn run(&self, caller: Option<&str>, args: &[&str]) -> Output {
        let mut cmd = self.command();
        if let Some(caller) = caller {
            cmd.env("AWAKENING_CALLER", caller);
        }
        cmd.args(args).output().expect("run awakening")
    }

    fn json(&self, caller: Option<&str>, args: &[&str]) -> (i32, serde_json::Value) {
        let mut full = vec!["--json"];
        full.extend_from_slice(args);
        let output = self.run(caller, &full);
        let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
        let value = serde_json::from_str(stdout.trim()).unwrap_or_else(|e| {
            panic!(
                "invalid JSON {:?} ({}), stderr: {}",
                stdout,
                e,
                String::from_utf8_lossy(&output.stderr)
            )
        });
        (output.status.code().expect("exit code"), value)
    }
}

fn create_mindful(env: &Env, height: &str) -> (i32, serde_json::Value) {
    env.json(
        Some(GUIDE1),
        &[
            "--height",
            height,
            "program",
            "create",
            "Mindful Awakening",
            "--description",
            "21-day consciousness expansion program",
            "--duration-days",
            "21",
            "--difficulty",
            "3",
        ],
    )
}

#[test]
fn test_init_creates_store() {
    let env = Env::new();
    assert!(env.store().exists());

    let output = env.run(None, &["init"]);
    assert!(!output.status.success(), "second init must fail");
}

#[test]
fn test_program_ids_increment() {
    let env = Env::new();

    let (code, value) = create_mindful(&env, "1000");
    assert_eq!(code, 0);
    assert_eq!(value, serde_json::json!({"type": "ok", "value": 1}));

    let (code, value) = env.json(
        Some(USER2),
        &[
            "program",
            "create",
            "Breathwork",
            "--duration-days",
            "7",
            "--difficulty",
            "5",
        ],
    );
    assert_eq!(code, 0);
    assert_eq!(value, serde_json::json!({"type": "ok", "value": 2}));
}

#[test]
fn test_enrollment_flow() {
    let env = Env::new();
    create_mindful(&env, "1000");

    let (code, value) = env.json(Some(USER1), &["--height", "1010", "enroll", "1"]);
    assert_eq!(code, 0);
    assert_eq!(value, serde_json::json!({"type": "ok", "value": true}));

    let (code, value) = env.json(Some(USER1), &["--height", "1011", "enroll", "1"]);
    assert_eq!(code, 1);
    assert_eq!(value, serde_json::json!({"type": "error", "value": 202}));

    let (code, value) = env.json(Some(USER1), &["enroll", "999"]);
    assert_eq!(code, 1);
    assert_eq!(value, serde_json::json!({"type": "error", "value": 201}));

    let (_, value) = env.json(Some(USER1), &["--height", "1200", "progress", "1", "50"]);
    assert_eq!(value, serde_json::json!({"type": "ok", "value": true}));
    let (_, record) = env.json(Some(USER1), &["enrollment", "show", "1"]);
    assert_eq!(record["progress-percentage"], 50);
    assert_eq!(record["completed"], false);
    assert_eq!(record["completion-date"], 0);

    let (_, value) = env.json(Some(USER1), &["--height", "1500", "progress", "1", "100"]);
    assert_eq!(value, serde_json::json!({"type": "ok", "value": true}));
    let (_, record) = env.json(None, &["enrollment", "show", "1", "--user", USER1]);
    assert_eq!(record["completed"], true);
    assert_eq!(record["completion-date"], 1500);
    assert_eq!(record["enrolled-at"], 1010);

    let (code, value) = env.json(Some(USER2), &["progress", "1", "50"]);
    assert_eq!(code, 1);
    assert_eq!(value, serde_json::json!({"type": "error", "value": 203}));
}

#[test]
fn test_inactive_program_rejects_enrollment() {
    let env = Env::new();
    create_mindful(&env, "1000");

    let (code, value) = env.json(Some(USER1), &["program", "deactivate", "1"]);
    assert_eq!(code, 1);
    assert_eq!(value, serde_json::json!({"type": "error", "value": 200}));

    let (code, value) = env.json(Some(GUIDE1), &["program", "deactivate", "1"]);
    assert_eq!(code, 0);
    assert_eq!(value, serde_json::json!({"type": "ok", "value": true}));

    let (code, value) = env.json(Some(USER2), &["enroll", "1"]);
    assert_eq!(code, 1);
    assert_eq!(value, serde_json::json!({"type": "error", "value": 204}));
}

#[test]
fn test_reads_return_none() {
    let env = Env::new();

    let (code, value) = env.json(None, &["program", "show", "999"]);
    assert_eq!(code, 0);
    assert!(value.is_null());

    let output = env.run(Some(USER1), &["--format", "plain", "enrollment", "show", "3"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "none");
}

#[test]
fn test_program_show_and_list() {
    let env = Env::new();
    create_mindful(&env, "1000");

    let (_, program) = env.json(None, &["program", "show", "1"]);
    assert_eq!(program["title"], "Mindful Awakening");
    assert_eq!(program["duration-days"], 21);
    assert_eq!(program["difficulty-level"], 3);
    assert_eq!(program["active"], true);
    assert_eq!(program["created-at"], 1000);
    assert_eq!(program["guide-id"], GUIDE1);

    let (_, list) = env.json(None, &["program", "list", "--guide", GUIDE1]);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    let (_, list) = env.json(None, &["program", "list", "--inactive"]);
    assert_eq!(list.as_array().map(Vec::len), Some(0));
}

#[test]
fn test_stats_and_check() {
    let env = Env::new();
    create_mindful(&env, "1000");
    env.json(Some(USER1), &["--height", "1001", "enroll", "1"]);
    env.json(Some(USER2), &["--height", "1002", "enroll", "1"]);
    env.json(Some(USER2), &["--height", "1003", "progress", "1", "100"]);

    let (_, stats) = env.json(None, &["program", "stats", "1"]);
    assert_eq!(stats, serde_json::json!({"enrolled": 2, "completed": 1}));

    let (_, list) = env.json(None, &["enrollment", "list", "--completed"]);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    assert_eq!(list[0]["user-id"], USER2);

    let (code, report) = env.json(None, &["check"]);
    assert_eq!(code, 0);
    assert_eq!(report["status"], "ok");
    assert_eq!(report["programs"], 1);
    assert_eq!(report["enrollments"], 2);
}

#[test]
fn test_invalid_program_rejected() {
    let env = Env::new();
    let (code, value) = env.json(
        Some(GUIDE1),
        &["program", "create", "Stillness", "--duration-days", "0", "--difficulty", "3"],
    );
    assert_eq!(code, 1);
    assert_eq!(value, serde_json::json!({"type": "error", "value": 206}));
}

#[test]
fn test_bad_format_writes_nothing() {
    let env = Env::new();
    let output = env.run(
        Some(GUIDE1),
        &[
            "--format",
            "yaml",
            "program",
            "create",
            "Stillness",
            "--duration-days",
            "7",
            "--difficulty",
            "1",
        ],
    );
    assert_eq!(output.status.code(), Some(2));
    let (_, program) = env.json(None, &["program", "show", "1"]);
    assert!(program.is_null());

    create_mindful(&env, "1000");
    let output = env.run(Some(USER1), &["--format", "yaml", "enroll", "1"]);
    assert_eq!(output.status.code(), Some(2));
    let (_, record) = env.json(Some(USER1), &["enrollment", "show", "1"]);
    assert!(record.is_null());

    let (code, value) = env.json(Some(USER1), &["--height", "1010", "enroll", "1"]);
    assert_eq!(code, 0);
    assert_eq!(value, serde_json::json!({"type": "ok", "value": true}));
}

#[test]
fn test_progress_below_enrollment_height_rejected() {
    let env = Env::new();
    create_mindful(&env, "900");
    env.json(Some(USER1), &["--height", "1000", "enroll", "1"]);

    let (code, value) = env.json(Some(USER1), &["--height", "500", "progress", "1", "100"]);
    assert_eq!(code, 1);
    assert_eq!(value, serde_json::json!({"type": "error", "value": 205}));

    let (code, _) = env.json(None, &["check"]);
    assert_eq!(code, 0);
}

#[test]
fn test_missing_caller_is_usage_error() {
    let env = Env::new();
    let output = env.run(None, &["enroll", "1"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No caller"));
}

#[test]
fn test_zero_height_is_usage_error() {
    let env = Env::new();
    let output = env.run(Some(USER1), &["--height", "0", "enroll", "1"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_store_is_usage_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = Command::new(bin())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env("AWAKENING_STORE", dir.path().join("absent.db"))
        .args(["program", "list"])
        .output()
        .expect("run awakening");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_caller_from_config_file() {
    let env = Env::new();
    let config_dir = env.dir.path().join("config").join("awakening");
    std::fs::create_dir_all(&config_dir).expect("config dir");
    write_config(&config_dir.join("config.toml"), &env.store(), GUIDE1);

    let output = env
        .command()
        .env_remove("AWAKENING_STORE")
        .args([
            "--json",
            "program",
            "create",
            "Stillness",
            "--duration-days",
            "7",
            "--difficulty",
            "1",
        ])
        .output()
        .expect("run awakening");
    assert!(output.status.success(), "{:?}", output);

    let (_, program) = env.json(None, &["program", "show", "1"]);
    assert_eq!(program["guide-id"], GUIDE1);
}

fn write_config(path: &Path, store: &Path, caller: &str) {
    let contents = format!(
        "[store]\npath = \"{}\"\n\n[identity]\ncaller = \"{}\"\n",
        store.to_string_lossy(),
        caller
    );
    std::fs::write(path, contents).expect("write config");
}
