use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_balances"))
}

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(dir.path().join("config")).expect("config dir");
        std::fs::create_dir_all(dir.path().join("data")).expect("data dir");
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(bin())
            .args(args)
            .env("HOME", self.root())
            .env("XDG_CONFIG_HOME", self.root().join("config"))
            .env("XDG_DATA_HOME", self.root().join("data"))
            .env_remove("BALANCES_DATABASE")
            .env_remove("BALANCES_CONFIG")
            .env("BALANCES_LOG", "off")
            .stdin(Stdio::null())
            .output()
            .expect("run balances")
    }

    fn json(&self, args: &[&str]) -> Value {
        let mut full = vec!["--json"];
        full.extend_from_slice(args);
        let output = self.run(&full);
        assert!(
            output.status.success(),
            "balances {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("json output")
    }

    fn init(&self) -> Value {
        self.json(&["init"])
    }
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id").to_string()
}

fn create_house(env: &Env) -> Value {
    env.json(&[
        "property",
        "create",
        "--name",
        "Lake house",
        "--address",
        "1 Shore Rd",
        "--total-area",
        "1200",
        "--type",
        "house",
        "--title-holder",
        "Sam",
        "--purchase-date",
        "2022-06-01",
        "--initial-value",
        "68000",
        "--current-value",
        "50000",
        "--current-date",
        "2024-06-01",
    ])
}

fn create_account(env: &Env) -> Value {
    env.json(&[
        "account",
        "create",
        "--name",
        "Checking",
        "--bank",
        "First Bank",
        "--holder",
        "Sam",
        "--number",
        "0001",
        "--balance",
        "1200",
        "--date",
        "2024-01-01",
    ])
}

#[test]
fn test_init_writes_config_and_database() {
    let env = Env::new();
    let out = env.init();
    assert_eq!(out["schema_version"], 1);

    let config = env.root().join("config").join("balances").join("config.toml");
    let text = std::fs::read_to_string(&config).expect("config written");
    assert!(text.contains("[database]"));
    assert!(text.contains("[user]"));
    assert!(env.root().join("data").join("balances").join("balances.db").exists());

    let again = env.run(&["init"]);
    assert_eq!(again.status.code(), Some(6));
    assert!(env.run(&["init", "--force"]).status.success());
}

#[test]
fn test_property_valuation_flow() {
    let env = Env::new();
    env.init();

    let property = create_house(&env);
    let id = id_of(&property);
    assert_eq!(property["values"].as_array().map(Vec::len), Some(2));
    assert_eq!(property["current_value"], 50000.0);

    let added = env.json(&[
        "value", "add", "--kind", "property", &id, "--amount", "45000", "--date", "2024-06-02",
    ]);
    let shown = env.json(&["property", "show", &id]);
    assert_eq!(shown["current_value"], 45000.0);

    env.json(&["--yes", "value", "delete", "--kind", "property", &id_of(&added)]);
    let shown = env.json(&["property", "show", &id, "--values"]);
    assert_eq!(shown["current_value"], 50000.0);
    assert_eq!(shown["values"].as_array().map(Vec::len), Some(2));

    let listed = env.json(&["value", "list", "--kind", "property", &id]);
    assert_eq!(listed["page_info"]["total_count"], 2);
    let listed = env.json(&["value", "list", "--kind", "property", &id, "--include-deleted"]);
    assert_eq!(listed["page_info"]["total_count"], 3);
}

#[test]
fn test_only_value_cannot_be_deleted() {
    let env = Env::new();
    env.init();
    let account = create_account(&env);
    let balance = account["balances"][0]["id"].as_str().expect("balance id").to_string();

    let output = env.run(&["--json", "--yes", "value", "delete", "--kind", "account", &balance]);
    assert_eq!(output.status.code(), Some(6));
    let failure: Value = serde_json::from_slice(&output.stderr).expect("json failure");
    assert_eq!(failure["error"]["code"], "OperationNotPermitted");
}

#[test]
fn test_account_update_and_list() {
    let env = Env::new();
    env.init();
    let id = id_of(&create_account(&env));

    let updated = env.json(&["account", "update", &id, "--name", "Bills", "--status", "inactive"]);
    assert_eq!(updated["account_name"], "Bills");
    assert_eq!(updated["last_balance"], 1200.0);

    let output = env.run(&["account", "update", &id, "--balance", "5"]);
    assert_eq!(output.status.code(), Some(4));

    let listed = env.json(&["account", "list", "--status", "inactive"]);
    assert_eq!(listed["items"].as_array().map(Vec::len), Some(1));
    let listed = env.json(&["account", "list", "--keyword", "nothing-like-this"]);
    assert_eq!(listed["page_info"]["total_count"], 0);

    // Inactive accounts take no new balances.
    let output = env.run(&["value", "add", "--kind", "account", &id, "--amount", "1"]);
    assert_eq!(output.status.code(), Some(6));
}

#[test]
fn test_delete_requires_confirmation() {
    let env = Env::new();
    env.init();
    let id = id_of(&create_account(&env));

    let output = env.run(&["account", "delete", &id]);
    assert_eq!(output.status.code(), Some(4));

    let deleted = env.json(&["--yes", "account", "delete", &id]);
    assert!(deleted["deleted"].is_string());
    let listed = env.json(&["account", "list"]);
    assert_eq!(listed["page_info"]["total_count"], 0);
}

#[test]
fn test_missing_records_exit_not_found() {
    let env = Env::new();
    env.init();
    let output = env.run(&["vehicle", "show", "0190a0b4-0000-7000-8000-000000000000"]);
    assert_eq!(output.status.code(), Some(3));

    let output = env.run(&["vehicle", "show", "not-a-uuid"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_commands_need_init() {
    let env = Env::new();
    let output = env.run(&["account", "list"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("balances init"));
}

#[test]
fn test_completions() {
    let env = Env::new();
    let output = env.run(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("balances"));
}
