use std::process::{Command, Output};

fn argus_demo() -> Command {
    Command::new(env!("CARGO_BIN_EXE_argus-demo"))
}

fn run(args: &[&str]) -> Output {
    argus_demo()
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run argus-demo")
}

#[test]
fn binds_all_argument_kinds() {
    let out = run(&["-d", "2024-05-01", "--Force", "app.toml", "a.txt", "b.txt"]);
    assert!(
        out.status.success(),
        "argus-demo failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("config file: app.toml"), "unexpected output:\n{stdout}");
    assert!(stdout.contains("date: 2024-05-01"), "unexpected output:\n{stdout}");
    assert!(stdout.contains("force: true"), "unexpected output:\n{stdout}");
    assert!(stdout.contains("targets: a.txt, b.txt"), "unexpected output:\n{stdout}");
}

#[test]
fn prints_usage_when_config_file_is_missing() {
    let out = run(&[]);
    assert_eq!(out.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.starts_with("Usage: argus-demo"),
        "unexpected usage output:\n{stdout}"
    );
    assert!(
        stdout.contains("{ConfigFile} {TargetFiles} [Date|d value] [Force|f] [Schema]"),
        "unexpected usage output:\n{stdout}"
    );
    assert!(stdout.contains("-f --force:"), "unexpected usage output:\n{stdout}");
}

#[test]
fn prints_usage_when_date_has_no_value() {
    let out = run(&["app.toml", "-d"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Usage:"));
}

#[test]
fn unparsable_date_falls_back_silently() {
    let out = run(&["app.toml", "--date", "someday"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("date: (none)"), "unexpected output:\n{stdout}");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("using default"), "missing fallback warning:\n{stderr}");
}

#[test]
fn schema_switch_prints_json() {
    let out = run(&["/Schema"]);
    assert!(out.status.success());
    let schema: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("schema output is not JSON");
    assert_eq!(schema["positionals"][0]["name"], "ConfigFile");
    assert_eq!(schema["positionals"][1]["is-params"], true);
    assert_eq!(schema["named"][0]["short-name"], "d");
    assert_eq!(schema["switches"].as_array().map(Vec::len), Some(2));
}
