use assert_cmd::Command;

fn unfail() -> Command {
    let mut cmd = Command::cargo_bin("unfail").unwrap();
    cmd.env("UNFAIL_CONFIG_DIR", std::env::temp_dir().join("unfail-cli-no-config"))
        .env("UNFAIL_ENV", "local")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let output = unfail().arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    for command in ["serve", "solve", "config"] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
}

#[test]
fn config_redacts_credentials() {
    let output = unfail()
        .arg("config")
        .env("GOOGLE_API_KEY", "very-secret-google-key")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("very-secret-google-key"));

    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["gemini"]["api_key"], "<redacted>");
    assert_eq!(value["news"]["page_size"], 5);
}

#[test]
fn solve_with_blank_input_fails_without_network() {
    let output = unfail().args(["solve", "   "]).output().unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("User input is required"));
}

#[test]
fn unknown_environment_is_an_error() {
    unfail().env("UNFAIL_ENV", "moon").arg("config").assert().failure();
}
