use assert_cmd::Command;
use predicates::prelude::*;

fn shelf(config_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("shelf").unwrap();
    cmd.env("SHELF_CONFIG_DIR", config_dir)
        .env_remove("SHELF_ENV")
        .env_remove("OPENAI_API_KEY");
    cmd
}

fn empty_config_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("shelf-cli-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn config_prints_settings_with_key_masked() {
    let dir = empty_config_dir("config");

    shelf(&dir)
        .arg("config")
        .env("SHELF_ASSIST__API_KEY", "sk-very-secret")
        .env("SHELF_SERVER__PORT", "9191")
        .assert()
        .success()
        .stdout(predicate::str::contains("9191"))
        .stdout(predicate::str::contains("***"))
        .stdout(predicate::str::contains("sk-very-secret").not());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn unknown_environment_fails() {
    let dir = empty_config_dir("env");

    shelf(&dir)
        .arg("config")
        .env("SHELF_ENV", "moon")
        .assert()
        .failure();

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("shelf")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("config"));
}
