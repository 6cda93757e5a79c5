//! End-to-end tests for the `plexctl` binary.
//!
//! Every test runs in an empty temp directory with the PLEX_* variables
//! cleared, so no stray `.env` or shell setting leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEYS: [&str; 5] = [
    "PLEX_TOKEN",
    "PLEX_BASE_URL",
    "PLEX_CONTAINER",
    "PLEX_RUNTIME",
    "PLEX_SCANNER_PATH",
];

fn plexctl(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("plexctl").unwrap();
    cmd.current_dir(dir.path()).env("NO_COLOR", "1");
    for k in KEYS {
        cmd.env_remove(k);
    }
    cmd
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let dir = TempDir::new().unwrap();
    plexctl(&dir)
        .arg("bogus")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("bogus"));
}

#[test]
fn unknown_subcommand_json_payload() {
    let dir = TempDir::new().unwrap();
    let out = plexctl(&dir)
        .args(["--json", "bogus"])
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["status"], "error");
    assert_eq!(v["kind"], "usage");
}

#[test]
fn missing_token_is_config_error_without_requests() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".env"),
        format!("PLEX_BASE_URL={}\n", server.uri()),
    )
    .unwrap();

    plexctl(&dir)
        .arg("sections")
        // a runtime that cannot exist: reaching it would be exit code 5
        .env("PLEX_RUNTIME", dir.path().join("no-such-runtime"))
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("PLEX_TOKEN"));

    plexctl(&dir)
        .arg("restart")
        .env("PLEX_RUNTIME", dir.path().join("no-such-runtime"))
        .assert()
        .code(3);

    let received = rt.block_on(server.received_requests()).unwrap_or_default();
    assert!(received.is_empty());
}

#[test]
fn explicit_env_file_must_exist() {
    let dir = TempDir::new().unwrap();
    plexctl(&dir)
        .args(["--env-file", "missing.env", "sections"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("missing.env"));
}

#[test]
fn sections_json_from_server() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/library/sections"))
            .and(query_param("X-Plex-Token", "tok"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"MediaContainer":{"Directory":[{"key":"1","title":"Movies","type":"movie"}]}}"#,
            ))
            .expect(1)
            .mount(&server),
    );
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("plex.env"),
        format!("PLEX_BASE_URL={}\nPLEX_TOKEN=\"tok\"\n", server.uri()),
    )
    .unwrap();

    let out = plexctl(&dir)
        .args(["--env-file", "plex.env", "sections", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v[0]["title"], "Movies");
}

#[test]
fn refresh_failure_masks_token() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/library/sections/7/refresh"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server),
    );
    let dir = TempDir::new().unwrap();

    plexctl(&dir)
        .args(["refresh", "--section", "7", "--force"])
        .env("PLEX_BASE_URL", server.uri())
        .env("PLEX_TOKEN", "hunter2")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("HTTP 404"))
        .stderr(predicate::str::contains("X-Plex-Token=****"))
        .stderr(predicate::str::contains("hunter2").not());
}

#[test]
fn unreachable_server_is_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let dir = TempDir::new().unwrap();
    plexctl(&dir)
        .args(["--json", "sections"])
        .env("PLEX_BASE_URL", format!("http://127.0.0.1:{port}"))
        .env("PLEX_TOKEN", "hunter2")
        .assert()
        .code(4)
        .stdout(predicate::str::contains("\"kind\": \"network\""))
        .stdout(predicate::str::contains("hunter2").not());
}

#[cfg(unix)]
mod runtime {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    /// Fake container runtime: records argv, fails when asked to.
    fn fake_runtime(dir: &TempDir, exit_for_logs: i32) -> (PathBuf, PathBuf) {
        let log = dir.path().join("calls.log");
        let script = dir.path().join("fake-docker");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\necho \"$@\" >> '{}'\nif [ \"$1\" = logs ]; then echo line-one; exit {}; fi\nexit 0\n",
                log.display(),
                exit_for_logs
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        (script, log)
    }

    #[test]
    fn logs_passes_count_and_container() {
        let dir = TempDir::new().unwrap();
        let (script, log) = fake_runtime(&dir, 0);
        plexctl(&dir)
            .args(["logs", "-n", "200"])
            .env("PLEX_TOKEN", "t")
            .env("PLEX_CONTAINER", "pms")
            .env("PLEX_RUNTIME", &script)
            .assert()
            .success()
            .stdout(predicate::str::contains("line-one"));
        let calls = std::fs::read_to_string(log).unwrap();
        assert_eq!(calls, "inspect pms\nlogs -n 200 pms\n");
    }

    #[test]
    fn logs_failure_exits_nonzero() {
        let dir = TempDir::new().unwrap();
        let (script, _) = fake_runtime(&dir, 3);
        plexctl(&dir)
            .args(["logs", "-n", "200"])
            .env("PLEX_TOKEN", "t")
            .env("PLEX_RUNTIME", &script)
            .assert()
            .code(5)
            .stderr(predicate::str::contains("exit code 3"));
    }

    #[test]
    fn logs_json_captures_output() {
        let dir = TempDir::new().unwrap();
        let (script, _) = fake_runtime(&dir, 0);
        let out = plexctl(&dir)
            .args(["--json", "logs", "-n", "5"])
            .env("PLEX_TOKEN", "t")
            .env("PLEX_RUNTIME", &script)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["lines"], serde_json::json!(["line-one"]));
        assert_eq!(v["container"], "plex");
    }

    #[test]
    fn restart_reports_container() {
        let dir = TempDir::new().unwrap();
        let (script, log) = fake_runtime(&dir, 0);
        plexctl(&dir)
            .arg("restart")
            .env("PLEX_TOKEN", "t")
            .env("PLEX_RUNTIME", &script)
            .assert()
            .success()
            .stdout(predicate::str::contains("Restarted container 'plex'"));
        let calls = std::fs::read_to_string(log).unwrap();
        assert!(calls.ends_with("restart plex\n"));
    }

    #[test]
    fn missing_runtime_is_command_error() {
        let dir = TempDir::new().unwrap();
        plexctl(&dir)
            .arg("restart")
            .env("PLEX_TOKEN", "t")
            .env("PLEX_RUNTIME", dir.path().join("no-such-runtime"))
            .assert()
            .code(5)
            .stderr(predicate::str::contains("not found in PATH"));
    }
}
