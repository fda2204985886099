use assert_cmd::Command;
use mockito::{Mock, Server, ServerGuard};
use tempfile::tempdir;
use zig_setup::Platform;

/// A mock mirror. The mocks are dropped with it.
struct Mirror {
    server: ServerGuard,
    _mocks: Vec<Mock>,
}

impl Mirror {
    fn url(&self) -> String {
        format!("{}/zig", self.server.url())
    }
}

fn tar_xz(dir: &str, version: &str) -> Vec<u8> {
    let script = format!("#!/bin/sh\necho {version}\n");
    let encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
    let mut builder = tar::Builder::new(encoder);
    let mut header = tar::Header::new_gnu();
    header.set_size(script.len() as u64);
    header.set_mode(0o755);
    header.set_cksum();
    builder
        .append_data(&mut header, format!("{dir}/zig"), script.as_bytes())
        .unwrap();
    builder.into_inner().unwrap().finish().unwrap()
}

/// Mirror serving an index with `0.14.1` listed before `master` and `0.13.0`,
/// and a matching archive for the host platform of each release.
fn mock_mirror() -> Option<Mirror> {
    let key = Platform::current().ok()?.key();
    let mut server = Server::new();
    let mut mocks = Vec::new();
    let mut entries = Vec::new();
    for version in ["0.14.1", "master", "0.13.0"] {
        let dir = format!("zig-{key}-{version}");
        let archive = format!("{dir}.tar.xz");
        entries.push(format!(
            r#""{version}": {{"date": "2025-01-01", "{key}": {{"tarball": "https://ziglang.org/download/{version}/{archive}?src=index", "size": "1"}}}}"#
        ));
        mocks.push(
            server
                .mock("GET", format!("/zig/{archive}").as_str())
                .with_status(200)
                .with_body(tar_xz(&dir, version))
                .create(),
        );
    }
    mocks.push(
        server
            .mock("GET", "/zig/index.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!("{{{}}}", entries.join(",")))
            .create(),
    );
    Some(Mirror { server, _mocks: mocks })
}

#[cfg(unix)]
#[test]
fn test_install_latest_prints_export_line() {
    let Some(mock) = mock_mirror() else { return };
    let mirror = mock.url();
    let dir = tempdir().unwrap();
    let root = dir.path().join("zig-home");

    let output = Command::cargo_bin("zig-setup").unwrap()
        .env("ZIG_HOME", &root)
        .args(["--mirror", "http://127.0.0.1:9/zig", "--mirror", mirror.as_str()])
        .assert()
        .success()
        .get_output()
        .clone();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        format!("export PATH=\"{}:$PATH\"\n", root.join("current").display())
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Zig 0.14.1"), "stderr: {stderr}");

    let key = Platform::current().unwrap().key();
    let target = std::fs::read_link(root.join("current")).unwrap();
    assert_eq!(target, root.join(format!("zig-{key}-0.14.1")));
}

#[cfg(unix)]
#[test]
fn test_install_explicit_version_then_switch() {
    let Some(mock) = mock_mirror() else { return };
    let mirror = mock.url();
    let dir = tempdir().unwrap();
    let root = dir.path();
    let key = Platform::current().unwrap().key();

    Command::cargo_bin("zig-setup").unwrap()
        .args(["0.13.0", "--root"])
        .arg(root)
        .args(["--mirror", mirror.as_str()])
        .assert()
        .success();
    assert_eq!(
        std::fs::read_link(root.join("current")).unwrap(),
        root.join(format!("zig-{key}-0.13.0"))
    );

    Command::cargo_bin("zig-setup").unwrap()
        .args(["latest", "--latest-by", "semver", "--root"])
        .arg(root)
        .args(["--mirror", mirror.as_str()])
        .assert()
        .success();
    assert_eq!(
        std::fs::read_link(root.join("current")).unwrap(),
        root.join(format!("zig-{key}-0.14.1"))
    );
    assert!(root.join(format!("zig-{key}-0.13.0")).join("zig").exists());
}

#[cfg(unix)]
#[test]
fn test_relative_root_links_absolute_path() {
    let Some(mock) = mock_mirror() else { return };
    let mirror = mock.url();
    let dir = tempdir().unwrap();

    let output = Command::cargo_bin("zig-setup").unwrap()
        .current_dir(dir.path())
        .env_remove("ZIG_HOME")
        .args(["--root", "zh", "--mirror", mirror.as_str()])
        .assert()
        .success()
        .get_output()
        .clone();

    let current = dir.path().join("zh").join("current");
    assert!(current.join("zig").exists());
    let target = std::fs::read_link(&current).unwrap();
    assert!(target.is_absolute(), "link target {}", target.display());
    assert!(target.ends_with(format!("zh/zig-{}-0.14.1", Platform::current().unwrap().key())));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("export PATH=\"/"), "stdout: {stdout}");
    assert!(stdout.ends_with("/zh/current:$PATH\"\n"), "stdout: {stdout}");
}

#[test]
fn test_unknown_version_fails_without_stdout() {
    let Some(mock) = mock_mirror() else { return };
    let mirror = mock.url();
    let dir = tempdir().unwrap();

    let output = Command::cargo_bin("zig-setup").unwrap()
        .env("ZIG_HOME", dir.path())
        .args(["0.0.1", "--mirror", mirror.as_str()])
        .assert()
        .failure()
        .get_output()
        .clone();

    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown version '0.0.1'"));
}

#[test]
fn test_unreachable_mirrors_fail() {
    if Platform::current().is_err() {
        return;
    }
    let dir = tempdir().unwrap();
    let root = dir.path().join("zig-home");

    let output = Command::cargo_bin("zig-setup").unwrap()
        .env("ZIG_HOME", &root)
        .args(["--mirror", "http://127.0.0.1:9/zig"])
        .assert()
        .failure()
        .get_output()
        .clone();

    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Trying http://127.0.0.1:9/zig/index.json"), "stderr: {stderr}");
    assert!(!root.exists());
}
