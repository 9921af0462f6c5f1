use assert_cmd::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn init_git_repo(dir: &Path) {
    // init and basic identity
    assert!(Command::new("git")
        .args(["init"])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
    assert!(Command::new("git")
        .args(["config", "core.autocrlf", "false"])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
    assert!(Command::new("git")
        .args(["config", "user.email", "you@example.com"])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
    assert!(Command::new("git")
        .args(["config", "user.name", "Your Name"])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn commit_file(dir: &Path, name: &str, content: &str) {
    commit_file_at(dir, name, content, None);
}

fn commit_file_at(dir: &Path, name: &str, content: &str, date: Option<&str>) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.sync_all().unwrap();
    assert!(Command::new("git")
        .args(["add", "."])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
    let mut commit = Command::new("git");
    commit
        .args(["commit", "-m", &format!("add {name}")])
        .current_dir(dir);
    if let Some(date) = date {
        commit.env("GIT_AUTHOR_DATE", date);
        commit.env("GIT_COMMITTER_DATE", date);
    }
    assert!(commit.status().unwrap().success());
}

#[test]
fn csv_export_lists_local_commits() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_file(dir.path(), "src/a.rs", "fn a(){}\n");
    commit_file(dir.path(), "src/b.rs", "fn b(){}\n");

    let out = dir.path().join("report.csv");
    let mut cmd = Command::cargo_bin("gittrail").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["--months", "1"])
        .arg(&out);
    cmd.assert().success();

    let contents = fs::read_to_string(&out).unwrap();
    let header = contents.lines().next().unwrap();
    assert_eq!(
        header,
        "source,action_type,user_name,user_email,timestamp,ref,commit_sha,message,url"
    );
    assert!(contents.contains("local_commit"));
    assert!(contents.contains("add src/a.rs"));
    // null-less cells and UTC timestamps
    assert!(!contents.contains("null"));
    assert!(contents.contains('Z'));
}

#[test]
fn html_report_is_self_contained() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_file(dir.path(), "lib.rs", "pub fn hi(){}\n");

    let out = dir.path().join("report.html");
    let mut cmd = Command::cargo_bin("gittrail").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["--months", "1"])
        .arg(&out);
    cmd.assert().success();

    let contents = fs::read_to_string(&out).unwrap();
    assert!(contents.contains("<table id=\"events\">"));
    assert!(contents.contains("searchBox"));
    assert!(contents.contains("add lib.rs"));
    // no external assets
    assert!(!contents.contains("src=\"http"));
    assert!(!contents.contains("href=\"http"));
}

#[test]
fn format_flag_overrides_extension() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n");

    let out = dir.path().join("report.dat");
    let mut cmd = Command::cargo_bin("gittrail").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["--months", "1", "--format", "csv"])
        .arg(&out);
    cmd.assert().success();

    let contents = fs::read_to_string(&out).unwrap();
    assert!(contents.starts_with("source,action_type"));
}

#[test]
fn unknown_extension_without_format_fails() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n");

    let out = dir.path().join("report.dat");
    let mut cmd = Command::cargo_bin("gittrail").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["--months", "1"])
        .arg(&out);
    cmd.assert().failure();
    assert!(!out.exists());
}

#[test]
fn missing_window_fails() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n");

    let mut cmd = Command::cargo_bin("gittrail").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .arg(dir.path().join("report.csv"));
    cmd.assert().failure();
}

#[test]
fn invalid_repo_is_fatal() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    // no git init: the local source is mandatory, so this must abort

    let out = dir.path().join("report.csv");
    let mut cmd = Command::cargo_bin("gittrail").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["--months", "1"])
        .arg(&out);
    cmd.assert().failure();
    assert!(!out.exists());
}

#[test]
fn old_commits_outside_window_are_excluded() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_file_at(
        dir.path(),
        "ancient.txt",
        "old\n",
        Some("2020-01-01T10:00:00+0000"),
    );
    commit_file(dir.path(), "fresh.txt", "new\n");

    let out = dir.path().join("report.csv");
    let mut cmd = Command::cargo_bin("gittrail").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["--months", "1"])
        .arg(&out);
    cmd.assert().success();

    let contents = fs::read_to_string(&out).unwrap();
    assert!(contents.contains("add fresh.txt"));
    assert!(!contents.contains("ancient"));
}

#[test]
fn unreachable_remote_falls_back_to_local() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n");

    let out = dir.path().join("report.csv");
    let mut cmd = Command::cargo_bin("gittrail").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args([
            "--months",
            "1",
            "--gitlab-url",
            "http://127.0.0.1:1",
            "--token",
            "not-a-token",
            "--project",
            "1",
        ])
        .arg(&out);
    // remote failure degrades to local-only, it never aborts the run
    cmd.assert().success();

    let contents = fs::read_to_string(&out).unwrap();
    assert!(contents.contains("local_commit"));
    assert!(!contents.contains("gitlab_commit"));
}
