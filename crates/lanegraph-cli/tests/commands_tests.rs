// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! End-to-end tests for the one-shot subcommands against real repositories


use lanegraph::CommitId;
use lanegraph_cli::commands;
use lanegraph_cli::config::{Command, Config};
use similar_asserts::assert_eq;
use test_utils::TestRepo;

fn run(config: &Config, command: Command) -> anyhow::Result<String> {
    let mut out = Vec::new();
    commands::run(config, &command, &mut out)?;
    Ok(String::from_utf8(out).expect("utf-8 output"))
}

fn short(oid: git2::Oid) -> String {
    CommitId::from(oid.to_string()).short().to_string()
}

#[test]
fn test_layout_json_for_branched_repository() {
    let mut repo = TestRepo::new();
    let base = repo.commit_on_head("a.txt", "base\n", "Base");
    let main = repo.commit_on_head("a.txt", "main\n", "Main work");
    let side = repo.commit(None, "b.txt", "side\n", "Side work", &[base]);
    repo.branch("side", side);

    let config = Config {
        no_reflog: true,
        ..repo.config()
    };
    let output = run(&config, Command::Layout { json: true }).expect("layout");
    let rows: serde_json::Value = serde_json::from_str(&output).expect("json");
    let rows = rows.as_array().expect("array");

    assert_eq!(rows.len(), 3);
    let find = |oid: git2::Oid| {
        rows.iter()
            .find(|r| r["id"] == oid.to_string().as_str())
            .expect("row present")
    };
    // Root is the oldest commit; the two tips sit on different lanes
    assert_eq!(find(base)["column"], 1);
    assert_eq!(find(base)["row"], 0);
    assert_ne!(find(main)["row"], find(side)["row"]);
    assert_eq!(find(side)["refs"][0], "side");
    assert_eq!(find(main)["subject"], "Main work");
}

#[test]
fn test_layout_text_lists_every_commit() {
    let mut repo = TestRepo::new();
    let a = repo.commit_on_head("a.txt", "1\n", "First");
    let b = repo.commit_on_head("a.txt", "2\n", "Second");

    let output = run(&repo.config(), Command::Layout { json: false }).expect("layout");
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with(&short(b)));
    assert!(lines[0].contains("Second"));
    assert!(lines[1].starts_with(&short(a)));
}

#[test]
fn test_layout_of_empty_repository_is_empty() {
    let repo = TestRepo::new();
    let output = run(&repo.config(), Command::Layout { json: true }).expect("layout");
    assert_eq!(output.trim(), "[]");
}

#[test]
fn test_refs_marks_current_branch() {
    let mut repo = TestRepo::new();
    let a = repo.commit_on_head("a.txt", "1\n", "First");
    repo.branch("topic", a);

    let output = run(&repo.config(), Command::Refs).expect("refs");
    let current: Vec<&str> = output.lines().filter(|l| l.starts_with('*')).collect();
    assert_eq!(current.len(), 1);
    assert!(!current[0].contains("topic"));
    assert!(output.contains("refs/heads/topic"));
    assert!(output.contains(&short(a)));
}

#[test]
fn test_duplicates_finds_cherry_pick() {
    let mut repo = TestRepo::new();
    let base = repo.commit_on_head("a.txt", "base\n", "Base");
    let fix = repo.commit_on_head("fix.txt", "fixed\n", "Fix");
    repo.branch("side", base);
    let side = repo.commit(Some("refs/heads/side"), "b.txt", "side\n", "Side", &[base]);
    let picked = repo.commit(
        Some("refs/heads/side"),
        "fix.txt",
        "fixed\n",
        "Fix (picked)",
        &[side],
    );

    let output = run(
        &repo.config(),
        Command::Duplicates {
            commit: fix.to_string(),
        },
    )
    .expect("duplicates");
    assert_eq!(output, format!("{} Fix (picked)\n", short(picked)));
}

#[test]
fn test_duplicates_unknown_commit_is_error() {
    let mut repo = TestRepo::new();
    repo.commit_on_head("a.txt", "1\n", "First");

    let result = run(
        &repo.config(),
        Command::Duplicates {
            commit: "zzzz".to_string(),
        },
    );
    assert!(result.is_err());
}

#[test]
fn test_checkout_then_layout_reflects_head() {
    let mut repo = TestRepo::new();
    let a = repo.commit_on_head("a.txt", "1\n", "First");
    repo.commit_on_head("a.txt", "2\n", "Second");
    repo.branch("old", a);

    let output = run(
        &repo.config(),
        Command::Checkout {
            reference: "old".to_string(),
        },
    )
    .expect("checkout");
    assert_eq!(output, format!("HEAD is now at {} (old)\n", short(a)));

    let refs = run(&repo.config(), Command::Refs).expect("refs");
    let current = refs.lines().find(|l| l.starts_with('*')).expect("current");
    assert!(current.ends_with("refs/heads/old"));
}

#[test]
fn test_watch_is_not_a_one_shot_command() {
    let mut repo = TestRepo::new();
    repo.commit_on_head("a.txt", "1\n", "First");
    assert!(run(&repo.config(), Command::Watch { interval_ms: 10 }).is_err());
}

#[test]
fn test_missing_repository_is_error() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let config = Config {
        repo: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    assert!(run(&config, Command::Refs).is_err());
}
