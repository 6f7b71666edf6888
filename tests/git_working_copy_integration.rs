mod common;

use common::FakeConduit;
use phabstack::application::stack::{TargetRef, apply_stack, build_stack, resolve_target};
use phabstack::domain::BaseFallback;
use phabstack::infra::vcs::{GitWorkingCopy, WorkingCopy};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn git(path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

fn commit(path: &Path, message: &str) -> String {
    git(path, &["add", "."]);
    git(path, &["commit", "-q", "-m", message]);
    git(path, &["rev-parse", "HEAD"]).trim().to_string()
}

/// Repository with a base commit and two stacked commits on top of it.
/// Returns the base hash and the patches between consecutive commits.
fn init_stacked_repo(path: &Path) -> Option<(String, String, String)> {
    let status = Command::new("git")
        .args(["init", "-q"])
        .current_dir(path)
        .status()
        .ok()?;
    if !status.success() {
        return None; // Skip if git is not installed or failed
    }
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);

    fs::write(path.join("file.txt"), "line one\n").unwrap();
    let base = commit(path, "base");

    fs::write(path.join("file.txt"), "line one\nline two\n").unwrap();
    let parent = commit(path, "parent change");

    fs::write(path.join("file.txt"), "line one\nline two\nline three\n").unwrap();
    fs::write(path.join("new.txt"), "added by target\n").unwrap();
    let target = commit(path, "target change");

    let parent_patch = git(path, &["diff", &base, &parent]);
    let target_patch = git(path, &["diff", &parent, &target]);
    Some((base, parent_patch, target_patch))
}

#[test]
fn test_stack_round_trip_on_git_checkout() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let repo_path = temp_dir.path();
    let Some((base, parent_patch, target_patch)) = init_stacked_repo(repo_path) else {
        return;
    };

    let conduit = FakeConduit::default()
        .parent("PHID-DREV-target", "PHID-DREV-parent")
        .diff(4, "PHID-DIFF-parent", "PHID-DREV-parent", Some(base.as_str()), &parent_patch)
        .diff(10, "PHID-DIFF-target", "PHID-DREV-target", None, &target_patch);
    let working_copy = GitWorkingCopy::open(repo_path).expect("open working copy");

    // Leave local noise behind; the clean checkout must discard it.
    fs::write(repo_path.join("file.txt"), "local edit\n").unwrap();

    let target = resolve_target(&conduit, &TargetRef::DiffId(10)).unwrap();
    let stack = build_stack(&conduit, &working_copy, &target, "HEAD").unwrap();

    assert_eq!(stack.base, base);
    assert!(stack.base_fallback.is_none());
    assert_eq!(stack.working_copy.node, base);
    assert_eq!(stack.working_copy.summary, "base");
    assert_eq!(
        fs::read_to_string(repo_path.join("file.txt")).unwrap(),
        "line one\n"
    );

    apply_stack(&working_copy, &stack).expect("apply stack");

    assert_eq!(
        fs::read_to_string(repo_path.join("file.txt")).unwrap(),
        "line one\nline two\nline three\n"
    );
    assert_eq!(
        fs::read_to_string(repo_path.join("new.txt")).unwrap(),
        "added by target\n"
    );
}

#[test]
fn test_unknown_base_falls_back_to_default_revision() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let repo_path = temp_dir.path();
    let Some((base, parent_patch, _)) = init_stacked_repo(repo_path) else {
        return;
    };

    let missing = "0000000000000000000000000000000000000001";
    let conduit = FakeConduit::default().diff(
        4,
        "PHID-DIFF-parent",
        "PHID-DREV-parent",
        Some(missing),
        &parent_patch,
    );
    let working_copy = GitWorkingCopy::open(repo_path).expect("open working copy");
    assert!(!working_copy.is_revision_available(missing));
    assert!(working_copy.is_revision_available(&base));

    let target = resolve_target(&conduit, &TargetRef::DiffId(4)).unwrap();
    let stack = build_stack(&conduit, &working_copy, &target, &base).unwrap();

    assert_eq!(stack.base, base);
    assert_eq!(
        stack.base_fallback,
        Some(BaseFallback::Unavailable {
            declared: missing.into()
        })
    );
}

#[test]
fn test_checkout_of_unknown_default_fails() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let repo_path = temp_dir.path();
    if init_stacked_repo(repo_path).is_none() {
        return;
    }

    let conduit = FakeConduit::default().diff(1, "PHID-DIFF-x", "PHID-DREV-x", None, "");
    let working_copy = GitWorkingCopy::open(repo_path).expect("open working copy");
    let target = resolve_target(&conduit, &TargetRef::DiffId(1)).unwrap();

    let err = build_stack(&conduit, &working_copy, &target, "no-such-branch").unwrap_err();
    assert_eq!(err.to_string(), "Failed to update to revision no-such-branch");
}
