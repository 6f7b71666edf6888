//! Git-backed working copy.
//!
//! Drives the `git` executable so the checkout behaves exactly like the
//! user's own tooling.

use crate::domain::WorkingCopyRevision;
use crate::infra::vcs::traits::WorkingCopy;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

#[derive(Debug, Clone)]
pub struct GitWorkingCopy {
    repo_path: PathBuf,
}

impl GitWorkingCopy {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    /// Open `path` and make sure it lives inside a git work tree.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let working_copy = Self::new(path);
        let output = working_copy
            .git(&["rev-parse", "--is-inside-work-tree"])
            .with_context(|| format!("inspect {}", working_copy.repo_path.display()))?;
        if !output.status.success() {
            anyhow::bail!(
                "{} is not a git working copy: {}",
                working_copy.repo_path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(working_copy)
    }

    fn command(&self) -> Command {
        let mut command = Command::new("git");
        command.arg("-C").arg(&self.repo_path);
        command
    }

    fn git(&self, args: &[&str]) -> Result<Output> {
        self.command()
            .args(args)
            .output()
            .with_context(|| format!("run `git {}`", args.join(" ")))
    }

    fn git_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.git(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("`git {}` failed: {}", args.join(" "), stderr.trim());
        }
        String::from_utf8(output.stdout).with_context(|| format!("decode `git {}` stdout", args[0]))
    }
}

impl WorkingCopy for GitWorkingCopy {
    fn checkout(&self, revision: &str, clean: bool) -> Result<()> {
        if clean {
            self.git_checked(&["checkout", "--force", "--detach", revision])?;
            self.git_checked(&["clean", "-fd"])?;
        } else {
            self.git_checked(&["checkout", "--detach", revision])?;
        }
        Ok(())
    }

    fn current_revision(&self) -> Result<WorkingCopyRevision> {
        let stdout = self.git_checked(&["log", "-1", "--format=%H%x00%s", "HEAD"])?;
        let line = stdout.trim_end_matches('\n');
        let (node, summary) = line.split_once('\0').unwrap_or((line, ""));
        Ok(WorkingCopyRevision {
            node: node.to_string(),
            summary: summary.to_string(),
        })
    }

    fn is_revision_available(&self, revision: &str) -> bool {
        let spec = format!("{revision}^{{commit}}");
        self.git(&["cat-file", "-e", &spec])
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn apply_patch(&self, patch: &str) -> Result<()> {
        let mut child = self
            .command()
            .args(["apply", "--index", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("spawn `git apply`")?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(patch.as_bytes())
                .context("write patch to git stdin")?;
        }

        let output = child.wait_with_output().context("run `git apply`")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("`git apply` failed: {}", stderr.trim());
        }
        Ok(())
    }
}
