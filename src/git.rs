use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::PathBuf;
use std::process::Command as GitCommand;

/// Run a git command and capture stdout as String.
pub fn git_output(args: &[&str]) -> Result<String> {
    let output = GitCommand::new("git")
        .args(args)
        .output()
        .with_context(|| format!("failed to run git {:?}", args))?;

    if !output.status.success() {
        return Err(anyhow!(
            "git {:?} exited with status {:?}: {}",
            args,
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Get the path to the Git directory (e.g. .git)
pub fn git_dir() -> Result<PathBuf> {
    let dir = git_output(&["rev-parse", "--git-dir"])?.trim().to_string();
    Ok(PathBuf::from(dir))
}

/// Write the PR text into .git/PR_EDITMSG, title first, for `gh pr create -F`.
pub fn write_pr_editmsg(title: &str, description: &str) -> Result<PathBuf> {
    let path = git_dir()?.join("PR_EDITMSG");
    let contents = format!("{}\n\n{}\n", title.trim(), description.trim_end());
    fs::write(&path, contents)
        .with_context(|| format!("failed to write PR message to {:?}", path))?;
    Ok(path)
}

/// Get the current branch name.
pub fn current_branch() -> Result<String> {
    let name = git_output(&["rev-parse", "--abbrev-ref", "HEAD"])?
        .trim()
        .to_string();
    Ok(name)
}

/// The remote's default branch as a ref git can resolve (e.g. `origin/main`).
pub fn default_branch() -> Option<String> {
    git_output(&["symbolic-ref", "--short", "refs/remotes/origin/HEAD"])
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Commit subjects between base..head, oldest first.
pub fn commit_subjects(base: &str, head: &str) -> Result<Vec<String>> {
    let range = format!("{base}..{head}");
    let log_output = git_output(&["log", "--reverse", "--pretty=format:%s", &range])?;
    Ok(parse_subjects(&log_output))
}

fn parse_subjects(log_output: &str) -> Vec<String> {
    log_output
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a git config value; unset keys are `None`.
pub fn config_value(key: &str) -> Option<String> {
    git_output(&["config", "--get", key])
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// "owner/repo" of the `origin` remote, when it lives on GitHub.
pub fn detect_repo_id() -> Option<String> {
    let url = config_value("remote.origin.url")?;
    github_repo_id(&url)
}

/// Accepts `https://github.com/owner/repo`, `ssh://git@github.com/owner/repo`
/// and `git@github.com:owner/repo`; any other host is `None`.
fn github_repo_id(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/').trim_end_matches(".git");

    let (host, path) = match trimmed.split_once("://") {
        Some((_, rest)) => rest.split_once('/')?,
        None => trimmed.split_once(':')?,
    };
    let host = host.rsplit('@').next().unwrap_or(host);
    let host = host.split(':').next().unwrap_or(host);
    if !host.eq_ignore_ascii_case("github.com") {
        return None;
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [owner, repo] => Some(format!("{owner}/{repo}")),
        _ => None,
    }
}
