use anyhow::Result;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

use crate::git;

/// Where commits come from and where the finished PR text goes.
pub trait PageCollaborator {
    fn fetch_commit_messages(&self) -> Result<Vec<String>>;

    fn fetch_username(&self) -> Result<Option<String>>;

    fn fill_form(&mut self, title: &str, description: &str) -> Result<()>;

    /// Where `fill_form` put the text, if it went anywhere outside the process.
    fn form_location(&self) -> Option<String> {
        None
    }
}

static COMPARE_PAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://github\.com/([\w-]+)/([\w-]+)/compare/([^?#]+)")
        .expect("compare page pattern is valid")
});

/// A parsed `https://github.com/<owner>/<repo>/compare/<base>...<head>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareUrl {
    pub owner: String,
    pub repo: String,
    /// `None` when the URL names only one ref (compared against the default branch).
    pub base: Option<String>,
    pub head: String,
}

impl CompareUrl {
    pub fn parse(url: &str) -> Option<Self> {
        let caps = COMPARE_PAGE.captures(url.trim())?;
        let refs = caps[3].trim_end_matches('/');

        let (base, head) = match refs.split_once("...").or_else(|| refs.split_once("..")) {
            Some((base, head)) => (Some(local_ref(base)), local_ref(head)),
            None => (None, local_ref(refs)),
        };
        if head.is_empty() || base.as_deref() == Some("") {
            return None;
        }

        Some(CompareUrl {
            owner: caps[1].to_string(),
            repo: caps[2].to_string(),
            base,
            head,
        })
    }
}

/// Cross-fork refs look like `owner:branch`; git only knows the branch.
fn local_ref(r: &str) -> String {
    r.rsplit(':').next().unwrap_or(r).to_string()
}

/// True when `url` is a GitHub pull-request comparison page.
pub fn is_compare_page(url: &str) -> bool {
    CompareUrl::parse(url).is_some()
}

/// Reads commits from the local repository for `base..head`.
pub struct GitPage {
    base: String,
    head: String,
    username: Option<String>,
    apply: bool,
    written: Option<PathBuf>,
}

impl GitPage {
    pub fn new(base: String, head: String, username: Option<String>, apply: bool) -> Self {
        GitPage {
            base,
            head,
            username,
            apply,
            written: None,
        }
    }
}

impl PageCollaborator for GitPage {
    fn fetch_commit_messages(&self) -> Result<Vec<String>> {
        log::debug!("Collecting commits in {}..{}", self.base, self.head);
        git::commit_subjects(&self.base, &self.head)
    }

    fn fetch_username(&self) -> Result<Option<String>> {
        if self.username.is_some() {
            return Ok(self.username.clone());
        }
        Ok(git::config_value("github.user").or_else(|| git::config_value("user.name")))
    }

    fn fill_form(&mut self, title: &str, description: &str) -> Result<()> {
        if self.apply {
            self.written = Some(git::write_pr_editmsg(title, description)?);
        }
        Ok(())
    }

    fn form_location(&self) -> Option<String> {
        self.written.as_ref().map(|p| p.display().to_string())
    }
}

/// Commits and author given directly on the command line.
#[derive(Debug, Default)]
pub struct ManualPage {
    commits: Vec<String>,
    username: Option<String>,
    apply: bool,
    written: Option<PathBuf>,
}

impl ManualPage {
    pub fn new(commits: Vec<String>, username: Option<String>, apply: bool) -> Self {
        ManualPage {
            commits,
            username,
            apply,
            ..Default::default()
        }
    }
}

impl PageCollaborator for ManualPage {
    fn fetch_commit_messages(&self) -> Result<Vec<String>> {
        Ok(self
            .commits
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect())
    }

    fn fetch_username(&self) -> Result<Option<String>> {
        Ok(self.username.clone())
    }

    fn fill_form(&mut self, title: &str, description: &str) -> Result<()> {
        if self.apply {
            self.written = Some(git::write_pr_editmsg(title, description)?);
        }
        Ok(())
    }

    fn form_location(&self) -> Option<String> {
        self.written.as_ref().map(|p| p.display().to_string())
    }
}
