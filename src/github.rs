//! The remote side of every tool: one trait method per GitHub operation.
//!
//! `OctocrabApi` is the production implementation. The server only sees
//! `dyn GithubApi`, so tests can swap in a recording fake.

use async_trait::async_trait;

use crate::error::{McpGithubError, Result};
use crate::types::{
    CodeHit, CodeSearch, Contents, Issue, IssueQuery, NewIssue, RefQuery, RepoSearch, Repository,
    SearchResults,
};

#[async_trait]
pub trait GithubApi: Send + Sync {
    async fn search_repositories(&self, search: &RepoSearch) -> Result<SearchResults<Repository>>;

    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository>;

    async fn list_issues(&self, owner: &str, repo: &str, query: &IssueQuery) -> Result<Vec<Issue>>;

    async fn create_issue(&self, owner: &str, repo: &str, issue: &NewIssue) -> Result<Issue>;

    async fn search_code(&self, search: &CodeSearch) -> Result<SearchResults<CodeHit>>;

    async fn get_contents(&self, owner: &str, repo: &str, path: &str, git_ref: &str)
        -> Result<Contents>;
}

/// Build an octocrab client, optionally authenticated and pointed at a non-default host.
pub fn build_client(token: Option<&str>, base_url: Option<&str>) -> Result<octocrab::Octocrab> {
    let mut builder = octocrab::Octocrab::builder();
    if let Some(url) = base_url {
        builder = builder.base_uri(url)?;
    }
    if let Some(t) = token {
        builder = builder.personal_token(t.to_string());
    }
    Ok(builder.build()?)
}

/// Validate that a GitHub owner/repo name doesn't contain characters that
/// could be used for URL injection in raw API routes.
pub(crate) fn sanitize_github_name(name: &str, field: &str) -> Result<()> {
    if name.is_empty() {
        return Err(McpGithubError::InvalidParam(format!(
            "{} must not be empty",
            field
        )));
    }
    for ch in ['/', '?', '#', '%', '\0', ' ', '\n', '\t'] {
        if name.contains(ch) {
            return Err(McpGithubError::InvalidParam(format!(
                "{} contains invalid character '{}'",
                field,
                ch.escape_default()
            )));
        }
    }
    Ok(())
}

/// Validate a value for use in URL paths. Unlike `sanitize_github_name`,
/// this allows slashes (for branch names like `feature/foo` or file paths
/// like `src/main.rs`).
pub(crate) fn sanitize_url_value(value: &str, field: &str) -> Result<()> {
    if value.is_empty() {
        return Err(McpGithubError::InvalidParam(format!(
            "{} must not be empty",
            field
        )));
    }
    for ch in ['?', '#', '&', '\0', '\n', '\r', '\t'] {
        if value.contains(ch) {
            return Err(McpGithubError::InvalidParam(format!(
                "{} contains invalid character",
                field
            )));
        }
    }
    Ok(())
}

/// An empty path addresses the repository root, so only a non-empty path is checked.
pub(crate) fn sanitize_content_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Ok(());
    }
    sanitize_url_value(path, "path")
}

/// Percent-encode each `/`-separated segment of a repository path.
fn encode_path(path: &str) -> String {
    path.trim_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Route for the contents API; an empty path lists the repository root.
pub(crate) fn contents_route(owner: &str, repo: &str, path: &str) -> Result<String> {
    sanitize_content_path(path)?;
    OctocrabApi::repo_route(owner, repo, &format!("/contents/{}", encode_path(path)))
}

#[derive(Clone)]
pub struct OctocrabApi {
    github: octocrab::Octocrab,
}

impl OctocrabApi {
    pub fn new(github: octocrab::Octocrab) -> Self {
        Self { github }
    }

    fn repo_route(owner: &str, repo: &str, rest: &str) -> Result<String> {
        sanitize_github_name(owner, "owner")?;
        sanitize_github_name(repo, "repo")?;
        Ok(format!("/repos/{}/{}{}", owner, repo, rest))
    }
}

#[async_trait]
impl GithubApi for OctocrabApi {
    async fn search_repositories(&self, search: &RepoSearch) -> Result<SearchResults<Repository>> {
        Ok(self.github.get("/search/repositories", Some(search)).await?)
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository> {
        let route = Self::repo_route(owner, repo, "")?;
        Ok(self.github.get(route, None::<&()>).await?)
    }

    async fn list_issues(&self, owner: &str, repo: &str, query: &IssueQuery) -> Result<Vec<Issue>> {
        let route = Self::repo_route(owner, repo, "/issues")?;
        Ok(self.github.get(route, Some(query)).await?)
    }

    async fn create_issue(&self, owner: &str, repo: &str, issue: &NewIssue) -> Result<Issue> {
        let route = Self::repo_route(owner, repo, "/issues")?;
        Ok(self.github.post(route, Some(issue)).await?)
    }

    async fn search_code(&self, search: &CodeSearch) -> Result<SearchResults<CodeHit>> {
        Ok(self.github.get("/search/code", Some(search)).await?)
    }

    async fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<Contents> {
        sanitize_url_value(git_ref, "ref")?;
        let route = contents_route(owner, repo, path)?;
        Ok(self
            .github
            .get(route, Some(&RefQuery { git_ref }))
            .await?)
    }
}
