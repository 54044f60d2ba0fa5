//! Records projected from GitHub REST responses, and the query shapes sent with them.
//!
//! Only the fields the tools display are modelled. Everything else GitHub
//! returns is ignored during deserialization.

use base64::Engine;
use serde::{Deserialize, Serialize};

/// Envelope returned by the `/search/*` endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResults<T> {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub html_url: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RepositoryRef {
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CodeHit {
    pub name: String,
    pub path: String,
    pub repository: RepositoryRef,
    pub html_url: String,
    #[serde(default)]
    pub score: f64,
}

/// One entry of the contents API. Directory listings omit `content`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

/// The contents API answers with an array for directories and an object for anything else.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Contents {
    Directory(Vec<ContentEntry>),
    File(ContentEntry),
}

impl ContentEntry {
    /// Decode the inline base64 payload. GitHub wraps it at 60 columns, so
    /// whitespace is dropped first. Returns `None` when there is no payload.
    pub fn decoded_text(&self) -> Option<String> {
        let raw = self.content.as_deref().filter(|c| !c.is_empty())?;
        if let Some(enc) = self.encoding.as_deref() {
            if enc != "base64" {
                return Some(raw.to_string());
            }
        }
        let cleaned: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
        let text = match base64::engine::general_purpose::STANDARD.decode(&cleaned) {
            Ok(bytes) => {
                String::from_utf8(bytes).unwrap_or_else(|_| "[binary content]".to_string())
            }
            Err(_) => "[invalid base64 content]".to_string(),
        };
        Some(text)
    }
}

// -- Outbound query shapes --

/// Query string for `GET /search/repositories`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoSearch {
    pub q: String,
    pub sort: String,
    pub per_page: u8,
}

/// Query string for `GET /search/code`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeSearch {
    pub q: String,
    pub sort: String,
    pub per_page: u8,
}

/// Query string for `GET /repos/{owner}/{repo}/issues`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueQuery {
    pub state: String,
    pub per_page: u8,
}

/// Body for `POST /repos/{owner}/{repo}/issues`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIssue {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct RefQuery<'a> {
    #[serde(rename = "ref")]
    pub git_ref: &'a str,
}
