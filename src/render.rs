//! Plain-text rendering of GitHub records for tool results.

use std::fmt::Write;

use crate::types::{CodeHit, ContentEntry, Contents, Issue, Repository, SearchResults};

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

fn search_header<T>(results: &SearchResults<T>, what: &str) -> String {
    let mut out = format!("Found {} {}", results.total_count, what);
    if results.incomplete_results {
        out.push_str(" (search timed out, results may be incomplete)");
    }
    out
}

pub fn repository_search(results: &SearchResults<Repository>) -> String {
    let mut out = search_header(results, "repositories");
    if results.items.is_empty() {
        return out;
    }
    out.push_str(":\n");
    for repo in &results.items {
        let _ = write!(
            out,
            "\n{} ({})\n  {}\n  Stars: {} | Forks: {} | Language: {}\n  Updated: {}\n  URL: {}\n",
            repo.full_name,
            repo.name,
            repo.description.as_deref().unwrap_or("No description"),
            repo.stargazers_count,
            repo.forks_count,
            or_dash(repo.language.as_deref()),
            or_dash(repo.updated_at.as_deref()),
            repo.html_url,
        );
    }
    out
}

pub fn repository(repo: &Repository) -> String {
    format!(
        "{}\n\
         Description: {}\n\
         Stars: {} | Forks: {} | Watchers: {}\n\
         Language: {}\n\
         Created: {}\n\
         Updated: {}\n\
         URL: {}",
        repo.full_name,
        repo.description.as_deref().unwrap_or("No description"),
        repo.stargazers_count,
        repo.forks_count,
        repo.watchers_count,
        or_dash(repo.language.as_deref()),
        or_dash(repo.created_at.as_deref()),
        or_dash(repo.updated_at.as_deref()),
        repo.html_url,
    )
}

pub fn issue_list(owner: &str, repo: &str, state: &str, issues: &[Issue]) -> String {
    let mut out = if state == "all" {
        format!(
            "Found {} issues (all states) in {}/{}",
            issues.len(),
            owner,
            repo
        )
    } else {
        format!(
            "Found {} {} issues in {}/{}",
            issues.len(),
            state,
            owner,
            repo
        )
    };
    if issues.is_empty() {
        return out;
    }
    out.push_str(":\n");
    for issue in issues {
        let labels: Vec<&str> = issue.labels.iter().map(|l| l.name.as_str()).collect();
        let _ = write!(
            out,
            "\n#{} {} [{}]\n  Labels: {}\n  Created: {} | Updated: {}\n  URL: {}\n",
            issue.number,
            issue.title,
            or_dash(issue.state.as_deref()),
            if labels.is_empty() {
                "none".to_string()
            } else {
                labels.join(", ")
            },
            or_dash(issue.created_at.as_deref()),
            or_dash(issue.updated_at.as_deref()),
            issue.html_url,
        );
    }
    out
}

pub fn created_issue(issue: &Issue) -> String {
    format!(
        "Created issue #{}: {}\nURL: {}\nCreated: {}",
        issue.number,
        issue.title,
        issue.html_url,
        or_dash(issue.created_at.as_deref()),
    )
}

pub fn code_search(results: &SearchResults<CodeHit>) -> String {
    let mut out = search_header(results, "code results");
    if results.items.is_empty() {
        return out;
    }
    out.push_str(":\n");
    for hit in &results.items {
        let _ = write!(
            out,
            "\n{} ({})\n  Repository: {}\n  Score: {:.2}\n  URL: {}\n",
            hit.name, hit.path, hit.repository.full_name, hit.score, hit.html_url,
        );
    }
    out
}

fn directory_entry(entry: &ContentEntry) -> String {
    format!(
        "- {} [{}] path: {}, size: {}, download: {}",
        entry.name,
        entry.kind,
        entry.path,
        entry.size,
        or_dash(entry.download_url.as_deref()),
    )
}

pub fn contents(owner: &str, repo: &str, path: &str, contents: &Contents) -> String {
    match contents {
        Contents::Directory(entries) => {
            let mut out = format!(
                "Directory {} in {}/{} ({} entries)",
                if path.is_empty() { "/" } else { path },
                owner,
                repo,
                entries.len()
            );
            if !entries.is_empty() {
                out.push_str(":\n");
                for entry in entries {
                    out.push('\n');
                    out.push_str(&directory_entry(entry));
                }
            }
            out
        }
        Contents::File(entry) => {
            let header = format!(
                "File {} in {}/{} ({} bytes)",
                entry.path, owner, repo, entry.size
            );
            match entry.decoded_text() {
                Some(text) => format!("{}\n\n{}", header, text),
                None => format!(
                    "{}\n\nNo inline content ({}). Download: {}",
                    header,
                    entry.kind,
                    or_dash(entry.download_url.as_deref()),
                ),
            }
        }
    }
}
