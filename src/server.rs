use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{schemars, tool, tool_router, RoleServer, ServerHandler};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{McpGithubError, Result};
use crate::github::{GithubApi, OctocrabApi};
use crate::render;
use crate::types::{CodeSearch, IssueQuery, NewIssue, RepoSearch};

/// Tool names in catalog order.
pub const TOOL_NAMES: [&str; 6] = [
    "search_repositories",
    "get_repository",
    "list_issues",
    "create_issue",
    "search_code",
    "get_file_contents",
];

#[derive(Clone)]
pub struct McpGithubServer {
    github: Arc<dyn GithubApi>,
    tool_router: ToolRouter<Self>,
}

// -- Tool parameter types --

fn default_per_page() -> u32 {
    30
}

fn default_ref() -> String {
    "main".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RepoSort {
    #[default]
    Stars,
    Forks,
    HelpWantedIssues,
    Updated,
}

impl RepoSort {
    pub fn as_str(self) -> &'static str {
        match self {
            RepoSort::Stars => "stars",
            RepoSort::Forks => "forks",
            RepoSort::HelpWantedIssues => "help-wanted-issues",
            RepoSort::Updated => "updated",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CodeSort {
    #[default]
    Indexed,
}

impl CodeSort {
    pub fn as_str(self) -> &'static str {
        match self {
            CodeSort::Indexed => "indexed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
    All,
}

impl IssueState {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
            IssueState::All => "all",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchRepositoriesParams {
    #[schemars(description = "Search query (GitHub repository search syntax)")]
    pub query: String,

    #[schemars(description = "Sort field: stars, forks, help-wanted-issues, or updated (default: stars)")]
    #[serde(default)]
    pub sort: RepoSort,

    #[schemars(description = "Number of results per page, max 100 (default: 30)")]
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RepoParams {
    #[schemars(description = "Repository owner (user or org)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListIssuesParams {
    #[schemars(description = "Repository owner (user or org)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Filter by state: open, closed, or all (default: open)")]
    #[serde(default)]
    pub state: IssueState,

    #[schemars(description = "Number of results per page, max 100 (default: 30)")]
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreateIssueParams {
    #[schemars(description = "Repository owner (user or org)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Issue title")]
    pub title: String,

    #[schemars(description = "Issue body in markdown")]
    #[serde(default)]
    pub body: Option<String>,

    #[schemars(description = "Label names to apply (default: none)")]
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchCodeParams {
    #[schemars(description = "Search query (GitHub code search syntax)")]
    pub query: String,

    #[schemars(description = "Sort field: indexed (default: indexed)")]
    #[serde(default)]
    pub sort: CodeSort,

    #[schemars(description = "Number of results per page, max 100 (default: 30)")]
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FileContentsParams {
    #[schemars(description = "Repository owner (user or org)")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "File or directory path within the repository")]
    pub path: String,

    #[schemars(description = "Git ref (branch, tag, or SHA) (default: main)")]
    #[serde(default = "default_ref", rename = "ref")]
    pub git_ref: String,
}

/// Cap per_page to 100 (GitHub API maximum) and safely cast to u8.
fn capped_per_page(per_page: u32) -> u8 {
    per_page.clamp(1, 100) as u8
}

/// Deserialize tool arguments, treating a missing argument object as empty.
fn parse_args<T: DeserializeOwned>(arguments: serde_json::Value) -> Result<T> {
    let arguments = match arguments {
        serde_json::Value::Null => serde_json::Value::Object(Default::default()),
        other => other,
    };
    Ok(serde_json::from_value(arguments)?)
}

/// The single boundary between handler outcomes and the host: every call,
/// success or failure, leaves here as exactly one result envelope.
fn respond(tool: &str, outcome: Result<String>) -> CallToolResult {
    match outcome {
        Ok(text) => {
            tracing::debug!(tool, bytes = text.len(), "Tool call succeeded");
            CallToolResult::success(vec![Content::text(text)])
        }
        Err(e) => {
            tracing::warn!(tool, status = ?e.status(), local = e.is_local(), error = %e, "Tool call failed");
            CallToolResult::error(vec![Content::text(e.to_string())])
        }
    }
}

impl McpGithubServer {
    pub fn new(github: octocrab::Octocrab) -> Self {
        Self::with_api(Arc::new(OctocrabApi::new(github)))
    }

    pub fn with_api(github: Arc<dyn GithubApi>) -> Self {
        Self {
            github,
            tool_router: Self::tool_router(),
        }
    }

    /// Every tool descriptor, in catalog order.
    pub fn catalog(&self) -> Vec<Tool> {
        let mut tools = self.tool_router.list_all();
        tools.sort_by_key(|t| {
            TOOL_NAMES
                .iter()
                .position(|n| *n == t.name.as_ref())
                .unwrap_or(usize::MAX)
        });
        tools
    }

    /// Call a tool by name. Never fails: unknown names, bad arguments and
    /// GitHub errors all come back as error results.
    pub async fn dispatch(&self, name: &str, arguments: serde_json::Value) -> CallToolResult {
        tracing::debug!(tool = name, "Dispatching tool call");
        respond(name, self.run(name, arguments).await)
    }

    async fn run(&self, name: &str, arguments: serde_json::Value) -> Result<String> {
        match name {
            "search_repositories" => self.do_search_repositories(parse_args(arguments)?).await,
            "get_repository" => self.do_get_repository(parse_args(arguments)?).await,
            "list_issues" => self.do_list_issues(parse_args(arguments)?).await,
            "create_issue" => self.do_create_issue(parse_args(arguments)?).await,
            "search_code" => self.do_search_code(parse_args(arguments)?).await,
            "get_file_contents" => self.do_get_file_contents(parse_args(arguments)?).await,
            _ => Err(McpGithubError::UnknownTool(name.to_string())),
        }
    }

    async fn do_search_repositories(&self, params: SearchRepositoriesParams) -> Result<String> {
        let search = RepoSearch {
            q: params.query,
            sort: params.sort.as_str().to_string(),
            per_page: capped_per_page(params.per_page),
        };
        let results = self.github.search_repositories(&search).await?;
        Ok(render::repository_search(&results))
    }

    async fn do_get_repository(&self, params: RepoParams) -> Result<String> {
        let repo = self.github.get_repository(&params.owner, &params.repo).await?;
        Ok(render::repository(&repo))
    }

    async fn do_list_issues(&self, params: ListIssuesParams) -> Result<String> {
        let query = IssueQuery {
            state: params.state.as_str().to_string(),
            per_page: capped_per_page(params.per_page),
        };
        let issues = self
            .github
            .list_issues(&params.owner, &params.repo, &query)
            .await?;
        Ok(render::issue_list(
            &params.owner,
            &params.repo,
            params.state.as_str(),
            &issues,
        ))
    }

    async fn do_create_issue(&self, params: CreateIssueParams) -> Result<String> {
        let issue = NewIssue {
            title: params.title,
            body: params.body,
            labels: params.labels,
        };
        let created = self
            .github
            .create_issue(&params.owner, &params.repo, &issue)
            .await?;
        Ok(render::created_issue(&created))
    }

    async fn do_search_code(&self, params: SearchCodeParams) -> Result<String> {
        let search = CodeSearch {
            q: params.query,
            sort: params.sort.as_str().to_string(),
            per_page: capped_per_page(params.per_page),
        };
        let results = self.github.search_code(&search).await?;
        Ok(render::code_search(&results))
    }

    async fn do_get_file_contents(&self, params: FileContentsParams) -> Result<String> {
        let contents = self
            .github
            .get_contents(&params.owner, &params.repo, &params.path, &params.git_ref)
            .await?;
        Ok(render::contents(
            &params.owner,
            &params.repo,
            &params.path,
            &contents,
        ))
    }
}

// -- MCP tool handlers (thin wrappers calling do_* methods) --

#[tool_router]
impl McpGithubServer {
    #[tool(
        name = "search_repositories",
        description = "Search GitHub repositories by keyword, sorted by stars by default"
    )]
    async fn search_repositories(
        &self,
        Parameters(params): Parameters<SearchRepositoriesParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        Ok(respond(
            "search_repositories",
            self.do_search_repositories(params).await,
        ))
    }

    #[tool(
        name = "get_repository",
        description = "Get repository details including description, stars, forks, watchers, language, and timestamps"
    )]
    async fn get_repository(
        &self,
        Parameters(params): Parameters<RepoParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        Ok(respond("get_repository", self.do_get_repository(params).await))
    }

    #[tool(
        name = "list_issues",
        description = "List issues in a repository, filtered by state"
    )]
    async fn list_issues(
        &self,
        Parameters(params): Parameters<ListIssuesParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        Ok(respond("list_issues", self.do_list_issues(params).await))
    }

    #[tool(
        name = "create_issue",
        description = "Create a new issue in a repository"
    )]
    async fn create_issue(
        &self,
        Parameters(params): Parameters<CreateIssueParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        Ok(respond("create_issue", self.do_create_issue(params).await))
    }

    #[tool(
        name = "search_code",
        description = "Search code across GitHub repositories using GitHub's code search syntax"
    )]
    async fn search_code(
        &self,
        Parameters(params): Parameters<SearchCodeParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        Ok(respond("search_code", self.do_search_code(params).await))
    }

    #[tool(
        name = "get_file_contents",
        description = "Get a file's decoded content, or a directory listing, from a repository at a specific ref"
    )]
    async fn get_file_contents(
        &self,
        Parameters(params): Parameters<FileContentsParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        Ok(respond(
            "get_file_contents",
            self.do_get_file_contents(params).await,
        ))
    }
}

// The router supplies descriptors; listing and calling go through
// `catalog` and `dispatch` so the host sees catalog order and error results.
impl ServerHandler for McpGithubServer {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.catalog()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        let arguments = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or_default();
        Ok(self.dispatch(&request.name, arguments).await)
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mcp-github-tools".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "GitHub server. Use search_repositories to find repositories, get_repository \
                 for repo details, list_issues/create_issue for issues, search_code to search \
                 code, and get_file_contents to read files or list directories."
                    .to_string(),
            ),
        }
    }
}
