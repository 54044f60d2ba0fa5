#[derive(Debug, thiserror::Error)]
pub enum McpGithubError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("GitHub API error: {0}")]
    GitHub(octocrab::Error),
}

pub type Result<T> = std::result::Result<T, McpGithubError>;

impl McpGithubError {
    /// HTTP status reported by GitHub, when the failure came back as an API response.
    pub fn status(&self) -> Option<u16> {
        match self {
            McpGithubError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the failure was detected locally and no request left the process.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            McpGithubError::UnknownTool(_)
                | McpGithubError::InvalidArguments(_)
                | McpGithubError::InvalidParam(_)
        )
    }
}

impl From<octocrab::Error> for McpGithubError {
    fn from(e: octocrab::Error) -> Self {
        match e {
            octocrab::Error::GitHub { source, .. } => McpGithubError::Api {
                status: source.status_code.as_u16(),
                message: source.message.clone(),
            },
            other => McpGithubError::GitHub(other),
        }
    }
}

impl From<serde_json::Error> for McpGithubError {
    fn from(e: serde_json::Error) -> Self {
        McpGithubError::InvalidArguments(e.to_string())
    }
}
