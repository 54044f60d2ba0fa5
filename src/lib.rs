//! MCP server that exposes a fixed set of GitHub operations as tools.
//!
//! Provides repository search and lookup, issue listing and creation, code
//! search, and file or directory retrieval. Every tool makes exactly one
//! GitHub REST call and renders the result as plain text.

pub mod error;
pub mod github;
pub mod render;
pub mod server;
pub mod types;
