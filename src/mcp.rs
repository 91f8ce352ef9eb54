//! MCP surface for the RFC document server.
//!
//! Exposes the parsed RFC Editor index and the cached document bodies as
//! three tools: a document count, a paginated document fetch, and a title
//! keyword search. The index is parsed once at startup and shared read-only
//! across requests; only the on-disk cache is touched after that.

use rmcp::model::{
    Implementation, ListPromptsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities,
};
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler, model::ServerInfo, tool};
use rmcp::{
    model::{Content, IntoContents},
    schemars,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cache::FileCache;
use crate::document::{self, DocError, DocumentSlice};
use crate::index::{RfcIndex, SearchHit};

/// Pagination limit applied when a request does not name one.
pub const DEFAULT_MAX_LINES: i64 = 200;

fn default_start_line() -> i64 {
    1
}

fn default_max_lines() -> i64 {
    DEFAULT_MAX_LINES
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetDocParams {
    #[schemars(description = "The RFC number, e.g. \"2119\"")]
    pub number: String,
    #[serde(default = "default_start_line")]
    #[schemars(description = "The line number to start from (1-based, default: 1)")]
    pub start_line: i64,
    #[serde(default = "default_max_lines")]
    #[schemars(description = "Maximum number of lines to return (default: 200)")]
    pub max_lines: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DocCount {
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchResults {
    pub results: Vec<SearchHit>,
}

fn json_content<T: Serialize>(value: &T) -> Vec<Content> {
    match serde_json::to_string_pretty(value) {
        Ok(text) => vec![Content::text(text)],
        Err(err) => vec![Content::text(format!("Serialization error: {}", err))],
    }
}

impl IntoContents for DocCount {
    fn into_contents(self) -> Vec<Content> {
        vec![Content::text(self.count.to_string())]
    }
}

impl IntoContents for DocumentSlice {
    fn into_contents(self) -> Vec<Content> {
        json_content(&self)
    }
}

impl IntoContents for SearchResults {
    fn into_contents(self) -> Vec<Content> {
        json_content(&self)
    }
}

/// Error payloads surface their display text verbatim to the caller.
impl IntoContents for DocError {
    fn into_contents(self) -> Vec<Content> {
        vec![Content::text(self.to_string())]
    }
}

/// MCP service backed by the startup-parsed index and the filesystem cache.
#[derive(Clone)]
pub struct RfcServer {
    index: Arc<RfcIndex>,
    cache: Arc<FileCache>,
}

#[tool(tool_box)]
impl RfcServer {
    pub fn new(index: Arc<RfcIndex>, cache: Arc<FileCache>) -> Self {
        Self { index, cache }
    }

    #[tool(
        description = "Get the total number of IETF RFC documents available in the RFC Editor index"
    )]
    pub fn list_ietf_docs_number(&self) -> DocCount {
        tracing::debug!("doc count: {}", self.index.doc_count);
        DocCount {
            count: self.index.doc_count,
        }
    }

    #[tool(
        description = "Get an RFC document by its number in the RFC Editor index with pagination support"
    )]
    pub async fn get_ietf_doc(
        &self,
        #[tool(aggr)] params: GetDocParams,
    ) -> Result<DocumentSlice, DocError> {
        document::get_document(
            self.cache.as_ref(),
            &self.index,
            &params.number,
            params.start_line,
            params.max_lines,
        )
        .await
    }

    #[tool(
        description = "Search for IETF RFC documents in the RFC Editor index by keyword in their titles"
    )]
    pub fn search_ietf_rfc_by_keyword(
        &self,
        #[tool(param)]
        #[schemars(description = "The keyword to search for")]
        keyword: String,
    ) -> SearchResults {
        let results = self.index.search(&keyword);
        tracing::debug!("search '{}' matched {} titles", keyword, results.len());
        SearchResults { results }
    }
}

#[tool(tool_box)]
impl ServerHandler for RfcServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "This server provides access to IETF RFC documents from the RFC Editor. \
                Use 'list_ietf_docs_number' for the total document count, \
                'search_ietf_rfc_by_keyword' to find RFCs by title keyword, and \
                'get_ietf_doc' to read a document by number with line-based pagination. \
                Documents are cached on disk after the first fetch."
                    .to_string(),
            ),
        }
    }

    async fn list_prompts(
        &self,
        _request: PaginatedRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        // We don't use prompts in this implementation
        Ok(ListPromptsResult {
            next_cursor: None,
            prompts: vec![],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn setup_server(titles: HashMap<String, String>) -> (tempfile::TempDir, RfcServer) {
        let dir = tempdir().unwrap();
        let index = RfcIndex {
            index_path: PathBuf::from("dummy"),
            doc_count: titles.len(),
            titles,
        };
        let cache = FileCache::new_with_base_url(dir.path().to_path_buf(), "http://127.0.0.1:1");
        let server = RfcServer::new(Arc::new(index), Arc::new(cache));
        (dir, server)
    }

    #[test]
    fn test_list_ietf_docs_number() {
        let (_dir, server) = setup_server(HashMap::from([
            ("1".to_string(), "Host Software".to_string()),
            ("3".to_string(), "Documentation conventions".to_string()),
        ]));

        assert_eq!(server.list_ietf_docs_number(), DocCount { count: 2 });
    }

    #[test]
    fn test_search_ietf_rfc_by_keyword() {
        let (_dir, server) = setup_server(HashMap::from([
            ("1".to_string(), "Host Software".to_string()),
            ("3".to_string(), "Documentation conventions".to_string()),
        ]));

        let hits = server.search_ietf_rfc_by_keyword("HOST".to_string());
        assert_eq!(hits.results.len(), 1);
        assert_eq!(hits.results[0].number, "1");

        assert!(server
            .search_ietf_rfc_by_keyword("routing".to_string())
            .results
            .is_empty());
    }

    #[tokio::test]
    async fn test_get_ietf_doc_from_seeded_cache() {
        let (dir, server) = setup_server(HashMap::from([(
            "1".to_string(),
            "Host Software".to_string(),
        )]));
        std::fs::write(dir.path().join("rfc1.txt"), "Line 1\nLine 2\nLine 3\n").unwrap();

        let params = GetDocParams {
            number: "1".to_string(),
            start_line: 1,
            max_lines: 2,
        };
        let slice = server.get_ietf_doc(params).await.unwrap();
        assert_eq!(slice.content, "Line 1\nLine 2\n");
        assert!(slice.truncated);
        assert_eq!(slice.next_chunk_start, Some(3));
    }

    #[tokio::test]
    async fn test_get_ietf_doc_error_is_a_value() {
        let (_dir, server) = setup_server(HashMap::new());

        let params = GetDocParams {
            number: "999".to_string(),
            start_line: 1,
            max_lines: DEFAULT_MAX_LINES,
        };
        let err = server.get_ietf_doc(params).await.unwrap_err();
        assert_eq!(err.to_string(), "RFC 999 not found in index");
    }

    #[test]
    fn test_get_doc_params_defaults() {
        let params: GetDocParams = serde_json::from_str(r#"{"number": "2119"}"#).unwrap();
        assert_eq!(params.start_line, 1);
        assert_eq!(params.max_lines, 200);
    }
}
