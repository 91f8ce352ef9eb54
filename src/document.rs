use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tokio::fs;

use crate::cache::{DocStore, FetchError};
use crate::index::RfcIndex;

/// In-document pagination marker, e.g. "[Page 12]".
static PAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[Page\s+(\d+)\]").expect("valid page marker pattern"));

/// The ways a document request can fail. Each is a terminal outcome for
/// the request that produced it; nothing is retried.
#[derive(Debug, Error)]
pub enum DocError {
    #[error("RFC number must be a number")]
    InvalidNumber,

    #[error("start_line must be 1 or greater")]
    InvalidStartLine,

    #[error("max_lines must be 1 or greater")]
    InvalidMaxLines,

    #[error("RFC {0} not found in index")]
    NotFound(String),

    #[error(transparent)]
    FetchFailed(#[from] FetchError),

    #[error("start_line ({start}) exceeds document length ({total})")]
    OutOfRange { start: i64, total: usize },
}

/// First and last page markers found in a slice, in order of appearance.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageInfo {
    pub pages_found: bool,
    pub first_page: Option<u32>,
    pub last_page: Option<u32>,
}

/// A bounded, line-addressed excerpt of one document, with the metadata a
/// client needs to continue reading.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DocumentSlice {
    pub content: String,
    pub title: String,
    pub path: String,
    pub start_line: usize,
    pub end_line: usize,
    pub max_lines: usize,
    pub total_lines: usize,
    pub truncated: bool,
    pub truncated_at_line: Option<usize>,
    pub page_info: PageInfo,
    pub next_chunk_start: Option<usize>,
}

/// Fetch (through the store) and slice one RFC document.
///
/// Validation is ordered and short-circuiting: digits-only number, then
/// `start_line >= 1`, then `max_lines >= 1`, then index membership. The
/// lookup key is the digit string exactly as passed in; leading zeros are
/// not stripped here.
pub async fn get_document(
    store: &dyn DocStore,
    index: &RfcIndex,
    number: &str,
    start_line: i64,
    max_lines: i64,
) -> Result<DocumentSlice, DocError> {
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(DocError::InvalidNumber);
    }
    if start_line < 1 {
        return Err(DocError::InvalidStartLine);
    }
    if max_lines < 1 {
        return Err(DocError::InvalidMaxLines);
    }
    let title = index
        .titles
        .get(number)
        .ok_or_else(|| DocError::NotFound(number.to_string()))?;

    let path = store.ensure_document(number).await?;
    let text = fs::read_to_string(&path)
        .await
        .map_err(|e| FetchError::new(format!("RFC {}", number), e))?;

    // Line terminators stay attached so the slice concatenates back to the
    // original bytes.
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let total_lines = lines.len();

    let start = start_line as usize;
    if start > total_lines {
        return Err(DocError::OutOfRange {
            start: start_line,
            total: total_lines,
        });
    }

    let end = start
        .saturating_add(max_lines as usize - 1)
        .min(total_lines);
    let content: String = lines[start - 1..end].concat();
    let truncated = end < total_lines;
    let page_info = extract_page_info(&content);

    Ok(DocumentSlice {
        content,
        title: title.clone(),
        path: path.display().to_string(),
        start_line: start,
        end_line: end,
        max_lines: max_lines as usize,
        total_lines,
        truncated,
        truncated_at_line: truncated.then_some(end),
        page_info,
        next_chunk_start: truncated.then_some(end + 1),
    })
}

/// Scan a slice for `[Page N]` markers and report the first and last in
/// document order of appearance (not numeric order).
pub fn extract_page_info(content: &str) -> PageInfo {
    let mut pages = PAGE_RE
        .captures_iter(content)
        .filter_map(|caps| caps[1].parse::<u32>().ok());

    match pages.next() {
        None => PageInfo {
            pages_found: false,
            first_page: None,
            last_page: None,
        },
        Some(first) => {
            let last = pages.last().unwrap_or(first);
            PageInfo {
                pages_found: true,
                first_page: Some(first),
                last_page: Some(last),
            }
        }
    }
}
