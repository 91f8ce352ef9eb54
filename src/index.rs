use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Literal that separates the index preamble from the citation records.
const INDEX_MARKER: &str = "RFC INDEX";

/// A citation record: optional indentation, a 4-or-5-digit number, then the
/// remainder of the line as the title fragment.
static RECORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{4,5})\s+(.+)").expect("valid record pattern"));

/// Parsed view of the master RFC index: number→title map plus the raw
/// record count. Built once at startup and read-only for the rest of the
/// serving session.
#[derive(Debug, Clone)]
pub struct RfcIndex {
    pub index_path: PathBuf,
    pub doc_count: usize,
    pub titles: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchHit {
    pub number: String,
    pub title: String,
}

impl RfcIndex {
    /// Case-insensitive substring search over all titles. Result order
    /// follows map iteration order and is not sorted.
    pub fn search(&self, keyword: &str) -> Vec<SearchHit> {
        let keyword = keyword.to_lowercase();
        self.titles
            .iter()
            .filter(|(_, title)| title.to_lowercase().contains(&keyword))
            .map(|(number, title)| SearchHit {
                number: number.clone(),
                title: title.clone(),
            })
            .collect()
    }
}

/// Parse the index file into an [`RfcIndex`].
///
/// Two-state line scanner: lines are skipped until the "RFC INDEX" marker,
/// then each line matching the record pattern contributes one entry. A
/// duplicate number overwrites the stored title but still increments the
/// count, mirroring raw record-line counting. A file with no matching
/// lines parses to a valid empty index.
pub fn parse_index(index_path: &Path) -> io::Result<RfcIndex> {
    let text = fs::read_to_string(index_path)?;

    let mut titles = HashMap::new();
    let mut doc_count = 0;
    let mut parsing = false;

    for line in text.lines() {
        if !parsing {
            if line.contains(INDEX_MARKER) {
                parsing = true;
            }
            continue;
        }

        let Some(caps) = RECORD_RE.captures(line) else {
            continue;
        };

        let number = canonical_number(&caps[1]);
        let fragment = &caps[2];
        let title = if fragment.contains("Not Issued") {
            "Not Issued".to_string()
        } else {
            // Citation lines read "Title. Authors. Date. (...)"; the title
            // is everything before the first period.
            fragment.split('.').next().unwrap_or("").trim().to_string()
        };

        titles.insert(number, title);
        doc_count += 1;
    }

    tracing::debug!("Parsed {} records from {:?}", doc_count, index_path);

    Ok(RfcIndex {
        index_path: index_path.to_path_buf(),
        doc_count,
        titles,
    })
}

/// Strip leading zeros to form the canonical map key; an all-zero number
/// normalizes to "0".
fn canonical_number(digits: &str) -> String {
    let stripped = digits.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_INDEX: &str = "\
~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

                             RFC INDEX
                           -------------

(CREATED ON: 03/04/2025.)

This file contains citations for all RFCs in numeric order.

0001 Host Software. S. Crocker. April 1969. (Format: TXT, HTML) (Status:
     UNKNOWN) (DOI: 10.17487/RFC0001)

0002 Host software. B. Duvall. April 1969. (Format: TXT, PDF, HTML)
     (Status: UNKNOWN) (DOI: 10.17487/RFC0002)

0014 Not Issued.

0026 Not Issued.

9748 The Latest RFC. Some Author. March 2025. (Format: TXT, HTML) (Status:
     PROPOSED STANDARD) (DOI: 10.17487/RFC9748)
";

    fn write_index(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_index_titles_and_count() {
        let file = write_index(SAMPLE_INDEX);
        let index = parse_index(file.path()).unwrap();

        assert_eq!(index.doc_count, 5);
        assert_eq!(index.titles["1"], "Host Software");
        assert_eq!(index.titles["2"], "Host software");
        assert_eq!(index.titles["14"], "Not Issued");
        assert_eq!(index.titles["26"], "Not Issued");
        assert_eq!(index.titles["9748"], "The Latest RFC");
    }

    #[test]
    fn test_parse_index_empty_file() {
        let file = write_index("");
        let index = parse_index(file.path()).unwrap();

        assert_eq!(index.doc_count, 0);
        assert!(index.titles.is_empty());
    }

    #[test]
    fn test_lines_before_marker_are_ignored() {
        let content = "\
0001 Looks like a record but precedes the marker. Author. 1969.
RFC INDEX
0002 Real record. Author. 1969.
";
        let file = write_index(content);
        let index = parse_index(file.path()).unwrap();

        assert_eq!(index.doc_count, 1);
        assert!(!index.titles.contains_key("1"));
        assert_eq!(index.titles["2"], "Real record");
    }

    #[test]
    fn test_parse_index_number_edge_cases() {
        let content = "\
RFC INDEX
---------

0000 Zero RFC. Author. Date. (Format: TXT)

00001 Leading zeros. Author. Date. (Format: TXT)

12345 Five digits. Author. Date. (Format: TXT)

  0042 Indented number. Author. Date. (Format: TXT)
";
        let file = write_index(content);
        let index = parse_index(file.path()).unwrap();

        assert_eq!(index.titles["0"], "Zero RFC");
        assert_eq!(index.titles["1"], "Leading zeros");
        assert_eq!(index.titles["12345"], "Five digits");
        assert_eq!(index.titles["42"], "Indented number");
        assert_eq!(index.doc_count, 4);
    }

    #[test]
    fn test_duplicate_numbers_overwrite_but_still_count() {
        let content = "\
RFC INDEX
0007 First title. Author. 1969.
0007 Second title. Author. 1970.
";
        let file = write_index(content);
        let index = parse_index(file.path()).unwrap();

        assert_eq!(index.doc_count, 2);
        assert_eq!(index.titles["7"], "Second title");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let index = RfcIndex {
            index_path: PathBuf::from("dummy"),
            doc_count: 3,
            titles: HashMap::from([
                ("1".to_string(), "Host Software".to_string()),
                ("2".to_string(), "Host software implementation".to_string()),
                ("3".to_string(), "Network Protocol".to_string()),
            ]),
        };

        let mut hits = index.search("host");
        hits.sort_by(|a, b| a.number.cmp(&b.number));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].number, "1");
        assert_eq!(hits[1].title, "Host software implementation");

        assert!(index.search("encryption").is_empty());
    }
}
