//! Parsing of colon-delimited source identifiers.
//!
//! Chunks are tagged with identifiers of the form `path:page[:chunk]`, for
//! example `data/monopoly.pdf:6:2`. [`parse_source_id`] is the single place
//! where these strings are taken apart; every citation label goes through it.

use serde::{Deserialize, Serialize};

/// Placeholder for fields a source identifier does not carry.
pub const UNKNOWN: &str = "Unknown";

/// The displayable parts of a source identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Basename of the source file, or the raw identifier if it has no page.
    pub filename: String,
    /// Page number as written in the identifier.
    pub page: String,
    /// Chunk index within the page.
    pub chunk: String,
}

/// Split a source identifier into filename, page, and chunk.
///
/// Never fails: missing segments become [`UNKNOWN`].
///
/// ```
/// use citerag::parse_source_id;
///
/// let info = parse_source_id("data/monopoly.pdf:6:2");
/// assert_eq!(info.filename, "monopoly.pdf");
/// assert_eq!(info.page, "6");
/// assert_eq!(info.chunk, "2");
///
/// let info = parse_source_id("doc.txt:3");
/// assert_eq!(info.chunk, "Unknown");
/// ```
pub fn parse_source_id(id: &str) -> SourceInfo {
    let mut segments = id.split(':');
    let (Some(path), Some(page)) = (segments.next(), segments.next()) else {
        return SourceInfo {
            filename: id.to_string(),
            page: UNKNOWN.to_string(),
            chunk: UNKNOWN.to_string(),
        };
    };
    let chunk = segments.next().unwrap_or(UNKNOWN);

    SourceInfo {
        filename: basename(path).to_string(),
        page: page.to_string(),
        chunk: chunk.to_string(),
    }
}

/// The last path component, or the whole path when that component is empty
/// (`dir/`).
fn basename(path: &str) -> &str {
    match path.rsplit(['/', '\\']).next() {
        Some(name) if !name.is_empty() => name,
        _ => path,
    }
}

/// A numbered citation derived from one retrieved passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationEntry {
    /// 1-based position in retrieval order.
    pub index: usize,
    /// Display filename.
    pub filename: String,
    /// Display page.
    pub page: String,
    /// Chunk index, when the identifier carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk: Option<String>,
}

impl CitationEntry {
    /// Build the entry for the passage at `index` (1-based) with source `id`.
    pub fn from_source_id(index: usize, id: &str) -> Self {
        let info = parse_source_id(id);
        let chunk = (info.chunk != UNKNOWN).then_some(info.chunk);
        Self { index, filename: info.filename, page: info.page, chunk }
    }
}
