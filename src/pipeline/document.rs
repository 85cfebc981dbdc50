//! Source documents: the already-fetched text a strategy parses.
//!
//! Page retrieval and DOM traversal happen upstream; what arrives here is
//! plain JSON holding section headings with their bullets, or table rows
//! with their year/date/text cells.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Bullets,
    Table,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub kind: DocumentKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<Table>,
}

/// A heading and the bullets listed under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

/// One table row's cell values. Empty cells are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub text: String,
    /// Declared span of the year cell, when the source had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rowspan: Option<u32>,
}

/// Where a strategy fetches its document from.
#[derive(Debug, Clone)]
pub enum DocumentOrigin {
    File(PathBuf),
    Inline(SourceDocument),
}

impl DocumentOrigin {
    pub fn fetch(&self) -> Result<SourceDocument, PipelineError> {
        match self {
            Self::File(path) => load_document(path),
            Self::Inline(doc) => Ok(doc.clone()),
        }
    }
}

pub fn load_document(path: &Path) -> Result<SourceDocument, PipelineError> {
    let raw = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_bullets_document() {
        let doc: SourceDocument = serde_json::from_str(
            r#"{
                "url": "https://example.org/rome",
                "title": "Timeline of Rome",
                "kind": "bullets",
                "sections": [{"heading": "8th century BC", "bullets": ["753 BC – Founding"]}]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.kind, DocumentKind::Bullets);
        assert_eq!(doc.category, None);
        assert_eq!(doc.sections[0].bullets.len(), 1);
        assert!(doc.tables.is_empty());
    }

    #[test]
    fn test_deserialize_table_rows_with_missing_cells() {
        let doc: SourceDocument = serde_json::from_str(
            r#"{
                "url": "u", "title": "t", "kind": "table", "category": "war",
                "tables": [{"rows": [
                    {"year": "44 BC", "date": "15 March", "text": "Caesar", "rowspan": 2},
                    {"text": "Aftermath"}
                ]}]
            }"#,
        )
        .unwrap();
        let rows = &doc.tables[0].rows;
        assert_eq!(rows[0].rowspan, Some(2));
        assert_eq!(rows[1].year, "");
        assert_eq!(rows[1].rowspan, None);
    }

    #[test]
    fn test_missing_file() {
        let origin = DocumentOrigin::File(PathBuf::from("/nonexistent/doc.json"));
        assert!(matches!(origin.fetch(), Err(PipelineError::Io { .. })));
    }
}
