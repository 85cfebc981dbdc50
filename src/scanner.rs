use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Suffix of the bundles this tool writes; never read back as input.
const BUNDLE_SUFFIX: &str = ".events.json";
const SUMMARY_FILE: &str = "summary.json";

/// Discover all source documents under `root`, sorted by path.
///
/// Any `*.json` file counts, except bundle and summary files from an
/// earlier run (so an output directory inside the input tree is harmless).
pub fn scan_documents(root: &Path) -> Vec<PathBuf> {
    let mut results: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| is_source_document(path))
        .collect();
    results.sort();
    results
}

fn is_source_document(path: &Path) -> bool {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return false;
    }
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    !name.ends_with(BUNDLE_SUFFIX) && name != SUMMARY_FILE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_document_filter() {
        assert!(is_source_document(Path::new("rome.json")));
        assert!(!is_source_document(Path::new("rome.events.json")));
        assert!(!is_source_document(Path::new("out/summary.json")));
        assert!(!is_source_document(Path::new("notes.txt")));
    }

    #[test]
    fn test_scan_nested_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("ancient")).unwrap();
        std::fs::write(dir.path().join("b.json"), "{}").unwrap();
        std::fs::write(dir.path().join("ancient/a.json"), "{}").unwrap();
        std::fs::write(dir.path().join("b.events.json"), "{}").unwrap();
        std::fs::write(dir.path().join("readme.md"), "").unwrap();

        let found = scan_documents(dir.path());
        assert_eq!(
            found,
            vec![dir.path().join("ancient/a.json"), dir.path().join("b.json")]
        );
    }
}
