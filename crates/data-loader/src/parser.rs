//! Parser for the JSON dataset files.
//!
//! - ratings.json: `{ "<user>": { "<product>": <rating>, ... }, ... }`
//! - categories.json: `{ "<product>": "<category>", ... }`

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    Ok(BufReader::new(file))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the ratings file
pub fn parse_ratings(path: &Path) -> Result<RatingsTable> {
    read_ratings(open(path)?, &file_name(path))
}

/// Parse the categories file
pub fn parse_categories(path: &Path) -> Result<CategoryOf> {
    read_categories(open(path)?, &file_name(path))
}

/// Read a ratings table from any reader. `name` is only used in errors.
pub fn read_ratings<R: Read>(reader: R, name: &str) -> Result<RatingsTable> {
    serde_json::from_reader(reader).map_err(|source| DataLoadError::ParseError {
        file: name.to_string(),
        source,
    })
}

/// Read a product -> category mapping from any reader
pub fn read_categories<R: Read>(reader: R, name: &str) -> Result<CategoryOf> {
    serde_json::from_reader(reader).map_err(|source| DataLoadError::ParseError {
        file: name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_ratings() {
        let json = r#"{
            "u1": {"p1": 5.0, "p2": 3.5},
            "u2": {"p2": 4}
        }"#;

        let ratings = read_ratings(json.as_bytes(), "ratings.json").unwrap();
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings["u1"]["p1"], 5.0);
        assert_eq!(ratings["u1"]["p2"], 3.5);
        // Integer ratings are accepted
        assert_eq!(ratings["u2"]["p2"], 4.0);
    }

    #[test]
    fn test_read_categories() {
        let json = r#"{"p1": "Books", "p2": "Music"}"#;

        let categories = read_categories(json.as_bytes(), "categories.json").unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories["p1"], "Books");
    }

    #[test]
    fn test_malformed_json_names_the_file() {
        let err = read_ratings("{\"u1\": [1, 2]}".as_bytes(), "ratings.json").unwrap_err();
        match err {
            DataLoadError::ParseError { file, .. } => assert_eq!(file, "ratings.json"),
            other => panic!("unexpected error: {other}"),
        }

        let err = read_categories("not json".as_bytes(), "categories.json").unwrap_err();
        assert!(err.to_string().contains("categories.json"));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_categories(Path::new("/nonexistent/categories.json")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
