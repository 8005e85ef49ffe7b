use std::path::Path;

use thiserror::Error;

use docanchor_core::{LocatedDocument, ReconciledRecord, ReferenceDocument};

#[derive(Debug, Error)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_reference(path: &Path) -> Result<ReferenceDocument, FileError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn load_located(path: &Path) -> Result<LocatedDocument, FileError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_record(path: &Path, record: &ReconciledRecord) -> Result<(), FileError> {
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docanchor_core::MatchResult;

    #[test]
    fn load_reference_parses_both_value_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reference.json");
        std::fs::write(
            &path,
            r#"{
                "personalDetails": {"name": "John Smith", "pan": {"value": "ABCDE1234F"}},
                "tables": [{"headers": ["Date"], "rows": [["12/01/2024"]]}]
            }"#,
        )
        .unwrap();

        let doc = load_reference(&path).unwrap();
        assert_eq!(doc.personal_details.len(), 2);
        assert_eq!(doc.tables[0].headers, vec!["Date"]);
    }

    #[test]
    fn load_located_parses_fragments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("located.json");
        std::fs::write(
            &path,
            r#"{"text_coordinates": [
                {"text": "JOHN SMITH", "bounding_box": [{"x": 1.0, "y": 2.0}], "page": 1}
            ]}"#,
        )
        .unwrap();

        let doc = load_located(&path).unwrap();
        assert_eq!(doc.text_coordinates.len(), 1);
        assert_eq!(doc.text_coordinates[0].text, "JOHN SMITH");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_reference(Path::new("/nonexistent/reference.json"));
        assert!(matches!(result, Err(FileError::Io(_))));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reference.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_reference(&path), Err(FileError::Json(_))));
    }

    #[test]
    fn save_record_writes_output_keys_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        let record = ReconciledRecord {
            personal_details: vec![MatchResult::unmatched("name", "John Smith")],
            key_value_pairs: vec![MatchResult::unmatched("name", "John Smith")],
            ..Default::default()
        };
        save_record(&path, &record).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let pd = raw.find("personal_details").unwrap();
        let kv = raw.find("key_value_pairs").unwrap();
        let ne = raw.find("named_entities").unwrap();
        let tb = raw.find("tables").unwrap();
        assert!(pd < kv && kv < ne && ne < tb);

        // The written file parses back to the same entries.
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["personal_details"][0]["field"], "name");
    }
}
