//! Study result I/O.
//!
//! JSON persistence for study results so host layers can hand them to
//! visualization or post-processing without re-running the analysis.

use crate::study::StudyResult;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Writes a study result to a JSON file.
pub fn write_result(path: &Path, result: &StudyResult) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, result)
        .with_context(|| format!("Failed to serialize study result to: {}", path.display()))?;

    Ok(())
}

/// Reads a study result from a JSON file.
pub fn read_result(path: &Path) -> Result<StudyResult> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let result: StudyResult = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to deserialize study result from: {}", path.display()))?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() -> Result<()> {
        let result = StudyResult {
            per_point: vec![1.5, 0.0, 42.25],
            total: 43.75,
        };
        let path = std::env::temp_dir().join("sunview3d_result_roundtrip.json");
        write_result(&path, &result)?;
        let loaded = read_result(&path)?;
        assert_eq!(result, loaded);
        std::fs::remove_file(&path).ok();
        Ok(())
    }

    #[test]
    fn test_read_missing_file_fails() {
        let path = Path::new("/nonexistent/sunview3d.json");
        assert!(read_result(path).is_err());
    }
}
