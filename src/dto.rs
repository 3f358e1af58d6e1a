use serde::{Deserialize, Serialize};
use std::path::Path;

/// Canonical account record, independent of the source file format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub username: String,
    pub password: String,
}

/// A named server offered for session routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub name: String,
    pub address: String,
}

/// Outcome of one provisioning call, plain data for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProvisioningResult {
    pub created: usize,
    pub skipped: usize,
}

/// Declared format of an uploaded account file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    Delimited,
    Workbook,
}

impl RecordFormat {
    /// Picks the format from a file name's extension (`.csv`, `.xlsx`, `.xls`).
    pub fn from_file_name(name: impl AsRef<Path>) -> Option<Self> {
        let ext = name.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Delimited),
            "xlsx" | "xls" => Some(Self::Workbook),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            RecordFormat::from_file_name("students.csv"),
            Some(RecordFormat::Delimited)
        );
        assert_eq!(
            RecordFormat::from_file_name("class.xlsx"),
            Some(RecordFormat::Workbook)
        );
        assert_eq!(
            RecordFormat::from_file_name("legacy.xls"),
            Some(RecordFormat::Workbook)
        );
    }

    #[test]
    fn test_format_extension_is_case_insensitive() {
        assert_eq!(
            RecordFormat::from_file_name("UPLOAD.CSV"),
            Some(RecordFormat::Delimited)
        );
        assert_eq!(
            RecordFormat::from_file_name("Roster.XlSx"),
            Some(RecordFormat::Workbook)
        );
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(RecordFormat::from_file_name("notes.txt"), None);
        assert_eq!(RecordFormat::from_file_name("no_extension"), None);
        assert_eq!(RecordFormat::from_file_name("archive.csv.gz"), None);
    }

    #[test]
    fn test_result_serializes_counts() {
        let result = ProvisioningResult {
            created: 2,
            skipped: 1,
        };
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"created":2,"skipped":1}"#
        );
    }
}
