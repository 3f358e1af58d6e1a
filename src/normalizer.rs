//! Maps raw rows onto [`AccountRecord`]s using a per-format column layout.

use crate::dto::{AccountRecord, RecordFormat};

/// Column indexes of the username and password cells in a raw row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub username_column: usize,
    pub password_column: usize,
}

impl ColumnLayout {
    /// `username,password`
    pub const DELIMITED: Self = Self {
        username_column: 0,
        password_column: 1,
    };

    /// `id,name,password`; the id is the username and the name is ignored.
    pub const WORKBOOK: Self = Self {
        username_column: 0,
        password_column: 2,
    };

    pub fn for_format(format: RecordFormat) -> Self {
        match format {
            RecordFormat::Delimited => Self::DELIMITED,
            RecordFormat::Workbook => Self::WORKBOOK,
        }
    }

    /// Minimum number of cells a row needs for this layout.
    pub fn min_cells(&self) -> usize {
        self.username_column.max(self.password_column) + 1
    }
}

/// Returns `None` for rows too short for the layout. Present cells are trimmed
/// but may be empty.
pub fn normalize<S: AsRef<str>>(row: &[S], layout: ColumnLayout) -> Option<AccountRecord> {
    if row.len() < layout.min_cells() {
        return None;
    }
    Some(AccountRecord {
        username: row[layout.username_column].as_ref().trim().to_string(),
        password: row[layout.password_column].as_ref().trim().to_string(),
    })
}
