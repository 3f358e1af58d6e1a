//! Spreadsheet workbooks (`.xlsx`, `.xls`); only the first sheet is read.

use std::io::{Cursor, Read};

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use super::{RawRow, Rows, TabularRecordReader};
use crate::error::{Error, Result};

pub struct WorkbookReader;

impl TabularRecordReader for WorkbookReader {
    fn read_rows<'a>(&self, mut input: Box<dyn Read + 'a>) -> Result<Rows<'a>> {
        // The container format needs random access, so the upload is buffered.
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        let rows = parse_first_sheet(bytes)?;
        Ok(Box::new(rows.into_iter().map(Ok)))
    }
}

/// Parses the first sheet of a workbook into data rows, header excluded.
///
/// Cells keep their sheet column positions even when the used range does not
/// start at column A. Trailing empty cells are dropped from each row.
pub fn parse_first_sheet(bytes: Vec<u8>) -> Result<Vec<RawRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::MalformedInput("workbook has no sheets".to_string()))??;
    Ok(sheet_rows(&range))
}

fn sheet_rows(range: &Range<Data>) -> Vec<RawRow> {
    let Some((first_row, first_col)) = range.start() else {
        return Vec::new();
    };
    // When the used range starts below row 1, the header row is empty and not part of it.
    let header_rows = usize::from(first_row == 0);
    range
        .rows()
        .skip(header_rows)
        .map(|cells| {
            let mut row: RawRow = std::iter::repeat(String::new())
                .take(first_col as usize)
                .chain(cells.iter().map(|cell| cell.to_string()))
                .collect();
            while row.last().is_some_and(|cell| cell.is_empty()) {
                row.pop();
            }
            row
        })
        .collect()
}
