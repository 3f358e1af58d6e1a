//! Tabular readers turn an uploaded byte stream into raw rows.
//!
//! Both formats share the same contract:
//! - The first row is a header and is never yielded.
//! - Rows are passed through regardless of their cell count; the normalizer
//!   decides which rows are usable.
//! - A stream that cannot be parsed as the declared format fails with
//!   [`Error::MalformedInput`](crate::Error::MalformedInput).

mod delimited;
mod quotes;
mod workbook;

pub use delimited::DelimitedReader;
pub(crate) use delimited::unterminated_quote;
pub use quotes::QuoteTracker;
pub use workbook::{parse_first_sheet, WorkbookReader};

use std::io::Read;

use crate::{dto::RecordFormat, error::Result};

/// One raw row, cells in column order.
pub type RawRow = Vec<String>;

/// Lazy, finite, non-restartable sequence of data rows.
pub type Rows<'a> = Box<dyn Iterator<Item = Result<RawRow>> + 'a>;

pub trait TabularRecordReader: Send + Sync {
    fn read_rows<'a>(&self, input: Box<dyn Read + 'a>) -> Result<Rows<'a>>;
}

/// Selects the reader for a declared format.
pub fn reader_for(format: RecordFormat) -> &'static dyn TabularRecordReader {
    match format {
        RecordFormat::Delimited => &DelimitedReader,
        RecordFormat::Workbook => &WorkbookReader,
    }
}

pub fn read_rows<'a, R>(input: R, format: RecordFormat) -> Result<Rows<'a>>
where
    R: Read + 'a,
{
    reader_for(format).read_rows(Box::new(input))
}
