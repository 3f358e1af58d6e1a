//! Comma-separated input with optional quoting.

use std::io::Read;

use csv::StringRecord;

use super::{QuoteTracker, RawRow, Rows, TabularRecordReader};
use crate::error::{Error, Result};

pub struct DelimitedReader;

impl DelimitedReader {
    /// Builds the csv reader used for uploads: header row skipped, ragged rows allowed.
    pub fn builder() -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder.has_headers(true).flexible(true);
        builder
    }
}

impl TabularRecordReader for DelimitedReader {
    fn read_rows<'a>(&self, input: Box<dyn Read + 'a>) -> Result<Rows<'a>> {
        let reader = Self::builder().from_reader(QuoteTracker::new(input));
        Ok(Box::new(DelimitedRows {
            reader,
            record: StringRecord::new(),
            done: false,
        }))
    }
}

struct DelimitedRows<R> {
    reader: csv::Reader<QuoteTracker<R>>,
    record: StringRecord,
    done: bool,
}

impl<R: Read> Iterator for DelimitedRows<R> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_record(&mut self.record) {
            Ok(true) => Some(Ok(self.record.iter().map(String::from).collect())),
            Ok(false) => {
                self.done = true;
                if self.reader.get_ref().is_inside_quotes() {
                    return Some(Err(unterminated_quote()));
                }
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err.into()))
            }
        }
    }
}

pub(crate) fn unterminated_quote() -> Error {
    Error::MalformedInput("unterminated quoted field".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn rows(input: &[u8]) -> Result<Vec<RawRow>> {
        DelimitedReader.read_rows(Box::new(input))?.collect()
    }

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_header_is_skipped() -> Result<()> {
        let rows = rows(b"user,pass\nalice,secret1\nbob,secret2\n")?;
        assert_eq!(rows, vec![row(&["alice", "secret1"]), row(&["bob", "secret2"])]);
        Ok(())
    }

    #[test]
    fn test_header_only_yields_nothing() -> Result<()> {
        assert!(rows(b"user,pass\n")?.is_empty());
        assert!(rows(b"")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_ragged_rows_pass_through() -> Result<()> {
        let rows = rows(b"user,pass\nalice\nbob,secret,extra\n")?;
        assert_eq!(rows, vec![row(&["alice"]), row(&["bob", "secret", "extra"])]);
        Ok(())
    }

    #[test]
    fn test_cells_are_not_trimmed() -> Result<()> {
        let rows = rows(b"user,pass\n alice , secret \n")?;
        assert_eq!(rows, vec![row(&[" alice ", " secret "])]);
        Ok(())
    }

    #[test]
    fn test_quoted_fields() -> Result<()> {
        let rows = rows(b"user,pass\n\"smith, j\",\"pa\"\"ss\"\n")?;
        assert_eq!(rows, vec![row(&["smith, j", "pa\"ss"])]);
        Ok(())
    }

    #[test]
    fn test_unterminated_quote_is_malformed() {
        let result = rows(b"user,pass\nalice,\"secret\nbob,pw\n");
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let result = rows(b"user,pass\nal\xffice,secret\n");
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_read_fixture() -> Result<()> {
        let file = File::open("data/students.csv")?;
        let rows: Vec<RawRow> = DelimitedReader.read_rows(Box::new(file))?.collect::<Result<_>>()?;
        assert_eq!(
            rows,
            vec![
                row(&["alice", " secret1"]),
                row(&["bob", "secret2"]),
                row(&["mallory"]),
                row(&[" carol ", "secret3"]),
            ]
        );
        Ok(())
    }
}
