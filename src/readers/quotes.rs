//! Quote tracking for delimited streams.
//!
//! The csv readers accept a quoted field that runs to end of input without a
//! closing quote. [`QuoteTracker`] watches the bytes that pass through it so the
//! caller can reject such a stream once the reader reports end of input.

use std::io::{self, Read};
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    FieldStart,
    Unquoted,
    Quoted,
    /// A quote seen inside a quoted field; either an escape or the closing quote.
    QuoteInQuoted,
}

#[derive(Debug, Default)]
struct QuoteScanner {
    state: State,
}

impl QuoteScanner {
    fn feed(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state = match (self.state, byte) {
                (State::FieldStart, b'"') => State::Quoted,
                (State::Quoted, b'"') => State::QuoteInQuoted,
                (State::Quoted, _) => State::Quoted,
                (State::QuoteInQuoted, b'"') => State::Quoted,
                (_, b',' | b'\n' | b'\r') => State::FieldStart,
                _ => State::Unquoted,
            };
        }
    }
}

/// Reader adapter that records whether the stream ended inside a quoted field.
/// Works for both [`std::io::Read`] and [`tokio::io::AsyncRead`] sources.
pub struct QuoteTracker<R> {
    inner: R,
    scanner: QuoteScanner,
}

impl<R> QuoteTracker<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            scanner: QuoteScanner::default(),
        }
    }

    /// True if the bytes read so far stop inside an open quoted field.
    pub fn is_inside_quotes(&self) -> bool {
        self.scanner.state == State::Quoted
    }
}

impl<R: Read> Read for QuoteTracker<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.scanner.feed(&buf[..n]);
        Ok(n)
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for QuoteTracker<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();
        let poll = Pin::new(&mut this.inner).poll_read(cx, buf);
        if let Poll::Ready(Ok(())) = &poll {
            this.scanner.feed(&buf.filled()[before..]);
        }
        poll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn ends_inside_quotes(input: &str) -> bool {
        let mut tracker = QuoteTracker::new(input.as_bytes());
        io::copy(&mut tracker, &mut io::sink()).unwrap();
        tracker.is_inside_quotes()
    }

    #[test]
    fn test_plain_input_is_closed() {
        assert!(!ends_inside_quotes("user,pass\nalice,secret\n"));
    }

    #[test]
    fn test_quoted_fields_are_closed() {
        assert!(!ends_inside_quotes("user,pass\n\"alice\",\"a,b\"\n"));
        assert!(!ends_inside_quotes("user,pass\n\"al\"\"ice\",x\n"));
        assert!(!ends_inside_quotes("\"multi\nline\",x"));
    }

    #[test]
    fn test_unterminated_quote_is_detected() {
        assert!(ends_inside_quotes("user,pass\n\"alice,secret\n"));
        assert!(ends_inside_quotes("user,pass\nalice,\"secret"));
    }

    #[test]
    fn test_bare_quote_inside_unquoted_field_is_literal() {
        assert!(!ends_inside_quotes("user,pass\nal\"ice,secret\n"));
    }

    #[test]
    fn test_escaped_quote_at_end_is_still_open() {
        assert!(ends_inside_quotes("a,\"b\"\""));
    }

    #[tokio::test]
    async fn test_async_tracking() {
        let mut tracker = QuoteTracker::new(&b"user,pass\n\"alice,secret\n"[..]);
        let mut sink = Vec::new();
        AsyncReadExt::read_to_end(&mut tracker, &mut sink)
            .await
            .unwrap();
        assert!(tracker.is_inside_quotes());
        assert_eq!(sink.len(), 24);
    }
}
