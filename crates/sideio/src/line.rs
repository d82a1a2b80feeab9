use bytes::Buf;
use bytes::Bytes;
use bytes::BytesMut;
use memchr::memchr2;
use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;

use crate::telnet::IacFilter;

/// One unit of client input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A line with its terminator removed (may be empty).
    Line(Bytes),
    /// Telnet negotiation replies that should be written back to the peer.
    Negotiation(Bytes),
}

/// Buffered line reader owned for the whole life of a connection.
///
/// Bytes read past the end of one line stay buffered for the next call.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    raw: BytesMut,
    buf: BytesMut,
    filter: IacFilter,
    replies: Vec<u8>,
    // Set when a chunk ended on `\r`; a following `\n` or `\0` belongs to that EOL.
    skip_lf: bool,
    max_line_len: usize,
}

impl<R> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            raw: BytesMut::with_capacity(4 * 1024),
            buf: BytesMut::with_capacity(4 * 1024),
            filter: IacFilter::new(),
            replies: Vec::new(),
            skip_lf: false,
            max_line_len: 4 * 1024,
        }
    }

    pub fn max_line_len(mut self, max: usize) -> Self {
        self.max_line_len = max.max(1);
        self
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn pop_line(&mut self) -> Option<Bytes> {
        if self.skip_lf && !self.buf.is_empty() {
            if matches!(self.buf[0], b'\n' | 0) {
                self.buf.advance(1);
            }
            self.skip_lf = false;
        }

        let i = memchr2(b'\n', b'\r', &self.buf)?;
        let eol = self.buf[i];
        let line = self.buf.split_to(i).freeze();
        self.buf.advance(1);

        // Telnet sends CRLF, some clients send CR NUL or a bare CR.
        if eol == b'\r' {
            match self.buf.first() {
                Some(b'\n') | Some(0) => self.buf.advance(1),
                Some(_) => {}
                None => self.skip_lf = true,
            }
        }
        Some(line)
    }
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    /// Read the next pending negotiation reply or line, in that order.
    ///
    /// Returns:
    /// - `Ok(Some(input))` for a line or negotiation reply,
    /// - `Ok(None)` on clean EOF with no buffered data.
    pub async fn read_input(&mut self) -> std::io::Result<Option<Input>> {
        loop {
            if !self.replies.is_empty() {
                let replies = std::mem::take(&mut self.replies);
                return Ok(Some(Input::Negotiation(Bytes::from(replies))));
            }

            if let Some(line) = self.pop_line() {
                return Ok(Some(Input::Line(line)));
            }

            if self.buf.len() > self.max_line_len {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "line too long",
                ));
            }

            self.raw.clear();
            let n = self.inner.read_buf(&mut self.raw).await?;
            if n == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "eof while reading line",
                ));
            }
            self.filter.feed(&self.raw, &mut self.buf, &mut self.replies);
        }
    }
}
