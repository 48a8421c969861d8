//! Newline framing shared by the server and the client.
//!
//! Every message is one UTF-8 line ending in `\n`. Reads are bounded so a
//! peer cannot grow a buffer without limit.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub const TERMINATOR: u8 = b'\n';

/// Outcome of reading one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A complete line, terminator stripped.
    Line(String),
    /// The peer closed the stream before sending anything.
    Eof,
    /// `limit` bytes arrived without a terminator.
    TooLong,
}

/// Read one line of at most `limit` bytes, terminator included.
///
/// A final unterminated line before EOF is still returned as a line.
/// Invalid UTF-8 is replaced rather than rejected.
pub async fn read_frame<R>(reader: &mut R, limit: usize) -> std::io::Result<Frame>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let n = reader
        .take(limit as u64)
        .read_until(TERMINATOR, &mut buf)
        .await?;

    if n == 0 {
        return Ok(Frame::Eof);
    }

    if buf.last() == Some(&TERMINATOR) {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if n == limit {
        return Ok(Frame::TooLong);
    }

    Ok(Frame::Line(String::from_utf8_lossy(&buf).into_owned()))
}

/// Consume input up to and including the next terminator, in chunks of
/// at most `chunk` bytes. Returns the number of bytes discarded.
pub async fn discard_line<R>(reader: &mut R, chunk: usize) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::with_capacity(chunk);
    let mut total = 0;
    loop {
        buf.clear();
        let n = (&mut *reader)
            .take(chunk as u64)
            .read_until(TERMINATOR, &mut buf)
            .await?;
        total += n;
        if n == 0 || buf.last() == Some(&TERMINATOR) {
            return Ok(total);
        }
    }
}

/// Write `line` followed by the terminator.
pub async fn write_frame<W>(writer: &mut W, line: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::with_capacity(line.len() + 1);
    buf.extend_from_slice(line.as_bytes());
    buf.push(TERMINATOR);
    writer.write_all(&buf).await?;
    writer.flush().await
}
