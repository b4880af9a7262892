//! NDJSON framing over any async byte stream.
//!
//! `run` wires these to stdin/stdout; tests use in-memory duplex pipes.
//!
//! # Edge Cases Handled
//!
//! - Last line without `\n` is still delivered at EOF.
//! - Blank lines are skipped.
//! - Lines over the size limit are dropped whole, and reading resumes at
//!   the next newline.
//! - Invalid UTF-8 and malformed JSON are logged and skipped.

use framing::{BoundedLines, Line};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::driver::DriverInput;
use crate::error::BridgeError;

use super::protocol::{OutboundCommand, encode_outbound, parse_inbound};

/// Default per-line limit (1 MiB).
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Longest excerpt of a rejected line that reaches the log.
const LOG_EXCERPT_LEN: usize = 200;

/// Counts kept by the reader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Lines parsed and forwarded to the driver
    pub forwarded: u64,
    /// Lines dropped
    pub skipped: u64,
}

mod framing {
    //! Line decoder that reports oversized and non-UTF-8 lines as items
    //! instead of errors, so one bad line does not end the stream.

    use std::io;

    use bytes::BytesMut;
    use tokio_util::codec::{Decoder, LinesCodec, LinesCodecError};

    use crate::error::BridgeError;

    /// One framed line.
    #[derive(Debug, PartialEq, Eq)]
    pub enum Line {
        /// Complete line without its terminator
        Text(String),
        /// Line longer than the limit; its bytes were discarded
        Oversized,
        /// Line that was not valid UTF-8; its bytes were discarded
        InvalidUtf8,
    }

    pub struct BoundedLines(LinesCodec);

    impl BoundedLines {
        pub fn new(max_length: usize) -> Self {
            Self(LinesCodec::new_with_max_length(max_length))
        }

        fn map(result: Result<Option<String>, LinesCodecError>) -> Result<Option<Line>, BridgeError> {
            match result {
                Ok(line) => Ok(line.map(Line::Text)),
                Err(LinesCodecError::MaxLineLengthExceeded) => Ok(Some(Line::Oversized)),
                Err(LinesCodecError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => {
                    Ok(Some(Line::InvalidUtf8))
                }
                Err(e) => Err(e.into()),
            }
        }
    }

    impl Decoder for BoundedLines {
        type Item = Line;
        type Error = BridgeError;

        fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Line>, BridgeError> {
            Self::map(self.0.decode(buf))
        }

        fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Line>, BridgeError> {
            Self::map(self.0.decode_eof(buf))
        }
    }
}

/// Reads inbound lines and forwards them to the driver until EOF,
/// cancellation, or the driver going away.
///
/// # Errors
///
/// Returns `BridgeError::Io` if the underlying reader fails.
pub async fn run_reader<R>(
    reader: R,
    max_message_size: usize,
    tx: mpsc::Sender<DriverInput>,
    cancel: CancellationToken,
) -> Result<ReaderStats, BridgeError>
where
    R: AsyncRead + Unpin,
{
    let mut frames = FramedRead::new(reader, BoundedLines::new(max_message_size));
    let mut stats = ReaderStats::default();

    loop {
        let frame = tokio::select! {
            () = cancel.cancelled() => {
                debug!("bridge reader cancelled");
                break;
            }
            frame = frames.next() => frame,
        };

        let Some(frame) = frame else {
            debug!("bridge input EOF");
            break;
        };

        let text = match frame? {
            Line::Text(text) => text,
            Line::Oversized => {
                warn!(limit = max_message_size, "message exceeds size limit, skipping");
                stats.skipped += 1;
                continue;
            }
            Line::InvalidUtf8 => {
                warn!("invalid UTF-8 in message, skipping line");
                stats.skipped += 1;
                continue;
            }
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_inbound(trimmed) {
            Ok(message) => {
                if tx.send(message.into()).await.is_err() {
                    debug!("driver gone, stopping bridge reader");
                    break;
                }
                stats.forwarded += 1;
            }
            Err(e) => {
                warn!(
                    error = %e,
                    line = %sanitize_for_log(trimmed, LOG_EXCERPT_LEN),
                    "invalid bridge message, skipping"
                );
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}

/// Writes outbound commands, one per line, until every sender is dropped.
/// Returns the number of lines written.
///
/// # Errors
///
/// Returns `BridgeError::Io` if the writer fails and `BridgeError::Json`
/// if a command cannot be serialized.
pub async fn run_writer<W>(
    writer: W,
    mut rx: mpsc::UnboundedReceiver<OutboundCommand>,
) -> Result<u64, BridgeError>
where
    W: AsyncWrite + Unpin,
{
    let mut sink = FramedWrite::new(writer, LinesCodec::new());
    let mut written = 0_u64;
    while let Some(command) = rx.recv().await {
        let line = encode_outbound(&command)?;
        sink.send(line).await?;
        written += 1;
    }
    SinkExt::<String>::close(&mut sink).await?;
    debug!(written, "bridge writer finished");
    Ok(written)
}

/// Truncates and strips control characters from untrusted input before logging.
fn sanitize_for_log(input: &str, max_len: usize) -> String {
    input
        .chars()
        .take(max_len)
        .map(|c| {
            if c.is_control() && c != '\t' {
                '\u{FFFD}'
            } else {
                c
            }
        })
        .collect()
}
