//! Output chunks and stream decoding.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Read buffer size for child output streams.
const READ_BUFFER_SIZE: usize = 8 * 1024;

/// How child output is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputEncoding {
    /// Raw bytes as read from the pipe.
    #[serde(alias = "buffer")]
    Bytes,
    /// UTF-8 text. Invalid sequences are replaced with U+FFFD.
    #[serde(alias = "utf-8")]
    Utf8,
}

/// One piece of child output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// Decoded text.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl Chunk {
    /// Empty chunk of the given encoding.
    #[must_use]
    pub fn empty(encoding: OutputEncoding) -> Self {
        match encoding {
            OutputEncoding::Bytes => Self::Bytes(Vec::new()),
            OutputEncoding::Utf8 => Self::Text(String::new()),
        }
    }

    /// Wrap fully-read output in the given encoding.
    #[must_use]
    pub fn from_output(bytes: Vec<u8>, encoding: OutputEncoding) -> Self {
        match encoding {
            OutputEncoding::Bytes => Self::Bytes(bytes),
            OutputEncoding::Utf8 => Self::Text(match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
            }),
        }
    }

    /// Text view, decoding bytes lossily.
    #[must_use]
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Bytes(bytes) => String::from_utf8_lossy(bytes),
        }
    }

    /// Byte view.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    /// Returns true if the chunk holds no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// Incremental UTF-8 decoder that carries split sequences between reads.
#[derive(Debug, Default)]
struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut text = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    text.push_str(valid);
                    self.pending.clear();
                    break;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    text.push_str(&String::from_utf8_lossy(&self.pending[..valid_up_to]));
                    match e.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid_up_to + len);
                        }
                        // incomplete sequence at the end, wait for more bytes
                        None => {
                            self.pending.drain(..valid_up_to);
                            break;
                        }
                    }
                }
            }
        }
        text
    }

    fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}

/// Reads a child output stream as [`Chunk`]s.
///
/// `next_chunk` is cancel safe: no data is lost if it is dropped before
/// completing.
#[derive(Debug)]
pub(crate) struct ChunkReader<R> {
    reader: R,
    decoder: Option<Utf8Decoder>,
    buf: Vec<u8>,
    done: bool,
}

impl<R: AsyncRead + Unpin> ChunkReader<R> {
    pub(crate) fn new(reader: R, encoding: OutputEncoding) -> Self {
        Self {
            reader,
            decoder: (encoding == OutputEncoding::Utf8).then(Utf8Decoder::default),
            buf: vec![0; READ_BUFFER_SIZE],
            done: false,
        }
    }

    /// Next chunk, or `None` at end of stream.
    pub(crate) async fn next_chunk(&mut self) -> std::io::Result<Option<Chunk>> {
        loop {
            if self.done {
                return Ok(None);
            }
            let n = self.reader.read(&mut self.buf).await?;
            if n == 0 {
                self.done = true;
                return Ok(self
                    .decoder
                    .as_mut()
                    .and_then(Utf8Decoder::finish)
                    .map(Chunk::Text));
            }
            match self.decoder.as_mut() {
                None => return Ok(Some(Chunk::Bytes(self.buf[..n].to_vec()))),
                Some(decoder) => {
                    let text = decoder.decode(&self.buf[..n]);
                    if !text.is_empty() {
                        return Ok(Some(Chunk::Text(text)));
                    }
                }
            }
        }
    }
}

/// Turn a chunk reader into a stream that ends at EOF or after the first error.
pub(crate) fn chunk_stream<R>(
    reader: ChunkReader<R>,
) -> impl futures_core::Stream<Item = std::io::Result<Chunk>>
where
    R: AsyncRead + Unpin,
{
    futures_util::stream::unfold(Some(reader), |state| async move {
        let mut reader = state?;
        match reader.next_chunk().await {
            Ok(Some(chunk)) => Some((Ok(chunk), Some(reader))),
            Ok(None) => None,
            Err(e) => Some((Err(e), None)),
        }
    })
}
