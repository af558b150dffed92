//! Lazily-produced byte sequences
//!
//! Generated images arrive as a stream of chunks with no known total length.
//! Backends that need a fixed-size body get one by draining the stream.

use crate::{Error, Result};
use bytes::Bytes;
use futures_util::stream::{self, BoxStream, Stream, StreamExt};

/// A pull-based sequence of byte chunks that may fail part way through.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Consume `stream` to exhaustion and return every byte in production order.
///
/// Any chunk error aborts the drain; the bytes read so far are discarded.
pub async fn drain<S>(stream: S) -> Result<Vec<u8>>
where
    S: Stream<Item = Result<Bytes>>,
{
    let mut stream = std::pin::pin!(stream);
    let mut buffer = Vec::new();
    let mut chunks = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| match e {
            Error::StreamRead(_) => e,
            other => Error::StreamRead(other.to_string()),
        })?;
        chunks += 1;
        buffer.extend_from_slice(&chunk);
    }

    tracing::debug!("Drained {} bytes from {} chunks", buffer.len(), chunks);
    Ok(buffer)
}

/// A stream that yields `data` as a single chunk. Empty input yields no chunks.
pub fn from_bytes(data: impl Into<Bytes>) -> ByteStream {
    let data = data.into();
    if data.is_empty() {
        stream::empty().boxed()
    } else {
        stream::once(async move { Ok(data) }).boxed()
    }
}

/// A stream that yields each of `chunks` in order.
pub fn from_chunks(chunks: Vec<Vec<u8>>) -> ByteStream {
    stream::iter(chunks.into_iter().map(|chunk| Ok(Bytes::from(chunk)))).boxed()
}
