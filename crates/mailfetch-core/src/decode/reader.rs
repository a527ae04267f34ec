//! Async reader that pushes upstream chunks through a byte-level decoder.

use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

/// Upstream bytes pulled per poll. Bounds the decoder's working memory.
const CHUNK_SIZE: usize = 8 * 1024;

/// Incremental transfer decoder.
///
/// `push` sees the body in arbitrary slices; any sequence split across two
/// slices must be held back until the rest arrives. `finish` flushes whatever
/// is still held once upstream hits EOF.
pub trait ChunkDecoder {
    fn push(&mut self, input: &[u8], out: &mut Vec<u8>) -> io::Result<()>;
    fn finish(&mut self, out: &mut Vec<u8>) -> io::Result<()>;
}

/// Wraps an upstream reader and yields decoded bytes on demand.
#[derive(Debug)]
pub struct DecodeReader<R, D> {
    inner: R,
    decoder: D,
    chunk: Box<[u8]>,
    pending: Vec<u8>,
    pos: usize,
    done: bool,
}

impl<R, D> DecodeReader<R, D> {
    pub fn new(inner: R, decoder: D) -> Self {
        Self {
            inner,
            decoder,
            chunk: vec![0u8; CHUNK_SIZE].into_boxed_slice(),
            pending: Vec::new(),
            pos: 0,
            done: false,
        }
    }
}

impl<R, D> AsyncRead for DecodeReader<R, D>
where
    R: AsyncRead + Unpin,
    D: ChunkDecoder + Unpin,
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        loop {
            if this.pos < this.pending.len() {
                let n = (this.pending.len() - this.pos).min(buf.remaining());
                buf.put_slice(&this.pending[this.pos..this.pos + n]);
                this.pos += n;
                return Poll::Ready(Ok(()));
            }
            if this.done || buf.remaining() == 0 {
                return Poll::Ready(Ok(()));
            }

            this.pending.clear();
            this.pos = 0;

            let mut chunk = ReadBuf::new(&mut this.chunk);
            ready!(Pin::new(&mut this.inner).poll_read(cx, &mut chunk))?;
            let n = chunk.filled().len();

            if n == 0 {
                this.done = true;
                this.decoder.finish(&mut this.pending)?;
            } else {
                this.decoder.push(&this.chunk[..n], &mut this.pending)?;
            }
        }
    }
}
