//! Content-transfer decoding of fetched bodies.
//!
//! The encoding label on an attachment row is free-form, so it is mapped onto
//! a closed `TransferEncoding` set first; `decode_stream` then wraps the raw
//! body in the matching streaming decoder. Nothing here buffers a whole body.

mod base64_stream;
mod quoted_printable;
mod reader;

use encoding_rs::Encoding;
use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

use crate::pool::{BodyStream, Lease};

pub use base64_stream::Base64Decoder;
pub use quoted_printable::{qp_decode_into, resolve_charset, QuotedPrintableDecoder};
pub use reader::{ChunkDecoder, DecodeReader};

/// Content-transfer encodings the fetcher knows how to undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    QuotedPrintable,
    Base64,
    /// `7bit`, `8bit`, `binary`, empty, or anything unrecognized: bytes are
    /// handed on as-is and interpreted downstream.
    Passthrough,
}

impl TransferEncoding {
    /// Map a declared label onto a known encoding.
    ///
    /// Matching is case-insensitive and by containment, so decorated labels
    /// such as `"x-base64"` or `" Quoted-Printable "` still select a decoder.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_ascii_lowercase();
        if label.contains("quoted-printable") {
            TransferEncoding::QuotedPrintable
        } else if label.contains("base64") {
            TransferEncoding::Base64
        } else {
            TransferEncoding::Passthrough
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransferEncoding::QuotedPrintable => "quoted-printable",
            TransferEncoding::Base64 => "base64",
            TransferEncoding::Passthrough => "passthrough",
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded attachment bytes, pulled lazily from the upstream body.
///
/// When the body comes off a pooled connection the stream keeps that
/// connection's lease and lets it go at end of input, on a read error, or
/// when the stream is dropped unfinished.
pub struct DecodedStream {
    inner: BodyStream,
    encoding: TransferEncoding,
    charset: Option<&'static Encoding>,
    lease: Option<Box<dyn Send>>,
}

impl DecodedStream {
    /// Keep `lease` checked out until this stream is done with the upstream body.
    pub fn hold_lease<S: Send + 'static>(mut self, lease: Lease<S>) -> Self {
        self.lease = Some(Box::new(lease));
        self
    }

    /// Whether a pooled connection is still checked out for this stream.
    pub fn holds_lease(&self) -> bool {
        self.lease.is_some()
    }

    /// Encoding that was undone to produce this stream.
    pub fn encoding(&self) -> TransferEncoding {
        self.encoding
    }

    /// Charset the decoded text is declared in. Only set for quoted-printable.
    pub fn charset(&self) -> Option<&'static Encoding> {
        self.charset
    }
}

impl AsyncRead for DecodedStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();
        let want = buf.remaining() > 0;
        let polled = this.inner.as_mut().poll_read(cx, buf);
        match &polled {
            Poll::Ready(Ok(())) if want && buf.filled().len() == before => this.lease = None,
            Poll::Ready(Err(_)) => this.lease = None,
            _ => {}
        }
        polled
    }
}

impl fmt::Debug for DecodedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedStream")
            .field("encoding", &self.encoding)
            .field("charset", &self.charset.map(Encoding::name))
            .field("holds_lease", &self.holds_lease())
            .finish_non_exhaustive()
    }
}

/// Wrap `raw` in the decoder for `encoding`.
///
/// `charset` is the declared charset of the part; it only parameterizes the
/// quoted-printable decoder.
pub fn decode_stream(raw: BodyStream, encoding: TransferEncoding, charset: Option<&str>) -> DecodedStream {
    match encoding {
        TransferEncoding::QuotedPrintable => {
            let decoder = QuotedPrintableDecoder::new(charset);
            let charset = decoder.charset();
            DecodedStream {
                inner: Box::pin(DecodeReader::new(raw, decoder)),
                encoding,
                charset: Some(charset),
                lease: None,
            }
        }
        TransferEncoding::Base64 => DecodedStream {
            inner: Box::pin(DecodeReader::new(raw, Base64Decoder::new())),
            encoding,
            charset: None,
            lease: None,
        },
        TransferEncoding::Passthrough => DecodedStream {
            inner: raw,
            encoding,
            charset: None,
            lease: None,
        },
    }
}
