//! Upstream reader that hands out a few bytes per poll and stalls in between.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

pub struct Trickle {
    data: Vec<u8>,
    pos: usize,
    step: usize,
    stall: bool,
}

impl Trickle {
    pub fn new(data: impl Into<Vec<u8>>, step: usize) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            step: step.max(1),
            stall: false,
        }
    }
}

impl AsyncRead for Trickle {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        this.stall = !this.stall;
        if this.stall {
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }
        let n = this
            .step
            .min(this.data.len() - this.pos)
            .min(buf.remaining());
        buf.put_slice(&this.data[this.pos..this.pos + n]);
        this.pos += n;
        Poll::Ready(Ok(()))
    }
}
