//! SHA-256 of decoded attachment bytes.
//!
//! Computed on demand after a body has been spooled, not inline with the
//! fetch path.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::io;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};

const BUF_SIZE: usize = 64 * 1024;

/// Digest everything `reader` yields. Returns lowercase hex and the byte count.
pub async fn sha256_reader<R>(reader: &mut R) -> io::Result<(String, u64)>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        total += n as u64;
    }
    Ok((hex::encode(hasher.finalize()), total))
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
pub async fn sha256_path(path: &Path) -> Result<String> {
    let mut f = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("open {}", path.display()))?;
    let (digest, _) = sha256_reader(&mut f)
        .await
        .with_context(|| format!("read {}", path.display()))?;
    Ok(digest)
}
