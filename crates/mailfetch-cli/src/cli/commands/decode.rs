//! Decode command: stream a spooled body through the transfer decoder.

use anyhow::{Context, Result};
use mailfetch_core::checksum;
use mailfetch_core::decode::{decode_stream, TransferEncoding};
use mailfetch_core::pool::BodyStream;
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufReader};

/// Decode `input` into `output` and return the number of decoded bytes.
pub async fn decode_file(
    input: &Path,
    output: &Path,
    encoding: TransferEncoding,
    charset: Option<&str>,
    buffer_bytes: usize,
) -> Result<u64> {
    let file = tokio::fs::File::open(input)
        .await
        .with_context(|| format!("open {}", input.display()))?;
    let raw: BodyStream = Box::pin(BufReader::with_capacity(buffer_bytes, file));
    let mut decoded = decode_stream(raw, encoding, charset);

    let mut out = tokio::fs::File::create(output)
        .await
        .with_context(|| format!("create {}", output.display()))?;
    let written = tokio::io::copy(&mut decoded, &mut out)
        .await
        .with_context(|| format!("decode {} as {}", input.display(), encoding))?;
    out.flush().await?;
    Ok(written)
}

/// Decode a file and print the digest of the result.
pub async fn run_decode(
    input: &Path,
    output: &Path,
    encoding_label: &str,
    charset: Option<&str>,
    buffer_bytes: usize,
) -> Result<()> {
    let encoding = TransferEncoding::from_label(encoding_label);
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        %encoding,
        "decoding attachment body"
    );
    let written = decode_file(input, output, encoding, charset, buffer_bytes).await?;
    let digest = checksum::sha256_path(output).await?;
    println!("{}  {}  ({} bytes, {})", digest, output.display(), written, encoding);
    Ok(())
}
