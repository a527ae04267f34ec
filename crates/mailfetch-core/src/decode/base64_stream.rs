//! Streaming base64 decoding.

use ::base64::alphabet;
use ::base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use ::base64::Engine as _;
use std::io;

use super::reader::ChunkDecoder;

/// Standard alphabet; a final quantum may come with or without padding.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes base64 in whole 4-character quanta, skipping line breaks and any
/// other byte outside the alphabet.
#[derive(Debug, Default)]
pub struct Base64Decoder {
    quanta: Vec<u8>,
}

impl Base64Decoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChunkDecoder for Base64Decoder {
    fn push(&mut self, input: &[u8], out: &mut Vec<u8>) -> io::Result<()> {
        self.quanta
            .extend(input.iter().copied().filter(|&b| is_base64_byte(b)));

        let usable = self.quanta.len() / 4 * 4;
        if usable == 0 {
            return Ok(());
        }
        decode_quanta(&self.quanta[..usable], out)?;
        self.quanta.drain(..usable);
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> io::Result<()> {
        if self.quanta.is_empty() {
            return Ok(());
        }
        let tail = std::mem::take(&mut self.quanta);
        decode_quanta(&tail, out)
    }
}

fn is_base64_byte(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'+' | b'/' | b'=')
}

fn decode_quanta(encoded: &[u8], out: &mut Vec<u8>) -> io::Result<()> {
    // Padding mid-block means several separately padded bodies were
    // concatenated; the engine only accepts padding at the very end.
    let result = if encoded.contains(&b'=') {
        encoded
            .chunks(4)
            .try_for_each(|quantum| ENGINE.decode_vec(quantum, out))
    } else {
        ENGINE.decode_vec(encoded, out)
    };
    result.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
