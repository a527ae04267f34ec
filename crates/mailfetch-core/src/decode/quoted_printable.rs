//! Streaming quoted-printable decoding (RFC 2045 §6.7).

use encoding_rs::{Encoding, UTF_8};
use std::io;

use super::reader::ChunkDecoder;

/// Quoted-printable to raw octets.
///
/// `=XX` escapes are decoded (either hex case), soft line breaks (`=\r\n` and
/// `=\n`) are dropped, and anything that is not a valid escape passes through
/// untouched. Escapes cut in half by a read boundary are carried over to the
/// next chunk. Output bytes are never transcoded; the resolved charset is
/// kept so consumers know how to interpret them.
#[derive(Debug)]
pub struct QuotedPrintableDecoder {
    charset: &'static Encoding,
    carry: Vec<u8>,
}

impl QuotedPrintableDecoder {
    pub fn new(charset: Option<&str>) -> Self {
        Self {
            charset: resolve_charset(charset),
            carry: Vec::new(),
        }
    }

    pub fn charset(&self) -> &'static Encoding {
        self.charset
    }
}

/// Resolve a declared charset label, falling back to UTF-8 when the label is
/// missing, blank, or unknown.
pub fn resolve_charset(label: Option<&str>) -> &'static Encoding {
    label
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .and_then(|l| Encoding::for_label(l.as_bytes()))
        .unwrap_or(UTF_8)
}

impl ChunkDecoder for QuotedPrintableDecoder {
    fn push(&mut self, input: &[u8], out: &mut Vec<u8>) -> io::Result<()> {
        if self.carry.is_empty() {
            let dangling = qp_decode_into(input, out);
            self.carry.extend_from_slice(&input[input.len() - dangling..]);
        } else {
            let mut joined = std::mem::take(&mut self.carry);
            joined.extend_from_slice(input);
            let dangling = qp_decode_into(&joined, out);
            self.carry.extend_from_slice(&joined[joined.len() - dangling..]);
        }
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> io::Result<()> {
        // An escape that never completed is not valid QP; keep it verbatim.
        out.append(&mut self.carry);
        Ok(())
    }
}

/// Decode `input` into `out`. Returns how many trailing bytes form an escape
/// that may still complete once more input arrives.
pub fn qp_decode_into(input: &[u8], out: &mut Vec<u8>) -> usize {
    let mut i = 0;
    while i < input.len() {
        let b = input[i];
        if b != b'=' {
            out.push(b);
            i += 1;
            continue;
        }

        match &input[i + 1..] {
            [] => return input.len() - i,
            [b'\n', ..] => i += 2,
            [b'\r', b'\n', ..] => i += 3,
            [_] => return input.len() - i,
            [hi, lo, ..] => match (hex_value(*hi), hex_value(*lo)) {
                (Some(hi), Some(lo)) => {
                    out.push((hi << 4) | lo);
                    i += 3;
                }
                _ => {
                    out.push(b'=');
                    i += 1;
                }
            },
        }
    }
    0
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}
